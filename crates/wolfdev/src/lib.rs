//! Decoding for the map and resource archives of Wolfenstein 3D, Spear of
//! Destiny and Super 3D Noah's Ark.
//!
//! A data set is a head index (`MAPHEAD`), the compressed levels it points
//! into (`GAMEMAPS`), a page file of walls, sprites and digitized sounds
//! (`VSWAP`) and optionally an audio archive (`AUDIOHED` and `AUDIOT`).
//! [`Archive::load`] detects which game a data set belongs to and decodes all
//! of it; the modules below can also be used on their own.
//!
//! Decoding only. Nothing here writes archives.

pub mod archive;
pub mod audio;
pub mod chunks;
pub mod classify;
pub mod compression;
pub mod errors;
pub mod maps;
pub mod quiz;
pub mod utils;
pub mod variant;
pub mod vswap;

pub use archive::{Archive, ArchiveSources, LevelSlot, LoadOptions};
pub use errors::{Error, ErrorKind};
pub use variant::VariantTag;
