//! Loading a complete data set.
//!
//! An [`Archive`] is built in one call and holds every decoded level, the
//! page file and, optionally, the audio archive. A level that fails to decode
//! is skipped and recorded; a bad head index or page file fails the load.

use std::{fs, path::Path};

use crate::{
    audio::AudioArchive,
    compression::{CodecParams, LengthPrefix},
    errors::Error,
    maps::{Level, LevelError, LevelPointer, MapHead},
    quiz::{Quiz, parse_quizzes},
    variant::{self, VariantTag},
    vswap::ResourceArchive,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Spear of Destiny mission to load: 1 for the base game, 2 or 3 for the
    /// mission packs. Ignored for other games.
    pub spear_mission: u8,
    /// Load data sets whose variant cannot be identified, decoding them with
    /// Wolfenstein rules.
    pub allow_unrecognized: bool,
    pub load_audio: bool,
    pub length_prefix: LengthPrefix,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            spear_mission: 1,
            allow_unrecognized: false,
            load_audio: true,
            length_prefix: LengthPrefix::Word,
        }
    }
}

/// The raw contents of a data set's files.
#[derive(Debug, Clone, Default)]
pub struct ArchiveSources {
    pub map_head: Vec<u8>,
    pub game_maps: Vec<u8>,
    pub vswap: Vec<u8>,
    pub audio_head: Option<Vec<u8>>,
    pub audio_data: Option<Vec<u8>>,
    pub length_prefix: LengthPrefix,
}

#[derive(Debug, Clone)]
pub enum LevelSlot {
    Absent,
    Present(Level),
    Skipped(LevelError),
}

impl LevelSlot {
    #[must_use]
    pub fn level(&self) -> Option<&Level> {
        match self {
            LevelSlot::Present(level) => Some(level),
            LevelSlot::Absent | LevelSlot::Skipped(_) => None,
        }
    }
}

/// A decoded data set. Only quizzes can be added after loading.
#[derive(Debug)]
pub struct Archive {
    variant: VariantTag,
    head: MapHead,
    slots: Vec<LevelSlot>,
    resources: ResourceArchive,
    audio: Option<AudioArchive>,
    quizzes: Vec<Quiz>,
}

fn read(path: &Path) -> Result<Vec<u8>, Error> {
    fs::read(path).map_err(|e| Error::io(path, e))
}

fn read_audio(head: &Path, data: &Path) -> Result<(Vec<u8>, Vec<u8>), Error> {
    Ok((read(head)?, read(data)?))
}

impl Archive {
    /// Detects and loads the data set at `path`, which may be its directory
    /// or any of its files.
    pub fn load(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self, Error> {
        let path = path.as_ref();
        let detection = variant::detect(path, options.spear_mission);
        let variant = detection.variant();
        let paths = match detection.paths() {
            Some(paths) if variant != VariantTag::Unrecognized || options.allow_unrecognized => {
                paths
            }
            _ => {
                return Err(Error::UnrecognizedVariant {
                    path: path.to_path_buf(),
                });
            }
        };
        if variant == VariantTag::Unrecognized {
            log::warn!(
                "Loading unrecognized {} data set with Wolfenstein rules",
                detection.map_ext()
            );
        }

        let audio_paths = (&paths.audio_head, &paths.audio_data);
        let (audio_head, audio_data) = match (options.load_audio, audio_paths) {
            (true, (Some(head), Some(data))) => match read_audio(head, data) {
                Ok((head, data)) => (Some(head), Some(data)),
                Err(err) => {
                    log::warn!("Ignoring unreadable audio archive: {err}");
                    (None, None)
                }
            },
            (true, _) => {
                log::debug!("No {} audio files found", detection.audio_ext());
                (None, None)
            }
            (false, _) => (None, None),
        };
        let sources = ArchiveSources {
            map_head: read(&paths.map_head)?,
            game_maps: read(&paths.game_maps)?,
            vswap: read(&paths.vswap)?,
            audio_head,
            audio_data,
            length_prefix: options.length_prefix,
        };
        Self::from_sources(sources, variant)
    }

    /// Decodes a data set from in-memory file contents.
    pub fn from_sources(sources: ArchiveSources, variant: VariantTag) -> Result<Self, Error> {
        let head = MapHead::parse(&sources.map_head)?;
        let params = CodecParams {
            rlew_tag: head.rlew_tag(),
            prefix: sources.length_prefix,
        };

        let slots: Vec<LevelSlot> = head
            .pointers()
            .iter()
            .enumerate()
            .map(|(slot, pointer)| match *pointer {
                LevelPointer::Absent => LevelSlot::Absent,
                LevelPointer::Present(offset) => {
                    match Level::decode(slot, &sources.game_maps, offset, variant, params) {
                        Ok(level) => LevelSlot::Present(level),
                        Err(err) => {
                            log::warn!("Skipping level {slot}: {err}");
                            LevelSlot::Skipped(err)
                        }
                    }
                }
            })
            .collect();

        let present = slots.iter().filter(|s| s.level().is_some()).count();
        if let Some(expected) = variant.expected_levels() {
            if present != expected {
                log::debug!("{variant} normally has {expected} levels, found {present}");
            }
        }

        let resources = ResourceArchive::parse(sources.vswap)?;
        let audio = match (sources.audio_head, sources.audio_data) {
            (Some(head), Some(data)) => match AudioArchive::parse(&head, data, variant) {
                Ok(audio) => Some(audio),
                Err(err) => {
                    log::warn!("Ignoring unreadable audio archive: {err}");
                    None
                }
            },
            _ => None,
        };

        Ok(Archive {
            variant,
            head,
            slots,
            resources,
            audio,
            quizzes: Vec::new(),
        })
    }

    #[must_use]
    pub fn variant(&self) -> VariantTag {
        self.variant
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        self.variant.description()
    }

    #[must_use]
    pub fn rlew_tag(&self) -> u16 {
        self.head.rlew_tag()
    }

    #[must_use]
    pub fn slots(&self) -> &[LevelSlot] {
        &self.slots
    }

    #[must_use]
    pub fn level(&self, slot: usize) -> Option<&Level> {
        self.slots.get(slot)?.level()
    }

    pub fn levels(&self) -> impl Iterator<Item = &Level> {
        self.slots.iter().filter_map(LevelSlot::level)
    }

    /// Number of levels that decoded successfully.
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.levels().count()
    }

    /// Slots whose level failed to decode, with the reason.
    pub fn skipped(&self) -> impl Iterator<Item = (usize, &LevelError)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, s)| match s {
                LevelSlot::Skipped(err) => Some((slot, err)),
                _ => None,
            })
    }

    #[must_use]
    pub fn resources(&self) -> &ResourceArchive {
        &self.resources
    }

    #[must_use]
    pub fn audio(&self) -> Option<&AudioArchive> {
        self.audio.as_ref()
    }

    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.variant.sample_rate()
    }

    #[must_use]
    pub fn quizzes(&self) -> &[Quiz] {
        &self.quizzes
    }

    /// Parses quizzes from a language text resource, replacing any loaded
    /// before. Returns how many were found.
    pub fn load_quizzes(&mut self, text: &str) -> usize {
        self.quizzes = parse_quizzes(text);
        self.quizzes.len()
    }

    /// A copy that shares no buffers with `self`.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        Archive {
            variant: self.variant,
            head: self.head.clone(),
            slots: self
                .slots
                .iter()
                .map(|slot| match slot {
                    LevelSlot::Present(level) => LevelSlot::Present(level.deep_copy()),
                    other => other.clone(),
                })
                .collect(),
            resources: self.resources.deep_copy(),
            audio: self.audio.as_ref().map(AudioArchive::deep_copy),
            quizzes: self.quizzes.clone(),
        }
    }
}
