//! Identifying which game a set of data files belongs to.
//!
//! The games share one file layout and differ in file extension, level
//! count, audio layout and the meaning of plane codes. Detection looks at
//! the file names first and only falls back to reading the level data when
//! the extension is unknown.

use std::{
    ffi::OsStr,
    fmt,
    fs::{self, File},
    io::{self, Read as _},
    path::{Path, PathBuf},
};

use crate::{
    audio::AudioLayout,
    chunks::MalformedIndex,
    maps::{LEVEL_SIGNATURE, LevelHeader, MapHead},
    utils::mem_reader::{MemReader as _, Parse as _, SliceMemReader},
    vswap::{PageHeader, ResourceError},
};

/// The digitized sample rate shared by every game on this engine.
pub const SAMPLE_RATE: u32 = 7042;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantTag {
    /// Wolfenstein 3D, shareware episode.
    Wl1,
    /// Wolfenstein 3D, registered with all six episodes.
    Wl6,
    /// Spear of Destiny, or its first mission.
    Sod,
    /// Spear of Destiny mission 2: Return to Danger.
    Sd2,
    /// Spear of Destiny mission 3: Ultimate Challenge.
    Sd3,
    /// Super 3D Noah's Ark.
    N3d,
    Unrecognized,
}

/// Groups of variants that share classification tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Wolfenstein,
    Spear,
    NoahsArk,
}

impl VariantTag {
    pub const ALL_KNOWN: [VariantTag; 6] = [
        VariantTag::Wl1,
        VariantTag::Wl6,
        VariantTag::Sod,
        VariantTag::Sd2,
        VariantTag::Sd3,
        VariantTag::N3d,
    ];

    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL_KNOWN
            .into_iter()
            .find(|v| v.extension().is_some_and(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// The uppercase data file extension, e.g. `WL6`.
    #[must_use]
    pub fn extension(self) -> Option<&'static str> {
        match self {
            VariantTag::Wl1 => Some("WL1"),
            VariantTag::Wl6 => Some("WL6"),
            VariantTag::Sod => Some("SOD"),
            VariantTag::Sd2 => Some("SD2"),
            VariantTag::Sd3 => Some("SD3"),
            VariantTag::N3d => Some("N3D"),
            VariantTag::Unrecognized => None,
        }
    }

    /// The extension of the audio files. The Spear mission packs ship
    /// without their own audio and reuse the base game's.
    #[must_use]
    pub fn audio_extension(self) -> Option<&'static str> {
        match self {
            VariantTag::Sd2 | VariantTag::Sd3 => Some("SOD"),
            _ => self.extension(),
        }
    }

    /// Selects the mission pack for a Spear archive. Other variants are
    /// returned unchanged.
    #[must_use]
    pub fn with_mission(self, spear_mission: u8) -> Self {
        match (self, spear_mission) {
            (VariantTag::Sod | VariantTag::Sd2 | VariantTag::Sd3, 2) => VariantTag::Sd2,
            (VariantTag::Sod | VariantTag::Sd2 | VariantTag::Sd3, 3) => VariantTag::Sd3,
            _ => self,
        }
    }

    #[must_use]
    pub fn family(self) -> Family {
        match self {
            VariantTag::Sod | VariantTag::Sd2 | VariantTag::Sd3 => Family::Spear,
            VariantTag::N3d => Family::NoahsArk,
            // Unknown archives are most likely Wolfenstein mods.
            VariantTag::Wl1 | VariantTag::Wl6 | VariantTag::Unrecognized => Family::Wolfenstein,
        }
    }

    #[must_use]
    pub fn is_spear(self) -> bool {
        self.family() == Family::Spear
    }

    #[must_use]
    pub fn level_signature(self) -> [u8; 4] {
        LEVEL_SIGNATURE
    }

    /// Number of level slots the retail data populates.
    #[must_use]
    pub fn expected_levels(self) -> Option<usize> {
        match self {
            VariantTag::Wl1 => Some(10),
            VariantTag::Wl6 => Some(60),
            VariantTag::Sod | VariantTag::Sd2 | VariantTag::Sd3 => Some(21),
            VariantTag::N3d => Some(30),
            VariantTag::Unrecognized => None,
        }
    }

    #[must_use]
    pub fn audio_layout(self) -> AudioLayout {
        match self.family() {
            Family::Wolfenstein => AudioLayout::WOLFENSTEIN,
            Family::Spear => AudioLayout::SPEAR,
            Family::NoahsArk => AudioLayout::MUSIC_ONLY,
        }
    }

    #[must_use]
    pub fn sample_rate(self) -> u32 {
        SAMPLE_RATE
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            VariantTag::Wl1 => "Wolfenstein 3D Shareware",
            VariantTag::Wl6 => "Wolfenstein 3D",
            VariantTag::Sod => "Spear of Destiny",
            VariantTag::Sd2 => "Spear of Destiny Mission 2: Return to Danger",
            VariantTag::Sd3 => "Spear of Destiny Mission 3: Ultimate Challenge",
            VariantTag::N3d => "Super 3D Noah's Ark",
            VariantTag::Unrecognized => "Unrecognized archive",
        }
    }

    /// Where a level slot sits in the game's episode structure.
    #[must_use]
    pub fn level_description(self, slot: usize) -> String {
        match self.family() {
            Family::Wolfenstein if self != VariantTag::Unrecognized => {
                let episode = slot / 10 + 1;
                match slot % 10 {
                    8 => format!("Episode {episode} Boss"),
                    9 => format!("Episode {episode} Secret Floor"),
                    floor => format!("Episode {episode} Floor {}", floor + 1),
                }
            }
            Family::Spear => match slot {
                18 => "Secret Floor 1".to_string(),
                19 => "Secret Floor 2".to_string(),
                20 => "Final Floor".to_string(),
                floor => format!("Floor {}", floor + 1),
            },
            _ => format!("Level {}", slot + 1),
        }
    }
}

impl fmt::Display for VariantTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// The files making up one data set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePaths {
    pub map_head: PathBuf,
    pub game_maps: PathBuf,
    pub vswap: PathBuf,
    pub audio_head: Option<PathBuf>,
    pub audio_data: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    variant: VariantTag,
    map_ext: String,
    audio_ext: String,
    paths: Option<ArchivePaths>,
}

impl Detection {
    fn unrecognized() -> Self {
        Detection {
            variant: VariantTag::Unrecognized,
            map_ext: String::new(),
            audio_ext: String::new(),
            paths: None,
        }
    }

    #[must_use]
    pub fn variant(&self) -> VariantTag {
        self.variant
    }

    /// Extension of the map and page files, as found on disk.
    #[must_use]
    pub fn map_ext(&self) -> &str {
        &self.map_ext
    }

    #[must_use]
    pub fn audio_ext(&self) -> &str {
        &self.audio_ext
    }

    /// The located files, if a consistent set was found. An unrecognized
    /// archive may still have paths when its extension was unknown.
    #[must_use]
    pub fn paths(&self) -> Option<&ArchivePaths> {
        self.paths.as_ref()
    }
}

/// Finds `stem.ext` in `dir`, trying the casings the games shipped with.
fn find_file(dir: &Path, stem: &str, ext: &str) -> Option<PathBuf> {
    let stems = [stem.to_ascii_uppercase(), stem.to_ascii_lowercase()];
    let exts = [ext.to_ascii_uppercase(), ext.to_ascii_lowercase()];
    stems
        .iter()
        .flat_map(|s| exts.iter().map(move |e| dir.join(format!("{s}.{e}"))))
        .find(|p| p.is_file())
}

fn locate(dir: &Path, map_ext: &str, audio_ext: &str) -> Option<ArchivePaths> {
    let audio_head = find_file(dir, "AUDIOHED", audio_ext);
    let audio_data = find_file(dir, "AUDIOT", audio_ext);
    Some(ArchivePaths {
        map_head: find_file(dir, "MAPHEAD", map_ext)?,
        game_maps: find_file(dir, "GAMEMAPS", map_ext)?,
        vswap: find_file(dir, "VSWAP", map_ext)?,
        audio_head,
        audio_data,
    })
}

/// Why a set of files with matching names was not taken as a data set.
#[derive(Debug, thiserror::Error)]
enum ConsistencyError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Index(#[from] MalformedIndex),
    #[error(transparent)]
    Pages(#[from] ResourceError),
    #[error("No level pointer falls inside the map file")]
    NoLevelInMaps,
}

/// Checks that the head index points into the map file and that the page
/// file header describes a table that fits the file. Only the page file's
/// header is read.
fn check_consistency(paths: &ArchivePaths) -> Result<(), ConsistencyError> {
    let map_head = fs::read(&paths.map_head)?;
    let game_maps_len = fs::metadata(&paths.game_maps)?.len();
    let head = MapHead::parse(&map_head)?;
    if !head
        .present_offsets()
        .any(|offset| u64::from(offset) < game_maps_len)
    {
        return Err(ConsistencyError::NoLevelInMaps);
    }

    let mut vswap = File::open(&paths.vswap)?;
    let vswap_len = usize::try_from(vswap.metadata()?.len()).unwrap_or(usize::MAX);
    let mut header = [0u8; PageHeader::SIZE];
    vswap.read_exact(&mut header)?;
    let header = PageHeader::parse(&mut SliceMemReader::with_context(&header, "VSWAP header"))
        .map_err(MalformedIndex::from)?;
    header.validate(vswap_len)?;
    Ok(())
}

/// Decides the variant of an archive with an unknown extension from its
/// first level's signature and its populated level count.
#[must_use]
pub fn identify(map_head: &[u8], game_maps: &[u8], spear_mission: u8) -> VariantTag {
    let Ok(head) = MapHead::parse(map_head) else {
        return VariantTag::Unrecognized;
    };
    let Some(first) = head.present_offsets().next() else {
        return VariantTag::Unrecognized;
    };
    let mut reader = SliceMemReader::with_context(game_maps, "GAMEMAPS");
    let header = reader
        .seek_to(first as usize)
        .and_then(|()| LevelHeader::parse(&mut reader));
    match header {
        Ok(header) if header.signature() == LEVEL_SIGNATURE => {}
        _ => return VariantTag::Unrecognized,
    }

    let count = head.present_offsets().count();
    VariantTag::ALL_KNOWN
        .into_iter()
        .filter(|v| !matches!(v, VariantTag::Sd2 | VariantTag::Sd3))
        .find(|v| v.expected_levels() == Some(count))
        .map_or(VariantTag::Unrecognized, |v| v.with_mission(spear_mission))
}

fn candidate_extensions(given: Option<String>, spear_mission: u8) -> Vec<String> {
    if let Some(ext) = given {
        return vec![ext];
    }
    let mut exts = Vec::new();
    if let mission @ (2 | 3) = spear_mission {
        exts.push(format!("SD{mission}"));
    }
    exts.extend(
        [VariantTag::Wl6, VariantTag::Wl1, VariantTag::Sod, VariantTag::N3d]
            .into_iter()
            .filter_map(VariantTag::extension)
            .map(str::to_string),
    );
    exts
}

/// Works out which variant the data set at `path` is.
///
/// `path` may be the data directory or any file in it. A failure to find a
/// consistent set of files is reported as [`VariantTag::Unrecognized`], not
/// as an error.
#[must_use]
pub fn detect(path: &Path, spear_mission: u8) -> Detection {
    let (dir, given_ext) = if path.is_dir() {
        (path.to_path_buf(), None)
    } else {
        let dir = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let ext = path
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_uppercase);
        (dir, ext)
    };

    for ext in candidate_extensions(given_ext, spear_mission) {
        let known = VariantTag::from_extension(&ext).map(|v| v.with_mission(spear_mission));
        let map_ext = known
            .and_then(VariantTag::extension)
            .map_or_else(|| ext.clone(), str::to_string);
        let audio_ext = known
            .and_then(VariantTag::audio_extension)
            .map_or_else(|| ext.clone(), str::to_string);

        let Some(paths) = locate(&dir, &map_ext, &audio_ext) else {
            log::debug!("No {map_ext} data files in {}", dir.display());
            continue;
        };
        if let Err(reason) = check_consistency(&paths) {
            log::debug!("Rejecting {map_ext} data files: {reason}");
            continue;
        }

        let variant = match known {
            Some(variant) => variant,
            None => {
                let map_head = fs::read(&paths.map_head).unwrap_or_default();
                let game_maps = fs::read(&paths.game_maps).unwrap_or_default();
                identify(&map_head, &game_maps, spear_mission)
            }
        };
        log::debug!("Detected {variant} from {map_ext} files");
        return Detection {
            variant,
            map_ext,
            audio_ext,
            paths: Some(paths),
        };
    }

    Detection::unrecognized()
}
