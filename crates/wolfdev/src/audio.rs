//! The audio archive: `AUDIOHED` offsets into `AUDIOT`.
//!
//! Chunks come in fixed groups. For a game with `n` sound effects the first
//! `n` chunks are PC speaker versions, the next `n` AdLib versions and the
//! next `n` placeholders for the digitized versions (those live in the page
//! file). Everything after that is music.

use std::borrow::Cow;

use bytes::Bytes;

use crate::{
    chunks::{ChunkTable, MalformedIndex, OffsetWidth, TableEnd, read_offsets},
    utils::mem_reader::SliceMemReader,
    variant::VariantTag,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioLayout {
    pub sounds: usize,
    pub music: usize,
}

impl AudioLayout {
    pub const WOLFENSTEIN: AudioLayout = AudioLayout {
        sounds: 87,
        music: 27,
    };
    pub const SPEAR: AudioLayout = AudioLayout {
        sounds: 81,
        music: 24,
    };
    /// Every chunk is treated as music.
    pub const MUSIC_ONLY: AudioLayout = AudioLayout {
        sounds: 0,
        music: 0,
    };

    #[must_use]
    pub fn expected_chunks(self) -> usize {
        self.sounds * 3 + self.music
    }

    /// The category of chunk `index`, and its number within that category.
    #[must_use]
    pub fn category(self, index: usize) -> (AudioCategory, usize) {
        let n = self.sounds;
        match index {
            i if i < n => (AudioCategory::PcSpeaker, i),
            i if i < 2 * n => (AudioCategory::AdLib, i - n),
            i if i < 3 * n => (AudioCategory::Digitized, i - 2 * n),
            i => (AudioCategory::Music, i - 3 * n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCategory {
    PcSpeaker,
    AdLib,
    /// A placeholder; the samples are in the page file.
    Digitized,
    Music,
}

const WOLFENSTEIN_MUSIC: [&str; 27] = [
    "CORNER", "DUNGEON", "WARMARCH", "GETTHEM", "HEADACHE", "HITLWLTZ", "INTROCW3", "NAZI_NOR",
    "NAZI_OMI", "POW", "SALUTE", "SEARCHN", "SUSPENSE", "VICTORS", "WONDERIN", "FUNKYOU",
    "ENDLEVEL", "GOINGAFT", "PREGNANT", "ULTIMATE", "NAZI_RAP", "ZEROHOUR", "TWELFTH", "ROSTER",
    "URAHERO", "VICMARCH", "PACMAN",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    index: usize,
    category: AudioCategory,
    number: usize,
    name: Cow<'static, str>,
    data: Bytes,
}

impl AudioChunk {
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn category(&self) -> AudioCategory {
        self.category
    }

    /// Position within the chunk's category.
    #[must_use]
    pub fn number(&self) -> usize {
        self.number
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

#[derive(Debug, Clone)]
pub struct AudioArchive {
    variant: VariantTag,
    layout: AudioLayout,
    data: Bytes,
    table: ChunkTable,
}

impl AudioArchive {
    pub fn parse(
        head: &[u8],
        data: impl Into<Bytes>,
        variant: VariantTag,
    ) -> Result<Self, MalformedIndex> {
        let data = data.into();
        let mut reader = SliceMemReader::with_context(head, "AUDIOHED");
        let offsets = read_offsets(&mut reader, head.len() / 4, OffsetWidth::U32)?;
        let table = ChunkTable::from_offsets(
            &offsets,
            TableEnd::Terminal {
                buffer_len: data.len(),
            },
        )?;

        let layout = variant.audio_layout();
        if layout.expected_chunks() > table.len() {
            log::warn!(
                "Audio archive has {} chunks, fewer than the {} its layout expects",
                table.len(),
                layout.expected_chunks()
            );
        }
        Ok(AudioArchive {
            variant,
            layout,
            data,
            table,
        })
    }

    #[must_use]
    pub fn layout(&self) -> AudioLayout {
        self.layout
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    fn name(&self, category: AudioCategory, number: usize) -> Cow<'static, str> {
        match category {
            AudioCategory::PcSpeaker => format!("PC speaker sound {number}").into(),
            AudioCategory::AdLib => format!("AdLib sound {number}").into(),
            AudioCategory::Digitized => format!("Digitized sound {number}").into(),
            AudioCategory::Music => match self.variant {
                VariantTag::Wl1 | VariantTag::Wl6 => WOLFENSTEIN_MUSIC
                    .get(number)
                    .map_or_else(|| format!("Music {number}").into(), |&n| n.into()),
                _ => format!("Music {number}").into(),
            },
        }
    }

    #[must_use]
    pub fn chunk(&self, index: usize) -> Option<AudioChunk> {
        let chunk = self.table.get(index)?;
        let (category, number) = self.layout.category(index);
        Some(AudioChunk {
            index,
            category,
            number,
            name: self.name(category, number),
            data: self.data.slice(chunk.range()),
        })
    }

    pub fn chunks(&self) -> impl Iterator<Item = AudioChunk> + '_ {
        (0..self.len()).filter_map(|i| self.chunk(i))
    }

    pub fn category(&self, category: AudioCategory) -> impl Iterator<Item = AudioChunk> + '_ {
        self.chunks().filter(move |c| c.category == category)
    }

    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.variant.sample_rate()
    }

    #[must_use]
    pub fn deep_copy(&self) -> Self {
        AudioArchive {
            variant: self.variant,
            layout: self.layout,
            data: Bytes::copy_from_slice(&self.data),
            table: self.table.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head(offsets: &[u32]) -> Vec<u8> {
        offsets.iter().flat_map(|o| o.to_le_bytes()).collect()
    }

    #[test]
    fn groups_follow_layout() {
        let layout = AudioLayout::WOLFENSTEIN;
        assert_eq!(layout.category(0), (AudioCategory::PcSpeaker, 0));
        assert_eq!(layout.category(87), (AudioCategory::AdLib, 0));
        assert_eq!(layout.category(200), (AudioCategory::Digitized, 26));
        assert_eq!(layout.category(261), (AudioCategory::Music, 0));
        assert_eq!(layout.expected_chunks(), 288);
        assert_eq!(AudioLayout::SPEAR.category(243), (AudioCategory::Music, 0));
    }

    #[test]
    fn terminal_offset_ends_last_chunk() {
        let data = vec![0u8; 40];
        let archive =
            AudioArchive::parse(&head(&[0, 10, 10, 30]), data, VariantTag::N3d).unwrap();
        assert_eq!(archive.len(), 3);
        let chunks: Vec<_> = archive.chunks().map(|c| c.data().len()).collect();
        assert_eq!(chunks, [10, 0, 20]);
        assert!(archive.chunks().all(|c| c.category() == AudioCategory::Music));
        assert_eq!(archive.sample_rate(), 7042);
    }

    #[test]
    fn wolfenstein_music_is_named() {
        let mut offsets: Vec<u32> = (0..=262).collect();
        offsets.push(262);
        let archive = AudioArchive::parse(&head(&offsets), vec![0u8; 262], VariantTag::Wl6).unwrap();
        assert_eq!(archive.chunk(261).unwrap().name(), "CORNER");
        assert_eq!(archive.chunk(0).unwrap().name(), "PC speaker sound 0");
        assert_eq!(archive.category(AudioCategory::Music).count(), 2);
    }

    #[test]
    fn offsets_past_data_are_malformed() {
        assert!(matches!(
            AudioArchive::parse(&head(&[0, 50]), vec![0u8; 10], VariantTag::Sod),
            Err(MalformedIndex::OutOfBounds { .. })
        ));
        assert_eq!(
            AudioArchive::parse(&[], Vec::new(), VariantTag::Sod).unwrap_err(),
            MalformedIndex::MissingTerminal
        );
    }
}
