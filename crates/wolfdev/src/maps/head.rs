use crate::{
    chunks::MalformedIndex,
    utils::mem_reader::{MemReader as _, SliceMemReader},
};

/// Number of level slots a head index can describe.
pub const MAX_LEVELS: usize = 100;

const MIN_HEAD_LEN: usize = 2 + 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelPointer {
    Absent,
    /// Byte offset of the level header in `GAMEMAPS`.
    Present(u32),
}

impl LevelPointer {
    fn from_raw(raw: i32) -> Self {
        match u32::try_from(raw) {
            Ok(offset) if offset > 0 => LevelPointer::Present(offset),
            _ => LevelPointer::Absent,
        }
    }

    #[must_use]
    pub fn offset(self) -> Option<u32> {
        match self {
            LevelPointer::Absent => None,
            LevelPointer::Present(offset) => Some(offset),
        }
    }
}

/// The head index: the RLEW tag for this archive and one pointer per level
/// slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapHead {
    rlew_tag: u16,
    pointers: Vec<LevelPointer>,
}

impl MapHead {
    /// Parses a head index. Files shorter than the full 100 slots yield fewer
    /// slots; bytes past the last slot (tile info in some releases) are
    /// ignored.
    pub fn parse(data: &[u8]) -> Result<Self, MalformedIndex> {
        if data.len() < MIN_HEAD_LEN {
            return Err(MalformedIndex::TooShort {
                what: "map head",
                required: MIN_HEAD_LEN,
                len: data.len(),
            });
        }
        let mut reader = SliceMemReader::with_context(data, "MAPHEAD");
        let rlew_tag = reader.read_u16_le()?;
        let count = (reader.remaining() / 4).min(MAX_LEVELS);
        let pointers = (0..count)
            .map(|_| reader.read_i32_le().map(LevelPointer::from_raw))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MapHead { rlew_tag, pointers })
    }

    #[must_use]
    pub fn rlew_tag(&self) -> u16 {
        self.rlew_tag
    }

    #[must_use]
    pub fn pointers(&self) -> &[LevelPointer] {
        &self.pointers
    }

    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.pointers.len()
    }

    #[must_use]
    pub fn pointer(&self, slot: usize) -> Option<LevelPointer> {
        self.pointers.get(slot).copied()
    }

    pub fn present_offsets(&self) -> impl Iterator<Item = u32> + '_ {
        self.pointers.iter().filter_map(|p| p.offset())
    }
}
