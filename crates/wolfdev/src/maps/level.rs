use std::{ops::Range, sync::OnceLock};

use crate::{
    classify::{Category, Classifier, Entity, PlaneKind, Tile, Wall},
    compression::{CodecParams, DecompressionError, decompress_plane},
    errors::ErrorKind,
    utils::mem_reader::{self, MemReader, Parse, SliceMemReader},
    variant::VariantTag,
};

pub const NUM_PLANES: usize = 3;
pub const LEVEL_HEADER_SIZE: usize = 42;
pub const LEVEL_SIGNATURE: [u8; 4] = *b"!ID!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelHeader {
    plane_offsets: [u32; NUM_PLANES],
    plane_lengths: [u16; NUM_PLANES],
    width: u16,
    height: u16,
    name: [u8; 16],
    signature: [u8; 4],
}

impl Parse for LevelHeader {
    fn parse<M: MemReader>(reader: &mut M) -> mem_reader::Result<Self> {
        let mut plane_offsets = [0u32; NUM_PLANES];
        for offset in &mut plane_offsets {
            *offset = reader.read_u32_le()?;
        }
        let mut plane_lengths = [0u16; NUM_PLANES];
        for len in &mut plane_lengths {
            *len = reader.read_u16_le()?;
        }
        let width = reader.read_u16_le()?;
        let height = reader.read_u16_le()?;
        let name = reader.read_value("name")?;
        let signature = reader.read_value("signature")?;
        Ok(LevelHeader {
            plane_offsets,
            plane_lengths,
            width,
            height,
            name,
            signature,
        })
    }
}

impl LevelHeader {
    /// The level name, up to the first NUL.
    #[must_use]
    pub fn name(&self) -> String {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(self.name.len());
        String::from_utf8_lossy(&self.name[..end]).into_owned()
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    #[must_use]
    pub fn signature(&self) -> [u8; 4] {
        self.signature
    }

    /// Byte range of a plane's compressed data within the map file.
    #[must_use]
    pub fn plane_range(&self, plane: PlaneKind) -> Range<usize> {
        let start = self.plane_offsets[plane.index()] as usize;
        start..start + usize::from(self.plane_lengths[plane.index()])
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum LevelError {
    #[error("Unreadable level header: {0}")]
    Header(#[from] mem_reader::MemReaderError),
    #[error("Invalid level signature {found:?}, expected {expected:?}")]
    InvalidLevelSignature { found: [u8; 4], expected: [u8; 4] },
    #[error("{plane:?} plane data {range:?} lies outside the map file of {file_len} bytes")]
    PlaneOutOfBounds {
        plane: PlaneKind,
        range: Range<usize>,
        file_len: usize,
    },
    #[error("{plane:?} plane: {source}")]
    Plane {
        plane: PlaneKind,
        #[source]
        source: DecompressionError,
    },
}

impl LevelError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            LevelError::Header(_) | LevelError::PlaneOutOfBounds { .. } => {
                ErrorKind::MalformedIndex
            }
            LevelError::InvalidLevelSignature { .. } => ErrorKind::InvalidLevelSignature,
            LevelError::Plane { source, .. } => source.into(),
        }
    }
}

/// One decompressed plane, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Plane {
    codes: Vec<u16>,
}

impl Plane {
    #[must_use]
    pub fn codes(&self) -> &[u16] {
        &self.codes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// True when the archive stored no data for this plane.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<u16> {
        self.codes.get(index).copied()
    }
}

#[derive(Debug, Clone)]
pub struct Level {
    slot: usize,
    variant: VariantTag,
    header: LevelHeader,
    planes: [Plane; NUM_PLANES],
    has_player_spawn: bool,
    description: OnceLock<String>,
}

impl Level {
    /// Decodes the level whose header starts at `offset` in the map file.
    pub(crate) fn decode(
        slot: usize,
        game_maps: &[u8],
        offset: u32,
        variant: VariantTag,
        params: CodecParams,
    ) -> Result<Self, LevelError> {
        let mut reader = SliceMemReader::with_context(game_maps, format!("level {slot}"));
        reader.seek_to(offset as usize)?;
        let header = LevelHeader::parse(&mut reader)?;
        let expected = variant.level_signature();
        if header.signature != expected {
            return Err(LevelError::InvalidLevelSignature {
                found: header.signature,
                expected,
            });
        }

        let mut planes: [Plane; NUM_PLANES] = Default::default();
        for (kind, plane) in PlaneKind::ALL.into_iter().zip(&mut planes) {
            let range = header.plane_range(kind);
            if range.is_empty() {
                continue;
            }
            let data = game_maps
                .get(range.clone())
                .ok_or_else(|| LevelError::PlaneOutOfBounds {
                    plane: kind,
                    range: range.clone(),
                    file_len: game_maps.len(),
                })?;
            plane.codes = decompress_plane(data, params, header.cell_count())
                .map_err(|source| LevelError::Plane {
                    plane: kind,
                    source,
                })?;
        }

        let classifier = Classifier::new(variant);
        let has_player_spawn = planes[PlaneKind::Objects.index()]
            .codes
            .iter()
            .any(|&code| classifier.entity(code).is_player_spawn());

        Ok(Level {
            slot,
            variant,
            header,
            planes,
            has_player_spawn,
            description: OnceLock::new(),
        })
    }

    #[must_use]
    pub fn slot(&self) -> usize {
        self.slot
    }

    #[must_use]
    pub fn variant(&self) -> VariantTag {
        self.variant
    }

    #[must_use]
    pub fn header(&self) -> &LevelHeader {
        &self.header
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.header.name()
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.header.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.header.height
    }

    #[must_use]
    pub fn planes(&self) -> &[Plane; NUM_PLANES] {
        &self.planes
    }

    #[must_use]
    pub fn plane(&self, kind: PlaneKind) -> &Plane {
        &self.planes[kind.index()]
    }

    #[must_use]
    pub fn has_player_spawn(&self) -> bool {
        self.has_player_spawn
    }

    /// Where this level sits in its game, e.g. "Episode 1 Floor 3".
    #[must_use]
    pub fn description(&self) -> &str {
        self.description
            .get_or_init(|| self.variant.level_description(self.slot))
    }

    /// The raw code at `(x, y)`, or `None` when the cell is outside the level
    /// or the plane is empty.
    #[must_use]
    pub fn code(&self, plane: PlaneKind, x: usize, y: usize) -> Option<u16> {
        let width = usize::from(self.header.width);
        if x >= width || y >= usize::from(self.header.height) {
            return None;
        }
        self.plane(plane).get(y * width + x)
    }

    #[must_use]
    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.variant)
    }

    #[must_use]
    pub fn category(&self, plane: PlaneKind, x: usize, y: usize) -> Option<Category> {
        let code = self.code(plane, x, y)?;
        Some(self.classifier().classify(plane, code))
    }

    #[must_use]
    pub fn tile(&self, x: usize, y: usize) -> Option<Tile> {
        let code = self.code(PlaneKind::Geometry, x, y)?;
        Some(self.classifier().tile(code))
    }

    #[must_use]
    pub fn wall(&self, x: usize, y: usize) -> Option<Wall> {
        let code = self.code(PlaneKind::Geometry, x, y)?;
        Some(self.classifier().wall(code))
    }

    #[must_use]
    pub fn entity(&self, x: usize, y: usize) -> Option<Entity> {
        let code = self.code(PlaneKind::Objects, x, y)?;
        Some(self.classifier().entity(code))
    }

    /// A copy of this level with every buffer freshly allocated.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        Level {
            slot: self.slot,
            variant: self.variant,
            header: self.header.clone(),
            planes: self.planes.clone(),
            has_player_spawn: self.has_player_spawn,
            description: self.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use datalit::datalit;

    use super::*;
    use crate::{
        classify::Direction,
        compression::LengthPrefix,
        utils::testing::{TestLevel, level_record},
    };

    const PARAMS: CodecParams = CodecParams {
        rlew_tag: 0xABCD,
        prefix: LengthPrefix::Word,
    };

    fn decode_at(record: &[u8], variant: VariantTag) -> Result<Level, LevelError> {
        let mut maps = vec![0u8; 8];
        maps.extend_from_slice(record);
        Level::decode(0, &maps, 8, variant, PARAMS)
    }

    #[test]
    fn parses_header_fields() {
        let data = datalit!(
            38u32_le, 100u32_le, 0u32_le,
            62u16_le, 40u16_le, 0u16_le,
            64u16_le, 64u16_le,
            b"Wolf1 Map1\0\0\0\0\0\0",
            b"!ID!",
        )
        .to_vec();
        let header = LevelHeader::parse(&mut SliceMemReader::new(&data)).unwrap();
        assert_eq!(header.name(), "Wolf1 Map1");
        assert_eq!(header.cell_count(), 4096);
        assert_eq!(header.plane_range(PlaneKind::Geometry), 38..100);
        assert_eq!(header.plane_range(PlaneKind::Extra), 0..0);
        assert_eq!(header.signature(), LEVEL_SIGNATURE);
    }

    #[test]
    fn decodes_planes_to_full_size() {
        let level = TestLevel::new("Test", 8, 4).with_object(2, 1, 20);
        let record = level_record(8, &level, PARAMS);
        let decoded = decode_at(&record, VariantTag::Wl6).unwrap();
        assert_eq!(decoded.name(), "Test");
        assert_eq!(decoded.plane(PlaneKind::Geometry).len(), 32);
        assert_eq!(decoded.plane(PlaneKind::Objects).codes(), level.planes[1]);
        assert!(decoded.plane(PlaneKind::Extra).is_empty());
        assert!(decoded.has_player_spawn());
        assert_eq!(decoded.entity(2, 1), Some(Entity::PlayerSpawn(Direction::East)));
        assert_eq!(decoded.code(PlaneKind::Objects, 2, 1), Some(20));
    }

    #[test]
    fn out_of_range_cells_have_no_code() {
        let record = level_record(8, &TestLevel::new("Test", 8, 4), PARAMS);
        let decoded = decode_at(&record, VariantTag::Wl6).unwrap();
        assert_eq!(decoded.code(PlaneKind::Geometry, 8, 0), None);
        assert_eq!(decoded.code(PlaneKind::Geometry, 0, 4), None);
        assert_eq!(decoded.code(PlaneKind::Extra, 0, 0), None);
        assert_eq!(decoded.tile(7, 3), Some(Tile::Wall));
        assert!(!decoded.has_player_spawn());
    }

    #[test]
    fn bad_signature_is_rejected() {
        let mut record = level_record(8, &TestLevel::new("Test", 2, 2), PARAMS);
        record[38..42].copy_from_slice(b"!XX!");
        let err = decode_at(&record, VariantTag::Wl6).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidLevelSignature);
    }

    #[test]
    fn truncated_plane_fails_the_level() {
        let record = level_record(8, &TestLevel::new("Test", 16, 16), PARAMS);
        let mut maps = vec![0u8; 8];
        maps.extend_from_slice(&record);
        maps.truncate(maps.len() - 3);
        let err = Level::decode(0, &maps, 8, VariantTag::Wl6, PARAMS).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedIndex);

        // Same data, but with the object plane shortened so it stays in bounds.
        let mut record = record;
        let len = u16::from_le_bytes([record[14], record[15]]);
        record[14..16].copy_from_slice(&(len - 3).to_le_bytes());
        let err = decode_at(&record, VariantTag::Wl6).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedStream);
    }

    #[test]
    fn decoding_twice_gives_identical_planes() {
        let record = level_record(8, &TestLevel::new("Test", 8, 8).with_object(0, 0, 98), PARAMS);
        let first = decode_at(&record, VariantTag::Sod).unwrap();
        let second = decode_at(&record, VariantTag::Sod).unwrap();
        assert_eq!(first.planes(), second.planes());
        assert_eq!(first.header(), second.header());
        assert_eq!(first.description(), "Floor 1");
        assert_eq!(first.deep_copy().planes(), first.planes());
    }
}
