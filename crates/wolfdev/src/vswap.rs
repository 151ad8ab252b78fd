//! The page file (`VSWAP`): wall textures, sprites and digitized sounds.
//!
//! The header gives the page count and where the sprite and sound groups
//! start, followed by one offset and one length per page. The last sound
//! page is not a sound; it lists which pages make up each digitized sound.

use bytes::Bytes;
use itertools::Itertools as _;

use crate::{
    chunks::{ChunkTable, MalformedIndex, OffsetWidth, TableEnd, read_offsets},
    errors::ErrorKind,
    utils::mem_reader::{self, MemReader, Parse, SliceMemReader},
};

/// Wall textures and sprites are 64 pixels square.
pub const TEXTURE_SIZE: usize = 64;
pub const WALL_BYTES: usize = TEXTURE_SIZE * TEXTURE_SIZE;
/// Palette index used for pixels no sprite post covers.
pub const TRANSPARENT: u8 = 0xFF;

const HEADER_SIZE: usize = 6;

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error(transparent)]
    MalformedIndex(#[from] MalformedIndex),
    #[error(
        "Chunk index out of range: sprites start at {sprite_start} and sounds at {sound_start} of {chunk_count} chunks"
    )]
    ChunkIndexOutOfRange {
        chunk_count: u16,
        sprite_start: u16,
        sound_start: u16,
    },
    #[error("Sprite {index} spans columns {left}..={right}")]
    InvalidSprite { index: usize, left: u16, right: u16 },
    #[error("Chunk {index}: {source}")]
    MalformedChunk {
        index: usize,
        #[source]
        source: mem_reader::MemReaderError,
    },
}

impl ResourceError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResourceError::ChunkIndexOutOfRange { .. } => ErrorKind::ChunkIndexOutOfRange,
            ResourceError::MalformedIndex(_)
            | ResourceError::InvalidSprite { .. }
            | ResourceError::MalformedChunk { .. } => ErrorKind::MalformedIndex,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageHeader {
    chunk_count: u16,
    sprite_start: u16,
    sound_start: u16,
}

impl Parse for PageHeader {
    fn parse<M: MemReader>(reader: &mut M) -> mem_reader::Result<Self> {
        Ok(PageHeader {
            chunk_count: reader.read_u16_le()?,
            sprite_start: reader.read_u16_le()?,
            sound_start: reader.read_u16_le()?,
        })
    }
}

impl PageHeader {
    /// Bytes taken by the three counts ahead of the page tables.
    pub const SIZE: usize = HEADER_SIZE;

    #[must_use]
    pub fn chunk_count(&self) -> usize {
        usize::from(self.chunk_count)
    }

    #[must_use]
    pub fn sprite_start(&self) -> usize {
        usize::from(self.sprite_start)
    }

    #[must_use]
    pub fn sound_start(&self) -> usize {
        usize::from(self.sound_start)
    }

    /// Where the offset and length tables end.
    #[must_use]
    pub fn table_end(&self) -> usize {
        HEADER_SIZE + self.chunk_count() * 6
    }

    /// Checks that the group starts are ordered and the tables fit in a file
    /// of `file_len` bytes.
    pub fn validate(&self, file_len: usize) -> Result<(), ResourceError> {
        if self.sprite_start > self.sound_start || self.sound_start > self.chunk_count {
            return Err(ResourceError::ChunkIndexOutOfRange {
                chunk_count: self.chunk_count,
                sprite_start: self.sprite_start,
                sound_start: self.sound_start,
            });
        }
        if self.table_end() > file_len {
            return Err(MalformedIndex::TooShort {
                what: "page table",
                required: self.table_end(),
                len: file_len,
            }
            .into());
        }
        Ok(())
    }
}

/// Bounds of a sprite's drawn pixels. Columns are inclusive; rows run from
/// `top` up to but excluding `bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteInfo {
    pub left: u16,
    pub right: u16,
    pub top: u16,
    pub bottom: u16,
}

impl SpriteInfo {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.top >= self.bottom
    }
}

/// One vertical run of pixels in a sprite column.
#[derive(Debug, Clone, Copy)]
struct Post {
    start_y: u16,
    end_y: u16,
    /// Added to a row number to find that row's pixel in the sprite data.
    source: u16,
}

#[derive(Debug, Clone)]
pub struct Sprite {
    index: usize,
    data: Bytes,
}

impl Sprite {
    fn error(&self, source: mem_reader::MemReaderError) -> ResourceError {
        ResourceError::MalformedChunk {
            index: self.index,
            source,
        }
    }

    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    fn columns(&self) -> Result<(u16, u16, Vec<Vec<Post>>), ResourceError> {
        let mut reader = SliceMemReader::with_context(&self.data, "sprite");
        let left = reader.read_u16_le().map_err(|e| self.error(e))?;
        let right = reader.read_u16_le().map_err(|e| self.error(e))?;
        if left > right || usize::from(right) >= TEXTURE_SIZE {
            return Err(ResourceError::InvalidSprite {
                index: self.index,
                left,
                right,
            });
        }
        let offsets = read_offsets(&mut reader, usize::from(right - left) + 1, OffsetWidth::U16)
            .map_err(|e| self.error(e))?;

        let mut columns = Vec::with_capacity(offsets.len());
        for offset in offsets {
            reader.seek_to(offset).map_err(|e| self.error(e))?;
            let mut posts = Vec::new();
            loop {
                let end_y = reader.read_u16_le().map_err(|e| self.error(e))? / 2;
                if end_y == 0 {
                    break;
                }
                let source = reader.read_u16_le().map_err(|e| self.error(e))?;
                let start_y = reader.read_u16_le().map_err(|e| self.error(e))? / 2;
                posts.push(Post {
                    start_y,
                    end_y: end_y.min(TEXTURE_SIZE as u16),
                    source,
                });
            }
            columns.push(posts);
        }
        Ok((left, right, columns))
    }

    /// Recovers the sprite's bounds from its posts. A sprite that draws
    /// nothing keeps the column range from its header.
    pub fn info(&self) -> Result<SpriteInfo, ResourceError> {
        let (left, right, columns) = self.columns()?;
        let (left, right) = (left..=right)
            .zip(&columns)
            .filter(|(_, posts)| posts.iter().any(|p| p.start_y < p.end_y))
            .map(|(x, _)| x)
            .minmax()
            .into_option()
            .unwrap_or((left, right));
        let posts = || columns.iter().flatten().filter(|p| p.start_y < p.end_y);
        let top = posts().map(|p| p.start_y).min().unwrap_or(0);
        let bottom = posts().map(|p| p.end_y).max().unwrap_or(0);
        Ok(SpriteInfo {
            left,
            right,
            top,
            bottom,
        })
    }

    /// Renders the sprite into a 64×64 column-major block, with
    /// [`TRANSPARENT`] wherever no post draws.
    pub fn decode(&self) -> Result<Vec<u8>, ResourceError> {
        let (left, _, columns) = self.columns()?;
        let mut pixels = vec![TRANSPARENT; WALL_BYTES];
        for (x, posts) in (usize::from(left)..).zip(&columns) {
            for post in posts {
                for y in post.start_y..post.end_y {
                    let index = usize::from(post.source.wrapping_add(y));
                    let pixel = *self.data.get(index).ok_or_else(|| {
                        self.error(mem_reader::MemReaderError::NotEnoughData {
                            context: format!("sprite {} column {x}", self.index),
                            offset: index,
                            required: 1,
                            available: self.data.len().saturating_sub(index),
                        })
                    })?;
                    pixels[x * TEXTURE_SIZE + usize::from(y)] = pixel;
                }
            }
        }
        Ok(pixels)
    }
}

/// A digitized sound assembled from consecutive sound pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitizedSound {
    start_page: usize,
    data: Bytes,
}

impl DigitizedSound {
    /// Absolute page index of the first page.
    #[must_use]
    pub fn start_page(&self) -> usize {
        self.start_page
    }

    /// Unsigned 8-bit mono samples.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

#[derive(Debug, Clone)]
pub struct ResourceArchive {
    data: Bytes,
    header: PageHeader,
    table: ChunkTable,
    lengths: Vec<u16>,
    digitized: Vec<DigitizedSound>,
}

impl ResourceArchive {
    pub fn parse(data: impl Into<Bytes>) -> Result<Self, ResourceError> {
        let data = data.into();
        let mut reader = SliceMemReader::with_context(&data, "VSWAP");
        let header = PageHeader::parse(&mut reader).map_err(MalformedIndex::from)?;
        header.validate(data.len())?;

        let offsets = read_offsets(&mut reader, header.chunk_count(), OffsetWidth::U32)
            .map_err(MalformedIndex::from)?;
        let lengths = (0..header.chunk_count())
            .map(|_| reader.read_u16_le())
            .collect::<mem_reader::Result<Vec<_>>>()
            .map_err(MalformedIndex::from)?;
        let table = ChunkTable::from_sparse_offsets(&offsets, TableEnd::BufferEnd(data.len()))?;

        let mut archive = ResourceArchive {
            data,
            header,
            table,
            lengths,
            digitized: Vec::new(),
        };
        archive.digitized = archive.assemble_digitized()?;
        log::debug!(
            "Page file: {} walls, {} sprites, {} sound pages, {} digitized sounds",
            archive.wall_count(),
            archive.sprite_count(),
            archive.sound_page_count(),
            archive.digitized.len()
        );
        Ok(archive)
    }

    fn assemble_digitized(&self) -> Result<Vec<DigitizedSound>, ResourceError> {
        let Some(list_index) = self.list_index() else {
            return Ok(Vec::new());
        };
        let list = self.chunk(list_index).unwrap_or_default();
        let mut reader = SliceMemReader::with_context(&list, "digitized sound list");
        let mut sounds = Vec::new();
        while reader.remaining() >= 4 {
            let (start, byte_len) = reader
                .read_u16_le()
                .and_then(|start| Ok((start, reader.read_u16_le()?)))
                .map_err(|source| ResourceError::MalformedChunk {
                    index: list_index,
                    source,
                })?;
            let start_page = self.header.sound_start() + usize::from(start);
            if start_page >= list_index {
                log::warn!("Digitized sound at page {start_page} lies past the sound pages");
                continue;
            }
            let byte_len = usize::from(byte_len);
            let mut data = Vec::with_capacity(byte_len);
            for page in start_page..list_index {
                if data.len() >= byte_len {
                    break;
                }
                data.extend_from_slice(&self.chunk(page).unwrap_or_default());
            }
            if data.len() < byte_len {
                log::warn!(
                    "Digitized sound at page {start_page} is {} bytes short",
                    byte_len - data.len()
                );
            }
            data.truncate(byte_len);
            sounds.push(DigitizedSound {
                start_page,
                data: Bytes::from(data),
            });
        }
        Ok(sounds)
    }

    fn list_index(&self) -> Option<usize> {
        (self.header.sound_start() < self.header.chunk_count())
            .then(|| self.header.chunk_count() - 1)
    }

    #[must_use]
    pub fn header(&self) -> PageHeader {
        self.header
    }

    #[must_use]
    pub fn chunk_table(&self) -> &ChunkTable {
        &self.table
    }

    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.table.len()
    }

    /// A page's payload. The stored length is used where it fits inside the
    /// page's span.
    #[must_use]
    pub fn chunk(&self, index: usize) -> Option<Bytes> {
        let chunk = self.table.get(index)?;
        let len = usize::from(self.lengths[index]).min(chunk.len());
        Some(self.data.slice(chunk.offset()..chunk.offset() + len))
    }

    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.header.sprite_start()
    }

    /// A wall texture as 64 columns of 64 pixels, or `None` for an index past
    /// the walls or a page of the wrong size.
    #[must_use]
    pub fn wall(&self, index: usize) -> Option<Bytes> {
        if index >= self.wall_count() {
            return None;
        }
        self.chunk(index).filter(|page| page.len() == WALL_BYTES)
    }

    #[must_use]
    pub fn sprite_count(&self) -> usize {
        self.header.sound_start() - self.header.sprite_start()
    }

    #[must_use]
    pub fn sprite(&self, index: usize) -> Option<Sprite> {
        if index >= self.sprite_count() {
            return None;
        }
        let data = self.chunk(self.header.sprite_start() + index)?;
        Some(Sprite {
            index: self.header.sprite_start() + index,
            data,
        })
    }

    /// Sound pages, not counting the digitized sound list.
    #[must_use]
    pub fn sound_page_count(&self) -> usize {
        self.list_index()
            .map_or(0, |list| list - self.header.sound_start())
    }

    #[must_use]
    pub fn digitized_sounds(&self) -> &[DigitizedSound] {
        &self.digitized
    }

    /// Total bytes spanned by the walls, sprites and sounds (including the
    /// sound list), each group measured by offset subtraction.
    #[must_use]
    pub fn group_spans(&self) -> [usize; 3] {
        let span = |range: std::ops::Range<usize>| -> usize {
            range.filter_map(|i| self.table.get(i)).map(|c| c.len()).sum()
        };
        [
            span(0..self.header.sprite_start()),
            span(self.header.sprite_start()..self.header.sound_start()),
            span(self.header.sound_start()..self.header.chunk_count()),
        ]
    }

    /// A copy that shares no buffers with `self`.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        ResourceArchive {
            data: Bytes::copy_from_slice(&self.data),
            header: self.header,
            table: self.table.clone(),
            lengths: self.lengths.clone(),
            digitized: self
                .digitized
                .iter()
                .map(|sound| DigitizedSound {
                    start_page: sound.start_page,
                    data: Bytes::copy_from_slice(&sound.data),
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use datalit::datalit;

    use super::*;
    use crate::utils::testing::page_file;

    /// A sprite with one post in column 31 covering rows 10..12, and one in
    /// column 32 covering row 40.
    fn test_sprite() -> Vec<u8> {
        datalit!(
            31u16_le, 32u16_le,
            // Column offsets.
            8u16_le, 16u16_le,
            // Column 31: rows 10..12, pixels at 24 + y - 10.
            24u16_le, 14u16_le, 20u16_le, 0u16_le,
            // Column 32: row 40, pixel at 26.
            82u16_le, 0xFFF2u16_le, 80u16_le, 0u16_le,
            0x11u8, 0x22u8, 0x33u8,
        )
        .to_vec()
    }

    fn archive() -> ResourceArchive {
        let walls = vec![vec![7u8; WALL_BYTES], vec![1u8; 10]];
        let sprites = vec![test_sprite()];
        let sounds = vec![vec![0x80u8; 6], vec![0x81u8; 6], vec![0x82u8; 2]];
        ResourceArchive::parse(page_file(&walls, &sprites, &sounds, &[(0, 8), (2, 2)])).unwrap()
    }

    #[test]
    fn partitions_pages_into_groups() {
        let archive = archive();
        assert_eq!(archive.chunk_count(), 7);
        assert_eq!(archive.wall_count(), 2);
        assert_eq!(archive.sprite_count(), 1);
        assert_eq!(archive.sound_page_count(), 3);
        let spans = archive.group_spans();
        assert_eq!(
            spans.iter().sum::<usize>(),
            archive.len() - archive.chunk_table().start()
        );
    }

    #[test]
    fn walls_must_be_full_textures() {
        let archive = archive();
        assert_eq!(archive.wall(0).unwrap().len(), WALL_BYTES);
        assert!(archive.wall(1).is_none());
        assert!(archive.wall(2).is_none());
    }

    #[test]
    fn sprite_bounds_and_pixels() {
        let sprite = archive().sprite(0).unwrap();
        assert_eq!(
            sprite.info().unwrap(),
            SpriteInfo {
                left: 31,
                right: 32,
                top: 10,
                bottom: 41
            }
        );
        let pixels = sprite.decode().unwrap();
        assert_eq!(pixels[31 * 64 + 10], 0x11);
        assert_eq!(pixels[31 * 64 + 11], 0x22);
        assert_eq!(pixels[32 * 64 + 40], 0x33);
        assert_eq!(pixels[32 * 64 + 39], TRANSPARENT);
        assert_eq!(pixels.iter().filter(|&&p| p != TRANSPARENT).count(), 3);
    }

    #[test]
    fn sprite_bounds_skip_empty_columns() {
        let data = datalit!(
            30u16_le, 33u16_le,
            // Columns 30 and 33 share an empty post list.
            12u16_le, 14u16_le, 22u16_le, 12u16_le,
            0u16_le,
            // Column 31: rows 10..12, pixels at 30 + y - 10.
            24u16_le, 20u16_le, 20u16_le, 0u16_le,
            // Column 32: row 40, pixel at 32.
            82u16_le, 0xFFF8u16_le, 80u16_le, 0u16_le,
            0x11u8, 0x22u8, 0x33u8,
        )
        .to_vec();
        let sprite = Sprite {
            index: 0,
            data: Bytes::from(data),
        };
        assert_eq!(
            sprite.info().unwrap(),
            SpriteInfo {
                left: 31,
                right: 32,
                top: 10,
                bottom: 41
            }
        );
        assert_eq!(sprite.decode().unwrap()[32 * 64 + 40], 0x33);

        let blank = Sprite {
            index: 1,
            data: Bytes::from(datalit!(5u16_le, 6u16_le, 8u16_le, 8u16_le, 0u16_le).to_vec()),
        };
        let info = blank.info().unwrap();
        assert_eq!((info.left, info.right), (5, 6));
        assert!(info.is_empty());
    }

    #[test]
    fn digitized_sounds_span_pages() {
        let archive = archive();
        let sounds = archive.digitized_sounds();
        assert_eq!(sounds.len(), 2);
        assert_eq!(sounds[0].start_page(), 3);
        assert_eq!(&sounds[0].data()[..], [0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x81, 0x81]);
        assert_eq!(&sounds[1].data()[..], [0x82, 0x82]);
    }

    #[test]
    fn unordered_starts_are_out_of_range() {
        let data = datalit!(2u16_le, 2u16_le, 1u16_le, 0u32_le, 0u32_le, 0u16_le, 0u16_le).to_vec();
        let err = ResourceArchive::parse(data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ChunkIndexOutOfRange);

        let data = datalit!(2u16_le, 1u16_le, 3u16_le).to_vec();
        assert!(matches!(
            ResourceArchive::parse(data),
            Err(ResourceError::ChunkIndexOutOfRange { .. })
        ));
    }

    #[test]
    fn truncated_table_is_malformed() {
        let data = datalit!(4u16_le, 1u16_le, 2u16_le, 0u32_le).to_vec();
        let err = ResourceArchive::parse(data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedIndex);
    }

    #[test]
    fn deep_copy_owns_its_data() {
        let archive = archive();
        let copy = archive.deep_copy();
        assert_eq!(copy.wall(0), archive.wall(0));
        assert_ne!(copy.data.as_ptr(), archive.data.as_ptr());
        assert_eq!(copy.digitized_sounds(), archive.digitized_sounds());
    }
}
