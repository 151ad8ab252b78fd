//! Offset tables shared by the page file and the audio archive.
//!
//! Both formats describe their contents with a flat list of little-endian
//! offsets. Chunk lengths are implicit: each chunk runs until the next one
//! starts, and the last one until the end of the buffer or a terminal offset.

use std::ops::Range;

use crate::utils::mem_reader::{self, MemReader};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetWidth {
    U16,
    U24,
    U32,
}

/// How the last chunk of a table ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEnd {
    /// The last chunk runs to the end of a buffer of this length.
    BufferEnd(usize),
    /// The last offset in the table marks the end of the final chunk and is
    /// not a chunk itself.
    Terminal { buffer_len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedIndex {
    #[error("Malformed index: chunk {index} starts at {offset}, after the next chunk at {next}")]
    NonMonotonic {
        index: usize,
        offset: usize,
        next: usize,
    },
    #[error("Malformed index: chunk {index} offset {offset} exceeds buffer length {buffer_len}")]
    OutOfBounds {
        index: usize,
        offset: usize,
        buffer_len: usize,
    },
    #[error("Malformed index: terminal table has no end offset")]
    MissingTerminal,
    #[error("Malformed index: {what} needs at least {required} bytes, found {len}")]
    TooShort {
        what: &'static str,
        required: usize,
        len: usize,
    },
    #[error("Malformed index: {0}")]
    Unreadable(#[from] mem_reader::MemReaderError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    offset: usize,
    len: usize,
}

impl Chunk {
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }
}

/// An ordered list of contiguous, non-overlapping chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkTable {
    chunks: Vec<Chunk>,
    end: usize,
}

/// Reads `count` offsets of the given width.
pub fn read_offsets<M: MemReader>(
    reader: &mut M,
    count: usize,
    width: OffsetWidth,
) -> mem_reader::Result<Vec<usize>> {
    let mut offsets = Vec::with_capacity(count);
    for _ in 0..count {
        let offset = match width {
            OffsetWidth::U16 => u32::from(reader.read_u16_le()?),
            OffsetWidth::U24 => reader.read_u24_le()?,
            OffsetWidth::U32 => reader.read_u32_le()?,
        };
        offsets.push(offset as usize);
    }
    Ok(offsets)
}

impl ChunkTable {
    /// Builds a table where every offset is a real chunk start.
    pub fn from_offsets(offsets: &[usize], end: TableEnd) -> Result<Self, MalformedIndex> {
        Self::build(offsets, end, false)
    }

    /// Builds a table where an offset of zero marks an empty chunk, as page
    /// files do for pages that were never written.
    pub fn from_sparse_offsets(offsets: &[usize], end: TableEnd) -> Result<Self, MalformedIndex> {
        Self::build(offsets, end, true)
    }

    /// Reads `count` offsets from `reader` and builds a table from them. For
    /// [`TableEnd::Terminal`] one extra offset is read.
    pub fn read<M: MemReader>(
        reader: &mut M,
        count: usize,
        width: OffsetWidth,
        end: TableEnd,
    ) -> Result<Self, MalformedIndex> {
        let total = match end {
            TableEnd::BufferEnd(_) => count,
            TableEnd::Terminal { .. } => count + 1,
        };
        let offsets = read_offsets(reader, total, width)?;
        Self::from_offsets(&offsets, end)
    }

    fn build(offsets: &[usize], end: TableEnd, sparse: bool) -> Result<Self, MalformedIndex> {
        let (offsets, buffer_len, table_end) = match end {
            TableEnd::BufferEnd(buffer_len) => (offsets, buffer_len, buffer_len),
            TableEnd::Terminal { buffer_len } => {
                let (&terminal, offsets) =
                    offsets.split_last().ok_or(MalformedIndex::MissingTerminal)?;
                if terminal > buffer_len {
                    return Err(MalformedIndex::OutOfBounds {
                        index: offsets.len(),
                        offset: terminal,
                        buffer_len,
                    });
                }
                (offsets, buffer_len, terminal)
            }
        };

        let mut chunks = vec![
            Chunk {
                offset: table_end,
                len: 0
            };
            offsets.len()
        ];
        let mut next = table_end;
        for (index, &offset) in offsets.iter().enumerate().rev() {
            if sparse && offset == 0 {
                chunks[index] = Chunk {
                    offset: next,
                    len: 0,
                };
                continue;
            }
            if offset > buffer_len {
                return Err(MalformedIndex::OutOfBounds {
                    index,
                    offset,
                    buffer_len,
                });
            }
            if offset > next {
                return Err(MalformedIndex::NonMonotonic {
                    index,
                    offset,
                    next,
                });
            }
            chunks[index] = Chunk {
                offset,
                len: next - offset,
            };
            next = offset;
        }

        Ok(ChunkTable {
            chunks,
            end: table_end,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Chunk> {
        self.chunks.get(index).copied()
    }

    #[must_use]
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn iter(&self) -> impl Iterator<Item = Chunk> + '_ {
        self.chunks.iter().copied()
    }

    /// Offset where the first chunk starts.
    #[must_use]
    pub fn start(&self) -> usize {
        self.chunks.first().map_or(self.end, Chunk::offset)
    }

    /// Offset where the last chunk ends.
    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }
}

#[cfg(test)]
mod tests {
    use datalit::datalit;

    use super::*;
    use crate::utils::mem_reader::SliceMemReader;

    #[test]
    fn lengths_come_from_next_offset() {
        let table = ChunkTable::from_offsets(&[10, 14, 30], TableEnd::BufferEnd(40)).unwrap();
        let lens: Vec<_> = table.iter().map(|c| c.len()).collect();
        assert_eq!(lens, [4, 16, 10]);
        assert_eq!(table.start(), 10);
        assert_eq!(table.end(), 40);
    }

    #[test]
    fn terminal_offset_closes_last_chunk() {
        let data = datalit!(0u32_le, 8u32_le, 8u32_le, 20u32_le).to_vec();
        let mut reader = SliceMemReader::new(&data);
        let table = ChunkTable::read(
            &mut reader,
            3,
            OffsetWidth::U32,
            TableEnd::Terminal { buffer_len: 24 },
        )
        .unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(1).unwrap().len(), 0);
        assert_eq!(table.get(2).unwrap().range(), 8..20);
    }

    #[test]
    fn rejects_decreasing_offsets() {
        assert_eq!(
            ChunkTable::from_offsets(&[10, 30, 20], TableEnd::BufferEnd(40)),
            Err(MalformedIndex::NonMonotonic {
                index: 1,
                offset: 30,
                next: 20
            })
        );
    }

    #[test]
    fn rejects_offsets_past_buffer() {
        assert!(matches!(
            ChunkTable::from_offsets(&[10, 50], TableEnd::BufferEnd(40)),
            Err(MalformedIndex::OutOfBounds { index: 1, .. })
        ));
        assert!(matches!(
            ChunkTable::from_offsets(&[0, 50], TableEnd::Terminal { buffer_len: 40 }),
            Err(MalformedIndex::OutOfBounds { index: 1, .. })
        ));
    }

    #[test]
    fn sparse_zero_offsets_are_empty() {
        let table =
            ChunkTable::from_sparse_offsets(&[16, 0, 24, 0], TableEnd::BufferEnd(32)).unwrap();
        let spans: Vec<_> = table.iter().map(|c| c.range()).collect();
        assert_eq!(spans, [16..24, 24..24, 24..32, 32..32]);
        let total: usize = table.iter().map(|c| c.len()).sum();
        assert_eq!(total, table.end() - table.start());
    }

    #[test]
    fn truncated_table_is_malformed() {
        let data = datalit!(0u32_le, 8u16_le).to_vec();
        let mut reader = SliceMemReader::new(&data);
        assert!(matches!(
            ChunkTable::read(&mut reader, 2, OffsetWidth::U32, TableEnd::BufferEnd(64)),
            Err(MalformedIndex::Unreadable(_))
        ));
    }
}
