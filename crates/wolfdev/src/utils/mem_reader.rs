use std::borrow::Cow;

pub trait FromFixedBytes: Sized {
    const SIZE: usize;
    fn parse(bytes: &[u8]) -> Self;
}

impl<const N: usize> FromFixedBytes for [u8; N] {
    const SIZE: usize = N;

    fn parse(bytes: &[u8]) -> Self {
        let mut array = [0u8; N];
        array.copy_from_slice(&bytes[..N]);
        array
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemReaderError {
    #[error(
        "{context}: needed {required} bytes at offset {offset}, but only {available} available"
    )]
    NotEnoughData {
        context: String,
        offset: usize,
        required: usize,
        available: usize,
    },
}

pub type Result<T> = std::result::Result<T, MemReaderError>;

macro_rules! impl_read_int {
    ($name:ident, $ty:ty) => {
        fn $name(&mut self) -> Result<$ty> {
            let mut buf = [0u8; std::mem::size_of::<$ty>()];
            self.read_exact(&mut buf)?;
            Ok(<$ty>::from_le_bytes(buf))
        }
    };
}

/// Sequential little-endian access to an in-memory block of archive data.
///
/// Every reader carries a context string naming the structure being read, so
/// errors point at the record that was malformed rather than just an offset.
pub trait MemReader {
    fn seek_to(&mut self, offset: usize) -> Result<()>;

    #[must_use]
    fn tell(&self) -> usize;

    #[must_use]
    fn data_size(&self) -> usize;

    #[must_use]
    fn context(&self) -> &str;

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()>;

    #[must_use]
    fn remaining(&self) -> usize {
        self.data_size() - self.tell()
    }

    #[must_use]
    fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Reads a fixed-size field. `field` is appended to the reader's context
    /// if the read fails.
    fn read_value<T: FromFixedBytes>(&mut self, field: &str) -> Result<T> {
        let mut buf = vec![0u8; T::SIZE];
        self.read_exact(&mut buf).map_err(|err| match err {
            MemReaderError::NotEnoughData {
                context,
                offset,
                required,
                available,
            } => MemReaderError::NotEnoughData {
                context: format!("{context}/{field}"),
                offset,
                required,
                available,
            },
        })?;
        Ok(T::parse(&buf))
    }

    impl_read_int!(read_u8, u8);
    impl_read_int!(read_u16_le, u16);
    impl_read_int!(read_u32_le, u32);
    impl_read_int!(read_i32_le, i32);

    fn read_u24_le(&mut self) -> Result<u32> {
        let mut buf = [0u8; 3];
        self.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes([buf[0], buf[1], buf[2], 0]))
    }
}

impl<M> MemReader for &mut M
where
    M: MemReader,
{
    fn seek_to(&mut self, offset: usize) -> Result<()> {
        (**self).seek_to(offset)
    }

    fn tell(&self) -> usize {
        (**self).tell()
    }

    fn data_size(&self) -> usize {
        (**self).data_size()
    }

    fn context(&self) -> &str {
        (**self).context()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).read_exact(buf)
    }
}

#[derive(Clone)]
pub struct SliceMemReader<'a> {
    data: &'a [u8],
    position: usize,
    context: Cow<'a, str>,
}

impl std::fmt::Debug for SliceMemReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemReader")
            .field("context", &self.context)
            .field("size", &self.data.len())
            .field("position", &self.position)
            .finish()
    }
}

impl<'a> SliceMemReader<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_context(data, "root")
    }

    #[must_use]
    pub fn with_context<C>(data: &'a [u8], context: C) -> Self
    where
        C: Into<Cow<'a, str>>,
    {
        Self {
            data,
            position: 0,
            context: context.into(),
        }
    }

    fn not_enough_data(&self, required: usize) -> MemReaderError {
        MemReaderError::NotEnoughData {
            context: self.context.to_string(),
            offset: self.position,
            required,
            available: self.remaining(),
        }
    }
}

impl MemReader for SliceMemReader<'_> {
    fn seek_to(&mut self, offset: usize) -> Result<()> {
        if self.data.len() < offset {
            return Err(MemReaderError::NotEnoughData {
                context: self.context.to_string(),
                offset: 0,
                required: offset,
                available: self.data.len(),
            });
        }
        self.position = offset;
        Ok(())
    }

    fn tell(&self) -> usize {
        self.position
    }

    fn data_size(&self) -> usize {
        self.data.len()
    }

    fn context(&self) -> &str {
        &self.context
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.remaining() < buf.len() {
            return Err(self.not_enough_data(buf.len()));
        }
        buf.copy_from_slice(&self.data[self.position..self.position + buf.len()]);
        self.position += buf.len();
        Ok(())
    }
}

/// A trait for types that can be parsed from a `MemReader`.
pub trait Parse: Sized {
    /// Parses a value from the given `MemReader`.
    ///
    /// This function should leave the reader at the position immediately after
    /// the parsed value.
    fn parse<M: MemReader>(reader: &mut M) -> Result<Self>;
}

#[cfg(test)]
mod tests {
    use datalit::datalit;

    use super::*;

    #[test]
    fn reads_little_endian_values() {
        let data =
            datalit!(0x01u8, 0x1234u16_le, 0x9Au8, 0x78u8, 0x56u8, 0xDEAD_BEEFu32_le).to_vec();
        let mut reader = SliceMemReader::new(&data);
        assert_eq!(reader.read_u8().unwrap(), 1);
        assert_eq!(reader.read_u16_le().unwrap(), 0x1234);
        assert_eq!(reader.read_u24_le().unwrap(), 0x56_789A);
        assert_eq!(reader.read_u32_le().unwrap(), 0xDEAD_BEEF);
        assert!(reader.is_empty());
    }

    #[test]
    fn short_field_reports_context() {
        let data = [1u8, 2, 3];
        let mut reader = SliceMemReader::with_context(&data, "header");
        reader.seek_to(1).unwrap();
        let err = reader.read_value::<[u8; 4]>("name").unwrap_err();
        assert_eq!(
            err,
            MemReaderError::NotEnoughData {
                context: "header/name".into(),
                offset: 1,
                required: 4,
                available: 2,
            }
        );
        assert_eq!(reader.tell(), 1);
    }

    #[test]
    fn seeking_past_the_end_fails() {
        let data = [0u8; 4];
        let mut reader = SliceMemReader::new(&data);
        assert!(reader.seek_to(4).is_ok());
        assert!(reader.is_empty());
        assert!(reader.seek_to(5).is_err());
    }
}
