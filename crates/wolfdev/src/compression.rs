//! The two-stage plane codec used by the map archives.
//!
//! Every plane in a `GAMEMAPS` file is RLEW-compressed and then
//! Carmack-compressed, so decoding runs [`carmack`] first and feeds its word
//! output into [`rlew`]. Both stages read a length prefix and allocate their
//! output once from it; the declared length is the hard limit for everything
//! that follows.

pub mod carmack;
pub mod rlew;

use std::fmt;

/// Width of the declared-length header at the start of each stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthPrefix {
    /// A 16-bit byte count. All shipped archives use this.
    #[default]
    Word,
    /// A 32-bit byte count, written by some map editors.
    DoubleWord,
}

impl LengthPrefix {
    #[must_use]
    pub fn byte_width(self) -> usize {
        match self {
            LengthPrefix::Word => 2,
            LengthPrefix::DoubleWord => 4,
        }
    }

    #[must_use]
    pub fn word_width(self) -> usize {
        self.byte_width() / 2
    }
}

/// Parameters shared by every plane of one archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecParams {
    /// The RLEW sentinel word, taken from the head index.
    pub rlew_tag: u16,
    pub prefix: LengthPrefix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truncation {
    InputExhausted,
    MissingHistory { distance: usize, available: usize },
}

impl fmt::Display for Truncation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Truncation::InputExhausted => write!(f, "input exhausted"),
            Truncation::MissingHistory {
                distance,
                available,
            } => write!(
                f,
                "back-reference to word {distance} with only {available} words produced"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecompressionError {
    #[error("Truncated stream at input offset {offset}: {reason}")]
    TruncatedStream { offset: usize, reason: Truncation },
    #[error("Output overrun: {produced} + {requested} words exceeds declared {declared}")]
    OutputOverrun {
        declared: usize,
        produced: usize,
        requested: usize,
    },
    #[error("Length mismatch: stream declares {declared} words, expected {expected}")]
    LengthMismatch { declared: usize, expected: usize },
}

/// Decodes one plane: Carmack expansion followed by RLEW expansion.
///
/// An empty input is an empty plane. Otherwise the RLEW stage must declare
/// exactly `expected_words` words.
pub fn decompress_plane(
    data: &[u8],
    params: CodecParams,
    expected_words: usize,
) -> Result<Vec<u16>, DecompressionError> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    let intermediate = carmack::expand(data, params.prefix)?;
    rlew::expand_checked(&intermediate, params.rlew_tag, params.prefix, expected_words)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::utils::testing::compress_plane;

    const PARAMS: CodecParams = CodecParams {
        rlew_tag: 0xABCD,
        prefix: LengthPrefix::Word,
    };

    #[test]
    fn empty_input_is_empty_plane() {
        assert_eq!(decompress_plane(&[], PARAMS, 64 * 64), Ok(Vec::new()));
    }

    #[test]
    fn decodes_plane_with_runs_and_tags() {
        let mut plane = vec![0x006Cu16; 60];
        plane.extend([0xA701, 0xA800, 0xABCD, 1, 2]);
        plane.extend(std::iter::repeat_n(0x0001, 35));
        let compressed = compress_plane(&plane, PARAMS);
        assert_eq!(decompress_plane(&compressed, PARAMS, 100).unwrap(), plane);
    }

    #[test]
    fn rejects_plane_of_wrong_size() {
        let compressed = compress_plane(&[7u16; 16], PARAMS);
        assert_eq!(
            decompress_plane(&compressed, PARAMS, 64),
            Err(DecompressionError::LengthMismatch {
                declared: 16,
                expected: 64
            })
        );
    }

    #[test]
    fn decoding_is_deterministic() {
        let plane: Vec<u16> = (0..256u16).map(|i| i % 7).collect();
        let compressed = compress_plane(&plane, PARAMS);
        let first = decompress_plane(&compressed, PARAMS, 256).unwrap();
        let second = decompress_plane(&compressed, PARAMS, 256).unwrap();
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn decoded_length_matches_declared(
            plane in prop::collection::vec(prop::sample::select(&[0u16, 1, 0xA7A7, 0xABCD, 108]), 1..2_000),
            wide in any::<bool>(),
        ) {
            let params = CodecParams {
                rlew_tag: 0xABCD,
                prefix: if wide { LengthPrefix::DoubleWord } else { LengthPrefix::Word },
            };
            let compressed = compress_plane(&plane, params);
            let decoded = decompress_plane(&compressed, params, plane.len())?;
            prop_assert_eq!(decoded.len(), plane.len());
            prop_assert_eq!(decoded, plane);
        }

        #[test]
        fn arbitrary_input_never_panics(
            data in prop::collection::vec(any::<u8>(), 0..512),
            expected in 0usize..1024,
        ) {
            if let Ok(plane) = decompress_plane(&data, PARAMS, expected) {
                prop_assert!(plane.is_empty() || plane.len() == expected);
            }
        }
    }
}
