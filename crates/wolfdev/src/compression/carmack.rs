//! Carmack expansion: literal words interleaved with back-references into the
//! words already produced.
//!
//! A word whose high byte is [`NEAR_TAG`] or [`FAR_TAG`] is a marker and its
//! low byte is a word count. A count of zero escapes a literal word whose high
//! byte happens to equal the tag; the literal's low byte follows. Near
//! references give a one-byte distance back from the end of the output, far
//! references a two-byte absolute word offset from its start.

use super::{DecompressionError, LengthPrefix, Truncation};

pub const NEAR_TAG: u8 = 0xA7;
pub const FAR_TAG: u8 = 0xA8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Literal,
    BackReference { source: usize, remaining: usize },
}

struct Input<'a> {
    data: &'a [u8],
    position: usize,
}

impl Input<'_> {
    fn truncated(&self) -> DecompressionError {
        DecompressionError::TruncatedStream {
            offset: self.position,
            reason: Truncation::InputExhausted,
        }
    }

    fn read_u8(&mut self) -> Result<u8, DecompressionError> {
        let value = *self.data.get(self.position).ok_or_else(|| self.truncated())?;
        self.position += 1;
        Ok(value)
    }

    fn read_u16(&mut self) -> Result<u16, DecompressionError> {
        let low = self.read_u8()?;
        let high = self.read_u8()?;
        Ok(u16::from_le_bytes([low, high]))
    }

    fn read_length(&mut self, prefix: LengthPrefix) -> Result<usize, DecompressionError> {
        let low = self.read_u16()?;
        Ok(match prefix {
            LengthPrefix::Word => usize::from(low),
            LengthPrefix::DoubleWord => {
                let high = self.read_u16()?;
                (usize::from(high) << 16) | usize::from(low)
            }
        })
    }
}

struct Expander<'a> {
    input: Input<'a>,
    output: Vec<u16>,
    declared: usize,
}

impl Expander<'_> {
    fn back_reference(
        &self,
        count: usize,
        source: Option<usize>,
        distance: usize,
    ) -> Result<State, DecompressionError> {
        let available = self.output.len();
        let Some(source) = source.filter(|&source| source < available) else {
            return Err(DecompressionError::TruncatedStream {
                offset: self.input.position,
                reason: Truncation::MissingHistory {
                    distance,
                    available,
                },
            });
        };
        if available + count > self.declared {
            return Err(DecompressionError::OutputOverrun {
                declared: self.declared,
                produced: available,
                requested: count,
            });
        }
        Ok(State::BackReference {
            source,
            remaining: count,
        })
    }

    fn literal_step(&mut self) -> Result<State, DecompressionError> {
        let word = self.input.read_u16()?;
        let [count, tag] = word.to_le_bytes();
        if tag != NEAR_TAG && tag != FAR_TAG {
            self.output.push(word);
            return Ok(State::Literal);
        }

        if count == 0 {
            let low = self.input.read_u8()?;
            self.output.push(u16::from_le_bytes([low, tag]));
            return Ok(State::Literal);
        }

        let count = usize::from(count);
        if tag == NEAR_TAG {
            let distance = usize::from(self.input.read_u8()?);
            let source = if distance == 0 {
                None
            } else {
                self.output.len().checked_sub(distance)
            };
            self.back_reference(count, source, distance)
        } else {
            let offset = usize::from(self.input.read_u16()?);
            self.back_reference(count, Some(offset), offset)
        }
    }

    fn run(mut self) -> Result<Vec<u16>, DecompressionError> {
        let mut state = State::Literal;
        while self.output.len() < self.declared {
            state = match state {
                State::Literal => self.literal_step()?,
                State::BackReference { source, remaining } => {
                    // The source may overlap the words being produced; copying one
                    // word at a time replays them.
                    let word = self.output[source];
                    self.output.push(word);
                    if remaining > 1 {
                        State::BackReference {
                            source: source + 1,
                            remaining: remaining - 1,
                        }
                    } else {
                        State::Literal
                    }
                }
            };
        }
        Ok(self.output)
    }
}

/// Expands a Carmack-compressed byte stream into words.
///
/// The stream starts with the expanded size in bytes; the result holds half
/// that many words.
pub fn expand(data: &[u8], prefix: LengthPrefix) -> Result<Vec<u16>, DecompressionError> {
    let mut input = Input { data, position: 0 };
    let declared = input.read_length(prefix)? / 2;
    // A three-byte reference yields at most 255 words.
    let capacity = declared.min(data.len().saturating_mul(85));
    Expander {
        input,
        output: Vec::with_capacity(capacity),
        declared,
    }
    .run()
}
