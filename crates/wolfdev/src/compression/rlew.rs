//! RLEW expansion: runs of a repeated word introduced by a sentinel tag.
//!
//! The tag is not fixed by the format; each archive records its own in the
//! head index. A tag word is followed by a count and the value to repeat.

use super::{DecompressionError, LengthPrefix, Truncation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Literal,
    RunLength { value: u16, remaining: usize },
}

struct Words<'a> {
    data: &'a [u16],
    position: usize,
}

impl Words<'_> {
    fn next(&mut self) -> Result<u16, DecompressionError> {
        let Some(&word) = self.data.get(self.position) else {
            return Err(DecompressionError::TruncatedStream {
                // Reported in bytes, like the Carmack stage.
                offset: self.position * 2,
                reason: Truncation::InputExhausted,
            });
        };
        self.position += 1;
        Ok(word)
    }

    fn read_length(&mut self, prefix: LengthPrefix) -> Result<usize, DecompressionError> {
        let low = self.next()?;
        Ok(match prefix {
            LengthPrefix::Word => usize::from(low),
            LengthPrefix::DoubleWord => {
                let high = self.next()?;
                (usize::from(high) << 16) | usize::from(low)
            }
        })
    }
}

fn run(mut words: Words<'_>, tag: u16, declared: usize) -> Result<Vec<u16>, DecompressionError> {
    // A three-word run yields at most `u16::MAX` words.
    let capacity = declared.min(words.data.len().saturating_mul(21_845));
    let mut output = Vec::with_capacity(capacity);
    let mut state = State::Literal;
    while output.len() < declared {
        state = match state {
            State::Literal => {
                let word = words.next()?;
                if word == tag {
                    let count = usize::from(words.next()?);
                    let value = words.next()?;
                    if output.len() + count > declared {
                        return Err(DecompressionError::OutputOverrun {
                            declared,
                            produced: output.len(),
                            requested: count,
                        });
                    }
                    if count == 0 {
                        State::Literal
                    } else {
                        State::RunLength {
                            value,
                            remaining: count,
                        }
                    }
                } else {
                    output.push(word);
                    State::Literal
                }
            }
            State::RunLength { value, remaining } => {
                output.push(value);
                if remaining > 1 {
                    State::RunLength {
                        value,
                        remaining: remaining - 1,
                    }
                } else {
                    State::Literal
                }
            }
        };
    }
    Ok(output)
}

/// Expands RLEW-compressed words. The first word(s) hold the expanded size in
/// bytes.
pub fn expand(
    input: &[u16],
    tag: u16,
    prefix: LengthPrefix,
) -> Result<Vec<u16>, DecompressionError> {
    let mut words = Words {
        data: input,
        position: 0,
    };
    let declared = words.read_length(prefix)? / 2;
    run(words, tag, declared)
}

/// Like [`expand`], but first requires the stream to declare exactly
/// `expected` words.
pub fn expand_checked(
    input: &[u16],
    tag: u16,
    prefix: LengthPrefix,
    expected: usize,
) -> Result<Vec<u16>, DecompressionError> {
    let mut words = Words {
        data: input,
        position: 0,
    };
    let declared = words.read_length(prefix)? / 2;
    if declared != expected {
        return Err(DecompressionError::LengthMismatch { declared, expected });
    }
    let output = run(words, tag, declared)?;
    debug_assert_eq!(output.len(), expected);
    Ok(output)
}
