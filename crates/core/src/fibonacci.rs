//! Fibonacci code over the Zeckendorf representation.
//!
//! Terms are `F = [1, 2, 3, 5, 8, ...]`. A code point is the greedy sum of
//! non-adjacent terms; the codeword lists one bit per term index, lowest
//! index first, followed by a terminating `1`. Since the representation never
//! uses two adjacent terms, `11` appears only at the end of a codeword.
//!
//! ```text
//! 'A' = 65 = 55 + 8 + 2
//! index:   0 1 2 3 4 5 6 7 8 | stop
//! term:    1 2 3 5 8 13 21 34 55
//! bit:     0 1 0 0 1 0 0 0 1 | 1
//! ```

use crate::bitio::{BitReader, BitWriter};
use crate::codec::{self, Codec, CodecKind, Outcome};
use crate::error::{MalformedInputError, Result};

const MAX_CODE_POINT: u64 = char::MAX as u64;

/// Fibonacci codec with a lazily grown term cache.
#[derive(Debug, Clone)]
pub struct Fibonacci {
    terms: Vec<u64>,
}

impl Fibonacci {
    pub fn new() -> Self {
        Self { terms: vec![1, 2] }
    }

    /// Term `n` of the sequence, extending the cache as needed.
    pub fn term(&mut self, n: usize) -> u64 {
        while self.terms.len() <= n {
            let len = self.terms.len();
            let next = self.terms[len - 1].saturating_add(self.terms[len - 2]);
            self.terms.push(next);
        }
        self.terms[n]
    }

    /// Term `n`, capped at the first term above `char::MAX`. Decoding never
    /// needs more, so a long run of zeros cannot grow the cache.
    fn code_point_term(&mut self, n: usize) -> u64 {
        while self.terms.len() <= n {
            let last = self.terms[self.terms.len() - 1];
            if last > MAX_CODE_POINT {
                return last;
            }
            self.term(self.terms.len());
        }
        self.terms[n]
    }

    /// Number of cached terms.
    pub fn cached_terms(&self) -> usize {
        self.terms.len()
    }

    /// Index of the largest term not exceeding `value` (`value >= 1`).
    fn largest_term_index(&mut self, value: u64) -> usize {
        let mut index = 0;
        while self.term(index + 1) <= value {
            index += 1;
        }
        index
    }

    fn write_codeword(&mut self, writer: &mut BitWriter, value: u64) {
        let top = self.largest_term_index(value);
        let mut used = vec![false; top + 1];
        let mut remainder = value;
        for index in (0..=top).rev() {
            let term = self.term(index);
            if term <= remainder {
                remainder -= term;
                used[index] = true;
            }
        }
        for bit in used {
            writer.write_bit(bit);
        }
        writer.write_bit(true);
    }
}

impl Default for Fibonacci {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec for Fibonacci {
    fn kind(&self) -> CodecKind {
        CodecKind::Fibonacci
    }

    fn encode(&mut self, message: &str) -> Result<Outcome> {
        codec::ensure_encodable_text(self.kind(), message, true)?;

        let mut writer = BitWriter::new();
        for c in message.chars() {
            self.write_codeword(&mut writer, u64::from(u32::from(c)));
        }

        log::debug!(
            "fibonacci: {} symbols -> {} bits ({} terms cached)",
            message.chars().count(),
            writer.bit_len(),
            self.terms.len()
        );
        Ok(Outcome::clean(writer.finish()))
    }

    fn decode(&mut self, bits: &str) -> Result<Outcome> {
        let mut reader = BitReader::new(bits)?;
        let mut decoded = String::new();

        while !reader.is_empty() {
            let start = reader.position();
            let mut sum = 0u64;
            let mut previous = false;
            let mut index = 0;
            loop {
                let bit = reader
                    .next_bit()
                    .ok_or(MalformedInputError::Unterminated { start })?;
                if bit && previous {
                    break;
                }
                if bit {
                    sum = sum.saturating_add(self.code_point_term(index));
                    if sum > MAX_CODE_POINT {
                        return Err(MalformedInputError::InvalidCodePoint { start, value: sum }.into());
                    }
                }
                previous = bit;
                index += 1;
            }
            decoded.push(codec::code_point(sum, start)?);
        }

        log::debug!(
            "fibonacci: {} bits -> {} symbols",
            bits.len(),
            decoded.chars().count()
        );
        Ok(Outcome::clean(decoded))
    }

    fn validate(&self, message: &str) -> bool {
        !message.is_empty() && !message.contains('\0')
    }
}
