//! Elias-Gamma code.
//!
//! `v` is written as `n = floor(log2(v))` zeros, a `1`, then the low `n`
//! bits of `v`. Zero has no codeword.

use crate::bitio::{self, BitReader, BitWriter};
use crate::codec::{self, Codec, CodecKind, Outcome};
use crate::error::{MalformedInputError, Result};

/// Longest prefix that can still yield a code point (`char::MAX` < 2^21).
const MAX_PREFIX: usize = 20;

#[derive(Debug, Clone, Copy, Default)]
pub struct EliasGamma;

impl EliasGamma {
    pub fn new() -> Self {
        Self
    }
}

impl Codec for EliasGamma {
    fn kind(&self) -> CodecKind {
        CodecKind::EliasGamma
    }

    fn encode(&mut self, message: &str) -> Result<Outcome> {
        codec::ensure_encodable_text(self.kind(), message, true)?;

        let mut writer = BitWriter::new();
        for c in message.chars() {
            let value = u64::from(u32::from(c));
            let n = bitio::floor_log2(value);
            writer.write_unary(n);
            writer.write_bits(value - (1 << n), n);
        }

        log::debug!(
            "elias-gamma: {} symbols -> {} bits",
            message.chars().count(),
            writer.bit_len()
        );
        Ok(Outcome::clean(writer.finish()))
    }

    fn decode(&mut self, bits: &str) -> Result<Outcome> {
        let mut reader = BitReader::new(bits)?;
        let mut decoded = String::new();

        while !reader.is_empty() {
            let start = reader.position();
            let n = reader.read_unary()?;
            if n > MAX_PREFIX {
                return Err(MalformedInputError::InvalidCodePoint {
                    start,
                    value: u64::MAX,
                }
                .into());
            }
            let suffix = reader.read_bits(n)?;
            decoded.push(codec::code_point((1 << n) + suffix, start)?);
        }

        log::debug!(
            "elias-gamma: {} bits -> {} symbols",
            bits.len(),
            decoded.chars().count()
        );
        Ok(Outcome::clean(decoded))
    }

    fn validate(&self, message: &str) -> bool {
        !message.is_empty() && !message.contains('\0')
    }
}
