//! Golomb-Rice code.
//!
//! Each code point `v` becomes `floor(v / k)` zeros, a `1` stop bit, then
//! `v mod k` as a fixed-width binary suffix of `ceil(log2(k))` bits.
//!
//! ```text
//! k = 64, 'A' (65):   0 | 1 | 000001
//!                     ^   ^   ^
//!                     |   |   +-- 65 mod 64 in 6 bits
//!                     |   +------ stop bit
//!                     +---------- 65 / 64 = 1 zero
//! ```

use crate::bitio::{self, BitReader, BitWriter};
use crate::codec::{self, Codec, CodecKind, Outcome, Params};
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone)]
pub struct Golomb {
    k: u64,
    suffix_len: usize,
}

impl Golomb {
    pub const DEFAULT_K: u64 = 64;

    /// Create a codec with divisor `k`.
    ///
    /// # Errors
    /// `ConfigError::InvalidParameter` if `k` is zero.
    pub fn new(k: u64) -> Result<Self> {
        let mut golomb = Self::default();
        golomb.set_k(k)?;
        Ok(golomb)
    }

    pub fn k(&self) -> u64 {
        self.k
    }

    /// Width of the binary remainder field.
    pub fn suffix_len(&self) -> usize {
        self.suffix_len
    }

    fn set_k(&mut self, k: u64) -> Result<()> {
        if k == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "k",
                value: k.to_string(),
                reason: "must be positive",
            }
            .into());
        }
        self.k = k;
        self.suffix_len = bitio::ceil_log2(k);
        Ok(())
    }
}

impl Default for Golomb {
    fn default() -> Self {
        Self {
            k: Self::DEFAULT_K,
            suffix_len: bitio::ceil_log2(Self::DEFAULT_K),
        }
    }
}

impl Codec for Golomb {
    fn kind(&self) -> CodecKind {
        CodecKind::Golomb
    }

    fn encode(&mut self, message: &str) -> Result<Outcome> {
        codec::ensure_encodable_text(self.kind(), message, false)?;

        let mut writer = BitWriter::new();
        for c in message.chars() {
            let value = u64::from(u32::from(c));
            writer.write_unary((value / self.k) as usize);
            writer.write_bits(value % self.k, self.suffix_len);
        }

        log::debug!(
            "golomb(k={}): {} symbols -> {} bits",
            self.k,
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
            let run = reader.read_unary()? as u64;
            let suffix = reader.read_bits(self.suffix_len)?;
            let value = run
                .checked_mul(self.k)
                .and_then(|v| v.checked_add(suffix))
                .unwrap_or(u64::MAX);
            decoded.push(codec::code_point(value, start)?);
        }

        log::debug!(
            "golomb(k={}): {} bits -> {} symbols",
            self.k,
            bits.len(),
            decoded.chars().count()
        );
        Ok(Outcome::clean(decoded))
    }

    fn validate(&self, message: &str) -> bool {
        !message.is_empty()
    }

    fn configure(&mut self, params: &Params) -> Result<()> {
        match params {
            Params::Golomb { k } => {
                self.set_k(*k)?;
                log::info!("golomb: k = {k}, suffix length = {}", self.suffix_len);
                Ok(())
            }
            other => Err(ConfigError::ParameterMismatch {
                codec: self.name(),
                given: other.label(),
            }
            .into()),
        }
    }

    fn params(&self) -> Params {
        Params::Golomb { k: self.k }
    }
}
