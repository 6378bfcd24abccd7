//! `r`-fold repetition code.
//!
//! Encoding repeats every bit `r` times. Decoding takes the majority of each
//! `r`-bit block: a block that disagrees with itself is corrected and
//! reported, an exact tie (only possible for even `r`) aborts the decode.

use crate::bitio::{self, BitWriter};
use crate::codec::{Codec, CodecKind, Diagnostic, Outcome, Params};
use crate::error::{ConfigError, InvalidInputError, MalformedInputError, Result, UncorrectableError};

#[derive(Debug, Clone)]
pub struct Repetition {
    r: usize,
}

impl Repetition {
    pub const DEFAULT_R: usize = 3;

    /// # Errors
    /// `ConfigError::InvalidParameter` if `r` is zero.
    pub fn new(r: usize) -> Result<Self> {
        let mut repetition = Self::default();
        repetition.set_r(r)?;
        Ok(repetition)
    }

    pub fn r(&self) -> usize {
        self.r
    }

    fn set_r(&mut self, r: usize) -> Result<()> {
        if r == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "r",
                value: r.to_string(),
                reason: "must be positive",
            }
            .into());
        }
        self.r = r;
        Ok(())
    }
}

impl Default for Repetition {
    fn default() -> Self {
        Self {
            r: Self::DEFAULT_R,
        }
    }
}

impl Codec for Repetition {
    fn kind(&self) -> CodecKind {
        CodecKind::Repetition
    }

    fn encode(&mut self, message: &str) -> Result<Outcome> {
        bitio::ensure_encodable_bits(message)?;

        let capacity = message
            .len()
            .checked_mul(self.r)
            .ok_or(InvalidInputError::TooLong {
                codec: self.name(),
                len: message.len(),
            })?;
        let mut writer = BitWriter::with_capacity(capacity);
        for c in message.chars() {
            writer.write_run(c == '1', self.r);
        }
        log::debug!("repetition(r={}): {} -> {} bits", self.r, message.len(), writer.bit_len());
        Ok(Outcome::clean(writer.finish()))
    }

    fn decode(&mut self, bits: &str) -> Result<Outcome> {
        bitio::ensure_decodable(bits)?;
        if bits.len() % self.r != 0 {
            return Err(MalformedInputError::LengthNotMultiple {
                len: bits.len(),
                block: self.r,
            }
            .into());
        }

        let mut decoded = String::with_capacity(bits.len() / self.r);
        let mut diagnostics = Vec::new();

        for (segment, block) in bits.as_bytes().chunks(self.r).enumerate() {
            let ones = block.iter().filter(|&&b| b == b'1').count();
            let zeros = block.len() - ones;
            // Blocks are ASCII '0'/'1' after validation.
            let block_str = String::from_utf8_lossy(block).into_owned();

            if ones == zeros {
                log::warn!("repetition: tie in segment {segment} ({block_str})");
                return Err(UncorrectableError::RepetitionTie {
                    segment,
                    block: block_str,
                }
                .into());
            }

            let majority = ones > zeros;
            decoded.push(if majority { '1' } else { '0' });

            if ones != 0 && zeros != 0 {
                let minority = if majority { b'0' } else { b'1' };
                let offset = block.iter().position(|&b| b == minority).unwrap_or(0);
                let diagnostic = Diagnostic::RepetitionCorrected {
                    segment,
                    position: segment * self.r + offset,
                    block: block_str,
                    corrected: if majority { '1' } else { '0' },
                };
                log::warn!("repetition: {diagnostic}");
                diagnostics.push(diagnostic);
            }
        }

        log::debug!(
            "repetition(r={}): {} -> {} bits, {} corrected",
            self.r,
            bits.len(),
            decoded.len(),
            diagnostics.len()
        );
        Ok(Outcome::with_diagnostics(decoded, diagnostics))
    }

    fn validate(&self, message: &str) -> bool {
        bitio::is_bit_string(message)
    }

    fn configure(&mut self, params: &Params) -> Result<()> {
        match params {
            Params::Repetition { r } => {
                self.set_r(*r)?;
                log::info!("repetition: r = {r}");
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
        Params::Repetition { r: self.r }
    }
}
