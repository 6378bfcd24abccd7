//! Cyclic redundancy check over bit strings.
//!
//! The generator is a polynomial over GF(2) written as a bit string of
//! length `d`. Encoding appends the `d - 1` bit remainder of
//! `message * x^(d-1)` divided by the generator. Decoding divides the whole
//! received string: a zero remainder means no error was detected.
//!
//! CRC detects, it does not correct. On a nonzero remainder the payload is
//! still returned, with the remainder appended as an error marker.

use crate::bitio;
use crate::codec::{Codec, CodecKind, Diagnostic, Outcome, Params};
use crate::error::{ConfigError, MalformedInputError, Result};

#[derive(Debug, Clone)]
pub struct Crc {
    generator: Vec<bool>,
}

impl Crc {
    pub const DEFAULT_GENERATOR: &'static str = "1001";

    /// # Errors
    /// `ConfigError::InvalidParameter` if `generator` is empty or not binary.
    pub fn new(generator: &str) -> Result<Self> {
        let mut crc = Self::default();
        crc.set_generator(generator)?;
        Ok(crc)
    }

    /// Generator polynomial as a bit string.
    pub fn generator(&self) -> String {
        self.generator.iter().map(|&b| if b { '1' } else { '0' }).collect()
    }

    /// Generator length `d`; codewords carry `d - 1` check bits.
    pub fn degree(&self) -> usize {
        self.generator.len()
    }

    fn set_generator(&mut self, generator: &str) -> Result<()> {
        if !bitio::is_bit_string(generator) {
            return Err(ConfigError::InvalidParameter {
                name: "generator",
                value: generator.to_string(),
                reason: "must be a non-empty string of 0 and 1",
            }
            .into());
        }
        self.generator = parse_bits(generator);
        Ok(())
    }

    /// Remainder of `data` divided by the generator, `d - 1` bits long.
    ///
    /// Slides a `d`-bit window over `data`: when the leading bit is `1` the
    /// generator is XORed in, then the leading bit is dropped and the next
    /// data bit shifted in. `data` must hold at least `d` bits.
    pub fn remainder(&self, data: &[bool]) -> Vec<bool> {
        let d = self.degree();
        debug_assert!(data.len() >= d);

        let mut window: Vec<bool> = data[..d].to_vec();
        for next in d..=data.len() {
            if window[0] {
                for (w, &g) in window.iter_mut().zip(&self.generator) {
                    *w ^= g;
                }
            }
            window.remove(0);
            if next < data.len() {
                window.push(data[next]);
            }
        }
        window
    }
}

impl Default for Crc {
    fn default() -> Self {
        Self {
            generator: parse_bits(Self::DEFAULT_GENERATOR),
        }
    }
}

fn parse_bits(bits: &str) -> Vec<bool> {
    bits.bytes().map(|b| b == b'1').collect()
}

fn render(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

impl Codec for Crc {
    fn kind(&self) -> CodecKind {
        CodecKind::Crc
    }

    fn encode(&mut self, message: &str) -> Result<Outcome> {
        bitio::ensure_encodable_bits(message)?;

        let mut data = parse_bits(message);
        data.resize(data.len() + self.degree() - 1, false);
        let remainder = render(&self.remainder(&data));

        log::debug!(
            "crc(generator={}): {} bits + remainder {remainder}",
            self.generator(),
            message.len()
        );
        Ok(Outcome::clean(format!("{message}{remainder}")))
    }

    fn decode(&mut self, bits: &str) -> Result<Outcome> {
        bitio::ensure_decodable(bits)?;
        let d = self.degree();
        if bits.len() < d {
            return Err(MalformedInputError::TooShort {
                required: d,
                actual: bits.len(),
            }
            .into());
        }

        let remainder = self.remainder(&parse_bits(bits));
        let corrupted = remainder.iter().any(|&b| b);
        let remainder = render(&remainder);
        let payload = &bits[..bits.len() - (d - 1)];

        let output = if corrupted {
            log::warn!("crc: remainder {remainder}, message received with errors");
            format!("{payload}{remainder}")
        } else {
            log::debug!("crc: remainder {remainder}, message received correctly");
            payload.to_string()
        };

        Ok(Outcome::with_diagnostics(
            output,
            vec![Diagnostic::CrcChecked {
                remainder,
                corrupted,
            }],
        ))
    }

    fn validate(&self, message: &str) -> bool {
        bitio::is_bit_string(message)
    }

    fn configure(&mut self, params: &Params) -> Result<()> {
        match params {
            Params::Crc { generator } => {
                self.set_generator(generator)?;
                log::info!("crc: generator = {generator}, degree = {}", self.degree());
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
        Params::Crc {
            generator: self.generator(),
        }
    }
}
