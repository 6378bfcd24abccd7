//! Fixed-width 8-bit code.
//!
//! Every symbol becomes its code point as exactly 8 bits, MSB first. Only
//! U+0000 through U+00FF fit. It is the uncompressed baseline the variable
//! length codes are measured against.

use crate::bitio::{BitReader, BitWriter};
use crate::codec::{self, Codec, CodecKind, Outcome};
use crate::error::{InvalidInputError, MalformedInputError, Result};

/// Bits per symbol.
pub const SYMBOL_BITS: usize = 8;

const MAX_SYMBOL: u32 = (1 << SYMBOL_BITS) - 1;

#[derive(Debug, Clone, Copy, Default)]
pub struct Ascii;

impl Ascii {
    pub fn new() -> Self {
        Self
    }
}

impl Codec for Ascii {
    fn kind(&self) -> CodecKind {
        CodecKind::Ascii
    }

    fn encode(&mut self, message: &str) -> Result<Outcome> {
        codec::ensure_encodable_text(self.kind(), message, false)?;
        if let Some((position, symbol)) = message
            .chars()
            .enumerate()
            .find(|&(_, c)| u32::from(c) > MAX_SYMBOL)
        {
            return Err(InvalidInputError::Unrepresentable {
                codec: self.name(),
                symbol,
                code: u32::from(symbol),
                position,
            }
            .into());
        }

        let mut writer = BitWriter::with_capacity(message.len().saturating_mul(SYMBOL_BITS));
        for c in message.chars() {
            writer.write_bits(u64::from(u32::from(c)), SYMBOL_BITS);
        }
        log::debug!(
            "ascii: {} symbols -> {} bits",
            message.chars().count(),
            writer.bit_len()
        );
        Ok(Outcome::clean(writer.finish()))
    }

    fn decode(&mut self, bits: &str) -> Result<Outcome> {
        let mut reader = BitReader::new(bits)?;
        if bits.len() % SYMBOL_BITS != 0 {
            return Err(MalformedInputError::LengthNotMultiple {
                len: bits.len(),
                block: SYMBOL_BITS,
            }
            .into());
        }

        let mut decoded = String::with_capacity(bits.len() / SYMBOL_BITS);
        while !reader.is_empty() {
            let start = reader.position();
            decoded.push(codec::code_point(reader.read_bits(SYMBOL_BITS)?, start)?);
        }
        log::debug!("ascii: {} bits -> {} symbols", bits.len(), decoded.chars().count());
        Ok(Outcome::clean(decoded))
    }

    fn validate(&self, message: &str) -> bool {
        !message.is_empty() && message.chars().all(|c| u32::from(c) <= MAX_SYMBOL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_known_codewords() {
        let mut ascii = Ascii::new();
        assert_eq!(ascii.encode("A").unwrap().output, "01000001");
        assert_eq!(ascii.encode("Hi").unwrap().output, "0100100001101001");
        assert_eq!(ascii.encode("\0ÿ").unwrap().output, "0000000011111111");
    }

    #[test]
    fn test_round_trip_latin1() {
        let mut ascii = Ascii::new();
        let message = "Grüße, señor!";
        let encoded = ascii.encode(message).unwrap().output;
        assert_eq!(encoded.len(), message.chars().count() * SYMBOL_BITS);
        assert_eq!(ascii.decode(&encoded).unwrap().output, message);
    }

    #[test]
    fn test_wide_code_point_rejected() {
        let mut ascii = Ascii::new();
        assert!(!ascii.validate("λx"));
        assert!(ascii.validate("é"));
        assert!(matches!(
            ascii.encode("abλ"),
            Err(Error::InvalidInput(InvalidInputError::Unrepresentable {
                symbol: 'λ',
                code: 0x3BB,
                position: 2,
                ..
            }))
        ));
    }

    #[test]
    fn test_length_must_be_whole_bytes() {
        let mut ascii = Ascii::new();
        assert!(matches!(
            ascii.decode("0100000"),
            Err(Error::Malformed(MalformedInputError::LengthNotMultiple { len: 7, block: 8 }))
        ));
    }

    #[test]
    fn test_non_binary_reported_before_length() {
        let mut ascii = Ascii::new();
        assert!(matches!(
            ascii.decode("01a"),
            Err(Error::Malformed(MalformedInputError::NonBinary { position: 2, found: 'a' }))
        ));
    }
}
