//! Bit-string I/O utilities shared by every codec.
//!
//! Bit sequences are text made of the two symbols `'0'` and `'1'`, written
//! MSB-first. [`BitWriter`] appends fixed-width fields and unary runs;
//! [`BitReader`] is a cursor that reads them back and reports truncation
//! with the bit position where the input ran out.
//!
//! # Example
//! ```
//! use bitcodec_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_unary(2);        // 001
//! writer.write_bits(0b101, 3);  // 101
//! let bits = writer.finish();
//! assert_eq!(bits, "001101");
//!
//! let mut reader = BitReader::new(&bits).unwrap();
//! assert_eq!(reader.read_unary().unwrap(), 2);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert!(reader.is_empty());
//! ```

use crate::error::{InvalidInputError, MalformedInputError, Result};

/// Return the position and character of the first non-binary symbol.
pub fn find_non_binary(bits: &str) -> Option<(usize, char)> {
    bits.chars()
        .enumerate()
        .find(|&(_, c)| c != '0' && c != '1')
}

/// Check that a bit string handed to `decode` is non-empty and binary.
pub fn ensure_decodable(bits: &str) -> Result<()> {
    if bits.is_empty() {
        return Err(MalformedInputError::Empty.into());
    }
    if let Some((position, found)) = find_non_binary(bits) {
        return Err(MalformedInputError::NonBinary { position, found }.into());
    }
    Ok(())
}

/// Check that a bit string handed to an FEC `encode` is non-empty and binary.
pub fn ensure_encodable_bits(bits: &str) -> Result<()> {
    if bits.is_empty() {
        return Err(InvalidInputError::Empty.into());
    }
    if let Some((position, found)) = find_non_binary(bits) {
        return Err(InvalidInputError::NonBinary { position, found }.into());
    }
    Ok(())
}

/// `true` when `bits` is non-empty and contains only `'0'`/`'1'`.
pub fn is_bit_string(bits: &str) -> bool {
    !bits.is_empty() && find_non_binary(bits).is_none()
}

/// `ceil(log2(k))` for `k >= 1`.
pub fn ceil_log2(k: u64) -> usize {
    debug_assert!(k > 0);
    if k <= 1 {
        0
    } else {
        (u64::BITS - (k - 1).leading_zeros()) as usize
    }
}

/// `floor(log2(v))` for `v >= 1`.
pub fn floor_log2(v: u64) -> usize {
    debug_assert!(v > 0);
    (u64::BITS - 1 - v.leading_zeros()) as usize
}

/// Render `sequence` with the symbol at `index` wrapped as `>x<`.
///
/// `highlight("0110", 2)` is `"01>1<0"`. Indices out of range or off a
/// character boundary return the sequence unchanged.
pub fn highlight(sequence: &str, index: usize) -> String {
    let parts = index.checked_add(1).and_then(|end| {
        Some((
            sequence.get(..index)?,
            sequence.get(index..end)?,
            sequence.get(end..)?,
        ))
    });
    match parts {
        Some((before, bit, after)) => format!("{before}>{bit}<{after}"),
        None => sequence.to_string(),
    }
}

/// Appends bits MSB-first to a bit string.
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    bits: String,
}

impl BitWriter {
    /// Create a new BitWriter with empty output.
    pub fn new() -> Self {
        Self {
            bits: String::new(),
        }
    }

    /// Create a writer with room for `bits` symbols.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bits: String::with_capacity(bits),
        }
    }

    /// Write a single bit.
    pub fn write_bit(&mut self, bit: bool) {
        self.bits.push(if bit { '1' } else { '0' });
    }

    /// Write the lowest `count` bits of `value`, MSB-first.
    ///
    /// For example, `write_bits(0b101, 3)` writes `1`, `0`, `1`. A `count`
    /// above 64 writes leading zeros first.
    pub fn write_bits(&mut self, value: u64, count: usize) {
        for i in (0..count).rev() {
            let bit = i < 64 && (value >> i) & 1 == 1;
            self.write_bit(bit);
        }
    }

    /// Write `run` zero bits followed by a `1` stop bit.
    pub fn write_unary(&mut self, run: usize) {
        self.bits.extend(std::iter::repeat('0').take(run));
        self.bits.push('1');
    }

    /// Write `count` copies of `bit`.
    pub fn write_run(&mut self, bit: bool, count: usize) {
        let symbol = if bit { '1' } else { '0' };
        self.bits.extend(std::iter::repeat(symbol).take(count));
    }

    /// Return the total number of bits written.
    pub fn bit_len(&self) -> usize {
        self.bits.len()
    }

    /// Finish writing and return the bit string.
    pub fn finish(self) -> String {
        self.bits
    }
}

/// Reads bits MSB-first from a validated bit string.
///
/// # Invariants
/// - the underlying slice only contains `b'0'` and `b'1'`
/// - `position` never exceeds the slice length
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader over `bits`, rejecting empty or non-binary input.
    pub fn new(bits: &'a str) -> Result<Self> {
        ensure_decodable(bits)?;
        Ok(Self {
            data: bits.as_bytes(),
            position: 0,
        })
    }

    /// Read one bit, or `None` at the end of input.
    pub fn next_bit(&mut self) -> Option<bool> {
        let byte = *self.data.get(self.position)?;
        self.position += 1;
        Some(byte == b'1')
    }

    /// Read `count` bits (at most 64) as an unsigned integer.
    ///
    /// # Errors
    /// `MalformedInputError::Truncated` if fewer than `count` bits remain.
    /// The cursor is left unchanged on error.
    pub fn read_bits(&mut self, count: usize) -> Result<u64> {
        debug_assert!(count <= 64);
        let available = self.bits_remaining();
        if count > available {
            return Err(MalformedInputError::Truncated {
                at: self.data.len(),
                needed: count - available,
            }
            .into());
        }

        let value = self.data[self.position..self.position + count]
            .iter()
            .fold(0u64, |acc, &b| (acc << 1) | u64::from(b == b'1'));
        self.position += count;
        Ok(value)
    }

    /// Count a run of `0` bits and consume the `1` stop bit that ends it.
    ///
    /// # Errors
    /// `MalformedInputError::Truncated` if the input ends before a stop bit.
    pub fn read_unary(&mut self) -> Result<usize> {
        let mut run = 0;
        loop {
            match self.next_bit() {
                Some(true) => return Ok(run),
                Some(false) => run += 1,
                None => {
                    return Err(MalformedInputError::Truncated {
                        at: self.position,
                        needed: 1,
                    }
                    .into())
                }
            }
        }
    }

    /// Return the number of bits remaining.
    pub fn bits_remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Return the current bit position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Check if we're at the end of the input.
    pub fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }
}
