//! Metrics collection and reporting for codec operations.
//!
//! Tracks what went through a codec and what the decoders had to repair:
//! - Volume (symbols in, bits out, bits in, symbols out)
//! - Expansion (bits per source symbol)
//! - Error handling (corrections, detections, failures by kind)
//! - Timing
//!
//! # Thread Safety
//!
//! `Metrics` is NOT thread-safe. Codec instances are single-threaded, and so
//! is the registry that records into this struct.

use crate::codec::{Diagnostic, Outcome};
use crate::error::Error;
use std::fmt::Write as _;
use std::time::{Duration, Instant};

/// Counters for one codec (or merged across codecs).
#[derive(Debug, Clone)]
pub struct Metrics {
    // === Timing ===
    /// When collection started
    pub start_time: Instant,

    /// When collection ended (set on completion)
    pub end_time: Option<Instant>,

    // === Encoding ===
    /// Successful encode calls
    pub encodes: u64,

    /// Symbols (characters or bits) handed to encode
    pub symbols_in: u64,

    /// Bits produced by encode
    pub bits_out: u64,

    /// Zero bits added by block padding
    pub padding_bits: u64,

    // === Decoding ===
    /// Successful decode calls
    pub decodes: u64,

    /// Bits handed to decode
    pub bits_in: u64,

    /// Symbols produced by decode
    pub symbols_out: u64,

    // === Error handling ===
    /// Bits flipped back by a decoder
    pub corrections: u64,

    /// Corruption reports (corrected or only detected)
    pub detections: u64,

    /// Calls rejected with `InvalidInputError`
    pub invalid_inputs: u64,

    /// Calls rejected with `MalformedInputError`
    pub malformed_inputs: u64,

    /// Decodes aborted with `UncorrectableError`
    pub uncorrectable: u64,

    /// Any other failure (configuration, missing code table)
    pub other_failures: u64,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            encodes: 0,
            symbols_in: 0,
            bits_out: 0,
            padding_bits: 0,
            decodes: 0,
            bits_in: 0,
            symbols_out: 0,
            corrections: 0,
            detections: 0,
            invalid_inputs: 0,
            malformed_inputs: 0,
            uncorrectable: 0,
            other_failures: 0,
        }
    }

    /// Mark collection as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Record a successful encode of `message`.
    pub fn record_encode(&mut self, message: &str, outcome: &Outcome) {
        self.encodes += 1;
        self.symbols_in += message.chars().count() as u64;
        self.bits_out += outcome.output.len() as u64;
        self.record_diagnostics(&outcome.diagnostics);
    }

    /// Record a successful decode of `bits`.
    pub fn record_decode(&mut self, bits: &str, outcome: &Outcome) {
        self.decodes += 1;
        self.bits_in += bits.len() as u64;
        self.symbols_out += outcome.output.chars().count() as u64;
        self.record_diagnostics(&outcome.diagnostics);
    }

    /// Record a failed call.
    pub fn record_failure(&mut self, error: &Error) {
        match error {
            Error::InvalidInput(_) => self.invalid_inputs += 1,
            Error::Malformed(_) => self.malformed_inputs += 1,
            Error::Uncorrectable(_) => self.uncorrectable += 1,
            Error::Config(_) | Error::NoCodeTable | Error::Chain { .. } => self.other_failures += 1,
        }
    }

    fn record_diagnostics(&mut self, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            if let Diagnostic::HammingPadding { zeros } = diagnostic {
                self.padding_bits += *zeros as u64;
            }
            if diagnostic.is_correction() {
                self.corrections += 1;
            }
            if diagnostic.is_error_report() {
                self.detections += 1;
            }
        }
    }

    /// Total failed calls.
    pub fn failures(&self) -> u64 {
        self.invalid_inputs + self.malformed_inputs + self.uncorrectable + self.other_failures
    }

    /// Average encoded bits per input symbol.
    ///
    /// Returns 0.0 if nothing was encoded.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.symbols_in == 0 {
            0.0
        } else {
            self.bits_out as f64 / self.symbols_in as f64
        }
    }

    /// Failed calls / all calls.
    pub fn failure_rate(&self) -> f64 {
        let calls = self.encodes + self.decodes + self.failures();
        if calls == 0 {
            0.0
        } else {
            self.failures() as f64 / calls as f64
        }
    }

    /// Add another set of counters into this one.
    ///
    /// The earlier start time and the later end time win.
    pub fn merge(&mut self, other: &Metrics) {
        self.start_time = self.start_time.min(other.start_time);
        self.end_time = match (self.end_time, other.end_time) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        self.encodes += other.encodes;
        self.symbols_in += other.symbols_in;
        self.bits_out += other.bits_out;
        self.padding_bits += other.padding_bits;
        self.decodes += other.decodes;
        self.bits_in += other.bits_in;
        self.symbols_out += other.symbols_out;
        self.corrections += other.corrections;
        self.detections += other.detections;
        self.invalid_inputs += other.invalid_inputs;
        self.malformed_inputs += other.malformed_inputs;
        self.uncorrectable += other.uncorrectable;
        self.other_failures += other.other_failures;
    }

    /// Human-readable summary, one section per concern.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Codec Summary ===");
        let _ = writeln!(out, "Duration: {} us", self.duration().as_micros());
        let _ = writeln!(out);
        let _ = writeln!(out, "=== Encoding ===");
        let _ = writeln!(out, "Calls: {}", self.encodes);
        let _ = writeln!(out, "Symbols in: {}", self.symbols_in);
        let _ = writeln!(out, "Bits out: {}", self.bits_out);
        let _ = writeln!(out, "Bits/symbol: {:.3}", self.bits_per_symbol());
        let _ = writeln!(out, "Padding bits: {}", self.padding_bits);
        let _ = writeln!(out);
        let _ = writeln!(out, "=== Decoding ===");
        let _ = writeln!(out, "Calls: {}", self.decodes);
        let _ = writeln!(out, "Bits in: {}", self.bits_in);
        let _ = writeln!(out, "Symbols out: {}", self.symbols_out);
        let _ = writeln!(out, "Corrections: {}", self.corrections);
        let _ = writeln!(out, "Detections: {}", self.detections);
        let _ = writeln!(out);
        let _ = writeln!(out, "=== Failures ===");
        let _ = writeln!(out, "Invalid input: {}", self.invalid_inputs);
        let _ = writeln!(out, "Malformed input: {}", self.malformed_inputs);
        let _ = writeln!(out, "Uncorrectable: {}", self.uncorrectable);
        let _ = writeln!(out, "Other: {}", self.other_failures);
        let _ = writeln!(out, "Failure rate: {:.2}%", self.failure_rate() * 100.0);
        out
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_us={}\n\
             encodes={}\n\
             symbols_in={}\n\
             bits_out={}\n\
             bits_per_symbol={:.4}\n\
             padding_bits={}\n\
             decodes={}\n\
             bits_in={}\n\
             symbols_out={}\n\
             corrections={}\n\
             detections={}\n\
             failures={}\n",
            self.duration().as_micros(),
            self.encodes,
            self.symbols_in,
            self.bits_out,
            self.bits_per_symbol(),
            self.padding_bits,
            self.decodes,
            self.bits_in,
            self.symbols_out,
            self.corrections,
            self.detections,
            self.failures(),
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MalformedInputError, UncorrectableError};

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert!(metrics.end_time.is_none());
        assert_eq!(metrics.failures(), 0);
        assert_eq!(metrics.bits_per_symbol(), 0.0);
    }

    #[test]
    fn test_bits_per_symbol() {
        let mut metrics = Metrics::new();
        metrics.record_encode("ab", &Outcome::clean("0101010101".to_string()));
        assert_eq!(metrics.encodes, 1);
        assert_eq!(metrics.bits_per_symbol(), 5.0);
    }

    #[test]
    fn test_diagnostics_are_counted() {
        let mut metrics = Metrics::new();
        let outcome = Outcome::with_diagnostics(
            "1010".to_string(),
            vec![
                Diagnostic::HammingDataCorrected {
                    block: 0,
                    bit: 1,
                    codeword: "1110010".to_string(),
                },
                Diagnostic::HammingParityCorrected {
                    block: 1,
                    bit: 4,
                    codeword: "0000100".to_string(),
                },
            ],
        );
        metrics.record_decode("11100100000100", &outcome);
        assert_eq!(metrics.corrections, 1);
        assert_eq!(metrics.detections, 2);
        assert_eq!(metrics.bits_in, 14);

        metrics.record_encode(
            "101",
            &Outcome::with_diagnostics(
                "1010101".to_string(),
                vec![Diagnostic::HammingPadding { zeros: 1 }],
            ),
        );
        assert_eq!(metrics.padding_bits, 1);
        assert_eq!(metrics.detections, 2);
    }

    #[test]
    fn test_failure_rate() {
        let mut metrics = Metrics::new();
        metrics.record_encode("1", &Outcome::clean("111".to_string()));
        metrics.record_failure(&Error::from(MalformedInputError::Empty));
        metrics.record_failure(&Error::from(UncorrectableError::RepetitionTie {
            segment: 0,
            block: "10".to_string(),
        }));
        metrics.record_failure(&Error::NoCodeTable);
        assert_eq!(metrics.failures(), 3);
        assert_eq!(metrics.failure_rate(), 0.75);
    }

    #[test]
    fn test_merge() {
        let mut a = Metrics::new();
        a.record_encode("x", &Outcome::clean("1".to_string()));
        let mut b = Metrics::new();
        b.record_encode("yz", &Outcome::clean("111".to_string()));
        b.complete();
        a.merge(&b);
        assert_eq!(a.encodes, 2);
        assert_eq!(a.symbols_in, 3);
        assert_eq!(a.bits_out, 4);
        assert!(a.end_time.is_some());
    }

    #[test]
    fn test_export_text() {
        let mut metrics = Metrics::new();
        metrics.record_encode("abc", &Outcome::clean("0".repeat(24)));

        let text = metrics.export_text();
        assert!(text.contains("encodes=1"));
        assert!(text.contains("symbols_in=3"));
        assert!(text.contains("bits_per_symbol=8.0000"));
        assert!(metrics.summary().contains("Bits out: 24"));
    }
}
