//! Integration tests across codecs, the registry and the noisy channel.
//!
//! These tests verify end-to-end behavior: message -> source code -> FEC
//! code -> channel -> FEC decode -> source decode, with verification that
//! the output matches the input.

use bitcodec_core::{
    channel::{flip_at, ChannelConfig, NoisyChannel},
    codec::{Codec, CodecKind, Diagnostic, Family, Operation, Params},
    ascii::Ascii,
    crc::Crc,
    elias_gamma::EliasGamma,
    error::{Error, InvalidInputError, MalformedInputError},
    huffman::Huffman,
    registry::{Registry, Step},
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn random_text(rng: &mut ChaCha8Rng, len: usize, max_code_point: u32) -> String {
    let mut text = String::with_capacity(len);
    while text.chars().count() < len {
        if let Some(c) = char::from_u32(rng.gen_range(1..=max_code_point)) {
            text.push(c);
        }
    }
    text
}

fn random_bits(rng: &mut ChaCha8Rng, len: usize) -> String {
    (0..len).map(|_| if rng.gen::<bool>() { '1' } else { '0' }).collect()
}

/// Every source codec decodes what it encoded, for seeded random text.
#[test]
fn test_source_codecs_round_trip() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut registry = Registry::new();

    for kind in CodecKind::ALL.into_iter().filter(|k| k.family() == Family::Source) {
        let max_code_point = if kind == CodecKind::Ascii { 0xFF } else { 0x7FF };
        for len in [1, 2, 17, 200] {
            let message = random_text(&mut rng, len, max_code_point);
            let encoded = registry.encode(kind, &message).expect("encode failed");
            assert!(encoded.output.bytes().all(|b| b == b'0' || b == b'1'));
            let decoded = registry.decode(kind, &encoded.output).expect("decode failed");
            assert_eq!(decoded.output, message, "{kind} round trip");
        }
    }
}

/// Golomb round trips for divisors that are and are not powers of two.
#[test]
fn test_golomb_parameters() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut registry = Registry::new();
    let message = random_text(&mut rng, 50, 0x24F);

    for k in [1, 2, 3, 10, 64, 1000] {
        registry
            .configure(CodecKind::Golomb, &Params::Golomb { k })
            .unwrap();
        let encoded = registry.encode(CodecKind::Golomb, &message).unwrap().output;
        let decoded = registry.decode(CodecKind::Golomb, &encoded).unwrap().output;
        assert_eq!(decoded, message, "k = {k}");
    }

    assert!(registry
        .configure(CodecKind::Golomb, &Params::Golomb { k: 0 })
        .is_err());
    assert_eq!(
        registry.get(CodecKind::Golomb).params(),
        Params::Golomb { k: 1000 }
    );
}

/// Elias-Gamma codeword for v is 2 * floor(log2 v) + 1 bits long.
#[test]
fn test_elias_gamma_codeword_lengths() {
    let mut codec = EliasGamma::new();
    for c in ['\u{1}', '\u{2}', '\u{7}', 'A', 'é', '\u{FFFF}'] {
        let v = u32::from(c);
        let n = 31 - v.leading_zeros();
        assert_eq!(
            codec.encode(&c.to_string()).unwrap().output.len(),
            (2 * n + 1) as usize,
            "{c:?}"
        );
    }
}

/// Code point 0 is rejected by both universal codes that cannot represent it.
#[test]
fn test_zero_code_point_rejected() {
    let mut registry = Registry::new();
    for kind in [CodecKind::EliasGamma, CodecKind::Fibonacci] {
        assert!(!registry.validate(kind, "a\0b"));
        assert!(matches!(
            registry.encode(kind, "a\0b"),
            Err(Error::InvalidInput(InvalidInputError::Unrepresentable { position: 1, .. }))
        ));
    }
    // Golomb can carry it.
    let encoded = registry.encode(CodecKind::Golomb, "a\0b").unwrap().output;
    assert_eq!(registry.decode(CodecKind::Golomb, &encoded).unwrap().output, "a\0b");
}

/// Huffman is never worse than a fixed-length code over the same alphabet.
#[test]
fn test_huffman_beats_fixed_length() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let mut huffman = Huffman::new();
    let mut ascii = Ascii::new();

    for _ in 0..10 {
        let message = random_text(&mut rng, 300, 0x60);
        let encoded = huffman.encode(&message).unwrap().output;

        let distinct = huffman.code_table().len();
        let fixed_width = (usize::BITS - (distinct - 1).leading_zeros()).max(1) as usize;
        assert!(encoded.len() <= fixed_width * message.chars().count());
        assert!(encoded.len() <= ascii.encode(&message).unwrap().output.len());
        assert!(huffman.code_table().is_prefix_free());
    }
}

/// Every FEC codec decodes a clean codeword back to its input.
#[test]
fn test_fec_codecs_round_trip() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let mut registry = Registry::new();

    for kind in CodecKind::ALL
        .into_iter()
        .filter(|k| k.family() == Family::ErrorCorrection)
    {
        for len in [4, 8, 28, 64] {
            let bits = random_bits(&mut rng, len);
            let encoded = registry.encode(kind, &bits).unwrap();
            let decoded = registry.decode(kind, &encoded.output).unwrap();
            assert_eq!(decoded.output, bits, "{kind}");
            assert!(decoded.is_clean());
        }
    }
}

/// Repetition(3) and Hamming(7,4) repair one flipped bit per block.
#[test]
fn test_single_flip_per_block_is_repaired() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut registry = Registry::new();
    let mut channel = NoisyChannel::new(ChannelConfig::perfect(5)).unwrap();

    for (kind, block) in [(CodecKind::Repetition, 3), (CodecKind::Hamming74, 7)] {
        let bits = random_bits(&mut rng, 64);
        let encoded = registry.encode(kind, &bits).unwrap().output;
        let received = channel.transmit_one_flip_per_block(&encoded, block).unwrap();
        assert_ne!(received, encoded);

        let decoded = registry.decode(kind, &received).unwrap();
        assert_eq!(decoded.output, bits, "{kind}");
        assert_eq!(decoded.diagnostics.len(), encoded.len() / block);
    }

    let stats = channel.stats();
    assert_eq!(stats.bits_flipped, 64 + 16);
}

/// CRC detects every single-bit error and burst errors up to its degree.
#[test]
fn test_crc_detects_channel_errors() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut crc = Crc::new("1011").unwrap();
    let payload = random_bits(&mut rng, 40);
    let codeword = crc.encode(&payload).unwrap().output;
    assert_eq!(codeword.len(), 43);

    for i in 0..codeword.len() {
        let received = flip_at(&codeword, &[i]).unwrap();
        assert!(!crc.decode(&received).unwrap().is_clean(), "flip at {i}");
    }
    for start in 0..codeword.len() - 3 {
        let received = flip_at(&codeword, &[start, start + 2]).unwrap();
        assert!(!crc.decode(&received).unwrap().is_clean(), "burst at {start}");
    }
}

/// Text -> Golomb -> Hamming -> noisy channel -> Hamming -> Golomb.
#[test]
fn test_full_pipeline_with_noise() {
    let mut rng = ChaCha8Rng::seed_from_u64(12345);
    let mut registry = Registry::new();
    let mut channel = NoisyChannel::new(ChannelConfig::perfect(12345)).unwrap();

    // 'A'..='z' all take 8 Golomb bits with k = 64: no Hamming padding.
    let message: String = (0..64).map(|_| char::from(rng.gen_range(b'A'..=b'z'))).collect();

    let encode = Step::parse_list("golomb:encode,hamming74:encode").unwrap();
    let sent = registry.chain(&message, &encode).unwrap();
    let codeword = sent.output().unwrap();
    assert_eq!(codeword.len(), 64 * 8 / 4 * 7);

    let received = channel.transmit_one_flip_per_block(codeword, 7).unwrap();

    let decode = Step::parse_list("hamming74:decode,golomb:decode").unwrap();
    let report = registry.chain(&received, &decode).unwrap();
    assert_eq!(report.output(), Some(message.as_str()));

    let metrics = registry.metrics(CodecKind::Hamming74);
    assert_eq!(metrics.detections, (codeword.len() / 7) as u64);
    assert!(metrics.corrections > 0);
    assert_eq!(registry.total_metrics().failures(), 0);
}

/// Hamming padding must be stripped before handing bits to a source decoder.
#[test]
fn test_hamming_padding_in_pipeline() {
    let mut registry = Registry::new();
    // Elias-Gamma of 'A' is 13 bits: 3 bits of padding.
    let source = registry.encode(CodecKind::EliasGamma, "A").unwrap().output;
    let protected = registry.encode(CodecKind::Hamming74, &source).unwrap();
    assert_eq!(
        protected.diagnostics,
        vec![Diagnostic::HammingPadding { zeros: 3 }]
    );

    let mut bits = registry
        .decode(CodecKind::Hamming74, &protected.output)
        .unwrap()
        .output;
    assert!(registry.decode(CodecKind::EliasGamma, &bits).is_err());

    bits.truncate(bits.len() - 3);
    assert_eq!(registry.decode(CodecKind::EliasGamma, &bits).unwrap().output, "A");
}

/// Noise beyond the code's strength surfaces as an error or wrong output, never a panic.
#[test]
fn test_heavy_noise_does_not_panic() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut registry = Registry::new();
    let mut channel = NoisyChannel::new(ChannelConfig::with_flip_rate(0.3, 3)).unwrap();

    for kind in CodecKind::ALL {
        let message = match kind.family() {
            Family::Source => random_text(&mut rng, 40, 0x7F),
            Family::ErrorCorrection => random_bits(&mut rng, 40),
        };
        let encoded = registry.encode(kind, &message).unwrap().output;
        let received = channel.transmit(&encoded).unwrap();
        let _ = registry.decode(kind, &received);
    }

    assert!(channel.stats().bits_flipped > 0);
}

/// Malformed bit strings are rejected the same way by every codec.
#[test]
fn test_malformed_input_everywhere() {
    let mut registry = Registry::new();
    registry.encode(CodecKind::Huffman, "ab").unwrap();

    for kind in CodecKind::ALL {
        assert!(matches!(
            registry.decode(kind, ""),
            Err(Error::Malformed(MalformedInputError::Empty))
        ));
        assert!(matches!(
            registry.decode(kind, "01a1"),
            Err(Error::Malformed(MalformedInputError::NonBinary { position: 2, found: 'a' }))
        ));
        assert!(matches!(
            registry.encode(kind, ""),
            Err(Error::InvalidInput(InvalidInputError::Empty))
        ));
    }

    let steps = [Step::new(CodecKind::Crc, Operation::Decode)];
    assert!(matches!(
        registry.chain("10", &steps),
        Err(Error::Chain { step: 0, .. })
    ));
}
