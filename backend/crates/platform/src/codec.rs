//! Transport Codec
//!
//! Base64 helpers for keys and free text, plus random key generation.
//! Base64 is an encoding, not encryption: anyone can reverse it.

use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig, general_purpose};
use base64::{Engine, alphabet};
use rand::Rng;

/// Standard alphabet, padding required, non-zero trailing bits ignored
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical),
);

/// Error when a payload cannot be turned back into text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Decoded payload is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Encode bytes as standard base64 (with padding)
pub fn encode(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Encode UTF-8 text as standard base64
pub fn encode_text(text: &str) -> String {
    encode(text.as_bytes())
}

/// Decode standard base64 to bytes
///
/// Characters outside the alphabet (line breaks, spaces, ...) are skipped
/// and non-zero trailing bits are ignored. Padding is still required.
pub fn decode(payload: &str) -> Result<Vec<u8>, CodecError> {
    let cleaned: String = payload
        .chars()
        .filter(|&c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
        .collect();
    Ok(LENIENT.decode(cleaned)?)
}

/// Decode standard base64 to UTF-8 text
///
/// ## Errors
/// * `CodecError::InvalidBase64` - the payload is not base64
/// * `CodecError::InvalidUtf8` - the decoded bytes are not text
pub fn decode_text(payload: &str) -> Result<String, CodecError> {
    Ok(String::from_utf8(decode(payload)?)?)
}

/// Random string of `'0'`/`'1'` characters
pub fn random_bit_string(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| if rng.random::<bool>() { '1' } else { '0' })
        .collect()
}

/// Random bit-string key of `len` bits, already base64-encoded
pub fn random_encoded_key(len: usize) -> String {
    encode_text(&random_bit_string(len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_encoding() {
        assert_eq!(encode_text("1010"), "MTAxMA==");
        assert_eq!(decode_text("MTAxMA==").unwrap(), "1010");
    }

    #[test]
    fn test_invalid_base64_is_rejected() {
        assert!(matches!(
            decode_text("not base64!!"),
            Err(CodecError::InvalidBase64(_))
        ));
        assert!(matches!(
            decode_text("MTAxMA"),
            Err(CodecError::InvalidBase64(_))
        ));
    }

    #[test]
    fn test_skips_characters_outside_alphabet() {
        assert_eq!(decode_text("MTAx\nMA==").unwrap(), "1010");
        assert_eq!(decode_text("MTAx MA==").unwrap(), "1010");
        assert_eq!(decode_text("MTAx\r\nMA==\n").unwrap(), "1010");
    }

    #[test]
    fn test_ignores_trailing_bits() {
        assert_eq!(decode_text("MTAxMB==").unwrap(), "1010");
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let payload = encode(&[0xff, 0xfe, 0xfd]);
        assert!(matches!(
            decode_text(&payload),
            Err(CodecError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn test_random_bit_string_shape() {
        let key = random_bit_string(29);
        assert_eq!(key.len(), 29);
        assert!(key.chars().all(|c| c == '0' || c == '1'));
    }

    #[test]
    fn test_random_encoded_key_decodes_to_bits() {
        let key = decode_text(&random_encoded_key(29)).unwrap();
        assert_eq!(key.len(), 29);
    }

    proptest! {
        #[test]
        fn prop_text_roundtrip(text in ".*") {
            prop_assert_eq!(decode_text(&encode_text(&text)).unwrap(), text);
        }

        #[test]
        fn prop_bit_string_roundtrip(bits in "[01]{1,40}") {
            prop_assert_eq!(decode_text(&encode_text(&bits)).unwrap(), bits);
        }
    }
}
