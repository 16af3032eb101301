//! Key Issuing and Text Encoding Use Cases

use platform::codec;

/// Issue a fresh random key of `bits` bits, base64-encoded
pub fn issue_key(bits: usize) -> String {
    let ciphertext = codec::random_encoded_key(bits);
    tracing::info!(ciphertext = %ciphertext, bits, "Issued new key");
    ciphertext
}

/// Encode free text for transport
pub fn encrypt_text(text: &str) -> String {
    let ciphertext = codec::encode_text(text);
    tracing::info!(ciphertext = %ciphertext, "Encoded text");
    ciphertext
}
