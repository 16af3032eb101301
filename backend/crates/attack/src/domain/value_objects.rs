//! Domain Value Objects

use crate::error::{AttackError, AttackResult};

/// Largest key the simulator accepts, one qubit per bit
pub const MAX_QUBITS: usize = 29;

/// Measurements per submitted circuit
pub const DEFAULT_SHOTS: u32 = 1024;

/// Target key of an attack
///
/// Built from the decoded transport text. Each character is one qubit lane;
/// `'0'` is an unset bit and every other character a set bit. The text is
/// kept verbatim so it can be reported back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    text: String,
    bits: Vec<bool>,
}

impl Key {
    /// Validate the decoded text against the qubit budget
    ///
    /// ## Errors
    /// * `AttackError::EmptyKey` - no characters
    /// * `AttackError::SizeExceeded` - more than [`MAX_QUBITS`] characters
    pub fn parse(text: impl Into<String>) -> AttackResult<Self> {
        let text = text.into();
        let bits: Vec<bool> = text.chars().map(|c| c != '0').collect();

        if bits.is_empty() {
            return Err(AttackError::EmptyKey);
        }
        if bits.len() > MAX_QUBITS {
            return Err(AttackError::SizeExceeded {
                len: bits.len(),
                max: MAX_QUBITS,
            });
        }

        Ok(Self { text, bits })
    }

    /// Number of qubit lanes
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Never true for a parsed key
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bit(&self, lane: usize) -> bool {
        self.bits[lane]
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bits() {
        let key = Key::parse("1010").unwrap();
        assert_eq!(key.len(), 4);
        assert_eq!(key.bits(), &[true, false, true, false]);
        assert_eq!(key.as_str(), "1010");
    }

    #[test]
    fn test_non_zero_characters_are_set_bits() {
        let key = Key::parse("a0").unwrap();
        assert!(key.bit(0));
        assert!(!key.bit(1));
    }

    #[test]
    fn test_budget_boundaries() {
        assert!(Key::parse("1".repeat(MAX_QUBITS)).is_ok());
        assert!(matches!(
            Key::parse("1".repeat(MAX_QUBITS + 1)),
            Err(AttackError::SizeExceeded { len: 30, max: 29 })
        ));
        assert!(matches!(Key::parse(""), Err(AttackError::EmptyKey)));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let key = Key::parse("ñ0").unwrap();
        assert_eq!(key.len(), 2);
    }
}
