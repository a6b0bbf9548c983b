//! Cache key derivation.
//!
//! Text is keyed on the exact input plus the translation mode, so quick
//! and advanced translations of the same text never share a slot. Binary
//! content (images, audio, video) is keyed on a SHA-256 digest of the
//! encoded payload, so identical bytes hit regardless of where they came
//! from.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::service::TranslationMode;

/// Key for the text cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextKey {
    text: String,
    mode: TranslationMode,
}

impl TextKey {
    pub fn new(text: impl Into<String>, mode: TranslationMode) -> Self {
        Self {
            text: text.into(),
            mode,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn mode(&self) -> TranslationMode {
        self.mode
    }
}

/// SHA-256 digest of an encoded payload, used as the image/media cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash the encoded (base64) form of a payload.
    pub fn of(encoded: &str) -> Self {
        Self(Sha256::digest(encoded.as_bytes()).into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_key_differs_on_mode() {
        let quick = TextKey::new("hello", TranslationMode::Quick);
        let advanced = TextKey::new("hello", TranslationMode::Advanced);
        assert_ne!(quick, advanced);
    }

    #[test]
    fn text_key_is_exact() {
        assert_ne!(
            TextKey::new("hello", TranslationMode::Quick),
            TextKey::new("hello ", TranslationMode::Quick)
        );
    }

    #[test]
    fn content_hash_deterministic() {
        assert_eq!(ContentHash::of("aGVsbG8="), ContentHash::of("aGVsbG8="));
        assert_ne!(ContentHash::of("aGVsbG8="), ContentHash::of("d29ybGQ="));
    }

    #[test]
    fn content_hash_hex_matches_sha256() {
        // sha256("abc")
        assert_eq!(
            ContentHash::of("abc").to_string(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
