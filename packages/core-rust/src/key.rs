//! Component key generation.
//!
//! Every rendered field carries a component key the client uses to identify
//! it. Key settings are passed explicitly to the code that freezes fields;
//! there is no process-wide default.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Length of an encrypted key in hex characters.
const CRYPT_KEY_LEN: usize = 32;

/// How component keys are derived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyConfig {
    /// Key used for fields that have neither an explicit key nor a name.
    pub default_key: Option<String>,
    /// Replace every key by a digest so field names are not exposed.
    pub crypt: bool,
}

impl KeyConfig {
    /// Derives a component key.
    ///
    /// Source order: `explicit`, then `name`, then `default_key`, then a fresh
    /// random UUID. Empty strings are skipped.
    #[must_use]
    pub fn make_key(&self, explicit: Option<&str>, name: &str) -> String {
        let base = explicit
            .filter(|k| !k.is_empty())
            .or_else(|| Some(name).filter(|n| !n.is_empty()))
            .or_else(|| self.default_key.as_deref().filter(|k| !k.is_empty()))
            .map_or_else(|| uuid::Uuid::new_v4().simple().to_string(), str::to_string);

        if self.crypt {
            crypt_key(&base)
        } else {
            base
        }
    }
}

/// First 32 hex characters of the SHA-256 digest of `key`.
#[must_use]
pub fn crypt_key(key: &str) -> String {
    let mut digest = hex::encode(Sha256::digest(key.as_bytes()));
    digest.truncate(CRYPT_KEY_LEN);
    digest
}
