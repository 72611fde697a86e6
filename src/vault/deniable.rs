//! Transform applied to secret bytes on their way into a plainsight blob.
//!
//! Deniable padding will plug in here.  Until it exists the codecs use
//! `IdentityTransform`, which stores AuthPairs verbatim.

use crate::errors::Result;

/// A reversible transform over the secret bytes of one field.
///
/// `apply` runs during plainsight encode and `invert` during decode; for
/// any service and secret, `invert(service, apply(service, secret))` must
/// return the original secret.
pub trait SecretTransform: Send + Sync {
    fn apply(&self, service: &str, secret: &[u8]) -> Result<Vec<u8>>;

    fn invert(&self, service: &str, stored: Vec<u8>) -> Result<Vec<u8>>;
}

/// Stores secrets unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityTransform;

impl SecretTransform for IdentityTransform {
    fn apply(&self, _service: &str, secret: &[u8]) -> Result<Vec<u8>> {
        Ok(secret.to_vec())
    }

    fn invert(&self, _service: &str, stored: Vec<u8>) -> Result<Vec<u8>> {
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_a_no_op_both_ways() {
        let t = IdentityTransform;
        let applied = t.apply("github", b"user:tok").unwrap();
        assert_eq!(applied, b"user:tok");
        assert_eq!(t.invert("github", applied).unwrap(), b"user:tok");
    }
}
