//! Vault module — the secret store and its two persistent encodings.
//!
//! This module provides:
//! - `Field` and its derived attributes (`field`)
//! - `SecretStore` and `StoreState` (`store`)
//! - Wire shapes shared by both encodings (`format`)
//! - The stationary codec, local and cheap to rehydrate (`stationary`)
//! - The plainsight codec, exportable and opaque without the key (`plainsight`)
//! - The secret transform seam used by plainsight export (`deniable`)

pub mod deniable;
pub mod field;
pub mod format;
pub mod plainsight;
pub mod stationary;
pub mod store;

// Re-export the most commonly used items.
pub use deniable::{IdentityTransform, SecretTransform};
pub use field::{Credentials, Field, FieldAttributes, MAX_AUTHPAIR_LEN};
pub use format::CURRENT_VERSION;
pub use plainsight::{plainsight_unmarshal, plainsight_unmarshal_with};
pub use stationary::stationary_unmarshal;
pub use store::{SecretStore, StoreState};
