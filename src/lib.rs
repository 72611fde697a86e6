pub mod config;
pub mod crypto;
pub mod errors;
pub mod vault;

pub use crypto::MasterKey;
pub use errors::{GhostpassError, Result};
pub use vault::{plainsight_unmarshal, stationary_unmarshal, Field, SecretStore, StoreState};
