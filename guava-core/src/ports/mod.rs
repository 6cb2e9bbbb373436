//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod identity_provider;
mod key_value;

pub use identity_provider::IdentityProvider;
pub use key_value::{load_json, store_json, KeyValueStore};
