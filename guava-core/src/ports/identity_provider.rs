//! Identity provider port - the sign-in round trip

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::Identity;

/// External identity provider (e.g., Google sign-in)
///
/// Implementations perform whatever round trip is needed and return the
/// identity to install in the session.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Provider name (e.g., "demo")
    fn name(&self) -> &str;

    /// Authenticate and return the signed-in identity
    async fn authenticate(&self) -> Result<Identity>;
}
