//! Allowlist of tag identifiers permitted through the checkpoint
//!
//! Entries are only ever added; there is no revocation.

use checkpoint_common::{Identifier, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::storage::AllowlistRepository;

/// Allowlist operations on top of a repository
#[derive(Clone)]
pub struct Allowlist {
    repo: Arc<dyn AllowlistRepository>,
}

impl Allowlist {
    pub fn new(repo: Arc<dyn AllowlistRepository>) -> Self {
        Self { repo }
    }

    /// Register a raw identifier and return the canonical value stored
    ///
    /// Fails with `InvalidIdentifier` if the normalized input is shorter
    /// than a full tag identifier. Registering an existing entry succeeds.
    pub async fn register(&self, raw: &str) -> Result<Identifier> {
        let uid = Identifier::parse_canonical(raw)?;

        if self.repo.insert(&uid).await? {
            info!("Added identifier to allowlist: {}", uid);
        } else {
            debug!("Identifier already allowlisted: {}", uid);
        }

        Ok(uid)
    }

    /// Check a normalized identifier against the allowlist
    ///
    /// Short or malformed identifiers (see [`Identifier::normalize`]) simply
    /// never match.
    pub async fn is_allowed(&self, uid: &Identifier) -> Result<bool> {
        self.repo.contains(uid).await
    }

    /// Number of allowlisted identifiers
    pub async fn len(&self) -> Result<usize> {
        self.repo.count_allowed().await
    }
}
