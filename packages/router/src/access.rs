//! Submitter gating for proof-carrying operations.

use std::collections::BTreeSet;

use crate::error::RouterError;

/// An allow-list of identities permitted to submit proofs, with an
/// "open to anyone" escape. Gates entry to the verification algorithms; it
/// is not part of them.
#[derive(Debug, Clone, Default)]
pub struct AccessController {
    public: bool,
    allowed: BTreeSet<String>,
}

impl AccessController {
    /// A controller that admits every submitter.
    #[must_use]
    pub fn allow_anyone() -> Self {
        Self {
            public: true,
            allowed: BTreeSet::new(),
        }
    }

    /// A controller admitting only the given submitters.
    pub fn with_allowed<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            public: false,
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    /// Adds a submitter to the allow-list.
    pub fn grant(&mut self, submitter: impl Into<String>) {
        self.allowed.insert(submitter.into());
    }

    /// Removes a submitter from the allow-list.
    pub fn revoke(&mut self, submitter: &str) {
        self.allowed.remove(submitter);
    }

    /// Checks whether `submitter` may enter a gated operation.
    ///
    /// # Errors
    /// Returns [`RouterError::UnauthorizedSender`] if the submitter is not
    /// admitted.
    pub fn authorize(&self, submitter: &str) -> Result<(), RouterError> {
        if self.public || self.allowed.contains(submitter) {
            return Ok(());
        }
        Err(RouterError::UnauthorizedSender)
    }
}
