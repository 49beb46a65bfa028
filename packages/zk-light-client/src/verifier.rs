//! The succinct-proof backend seam.

use thiserror::Error;

/// Failure of the underlying proof system.
#[derive(Error, Debug)]
#[error("invalid proof for program {vkey}")]
pub struct ProofVerifyError {
    /// Hex of the program key the proof was checked against
    pub vkey: String,
}

impl ProofVerifyError {
    /// Creates an error for the given program key.
    #[must_use]
    pub fn new(vkey: &[u8; 32]) -> Self {
        Self {
            vkey: hex::encode(vkey),
        }
    }
}

/// Verifies succinct proofs against a program's verification key and its
/// committed public values. Verification is pure computation over the
/// supplied bytes; implementations must not block.
pub trait ProofVerifier {
    /// Checks that `proof` attests a correct execution of the program
    /// identified by `vkey` committing exactly `public_values`.
    ///
    /// # Errors
    /// Returns [`ProofVerifyError`] if the proof is invalid.
    fn verify(
        &self,
        vkey: &[u8; 32],
        public_values: &[u8],
        proof: &[u8],
    ) -> Result<(), ProofVerifyError>;
}
