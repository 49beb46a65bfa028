//! Attestor client update logic.

use ibc_lite_client_interface::{Height, UpdateResult};

use crate::attestation::HeightAttestation;
use crate::client::AttestorLightClient;
use crate::error::AttestorClientError;
use crate::header::Header;
use crate::verify::verify_attestation;

impl AttestorLightClient {
    /// Verifies an attested (height, timestamp) fact and applies it.
    ///
    /// A conflicting timestamp for a height already on record is proof that
    /// the quorum attested two different histories: the client freezes
    /// permanently and reports misbehaviour.
    ///
    /// # Errors
    /// Fails without mutating state if the client is frozen, the envelope
    /// is malformed, the quorum is not met, a signer is unknown or
    /// duplicated, or the attested fact is malformed.
    pub fn verify_and_update(
        &mut self,
        header_bytes: &[u8],
    ) -> Result<UpdateResult, AttestorClientError> {
        self.ensure_active()?;

        let header: Header = serde_json::from_slice(header_bytes)
            .map_err(AttestorClientError::DeserializeEnvelopeFailed)?;

        verify_attestation(&self.client_state, &header.attestation_data, &header.signatures)?;

        let attested: HeightAttestation = borsh::from_slice(&header.attestation_data)?;
        if attested.height == 0 || attested.timestamp == 0 {
            return Err(AttestorClientError::InvalidHeader {
                reason: "attested height and timestamp must be non-zero".to_string(),
            });
        }

        match self.timestamps.get(&attested.height) {
            Some(&stored) if stored == attested.timestamp => Ok(UpdateResult::NoOp),
            Some(_) => {
                self.client_state.is_frozen = true;
                tracing::warn!(height = attested.height, "conflicting attestation, client frozen");
                Ok(UpdateResult::Misbehaviour)
            }
            None => {
                self.timestamps.insert(attested.height, attested.timestamp);
                if attested.height > self.client_state.latest_height {
                    self.client_state.latest_height = attested.height;
                }
                tracing::info!(height = attested.height, "attestor client updated");
                Ok(UpdateResult::Update(Height::new(0, attested.height)))
            }
        }
    }
}
