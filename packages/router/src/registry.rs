//! The client registry: identifier allocation and counterparty metadata.

use std::collections::BTreeMap;

use ibc_lite_client_interface::LightClient;

use crate::error::RouterError;

/// Routing metadata for the counterparty side of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterpartyInfo {
    /// Client identifier on the counterparty ledger
    pub client_id: String,
    /// Merkle prefix prepended to proof paths
    pub merkle_prefix: Vec<Vec<u8>>,
}

/// A registered light client instance with its routing metadata.
pub struct ClientRecord {
    /// The light client instance; the registry never interprets its
    /// message payloads.
    pub client: Box<dyn LightClient>,
    /// Counterparty routing metadata
    pub counterparty_info: CounterpartyInfo,
    /// Whether the client accepts operations
    pub active: bool,
}

/// Maps client identifiers to light client instances. Identifiers are
/// `"{client_type}-{n}"` with a monotone per-type counter; never reused.
#[derive(Default)]
pub struct ClientRegistry {
    clients: BTreeMap<String, ClientRecord>,
    type_counters: BTreeMap<String, u64>,
}

impl ClientRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a client instance and allocates its identifier.
    ///
    /// # Errors
    /// Returns [`RouterError::InvalidCounterpartyInfo`] if the counterparty
    /// client id or merkle prefix is empty.
    pub fn register(
        &mut self,
        counterparty_info: CounterpartyInfo,
        client: Box<dyn LightClient>,
    ) -> Result<String, RouterError> {
        if counterparty_info.client_id.is_empty() {
            return Err(RouterError::InvalidCounterpartyInfo {
                reason: "empty counterparty client id",
            });
        }
        if counterparty_info.merkle_prefix.is_empty() {
            return Err(RouterError::InvalidCounterpartyInfo {
                reason: "empty merkle prefix",
            });
        }

        let client_type = client.client_type();
        let counter = self.type_counters.entry(client_type.to_string()).or_insert(0);
        let client_id = format!("{client_type}-{counter}");
        *counter += 1;

        self.clients.insert(
            client_id.clone(),
            ClientRecord {
                client,
                counterparty_info,
                active: true,
            },
        );

        Ok(client_id)
    }

    /// Looks up a client record.
    ///
    /// # Errors
    /// Returns [`RouterError::ClientNotFound`] if absent.
    pub fn record(&self, client_id: &str) -> Result<&ClientRecord, RouterError> {
        self.clients
            .get(client_id)
            .ok_or_else(|| RouterError::ClientNotFound {
                client_id: client_id.to_string(),
            })
    }

    /// Looks up a client record mutably.
    ///
    /// # Errors
    /// Returns [`RouterError::ClientNotFound`] if absent.
    pub fn record_mut(&mut self, client_id: &str) -> Result<&mut ClientRecord, RouterError> {
        self.clients
            .get_mut(client_id)
            .ok_or_else(|| RouterError::ClientNotFound {
                client_id: client_id.to_string(),
            })
    }

    /// Looks up a record and checks it is active.
    ///
    /// # Errors
    /// Returns [`RouterError::ClientNotFound`] if absent and
    /// [`RouterError::ClientNotActive`] if deactivated.
    pub fn active_record_mut(&mut self, client_id: &str) -> Result<&mut ClientRecord, RouterError> {
        let record = self.record_mut(client_id)?;
        if !record.active {
            return Err(RouterError::ClientNotActive);
        }
        Ok(record)
    }

    /// The counterparty metadata of a client.
    ///
    /// # Errors
    /// Returns [`RouterError::ClientNotFound`] if absent.
    pub fn counterparty(&self, client_id: &str) -> Result<&CounterpartyInfo, RouterError> {
        Ok(&self.record(client_id)?.counterparty_info)
    }

    /// Activates or deactivates a client.
    ///
    /// # Errors
    /// Returns [`RouterError::ClientNotFound`] if absent.
    pub fn set_active(&mut self, client_id: &str, active: bool) -> Result<(), RouterError> {
        self.record_mut(client_id)?.active = active;
        Ok(())
    }
}
