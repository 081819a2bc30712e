use std::sync::Arc;

use odo_store::{IndexStore, Ledger, LedgerRepository, Transaction};
use odo_types::Reading;
use tracing::{info, warn};

use crate::config::RegistryConfig;
use crate::error::{RegistryError, RegistryResult};
use crate::operation::Operation;
use crate::service::RegistryService;
use crate::validator::UpdateValidator;

type InvocationService<'a> = RegistryService<'a, LedgerRepository<Transaction<'a>>>;

/// A reading registry hosted on a ledger.
///
/// Each call is one invocation: it begins a transaction, runs the
/// operation, and commits every staged write together on success. On error
/// the transaction is dropped and nothing reaches the ledger.
pub struct Registry {
    ledger: Arc<dyn Ledger>,
    config: RegistryConfig,
    validator: UpdateValidator,
}

impl Registry {
    pub fn new(ledger: Arc<dyn Ledger>, config: RegistryConfig) -> Self {
        Self {
            ledger,
            config,
            validator: UpdateValidator::default(),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Returns `true` once the ID index has been written.
    pub fn is_provisioned(&self) -> RegistryResult<bool> {
        Ok(self.ledger.read(&self.config.index_key)?.is_some())
    }

    /// Initialize the ID index to an empty sequence.
    ///
    /// On an already provisioned ledger every indexed reading is deleted in
    /// the same invocation. Returns the number of readings removed.
    pub fn provision(&self) -> RegistryResult<usize> {
        let mut service = self.begin();
        let outcome = service.provision();
        let removed = self.finish("provision", service, outcome)?;
        info!(index_key = %self.config.index_key, removed, "registry provisioned");
        Ok(removed)
    }

    /// Resolve a named operation and run it as one invocation.
    pub fn invoke<S: AsRef<str>>(&self, function: &str, args: &[S]) -> RegistryResult<Vec<u8>> {
        let op = Operation::parse(function, args).inspect_err(|e| {
            warn!(function, error = %e, "invocation rejected");
        })?;
        self.execute(&op)
    }

    pub fn execute(&self, op: &Operation) -> RegistryResult<Vec<u8>> {
        let mut service = self.begin();
        let outcome = service.dispatch(op);
        self.finish(op.name(), service, outcome)
    }

    pub fn create(&self, raw: &str) -> RegistryResult<Reading> {
        let mut service = self.begin();
        let outcome = service.create(raw);
        self.finish(Operation::ADD_NEW_READING, service, outcome)
    }

    pub fn update(&self, raw: &str) -> RegistryResult<Reading> {
        let mut service = self.begin();
        let outcome = service.update(raw);
        self.finish(Operation::UPDATE_READING, service, outcome)
    }

    pub fn remove_all(&self) -> RegistryResult<usize> {
        let mut service = self.begin();
        let outcome = service.delete_all();
        self.finish(Operation::REMOVE_ALL_READINGS, service, outcome)
    }

    pub fn read(&self, id: &str) -> RegistryResult<Reading> {
        let mut service = self.begin();
        let outcome = service.read_one(id);
        self.finish(Operation::READ_READING, service, outcome)
    }

    pub fn read_all(&self) -> RegistryResult<Vec<Reading>> {
        let mut service = self.begin();
        let outcome = service.read_all();
        self.finish(Operation::READ_ALL_READINGS, service, outcome)
    }

    /// Ids currently listed in the index.
    pub fn ids(&self) -> RegistryResult<Vec<String>> {
        let mut repo = LedgerRepository::new(
            Transaction::begin(self.ledger.as_ref()),
            self.config.index_key.as_str(),
        );
        Ok(repo.load()?.ids().to_vec())
    }

    fn begin(&self) -> InvocationService<'_> {
        let repo = LedgerRepository::new(
            Transaction::begin(self.ledger.as_ref()),
            self.config.index_key.as_str(),
        );
        RegistryService::new(repo, &self.validator)
    }

    fn finish<T>(
        &self,
        operation: &str,
        service: InvocationService<'_>,
        outcome: RegistryResult<T>,
    ) -> RegistryResult<T> {
        let tx = service.into_repository().into_inner();
        match outcome {
            Ok(value) => {
                let writes = tx.changes().writes().len();
                let seq = tx.commit().map_err(|e| {
                    warn!(operation, error = %e, "commit failed");
                    RegistryError::from(e)
                })?;
                info!(operation, seq, writes, "invocation committed");
                Ok(value)
            }
            Err(e) => {
                warn!(operation, kind = %e.kind(), error = %e, "invocation failed");
                tx.rollback();
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("validator", &self.validator)
            .finish()
    }
}
