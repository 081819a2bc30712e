use odo_store::Repository;
use odo_types::Reading;
use tracing::{debug, warn};

use crate::error::{RegistryError, RegistryResult};
use crate::operation::Operation;
use crate::validator::UpdateValidator;

/// The registry operations, run against one repository view.
///
/// A service holds no state of its own: every operation loads what it
/// needs from the repository, mutates, and writes back. Atomicity comes
/// from the repository's backing transaction.
pub struct RegistryService<'v, R> {
    repo: R,
    validator: &'v UpdateValidator,
}

impl<'v, R: Repository> RegistryService<'v, R> {
    pub fn new(repo: R, validator: &'v UpdateValidator) -> Self {
        Self { repo, validator }
    }

    pub fn into_repository(self) -> R {
        self.repo
    }

    /// Write an empty ID index.
    ///
    /// Re-provisioning first deletes every reading the current index lists,
    /// so no stored reading is left unindexed. Returns the number removed.
    pub fn provision(&mut self) -> RegistryResult<usize> {
        let mut removed = 0;
        if self.repo.is_written()? {
            let index = self.repo.load()?;
            for id in &index {
                if self.repo.exists(id)? {
                    self.repo.delete(id)?;
                    removed += 1;
                }
            }
        }
        self.repo.reset()?;
        Ok(removed)
    }

    /// Store a new reading and append its id to the index.
    pub fn create(&mut self, raw: &str) -> RegistryResult<Reading> {
        let reading = Reading::from_input(raw)?.stamped();
        let id = reading.vehicle_id.as_str();
        if id.is_empty() {
            return Err(RegistryError::MalformedInput("vehicleID must not be empty".into()));
        }
        if id == self.repo.index_key() {
            return Err(RegistryError::MalformedInput(format!(
                "vehicleID {id:?} is reserved"
            )));
        }
        if self.repo.exists(id)? {
            return Err(RegistryError::AlreadyExists(id.to_string()));
        }

        self.repo.save(&reading)?;
        self.repo.append(id)?;
        debug!(id, value = %reading.reading, date = %reading.creation_date, "reading created");
        Ok(reading)
    }

    /// Replace an existing reading, provided nothing moves backwards.
    pub fn update(&mut self, raw: &str) -> RegistryResult<Reading> {
        let proposed = Reading::from_input(raw)?.stamped();
        let current = self.repo.retrieve(&proposed.vehicle_id)?;
        self.validator.validate(&current, &proposed)?;

        self.repo.save(&proposed)?;
        debug!(
            id = %proposed.vehicle_id,
            from = %current.reading,
            to = %proposed.reading,
            "reading updated"
        );
        Ok(proposed)
    }

    /// Delete every indexed reading, then reset the index.
    ///
    /// Returns the number of readings removed. The first failing delete
    /// aborts the whole operation.
    pub fn delete_all(&mut self) -> RegistryResult<usize> {
        let index = self.repo.load()?;
        if index.is_empty() {
            return Err(RegistryError::EmptyIndex);
        }

        for id in &index {
            if let Err(e) = self.repo.delete(id) {
                warn!(id = %id, error = %e, "failed to remove reading");
                return Err(e.into());
            }
            self.repo.remove(id)?;
        }
        self.repo.reset()?;
        debug!(count = index.len(), "all readings removed");
        Ok(index.len())
    }

    pub fn read_one(&mut self, id: &str) -> RegistryResult<Reading> {
        Ok(self.repo.retrieve(id)?)
    }

    /// Every indexed reading, in index order.
    pub fn read_all(&mut self) -> RegistryResult<Vec<Reading>> {
        let index = self.repo.load()?;
        let mut readings = Vec::with_capacity(index.len());
        for id in &index {
            readings.push(self.repo.retrieve(id)?);
        }
        Ok(readings)
    }

    /// Run `op` and encode its result payload.
    ///
    /// Mutations return an empty payload; queries return compact JSON.
    pub fn dispatch(&mut self, op: &Operation) -> RegistryResult<Vec<u8>> {
        match op {
            Operation::AddNewReading(raw) => self.create(raw).map(|_| Vec::new()),
            Operation::UpdateReading(raw) => self.update(raw).map(|_| Vec::new()),
            Operation::RemoveAllReadings => self.delete_all().map(|_| Vec::new()),
            Operation::ReadReading(id) => Ok(self.read_one(id)?.to_bytes()?),
            Operation::ReadAllReadings => {
                let readings = self.read_all()?;
                serde_json::to_vec(&readings)
                    .map_err(|e| RegistryError::Corrupt(format!("cannot encode readings: {e}")))
            }
        }
    }
}
