//! The ID index: one ledger value listing every live reading identifier.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{StoreError, StoreResult};

/// Ordered list of live reading identifiers, in creation order.
///
/// Stored as `{"vehicleIDs":[...]}`. A `null` list reads as empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdIndex {
    #[serde(
        rename = "vehicleIDs",
        default,
        deserialize_with = "null_as_empty"
    )]
    vehicle_ids: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl IdIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[String] {
        &self.vehicle_ids
    }

    pub fn len(&self) -> usize {
        self.vehicle_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicle_ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.vehicle_ids.iter().any(|v| v == id)
    }

    /// Append `id` at the end. Fails if it is already listed.
    pub fn push(&mut self, id: &str) -> StoreResult<()> {
        if self.contains(id) {
            return Err(StoreError::AlreadyIndexed(id.to_string()));
        }
        self.vehicle_ids.push(id.to_string());
        Ok(())
    }

    /// Remove `id`, keeping the order of the rest. Fails if it is not listed.
    pub fn remove(&mut self, id: &str) -> StoreResult<()> {
        let before = self.vehicle_ids.len();
        self.vehicle_ids.retain(|v| v != id);
        if self.vehicle_ids.len() == before {
            return Err(StoreError::NotIndexed(id.to_string()));
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> StoreResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

impl<'a> IntoIterator for &'a IdIndex {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.vehicle_ids.iter()
    }
}
