use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::date::ReadingDate;
use crate::error::TypeError;
use crate::value::ReadingValue;

/// Document type stamped on every stored reading.
pub const DOC_TYPE: &str = "Asset.Reading";

/// Field names an input record must carry before it is decoded.
pub const REQUIRED_FIELDS: [&str; 4] = ["vehicleID", "docType", "reading", "creationDate"];

/// A single odometer reading, keyed by vehicle identifier.
///
/// The serialized field order (`vehicleID`, `docType`, `reading`,
/// `creationDate`) is the wire format and must not change.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reading {
    /// Ledger key. Immutable once the reading exists.
    #[serde(rename = "vehicleID")]
    pub vehicle_id: String,
    /// Logical type tag, always [`DOC_TYPE`] once stored.
    #[serde(rename = "docType")]
    pub doc_type: String,
    /// Numeric reading carried as a string.
    #[serde(rename = "reading")]
    pub reading: String,
    /// Date of the reading as `MM/DD/YYYY`.
    #[serde(rename = "creationDate")]
    pub creation_date: String,
}

impl Reading {
    pub fn new(
        vehicle_id: impl Into<String>,
        reading: impl Into<String>,
        creation_date: impl Into<String>,
    ) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            doc_type: DOC_TYPE.to_string(),
            reading: reading.into(),
            creation_date: creation_date.into(),
        }
    }

    /// Decode caller input.
    ///
    /// The input must be a JSON object naming all of [`REQUIRED_FIELDS`]; an
    /// object that would decode but misspells one of them (`docuType`) is
    /// rejected so renamed fields never drop data silently. Unknown extra
    /// fields are ignored.
    pub fn from_input(raw: &str) -> Result<Self, TypeError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| TypeError::InvalidJson(e.to_string()))?;
        let object = value.as_object().ok_or(TypeError::NotAnObject)?;
        if let Some(missing) = REQUIRED_FIELDS
            .iter()
            .find(|field| !object.contains_key(**field))
        {
            return Err(TypeError::MissingField(*missing));
        }
        serde_json::from_value(value).map_err(|e| TypeError::InvalidJson(e.to_string()))
    }

    /// Decode a stored record. All four fields are required.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TypeError> {
        serde_json::from_slice(bytes).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    /// Compact JSON encoding used for storage and payloads.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TypeError> {
        serde_json::to_vec(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    /// Replace the caller-supplied type tag with the system constant.
    pub fn stamped(mut self) -> Self {
        self.doc_type = DOC_TYPE.to_string();
        self
    }

    pub fn value(&self) -> Result<ReadingValue, TypeError> {
        ReadingValue::parse(&self.reading)
    }

    pub fn date(&self) -> Result<ReadingDate, TypeError> {
        ReadingDate::parse(&self.creation_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIRST: &str = r#"{"vehicleID":"100001","docType":"Asset.Reading","reading":"50","creationDate":"12/01/2017"}"#;

    #[test]
    fn serializes_in_wire_order() {
        let reading = Reading::new("100001", "50", "12/01/2017");
        let bytes = reading.to_bytes().unwrap();
        assert_eq!(std::str::from_utf8(&bytes).unwrap(), FIRST);
    }

    #[test]
    fn decodes_complete_input() {
        let reading = Reading::from_input(FIRST).unwrap();
        assert_eq!(reading.vehicle_id, "100001");
        assert_eq!(reading.reading, "50");
        assert_eq!(reading.creation_date, "12/01/2017");
        assert_eq!(reading.doc_type, DOC_TYPE);
    }

    #[test]
    fn misspelled_field_is_rejected() {
        let raw = r#"{"vehicleID":"100001","docuType":"Asset.Reading","reading":"50","creationDate":"12/01/2017"}"#;
        assert_eq!(
            Reading::from_input(raw),
            Err(TypeError::MissingField("docType"))
        );
    }

    #[test]
    fn extra_fields_are_ignored() {
        let raw = r#"{"vehicleID":"1","docType":"x","reading":"5","creationDate":"01/01/2018","owner":"bob"}"#;
        let reading = Reading::from_input(raw).unwrap();
        assert_eq!(reading.vehicle_id, "1");
    }

    #[test]
    fn non_object_input_is_rejected() {
        assert_eq!(Reading::from_input("[1,2]"), Err(TypeError::NotAnObject));
        assert!(matches!(
            Reading::from_input("not json"),
            Err(TypeError::InvalidJson(_))
        ));
    }

    #[test]
    fn numeric_field_is_rejected() {
        let raw = r#"{"vehicleID":"1","docType":"x","reading":5,"creationDate":"01/01/2018"}"#;
        assert!(matches!(
            Reading::from_input(raw),
            Err(TypeError::InvalidJson(_))
        ));
    }

    #[test]
    fn stamping_overrides_doc_type() {
        let mut reading = Reading::new("1", "5", "01/01/2018");
        reading.doc_type = "Something.Else".into();
        assert_eq!(reading.stamped().doc_type, DOC_TYPE);
    }

    #[test]
    fn stored_record_requires_every_field() {
        assert!(Reading::from_bytes(br#"{"vehicleIDs":["1"]}"#).is_err());
        assert!(Reading::from_bytes(b"").is_err());
        let reading = Reading::from_bytes(FIRST.as_bytes()).unwrap();
        assert_eq!(reading, Reading::new("100001", "50", "12/01/2017"));
    }

    #[test]
    fn typed_accessors() {
        let reading = Reading::new("1", "70", "12/01/2017");
        assert_eq!(reading.value().unwrap().as_f64(), 70.0);
        assert_eq!(reading.date().unwrap().to_string(), "12/01/2017");
    }
}
