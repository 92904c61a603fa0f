//! Conversion between messages and structured records (field name → value maps).
//!
//! The runtime never serializes messages itself. These helpers exist for embedders that
//! need to move a message across a process boundary: any message that implements
//! `serde::Serialize` / `Deserialize` can be turned into a [`Record`] and back.

use crate::message::{short_type_name, Message};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

pub type Record = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("{0} does not convert to a structured record")]
    NotAnObject(&'static str),
    #[error("Record codec failed: {0}")]
    Codec(#[from] serde_json::Error),
}

pub fn to_record<M: Message + Serialize>(message: &M) -> Result<Record, RecordError> {
    match serde_json::to_value(message)? {
        Value::Object(record) => Ok(record),
        _ => Err(RecordError::NotAnObject(short_type_name::<M>())),
    }
}

pub fn from_record<M: Message + DeserializeOwned>(record: Record) -> Result<M, RecordError> {
    Ok(serde_json::from_value(Value::Object(record))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct SpeedUp {
        times: u32,
    }
    impl Message for SpeedUp {
        type Reply = ();
    }

    #[derive(Debug, Serialize)]
    struct Raw(u32);
    impl Message for Raw {
        type Reply = ();
    }

    #[test]
    fn test_record_fields() {
        let record = to_record(&SpeedUp { times: 3 }).unwrap();
        assert_eq!(record.get("times"), Some(&Value::from(3)));
        assert_eq!(from_record::<SpeedUp>(record).unwrap(), SpeedUp { times: 3 });
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        assert!(matches!(to_record(&Raw(1)), Err(RecordError::NotAnObject("Raw"))));
    }

    #[test]
    fn test_missing_field_is_a_codec_error() {
        assert!(matches!(
            from_record::<SpeedUp>(Record::new()),
            Err(RecordError::Codec(_))
        ));
    }
}
