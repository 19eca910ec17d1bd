//! Serde adapters for catalog documents.
//!
//! Ids are UUID v7 values stored as their hyphenated string form so `_id`
//! filters built from path parameters match without BSON binary subtypes.
//! Timestamps are RFC 3339 strings with millisecond precision and a `Z`
//! suffix; with a fixed width their lexical order is chronological, which
//! keeps `sort=createdAt` meaningful.
//!
//! ```ignore
//! #[derive(Serialize, Deserialize)]
//! struct Doc {
//!     #[serde(rename = "_id", with = "uuid_as_string")]
//!     id: Uuid,
//!     #[serde(with = "datetime_as_rfc3339")]
//!     created_at: DateTime<Utc>,
//! }
//! ```

pub mod uuid_as_string {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use uuid::Uuid;

    pub fn serialize<S: Serializer>(value: &Uuid, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uuid, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Uuid::parse_str(&raw).map_err(D::Error::custom)
    }
}

pub mod uuid_vec_as_string {
    use serde::{Deserialize, Deserializer, Serializer, de::Error, ser::SerializeSeq};
    use uuid::Uuid;

    pub fn serialize<S: Serializer>(values: &[Uuid], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for value in values {
            seq.serialize_element(&value.to_string())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Uuid>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|raw| Uuid::parse_str(raw).map_err(D::Error::custom))
            .collect()
    }
}

pub mod option_uuid_as_string {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use uuid::Uuid;

    pub fn serialize<S: Serializer>(value: &Option<Uuid>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(id) => serializer.serialize_some(&id.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Uuid>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| Uuid::parse_str(&raw).map_err(D::Error::custom))
            .transpose()
    }
}

pub mod datetime_as_rfc3339 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    /// Format used for every stored timestamp.
    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        #[serde(rename = "_id", with = "uuid_as_string")]
        id: Uuid,
        #[serde(with = "uuid_vec_as_string")]
        tags: Vec<Uuid>,
        #[serde(with = "option_uuid_as_string", default)]
        parent: Option<Uuid>,
        #[serde(with = "datetime_as_rfc3339")]
        created_at: DateTime<Utc>,
    }

    #[test]
    fn test_sample_serializes_as_strings() {
        let id = Uuid::now_v7();
        let tag = Uuid::now_v7();
        let created_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let sample = Sample {
            id,
            tags: vec![tag],
            parent: None,
            created_at,
        };

        let json = serde_json::to_value(&sample).unwrap();
        assert_eq!(json["_id"], id.to_string());
        assert_eq!(json["tags"][0], tag.to_string());
        assert!(json["parent"].is_null());
        assert_eq!(json["created_at"], "2024-03-01T12:30:00.000Z");

        let back: Sample = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample);
    }

    #[test]
    fn test_invalid_uuid_is_rejected() {
        let json = serde_json::json!({
            "_id": "not-a-uuid",
            "tags": [],
            "created_at": "2024-03-01T12:30:00.000Z"
        });
        assert!(serde_json::from_value::<Sample>(json).is_err());
    }

    #[test]
    fn test_timestamp_lexical_order_is_chronological() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 9, 23, 59, 59).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        assert!(datetime_as_rfc3339::format(&earlier) < datetime_as_rfc3339::format(&later));
    }
}
