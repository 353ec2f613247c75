// src/models/extended_json.rs

//! Field helpers for catalog exports in MongoDB extended JSON, where
//! timestamps arrive as `{"$date": ...}` and references as `{"$oid": ...}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, de::Error};

#[derive(Deserialize)]
#[serde(untagged)]
enum DateField {
    Plain(DateTime<Utc>),
    Extended {
        #[serde(rename = "$date")]
        date: ExtendedDate,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExtendedDate {
    Iso(DateTime<Utc>),
    Millis(i64),
    Long {
        #[serde(rename = "$numberLong")]
        millis: String,
    },
}

fn from_millis<E: Error>(millis: i64) -> Result<DateTime<Utc>, E> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| E::custom(format!("timestamp out of range: {}", millis)))
}

/// Accepts an RFC 3339 string, `{"$date": "<RFC 3339>"}`, `{"$date": <millis>}`
/// or `{"$date": {"$numberLong": "<millis>"}}`.
pub fn optional_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let field = match Option::<DateField>::deserialize(deserializer)? {
        Some(field) => field,
        None => return Ok(None),
    };

    let date = match field {
        DateField::Plain(date) => date,
        DateField::Extended { date: ExtendedDate::Iso(date) } => date,
        DateField::Extended { date: ExtendedDate::Millis(millis) } => from_millis(millis)?,
        DateField::Extended { date: ExtendedDate::Long { millis } } => {
            let millis = millis.parse::<i64>().map_err(D::Error::custom)?;
            from_millis(millis)?
        }
    };

    Ok(Some(date))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdField {
    Plain(i64),
    ObjectId {
        #[serde(rename = "$oid")]
        _oid: String,
    },
}

/// Accepts a numeric id. An `{"$oid": ...}` reference has no numeric
/// counterpart here and becomes `None`.
pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<IdField>::deserialize(deserializer)? {
        Some(IdField::Plain(id)) => Some(id),
        Some(IdField::ObjectId { .. }) | None => None,
    })
}
