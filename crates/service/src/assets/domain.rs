use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Caller-supplied fields of an asset, in the order they were sent.
pub type Fields = Map<String, Value>;

/// Server-managed field names.
pub const ID: &str = "id";
pub const CREATED_AT: &str = "created_at";
pub const UPDATED_AT: &str = "updated_at";

/// One record of the collection: caller fields plus `id`, `created_at` and `updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Asset(Fields);

impl Asset {
    /// New record from `fields`; the server-managed fields are set last and
    /// override anything the caller sent under the same names.
    pub fn create(mut fields: Fields, id: i64, now: DateTime<Utc>) -> Self {
        let ts = Value::String(format_timestamp(now));
        fields.insert(ID.into(), Value::from(id));
        fields.insert(CREATED_AT.into(), ts.clone());
        fields.insert(UPDATED_AT.into(), ts);
        Self(fields)
    }

    /// Full replacement of `existing` by `fields`, keeping its `id` and `created_at`.
    pub fn replace(existing: &Value, mut fields: Fields, now: DateTime<Utc>) -> Self {
        for key in [ID, CREATED_AT] {
            match existing.get(key) {
                Some(v) => {
                    fields.insert(key.into(), v.clone());
                }
                None => fields.retain(|k, _| k != key),
            }
        }
        fields.insert(UPDATED_AT.into(), Value::String(format_timestamp(now)));
        Self(fields)
    }

    pub fn id(&self) -> Option<i64> {
        self.0.get(ID).and_then(numeric_id)
    }

    pub fn created_at(&self) -> Option<&str> {
        self.0.get(CREATED_AT).and_then(Value::as_str)
    }

    pub fn updated_at(&self) -> Option<&str> {
        self.0.get(UPDATED_AT).and_then(Value::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-05-01T09:30:00.123Z`.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw).ok().map(|t| t.with_timezone(&Utc))
}

/// Parse a path id the lenient way clients expect: leading whitespace, an
/// optional sign, then digits. Trailing junk is ignored (`"12abc"` is 12).
pub fn parse_id(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let n: i64 = rest[..end].parse().ok()?;
    Some(if negative { -n } else { n })
}

/// Numeric id of a stored record, accepting integral floats such as `7.0`.
pub fn record_id(record: &Value) -> Option<i64> {
    record.get(ID).and_then(numeric_id)
}

fn numeric_id(v: &Value) -> Option<i64> {
    v.as_i64().or_else(|| {
        v.as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}
