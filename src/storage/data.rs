use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de;
use serde::de::Visitor;
use serde_json::Value;

use crate::error::MalformedRecord;
use crate::error::UnknownProfileType;


const TOKEN_PRINTER: &str = "printer";
const TOKEN_FILAMENT: &str = "filament";
const TOKEN_UNKNOWN: &str = "unknown";


/// Kind of preset a rename applies to.
///
/// `Invalid` is the sentinel for anything that is neither a printer nor a
/// filament profile. It is never stored in the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProfileType {
    #[default]
    Invalid,
    Printer,
    Filament,
}

impl ProfileType {

    pub fn is_valid(self) -> bool {
        self != ProfileType::Invalid
    }

    /// Short token used in the history file.
    pub fn token(self) -> &'static str {
        match self {
            ProfileType::Printer => TOKEN_PRINTER,
            ProfileType::Filament => TOKEN_FILAMENT,
            ProfileType::Invalid => TOKEN_UNKNOWN,
        }
    }

    /// Lenient inverse of [`ProfileType::token`]: unknown tokens read as `Invalid`.
    pub fn from_token(token: &str) -> Self {
        match token {
            TOKEN_PRINTER => ProfileType::Printer,
            TOKEN_FILAMENT => ProfileType::Filament,
            _ => ProfileType::Invalid,
        }
    }
}

impl fmt::Display for ProfileType {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ProfileType {
    type Err = UnknownProfileType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match ProfileType::from_token(s) {
            ProfileType::Invalid => Err(UnknownProfileType(s.to_string())),
            t => Ok(t),
        }
    }
}

impl Serialize for ProfileType {

    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        serializer.serialize_str(self.token())
    }
}


struct ProfileTypeVisitor;

impl<'de> Visitor<'de> for ProfileTypeVisitor {
    type Value = ProfileType;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a profile type string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(ProfileType::from_token(v))
    }
}

impl<'de> Deserialize<'de> for ProfileType {

    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>
    {
        deserializer.deserialize_str(ProfileTypeVisitor)
    }
}


/// One `old -> new` rename event.
///
/// Only [`RenameRecord::new`] and deserialization build records, and both
/// refuse anything that fails [`RenameRecord::is_well_formed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameRecord {
    #[serde(rename = "type")]
    profile_type: ProfileType,
    #[serde(rename = "old")]
    old_name: String,
    #[serde(rename = "new")]
    new_name: String,
    timestamp: i64,
}


/// A persisted element before the record invariant is checked.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRecord {
    #[serde(rename = "type")]
    profile_type: ProfileType,
    old: String,
    new: String,
    #[serde(deserialize_with = "lenient_timestamp")]
    timestamp: i64,
}

impl<'de> Deserialize<'de> for RenameRecord {

    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>
    {
        let raw = RawRecord::deserialize(deserializer)?;
        RenameRecord::new(raw.profile_type, raw.old.as_str(), raw.new.as_str(), raw.timestamp)
            .ok_or_else(|| de::Error::custom(MalformedRecord))
    }
}


/// Whole seconds from any JSON number; anything else reads as 0.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>
{
    let value = Value::deserialize(deserializer)?;
    let secs = match value {
        Value::Number(n) => {
            if let Some(v) = n.as_i64() {
                v
            } else if let Some(v) = n.as_u64() {
                i64::try_from(v).unwrap_or(i64::MAX)
            } else {
                // `as` saturates out-of-range floats
                n.as_f64().map(|v| v.trunc() as i64).unwrap_or(0)
            }
        }
        _ => 0,
    };
    Ok(secs)
}

impl RenameRecord {

    pub fn new(profile_type: ProfileType, old_name: &str, new_name: &str, timestamp: i64) -> Option<Self> {
        let record = Self {
            profile_type,
            old_name: old_name.to_string(),
            new_name: new_name.to_string(),
            timestamp,
        };
        record.is_well_formed().then_some(record)
    }

    pub fn is_well_formed(&self) -> bool {
        self.profile_type.is_valid()
            && !self.old_name.is_empty()
            && !self.new_name.is_empty()
            && self.old_name != self.new_name
    }

    pub fn profile_type(&self) -> ProfileType {
        self.profile_type
    }

    pub fn old_name(&self) -> &str {
        self.old_name.as_str()
    }

    pub fn new_name(&self) -> &str {
        self.new_name.as_str()
    }

    /// Seconds since the Unix epoch when the rename was recorded.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn recorded_at(&self) -> Option<SystemTime> {
        let secs = u64::try_from(self.timestamp).ok()?;
        UNIX_EPOCH.checked_add(Duration::from_secs(secs))
    }
}


pub(crate) fn now_timestamp() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
        Err(_e) => 0,
    }
}


/// Elements of the on-disk `{ "entries": [ ... ] }` document.
///
/// Elements stay raw so that a single bad one can be dropped without
/// rejecting the whole document. Anything but an object at the top level, or
/// an `entries` that is not an array, has no elements.
pub(crate) fn document_entries(document: Value) -> Vec<Value> {
    let Value::Object(mut map) = document else {
        return Vec::new();
    };
    match map.remove("entries") {
        Some(Value::Array(entries)) => entries,
        _ => Vec::new(),
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct HistoryDocumentRef<'a> {
    pub entries: &'a [RenameRecord],
}


pub(crate) fn record_from_value(value: Value) -> Option<RenameRecord> {
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value).ok()
}


#[cfg(test)]
mod test {

    use serde_json::json;

    use super::*;

    #[test]
    fn tokens_map_both_ways() {
        assert_eq!(ProfileType::from_token("printer"), ProfileType::Printer);
        assert_eq!(ProfileType::from_token("filament"), ProfileType::Filament);
        assert_eq!(ProfileType::from_token("print"), ProfileType::Invalid);
        assert_eq!(ProfileType::from_token(""), ProfileType::Invalid);
        assert_eq!(ProfileType::Printer.token(), "printer");
        assert_eq!(ProfileType::Filament.token(), "filament");
        assert_eq!(ProfileType::Invalid.token(), "unknown");
    }

    #[test]
    fn strict_parse_rejects_unknown_tokens() {
        assert_eq!("filament".parse::<ProfileType>(), Ok(ProfileType::Filament));
        assert_eq!("unknown".parse::<ProfileType>(), Err(UnknownProfileType("unknown".to_string())));
    }

    #[test]
    fn new_refuses_malformed_records() {
        assert!(RenameRecord::new(ProfileType::Invalid, "a", "b", 1).is_none());
        assert!(RenameRecord::new(ProfileType::Printer, "", "b", 1).is_none());
        assert!(RenameRecord::new(ProfileType::Printer, "a", "", 1).is_none());
        assert!(RenameRecord::new(ProfileType::Printer, "a", "a", 1).is_none());
        let r = RenameRecord::new(ProfileType::Printer, "a", "b", 7).unwrap();
        assert_eq!(r.old_name(), "a");
        assert_eq!(r.new_name(), "b");
        assert_eq!(r.timestamp(), 7);
    }

    #[test]
    fn record_serializes_with_short_field_names() {
        let r = RenameRecord::new(ProfileType::Filament, "PLA", "PLA Matte", 1700000000).unwrap();
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v, json!({ "type": "filament", "old": "PLA", "new": "PLA Matte", "timestamp": 1700000000 }));
    }

    #[test]
    fn record_from_value_drops_bad_elements() {
        assert!(record_from_value(json!("printer")).is_none());
        assert!(record_from_value(json!({ "type": "printer", "old": "A" })).is_none());
        assert!(record_from_value(json!({ "type": "print", "old": "A", "new": "B" })).is_none());
        assert!(record_from_value(json!({ "type": "printer", "old": "A", "new": "A" })).is_none());
        assert!(record_from_value(json!({ "type": 3, "old": "A", "new": "B" })).is_none());
        let r = record_from_value(json!({ "type": "printer", "old": "A", "new": "B", "extra": true })).unwrap();
        assert_eq!(r.timestamp(), 0);
        assert_eq!(r.profile_type(), ProfileType::Printer);
    }

    #[test]
    fn timestamp_accepts_any_number() {
        let r = record_from_value(json!({ "type": "printer", "old": "A", "new": "B", "timestamp": 1700000000.9 })).unwrap();
        assert_eq!(r.timestamp(), 1700000000);
        let r = record_from_value(json!({ "type": "printer", "old": "A", "new": "B", "timestamp": u64::MAX })).unwrap();
        assert_eq!(r.timestamp(), i64::MAX);
        let r = record_from_value(json!({ "type": "filament", "old": "A", "new": "B", "timestamp": "yesterday" })).unwrap();
        assert_eq!(r.timestamp(), 0);
        let r = record_from_value(json!({ "type": "filament", "old": "A", "new": "B", "timestamp": null })).unwrap();
        assert_eq!(r.timestamp(), 0);
    }

    #[test]
    fn deserialize_enforces_record_invariant() {
        assert!(serde_json::from_str::<RenameRecord>(r#"{ "type": "unknown", "old": "A", "new": "B" }"#).is_err());
        assert!(serde_json::from_str::<RenameRecord>(r#"{ "type": "printer", "old": "A", "new": "A" }"#).is_err());
        assert!(serde_json::from_str::<RenameRecord>(r#"{ "type": "printer", "old": "", "new": "B" }"#).is_err());
        let r: RenameRecord = serde_json::from_str(r#"{ "type": "printer", "old": "A", "new": "B", "timestamp": 5 }"#).unwrap();
        assert_eq!(r, RenameRecord::new(ProfileType::Printer, "A", "B", 5).unwrap());
    }

    #[test]
    fn document_entries_needs_object_with_array() {
        assert_eq!(document_entries(json!({ "entries": [1, 2] })).len(), 2);
        assert!(document_entries(json!([[{ "type": "printer", "old": "A", "new": "B" }]])).is_empty());
        assert!(document_entries(json!({ "entries": { "type": "printer" } })).is_empty());
        assert!(document_entries(json!({ "version": 2 })).is_empty());
    }

    #[test]
    fn recorded_at_rejects_negative_timestamps() {
        let r = RenameRecord::new(ProfileType::Printer, "a", "b", -5).unwrap();
        assert!(r.recorded_at().is_none());
        let r = RenameRecord::new(ProfileType::Printer, "a", "b", 60).unwrap();
        assert_eq!(r.recorded_at(), Some(UNIX_EPOCH + Duration::from_secs(60)));
    }
}
