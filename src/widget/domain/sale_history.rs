// Sale history decoding
//
// The valuation service embeds the history as a serialized JSON object keyed
// by an opaque label (`sale_0`, `sale_1`, ...). Key order is display order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One recorded event in a property's sale history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaleHistoryEntry {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

/// Ordered collection of sale events.
///
/// Entries keep the order in which their keys appeared in the decoded blob.
/// They are never re-sorted by date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaleHistory {
    entries: Vec<(String, SaleHistoryEntry)>,
}

impl SaleHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &str) -> Option<&SaleHistoryEntry> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, e)| e)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SaleHistoryEntry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    /// Date of the first entry that carries one.
    ///
    /// The service lists the most recent sale first, so this doubles as the
    /// "last sale date" when the record itself does not provide one.
    pub fn latest_sale_date(&self) -> Option<&str> {
        self.entries
            .iter()
            .find_map(|(_, e)| e.date.as_deref())
    }
}

/// Decodes a serialized sale-history blob.
///
/// Never fails: truncated, non-object or otherwise malformed input yields an
/// empty history.
pub fn parse(blob: &str) -> SaleHistory {
    if blob.trim().is_empty() {
        return SaleHistory::new();
    }

    match serde_json::from_str::<Value>(blob) {
        Ok(value) => parse_value(&value),
        Err(e) => {
            log::debug!("[HISTORY] undecodable blob ({} bytes): {}", blob.len(), e);
            SaleHistory::new()
        }
    }
}

/// Same as [`parse`] for a blob that has already been decoded into JSON.
///
/// A JSON string is treated as a serialized blob and decoded once more.
pub fn parse_value(value: &Value) -> SaleHistory {
    match value {
        Value::String(s) => parse(s),
        Value::Object(map) => decode_entries(map).unwrap_or_else(|| {
            log::debug!("[HISTORY] non-conforming history object, ignoring");
            SaleHistory::new()
        }),
        Value::Null => SaleHistory::new(),
        other => {
            log::debug!("[HISTORY] unexpected history shape: {}", kind_of(other));
            SaleHistory::new()
        }
    }
}

fn decode_entries(map: &Map<String, Value>) -> Option<SaleHistory> {
    let mut entries = Vec::with_capacity(map.len());

    for (key, raw) in map {
        if !raw.is_object() {
            return None;
        }
        let entry = SaleHistoryEntry::deserialize(raw).ok()?;
        entries.push((key.clone(), entry));
    }

    Some(SaleHistory { entries })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
