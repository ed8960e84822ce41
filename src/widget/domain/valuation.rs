use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::sale_history::{self, SaleHistory};

/// Result of a successful valuation service call.
///
/// Immutable once received. Every descriptive attribute is independently
/// optional: absent, null or off-type values all decode to `None` without
/// failing the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireRecord")]
pub struct ValuationRecord {
    /// Address as confirmed by the service.
    pub address: String,

    pub estimated_value: f64,

    pub currency: String,

    pub property_type: Option<String>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f64>,
    pub square_footage: Option<u32>,
    pub lot_size: Option<u32>,
    pub year_built: Option<u32>,
    pub last_sale_date: Option<String>,

    /// Serialized sale history, either a JSON string or an inline object.
    pub sale_history_json: Option<Value>,

    /// Service-side timestamp of the estimate.
    pub created_at: Option<String>,
}

/// Estimate payload as it arrives on the wire.
///
/// Older backends name the amount `valuation`; `estimated_value` takes
/// precedence when both are sent.
#[derive(Deserialize)]
struct WireRecord {
    address: String,
    #[serde(default)]
    estimated_value: Option<f64>,
    #[serde(default)]
    valuation: Option<f64>,
    currency: String,

    #[serde(default, deserialize_with = "lenient_text")]
    property_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    bedrooms: Option<u32>,
    #[serde(default, deserialize_with = "lenient_number")]
    bathrooms: Option<f64>,
    #[serde(default, deserialize_with = "lenient_count")]
    square_footage: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    lot_size: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    year_built: Option<u32>,
    #[serde(default, deserialize_with = "lenient_text")]
    last_sale_date: Option<String>,

    #[serde(default)]
    sale_history_json: Option<Value>,
    #[serde(default, deserialize_with = "lenient_text")]
    created_at: Option<String>,
}

impl TryFrom<WireRecord> for ValuationRecord {
    type Error = String;

    fn try_from(wire: WireRecord) -> Result<Self, Self::Error> {
        let estimated_value = wire
            .estimated_value
            .or(wire.valuation)
            .ok_or_else(|| "missing field `estimated_value`".to_string())?;

        Ok(Self {
            address: wire.address,
            estimated_value,
            currency: wire.currency,
            property_type: wire.property_type,
            bedrooms: wire.bedrooms,
            bathrooms: wire.bathrooms,
            square_footage: wire.square_footage,
            lot_size: wire.lot_size,
            year_built: wire.year_built,
            last_sale_date: wire.last_sale_date,
            sale_history_json: wire.sale_history_json,
            created_at: wire.created_at,
        })
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number_of(&Value::deserialize(deserializer)?))
}

/// Non-negative whole numbers; `3`, `3.0` and `"3"` all read as 3.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let count = number_of(&Value::deserialize(deserializer)?)
        .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n as u32);
    Ok(count)
}

fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

impl ValuationRecord {
    pub fn new(address: impl Into<String>, estimated_value: f64, currency: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            estimated_value,
            currency: currency.into(),
            property_type: None,
            bedrooms: None,
            bathrooms: None,
            square_footage: None,
            lot_size: None,
            year_built: None,
            last_sale_date: None,
            sale_history_json: None,
            created_at: None,
        }
    }

    /// Decodes the embedded sale history; absent or malformed blobs are empty.
    pub fn sale_history(&self) -> SaleHistory {
        self.sale_history_json
            .as_ref()
            .map(sale_history::parse_value)
            .unwrap_or_default()
    }
}
