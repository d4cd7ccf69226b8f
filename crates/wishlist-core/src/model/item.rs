use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::InvalidItemReason;

/// Free-form metadata bag attached to a wishlist.
pub type Metadata = Map<String, Value>;

/// Item keys owned by the engine. They never live in [`Item::extra`].
pub const RESERVED_ITEM_FIELDS: [&str; 3] = ["id", "price", "itemTotal"];

/// One wishlist entry.
///
/// `id` and `price` are the only fields the engine interprets. Anything else
/// the caller puts on an item (name, sku, image url, ...) lands in `extra`
/// and is carried through every transition untouched. Reserved keys placed
/// in `extra` directly are dropped the next time the aggregates are derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    /// A stored `null` (a non-finite price) reads back as NaN.
    #[serde(deserialize_with = "price_or_nan")]
    pub price: f64,
    /// Derived: equals `price` after every recomputation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_total: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    /// Create an item with no extra fields.
    #[must_use]
    pub fn new(id: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            price,
            item_total: None,
            extra: Map::new(),
        }
    }

    /// Attach a caller-defined field. Reserved keys (`id`, `price`,
    /// `itemTotal`) are ignored.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if !is_reserved_field(&key) {
            self.extra.insert(key, value.into());
        }
        self
    }

    /// Remove reserved keys from `extra` so they cannot shadow the typed
    /// fields when serialized.
    pub(crate) fn strip_reserved_fields(&mut self) {
        for key in RESERVED_ITEM_FIELDS {
            self.extra.remove(key);
        }
    }

    /// Look up a caller-defined field.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

#[must_use]
pub fn is_reserved_field(key: &str) -> bool {
    RESERVED_ITEM_FIELDS.contains(&key)
}

fn price_or_nan<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(de)?.unwrap_or(f64::NAN))
}

/// Extract the `id` of an untyped item payload.
///
/// # Errors
///
/// A missing, null, or empty id is [`InvalidItemReason::MissingId`]; an id
/// that is not a string, or a payload that is not an object, is malformed.
pub fn item_id_of(value: &Value) -> Result<&str, InvalidItemReason> {
    let obj = value
        .as_object()
        .ok_or_else(|| InvalidItemReason::Malformed("item must be a JSON object".into()))?;

    match obj.get("id") {
        None | Some(Value::Null) => Err(InvalidItemReason::MissingId),
        Some(Value::String(id)) if id.is_empty() => Err(InvalidItemReason::MissingId),
        Some(Value::String(id)) => Ok(id.as_str()),
        Some(other) => Err(InvalidItemReason::Malformed(format!(
            "`id` must be a string, got {other}"
        ))),
    }
}

impl TryFrom<Value> for Item {
    type Error = InvalidItemReason;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        item_id_of(&value)?;

        let Value::Object(mut obj) = value else {
            return Err(InvalidItemReason::Malformed("item must be a JSON object".into()));
        };

        let price = match obj.get("price") {
            None | Some(Value::Null) => return Err(InvalidItemReason::MissingPrice),
            Some(Value::Number(n)) => n.as_f64().ok_or_else(|| {
                InvalidItemReason::Malformed(format!("`price` {n} is not representable"))
            })?,
            Some(other) => {
                return Err(InvalidItemReason::Malformed(format!(
                    "`price` must be a number, got {other}"
                )));
            }
        };

        let id = match obj.remove("id") {
            Some(Value::String(id)) => id,
            _ => return Err(InvalidItemReason::MissingId),
        };
        obj.remove("price");
        let item_total = obj.remove("itemTotal").and_then(|v| v.as_f64());

        Ok(Self {
            id,
            price,
            item_total,
            extra: obj,
        })
    }
}
