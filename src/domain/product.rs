use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Magnitude at which a float no longer fits in `Decimal` (`Decimal::MAX` is about 7.9e28).
const DECIMAL_LIMIT: f64 = 1e29;

/// A numeric product field as the engine sees it, plus the JSON value it was
/// read from.
///
/// Comparison, ordering and hashing use only the decoded `Decimal`. The source
/// value, when present, is what gets serialized, so a product leaves with the
/// same field it came in with.
#[derive(Debug, Clone, Default)]
pub struct Amount {
    value: Decimal,
    source: Option<Value>,
}

impl Amount {
    pub const ZERO: Self = Self {
        value: Decimal::ZERO,
        source: None,
    };

    pub fn new(value: Decimal) -> Self {
        Self {
            value,
            source: None,
        }
    }

    /// Decodes `raw` with [`coerce_decimal`] and keeps it for output.
    pub fn from_json(raw: Value) -> Self {
        Self {
            value: coerce_decimal(&raw),
            source: Some(raw),
        }
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn source(&self) -> Option<&Value> {
        self.source.as_ref()
    }
}

impl PartialEq for Amount {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Amount {}

impl PartialOrd for Amount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Amount {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl Hash for Amount {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self::new(value)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.source {
            Some(raw) => raw.serialize(serializer),
            None => serialize_decimal(&self.value, serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_json)
    }
}

/// The listed price of a product.
///
/// Prices compare exactly and are totally ordered. Missing or non-numeric
/// prices decode as zero (see [`coerce_decimal`]).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub Amount);

/// The average customer rating of a product. Only used as a sort key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(pub Amount);

impl Price {
    pub const ZERO: Self = Self(Amount::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(Amount::new(value))
    }

    pub fn value(&self) -> Decimal {
        self.0.value()
    }

    pub fn source(&self) -> Option<&Value> {
        self.0.source()
    }
}

impl Rating {
    pub const ZERO: Self = Self(Amount::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(Amount::new(value))
    }

    pub fn value(&self) -> Decimal {
        self.0.value()
    }

    pub fn source(&self) -> Option<&Value> {
        self.0.source()
    }
}

impl From<Decimal> for Price {
    fn from(value: Decimal) -> Self {
        Self::new(value)
    }
}

impl From<Decimal> for Rating {
    fn from(value: Decimal) -> Self {
        Self::new(value)
    }
}

/// Writes a decimal as a plain JSON number: integral values as integers,
/// everything else as a float.
fn serialize_decimal<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract().is_zero()
        && let Some(whole) = value.to_i64()
    {
        return serializer.serialize_i64(whole);
    }
    match value.to_f64() {
        Some(float) => serializer.serialize_f64(float),
        None => serializer.serialize_str(&value.to_string()),
    }
}

/// Lenient numeric coercion for product fields.
///
/// Numbers and numeric strings are converted exactly (see [`decimal_from_number`]);
/// `null`, booleans, arrays, objects and unparsable strings become zero.
pub fn coerce_decimal(raw: &Value) -> Decimal {
    match raw {
        Value::Number(number) => decimal_from_number(number),
        Value::String(text) => decimal_from_text(text).unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

/// Converts a JSON number without going through a binary float.
///
/// Floats are read from their shortest round-trip text, so two different
/// floats always give two different decimals. Magnitudes beyond the `Decimal`
/// range saturate to `Decimal::MIN` / `Decimal::MAX`.
pub fn decimal_from_number(number: &Number) -> Decimal {
    if let Some(int) = number.as_i64() {
        return Decimal::from(int);
    }
    if let Some(uint) = number.as_u64() {
        return Decimal::from(uint);
    }
    let float = number.as_f64().unwrap_or_default();
    decimal_from_float(float, &number.to_string())
}

/// Parses a numeric string with the same saturation as [`decimal_from_number`].
///
/// Returns `None` for text that is not a finite number.
pub fn decimal_from_text(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if let Ok(value) = Decimal::from_str(text) {
        return Some(value);
    }
    let float = text.parse::<f64>().ok().filter(|float| float.is_finite())?;
    Some(decimal_from_float(float, text))
}

fn decimal_from_float(float: f64, text: &str) -> Decimal {
    if float.abs() < DECIMAL_LIMIT
        && let Some(value) = parse_decimal(text)
    {
        return value;
    }
    if float.abs() < 1.0 {
        // More fractional digits than `Decimal` keeps.
        Decimal::from_f64(float).unwrap_or_default()
    } else if float.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

/// Parses plain (`19.99`) and scientific (`1.5e2`) notation.
fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// A catalog entry.
///
/// The engine reads only `name`, `category`, `price` and `rating`. Every other
/// field of the incoming record is kept in `attributes` and written back out
/// unchanged, so results carry the same representation as the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub rating: Rating,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Product {
    pub fn new(
        id: impl Into<Value>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: Decimal,
        rating: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            price: Price::new(price),
            rating: Rating::new(rating),
            attributes: Map::new(),
        }
    }

    /// Adds a pass-through attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}
