//! The dynamically-typed element carrier flowing through a pipeline.
//!
//! Every stage transports [`Value`]s and treats them as opaque; only
//! user-supplied callbacks inspect the payload. The carrier is a small sum
//! type over the shapes a source can hold, and it is `Eq + Hash` so that
//! `distinct` and `group_by` can use it directly as a set/map key:
//!
//! - Scalars: [`Value::Null`], [`Value::Bool`], [`Value::Int`],
//!   [`Value::Float`], [`Value::Str`].
//! - Containers: [`Value::List`] (ordered sequence, also the shape accepted
//!   by [`from_collection`](crate::from_collection)) and [`Value::Map`]
//!   (association list, the shape emitted by
//!   [`group_by`](crate::Stream::group_by)).
//!
//! Floats are stored as [`NotNan`] so the whole carrier keeps a total
//! equality; constructing a float value from `NaN` is rejected.

use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

/// A single dynamically-typed element.
///
/// # Example
/// ```
/// use rillflow::Value;
///
/// let v = Value::from(42);
/// assert_eq!(v.as_int(), Some(42));
/// assert_eq!(v.kind(), "int");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    /// Absence of a data value. Distinct from an absent *result*, which the
    /// terminal operations express as `None`.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Signed integer scalar.
    Int(i64),
    /// Finite float scalar. `NaN` is unrepresentable.
    Float(NotNan<f64>),
    /// UTF-8 string.
    Str(String),
    /// Ordered sequence of values.
    List(Vec<Value>),
    /// Key-value pairs in insertion order. Pair order carries no meaning.
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Construct a float value, rejecting `NaN`.
    ///
    /// # Errors
    /// Returns an error if `f` is `NaN`.
    pub fn float(f: f64) -> anyhow::Result<Self> {
        Ok(Value::Float(NotNan::new(f)?))
    }

    /// Short lowercase name of the variant, for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// The integer payload, if this is an [`Value::Int`].
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The float payload, if this is a [`Value::Float`].
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(f.into_inner()),
            _ => None,
        }
    }

    /// The string payload, if this is a [`Value::Str`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The element slice, if this is a [`Value::List`].
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// The pair slice, if this is a [`Value::Map`].
    #[must_use]
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Look up `key` in a [`Value::Map`] by structural equality.
    ///
    /// Returns `None` when `self` is not a map or the key is absent.
    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Serialize to a JSON string.
    ///
    /// # Errors
    /// Propagates the underlying `serde_json` error.
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from the JSON produced by [`Value::to_json`].
    ///
    /// # Errors
    /// Propagates the underlying `serde_json` error.
    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<NotNan<f64>> for Value {
    fn from(f: NotNan<f64>) -> Self {
        Value::Float(f)
    }
}
