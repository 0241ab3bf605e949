use std::{any::Any, fmt, sync::Arc};

use indexmap::IndexMap;

/// A raw value, as produced by a data source before it is coerced into the response.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<Value>),
    Object(Arc<dyn Resolvable>),
}

/// Anything fields can be resolved against by attribute name.
///
/// This is the seam data sources plug into: in-memory structs, database rows or
/// values fetched over the network only need to answer attribute lookups. Fields
/// needing more than a lookup get an explicit resolver on their descriptor instead.
pub trait Resolvable: AsAny + Send + Sync {
    /// Returns the attribute called `name`, `Value::Null` when it is absent.
    fn attribute(&self, name: &str) -> Value;
}

#[doc(hidden)]
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Value {
    pub fn object(object: impl Resolvable + 'static) -> Value {
        Value::Object(Arc::new(object))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Attribute-style lookup. Anything but an object has no attributes.
    pub fn attribute(&self, name: &str) -> Value {
        match self {
            Value::Object(object) => object.attribute(name),
            _ => Value::Null,
        }
    }

    /// Borrows the concrete data source behind an object value.
    pub fn downcast_ref<T: Resolvable + 'static>(&self) -> Option<&T> {
        match self {
            Value::Object(object) => <dyn Resolvable as AsAny>::as_any(object.as_ref()).downcast_ref::<T>(),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Object(_) => true,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Object(_) => f.debug_tuple("Object").finish_non_exhaustive(),
        }
    }
}

/// JSON-like rendering, used in error messages.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Object(_) => f.write_str("{...}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Resolvable + 'static> From<Arc<T>> for Value {
    fn from(object: Arc<T>) -> Self {
        Value::Object(object)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::List(items.into_iter().map(Into::into).collect()),
            serde_json::Value::Object(map) => Value::object(map),
        }
    }
}

impl Resolvable for serde_json::Map<String, serde_json::Value> {
    fn attribute(&self, name: &str) -> Value {
        self.get(name).cloned().map(Value::from).unwrap_or_default()
    }
}

impl Resolvable for IndexMap<String, Value> {
    fn attribute(&self, name: &str) -> Value {
        self.get(name).cloned().unwrap_or_default()
    }
}
