use std::sync::LazyLock;

use super::{Type, TypeDefinition};
use crate::{
    error::{Error, Result},
    Value,
};

static STRING: LazyLock<Type> = LazyLock::new(|| {
    Type::new(TypeDefinition::scalar(
        "String",
        "The `String` scalar type represents textual data, represented as UTF-8 character sequences.",
    ))
});

static ID: LazyLock<Type> = LazyLock::new(|| {
    Type::new(TypeDefinition::scalar(
        "ID",
        "The `ID` scalar type represents a unique identifier, serialized as a string.",
    ))
});

static INT: LazyLock<Type> = LazyLock::new(|| {
    Type::new(TypeDefinition::scalar(
        "Int",
        "The `Int` scalar type represents non-fractional signed whole numeric values between -2^31 and 2^31 - 1.",
    ))
});

static FLOAT: LazyLock<Type> = LazyLock::new(|| {
    Type::new(TypeDefinition::scalar(
        "Float",
        "The `Float` scalar type represents signed double-precision fractional values.",
    ))
});

static BOOLEAN: LazyLock<Type> = LazyLock::new(|| {
    Type::new(TypeDefinition::scalar(
        "Boolean",
        "The `Boolean` scalar type represents `true` or `false`.",
    ))
});

/// Built-in scalars. Each has exactly one shared type handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    String,
    Id,
    Int,
    Float,
    Boolean,
}

impl Scalar {
    pub fn ty(self) -> Type {
        match self {
            Scalar::String => STRING.clone(),
            Scalar::Id => ID.clone(),
            Scalar::Int => INT.clone(),
            Scalar::Float => FLOAT.clone(),
            Scalar::Boolean => BOOLEAN.clone(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Scalar::String => "String",
            Scalar::Id => "ID",
            Scalar::Int => "Int",
            Scalar::Float => "Float",
            Scalar::Boolean => "Boolean",
        }
    }

    /// `null` is handled by the caller and never reaches this.
    pub(crate) fn coerce(self, raw: Value) -> Result<serde_json::Value> {
        match (self, raw) {
            (Scalar::Boolean, raw) => Ok(raw.is_truthy().into()),
            (Scalar::String | Scalar::Id, Value::String(s)) => Ok(s.into()),
            (Scalar::String | Scalar::Id, Value::Number(n)) => Ok(n.to_string().into()),
            (Scalar::String | Scalar::Id, Value::Boolean(b)) => Ok(b.to_string().into()),
            (Scalar::Int, Value::Number(n)) => match as_int(&n) {
                Some(int) => Ok(int.into()),
                None => Err(self.invalid(&Value::Number(n))),
            },
            (Scalar::Float, Value::Number(n)) => Ok(serde_json::Value::Number(n)),
            (_, raw) => Err(self.invalid(&raw)),
        }
    }

    fn invalid(self, raw: &Value) -> Error {
        Error::InvalidScalarValue {
            scalar: self.name(),
            value: raw.to_string(),
        }
    }
}

fn as_int(n: &serde_json::Number) -> Option<i32> {
    if let Some(int) = n.as_i64() {
        return i32::try_from(int).ok();
    }
    n.as_f64()
        .filter(|float| float.fract() == 0.0 && *float >= f64::from(i32::MIN) && *float <= f64::from(i32::MAX))
        .map(|float| float as i32)
}
