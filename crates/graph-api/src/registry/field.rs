use std::{fmt, sync::Arc};

use super::{LazyType, Scalar, Type, TypeKind};
use crate::{
    error::{BoxError, Error, Result},
    Value,
};

/// Explicit resolver for a field. Receives the data value the owning type is bound to.
pub type Resolver = Arc<dyn Fn(&Value) -> Result<Value, BoxError> + Send + Sync>;

#[derive(Clone, Debug)]
pub enum FieldKind {
    Scalar(Scalar),
    Enum(Type),
    ManyEnum(Type),
    Related(LazyType),
    ManyRelated(LazyType),
}

/// Declarative description of one queryable field.
#[derive(Clone)]
pub struct FieldDescriptor {
    kind: FieldKind,
    description: Option<String>,
    deprecation_reason: Option<String>,
    non_null: bool,
    resolver: Option<Resolver>,
}

/// A raw value after coercion. Objects still need their selection set executed
/// against the target type.
pub(crate) enum Coerced {
    Leaf(serde_json::Value),
    Object(Type, Value),
    Objects(Type, Vec<Value>),
}

impl FieldDescriptor {
    pub fn new(kind: FieldKind) -> Self {
        FieldDescriptor {
            kind,
            description: None,
            deprecation_reason: None,
            non_null: false,
            resolver: None,
        }
    }

    pub fn string() -> Self {
        Self::new(FieldKind::Scalar(Scalar::String))
    }

    pub fn id() -> Self {
        Self::new(FieldKind::Scalar(Scalar::Id))
    }

    pub fn int() -> Self {
        Self::new(FieldKind::Scalar(Scalar::Int))
    }

    pub fn float() -> Self {
        Self::new(FieldKind::Scalar(Scalar::Float))
    }

    pub fn boolean() -> Self {
        Self::new(FieldKind::Scalar(Scalar::Boolean))
    }

    pub fn enumeration(ty: &Type) -> Self {
        Self::new(FieldKind::Enum(ty.clone()))
    }

    pub fn many_enum(ty: &Type) -> Self {
        Self::new(FieldKind::ManyEnum(ty.clone()))
    }

    pub fn related(target: impl Into<LazyType>) -> Self {
        Self::new(FieldKind::Related(target.into()))
    }

    pub fn many_related(target: impl Into<LazyType>) -> Self {
        Self::new(FieldKind::ManyRelated(target.into()))
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }

    /// Resolving this field to null becomes an error.
    #[must_use]
    pub fn non_null(mut self) -> Self {
        self.non_null = true;
        self
    }

    /// Replaces the default attribute lookup with `resolver`.
    #[must_use]
    pub fn resolve_with<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn deprecation_reason(&self) -> Option<&str> {
        self.deprecation_reason.as_deref()
    }

    pub fn is_non_null(&self) -> bool {
        self.non_null
    }

    /// The type values of this field are made of, list wrapping aside.
    /// `owner` is the type declaring this field, the target of a self reference.
    pub fn named_type(&self, owner: &Type) -> Type {
        match &self.kind {
            FieldKind::Scalar(scalar) => scalar.ty(),
            FieldKind::Enum(ty) | FieldKind::ManyEnum(ty) => ty.clone(),
            FieldKind::Related(target) | FieldKind::ManyRelated(target) => target.resolve(owner),
        }
    }

    pub fn is_self_reference(&self) -> bool {
        matches!(&self.kind, FieldKind::Related(target) | FieldKind::ManyRelated(target) if target.is_self())
    }

    pub fn is_list(&self) -> bool {
        matches!(self.kind, FieldKind::ManyEnum(_) | FieldKind::ManyRelated(_))
    }

    /// Produces the raw value of the field named `name` from `data`.
    pub fn resolve(&self, name: &str, data: &Value) -> Result<Value> {
        match &self.resolver {
            Some(resolver) => resolver(data).map_err(|err| Error::Resolver {
                field: name.to_owned(),
                message: err.to_string(),
            }),
            None => Ok(data.attribute(name)),
        }
    }

    /// `owner` is the type declaring this field, the target of a self reference.
    pub(crate) fn coerce(&self, owner: &Type, raw: Value) -> Result<Coerced> {
        if raw.is_null() {
            return Ok(Coerced::Leaf(serde_json::Value::Null));
        }
        match &self.kind {
            FieldKind::Scalar(scalar) => scalar.coerce(raw).map(Coerced::Leaf),
            FieldKind::Enum(ty) => coerce_enum(ty, raw).map(Coerced::Leaf),
            FieldKind::ManyEnum(ty) => {
                let items = expect_list(raw)?
                    .into_iter()
                    .map(|item| match item {
                        Value::Null => Ok(serde_json::Value::Null),
                        item => coerce_enum(ty, item),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Coerced::Leaf(serde_json::Value::Array(items)))
            }
            FieldKind::Related(target) => Ok(Coerced::Object(target.resolve(owner), raw)),
            FieldKind::ManyRelated(target) => {
                let items = expect_list(raw)?;
                Ok(Coerced::Objects(target.resolve(owner), items))
            }
        }
    }
}

fn expect_list(raw: Value) -> Result<Vec<Value>> {
    match raw {
        Value::List(items) => Ok(items),
        other => Err(Error::ExpectedList {
            value: other.to_string(),
        }),
    }
}

fn coerce_enum(ty: &Type, raw: Value) -> Result<serde_json::Value> {
    debug_assert_eq!(ty.kind(), TypeKind::Enum);
    match raw {
        Value::String(name) if ty.has_enum_value(&name) => Ok(serde_json::Value::String(name)),
        other => Err(Error::InvalidEnumValue {
            enum_name: ty.name().to_owned(),
            value: other.to_string(),
        }),
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("kind", &self.kind)
            .field("description", &self.description)
            .field("deprecation_reason", &self.deprecation_reason)
            .field("non_null", &self.non_null)
            .field("has_resolver", &self.resolver.is_some())
            .finish()
    }
}
