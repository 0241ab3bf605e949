//! Type and field declarations.
//!
//! A schema is a graph of [`Type`] handles. Object types own their
//! [`FieldDescriptor`]s, enums own their [`EnumValue`]s and scalars are the
//! built-in handles from [`Scalar`]. Types are immutable once built and shared
//! by reference counting; two handles are the same type only if they point to
//! the same definition.

mod field;
mod scalars;

use std::{fmt, hash::Hash, ops::Deref, sync::Arc};

use indexmap::IndexMap;

pub use field::{FieldDescriptor, FieldKind, Resolver};
pub(crate) use field::Coerced;
pub use scalars::Scalar;

use crate::error::{Error, Result};

/// The kind of a type. The declaration order is the order introspection sorts by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    strum::Display,
    strum::AsRefStr,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

/// Shared handle to a [`TypeDefinition`]. Equality and hashing use identity.
#[derive(Clone)]
pub struct Type(Arc<TypeDefinition>);

pub struct TypeDefinition {
    name: String,
    description: Option<String>,
    kind: TypeKind,
    fields: IndexMap<String, FieldDescriptor>,
    enum_values: Vec<EnumValue>,
}

impl Type {
    pub fn object(name: impl Into<String>) -> ObjectBuilder {
        ObjectBuilder::new(name)
    }

    pub fn enumeration(name: impl Into<String>) -> EnumBuilder {
        EnumBuilder::new(name)
    }

    pub(crate) fn new(definition: TypeDefinition) -> Type {
        Type(Arc::new(definition))
    }

    /// Builds a type whose definition can refer back to its own handle.
    pub(crate) fn new_cyclic(build: impl FnOnce(&std::sync::Weak<TypeDefinition>) -> TypeDefinition) -> Type {
        Type(Arc::new_cyclic(build))
    }

    pub(crate) fn from_arc(definition: Arc<TypeDefinition>) -> Type {
        Type(definition)
    }

    pub fn is_meta_type(&self) -> bool {
        self.name.starts_with("__")
    }
}

impl Deref for Type {
    type Target = TypeDefinition;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Type")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl TypeDefinition {
    pub(crate) fn scalar(name: &str, description: &str) -> TypeDefinition {
        TypeDefinition {
            name: name.to_owned(),
            description: Some(description.to_owned()),
            kind: TypeKind::Scalar,
            fields: IndexMap::new(),
            enum_values: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Declared fields, in declaration order.
    pub fn fields(&self) -> impl ExactSizeIterator<Item = (&str, &FieldDescriptor)> + '_ {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub fn enum_values(&self) -> &[EnumValue] {
        &self.enum_values
    }

    pub fn has_enum_value(&self, name: &str) -> bool {
        self.enum_values.iter().any(|value| value.name == name)
    }

    /// Copy of this definition with one more field. The original is left untouched.
    pub(crate) fn extended_with(&self, name: &str, field: FieldDescriptor) -> TypeDefinition {
        let mut fields = self.fields.clone();
        fields.insert(name.to_owned(), field);
        TypeDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            kind: self.kind,
            fields,
            enum_values: self.enum_values.clone(),
        }
    }
}

/// Reference from a related field to its target type.
///
/// Deferred references are looked up again on every access, so types can refer
/// to each other regardless of declaration order.
#[derive(Clone)]
pub enum LazyType {
    Direct(Type),
    Deferred(Arc<dyn Fn() -> Type + Send + Sync>),
    /// The type declaring the field.
    SelfType,
}

impl LazyType {
    pub fn deferred(resolve: impl Fn() -> Type + Send + Sync + 'static) -> LazyType {
        LazyType::Deferred(Arc::new(resolve))
    }

    pub fn is_self(&self) -> bool {
        matches!(self, LazyType::SelfType)
    }

    /// Resolves the reference for a field declared on `owner`.
    pub fn resolve(&self, owner: &Type) -> Type {
        match self {
            LazyType::Direct(ty) => ty.clone(),
            LazyType::Deferred(resolve) => resolve(),
            LazyType::SelfType => owner.clone(),
        }
    }
}

impl From<Type> for LazyType {
    fn from(ty: Type) -> Self {
        LazyType::Direct(ty)
    }
}

impl From<&Type> for LazyType {
    fn from(ty: &Type) -> Self {
        LazyType::Direct(ty.clone())
    }
}

impl fmt::Debug for LazyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LazyType::Direct(ty) => f.debug_tuple("Direct").field(&ty.name()).finish(),
            LazyType::Deferred(_) => f.write_str("Deferred"),
            LazyType::SelfType => f.write_str("SelfType"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
}

impl EnumValue {
    pub fn new(name: impl Into<String>) -> EnumValue {
        EnumValue {
            name: name.into(),
            description: None,
            deprecation_reason: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecation_reason.is_some()
    }
}

pub struct ObjectBuilder {
    name: String,
    description: Option<String>,
    fields: IndexMap<String, FieldDescriptor>,
}

impl ObjectBuilder {
    fn new(name: impl Into<String>) -> Self {
        ObjectBuilder {
            name: name.into(),
            description: None,
            fields: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declares a field. Declaring the same name twice keeps the last descriptor.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, field: FieldDescriptor) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    pub fn build(self) -> Type {
        Type::new(TypeDefinition {
            name: self.name,
            description: self.description,
            kind: TypeKind::Object,
            fields: self.fields,
            enum_values: Vec::new(),
        })
    }
}

pub struct EnumBuilder {
    name: String,
    description: Option<String>,
    values: Vec<EnumValue>,
}

impl EnumBuilder {
    fn new(name: impl Into<String>) -> Self {
        EnumBuilder {
            name: name.into(),
            description: None,
            values: Vec::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<EnumValue>) -> Self {
        self.values.push(value.into());
        self
    }

    #[must_use]
    pub fn values<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<EnumValue>,
    {
        self.values.extend(values.into_iter().map(Into::into));
        self
    }

    /// Fails with [`Error::EmptyEnum`] when no value was declared.
    pub fn build(self) -> Result<Type> {
        if self.values.is_empty() {
            return Err(Error::EmptyEnum { name: self.name });
        }
        Ok(self.build_unchecked())
    }

    pub(crate) fn build_unchecked(self) -> Type {
        Type::new(TypeDefinition {
            name: self.name,
            description: self.description,
            kind: TypeKind::Enum,
            fields: IndexMap::new(),
            enum_values: self.values,
        })
    }
}

impl From<&str> for EnumValue {
    fn from(name: &str) -> Self {
        EnumValue::new(name)
    }
}

impl From<String> for EnumValue {
    fn from(name: String) -> Self {
        EnumValue::new(name)
    }
}
