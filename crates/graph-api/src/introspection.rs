//! The schema describing itself.
//!
//! The meta types (`__Schema`, `__Type`, ...) are ordinary object types. What
//! they are bound to at execution time are the views below, which answer
//! attribute lookups about the registered types.

mod meta_types;

use std::collections::HashSet;

use crate::{EnumValue, FieldDescriptor, Resolvable, Type, TypeKind, Value};

/// Name of the meta field injected on the query root.
pub const SCHEMA_FIELD: &str = "__schema";

/// Meta field available on every object type.
pub const TYPENAME_FIELD: &str = "__typename";

/// The `__Schema` meta type.
pub fn schema_type() -> Type {
    meta_types::SCHEMA.clone()
}

pub fn build_schema_introspection(root: &Type) -> SchemaIntrospection {
    SchemaIntrospection::new(root.clone())
}

/// Every type reachable from `root` through its fields, in introspection order:
/// user types before meta types, then by kind, then by name.
///
/// `root` itself is only part of the result when something refers back to it.
pub fn collect_types(root: &Type) -> Vec<Type> {
    let mut types = HashSet::new();
    collect_types_into(root, &mut types);

    let mut types = types.into_iter().collect::<Vec<_>>();
    types.sort_by(|a, b| type_key(a).cmp(&type_key(b)));
    types
}

fn type_key(ty: &Type) -> (bool, TypeKind, &str) {
    (ty.is_meta_type(), ty.kind(), ty.name())
}

fn collect_types_into(object_type: &Type, types: &mut HashSet<Type>) {
    for (_, field) in object_type.fields() {
        if field.is_self_reference() {
            continue;
        }
        let ty = field.named_type(object_type);
        if types.insert(ty.clone()) {
            collect_types_into(&ty, types);
        }
    }
}

/// What `__schema` resolves to.
pub struct SchemaIntrospection {
    query_type: Type,
}

impl SchemaIntrospection {
    pub fn new(query_type: Type) -> Self {
        SchemaIntrospection { query_type }
    }

    pub fn query_type(&self) -> &Type {
        &self.query_type
    }

    pub fn types(&self) -> Vec<Type> {
        collect_types(&self.query_type)
    }
}

impl Resolvable for SchemaIntrospection {
    fn attribute(&self, name: &str) -> Value {
        match name {
            "types" => Value::List(
                self.types()
                    .into_iter()
                    .map(|ty| Value::object(IntrospectedType::Named(ty)))
                    .collect(),
            ),
            "queryType" => Value::object(IntrospectedType::Named(self.query_type.clone())),
            "directives" => Value::List(Vec::new()),
            _ => Value::Null,
        }
    }
}

/// What `__Type` is bound to: a named type or a wrapper around one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntrospectedType {
    Named(Type),
    List(Box<IntrospectedType>),
    NonNull(Box<IntrospectedType>),
}

impl IntrospectedType {
    /// The type of `field` as declared on `owner`, list and non-null wrapping included.
    pub fn of_field(owner: &Type, field: &FieldDescriptor) -> Self {
        let mut ty = IntrospectedType::Named(field.named_type(owner));
        if field.is_list() {
            ty = IntrospectedType::List(Box::new(ty));
        }
        if field.is_non_null() {
            ty = IntrospectedType::NonNull(Box::new(ty));
        }
        ty
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            IntrospectedType::Named(ty) => ty.kind(),
            IntrospectedType::List(_) => TypeKind::List,
            IntrospectedType::NonNull(_) => TypeKind::NonNull,
        }
    }

    fn named(&self) -> Option<&Type> {
        match self {
            IntrospectedType::Named(ty) => Some(ty),
            IntrospectedType::List(_) | IntrospectedType::NonNull(_) => None,
        }
    }

    /// Alphabetical. `None` unless this is an object type.
    pub fn fields(&self) -> Option<Vec<IntrospectedField>> {
        let ty = self.named().filter(|ty| ty.kind() == TypeKind::Object)?;
        let mut fields = ty
            .fields()
            .map(|(name, descriptor)| IntrospectedField {
                owner: ty.clone(),
                name: name.to_owned(),
                descriptor: descriptor.clone(),
            })
            .collect::<Vec<_>>();
        fields.sort_by(|a, b| a.name.cmp(&b.name));
        Some(fields)
    }

    /// `None` unless this is an enum type.
    pub fn enum_values(&self) -> Option<&[EnumValue]> {
        self.named()
            .filter(|ty| ty.kind() == TypeKind::Enum)
            .map(|ty| ty.enum_values())
    }

    pub fn of_type(&self) -> Option<&IntrospectedType> {
        match self {
            IntrospectedType::Named(_) => None,
            IntrospectedType::List(inner) | IntrospectedType::NonNull(inner) => Some(inner),
        }
    }
}

impl Resolvable for IntrospectedType {
    fn attribute(&self, name: &str) -> Value {
        match name {
            "kind" => self.kind().to_string().into(),
            "name" => self.named().map(|ty| ty.name()).into(),
            "description" => self.named().and_then(|ty| ty.description()).into(),
            "fields" => self
                .fields()
                .map(|fields| Value::List(fields.into_iter().map(Value::object).collect()))
                .unwrap_or_default(),
            "enumValues" => self
                .enum_values()
                .map(|values| Value::List(values.iter().cloned().map(Value::object).collect()))
                .unwrap_or_default(),
            "inputFields" => Value::List(Vec::new()),
            "ofType" => self
                .of_type()
                .map(|inner| Value::object(inner.clone()))
                .unwrap_or_default(),
            // interfaces and possibleTypes: no abstract types.
            _ => Value::Null,
        }
    }
}

/// What `__Field` is bound to.
#[derive(Debug, Clone)]
pub struct IntrospectedField {
    owner: Type,
    name: String,
    descriptor: FieldDescriptor,
}

impl IntrospectedField {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> IntrospectedType {
        IntrospectedType::of_field(&self.owner, &self.descriptor)
    }
}

impl Resolvable for IntrospectedField {
    fn attribute(&self, name: &str) -> Value {
        match name {
            "name" => self.name.as_str().into(),
            "description" => self.descriptor.description().into(),
            "args" => Value::List(Vec::new()),
            "type" => Value::object(self.ty()),
            "isDeprecated" => self.descriptor.deprecation_reason().is_some().into(),
            "deprecationReason" => self.descriptor.deprecation_reason().into(),
            _ => Value::Null,
        }
    }
}

impl Resolvable for EnumValue {
    fn attribute(&self, name: &str) -> Value {
        match name {
            "name" => self.name.as_str().into(),
            "description" => self.description.clone().into(),
            "isDeprecated" => self.is_deprecated().into(),
            "deprecationReason" => self.deprecation_reason.clone().into(),
            _ => Value::Null,
        }
    }
}
