use std::sync::LazyLock;

use strum::IntoEnumIterator;

use crate::{EnumValue, FieldDescriptor, LazyType, Type, TypeKind};

pub(super) static TYPE_KIND: LazyLock<Type> = LazyLock::new(|| {
    Type::enumeration("__TypeKind")
        .description("An enum describing what kind of type a given `__Type` is.")
        .values(TypeKind::iter())
        .build_unchecked()
});

pub(super) static DIRECTIVE_LOCATION: LazyLock<Type> = LazyLock::new(|| {
    Type::enumeration("__DirectiveLocation")
        .description("A Directive can be adjacent to many parts of the GraphQL language.")
        .values([
            "QUERY",
            "MUTATION",
            "FIELD",
            "FRAGMENT_DEFINITION",
            "FRAGMENT_SPREAD",
            "INLINE_FRAGMENT",
        ])
        .build_unchecked()
});

pub(super) static INPUT_VALUE: LazyLock<Type> = LazyLock::new(|| {
    Type::object("__InputValue")
        .description("Arguments provided to Fields or Directives and the input fields of an InputObject.")
        .field("name", FieldDescriptor::string())
        .field("description", FieldDescriptor::string())
        .field("type", FieldDescriptor::related(LazyType::deferred(|| TYPE.clone())))
        .field("defaultValue", FieldDescriptor::string())
        .build()
});

pub(super) static DIRECTIVE: LazyLock<Type> = LazyLock::new(|| {
    Type::object("__Directive")
        .field("name", FieldDescriptor::string())
        .field("description", FieldDescriptor::string())
        .field("locations", FieldDescriptor::many_enum(&DIRECTIVE_LOCATION))
        .field("args", FieldDescriptor::many_related(&*INPUT_VALUE))
        .build()
});

pub(super) static FIELD: LazyLock<Type> = LazyLock::new(|| {
    Type::object("__Field")
        .description("Object and Interface types are described by a list of Fields, each of which has a name, potentially a list of arguments, and a return type.")
        .field("name", FieldDescriptor::string())
        .field("description", FieldDescriptor::string())
        .field("args", FieldDescriptor::many_related(&*INPUT_VALUE))
        .field("type", FieldDescriptor::related(LazyType::deferred(|| TYPE.clone())))
        .field("isDeprecated", FieldDescriptor::boolean())
        .field("deprecationReason", FieldDescriptor::string())
        .build()
});

pub(super) static ENUM_VALUE: LazyLock<Type> = LazyLock::new(|| {
    Type::object("__EnumValue")
        .description("One possible value for a given Enum.")
        .field("name", FieldDescriptor::string())
        .field("description", FieldDescriptor::string())
        .field("isDeprecated", FieldDescriptor::boolean())
        .field("deprecationReason", FieldDescriptor::string())
        .build()
});

pub(super) static TYPE: LazyLock<Type> = LazyLock::new(|| {
    Type::object("__Type")
        .description("The fundamental unit of any GraphQL Schema is the type.")
        .field("kind", FieldDescriptor::enumeration(&TYPE_KIND))
        .field("name", FieldDescriptor::string())
        .field("description", FieldDescriptor::string())
        .field("fields", FieldDescriptor::many_related(&*FIELD))
        .field("inputFields", FieldDescriptor::many_related(&*INPUT_VALUE))
        .field("interfaces", FieldDescriptor::many_related(LazyType::SelfType))
        .field("possibleTypes", FieldDescriptor::many_related(LazyType::SelfType))
        .field("enumValues", FieldDescriptor::many_related(&*ENUM_VALUE))
        .field("ofType", FieldDescriptor::related(LazyType::SelfType))
        .build()
});

pub(super) static SCHEMA: LazyLock<Type> = LazyLock::new(|| {
    Type::object("__Schema")
        .description("A GraphQL Schema defines the capabilities of a GraphQL server.")
        .field("types", FieldDescriptor::many_related(&*TYPE))
        .field("queryType", FieldDescriptor::related(&*TYPE))
        .field("mutationType", FieldDescriptor::related(&*TYPE))
        .field("subscriptionType", FieldDescriptor::related(&*TYPE))
        .field("directives", FieldDescriptor::many_related(&*DIRECTIVE))
        .build()
});

impl From<TypeKind> for EnumValue {
    fn from(kind: TypeKind) -> Self {
        EnumValue::new(kind.to_string())
    }
}
