#![allow(dead_code)]

use graph_api::{FieldDescriptor, LazyType, Schema, SchemaBuilder, Type};
use serde_json::json;

pub fn episode() -> Type {
    Type::enumeration("Episode")
        .description("One of the films in the Star Wars Trilogy")
        .value("NEWHOPE")
        .value("EMPIRE")
        .value(graph_api::EnumValue::new("JEDI").deprecated("Use RETURN"))
        .value("RETURN")
        .build()
        .unwrap()
}

pub fn character(episode: &Type) -> Type {
    Type::object("Character")
        .description("A character in the Star Wars Trilogy")
        .field("id", FieldDescriptor::id().non_null())
        .field("name", FieldDescriptor::string().with_description("The name of the character."))
        .field("appearsIn", FieldDescriptor::many_enum(episode))
        .field("friends", FieldDescriptor::many_related(LazyType::SelfType))
        .field("bestFriend", FieldDescriptor::related(LazyType::SelfType))
        .field("height", FieldDescriptor::float())
        .field("isDroid", FieldDescriptor::boolean())
        .field(
            "nickname",
            FieldDescriptor::string().deprecated("Nobody calls them that"),
        )
        .build()
}

/// `hero` and `droids` read from the root data, `hello` always answers "world".
pub fn query() -> Type {
    let character = character(&episode());
    Type::object("Query")
        .field("hero", FieldDescriptor::related(&character))
        .field("droids", FieldDescriptor::many_related(&character))
        .field(
            "hello",
            FieldDescriptor::string().resolve_with(|_| Ok("world".into())),
        )
        .build()
}

pub fn builder() -> SchemaBuilder {
    Schema::build().register_query_root(&query())
}

pub fn schema() -> Schema {
    builder().finish().unwrap()
}

pub fn luke() -> serde_json::Value {
    json!({
        "id": 1000,
        "name": "Luke Skywalker",
        "appearsIn": ["NEWHOPE", "EMPIRE", "RETURN"],
        "height": 1.72,
        "isDroid": 0,
        "friends": [
            {"id": "2000", "name": "Han Solo", "friends": []},
            {"id": "2001", "name": "R2-D2", "isDroid": "yes"}
        ]
    })
}
