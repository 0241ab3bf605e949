//! Executing queries against declared types and live data.

mod common;

use std::sync::Arc;

use graph_api::{
    Config, Error, ErrorCode, ErrorMode, FieldDescriptor, LazyType, Resolvable, Schema, Type, Value,
};
use indoc::indoc;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn hello_world() {
    let response = common::schema().execute("{ hello }").unwrap();

    assert!(response.is_ok());
    assert_eq!(response.into_value(), json!({"data": {"hello": "world"}}));
}

#[test]
fn root_data_is_null_by_default() {
    let response = common::schema().execute("{ hero { name } droids { name } }").unwrap();

    assert_eq!(response.into_data(), json!({"hero": null, "droids": null}));
}

#[test]
fn nested_selections() {
    let response = common::schema()
        .execute_with_root(
            indoc! {r#"
                {
                  hero {
                    id
                    name
                    appearsIn
                    height
                    isDroid
                    friends {
                      name
                      isDroid
                      friends {
                        name
                      }
                    }
                    bestFriend {
                      name
                    }
                  }
                }
            "#},
            json!({"hero": common::luke()}),
        )
        .unwrap();

    insta::assert_json_snapshot!(response.into_value(), @r###"
    {
      "data": {
        "hero": {
          "id": "1000",
          "name": "Luke Skywalker",
          "appearsIn": [
            "NEWHOPE",
            "EMPIRE",
            "RETURN"
          ],
          "height": 1.72,
          "isDroid": false,
          "friends": [
            {
              "name": "Han Solo",
              "isDroid": null,
              "friends": []
            },
            {
              "name": "R2-D2",
              "isDroid": true,
              "friends": null
            }
          ],
          "bestFriend": null
        }
      }
    }
    "###);
}

#[test]
fn absent_empty_and_present_lists_stay_distinct() {
    let root = json!({
        "droids": [
            {"name": "absent"},
            {"name": "empty", "friends": [], "appearsIn": []},
            {"name": "present", "friends": [{"name": "Luke"}], "appearsIn": ["EMPIRE"]}
        ]
    });

    let response = common::schema()
        .execute_with_root("{ droids { name appearsIn friends { name } } }", root)
        .unwrap();

    assert_eq!(
        response.into_data(),
        json!({
            "droids": [
                {"name": "absent", "appearsIn": null, "friends": null},
                {"name": "empty", "appearsIn": [], "friends": []},
                {"name": "present", "appearsIn": ["EMPIRE"], "friends": [{"name": "Luke"}]}
            ]
        })
    );
}

#[test]
fn aliases() {
    let schema = common::schema();
    let root = json!({"hero": common::luke()});

    let response = schema
        .execute_with_root("{ hero { fullName: name id: name } greeting: hello }", root.clone())
        .unwrap();
    assert_eq!(
        response.into_data(),
        json!({"hero": {"fullName": "Luke Skywalker", "id": "Luke Skywalker"}, "greeting": "world"})
    );

    // The later selection wins, the key keeps its first position.
    let response = schema.execute_with_root("{ hero { name id name: id } }", root).unwrap();
    assert_eq!(
        serde_json::to_string(&response.into_data()).unwrap(),
        r#"{"hero":{"name":"1000","id":"1000"}}"#
    );
}

#[test]
fn fragments_are_equivalent_to_inline_selections() {
    let schema = common::schema();
    let root = json!({"hero": common::luke()});

    let plain = schema
        .execute_with_root("{ hero { name friends { name } } }", root.clone())
        .unwrap();
    let named = schema
        .execute_with_root(
            indoc! {r#"
                query {
                  hero {
                    ...HeroDetails
                  }
                }

                fragment HeroDetails on Character {
                  name
                  ...Friends
                }

                fragment Friends on Character {
                  friends {
                    name
                  }
                }
            "#},
            root.clone(),
        )
        .unwrap();
    let inline = schema
        .execute_with_root("{ hero { ... on Character { name friends { name } } } }", root)
        .unwrap();

    assert_eq!(plain, named);
    assert_eq!(plain, inline);
}

#[test]
fn typename() {
    let response = common::schema()
        .execute_with_root("{ __typename hero { __typename } }", json!({"hero": {}}))
        .unwrap();

    assert_eq!(
        response.into_data(),
        json!({"__typename": "Query", "hero": {"__typename": "Character"}})
    );
}

#[test]
fn exactly_one_operation() {
    let schema = common::schema();

    for query in [
        "query A { hello } query B { hello }",
        "{ hello } query B { hello }",
        "fragment Hello on Query { hello }",
    ] {
        let error = schema.execute(query).unwrap_err();
        assert!(matches!(error, Error::MultipleOrZeroOperations), "{query}: {error}");
        assert_eq!(error.to_string(), "Exactly one query must be defined");
    }

    assert!(schema.execute("query A { hello }").is_ok());
}

#[test]
fn only_queries_are_supported() {
    let schema = common::schema();

    let error = schema.execute("mutation { hello }").unwrap_err();
    assert!(matches!(error, Error::UnsupportedOperation { operation: "mutation" }));

    let error = schema.execute("subscription { hello }").unwrap_err();
    assert!(matches!(error, Error::UnsupportedOperation { operation: "subscription" }));
}

#[test]
fn malformed_documents() {
    let error = common::schema().execute("{ hello ").unwrap_err();

    assert!(matches!(error, Error::MalformedDocument { .. }));
    assert_eq!(error.code(), ErrorCode::OperationParsingError);
}

#[test]
fn unknown_fields_and_fragments() {
    let schema = common::schema();

    let error = schema.execute("{ goodbye }").unwrap_err();
    assert_eq!(error.to_string(), "Query does not have a field named 'goodbye'");

    let error = schema
        .execute_with_root("{ hero { ...Missing } }", json!({"hero": {}}))
        .unwrap_err();
    assert!(matches!(error, Error::UnknownFragment { ref name } if name == "Missing"));

    // Document errors are never turned into partial results.
    let schema = common::builder().error_mode(ErrorMode::Partial).finish().unwrap();
    assert!(schema.execute("{ goodbye }").is_err());
}

#[test]
fn fragment_cycles() {
    let error = common::schema()
        .execute("{ ...A } fragment A on Query { hello ...B } fragment B on Query { ...A }")
        .unwrap_err();

    assert!(matches!(error, Error::FragmentCycle { ref name } if name == "A"));
}

#[test]
fn every_selection_of_a_response_key_is_checked() {
    let schema = common::schema();

    let error = schema.execute("{ hello: goodbye hello }").unwrap_err();
    assert!(matches!(error, Error::UnknownField { ref field, .. } if field == "goodbye"));

    let root = json!({"hero": {"name": "Luke", "appearsIn": ["PHANTOM"]}});
    let error = schema
        .execute_with_root("{ hero { name: appearsIn name } }", root)
        .unwrap_err();
    assert!(matches!(error, Error::InvalidEnumValue { ref value, .. } if value.contains("PHANTOM")));
}

#[test]
fn fragment_chains_are_expanded_once() {
    let mut query = String::from("{ ...F0 }");
    for i in 0..40 {
        query.push_str(&format!("\nfragment F{i} on Query {{ ...F{next} ...F{next} }}", next = i + 1));
    }
    query.push_str("\nfragment F40 on Query { hello }");

    let response = common::schema().execute(&query).unwrap();
    assert_eq!(response.into_value(), json!({"data": {"hello": "world"}}));

    let response = common::builder().limit_depth(1).finish().unwrap().execute(&query).unwrap();
    assert_eq!(response.into_data(), json!({"hello": "world"}));
}

#[test]
fn coercion_errors_abort_by_default() {
    let schema = common::schema();

    let error = schema
        .execute_with_root("{ hero { appearsIn } }", json!({"hero": {"appearsIn": ["PHANTOM"]}}))
        .unwrap_err();
    assert_eq!(error.to_string(), r#"Enum Episode has no value "PHANTOM""#);

    let error = schema
        .execute_with_root("{ hero { friends { name } } }", json!({"hero": {"friends": "Han"}}))
        .unwrap_err();
    assert!(matches!(error, Error::ExpectedList { .. }));

    let error = schema
        .execute_with_root("{ hero { height } }", json!({"hero": {"height": "tall"}}))
        .unwrap_err();
    assert_eq!(error.to_string(), r#"Float cannot represent the value "tall""#);

    let error = schema
        .execute_with_root("{ hero { id } }", json!({"hero": {"name": "Nobody"}}))
        .unwrap_err();
    assert!(matches!(error, Error::NullValueForNonNullField { ref field } if field == "id"));
}

#[test]
fn partial_results() {
    let schema = common::builder().error_mode(ErrorMode::Partial).finish().unwrap();

    let response = schema
        .execute_with_root(
            indoc! {r#"
                {
                  hero {
                    name
                    appearsIn
                  }
                  hello
                }
            "#},
            json!({"hero": {"name": "Luke", "appearsIn": ["NEWHOPE", "PHANTOM"]}}),
        )
        .unwrap();

    insta::assert_json_snapshot!(response.into_value(), @r###"
    {
      "data": {
        "hero": {
          "name": "Luke",
          "appearsIn": null
        },
        "hello": "world"
      },
      "errors": [
        {
          "message": "Enum Episode has no value \"PHANTOM\"",
          "locations": [
            {
              "line": 4,
              "column": 5
            }
          ],
          "path": [
            "hero",
            "appearsIn"
          ],
          "extensions": {
            "code": "RESULT_COERCION_ERROR"
          }
        }
      ]
    }
    "###);
}

#[test]
fn non_null_errors_reach_the_root() {
    let character = common::character(&common::episode());
    let query = Type::object("Query")
        .field("hero", FieldDescriptor::related(&character).non_null())
        .build();
    let schema = Schema::build()
        .register_query_root(&query)
        .error_mode(ErrorMode::Partial)
        .finish()
        .unwrap();

    let response = schema
        .execute_with_root("{ hero { id name } }", json!({"hero": {"name": "Nobody"}}))
        .unwrap();

    insta::assert_json_snapshot!(response.into_value(), @r###"
    {
      "data": null,
      "errors": [
        {
          "message": "Field 'id' is non-null but resolved to null",
          "locations": [
            {
              "line": 1,
              "column": 10
            }
          ],
          "path": [
            "hero",
            "id"
          ],
          "extensions": {
            "code": "RESULT_COERCION_ERROR"
          }
        }
      ]
    }
    "###);
}

#[test]
fn resolver_errors() {
    let query = Type::object("Query")
        .field(
            "flaky",
            FieldDescriptor::string().resolve_with(|_| Err("connection reset".into())),
        )
        .field("stable", FieldDescriptor::string().resolve_with(|_| Ok("ok".into())))
        .build();

    let schema = Schema::build().register_query_root(&query).finish().unwrap();
    let error = schema.execute("{ stable flaky }").unwrap_err();
    assert_eq!(error.to_string(), "Resolver for 'flaky' failed: connection reset");

    let schema = Schema::build()
        .register_query_root(&query)
        .error_mode(ErrorMode::Partial)
        .finish()
        .unwrap();
    let response = schema.execute("{ stable flaky }").unwrap();

    assert!(!response.is_ok());
    assert_eq!(response.errors[0].code(), ErrorCode::ResolverError);
    assert_eq!(response.into_data(), json!({"stable": "ok", "flaky": null}));
}

#[test]
fn depth_limit() {
    let schema = common::builder().limit_depth(2).finish().unwrap();
    let root = json!({"hero": common::luke()});

    assert!(schema.execute_with_root("{ hero { name } }", root.clone()).is_ok());

    let error = schema
        .execute_with_root("{ hero { ...Friends } } fragment Friends on Character { friends { name } }", root)
        .unwrap_err();
    assert!(matches!(error, Error::DepthLimitExceeded { depth: 3, limit: 2 }));
}

#[test]
fn config_from_toml() {
    let config = Config::from_toml(indoc! {r#"
        introspection = false
        error_mode = "partial"

        [operation_limits]
        depth = 3
    "#})
    .unwrap();
    let schema = common::builder().with_config(config).finish().unwrap();

    assert!(matches!(
        schema.execute("{ __schema { queryType { name } } }"),
        Err(Error::UnknownField { .. })
    ));
    assert!(matches!(
        schema.execute("{ hero { friends { friends { name } } } }"),
        Err(Error::DepthLimitExceeded { depth: 4, limit: 3 })
    ));
    assert!(schema.execute("{ hello }").is_ok());
}

struct Droid {
    name: &'static str,
    friends: Vec<Arc<Droid>>,
}

impl Resolvable for Droid {
    fn attribute(&self, name: &str) -> Value {
        match name {
            "name" => self.name.into(),
            "friends" => Value::List(self.friends.iter().cloned().map(Value::from).collect()),
            _ => Value::Null,
        }
    }
}

#[test]
fn custom_data_sources() {
    let droid = Type::object("Droid")
        .field("name", FieldDescriptor::string())
        .field(
            "shout",
            FieldDescriptor::string().resolve_with(|data| {
                let droid = data.downcast_ref::<Droid>().ok_or("not a droid")?;
                Ok(droid.name.to_uppercase().into())
            }),
        )
        .field("friends", FieldDescriptor::many_related(LazyType::SelfType))
        .build();
    let query = Type::object("Query")
        .field("droid", FieldDescriptor::related(&droid))
        .build();
    let schema = Schema::build().register_query_root(&query).finish().unwrap();

    let threepio = Arc::new(Droid {
        name: "C-3PO",
        friends: Vec::new(),
    });
    let artoo = Droid {
        name: "R2-D2",
        friends: vec![threepio],
    };
    let mut root = indexmap::IndexMap::new();
    root.insert("droid".to_owned(), Value::object(artoo));

    let response = schema
        .execute_with_root("{ droid { name shout friends { shout } } }", Value::object(root))
        .unwrap();

    assert_eq!(
        response.into_data(),
        json!({"droid": {"name": "R2-D2", "shout": "R2-D2", "friends": [{"shout": "C-3PO"}]}})
    );
}

#[test]
fn concurrent_execution() {
    let schema = common::schema();

    std::thread::scope(|scope| {
        let handles = (0..8)
            .map(|i| {
                let schema = schema.clone();
                scope.spawn(move || {
                    schema
                        .execute_with_root("{ hero { name } }", json!({"hero": {"name": format!("hero {i}")}}))
                        .unwrap()
                        .into_data()
                })
            })
            .collect::<Vec<_>>();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), json!({"hero": {"name": format!("hero {i}")}}));
        }
    });
}

#[test]
fn deferred_references() {
    use std::sync::LazyLock;

    static PERSON: LazyLock<Type> = LazyLock::new(|| {
        Type::object("Person")
            .field("name", FieldDescriptor::string())
            .field("pet", FieldDescriptor::related(LazyType::deferred(|| PET.clone())))
            .build()
    });
    static PET: LazyLock<Type> = LazyLock::new(|| {
        Type::object("Pet")
            .field("name", FieldDescriptor::string())
            .field("owner", FieldDescriptor::related(LazyType::deferred(|| PERSON.clone())))
            .build()
    });

    let query = Type::object("Query").field("person", FieldDescriptor::related(&*PERSON)).build();
    let schema = Schema::build().register_query_root(&query).finish().unwrap();

    let response = schema
        .execute_with_root(
            "{ person { name pet { name owner { name } } } }",
            json!({"person": {"name": "Ada", "pet": {"name": "Rex", "owner": {"name": "Ada"}}}}),
        )
        .unwrap();

    assert_eq!(
        response.into_data(),
        json!({"person": {"name": "Ada", "pet": {"name": "Rex", "owner": {"name": "Ada"}}}})
    );
}
