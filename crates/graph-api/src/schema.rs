use std::{
    ops::Deref,
    sync::{Arc, Weak},
};

use async_graphql_parser::types::OperationType;

use crate::{
    config::{Config, ErrorMode},
    error::{Error, ErrorPath, Result},
    execution::{check_depth, ExecutableNode, ExecutionContext, Failure},
    introspection::{self, SchemaIntrospection, SCHEMA_FIELD},
    registry::{FieldKind, TypeDefinition},
    FieldDescriptor, Response, Type, TypeKind, Value,
};

/// Registration phase of a [`Schema`].
#[derive(Default)]
pub struct SchemaBuilder {
    query_root: Option<Type>,
    config: Config,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `base` as the query root. Registering again replaces the previous root.
    #[must_use]
    pub fn register_query_root(mut self, base: &Type) -> Self {
        self.query_root = Some(base.clone());
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn error_mode(mut self, error_mode: ErrorMode) -> Self {
        self.config.error_mode = error_mode;
        self
    }

    /// Set the maximum depth a query can have. By default, there is no limit.
    #[must_use]
    pub fn limit_depth(mut self, depth: u16) -> Self {
        self.config.operation_limits.depth = Some(depth);
        self
    }

    /// Leaves `__schema` out of the query root.
    #[must_use]
    pub fn disable_introspection(mut self) -> Self {
        self.config.introspection = false;
        self
    }

    /// Seals the schema. The registered base type is left as it was: the query
    /// root is a copy of it, extended with `__schema` unless introspection is disabled.
    pub fn finish(self) -> Result<Schema> {
        let base = self.query_root.ok_or(Error::MissingQueryRoot)?;
        validate(&base)?;

        let query_root = if self.config.introspection {
            derive_query_root(&base)
        } else {
            base
        };

        tracing::debug!(
            root = query_root.name(),
            introspection = self.config.introspection,
            error_mode = %self.config.error_mode,
            "Schema sealed"
        );

        Ok(Schema(Arc::new(SchemaInner {
            query_root,
            config: self.config,
        })))
    }
}

fn derive_query_root(base: &Type) -> Type {
    Type::new_cyclic(|root: &Weak<TypeDefinition>| {
        let root = root.clone();
        let field = FieldDescriptor::related(introspection::schema_type()).resolve_with(move |_| {
            let root = root.upgrade().map(Type::from_arc).ok_or("the schema is gone")?;
            Ok(Value::object(SchemaIntrospection::new(root)))
        });
        base.extended_with(SCHEMA_FIELD, field)
    })
}

fn validate(base: &Type) -> Result<()> {
    let mut types = introspection::collect_types(base);
    types.push(base.clone());

    for ty in &types {
        if ty.kind() == TypeKind::Enum && ty.enum_values().is_empty() {
            return Err(Error::EmptyEnum {
                name: ty.name().to_owned(),
            });
        }
        for (name, field) in ty.fields() {
            if let FieldKind::Enum(target) | FieldKind::ManyEnum(target) = field.kind() {
                if target.kind() != TypeKind::Enum {
                    return Err(Error::NotAnEnum {
                        field: format!("{}.{}", ty.name(), name),
                        type_name: target.name().to_owned(),
                        kind: target.kind(),
                    });
                }
            }
        }
    }
    Ok(())
}

pub struct SchemaInner {
    query_root: Type,
    config: Config,
}

/// A sealed schema. Cheap to clone and safe to execute against from many threads.
#[derive(Clone)]
pub struct Schema(Arc<SchemaInner>);

impl Deref for Schema {
    type Target = SchemaInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl SchemaInner {
    /// The root type queries are executed against.
    pub fn query_root(&self) -> &Type {
        &self.query_root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Schema {
    pub fn build() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// What `__schema` resolves to.
    pub fn introspection(&self) -> SchemaIntrospection {
        introspection::build_schema_introspection(&self.query_root)
    }

    /// Executes `query` with the root bound to null data.
    pub fn execute(&self, query: &str) -> Result<Response> {
        self.execute_with_root(query, Value::Null)
    }

    /// Executes `query` with the root type bound to `root`.
    pub fn execute_with_root(&self, query: &str, root: impl Into<Value>) -> Result<Response> {
        let _span = tracing::debug_span!("execute", root = self.query_root.name()).entered();

        let document = async_graphql_parser::parse_query(query).map_err(|error| match error {
            async_graphql_parser::Error::MultipleOperations { .. } | async_graphql_parser::Error::MissingOperation => {
                Error::MultipleOrZeroOperations
            }
            error => Error::MalformedDocument {
                message: error.to_string(),
            },
        })?;

        let mut operations = document.operations.iter();
        let (Some((_, operation)), None) = (operations.next(), operations.next()) else {
            return Err(Error::MultipleOrZeroOperations);
        };

        match operation.node.ty {
            OperationType::Query => {}
            OperationType::Mutation => return Err(Error::UnsupportedOperation { operation: "mutation" }),
            OperationType::Subscription => return Err(Error::UnsupportedOperation { operation: "subscription" }),
        }

        if let Some(limit) = self.config.operation_limits.depth {
            check_depth(&document, &operation.node.selection_set, limit)?;
        }

        let ctx = ExecutionContext::new(&document, self.config.error_mode);
        let node = ExecutableNode::new(
            &ctx,
            self.query_root.clone(),
            root.into(),
            &operation.node.selection_set,
            ErrorPath::default(),
        );

        let data = match node.serialize() {
            Ok(data) => data,
            Err(Failure::Fatal(error)) => {
                tracing::debug!("Execution failed: {error}");
                return Err(error);
            }
            Err(Failure::Field(error)) => {
                ctx.record(error);
                serde_json::Value::Null
            }
        };

        let response = Response::new(data, ctx.into_errors());
        tracing::debug!(errors = response.errors.len(), "Execution finished");

        Ok(response)
    }
}
