//! A GraphQL query engine over declared object types.
//!
//! Types are declared with [`Type::object`] and [`Type::enumeration`], sealed into a
//! [`Schema`] and queried with [`Schema::execute`]. Fields resolve against any
//! [`Resolvable`] data source, or through an explicit resolver set on their
//! [`FieldDescriptor`]. The schema describes itself through `__schema`.
//!
//! ```rust,ignore
//! let query = Type::object("Query")
//!     .field("hello", FieldDescriptor::string().resolve_with(|_| Ok("world".into())))
//!     .build();
//! let schema = Schema::build().register_query_root(&query).finish()?;
//!
//! let response = schema.execute("{ hello }")?;
//! assert_eq!(response.into_value(), json!({"data": {"hello": "world"}}));
//! ```

mod config;
mod error;
mod execution;
pub mod introspection;
mod registry;
mod response;
mod schema;
mod value;

pub use config::{Config, ErrorMode, OperationLimitsConfig};
pub use error::{
    BoxError, Error, ErrorCode, ErrorExtensions, ErrorPath, ErrorPathSegment, GraphqlError, Location, Result,
};
pub use registry::{
    EnumBuilder, EnumValue, FieldDescriptor, FieldKind, LazyType, ObjectBuilder, Resolver, Scalar, Type, TypeDefinition,
    TypeKind,
};
pub use response::Response;
pub use schema::{Schema, SchemaBuilder, SchemaInner};
pub use value::{Resolvable, Value};
