mod path;

use std::borrow::Cow;

pub use path::{ErrorPath, ErrorPathSegment};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by application resolvers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed document: {message}")]
    MalformedDocument { message: String },
    #[error("Exactly one query must be defined")]
    MultipleOrZeroOperations,
    #[error("Only queries are supported, found a {operation}")]
    UnsupportedOperation { operation: &'static str },
    #[error("Unknown fragment named '{name}'")]
    UnknownFragment { name: String },
    #[error("Fragment '{name}' spreads itself")]
    FragmentCycle { name: String },
    #[error("{type_name} does not have a field named '{field}'")]
    UnknownField { type_name: String, field: String },
    #[error("Enum {enum_name} has no value {value}")]
    InvalidEnumValue { enum_name: String, value: String },
    #[error("{scalar} cannot represent the value {value}")]
    InvalidScalarValue { scalar: &'static str, value: String },
    #[error("Expected a list, found {value}")]
    ExpectedList { value: String },
    #[error("Field '{field}' is non-null but resolved to null")]
    NullValueForNonNullField { field: String },
    #[error("Query is nested {depth} levels deep, the limit is {limit}")]
    DepthLimitExceeded { depth: usize, limit: usize },
    #[error("Resolver for '{field}' failed: {message}")]
    Resolver { field: String, message: String },
    #[error("No query root was registered")]
    MissingQueryRoot,
    #[error("Enum {name} must declare at least one value")]
    EmptyEnum { name: String },
    #[error("Field '{field}' expects an enum but {type_name} is a {kind}")]
    NotAnEnum {
        field: String,
        type_name: String,
        kind: crate::TypeKind,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] toml::de::Error),
}

impl Error {
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::MalformedDocument { .. } => ErrorCode::OperationParsingError,
            Error::MultipleOrZeroOperations
            | Error::UnsupportedOperation { .. }
            | Error::UnknownFragment { .. }
            | Error::FragmentCycle { .. }
            | Error::UnknownField { .. }
            | Error::DepthLimitExceeded { .. } => ErrorCode::OperationValidationError,
            Error::InvalidEnumValue { .. }
            | Error::InvalidScalarValue { .. }
            | Error::ExpectedList { .. }
            | Error::NullValueForNonNullField { .. } => ErrorCode::ResultCoercionError,
            Error::Resolver { .. } => ErrorCode::ResolverError,
            Error::MissingQueryRoot | Error::EmptyEnum { .. } | Error::NotAnEnum { .. } | Error::InvalidConfig(_) => {
                ErrorCode::SchemaError
            }
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Serialize,
    strum::Display,
    strum::AsRefStr,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorCode {
    OperationParsingError,
    OperationValidationError,
    ResultCoercionError,
    ResolverError,
    SchemaError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl From<async_graphql_parser::Pos> for Location {
    fn from(pos: async_graphql_parser::Pos) -> Self {
        Location {
            line: pos.line,
            column: pos.column,
        }
    }
}

/// An error as it appears in the `errors` list of a response.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct GraphqlError {
    pub message: Cow<'static, str>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub locations: Vec<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<ErrorPath>,
    pub extensions: ErrorExtensions,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ErrorExtensions {
    pub code: ErrorCode,
}

impl GraphqlError {
    pub fn new(message: impl Into<Cow<'static, str>>, code: ErrorCode) -> Self {
        GraphqlError {
            message: message.into(),
            locations: Vec::new(),
            path: None,
            extensions: ErrorExtensions { code },
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<Location>) -> Self {
        self.locations.push(location.into());
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<ErrorPath>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.extensions.code
    }

    /// The entry of this error in a response's `errors` list.
    pub fn into_value(self) -> serde_json::Value {
        let mut error = serde_json::Map::new();
        error.insert("message".to_owned(), self.message.into_owned().into());
        if !self.locations.is_empty() {
            let locations = self
                .locations
                .into_iter()
                .map(|Location { line, column }| {
                    let mut location = serde_json::Map::new();
                    location.insert("line".to_owned(), line.into());
                    location.insert("column".to_owned(), column.into());
                    serde_json::Value::Object(location)
                })
                .collect();
            error.insert("locations".to_owned(), serde_json::Value::Array(locations));
        }
        if let Some(path) = self.path {
            let path = path
                .iter()
                .map(|segment| match segment {
                    ErrorPathSegment::Field(key) => serde_json::Value::from(key.as_str()),
                    ErrorPathSegment::Index(index) => serde_json::Value::from(*index),
                })
                .collect();
            error.insert("path".to_owned(), serde_json::Value::Array(path));
        }
        let mut extensions = serde_json::Map::new();
        let code: &'static str = self.extensions.code.into();
        extensions.insert("code".to_owned(), code.into());
        error.insert("extensions".to_owned(), serde_json::Value::Object(extensions));
        serde_json::Value::Object(error)
    }
}

impl From<&Error> for GraphqlError {
    fn from(error: &Error) -> Self {
        GraphqlError::new(error.to_string(), error.code())
    }
}

impl std::fmt::Display for GraphqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.message.fmt(f)
    }
}
