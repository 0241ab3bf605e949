use crate::error::Result;

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Settings applied to a schema when it is sealed.
pub struct Config {
    /// Whether `__schema` is added to the query root
    pub introspection: bool,
    /// What a field error does to the rest of the response
    pub error_mode: ErrorMode,
    /// Graph operation limit settings
    pub operation_limits: OperationLimitsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            introspection: true,
            error_mode: ErrorMode::default(),
            operation_limits: OperationLimitsConfig::default(),
        }
    }
}

impl Config {
    pub fn from_toml(input: &str) -> Result<Config> {
        Ok(toml::from_str(input)?)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorMode {
    /// The first field error fails the whole request.
    #[default]
    Abort,
    /// A failing field resolves to null and the error is reported next to the data.
    /// Errors on non-null fields null out the closest nullable parent instead.
    Partial,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OperationLimitsConfig {
    /// Limits the deepest nesting of selection sets in an operation,
    /// including fields in fragments.
    pub depth: Option<u16>,
}
