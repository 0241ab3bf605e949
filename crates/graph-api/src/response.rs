use crate::error::GraphqlError;

/// Result of executing a query: `{"data": ...}`, plus `"errors"` when a field failed
/// and the schema runs in partial error mode.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Response {
    pub data: serde_json::Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphqlError>,
}

impl Response {
    pub(crate) fn new(data: serde_json::Value, errors: Vec<GraphqlError>) -> Self {
        Response { data, errors }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_data(self) -> serde_json::Value {
        self.data
    }

    pub fn into_value(self) -> serde_json::Value {
        let mut response = serde_json::Map::new();
        response.insert("data".to_owned(), self.data);
        if !self.errors.is_empty() {
            let errors = self.errors.into_iter().map(GraphqlError::into_value).collect();
            response.insert("errors".to_owned(), serde_json::Value::Array(errors));
        }
        serde_json::Value::Object(response)
    }
}
