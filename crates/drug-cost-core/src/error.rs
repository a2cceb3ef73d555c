use thiserror::Error;

#[derive(Debug, Error)]
pub enum DrugCostError {
    #[error("Invalid parameter: {field} — {constraint}")]
    InvalidParameter { field: String, constraint: String },

    #[error("Division undefined in {context}")]
    DivisionUndefined { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DrugCostError {
    pub(crate) fn invalid(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        DrugCostError::InvalidParameter {
            field: field.into(),
            constraint: constraint.into(),
        }
    }
}

impl From<serde_json::Error> for DrugCostError {
    fn from(e: serde_json::Error) -> Self {
        DrugCostError::SerializationError(e.to_string())
    }
}
