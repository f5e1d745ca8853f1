//! Container schema.

use crate::error::{EngineError, EngineResult};

/// The set of model names a container persists.
///
/// A schema is an ordered list of collection names. Containers validate
/// the schema at open time; operations against a model outside the
/// schema fail with [`EngineError::SchemaViolation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    models: Vec<&'static str>,
}

impl Schema {
    /// Creates a schema from a list of model names.
    #[must_use]
    pub fn new(models: &[&'static str]) -> Self {
        Self {
            models: models.to_vec(),
        }
    }

    /// Returns the model names in declaration order.
    #[must_use]
    pub fn model_names(&self) -> &[&'static str] {
        &self.models
    }

    /// Returns true if the schema declares the given model.
    #[must_use]
    pub fn contains(&self, model: &str) -> bool {
        self.models.iter().any(|m| *m == model)
    }

    /// Validates the schema.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSchema`] if the schema is empty or
    /// declares the same model name twice.
    pub fn validate(&self) -> EngineResult<()> {
        if self.models.is_empty() {
            return Err(EngineError::invalid_schema("schema declares no models"));
        }
        for (i, model) in self.models.iter().enumerate() {
            if self.models[..i].contains(model) {
                return Err(EngineError::invalid_schema(format!(
                    "duplicate model name: {model}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_declared_models() {
        let schema = Schema::new(&["Credential", "Note"]);
        assert!(schema.contains("Credential"));
        assert!(schema.contains("Note"));
        assert!(!schema.contains("Missing"));
    }

    #[test]
    fn validate_rejects_duplicates() {
        let schema = Schema::new(&["Credential", "Credential"]);
        assert!(schema.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty() {
        let schema = Schema::new(&[]);
        assert!(schema.validate().is_err());
    }
}
