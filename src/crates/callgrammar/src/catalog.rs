//! Function catalog: the declared set of callable skills
//!
//! A [`FunctionCatalog`] is validated once when it is built and is read-only
//! afterwards. Every name the decoder can emit is a member of the catalog,
//! including the fallback function.

use crate::constants::ESCAPE;
use crate::shared::{contains_delimiter, is_identifier};
use crate::types::{Arguments, GrammarError, GrammarResult, ParamType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One declared parameter of a function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    pub description: String,
}

/// Immutable description of one callable skill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSpec {
    name: String,
    description: String,
    parameters: Vec<ParameterSpec>,
    required: Vec<String>,
}

impl FunctionSpec {
    /// Start building a spec
    ///
    /// ```rust
    /// use callgrammar::{FunctionSpec, ParamType};
    ///
    /// let spec = FunctionSpec::builder("web_search", "Searches the web for information using Google")
    ///     .param("query", ParamType::String, "The search query string")
    ///     .required("query")
    ///     .build();
    /// assert_eq!(spec.name(), "web_search");
    /// ```
    pub fn builder(name: impl Into<String>, description: impl Into<String>) -> FunctionSpecBuilder {
        FunctionSpecBuilder {
            spec: FunctionSpec {
                name: name.into(),
                description: description.into(),
                parameters: Vec::new(),
                required: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Parameters in declaration order
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameter(name).is_some()
    }

    fn validate(&self) -> GrammarResult<()> {
        if !is_identifier(&self.name) {
            return Err(GrammarError::InvalidName(self.name.clone()));
        }

        let reserved = |field: String| GrammarError::ReservedDelimiter {
            function: self.name.clone(),
            field,
            delimiter: ESCAPE,
        };

        if contains_delimiter(&self.description) {
            return Err(reserved("description".to_string()));
        }

        for param in &self.parameters {
            if !is_identifier(&param.name) {
                return Err(GrammarError::InvalidName(format!("{}.{}", self.name, param.name)));
            }
            if contains_delimiter(&param.description) {
                return Err(reserved(format!("parameter '{}' description", param.name)));
            }
        }

        for name in &self.required {
            if contains_delimiter(name) {
                return Err(reserved("required list".to_string()));
            }
            if !self.has_parameter(name) {
                return Err(GrammarError::UnknownRequired {
                    function: self.name.clone(),
                    parameter: name.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Builder for [`FunctionSpec`]
#[derive(Debug, Clone)]
pub struct FunctionSpecBuilder {
    spec: FunctionSpec,
}

impl FunctionSpecBuilder {
    /// Declare a parameter; declaration order is preserved in prompts.
    pub fn param(
        mut self,
        name: impl Into<String>,
        param_type: ParamType,
        description: impl Into<String>,
    ) -> Self {
        self.spec.parameters.push(ParameterSpec {
            name: name.into(),
            param_type,
            description: description.into(),
        });
        self
    }

    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.spec.required.push(name.into());
        self
    }

    pub fn build(self) -> FunctionSpec {
        self.spec
    }
}

/// The function every failed recovery resolves to, with its default arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    pub name: String,
    pub arguments: Arguments,
}

impl Fallback {
    pub fn new(name: impl Into<String>, arguments: Arguments) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Validated, ordered set of function specs
#[derive(Debug, Clone)]
pub struct FunctionCatalog {
    specs: Vec<FunctionSpec>,
    fallback: Fallback,
}

impl FunctionCatalog {
    /// Build a catalog, validating every text field and the fallback
    pub fn new(specs: Vec<FunctionSpec>, fallback: Fallback) -> GrammarResult<Self> {
        let mut seen = HashSet::new();
        for spec in &specs {
            spec.validate()?;
            if !seen.insert(spec.name.as_str()) {
                return Err(GrammarError::DuplicateFunction(spec.name.clone()));
            }
        }

        let catalog = Self { specs, fallback };
        let fallback_spec = catalog.get(&catalog.fallback.name)?;
        for key in catalog.fallback.arguments.keys() {
            if !fallback_spec.has_parameter(key) {
                return Err(GrammarError::UnknownRequired {
                    function: fallback_spec.name.clone(),
                    parameter: key.to_string(),
                });
            }
        }

        Ok(catalog)
    }

    /// Specs in catalog order
    pub fn list_specs(&self) -> &[FunctionSpec] {
        &self.specs
    }

    pub fn get(&self, name: &str) -> GrammarResult<&FunctionSpec> {
        self.specs
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| GrammarError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.specs.iter().any(|s| s.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|s| s.name.as_str())
    }

    pub fn fallback(&self) -> &Fallback {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passthrough() -> FunctionSpec {
        FunctionSpec::builder("passthrough", "Routes the query to a conversational model.")
            .param("thinking", ParamType::Boolean, "True for complex reasoning.")
            .required("thinking")
            .build()
    }

    fn fallback() -> Fallback {
        Fallback::new("passthrough", Arguments::new().with("thinking", false))
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = FunctionCatalog::new(vec![passthrough()], fallback()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.contains("passthrough"));
        assert_eq!(catalog.get("passthrough").unwrap().required(), ["thinking"]);
        assert_eq!(
            catalog.get("nope").unwrap_err(),
            GrammarError::NotFound("nope".to_string())
        );
    }

    #[test]
    fn test_reserved_delimiter_in_description() {
        let bad = FunctionSpec::builder("web_search", "Search <escape> the web").build();
        let err = FunctionCatalog::new(vec![bad, passthrough()], fallback()).unwrap_err();
        assert!(matches!(err, GrammarError::ReservedDelimiter { ref field, .. } if field == "description"));
    }

    #[test]
    fn test_reserved_delimiter_in_parameter() {
        let bad = FunctionSpec::builder("web_search", "Search")
            .param("query", ParamType::String, "a <escape>query")
            .build();
        let err = FunctionCatalog::new(vec![bad, passthrough()], fallback()).unwrap_err();
        assert!(matches!(err, GrammarError::ReservedDelimiter { .. }));
    }

    #[test]
    fn test_required_must_be_declared() {
        let bad = FunctionSpec::builder("set_timer", "Timer").required("duration").build();
        let err = FunctionCatalog::new(vec![bad, passthrough()], fallback()).unwrap_err();
        assert!(matches!(err, GrammarError::UnknownRequired { .. }));
    }

    #[test]
    fn test_fallback_must_be_in_catalog() {
        let only = FunctionSpec::builder("web_search", "Search").build();
        let err = FunctionCatalog::new(vec![only], fallback()).unwrap_err();
        assert_eq!(err, GrammarError::NotFound("passthrough".to_string()));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = FunctionCatalog::new(vec![passthrough(), passthrough()], fallback()).unwrap_err();
        assert_eq!(err, GrammarError::DuplicateFunction("passthrough".to_string()));
    }

    #[test]
    fn test_invalid_name_rejected() {
        let bad = FunctionSpec::builder("set timer", "Timer").build();
        let err = FunctionCatalog::new(vec![bad, passthrough()], fallback()).unwrap_err();
        assert_eq!(err, GrammarError::InvalidName("set timer".to_string()));
    }
}
