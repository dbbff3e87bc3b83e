//! Prefixed environment overrides
//!
//! Every lookup resolves `{PREFIX}{NAME}` with the name uppercased, so a
//! config's `apply_env` can name fields the way they appear in TOML.

use crate::{Result, ToolingError};
use std::env::{self, VarError};
use std::str::FromStr;

/// Reader for one family of `{PREFIX}*` variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvOverrides {
    prefix: String,
}

impl EnvOverrides {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Full variable name for a field
    pub fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name.to_uppercase())
    }

    /// Trimmed raw value; unset variables are `None`
    pub fn text(&self, name: &str) -> Result<Option<String>> {
        let key = self.key(name);
        match env::var(&key) {
            Ok(value) => Ok(Some(value.trim().to_string())),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => Err(ToolingError::Env {
                key,
                message: "not valid UTF-8".to_string(),
            }),
        }
    }

    pub fn parse<T>(&self, name: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.text(name)?
            .map(|value| {
                value.parse::<T>().map_err(|e| ToolingError::Env {
                    key: self.key(name),
                    message: format!("{:?}: {}", value, e),
                })
            })
            .transpose()
    }

    /// `true/1/yes/on` or `false/0/no/off`, any case
    pub fn flag(&self, name: &str) -> Result<Option<bool>> {
        self.text(name)?
            .map(|value| match value.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(true),
                "false" | "0" | "no" | "off" => Ok(false),
                _ => Err(ToolingError::Env {
                    key: self.key(name),
                    message: format!("{:?} is not a boolean", value),
                }),
            })
            .transpose()
    }

    /// Comma-separated items, blanks dropped
    pub fn list(&self, name: &str) -> Result<Option<Vec<String>>> {
        Ok(self.text(name)?.map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        }))
    }
}
