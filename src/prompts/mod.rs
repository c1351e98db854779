mod builtin;

pub use builtin::{DEFAULT_PROMPT_NAME, MANUFACTURING_DEFECTS_PROMPT, builtin_registry};

use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    UnknownPrompt(String),
    NoDefaultConfigured,
    InvalidName,
}

impl Display for PromptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownPrompt(name) => write!(f, "unknown prompt '{name}'"),
            Self::NoDefaultConfigured => write!(f, "no default prompt is configured"),
            Self::InvalidName => write!(f, "prompt name must not be empty"),
        }
    }
}

impl Error for PromptError {}

pub type PromptResult<T> = std::result::Result<T, PromptError>;

/// Named immutable prompt bodies plus one designated default name.
///
/// Registration happens during startup; afterwards [`PromptRegistry::resolve`]
/// is a pure read, so a shared registry can serve parallel sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptRegistry {
    entries: HashMap<String, String>,
    default_name: Option<String>,
}

impl PromptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the body registered under `name`. Bodies are
    /// stored verbatim; the registry never inspects or rewrites them.
    pub fn register(&mut self, name: impl Into<String>, body: impl Into<String>) -> PromptResult<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PromptError::InvalidName);
        }
        self.entries.insert(name, body.into());
        Ok(())
    }

    pub fn set_default(&mut self, name: &str) -> PromptResult<()> {
        if !self.entries.contains_key(name) {
            return Err(PromptError::UnknownPrompt(name.to_string()));
        }
        self.default_name = Some(name.to_string());
        Ok(())
    }

    /// Returns the body registered under `name`, or the default body when
    /// no name is given.
    pub fn resolve(&self, name: Option<&str>) -> PromptResult<&str> {
        let name = match name {
            Some(name) => name,
            None => self
                .default_name
                .as_deref()
                .ok_or(PromptError::NoDefaultConfigured)?,
        };

        self.entries
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| PromptError::UnknownPrompt(name.to_string()))
    }

    pub fn default_name(&self) -> Option<&str> {
        self.default_name.as_deref()
    }

    /// Registered names, sorted for stable listings.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
