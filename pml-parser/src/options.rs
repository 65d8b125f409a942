use serde::{Deserialize, Serialize};

/// Parser configuration.
///
/// Deserializable so it can sit in a larger settings file; missing fields
/// fall back to [`ParseOptions::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Filter given to the first process of a set that declares none.
    /// Written in PML syntax, e.g. `changed` or `sometimes(3)`.
    pub default_filter: String,
    /// Accept signed decimal literals as parameter values. When off,
    /// parameters must be identifier-shaped.
    pub numeric_parameters: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            default_filter: "changed".to_string(),
            numeric_parameters: true,
        }
    }
}

impl ParseOptions {
    pub fn with_default_filter(mut self, filter: impl Into<String>) -> Self {
        self.default_filter = filter.into();
        self
    }

    pub fn with_numeric_parameters(mut self, enabled: bool) -> Self {
        self.numeric_parameters = enabled;
        self
    }
}
