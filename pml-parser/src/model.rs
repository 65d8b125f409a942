use serde::{Deserialize, Serialize};
use std::fmt;

/// A name with an ordered list of raw parameter tokens, e.g. `scaling(5,6,7,8)`.
///
/// Used for filters and stages. Parameters are kept exactly as written; it is
/// up to whatever resolves the name to interpret them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterizedIdentifier {
    name: String,
    #[serde(default)]
    parameters: Vec<String>,
}

impl ParameterizedIdentifier {
    pub fn new<I, S>(name: impl Into<String>, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            parameters: parameters.into_iter().map(Into::into).collect(),
        }
    }

    /// A name without parameters.
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }
}

impl fmt::Display for ParameterizedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.parameters.join(","))
    }
}

/// One `device.input :: filter sequence` binding from a PML document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSpecification {
    device: String,
    input: String,
    filter: ParameterizedIdentifier,
    stages: Vec<ParameterizedIdentifier>,
    callback: String,
}

impl PipelineSpecification {
    pub fn new(
        device: impl Into<String>,
        input: impl Into<String>,
        filter: ParameterizedIdentifier,
        stages: Vec<ParameterizedIdentifier>,
        callback: impl Into<String>,
    ) -> Self {
        Self {
            device: device.into(),
            input: input.into(),
            filter,
            stages,
            callback: callback.into(),
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn filter(&self) -> &ParameterizedIdentifier {
        &self.filter
    }

    /// Processing stages in order. Empty for an identity sequence (`|->|`).
    pub fn stages(&self) -> &[ParameterizedIdentifier] {
        &self.stages
    }

    pub fn callback(&self) -> &str {
        &self.callback
    }

    pub fn is_identity(&self) -> bool {
        self.stages.is_empty()
    }
}

impl fmt::Display for PipelineSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} :: {} ", self.device, self.input, self.filter)?;
        if self.stages.is_empty() {
            return write!(f, "|->| {}", self.callback);
        }
        for (i, stage) in self.stages.iter().enumerate() {
            let op = if i == 0 { "|->" } else { "->" };
            write!(f, "{op} {stage} ")?;
        }
        write!(f, "->| {}", self.callback)
    }
}
