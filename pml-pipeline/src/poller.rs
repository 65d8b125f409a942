use crate::binder::{Binder, Binding};
use crate::error::{BindError, PipelineError};
use pml_parser::PipelineSpecification;
use tracing::trace;

/// Drives a set of bindings, one polling cycle at a time.
#[derive(Debug, Default)]
pub struct Poller {
    bindings: Vec<Binding>,
    cycles: u64,
}

impl Poller {
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self {
            bindings,
            cycles: 0,
        }
    }

    pub fn bind(binder: &Binder, specifications: &[PipelineSpecification]) -> Result<Self, BindError> {
        Ok(Self::new(binder.bind_all(specifications)?))
    }

    pub fn push(&mut self, binding: Binding) {
        self.bindings.push(binding);
    }

    /// Runs one cycle over every binding, in order. Returns how many
    /// readings were forwarded to their sinks.
    pub fn poll(&mut self) -> Result<usize, PipelineError> {
        let mut forwarded = 0;
        for binding in &mut self.bindings {
            if binding.cycle()? {
                forwarded += 1;
            }
        }
        self.cycles += 1;
        trace!(cycle = self.cycles, forwarded, "poll complete");
        Ok(forwarded)
    }

    /// Completed cycles so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
