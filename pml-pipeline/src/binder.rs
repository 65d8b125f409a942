use crate::erased::DynPipeline;
use crate::error::{BindError, PipelineError};
use crate::filters::{Filter, FilterRegistry};
use crate::input::{DeviceRegistry, Input, InputGroup};
use crate::registry::VerifiedRegistry;
use crate::sink::Sink;
use crate::stages::StageRegistry;
use pml_parser::PipelineSpecification;
use std::fmt;
use tracing::{debug, trace};

/// A specification resolved against live inputs, stages and sinks: ready to
/// be polled.
pub struct Binding {
    specification: PipelineSpecification,
    input: Input,
    filter: Box<dyn Filter>,
    pipeline: DynPipeline,
    sink: Sink,
}

impl Binding {
    pub fn specification(&self) -> &PipelineSpecification {
        &self.specification
    }

    pub fn pipeline(&self) -> &DynPipeline {
        &self.pipeline
    }

    /// Reads the input once and, if the filter admits the reading, runs the
    /// pipeline and hands the result to the sink. Returns whether the
    /// reading was forwarded.
    pub fn cycle(&mut self) -> Result<bool, PipelineError> {
        let sample = self.input.read();
        if !self.filter.admit(&sample) {
            trace!(
                device = self.specification.device(),
                input = self.specification.input(),
                "sample suppressed"
            );
            return Ok(false);
        }
        let output = self.pipeline.run(sample.into_value())?;
        self.sink.deliver(output)?;
        trace!(
            device = self.specification.device(),
            input = self.specification.input(),
            callback = self.specification.callback(),
            "sample forwarded"
        );
        Ok(true)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("specification", &self.specification)
            .field("pipeline", &self.pipeline)
            .field("sink", &self.sink)
            .finish_non_exhaustive()
    }
}

/// Resolves parsed specifications into [`Binding`]s.
///
/// Holds everything a PML document can refer to by name: devices and their
/// inputs, stage and filter constructors, and callback sinks.
#[derive(Debug)]
pub struct Binder {
    devices: DeviceRegistry,
    stages: StageRegistry,
    filters: FilterRegistry,
    sinks: VerifiedRegistry<Sink>,
}

impl Default for Binder {
    fn default() -> Self {
        Self {
            devices: VerifiedRegistry::named("device"),
            stages: StageRegistry::default(),
            filters: FilterRegistry::default(),
            sinks: VerifiedRegistry::named("callback"),
        }
    }
}

impl Binder {
    /// A binder with no devices or sinks, and no stages or filters either.
    pub fn new() -> Self {
        Self::default()
    }

    /// A binder with the builtin stages and filters registered.
    pub fn with_builtins() -> Self {
        Self {
            stages: StageRegistry::with_builtins(),
            filters: FilterRegistry::with_builtins(),
            ..Self::default()
        }
    }

    pub fn add_device(
        &mut self,
        name: impl Into<String>,
        inputs: InputGroup,
    ) -> Result<&mut Self, BindError> {
        self.devices.insert(name, inputs)?;
        Ok(self)
    }

    pub fn add_sink(&mut self, name: impl Into<String>, sink: Sink) -> Result<&mut Self, BindError> {
        self.sinks.insert(name, sink)?;
        Ok(self)
    }

    pub fn devices(&self) -> &DeviceRegistry {
        &self.devices
    }

    pub fn sinks(&self) -> &VerifiedRegistry<Sink> {
        &self.sinks
    }

    pub fn stages_mut(&mut self) -> &mut StageRegistry {
        &mut self.stages
    }

    pub fn filters_mut(&mut self) -> &mut FilterRegistry {
        &mut self.filters
    }

    /// Resolves every name in `specification` and checks that the input
    /// type flows through each stage into the sink.
    ///
    /// An unresolved name fails with the registry's
    /// [`UnknownKey`](crate::RegistryError::UnknownKey).
    pub fn bind(&self, specification: &PipelineSpecification) -> Result<Binding, BindError> {
        let device = specification.device();
        let input = self.devices.lookup(device)?.lookup(specification.input())?;

        let filter = self.filters.build(specification.filter())?;

        let mut pipeline = DynPipeline::identity_for(input.tag());
        for stage in specification.stages() {
            pipeline = pipeline.append(self.stages.build(stage)?)?;
        }

        let callback = specification.callback();
        let sink = self.sinks.lookup(callback)?;
        if !sink.accepts(pipeline.output_tag()) {
            return Err(BindError::CallbackType {
                callback: callback.to_string(),
                expected: sink.tag().unwrap_or(pipeline.output_tag()),
                found: pipeline.output_tag(),
            });
        }

        debug!(
            device,
            input = specification.input(),
            filter = %specification.filter(),
            stages = ?pipeline.stage_names(),
            callback,
            "pipeline bound"
        );

        Ok(Binding {
            specification: specification.clone(),
            input: input.clone(),
            filter,
            pipeline,
            sink: sink.clone(),
        })
    }

    /// Binds every specification, stopping at the first failure.
    pub fn bind_all(
        &self,
        specifications: &[PipelineSpecification],
    ) -> Result<Vec<Binding>, BindError> {
        specifications.iter().map(|spec| self.bind(spec)).collect()
    }
}
