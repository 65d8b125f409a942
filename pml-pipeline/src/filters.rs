use crate::error::{BindError, RegistryError};
use crate::input::Sample;
use crate::registry::VerifiedRegistry;
use pml_parser::ParameterizedIdentifier;
use std::fmt;
use std::sync::Arc;

/// Decides, once per polling cycle, whether a binding's raw reading is passed
/// on to its pipeline.
pub trait Filter: Send {
    fn admit(&mut self, sample: &Sample) -> bool;
}

/// Admits every cycle.
#[derive(Debug, Default)]
pub struct Always;

impl Filter for Always {
    fn admit(&mut self, _sample: &Sample) -> bool {
        true
    }
}

/// Admits the first reading and every reading that differs from the one
/// before it.
#[derive(Debug, Default)]
pub struct Changed {
    previous: Option<Sample>,
}

impl Filter for Changed {
    fn admit(&mut self, sample: &Sample) -> bool {
        if self.previous.as_ref() == Some(sample) {
            return false;
        }
        self.previous = Some(sample.clone());
        true
    }
}

/// Admits the first cycle and then every `every`-th one.
#[derive(Debug)]
pub struct Sometimes {
    every: u32,
    seen: u32,
}

impl Sometimes {
    pub const DEFAULT_EVERY: u32 = 5;

    pub fn new(every: u32) -> Self {
        Self {
            every: every.max(1),
            seen: 0,
        }
    }
}

impl Default for Sometimes {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EVERY)
    }
}

impl Filter for Sometimes {
    fn admit(&mut self, _sample: &Sample) -> bool {
        let admit = self.seen == 0;
        self.seen = (self.seen + 1) % self.every;
        admit
    }
}

type FilterConstructor =
    Arc<dyn Fn(&[String]) -> Result<Box<dyn Filter>, BindError> + Send + Sync>;

/// Filter names and how to build a fresh filter from a filter expression's
/// parameters. Each binding gets its own filter state.
#[derive(Clone)]
pub struct FilterRegistry {
    constructors: VerifiedRegistry<FilterConstructor>,
}

type Builtin = fn(&[String]) -> Result<Box<dyn Filter>, BindError>;

const BUILTINS: &[(&str, Builtin)] = &[
    ("always", always),
    ("changed", changed),
    ("sometimes", sometimes),
];

impl Default for FilterRegistry {
    fn default() -> Self {
        Self {
            constructors: VerifiedRegistry::named("filter"),
        }
    }
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `always`, `changed` and `sometimes(n)`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for &(name, constructor) in BUILTINS {
            registry
                .register(name, constructor)
                .expect("builtin filter names are valid and distinct");
        }
        registry
    }

    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F) -> Result<(), RegistryError>
    where
        F: Fn(&[String]) -> Result<Box<dyn Filter>, BindError> + Send + Sync + 'static,
    {
        self.constructors.insert(name, Arc::new(constructor))
    }

    pub fn build(&self, filter: &ParameterizedIdentifier) -> Result<Box<dyn Filter>, BindError> {
        let constructor = self.constructors.lookup(filter.name())?;
        constructor(filter.parameters())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains(name)
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.constructors.keys()).finish()
    }
}

fn always(params: &[String]) -> Result<Box<dyn Filter>, BindError> {
    no_parameters("always", params)?;
    Ok(Box::new(Always))
}

fn changed(params: &[String]) -> Result<Box<dyn Filter>, BindError> {
    no_parameters("changed", params)?;
    Ok(Box::new(Changed::default()))
}

fn sometimes(params: &[String]) -> Result<Box<dyn Filter>, BindError> {
    let every = match params {
        [] => Sometimes::DEFAULT_EVERY,
        [n] => n
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| BindError::invalid("sometimes", format!("'{n}' is not a positive count")))?,
        _ => return Err(BindError::invalid("sometimes", "takes at most one parameter")),
    };
    Ok(Box::new(Sometimes::new(every)))
}

fn no_parameters(name: &str, params: &[String]) -> Result<(), BindError> {
    if params.is_empty() {
        Ok(())
    } else {
        Err(BindError::invalid(name, "takes no parameters"))
    }
}
