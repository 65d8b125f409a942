use crate::erased::{TypeTag, Value};
use crate::error::RegistryError;
use crate::registry::VerifiedRegistry;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Type-erased reading that can still be compared and copied.
trait Reading: Send {
    fn tag(&self) -> TypeTag;
    fn as_any(&self) -> &dyn Any;
    fn same_as(&self, other: &dyn Reading) -> bool;
    fn duplicate(&self) -> Box<dyn Reading>;
    fn into_value(self: Box<Self>) -> Value;
}

impl<T> Reading for T
where
    T: Clone + PartialEq + Send + 'static,
{
    fn tag(&self) -> TypeTag {
        TypeTag::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn same_as(&self, other: &dyn Reading) -> bool {
        other.as_any().downcast_ref::<T>() == Some(self)
    }

    fn duplicate(&self) -> Box<dyn Reading> {
        Box::new(self.clone())
    }

    fn into_value(self: Box<Self>) -> Value {
        Value::new(*self)
    }
}

/// One raw reading from an input.
///
/// Unlike a bare [`Value`], a sample remembers how to compare and clone
/// itself, which is what lets filters like `changed` work on any input type.
pub struct Sample {
    reading: Box<dyn Reading>,
}

impl Sample {
    pub fn new<T>(value: T) -> Self
    where
        T: Clone + PartialEq + Send + 'static,
    {
        Self {
            reading: Box::new(value),
        }
    }

    pub fn tag(&self) -> TypeTag {
        self.reading.tag()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.reading.as_any().downcast_ref::<T>()
    }

    pub fn into_value(self) -> Value {
        self.reading.into_value()
    }
}

impl Clone for Sample {
    fn clone(&self) -> Self {
        Self {
            reading: self.reading.duplicate(),
        }
    }
}

impl PartialEq for Sample {
    fn eq(&self, other: &Self) -> bool {
        self.reading.same_as(&*other.reading)
    }
}

impl fmt::Debug for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sample({})", self.tag())
    }
}

/// A named source of raw readings, e.g. one joystick axis.
#[derive(Clone)]
pub struct Input {
    tag: TypeTag,
    read: Arc<dyn Fn() -> Sample + Send + Sync>,
}

impl Input {
    pub fn new<T, F>(supplier: F) -> Self
    where
        T: Clone + PartialEq + Send + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            tag: TypeTag::of::<T>(),
            read: Arc::new(move || Sample::new(supplier())),
        }
    }

    /// Type of the readings this input produces.
    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn read(&self) -> Sample {
        (self.read)()
    }
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Input({})", self.tag)
    }
}

/// The inputs of one device, by name.
#[derive(Debug, Clone)]
pub struct InputGroup {
    inputs: VerifiedRegistry<Input>,
}

impl Default for InputGroup {
    fn default() -> Self {
        Self {
            inputs: VerifiedRegistry::named("input"),
        }
    }
}

impl InputGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, input: Input) -> Result<Self, RegistryError> {
        self.insert(name, input)?;
        Ok(self)
    }

    pub fn insert(&mut self, name: impl Into<String>, input: Input) -> Result<(), RegistryError> {
        self.inputs.insert(name, input)
    }

    pub fn get(&self, name: &str) -> Option<&Input> {
        self.inputs.get(name)
    }

    pub fn lookup(&self, name: &str) -> Result<&Input, RegistryError> {
        self.inputs.lookup(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inputs.keys()
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// Devices by name.
pub type DeviceRegistry = VerifiedRegistry<InputGroup>;
