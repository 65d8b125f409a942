use crate::erased::ErasedStage;
use crate::error::{BindError, RegistryError};
use crate::registry::VerifiedRegistry;
use pml_parser::ParameterizedIdentifier;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

type StageConstructor = Arc<dyn Fn(&[String]) -> Result<ErasedStage, BindError> + Send + Sync>;

/// Stage names and how to build a stage from its parameters.
///
/// A constructor runs once per stage occurrence in a document, so stateful
/// stages (`smoothing`, `toggle`) never share state between bindings.
#[derive(Clone)]
pub struct StageRegistry {
    constructors: VerifiedRegistry<StageConstructor>,
}

type Builtin = fn(&[String]) -> Result<ErasedStage, BindError>;

const BUILTINS: &[(&str, Builtin)] = &[
    ("offset", offset),
    ("deadband", deadband),
    ("scaling", scaling),
    ("smoothing", smoothing),
    ("invert", invert),
    ("clamp", clamp),
    ("threshold", threshold),
    ("toggle", toggle),
];

impl Default for StageRegistry {
    fn default() -> Self {
        Self {
            constructors: VerifiedRegistry::named("stage"),
        }
    }
}

impl StageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The numeric builtins over `f64` plus `threshold` (`f64` to `bool`)
    /// and `toggle` (`bool` to `bool`).
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for &(name, constructor) in BUILTINS {
            registry
                .register(name, constructor)
                .expect("builtin stage names are valid and distinct");
        }
        registry
    }

    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F) -> Result<(), RegistryError>
    where
        F: Fn(&[String]) -> Result<ErasedStage, BindError> + Send + Sync + 'static,
    {
        self.constructors.insert(name, Arc::new(constructor))
    }

    pub fn build(&self, stage: &ParameterizedIdentifier) -> Result<ErasedStage, BindError> {
        let constructor = self.constructors.lookup(stage.name())?;
        constructor(stage.parameters())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys()
    }
}

impl fmt::Debug for StageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.constructors.keys()).finish()
    }
}

/// Parses between `min` and `max` numeric parameters.
fn numbers(name: &str, params: &[String], min: usize, max: usize) -> Result<Vec<f64>, BindError> {
    if params.len() < min || params.len() > max {
        let count = if min == max {
            format!("{min}")
        } else {
            format!("{min} to {max}")
        };
        return Err(BindError::invalid(
            name,
            format!("expected {count} parameters, got {}", params.len()),
        ));
    }
    params
        .iter()
        .map(|param| {
            param
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| BindError::invalid(name, format!("'{param}' is not a number")))
        })
        .collect()
}

/// `offset(amount)`: corrects a constant bias by adding `amount`.
fn offset(params: &[String]) -> Result<ErasedStage, BindError> {
    let amount = numbers("offset", params, 1, 1)?[0];
    Ok(ErasedStage::new("offset", move |x: f64| x + amount))
}

/// `deadband(width = 0.05)`: zero inside `[-width, width]`.
fn deadband(params: &[String]) -> Result<ErasedStage, BindError> {
    let width = numbers("deadband", params, 0, 1)?
        .first()
        .copied()
        .unwrap_or(0.05)
        .abs();
    Ok(ErasedStage::new("deadband", move |x: f64| {
        if x.abs() <= width {
            0.0
        } else {
            x
        }
    }))
}

/// `scaling(factor = 1)` or `scaling(in_min, in_max, out_min, out_max)`.
fn scaling(params: &[String]) -> Result<ErasedStage, BindError> {
    let values = numbers("scaling", params, 0, 4)?;
    match values.as_slice() {
        [] => Ok(ErasedStage::new("scaling", |x: f64| x)),
        &[factor] => Ok(ErasedStage::new("scaling", move |x: f64| x * factor)),
        &[in_min, in_max, out_min, out_max] => {
            if in_min == in_max {
                return Err(BindError::invalid("scaling", "input range is empty"));
            }
            let slope = (out_max - out_min) / (in_max - in_min);
            Ok(ErasedStage::new("scaling", move |x: f64| {
                out_min + (x - in_min) * slope
            }))
        }
        _ => Err(BindError::invalid(
            "scaling",
            "expected a factor or four range bounds",
        )),
    }
}

/// `smoothing(alpha = 0.5)`: exponential moving average, seeded with the
/// first value.
fn smoothing(params: &[String]) -> Result<ErasedStage, BindError> {
    let alpha = numbers("smoothing", params, 0, 1)?
        .first()
        .copied()
        .unwrap_or(0.5);
    if !(alpha > 0.0 && alpha <= 1.0) {
        return Err(BindError::invalid("smoothing", "alpha must be in (0, 1]"));
    }
    let state = Mutex::new(None::<f64>);
    Ok(ErasedStage::new("smoothing", move |x: f64| {
        let mut previous = state.lock().unwrap_or_else(PoisonError::into_inner);
        let next = match *previous {
            Some(prev) => alpha * x + (1.0 - alpha) * prev,
            None => x,
        };
        *previous = Some(next);
        next
    }))
}

fn invert(params: &[String]) -> Result<ErasedStage, BindError> {
    numbers("invert", params, 0, 0)?;
    Ok(ErasedStage::new("invert", |x: f64| -x))
}

fn clamp(params: &[String]) -> Result<ErasedStage, BindError> {
    let values = numbers("clamp", params, 2, 2)?;
    let (min, max) = (values[0], values[1]);
    if min > max {
        return Err(BindError::invalid("clamp", "min is greater than max"));
    }
    Ok(ErasedStage::new("clamp", move |x: f64| x.clamp(min, max)))
}

/// `threshold(level = 0.5)`: `true` at or above `level`.
fn threshold(params: &[String]) -> Result<ErasedStage, BindError> {
    let level = numbers("threshold", params, 0, 1)?
        .first()
        .copied()
        .unwrap_or(0.5);
    Ok(ErasedStage::new("threshold", move |x: f64| x >= level))
}

/// Flips its output on every rising edge of the input, e.g. turning a
/// momentary button into an on/off switch.
fn toggle(params: &[String]) -> Result<ErasedStage, BindError> {
    numbers("toggle", params, 0, 0)?;
    // (last input, current output)
    let state = Mutex::new((false, false));
    Ok(ErasedStage::new("toggle", move |pressed: bool| {
        let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
        let (was_pressed, on) = *state;
        let on = if pressed && !was_pressed { !on } else { on };
        *state = (pressed, on);
        on
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::erased::TypeTag;

    fn build(name: &str, params: &[&str]) -> Result<ErasedStage, BindError> {
        StageRegistry::with_builtins().build(&ParameterizedIdentifier::new(
            name,
            params.iter().copied(),
        ))
    }

    fn apply<I, O>(stage: &ErasedStage, input: I) -> O
    where
        I: std::any::Any + Send,
        O: std::any::Any,
    {
        stage
            .apply(crate::Value::new(input))
            .unwrap()
            .downcast::<O>()
            .unwrap()
    }

    #[test]
    fn test_offset() {
        let stage = build("offset", &["-0.1"]).unwrap();
        assert_eq!(apply::<f64, f64>(&stage, 0.5), 0.4);
        assert!(build("offset", &[]).is_err());
    }

    #[test]
    fn test_deadband() {
        let stage = build("deadband", &["0.1"]).unwrap();
        assert_eq!(apply::<f64, f64>(&stage, 0.05), 0.0);
        assert_eq!(apply::<f64, f64>(&stage, -0.05), 0.0);
        assert_eq!(apply::<f64, f64>(&stage, 0.5), 0.5);
    }

    #[test]
    fn test_scaling_forms() {
        let factor = build("scaling", &["2"]).unwrap();
        assert_eq!(apply::<f64, f64>(&factor, 1.5), 3.0);

        let range = build("scaling", &["-1", "1", "0", "100"]).unwrap();
        assert_eq!(apply::<f64, f64>(&range, 0.0), 50.0);
        assert_eq!(apply::<f64, f64>(&range, 1.0), 100.0);

        assert!(build("scaling", &["1", "2"]).is_err());
        assert!(build("scaling", &["1", "1", "0", "5"]).is_err());
    }

    #[test]
    fn test_smoothing_is_stateful() {
        let stage = build("smoothing", &["0.5"]).unwrap();
        assert_eq!(apply::<f64, f64>(&stage, 10.0), 10.0);
        assert_eq!(apply::<f64, f64>(&stage, 0.0), 5.0);
        assert_eq!(apply::<f64, f64>(&stage, 0.0), 2.5);
        assert!(build("smoothing", &["0"]).is_err());
    }

    #[test]
    fn test_each_build_has_fresh_state() {
        let first = build("smoothing", &[]).unwrap();
        let second = build("smoothing", &[]).unwrap();
        apply::<f64, f64>(&first, 8.0);
        assert_eq!(apply::<f64, f64>(&second, 2.0), 2.0);
    }

    #[test]
    fn test_clamp_and_invert() {
        let clamp = build("clamp", &["-1", "1"]).unwrap();
        assert_eq!(apply::<f64, f64>(&clamp, 3.0), 1.0);
        assert!(build("clamp", &["1", "-1"]).is_err());
        assert!(build("clamp", &["1"]).is_err());

        let invert = build("invert", &[]).unwrap();
        assert_eq!(apply::<f64, f64>(&invert, 0.25), -0.25);
    }

    #[test]
    fn test_threshold_changes_type() {
        let stage = build("threshold", &["0.5"]).unwrap();
        assert_eq!(stage.input(), TypeTag::of::<f64>());
        assert_eq!(stage.output(), TypeTag::of::<bool>());
        assert!(apply::<f64, bool>(&stage, 0.7));
        assert!(!apply::<f64, bool>(&stage, 0.2));
    }

    #[test]
    fn test_toggle_flips_on_rising_edge() {
        let stage = build("toggle", &[]).unwrap();
        let outputs: Vec<bool> = [false, true, true, false, true, false]
            .into_iter()
            .map(|pressed| apply::<bool, bool>(&stage, pressed))
            .collect();
        assert_eq!(outputs, [false, true, true, true, false, false]);
    }

    #[test]
    fn test_builtins_registered() {
        let registry = StageRegistry::with_builtins();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            [
                "clamp",
                "deadband",
                "invert",
                "offset",
                "scaling",
                "smoothing",
                "threshold",
                "toggle"
            ]
        );
    }

    #[test]
    fn test_parameter_errors() {
        assert!(matches!(
            build("deadband", &["wide"]),
            Err(BindError::InvalidParameters { .. })
        ));
        assert!(matches!(
            build("invert", &["1"]),
            Err(BindError::InvalidParameters { .. })
        ));
        assert!(matches!(
            build("frobnicate", &[]),
            Err(BindError::Registry(RegistryError::UnknownKey { kind: "stage", .. }))
        ));
    }
}
