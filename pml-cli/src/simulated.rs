//! Stand-in hardware for `pml run`.
//!
//! Every input derives its reading from a shared cycle counter, so a run is
//! deterministic: axes follow sine waves with different periods and phases,
//! buttons alternate between pressed and released.

use anyhow::Result;
use pml_pipeline::{Binder, Input, InputGroup, Sink, Value};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared cycle counter the simulated inputs read from.
#[derive(Debug, Clone, Default)]
pub struct Clock(Arc<AtomicU64>);

impl Clock {
    pub fn tick(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    fn now(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    fn axis(&self, period: f64, phase: f64) -> Input {
        let clock = self.clone();
        Input::new(move || {
            let t = clock.now() as f64;
            let value = (std::f64::consts::TAU * t / period + phase).sin();
            // Keep readings short when printed.
            (value * 1000.0).round() / 1000.0
        })
    }

    fn button(&self, half_period: u64) -> Input {
        let clock = self.clone();
        Input::new(move || (clock.now() / half_period) % 2 == 1)
    }
}

fn gamepad(clock: &Clock) -> Result<InputGroup> {
    Ok(InputGroup::new()
        .with("left_x", clock.axis(16.0, 0.0))?
        .with("left_y", clock.axis(16.0, 1.0))?
        .with("right_x", clock.axis(24.0, 0.5))?
        .with("right_y", clock.axis(24.0, 2.0))?
        .with("left_trigger", clock.axis(10.0, 0.0))?
        .with("right_trigger", clock.axis(12.0, 3.0))?
        .with("a", clock.button(2))?
        .with("b", clock.button(3))?
        .with("x", clock.button(4))?
        .with("y", clock.button(5))?)
}

fn navx(clock: &Clock) -> Result<InputGroup> {
    Ok(InputGroup::new()
        .with("heading", clock.axis(40.0, 0.0))?
        .with("pitch", clock.axis(30.0, 0.7))?
        .with("roll", clock.axis(20.0, 1.3))?
        .with("yaw", clock.axis(40.0, 0.2))?)
}

/// Builds a binder with `gamepad1`, `gamepad2` and `navx`, the builtin
/// stages and filters, and a printing sink for each of `callbacks`.
pub fn binder<'a>(clock: &Clock, callbacks: impl IntoIterator<Item = &'a str>) -> Result<Binder> {
    let mut binder = Binder::with_builtins();
    binder
        .add_device("gamepad1", gamepad(clock)?)?
        .add_device("gamepad2", gamepad(clock)?)?
        .add_device("navx", navx(clock)?)?;

    let names: BTreeSet<&str> = callbacks.into_iter().collect();
    for name in names {
        binder.add_sink(name, printer(name))?;
    }
    Ok(binder)
}

fn printer(name: &str) -> Sink {
    let name = name.to_string();
    Sink::untyped(move |value| println!("{name} <- {}", render(&value)))
}

fn render(value: &Value) -> String {
    if let Some(x) = value.downcast_ref::<f64>() {
        format!("{x}")
    } else if let Some(b) = value.downcast_ref::<bool>() {
        format!("{b}")
    } else if let Some(i) = value.downcast_ref::<i64>() {
        format!("{i}")
    } else if let Some(s) = value.downcast_ref::<String>() {
        s.clone()
    } else {
        format!("<{}>", value.tag())
    }
}
