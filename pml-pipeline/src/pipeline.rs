use crate::erased::ErasedStage;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// One transformation step from `I` to `O`.
///
/// Any `Fn(I) -> O + Send + Sync` closure or function is a stage.
pub trait PipelineStage<I, O>: Send + Sync {
    fn apply(&self, input: I) -> O;
}

impl<I, O, F> PipelineStage<I, O> for F
where
    F: Fn(I) -> O + Send + Sync,
{
    fn apply(&self, input: I) -> O {
        self(input)
    }
}

/// An immutable chain of stages taking `I` and producing `O`.
///
/// Stage adjacency is checked by the compiler: [`append`](Pipeline::append)
/// only accepts a stage taking `O`. Appending borrows the receiver and shares
/// its chain with the new pipeline, so a prefix can be extended in several
/// directions.
///
/// ```
/// use pml_pipeline::Pipeline;
///
/// let halve = Pipeline::of(|x: f64| x / 2.0);
/// let label = halve.append(|x: f64| format!("{x:.1}"));
/// assert_eq!(halve.run(3.0), 1.5);
/// assert_eq!(label.run(3.0), "1.5");
/// ```
pub struct Pipeline<I, O> {
    run: Arc<dyn Fn(I) -> O + Send + Sync>,
    len: usize,
}

impl<I: 'static, O: 'static> Pipeline<I, O> {
    pub fn of<S>(stage: S) -> Self
    where
        S: PipelineStage<I, O> + 'static,
    {
        Self {
            run: Arc::new(move |input| stage.apply(input)),
            len: 1,
        }
    }

    /// Extends the chain with a stage taking this pipeline's output.
    ///
    /// ```
    /// use pml_pipeline::Pipeline;
    ///
    /// let pressed = Pipeline::of(|x: f64| x).append(|x: f64| x > 0.5);
    /// assert!(pressed.run(0.75));
    /// ```
    ///
    /// A stage taking any other type is rejected at compile time:
    ///
    /// ```compile_fail
    /// use pml_pipeline::Pipeline;
    ///
    /// let _ = Pipeline::of(|x: f64| x).append(|b: bool| b);
    /// ```
    pub fn append<M, S>(&self, stage: S) -> Pipeline<I, M>
    where
        M: 'static,
        S: PipelineStage<O, M> + 'static,
    {
        let prefix = Arc::clone(&self.run);
        Pipeline {
            run: Arc::new(move |input| stage.apply(prefix(input))),
            len: self.len + 1,
        }
    }

    /// Runs every stage, first to last.
    pub fn run(&self, input: I) -> O {
        (self.run)(input)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Wraps the whole pipeline as a single type-tagged stage.
    pub fn erase(&self, name: impl Into<String>) -> ErasedStage
    where
        I: Any + Send,
        O: Any + Send,
    {
        let run = Arc::clone(&self.run);
        ErasedStage::new(name, move |input: I| run(input))
    }
}

impl<T: 'static> Pipeline<T, T> {
    /// A pipeline with no stages.
    pub fn identity() -> Self {
        Self {
            run: Arc::new(|input| input),
            len: 0,
        }
    }
}

impl<I, O> Clone for Pipeline<I, O> {
    fn clone(&self) -> Self {
        Self {
            run: Arc::clone(&self.run),
            len: self.len,
        }
    }
}

impl<I, O> fmt::Debug for Pipeline<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline").field("len", &self.len).finish()
    }
}
