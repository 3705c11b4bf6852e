//! Single-pole IIR filters over scalar streams.
//!
//! Each filter owns its coefficient and running state and is advanced one
//! input at a time. State is only ever reset by constructing a new filter.

use crate::math::Vector3;

/// A stateful scalar filter advanced one sample at a time.
pub trait ScalarFilter {
    fn advance(&mut self, input: f64) -> f64;

    /// Lazily filter a sequence, producing one output per input.
    fn filter_iter<I>(self, inputs: I) -> Filtered<Self, I::IntoIter>
    where
        Self: Sized,
        I: IntoIterator<Item = f64>,
    {
        Filtered {
            filter: self,
            inputs: inputs.into_iter(),
        }
    }
}

/// Iterator returned by [`ScalarFilter::filter_iter`].
pub struct Filtered<F, I> {
    filter: F,
    inputs: I,
}

impl<F: ScalarFilter, I: Iterator<Item = f64>> Iterator for Filtered<F, I> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let input = self.inputs.next()?;
        Some(self.filter.advance(input))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inputs.size_hint()
    }
}

/// Exponential smoothing: `y[n] = a * y[n-1] + (1 - a) * x[n]`, seeded with the first input.
#[derive(Debug, Clone)]
pub struct LowPass {
    alpha: f64,
    previous: Option<f64>,
}

impl LowPass {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            previous: None,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl ScalarFilter for LowPass {
    fn advance(&mut self, input: f64) -> f64 {
        let output = match self.previous {
            Some(previous) => self.alpha * previous + (1.0 - self.alpha) * input,
            None => input,
        };
        self.previous = Some(output);
        output
    }
}

/// First-order high-pass: `y[n] = a * (y[n-1] + x[n] - x[n-1])`, seeded at zero.
#[derive(Debug, Clone)]
pub struct HighPass {
    alpha: f64,
    previous_input: f64,
    previous_output: f64,
}

impl HighPass {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            previous_input: 0.0,
            previous_output: 0.0,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl ScalarFilter for HighPass {
    fn advance(&mut self, input: f64) -> f64 {
        let output = self.alpha * (self.previous_output + (input - self.previous_input));
        self.previous_input = input;
        self.previous_output = output;
        output
    }
}

/// Independent low-pass filters on each axis of a vector stream.
#[derive(Debug, Clone)]
pub struct LowPass3 {
    axes: [LowPass; 3],
}

impl LowPass3 {
    pub fn new(alpha: f64) -> Self {
        Self {
            axes: [LowPass::new(alpha), LowPass::new(alpha), LowPass::new(alpha)],
        }
    }

    pub fn advance(&mut self, input: Vector3) -> Vector3 {
        let [x, y, z] = &mut self.axes;
        Vector3::new(x.advance(input.x), y.advance(input.y), z.advance(input.z))
    }
}
