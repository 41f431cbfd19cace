use num_traits::{Float, FloatConst};

use crate::numbers::{four, pi, sqrt2, squared, two};
use crate::config::to_f64;
use crate::FilterConfig;

/// The output of a [`Lowpass`] filter: the filtered value and an estimate of its time-derivative.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Signal<T> {
    /// The filtered value.
    pub value: T,
    /// The first time-derivative of the filtered value, in units per second.
    pub derivative: T,
}

/// The fixed coefficients of a [`Lowpass`] filter.
///
/// The filter state `(y, y')` evolves as
/// ```text
/// y[n]  = A * y[n-1] + B * y'[n-1] + E * (x[n] + x[n-1]) / 2
/// y'[n] = C * y[n-1] + D * y'[n-1] + F * (x[n] + x[n-1]) / 2.
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LowpassCoefficients<T> {
    /// Weight of the previous value in the new value.
    pub a: T,
    /// Weight of the previous derivative in the new value.
    pub b: T,
    /// Weight of the previous value in the new derivative.
    pub c: T,
    /// Weight of the previous derivative in the new derivative.
    pub d: T,
    /// Weight of the input midpoint in the new value.
    pub e: T,
    /// Weight of the input midpoint in the new derivative.
    pub f: T,
}

impl<T: Float + FloatConst> LowpassCoefficients<T> {
    /// Discretizes `s² + √2·w0·s + w0²` with the midpoint rule, where `w0 = 2π·cutoff`.
    pub fn from_config(config: &FilterConfig<T>) -> Self {
        let w0 = two::<T>() * pi::<T>() * config.cutoff_frequency();
        let a = squared(w0);
        let b = sqrt2::<T>() * w0;

        let h = config.sample_period();
        let h2 = squared(h);
        let two = two::<T>();
        let four = four::<T>();
        let denom = four + two * h * b + h2 * a;

        LowpassCoefficients {
            a: (four + two * h * b - h2 * a) / denom,
            b: four * h / denom,
            c: -four * h * a / denom,
            d: (four - two * h * b - h2 * a) / denom,
            e: two * h2 * a / denom,
            f: four * h * a / denom,
        }
    }
}

/// A second-order Butterworth lowpass filter that also tracks the derivative of its output.
///
/// # Example
///
/// ```rust
/// # use complementary_filter::{FilterConfig, Lowpass};
/// let config = FilterConfig::new(1.0_f64, 0.01).unwrap();
/// let mut lowpass = Lowpass::new(&config);
/// let mut out = lowpass.update(1.0);
/// for _ in 1..500 {
///     out = lowpass.update(1.0);
/// }
/// assert!((out.value - 1.0).abs() < 1e-3);
/// assert!(out.derivative.abs() < 1e-3);
/// ```
///
/// Samples must be fed in order, one per sample period. A NaN or infinite input contaminates the
/// state, and every later output will also be non-finite until [`Lowpass::reset`] is called.
#[derive(Clone, Copy, Debug)]
pub struct Lowpass<T> {
    coeffs: LowpassCoefficients<T>,
    prev_unfiltered: T,
    prev_filtered: Signal<T>,
}

impl<T: Float + FloatConst> Lowpass<T> {
    /// Creates a new filter, with zero initial state.
    pub fn new(config: &FilterConfig<T>) -> Lowpass<T> {
        let coeffs = LowpassCoefficients::from_config(config);
        log::debug!(
            "lowpass: cutoff {} Hz, period {} s, coefficients {:?}",
            to_f64(config.cutoff_frequency()),
            to_f64(config.sample_period()),
            coeffs_f64(&coeffs),
        );
        Lowpass::from_coefficients(coeffs)
    }
}

impl<T: Float> Lowpass<T> {
    /// Creates a new filter from coefficients that were already derived.
    ///
    /// This is useful for building many filters (one per axis, say) from the same config.
    pub fn from_coefficients(coeffs: LowpassCoefficients<T>) -> Lowpass<T> {
        Lowpass {
            coeffs,
            prev_unfiltered: T::zero(),
            prev_filtered: Signal {
                value: T::zero(),
                derivative: T::zero(),
            },
        }
    }

    /// The coefficients this filter was built with.
    pub fn coefficients(&self) -> &LowpassCoefficients<T> {
        &self.coeffs
    }

    /// The most recent output, or zero if nothing has been filtered yet.
    pub fn last(&self) -> Signal<T> {
        self.prev_filtered
    }

    /// Forgets all history, as though the filter was just created.
    pub fn reset(&mut self) {
        self.prev_unfiltered = T::zero();
        self.prev_filtered = Signal {
            value: T::zero(),
            derivative: T::zero(),
        };
    }

    /// Feeds in the next sample, returning the new filtered value and derivative.
    pub fn update(&mut self, value: T) -> Signal<T> {
        let LowpassCoefficients { a, b, c, d, e, f } = self.coeffs;
        let x0 = value;
        let x1 = self.prev_unfiltered;
        let y1 = self.prev_filtered.value;
        let yd1 = self.prev_filtered.derivative;

        let mid = (x0 + x1) / two::<T>();
        let y0 = a * y1 + b * yd1 + e * mid;
        let yd0 = c * y1 + d * yd1 + f * mid;

        self.prev_unfiltered = x0;
        self.prev_filtered = Signal {
            value: y0,
            derivative: yd0,
        };
        self.prev_filtered
    }

    /// Filters `input`, putting the filtered values in `output`.
    ///
    /// This is the same as calling [`Lowpass::update`] on each sample in turn, so a long signal
    /// can be filtered one buffer at a time. Derivatives are dropped; use `update` if you need
    /// them.
    pub fn filter(&mut self, output: &mut [T], input: &[T]) {
        for (&x, y) in input.iter().zip(output) {
            *y = self.update(x).value;
        }
    }

    /// Filters `data` in place.
    ///
    /// See [`Lowpass::filter`] for more details.
    pub fn filter_in_place(&mut self, data: &mut [T]) {
        for x in data {
            *x = self.update(*x).value;
        }
    }
}

fn coeffs_f64<T: Float>(c: &LowpassCoefficients<T>) -> [f64; 6] {
    [
        to_f64(c.a),
        to_f64(c.b),
        to_f64(c.c),
        to_f64(c.d),
        to_f64(c.e),
        to_f64(c.f),
    ]
}
