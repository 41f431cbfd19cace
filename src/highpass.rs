use num_traits::{Float, FloatConst};

use crate::numbers::{four, pi, sqrt2, squared, two};
use crate::config::to_f64;
use crate::FilterConfig;

/// The internal state of a [`Highpass`] filter.
///
/// These are artifacts of the discretization rather than physical quantities. `s0` tracks the
/// highpass path before it gets differenced into the output.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HighpassState<T> {
    /// First state component.
    pub s0: T,
    /// Second state component.
    pub s1: T,
}

/// The result of one [`Highpass::update`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HighpassOutput<T> {
    /// The filtered sample.
    pub value: T,
    /// The filter state after this sample.
    pub state: HighpassState<T>,
}

/// The fixed coefficients of a [`Highpass`] filter.
///
/// With `h` the sample period and `w0 = 2π·cutoff`:
/// ```text
/// a0 = √2·h·w0    a1 = h²         a2 = w0²       a3 = a1·a2
/// a4 = 2·a0       a5 = a3+a4+4    a6 = 1/a5      a8 = a2·h
/// ```
/// (There is no `a7`: that term depends on the state, so it is recomputed on every sample.)
#[derive(Clone, Copy, Debug, PartialEq)]
#[allow(missing_docs)]
pub struct HighpassCoefficients<T> {
    pub h: T,
    pub a0: T,
    pub a1: T,
    pub a2: T,
    pub a3: T,
    pub a4: T,
    pub a5: T,
    pub a6: T,
    pub a8: T,
}

impl<T: Float + FloatConst> HighpassCoefficients<T> {
    /// Derives the coefficients for a config.
    pub fn from_config(config: &FilterConfig<T>) -> Self {
        let w0 = two::<T>() * pi::<T>() * config.cutoff_frequency();
        let h = config.sample_period();

        let a0 = sqrt2::<T>() * h * w0;
        let a1 = squared(h);
        let a2 = squared(w0);
        let a3 = a1 * a2;
        let a4 = two::<T>() * a0;
        let a5 = a3 + a4 + four::<T>();
        HighpassCoefficients {
            h,
            a0,
            a1,
            a2,
            a3,
            a4,
            a5,
            a6: a5.recip(),
            a8: a2 * h,
        }
    }
}

/// A second-order highpass filter, the counterpart of [`Lowpass`](crate::Lowpass) with the same
/// cutoff and damping.
///
/// A constant input is eventually filtered to zero:
///
/// ```rust
/// # use complementary_filter::{FilterConfig, Highpass};
/// let config = FilterConfig::new(1.0_f64, 0.01).unwrap();
/// let mut highpass = Highpass::new(&config);
/// let first = highpass.update(1.0);
/// assert!(first.value > 0.0);
///
/// let mut out = first;
/// for _ in 1..500 {
///     out = highpass.update(1.0);
/// }
/// assert!(out.value.abs() < 1e-3);
/// ```
///
/// As with the lowpass filter, samples must arrive in order at the configured rate, and a
/// non-finite input leaves the state non-finite until [`Highpass::reset`].
#[derive(Clone, Copy, Debug)]
pub struct Highpass<T> {
    coeffs: HighpassCoefficients<T>,
    prev_unfiltered: T,
    prev_state: HighpassState<T>,
    prev_value: T,
}

impl<T: Float + FloatConst> Highpass<T> {
    /// Creates a new filter, with zero initial state.
    pub fn new(config: &FilterConfig<T>) -> Highpass<T> {
        let coeffs = HighpassCoefficients::from_config(config);
        log::debug!(
            "highpass: cutoff {} Hz, period {} s, a5 {}, a0 + 2 {}",
            to_f64(config.cutoff_frequency()),
            to_f64(config.sample_period()),
            to_f64(coeffs.a5),
            to_f64(coeffs.a0 + two::<T>()),
        );
        Highpass::from_coefficients(coeffs)
    }
}

impl<T: Float> Highpass<T> {
    /// Creates a new filter from coefficients that were already derived.
    pub fn from_coefficients(coeffs: HighpassCoefficients<T>) -> Highpass<T> {
        Highpass {
            coeffs,
            prev_unfiltered: T::zero(),
            prev_state: HighpassState {
                s0: T::zero(),
                s1: T::zero(),
            },
            prev_value: T::zero(),
        }
    }

    /// The coefficients this filter was built with.
    pub fn coefficients(&self) -> &HighpassCoefficients<T> {
        &self.coeffs
    }

    /// The most recent output, or zero if nothing has been filtered yet.
    pub fn last(&self) -> HighpassOutput<T> {
        HighpassOutput {
            value: self.prev_value,
            state: self.prev_state,
        }
    }

    /// Forgets all history, as though the filter was just created.
    pub fn reset(&mut self) {
        *self = Highpass::from_coefficients(self.coeffs);
    }

    /// Feeds in the next sample, returning the filtered sample and the new internal state.
    pub fn update(&mut self, value: T) -> HighpassOutput<T> {
        let HighpassCoefficients {
            h,
            a0,
            a1,
            a3,
            a4,
            a5,
            a6,
            a8,
            ..
        } = self.coeffs;
        let two = two::<T>();
        let four = four::<T>();

        let xi = value;
        let xim1 = self.prev_unfiltered;
        let z1im1 = self.prev_state.s0;
        let z1im2 = self.prev_state.s1;

        let a7 =
            a1 * xi + a1 * xim1 - a3 * z1im2 + a4 * z1im2 + four * h * z1im1 + four * z1im2;

        let z1i = a6
            * (a5 * (-a0 * z1im1 - a8 * z1im2 + h * xi + h * xim1 + two * z1im1) - a7 * a8)
            / (a0 + two);
        let z2i = a6 * a7;
        let yi = (z1i - z1im1) / h;

        self.prev_unfiltered = xi;
        self.prev_state = HighpassState { s0: z1i, s1: z2i };
        self.prev_value = yi;
        self.last()
    }

    /// Filters `input`, putting the filtered samples in `output`.
    ///
    /// This is the same as calling [`Highpass::update`] on each sample in turn and discarding the
    /// state.
    pub fn filter(&mut self, output: &mut [T], input: &[T]) {
        for (&x, y) in input.iter().zip(output) {
            *y = self.update(x).value;
        }
    }

    /// Filters `data` in place.
    pub fn filter_in_place(&mut self, data: &mut [T]) {
        for x in data {
            *x = self.update(*x).value;
        }
    }
}
