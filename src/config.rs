use num_traits::Float;
use thiserror::Error;

/// Reasons a [`FilterConfig`] can be rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// The cutoff frequency was zero or negative.
    #[error("cutoff frequency must be positive, got {0} Hz")]
    NonPositiveCutoff(f64),

    /// The sample period was zero or negative.
    #[error("sample period must be positive, got {0} s")]
    NonPositivePeriod(f64),

    /// The sample rate was zero or negative.
    #[error("sample rate must be positive, got {0} Hz")]
    NonPositiveRate(f64),

    /// One of the parameters was NaN or infinite.
    #[error("filter parameters must be finite")]
    NonFinite,
}

/// The fixed parameters of a filter: its cutoff frequency and the period at which samples arrive.
///
/// Both values are frozen once the config is built. Every coefficient of [`Lowpass`] and
/// [`Highpass`] is derived from these two numbers when the filter is constructed.
///
/// Numerical accuracy degrades as `cutoff_frequency * sample_period` approaches 1; keeping it
/// well below that is up to the caller.
///
/// [`Lowpass`]: crate::Lowpass
/// [`Highpass`]: crate::Highpass
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterConfig<T> {
    cutoff_frequency: T,
    sample_period: T,
}

impl<T: Float> FilterConfig<T> {
    /// Creates a new config, checking that both parameters are finite and positive.
    ///
    /// ```rust
    /// # use complementary_filter::{ConfigError, FilterConfig};
    /// let config = FilterConfig::new(1.0_f64, 0.01).unwrap();
    /// assert_eq!(config.cutoff_frequency(), 1.0);
    ///
    /// assert_eq!(
    ///     FilterConfig::new(0.0_f64, 0.01),
    ///     Err(ConfigError::NonPositiveCutoff(0.0))
    /// );
    /// ```
    pub fn new(cutoff_frequency: T, sample_period: T) -> Result<Self, ConfigError> {
        if !cutoff_frequency.is_finite() || !sample_period.is_finite() {
            return Err(ConfigError::NonFinite);
        }
        if cutoff_frequency <= T::zero() {
            return Err(ConfigError::NonPositiveCutoff(to_f64(cutoff_frequency)));
        }
        if sample_period <= T::zero() {
            return Err(ConfigError::NonPositivePeriod(to_f64(sample_period)));
        }
        Ok(FilterConfig {
            cutoff_frequency,
            sample_period,
        })
    }

    /// Creates a new config from a sample rate (in Hz) instead of a sample period.
    pub fn from_sample_rate(cutoff_frequency: T, sample_rate: T) -> Result<Self, ConfigError> {
        if !sample_rate.is_finite() {
            return Err(ConfigError::NonFinite);
        }
        if sample_rate <= T::zero() {
            return Err(ConfigError::NonPositiveRate(to_f64(sample_rate)));
        }
        Self::new(cutoff_frequency, sample_rate.recip())
    }

    /// Creates a new config without any validation.
    ///
    /// A zero sample period or a cutoff that makes a coefficient denominator vanish will not be
    /// caught here; the filters will then produce non-finite output.
    pub fn new_unchecked(cutoff_frequency: T, sample_period: T) -> Self {
        FilterConfig {
            cutoff_frequency,
            sample_period,
        }
    }

    /// The cutoff frequency, in Hz.
    pub fn cutoff_frequency(&self) -> T {
        self.cutoff_frequency
    }

    /// The time between consecutive samples, in seconds.
    pub fn sample_period(&self) -> T {
        self.sample_period
    }
}

pub(crate) fn to_f64<T: Float>(x: T) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}
