#![deny(missing_docs)]

//! `complementary-filter` provides the two halves of a complementary filter: a second-order
//! [`Lowpass`] that also estimates the derivative of its output, and its [`Highpass`]
//! counterpart. Both are generic over the float type (usually `f32` or `f64`).
//!
//! Each filter is built from a [`FilterConfig`]. Its coefficients are derived once, at
//! construction, and the filter is then fed one sample per sample period through `update`. How
//! the two outputs get combined is up to the caller.
//!
//! ```rust
//! use complementary_filter::{FilterConfig, Highpass, Lowpass};
//!
//! let config = FilterConfig::from_sample_rate(0.5_f32, 100.0).unwrap();
//! let mut slow = Lowpass::new(&config);
//! let mut fast = Highpass::new(&config);
//!
//! let (accel_angle, gyro_angle) = (0.1, 0.12);
//! let estimate = slow.update(accel_angle).value + fast.update(gyro_angle).value;
//! # let _ = estimate;
//! ```
//!
//! [`Lowpass`]: struct.Lowpass.html

#[cfg(any(cargo_c, feature = "capi"))]
mod capi;

mod config;
mod highpass;
mod lowpass;
pub mod numbers;

pub use config::{ConfigError, FilterConfig};
pub use highpass::{Highpass, HighpassCoefficients, HighpassOutput, HighpassState};
pub use lowpass::{Lowpass, LowpassCoefficients, Signal};
