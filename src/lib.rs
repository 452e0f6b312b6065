/*!
Synthetic waveform corpora and windowed mini-batches for short-horizon time-series forecasting experiments.

A corpus is built by summing a few parametrized periodic waveforms plus noise, then sliced into fixed-length windows
whose labels are the inputs shifted one sample into the future. Training consumes an endless shuffled stream of
mini-batches; evaluation consumes a single batch drawn from a held-out random sample of windows.
The models themselves live outside this crate, in whatever training harness consumes the batches.
*/
#![forbid(missing_docs)]

pub mod baseline;
pub mod batch;
pub mod config;
pub mod data;
pub mod error;
pub mod util;
pub mod wave;
pub mod window;

pub use config::{Config, Dataset};
pub use error::{Error, Result};

/// The floating point type used for sequence generation and windowing
pub type CpuFloat = f64;

/// The floating point type handed to the training harness
pub type GpuFloat = f32;
