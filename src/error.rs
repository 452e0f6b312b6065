/*!
Errors raised while setting up a dataset
*/
use thiserror::Error;

/// Result type alias for `wavecast` operations
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while generating, windowing or batching a corpus
#[derive(Debug, Error)]
pub enum Error {
    /// The sequence cannot be cut into whole windows
    #[error("sequence of length {len} is not divisible into windows of length {window}")]
    Indivisible {
        /// Length of the sequence
        len: usize,
        /// Requested window length
        window: usize,
    },
    /// The corpus would hold more samples than fit in memory
    #[error("corpus of {kinds} waveforms with {per_kind} samples each is too large")]
    CorpusTooLarge {
        /// Number of waveforms in the corpus
        kinds: usize,
        /// Samples generated per waveform
        per_kind: usize,
    },
    /// A window length of zero was requested
    #[error("window length must be non-zero")]
    EmptyWindow,
    /// More evaluation windows were requested than exist
    #[error("requested {requested} evaluation windows, but only {available} are available")]
    EvalTooLarge {
        /// Requested evaluation sample size
        requested: usize,
        /// Number of windows in the dataset
        available: usize,
    },
    /// A batch size of zero was requested
    #[error("batch size must be non-zero")]
    EmptyBatch,
    /// A shuffle buffer capacity of zero was requested
    #[error("shuffle buffer capacity must be non-zero")]
    EmptyShuffleBuffer,
    /// The prediction horizon does not leave any context in a window
    #[error("prediction horizon {horizon} must lie in 1..{window}")]
    InvalidHorizon {
        /// Requested number of predicted samples
        horizon: usize,
        /// Window length
        window: usize,
    },
    /// A noise level is negative or not finite
    #[error("invalid noise standard deviation {std}")]
    InvalidNoise {
        /// The offending standard deviation
        std: f64,
    },
    /// A waveform name could not be parsed
    #[error("unknown waveform {0:?}")]
    UnknownWaveform(String),
    /// Reading or writing CSV data failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
