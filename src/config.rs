/*!
Experiment configuration, and preparing a dataset from it
*/
use crate::{
    batch::{eval_batches, Batch, TrainBatches},
    wave::{corpus, corpus_len, WaveformKind},
    window::{EvalSplit, Windows},
    CpuFloat, Error, Result,
};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::iter::Once;
use tracing::info;

/// Every hyperparameter of an experiment, read once at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The waveforms making up the corpus, in order
    pub kinds: Vec<WaveformKind>,
    /// The number of samples generated per waveform
    pub seq_len: usize,
    /// The window length
    pub window_len: usize,
    /// The number of windows per training batch
    pub batch_size: usize,
    /// The number of windows held out for evaluation
    pub eval_windows: usize,
    /// The capacity of the training shuffle buffer
    pub shuffle_buffer: usize,
    /// The number of trailing samples of each window a model predicts
    pub n_predict: usize,
    /// Seed for every random draw of the experiment
    pub seed: u64,
    /// Recurrent cell size, passed through to the training harness
    pub cell_size: usize,
    /// Number of training epochs, passed through to the training harness
    pub epochs: usize,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            kinds: WaveformKind::ALL.to_vec(),
            seq_len: 1024 * 16,
            window_len: 16,
            batch_size: 32,
            eval_windows: 1024,
            shuffle_buffer: 1000,
            n_predict: 1,
            seed: 0,
            cell_size: 32,
            epochs: 10,
        }
    }
}

impl Config {
    /// The length of the generated corpus
    #[inline]
    pub fn corpus_len(&self) -> Result<usize> {
        corpus_len(self.kinds.len(), self.seq_len)
    }
    /// Check every setup constraint without generating any data
    pub fn validate(&self) -> Result<()> {
        if self.window_len == 0 {
            return Err(Error::EmptyWindow);
        }
        let len = self.corpus_len()?;
        if len % self.window_len != 0 {
            return Err(Error::Indivisible {
                len,
                window: self.window_len,
            });
        }
        let available = len / self.window_len;
        if self.eval_windows > available {
            return Err(Error::EvalTooLarge {
                requested: self.eval_windows,
                available,
            });
        }
        if self.batch_size == 0 {
            return Err(Error::EmptyBatch);
        }
        if self.shuffle_buffer == 0 {
            return Err(Error::EmptyShuffleBuffer);
        }
        if self.n_predict == 0 || self.n_predict >= self.window_len {
            return Err(Error::InvalidHorizon {
                horizon: self.n_predict,
                window: self.window_len,
            });
        }
        Ok(())
    }
    /// A fresh random number generator seeded from this configuration
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }
    /// Generate the corpus, window it, and sample the evaluation split
    pub fn prepare(&self) -> Result<Dataset> {
        self.validate()?;
        let mut rng = self.rng();
        let sequence = corpus(&self.kinds, self.seq_len, &mut rng)?;
        let windows = Windows::from_sequence(&sequence, self.window_len)?;
        let split = EvalSplit::sample(windows.len(), self.eval_windows, &mut rng)?;
        info!(
            samples = sequence.len(),
            windows = windows.len(),
            eval_windows = split.len(),
            "prepared dataset"
        );
        Ok(Dataset {
            sequence,
            windows,
            split,
        })
    }
}

/// A generated corpus, its windows, and the held-out evaluation split
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// The raw generated sequence
    pub sequence: Vec<CpuFloat>,
    /// The sequence cut into windows
    pub windows: Windows,
    /// The windows held out for evaluation
    pub split: EvalSplit,
}

impl Dataset {
    /// The endless training stream. Its shuffling is seeded from `config.seed`, independently of data generation
    pub fn train_batches(&self, config: &Config) -> Result<TrainBatches<'_, CpuFloat, StdRng>> {
        TrainBatches::new(
            &self.windows,
            config.batch_size,
            config.shuffle_buffer,
            config.rng(),
        )
    }
    /// The evaluation pass: exactly one batch of every held-out window
    pub fn eval_batches(&self) -> Once<Batch> {
        eval_batches(&self.windows, &self.split)
    }
}
