/*!
Cutting a sequence into training windows, and holding out an evaluation sample
*/
use crate::{CpuFloat, Error, Result};
use rand::{seq::index, Rng};
use tracing::debug;

/// A sequence reshaped into non-overlapping windows, each paired with its shifted-by-one labels
#[derive(Debug, Clone, PartialEq)]
pub struct Windows<F = CpuFloat> {
    /// The window inputs, row-major
    inputs: Vec<F>,
    /// The window labels, row-major
    labels: Vec<F>,
    /// The length of each window
    window_len: usize,
}

impl<F: Copy> Windows<F> {
    /// Reshape a sequence into windows of length `window_len`.
    ///
    /// Labels are the sequence rotated left by one sample, so the last label wraps around to the first sample.
    pub fn from_sequence(sequence: &[F], window_len: usize) -> Result<Windows<F>> {
        if window_len == 0 {
            return Err(Error::EmptyWindow);
        }
        if sequence.len() % window_len != 0 {
            return Err(Error::Indivisible {
                len: sequence.len(),
                window: window_len,
            });
        }
        let inputs = sequence.to_vec();
        let mut labels = inputs.clone();
        let shift = 1.min(labels.len());
        labels.rotate_left(shift);
        debug!(
            samples = sequence.len(),
            window_len,
            windows = sequence.len() / window_len,
            "windowed sequence"
        );
        Ok(Windows {
            inputs,
            labels,
            window_len,
        })
    }
    /// The number of windows
    #[inline]
    pub fn len(&self) -> usize {
        self.inputs.len() / self.window_len
    }
    /// Whether there are no windows at all
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
    /// The length of each window
    #[inline]
    pub fn window_len(&self) -> usize {
        self.window_len
    }
    /// The input samples of window `i`
    #[inline]
    pub fn input(&self, i: usize) -> &[F] {
        &self.inputs[i * self.window_len..(i + 1) * self.window_len]
    }
    /// The label samples of window `i`
    #[inline]
    pub fn label(&self, i: usize) -> &[F] {
        &self.labels[i * self.window_len..(i + 1) * self.window_len]
    }
    /// Iterate over `(input, label)` pairs, in sequence order
    pub fn iter(&self) -> impl Iterator<Item = (&[F], &[F])> + '_ {
        self.inputs
            .chunks(self.window_len)
            .zip(self.labels.chunks(self.window_len))
    }
    /// The window inputs laid back out as a flat sequence; equal to the source sequence
    pub fn flatten(&self) -> Vec<F> {
        self.iter().flat_map(|(input, _)| input.iter().copied()).collect()
    }
}

/// The windows held out for evaluation.
///
/// Held-out windows are *not* removed from the training pool.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EvalSplit {
    indices: Vec<usize>,
}

impl EvalSplit {
    /// Sample `k` distinct window indices out of `windows`, uniformly at random
    pub fn sample<R: Rng + ?Sized>(windows: usize, k: usize, rng: &mut R) -> Result<EvalSplit> {
        if k > windows {
            return Err(Error::EvalTooLarge {
                requested: k,
                available: windows,
            });
        }
        let indices = index::sample(rng, windows, k).into_vec();
        debug!(windows, held_out = k, "sampled evaluation split");
        Ok(EvalSplit { indices })
    }
    /// The held-out window indices, in sampling order
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
    /// The number of held-out windows
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }
    /// Whether no windows are held out
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
