/*!
Packaging windows into mini-batches for a training harness
*/
use crate::{
    util::to_gpu,
    window::{EvalSplit, Windows},
    Error, GpuFloat, Result,
};
use num::NumCast;
use rand::Rng;
use std::iter::{Cycle, Once};
use std::ops::Range;

/// A batch of windows, as row-major `[rows, cols]` matrices of inputs and labels
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// The input matrix
    pub inputs: Vec<GpuFloat>,
    /// The label matrix
    pub labels: Vec<GpuFloat>,
    /// The number of windows in this batch
    pub rows: usize,
    /// The window length
    pub cols: usize,
}

impl Batch {
    /// Package the windows at the given indices, in order, into a batch
    pub fn gather<F, I>(windows: &Windows<F>, indices: I) -> Batch
    where
        F: Copy + NumCast,
        I: IntoIterator<Item = usize>,
    {
        let cols = windows.window_len();
        let mut inputs = Vec::new();
        let mut labels = Vec::new();
        let mut rows = 0;
        for i in indices {
            inputs.extend(windows.input(i).iter().copied().map(to_gpu));
            labels.extend(windows.label(i).iter().copied().map(to_gpu));
            rows += 1;
        }
        Batch {
            inputs,
            labels,
            rows,
            cols,
        }
    }
    /// The `[rows, cols]` shape of this batch
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
    /// The input row of window `i`
    #[inline]
    pub fn input(&self, i: usize) -> &[GpuFloat] {
        &self.inputs[i * self.cols..(i + 1) * self.cols]
    }
    /// The label row of window `i`
    #[inline]
    pub fn label(&self, i: usize) -> &[GpuFloat] {
        &self.labels[i * self.cols..(i + 1) * self.cols]
    }
    /// Check that `horizon` trailing samples can be predicted from a non-empty context
    pub fn check_horizon(&self, horizon: usize) -> Result<()> {
        if horizon == 0 || horizon >= self.cols {
            return Err(Error::InvalidHorizon {
                horizon,
                window: self.cols,
            });
        }
        Ok(())
    }
    /// The last `horizon` labels of window `i`: the values a model is asked to predict
    pub fn targets(&self, i: usize, horizon: usize) -> Result<&[GpuFloat]> {
        self.check_horizon(horizon)?;
        Ok(&self.label(i)[self.cols - horizon..])
    }
    /// The inputs of window `i` a model may see when predicting `targets(i, horizon)`.
    ///
    /// This is every sample up to and including the one just before the first target.
    pub fn context(&self, i: usize, horizon: usize) -> Result<&[GpuFloat]> {
        self.check_horizon(horizon)?;
        Ok(&self.input(i)[..self.cols - horizon + 1])
    }
}

/// A pool of window indices drawn in random order from an endless upstream
#[derive(Debug, Clone)]
pub struct ShuffleBuffer<R> {
    buffer: Vec<usize>,
    upstream: Cycle<Range<usize>>,
    rng: R,
}

impl<R: Rng> ShuffleBuffer<R> {
    /// Create a buffer holding up to `capacity` indices, fed by cycling over `0..windows`
    pub fn new(windows: usize, capacity: usize, rng: R) -> Result<ShuffleBuffer<R>> {
        if capacity == 0 {
            return Err(Error::EmptyShuffleBuffer);
        }
        let mut upstream = (0..windows).cycle();
        let buffer = upstream.by_ref().take(capacity).collect();
        Ok(ShuffleBuffer {
            buffer,
            upstream,
            rng,
        })
    }
    /// The number of indices currently buffered
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }
    /// Whether the buffer is empty, which only happens when there are no windows
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl<R: Rng> Iterator for ShuffleBuffer<R> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.buffer.is_empty() {
            return None;
        }
        let slot = self.rng.gen_range(0, self.buffer.len());
        Some(match self.upstream.next() {
            Some(refill) => std::mem::replace(&mut self.buffer[slot], refill),
            None => self.buffer.swap_remove(slot),
        })
    }
}

/// An endless stream of shuffled training batches.
///
/// The stream never ends unless there are no windows. It can only be restarted by building a new one from a fresh rng.
#[derive(Debug, Clone)]
pub struct TrainBatches<'a, F, R> {
    windows: &'a Windows<F>,
    shuffle: ShuffleBuffer<R>,
    batch_size: usize,
}

impl<'a, F, R> TrainBatches<'a, F, R>
where
    F: Copy + NumCast,
    R: Rng,
{
    /// Create a stream of batches of `batch_size` windows, shuffled through a buffer of `shuffle_buffer` indices
    pub fn new(
        windows: &'a Windows<F>,
        batch_size: usize,
        shuffle_buffer: usize,
        rng: R,
    ) -> Result<TrainBatches<'a, F, R>> {
        if batch_size == 0 {
            return Err(Error::EmptyBatch);
        }
        Ok(TrainBatches {
            windows,
            shuffle: ShuffleBuffer::new(windows.len(), shuffle_buffer, rng)?,
            batch_size,
        })
    }
}

impl<'a, F, R> Iterator for TrainBatches<'a, F, R>
where
    F: Copy + NumCast,
    R: Rng,
{
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        if self.shuffle.is_empty() {
            return None;
        }
        let indices = self.shuffle.by_ref().take(self.batch_size);
        Some(Batch::gather(self.windows, indices))
    }
}

/// The evaluation pass: a single batch holding every held-out window
pub fn eval_batches<F>(windows: &Windows<F>, split: &EvalSplit) -> Once<Batch>
where
    F: Copy + NumCast,
{
    std::iter::once(Batch::gather(windows, split.indices().iter().copied()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    fn ramp(n: usize, window: usize) -> Windows<f64> {
        let sequence: Vec<f64> = (0..n).map(|i| i as f64).collect();
        Windows::from_sequence(&sequence, window).unwrap()
    }

    #[test]
    fn gather_preserves_rows() {
        let windows = ramp(8, 4);
        let batch = Batch::gather(&windows, vec![1, 0, 1]);
        assert_eq!(batch.shape(), (3, 4));
        assert_eq!(batch.input(0), &[4.0, 5.0, 6.0, 7.0]);
        assert_eq!(batch.label(0), &[5.0, 6.0, 7.0, 0.0]);
        assert_eq!(batch.input(1), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(batch.input(2), batch.input(0));
    }

    #[test]
    fn targets_and_context() {
        let windows = ramp(8, 4);
        let batch = Batch::gather(&windows, 0..2);
        assert_eq!(batch.targets(0, 1).unwrap(), &[4.0]);
        assert_eq!(batch.context(0, 1).unwrap(), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(batch.targets(0, 2).unwrap(), &[3.0, 4.0]);
        assert_eq!(batch.context(0, 2).unwrap(), &[0.0, 1.0, 2.0]);
        assert_eq!(batch.targets(1, 3).unwrap(), &[6.0, 7.0, 0.0]);
        assert!(matches!(
            batch.targets(0, 4),
            Err(Error::InvalidHorizon { horizon: 4, window: 4 })
        ));
        assert!(batch.context(0, 0).is_err());
    }

    #[test]
    fn shuffle_buffer_draws_every_window() {
        let mut shuffle = ShuffleBuffer::new(10, 10, StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(shuffle.len(), 10);
        let seen: HashSet<usize> = shuffle.by_ref().take(300).collect();
        assert_eq!(seen.len(), 10);
        // The buffer keeps refilling from upstream
        assert_eq!(shuffle.len(), 10);
    }

    #[test]
    fn shuffle_buffer_smaller_than_pool() {
        let shuffle = ShuffleBuffer::new(50, 4, StdRng::seed_from_u64(2)).unwrap();
        let drawn: Vec<usize> = shuffle.take(200).collect();
        assert!(drawn.iter().all(|&i| i < 50));
        assert_eq!(drawn.iter().collect::<HashSet<_>>().len(), 50);
        assert!(matches!(
            ShuffleBuffer::new(50, 0, StdRng::seed_from_u64(2)),
            Err(Error::EmptyShuffleBuffer)
        ));
    }

    #[test]
    fn train_batches_are_endless_and_full() {
        let windows = ramp(64, 8);
        let batches = TrainBatches::new(&windows, 3, 8, StdRng::seed_from_u64(4)).unwrap();
        for batch in batches.take(1000) {
            assert_eq!(batch.shape(), (3, 8));
            for row in 0..batch.rows {
                assert_eq!(batch.input(row)[0] % 8.0, 0.0);
                assert_eq!(&batch.label(row)[..7], &batch.input(row)[1..]);
            }
        }
    }

    #[test]
    fn train_batches_restart_by_reseeding() {
        let windows = ramp(64, 8);
        let a: Vec<Batch> = TrainBatches::new(&windows, 4, 8, StdRng::seed_from_u64(9))
            .unwrap()
            .take(20)
            .collect();
        let b: Vec<Batch> = TrainBatches::new(&windows, 4, 8, StdRng::seed_from_u64(9))
            .unwrap()
            .take(20)
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn train_batches_errors() {
        let windows = ramp(16, 4);
        assert!(matches!(
            TrainBatches::new(&windows, 0, 4, StdRng::seed_from_u64(0)),
            Err(Error::EmptyBatch)
        ));
        let empty = ramp(0, 4);
        let mut batches = TrainBatches::new(&empty, 2, 4, StdRng::seed_from_u64(0)).unwrap();
        assert!(batches.next().is_none());
    }

    #[test]
    fn eval_is_a_single_batch() {
        let windows = ramp(40, 4);
        let split = EvalSplit::sample(windows.len(), 6, &mut StdRng::seed_from_u64(3)).unwrap();
        let mut eval = eval_batches(&windows, &split);
        let batch = eval.next().unwrap();
        assert_eq!(batch.shape(), (6, 4));
        for (row, &i) in split.indices().iter().enumerate() {
            assert_eq!(batch.input(row)[0], (i * 4) as f32);
        }
        assert!(eval.next().is_none());
    }
}
