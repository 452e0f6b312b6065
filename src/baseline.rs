/*!
Naive forecasting baselines

Any trained model should at least beat these on the evaluation batch.
*/
use crate::{batch::Batch, util::rmse, GpuFloat, Result};
use std::fmt::{self, Display, Formatter};
use std::iter::repeat;

/// Something that forecasts the next `horizon` samples from a window of context
pub trait Predictor {
    /// Predict `horizon` samples following `context`. `context` is never empty
    fn predict(&self, context: &[GpuFloat], horizon: usize) -> Vec<GpuFloat>;
}

/// Repeat the last observed value
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct Persistence;

impl Predictor for Persistence {
    fn predict(&self, context: &[GpuFloat], horizon: usize) -> Vec<GpuFloat> {
        let last = context.last().copied().unwrap_or(0.0);
        repeat(last).take(horizon).collect()
    }
}

/// Repeat the mean of the context
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct WindowMean;

impl Predictor for WindowMean {
    fn predict(&self, context: &[GpuFloat], horizon: usize) -> Vec<GpuFloat> {
        let mean = if context.is_empty() {
            0.0
        } else {
            context.iter().sum::<GpuFloat>() / context.len() as GpuFloat
        };
        repeat(mean).take(horizon).collect()
    }
}

/// Continue the line through the last two observed values
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct LinearTrend;

impl Predictor for LinearTrend {
    fn predict(&self, context: &[GpuFloat], horizon: usize) -> Vec<GpuFloat> {
        match context {
            [] => vec![0.0; horizon],
            [only] => vec![*only; horizon],
            [.., prev, last] => {
                let slope = last - prev;
                (1..=horizon).map(|k| last + slope * k as GpuFloat).collect()
            }
        }
    }
}

/// The RMSE of `predictor` over every window of `batch`, forecasting the last `horizon` labels of each
pub fn evaluate<P: Predictor + ?Sized>(predictor: &P, batch: &Batch, horizon: usize) -> Result<f64> {
    batch.check_horizon(horizon)?;
    let mut predictions = Vec::with_capacity(batch.rows * horizon);
    let mut targets = Vec::with_capacity(batch.rows * horizon);
    for row in 0..batch.rows {
        predictions.extend(predictor.predict(batch.context(row, horizon)?, horizon));
        targets.extend_from_slice(batch.targets(row, horizon)?);
    }
    Ok(f64::from(rmse(&predictions, &targets)))
}

/// Running statistics over per-batch losses
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct LossSummary {
    /// The number of losses recorded
    pub batches: usize,
    /// Their sum
    pub sum: f64,
    /// The largest loss, or zero if none were recorded
    pub max: f64,
    /// The smallest loss, or zero if none were recorded
    pub min: f64,
}

impl LossSummary {
    /// Record the loss of one batch
    pub fn push(&mut self, loss: f64) {
        if self.batches == 0 {
            self.max = loss;
            self.min = loss;
        } else {
            self.max = self.max.max(loss);
            self.min = self.min.min(loss);
        }
        self.sum += loss;
        self.batches += 1;
    }
    /// The average loss, if any were recorded
    pub fn mean(&self) -> Option<f64> {
        if self.batches == 0 {
            None
        } else {
            Some(self.sum / self.batches as f64)
        }
    }
}

impl Display for LossSummary {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.mean() {
            None => write!(f, "no batches"),
            Some(mean) => write!(
                f,
                "{} batches: average loss = {}, max = {}, min = {}",
                self.batches, mean, self.max, self.min
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{window::Windows, Error};

    fn batch_of(sequence: &[f64], window: usize) -> Batch {
        let windows = Windows::from_sequence(sequence, window).unwrap();
        Batch::gather(&windows, 0..windows.len())
    }

    #[test]
    fn predictions() {
        let context = [1.0, 2.0, 4.0];
        assert_eq!(Persistence.predict(&context, 2), vec![4.0, 4.0]);
        assert_eq!(WindowMean.predict(&context, 1), vec![7.0 / 3.0]);
        assert_eq!(LinearTrend.predict(&context, 3), vec![6.0, 8.0, 10.0]);
        assert_eq!(LinearTrend.predict(&[5.0], 2), vec![5.0, 5.0]);
    }

    #[test]
    fn constant_sequence_is_free() {
        let batch = batch_of(&[2.5; 32], 8);
        for predictor in &[&Persistence as &dyn Predictor, &WindowMean, &LinearTrend] {
            assert_eq!(evaluate(*predictor, &batch, 3).unwrap(), 0.0);
        }
    }

    #[test]
    fn persistence_on_a_ramp() {
        // Exclude the last window, whose final label wraps around to the start
        let sequence: Vec<f64> = (0..40).map(f64::from).collect();
        let windows = Windows::from_sequence(&sequence, 8).unwrap();
        let batch = Batch::gather(&windows, 0..windows.len() - 1);
        // Targets are one and two steps ahead of the last context value
        let expected = ((1.0 + 4.0) / 2.0f64).sqrt();
        assert!((evaluate(&Persistence, &batch, 2).unwrap() - expected).abs() < 1e-6);
        assert!(evaluate(&LinearTrend, &batch, 2).unwrap().abs() < 1e-6);
    }

    #[test]
    fn horizon_must_leave_context() {
        let batch = batch_of(&[0.0; 16], 4);
        assert!(matches!(
            evaluate(&Persistence, &batch, 4),
            Err(Error::InvalidHorizon { horizon: 4, window: 4 })
        ));
        assert!(evaluate(&Persistence, &batch, 0).is_err());
    }

    #[test]
    fn loss_summary() {
        let mut summary = LossSummary::default();
        assert_eq!(summary.mean(), None);
        assert_eq!(summary.to_string(), "no batches");
        for &loss in &[2.0, 0.5, 3.5] {
            summary.push(loss);
        }
        assert_eq!(summary.batches, 3);
        assert_eq!(summary.mean(), Some(2.0));
        assert_eq!((summary.max, summary.min), (3.5, 0.5));
        assert_eq!(summary.to_string(), "3 batches: average loss = 2, max = 3.5, min = 0.5");
    }
}
