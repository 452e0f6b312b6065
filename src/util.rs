/*!
Miscellaneous utilities for `wavecast`
*/
use crate::GpuFloat;
use num::{Float, NumCast};
use std::f64::consts::PI;

/// Convert a sample to the harness float type, mapping unrepresentable values to zero
#[inline]
pub fn to_gpu<F: NumCast>(sample: F) -> GpuFloat {
    NumCast::from(sample).unwrap_or(0.0)
}

/// Convert a phase in cycles to radians
pub fn cycles_to_rad<F: Float>(cycles: F) -> F {
    let two_pi: F = NumCast::from(2.0 * PI).expect("F cannot hold 2π");
    cycles * two_pi
}

/// The root mean square error between two equally long slices
pub fn rmse<F: Float>(pred: &[F], target: &[F]) -> F {
    use itertools::Itertools;
    if pred.is_empty() {
        return F::zero();
    }
    let sum = pred
        .iter()
        .zip_eq(target)
        .map(|(&p, &t)| (p - t) * (p - t))
        .fold(F::zero(), |acc, sq| acc + sq);
    let n: F = NumCast::from(pred.len()).unwrap_or_else(F::one);
    (sum / n).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_gpu() {
        assert_eq!(to_gpu(1.5f64), 1.5f32);
        assert_eq!(to_gpu(3usize), 3.0);
    }

    #[test]
    fn test_cycles_to_rad() {
        assert_eq!(cycles_to_rad(0.5f64), PI);
        assert_eq!(cycles_to_rad(1.0f32), 2.0 * std::f32::consts::PI);
    }

    #[test]
    fn test_rmse() {
        assert_eq!(rmse::<f64>(&[], &[]), 0.0);
        assert_eq!(rmse(&[1.0f64, 1.0], &[1.0, 1.0]), 0.0);
        assert_eq!(rmse(&[0.0f64, 0.0], &[3.0, 4.0]), (12.5f64).sqrt());
    }
}
