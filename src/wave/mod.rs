/*!
Synthetic waveform generation

A [`Waveform`] is a sum of periodic [`Component`]s, optionally modulated in frequency and amplitude, with Gaussian
noise on top. [`WaveformKind`] names the presets used to build training corpora.
*/
use crate::{util::cycles_to_rad, CpuFloat, Error, Result};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_2_PI, PI};
use tracing::debug;

mod kind;

pub use kind::WaveformKind;

/// The shape of a periodic component
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Shape {
    /// A sine wave
    Sine,
    /// A symmetric triangle wave, in phase with the sine wave of the same frequency
    Triangle,
    /// A rising sawtooth, crossing zero at phase zero
    Sawtooth,
}

impl Shape {
    /// Evaluate this shape at a phase given in radians. Always lies in `[-1, 1]`
    #[inline]
    pub fn at(self, phase: CpuFloat) -> CpuFloat {
        match self {
            Shape::Sine => phase.sin(),
            Shape::Triangle => FRAC_2_PI * phase.sin().asin(),
            Shape::Sawtooth => {
                let x = phase / (2.0 * PI);
                2.0 * (x - (x + 0.5).floor())
            }
        }
    }
}

/// One periodic component of a waveform
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// The shape of this component
    pub shape: Shape,
    /// Peak amplitude
    pub amplitude: CpuFloat,
    /// Frequency, in cycles per sample
    pub frequency: CpuFloat,
    /// Starting phase, in radians
    pub phase: CpuFloat,
    /// Standard deviation of the Gaussian noise this component contributes
    pub noise: CpuFloat,
}

impl Component {
    /// A sine component
    pub fn sine(amplitude: CpuFloat, frequency: CpuFloat, phase: CpuFloat, noise: CpuFloat) -> Component {
        Component {
            shape: Shape::Sine,
            amplitude,
            frequency,
            phase,
            noise,
        }
    }
    /// Sample this component at an accumulated phase, without noise
    #[inline]
    pub fn sample(&self, phase: CpuFloat) -> CpuFloat {
        self.amplitude * self.shape.at(phase)
    }
}

/// Slow sinusoidal modulation of a waveform parameter
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modulation {
    /// Relative depth: the parameter swings between `1 - depth` and `1 + depth` times its base value
    pub depth: CpuFloat,
    /// Period of the modulation, in samples. A period of zero disables the modulation
    pub period: usize,
}

impl Modulation {
    /// The multiplier applied at sample `t`
    #[inline]
    pub fn factor(&self, t: usize) -> CpuFloat {
        if self.period == 0 {
            return 1.0;
        }
        1.0 + self.depth * cycles_to_rad(t as CpuFloat / self.period as CpuFloat).sin()
    }
}

/// A sum of periodic components plus noise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waveform {
    /// The components making up this waveform
    pub components: Vec<Component>,
    /// Modulation applied to every component's frequency
    pub freq_mod: Option<Modulation>,
    /// Modulation applied to the summed amplitude
    pub amp_mod: Option<Modulation>,
}

impl Waveform {
    /// An unmodulated waveform made of the given components
    pub fn new(components: Vec<Component>) -> Waveform {
        Waveform {
            components,
            freq_mod: None,
            amp_mod: None,
        }
    }
    /// The standard deviation of the noise added to each sample
    pub fn noise_std(&self) -> CpuFloat {
        self.components
            .iter()
            .map(|c| c.noise * c.noise)
            .sum::<CpuFloat>()
            .sqrt()
    }
    /// Generate `n` samples of this waveform, drawing noise from `rng`.
    ///
    /// No randomness is consumed when the waveform is noiseless.
    pub fn generate<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Vec<CpuFloat>> {
        if let Some(bad) = self
            .components
            .iter()
            .find(|c| !(c.noise.is_finite() && c.noise >= 0.0))
        {
            return Err(Error::InvalidNoise { std: bad.noise });
        }
        let noise_std = self.noise_std();
        if !noise_std.is_finite() {
            return Err(Error::InvalidNoise { std: noise_std });
        }
        let noise = if noise_std > 0.0 {
            Some(Normal::new(0.0, noise_std).map_err(|_| Error::InvalidNoise { std: noise_std })?)
        } else {
            None
        };
        let mut phases: Vec<CpuFloat> = self.components.iter().map(|c| c.phase).collect();
        let mut samples = Vec::with_capacity(n);
        for t in 0..n {
            let fm = self.freq_mod.map_or(1.0, |m| m.factor(t));
            let am = self.amp_mod.map_or(1.0, |m| m.factor(t));
            let mut value = 0.0;
            for (component, phase) in self.components.iter().zip(phases.iter_mut()) {
                value += component.sample(*phase);
                *phase += cycles_to_rad(component.frequency * fm);
            }
            value *= am;
            if let Some(noise) = &noise {
                value += noise.sample(rng);
            }
            samples.push(value);
        }
        Ok(samples)
    }
}

/// The length of a corpus of `kinds` waveforms with `n` samples each
pub fn corpus_len(kinds: usize, n: usize) -> Result<usize> {
    kinds
        .checked_mul(n)
        .ok_or(Error::CorpusTooLarge { kinds, per_kind: n })
}

/// Generate `n` samples of every kind in `kinds` and concatenate them, in order
pub fn corpus<R: Rng + ?Sized>(kinds: &[WaveformKind], n: usize, rng: &mut R) -> Result<Vec<CpuFloat>> {
    let mut sequence = Vec::with_capacity(corpus_len(kinds.len(), n)?);
    for kind in kinds {
        sequence.extend(kind.generate(n, rng)?);
        debug!(%kind, samples = n, "generated waveform");
    }
    Ok(sequence)
}
