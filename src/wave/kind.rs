/*!
Named waveform presets
*/
use super::{Component, Modulation, Shape, Waveform};
use crate::{CpuFloat, Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// The waveform presets a corpus can be built from
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WaveformKind {
    /// A single clean sine wave
    Sine,
    /// A sine wave whose frequency slowly drifts up and down, with a little noise
    SineVarFreq,
    /// Two superposed sine waves under slow amplitude modulation, with noticeable noise
    SineVarAmpNoise,
    /// A triangle wave plus a faster sawtooth, with noise
    Mixed,
}

impl WaveformKind {
    /// Every preset, in corpus order
    pub const ALL: &'static [WaveformKind] = &[
        WaveformKind::Sine,
        WaveformKind::SineVarFreq,
        WaveformKind::SineVarAmpNoise,
        WaveformKind::Mixed,
    ];

    /// The name of this preset, as accepted by `from_str`
    pub fn name(self) -> &'static str {
        match self {
            WaveformKind::Sine => "sine",
            WaveformKind::SineVarFreq => "sine-var-freq",
            WaveformKind::SineVarAmpNoise => "sine-var-amp-noise",
            WaveformKind::Mixed => "mixed",
        }
    }

    /// The waveform this preset describes
    pub fn waveform(self) -> Waveform {
        match self {
            WaveformKind::Sine => Waveform::new(vec![Component::sine(0.8, 1.0 / 32.0, 0.0, 0.0)]),
            WaveformKind::SineVarFreq => Waveform {
                components: vec![Component::sine(0.8, 1.0 / 24.0, 0.0, 0.02)],
                freq_mod: Some(Modulation {
                    depth: 0.5,
                    period: 600,
                }),
                amp_mod: None,
            },
            WaveformKind::SineVarAmpNoise => Waveform {
                components: vec![
                    Component::sine(0.6, 1.0 / 40.0, 0.0, 0.08),
                    Component::sine(0.3, 1.0 / 11.0, 1.0, 0.06),
                ],
                freq_mod: None,
                amp_mod: Some(Modulation {
                    depth: 0.5,
                    period: 700,
                }),
            },
            WaveformKind::Mixed => Waveform::new(vec![
                Component {
                    shape: Shape::Triangle,
                    amplitude: 0.5,
                    frequency: 1.0 / 50.0,
                    phase: 0.0,
                    noise: 0.05,
                },
                Component {
                    shape: Shape::Sawtooth,
                    amplitude: 0.3,
                    frequency: 1.0 / 17.0,
                    phase: 0.5,
                    noise: 0.0,
                },
            ]),
        }
    }

    /// Generate `n` samples of this preset
    #[inline]
    pub fn generate<R: Rng + ?Sized>(self, n: usize, rng: &mut R) -> Result<Vec<CpuFloat>> {
        self.waveform().generate(n, rng)
    }
}

impl Display for WaveformKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WaveformKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<WaveformKind> {
        WaveformKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::UnknownWaveform(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn names_round_trip() {
        for &kind in WaveformKind::ALL {
            assert_eq!(kind.to_string().parse::<WaveformKind>().unwrap(), kind);
        }
        assert!(matches!(
            "square".parse::<WaveformKind>(),
            Err(Error::UnknownWaveform(name)) if name == "square"
        ));
    }

    #[test]
    fn presets_are_bounded_and_periodic_enough() {
        let mut rng = StdRng::seed_from_u64(3);
        for &kind in WaveformKind::ALL {
            let samples = kind.generate(4096, &mut rng).unwrap();
            assert_eq!(samples.len(), 4096);
            assert!(samples.iter().all(|s| s.is_finite() && s.abs() < 3.0), "{} out of range", kind);
            // A periodic signal crosses zero regularly
            let crossings = samples.windows(2).filter(|w| w[0].signum() != w[1].signum()).count();
            assert!(crossings > 50, "{} has only {} zero crossings", kind, crossings);
        }
    }

    #[test]
    fn variable_frequency_departs_from_plain_sine() {
        let mut plain = WaveformKind::SineVarFreq.waveform();
        plain.freq_mod = None;
        for c in plain.components.iter_mut() {
            c.noise = 0.0;
        }
        let mut modulated = WaveformKind::SineVarFreq.waveform();
        for c in modulated.components.iter_mut() {
            c.noise = 0.0;
        }
        let mut rng = StdRng::seed_from_u64(0);
        let a = plain.generate(600, &mut rng).unwrap();
        let b = modulated.generate(600, &mut rng).unwrap();
        assert_eq!(a[0], b[0]);
        assert!(a.iter().zip(&b).any(|(x, y)| (x - y).abs() > 0.1));
    }
}
