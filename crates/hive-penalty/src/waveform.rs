//! Penalty waveforms: service cost as a function of time.

use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

use hive_core::Timestep;

use crate::error::PenaltyError;

/// Shape of a penalty waveform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WaveformKind {
    /// Penalties disabled. Evaluates to 0.
    #[default]
    Null,
    /// `amplitude + offset`.
    Constant,
    /// `offset + amplitude * sin(2*pi*t/period + phase)`.
    Sine,
    /// `offset + amplitude` while the matching sine is non-negative,
    /// `offset` otherwise.
    Square,
    /// `offset` before `length`, `offset + amplitude` from then on.
    Step,
    /// `offset + amplitude * frac(t/period + phase/(2*pi))`.
    Sawtooth,
}

impl WaveformKind {
    /// Configuration name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Constant => "constant",
            Self::Sine => "sine",
            Self::Square => "square",
            Self::Step => "step",
            Self::Sawtooth => "sawtooth",
        }
    }

    fn is_periodic(self) -> bool {
        matches!(self, Self::Sine | Self::Square | Self::Sawtooth)
    }
}

impl fmt::Display for WaveformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WaveformKind {
    type Err = PenaltyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "null" => Ok(Self::Null),
            "constant" => Ok(Self::Constant),
            "sine" => Ok(Self::Sine),
            "square" => Ok(Self::Square),
            "step" => Ok(Self::Step),
            "sawtooth" => Ok(Self::Sawtooth),
            other => Err(PenaltyError::InvalidWaveform {
                reason: format!("unknown waveform type '{other}'"),
            }),
        }
    }
}

/// Waveform parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveformConfig {
    /// Shape. Default: [`WaveformKind::Null`].
    pub kind: WaveformKind,
    /// Peak deviation from `offset`. Default: 0.
    pub amplitude: f64,
    /// Period in timesteps (periodic shapes only). Default: 1.
    pub period: f64,
    /// Phase shift in radians (periodic shapes only). Default: 0.
    pub phase: f64,
    /// Constant added to every value. Default: 0.
    pub offset: f64,
    /// Step time in timesteps ([`WaveformKind::Step`] only). Default: 0.
    pub length: f64,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            kind: WaveformKind::Null,
            amplitude: 0.0,
            period: 1.0,
            phase: 0.0,
            offset: 0.0,
            length: 0.0,
        }
    }
}

impl WaveformConfig {
    /// Constant waveform of `value`.
    pub fn constant(value: f64) -> Self {
        Self {
            kind: WaveformKind::Constant,
            amplitude: value,
            ..Self::default()
        }
    }

    /// Check parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns `Err(PenaltyError::InvalidWaveform)` for non-finite
    /// parameters or a non-positive period on a periodic shape.
    pub fn validate(&self) -> Result<(), PenaltyError> {
        let params = [
            ("amplitude", self.amplitude),
            ("period", self.period),
            ("phase", self.phase),
            ("offset", self.offset),
            ("length", self.length),
        ];
        for (name, v) in params {
            if !v.is_finite() {
                return Err(PenaltyError::InvalidWaveform {
                    reason: format!("{name} must be finite, got {v}"),
                });
            }
        }
        if self.kind.is_periodic() && self.period <= 0.0 {
            return Err(PenaltyError::InvalidWaveform {
                reason: format!("{} period must be positive, got {}", self.kind, self.period),
            });
        }
        Ok(())
    }
}

/// A validated waveform.
#[derive(Clone, Debug, PartialEq)]
pub struct Waveform {
    config: WaveformConfig,
}

impl Waveform {
    /// Build a waveform from `config`.
    ///
    /// # Errors
    ///
    /// See [`WaveformConfig::validate`].
    pub fn new(config: WaveformConfig) -> Result<Self, PenaltyError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The disabled waveform.
    pub fn null() -> Self {
        Self {
            config: WaveformConfig::default(),
        }
    }

    /// Parameters.
    pub fn config(&self) -> &WaveformConfig {
        &self.config
    }

    /// Raw value at `t`.
    pub fn value(&self, t: Timestep) -> f64 {
        let c = &self.config;
        let t = t.0 as f64;
        match c.kind {
            WaveformKind::Null => 0.0,
            WaveformKind::Constant => c.amplitude + c.offset,
            WaveformKind::Sine => c.offset + c.amplitude * (TAU * t / c.period + c.phase).sin(),
            WaveformKind::Square => {
                if (TAU * t / c.period + c.phase).sin() >= 0.0 {
                    c.offset + c.amplitude
                } else {
                    c.offset
                }
            }
            WaveformKind::Step => {
                if t >= c.length {
                    c.offset + c.amplitude
                } else {
                    c.offset
                }
            }
            WaveformKind::Sawtooth => {
                let x = t / c.period + c.phase / TAU;
                c.offset + c.amplitude * (x - x.floor())
            }
        }
    }

    /// Whole timesteps of penalty at `t`. Values are truncated; negative
    /// and NaN values give 0.
    pub fn duration(&self, t: Timestep) -> u64 {
        let v = self.value(t);
        if v > 0.0 {
            v as u64
        } else {
            0
        }
    }
}

impl Default for Waveform {
    fn default() -> Self {
        Self::null()
    }
}
