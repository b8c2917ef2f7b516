//! Admission filter in front of the report aggregator
//!
//! View events are frequent, and each admitted one costs a write
//! transaction. The gate decides per event whether it is counted at all.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng as _;
use snafu::{ResultExt as _, Snafu};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SamplingMode {
    /// Admit every other event, counted across all callers
    #[default]
    Alternate,
    /// Admit everything
    All,
    /// Admit each event independently with the given probability
    Ratio(SamplingRatio),
}

/// Admission probability, always within `0..=1`
///
/// Only obtainable through [`SamplingMode::ratio`] or parsing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingRatio(f64);

impl SamplingRatio {
    pub fn get(self) -> f64 {
        self.0
    }
}

#[derive(Debug, Snafu)]
pub enum SamplingModeParseError {
    #[snafu(display("Unknown sampling mode: {value}"))]
    UnknownMode { value: String },
    #[snafu(display("Invalid sampling ratio: {value}"))]
    InvalidRatio {
        value: String,
        source: std::num::ParseFloatError,
    },
    #[snafu(display("Sampling ratio must be within 0..=1: {ratio}"))]
    RatioOutOfRange { ratio: f64 },
}

impl SamplingMode {
    pub fn ratio(ratio: f64) -> Result<Self, SamplingModeParseError> {
        // NaN fails the range check too
        if !(0.0..=1.0).contains(&ratio) {
            return RatioOutOfRangeSnafu { ratio }.fail();
        }
        Ok(Self::Ratio(SamplingRatio(ratio)))
    }
}

impl fmt::Display for SamplingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingMode::Alternate => f.write_str("alternate"),
            SamplingMode::All => f.write_str("all"),
            SamplingMode::Ratio(ratio) => write!(f, "ratio:{}", ratio.get()),
        }
    }
}

impl FromStr for SamplingMode {
    type Err = SamplingModeParseError;

    /// `alternate`, `all` or `ratio:<p>`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "alternate" => Ok(Self::Alternate),
            "all" => Ok(Self::All),
            _ => {
                let Some(ratio) = s.strip_prefix("ratio:") else {
                    return UnknownModeSnafu { value: s }.fail();
                };
                let ratio = ratio
                    .parse::<f64>()
                    .context(InvalidRatioSnafu { value: s })?;
                Self::ratio(ratio)
            }
        }
    }
}

/// Decides whether a view event gets forwarded for aggregation
///
/// Safe to share between any number of concurrent callers.
#[derive(Debug, Default)]
pub struct SamplingGate {
    mode: SamplingMode,
    /// Decisions taken so far in [`SamplingMode::Alternate`]
    decisions: AtomicU64,
}

impl SamplingGate {
    pub fn new(mode: SamplingMode) -> Self {
        Self {
            mode,
            decisions: AtomicU64::new(0),
        }
    }

    pub fn mode(&self) -> SamplingMode {
        self.mode
    }

    pub fn admit(&self) -> bool {
        match self.mode {
            // Every decision takes a distinct ticket, so exactly half of
            // any run of consecutive decisions is admitted.
            SamplingMode::Alternate => self.decisions.fetch_add(1, Ordering::Relaxed) % 2 == 0,
            SamplingMode::All => true,
            SamplingMode::Ratio(ratio) => rand::rng().random_bool(ratio.get()),
        }
    }
}
