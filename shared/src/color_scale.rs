use thiserror::Error;

use crate::colors::{FLOW_PALETTE, RATE_PALETTE, Rgb};
use crate::metric::MetricMode;

/// Cut points for net migration per 1000 population.
pub const RATE_THRESHOLDS: [f64; 9] = [-20.0, -10.0, -5.0, -2.5, 0.0, 2.5, 5.0, 10.0, 20.0];

/// Cut points for absolute migrant counts, roughly logarithmic.
pub const FLOW_THRESHOLDS: [f64; 9] = [
    1_000.0,
    5_000.0,
    10_000.0,
    50_000.0,
    100_000.0,
    250_000.0,
    500_000.0,
    1_000_000.0,
    10_000_000.0,
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScaleError {
    #[error("palette has {palette} colors but {thresholds} thresholds need {needed}", needed = .thresholds + 1)]
    PaletteLength { thresholds: usize, palette: usize },
    #[error("threshold #{index} ({value}) is not finite")]
    NonFiniteThreshold { index: usize, value: f64 },
    #[error("thresholds must be strictly ascending: #{index} ({value}) <= {previous}")]
    NotAscending {
        index: usize,
        value: f64,
        previous: f64,
    },
}

/// Threshold scale: N ascending cut points split the number line into N + 1
/// buckets, bucket `i` painted with `palette[i]`. A value equal to a cut point
/// belongs to the bucket above it.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorEncoder {
    thresholds: Vec<f64>,
    palette: Vec<Rgb>,
}

impl ColorEncoder {
    pub fn new(thresholds: &[f64], palette: &[Rgb]) -> Result<Self, ScaleError> {
        if palette.len() != thresholds.len() + 1 {
            return Err(ScaleError::PaletteLength {
                thresholds: thresholds.len(),
                palette: palette.len(),
            });
        }
        for (index, &value) in thresholds.iter().enumerate() {
            if !value.is_finite() {
                return Err(ScaleError::NonFiniteThreshold { index, value });
            }
            if index > 0 {
                let previous = thresholds[index - 1];
                if value <= previous {
                    return Err(ScaleError::NotAscending {
                        index,
                        value,
                        previous,
                    });
                }
            }
        }
        Ok(Self {
            thresholds: thresholds.to_vec(),
            palette: palette.to_vec(),
        })
    }

    /// The built-in scale for a metric mode.
    pub fn for_mode(mode: MetricMode) -> Self {
        let (thresholds, palette): (&[f64], &[Rgb]) = match mode {
            MetricMode::Rate => (&RATE_THRESHOLDS, &RATE_PALETTE),
            MetricMode::Flow => (&FLOW_THRESHOLDS, &FLOW_PALETTE),
        };
        Self {
            thresholds: thresholds.to_vec(),
            palette: palette.to_vec(),
        }
    }

    /// Bucket index for `metric`. NaN lands in bucket 0.
    pub fn bucket_for(&self, metric: f64) -> usize {
        if metric.is_nan() {
            return 0;
        }
        self.thresholds.partition_point(|&t| t <= metric)
    }

    pub fn color_for(&self, metric: f64) -> Rgb {
        self.palette[self.bucket_for(metric)]
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// `(lower, upper, color)` per bucket; the outer bounds are infinite.
    pub fn legend(&self) -> Vec<(f64, f64, Rgb)> {
        let mut lower = f64::NEG_INFINITY;
        let mut out = Vec::with_capacity(self.palette.len());
        for (i, color) in self.palette.iter().enumerate() {
            let upper = self.thresholds.get(i).copied().unwrap_or(f64::INFINITY);
            out.push((lower, upper, *color));
            lower = upper;
        }
        out
    }
}
