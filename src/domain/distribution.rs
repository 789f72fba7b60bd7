// ============================================================
// AGE DISTRIBUTION
// ============================================================
// Percentage report over the four fixed age buckets

use serde::{Deserialize, Serialize};

/// Share of the stored population per age bucket, in percent with
/// two-decimal precision. Serializes to exactly the four wire keys.
///
/// Buckets are disjoint and exhaustive with asymmetric boundaries: 20 and
/// 40 belong to the lower bucket (`<20` stops short of 20, `20-40` is
/// inclusive on both ends, `40-60` excludes 40 and includes 60).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeDistribution {
    #[serde(rename = "<20")]
    pub under_20: f64,

    #[serde(rename = "20-40")]
    pub between_20_40: f64,

    #[serde(rename = "40-60")]
    pub between_40_60: f64,

    #[serde(rename = ">60")]
    pub above_60: f64,
}

impl AgeDistribution {
    /// All buckets at zero, the report for an empty population.
    pub fn empty() -> Self {
        Self {
            under_20: 0.0,
            between_20_40: 0.0,
            between_40_60: 0.0,
            above_60: 0.0,
        }
    }

    /// Turn raw bucket counts into percentages of `total`.
    ///
    /// Each bucket is rounded independently, so the four values may not
    /// sum to exactly 100. A zero total yields the all-zero report.
    pub fn from_counts(
        under_20: i64,
        between_20_40: i64,
        between_40_60: i64,
        above_60: i64,
        total: i64,
    ) -> Self {
        if total <= 0 {
            return Self::empty();
        }
        Self {
            under_20: percentage(under_20, total),
            between_20_40: percentage(between_20_40, total),
            between_40_60: percentage(between_40_60, total),
            above_60: percentage(above_60, total),
        }
    }
}

fn percentage(count: i64, total: i64) -> f64 {
    let raw = (count as f64 / total as f64) * 100.0;
    (raw * 100.0).round() / 100.0
}
