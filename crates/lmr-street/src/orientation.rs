//! Street orientation: distribution of edge bearings.
//!
//! # Binning
//!
//! The compass is split into `bins` equal buckets *centred* on multiples of
//! the bin width, so with 36 bins bucket 0 covers 355°–5° (north), bucket 9
//! covers 85°–95° (east) and so on.  The histogram is normalised to sum to 1.
//!
//! The folded histogram maps each bearing onto `[0, 180)` first, so a street
//! and its reverse land in the same bucket.  The axis descriptors of
//! [`OrientationStats`] are computed on the folded histogram.

use serde::{Deserialize, Serialize};

use lmr_core::EdgeId;

use crate::StreetNetwork;

/// Orientation settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrientationConfig {
    /// Number of compass buckets.  Values below 1 are treated as 1.
    pub bins: usize,
    /// Weight each bearing by its edge length instead of counting edges.
    pub weight_by_length: bool,
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self { bins: 36, weight_by_length: false }
    }
}

/// Bearing distribution of one group.
///
/// The dominant directions, the deviation measures and the moments describe
/// street *axes*, so they are taken from the folded histogram: a two-way
/// street contributes to one axis instead of two opposite buckets.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrientationStats {
    pub bin_width_deg:           f64,
    /// Share of bearings per bucket; bucket `i` is centred on
    /// `i * bin_width_deg`.
    pub histogram:               Vec<f64>,
    /// Width of a folded bucket, `180 / folded_histogram.len()`.
    pub folded_bin_width_deg:    f64,
    /// Same over `[0, 180)`, with `max(bins / 2, 1)` buckets.
    pub folded_histogram:        Vec<f64>,
    /// Number of edges contributing a bearing.
    pub bearing_count:           usize,
    /// Centre of the most populated folded bucket (lowest index on ties).
    pub dominant_bearing_deg:    f64,
    pub dominant_share:          f64,
    /// Runner-up folded bucket; `None` when every bearing lies on one axis.
    pub second_bearing_deg:      Option<f64>,
    pub second_share:            Option<f64>,
    /// Mean of `|share - u| / u` over the folded buckets, `u` being the
    /// uniform share.
    pub mean_deviation:          f64,
    /// Sum of `((share - u) / u)²` over the folded buckets.
    pub quadratic_sum_deviation: f64,
    /// Mean of the folded bucket-centre cosines, weighted by share.
    pub mean:                    f64,
    pub std:                     f64,
    /// `None` when `std` is zero.
    pub skew:                    Option<f64>,
    /// Non-excess kurtosis; `None` when `std` is zero.
    pub kurt:                    Option<f64>,
    /// Shannon entropy of the full histogram in nats; `ln(bins)` is the
    /// maximum.
    pub entropy:                 f64,
}

impl OrientationStats {
    /// Build the distribution from the given edges.
    ///
    /// Self-loops and zero-length edges have no bearing and are skipped.
    /// `None` if nothing remains.
    pub fn from_edges<I>(network: &StreetNetwork, edges: I, config: &OrientationConfig) -> Option<Self>
    where
        I: IntoIterator<Item = EdgeId>,
    {
        let bins = config.bins.max(1);
        let folded_bins = (bins / 2).max(1);
        let mut histogram = vec![0.0; bins];
        let mut folded = vec![0.0; folded_bins];
        let mut bearing_count = 0;

        for e in edges {
            if network.is_self_loop(e) || network.edge_straight_m(e) <= 0.0 {
                continue;
            }
            let bearing = network.edge_bearing_deg(e);
            let weight = if config.weight_by_length { network.edge_length_m[e.index()] } else { 1.0 };
            histogram[bucket(bearing, 360.0, bins)] += weight;
            folded[bucket(bearing % 180.0, 180.0, folded_bins)] += weight;
            bearing_count += 1;
        }

        let total: f64 = histogram.iter().sum();
        if bearing_count == 0 || total <= 0.0 {
            return None;
        }
        histogram.iter_mut().for_each(|h| *h /= total);
        folded.iter_mut().for_each(|h| *h /= total);

        let bin_width_deg = 360.0 / bins as f64;
        let folded_bin_width_deg = 180.0 / folded_bins as f64;

        // ── Axes ──────────────────────────────────────────────────────────
        let (dominant, dominant_share) = argmax(&folded, None);
        let (second, second_share) = argmax(&folded, Some(dominant));
        let second = (second_share > 0.0).then_some(second);

        let uniform = 1.0 / folded_bins as f64;
        let mean_deviation =
            folded.iter().map(|h| (h - uniform).abs() / uniform).sum::<f64>() / folded_bins as f64;
        let quadratic_sum_deviation = folded.iter().map(|h| ((h - uniform) / uniform).powi(2)).sum::<f64>();

        // ── Moments of the bucket-centre cosines ──────────────────────────
        let cosines: Vec<f64> =
            (0..folded_bins).map(|i| (i as f64 * folded_bin_width_deg).to_radians().cos()).collect();
        let moment = |centre: f64, k: i32| -> f64 {
            folded.iter().zip(&cosines).map(|(h, c)| h * (c - centre).powi(k)).sum()
        };
        let mean = moment(0.0, 1);
        let std = moment(mean, 2).sqrt();
        let (skew, kurt) = if std > 1e-12 {
            (Some(moment(mean, 3) / std.powi(3)), Some(moment(mean, 4) / std.powi(4)))
        } else {
            (None, None)
        };

        let entropy = -histogram.iter().filter(|h| **h > 0.0).map(|h| h * h.ln()).sum::<f64>();

        Some(Self {
            bin_width_deg,
            histogram,
            folded_bin_width_deg,
            bearing_count,
            dominant_bearing_deg: dominant as f64 * folded_bin_width_deg,
            dominant_share,
            second_bearing_deg: second.map(|i| i as f64 * folded_bin_width_deg),
            second_share: second.map(|i| folded[i]),
            folded_histogram: folded,
            mean_deviation,
            quadratic_sum_deviation,
            mean,
            std,
            skew,
            kurt,
            entropy,
        })
    }

    /// Share of the bucket containing `bearing_deg`.
    pub fn share_at(&self, bearing_deg: f64) -> f64 {
        self.histogram[bucket(bearing_deg.rem_euclid(360.0), 360.0, self.histogram.len())]
    }
}

/// Bucket of `angle` in `[0, span)` with `bins` buckets centred on multiples
/// of `span / bins`.
fn bucket(angle: f64, span: f64, bins: usize) -> usize {
    let width = span / bins as f64;
    ((angle + width / 2.0) / width).floor() as usize % bins
}

/// Index and value of the largest entry, skipping `exclude`.
fn argmax(values: &[f64], exclude: Option<usize>) -> (usize, f64) {
    values
        .iter()
        .copied()
        .enumerate()
        .filter(|(i, _)| Some(*i) != exclude)
        .fold((0, f64::NEG_INFINITY), |best, (i, v)| if v > best.1 { (i, v) } else { best })
}
