//! Analysis-wide metric choices.
//!
//! These are decided once per [`Analysis`](crate::Analysis) so that every
//! route in a summary is measured the same way.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which stop ordering a metric is computed over.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceKind {
    /// The order the stops were planned in.
    #[default]
    Planned,
    /// The order the driver actually visited them, set post hoc.
    Actual,
}

impl SequenceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SequenceKind::Planned => "planned",
            SequenceKind::Actual  => "actual",
        }
    }
}

impl fmt::Display for SequenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Treatment of circuity factors below 1.
///
/// A driving distance shorter than the great-circle distance is physically
/// impossible and usually stems from rounding in the routing service.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuityPolicy {
    /// Report the ratio as computed.
    #[default]
    Raw,
    /// Report `max(ratio, 1.0)`.
    ClampToOne,
}

impl CircuityPolicy {
    #[inline]
    pub fn apply(self, ratio: f64) -> f64 {
        match self {
            CircuityPolicy::Raw        => ratio,
            CircuityPolicy::ClampToOne => ratio.max(1.0),
        }
    }
}

/// Settings shared by every route of an [`Analysis`](crate::Analysis).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub sequence: SequenceKind,
    pub circuity: CircuityPolicy,
}
