//! Packages and delivery-outcome tallies.

use std::fmt;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use lmr_core::PackageId;

/// Final scan status of a package.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageStatus {
    Delivered,
    Rejected,
    /// The driver attempted delivery but could not complete it.
    FailedAttempt,
}

impl PackageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PackageStatus::Delivered     => "delivered",
            PackageStatus::Rejected      => "rejected",
            PackageStatus::FailedAttempt => "failed_attempt",
        }
    }
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Package box dimensions in centimetres.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub depth_cm:  f64,
    pub height_cm: f64,
    pub width_cm:  f64,
}

impl Dimensions {
    pub fn new(depth_cm: f64, height_cm: f64, width_cm: f64) -> Self {
        Self { depth_cm, height_cm, width_cm }
    }

    #[inline]
    pub fn volume_cm3(&self) -> f64 {
        self.depth_cm * self.height_cm * self.width_cm
    }
}

/// A single package delivered (or not) at a stop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id:         PackageId,
    pub dimensions: Dimensions,
    pub status:     PackageStatus,
    /// Grams, when the source provides it.
    pub weight_g:   Option<f64>,
    /// Declared value in monetary units, when the source provides it.
    pub price:      Option<f64>,
}

impl Package {
    pub fn new(id: impl Into<PackageId>, dimensions: Dimensions, status: PackageStatus) -> Self {
        Self { id: id.into(), dimensions, status, weight_g: None, price: None }
    }

    pub fn with_weight(mut self, grams: f64) -> Self {
        self.weight_g = Some(grams);
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    #[inline]
    pub fn volume_cm3(&self) -> f64 {
        self.dimensions.volume_cm3()
    }
}

// ── PackageStatusCounts ───────────────────────────────────────────────────────

/// Number of packages per [`PackageStatus`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageStatusCounts {
    pub delivered: usize,
    pub rejected:  usize,
    pub failed:    usize,
}

impl PackageStatusCounts {
    pub fn new(delivered: usize, rejected: usize, failed: usize) -> Self {
        Self { delivered, rejected, failed }
    }

    pub fn record(&mut self, status: PackageStatus) {
        match status {
            PackageStatus::Delivered     => self.delivered += 1,
            PackageStatus::Rejected      => self.rejected += 1,
            PackageStatus::FailedAttempt => self.failed += 1,
        }
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.delivered + self.rejected + self.failed
    }
}

impl AddAssign for PackageStatusCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.delivered += rhs.delivered;
        self.rejected += rhs.rejected;
        self.failed += rhs.failed;
    }
}

impl<'a> FromIterator<&'a Package> for PackageStatusCounts {
    fn from_iter<I: IntoIterator<Item = &'a Package>>(iter: I) -> Self {
        let mut counts = Self::default();
        for p in iter {
            counts.record(p.status);
        }
        counts
    }
}
