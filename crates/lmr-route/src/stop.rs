//! Delivery stops.

use std::fmt;

use serde::{Deserialize, Serialize};

use lmr_core::{GeoPoint, StopId};

use crate::{Package, PackageStatusCounts, RouteError, RouteResult};

/// Role of a stop within a route.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    /// The station the route starts from.
    Depot,
    Pickup,
    Dropoff,
}

impl LocationType {
    pub fn as_str(self) -> &'static str {
        match self {
            LocationType::Depot   => "depot",
            LocationType::Pickup  => "pickup",
            LocationType::Dropoff => "dropoff",
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery window as Unix seconds; `start <= end` always holds, including
/// for deserialized windows.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WindowBounds")]
pub struct TimeWindow {
    start: i64,
    end:   i64,
}

#[derive(Deserialize)]
struct WindowBounds {
    start: i64,
    end:   i64,
}

impl TryFrom<WindowBounds> for TimeWindow {
    type Error = String;

    fn try_from(b: WindowBounds) -> Result<Self, Self::Error> {
        TimeWindow::new(b.start, b.end)
            .ok_or_else(|| format!("time window starts at {} but ends at {}", b.start, b.end))
    }
}

impl TimeWindow {
    /// `None` if `start > end`.
    pub fn new(start: i64, end: i64) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn duration_secs(&self) -> i64 {
        self.end - self.start
    }

    pub fn contains(&self, t: i64) -> bool {
        (self.start..=self.end).contains(&t)
    }
}

/// A location visited by a route, with the packages handled there.
///
/// Location and packages are fixed at construction; a `Route` only hands
/// out shared references to its stops.
#[derive(Clone, Debug, PartialEq)]
pub struct Stop {
    id:                        StopId,
    location:                  GeoPoint,
    location_type:             LocationType,
    time_window:               Option<TimeWindow>,
    planned_service_time_secs: f64,
    zone_id:                   Option<String>,
    packages:                  Vec<Package>,
}

impl Stop {
    pub fn new(id: impl Into<StopId>, location: GeoPoint, location_type: LocationType) -> Self {
        Self {
            id: id.into(),
            location,
            location_type,
            time_window: None,
            planned_service_time_secs: 0.0,
            zone_id: None,
            packages: Vec::new(),
        }
    }

    /// Attach a delivery window.  Fails if `start > end`.
    pub fn with_time_window(mut self, start: i64, end: i64) -> RouteResult<Self> {
        let Some(window) = TimeWindow::new(start, end) else {
            return Err(RouteError::InvalidTimeWindow { stop: self.id, start, end });
        };
        self.time_window = Some(window);
        Ok(self)
    }

    pub fn with_service_time(mut self, secs: f64) -> Self {
        self.planned_service_time_secs = secs;
        self
    }

    pub fn with_zone(mut self, zone_id: impl Into<String>) -> Self {
        self.zone_id = Some(zone_id.into());
        self
    }

    pub fn with_packages(mut self, packages: Vec<Package>) -> Self {
        self.packages = packages;
        self
    }

    pub fn id(&self) -> &StopId {
        &self.id
    }

    pub fn location(&self) -> GeoPoint {
        self.location
    }

    pub fn location_type(&self) -> LocationType {
        self.location_type
    }

    pub fn time_window(&self) -> Option<TimeWindow> {
        self.time_window
    }

    pub fn planned_service_time_secs(&self) -> f64 {
        self.planned_service_time_secs
    }

    pub fn zone_id(&self) -> Option<&str> {
        self.zone_id.as_deref()
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn package_status_counts(&self) -> PackageStatusCounts {
        self.packages.iter().collect()
    }

    /// Combined volume of every package at this stop.
    pub fn package_volume_cm3(&self) -> f64 {
        self.packages.iter().map(Package::volume_cm3).sum()
    }
}
