//! Routes and their cached derived metrics.
//!
//! # Caching
//!
//! Every derived value lives in an explicit `Option` slot of
//! [`RouteMetrics`].  The metric engine ([`crate::metrics`]) fills a slot on
//! first use and returns the stored value afterwards.  Nothing clears a slot
//! implicitly, including [`Route::set_actual_sequence`]; callers that change
//! inputs call [`Route::clear_metrics`] or [`Route::recompute_metrics`].

use std::collections::HashMap;

use lmr_core::{BoundingBox, GeoPoint, RouteId, StopId};

use crate::{PackageStatusCounts, RouteError, RouteResult, SequenceKind, Stop, Vehicle};

// ── RouteMetrics ──────────────────────────────────────────────────────────────

/// Derived values cached on a [`Route`].  `None` means "not computed yet".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RouteMetrics {
    pub euclidean_planned_km: Option<f64>,
    pub euclidean_actual_km:  Option<f64>,
    pub driving_planned_km:   Option<f64>,
    pub driving_actual_km:    Option<f64>,
    /// Unclamped driving / euclidean ratio.
    pub circuity_planned:     Option<f64>,
    pub circuity_actual:      Option<f64>,
    pub centroid:             Option<GeoPoint>,
    pub bounding_box:         Option<BoundingBox>,
    pub package_counts:       Option<PackageStatusCounts>,
}

impl RouteMetrics {
    pub fn euclidean_km(&self, seq: SequenceKind) -> Option<f64> {
        match seq {
            SequenceKind::Planned => self.euclidean_planned_km,
            SequenceKind::Actual  => self.euclidean_actual_km,
        }
    }

    pub fn driving_km(&self, seq: SequenceKind) -> Option<f64> {
        match seq {
            SequenceKind::Planned => self.driving_planned_km,
            SequenceKind::Actual  => self.driving_actual_km,
        }
    }

    pub fn circuity(&self, seq: SequenceKind) -> Option<f64> {
        match seq {
            SequenceKind::Planned => self.circuity_planned,
            SequenceKind::Actual  => self.circuity_actual,
        }
    }

    pub(crate) fn euclidean_slot(&mut self, seq: SequenceKind) -> &mut Option<f64> {
        match seq {
            SequenceKind::Planned => &mut self.euclidean_planned_km,
            SequenceKind::Actual  => &mut self.euclidean_actual_km,
        }
    }

    pub(crate) fn driving_slot(&mut self, seq: SequenceKind) -> &mut Option<f64> {
        match seq {
            SequenceKind::Planned => &mut self.driving_planned_km,
            SequenceKind::Actual  => &mut self.driving_actual_km,
        }
    }

    pub(crate) fn circuity_slot(&mut self, seq: SequenceKind) -> &mut Option<f64> {
        match seq {
            SequenceKind::Planned => &mut self.circuity_planned,
            SequenceKind::Actual  => &mut self.circuity_actual,
        }
    }
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// A delivery route: planned stops plus, optionally, the order in which they
/// were actually visited.
#[derive(Clone, Debug)]
pub struct Route {
    id:      RouteId,
    /// Planned sequence; sole owner of the stops.
    stops:   Vec<Stop>,
    /// Stop id → position in `stops`.
    index:   HashMap<StopId, usize>,
    /// Actual sequence as positions into `stops`.
    actual:  Option<Vec<usize>>,
    vehicle: Option<Vehicle>,
    /// Unix seconds.
    departure_time: Option<i64>,
    pub(crate) metrics: RouteMetrics,
}

impl Route {
    /// Create a route whose planned sequence is `stops` in the given order.
    ///
    /// Fails with [`RouteError::DuplicateStop`] if two stops share an id.
    pub fn new(id: impl Into<RouteId>, stops: Vec<Stop>) -> RouteResult<Self> {
        let id = id.into();
        let mut index = HashMap::with_capacity(stops.len());
        for (i, stop) in stops.iter().enumerate() {
            if index.insert(stop.id().clone(), i).is_some() {
                return Err(RouteError::DuplicateStop { route: id, stop: stop.id().clone() });
            }
        }
        Ok(Self {
            id,
            stops,
            index,
            actual: None,
            vehicle: None,
            departure_time: None,
            metrics: RouteMetrics::default(),
        })
    }

    pub fn with_vehicle(mut self, vehicle: Vehicle) -> Self {
        self.vehicle = Some(vehicle);
        self
    }

    /// Departure from the depot, in Unix seconds.
    pub fn with_departure_time(mut self, secs: i64) -> Self {
        self.departure_time = Some(secs);
        self
    }

    pub fn id(&self) -> &RouteId {
        &self.id
    }

    /// Stops in planned order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn stop(&self, id: &str) -> Option<&Stop> {
        self.index.get(id).map(|&i| &self.stops[i])
    }

    pub fn vehicle(&self) -> Option<&Vehicle> {
        self.vehicle.as_ref()
    }

    pub fn departure_time(&self) -> Option<i64> {
        self.departure_time
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn has_actual_sequence(&self) -> bool {
        self.actual.is_some()
    }

    /// Record the order in which the stops were actually visited.
    ///
    /// `ids` must be a permutation of the planned stop ids: every planned id
    /// exactly once and nothing else.  On failure the previous actual
    /// sequence (if any) is left untouched.
    pub fn set_actual_sequence<I, S>(&mut self, ids: I) -> RouteResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = vec![false; self.stops.len()];
        let mut order = Vec::with_capacity(self.stops.len());

        for id in ids {
            let id = id.as_ref();
            let Some(&pos) = self.index.get(id) else {
                return Err(self.mismatch(format!("stop {id:?} is not in the planned sequence")));
            };
            if std::mem::replace(&mut seen[pos], true) {
                return Err(self.mismatch(format!("stop {id:?} appears more than once")));
            }
            order.push(pos);
        }

        if order.len() != self.stops.len() {
            let missing: Vec<&str> = seen
                .iter()
                .zip(&self.stops)
                .filter(|(visited, _)| !**visited)
                .map(|(_, stop)| stop.id().as_str())
                .collect();
            return Err(self.mismatch(format!("planned stop(s) missing: {}", missing.join(", "))));
        }

        self.actual = Some(order);
        Ok(())
    }

    fn mismatch(&self, reason: String) -> RouteError {
        RouteError::SequenceMismatch { route: self.id.clone(), reason }
    }

    /// Stops in the requested order.
    pub fn sequence(&self, seq: SequenceKind) -> RouteResult<Vec<&Stop>> {
        match seq {
            SequenceKind::Planned => Ok(self.stops.iter().collect()),
            SequenceKind::Actual => match &self.actual {
                Some(order) => Ok(order.iter().map(|&i| &self.stops[i]).collect()),
                None => Err(RouteError::ActualSequenceUnset(self.id.clone())),
            },
        }
    }

    /// Stop ids in the requested order.
    pub fn sequence_ids(&self, seq: SequenceKind) -> RouteResult<Vec<&StopId>> {
        Ok(self.sequence(seq)?.into_iter().map(Stop::id).collect())
    }

    /// Cached derived values computed so far.
    pub fn metrics(&self) -> &RouteMetrics {
        &self.metrics
    }

    /// Drop every cached derived value.
    pub fn clear_metrics(&mut self) {
        log::debug!("clearing cached metrics of route {}", self.id);
        self.metrics = RouteMetrics::default();
    }
}
