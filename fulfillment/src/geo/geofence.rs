use serde::Serialize;

use super::{distance_meters, meters_to_feet, Coordinate};
use crate::types::location::LocationFix;

/// 100 ft, the radius inside which a contractor counts as "at" the pickup
pub const DEFAULT_ARRIVAL_THRESHOLD_METERS: f64 = 30.5;

/// `true` when `current` is a real fix within `threshold_meters` of `target`.
///
/// Absent inputs and fallback fixes are never in range.
pub fn is_within_range(current: Option<&LocationFix>, target: Option<&Coordinate>, threshold_meters: f64) -> bool {
    Geofence::new(threshold_meters).evaluate(current, target).in_range
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geofence {
    threshold_meters: f64,
}

impl Default for Geofence {
    fn default() -> Self {
        Self { threshold_meters: DEFAULT_ARRIVAL_THRESHOLD_METERS }
    }
}

/// Outcome of a single geofence evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeofenceReading {
    pub in_range: bool,
    /// `None` when there was nothing trustworthy to measure from.
    pub distance_meters: Option<f64>,
    pub threshold_meters: f64,
}

impl Geofence {
    pub fn new(threshold_meters: f64) -> Self {
        Self { threshold_meters }
    }

    pub fn threshold_meters(&self) -> f64 {
        self.threshold_meters
    }

    pub fn evaluate(&self, current: Option<&LocationFix>, target: Option<&Coordinate>) -> GeofenceReading {
        let distance = match (current, target) {
            (Some(fix), Some(target)) if !fix.is_fallback => Some(distance_meters(&fix.coordinate, target)),
            _ => None,
        };
        GeofenceReading {
            in_range: distance.is_some_and(|d| d <= self.threshold_meters),
            distance_meters: distance,
            threshold_meters: self.threshold_meters,
        }
    }
}

impl GeofenceReading {
    /// How much closer the contractor has to get, `0.0` once inside.
    pub fn remaining_meters(&self) -> Option<f64> {
        self.distance_meters.map(|d| (d - self.threshold_meters).max(0.0))
    }

    pub fn hint(&self) -> String {
        distance_hint(self.distance_meters, self.threshold_meters)
    }
}

/// User facing description of how far the contractor still is from the pickup.
pub fn distance_hint(distance_meters: Option<f64>, threshold_meters: f64) -> String {
    match distance_meters {
        None => "Current location unknown. Enable location services to confirm arrival.".to_string(),
        Some(d) if d <= threshold_meters => "You are at the pickup location.".to_string(),
        Some(d) => format!(
            "You are {:.0} ft ({:.0} m) away. Move within {:.0} ft of the pickup location.",
            meters_to_feet(d),
            d,
            meters_to_feet(threshold_meters)
        ),
    }
}
