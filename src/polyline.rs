//! Straight-line geometry of a sequenced route.
//!
//! Display collaborators draw this; encoding to a compact polyline string
//! happens at their boundary, not here.

use serde::{Deserialize, Serialize};

use crate::haversine::distance_km;
use crate::stop::{Coordinate, Stop};

/// Ordered points visited by a route, start first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// The start followed by each stop's location in sequence order.
    pub fn through(start: Coordinate, stops: &[Stop]) -> Self {
        let mut points = Vec::with_capacity(stops.len() + 1);
        points.push(start);
        points.extend(stops.iter().map(Stop::location));
        Self { points }
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    /// Great-circle length of the whole line in kilometers.
    pub fn length_km(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| distance_km(pair[0], pair[1]))
            .sum()
    }
}
