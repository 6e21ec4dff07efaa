//! Aggregate travel distance and time over a sequence.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EarlyArrival;
use crate::error::SequencingError;
use crate::haversine::{HaversineMatrix, travel_time_minutes};
use crate::matrix::DistanceMatrix;
use crate::stop::{Coordinate, Stop, StopId};
use crate::traits::DistanceMatrixProvider;

/// Totals for a sequence: driving plus time spent at stops.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TravelEstimate {
    pub distance_km: f64,
    pub time_minutes: f64,
}

/// Estimated timing at one stop of a sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopSchedule {
    pub stop: StopId,
    pub leg_distance_km: f64,
    pub leg_minutes: f64,
    pub arrival: DateTime<Utc>,
    /// Equal to `arrival` unless the courier waits for the window to open.
    pub service_start: DateTime<Utc>,
    pub departure: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TravelEstimator<M = HaversineMatrix> {
    speed_kmh: f64,
    early_arrival: EarlyArrival,
    provider: M,
}

impl TravelEstimator {
    pub fn new(average_speed_kmh: f64) -> Result<Self, SequencingError> {
        Self::with_provider(average_speed_kmh, HaversineMatrix)
    }
}

impl<M: DistanceMatrixProvider> TravelEstimator<M> {
    pub fn with_provider(average_speed_kmh: f64, provider: M) -> Result<Self, SequencingError> {
        // Fail here rather than on the first leg.
        travel_time_minutes(0.0, average_speed_kmh)?;
        Ok(Self {
            speed_kmh: average_speed_kmh,
            early_arrival: EarlyArrival::Reject,
            provider,
        })
    }

    /// Whether schedules wait for a time window to open.
    pub fn with_early_arrival(mut self, policy: EarlyArrival) -> Self {
        self.early_arrival = policy;
        self
    }

    pub fn speed_kmh(&self) -> f64 {
        self.speed_kmh
    }

    pub(crate) fn provider(&self) -> &M {
        &self.provider
    }

    /// Distance and time for visiting `sequence` in order from `start`.
    pub fn estimate(&self, start: Coordinate, sequence: &[Stop]) -> Result<TravelEstimate, SequencingError> {
        let matrix = DistanceMatrix::build(&self.provider, start, sequence)?;
        let order: Vec<usize> = (0..sequence.len()).collect();
        self.estimate_order(&matrix, sequence, &order)
    }

    /// Arrival and departure at every stop of `sequence`, leaving `start`
    /// at `start_time`.
    pub fn schedule(
        &self,
        start: Coordinate,
        sequence: &[Stop],
        start_time: DateTime<Utc>,
    ) -> Result<Vec<StopSchedule>, SequencingError> {
        let matrix = DistanceMatrix::build(&self.provider, start, sequence)?;
        let order: Vec<usize> = (0..sequence.len()).collect();
        self.schedule_order(&matrix, sequence, &order, start_time)
    }

    pub(crate) fn estimate_order(
        &self,
        matrix: &DistanceMatrix,
        stops: &[Stop],
        order: &[usize],
    ) -> Result<TravelEstimate, SequencingError> {
        check_stops(stops, order)?;
        let distance_km = matrix.path_km(order);
        let driving = travel_time_minutes(distance_km, self.speed_kmh)?;
        let service: f64 = order.iter().map(|&i| stops[i].service_minutes()).sum();
        Ok(TravelEstimate {
            distance_km,
            time_minutes: driving + service,
        })
    }

    pub(crate) fn schedule_order(
        &self,
        matrix: &DistanceMatrix,
        stops: &[Stop],
        order: &[usize],
        start_time: DateTime<Utc>,
    ) -> Result<Vec<StopSchedule>, SequencingError> {
        check_stops(stops, order)?;
        let mut cursor = start_time;
        let mut schedule = Vec::with_capacity(order.len());

        for (&i, leg_km) in order.iter().zip(matrix.legs(order)) {
            let stop = &stops[i];
            let leg_minutes = travel_time_minutes(leg_km, self.speed_kmh)?;
            let arrival = advance(cursor, leg_minutes);

            let service_start = match (self.early_arrival, stop.time_window()) {
                (EarlyArrival::Wait, Some(window)) => window.earliest.map_or(arrival, |open| arrival.max(open)),
                _ => arrival,
            };
            let departure = advance(service_start, stop.service_minutes());

            schedule.push(StopSchedule {
                stop: stop.id().clone(),
                leg_distance_km: leg_km,
                leg_minutes,
                arrival,
                service_start,
                departure,
            });
            cursor = departure;
        }

        Ok(schedule)
    }
}

/// Sequences built outside a [`crate::Route`] have not had their stops checked.
fn check_stops(stops: &[Stop], order: &[usize]) -> Result<(), SequencingError> {
    order.iter().try_for_each(|&i| stops[i].check())
}

/// Offsets past chrono's range pin to the end of the calendar.
fn advance(instant: DateTime<Utc>, minutes: f64) -> DateTime<Utc> {
    let saturated = if minutes < 0.0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    };
    TimeDelta::try_milliseconds((minutes * 60_000.0).round() as i64)
        .and_then(|delta| instant.checked_add_signed(delta))
        .unwrap_or(saturated)
}
