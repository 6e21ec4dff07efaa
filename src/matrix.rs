//! Call-scoped distance matrix over a start location and its stops.
//!
//! Node 0 is the start; stop `i` of the request lives at node `i + 1`. Stops
//! are addressed by their index in the request, never by reference, so a
//! matrix can be shared by every pass of one request without borrowing the
//! stops themselves.

use crate::error::SequencingError;
use crate::stop::{Coordinate, Stop};
use crate::traits::DistanceMatrixProvider;

#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    km: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    /// Ask `provider` for distances between `start` and every stop.
    pub fn build<M>(provider: &M, start: Coordinate, stops: &[Stop]) -> Result<Self, SequencingError>
    where
        M: DistanceMatrixProvider + ?Sized,
    {
        let locations: Vec<Coordinate> = std::iter::once(start)
            .chain(stops.iter().map(Stop::location))
            .collect();
        Self::from_rows(provider.matrix_for(&locations), locations.len())
    }

    /// Wrap raw rows, checking they form an `expected` x `expected` matrix.
    pub fn from_rows(km: Vec<Vec<f64>>, expected: usize) -> Result<Self, SequencingError> {
        let square = km.len() == expected && km.iter().all(|row| row.len() == expected);
        if expected == 0 || !square {
            let columns = km.first().map_or(0, Vec::len);
            return Err(SequencingError::MatrixShape {
                expected,
                actual: format!("{}x{}", km.len(), columns),
            });
        }
        Ok(Self { km })
    }

    /// Number of stops (the start is not counted).
    pub fn stop_count(&self) -> usize {
        self.km.len() - 1
    }

    /// Distance from the start to stop `to`.
    pub fn from_start(&self, to: usize) -> f64 {
        self.km[0][to + 1]
    }

    /// Distance from stop `from` to stop `to`.
    pub fn between(&self, from: usize, to: usize) -> f64 {
        self.km[from + 1][to + 1]
    }

    /// Leg lengths along `order`, starting with start → `order[0]`.
    pub fn legs<'a>(&'a self, order: &'a [usize]) -> impl Iterator<Item = f64> + 'a {
        let mut previous: Option<usize> = None;
        order.iter().map(move |&stop| {
            let leg = match previous {
                None => self.from_start(stop),
                Some(prev) => self.between(prev, stop),
            };
            previous = Some(stop);
            leg
        })
    }

    /// Open path length start → `order[0]` → … → `order[n-1]`.
    pub fn path_km(&self, order: &[usize]) -> f64 {
        self.legs(order).sum()
    }
}
