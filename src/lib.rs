//! stop-sequencer
//!
//! Orders the pickups and deliveries of a single courier route, checks
//! pickup/delivery precedence and time windows, and estimates travel
//! distance and time over great-circle geometry.

pub mod config;
pub mod error;
pub mod estimator;
pub mod haversine;
pub mod matrix;
pub mod optimizer;
pub mod polyline;
pub mod route;
pub mod sequencer;
pub mod stop;
pub mod traits;
pub mod validator;

pub use config::{EarlyArrival, SequencerConfig};
pub use error::SequencingError;
pub use estimator::{StopSchedule, TravelEstimate, TravelEstimator};
pub use optimizer::Algorithm;
pub use route::{OptimizationResult, Route};
pub use sequencer::{OptimizationRequest, Sequencer, ValidatedOptimization};
pub use stop::{Coordinate, PairingKey, Stop, StopId, StopRole, TimeWindow};
pub use validator::{SequenceValidator, ValidationOutcome, ViolationReason};
