//! Sequencer configuration.

use serde::{Deserialize, Serialize};

/// Speed used whenever a caller supplies a non-positive one.
pub const DEFAULT_SPEED_KMH: f64 = 30.0;

/// How a stop reached before its window opens is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EarlyArrival {
    /// Arriving before `earliest` is a time-window violation.
    #[default]
    Reject,
    /// The courier waits until `earliest`; only `latest` can be violated.
    Wait,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencerConfig {
    /// Average travel speed in km/h, used for every time estimate.
    pub default_speed_kmh: f64,
    pub early_arrival: EarlyArrival,
    /// Seed for simulated annealing. `None` draws fresh entropy per call.
    pub annealing_seed: Option<u64>,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            default_speed_kmh: DEFAULT_SPEED_KMH,
            early_arrival: EarlyArrival::Reject,
            annealing_seed: None,
        }
    }
}

impl SequencerConfig {
    pub fn with_speed(mut self, speed_kmh: f64) -> Self {
        self.default_speed_kmh = speed_kmh;
        self
    }

    pub fn with_early_arrival(mut self, policy: EarlyArrival) -> Self {
        self.early_arrival = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.annealing_seed = Some(seed);
        self
    }
}
