//! Test fixtures for stop-sequencer.
//!
//! Provides real Las Vegas courier locations (from OpenStreetMap) and
//! helpers for building paired pickup/delivery orders.

pub mod courier_stops;

pub use courier_stops::*;
