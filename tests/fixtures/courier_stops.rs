//! Courier stops around the Las Vegas Strip.
//!
//! Restaurants are pickup points, hotels are drop-offs. Coordinates are real
//! so distances are realistic: most legs are a few hundred meters to a few
//! kilometers.

use chrono::{DateTime, TimeZone, Utc};
use stop_sequencer::{Coordinate, Stop};

/// A named location with coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Place {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Place {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coord(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng).expect("fixture coordinates are valid")
    }
}

/// Where the courier starts the shift.
pub const DISPATCH: Place = Place::new("MGM Grand", 36.1023654, -115.1688720);

pub const RESTAURANTS: &[Place] = &[
    Place::new("Hard Rock Cafe", 36.1041592, -115.1722166),
    Place::new("Gordon Ramsay BurGR", 36.1107195, -115.1720818),
    Place::new("Brooklyn Bowl", 36.1175388, -115.1695094),
    Place::new("Grimaldi's Pizzeria", 36.1248850, -115.1683540),
    Place::new("Pei Wei Town Square", 36.0810469, -115.1472694),
    Place::new("Tomo Sushi", 36.0992464, -115.1142123),
];

pub const HOTELS: &[Place] = &[
    Place::new("Bellagio", 36.1126, -115.1767),
    Place::new("Caesars Palace", 36.1162, -115.1745),
    Place::new("Wynn Las Vegas", 36.1263781, -115.1658180),
    Place::new("Encore at Wynn", 36.1289345, -115.1653620),
    Place::new("Budget Suites South", 36.0366259, -115.1713361),
    Place::new("Longhorn Casino", 36.1070664, -115.0591256),
];

/// `count` orders, each a pickup at a restaurant and a delivery to a hotel,
/// keyed `PKG1`, `PKG2`, …. Pickups come first in the returned list.
pub fn paired_orders(count: usize) -> Vec<Stop> {
    assert!(count <= RESTAURANTS.len(), "only {} fixture orders", RESTAURANTS.len());
    let pickups = (0..count).map(|i| {
        Stop::pickup(format!("pickup-{}", i + 1), RESTAURANTS[i].coord(), format!("PKG{}", i + 1))
            .with_address(RESTAURANTS[i].name)
            .with_service_minutes(3.0)
    });
    let deliveries = (0..count).map(|i| {
        Stop::delivery(format!("delivery-{}", i + 1), HOTELS[i].coord(), format!("PKG{}", i + 1))
            .with_address(HOTELS[i].name)
            .with_service_minutes(2.0)
    });
    pickups.chain(deliveries).collect()
}

/// Every fixture location as a generic stop.
pub fn generic_stops() -> Vec<Stop> {
    RESTAURANTS
        .iter()
        .chain(HOTELS)
        .enumerate()
        .map(|(i, place)| Stop::generic(format!("stop-{}", i + 1), place.coord()).with_address(place.name))
        .collect()
}

pub fn nine_am() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

pub fn find<'a>(stops: &'a [Stop], id: &str) -> &'a Stop {
    stops
        .iter()
        .find(|stop| stop.id().as_str() == id)
        .unwrap_or_else(|| panic!("no stop {id}"))
}

pub fn position(stops: &[Stop], id: &str) -> usize {
    stops
        .iter()
        .position(|stop| stop.id().as_str() == id)
        .unwrap_or_else(|| panic!("no stop {id}"))
}
