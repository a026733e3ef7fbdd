//! Live bus position models.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct LocationUpdate {
    pub bus_id: String,
    pub lat: f64,
    pub lng: f64,
}

/// Latest fix of one bus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, Apiv2Schema)]
pub struct BusPosition {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, Apiv2Schema)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct TrackBusResponse {
    pub bus_id: String,
}
