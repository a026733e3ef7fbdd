//! Response models for service-level endpoints.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Response model for the health check endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

/// Response model for the version information endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct VersionResponse {
    pub version: String,
    pub commit: String,
    pub build_time: String,
}

/// Plain acknowledgement
#[derive(Clone, Debug, Serialize, Deserialize, Apiv2Schema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 1-based page selector for admin listings
#[derive(Clone, Debug, Default, Serialize, Deserialize, Apiv2Schema)]
pub struct PageQuery {
    pub page: Option<i64>,
}
