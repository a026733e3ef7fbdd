//! Version information endpoint handler.

use crate::{build_info, models::VersionResponse};
use actix_web::{Error, Result};
use paperclip::actix::{api_v2_operation, web};

/// Version information endpoint
///
/// Returns the crate version, commit hash and build time captured by
/// `build.rs`.
#[api_v2_operation(
    summary = "Version Information Endpoint",
    description = "Returns the current API version, commit hash, and build time.",
    tags("Version"),
    responses(
        (status = 200, description = "Successful response", body = VersionResponse)
    )
)]
pub async fn version() -> Result<web::Json<VersionResponse>, Error> {
    Ok(web::Json(VersionResponse {
        version: build_info::VERSION.to_string(),
        commit: build_info::GIT_SHA.to_string(),
        build_time: build_info::BUILD_TIMESTAMP.to_string(),
    }))
}
