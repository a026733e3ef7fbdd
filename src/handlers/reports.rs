//! Complaint and lost-and-found handlers.

use crate::{
    models::{
        ComplaintPage, ComplaintRequest, ComplaintStatusUpdate, ComplaintView, LostItemPage,
        LostItemRequest, LostItemStatusUpdate, LostItemView, ReportListQuery, Role,
    },
    services::{auth, reports},
    state::AppState,
};
use actix_web::{Error, HttpRequest, Result};
use paperclip::actix::{api_v2_operation, web};

/// File a complaint
///
/// Bus and route may be given directly or taken from one of the caller's
/// bookings. Up to three image references can be attached.
#[api_v2_operation(
    summary = "Report Complaint",
    tags("Reports"),
    responses(
        (status = 200, description = "Complaint filed", body = ComplaintView),
        (status = 400, description = "Invalid complaint"),
        (status = 404, description = "Unknown bus, route or booking")
    )
)]
pub async fn report_complaint(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<ComplaintRequest>,
) -> Result<web::Json<ComplaintView>, Error> {
    let principal = auth::authenticate(&req, &state).await?;
    Ok(web::Json(
        reports::submit_complaint(&state, &principal, &payload).await?,
    ))
}

#[api_v2_operation(
    summary = "Complaint Confirmation",
    tags("Reports"),
    responses(
        (status = 200, description = "Complaint", body = ComplaintView),
        (status = 404, description = "Unknown complaint")
    )
)]
pub async fn complaint_confirmation(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<web::Json<ComplaintView>, Error> {
    let principal = auth::authenticate(&req, &state).await?;
    Ok(web::Json(
        reports::complaint(&state, &principal, id.into_inner()).await?,
    ))
}

#[api_v2_operation(
    summary = "Report Lost Item",
    tags("Reports"),
    responses(
        (status = 200, description = "Report filed", body = LostItemView),
        (status = 400, description = "Invalid report"),
        (status = 404, description = "Unknown bus or route")
    )
)]
pub async fn report_lost_item(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<LostItemRequest>,
) -> Result<web::Json<LostItemView>, Error> {
    let principal = auth::authenticate(&req, &state).await?;
    Ok(web::Json(
        reports::submit_lost_item(&state, &principal, &payload).await?,
    ))
}

#[api_v2_operation(
    summary = "Lost Item Confirmation",
    tags("Reports"),
    responses(
        (status = 200, description = "Lost item", body = LostItemView),
        (status = 404, description = "Unknown report")
    )
)]
pub async fn lost_item_confirmation(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<web::Json<LostItemView>, Error> {
    let principal = auth::authenticate(&req, &state).await?;
    Ok(web::Json(
        reports::lost_item(&state, &principal, id.into_inner()).await?,
    ))
}

/// List complaints
///
/// `status` accepts display labels ("In Progress") and stored values
/// ("in_progress"). `q` searches description, name, contact, bus and route.
#[api_v2_operation(
    summary = "List Complaints",
    tags("Admin"),
    responses(
        (status = 200, description = "One page of complaints", body = ComplaintPage),
        (status = 400, description = "Unknown status or bad page")
    )
)]
pub async fn list_complaints(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<ReportListQuery>,
) -> Result<web::Json<ComplaintPage>, Error> {
    auth::authorize(&req, &state, &[Role::Admin]).await?;
    Ok(web::Json(reports::list_complaints(&state, &query).await?))
}

#[api_v2_operation(
    summary = "Update Complaint Status",
    tags("Admin"),
    responses(
        (status = 200, description = "Updated complaint", body = ComplaintView),
        (status = 404, description = "Unknown complaint")
    )
)]
pub async fn update_complaint_status(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<i64>,
    payload: web::Json<ComplaintStatusUpdate>,
) -> Result<web::Json<ComplaintView>, Error> {
    let principal = auth::authorize(&req, &state, &[Role::Admin]).await?;
    Ok(web::Json(
        reports::set_complaint_status(&state, &principal, id.into_inner(), payload.status).await?,
    ))
}

#[api_v2_operation(
    summary = "List Lost Items",
    tags("Admin"),
    responses(
        (status = 200, description = "One page of lost item reports", body = LostItemPage),
        (status = 400, description = "Unknown status or bad page")
    )
)]
pub async fn list_lost_items(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<ReportListQuery>,
) -> Result<web::Json<LostItemPage>, Error> {
    auth::authorize(&req, &state, &[Role::Admin]).await?;
    Ok(web::Json(reports::list_lost_items(&state, &query).await?))
}

#[api_v2_operation(
    summary = "Update Lost Item Status",
    tags("Admin"),
    responses(
        (status = 200, description = "Updated report", body = LostItemView),
        (status = 404, description = "Unknown report")
    )
)]
pub async fn update_lost_item_status(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<i64>,
    payload: web::Json<LostItemStatusUpdate>,
) -> Result<web::Json<LostItemView>, Error> {
    let principal = auth::authorize(&req, &state, &[Role::Admin]).await?;
    Ok(web::Json(
        reports::set_lost_item_status(&state, &principal, id.into_inner(), payload.status).await?,
    ))
}
