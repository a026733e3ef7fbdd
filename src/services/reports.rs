//! Passenger complaints and lost-and-found reports, with their admin
//! listings.

use crate::{
    db::reports::{NewComplaint, NewLostItem, ReportFilter},
    error::{AppError, Result},
    models::{
        ComplaintPage, ComplaintRequest, ComplaintStatus, ComplaintView, LostItemPage,
        LostItemRequest, LostItemStatus, LostItemView, MAX_COMPLAINT_IMAGES, Principal,
        REPORTS_PER_PAGE, ReportListQuery, Role,
    },
    state::AppState,
    utils::validate::is_valid_contact_number,
};
use chrono::Utc;
use tracing::info;

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(field, "is required"));
    }
    Ok(value)
}

fn optional(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn check_contact(contact: &str) -> Result<&str> {
    let contact = contact.trim();
    if !is_valid_contact_number(contact) {
        return Err(AppError::validation(
            "contact_number",
            "must be 10 to 15 digits",
        ));
    }
    Ok(contact)
}

/// Resolves optional bus and route codes to row ids
async fn resolve_vehicle(
    state: &AppState,
    bus_code: Option<&str>,
    route_no: Option<&str>,
) -> Result<(Option<i64>, Option<i64>)> {
    let bus_pk = match bus_code {
        Some(code) => Some(state.db.require_bus(code).await?.id),
        None => None,
    };
    let route_pk = match route_no {
        Some(route_no) => Some(state.db.require_route(route_no).await?.id),
        None => None,
    };
    Ok((bus_pk, route_pk))
}

/// Bus and route of one of the caller's bookings
async fn vehicle_from_booking(
    state: &AppState,
    principal: &Principal,
    booking_id: i64,
) -> Result<(Option<String>, Option<String>)> {
    let booking = state
        .db
        .find_booking(booking_id)
        .await?
        .filter(|b| b.user_id == Some(principal.user_id))
        .ok_or_else(|| AppError::not_found("Booking", booking_id))?;

    let bus_code = match booking.schedule_id {
        Some(schedule_id) => state
            .db
            .find_schedule(schedule_id)
            .await?
            .map(|s| s.bus_code),
        None => None,
    };
    Ok((bus_code, Some(booking.route_no)))
}

fn can_view(principal: &Principal, owner: Option<i64>) -> bool {
    principal.role == Role::Admin || owner == Some(principal.user_id)
}

pub async fn submit_complaint(
    state: &AppState,
    principal: &Principal,
    request: &ComplaintRequest,
) -> Result<ComplaintView> {
    let description = required("description", &request.description)?;
    let address = required("address", &request.address)?;
    let contact = check_contact(&request.contact_number)?;

    let images: Vec<String> = request
        .images
        .iter()
        .map(|i| i.trim())
        .filter(|i| !i.is_empty())
        .map(str::to_string)
        .collect();
    if images.len() > MAX_COMPLAINT_IMAGES {
        return Err(AppError::validation(
            "images",
            format!("at most {MAX_COMPLAINT_IMAGES} images"),
        ));
    }

    let (mut bus_code, mut route_no) = (
        optional(request.bus_id.as_deref()).map(str::to_string),
        optional(request.route_no.as_deref()).map(str::to_string),
    );
    if let Some(booking_id) = request.booking_id {
        let (booked_bus, booked_route) = vehicle_from_booking(state, principal, booking_id).await?;
        bus_code = bus_code.or(booked_bus);
        route_no = route_no.or(booked_route);
    }
    let (bus_pk, route_pk) =
        resolve_vehicle(state, bus_code.as_deref(), route_no.as_deref()).await?;

    let passenger_name = optional(request.passenger_name.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| principal.username.clone());

    let id = state
        .db
        .create_complaint(
            &NewComplaint {
                user_id: Some(principal.user_id),
                description,
                passenger_name: &passenger_name,
                contact_number: contact,
                address,
                bus_pk,
                route_pk,
                images: &images,
            },
            Utc::now(),
        )
        .await?;

    info!(complaint_id = id, user_id = principal.user_id, "Complaint filed");
    complaint(state, principal, id).await
}

/// Complaint confirmation, for its author or an administrator
pub async fn complaint(state: &AppState, principal: &Principal, id: i64) -> Result<ComplaintView> {
    let record = state
        .db
        .find_complaint(id)
        .await?
        .filter(|c| can_view(principal, c.user_id))
        .ok_or_else(|| AppError::not_found("Complaint", id))?;
    let images = state.db.complaint_images(id).await?;
    Ok(ComplaintView::new(record, images))
}

pub async fn submit_lost_item(
    state: &AppState,
    principal: &Principal,
    request: &LostItemRequest,
) -> Result<LostItemView> {
    let description = required("description", &request.description)?;
    let passenger_name = required("passenger_name", &request.passenger_name)?;
    let contact = check_contact(&request.contact_number)?;
    let (bus_pk, route_pk) = resolve_vehicle(
        state,
        optional(request.bus_id.as_deref()),
        optional(request.route_no.as_deref()),
    )
    .await?;

    let id = state
        .db
        .create_lost_item(
            &NewLostItem {
                user_id: Some(principal.user_id),
                description,
                image: optional(request.image.as_deref()),
                bus_pk,
                route_pk,
                loss_datetime: request.loss_datetime,
                passenger_name,
                contact_number: contact,
            },
            Utc::now(),
        )
        .await?;

    info!(lost_item_id = id, user_id = principal.user_id, "Lost item reported");
    lost_item(state, principal, id).await
}

/// Lost item confirmation, for its reporter or an administrator
pub async fn lost_item(state: &AppState, principal: &Principal, id: i64) -> Result<LostItemView> {
    let owner = state.db.lost_item_owner(id).await?;
    if !owner.is_some_and(|owner| can_view(principal, owner)) {
        return Err(AppError::not_found("Lost item", id));
    }
    state
        .db
        .find_lost_item(id)
        .await?
        .ok_or_else(|| AppError::not_found("Lost item", id))
}

/// 1-based page number and its row offset for an admin listing
pub fn page_offset(page: Option<i64>) -> Result<(i64, i64)> {
    let page = page.unwrap_or(1);
    if page < 1 {
        return Err(AppError::validation("page", "must be 1 or more"));
    }
    let offset = (page - 1)
        .checked_mul(REPORTS_PER_PAGE)
        .ok_or_else(|| AppError::validation("page", "out of range"))?;
    Ok((page, offset))
}

/// Page, row offset and parsed status of an admin listing query
fn listing<S>(query: &ReportListQuery) -> Result<(i64, i64, Option<S>)>
where
    S: std::str::FromStr<Err = String>,
{
    let (page, offset) = page_offset(query.page)?;
    let status = optional(query.status.as_deref())
        .map(str::parse::<S>)
        .transpose()
        .map_err(|reason| AppError::validation("status", reason))?;
    Ok((page, offset, status))
}

pub async fn list_complaints(state: &AppState, query: &ReportListQuery) -> Result<ComplaintPage> {
    let (page, offset, status) = listing::<ComplaintStatus>(query)?;
    let (records, total) = state
        .db
        .list_complaints(ReportFilter {
            status,
            search: query.q.as_deref(),
            limit: REPORTS_PER_PAGE,
            offset,
        })
        .await?;

    let mut items = Vec::with_capacity(records.len());
    for record in records {
        let images = state.db.complaint_images(record.id).await?;
        items.push(ComplaintView::new(record, images));
    }

    Ok(ComplaintPage {
        items,
        page,
        per_page: REPORTS_PER_PAGE,
        total,
    })
}

pub async fn list_lost_items(state: &AppState, query: &ReportListQuery) -> Result<LostItemPage> {
    let (page, offset, status) = listing::<LostItemStatus>(query)?;
    let (items, total) = state
        .db
        .list_lost_items(ReportFilter {
            status,
            search: query.q.as_deref(),
            limit: REPORTS_PER_PAGE,
            offset,
        })
        .await?;

    Ok(LostItemPage {
        items,
        page,
        per_page: REPORTS_PER_PAGE,
        total,
    })
}

pub async fn set_complaint_status(
    state: &AppState,
    principal: &Principal,
    id: i64,
    status: ComplaintStatus,
) -> Result<ComplaintView> {
    state.db.update_complaint_status(id, status).await?;
    info!(complaint_id = id, status = ?status, "Complaint status changed");
    complaint(state, principal, id).await
}

pub async fn set_lost_item_status(
    state: &AppState,
    principal: &Principal,
    id: i64,
    status: LostItemStatus,
) -> Result<LostItemView> {
    state.db.update_lost_item_status(id, status).await?;
    info!(lost_item_id = id, status = ?status, "Lost item status changed");
    lost_item(state, principal, id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(status: Option<&str>, page: Option<i64>) -> ReportListQuery {
        ReportListQuery {
            status: status.map(str::to_string),
            q: None,
            page,
        }
    }

    #[test]
    fn test_listing_defaults_to_first_page() {
        let (page, offset, status) = listing::<ComplaintStatus>(&query(None, None)).unwrap();
        assert_eq!(page, 1);
        assert_eq!(offset, 0);
        assert_eq!(status, None);
    }

    #[test]
    fn test_listing_parses_status_label() {
        let (_, offset, status) =
            listing::<ComplaintStatus>(&query(Some("In Progress"), Some(2))).unwrap();
        assert_eq!(offset, REPORTS_PER_PAGE);
        assert_eq!(status, Some(ComplaintStatus::InProgress));
    }

    #[test]
    fn test_listing_rejects_bad_input() {
        assert!(listing::<LostItemStatus>(&query(Some("lost"), None)).is_err());
        assert!(listing::<LostItemStatus>(&query(None, Some(0))).is_err());
    }

    #[test]
    fn test_huge_page_is_rejected() {
        assert!(page_offset(Some(i64::MAX)).is_err());
        assert!(page_offset(Some(i64::MAX / REPORTS_PER_PAGE + 1)).is_ok());
    }

    #[test]
    fn test_contact_number() {
        assert_eq!(check_contact(" 9876543210 ").unwrap(), "9876543210");
        assert!(check_contact("98765").is_err());
        assert!(check_contact("98765abcde").is_err());
    }
}
