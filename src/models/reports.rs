//! Complaint and lost-and-found models.

use chrono::{DateTime, NaiveDateTime, Utc};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Complaints carry at most this many image references
pub const MAX_COMPLAINT_IMAGES: usize = 3;

/// Admin listing page size
pub const REPORTS_PER_PAGE: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Apiv2Schema)]
#[sqlx(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Apiv2Schema)]
#[sqlx(rename_all = "snake_case")]
pub enum LostItemStatus {
    Reported,
    Found,
    Returned,
    Closed,
}

/// Lower-cases and turns spaces into underscores so both display labels
/// ("In Progress") and stored values ("in_progress") parse
fn normalize_status(value: &str) -> String {
    value.trim().to_ascii_lowercase().replace([' ', '-'], "_")
}

impl FromStr for ComplaintStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_status(value).as_str() {
            "pending" => Ok(ComplaintStatus::Pending),
            "in_progress" => Ok(ComplaintStatus::InProgress),
            "resolved" => Ok(ComplaintStatus::Resolved),
            "rejected" => Ok(ComplaintStatus::Rejected),
            _ => Err(format!("unknown complaint status '{value}'")),
        }
    }
}

impl FromStr for LostItemStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_status(value).as_str() {
            "reported" => Ok(LostItemStatus::Reported),
            "found" => Ok(LostItemStatus::Found),
            "returned" => Ok(LostItemStatus::Returned),
            "closed" => Ok(LostItemStatus::Closed),
            _ => Err(format!("unknown lost item status '{value}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct ComplaintRequest {
    pub description: String,
    pub passenger_name: Option<String>,
    pub contact_number: String,
    pub address: String,
    pub bus_id: Option<String>,
    pub route_no: Option<String>,
    /// Fills bus and route from one of the caller's bookings
    pub booking_id: Option<i64>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Complaint joined with its bus and route codes
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ComplaintRecord {
    pub id: i64,
    pub user_id: Option<i64>,
    pub description: String,
    pub passenger_name: String,
    pub contact_number: String,
    pub address: String,
    pub bus_code: Option<String>,
    pub route_no: Option<String>,
    pub status: ComplaintStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct ComplaintView {
    pub id: i64,
    pub description: String,
    pub passenger_name: String,
    pub contact_number: String,
    pub address: String,
    pub bus_id: Option<String>,
    pub route_no: Option<String>,
    pub status: ComplaintStatus,
    pub created_at: DateTime<Utc>,
    pub images: Vec<String>,
}

impl ComplaintView {
    pub fn new(record: ComplaintRecord, images: Vec<String>) -> Self {
        Self {
            id: record.id,
            description: record.description,
            passenger_name: record.passenger_name,
            contact_number: record.contact_number,
            address: record.address,
            bus_id: record.bus_code,
            route_no: record.route_no,
            status: record.status,
            created_at: record.created_at,
            images,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct LostItemRequest {
    pub description: String,
    pub image: Option<String>,
    pub bus_id: Option<String>,
    pub route_no: Option<String>,
    pub loss_datetime: Option<NaiveDateTime>,
    pub passenger_name: String,
    pub contact_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, Apiv2Schema)]
pub struct LostItemView {
    pub id: i64,
    pub description: String,
    pub image: Option<String>,
    pub bus_id: Option<String>,
    pub route_no: Option<String>,
    pub loss_datetime: Option<NaiveDateTime>,
    pub passenger_name: String,
    pub contact_number: String,
    pub status: LostItemStatus,
    pub reported_at: DateTime<Utc>,
}

/// Admin listing filters
#[derive(Debug, Clone, Default, Serialize, Deserialize, Apiv2Schema)]
pub struct ReportListQuery {
    pub status: Option<String>,
    /// Free-text search over description, name, contact, bus and route
    pub q: Option<String>,
    /// 1-based
    pub page: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct ComplaintStatusUpdate {
    pub status: ComplaintStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct LostItemStatusUpdate {
    pub status: LostItemStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct ComplaintPage {
    pub items: Vec<ComplaintView>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct LostItemPage {
    pub items: Vec<LostItemView>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels_parse() {
        assert_eq!("In Progress".parse(), Ok(ComplaintStatus::InProgress));
        assert_eq!("in_progress".parse(), Ok(ComplaintStatus::InProgress));
        assert_eq!("Resolved".parse(), Ok(ComplaintStatus::Resolved));
        assert!("done".parse::<ComplaintStatus>().is_err());
        assert_eq!("FOUND".parse(), Ok(LostItemStatus::Found));
    }

    #[test]
    fn test_complaint_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&ComplaintStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
        assert_eq!(
            serde_json::to_string(&LostItemStatus::Reported).unwrap(),
            "\"Reported\""
        );
    }
}
