//! Complaints and lost-and-found reports.

use crate::{
    error::{AppError, DbContext, Result},
    models::{ComplaintRecord, ComplaintStatus, LostItemStatus, LostItemView},
};
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{QueryBuilder, Sqlite};

const COMPLAINT_SELECT: &str = "SELECT c.id, c.user_id, c.description, c.passenger_name,
        c.contact_number, c.address, b.bus_id AS bus_code, r.route_no, c.status, c.created_at
     FROM complaints c
     LEFT JOIN buses b ON b.id = c.bus_id
     LEFT JOIN routes r ON r.id = c.route_id";

const LOST_ITEM_SELECT: &str = "SELECT l.id, l.description, l.image, b.bus_id AS bus_id,
        r.route_no, l.loss_datetime, l.passenger_name, l.contact_number, l.status, l.reported_at
     FROM lost_items l
     LEFT JOIN buses b ON b.id = l.bus_id
     LEFT JOIN routes r ON r.id = l.route_id";

/// Resolved fields of a new complaint
pub struct NewComplaint<'a> {
    pub user_id: Option<i64>,
    pub description: &'a str,
    pub passenger_name: &'a str,
    pub contact_number: &'a str,
    pub address: &'a str,
    pub bus_pk: Option<i64>,
    pub route_pk: Option<i64>,
    pub images: &'a [String],
}

/// Resolved fields of a new lost item report
pub struct NewLostItem<'a> {
    pub user_id: Option<i64>,
    pub description: &'a str,
    pub image: Option<&'a str>,
    pub bus_pk: Option<i64>,
    pub route_pk: Option<i64>,
    pub loss_datetime: Option<NaiveDateTime>,
    pub passenger_name: &'a str,
    pub contact_number: &'a str,
}

/// Admin listing filter shared by both report kinds
#[derive(Debug, Clone, Copy)]
pub struct ReportFilter<'a, S> {
    pub status: Option<S>,
    pub search: Option<&'a str>,
    pub limit: i64,
    pub offset: i64,
}

/// Escapes LIKE wildcards so search text matches literally
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Appends `WHERE` conditions for status and a free-text search over the
/// given columns.
fn push_filter<'q, S>(
    builder: &mut QueryBuilder<'q, Sqlite>,
    status_column: &str,
    status: Option<S>,
    search: Option<&str>,
    search_columns: &[&str],
) where
    S: 'q + sqlx::Encode<'q, Sqlite> + sqlx::Type<Sqlite> + Send,
{
    builder.push(" WHERE 1 = 1");
    if let Some(status) = status {
        builder.push(format!(" AND {status_column} = "));
        builder.push_bind(status);
    }
    if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", escape_like(search));
        builder.push(" AND (");
        for (i, column) in search_columns.iter().enumerate() {
            if i > 0 {
                builder.push(" OR ");
            }
            builder.push(format!("{column} LIKE "));
            builder.push_bind(pattern.clone());
            builder.push(" ESCAPE '\\'");
        }
        builder.push(")");
    }
}

const COMPLAINT_SEARCH: &[&str] = &[
    "c.description",
    "c.passenger_name",
    "c.contact_number",
    "b.bus_id",
    "r.route_no",
];

const LOST_ITEM_SEARCH: &[&str] = &[
    "l.description",
    "l.passenger_name",
    "l.contact_number",
    "b.bus_id",
    "r.route_no",
];

impl super::Database {
    pub async fn create_complaint(
        &self,
        complaint: &NewComplaint<'_>,
        now: DateTime<Utc>,
    ) -> Result<i64> {
        let mut tx = self.pool.begin().await.db_context("Failed to begin transaction")?;

        let result = sqlx::query(
            "INSERT INTO complaints (user_id, description, passenger_name, contact_number,
                address, route_id, bus_id, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(complaint.user_id)
        .bind(complaint.description)
        .bind(complaint.passenger_name)
        .bind(complaint.contact_number)
        .bind(complaint.address)
        .bind(complaint.route_pk)
        .bind(complaint.bus_pk)
        .bind(ComplaintStatus::Pending)
        .bind(now)
        .execute(&mut *tx)
        .await
        .db_context("Failed to store complaint")?;

        let complaint_id = result.last_insert_rowid();
        for image in complaint.images {
            sqlx::query("INSERT INTO complaint_images (complaint_id, image) VALUES (?, ?)")
                .bind(complaint_id)
                .bind(image)
                .execute(&mut *tx)
                .await
                .db_context("Failed to store complaint image")?;
        }

        tx.commit().await.db_context("Failed to commit complaint")?;
        Ok(complaint_id)
    }

    pub async fn find_complaint(&self, id: i64) -> Result<Option<ComplaintRecord>> {
        sqlx::query_as::<_, ComplaintRecord>(&format!("{COMPLAINT_SELECT} WHERE c.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .db_context("Failed to load complaint")
    }

    pub async fn complaint_images(&self, complaint_id: i64) -> Result<Vec<String>> {
        sqlx::query_scalar(
            "SELECT image FROM complaint_images WHERE complaint_id = ? ORDER BY id",
        )
        .bind(complaint_id)
        .fetch_all(&self.pool)
        .await
        .db_context("Failed to load complaint images")
    }

    /// Newest first, with the total matching count
    pub async fn list_complaints(
        &self,
        filter: ReportFilter<'_, ComplaintStatus>,
    ) -> Result<(Vec<ComplaintRecord>, i64)> {
        let mut count = QueryBuilder::<Sqlite>::new(
            "SELECT COUNT(*) FROM complaints c
             LEFT JOIN buses b ON b.id = c.bus_id
             LEFT JOIN routes r ON r.id = c.route_id",
        );
        push_filter(&mut count, "c.status", filter.status, filter.search, COMPLAINT_SEARCH);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .db_context("Failed to count complaints")?;

        let mut select = QueryBuilder::<Sqlite>::new(COMPLAINT_SELECT);
        push_filter(&mut select, "c.status", filter.status, filter.search, COMPLAINT_SEARCH);
        select.push(" ORDER BY c.created_at DESC, c.id DESC LIMIT ");
        select.push_bind(filter.limit);
        select.push(" OFFSET ");
        select.push_bind(filter.offset);

        let records = select
            .build_query_as::<ComplaintRecord>()
            .fetch_all(&self.pool)
            .await
            .db_context("Failed to list complaints")?;

        Ok((records, total))
    }

    pub async fn update_complaint_status(&self, id: i64, status: ComplaintStatus) -> Result<()> {
        let result = sqlx::query("UPDATE complaints SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await
            .db_context("Failed to update complaint")?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Complaint", id));
        }
        Ok(())
    }

    pub async fn create_lost_item(
        &self,
        item: &NewLostItem<'_>,
        now: DateTime<Utc>,
    ) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO lost_items (user_id, description, image, bus_id, route_id, loss_datetime,
                passenger_name, contact_number, status, reported_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(item.user_id)
        .bind(item.description)
        .bind(item.image)
        .bind(item.bus_pk)
        .bind(item.route_pk)
        .bind(item.loss_datetime)
        .bind(item.passenger_name)
        .bind(item.contact_number)
        .bind(LostItemStatus::Reported)
        .bind(now)
        .execute(&self.pool)
        .await
        .db_context("Failed to store lost item")?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_lost_item(&self, id: i64) -> Result<Option<LostItemView>> {
        sqlx::query_as::<_, LostItemView>(&format!("{LOST_ITEM_SELECT} WHERE l.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .db_context("Failed to load lost item")
    }

    /// Reporting user of a lost item; outer `None` when the item is unknown
    pub async fn lost_item_owner(&self, id: i64) -> Result<Option<Option<i64>>> {
        sqlx::query_scalar("SELECT user_id FROM lost_items WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .db_context("Failed to load lost item")
    }

    pub async fn list_lost_items(
        &self,
        filter: ReportFilter<'_, LostItemStatus>,
    ) -> Result<(Vec<LostItemView>, i64)> {
        let mut count = QueryBuilder::<Sqlite>::new(
            "SELECT COUNT(*) FROM lost_items l
             LEFT JOIN buses b ON b.id = l.bus_id
             LEFT JOIN routes r ON r.id = l.route_id",
        );
        push_filter(&mut count, "l.status", filter.status, filter.search, LOST_ITEM_SEARCH);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .db_context("Failed to count lost items")?;

        let mut select = QueryBuilder::<Sqlite>::new(LOST_ITEM_SELECT);
        push_filter(&mut select, "l.status", filter.status, filter.search, LOST_ITEM_SEARCH);
        select.push(" ORDER BY l.reported_at DESC, l.id DESC LIMIT ");
        select.push_bind(filter.limit);
        select.push(" OFFSET ");
        select.push_bind(filter.offset);

        let items = select
            .build_query_as::<LostItemView>()
            .fetch_all(&self.pool)
            .await
            .db_context("Failed to list lost items")?;

        Ok((items, total))
    }

    pub async fn update_lost_item_status(&self, id: i64, status: LostItemStatus) -> Result<()> {
        let result = sqlx::query("UPDATE lost_items SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await
            .db_context("Failed to update lost item")?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Lost item", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("seat_12"), "seat\\_12");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("Majestic"), "Majestic");
    }
}
