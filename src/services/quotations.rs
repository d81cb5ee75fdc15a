use crate::dto::{
    compute_total, normalize_items, parse_line_items, CreateQuotationInput, UpdateQuotationRequest,
};
use crate::entities::{invoice, quotation};
use crate::errors::ServiceError;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, SqlErr,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Service for managing quotations
#[derive(Clone)]
pub struct QuotationService {
    db: Arc<DatabaseConnection>,
}

impl QuotationService {
    /// Creates a new quotation service instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates a new quotation, rejecting duplicate idempotency tokens.
    ///
    /// The pre-check below is advisory only: concurrent submissions race on
    /// check-then-create, so the unique index on `unique_quotation_id` is the
    /// actual guard and its violation maps to the same duplicate error.
    #[instrument(skip(self, input))]
    pub async fn create_quotation(
        &self,
        input: CreateQuotationInput,
    ) -> Result<quotation::Model, ServiceError> {
        let db = &*self.db;

        let duplicate = quotation::Entity::find()
            .filter(quotation::Column::UniqueQuotationId.eq(input.unique_quotation_id.as_str()))
            .one(db)
            .await?;
        if duplicate.is_some() {
            warn!(
                unique_quotation_id = %input.unique_quotation_id,
                "duplicate quotation submission rejected"
            );
            return Err(ServiceError::Duplicate(
                "This quotation has already been created".to_string(),
            ));
        }

        let items = normalize_items(input.items);
        let line_items = parse_line_items(&items);
        let total_amount = compute_total(&line_items)
            .or(input.total_amount)
            .unwrap_or(Decimal::ZERO);

        let now = Utc::now();
        let model = quotation::ActiveModel {
            id: Set(Uuid::new_v4()),
            unique_quotation_id: Set(input.unique_quotation_id),
            client_name: Set(input.client_name),
            email: Set(input.email),
            phone: Set(input.phone),
            quotation_date: Set(input.quotation_date),
            items: Set(items),
            total_amount: Set(total_amount),
            status: Set(input.status.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                ServiceError::Duplicate("This quotation has already been created".to_string())
            } else {
                ServiceError::DatabaseError(e)
            }
        })?;

        info!(quotation_id = %created.id, total_amount = %created.total_amount, "quotation created");
        Ok(created)
    }

    /// Lists all quotations in storage-default order.
    #[instrument(skip(self))]
    pub async fn list_quotations(&self) -> Result<Vec<quotation::Model>, ServiceError> {
        let db = &*self.db;
        let quotations = quotation::Entity::find().all(db).await?;
        Ok(quotations)
    }

    /// Gets a quotation by ID
    #[instrument(skip(self))]
    pub async fn get_quotation(&self, id: Uuid) -> Result<quotation::Model, ServiceError> {
        let db = &*self.db;
        quotation::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Quotation not found".to_string()))
    }

    /// Merges a partial payload into the stored record. Status changes are
    /// taken as-is: there is no transition legality check. When the patch
    /// carries items, they are re-normalized and the total recomputed.
    #[instrument(skip(self, patch))]
    pub async fn update_quotation(
        &self,
        id: Uuid,
        patch: UpdateQuotationRequest,
    ) -> Result<quotation::Model, ServiceError> {
        let db = &*self.db;

        let existing = quotation::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Quotation not found".to_string()))?;

        let mut active: quotation::ActiveModel = existing.into();

        if let Some(client_name) = patch.client_name {
            active.client_name = Set(client_name);
        }
        if let Some(email) = patch.email {
            active.email = Set(email);
        }
        if let Some(phone) = patch.phone {
            active.phone = Set(phone);
        }
        if let Some(quotation_date) = patch.quotation_date {
            active.quotation_date = Set(quotation_date);
        }
        if let Some(status) = patch.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(total_amount) = patch.total_amount {
            active.total_amount = Set(total_amount);
        }
        if let Some(items) = patch.items {
            let items = normalize_items(items);
            if let Some(total) = compute_total(&parse_line_items(&items)) {
                active.total_amount = Set(total);
            }
            active.items = Set(items);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(db).await?;
        info!(quotation_id = %updated.id, status = %updated.status, "quotation updated");
        Ok(updated)
    }

    /// Deletes a quotation. A quotation that already has issued invoices is
    /// not deletable; the invoices keep their referential integrity.
    #[instrument(skip(self))]
    pub async fn delete_quotation(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db;

        let issued = invoice::Entity::find()
            .filter(invoice::Column::QuotationId.eq(id))
            .count(db)
            .await?;
        if issued > 0 {
            return Err(ServiceError::Conflict(format!(
                "Quotation {} has {} issued invoice(s) and cannot be deleted",
                id, issued
            )));
        }

        let result = quotation::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound("Quotation not found".to_string()));
        }

        info!(quotation_id = %id, "quotation deleted");
        Ok(())
    }
}
