use crate::dto::QuotationStatus;
use crate::entities::{invoice, quotation};
use crate::errors::ServiceError;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Service for deriving invoices from approved quotations
#[derive(Clone)]
pub struct InvoiceService {
    db: Arc<DatabaseConnection>,
}

/// Builds the invoice number for the nth invoice of a quotation. The short
/// quotation id keeps numbers stable across retries of the same quotation
/// while the per-quotation sequence keeps them collision-free.
fn invoice_number_for(quotation_id: Uuid, sequence: u64) -> String {
    let simple = quotation_id.simple().to_string();
    format!("INV-{}-{:04}", simple[..8].to_uppercase(), sequence)
}

impl InvoiceService {
    /// Creates a new invoice service instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Converts a quotation into an invoice: marks the quotation approved,
    /// assigns the generated invoice number and links the invoice back to its
    /// source. Both writes commit or roll back together.
    #[instrument(skip(self))]
    pub async fn create_from_quotation(
        &self,
        quotation_id: Uuid,
    ) -> Result<invoice::Model, ServiceError> {
        let db = &*self.db;
        let txn = db.begin().await?;

        let source = quotation::Entity::find_by_id(quotation_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Quotation not found".to_string()))?;

        let mut approved: quotation::ActiveModel = source.into();
        approved.status = Set(QuotationStatus::Approved.as_str().to_string());
        approved.updated_at = Set(Utc::now());
        approved.update(&txn).await?;

        let issued = invoice::Entity::find()
            .filter(invoice::Column::QuotationId.eq(quotation_id))
            .count(&txn)
            .await?;

        let now = Utc::now();
        let model = invoice::ActiveModel {
            id: Set(Uuid::new_v4()),
            invoice_number: Set(invoice_number_for(quotation_id, issued + 1)),
            invoice_date: Set(now),
            quotation_id: Set(quotation_id),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let created = model.insert(&txn).await?;

        txn.commit().await?;

        info!(
            invoice_id = %created.id,
            invoice_number = %created.invoice_number,
            quotation_id = %quotation_id,
            "invoice created from quotation"
        );
        Ok(created)
    }

    /// Lists all invoices.
    #[instrument(skip(self))]
    pub async fn list_invoices(&self) -> Result<Vec<invoice::Model>, ServiceError> {
        let db = &*self.db;
        let invoices = invoice::Entity::find().all(db).await?;
        Ok(invoices)
    }

    /// Gets an invoice by ID
    #[instrument(skip(self))]
    pub async fn get_invoice(&self, id: Uuid) -> Result<invoice::Model, ServiceError> {
        let db = &*self.db;
        invoice::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Invoice not found".to_string()))
    }

    /// Gets an invoice together with its source quotation, for rendering.
    #[instrument(skip(self))]
    pub async fn get_invoice_with_quotation(
        &self,
        id: Uuid,
    ) -> Result<(invoice::Model, quotation::Model), ServiceError> {
        let db = &*self.db;

        let invoice = invoice::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Invoice not found".to_string()))?;

        let quotation = quotation::Entity::find_by_id(invoice.quotation_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Quotation not found".to_string()))?;

        Ok((invoice, quotation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_number_format() {
        let quotation_id = Uuid::new_v4();
        let number = invoice_number_for(quotation_id, 1);

        let pattern = regex::Regex::new(r"^INV-[0-9A-F]{8}-\d{4}$").unwrap();
        assert!(pattern.is_match(&number), "unexpected format: {}", number);
    }

    #[test]
    fn invoice_number_is_stable_per_quotation_and_sequence() {
        let quotation_id = Uuid::new_v4();
        assert_eq!(
            invoice_number_for(quotation_id, 1),
            invoice_number_for(quotation_id, 1)
        );
        assert_ne!(
            invoice_number_for(quotation_id, 1),
            invoice_number_for(quotation_id, 2)
        );
    }

    #[test]
    fn invoice_numbers_differ_across_quotations() {
        assert_ne!(
            invoice_number_for(Uuid::new_v4(), 1),
            invoice_number_for(Uuid::new_v4(), 1)
        );
    }

    #[test]
    fn sequence_is_zero_padded() {
        let number = invoice_number_for(Uuid::new_v4(), 7);
        assert!(number.ends_with("-0007"));
    }
}
