use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A priced proposal sent to a prospective client. `unique_quotation_id` is
/// the caller-supplied idempotency token; the column carries a unique index
/// so duplicate submissions lose the insert race even when the service-level
/// pre-check passes.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quotations")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub unique_quotation_id: String,

    pub client_name: String,
    pub email: String,
    pub phone: String,
    pub quotation_date: DateTime<Utc>,

    /// Line items, stored structured; accepted on write as either a JSON
    /// array or its serialized text form.
    pub items: Json,

    /// Derived at creation from the line items; never recomputed on read.
    pub total_amount: Decimal,

    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::invoice::Entity")]
    Invoices,
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
