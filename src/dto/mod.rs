use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

/// Quotation lifecycle status. Transitions are caller-driven; the enum only
/// constrains the value set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl QuotationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// One row of a quotation. The wire shape is duck-typed across clients:
/// `qty`/`quantity` are synonyms, the unit price arrives as `unitPrice` or
/// `price`, and `amount` may carry a caller-precomputed extended amount.
/// Absent fields get explicit defaults rather than failing the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default)]
    pub name: String,

    #[serde(default = "default_qty", alias = "quantity")]
    pub qty: u32,

    /// Day multiplier for per-day rates (conference packages, accommodation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,

    /// Caller-precomputed extended amount; wins over qty x price when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,

    /// Descriptive sub-notes rendered under the item row
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_items: Vec<String>,
}

fn default_qty() -> u32 {
    1
}

impl LineItem {
    /// Unit price with the `unitPrice`-over-`price` precedence applied.
    pub fn effective_unit_price(&self) -> Decimal {
        self.unit_price.or(self.price).unwrap_or(Decimal::ZERO)
    }

    /// Extended amount for the row: the explicit `amount` when supplied,
    /// otherwise qty x unit price x days.
    pub fn extended_amount(&self) -> Decimal {
        if let Some(amount) = self.amount {
            return amount;
        }
        let days = Decimal::from(self.days.unwrap_or(1));
        Decimal::from(self.qty) * self.effective_unit_price() * days
    }
}

/// Normalizes an inbound `items` value: a JSON-encoded string is parsed into
/// its structured form when it parses; anything else is stored as received.
pub fn normalize_items(value: Value) -> Value {
    match value {
        Value::String(raw) => {
            serde_json::from_str(&raw).unwrap_or_else(|_| Value::String(raw))
        }
        other => other,
    }
}

/// Reads line items from stored or inbound `items` data. Accepts a
/// structured array or a JSON-encoded string; degrades to an empty list on
/// unparsable input, never fails.
pub fn parse_line_items(value: &Value) -> Vec<LineItem> {
    let structured = match value {
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(parsed) => parsed,
            Err(_) => return Vec::new(),
        },
        other => other.clone(),
    };

    match structured {
        Value::Array(entries) => entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value::<LineItem>(entry).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// Sums extended amounts across the items; `None` when nothing is computable
/// so callers can fall back to a caller-supplied total.
pub fn compute_total(items: &[LineItem]) -> Option<Decimal> {
    if items.is_empty() {
        return None;
    }
    Some(items.iter().map(LineItem::extended_amount).sum())
}

/// Inbound payload for quotation creation. Required fields are modelled as
/// `Option` so one pass over the payload can report every missing or invalid
/// field at once instead of stopping at the first.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuotationRequest {
    #[validate(
        required,
        length(min = 1, message = "clientName must not be empty")
    )]
    pub client_name: Option<String>,

    #[validate(
        required,
        email(message = "email must be a valid email address")
    )]
    pub email: Option<String>,

    #[validate(
        required,
        length(min = 1, message = "phone must not be empty")
    )]
    pub phone: Option<String>,

    #[validate(required)]
    pub quotation_date: Option<DateTime<Utc>>,

    #[validate(
        required,
        length(min = 1, message = "uniqueQuotationId must not be empty")
    )]
    pub unique_quotation_id: Option<String>,

    #[validate(required, custom = "validate_items_shape")]
    pub items: Option<Value>,

    pub total_amount: Option<Decimal>,

    pub status: Option<QuotationStatus>,
}

/// Validated, fully-present creation input handed to the service layer.
#[derive(Debug, Clone)]
pub struct CreateQuotationInput {
    pub client_name: String,
    pub email: String,
    pub phone: String,
    pub quotation_date: DateTime<Utc>,
    pub unique_quotation_id: String,
    pub items: Value,
    pub total_amount: Option<Decimal>,
    pub status: QuotationStatus,
}

impl CreateQuotationRequest {
    /// Runs the validation gate and unwraps the required fields.
    pub fn validated(self) -> Result<CreateQuotationInput, crate::errors::ServiceError> {
        self.validate()?;

        let (
            Some(client_name),
            Some(email),
            Some(phone),
            Some(quotation_date),
            Some(unique_quotation_id),
            Some(items),
        ) = (
            self.client_name,
            self.email,
            self.phone,
            self.quotation_date,
            self.unique_quotation_id,
            self.items,
        )
        else {
            return Err(crate::errors::ServiceError::InternalError(
                "validated payload is missing a required field".to_string(),
            ));
        };

        Ok(CreateQuotationInput {
            client_name,
            email,
            phone,
            quotation_date,
            unique_quotation_id,
            items,
            total_amount: self.total_amount,
            status: self.status.unwrap_or_default(),
        })
    }
}

/// Partial update payload. Every field is optional, but at least one must be
/// present for the request to be acted on.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update_has_field", skip_on_field_errors = false))]
pub struct UpdateQuotationRequest {
    #[validate(length(min = 1, message = "clientName must not be empty"))]
    pub client_name: Option<String>,

    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,

    #[validate(length(min = 1, message = "phone must not be empty"))]
    pub phone: Option<String>,

    pub quotation_date: Option<DateTime<Utc>>,

    #[validate(custom = "validate_items_shape")]
    pub items: Option<Value>,

    pub total_amount: Option<Decimal>,

    pub status: Option<QuotationStatus>,
}

fn validate_update_has_field(req: &UpdateQuotationRequest) -> Result<(), ValidationError> {
    let has_field = req.client_name.is_some()
        || req.email.is_some()
        || req.phone.is_some()
        || req.quotation_date.is_some()
        || req.items.is_some()
        || req.total_amount.is_some()
        || req.status.is_some();

    if has_field {
        Ok(())
    } else {
        let mut err = ValidationError::new("at_least_one_field");
        err.message =
            Some("At least one field must be provided to update the quotation".into());
        Err(err)
    }
}

fn validate_items_shape(items: &Value) -> Result<(), ValidationError> {
    match items {
        Value::Array(_) | Value::String(_) => Ok(()),
        _ => {
            let mut err = ValidationError::new("items");
            err.message = Some("items must be a list or a JSON-encoded list".into());
            Err(err)
        }
    }
}
