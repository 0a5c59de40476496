//! Receipt Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, ErrorCode};
use crate::validation::{
    MAX_CONTACT_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_price, validate_quantity, validate_required_text,
};

/// Default payment method label
pub const DEFAULT_PAYMENT_METHOD: &str = "Espèces";

/// One line of a receipt
///
/// Identity is positional: two lines with the same product name are
/// distinct entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    /// Always `quantity * unit_price`
    pub total: Decimal,
}

impl LineItem {
    /// Create a validated line item and compute its total
    pub fn new(name: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> AppResult<Self> {
        let name = name.into().trim().to_string();
        validate_required_text(&name, "name", MAX_NAME_LEN)?;
        validate_quantity(quantity)?;
        validate_price(unit_price)?;
        Ok(Self {
            name,
            quantity,
            unit_price,
            total: quantity * unit_price,
        })
    }

    /// Re-check a line loaded from storage or deserialized from input
    pub fn validate(&self) -> AppResult<()> {
        validate_required_text(&self.name, "name", MAX_NAME_LEN)?;
        validate_quantity(self.quantity)?;
        validate_price(self.unit_price)?;
        if self.total != self.quantity * self.unit_price {
            return Err(AppError::validation(format!(
                "line total {} does not match {} x {}",
                self.total, self.quantity, self.unit_price
            ))
            .with_detail("field", "total"));
        }
        Ok(())
    }
}

/// Receipt being composed, before a number is reserved
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReceiptDraft {
    #[serde(default)]
    pub client_name: String,
    /// Free text, may span several lines (phone, address)
    #[serde(default)]
    pub client_contact: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
    #[serde(default)]
    pub notes: String,
}

fn default_payment_method() -> String {
    DEFAULT_PAYMENT_METHOD.to_string()
}

impl ReceiptDraft {
    pub fn new() -> Self {
        Self {
            payment_method: default_payment_method(),
            ..Default::default()
        }
    }

    pub fn client(mut self, name: impl Into<String>, contact: impl Into<String>) -> Self {
        self.client_name = name.into();
        self.client_contact = contact.into();
        self
    }

    pub fn payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = method.into();
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Append a validated line item
    pub fn add_item(
        &mut self,
        name: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> AppResult<&LineItem> {
        let item = LineItem::new(name, quantity, unit_price)?;
        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    /// Remove the line at `index`, if any
    pub fn remove_item(&mut self, index: usize) -> Option<LineItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn clear_items(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of the line totals
    pub fn total(&self) -> Decimal {
        self.items.iter().map(|i| i.total).sum()
    }

    /// Validate everything a saved receipt must satisfy
    pub fn validate(&self) -> AppResult<()> {
        if self.items.is_empty() {
            return Err(AppError::new(ErrorCode::ReceiptEmpty));
        }
        for item in &self.items {
            item.validate()?;
        }
        validate_optional_text(&self.client_name, "client_name", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.client_contact, "client_contact", MAX_CONTACT_LEN)?;
        validate_required_text(&self.payment_method, "payment_method", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.notes, "notes", MAX_NOTE_LEN)?;
        Ok(())
    }

    /// Turn the draft into an immutable record under a reserved number
    pub fn into_record(
        self,
        receipt_number: impl Into<String>,
        date: impl Into<String>,
        created_at: i64,
    ) -> AppResult<ReceiptRecord> {
        self.validate()?;
        let total = self.total();
        Ok(ReceiptRecord {
            receipt_number: receipt_number.into(),
            date: date.into(),
            client_name: self.client_name.trim().to_string(),
            client_contact: self.client_contact,
            items: self.items,
            total,
            payment_method: self.payment_method.trim().to_string(),
            notes: self.notes,
            created_at,
        })
    }
}

/// A persisted receipt
///
/// Created once per sale, never mutated afterwards. `date` is kept as the
/// raw string it was issued with (normally `YYYY-MM-DD`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptRecord {
    pub receipt_number: String,
    pub date: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub client_contact: String,
    pub items: Vec<LineItem>,
    pub total: Decimal,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
    #[serde(default)]
    pub notes: String,
    /// Unix timestamp (millis)
    #[serde(default)]
    pub created_at: i64,
}

impl ReceiptRecord {
    /// Check the invariants the layout engine relies on
    ///
    /// An empty item list is accepted here: reprinting a legacy record with
    /// no lines still yields a valid header/footer page.
    pub fn validate(&self) -> AppResult<()> {
        validate_required_text(&self.receipt_number, "receipt_number", MAX_SHORT_TEXT_LEN)?;
        for item in &self.items {
            item.validate()?;
        }
        if self.total < Decimal::ZERO {
            return Err(AppError::validation("receipt total must not be negative")
                .with_detail("field", "total"));
        }
        Ok(())
    }

    pub fn summary(&self) -> ReceiptSummary {
        ReceiptSummary {
            receipt_number: self.receipt_number.clone(),
            date: self.date.clone(),
            client_name: self.client_name.clone(),
            total: self.total,
            created_at: self.created_at,
        }
    }
}

/// Receipt row for history listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptSummary {
    pub receipt_number: String,
    pub date: String,
    pub client_name: String,
    pub total: Decimal,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_total() {
        let item = LineItem::new("Riz makalioka", Decimal::new(25, 1), Decimal::from(3200)).unwrap();
        assert_eq!(item.total, Decimal::from(8000));
    }

    #[test]
    fn test_line_item_rejects_bad_input() {
        assert_eq!(
            LineItem::new("", Decimal::ONE, Decimal::ONE).unwrap_err().code,
            ErrorCode::RequiredField
        );
        assert_eq!(
            LineItem::new("Sucre", Decimal::NEGATIVE_ONE, Decimal::ONE)
                .unwrap_err()
                .code,
            ErrorCode::ProductInvalidQuantity
        );
        assert_eq!(
            LineItem::new("Sucre", Decimal::ONE, Decimal::ZERO).unwrap_err().code,
            ErrorCode::ProductInvalidPrice
        );
    }

    #[test]
    fn test_tampered_total_is_rejected() {
        let mut item = LineItem::new("Huile", Decimal::from(2), Decimal::from(9000)).unwrap();
        item.total = Decimal::from(1);
        assert!(item.validate().is_err());
    }

    #[test]
    fn test_draft_lifecycle() {
        let mut draft = ReceiptDraft::new().client("Rakoto Jean", "034 00 000 00");
        assert!(draft.is_empty());
        assert_eq!(draft.validate().unwrap_err().code, ErrorCode::ReceiptEmpty);

        draft.add_item("Savon", Decimal::from(3), Decimal::from(1500)).unwrap();
        draft.add_item("Bougie", Decimal::from(10), Decimal::from(200)).unwrap();
        assert_eq!(draft.total(), Decimal::from(6500));

        let removed = draft.remove_item(1).unwrap();
        assert_eq!(removed.name, "Bougie");
        assert!(draft.remove_item(5).is_none());

        let record = draft.into_record("FACT-00001", "2025-06-03", 0).unwrap();
        assert_eq!(record.total, Decimal::from(4500));
        assert_eq!(record.payment_method, DEFAULT_PAYMENT_METHOD);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_record_json_defaults() {
        let json = r#"{"receipt_number":"FACT-00007","date":"2025-01-02","items":[],"total":0}"#;
        let record: ReceiptRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.payment_method, DEFAULT_PAYMENT_METHOD);
        assert!(record.client_name.is_empty());
    }
}
