//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalogue entry learned from issued receipts
///
/// Products are keyed by name. Every time a line with that name is issued
/// the last unit price is remembered and the usage counters move forward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    /// Unit price of the most recent sale
    pub unit_price: Decimal,
    /// Number of receipt lines that used this product
    #[serde(default)]
    pub count: u64,
    /// Cumulative sales amount (sum of line totals)
    #[serde(default)]
    pub total_sold: Decimal,
    /// Unix timestamp (millis) of the last sale
    #[serde(default)]
    pub last_used: i64,
    #[serde(default)]
    pub created_at: i64,
}

impl Product {
    pub fn new(name: impl Into<String>, unit_price: Decimal, now: i64) -> Self {
        Self {
            name: name.into(),
            unit_price,
            count: 0,
            total_sold: Decimal::ZERO,
            last_used: now,
            created_at: now,
        }
    }

    /// Record one more sale of `quantity` at `unit_price`
    pub fn record_sale(&mut self, quantity: Decimal, unit_price: Decimal, now: i64) {
        self.unit_price = unit_price;
        self.count += 1;
        self.total_sold += quantity * unit_price;
        self.last_used = now;
    }
}

/// Aggregated sales figures over all stored receipts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesStatistics {
    pub total_sales: Decimal,
    pub total_receipts: u64,
    pub average_sale: Decimal,
    pub unique_products: u64,
}

/// Product row for the best-sellers listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProduct {
    pub name: String,
    pub count: u64,
    pub total_sold: Decimal,
}

impl From<&Product> for TopProduct {
    fn from(p: &Product) -> Self {
        Self {
            name: p.name.clone(),
            count: p.count,
            total_sold: p.total_sold,
        }
    }
}
