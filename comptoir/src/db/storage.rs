//! redb-based storage for receipts, the product catalogue and settings

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
    WriteTransaction,
};
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::settings::{DEFAULT_SETTINGS, keys, validate_setting};
use shared::models::{Product, ReceiptRecord, ReceiptSummary, SalesStatistics, TopProduct};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Receipts table: key = receipt_number, value = JSON
const RECEIPTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("receipts");

/// Product catalogue: key = product name, value = JSON
const PRODUCTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("products");

/// Settings: key = setting name, value = raw string
const SETTINGS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("settings");

/// Products returned by a catalogue search
pub const SEARCH_LIMIT: usize = 10;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Receipt not found: {0}")]
    ReceiptNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Corrupted value for {key}: {value:?}")]
    Corrupted { key: String, value: String },

    /// The record handed to `create_receipt` was refused
    #[error("{0}")]
    Rejected(AppError),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ReceiptNotFound(number) => {
                AppError::with_message(ErrorCode::ReceiptNotFound, format!("Receipt {number} not found"))
                    .with_detail("receipt_number", number)
            }
            StorageError::ProductNotFound(name) => {
                AppError::with_message(ErrorCode::ProductNotFound, format!("Product {name} not found"))
                    .with_detail("name", name)
            }
            StorageError::Corrupted { key, value } => AppError::with_message(
                ErrorCode::StorageCorrupted,
                format!("Corrupted value for {key}"),
            )
            .with_detail("key", key)
            .with_diagnostic(value),
            StorageError::Rejected(e) => e,
            other => AppError::database(other.to_string()),
        }
    }
}

/// Receipt number for a counter value: `FACT-00042`
pub fn receipt_number(counter: u64) -> String {
    format!("FACT-{:05}", counter)
}

fn parse_counter(raw: Option<&str>) -> StorageResult<u64> {
    let raw = raw.unwrap_or("1");
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|n| *n >= 1)
        .ok_or_else(|| StorageError::Corrupted {
            key: keys::RECEIPT_COUNTER.to_string(),
            value: raw.to_string(),
        })
}

fn summary_order(a: &ReceiptSummary, b: &ReceiptSummary) -> std::cmp::Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.receipt_number.cmp(&a.receipt_number))
}

/// Receipts, products and settings in one redb file
#[derive(Clone)]
pub struct ReceiptStorage {
    db: Arc<Database>,
}

impl ReceiptStorage {
    /// Open or create database
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let storage = Self { db: Arc::new(db) };
        storage.init()?;
        Ok(storage)
    }

    /// Open in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db =
            Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let storage = Self { db: Arc::new(db) };
        storage.init()?;
        Ok(storage)
    }

    /// Create tables and seed missing settings with their defaults
    fn init(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(RECEIPTS_TABLE)?;
            let _ = write_txn.open_table(PRODUCTS_TABLE)?;
            let mut settings = write_txn.open_table(SETTINGS_TABLE)?;
            let mut seeded = 0;
            for (key, value) in DEFAULT_SETTINGS {
                if settings.get(*key)?.is_none() {
                    settings.insert(*key, *value)?;
                    seeded += 1;
                }
            }
            if seeded > 0 {
                info!(seeded, "Seeded default settings");
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    // ========== Receipts ==========

    /// Number the next saved receipt will receive
    pub fn next_receipt_number(&self) -> StorageResult<String> {
        let read_txn = self.db.begin_read()?;
        let settings = read_txn.open_table(SETTINGS_TABLE)?;
        let raw = settings.get(keys::RECEIPT_COUNTER)?.map(|g| g.value().to_string());
        Ok(receipt_number(parse_counter(raw.as_deref())?))
    }

    /// Reserve a number and save the receipt built for it, atomically
    ///
    /// `make` receives the reserved number. Number reservation, the receipt
    /// insert, the counter increment and the catalogue update commit
    /// together, so two concurrent saves can never share a number.
    pub fn create_receipt<F>(&self, now: i64, make: F) -> StorageResult<ReceiptRecord>
    where
        F: FnOnce(&str) -> Result<ReceiptRecord, AppError>,
    {
        let write_txn = self.db.begin_write()?;
        let record = {
            let mut settings = write_txn.open_table(SETTINGS_TABLE)?;
            let mut receipts = write_txn.open_table(RECEIPTS_TABLE)?;

            let raw = settings.get(keys::RECEIPT_COUNTER)?.map(|g| g.value().to_string());
            let mut counter = parse_counter(raw.as_deref())?;
            // skip numbers already taken (counter edited by hand)
            while receipts.get(receipt_number(counter).as_str())?.is_some() {
                counter += 1;
            }
            let number = receipt_number(counter);

            let record = make(&number).map_err(StorageError::Rejected)?;
            if record.receipt_number != number {
                return Err(StorageError::Rejected(AppError::with_message(
                    ErrorCode::ReceiptNumberConflict,
                    format!(
                        "record carries number {} but {} was reserved",
                        record.receipt_number, number
                    ),
                )));
            }

            let value = serde_json::to_vec(&record)?;
            receipts.insert(number.as_str(), value.as_slice())?;
            settings.insert(keys::RECEIPT_COUNTER, (counter + 1).to_string().as_str())?;
            record
        };
        Self::learn_products(&write_txn, &record, now)?;
        write_txn.commit()?;

        info!(receipt_number = %record.receipt_number, items = record.items.len(), "Receipt saved");
        Ok(record)
    }

    /// Get a receipt by number
    pub fn get_receipt(&self, number: &str) -> StorageResult<Option<ReceiptRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RECEIPTS_TABLE)?;

        match table.get(number)? {
            Some(guard) => {
                let record: ReceiptRecord = serde_json::from_slice(guard.value())?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Get a receipt that must exist
    pub fn require_receipt(&self, number: &str) -> StorageResult<ReceiptRecord> {
        self.get_receipt(number)?
            .ok_or_else(|| StorageError::ReceiptNotFound(number.to_string()))
    }

    fn all_receipts(&self) -> StorageResult<Vec<ReceiptRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RECEIPTS_TABLE)?;

        let mut receipts = Vec::with_capacity(table.len()? as usize);
        for result in table.iter()? {
            let (_, guard) = result?;
            receipts.push(serde_json::from_slice(guard.value())?);
        }
        Ok(receipts)
    }

    /// Receipt summaries, newest first
    pub fn list_receipts(&self, limit: Option<usize>) -> StorageResult<Vec<ReceiptSummary>> {
        let mut summaries: Vec<ReceiptSummary> =
            self.all_receipts()?.iter().map(ReceiptRecord::summary).collect();
        summaries.sort_by(summary_order);
        if let Some(limit) = limit {
            summaries.truncate(limit);
        }
        Ok(summaries)
    }

    /// Receipts whose number or client name contains `query` (case-insensitive)
    pub fn search_receipts(&self, query: &str) -> StorageResult<Vec<ReceiptSummary>> {
        let needle = query.trim().to_lowercase();
        let mut summaries: Vec<ReceiptSummary> = self
            .all_receipts()?
            .iter()
            .filter(|r| {
                r.receipt_number.to_lowercase().contains(&needle)
                    || r.client_name.to_lowercase().contains(&needle)
            })
            .map(ReceiptRecord::summary)
            .collect();
        summaries.sort_by(summary_order);
        Ok(summaries)
    }

    /// Delete a receipt
    pub fn delete_receipt(&self, number: &str) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(RECEIPTS_TABLE)?;
            if table.remove(number)?.is_none() {
                return Err(StorageError::ReceiptNotFound(number.to_string()));
            }
        }
        write_txn.commit()?;
        info!(receipt_number = %number, "Receipt deleted");
        Ok(())
    }

    /// Delete every receipt, returns how many were removed
    pub fn clear_receipts(&self) -> StorageResult<u64> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(RECEIPTS_TABLE)?;
            let removed = table.len()?;
            table.retain(|_, _| false)?;
            removed
        };
        write_txn.commit()?;
        info!(removed, "Receipts cleared");
        Ok(removed)
    }

    // ========== Products ==========

    /// Upsert one catalogue entry per line item
    fn learn_products(
        txn: &WriteTransaction,
        record: &ReceiptRecord,
        now: i64,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(PRODUCTS_TABLE)?;
        for item in &record.items {
            let name = item.name.trim();
            let existing = table
                .get(name)?
                .map(|guard| serde_json::from_slice::<Product>(guard.value()))
                .transpose()?;
            let mut product = existing.unwrap_or_else(|| Product::new(name, item.unit_price, now));
            product.record_sale(item.quantity, item.unit_price, now);

            let value = serde_json::to_vec(&product)?;
            table.insert(name, value.as_slice())?;
            debug!(product = %name, count = product.count, "Product learned");
        }
        Ok(())
    }

    fn all_products(&self) -> StorageResult<Vec<Product>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS_TABLE)?;

        let mut products = Vec::with_capacity(table.len()? as usize);
        for result in table.iter()? {
            let (_, guard) = result?;
            products.push(serde_json::from_slice(guard.value())?);
        }
        Ok(products)
    }

    /// Get a product by name
    pub fn get_product(&self, name: &str) -> StorageResult<Option<Product>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS_TABLE)?;

        match table.get(name.trim())? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// All products, most used first
    pub fn list_products(&self) -> StorageResult<Vec<Product>> {
        let mut products = self.all_products()?;
        products.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        Ok(products)
    }

    /// Products whose name contains `query`, most used then most recent first
    pub fn search_products(&self, query: &str) -> StorageResult<Vec<Product>> {
        let needle = query.trim().to_lowercase();
        let mut products: Vec<Product> = self
            .all_products()?
            .into_iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect();
        products.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| b.last_used.cmp(&a.last_used))
        });
        products.truncate(SEARCH_LIMIT);
        Ok(products)
    }

    /// Delete a product from the catalogue
    pub fn delete_product(&self, name: &str) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(PRODUCTS_TABLE)?;
            if table.remove(name.trim())?.is_none() {
                return Err(StorageError::ProductNotFound(name.to_string()));
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Delete every product, returns how many were removed
    pub fn clear_products(&self) -> StorageResult<u64> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(PRODUCTS_TABLE)?;
            let removed = table.len()?;
            table.retain(|_, _| false)?;
            removed
        };
        write_txn.commit()?;
        info!(removed, "Products cleared");
        Ok(removed)
    }

    // ========== Statistics ==========

    pub fn statistics(&self) -> StorageResult<SalesStatistics> {
        let receipts = self.all_receipts()?;
        let total_sales: Decimal = receipts.iter().map(|r| r.total).sum();
        let total_receipts = receipts.len() as u64;
        let average_sale = if total_receipts > 0 {
            total_sales / Decimal::from(total_receipts)
        } else {
            Decimal::ZERO
        };

        let read_txn = self.db.begin_read()?;
        let unique_products = read_txn.open_table(PRODUCTS_TABLE)?.len()?;

        Ok(SalesStatistics {
            total_sales,
            total_receipts,
            average_sale,
            unique_products,
        })
    }

    /// Best sellers by cumulative sales amount
    pub fn top_products(&self, limit: usize) -> StorageResult<Vec<TopProduct>> {
        let mut products = self.all_products()?;
        products.sort_by(|a, b| b.total_sold.cmp(&a.total_sold));
        Ok(products.iter().take(limit).map(TopProduct::from).collect())
    }

    // ========== Settings ==========

    pub fn get_setting(&self, key: &str) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SETTINGS_TABLE)?;
        Ok(table.get(key)?.map(|g| g.value().to_string()))
    }

    pub fn all_settings(&self) -> StorageResult<HashMap<String, String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SETTINGS_TABLE)?;

        let mut settings = HashMap::new();
        for result in table.iter()? {
            let (key, value) = result?;
            settings.insert(key.value().to_string(), value.value().to_string());
        }
        Ok(settings)
    }

    /// Write a setting after checking the key and value
    pub fn set_setting(&self, key: &str, value: &str) -> StorageResult<()> {
        validate_setting(key, value).map_err(StorageError::Rejected)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SETTINGS_TABLE)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        info!(key = %key, "Setting updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{LineItem, ReceiptDraft};

    fn draft(items: &[(&str, i64, i64)]) -> ReceiptDraft {
        let mut d = ReceiptDraft::new().client("Rakoto Jean", "");
        for (name, qty, price) in items {
            d.add_item(*name, Decimal::from(*qty), Decimal::from(*price))
                .unwrap();
        }
        d
    }

    fn save(storage: &ReceiptStorage, d: ReceiptDraft, now: i64) -> ReceiptRecord {
        storage
            .create_receipt(now, |number| d.into_record(number, "2025-06-03", now))
            .unwrap()
    }

    #[test]
    fn test_defaults_seeded() {
        let storage = ReceiptStorage::open_in_memory().unwrap();
        let settings = storage.all_settings().unwrap();
        assert_eq!(settings.len(), DEFAULT_SETTINGS.len());
        assert_eq!(storage.get_setting("currency").unwrap().as_deref(), Some("Ar"));
        assert_eq!(storage.next_receipt_number().unwrap(), "FACT-00001");
    }

    #[test]
    fn test_numbers_are_sequential() {
        let storage = ReceiptStorage::open_in_memory().unwrap();
        let a = save(&storage, draft(&[("Savon", 1, 1500)]), 1);
        let b = save(&storage, draft(&[("Bougie", 2, 200)]), 2);
        assert_eq!(a.receipt_number, "FACT-00001");
        assert_eq!(b.receipt_number, "FACT-00002");
        assert_eq!(storage.next_receipt_number().unwrap(), "FACT-00003");
        assert_eq!(storage.get_receipt("FACT-00002").unwrap().unwrap(), b);
    }

    #[test]
    fn test_rejected_record_consumes_no_number() {
        let storage = ReceiptStorage::open_in_memory().unwrap();
        let err = storage
            .create_receipt(1, |number| ReceiptDraft::new().into_record(number, "2025-06-03", 1))
            .unwrap_err();
        assert!(matches!(err, StorageError::Rejected(ref e) if e.code == ErrorCode::ReceiptEmpty));
        assert_eq!(storage.next_receipt_number().unwrap(), "FACT-00001");
        assert!(storage.list_receipts(None).unwrap().is_empty());
    }

    #[test]
    fn test_counter_skips_taken_numbers() {
        let storage = ReceiptStorage::open_in_memory().unwrap();
        save(&storage, draft(&[("Savon", 1, 1500)]), 1);
        storage.set_setting("receipt_counter", "1").unwrap();
        let r = save(&storage, draft(&[("Savon", 1, 1500)]), 2);
        assert_eq!(r.receipt_number, "FACT-00002");
    }

    #[test]
    fn test_list_search_delete() {
        let storage = ReceiptStorage::open_in_memory().unwrap();
        save(&storage, draft(&[("Savon", 1, 1500)]), 10);
        let mut other = draft(&[("Riz", 5, 3000)]);
        other.client_name = "EPP Ambohipo".to_string();
        save(&storage, other, 20);

        let list = storage.list_receipts(None).unwrap();
        assert_eq!(list[0].receipt_number, "FACT-00002");
        assert_eq!(list[1].receipt_number, "FACT-00001");
        assert_eq!(storage.list_receipts(Some(1)).unwrap().len(), 1);

        let found = storage.search_receipts("ambohipo").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].client_name, "EPP Ambohipo");
        assert_eq!(storage.search_receipts("00001").unwrap().len(), 1);

        storage.delete_receipt("FACT-00001").unwrap();
        assert!(matches!(
            storage.delete_receipt("FACT-00001"),
            Err(StorageError::ReceiptNotFound(_))
        ));
        assert_eq!(storage.list_receipts(None).unwrap().len(), 1);
    }

    #[test]
    fn test_products_learned_with_receipt() {
        let storage = ReceiptStorage::open_in_memory().unwrap();
        save(&storage, draft(&[("Savon", 2, 1500), ("Riz", 1, 3000)]), 10);
        save(&storage, draft(&[("Savon", 1, 1600)]), 20);

        let savon = storage.get_product("Savon").unwrap().unwrap();
        assert_eq!(savon.count, 2);
        assert_eq!(savon.unit_price, Decimal::from(1600));
        assert_eq!(savon.total_sold, Decimal::from(4600));

        let listed = storage.list_products().unwrap();
        assert_eq!(listed[0].name, "Savon");

        let found = storage.search_products("sav").unwrap();
        assert_eq!(found.len(), 1);
        assert!(storage.search_products("").unwrap().len() == 2);

        storage.delete_product("Riz").unwrap();
        assert!(storage.get_product("Riz").unwrap().is_none());
        assert!(matches!(
            storage.delete_product("Riz"),
            Err(StorageError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_search_products_limit_and_order() {
        let storage = ReceiptStorage::open_in_memory().unwrap();
        let names: Vec<String> = (0..12).map(|i| format!("Article {i:02}")).collect();
        for (i, name) in names.iter().enumerate() {
            save(&storage, draft(&[(name.as_str(), 1, 100)]), i as i64);
        }
        // one product used twice goes first
        save(&storage, draft(&[("Article 03", 1, 100)]), 100);

        let found = storage.search_products("article").unwrap();
        assert_eq!(found.len(), SEARCH_LIMIT);
        assert_eq!(found[0].name, "Article 03");
        // then most recent first
        assert_eq!(found[1].name, "Article 11");
    }

    #[test]
    fn test_statistics_and_top_products() {
        let storage = ReceiptStorage::open_in_memory().unwrap();
        assert_eq!(storage.statistics().unwrap(), SalesStatistics::default());

        save(&storage, draft(&[("Savon", 2, 1500), ("Riz", 1, 3000)]), 10);
        save(&storage, draft(&[("Huile", 1, 9000)]), 20);

        let stats = storage.statistics().unwrap();
        assert_eq!(stats.total_sales, Decimal::from(15000));
        assert_eq!(stats.total_receipts, 2);
        assert_eq!(stats.average_sale, Decimal::from(7500));
        assert_eq!(stats.unique_products, 3);

        let top = storage.top_products(2).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "Huile");
    }

    #[test]
    fn test_settings_validation() {
        let storage = ReceiptStorage::open_in_memory().unwrap();
        storage.set_setting("paper_width", "80").unwrap();
        assert_eq!(storage.get_setting("paper_width").unwrap().as_deref(), Some("80"));
        assert!(matches!(
            storage.set_setting("paper_width", "72"),
            Err(StorageError::Rejected(_))
        ));
        assert!(storage.set_setting("colour", "red").is_err());
    }

    #[test]
    fn test_clear() {
        let storage = ReceiptStorage::open_in_memory().unwrap();
        save(&storage, draft(&[("Savon", 2, 1500), ("Riz", 1, 3000)]), 10);
        assert_eq!(storage.clear_receipts().unwrap(), 1);
        assert_eq!(storage.clear_products().unwrap(), 2);
        assert!(storage.list_receipts(None).unwrap().is_empty());
        assert!(storage.list_products().unwrap().is_empty());
        // numbering continues
        assert_eq!(storage.next_receipt_number().unwrap(), "FACT-00002");
    }

    #[test]
    fn test_line_item_roundtrip_keeps_totals_valid() {
        let storage = ReceiptStorage::open_in_memory().unwrap();
        let mut d = ReceiptDraft::new();
        d.items.push(LineItem::new("Farine", Decimal::new(125, 2), Decimal::new(33333, 1)).unwrap());
        let saved = save(&storage, d, 1);
        let loaded = storage.require_receipt(&saved.receipt_number).unwrap();
        assert!(loaded.validate().is_ok());
        assert_eq!(loaded, saved);
    }
}
