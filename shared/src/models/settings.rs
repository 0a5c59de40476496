//! Settings Model
//!
//! Business settings are stored as a flat key/value table. This module owns
//! the key names, the defaults seeded on first start, and the typed view
//! ([`ReceiptSettings`]) handed to each render call.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::geometry::PaperSize;
use crate::error::{AppError, AppResult};

pub mod keys {
    pub const COMPANY_NAME: &str = "company_name";
    pub const COMPANY_ADDRESS: &str = "company_address";
    pub const COMPANY_PHONE: &str = "company_phone";
    pub const COMPANY_EMAIL: &str = "company_email";
    pub const COMPANY_NIF: &str = "company_nif";
    pub const COMPANY_STAT: &str = "company_stat";
    pub const COMPANY_RC: &str = "company_rc";
    pub const COMPANY_CE: &str = "company_ce";
    pub const COMPANY_CIF: &str = "company_cif";
    pub const RECEIPT_COUNTER: &str = "receipt_counter";
    pub const CURRENCY: &str = "currency";
    pub const PAPER_WIDTH: &str = "paper_width";
    pub const RECEIPT_TYPE: &str = "receipt_type";
    pub const LASER_PAPER_FORMAT: &str = "laser_paper_format";
    pub const LASER_PRINTER_NAME: &str = "laser_printer_name";
    /// `host:port` of a raw TCP thermal printer, or a spooler queue name
    pub const THERMAL_PRINTER_ADDR: &str = "thermal_printer_addr";
    /// `"1"`/`"true"` prints the total in words in the footer
    pub const AMOUNT_IN_WORDS: &str = "amount_in_words";
}

/// Defaults written into an empty settings table
pub const DEFAULT_SETTINGS: &[(&str, &str)] = &[
    (keys::COMPANY_NAME, "COMPTOIR FIDAHOUSSEN"),
    (
        keys::COMPANY_ADDRESS,
        "85 RUE DE LIEGE TSARALALANA\nANTANANARIVO 101",
    ),
    (keys::COMPANY_PHONE, "020 76 231 43"),
    (keys::COMPANY_EMAIL, "cf@moov.mg"),
    (keys::COMPANY_NIF, "2000022547"),
    (keys::COMPANY_STAT, "46101 11 1984 0 00029"),
    (keys::COMPANY_RC, "2003A00087"),
    (keys::COMPANY_CE, "520/FOK/FIATA"),
    (keys::COMPANY_CIF, "0189577 DGI-M du 03/06/2025"),
    (keys::RECEIPT_COUNTER, "1"),
    (keys::CURRENCY, "Ar"),
    (keys::PAPER_WIDTH, "58"),
    (
        keys::RECEIPT_TYPE,
        "Grossiste - Détaillants/ Vente à l'utilisateur",
    ),
    (keys::LASER_PAPER_FORMAT, "A6"),
    (keys::LASER_PRINTER_NAME, "HP_LaserJet_1022n"),
    (keys::THERMAL_PRINTER_ADDR, ""),
    (keys::AMOUNT_IN_WORDS, "0"),
];

/// Company identification printed in the receipt header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    /// Newline-delimited
    pub address: String,
    pub phone: String,
    pub email: String,
    pub nif: String,
    pub stat: String,
    pub rc: String,
    pub ce: String,
    pub cif: String,
    pub currency: String,
    /// Label printed under the number/date line, empty to omit
    pub receipt_type: String,
}

impl CompanyProfile {
    /// Non-blank address lines, trimmed
    pub fn address_lines(&self) -> Vec<&str> {
        self.address
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect()
    }
}

/// Typed settings for one render call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptSettings {
    pub company: CompanyProfile,
    /// Paper loaded in the thermal printer
    pub thermal_paper: PaperSize,
    /// Paper used for laser prints and PDF exports
    pub laser_paper: PaperSize,
    pub laser_printer_name: String,
    pub thermal_printer_addr: Option<String>,
    pub amount_in_words: bool,
}

impl ReceiptSettings {
    /// Build from the raw key/value table
    ///
    /// Missing keys fall back to [`DEFAULT_SETTINGS`]; present but malformed
    /// values are a configuration error.
    pub fn from_map(map: &HashMap<String, String>) -> AppResult<Self> {
        let get = |key: &str| -> String {
            map.get(key)
                .cloned()
                .or_else(|| default_value(key).map(str::to_string))
                .unwrap_or_default()
        };

        let thermal_paper = PaperSize::from_thermal_width(&get(keys::PAPER_WIDTH))?;
        let laser_paper: PaperSize = get(keys::LASER_PAPER_FORMAT).parse()?;
        if laser_paper.is_thermal() {
            return Err(AppError::config(format!(
                "laser_paper_format must be A6, A5 or A4, got {laser_paper}"
            ))
            .with_detail("key", keys::LASER_PAPER_FORMAT));
        }
        let amount_in_words = parse_flag(keys::AMOUNT_IN_WORDS, &get(keys::AMOUNT_IN_WORDS))?;
        let thermal_printer_addr = Some(get(keys::THERMAL_PRINTER_ADDR).trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            company: CompanyProfile {
                name: get(keys::COMPANY_NAME),
                address: get(keys::COMPANY_ADDRESS),
                phone: get(keys::COMPANY_PHONE),
                email: get(keys::COMPANY_EMAIL),
                nif: get(keys::COMPANY_NIF),
                stat: get(keys::COMPANY_STAT),
                rc: get(keys::COMPANY_RC),
                ce: get(keys::COMPANY_CE),
                cif: get(keys::COMPANY_CIF),
                currency: get(keys::CURRENCY),
                receipt_type: get(keys::RECEIPT_TYPE),
            },
            thermal_paper,
            laser_paper,
            laser_printer_name: get(keys::LASER_PRINTER_NAME),
            thermal_printer_addr,
            amount_in_words,
        })
    }

    /// Settings built from the defaults alone
    pub fn defaults() -> AppResult<Self> {
        Self::from_map(&HashMap::new())
    }
}

/// Default value for a settings key
pub fn default_value(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

/// Whether `key` is a known settings key
pub fn is_known_key(key: &str) -> bool {
    default_value(key).is_some()
}

/// Check a value before it is written to the settings table
pub fn validate_setting(key: &str, value: &str) -> AppResult<()> {
    if !is_known_key(key) {
        return Err(AppError::config(format!("unknown setting {key:?}")).with_detail("key", key));
    }
    match key {
        keys::PAPER_WIDTH => PaperSize::from_thermal_width(value).map(|_| ()),
        keys::LASER_PAPER_FORMAT => {
            let mut map = HashMap::new();
            map.insert(key.to_string(), value.to_string());
            ReceiptSettings::from_map(&map).map(|_| ())
        }
        keys::AMOUNT_IN_WORDS => parse_flag(key, value).map(|_| ()),
        keys::RECEIPT_COUNTER => value
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|n| *n >= 1)
            .map(|_| ())
            .ok_or_else(|| {
                AppError::config(format!("receipt_counter must be a positive integer, got {value:?}"))
                    .with_detail("key", key)
            }),
        _ => Ok(()),
    }
}

fn parse_flag(key: &str, value: &str) -> AppResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "oui" => Ok(true),
        "0" | "false" | "no" | "non" | "" => Ok(false),
        other => Err(
            AppError::config(format!("{key} must be a boolean, got {other:?}"))
                .with_detail("key", key),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_defaults_parse() {
        let s = ReceiptSettings::defaults().unwrap();
        assert_eq!(s.thermal_paper, PaperSize::Thermal58);
        assert_eq!(s.laser_paper, PaperSize::A6);
        assert_eq!(s.company.currency, "Ar");
        assert!(s.thermal_printer_addr.is_none());
        assert!(!s.amount_in_words);
        assert_eq!(
            s.company.address_lines(),
            vec!["85 RUE DE LIEGE TSARALALANA", "ANTANANARIVO 101"]
        );
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let mut map = HashMap::new();
        map.insert("paper_width".to_string(), "80".to_string());
        map.insert("amount_in_words".to_string(), "true".to_string());
        map.insert("thermal_printer_addr".to_string(), " 192.168.1.50:9100 ".to_string());
        let s = ReceiptSettings::from_map(&map).unwrap();
        assert_eq!(s.thermal_paper, PaperSize::Thermal80);
        assert!(s.amount_in_words);
        assert_eq!(s.thermal_printer_addr.as_deref(), Some("192.168.1.50:9100"));

        map.insert("laser_paper_format".to_string(), "58".to_string());
        assert_eq!(
            ReceiptSettings::from_map(&map).unwrap_err().code,
            ErrorCode::ConfigError
        );
    }

    #[test]
    fn test_validate_setting() {
        assert!(validate_setting("currency", "MGA").is_ok());
        assert!(validate_setting("paper_width", "80").is_ok());
        assert!(validate_setting("paper_width", "100").is_err());
        assert!(validate_setting("laser_paper_format", "A4").is_ok());
        assert!(validate_setting("laser_paper_format", "Letter").is_err());
        assert!(validate_setting("receipt_counter", "0").is_err());
        assert!(validate_setting("nonexistent", "x").is_err());
    }
}
