//! Receipt sections
//!
//! Turns a receipt and the company profile into the three blocks the
//! paginator works with: header, one block per line item, footer.

use shared::models::{CompanyProfile, LineItem, ReceiptRecord};

use super::error::LayoutResult;
use super::format::{format_amount, format_date, format_quantity};
use super::names::format_client_name;
use super::paginator::Block;
use super::textgrid::{
    char_len, pad_center, separator_line, side_by_side, truncate_with_ellipsis, wrap_fixed,
};
use super::words::amount_in_words;

/// Client contact lines shown in the header, extra lines are dropped
pub const MAX_CONTACT_LINES: usize = 3;

/// Indent of the quantity/price line under the item name
const DETAIL_INDENT: &str = "   ";

/// Receipt-type label is wrapped onto at most this many lines
const MAX_RECEIPT_TYPE_LINES: usize = 2;

/// Lines the amount in words takes in the footer
const WORDS_LINES: usize = 2;

/// Footer height without the amount in words
pub const FOOTER_LINES: usize = 8;

pub const CLIENT_LABEL: &str = "CLIENT";
pub const UNKNOWN_CLIENT: &str = "(Non specifie)";
pub const TOTAL_LABEL: &str = "TOTAL A PAYER";
pub const THANKS_FR: &str = "Merci pour votre achat!";
pub const THANKS_MG: &str = "Mankasitraka Tompoko!";

/// Header, items and footer of one receipt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptSections {
    pub header: Block,
    pub items: Vec<Block>,
    pub footer: Block,
}

/// Builds receipt sections for one page width
pub struct SectionBuilder<'a> {
    company: &'a CompanyProfile,
    width: usize,
    amount_in_words: bool,
}

impl<'a> SectionBuilder<'a> {
    pub fn new(company: &'a CompanyProfile, width: usize) -> Self {
        Self {
            company,
            width,
            amount_in_words: false,
        }
    }

    /// Add the total in words to the footer (two extra lines)
    pub fn with_amount_in_words(mut self, enabled: bool) -> Self {
        self.amount_in_words = enabled;
        self
    }

    /// Footer height for this builder
    pub fn footer_len(&self) -> usize {
        if self.amount_in_words {
            FOOTER_LINES + WORDS_LINES
        } else {
            FOOTER_LINES
        }
    }

    pub fn build(&self, record: &ReceiptRecord) -> LayoutResult<ReceiptSections> {
        let items = record
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| self.item(i, item))
            .collect::<LayoutResult<Vec<_>>>()?;
        Ok(ReceiptSections {
            header: self.header(record)?,
            items,
            footer: self.footer(record)?,
        })
    }

    /// Text cut to the line width, then centered
    fn centered(&self, text: &str) -> LayoutResult<String> {
        Ok(pad_center(&truncate_with_ellipsis(text, self.width)?, self.width))
    }

    fn company_column(&self) -> Vec<String> {
        let c = self.company;
        let mut column = vec![c.name.trim().to_string()];
        let labelled = [
            ("Tel", &c.phone),
            ("NIF", &c.nif),
            ("STAT", &c.stat),
            ("RC", &c.rc),
            ("CE", &c.ce),
            ("CIF", &c.cif),
        ];
        for (label, value) in labelled {
            let value = value.trim();
            if !value.is_empty() {
                column.push(format!("{label}: {value}"));
            }
        }
        if !c.email.trim().is_empty() {
            column.push(c.email.trim().to_string());
        }
        column.extend(c.address_lines().into_iter().map(str::to_string));
        column
    }

    fn client_column(&self, record: &ReceiptRecord) -> Vec<String> {
        let name = format_client_name(&record.client_name, Some(self.width / 2));
        let name = if name.trim().is_empty() {
            UNKNOWN_CLIENT.to_string()
        } else {
            name
        };
        let mut column = vec![CLIENT_LABEL.to_string(), name];
        column.extend(contact_lines(&record.client_contact));
        column
    }

    /// Company on the left, client on the right, then number and date
    pub fn header(&self, record: &ReceiptRecord) -> LayoutResult<Block> {
        let left = self.company_column();
        let right = self.client_column(record);
        let rows = left.len().max(right.len());

        let mut lines = Vec::with_capacity(rows + 6);
        for i in 0..rows {
            let l = left.get(i).map(String::as_str).unwrap_or("");
            let r = right.get(i).map(String::as_str).unwrap_or("");
            lines.push(side_by_side(l, r, self.width));
        }

        lines.push(separator_line(self.width, '-'));
        lines.push(side_by_side(
            &format!("No: {}", record.receipt_number),
            &format!("Date: {}", format_date(&record.date)),
            self.width,
        ));
        let receipt_type = self.company.receipt_type.trim();
        if !receipt_type.is_empty() {
            for line in wrap_fixed(receipt_type, self.width, MAX_RECEIPT_TYPE_LINES)? {
                if !line.is_empty() {
                    lines.push(pad_center(&line, self.width));
                }
            }
        }
        lines.push(separator_line(self.width, '-'));
        Ok(Block::new(lines))
    }

    /// Two lines: `"{n}. {name}"` and the quantity/price/total detail
    pub fn item(&self, index: usize, item: &LineItem) -> LayoutResult<Block> {
        let prefix = format!("{}. ", index + 1);
        let budget = self.width.saturating_sub(prefix.chars().count());
        let name = truncate_with_ellipsis(item.name.trim(), budget)?;

        Ok(Block::new(vec![
            format!("{prefix}{name}"),
            self.detail_line(item)?,
        ]))
    }

    /// `"   {qty} x {unit} {cur} = {total} {cur}"`, narrowed to the width
    ///
    /// The unit currency goes first, then the indent, then the
    /// `{qty} x {unit}` part is cut. The `= {total} {cur}` tail is kept whole.
    fn detail_line(&self, item: &LineItem) -> LayoutResult<String> {
        let currency = self.company.currency.trim();
        let with_currency = |amount: String| {
            if currency.is_empty() {
                amount
            } else {
                format!("{amount} {currency}")
            }
        };
        let qty_unit = format!(
            "{} x {}",
            format_quantity(item.quantity),
            format_amount(item.unit_price)
        );
        let total = with_currency(format_amount(item.total));

        let candidates = [
            format!("{DETAIL_INDENT}{} = {total}", with_currency(qty_unit.clone())),
            format!("{DETAIL_INDENT}{qty_unit} = {total}"),
            format!("{qty_unit} = {total}"),
        ];
        if let Some(line) = candidates.into_iter().find(|l| char_len(l) <= self.width) {
            return Ok(line);
        }

        let tail = format!(" = {total}");
        let budget = self.width.saturating_sub(char_len(&tail));
        if budget >= 4 {
            return Ok(format!("{}{tail}", truncate_with_ellipsis(&qty_unit, budget)?));
        }
        if char_len(&total) <= self.width {
            return Ok(total);
        }
        Ok(truncate_with_ellipsis(&format_amount(item.total), self.width)?)
    }

    /// Fixed-height footer: total, optional words, payment, thanks
    pub fn footer(&self, record: &ReceiptRecord) -> LayoutResult<Block> {
        let currency = self.company.currency.trim();
        let mut lines = vec![
            separator_line(self.width, '='),
            self.centered(TOTAL_LABEL)?,
            self.centered(&format!("{} {}", format_amount(record.total), currency))?,
        ];
        if self.amount_in_words {
            let words = amount_in_words(record.total, currency);
            for line in wrap_fixed(&words, self.width, WORDS_LINES)? {
                lines.push(pad_center(&line, self.width));
            }
        }
        lines.push(String::new());
        lines.push(self.centered(&format!("Paiement: {}", record.payment_method.trim()))?);
        lines.push(separator_line(self.width, '-'));
        lines.push(self.centered(THANKS_FR)?);
        lines.push(self.centered(THANKS_MG)?);

        debug_assert_eq!(lines.len(), self.footer_len());
        Ok(Block::new(lines))
    }
}

/// Client contact split on line breaks, trimmed, blanks dropped, capped
pub fn contact_lines(contact: &str) -> Vec<String> {
    contact
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(MAX_CONTACT_LINES)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::ReceiptSettings;

    fn company() -> CompanyProfile {
        ReceiptSettings::defaults().unwrap().company
    }

    fn record(items: usize) -> ReceiptRecord {
        let items: Vec<LineItem> = (0..items)
            .map(|i| LineItem::new(format!("Article {i}"), Decimal::from(2), Decimal::from(1500)).unwrap())
            .collect();
        let total = items.iter().map(|i| i.total).sum();
        ReceiptRecord {
            receipt_number: "FACT-00042".to_string(),
            date: "2025-06-03".to_string(),
            client_name: "rakoto jean paul".to_string(),
            client_contact: "034 11 222 33\n\n  Lot II A 45  \nAnalakely\nAntananarivo".to_string(),
            items,
            total,
            payment_method: "Espèces".to_string(),
            notes: String::new(),
            created_at: 0,
        }
    }

    #[test]
    fn test_contact_lines_capped() {
        assert_eq!(
            contact_lines("a\n\n b \nc\nd"),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert!(contact_lines("  \n ").is_empty());
    }

    #[test]
    fn test_header_layout() {
        let company = company();
        let builder = SectionBuilder::new(&company, 48);
        let header = builder.header(&record(1)).unwrap();
        let lines = header.lines();

        assert!(lines.iter().all(|l| l.chars().count() == 48));
        assert!(lines[0].starts_with("COMPTOIR FIDAHOUSSEN"));
        assert!(lines[0].ends_with("CLIENT"));
        assert!(lines[1].starts_with("Tel: 020 76 231 43"));
        assert!(lines[1].ends_with("RAKOTO Jean P."));
        assert!(lines[2].ends_with("034 11 222 33"));
        assert!(lines[3].ends_with("Lot II A 45"));
        assert!(lines[4].ends_with("Analakely"));
        // the fourth contact line is dropped
        assert!(!lines.iter().any(|l| l.contains("Antananarivo ")));
        assert!(lines.iter().any(|l| l.starts_with("No: FACT-00042") && l.ends_with("Date: 03/06/2025")));
        assert_eq!(lines.last().unwrap(), &"-".repeat(48));
    }

    #[test]
    fn test_header_without_client() {
        let company = company();
        let mut r = record(0);
        r.client_name = "  ".to_string();
        r.client_contact.clear();
        r.date = "hier".to_string();
        let header = SectionBuilder::new(&company, 32).header(&r).unwrap();
        assert!(header.lines()[1].ends_with(UNKNOWN_CLIENT));
        assert!(header.lines().iter().any(|l| l.ends_with("Date: hier")));
    }

    #[test]
    fn test_item_block() {
        let company = company();
        let builder = SectionBuilder::new(&company, 32);
        let item = LineItem::new(
            "Huile de palme raffinée bidon de 20 litres",
            Decimal::new(15, 1),
            Decimal::from(125000),
        )
        .unwrap();
        let block = builder.item(8, &item).unwrap();
        assert_eq!(block.len(), 2);
        assert_eq!(block.lines()[0].chars().count(), 32);
        assert!(block.lines()[0].starts_with("9. Huile de palme"));
        assert!(block.lines()[0].ends_with("..."));
        assert_eq!(block.lines()[1], "   1.5 x 125,000 Ar = 187,500 Ar");
    }

    #[test]
    fn test_item_detail_keeps_total_on_narrow_paper() {
        let company = company();
        let builder = SectionBuilder::new(&company, 32);

        let ciment = LineItem::new("Ciment", Decimal::from(10), Decimal::from(125000)).unwrap();
        let block = builder.item(0, &ciment).unwrap();
        assert_eq!(block.lines()[1], "   10 x 125,000 = 1,250,000 Ar");

        let tole = LineItem::new("Tole", Decimal::new(25, 1), Decimal::from(1234567)).unwrap();
        let block = builder.item(1, &tole).unwrap();
        assert_eq!(block.lines()[1], "2.5 x 1,234,567 = 3,086,418 Ar");

        let narrow = SectionBuilder::new(&company, 24);
        let line = narrow.item(1, &tole).unwrap().lines()[1].clone();
        assert_eq!(line, "2.5 x ... = 3,086,418 Ar");
        assert_eq!(line.chars().count(), 24);
    }

    #[test]
    fn test_item_detail_never_wider_than_paper() {
        let company = company();
        for width in [20, 24, 32, 48] {
            let builder = SectionBuilder::new(&company, width);
            let item = LineItem::new("Fer a beton", Decimal::new(12345, 2), Decimal::from(98765432))
                .unwrap();
            let line = builder.item(0, &item).unwrap().lines()[1].clone();
            assert!(line.chars().count() <= width, "{width}: {line:?}");
            assert!(line.contains(&format_amount(item.total)), "{width}: {line:?}");
        }
    }

    #[test]
    fn test_footer_fixed_height() {
        let company = company();
        let r = record(3);
        let plain = SectionBuilder::new(&company, 32).footer(&r).unwrap();
        assert_eq!(plain.len(), FOOTER_LINES);
        assert_eq!(plain.lines()[1].trim(), TOTAL_LABEL);
        assert_eq!(plain.lines()[2].trim(), "9,000 Ar");
        assert_eq!(plain.lines()[4].trim(), "Paiement: Espèces");
        assert_eq!(plain.lines()[7].trim(), THANKS_MG);

        let builder = SectionBuilder::new(&company, 32).with_amount_in_words(true);
        let words = builder.footer(&r).unwrap();
        assert_eq!(words.len(), builder.footer_len());
        assert_eq!(words.lines()[3].trim(), "Neuf mille Ariary");
        assert_eq!(words.lines()[4].trim(), "");
    }

    #[test]
    fn test_build_keeps_item_order() {
        let company = company();
        let sections = SectionBuilder::new(&company, 40).build(&record(5)).unwrap();
        assert_eq!(sections.items.len(), 5);
        for (i, block) in sections.items.iter().enumerate() {
            assert!(block.lines()[0].starts_with(&format!("{}. Article {}", i + 1, i)));
        }
    }
}
