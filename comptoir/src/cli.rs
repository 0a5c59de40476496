//! Command line interface

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use shared::models::{PaperSize, ReceiptDraft};

use crate::printing::format::format_amount;
use crate::services::{Artifact, Delivery, DeliveryStatus, PrinterKind, ReceiptService};
use crate::utils::time::format_millis;

#[derive(Parser, Debug)]
#[command(name = "comptoir")]
#[command(about = "Point-of-sale receipts: issue, print and export", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database directory
    #[arg(long, global = true, env = "COMPTOIR_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// PDF export directory
    #[arg(long, global = true, env = "COMPTOIR_EXPORT_DIR")]
    pub export_dir: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save a new receipt and deliver it
    Issue {
        /// Line item as NAME:QUANTITY:UNIT_PRICE (repeatable)
        #[arg(short, long = "item", required = true, value_parser = parse_item)]
        items: Vec<ItemArg>,

        /// Client name
        #[arg(short, long, default_value = "")]
        client: String,

        /// Client contact, `\n` separates lines
        #[arg(long, default_value = "")]
        contact: String,

        /// Payment method
        #[arg(short, long)]
        payment: Option<String>,

        #[arg(long, default_value = "")]
        notes: String,

        #[arg(short, long, value_enum, default_value = "pdf")]
        delivery: Delivery,
    },

    /// Show a stored receipt laid out as text
    Preview {
        number: String,

        /// Paper to lay out for (58, 80, A6, A5, A4); thermal paper by default
        #[arg(long)]
        paper: Option<PaperSize>,
    },

    /// Deliver a stored receipt again
    Reprint {
        number: String,

        #[arg(short, long, value_enum, default_value = "pdf")]
        delivery: Delivery,
    },

    /// Receipt history
    #[command(subcommand)]
    Receipts(ReceiptCommands),

    /// Product catalogue
    #[command(subcommand)]
    Products(ProductCommands),

    /// Business settings
    #[command(subcommand)]
    Settings(SettingCommands),

    /// Sales statistics and best sellers
    Stats {
        /// Number of best sellers shown
        #[arg(long, default_value_t = 10)]
        top: usize,
    },

    /// Printer checks
    #[command(subcommand)]
    Printer(PrinterCommands),

    /// Delete all receipts and products (settings are kept)
    Clear {
        /// Required confirmation
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ReceiptCommands {
    /// List receipts, newest first
    #[command(alias = "ls")]
    List {
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Search by receipt number or client name
    Search { query: String },
    /// Show one receipt in full
    Show { number: String },
    /// Delete one receipt
    #[command(alias = "rm")]
    Delete { number: String },
    /// Write a new PDF for a stored receipt
    Pdf { number: String },
}

#[derive(Subcommand, Debug)]
pub enum ProductCommands {
    /// List products, most used first
    #[command(alias = "ls")]
    List,
    /// Search products by name
    Search { query: String },
    /// Remove a product from the catalogue
    #[command(alias = "rm")]
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
pub enum SettingCommands {
    /// List all settings
    #[command(alias = "ls")]
    List,
    /// Print one setting
    Get { key: String },
    /// Change one setting
    Set { key: String, value: String },
}

#[derive(Subcommand, Debug)]
pub enum PrinterCommands {
    /// Check that the printer answers
    Check {
        #[arg(value_enum)]
        kind: PrinterKind,
    },
    /// Print the sample receipt
    Test {
        #[arg(value_enum)]
        kind: PrinterKind,
    },
}

/// `NAME:QUANTITY:UNIT_PRICE` from the command line
#[derive(Debug, Clone, PartialEq)]
pub struct ItemArg {
    pub name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

/// Parse `NAME:QUANTITY:UNIT_PRICE`; the name may itself contain `:`
pub fn parse_item(raw: &str) -> Result<ItemArg, String> {
    let mut parts = raw.rsplitn(3, ':');
    let (Some(price), Some(qty), Some(name)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected NAME:QUANTITY:UNIT_PRICE, got {raw:?}"));
    };
    let quantity = qty
        .trim()
        .replace(',', ".")
        .parse::<Decimal>()
        .map_err(|e| format!("invalid quantity {qty:?}: {e}"))?;
    let unit_price = price
        .trim()
        .parse::<Decimal>()
        .map_err(|e| format!("invalid unit price {price:?}: {e}"))?;
    Ok(ItemArg {
        name: name.trim().to_string(),
        quantity,
        unit_price,
    })
}

fn describe(artifact: &Artifact) -> String {
    match artifact {
        Artifact::PdfFile(path) => format!("PDF written to {}", path.display()),
        Artifact::Printed { destination, pages } => {
            format!("{pages} page(s) sent to {destination}")
        }
    }
}

/// Execute one command
pub async fn run(command: Commands, service: &ReceiptService) -> anyhow::Result<()> {
    let storage = service.storage();
    match command {
        Commands::Issue {
            items,
            client,
            contact,
            payment,
            notes,
            delivery,
        } => {
            let settings = service.settings()?;
            let mut draft = ReceiptDraft::new()
                .client(client, contact.replace("\\n", "\n"))
                .notes(notes);
            if let Some(payment) = payment {
                draft = draft.payment_method(payment);
            }
            for item in items {
                draft.add_item(item.name, item.quantity, item.unit_price)?;
            }

            let outcome = service.issue(draft, delivery, &settings).await?;
            let cur = &settings.company.currency;
            println!(
                "{} saved, total {} {}",
                outcome.record.receipt_number,
                format_amount(outcome.record.total),
                cur
            );
            match outcome.delivery {
                DeliveryStatus::Delivered(artifact) => println!("{}", describe(&artifact)),
                DeliveryStatus::Skipped => {}
                DeliveryStatus::Failed(e) => {
                    eprintln!("Receipt saved but not delivered: {e}");
                    if let Some(d) = e.diagnostic() {
                        eprintln!("  {d}");
                    }
                    bail!("delivery failed, retry with `comptoir reprint {}`", outcome.record.receipt_number);
                }
            }
        }

        Commands::Preview { number, paper } => {
            let settings = service.settings()?;
            print!("{}", service.preview(&number, paper, &settings)?);
        }

        Commands::Reprint { number, delivery } => {
            let settings = service.settings()?;
            if let Some(artifact) = service.reprint(&number, delivery, &settings).await? {
                println!("{}", describe(&artifact));
            }
        }

        Commands::Receipts(cmd) => match cmd {
            ReceiptCommands::List { limit } => {
                for r in storage.list_receipts(limit)? {
                    println!(
                        "{:<12} {:<10} {:>12}  {}  ({})",
                        r.receipt_number,
                        r.date,
                        format_amount(r.total),
                        r.client_name,
                        format_millis(r.created_at)
                    );
                }
            }
            ReceiptCommands::Search { query } => {
                for r in storage.search_receipts(&query)? {
                    println!(
                        "{:<12} {:<10} {:>12}  {}",
                        r.receipt_number,
                        r.date,
                        format_amount(r.total),
                        r.client_name
                    );
                }
            }
            ReceiptCommands::Show { number } => {
                let record = storage.require_receipt(&number)?;
                println!("{}", serde_json::to_string_pretty(&record)?);
            }
            ReceiptCommands::Delete { number } => {
                storage.delete_receipt(&number)?;
                println!("{number} deleted");
            }
            ReceiptCommands::Pdf { number } => {
                let settings = service.settings()?;
                let path = service.regenerate_pdf(&number, &settings)?;
                println!("PDF written to {}", path.display());
            }
        },

        Commands::Products(cmd) => match cmd {
            ProductCommands::List => {
                for p in storage.list_products()? {
                    println!("{:<40} {:>10} x{}", p.name, format_amount(p.unit_price), p.count);
                }
            }
            ProductCommands::Search { query } => {
                for p in storage.search_products(&query)? {
                    println!("{:<40} {:>10} x{}", p.name, format_amount(p.unit_price), p.count);
                }
            }
            ProductCommands::Delete { name } => {
                storage.delete_product(&name)?;
                println!("{name} deleted");
            }
        },

        Commands::Settings(cmd) => match cmd {
            SettingCommands::List => {
                let mut all: Vec<_> = storage.all_settings()?.into_iter().collect();
                all.sort();
                for (key, value) in all {
                    println!("{key} = {value:?}");
                }
            }
            SettingCommands::Get { key } => {
                let value = storage
                    .get_setting(&key)?
                    .with_context(|| format!("unknown setting {key:?}"))?;
                println!("{value}");
            }
            SettingCommands::Set { key, value } => {
                storage.set_setting(&key, &value.replace("\\n", "\n"))?;
                println!("{key} updated");
            }
        },

        Commands::Stats { top } => {
            let settings = service.settings()?;
            let cur = &settings.company.currency;
            let stats = storage.statistics()?;
            println!("Receipts:        {}", stats.total_receipts);
            println!("Total sales:     {} {cur}", format_amount(stats.total_sales));
            println!("Average sale:    {} {cur}", format_amount(stats.average_sale));
            println!("Unique products: {}", stats.unique_products);
            let best = storage.top_products(top)?;
            if !best.is_empty() {
                println!();
                for (i, p) in best.iter().enumerate() {
                    println!(
                        "{:>2}. {:<40} {:>12} {cur}  ({} sales)",
                        i + 1,
                        p.name,
                        format_amount(p.total_sold),
                        p.count
                    );
                }
            }
        }

        Commands::Printer(cmd) => {
            let settings = service.settings()?;
            match cmd {
                PrinterCommands::Check { kind } => {
                    if service.check_printer(kind, &settings).await? {
                        println!("{kind:?} printer is online");
                    } else {
                        bail!("{kind:?} printer is not reachable");
                    }
                }
                PrinterCommands::Test { kind } => {
                    let artifact = service.test_print(kind, &settings).await?;
                    println!("{}", describe(&artifact));
                }
            }
        }

        Commands::Clear { yes } => {
            if !yes {
                bail!("refusing to delete all receipts and products without --yes");
            }
            let receipts = storage.clear_receipts()?;
            let products = storage.clear_products()?;
            println!("{receipts} receipt(s) and {products} product(s) deleted");
        }
    }
    Ok(())
}
