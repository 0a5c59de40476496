//! Receipt service
//!
//! Ties storage, layout and the printer transports together. A receipt is
//! always saved before any delivery is attempted, so a failed print never
//! loses a sale: the outcome says "saved but not delivered" instead.

use std::path::PathBuf;
use std::time::Duration;

use comptoir_printer::{AnyPrinter, NetworkPrinter, PrintError, Printer, SpoolPrinter};
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::settings::keys;
use shared::models::{PaperSize, ReceiptDraft, ReceiptRecord, ReceiptSettings};
use tracing::{info, instrument, warn};

use crate::db::ReceiptStorage;
use crate::printing::{
    EscPosRenderer, Page, PageRenderer, PdfRenderer, TextRenderer, layout_receipt,
};
use crate::utils::time::{file_stamp, now_millis, today};

/// Number printed on the test ticket
pub const TEST_RECEIPT_NUMBER: &str = "TEST-00001";

/// Where an issued receipt goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Delivery {
    /// PDF file in the export directory
    Pdf,
    /// ESC/POS ticket on the thermal printer
    Thermal,
    /// Plain text job on the laser printer queue
    Laser,
    /// Save only
    None,
}

/// Printer targeted by checks and test prints
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PrinterKind {
    Thermal,
    Laser,
}

/// What a successful delivery produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    PdfFile(PathBuf),
    Printed { destination: String, pages: usize },
}

#[derive(Debug)]
pub enum DeliveryStatus {
    Delivered(Artifact),
    /// Receipt is saved, delivery failed and can be retried with a reprint
    Failed(AppError),
    Skipped,
}

/// Result of issuing a receipt that was saved
#[derive(Debug)]
pub struct IssueOutcome {
    pub record: ReceiptRecord,
    pub delivery: DeliveryStatus,
}

/// Map a transport failure onto the unified error
pub fn print_error(err: PrintError) -> AppError {
    let message = err.to_string();
    let diagnostic = err.diagnostic().map(str::to_string);
    let app = match err {
        PrintError::Timeout(_) => AppError::with_message(ErrorCode::PrintTimeout, message),
        PrintError::SpoolerUnavailable(_) => {
            AppError::with_message(ErrorCode::SpoolerUnavailable, message)
        }
        PrintError::PrinterNotFound(name) => {
            AppError::with_message(ErrorCode::PrinterNotFound, message).with_detail("printer", name)
        }
        PrintError::Connection(_) => {
            AppError::with_message(ErrorCode::PrinterNotAvailable, message)
        }
        PrintError::InvalidConfig(_) => AppError::config(message),
        PrintError::Spooler { status, .. } => {
            let app = AppError::with_message(ErrorCode::PrintFailed, message);
            match status {
                Some(code) => app.with_detail("exit_status", code),
                None => app,
            }
        }
        PrintError::Io(_) => AppError::with_message(ErrorCode::PrintFailed, message),
    };
    match diagnostic {
        Some(d) => app.with_diagnostic(d),
        None => app,
    }
}

/// Fixed receipt used by test prints, never saved
pub fn sample_record() -> AppResult<ReceiptRecord> {
    let mut draft = ReceiptDraft::new()
        .client("Client Test", "034 00 000 00")
        .notes("Impression de test");
    draft.add_item("Article de test", Decimal::ONE, Decimal::from(1000))?;
    draft.add_item("Deuxieme article", Decimal::new(25, 1), Decimal::from(2000))?;
    draft.add_item("Troisieme article", Decimal::from(3), Decimal::from(1500))?;
    draft.into_record(TEST_RECEIPT_NUMBER, today(), now_millis())
}

/// Receipt workflows over one storage and the configured printers
pub struct ReceiptService {
    storage: ReceiptStorage,
    export_dir: PathBuf,
    print_timeout: Duration,
    thermal: Option<AnyPrinter>,
    laser: Option<AnyPrinter>,
}

impl ReceiptService {
    pub fn new(storage: ReceiptStorage, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage,
            export_dir: export_dir.into(),
            print_timeout: Duration::from_secs(10),
            thermal: None,
            laser: None,
        }
    }

    pub fn with_print_timeout(mut self, timeout: Duration) -> Self {
        self.print_timeout = timeout;
        self
    }

    /// Use this printer for thermal jobs instead of `thermal_printer_addr`
    pub fn with_thermal_printer(mut self, printer: AnyPrinter) -> Self {
        self.thermal = Some(printer);
        self
    }

    /// Use this printer for laser jobs instead of `laser_printer_name`
    pub fn with_laser_printer(mut self, printer: AnyPrinter) -> Self {
        self.laser = Some(printer);
        self
    }

    pub fn storage(&self) -> &ReceiptStorage {
        &self.storage
    }

    /// Current business settings, typed
    pub fn settings(&self) -> AppResult<ReceiptSettings> {
        let map = self.storage.all_settings()?;
        ReceiptSettings::from_map(&map)
    }

    /// Save a new receipt, then deliver it
    ///
    /// `Err` means nothing was saved. Once saved, delivery problems are
    /// reported through [`IssueOutcome::delivery`].
    #[instrument(skip(self, draft, settings), fields(items = draft.items.len()))]
    pub async fn issue(
        &self,
        draft: ReceiptDraft,
        delivery: Delivery,
        settings: &ReceiptSettings,
    ) -> AppResult<IssueOutcome> {
        draft.validate()?;
        let now = now_millis();
        let date = today();
        let record = self
            .storage
            .create_receipt(now, |number| draft.into_record(number, date, now))?;

        let delivery = match delivery {
            Delivery::None => DeliveryStatus::Skipped,
            target => match self.deliver(&record, target, settings).await {
                Ok(artifact) => DeliveryStatus::Delivered(artifact),
                Err(e) => {
                    warn!(
                        receipt_number = %record.receipt_number,
                        error = %e,
                        "Receipt saved but not delivered"
                    );
                    DeliveryStatus::Failed(e)
                }
            },
        };
        Ok(IssueOutcome { record, delivery })
    }

    /// Deliver a stored receipt again
    #[instrument(skip(self, settings))]
    pub async fn reprint(
        &self,
        number: &str,
        delivery: Delivery,
        settings: &ReceiptSettings,
    ) -> AppResult<Option<Artifact>> {
        let record = self.storage.require_receipt(number)?;
        record.validate()?;
        match delivery {
            Delivery::None => Ok(None),
            target => self.deliver(&record, target, settings).await.map(Some),
        }
    }

    /// Write a fresh PDF for a stored receipt
    pub fn regenerate_pdf(&self, number: &str, settings: &ReceiptSettings) -> AppResult<PathBuf> {
        let record = self.storage.require_receipt(number)?;
        record.validate()?;
        self.export_pdf(&record, settings, Some("regenere"))
    }

    /// Text rendering of a stored receipt, pages separated by a form feed
    ///
    /// Uses the thermal geometry unless `paper` is given.
    pub fn preview(
        &self,
        number: &str,
        paper: Option<PaperSize>,
        settings: &ReceiptSettings,
    ) -> AppResult<String> {
        let record = self.storage.require_receipt(number)?;
        record.validate()?;
        let paper = paper.unwrap_or(settings.thermal_paper);
        let pages = Self::layout(&record, paper, settings)?;
        Ok(TextRenderer::trimmed().render_string(&pages))
    }

    /// Whether the printer answers
    pub async fn check_printer(&self, kind: PrinterKind, settings: &ReceiptSettings) -> AppResult<bool> {
        let printer = match kind {
            PrinterKind::Thermal => self.thermal_printer(settings)?,
            PrinterKind::Laser => self.laser_printer(settings)?,
        };
        let online = printer.is_online().await;
        info!(destination = %printer.destination(), online, "Printer checked");
        Ok(online)
    }

    /// Print the fixed sample receipt
    pub async fn test_print(&self, kind: PrinterKind, settings: &ReceiptSettings) -> AppResult<Artifact> {
        let record = sample_record()?;
        let target = match kind {
            PrinterKind::Thermal => Delivery::Thermal,
            PrinterKind::Laser => Delivery::Laser,
        };
        self.deliver(&record, target, settings).await
    }

    fn layout(record: &ReceiptRecord, paper: PaperSize, settings: &ReceiptSettings) -> AppResult<Vec<Page>> {
        let geometry = paper.geometry();
        let pages = layout_receipt(record, &settings.company, &geometry, settings.amount_in_words)?;
        Ok(pages)
    }

    async fn deliver(
        &self,
        record: &ReceiptRecord,
        delivery: Delivery,
        settings: &ReceiptSettings,
    ) -> AppResult<Artifact> {
        match delivery {
            Delivery::Pdf => self.export_pdf(record, settings, None).map(Artifact::PdfFile),
            Delivery::Thermal => {
                let paper = settings.thermal_paper;
                let pages = Self::layout(record, paper, settings)?;
                let data = EscPosRenderer::new().render(&pages);
                let printer = self.thermal_printer(settings)?;
                self.send(&printer, &data, pages.len()).await
            }
            Delivery::Laser => {
                let pages = Self::layout(record, settings.laser_paper, settings)?;
                let data = TextRenderer::new().render(&pages);
                let printer = self.laser_printer(settings)?;
                self.send(&printer, &data, pages.len()).await
            }
            Delivery::None => Err(AppError::invalid_request("no delivery target")),
        }
    }

    async fn send(&self, printer: &AnyPrinter, data: &[u8], pages: usize) -> AppResult<Artifact> {
        let destination = printer.destination();
        printer.print(data).await.map_err(|e| {
            print_error(e).with_detail("destination", destination.clone())
        })?;
        info!(destination = %destination, pages, "Receipt printed");
        Ok(Artifact::Printed { destination, pages })
    }

    fn export_pdf(
        &self,
        record: &ReceiptRecord,
        settings: &ReceiptSettings,
        tag: Option<&str>,
    ) -> AppResult<PathBuf> {
        let paper = settings.laser_paper;
        let pages = Self::layout(record, paper, settings)?;
        let bytes = PdfRenderer::new(paper).render(&pages);

        std::fs::create_dir_all(&self.export_dir)?;
        let file_name = match tag {
            Some(tag) => format!("{}_{}_{}.pdf", record.receipt_number, tag, file_stamp()),
            None => format!("{}_{}.pdf", record.receipt_number, file_stamp()),
        };
        let path = self.export_dir.join(file_name);
        std::fs::write(&path, bytes)?;
        info!(path = %path.display(), pages = pages.len(), "PDF exported");
        Ok(path)
    }

    /// Injected printer, else one built from `thermal_printer_addr`
    ///
    /// An address (`ip` or `ip:port`) selects raw TCP; anything else is
    /// taken as a spooler queue fed raw ESC/POS bytes.
    fn thermal_printer(&self, settings: &ReceiptSettings) -> AppResult<AnyPrinter> {
        if let Some(printer) = &self.thermal {
            return Ok(printer.clone());
        }
        let addr = settings.thermal_printer_addr.as_deref().ok_or_else(|| {
            AppError::config("thermal printer not configured")
                .with_detail("key", keys::THERMAL_PRINTER_ADDR)
        })?;
        if let Ok(printer) = NetworkPrinter::from_addr(addr) {
            return Ok(AnyPrinter::Network(printer.with_timeout(self.print_timeout)));
        }
        let printer = SpoolPrinter::new(addr)
            .map_err(print_error)?
            .raw()
            .with_timeout(self.print_timeout);
        Ok(AnyPrinter::Spool(printer))
    }

    /// Injected printer, else the `laser_printer_name` spooler queue
    fn laser_printer(&self, settings: &ReceiptSettings) -> AppResult<AnyPrinter> {
        if let Some(printer) = &self.laser {
            return Ok(printer.clone());
        }
        let paper = settings.laser_paper;
        let printer = SpoolPrinter::new(&settings.laser_printer_name)
            .map_err(|e| print_error(e).with_detail("key", keys::LASER_PRINTER_NAME))?
            .with_option("media", paper.media_name())
            .with_option("cpi", format!("{:.2}", paper.characters_per_inch()))
            .with_option("lpi", format!("{:.2}", paper.lines_per_inch()))
            .with_timeout(self.print_timeout);
        Ok(AnyPrinter::Spool(printer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> (ReceiptService, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let storage = ReceiptStorage::open_in_memory().unwrap();
        (ReceiptService::new(storage, tmp.path().join("receipts")), tmp)
    }

    fn draft() -> ReceiptDraft {
        let mut d = ReceiptDraft::new().client("EPP Ambohipo", "");
        d.add_item("Cahier 100 pages", Decimal::from(10), Decimal::from(1200)).unwrap();
        d
    }

    #[test]
    fn test_print_error_mapping() {
        let e = print_error(PrintError::Spooler {
            status: Some(1),
            stderr: "lp: Error - scheduler not responding".into(),
        });
        assert_eq!(e.code, ErrorCode::PrintFailed);
        assert_eq!(e.diagnostic(), Some("lp: Error - scheduler not responding"));

        assert_eq!(print_error(PrintError::Timeout("x".into())).code, ErrorCode::PrintTimeout);
        assert_eq!(
            print_error(PrintError::SpoolerUnavailable("lp".into())).code,
            ErrorCode::SpoolerUnavailable
        );
        assert_eq!(
            print_error(PrintError::PrinterNotFound("HP".into())).code,
            ErrorCode::PrinterNotFound
        );
    }

    #[test]
    fn test_sample_record_is_valid() {
        let r = sample_record().unwrap();
        assert_eq!(r.receipt_number, TEST_RECEIPT_NUMBER);
        assert_eq!(r.items.len(), 3);
        assert_eq!(r.total, Decimal::from(10500));
    }

    #[tokio::test]
    async fn test_issue_pdf() {
        let (service, _tmp) = service();
        let settings = service.settings().unwrap();
        let outcome = service.issue(draft(), Delivery::Pdf, &settings).await.unwrap();

        assert_eq!(outcome.record.receipt_number, "FACT-00001");
        match outcome.delivery {
            DeliveryStatus::Delivered(Artifact::PdfFile(path)) => {
                let name = path.file_name().unwrap().to_string_lossy().into_owned();
                assert!(name.starts_with("FACT-00001_"), "{name}");
                assert!(name.ends_with(".pdf"));
                let bytes = std::fs::read(&path).unwrap();
                assert!(bytes.starts_with(b"%PDF"));
            }
            other => panic!("unexpected delivery: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_issue_saves_even_when_printer_missing() {
        let (service, _tmp) = service();
        let settings = service.settings().unwrap();
        let outcome = service.issue(draft(), Delivery::Thermal, &settings).await.unwrap();

        match outcome.delivery {
            DeliveryStatus::Failed(e) => assert_eq!(e.code, ErrorCode::ConfigError),
            other => panic!("unexpected delivery: {other:?}"),
        }
        assert!(service.storage().get_receipt("FACT-00001").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_issue_empty_draft_not_saved() {
        let (service, _tmp) = service();
        let settings = service.settings().unwrap();
        let err = service
            .issue(ReceiptDraft::new(), Delivery::None, &settings)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ReceiptEmpty);
        assert_eq!(service.storage().next_receipt_number().unwrap(), "FACT-00001");
    }

    #[tokio::test]
    async fn test_regenerate_and_preview() {
        let (service, _tmp) = service();
        let settings = service.settings().unwrap();
        service.issue(draft(), Delivery::None, &settings).await.unwrap();

        let path = service.regenerate_pdf("FACT-00001", &settings).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("FACT-00001_regenere_"), "{name}");

        let text = service.preview("FACT-00001", None, &settings).unwrap();
        assert!(text.contains("1. Cahier 100 pages"));
        assert!(text.contains("TOTAL A PAYER"));
        assert!(text.lines().all(|l| l.chars().count() <= 32));

        let err = service.preview("FACT-09999", None, &settings).unwrap_err();
        assert_eq!(err.code, ErrorCode::ReceiptNotFound);
    }

    #[test]
    fn test_laser_printer_options() {
        let (service, _tmp) = service();
        let settings = service.settings().unwrap();
        match service.laser_printer(&settings).unwrap() {
            AnyPrinter::Spool(p) => {
                let args = p.submit_args();
                assert_eq!(&args[..2], &["-d".to_string(), "HP_LaserJet_1022n".to_string()]);
                assert!(args.contains(&"media=A6".to_string()));
                assert!(args.iter().any(|a| a.starts_with("cpi=")));
                assert!(args.iter().any(|a| a.starts_with("lpi=")));
            }
            other => panic!("unexpected printer: {other:?}"),
        }
    }

    #[test]
    fn test_thermal_printer_from_settings() {
        let (service, _tmp) = service();
        let mut settings = service.settings().unwrap();

        settings.thermal_printer_addr = Some("192.168.1.50".into());
        match service.thermal_printer(&settings).unwrap() {
            AnyPrinter::Network(p) => assert_eq!(p.addr().port(), 9100),
            other => panic!("unexpected printer: {other:?}"),
        }

        settings.thermal_printer_addr = Some("POS58".into());
        match service.thermal_printer(&settings).unwrap() {
            AnyPrinter::Spool(p) => assert!(p.submit_args().contains(&"raw".to_string())),
            other => panic!("unexpected printer: {other:?}"),
        }
    }
}
