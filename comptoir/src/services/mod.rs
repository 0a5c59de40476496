pub mod receipt;

pub use receipt::{
    Artifact, Delivery, DeliveryStatus, IssueOutcome, PrinterKind, ReceiptService, print_error,
    sample_record,
};
