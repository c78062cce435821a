//! visualcents-ingest: turning raw input (OCR text, OCR responses, keypad
//! expressions, ledger CSV) into transaction candidates.

pub mod csv_import;
pub mod expression;
pub mod ocr;
pub mod receipt;
pub mod types;

pub use csv_import::{parse_ledger_csv, parse_ledger_reader};
pub use expression::{evaluate, parse_amount};
pub use ocr::{OcrCredentials, OcrRequestBuilder, PreparedRequest, decode_response};
pub use receipt::ReceiptExtractor;
pub use types::{ExtractedReceipt, ReceiptField};
