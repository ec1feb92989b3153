mod risk_scanner;

pub use risk_scanner::{RiskScanner, ScanOutcome};
