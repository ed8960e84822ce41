pub mod sale_history;
pub mod valuation;

pub use sale_history::{SaleHistory, SaleHistoryEntry};
pub use valuation::ValuationRecord;
