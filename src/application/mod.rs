// Application layer: the ledger that owns records and their store, plus the
// report types it hands out.

pub mod error;
pub mod ledger;
pub mod reporting;

pub use error::*;
pub use ledger::*;
pub use reporting::*;
