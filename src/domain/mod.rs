mod money;
mod record;
mod totals;

pub use money::*;
pub use record::*;
pub use totals::*;
