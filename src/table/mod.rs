//! Tabular side: area aggregation, ratio join, CSV export.

mod area;
mod io;

pub use area::{area_by_key, join_ratio};
pub use io::write_csv;
