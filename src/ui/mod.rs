pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{dim, error, header, info, pair, section, sql, success, summary_row, table_name, warn};
pub use table::{records_table, TableBuilder};
pub use theme::{theme, Theme};
