pub mod csv;
pub(crate) mod util;

pub use crate::csv::{
    import_bank_file, import_system_file, read_bank_csv, read_system_csv, CsvError,
};
pub use util::{parse_cents, parse_timestamp};
