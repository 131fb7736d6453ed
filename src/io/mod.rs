//! I/O module
//!
//! Handles persisted JSON state, batch CSV input and console output.
//!
//! # Components
//!
//! - `json_format` - JSON load/save helpers and the rate table loader
//! - `file_store` - JSON-file backed balance, history and audit stores
//! - `csv_format` - CSV format handling (request conversion, balance output)
//! - `sync_reader` - Synchronous CSV reader with iterator interface
//! - `async_reader` - Asynchronous CSV reader with batch reading interface
//! - `console` - Conversion summary for the terminal

pub mod async_reader;
pub mod console;
pub mod csv_format;
pub mod file_store;
pub mod json_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{convert_csv_request, write_balances_csv, CsvRequest};
pub use file_store::{DataPaths, JsonBalanceFile, JsonLogFile};
pub use json_format::{
    load_json, load_json_if_present, load_json_or_default, load_rate_table, save_json,
};
pub use sync_reader::SyncReader;
