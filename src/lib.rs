//! `rust-data-io` reads and writes common data files by extension, returning
//! [`serde_json::Value`]s, and filters directory listings by extension or pattern.
//!
//! The primary entrypoint is [`read::read_data_sync`] (or its async form [`read::read_data`]),
//! which discerns the parser from the file extension. A parser can be forced through
//! [`read::ReadOptions::parser`].
//!
//! ## Formats
//!
//! **Read and write (discerned by extension):**
//!
//! - **Delimited text**: `.csv`, `.tsv`, `.psv`, or any single-character delimiter via
//!   [`format::ParserOverride::Delimiter`]
//! - **JSON**: `.json`, `.geojson`, `.topojson`
//! - **YAML**: `.yaml`, `.yml`
//! - **Text**: `.txt`, and the fallback for unrecognized or missing extensions
//!
//! **Read only:** ArchieML (`.aml`).
//!
//! Delimited files parse to an array of objects keyed by header, with every cell a string.
//!
//! ## Quick examples: read data
//!
//! ```no_run
//! use rust_data_io::read::{read_data_sync, ReadOptions};
//!
//! # fn main() -> Result<(), rust_data_io::DataIoError> {
//! // Auto-detects by extension (.csv/.json/.yaml/.aml/...).
//! let rows = read_data_sync("data.csv", ReadOptions::default())?;
//! println!("rows={}", rows.as_array().map_or(0, |r| r.len()));
//! # Ok(())
//! # }
//! ```
//!
//! A row transform runs once per delimited row; returning `null` drops the row:
//!
//! ```no_run
//! use rust_data_io::read::read_csv_sync;
//! use rust_data_io::transform::Transform;
//! use rust_data_io::Value;
//!
//! # fn main() -> Result<(), rust_data_io::DataIoError> {
//! let tall = read_csv_sync(
//!     "people.csv",
//!     Transform::row(|row, _idx, _cols| {
//!         let height: i64 = row["height"].as_str().unwrap_or("0").parse().unwrap_or(0);
//!         Ok(if height > 65 { Value::Object(row) } else { Value::Null })
//!     }),
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Filtering a directory
//!
//! ```no_run
//! use rust_data_io::filter::{readdir_filter_sync, FilterSpec};
//!
//! # fn main() -> Result<(), rust_data_io::DataIoError> {
//! let spec = FilterSpec::from_json_str(r#"{"include": ["csv", "tsv"], "skip_directories": true}"#)?;
//! for name in readdir_filter_sync("data/", &spec)? {
//!     println!("{name}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`read`]: read pipeline and shorthand readers
//! - [`write`]: write pipeline
//! - [`format`]: format registry, discernment and the concrete parsers/formatters
//! - [`filter`] and [`matcher`]: directory-entry filtering
//! - [`fs`]: filesystem helpers
//! - [`merge`]: shallow and deep object merging
//! - [`observability`]: observer hooks for reads and writes
//! - [`error`]: error types used across the crate

pub mod error;
pub mod filter;
pub mod format;
pub mod fs;
pub mod matcher;
pub mod merge;
pub mod observability;
pub mod read;
pub mod transform;
pub mod types;
pub mod write;

pub use error::{DataIoError, DataIoResult, TransformError};
pub use filter::{readdir_filter, readdir_filter_sync, FilterSpec};
pub use format::{discern_file_formatter, discern_format, discern_parser, FormatId};
pub use merge::{deep_extend, extend};
pub use read::{read_data, read_data_sync, ReadOptions};
pub use types::Value;
pub use write::{write_data, write_data_sync, WriteOptions};
