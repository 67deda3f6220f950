//! The catalog bridge (§4.8): reading the JSON binding catalog, writing
//! pattern/scan-result catalogs, and the catalog-only merge/clear
//! operations `broutil` exposes.
//!
//! This module is part of the `bromascan` crate family.

mod broutil;
mod codegen;
mod error;
mod output;

pub use broutil::{clear_bindings, merge_scan_results};
pub use codegen::{read_bindings, write_bindings};
pub use error::CatalogError;
pub use output::{read_patterns, write_patterns, write_scan_results, ClassBinding, MethodBinding};
