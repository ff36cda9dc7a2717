//! Lookup resolution: the heterogeneous id-mapping file → three tables.

mod parser;
mod tables;

pub use parser::LookupParser;
pub use tables::{LookupKind, LookupTables};
