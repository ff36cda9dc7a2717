//! Ingestion of raw delimited files into the bronze layer.

mod parser;
mod source;

pub use parser::{IngestConfig, Ingestor};
pub use source::{BronzeTable, IngestReport};
