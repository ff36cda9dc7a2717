//! The bronze → silver transformation engine.

mod engine;
pub mod rules;
mod silver;

pub use engine::Transformer;
pub use rules::{
    CANONICAL_COLUMNS, DIAG_COLUMNS, ID_COLUMNS, LAB_COLUMNS, MED_COLUMNS, NUMERIC_COLUMNS,
};
pub use silver::{Cell, SilverTable};
