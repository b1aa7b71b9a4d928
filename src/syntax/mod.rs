//! Java syntax provider: parsing, source ownership, and name resolution.

pub mod parser;
pub mod source;
pub mod symbols;

pub use parser::JavaParser;
pub use source::JavaSource;
pub use symbols::{DeclId, SymbolResolver};
