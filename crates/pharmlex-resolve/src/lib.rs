//! PharmLex Resolve — pattern-based lookup and suggestion engine.
//!
//! The pattern index is built once from the record store's name rows and is
//! read-only afterwards. The resolver turns a raw user string into a
//! resolution outcome; the assembler joins that outcome back against the
//! store into a response payload.

pub mod assemble;
pub mod index;
pub mod resolver;
pub mod types;

pub use assemble::assemble;
pub use index::{ApproxMatch, PatternEntry, PatternIndex};
pub use resolver::resolve;
pub use types::*;
