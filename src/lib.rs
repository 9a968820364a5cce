//! Verify that every KiCad symbol's pin numbers have matching pad numbers in
//! its assigned footprint, to catch edits that drift apart.
//!
//! The pipeline is a single synchronous pass: parse symbol libraries into
//! [`Symbol`]s, index `.pretty` footprint collections into a
//! [`FootprintLibraryIndex`], [`verify`] each symbol that has a footprint
//! assigned, and render the results with [`render_text`] or [`render_json`].
//! Symbols without a footprint reference are skipped by the caller, not an
//! error.

pub mod error;
pub mod footprint;
pub mod library;
pub mod report;
pub mod sexpr;
pub mod symbol;
pub mod verify;

pub use error::LibraryError;
pub use footprint::{parse_footprint, Footprint};
pub use library::{FootprintLibrary, FootprintLibraryIndex};
pub use report::{render_json, render_text, ReportEntry, Summary};
pub use symbol::{parse_symbol_library, Symbol};
pub use verify::{verify, Status, VerificationResult};
