//! Typed model, loader and structural validator for Swagger 2.0 and
//! OpenAPI 3.0/3.1 documents.

pub mod config;
pub mod error;
pub mod parse;
pub mod pointer;
pub mod validate;
pub mod version;

pub use parse::Document;
pub use version::SpecVersion;
