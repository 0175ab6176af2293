pub mod document;
pub mod error;
pub mod report;
pub mod schema;
