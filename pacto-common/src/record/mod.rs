//! Contract record model: field schema and canonical record

pub mod canonical;
pub mod schema;

pub use canonical::{CanonicalField, CanonicalRecord, CanonicalSection, CanonicalValue};
pub use schema::{FieldSpec, FieldType, SectionName};
