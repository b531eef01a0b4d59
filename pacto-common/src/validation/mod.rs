//! Candidate record validation
//!
//! - [`normalize`]: per-type normalization of raw values
//! - [`compare`]: per-type match policy for one field
//! - [`validator`]: aggregation over the whole canonical record

pub mod compare;
pub mod normalize;
pub mod validator;

pub use compare::{compare, Comparison, CURRENCY_TOLERANCE};
pub use validator::{MissingValuePolicy, ValidationResult, Validator};
