//! API types shared by the pacto services

pub mod types;

pub use types::{DocumentResponse, EmailRequest, EmailStatus, ValidationResponse};
