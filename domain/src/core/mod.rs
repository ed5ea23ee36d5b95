//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: name of a model served by the backend
//! - [`model::ModelOptions`]: sampling options sent with each request
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
pub mod string;
