//! Helpers shared across layers.
//!
//! - [`code_generator`] - Short code generation and shape checks
//! - [`url_validator`] - Redirect target validation
//! - [`client_ip`] - Client address extraction from request metadata
//! - [`db_error`] - Database error classification

pub mod client_ip;
pub mod code_generator;
pub mod db_error;
pub mod url_validator;
