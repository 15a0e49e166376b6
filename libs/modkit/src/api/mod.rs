//! Response envelope and error rendering for REST handlers.

pub mod error;
pub mod response;
