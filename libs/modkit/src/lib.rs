//! # ModKit - shared HTTP building blocks
//!
//! Pieces every REST-facing module reuses:
//!
//! - [`api::response`]: the `{ success, data, error, message }` JSON envelope
//! - [`api::error`]: `ApiError`, the envelope-rendering error for handlers
//! - [`http::sse`]: a typed Server-Sent Events broadcaster
//! - [`runtime::shutdown`]: OS-signal based shutdown future

pub use anyhow::Result;

pub mod api;
pub use api::error::{ApiError, ApiResult};
pub use api::response::{created_json, message_json, ok_json, ApiResponse, PaginationMeta};

pub mod http;
pub use http::sse::SseBroadcaster;

pub mod runtime;
pub use runtime::shutdown::wait_for_shutdown;
