//! Access to the repair management backend.
//!
//! - [`token`]: where the session token lives and how the transport reads it
//! - [`client`]: the HTTP transport (auth header, origin, timeout, failures)
//! - [`service`]: the repair record operations built on the transport

pub mod client;
pub mod service;
pub mod token;

pub use client::{ApiClient, AUTH_HEADER};
pub use service::{HttpRepairService, RepairService};
pub use token::{StaticTokenProvider, StoredTokenProvider, TokenProvider, TokenStorage};
