//! bce-client: HTTP transport and service clients for BCE
//!
//! This crate provides the [`HttpTransport`](bce_core::HttpTransport)
//! implementation backed by reqwest, and the service clients built on
//! [`BceClient`](bce_core::BceClient). It is the only crate that directly
//! depends on an HTTP client library.

pub mod ses;
pub mod transport;

pub use ses::SesClient;
pub use transport::ReqwestTransport;
