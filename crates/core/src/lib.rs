//! bce-core: Core library for BCE service clients
//!
//! This crate provides the machinery shared by every BCE service client:
//! - Credentials, client configuration and named profiles
//! - `bce-auth-v1` request signing
//! - The response handler chain that classifies service errors
//! - The HttpTransport trait and the `BceClient` orchestrator
//!
//! This crate is independent of any HTTP client library; transports live in
//! `bce-client` or in test doubles.

pub mod auth;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod handler;
pub mod headers;
pub mod profile;
pub mod request;
pub mod response;
pub mod service;
pub mod traits;

pub use auth::{BceV1Signer, SignOptions, Signature, Signer};
pub use client::BceClient;
pub use config::{ClientConfig, Config, ConfigManager, Protocol, TimeoutConfig};
pub use credentials::Credentials;
pub use error::{Error, ErrorType, Result, ServiceError};
pub use handler::{
    ErrorResponseHandler, HttpResponseHandler, JsonResponseHandler, MetadataResponseHandler,
    ResponseParts,
};
pub use profile::{Profile, ProfileManager};
pub use request::InternalRequest;
pub use response::{BceHttpResponse, BceResponse, EmptyResponse, ResponseMetadata};
pub use service::{ServiceId, ServiceSpec};
pub use traits::HttpTransport;
