//! Header names used by the SDK
//!
//! All names are lower-case; requests store header names lower-cased.

pub const AUTHORIZATION: &str = "authorization";
pub const CACHE_CONTROL: &str = "cache-control";
pub const CONTENT_DISPOSITION: &str = "content-disposition";
pub const CONTENT_ENCODING: &str = "content-encoding";
pub const CONTENT_LENGTH: &str = "content-length";
pub const CONTENT_MD5: &str = "content-md5";
pub const CONTENT_TYPE: &str = "content-type";
pub const DATE: &str = "date";
pub const ETAG: &str = "etag";
pub const EXPIRES: &str = "expires";
pub const HOST: &str = "host";
pub const LAST_MODIFIED: &str = "last-modified";
pub const LOCATION: &str = "location";
pub const SERVER: &str = "server";
pub const TRANSFER_ENCODING: &str = "transfer-encoding";
pub const USER_AGENT: &str = "user-agent";

/// Prefix of BCE-specific headers; all of them are signed by default
pub const BCE_PREFIX: &str = "x-bce-";
pub const BCE_DATE: &str = "x-bce-date";
pub const BCE_REQUEST_ID: &str = "x-bce-request-id";
pub const BCE_SECURITY_TOKEN: &str = "x-bce-security-token";

/// Default Content-Type for BCE JSON APIs
pub const DEFAULT_CONTENT_TYPE: &str = "application/json; charset=utf-8";
