//! Front tier proxy logic
//!
//! Forwards analysis, stress and reset calls to the back tier under a short
//! timeout, and hosts the local palindrome check.

pub mod client;
pub mod error;
pub mod palindrome;
pub mod types;

pub use client::BackendClient;
pub use error::{ProxyError, ProxyResult};
pub use palindrome::PalindromeVerdict;
pub use types::{
    with_default_data, AnalysisBody, PalindromeRequest, ProxyConfig, DEFAULT_BACKEND_TIMEOUT,
    REQUEST_ID_HEADER,
};
