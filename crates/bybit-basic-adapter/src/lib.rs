/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Bybit adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod exchange;
pub mod http;
pub mod types;

pub use exchange::ExchangeApi;

// Re-export commonly used types from http
pub use http::{
    BybitClient,
    BybitError,
    ClientConfig,
    Credentials,
    Environment,
    FailureKind,
    RequestSigner,
    Result,
};

// Re-export all types
pub use types::*;
