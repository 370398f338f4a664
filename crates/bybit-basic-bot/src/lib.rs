/*
[INPUT]:  Public API exports for the bybit-basic-bot crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod bot;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod order;

// Re-export main types for convenience
pub use bot::{BalanceSummary, Bot, NOT_AVAILABLE};
pub use config::{BotConfig, ConfigError};
pub use error::{OrderError, SessionError};
pub use logging::{LogConfig, LogGuard, MemoryLog, init_logging};
pub use order::{OrderKind, OrderRequest, ValidationError};
