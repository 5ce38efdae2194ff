//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters and gauges via the `metrics` facade)
//!
//! Consumers:
//!     → stdout (fmt layer installed by the binary)
//!     → whatever recorder the host application installs
//! ```
//!
//! # Design Decisions
//! - The library never installs a subscriber or recorder itself
//! - Metrics are cheap (atomic increments), no-ops without a recorder
//! - Log level comes from `RUST_LOG`, then from config

pub mod logging;
pub mod metrics;
