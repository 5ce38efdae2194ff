//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks on the route tree)
//!     → AppConfig (validated, immutable)
//!     → handed to the Engine
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → new AppConfig sent to the owner, which rebuilds its Engine
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use schema::AppConfig;
pub use schema::AppSettings;
pub use schema::MockConfig;
pub use schema::ObservabilityConfig;
pub use schema::PagesConfig;
