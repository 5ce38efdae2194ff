//! Guard / redirect subsystem.
//!
//! # Data Flow
//! ```text
//! Navigation (location, session)
//!     → redirect.rs: private_guard   (not logged in → login, with `from`)
//!     → route table match
//!         no match → not_found.rs (site override page, else built-in)
//!     → redirect.rs: exact_guard     (literal exact route ≠ location → not found)
//!     → render dispatcher
//! ```
//!
//! # Design Decisions
//! - Not-found is a normal terminal state, not an error
//! - Parameterized exact routes are left to the matcher
//! - A not-found override that fails to load falls back to the built-in page

pub mod not_found;
pub mod redirect;

pub use not_found::NotFoundPage;
pub use redirect::{exact_guard, private_guard};
