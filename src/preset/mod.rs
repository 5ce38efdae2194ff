//! Preset subsystem.
//!
//! # Data Flow
//! ```text
//! Matched route (path, pathToComponent, nodePath)
//!     → PresetKey
//!     → computer.rs (memoized per key)
//!         → source.rs: page_preset(key), page_mock_source(key)
//!         → derive nodePath identity
//!         → back-fill `mock: true` apis from the page mock source
//!     → Arc<Preset>, injected through render::context
//! ```
//!
//! # Design Decisions
//! - Derivation is pure given the key and the source; results are cached
//! - A missing page preset is not an error: only `nodePath` is filled in
//! - Mock data is consulted only in mock mode

pub mod computer;
pub mod source;
pub mod types;

pub use computer::{derive_preset, get_node_path, PresetComputer};
pub use source::{DirPresetSource, PresetSource, StaticPresetSource};
pub use types::{ApiDef, MockSource, Preset, PresetKey};
