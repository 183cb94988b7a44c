//! Spoke Editor
//!
//! Hosts a scene graph of nodes and drives their loading, saving, export and
//! playback.
//!
//! # Core Operations
//!
//! - **Open**: deserialize a [`SceneDocument`](spoke_node::SceneDocument),
//!   track every resource load and report per-node failures
//! - **Save**: write the applied state of every node
//! - **Export**: augment duplicates with export-only data
//! - **Play**: run node behaviours
//!
//! # Example
//!
//! ```rust,ignore
//! use spoke_editor::prelude::*;
//!
//! # async fn example() -> Result<(), EditorError> {
//! let mut editor = Editor::new(EditorConfig::new().with_asset_root("assets"));
//! let report = editor.open_scene(Path::new("crater.spoke"), false).await?;
//! for failure in &report.errors {
//!     eprintln!("{failure}");
//! }
//! editor.save_scene(Path::new("crater.spoke")).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod loader;
pub mod logging;
pub mod scene;

// Re-exports for convenience
pub use config::EditorConfig;
pub use editor::{Editor, NodeIssues};
pub use error::{EditorError, EditorResult};
pub use export::export_scene;
pub use loader::{LoadReport, SceneLoadTracker, SettleSummary};
pub use scene::{PlacedNode, Scene};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for hosting an editor session
    pub use crate::config::EditorConfig;
    pub use crate::editor::Editor;
    pub use crate::error::{EditorError, EditorResult};
    pub use crate::loader::LoadReport;
    pub use crate::scene::Scene;
    pub use std::path::Path;
}
