//! ot-undo: undo/redo for a collaborative editor built on operational
//! transformation.
//!
//! The [`UndoManager`] keeps two bounded stacks of inverse operations and
//! rebases them against every remote operation so that undoing a local edit
//! still applies cleanly after collaborators have changed the document.
//! [`Session`] wires a document, its undo history and the local/remote edit
//! protocol together.

pub mod config;
pub mod error;
pub mod manager;
pub mod session;
pub mod state;

pub use config::UndoConfig;
pub use error::UndoError;
pub use manager::UndoManager;
pub use session::{OwnedDocument, Session};
pub use state::{ManagerState, StackKind};
