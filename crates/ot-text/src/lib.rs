//! Operational transformation over flat plain-text documents.
//!
//! Module map:
//! - `operation.rs` -> the [`Operation`] contract consumed by undo managers
//!   and editor sessions.
//! - `text_operation.rs` -> [`TextOperation`], retain/insert/delete
//!   sequences over a `str`.
//! - `wire.rs` -> JSON wire form of [`TextOperation`].
//! - `error.rs` -> [`OtError`].

pub mod error;
pub mod operation;
pub mod text_operation;
mod wire;

pub use error::OtError;
pub use operation::Operation;
pub use text_operation::{Component, TextOperation};
