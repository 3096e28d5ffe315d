//! Undo history configuration.
//!
//! `UndoConfig` is meant to be embedded in an application's own settings
//! file:
//!
//! ```toml
//! [undo]
//! max_items = 200
//! ```
//!
//! A missing `max_items` keeps the history unbounded; `0` is rejected.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UndoConfig {
    /// Maximum entries per stack; the oldest entry is evicted past it.
    pub max_items: Option<NonZeroUsize>,
}

impl UndoConfig {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn bounded(max_items: NonZeroUsize) -> Self {
        Self {
            max_items: Some(max_items),
        }
    }
}
