use std::error::Error;

use thiserror::Error;

use crate::state::{ManagerState, StackKind};

#[derive(Error, Debug)]
pub enum UndoError {
    /// `perform_undo` / `perform_redo` with nothing on the stack.
    #[error("nothing to {0}: stack is empty")]
    EmptyStack(StackKind),

    /// `perform_undo` / `perform_redo` called from inside a perform callback.
    #[error("cannot start a new undo/redo while {0}")]
    AlreadyPerforming(ManagerState),

    /// A remote operation arrived while an undo/redo was being applied.
    #[error("remote operations can only be transformed while idle, manager is {0}")]
    NotIdle(ManagerState),

    /// A stack outgrew its bound. Eviction makes this unreachable.
    #[error("{stack} stack holds {len} entries, bound is {max}")]
    BoundExceeded {
        stack: StackKind,
        len: usize,
        max: usize,
    },

    /// The operation algebra rejected an operation.
    #[error("operation rejected: {0}")]
    Operation(#[source] Box<dyn Error + Send + Sync>),
}

impl UndoError {
    pub fn operation<E>(err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        UndoError::Operation(Box::new(err))
    }
}
