use std::fmt;

/// What the manager is doing right now.
///
/// Anything other than [`ManagerState::Idle`] only lasts for the synchronous
/// extent of the callback passed to `perform_undo` / `perform_redo`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ManagerState {
    #[default]
    Idle,
    PerformingUndo,
    PerformingRedo,
}

impl ManagerState {
    /// Stack that receives an `add` made in this state.
    pub fn push_target(self) -> StackKind {
        match self {
            ManagerState::PerformingUndo => StackKind::Redo,
            ManagerState::Idle | ManagerState::PerformingRedo => StackKind::Undo,
        }
    }
}

impl fmt::Display for ManagerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagerState::Idle => f.write_str("idle"),
            ManagerState::PerformingUndo => f.write_str("performing undo"),
            ManagerState::PerformingRedo => f.write_str("performing redo"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackKind {
    Undo,
    Redo,
}

impl fmt::Display for StackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackKind::Undo => f.write_str("undo"),
            StackKind::Redo => f.write_str("redo"),
        }
    }
}
