//! Undo/redo stacks of inverse operations.
//!
//! # Protocol
//!
//! - Local edit: the caller inverts the edit against the pre-edit document,
//!   computes the compose hint, calls [`UndoManager::add`], then applies the
//!   edit.
//! - Remote edit: the caller applies it, then calls
//!   [`UndoManager::transform`].
//! - Undo/redo: [`UndoManager::perform_undo`] pops the top inverse and hands
//!   it to a callback. The callback applies it as an ordinary local edit, and
//!   the `add` it makes lands on the opposite stack.
//!
//! # Stack layout
//!
//! Entries are most-recent-last. Only the top entry applies to the current
//! document; every entry below it applies to the document produced by the
//! entries above it.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

use ot_text::Operation;

use crate::config::UndoConfig;
use crate::error::UndoError;
use crate::state::{ManagerState, StackKind};

#[derive(Debug, Clone)]
pub struct UndoManager<O> {
    undo_stack: VecDeque<O>,
    redo_stack: VecDeque<O>,
    state: ManagerState,
    max_items: Option<NonZeroUsize>,
    /// Set by pushes made while performing; the next idle `add` starts a
    /// fresh undo step regardless of its compose hint.
    compose_barrier: bool,
}

impl<O> Default for UndoManager<O> {
    fn default() -> Self {
        Self::with_config(UndoConfig::default())
    }
}

impl<O> UndoManager<O> {
    /// An unbounded manager.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_items(max_items: NonZeroUsize) -> Self {
        Self::with_config(UndoConfig::bounded(max_items))
    }

    pub fn with_config(config: UndoConfig) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            state: ManagerState::Idle,
            max_items: config.max_items,
            compose_barrier: false,
        }
    }

    pub fn max_items(&self) -> Option<NonZeroUsize> {
        self.max_items
    }

    pub fn state(&self) -> ManagerState {
        self.state
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// True only while a `perform_undo` callback runs.
    pub fn is_undoing(&self) -> bool {
        self.state == ManagerState::PerformingUndo
    }

    /// True only while a `perform_redo` callback runs.
    pub fn is_redoing(&self) -> bool {
        self.state == ManagerState::PerformingRedo
    }

    pub fn undo_stack(&self) -> &VecDeque<O> {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &VecDeque<O> {
        &self.redo_stack
    }

    fn stack(&self, kind: StackKind) -> &VecDeque<O> {
        match kind {
            StackKind::Undo => &self.undo_stack,
            StackKind::Redo => &self.redo_stack,
        }
    }

    fn stack_mut(&mut self, kind: StackKind) -> &mut VecDeque<O> {
        match kind {
            StackKind::Undo => &mut self.undo_stack,
            StackKind::Redo => &mut self.redo_stack,
        }
    }

    /// Checks the stack bounds.
    pub fn verify(&self) -> Result<(), UndoError> {
        let Some(max) = self.max_items else {
            return Ok(());
        };
        for kind in [StackKind::Undo, StackKind::Redo] {
            let len = self.stack(kind).len();
            if len > max.get() {
                return Err(UndoError::BoundExceeded {
                    stack: kind,
                    len,
                    max: max.get(),
                });
            }
        }
        Ok(())
    }

    /// Pops the top undo entry and passes it to `apply`.
    ///
    /// `apply` receives the manager back so it can record the replayed edit;
    /// any [`UndoManager::add`] it makes goes to the redo stack. Its return
    /// value is passed through.
    ///
    /// Fails without calling `apply` if the undo stack is empty or an
    /// undo/redo is already in progress.
    pub fn perform_undo<F, R>(&mut self, apply: F) -> Result<R, UndoError>
    where
        F: FnOnce(&mut Self, O) -> R,
    {
        self.perform(ManagerState::PerformingUndo, StackKind::Undo, apply)
    }

    /// Mirror of [`UndoManager::perform_undo`]: pops the redo stack, and the
    /// callback's `add` goes to the undo stack.
    pub fn perform_redo<F, R>(&mut self, apply: F) -> Result<R, UndoError>
    where
        F: FnOnce(&mut Self, O) -> R,
    {
        self.perform(ManagerState::PerformingRedo, StackKind::Redo, apply)
    }

    fn perform<F, R>(
        &mut self,
        mode: ManagerState,
        source: StackKind,
        apply: F,
    ) -> Result<R, UndoError>
    where
        F: FnOnce(&mut Self, O) -> R,
    {
        if self.state != ManagerState::Idle {
            tracing::debug!(state = %self.state, requested = %source, "rejected nested undo/redo");
            return Err(UndoError::AlreadyPerforming(self.state));
        }
        let Some(operation) = self.stack_mut(source).pop_back() else {
            tracing::debug!(stack = %source, "rejected undo/redo on empty stack");
            return Err(UndoError::EmptyStack(source));
        };
        tracing::trace!(
            stack = %source,
            undo_len = self.undo_stack.len(),
            redo_len = self.redo_stack.len(),
            "replaying inverse"
        );
        self.state = mode;
        let result = apply(self, operation);
        self.state = ManagerState::Idle;
        Ok(result)
    }
}

impl<O: Operation> UndoManager<O> {
    /// Records `operation`, the inverse of the local edit about to be applied.
    ///
    /// While idle the entry goes on the undo stack and the redo stack is
    /// cleared; while undoing it goes on the redo stack; while redoing it goes
    /// back on the undo stack.
    ///
    /// With `compose` set and a non-empty target stack the top entry is
    /// replaced by `operation.compose(top)`, merging both edits into one
    /// step. The hint is ignored for the first idle edit after an undo/redo.
    pub fn add(&mut self, operation: O, compose: bool) -> Result<(), UndoError> {
        let target = self.state.push_target();
        match self.state {
            ManagerState::Idle => {
                let compose = compose && !self.compose_barrier;
                self.push(target, operation, compose)?;
                self.compose_barrier = false;
                if !self.redo_stack.is_empty() {
                    tracing::trace!(
                        dropped = self.redo_stack.len(),
                        "fresh edit clears redo history"
                    );
                    self.redo_stack.clear();
                }
            }
            ManagerState::PerformingUndo | ManagerState::PerformingRedo => {
                self.push(target, operation, compose)?;
                self.compose_barrier = true;
            }
        }
        Ok(())
    }

    fn push(&mut self, kind: StackKind, operation: O, compose: bool) -> Result<(), UndoError> {
        let max_items = self.max_items;
        let stack = self.stack_mut(kind);
        match stack.pop_back() {
            Some(top) if compose => match operation.compose(&top) {
                Ok(merged) => stack.push_back(merged),
                Err(err) => {
                    stack.push_back(top);
                    return Err(UndoError::operation(err));
                }
            },
            Some(top) => {
                stack.push_back(top);
                stack.push_back(operation);
            }
            None => stack.push_back(operation),
        }
        if let Some(max) = max_items {
            while stack.len() > max.get() {
                stack.pop_front();
                tracing::debug!(stack = %kind, max = max.get(), "evicted oldest entry");
            }
        }
        tracing::trace!(stack = %kind, len = stack.len(), compose, "pushed inverse");
        Ok(())
    }

    /// Rebases both stacks onto a remote operation that was just applied to
    /// the document.
    ///
    /// Each stack is walked top to bottom: an entry is replaced by its
    /// transform against the remote operation, and the remote operation is
    /// itself transformed past the entry before moving down. Entries whose
    /// effect the remote edit erased entirely are dropped.
    ///
    /// Only allowed while idle. On error neither stack changes.
    pub fn transform(&mut self, operation: &O) -> Result<(), UndoError> {
        if self.state != ManagerState::Idle {
            tracing::debug!(state = %self.state, "rejected remote transform");
            return Err(UndoError::NotIdle(self.state));
        }
        let undo_stack = rebase_stack(&self.undo_stack, operation)?;
        let redo_stack = rebase_stack(&self.redo_stack, operation)?;
        tracing::trace!(
            undo_len = undo_stack.len(),
            redo_len = redo_stack.len(),
            "rebased stacks onto remote operation"
        );
        self.undo_stack = undo_stack;
        self.redo_stack = redo_stack;
        Ok(())
    }
}

fn rebase_stack<O: Operation>(stack: &VecDeque<O>, remote: &O) -> Result<VecDeque<O>, UndoError> {
    let mut rebased = VecDeque::with_capacity(stack.len());
    let mut against: Option<O> = None;
    for entry in stack.iter().rev() {
        let (entry_prime, remote_prime) = entry
            .transform(against.as_ref().unwrap_or(remote))
            .map_err(UndoError::operation)?;
        if entry_prime.is_noop() {
            tracing::debug!("dropped entry erased by remote edit");
        } else {
            rebased.push_front(entry_prime);
        }
        against = Some(remote_prime);
    }
    Ok(rebased)
}
