//! A document paired with its undo history.
//!
//! [`Session`] runs the edit protocol an editor owes the [`UndoManager`]:
//! local edits are inverted against the pre-edit document and recorded
//! before they are applied, remote edits are applied and then used to rebase
//! the history, and undo/redo replay the stacked inverse as a local edit.

use std::borrow::Borrow;

use ot_text::Operation;

use crate::error::UndoError;
use crate::manager::UndoManager;
use crate::state::ManagerState;

/// Owned form of the document edited by `O` (`String` for text).
pub type OwnedDocument<O> = <<O as Operation>::Document as ToOwned>::Owned;

pub struct Session<O: Operation> {
    document: OwnedDocument<O>,
    manager: UndoManager<O>,
}

impl<O: Operation> Session<O> {
    pub fn new(document: OwnedDocument<O>) -> Self {
        Self::with_manager(document, UndoManager::new())
    }

    /// Starts a session with a preconfigured (e.g. bounded) manager.
    pub fn with_manager(document: OwnedDocument<O>, manager: UndoManager<O>) -> Self {
        Self { document, manager }
    }

    pub fn document(&self) -> &O::Document {
        Borrow::<O::Document>::borrow(&self.document)
    }

    pub fn undo_manager(&self) -> &UndoManager<O> {
        &self.manager
    }

    pub fn into_parts(self) -> (OwnedDocument<O>, UndoManager<O>) {
        (self.document, self.manager)
    }

    /// Applies a local edit, merging it into the previous undo step when the
    /// typing heuristic says so.
    pub fn apply_local(&mut self, operation: O) -> Result<(), UndoError> {
        record_local(&mut self.document, &mut self.manager, operation, true)
    }

    /// Applies a local edit as its own undo step.
    pub fn apply_local_uncomposed(&mut self, operation: O) -> Result<(), UndoError> {
        record_local(&mut self.document, &mut self.manager, operation, false)
    }

    /// Applies an operation received from a collaborator and rebases the
    /// undo history onto it. Nothing changes if either step fails.
    pub fn apply_remote(&mut self, operation: &O) -> Result<(), UndoError> {
        let next = operation
            .apply(self.document())
            .map_err(UndoError::operation)?;
        self.manager.transform(operation)?;
        self.document = next;
        Ok(())
    }

    /// Reverts the most recent undo step.
    ///
    /// If the popped inverse no longer applies, the error is returned and
    /// the entry is discarded.
    pub fn undo(&mut self) -> Result<(), UndoError> {
        let document = &mut self.document;
        self.manager
            .perform_undo(|manager, operation| record_local(document, manager, operation, false))?
    }

    /// Re-applies the most recently undone step.
    pub fn redo(&mut self) -> Result<(), UndoError> {
        let document = &mut self.document;
        self.manager
            .perform_redo(|manager, operation| record_local(document, manager, operation, false))?
    }
}

fn record_local<O: Operation>(
    document: &mut OwnedDocument<O>,
    manager: &mut UndoManager<O>,
    operation: O,
    allow_compose: bool,
) -> Result<(), UndoError> {
    let current = Borrow::<O::Document>::borrow(&*document);
    // The top entry reverts the previous edit; inverting it against the
    // current document recovers that edit for the merge heuristic.
    let compose = allow_compose
        && manager.state() == ManagerState::Idle
        && match manager.undo_stack().back() {
            Some(top) => top
                .invert(current)
                .map_err(UndoError::operation)?
                .should_be_composed_with(&operation),
            None => false,
        };
    let inverse = operation.invert(current).map_err(UndoError::operation)?;
    let next = operation.apply(current).map_err(UndoError::operation)?;
    manager.add(inverse, compose)?;
    *document = next;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StackKind;
    use ot_text::TextOperation;

    fn session(doc: &str) -> Session<TextOperation> {
        Session::new(doc.to_string())
    }

    #[test]
    fn undo_and_redo_single_edit() {
        let mut s = session("abc");
        s.apply_local(TextOperation::new().retain(1).delete(1).retain(1)).unwrap();
        assert_eq!(s.document(), "ac");
        s.undo().unwrap();
        assert_eq!(s.document(), "abc");
        assert!(s.undo_manager().can_redo());
        s.redo().unwrap();
        assert_eq!(s.document(), "ac");
        assert!(s.undo_manager().can_undo());
        assert!(!s.undo_manager().can_redo());
    }

    #[test]
    fn typing_run_undoes_in_one_step() {
        let mut s = session("");
        s.apply_local(TextOperation::new().insert("a")).unwrap();
        s.apply_local(TextOperation::new().retain(1).insert("b")).unwrap();
        s.apply_local(TextOperation::new().retain(2).insert("c")).unwrap();
        assert_eq!(s.undo_manager().undo_stack().len(), 1);
        s.undo().unwrap();
        assert_eq!(s.document(), "");
    }

    #[test]
    fn uncomposed_edits_undo_separately() {
        let mut s = session("");
        s.apply_local(TextOperation::new().insert("a")).unwrap();
        s.apply_local_uncomposed(TextOperation::new().retain(1).insert("b")).unwrap();
        assert_eq!(s.undo_manager().undo_stack().len(), 2);
        s.undo().unwrap();
        assert_eq!(s.document(), "a");
    }

    #[test]
    fn remote_edit_keeps_history_applicable() {
        let mut s = session("hello");
        s.apply_local(TextOperation::new().retain(5).insert("!")).unwrap();
        s.apply_remote(&TextOperation::new().insert(">> ").retain(6)).unwrap();
        assert_eq!(s.document(), ">> hello!");
        s.undo().unwrap();
        assert_eq!(s.document(), ">> hello");
    }

    #[test]
    fn undo_on_empty_history_is_an_error() {
        let mut s = session("x");
        assert!(matches!(s.undo(), Err(UndoError::EmptyStack(StackKind::Undo))));
        assert!(matches!(s.redo(), Err(UndoError::EmptyStack(StackKind::Redo))));
        assert_eq!(s.document(), "x");
    }

    #[test]
    fn rejected_edits_change_nothing() {
        let mut s = session("abc");
        s.apply_local(TextOperation::new().retain(3).insert("d")).unwrap();
        assert!(s.apply_local(TextOperation::new().retain(2)).is_err());
        assert!(s.apply_remote(&TextOperation::new().retain(9)).is_err());
        assert_eq!(s.document(), "abcd");
        assert_eq!(s.undo_manager().undo_stack().len(), 1);
    }
}
