//! Property tests for undo histories built from random edits.

use std::num::NonZeroUsize;

use ot_fuzzer::Fuzzer;
use ot_text::TextOperation;
use ot_undo::{Session, UndoManager};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn undo_all_restores_then_redo_all_replays(seed in any::<u64>(), edits in 1..40usize) {
        let mut fuzzer = Fuzzer::from_u64(seed);
        let original = fuzzer.random_document(20);
        let mut session: Session<TextOperation> = Session::new(original.clone());
        for _ in 0..edits {
            let operation = fuzzer.random_operation(session.document());
            if fuzzer.random_bool(0.5) {
                session.apply_local(operation).unwrap();
            } else {
                session.apply_local_uncomposed(operation).unwrap();
            }
        }
        let edited = session.document().to_string();

        while session.undo_manager().can_undo() {
            session.undo().unwrap();
        }
        prop_assert_eq!(session.document(), original.as_str());

        while session.undo_manager().can_redo() {
            session.redo().unwrap();
        }
        prop_assert_eq!(session.document(), edited.as_str());
    }

    #[test]
    fn history_stays_applicable_under_remote_edits(seed in any::<u64>(), rounds in 1..40usize) {
        let mut fuzzer = Fuzzer::from_u64(seed);
        let mut session: Session<TextOperation> = Session::new(fuzzer.random_document(20));
        for _ in 0..rounds {
            let operation = fuzzer.random_operation(session.document());
            match fuzzer.random_int(0, 3) {
                0 => session.apply_remote(&operation).unwrap(),
                1 if session.undo_manager().can_undo() => session.undo().unwrap(),
                2 if session.undo_manager().can_redo() => session.redo().unwrap(),
                _ => session.apply_local(operation).unwrap(),
            }
            let doc_len = session.document().chars().count();
            if let Some(top) = session.undo_manager().undo_stack().back() {
                prop_assert_eq!(top.base_len(), doc_len);
            }
            if let Some(top) = session.undo_manager().redo_stack().back() {
                prop_assert_eq!(top.base_len(), doc_len);
            }
        }
        while session.undo_manager().can_undo() {
            session.undo().unwrap();
        }
        prop_assert!(!session.undo_manager().can_undo());
    }

    #[test]
    fn stacks_never_exceed_bound(seed in any::<u64>(), max in 1..10usize, adds in 0..60usize) {
        let mut fuzzer = Fuzzer::from_u64(seed);
        let mut doc = fuzzer.random_document(10);
        let mut manager = UndoManager::with_max_items(NonZeroUsize::new(max).unwrap());
        for _ in 0..adds {
            let operation = fuzzer.random_operation(&doc);
            doc = operation.apply(&doc).unwrap();
            manager.add(operation, false).unwrap();
        }
        prop_assert_eq!(manager.undo_stack().len(), adds.min(max));
        prop_assert!(manager.verify().is_ok());
    }
}
