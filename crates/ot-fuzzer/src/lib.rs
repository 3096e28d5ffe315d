//! ot-fuzzer - random test data for text operations and undo histories.

pub mod fuzzer;

pub use fuzzer::{Fuzzer, ALPHABET};
