//! The operation algebra contract.
//!
//! An [`Operation`] is an immutable description of an edit to a document.
//! Undo bookkeeping only ever composes, transforms and inspects operations;
//! the document itself stays with the caller.

use std::error::Error;

pub trait Operation: Sized {
    /// Borrowed form of the document the operation edits (`str` for text).
    type Document: ?Sized + ToOwned;
    type Error: Error + Send + Sync + 'static;

    /// Applies the operation, producing the edited document.
    fn apply(
        &self,
        doc: &Self::Document,
    ) -> Result<<Self::Document as ToOwned>::Owned, Self::Error>;

    /// Returns the operation that undoes `self`, given the document `self`
    /// is about to be applied to.
    fn invert(&self, doc: &Self::Document) -> Result<Self, Self::Error>;

    /// `a.compose(b)` is equivalent to applying `a` and then `b`.
    fn compose(&self, other: &Self) -> Result<Self, Self::Error>;

    /// For two operations on the same document, returns `(a', b')` such that
    /// `apply(apply(doc, a), b') == apply(apply(doc, b), a')`.
    fn transform(&self, other: &Self) -> Result<(Self, Self), Self::Error>;

    /// Merge heuristic: whether `other`, applied right after `self`, should
    /// land in the same undo step.
    fn should_be_composed_with(&self, other: &Self) -> bool;

    /// True when applying the operation leaves every document unchanged.
    fn is_noop(&self) -> bool;
}
