//! Reversible plain-text operations.
//!
//! # Operation format
//!
//! A [`TextOperation`] walks the whole document from start to end:
//! - `Retain(n)`: keep the next `n` characters
//! - `Insert(s)`: insert `s` at the cursor
//! - `Delete(n)`: drop the next `n` characters
//!
//! All lengths count `char`s, never bytes. The trailing retain is kept so
//! that `base_len` always equals the length of the document the operation
//! applies to.

use serde::Deserialize;

use crate::error::OtError;
use crate::operation::Operation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    Retain(usize),
    Insert(String),
    Delete(usize),
}

impl Component {
    /// Length of this component (in chars) on the *source* string.
    pub fn src_len(&self) -> usize {
        match self {
            Component::Retain(n) => *n,
            Component::Insert(_) => 0,
            Component::Delete(n) => *n,
        }
    }

    /// Length of this component (in chars) on the *destination* string.
    pub fn dst_len(&self) -> usize {
        match self {
            Component::Retain(n) => *n,
            Component::Insert(s) => char_len(s),
            Component::Delete(_) => 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "crate::wire::WireOperation")]
pub struct TextOperation {
    components: Vec<Component>,
    base_len: usize,
    target_len: usize,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Splits `s` after `at` chars.
fn split_chars(s: &str, at: usize) -> (&str, &str) {
    match s.char_indices().nth(at) {
        Some((idx, _)) => s.split_at(idx),
        None => (s, ""),
    }
}

impl TextOperation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn retain(mut self, n: usize) -> Self {
        self.push_retain(n);
        self
    }

    pub fn insert(mut self, text: &str) -> Self {
        self.push_insert(text);
        self
    }

    pub fn delete(mut self, n: usize) -> Self {
        self.push_delete(n);
        self
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Length of the document this operation applies to.
    pub fn base_len(&self) -> usize {
        self.base_len
    }

    /// Length of the document this operation produces.
    pub fn target_len(&self) -> usize {
        self.target_len
    }

    pub fn is_noop(&self) -> bool {
        matches!(self.components.as_slice(), [] | [Component::Retain(_)])
    }

    pub(crate) fn push_retain(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        self.base_len += n;
        self.target_len += n;
        match self.components.last_mut() {
            Some(Component::Retain(last)) => *last += n,
            _ => self.components.push(Component::Retain(n)),
        }
    }

    pub(crate) fn push_insert(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.target_len += char_len(text);
        // Inserts always precede an adjacent delete, so equivalent
        // operations have a single canonical component list.
        match self.components.as_mut_slice() {
            [.., Component::Insert(last)] | [.., Component::Insert(last), Component::Delete(_)] => {
                last.push_str(text)
            }
            [.., Component::Delete(_)] => {
                let at = self.components.len() - 1;
                self.components.insert(at, Component::Insert(text.to_owned()));
            }
            _ => self.components.push(Component::Insert(text.to_owned())),
        }
    }

    pub(crate) fn push_delete(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        self.base_len += n;
        match self.components.last_mut() {
            Some(Component::Delete(last)) => *last += n,
            _ => self.components.push(Component::Delete(n)),
        }
    }

    fn check_base(&self, actual: usize) -> Result<(), OtError> {
        if self.base_len != actual {
            return Err(OtError::BaseLengthMismatch {
                expected: self.base_len,
                actual,
            });
        }
        Ok(())
    }

    /// Applies the operation to `doc`, returning the edited string.
    pub fn apply(&self, doc: &str) -> Result<String, OtError> {
        let chars: Vec<char> = doc.chars().collect();
        self.check_base(chars.len())?;
        let mut result = String::with_capacity(doc.len());
        let mut idx = 0usize;
        for component in &self.components {
            match component {
                Component::Retain(n) => {
                    result.extend(&chars[idx..idx + n]);
                    idx += n;
                }
                Component::Insert(text) => result.push_str(text),
                Component::Delete(n) => idx += n,
            }
        }
        Ok(result)
    }

    /// Builds the operation that reverts `self` once it has been applied to
    /// `doc`. Deleted text is read back from `doc`.
    pub fn invert(&self, doc: &str) -> Result<Self, OtError> {
        let chars: Vec<char> = doc.chars().collect();
        self.check_base(chars.len())?;
        let mut inverse = Self::new();
        let mut idx = 0usize;
        for component in &self.components {
            match component {
                Component::Retain(n) => {
                    inverse.push_retain(*n);
                    idx += n;
                }
                Component::Insert(text) => inverse.push_delete(char_len(text)),
                Component::Delete(n) => {
                    let deleted: String = chars[idx..idx + n].iter().collect();
                    inverse.push_insert(&deleted);
                    idx += n;
                }
            }
        }
        Ok(inverse)
    }

    /// Composes `self` followed by `other` into one equivalent operation.
    pub fn compose(&self, other: &Self) -> Result<Self, OtError> {
        if self.target_len != other.base_len {
            return Err(OtError::ComposeLengthMismatch {
                target: self.target_len,
                base: other.base_len,
            });
        }
        let mut result = Self::new();
        let mut iter1 = self.components.iter().cloned();
        let mut iter2 = other.components.iter().cloned();
        let mut c1 = iter1.next();
        let mut c2 = iter2.next();

        loop {
            match (c1.take(), c2.take()) {
                (None, None) => break,
                // Delete in op1 never reaches op2.
                (Some(Component::Delete(n)), rest) => {
                    result.push_delete(n);
                    c1 = iter1.next();
                    c2 = rest;
                }
                // Insert in op2 passes through.
                (rest, Some(Component::Insert(text))) => {
                    result.push_insert(&text);
                    c1 = rest;
                    c2 = iter2.next();
                }
                (None, Some(_)) | (Some(_), None) => {
                    return Err(OtError::ComposeLengthMismatch {
                        target: self.target_len,
                        base: other.base_len,
                    });
                }
                (Some(Component::Retain(n)), Some(Component::Retain(m))) => {
                    let min = n.min(m);
                    result.push_retain(min);
                    c1 = if n > min { Some(Component::Retain(n - min)) } else { iter1.next() };
                    c2 = if m > min { Some(Component::Retain(m - min)) } else { iter2.next() };
                }
                (Some(Component::Retain(n)), Some(Component::Delete(m))) => {
                    let min = n.min(m);
                    result.push_delete(min);
                    c1 = if n > min { Some(Component::Retain(n - min)) } else { iter1.next() };
                    c2 = if m > min { Some(Component::Delete(m - min)) } else { iter2.next() };
                }
                // Insert1 + Retain2: the inserted prefix survives.
                (Some(Component::Insert(text)), Some(Component::Retain(m))) => {
                    let len = char_len(&text);
                    let min = len.min(m);
                    let (kept, rest) = split_chars(&text, min);
                    result.push_insert(kept);
                    c1 = if len > min {
                        Some(Component::Insert(rest.to_owned()))
                    } else {
                        iter1.next()
                    };
                    c2 = if m > min { Some(Component::Retain(m - min)) } else { iter2.next() };
                }
                // Insert1 + Delete2: cancel out.
                (Some(Component::Insert(text)), Some(Component::Delete(m))) => {
                    let len = char_len(&text);
                    let min = len.min(m);
                    let (_, rest) = split_chars(&text, min);
                    c1 = if len > min {
                        Some(Component::Insert(rest.to_owned()))
                    } else {
                        iter1.next()
                    };
                    c2 = if m > min { Some(Component::Delete(m - min)) } else { iter2.next() };
                }
            }
        }
        Ok(result)
    }

    /// Transforms two concurrent operations against each other.
    ///
    /// Returns `(self', other')` where `self'` applies after `other` and
    /// `other'` applies after `self`. When both insert at the same position,
    /// `self`'s text ends up first.
    pub fn transform(&self, other: &Self) -> Result<(Self, Self), OtError> {
        if self.base_len != other.base_len {
            return Err(OtError::TransformLengthMismatch {
                left: self.base_len,
                right: other.base_len,
            });
        }
        let mut left = Self::new();
        let mut right = Self::new();
        let mut iter1 = self.components.iter().cloned();
        let mut iter2 = other.components.iter().cloned();
        let mut c1 = iter1.next();
        let mut c2 = iter2.next();

        loop {
            match (c1.take(), c2.take()) {
                (None, None) => break,
                (Some(Component::Insert(text)), rest) => {
                    right.push_retain(char_len(&text));
                    left.push_insert(&text);
                    c1 = iter1.next();
                    c2 = rest;
                }
                (rest, Some(Component::Insert(text))) => {
                    left.push_retain(char_len(&text));
                    right.push_insert(&text);
                    c1 = rest;
                    c2 = iter2.next();
                }
                (None, Some(_)) | (Some(_), None) => {
                    return Err(OtError::TransformLengthMismatch {
                        left: self.base_len,
                        right: other.base_len,
                    });
                }
                (Some(Component::Retain(n)), Some(Component::Retain(m))) => {
                    let min = n.min(m);
                    left.push_retain(min);
                    right.push_retain(min);
                    c1 = if n > min { Some(Component::Retain(n - min)) } else { iter1.next() };
                    c2 = if m > min { Some(Component::Retain(m - min)) } else { iter2.next() };
                }
                // Both sides deleted the same range; neither needs to.
                (Some(Component::Delete(n)), Some(Component::Delete(m))) => {
                    let min = n.min(m);
                    c1 = if n > min { Some(Component::Delete(n - min)) } else { iter1.next() };
                    c2 = if m > min { Some(Component::Delete(m - min)) } else { iter2.next() };
                }
                (Some(Component::Delete(n)), Some(Component::Retain(m))) => {
                    let min = n.min(m);
                    left.push_delete(min);
                    c1 = if n > min { Some(Component::Delete(n - min)) } else { iter1.next() };
                    c2 = if m > min { Some(Component::Retain(m - min)) } else { iter2.next() };
                }
                (Some(Component::Retain(n)), Some(Component::Delete(m))) => {
                    let min = n.min(m);
                    right.push_delete(min);
                    c1 = if n > min { Some(Component::Retain(n - min)) } else { iter1.next() };
                    c2 = if m > min { Some(Component::Delete(m - min)) } else { iter2.next() };
                }
            }
        }
        Ok((left, right))
    }

    /// Typing heuristic used to group edits into one undo step.
    ///
    /// Consecutive single inserts merge when the second one starts where the
    /// first one ended. Consecutive single deletes merge for backspace
    /// (`start_b + len_b == start_a`) and for forward delete
    /// (`start_a == start_b`).
    pub fn should_be_composed_with(&self, other: &Self) -> bool {
        if self.is_noop() || other.is_noop() {
            return true;
        }
        let (Some(a), Some(b)) = (self.simple_component(), other.simple_component()) else {
            return false;
        };
        let start_a = self.start_index();
        let start_b = other.start_index();
        match (a, b) {
            (Component::Insert(text), Component::Insert(_)) => start_a + char_len(text) == start_b,
            (Component::Delete(_), Component::Delete(len_b)) => {
                start_b + len_b == start_a || start_a == start_b
            }
            _ => false,
        }
    }

    /// The single non-retain component of a "simple" operation.
    fn simple_component(&self) -> Option<&Component> {
        match self.components.as_slice() {
            [only] => Some(only),
            [Component::Retain(_), c] | [c, Component::Retain(_)] => Some(c),
            [Component::Retain(_), c, Component::Retain(_)] => Some(c),
            _ => None,
        }
    }

    fn start_index(&self) -> usize {
        match self.components.first() {
            Some(Component::Retain(n)) => *n,
            _ => 0,
        }
    }
}

impl Operation for TextOperation {
    type Document = str;
    type Error = OtError;

    fn apply(&self, doc: &str) -> Result<String, OtError> {
        TextOperation::apply(self, doc)
    }

    fn invert(&self, doc: &str) -> Result<Self, OtError> {
        TextOperation::invert(self, doc)
    }

    fn compose(&self, other: &Self) -> Result<Self, OtError> {
        TextOperation::compose(self, other)
    }

    fn transform(&self, other: &Self) -> Result<(Self, Self), OtError> {
        TextOperation::transform(self, other)
    }

    fn should_be_composed_with(&self, other: &Self) -> bool {
        TextOperation::should_be_composed_with(self, other)
    }

    fn is_noop(&self) -> bool {
        TextOperation::is_noop(self)
    }
}
