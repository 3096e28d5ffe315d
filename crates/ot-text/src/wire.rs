//! JSON wire form of [`TextOperation`].
//!
//! An operation travels as a flat array: a positive integer retains, a
//! negative integer deletes, a string inserts.
//!
//! ```text
//! [2, -1, 8]          retain 2, delete 1, retain 8
//! [5, " ", 5]         retain 5, insert " ", retain 5
//! ```

use serde::{ser, Deserialize, Serialize, Serializer};

use crate::error::OtError;
use crate::text_operation::{Component, TextOperation};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireComponent {
    Count(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WireOperation(pub Vec<WireComponent>);

fn wire_count(n: usize, negate: bool) -> Result<WireComponent, OtError> {
    let n = i64::try_from(n)
        .map_err(|_| OtError::InvalidComponent(format!("count {n} does not fit the wire form")))?;
    Ok(WireComponent::Count(if negate { -n } else { n }))
}

fn local_count(n: u64) -> Result<usize, OtError> {
    usize::try_from(n)
        .map_err(|_| OtError::InvalidComponent(format!("count {n} exceeds the address space")))
}

impl TryFrom<&TextOperation> for WireOperation {
    type Error = OtError;

    fn try_from(op: &TextOperation) -> Result<Self, OtError> {
        let components = op
            .components()
            .iter()
            .map(|component| match component {
                Component::Retain(n) => wire_count(*n, false),
                Component::Insert(text) => Ok(WireComponent::Text(text.clone())),
                Component::Delete(n) => wire_count(*n, true),
            })
            .collect::<Result<_, _>>()?;
        Ok(WireOperation(components))
    }
}

impl Serialize for TextOperation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireOperation::try_from(self)
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }
}

impl TryFrom<WireOperation> for TextOperation {
    type Error = OtError;

    fn try_from(wire: WireOperation) -> Result<Self, OtError> {
        let mut op = TextOperation::new();
        for component in wire.0 {
            match component {
                WireComponent::Count(0) => {
                    return Err(OtError::InvalidComponent(
                        "zero-length retain or delete".to_string(),
                    ));
                }
                WireComponent::Count(n) if n > 0 => op.push_retain(local_count(n.unsigned_abs())?),
                WireComponent::Count(n) => op.push_delete(local_count(n.unsigned_abs())?),
                WireComponent::Text(text) if text.is_empty() => {
                    return Err(OtError::InvalidComponent("empty insert".to_string()));
                }
                WireComponent::Text(text) => op.push_insert(&text),
            }
        }
        Ok(op)
    }
}
