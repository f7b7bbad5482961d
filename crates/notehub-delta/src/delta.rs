//! Delta sequences and their application to document content.

use serde::{Deserialize, Serialize};

use crate::ops::{Attributes, DeltaOp, merge_attributes};

/// An ordered sequence of content operations.
///
/// Serializes as `{"ops": [...]}` — the exact shape the editor engine
/// produces and the persisted `data` column stores.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Delta {
    /// The operations, in application order.
    pub ops: Vec<DeltaOp>,
}

impl Delta {
    /// An empty delta.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a delta from operations.
    pub fn from_ops(ops: impl IntoIterator<Item = DeltaOp>) -> Self {
        let mut delta = Self::new();
        for op in ops {
            delta.push(op);
        }
        delta
    }

    /// Whether the delta carries no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Append an operation, merging it into the tail when both are the
    /// same kind with identical attributes. Zero-length operations are
    /// dropped.
    pub fn push(&mut self, op: DeltaOp) {
        match &op {
            DeltaOp::Insert { insert, .. } if insert.is_empty() => return,
            DeltaOp::Retain { retain: 0, .. } | DeltaOp::Delete { delete: 0 } => return,
            _ => {}
        }

        match (self.ops.last_mut(), &op) {
            (
                Some(DeltaOp::Insert {
                    insert: tail,
                    attributes: tail_attrs,
                }),
                DeltaOp::Insert { insert, attributes },
            ) if tail_attrs == attributes => {
                tail.push_str(insert);
            }
            (
                Some(DeltaOp::Retain {
                    retain: tail,
                    attributes: tail_attrs,
                }),
                DeltaOp::Retain { retain, attributes },
            ) if tail_attrs == attributes => {
                *tail += retain;
            }
            (Some(DeltaOp::Delete { delete: tail }), DeltaOp::Delete { delete }) => {
                *tail += delete;
            }
            _ => self.ops.push(op),
        }
    }

    /// Character length of the content this delta describes (inserts only).
    pub fn len(&self) -> usize {
        self.ops
            .iter()
            .map(|op| match op {
                DeltaOp::Insert { insert, .. } => insert.chars().count(),
                _ => 0,
            })
            .sum()
    }

    /// The unformatted text of a content delta.
    pub fn plain_text(&self) -> String {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DeltaOp::Insert { insert, .. } => Some(insert.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Apply a change delta on top of this content state, producing the
    /// next content state.
    ///
    /// `self` must be a content delta (inserts only; any stray retain or
    /// delete operations contribute no content and are skipped). Retains
    /// and deletes in the change that run past the end of the content are
    /// forgiving no-ops — the streaming model carries no length proof, so
    /// an overrun is truncated rather than rejected.
    pub fn apply(&self, change: &Delta) -> Delta {
        let mut cursor = SpanCursor::new(&self.ops);
        let mut next = Delta::new();

        for op in &change.ops {
            match op {
                DeltaOp::Insert { insert, attributes } => {
                    next.push(DeltaOp::Insert {
                        insert: insert.clone(),
                        attributes: attributes.clone(),
                    });
                }
                DeltaOp::Retain { retain, attributes } => {
                    for (text, base_attrs) in cursor.take(*retain) {
                        next.push(DeltaOp::Insert {
                            insert: text,
                            attributes: merge_attributes(base_attrs.as_ref(), attributes.as_ref()),
                        });
                    }
                }
                DeltaOp::Delete { delete } => {
                    cursor.take(*delete);
                }
            }
        }

        for (text, attributes) in cursor.take_rest() {
            next.push(DeltaOp::Insert {
                insert: text,
                attributes,
            });
        }

        next
    }
}

/// Walks the insert spans of a content delta, yielding character runs.
struct SpanCursor<'a> {
    ops: std::slice::Iter<'a, DeltaOp>,
    /// Remainder of the current insert span.
    current: Option<(std::str::Chars<'a>, Option<&'a Attributes>)>,
}

impl<'a> SpanCursor<'a> {
    fn new(ops: &'a [DeltaOp]) -> Self {
        Self {
            ops: ops.iter(),
            current: None,
        }
    }

    fn advance(&mut self) -> bool {
        for op in self.ops.by_ref() {
            if let DeltaOp::Insert { insert, attributes } = op {
                self.current = Some((insert.chars(), attributes.as_ref()));
                return true;
            }
        }
        false
    }

    /// Take up to `n` characters, grouped by their span's attributes.
    fn take(&mut self, mut n: usize) -> Vec<(String, Option<Attributes>)> {
        let mut spans = Vec::new();
        while n > 0 {
            if self.current.is_none() && !self.advance() {
                break;
            }
            let Some((chars, attributes)) = self.current.as_mut() else {
                break;
            };
            let taken: String = chars.by_ref().take(n).collect();
            if taken.is_empty() {
                self.current = None;
                continue;
            }
            n -= taken.chars().count();
            spans.push((taken, attributes.cloned()));
        }
        spans
    }

    /// Take every remaining character.
    fn take_rest(&mut self) -> Vec<(String, Option<Attributes>)> {
        self.take(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: serde_json::Value) -> Attributes {
        value.as_object().expect("attribute object").clone()
    }

    #[test]
    fn test_push_merges_adjacent_inserts() {
        let delta = Delta::from_ops([DeltaOp::insert("he"), DeltaOp::insert("llo")]);
        assert_eq!(delta.ops, vec![DeltaOp::insert("hello")]);
    }

    #[test]
    fn test_push_keeps_differently_formatted_inserts_apart() {
        let delta = Delta::from_ops([
            DeltaOp::insert("plain"),
            DeltaOp::insert_with("bold", attrs(json!({"bold": true}))),
        ]);
        assert_eq!(delta.ops.len(), 2);
    }

    #[test]
    fn test_apply_insert_into_middle() {
        let doc = Delta::from_ops([DeltaOp::insert("helo")]);
        let change = Delta::from_ops([DeltaOp::retain(2), DeltaOp::insert("l")]);
        assert_eq!(doc.apply(&change).plain_text(), "hello");
    }

    #[test]
    fn test_apply_delete() {
        let doc = Delta::from_ops([DeltaOp::insert("hello world")]);
        let change = Delta::from_ops([DeltaOp::retain(5), DeltaOp::delete(6)]);
        assert_eq!(doc.apply(&change).plain_text(), "hello");
    }

    #[test]
    fn test_apply_reformats_retained_span() {
        let doc = Delta::from_ops([DeltaOp::insert("hello")]);
        let change = Delta::from_ops([DeltaOp::retain_with(5, attrs(json!({"bold": true})))]);
        let next = doc.apply(&change);
        assert_eq!(
            next.ops,
            vec![DeltaOp::insert_with("hello", attrs(json!({"bold": true})))]
        );
    }

    #[test]
    fn test_apply_overrun_is_truncated() {
        let doc = Delta::from_ops([DeltaOp::insert("hi")]);
        let change = Delta::from_ops([DeltaOp::retain(10), DeltaOp::delete(10)]);
        assert_eq!(doc.apply(&change).plain_text(), "hi");
    }

    #[test]
    fn test_apply_into_empty_document() {
        let doc = Delta::new();
        let change = Delta::from_ops([DeltaOp::insert("hi")]);
        assert_eq!(doc.apply(&change).plain_text(), "hi");
        assert_eq!(doc.apply(&change).len(), 2);
    }

    #[test]
    fn test_len_counts_characters_not_bytes() {
        let doc = Delta::from_ops([DeltaOp::insert("héllo")]);
        assert_eq!(doc.len(), 5);
    }
}
