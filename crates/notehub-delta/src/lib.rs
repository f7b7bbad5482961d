//! # notehub-delta
//!
//! Ordered content-operation sequences ("deltas") describing rich-text
//! document state and changes to it, plus the codec that moves them in and
//! out of the persisted `data` column.
//!
//! A document's content is itself a delta consisting only of inserts; a
//! change is a delta of retain/insert/delete operations applied on top.
//! This is a streaming last-applier-wins model: deltas carry no causal
//! metadata, and concurrent edits are applied in arrival order.

pub mod codec;
pub mod delta;
pub mod ops;
pub mod range;

pub use codec::{decode, encode};
pub use delta::Delta;
pub use ops::{Attributes, DeltaOp};
pub use range::Range;
