//! Document rooms and their registry.

pub mod registry;
pub mod room;
