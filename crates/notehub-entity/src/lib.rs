//! # notehub-entity
//!
//! Domain entity models for NoteHub: the workspace → folder → file
//! document hierarchy, user accounts, and the ephemeral collaborator
//! identities announced into presence rooms.

pub mod document;
pub mod events;
pub mod user;

pub use document::file::{File, UpdateFile};
pub use events::FileRowChange;
pub use document::folder::{Folder, UpdateFolder};
pub use document::node::{DocumentHandle, DocumentKind, DocumentNode};
pub use document::workspace::{UpdateWorkspace, Workspace};
pub use user::{CollaboratorIdentity, User};
