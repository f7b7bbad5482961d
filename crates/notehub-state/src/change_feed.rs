//! Application of database change-feed notifications.
//!
//! The record store emits row-level notifications for the file table so
//! sibling clients' navigation trees stay fresh even without an open
//! document connection. This module translates those rows into store
//! actions.

use tracing::debug;

use notehub_core::types::redirect::Redirect;
use notehub_entity::{FileRowChange, UpdateFile};

use crate::actions::Action;
use crate::store::StateStore;

/// Fold one change-feed notification into the store.
///
/// Returns a redirect when the change invalidates the caller's current
/// view (the viewed file was deleted under them).
pub fn apply_change(store: &StateStore, change: FileRowChange) -> Option<Redirect> {
    match change {
        FileRowChange::Inserted(file) => {
            // The local client that created the file already inserted it
            // optimistically; only genuinely new rows get added.
            let snapshot = store.snapshot();
            if snapshot
                .file(file.workspace_id, file.folder_id, file.id)
                .is_none()
            {
                debug!(file_id = %file.id, "change feed: new file row");
                store.dispatch(Action::AddFile {
                    workspace_id: file.workspace_id,
                    folder_id: file.folder_id,
                    file,
                });
            }
            None
        }
        FileRowChange::Deleted(file_id) => {
            let snapshot = store.snapshot();
            let (workspace_id, folder_id) = snapshot.locate_file(file_id)?;
            debug!(%file_id, "change feed: file row deleted");
            store.dispatch(Action::DeleteFile {
                workspace_id,
                folder_id,
                file_id,
            });
            Some(Redirect::Workspace(workspace_id))
        }
        FileRowChange::Updated(file) => {
            let snapshot = store.snapshot();
            if snapshot
                .file(file.workspace_id, file.folder_id, file.id)
                .is_some()
            {
                store.dispatch(Action::UpdateFile {
                    workspace_id: file.workspace_id,
                    folder_id: file.folder_id,
                    file_id: file.id,
                    update: UpdateFile {
                        title: Some(file.title),
                        icon_id: Some(file.icon_id),
                        in_trash: Some(file.in_trash),
                        ..UpdateFile::default()
                    },
                });
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{FolderNode, WorkspaceNode};
    use chrono::Utc;
    use notehub_core::types::id::{FileId, FolderId, UserId, WorkspaceId};
    use notehub_entity::{File, Folder, Workspace};

    fn seeded_store() -> (StateStore, WorkspaceId, FolderId) {
        let workspace = Workspace {
            id: WorkspaceId::new(),
            owner_id: UserId::new(),
            title: "home".to_string(),
            icon_id: "📝".to_string(),
            data: None,
            in_trash: None,
            logo: None,
            created_at: Utc::now(),
        };
        let folder = Folder {
            id: FolderId::new(),
            workspace_id: workspace.id,
            title: "notes".to_string(),
            icon_id: "📁".to_string(),
            data: None,
            in_trash: None,
            created_at: Utc::now(),
        };
        let (ws_id, fo_id) = (workspace.id, folder.id);

        let store = StateStore::new();
        store.dispatch(Action::SetWorkspaces {
            workspaces: vec![WorkspaceNode {
                workspace,
                folders: vec![FolderNode::new(folder)],
            }],
        });
        (store, ws_id, fo_id)
    }

    fn file(workspace_id: WorkspaceId, folder_id: FolderId) -> File {
        File {
            id: FileId::new(),
            workspace_id,
            folder_id,
            title: "draft".to_string(),
            icon_id: "📄".to_string(),
            data: None,
            in_trash: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_insert_dedupes_against_existing_rows() {
        let (store, ws_id, fo_id) = seeded_store();
        let f = file(ws_id, fo_id);

        assert!(apply_change(&store, FileRowChange::Inserted(f.clone())).is_none());
        assert!(apply_change(&store, FileRowChange::Inserted(f)).is_none());

        let snapshot = store.snapshot();
        assert_eq!(snapshot.folder(ws_id, fo_id).expect("folder").files.len(), 1);
    }

    #[test]
    fn test_delete_redirects_to_owning_workspace() {
        let (store, ws_id, fo_id) = seeded_store();
        let f = file(ws_id, fo_id);
        let file_id = f.id;
        apply_change(&store, FileRowChange::Inserted(f));

        let redirect = apply_change(&store, FileRowChange::Deleted(file_id));
        assert_eq!(redirect, Some(Redirect::Workspace(ws_id)));
        assert!(store.snapshot().file(ws_id, fo_id, file_id).is_none());
    }

    #[test]
    fn test_delete_of_unknown_row_is_ignored() {
        let (store, _, _) = seeded_store();
        assert!(apply_change(&store, FileRowChange::Deleted(FileId::new())).is_none());
    }

    #[test]
    fn test_update_patches_navigation_fields_only() {
        let (store, ws_id, fo_id) = seeded_store();
        let mut f = file(ws_id, fo_id);
        let file_id = f.id;
        apply_change(&store, FileRowChange::Inserted(f.clone()));

        f.title = "renamed".to_string();
        f.data = Some("should not overwrite".to_string());
        apply_change(&store, FileRowChange::Updated(f));

        let snapshot = store.snapshot();
        let stored = snapshot.file(ws_id, fo_id, file_id).expect("file");
        assert_eq!(stored.title, "renamed");
        // Content flows through the sync path, not the change feed.
        assert!(stored.data.is_none());
    }
}
