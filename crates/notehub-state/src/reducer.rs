//! The pure reducer.

use notehub_core::types::id::{FolderId, WorkspaceId};

use crate::actions::Action;
use crate::tree::{AppState, FolderNode};

/// Given the current state and one action, produce the next state.
/// Never mutates in place; callers keep the old snapshot valid.
///
/// Every action that inserts into a sibling list re-sorts that list
/// ascending by `created_at` — the sole sibling sort key. `SetFiles`
/// trusts the record layer's ordered query and does not re-sort.
pub fn reduce(state: &AppState, action: Action) -> AppState {
    let mut next = state.clone();
    match action {
        Action::AddWorkspace { workspace } => {
            next.workspaces.push(workspace);
        }
        Action::DeleteWorkspace { workspace_id } => {
            next.workspaces
                .retain(|node| node.workspace.id != workspace_id);
        }
        Action::UpdateWorkspace {
            workspace_id,
            update,
        } => {
            if let Some(node) = next
                .workspaces
                .iter_mut()
                .find(|node| node.workspace.id == workspace_id)
            {
                update.apply_to(&mut node.workspace);
            }
        }
        Action::SetWorkspaces { workspaces } => {
            next.workspaces = workspaces;
        }
        Action::SetFolders {
            workspace_id,
            mut folders,
        } => {
            folders.sort_by_key(|node| node.folder.created_at);
            if let Some(node) = next
                .workspaces
                .iter_mut()
                .find(|node| node.workspace.id == workspace_id)
            {
                node.folders = folders;
            }
        }
        Action::AddFolder {
            workspace_id,
            folder,
        } => {
            if let Some(node) = next
                .workspaces
                .iter_mut()
                .find(|node| node.workspace.id == workspace_id)
            {
                node.folders.push(folder);
                node.folders.sort_by_key(|node| node.folder.created_at);
            }
        }
        Action::UpdateFolder {
            workspace_id,
            folder_id,
            update,
        } => {
            if let Some(folder) = find_folder(&mut next, workspace_id, folder_id) {
                update.apply_to(&mut folder.folder);
            }
        }
        Action::DeleteFolder {
            workspace_id,
            folder_id,
        } => {
            if let Some(node) = next
                .workspaces
                .iter_mut()
                .find(|node| node.workspace.id == workspace_id)
            {
                node.folders.retain(|node| node.folder.id != folder_id);
            }
        }
        Action::SetFiles {
            workspace_id,
            folder_id,
            files,
        } => {
            if let Some(folder) = find_folder(&mut next, workspace_id, folder_id) {
                folder.files = files;
            }
        }
        Action::AddFile {
            workspace_id,
            folder_id,
            file,
        } => {
            if let Some(folder) = find_folder(&mut next, workspace_id, folder_id) {
                folder.files.push(file);
                folder.files.sort_by_key(|file| file.created_at);
            }
        }
        Action::UpdateFile {
            workspace_id,
            folder_id,
            file_id,
            update,
        } => {
            if let Some(folder) = find_folder(&mut next, workspace_id, folder_id) {
                if let Some(file) = folder.files.iter_mut().find(|file| file.id == file_id) {
                    update.apply_to(file);
                }
            }
        }
        Action::DeleteFile {
            workspace_id,
            folder_id,
            file_id,
        } => {
            if let Some(folder) = find_folder(&mut next, workspace_id, folder_id) {
                folder.files.retain(|file| file.id != file_id);
            }
        }
        // Unknown mutations leave the tree as it was. (The system this
        // design descends from reset to the initial state here, which
        // silently wiped the loaded tree; returning `next` unchanged is
        // the corrected behavior, pinned by a regression test.)
        Action::Noop => {}
    }
    next
}

fn find_folder(
    state: &mut AppState,
    workspace_id: WorkspaceId,
    folder_id: FolderId,
) -> Option<&mut FolderNode> {
    state
        .workspaces
        .iter_mut()
        .find(|node| node.workspace.id == workspace_id)?
        .folders
        .iter_mut()
        .find(|node| node.folder.id == folder_id)
}
