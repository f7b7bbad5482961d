//! In-memory [`DocumentRecords`] implementation.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;

use notehub_core::error::AppError;
use notehub_core::result::AppResult;
use notehub_core::types::id::{FileId, FolderId, UserId, WorkspaceId};
use notehub_entity::{
    File, FileRowChange, Folder, UpdateFile, UpdateFolder, UpdateWorkspace, User, Workspace,
};

use crate::records::DocumentRecords;

/// Dashmap-backed record store for tests, demos, and headless
/// embeddings. Mirrors the PostgreSQL implementation's semantics,
/// including the created_at-ordered listings, and additionally emits the
/// file-table change feed in-process.
#[derive(Debug)]
pub struct MemoryRecords {
    workspaces: DashMap<WorkspaceId, Workspace>,
    folders: DashMap<FolderId, Folder>,
    files: DashMap<FileId, File>,
    users: DashMap<UserId, User>,
    file_changes: broadcast::Sender<FileRowChange>,
    update_calls: AtomicUsize,
    fail_updates: AtomicBool,
}

impl MemoryRecords {
    /// An empty store.
    pub fn new() -> Self {
        let (file_changes, _) = broadcast::channel(64);
        Self {
            workspaces: DashMap::new(),
            folders: DashMap::new(),
            files: DashMap::new(),
            users: DashMap::new(),
            file_changes,
            update_calls: AtomicUsize::new(0),
            fail_updates: AtomicBool::new(false),
        }
    }

    /// Seed a user account.
    pub fn insert_user(&self, user: User) {
        self.users.insert(user.id, user);
    }

    /// Subscribe to the file-table change feed.
    pub fn subscribe_file_changes(&self) -> broadcast::Receiver<FileRowChange> {
        self.file_changes.subscribe()
    }

    /// Number of update calls served so far (all entity kinds).
    pub fn update_call_count(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Make every subsequent update call fail, for exercising the
    /// persistence-failure path.
    pub fn fail_next_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    fn record_update(&self) -> AppResult<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::persistence("Record store rejected the update"));
        }
        Ok(())
    }
}

impl Default for MemoryRecords {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentRecords for MemoryRecords {
    async fn workspace_details(&self, id: WorkspaceId) -> AppResult<Option<Workspace>> {
        Ok(self.workspaces.get(&id).map(|w| w.value().clone()))
    }

    async fn folder_details(&self, id: FolderId) -> AppResult<Option<Folder>> {
        Ok(self.folders.get(&id).map(|f| f.value().clone()))
    }

    async fn file_details(&self, id: FileId) -> AppResult<Option<File>> {
        Ok(self.files.get(&id).map(|f| f.value().clone()))
    }

    async fn create_workspace(&self, workspace: &Workspace) -> AppResult<()> {
        self.workspaces.insert(workspace.id, workspace.clone());
        Ok(())
    }

    async fn create_folder(&self, folder: &Folder) -> AppResult<()> {
        self.folders.insert(folder.id, folder.clone());
        Ok(())
    }

    async fn create_file(&self, file: &File) -> AppResult<()> {
        self.files.insert(file.id, file.clone());
        let _ = self.file_changes.send(FileRowChange::Inserted(file.clone()));
        Ok(())
    }

    async fn update_workspace(&self, update: &UpdateWorkspace, id: WorkspaceId) -> AppResult<()> {
        self.record_update()?;
        match self.workspaces.get_mut(&id) {
            Some(mut workspace) => {
                update.apply_to(&mut workspace);
                Ok(())
            }
            None => Err(AppError::not_found(format!("Workspace {id} not found"))),
        }
    }

    async fn update_folder(&self, update: &UpdateFolder, id: FolderId) -> AppResult<()> {
        self.record_update()?;
        match self.folders.get_mut(&id) {
            Some(mut folder) => {
                update.apply_to(&mut folder);
                Ok(())
            }
            None => Err(AppError::not_found(format!("Folder {id} not found"))),
        }
    }

    async fn update_file(&self, update: &UpdateFile, id: FileId) -> AppResult<()> {
        self.record_update()?;
        let updated = match self.files.get_mut(&id) {
            Some(mut file) => {
                update.apply_to(&mut file);
                file.clone()
            }
            None => return Err(AppError::not_found(format!("File {id} not found"))),
        };
        let _ = self.file_changes.send(FileRowChange::Updated(updated));
        Ok(())
    }

    async fn delete_workspace(&self, id: WorkspaceId) -> AppResult<()> {
        self.workspaces.remove(&id);
        Ok(())
    }

    async fn delete_folder(&self, id: FolderId) -> AppResult<()> {
        self.folders.remove(&id);
        Ok(())
    }

    async fn delete_file(&self, id: FileId) -> AppResult<()> {
        if self.files.remove(&id).is_some() {
            let _ = self.file_changes.send(FileRowChange::Deleted(id));
        }
        Ok(())
    }

    async fn folders_in_workspace(&self, workspace_id: WorkspaceId) -> AppResult<Vec<Folder>> {
        let mut folders: Vec<Folder> = self
            .folders
            .iter()
            .filter(|entry| entry.workspace_id == workspace_id)
            .map(|entry| entry.value().clone())
            .collect();
        folders.sort_by_key(|f| f.created_at);
        Ok(folders)
    }

    async fn files_in_folder(&self, folder_id: FolderId) -> AppResult<Vec<File>> {
        let mut files: Vec<File> = self
            .files
            .iter()
            .filter(|entry| entry.folder_id == folder_id)
            .map(|entry| entry.value().clone())
            .collect();
        files.sort_by_key(|f| f.created_at);
        Ok(files)
    }

    async fn find_user(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn file(folder_id: FolderId, title: &str, age_minutes: i64) -> File {
        File {
            id: FileId::new(),
            workspace_id: WorkspaceId::new(),
            folder_id,
            title: title.to_string(),
            icon_id: "📄".to_string(),
            data: None,
            in_trash: None,
            created_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[tokio::test]
    async fn test_files_listing_is_ordered_by_created_at() {
        let records = MemoryRecords::new();
        let folder_id = FolderId::new();
        records.create_file(&file(folder_id, "b", 5)).await.expect("create");
        records.create_file(&file(folder_id, "c", 1)).await.expect("create");
        records.create_file(&file(folder_id, "a", 10)).await.expect("create");

        let titles: Vec<String> = records
            .files_in_folder(folder_id)
            .await
            .expect("list")
            .into_iter()
            .map(|f| f.title)
            .collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_update_missing_file_is_not_found() {
        let records = MemoryRecords::new();
        let err = records
            .update_file(&UpdateFile::default(), FileId::new())
            .await
            .expect_err("missing row");
        assert!(err.is_missing_document());
    }

    #[tokio::test]
    async fn test_change_feed_reports_inserts_and_deletes() {
        let records = MemoryRecords::new();
        let mut feed = records.subscribe_file_changes();
        let f = file(FolderId::new(), "draft", 0);
        let id = f.id;

        records.create_file(&f).await.expect("create");
        records.delete_file(id).await.expect("delete");

        assert!(matches!(
            feed.try_recv().expect("insert event"),
            FileRowChange::Inserted(_)
        ));
        assert!(matches!(
            feed.try_recv().expect("delete event"),
            FileRowChange::Deleted(deleted) if deleted == id
        ));
    }
}
