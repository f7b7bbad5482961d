//! Shared harness for sync integration tests: an in-process relay hub,
//! presence registry, and memory record store wired into per-client
//! coordinators.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use notehub_core::config::realtime::RealtimeConfig;
use notehub_core::config::sync::SyncConfig;
use notehub_core::types::id::{FileId, FolderId, UserId, WorkspaceId};
use notehub_database::{DocumentRecords, MemoryRecords};
use notehub_editor::{CursorOverlay, EditorBuffer};
use notehub_entity::{DocumentKind, File, Folder, User, Workspace};
use notehub_realtime::{PresenceRegistry, RealtimeClient, RelayHub};
use notehub_state::StateStore;
use notehub_sync::{DocumentContext, DocumentSession, OpenOutcome, SyncCoordinator};

/// The infrastructure every client in a test shares.
pub struct TestWorld {
    pub hub: Arc<RelayHub>,
    pub presence: Arc<PresenceRegistry>,
    pub records: Arc<MemoryRecords>,
}

impl TestWorld {
    pub fn new() -> Self {
        let realtime = RealtimeConfig::default();
        Self {
            hub: Arc::new(RelayHub::new(&realtime)),
            presence: Arc::new(PresenceRegistry::new(realtime.presence_buffer_size)),
            records: Arc::new(MemoryRecords::new()),
        }
    }

    /// Register a user account and build a client process around it.
    pub fn client(&self, email: &str) -> TestClient {
        let user = User {
            id: UserId::new(),
            email: email.to_string(),
            avatar_url: None,
        };
        self.records.insert_user(user.clone());

        let store = Arc::new(StateStore::new());
        let coordinator = SyncCoordinator::new(
            store.clone(),
            self.records.clone(),
            Arc::new(RealtimeClient::new(self.hub.clone())),
            self.presence.clone(),
            SyncConfig::default(),
            user.clone(),
        );
        TestClient {
            store,
            coordinator,
            buffer: Arc::new(EditorBuffer::new(64)),
            cursors: Arc::new(CursorOverlay::new()),
            user,
        }
    }

    /// Seed a workspace → folder → file chain and return it.
    pub async fn seed_tree(&self, owner: UserId) -> (Workspace, Folder, File) {
        let workspace = Workspace {
            id: WorkspaceId::new(),
            owner_id: owner,
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
        let file = File {
            id: FileId::new(),
            workspace_id: workspace.id,
            folder_id: folder.id,
            title: "draft".to_string(),
            icon_id: "📄".to_string(),
            data: None,
            in_trash: None,
            created_at: Utc::now(),
        };
        self.records.create_workspace(&workspace).await.expect("seed workspace");
        self.records.create_folder(&folder).await.expect("seed folder");
        self.records.create_file(&file).await.expect("seed file");
        (workspace, folder, file)
    }
}

/// One simulated client process: its own store, buffer, cursor overlay,
/// and coordinator, sharing the world's hub/presence/records.
pub struct TestClient {
    pub store: Arc<StateStore>,
    pub coordinator: SyncCoordinator,
    pub buffer: Arc<EditorBuffer>,
    pub cursors: Arc<CursorOverlay>,
    pub user: User,
}

impl TestClient {
    /// Open a file document and expect a live session.
    pub async fn open_file(&self, file: &File) -> DocumentSession {
        let outcome = self
            .coordinator
            .open_document(
                DocumentKind::File,
                &file.id.to_string(),
                DocumentContext {
                    workspace_id: Some(file.workspace_id),
                    folder_id: Some(file.folder_id),
                },
                self.buffer.clone(),
                self.cursors.clone(),
            )
            .await
            .expect("open should not error");
        match outcome {
            OpenOutcome::Opened(session) => session,
            OpenOutcome::Redirected(redirect) => panic!("unexpected redirect: {redirect:?}"),
        }
    }
}

/// Let spawned session tasks drain their queues (and, under a paused
/// clock, advance virtual time by a millisecond).
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
