//! Opening documents and wiring their sessions.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use notehub_core::config::sync::SyncConfig;
use notehub_core::result::AppResult;
use notehub_core::types::id::{FileId, FolderId, WorkspaceId, parse_document_id};
use notehub_core::types::redirect::Redirect;
use notehub_database::DocumentRecords;
use notehub_delta::codec::decode;
use notehub_editor::{CursorModule, EditorBuffer};
use notehub_entity::{
    CollaboratorIdentity, DocumentHandle, DocumentKind, DocumentNode, UpdateFile, UpdateFolder,
    UpdateWorkspace, User,
};
use notehub_realtime::client::RealtimeClient;
use notehub_realtime::presence::PresenceRegistry;
use notehub_state::{Action, FolderNode, StateStore};

use crate::collaborators::CollaboratorTracker;
use crate::session::{DocumentSession, SessionParts};

/// Where the caller currently is in the hierarchy, as far as it knows.
/// Used to pick the redirect fallback before a node is loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentContext {
    /// The workspace the caller is navigating within, if any.
    pub workspace_id: Option<WorkspaceId>,
    /// The folder the caller is navigating within, if any.
    pub folder_id: Option<FolderId>,
}

/// Result of trying to open a document.
#[derive(Debug)]
pub enum OpenOutcome {
    /// The document exists; its session is live.
    Opened(DocumentSession),
    /// The document cannot be shown; navigate here instead.
    Redirected(Redirect),
}

/// Builds document sessions from explicitly injected collaborators: the
/// state store, the record layer, the realtime client, and the presence
/// registry. One coordinator per client process.
pub struct SyncCoordinator {
    store: Arc<StateStore>,
    records: Arc<dyn DocumentRecords>,
    client: Arc<RealtimeClient>,
    presence: Arc<PresenceRegistry>,
    config: SyncConfig,
    user: User,
}

impl SyncCoordinator {
    /// Create a coordinator for the given local user.
    pub fn new(
        store: Arc<StateStore>,
        records: Arc<dyn DocumentRecords>,
        client: Arc<RealtimeClient>,
        presence: Arc<PresenceRegistry>,
        config: SyncConfig,
        user: User,
    ) -> Self {
        Self {
            store,
            records,
            client,
            presence,
            config,
            user,
        }
    }

    /// Open a document by its raw (URL-segment) id and start its
    /// synchronization session.
    ///
    /// An id that fails UUID-shape validation never reaches the record
    /// layer and redirects exactly like a missing row: to the workspace
    /// root when a workspace context exists, else to the dashboard.
    /// A node that exists but has no `data` yet opens with an empty
    /// buffer; malformed `data` fails closed to an empty buffer too.
    pub async fn open_document(
        &self,
        kind: DocumentKind,
        raw_id: &str,
        ctx: DocumentContext,
        buffer: Arc<EditorBuffer>,
        cursors: Arc<dyn CursorModule>,
    ) -> AppResult<OpenOutcome> {
        let id = match parse_document_id(raw_id) {
            Ok(id) => id,
            Err(error) => {
                warn!(%raw_id, %error, "invalid document id");
                return Ok(OpenOutcome::Redirected(fallback(ctx.workspace_id)));
            }
        };
        let handle = DocumentHandle::new(kind, id);

        let node = match self.load_node(handle).await {
            Ok(Some(node)) => node,
            Ok(None) => {
                debug!(document = %handle, "document not found");
                return Ok(OpenOutcome::Redirected(fallback(ctx.workspace_id)));
            }
            Err(error) => {
                warn!(document = %handle, %error, "document lookup failed");
                return Ok(OpenOutcome::Redirected(Redirect::Dashboard));
            }
        };

        let (workspace_ctx, folder_ctx) = match &node {
            DocumentNode::Workspace(w) => (Some(w.id), None),
            DocumentNode::Folder(f) => (Some(f.workspace_id), None),
            DocumentNode::File(f) => (Some(f.workspace_id), Some(f.folder_id)),
        };

        // Absent data means "no content yet": the buffer stays empty and
        // nothing is force-parsed. Malformed data opens empty as well.
        if let Some(data) = node.data() {
            match decode(Some(data)) {
                Ok(Some(contents)) => buffer.set_contents(contents),
                Ok(None) => {}
                Err(error) => {
                    warn!(document = %handle, %error, "malformed content; opening empty");
                }
            }
            self.mirror_loaded_data(&node, data.to_string());
        }

        let connection = self.client.connect();
        connection.join_room(id);

        let subscription = self.presence.subscribe(id);
        match self.records.find_user(self.user.id).await {
            Ok(Some(user)) => subscription.track(CollaboratorIdentity::from_user(&user)),
            Ok(None) => debug!(user = %self.user.id, "local user unknown; presence not announced"),
            Err(error) => {
                warn!(%error, "presence identity lookup failed; continuing without it");
            }
        }

        let tracker = CollaboratorTracker::new(self.user.id, cursors);
        let session = DocumentSession::start(SessionParts {
            handle,
            workspace_ctx,
            folder_ctx,
            store: self.store.clone(),
            records: self.records.clone(),
            connection,
            buffer,
            tracker,
            presence: subscription,
            user_id: self.user.id,
            save_debounce: Duration::from_millis(self.config.save_debounce_ms),
        });
        Ok(OpenOutcome::Opened(session))
    }

    /// Bulk-load a workspace's folders into the state store.
    pub async fn load_folders(&self, workspace_id: WorkspaceId) -> AppResult<()> {
        let folders = self.records.folders_in_workspace(workspace_id).await?;
        self.store.dispatch(Action::SetFolders {
            workspace_id,
            folders: folders.into_iter().map(FolderNode::new).collect(),
        });
        Ok(())
    }

    /// Bulk-load a folder's files into the state store.
    pub async fn load_files(
        &self,
        workspace_id: WorkspaceId,
        folder_id: FolderId,
    ) -> AppResult<()> {
        let files = self.records.files_in_folder(folder_id).await?;
        self.store.dispatch(Action::SetFiles {
            workspace_id,
            folder_id,
            files,
        });
        Ok(())
    }

    async fn load_node(&self, handle: DocumentHandle) -> AppResult<Option<DocumentNode>> {
        Ok(match handle.kind {
            DocumentKind::Workspace => self
                .records
                .workspace_details(WorkspaceId::from_uuid(handle.id))
                .await?
                .map(DocumentNode::Workspace),
            DocumentKind::Folder => self
                .records
                .folder_details(FolderId::from_uuid(handle.id))
                .await?
                .map(DocumentNode::Folder),
            DocumentKind::File => self
                .records
                .file_details(FileId::from_uuid(handle.id))
                .await?
                .map(DocumentNode::File),
        })
    }

    /// Mirror freshly loaded content into the shared tree, so navigation
    /// chrome renders from the same state the editor does.
    fn mirror_loaded_data(&self, node: &DocumentNode, data: String) {
        match node {
            DocumentNode::Workspace(w) => {
                self.store.dispatch(Action::UpdateWorkspace {
                    workspace_id: w.id,
                    update: UpdateWorkspace::data(data),
                });
            }
            DocumentNode::Folder(f) => {
                self.store.dispatch(Action::UpdateFolder {
                    workspace_id: f.workspace_id,
                    folder_id: f.id,
                    update: UpdateFolder::data(data),
                });
            }
            DocumentNode::File(f) => {
                self.store.dispatch(Action::UpdateFile {
                    workspace_id: f.workspace_id,
                    folder_id: f.folder_id,
                    file_id: f.id,
                    update: UpdateFile::data(data),
                });
            }
        }
    }
}

impl std::fmt::Debug for SyncCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncCoordinator")
            .field("user", &self.user.id)
            .finish()
    }
}

/// The redirect policy for anything that is not viewable: the workspace
/// root when a workspace context exists, the dashboard root otherwise.
fn fallback(workspace_id: Option<WorkspaceId>) -> Redirect {
    workspace_id
        .map(Redirect::Workspace)
        .unwrap_or(Redirect::Dashboard)
}
