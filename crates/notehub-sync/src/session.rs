//! One open document's synchronization session.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use notehub_core::result::AppResult;
use notehub_core::types::id::{FileId, FolderId, UserId, WorkspaceId};
use notehub_core::types::redirect::Redirect;
use notehub_database::DocumentRecords;
use notehub_delta::codec::encode;
use notehub_editor::{EditorBuffer, Source};
use notehub_entity::{
    CollaboratorIdentity, DocumentHandle, DocumentKind, UpdateFile, UpdateFolder, UpdateWorkspace,
};
use notehub_realtime::client::RealtimeConnection;
use notehub_realtime::message::{ClientMessage, ServerMessage};
use notehub_realtime::presence::{PresenceEvent, PresenceHandle, PresenceSubscription};
use notehub_state::{Action, StateStore};

use crate::collaborators::CollaboratorTracker;
use crate::save_state::SaveState;

/// Everything a running session needs; assembled by the coordinator.
pub(crate) struct SessionParts {
    pub handle: DocumentHandle,
    pub workspace_ctx: Option<WorkspaceId>,
    pub folder_ctx: Option<FolderId>,
    pub store: Arc<StateStore>,
    pub records: Arc<dyn DocumentRecords>,
    pub connection: Arc<RealtimeConnection>,
    pub buffer: Arc<EditorBuffer>,
    pub tracker: CollaboratorTracker,
    pub presence: PresenceSubscription,
    pub user_id: UserId,
    pub save_debounce: Duration,
}

/// A live synchronization session for one open document.
///
/// Owns every subscription and timer the document needs. [`close`]
/// (also run on drop) is the disposer: it aborts the event loops, clears
/// any pending debounced persist so a stale write cannot overwrite newer
/// server state after navigation, and releases the room and presence
/// memberships. Exactly once, no matter how often it is called.
///
/// [`close`]: DocumentSession::close
pub struct DocumentSession {
    handle: DocumentHandle,
    workspace_ctx: Option<WorkspaceId>,
    folder_ctx: Option<FolderId>,
    store: Arc<StateStore>,
    records: Arc<dyn DocumentRecords>,
    connection: Arc<RealtimeConnection>,
    buffer: Arc<EditorBuffer>,
    tracker: Arc<Mutex<CollaboratorTracker>>,
    presence: PresenceHandle,
    save_rx: watch::Receiver<SaveState>,
    tasks: Vec<JoinHandle<()>>,
    closed: bool,
}

impl DocumentSession {
    /// Wire the event loops and start the session.
    pub(crate) fn start(parts: SessionParts) -> Self {
        let SessionParts {
            handle,
            workspace_ctx,
            folder_ctx,
            store,
            records,
            connection,
            buffer,
            tracker,
            presence,
            user_id,
            save_debounce,
        } = parts;

        let (save_tx, save_rx) = watch::channel(SaveState::Idle);
        let tracker = Arc::new(Mutex::new(tracker));
        let presence_handle = presence.handle();
        let mut tasks = Vec::with_capacity(4);

        // Local edits: broadcast immediately, persist after the debounce
        // window closes with no newer edit superseding it.
        {
            let buffer = buffer.clone();
            let connection = connection.clone();
            let records = records.clone();
            let store = store.clone();
            let mut content_rx = buffer.subscribe_content();
            tasks.push(tokio::spawn(async move {
                let mut deadline: Option<Instant> = None;
                loop {
                    tokio::select! {
                        change = content_rx.recv() => match change {
                            Ok(change) => {
                                if change.source != Source::User {
                                    continue;
                                }
                                connection.emit(ClientMessage::SendChanges {
                                    document_id: handle.id,
                                    delta: change.delta,
                                });
                                let _ = save_tx.send(SaveState::Dirty);
                                deadline = Some(Instant::now() + save_debounce);
                            }
                            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                                warn!(skipped, document = %handle, "edit stream lagged");
                            }
                            Err(broadcast::error::RecvError::Closed) => break,
                        },
                        _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)),
                            if deadline.is_some() =>
                        {
                            deadline = None;
                            persist_snapshot(
                                handle,
                                workspace_ctx,
                                folder_ctx,
                                &buffer,
                                records.as_ref(),
                                &store,
                                &save_tx,
                            )
                            .await;
                        }
                    }
                }
            }));
        }

        // Inbound room events for this document; everything else is
        // some other room's traffic and gets discarded.
        {
            let buffer = buffer.clone();
            let tracker = tracker.clone();
            let mut events = connection.events();
            tasks.push(tokio::spawn(async move {
                loop {
                    match events.recv().await {
                        Ok(msg) if msg.document_id() == handle.id => match msg {
                            ServerMessage::ReceiveChanges { delta, .. } => {
                                buffer.update_contents(delta);
                            }
                            ServerMessage::ReceiveCursorMove {
                                user_key, range, ..
                            } => {
                                if !tracker.lock().await.move_cursor(&user_key, range) {
                                    trace!(%user_key, "cursor move for unknown peer dropped");
                                }
                            }
                        },
                        Ok(_) => continue,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(skipped, document = %handle, "room event stream lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }));
        }

        // Local selection moves broadcast as cursor updates.
        {
            let connection = connection.clone();
            let mut selection_rx = buffer.subscribe_selection();
            tasks.push(tokio::spawn(async move {
                loop {
                    match selection_rx.recv().await {
                        Ok(change) => {
                            if change.source != Source::User {
                                continue;
                            }
                            let Some(range) = change.range else { continue };
                            connection.emit(ClientMessage::SendCursorMove {
                                document_id: handle.id,
                                user_key: user_id.to_string(),
                                range,
                            });
                        }
                        Err(broadcast::error::RecvError::Lagged(_)) => continue,
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }));
        }

        // Presence snapshots drive collaborator cursors.
        {
            let tracker = tracker.clone();
            let mut presence = presence;
            tasks.push(tokio::spawn(async move {
                while let Some(event) = presence.recv().await {
                    match event {
                        PresenceEvent::Sync { members } => {
                            tracker.lock().await.sync(members);
                        }
                    }
                }
            }));
        }

        debug!(document = %handle, "document session started");

        Self {
            handle,
            workspace_ctx,
            folder_ctx,
            store,
            records,
            connection,
            buffer,
            tracker,
            presence: presence_handle,
            save_rx,
            tasks,
            closed: false,
        }
    }

    /// The open document.
    pub fn document(&self) -> DocumentHandle {
        self.handle
    }

    /// The editor buffer this session synchronizes.
    pub fn buffer(&self) -> Arc<EditorBuffer> {
        self.buffer.clone()
    }

    /// The current save state (the badge value).
    pub fn save_state(&self) -> SaveState {
        *self.save_rx.borrow()
    }

    /// Watch save-state transitions.
    pub fn watch_save_state(&self) -> watch::Receiver<SaveState> {
        self.save_rx.clone()
    }

    /// Everyone currently viewing the document, local user included.
    pub async fn collaborators(&self) -> Vec<CollaboratorIdentity> {
        self.tracker.lock().await.members()
    }

    /// Clear the document's trash flag, locally and in the record store.
    pub async fn restore(&self) -> AppResult<()> {
        match self.handle.kind {
            DocumentKind::File => {
                let (Some(workspace_id), Some(folder_id)) = (self.workspace_ctx, self.folder_ctx)
                else {
                    return Ok(());
                };
                self.store.dispatch(Action::UpdateFile {
                    workspace_id,
                    folder_id,
                    file_id: FileId::from_uuid(self.handle.id),
                    update: UpdateFile::restore(),
                });
                self.records
                    .update_file(&UpdateFile::restore(), FileId::from_uuid(self.handle.id))
                    .await
            }
            DocumentKind::Folder => {
                let Some(workspace_id) = self.workspace_ctx else {
                    return Ok(());
                };
                self.store.dispatch(Action::UpdateFolder {
                    workspace_id,
                    folder_id: FolderId::from_uuid(self.handle.id),
                    update: UpdateFolder::restore(),
                });
                self.records
                    .update_folder(&UpdateFolder::restore(), FolderId::from_uuid(self.handle.id))
                    .await
            }
            DocumentKind::Workspace => {
                self.store.dispatch(Action::UpdateWorkspace {
                    workspace_id: WorkspaceId::from_uuid(self.handle.id),
                    update: UpdateWorkspace::restore(),
                });
                self.records
                    .update_workspace(
                        &UpdateWorkspace::restore(),
                        WorkspaceId::from_uuid(self.handle.id),
                    )
                    .await
            }
        }
    }

    /// Permanently delete the document and report where navigation
    /// should go instead: the parent workspace, or the dashboard for a
    /// deleted workspace.
    pub async fn delete(&self) -> AppResult<Redirect> {
        match self.handle.kind {
            DocumentKind::File => {
                let file_id = FileId::from_uuid(self.handle.id);
                if let (Some(workspace_id), Some(folder_id)) = (self.workspace_ctx, self.folder_ctx)
                {
                    self.store.dispatch(Action::DeleteFile {
                        workspace_id,
                        folder_id,
                        file_id,
                    });
                }
                self.records.delete_file(file_id).await?;
                Ok(self
                    .workspace_ctx
                    .map(Redirect::Workspace)
                    .unwrap_or(Redirect::Dashboard))
            }
            DocumentKind::Folder => {
                let folder_id = FolderId::from_uuid(self.handle.id);
                if let Some(workspace_id) = self.workspace_ctx {
                    self.store.dispatch(Action::DeleteFolder {
                        workspace_id,
                        folder_id,
                    });
                }
                self.records.delete_folder(folder_id).await?;
                Ok(self
                    .workspace_ctx
                    .map(Redirect::Workspace)
                    .unwrap_or(Redirect::Dashboard))
            }
            DocumentKind::Workspace => {
                let workspace_id = WorkspaceId::from_uuid(self.handle.id);
                self.store.dispatch(Action::DeleteWorkspace { workspace_id });
                self.records.delete_workspace(workspace_id).await?;
                Ok(Redirect::Dashboard)
            }
        }
    }

    /// Tear the session down: abort the event loops, drop any pending
    /// debounced persist, leave the room, release the presence
    /// membership. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        for task in self.tasks.drain(..) {
            task.abort();
        }
        self.presence.leave();
        self.connection.leave_room(self.handle.id);
        debug!(document = %self.handle, "document session closed");
    }
}

impl Drop for DocumentSession {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for DocumentSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentSession")
            .field("document", &self.handle)
            .field("closed", &self.closed)
            .finish()
    }
}

/// Debounce-fire path: snapshot the buffer, persist via update-by-id,
/// mirror the update into the state store, and land the save state on
/// `Idle`, or on `Failed` when the record layer rejects the write.
/// Local state stays authoritative either way; there is no retry loop.
async fn persist_snapshot(
    handle: DocumentHandle,
    workspace_ctx: Option<WorkspaceId>,
    folder_ctx: Option<FolderId>,
    buffer: &EditorBuffer,
    records: &dyn DocumentRecords,
    store: &StateStore,
    save_tx: &watch::Sender<SaveState>,
) {
    let _ = save_tx.send(SaveState::Saving);

    let contents = buffer.contents();
    let encoded = match encode(&contents) {
        Ok(encoded) => encoded,
        Err(error) => {
            warn!(document = %handle, %error, "could not encode buffer contents");
            let _ = save_tx.send(SaveState::Failed);
            return;
        }
    };

    let result = match handle.kind {
        DocumentKind::File => {
            if let (Some(workspace_id), Some(folder_id)) = (workspace_ctx, folder_ctx) {
                store.dispatch(Action::UpdateFile {
                    workspace_id,
                    folder_id,
                    file_id: FileId::from_uuid(handle.id),
                    update: UpdateFile::data(encoded.clone()),
                });
            }
            records
                .update_file(&UpdateFile::data(encoded), FileId::from_uuid(handle.id))
                .await
        }
        DocumentKind::Folder => {
            if let Some(workspace_id) = workspace_ctx {
                store.dispatch(Action::UpdateFolder {
                    workspace_id,
                    folder_id: FolderId::from_uuid(handle.id),
                    update: UpdateFolder::data(encoded.clone()),
                });
            }
            records
                .update_folder(&UpdateFolder::data(encoded), FolderId::from_uuid(handle.id))
                .await
        }
        DocumentKind::Workspace => {
            store.dispatch(Action::UpdateWorkspace {
                workspace_id: WorkspaceId::from_uuid(handle.id),
                update: UpdateWorkspace::data(encoded.clone()),
            });
            records
                .update_workspace(
                    &UpdateWorkspace::data(encoded),
                    WorkspaceId::from_uuid(handle.id),
                )
                .await
        }
    };

    match result {
        Ok(()) => {
            trace!(document = %handle, "snapshot persisted");
            let _ = save_tx.send(SaveState::Idle);
        }
        Err(error) => {
            warn!(document = %handle, %error, "persist failed; local state remains authoritative");
            let _ = save_tx.send(SaveState::Failed);
        }
    }
}
