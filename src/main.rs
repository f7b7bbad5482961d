//! NoteHub Server — collaborative document sync relay.
//!
//! Main entry point: wires the relay hub, presence registry, and record
//! store together, runs a short in-process collaboration demo, and then
//! serves until interrupted.

use std::sync::Arc;

use chrono::Utc;
use tracing_subscriber::{EnvFilter, fmt};

use notehub_core::config::AppConfig;
use notehub_core::error::AppError;
use notehub_core::types::id::{FileId, FolderId, UserId, WorkspaceId};
use notehub_database::{DatabasePool, DocumentRecords, MemoryRecords, PgRecords};
use notehub_delta::{Delta, DeltaOp};
use notehub_editor::{CursorOverlay, EditorBuffer};
use notehub_entity::{DocumentKind, File, Folder, User, Workspace};
use notehub_realtime::{PresenceRegistry, RealtimeClient, RelayHub};
use notehub_state::StateStore;
use notehub_sync::{DocumentContext, OpenOutcome, SyncCoordinator};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("NOTEHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting NoteHub v{}", env!("CARGO_PKG_VERSION"));

    let hub = Arc::new(RelayHub::new(&config.realtime));
    let presence = Arc::new(PresenceRegistry::new(config.realtime.presence_buffer_size));

    // Prefer the configured PostgreSQL record store; fall back to the
    // in-memory store so the relay stays usable without a database.
    let records: Arc<dyn DocumentRecords> = match DatabasePool::connect(&config.database).await {
        Ok(pool) => Arc::new(PgRecords::new(pool.pool().clone())),
        Err(error) => {
            tracing::warn!(%error, "database unavailable, using in-memory records");
            let records = Arc::new(MemoryRecords::new());
            seed_demo_tree(records.as_ref()).await?;
            records
        }
    };

    demo_session(&config, hub.clone(), presence.clone(), records.clone()).await?;

    tracing::info!("Relay hub ready; press ctrl-c to stop");
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| AppError::internal(format!("Signal handling failed: {e}")))?;

    tracing::info!("Shutting down");
    Ok(())
}

/// Open one document session against the wired subsystems, make an edit,
/// and wait for the debounced persist — a smoke check that the whole
/// pipeline works in this process.
async fn demo_session(
    config: &AppConfig,
    hub: Arc<RelayHub>,
    presence: Arc<PresenceRegistry>,
    records: Arc<dyn DocumentRecords>,
) -> Result<(), AppError> {
    let Some(user) = records.find_user(demo_user_id()).await? else {
        tracing::info!("No demo user in the record store; skipping demo session");
        return Ok(());
    };

    let store = Arc::new(StateStore::new());
    let coordinator = SyncCoordinator::new(
        store,
        records,
        Arc::new(RealtimeClient::new(hub)),
        presence,
        config.sync.clone(),
        user,
    );

    let buffer = Arc::new(EditorBuffer::new(config.realtime.channel_buffer_size));
    let outcome = coordinator
        .open_document(
            DocumentKind::File,
            &demo_file_id().to_string(),
            DocumentContext::default(),
            buffer.clone(),
            Arc::new(CursorOverlay::new()),
        )
        .await?;

    let session = match outcome {
        OpenOutcome::Opened(session) => session,
        OpenOutcome::Redirected(redirect) => {
            tracing::info!(?redirect, "demo document unavailable");
            return Ok(());
        }
    };

    buffer.apply_local(Delta::from_ops([DeltaOp::insert("Welcome to NoteHub\n")]));
    tokio::time::sleep(std::time::Duration::from_millis(config.sync.save_debounce_ms + 100)).await;
    tracing::info!(
        save_state = ?session.save_state(),
        contents = %buffer.contents().plain_text().trim_end(),
        "demo session persisted"
    );
    Ok(())
}

/// Seed the in-memory store with the demo user and document tree.
async fn seed_demo_tree(records: &MemoryRecords) -> Result<(), AppError> {
    let user = User {
        id: demo_user_id(),
        email: "demo@notehub.local".to_string(),
        avatar_url: None,
    };
    records.insert_user(user.clone());

    let workspace = Workspace {
        id: WorkspaceId::new(),
        owner_id: user.id,
        title: "Demo Workspace".to_string(),
        icon_id: "🏠".to_string(),
        data: None,
        in_trash: None,
        logo: None,
        created_at: Utc::now(),
    };
    let folder = Folder {
        id: FolderId::new(),
        workspace_id: workspace.id,
        title: "Getting Started".to_string(),
        icon_id: "📁".to_string(),
        data: None,
        in_trash: None,
        created_at: Utc::now(),
    };
    let file = File {
        id: demo_file_id(),
        workspace_id: workspace.id,
        folder_id: folder.id,
        title: "Welcome".to_string(),
        icon_id: "📄".to_string(),
        data: None,
        in_trash: None,
        created_at: Utc::now(),
    };
    records.create_workspace(&workspace).await?;
    records.create_folder(&folder).await?;
    records.create_file(&file).await?;
    Ok(())
}

fn demo_user_id() -> UserId {
    UserId::from_uuid(uuid::Uuid::from_u128(1))
}

fn demo_file_id() -> FileId {
    FileId::from_uuid(uuid::Uuid::from_u128(2))
}
