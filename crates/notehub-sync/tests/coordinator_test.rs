//! Open/redirect, debounce, save-state, and trash flows.

mod common;

use std::time::Duration;

use notehub_core::types::redirect::Redirect;
use notehub_database::DocumentRecords;
use notehub_delta::codec::encode;
use notehub_delta::{Delta, DeltaOp};
use notehub_entity::{DocumentKind, UpdateFile};
use notehub_state::Action;
use notehub_sync::{DocumentContext, OpenOutcome, SaveState};
use uuid::Uuid;

use common::{TestWorld, settle};

#[tokio::test(start_paused = true)]
async fn test_open_missing_file_redirects_to_workspace_root() {
    let world = TestWorld::new();
    let client = world.client("ada@example.com");
    let (workspace, folder, _) = world.seed_tree(client.user.id).await;

    let outcome = client
        .coordinator
        .open_document(
            DocumentKind::File,
            &Uuid::new_v4().to_string(),
            DocumentContext {
                workspace_id: Some(workspace.id),
                folder_id: Some(folder.id),
            },
            client.buffer.clone(),
            client.cursors.clone(),
        )
        .await
        .expect("open");

    assert!(matches!(
        outcome,
        OpenOutcome::Redirected(Redirect::Workspace(id)) if id == workspace.id
    ));
}

#[tokio::test(start_paused = true)]
async fn test_open_missing_workspace_redirects_to_dashboard() {
    let world = TestWorld::new();
    let client = world.client("ada@example.com");

    let outcome = client
        .coordinator
        .open_document(
            DocumentKind::Workspace,
            &Uuid::new_v4().to_string(),
            DocumentContext::default(),
            client.buffer.clone(),
            client.cursors.clone(),
        )
        .await
        .expect("open");

    assert!(matches!(
        outcome,
        OpenOutcome::Redirected(Redirect::Dashboard)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_invalid_id_never_reaches_the_record_store() {
    let world = TestWorld::new();
    let client = world.client("ada@example.com");
    let (workspace, _, _) = world.seed_tree(client.user.id).await;

    let outcome = client
        .coordinator
        .open_document(
            DocumentKind::File,
            "definitely-not-a-uuid",
            DocumentContext {
                workspace_id: Some(workspace.id),
                folder_id: None,
            },
            client.buffer.clone(),
            client.cursors.clone(),
        )
        .await
        .expect("open");

    assert!(matches!(
        outcome,
        OpenOutcome::Redirected(Redirect::Workspace(id)) if id == workspace.id
    ));
}

#[tokio::test(start_paused = true)]
async fn test_open_loads_persisted_content() {
    let world = TestWorld::new();
    let client = world.client("ada@example.com");
    let (_, _, file) = world.seed_tree(client.user.id).await;

    let contents = Delta::from_ops([DeltaOp::insert("existing text\n")]);
    let data = encode(&contents).expect("encode");
    world
        .records
        .update_file(&UpdateFile::data(data), file.id)
        .await
        .expect("seed content");

    let _session = client.open_file(&file).await;
    assert_eq!(client.buffer.contents().plain_text(), "existing text\n");
}

#[tokio::test(start_paused = true)]
async fn test_open_without_data_leaves_buffer_empty() {
    let world = TestWorld::new();
    let client = world.client("ada@example.com");
    let (_, _, file) = world.seed_tree(client.user.id).await;

    let _session = client.open_file(&file).await;
    assert!(client.buffer.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_malformed_data_fails_closed_to_empty_buffer() {
    let world = TestWorld::new();
    let client = world.client("ada@example.com");
    let (_, _, file) = world.seed_tree(client.user.id).await;
    world
        .records
        .update_file(
            &UpdateFile {
                data: Some(Some("{broken".to_string())),
                ..UpdateFile::default()
            },
            file.id,
        )
        .await
        .expect("seed malformed content");

    let _session = client.open_file(&file).await;
    assert!(client.buffer.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_debounce_coalesces_a_burst_into_one_persist() {
    let world = TestWorld::new();
    let client = world.client("ada@example.com");
    let (workspace, folder, file) = world.seed_tree(client.user.id).await;
    client.store.dispatch(Action::SetWorkspaces {
        workspaces: vec![notehub_state::WorkspaceNode {
            workspace: workspace.clone(),
            folders: vec![notehub_state::FolderNode::new(folder.clone())],
        }],
    });
    client
        .coordinator
        .load_files(workspace.id, folder.id)
        .await
        .expect("load files");
    let session = client.open_file(&file).await;
    settle().await;
    let baseline = world.records.update_call_count();

    // Edits at t=0, t=100, t=200; the 850 ms window re-arms each time.
    client.buffer.apply_local(Delta::from_ops([DeltaOp::insert("a")]));
    tokio::time::sleep(Duration::from_millis(100)).await;
    client.buffer.apply_local(Delta::from_ops([DeltaOp::retain(1), DeltaOp::insert("b")]));
    tokio::time::sleep(Duration::from_millis(100)).await;
    client.buffer.apply_local(Delta::from_ops([DeltaOp::retain(2), DeltaOp::insert("c")]));

    // Just before t=1050 nothing has been written.
    tokio::time::sleep(Duration::from_millis(840)).await;
    assert_eq!(world.records.update_call_count(), baseline);
    assert_eq!(session.save_state(), SaveState::Dirty);

    // The single persist fires at ~1050 and carries the final state.
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(world.records.update_call_count(), baseline + 1);
    assert_eq!(session.save_state(), SaveState::Idle);

    let stored = world
        .records
        .file_details(file.id)
        .await
        .expect("lookup")
        .expect("file");
    let stored_delta =
        notehub_delta::codec::decode(stored.data.as_deref()).expect("decode").expect("content");
    assert_eq!(stored_delta.plain_text(), "abc");

    // The shared tree mirrors the same snapshot.
    let snapshot = client.store.snapshot();
    assert_eq!(
        snapshot
            .file(file.workspace_id, file.folder_id, file.id)
            .expect("file in tree")
            .data,
        stored.data
    );
}

#[tokio::test(start_paused = true)]
async fn test_rejected_persist_lands_on_failed_not_idle() {
    let world = TestWorld::new();
    let client = world.client("ada@example.com");
    let (_, _, file) = world.seed_tree(client.user.id).await;
    let session = client.open_file(&file).await;
    settle().await;

    world.records.fail_next_updates(true);
    client.buffer.apply_local(Delta::from_ops([DeltaOp::insert("doomed")]));
    tokio::time::sleep(Duration::from_millis(900)).await;

    assert_eq!(session.save_state(), SaveState::Failed);
    // Local state stays authoritative.
    assert_eq!(client.buffer.contents().plain_text(), "doomed");

    // The next successful save recovers.
    world.records.fail_next_updates(false);
    client.buffer.apply_local(Delta::from_ops([DeltaOp::retain(6), DeltaOp::insert("!")]));
    tokio::time::sleep(Duration::from_millis(900)).await;
    assert_eq!(session.save_state(), SaveState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_close_cancels_the_pending_persist() {
    let world = TestWorld::new();
    let client = world.client("ada@example.com");
    let (_, _, file) = world.seed_tree(client.user.id).await;
    let mut session = client.open_file(&file).await;
    settle().await;
    let baseline = world.records.update_call_count();

    client.buffer.apply_local(Delta::from_ops([DeltaOp::insert("never saved")]));
    session.close();
    tokio::time::sleep(Duration::from_millis(2000)).await;

    // The stale write was cancelled with the session.
    assert_eq!(world.records.update_call_count(), baseline);
    assert_eq!(world.hub.room_member_count(file.id.into_uuid()), 0);
    assert!(world.presence.members(file.id.into_uuid()).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_change_feed_keeps_the_navigation_tree_fresh() {
    let world = TestWorld::new();
    let client = world.client("ada@example.com");
    let (workspace, folder, _) = world.seed_tree(client.user.id).await;
    client.store.dispatch(Action::SetWorkspaces {
        workspaces: vec![notehub_state::WorkspaceNode {
            workspace: workspace.clone(),
            folders: vec![notehub_state::FolderNode::new(folder.clone())],
        }],
    });

    // Another client creates a file; the row notification reaches this
    // client through the record store's change feed.
    let mut feed = world.records.subscribe_file_changes();
    let new_file = notehub_entity::File {
        id: notehub_core::types::id::FileId::new(),
        workspace_id: workspace.id,
        folder_id: folder.id,
        title: "from elsewhere".to_string(),
        icon_id: "📄".to_string(),
        data: None,
        in_trash: None,
        created_at: chrono::Utc::now(),
    };
    world.records.create_file(&new_file).await.expect("create");

    let change = feed.try_recv().expect("insert notification");
    assert!(notehub_state::apply_change(&client.store, change).is_none());
    assert!(client
        .store
        .snapshot()
        .file(workspace.id, folder.id, new_file.id)
        .is_some());

    // Deleting the row prunes the tree and redirects the viewer.
    world.records.delete_file(new_file.id).await.expect("delete");
    let change = feed.try_recv().expect("delete notification");
    assert_eq!(
        notehub_state::apply_change(&client.store, change),
        Some(Redirect::Workspace(workspace.id))
    );
    assert!(client
        .store
        .snapshot()
        .file(workspace.id, folder.id, new_file.id)
        .is_none());
}

#[tokio::test(start_paused = true)]
async fn test_trash_restore_clears_the_flag() {
    let world = TestWorld::new();
    let client = world.client("ada@example.com");
    let (_, _, mut file) = world.seed_tree(client.user.id).await;
    world
        .records
        .update_file(&UpdateFile::trash("deleted by ada"), file.id)
        .await
        .expect("trash");
    file.in_trash = Some("deleted by ada".to_string());

    let session = client.open_file(&file).await;
    session.restore().await.expect("restore");

    let stored = world
        .records
        .file_details(file.id)
        .await
        .expect("lookup")
        .expect("file");
    assert!(stored.in_trash.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_trash_delete_redirects_to_parent_workspace() {
    let world = TestWorld::new();
    let client = world.client("ada@example.com");
    let (workspace, folder, file) = world.seed_tree(client.user.id).await;

    // Make the navigation tree aware of the file first.
    client.store.dispatch(Action::SetWorkspaces {
        workspaces: vec![notehub_state::WorkspaceNode {
            workspace: workspace.clone(),
            folders: vec![notehub_state::FolderNode::new(folder.clone())],
        }],
    });
    client
        .coordinator
        .load_files(workspace.id, folder.id)
        .await
        .expect("load files");

    let session = client.open_file(&file).await;
    let redirect = session.delete().await.expect("delete");

    assert_eq!(redirect, Redirect::Workspace(workspace.id));
    assert!(world
        .records
        .file_details(file.id)
        .await
        .expect("lookup")
        .is_none());
    assert!(client
        .store
        .snapshot()
        .file(workspace.id, folder.id, file.id)
        .is_none());
}
