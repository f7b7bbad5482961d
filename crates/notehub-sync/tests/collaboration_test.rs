//! Two-client collaboration scenarios over the in-process relay.

mod common;

use notehub_delta::{Delta, DeltaOp, Range};
use notehub_sync::SaveState;

use common::{TestWorld, settle};

#[tokio::test(start_paused = true)]
async fn test_edit_propagates_to_peer_without_echo() {
    let world = TestWorld::new();
    let alice = world.client("alice@example.com");
    let bob = world.client("bob@example.com");
    let (_, _, file) = world.seed_tree(alice.user.id).await;

    let alice_session = alice.open_file(&file).await;
    let bob_session = bob.open_file(&file).await;
    settle().await;

    alice
        .buffer
        .apply_local(Delta::from_ops([DeltaOp::insert("hi")]));
    settle().await;

    // Bob's buffer received exactly the broadcast delta.
    assert_eq!(bob.buffer.contents().plain_text(), "hi");
    // Applying it did not re-enter Bob's local-edit pipeline: his save
    // state never moved, and Alice's buffer was not doubled by an echo.
    assert_eq!(bob_session.save_state(), SaveState::Idle);
    assert_eq!(alice.buffer.contents().plain_text(), "hi");
    assert_eq!(alice_session.save_state(), SaveState::Dirty);

    // Only Alice's debounce persists; Bob never wrote anything.
    tokio::time::sleep(std::time::Duration::from_millis(900)).await;
    assert_eq!(world.records.update_call_count(), 1);
    assert_eq!(alice_session.save_state(), SaveState::Idle);
    assert_eq!(bob_session.save_state(), SaveState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_presence_gives_peers_cursors_but_never_self() {
    let world = TestWorld::new();
    let alice = world.client("alice@example.com");
    let bob = world.client("bob@example.com");
    let (_, _, file) = world.seed_tree(alice.user.id).await;

    let alice_session = alice.open_file(&file).await;
    let bob_session = bob.open_file(&file).await;
    settle().await;

    // Both rosters show both members.
    assert_eq!(alice_session.collaborators().await.len(), 2);
    assert_eq!(bob_session.collaborators().await.len(), 2);

    // Each overlay renders exactly one cursor: the peer's, labeled with
    // the email local part, never a self-referential one.
    assert_eq!(alice.cursors.marker_count(), 1);
    assert_eq!(bob.cursors.marker_count(), 1);
    let marker = bob
        .cursors
        .marker(&alice.user.id.to_string())
        .expect("bob renders alice's cursor");
    assert_eq!(marker.label, "alice");
    assert!(bob.cursors.marker(&bob.user.id.to_string()).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_cursor_moves_reach_peer_markers() {
    let world = TestWorld::new();
    let alice = world.client("alice@example.com");
    let bob = world.client("bob@example.com");
    let (_, _, file) = world.seed_tree(alice.user.id).await;

    let _alice_session = alice.open_file(&file).await;
    let _bob_session = bob.open_file(&file).await;
    settle().await;

    alice.buffer.select_local(Some(Range::span(2, 3)));
    settle().await;

    let marker = bob
        .cursors
        .marker(&alice.user.id.to_string())
        .expect("alice's cursor on bob's side");
    assert_eq!(marker.range, Some(Range::span(2, 3)));
}

#[tokio::test(start_paused = true)]
async fn test_unknown_cursor_moves_are_dropped_silently() {
    let world = TestWorld::new();
    let alice = world.client("alice@example.com");
    let bob = world.client("bob@example.com");
    let (_, _, file) = world.seed_tree(alice.user.id).await;

    // Bob joins the delta room but never announces presence (no session
    // on Alice's side knows him as a peer): his cursor moves must not
    // create markers or errors.
    let _alice_session = alice.open_file(&file).await;
    settle().await;

    let bob_conn = notehub_realtime::RealtimeClient::new(world.hub.clone()).connect();
    bob_conn.join_room(file.id.into_uuid());
    bob_conn.emit(notehub_realtime::ClientMessage::SendCursorMove {
        document_id: file.id.into_uuid(),
        user_key: bob.user.id.to_string(),
        range: Range::caret(0),
    });
    settle().await;

    assert!(alice.cursors.marker(&bob.user.id.to_string()).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_closing_a_session_removes_its_cursor_from_peers() {
    let world = TestWorld::new();
    let alice = world.client("alice@example.com");
    let bob = world.client("bob@example.com");
    let (_, _, file) = world.seed_tree(alice.user.id).await;

    let mut alice_session = alice.open_file(&file).await;
    let bob_session = bob.open_file(&file).await;
    settle().await;
    assert_eq!(bob.cursors.marker_count(), 1);

    alice_session.close();
    settle().await;

    assert_eq!(bob.cursors.marker_count(), 0);
    assert_eq!(bob_session.collaborators().await.len(), 1);
}
