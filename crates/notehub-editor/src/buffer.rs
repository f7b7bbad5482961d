//! The local editor buffer.

use std::sync::RwLock;

use tokio::sync::broadcast;

use notehub_delta::{Delta, Range};

use crate::events::{ContentChange, SelectionChange, Source};

/// The live editable document held by one client.
///
/// Two mutation paths exist and the distinction is load-bearing:
/// [`EditorBuffer::apply_local`] is the local human-input path and emits
/// [`Source::User`]; [`EditorBuffer::update_contents`] is the
/// remote/programmatic path and emits [`Source::Api`]. `update_contents`
/// never emits a `User` event, so applying an inbound room delta cannot
/// re-enter the local-edit pipeline and echo back out.
#[derive(Debug)]
pub struct EditorBuffer {
    contents: RwLock<Delta>,
    selection: RwLock<Option<Range>>,
    content_tx: broadcast::Sender<ContentChange>,
    selection_tx: broadcast::Sender<SelectionChange>,
}

impl EditorBuffer {
    /// Create an empty buffer. `buffer_size` bounds the event channels.
    pub fn new(buffer_size: usize) -> Self {
        let (content_tx, _) = broadcast::channel(buffer_size);
        let (selection_tx, _) = broadcast::channel(buffer_size);
        Self {
            contents: RwLock::new(Delta::new()),
            selection: RwLock::new(None),
            content_tx,
            selection_tx,
        }
    }

    /// Replace the whole content state (document load path). Emits no
    /// change event: nothing upstream reacts to a programmatic load, and
    /// the remote path goes through [`EditorBuffer::update_contents`].
    pub fn set_contents(&self, contents: Delta) {
        *self.contents.write().expect("buffer lock poisoned") = contents;
    }

    /// A snapshot of the full current content state.
    pub fn contents(&self) -> Delta {
        self.contents.read().expect("buffer lock poisoned").clone()
    }

    /// Character length of the current content.
    pub fn len(&self) -> usize {
        self.contents.read().expect("buffer lock poisoned").len()
    }

    /// Whether the buffer holds no content.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply a delta produced by local human input. Emits a
    /// [`Source::User`] content change.
    pub fn apply_local(&self, delta: Delta) {
        self.apply(delta, Source::User);
    }

    /// Apply a remote or otherwise programmatic delta. Emits a
    /// [`Source::Api`] content change — never `User`.
    pub fn update_contents(&self, delta: Delta) {
        self.apply(delta, Source::Api);
    }

    fn apply(&self, delta: Delta, source: Source) {
        {
            let mut contents = self.contents.write().expect("buffer lock poisoned");
            let next = contents.apply(&delta);
            *contents = next;
        }
        let _ = self.content_tx.send(ContentChange { delta, source });
    }

    /// Move the local selection (human input). Emits a [`Source::User`]
    /// selection change.
    pub fn select_local(&self, range: Option<Range>) {
        self.select(range, Source::User);
    }

    /// Move the selection programmatically.
    pub fn select_api(&self, range: Option<Range>) {
        self.select(range, Source::Api);
    }

    fn select(&self, range: Option<Range>, source: Source) {
        let old_range = {
            let mut selection = self.selection.write().expect("buffer lock poisoned");
            std::mem::replace(&mut *selection, range)
        };
        let _ = self.selection_tx.send(SelectionChange {
            range,
            old_range,
            source,
        });
    }

    /// The current selection.
    pub fn selection(&self) -> Option<Range> {
        *self.selection.read().expect("buffer lock poisoned")
    }

    /// Subscribe to content changes.
    pub fn subscribe_content(&self) -> broadcast::Receiver<ContentChange> {
        self.content_tx.subscribe()
    }

    /// Subscribe to selection changes.
    pub fn subscribe_selection(&self) -> broadcast::Receiver<SelectionChange> {
        self.selection_tx.subscribe()
    }
}
