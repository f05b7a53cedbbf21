//! Committed/draft state pair for editable settings forms
//!
//! A form loads a snapshot into both halves, edits only the draft, and
//! promotes the draft once the backend accepted a save. `is_dirty` is a
//! structural comparison, so reverting an edit by hand clears it too.

/// Committed snapshot plus a working draft
#[derive(Debug, Clone, PartialEq)]
pub struct DraftState<T> {
    committed: T,
    draft: T,
}

impl<T: Clone + PartialEq> DraftState<T> {
    /// Start with `snapshot` as both committed and draft value
    pub fn new(snapshot: T) -> Self {
        Self {
            draft: snapshot.clone(),
            committed: snapshot,
        }
    }

    /// Last value known to be persisted
    pub fn committed(&self) -> &T {
        &self.committed
    }

    /// Value currently being edited
    pub fn draft(&self) -> &T {
        &self.draft
    }

    /// Mutable access to the draft
    pub fn draft_mut(&mut self) -> &mut T {
        &mut self.draft
    }

    /// Apply an edit to the draft
    pub fn update(&mut self, edit: impl FnOnce(&mut T)) {
        edit(&mut self.draft);
    }

    /// True when the draft differs from the committed value
    pub fn is_dirty(&self) -> bool {
        self.draft != self.committed
    }

    /// Drop pending edits
    pub fn discard(&mut self) {
        self.draft = self.committed.clone();
    }

    /// Promote the draft after a successful save
    pub fn mark_saved(&mut self) {
        self.committed = self.draft.clone();
    }

    /// Replace both halves with a fresh snapshot
    pub fn replace(&mut self, snapshot: T) {
        self.draft = snapshot.clone();
        self.committed = snapshot;
    }
}

impl<T: Clone + PartialEq + Default> Default for DraftState<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
