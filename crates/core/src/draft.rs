//! Drafts and the dialog slot that owns them.
//!
//! A [`Dialog`] holds at most one [`Draft`]. Opening the dialog for a create resets the draft
//! to its default; opening it for an edit seeds the draft from the existing record. Closing the
//! dialog drops the draft, whether it was submitted or discarded.

use deskhub_types::RecordId;

/// What submitting the active draft will do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogMode {
    /// The draft has no identity yet; the backend assigns one on success.
    Create,
    Edit(RecordId),
}

#[derive(Clone, Debug)]
pub struct Draft<D> {
    mode: DialogMode,
    fields: D,
}

impl<D> Draft<D> {
    pub fn mode(&self) -> &DialogMode {
        &self.mode
    }

    pub fn fields(&self) -> &D {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut D {
        &mut self.fields
    }
}

#[derive(Clone, Debug)]
pub struct Dialog<D> {
    active: Option<Draft<D>>,
    inline_error: Option<String>,
}

impl<D> Default for Dialog<D> {
    fn default() -> Self {
        Self {
            active: None,
            inline_error: None,
        }
    }
}

impl<D: Default> Dialog<D> {
    /// Open for a create, replacing any draft already open.
    pub fn open_create(&mut self) -> &mut D {
        self.open(DialogMode::Create, D::default())
    }
}

impl<D> Dialog<D> {
    /// Open for editing `id`, seeded from the existing record.
    pub fn open_edit(&mut self, id: RecordId, seed: D) -> &mut D {
        self.open(DialogMode::Edit(id), seed)
    }

    fn open(&mut self, mode: DialogMode, fields: D) -> &mut D {
        self.inline_error = None;
        let draft = self.active.insert(Draft { mode, fields });
        &mut draft.fields
    }

    /// Close the dialog, returning the draft it held.
    pub fn close(&mut self) -> Option<Draft<D>> {
        self.inline_error = None;
        self.active.take()
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn draft(&self) -> Option<&Draft<D>> {
        self.active.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut D> {
        self.active.as_mut().map(Draft::fields_mut)
    }

    /// Error shown inside the dialog, set by a rejected submit.
    pub fn inline_error(&self) -> Option<&str> {
        self.inline_error.as_deref()
    }

    pub(crate) fn set_inline_error(&mut self, message: impl Into<String>) {
        self.inline_error = Some(message.into());
    }
}
