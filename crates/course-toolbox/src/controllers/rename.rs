//! Inline rename.
//!
//! ```text
//!          begin (gettitle)             submit
//!   Idle ─────────────────▶ Editing ─────────────▶ Idle  (+ updatetitle if changed)
//!                              │   blur / Escape
//!                              └─────────────────▶ Idle
//! ```
//!
//! While editing, one [`PendingEdit`] owns the three editor subscriptions.
//! Every exit path releases all of them before touching anything else, then
//! removes the editor and puts keyboard focus back on the item's edit link.

use std::sync::{Arc, Weak};

use course_toolbox_core::{SubscriptionSet, runtime};
use parking_lot::Mutex;

use super::ControllerContext;
use crate::dispatch::{ActionHandler, ActionInvocation};
use crate::model::{EditorKey, ItemId, ItemRef, TitleEditor};
use crate::targets;
use crate::transport::{
    BusyIndicator, MutationRequest, MutationResponse, MutationTask, RequestOptions, SuccessCallback,
};

const EDIT_TITLE_LINK: &str = "edittitle";

/// An in-progress rename.
struct PendingEdit {
    item: ItemId,
    /// Title displayed when the edit started.
    original: String,
    editor: Arc<TitleEditor>,
    subscriptions: SubscriptionSet,
}

struct RenameInner {
    ctx: Arc<ControllerContext>,
    pending: Mutex<Option<PendingEdit>>,
}

/// Renames activities in place.
///
/// At most one edit is pending at a time. Opening an editor while another
/// edit is pending cancels that edit first.
pub struct RenameController {
    inner: Arc<RenameInner>,
}

impl RenameController {
    pub fn new(ctx: Arc<ControllerContext>) -> Self {
        Self {
            inner: Arc::new(RenameInner {
                ctx,
                pending: Mutex::new(None),
            }),
        }
    }

    /// Start renaming `item`.
    ///
    /// Fetches the authoritative title first; the editor opens when the reply
    /// arrives. Items without a title cannot be renamed.
    pub fn begin(&self, item: &ItemId) -> Option<MutationTask> {
        let displayed = self
            .inner
            .ctx
            .document
            .read(|doc| doc.activity(item).and_then(|a| a.name.clone()));
        if displayed.is_none() {
            tracing::trace!(target: targets::RENAME, %item, "item has no title, not renaming");
            return None;
        }

        let weak: Weak<RenameInner> = Arc::downgrade(&self.inner);
        let target = item.clone();
        let on_success: SuccessCallback = Box::new(move |response: &MutationResponse| {
            if let Some(inner) = weak.upgrade() {
                inner.open_editor(&target, response.instancename.as_deref());
            }
        });

        let request = MutationRequest::resource().field("gettitle").id(item);
        Some(
            self.inner
                .ctx
                .transport
                .send(request, None, Some(on_success), RequestOptions::default()),
        )
    }

    /// Show the editor for `item` without fetching the title.
    ///
    /// `seed` pre-fills the field; the displayed title is used when it is
    /// `None`. Returns the editor, or `None` if the item cannot be renamed.
    pub fn open_editor(&self, item: &ItemId, seed: Option<&str>) -> Option<Arc<TitleEditor>> {
        self.inner.open_editor(item, seed)
    }

    /// Commit the pending edit of `item`, as a form submit would.
    pub fn commit(&self, item: &ItemId) -> Option<MutationTask> {
        self.inner.commit(item)
    }

    /// Cancel the pending edit of `item`. Returns whether one was pending.
    pub fn cancel(&self, item: &ItemId) -> bool {
        self.inner.cancel(item)
    }

    pub fn is_editing(&self, item: &ItemId) -> bool {
        self.inner
            .pending
            .lock()
            .as_ref()
            .is_some_and(|edit| &edit.item == item)
    }

    /// The editor of the pending edit, if any.
    pub fn editor(&self) -> Option<Arc<TitleEditor>> {
        self.inner.pending.lock().as_ref().map(|edit| edit.editor.clone())
    }

    /// Number of live editor subscriptions. Zero whenever no edit is pending.
    pub fn active_subscriptions(&self) -> usize {
        self.inner
            .pending
            .lock()
            .as_ref()
            .map_or(0, |edit| edit.subscriptions.active_count())
    }
}

impl RenameInner {
    fn open_editor(self: &Arc<Self>, item: &ItemId, seed: Option<&str>) -> Option<Arc<TitleEditor>> {
        let document = &self.ctx.document;
        let original = document.read(|doc| doc.activity(item).and_then(|a| a.name.clone()))?;
        let seed = seed.map(str::to_string).unwrap_or_else(|| original.clone());

        self.ctx.services.action_menu.hide_menu();

        let previous = self.pending.lock().take();
        if let Some(previous) = previous {
            tracing::debug!(target: targets::RENAME, item = %previous.item, "replacing pending edit");
            self.finish(previous);
        }

        let editor = TitleEditor::new(seed);
        let installed = document.update(|doc| {
            let activity = doc.activity_mut(item)?;
            activity.title_editor = Some(editor.clone());
            activity.editing_title = true;
            Some(())
        });
        installed?;
        editor.focus_and_select();

        let mut subscriptions = SubscriptionSet::new();
        let weak = Arc::downgrade(self);
        let target = item.clone();
        subscriptions.push(editor.blurred.connect_guarded(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.cancel(&target);
            }
        }));
        let weak = Arc::downgrade(self);
        let target = item.clone();
        subscriptions.push(editor.key_pressed.connect_guarded(move |key| {
            if *key != EditorKey::Escape {
                return;
            }
            if let Some(inner) = weak.upgrade() {
                inner.cancel(&target);
            }
        }));
        let weak = Arc::downgrade(self);
        let target = item.clone();
        subscriptions.push(editor.submitted.connect_guarded(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.commit(&target);
            }
        }));

        tracing::debug!(target: targets::RENAME, %item, "editing title");
        let displaced = self.pending.lock().replace(PendingEdit {
            item: item.clone(),
            original,
            editor: editor.clone(),
            subscriptions,
        });
        if let Some(displaced) = displaced {
            self.finish(displaced);
        }
        Some(editor)
    }

    fn take_pending(&self, item: &ItemId) -> Option<PendingEdit> {
        let mut pending = self.pending.lock();
        if pending.as_ref().is_some_and(|edit| &edit.item == item) {
            pending.take()
        } else {
            None
        }
    }

    fn cancel(&self, item: &ItemId) -> bool {
        match self.take_pending(item) {
            Some(edit) => {
                tracing::debug!(target: targets::RENAME, %item, "edit cancelled");
                self.finish(edit);
                true
            }
            None => false,
        }
    }

    fn commit(&self, item: &ItemId) -> Option<MutationTask> {
        let edit = self.take_pending(item)?;
        let value = edit.editor.value().trim().to_string();
        let unchanged = value.is_empty() || value == edit.original.trim();
        self.finish(edit);

        if unchanged {
            tracing::trace!(target: targets::RENAME, %item, "title unchanged, nothing to send");
            return None;
        }

        let document = self.ctx.document.clone();
        let target = item.clone();
        let submitted = value.clone();
        let on_success: SuccessCallback = Box::new(move |response: &MutationResponse| {
            let title = response.instancename.clone().unwrap_or(submitted);
            document.update(|doc| {
                if let Some(activity) = doc.activity_mut(&target) {
                    activity.name = Some(title);
                }
            });
        });

        let request = MutationRequest::resource()
            .field("updatetitle")
            .id(item)
            .param("title", value);
        let spinner = BusyIndicator::spinner(self.ctx.document.clone(), item.clone());
        Some(self.ctx.transport.send(
            request,
            Some(spinner),
            Some(on_success),
            RequestOptions::default(),
        ))
    }

    /// Leave the editing state.
    fn finish(&self, mut edit: PendingEdit) {
        let released = edit.subscriptions.release();
        tracing::trace!(target: targets::RENAME, item = %edit.item, released, "editor subscriptions released");

        self.ctx.document.update(|doc| {
            if let Some(activity) = doc.activity_mut(&edit.item) {
                activity.title_editor = None;
                activity.editing_title = false;
            }
        });

        let document = self.ctx.document.clone();
        let item = edit.item;
        let refocus = move || {
            document.update(|doc| doc.focus_activity_link(&item, EDIT_TITLE_LINK));
        };
        let delay = self.ctx.config.focus_restore_delay();
        if let Err(e) = runtime::spawn_later(delay, refocus) {
            tracing::warn!(target: targets::RENAME, error = %e, "focus not restored");
        }
    }
}

impl ActionHandler for RenameController {
    fn handle(&self, invocation: &ActionInvocation) -> Option<MutationTask> {
        match &invocation.item {
            ItemRef::Activity(item) => self.begin(item),
            ItemRef::Section(_) => None,
        }
    }
}

impl std::fmt::Debug for RenameController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pending = self.inner.pending.lock();
        f.debug_struct("RenameController")
            .field("editing", &pending.as_ref().map(|edit| edit.item.clone()))
            .finish()
    }
}
