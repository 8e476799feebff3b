//! The transient inline title editor.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use course_toolbox_core::Signal;
use parking_lot::Mutex;

/// Longest title the editor accepts, in characters.
pub const TITLE_MAX_LENGTH: usize = 255;

/// Keys the editor reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorKey {
    Escape,
    Enter,
    Char(char),
}

/// A text field shown in place of an item's title while it is renamed.
///
/// The host renders it and forwards user input through [`type_text`],
/// [`press_key`], [`submit`] and [`blur`]. The rename controller listens on
/// the three signals.
///
/// [`type_text`]: TitleEditor::type_text
/// [`press_key`]: TitleEditor::press_key
/// [`submit`]: TitleEditor::submit
/// [`blur`]: TitleEditor::blur
pub struct TitleEditor {
    value: Mutex<String>,
    focused: AtomicBool,
    selected: AtomicBool,
    /// Emitted when the field loses focus.
    pub blurred: Arc<Signal<()>>,
    /// Emitted for every key press.
    pub key_pressed: Arc<Signal<EditorKey>>,
    /// Emitted when the enclosing form is submitted.
    pub submitted: Arc<Signal<()>>,
}

impl TitleEditor {
    pub fn new(initial: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            value: Mutex::new(clamp(initial.into())),
            focused: AtomicBool::new(false),
            selected: AtomicBool::new(false),
            blurred: Arc::new(Signal::new()),
            key_pressed: Arc::new(Signal::new()),
            submitted: Arc::new(Signal::new()),
        })
    }

    pub fn value(&self) -> String {
        self.value.lock().clone()
    }

    /// Replace the field's text, clamped to [`TITLE_MAX_LENGTH`].
    pub fn set_value(&self, text: impl Into<String>) {
        *self.value.lock() = clamp(text.into());
        self.selected.store(false, Ordering::SeqCst);
    }

    /// Focus the field and select its whole text.
    pub fn focus_and_select(&self) {
        self.focused.store(true, Ordering::SeqCst);
        self.selected.store(true, Ordering::SeqCst);
    }

    pub fn has_focus(&self) -> bool {
        self.focused.load(Ordering::SeqCst)
    }

    pub fn is_selected(&self) -> bool {
        self.selected.load(Ordering::SeqCst)
    }

    /// Simulate typing: replaces a selection, otherwise appends.
    pub fn type_text(&self, text: &str) {
        let mut value = self.value.lock();
        if self.selected.swap(false, Ordering::SeqCst) {
            value.clear();
        }
        value.push_str(text);
        *value = clamp(std::mem::take(&mut *value));
    }

    pub fn press_key(&self, key: EditorKey) {
        self.key_pressed.emit(key);
    }

    pub fn submit(&self) {
        self.submitted.emit(());
    }

    pub fn blur(&self) {
        if self.focused.swap(false, Ordering::SeqCst) {
            self.blurred.emit(());
        }
    }
}

fn clamp(mut text: String) -> String {
    if let Some((idx, _)) = text.char_indices().nth(TITLE_MAX_LENGTH) {
        text.truncate(idx);
    }
    text
}

impl std::fmt::Debug for TitleEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TitleEditor")
            .field("value", &*self.value.lock())
            .field("focused", &self.has_focus())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_typing_replaces_selection() {
        let editor = TitleEditor::new("Old");
        editor.focus_and_select();
        editor.type_text("New");
        editor.type_text(" title");
        assert_eq!(editor.value(), "New title");
    }

    #[test]
    fn test_value_is_clamped() {
        let editor = TitleEditor::new("x".repeat(300));
        assert_eq!(editor.value().chars().count(), TITLE_MAX_LENGTH);
    }

    #[test]
    fn test_blur_only_fires_when_focused() {
        let editor = TitleEditor::new("A");
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        editor.blurred.connect(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        editor.blur();
        editor.focus_and_select();
        editor.blur();
        editor.blur();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
