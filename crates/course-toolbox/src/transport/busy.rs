//! Busy indicators.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::model::{DocumentHandle, ItemId, SectionId};

/// What a busy indicator covers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BusyScope {
    /// A spinner on one activity.
    Item(ItemId),
    /// An overlay over a whole section.
    Section(SectionId),
}

/// A scoped "in progress" marker.
///
/// Showing is idempotent and each shown indicator hides at most once, so a
/// clone passed to a delayed task cannot double-decrement the document's
/// busy counters.
#[derive(Clone, Debug)]
pub struct BusyIndicator {
    document: DocumentHandle,
    scope: BusyScope,
    shown: Arc<AtomicBool>,
}

impl BusyIndicator {
    pub fn new(document: DocumentHandle, scope: BusyScope) -> Self {
        Self {
            document,
            scope,
            shown: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn spinner(document: DocumentHandle, item: ItemId) -> Self {
        Self::new(document, BusyScope::Item(item))
    }

    pub fn overlay(document: DocumentHandle, section: SectionId) -> Self {
        Self::new(document, BusyScope::Section(section))
    }

    pub fn is_shown(&self) -> bool {
        self.shown.load(Ordering::SeqCst)
    }

    pub fn show(&self) {
        if !self.shown.swap(true, Ordering::SeqCst) {
            self.adjust(true);
        }
    }

    pub fn hide(&self) {
        if self.shown.swap(false, Ordering::SeqCst) {
            self.adjust(false);
        }
    }

    fn adjust(&self, up: bool) {
        let step = |count: &mut u32| {
            *count = if up {
                count.saturating_add(1)
            } else {
                count.saturating_sub(1)
            };
        };
        self.document.update(|doc| match &self.scope {
            BusyScope::Item(id) => {
                if let Some(activity) = doc.activity_mut(id) {
                    step(&mut activity.spinners);
                }
            }
            BusyScope::Section(id) => {
                if let Some(section) = doc.section_mut(id) {
                    step(&mut section.overlays);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActivityView, CourseDocument, SectionView};

    fn document() -> DocumentHandle {
        DocumentHandle::new(
            CourseDocument::new()
                .with_section(SectionView::new(1).with_activity(ActivityView::new(5, "page"))),
        )
    }

    #[test]
    fn test_spinner_show_hide_once() {
        let doc = document();
        let spinner = BusyIndicator::spinner(doc.clone(), ItemId::from(5));
        spinner.show();
        spinner.show();
        assert_eq!(doc.read(|d| d.activity(&ItemId::from(5)).unwrap().spinners), 1);

        let clone = spinner.clone();
        spinner.hide();
        clone.hide();
        assert_eq!(doc.read(|d| d.activity(&ItemId::from(5)).unwrap().spinners), 0);
        assert!(!clone.is_shown());
    }

    #[test]
    fn test_overlays_stack() {
        let doc = document();
        let first = BusyIndicator::overlay(doc.clone(), SectionId::from(1));
        let second = BusyIndicator::overlay(doc.clone(), SectionId::from(1));
        first.show();
        second.show();
        first.hide();
        assert!(doc.read(|d| d.section(&SectionId::from(1)).unwrap().is_busy()));
        second.hide();
        assert!(!doc.read(|d| d.section(&SectionId::from(1)).unwrap().is_busy()));
    }

    #[test]
    fn test_missing_target_is_ignored() {
        let doc = document();
        let spinner = BusyIndicator::spinner(doc.clone(), ItemId::from(99));
        spinner.show();
        spinner.hide();
        assert!(!spinner.is_shown());
    }
}
