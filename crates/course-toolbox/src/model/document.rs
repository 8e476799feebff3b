//! The course document: every section and activity the page displays.
//!
//! The document is the headless stand-in for the rendered page. Controllers
//! mutate it optimistically and the host re-renders from it.

use std::sync::Arc;

use parking_lot::Mutex;

use super::activity::ActivityView;
use super::ids::{ItemId, SectionId};
use super::section::SectionView;
use crate::error::ModelError;

/// Either kind of editable entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ItemRef {
    Activity(ItemId),
    Section(SectionId),
}

/// All sections of a course page, in display order.
#[derive(Clone, Debug, Default)]
pub struct CourseDocument {
    sections: Vec<SectionView>,
}

impl CourseDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_section(mut self, section: SectionView) -> Self {
        self.sections.push(section);
        self
    }

    pub fn push_section(&mut self, section: SectionView) {
        self.sections.push(section);
    }

    pub fn sections(&self) -> &[SectionView] {
        &self.sections
    }

    pub fn sections_mut(&mut self) -> &mut [SectionView] {
        &mut self.sections
    }

    pub fn section(&self, id: &SectionId) -> Option<&SectionView> {
        self.sections.iter().find(|s| &s.id == id)
    }

    pub fn section_mut(&mut self, id: &SectionId) -> Option<&mut SectionView> {
        self.sections.iter_mut().find(|s| &s.id == id)
    }

    pub fn activity(&self, id: &ItemId) -> Option<&ActivityView> {
        self.activities().find(|a| &a.id == id)
    }

    pub fn activity_mut(&mut self, id: &ItemId) -> Option<&mut ActivityView> {
        self.sections
            .iter_mut()
            .flat_map(|s| s.activities.iter_mut())
            .find(|a| &a.id == id)
    }

    /// Every activity, section by section.
    pub fn activities(&self) -> impl Iterator<Item = &ActivityView> {
        self.sections.iter().flat_map(|s| s.activities.iter())
    }

    /// The section containing an activity.
    pub fn section_of(&self, id: &ItemId) -> Option<&SectionView> {
        self.sections
            .iter()
            .find(|s| s.activities.iter().any(|a| &a.id == id))
    }

    /// Remove an activity's view, returning it.
    pub fn remove_activity(&mut self, id: &ItemId) -> Option<ActivityView> {
        self.sections.iter_mut().find_map(|section| {
            let pos = section.activities.iter().position(|a| &a.id == id)?;
            Some(section.activities.remove(pos))
        })
    }

    /// Insert `activity` directly after the activity `after`, in the same section.
    pub fn insert_activity_after(
        &mut self,
        after: &ItemId,
        activity: ActivityView,
    ) -> Result<(), ModelError> {
        for section in &mut self.sections {
            if let Some(pos) = section.activities.iter().position(|a| &a.id == after) {
                section.activities.insert(pos + 1, activity);
                return Ok(());
            }
        }
        Err(ModelError::UnknownItem(after.clone()))
    }

    /// Whether `item` exists in the document.
    pub fn contains(&self, item: &ItemRef) -> bool {
        match item {
            ItemRef::Activity(id) => self.activity(id).is_some(),
            ItemRef::Section(id) => self.section(id).is_some(),
        }
    }

    /// Move keyboard focus to one link of an activity, clearing it elsewhere.
    pub fn focus_activity_link(&mut self, id: &ItemId, action: &str) -> bool {
        if self.activity(id).and_then(|a| a.link(action)).is_none() {
            return false;
        }
        for section in &mut self.sections {
            section.links.iter_mut().for_each(|l| l.focused = false);
            for activity in &mut section.activities {
                let owner = &activity.id == id;
                for link in &mut activity.links {
                    link.focused = owner && link.action == action;
                }
            }
        }
        true
    }
}

/// Shared, thread-safe handle to a [`CourseDocument`].
///
/// Access goes through closures so a lock is never held across an await or
/// while signal slots run.
#[derive(Clone, Default)]
pub struct DocumentHandle {
    inner: Arc<Mutex<CourseDocument>>,
}

impl DocumentHandle {
    pub fn new(document: CourseDocument) -> Self {
        Self {
            inner: Arc::new(Mutex::new(document)),
        }
    }

    /// Run `f` with shared access to the document.
    pub fn read<R>(&self, f: impl FnOnce(&CourseDocument) -> R) -> R {
        f(&self.inner.lock())
    }

    /// Run `f` with exclusive access to the document.
    pub fn update<R>(&self, f: impl FnOnce(&mut CourseDocument) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// A copy of the current document.
    pub fn snapshot(&self) -> CourseDocument {
        self.inner.lock().clone()
    }
}

impl std::fmt::Debug for DocumentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentHandle")
            .field("sections", &self.inner.lock().sections.len())
            .finish()
    }
}
