//! Headless model of the course page.

mod action;
mod activity;
mod document;
mod editor;
mod ids;
mod section;

pub use action::{Action, ActionLink, Icon, VisibilityAction};
pub use activity::{ActivityView, GroupMode, IndentLevel, Visibility};
pub use document::{CourseDocument, DocumentHandle, ItemRef};
pub use editor::{EditorKey, TITLE_MAX_LENGTH, TitleEditor};
pub use ids::{ItemId, SectionId};
pub use section::SectionView;
