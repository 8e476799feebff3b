//! Click events as seen by the dispatcher.

use crate::model::{ItemId, SectionId};

/// One node on the path from the clicked element up to the page root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventNode {
    /// A non-interactive element (an icon, a text span).
    Element,
    /// An interactive link, with its raw action id if it declares one.
    Link { action: Option<String> },
    /// The view of an activity.
    Activity(ItemId),
    /// The view of a section.
    Section(SectionId),
}

/// A click delivered by the host.
///
/// `path` starts at the clicked element and walks outwards through its
/// ancestors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClickEvent {
    pub path: Vec<EventNode>,
    default_prevented: bool,
}

impl ClickEvent {
    pub fn new(path: Vec<EventNode>) -> Self {
        Self {
            path,
            default_prevented: false,
        }
    }

    /// A click directly on an activity's link.
    pub fn on_activity_link(item: impl Into<ItemId>, action: &str) -> Self {
        Self::new(vec![
            EventNode::Link {
                action: Some(action.to_string()),
            },
            EventNode::Activity(item.into()),
        ])
    }

    /// A click on the icon inside an activity's link.
    pub fn on_activity_icon(item: impl Into<ItemId>, action: &str) -> Self {
        let mut event = Self::on_activity_link(item, action);
        event.path.insert(0, EventNode::Element);
        event
    }

    /// A click directly on a section's link.
    pub fn on_section_link(section: impl Into<SectionId>, action: &str) -> Self {
        Self::new(vec![
            EventNode::Link {
                action: Some(action.to_string()),
            },
            EventNode::Section(section.into()),
        ])
    }

    /// Suppress the host's default handling (following the link).
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}
