//! Section views.

use serde::{Deserialize, Serialize};

use super::action::ActionLink;
use super::activity::ActivityView;
use super::ids::SectionId;

/// One course section and the activities it contains, in display order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionView {
    pub id: SectionId,
    pub hidden: bool,
    /// Whether this section carries the "current" highlight marker.
    pub current: bool,
    /// Number of busy overlays currently shown over this section.
    #[serde(skip)]
    pub overlays: u32,
    pub links: Vec<ActionLink>,
    pub activities: Vec<ActivityView>,
}

impl SectionView {
    pub fn new(id: impl Into<SectionId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_link(mut self, link: ActionLink) -> Self {
        self.links.push(link);
        self
    }

    pub fn with_activity(mut self, activity: ActivityView) -> Self {
        self.activities.push(activity);
        self
    }

    pub fn link(&self, action: &str) -> Option<&ActionLink> {
        self.links.iter().find(|link| link.action == action)
    }

    pub fn link_mut(&mut self, action: &str) -> Option<&mut ActionLink> {
        self.links.iter_mut().find(|link| link.action == action)
    }

    pub fn is_busy(&self) -> bool {
        self.overlays > 0
    }
}
