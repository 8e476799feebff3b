//! Activity (course module) views.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::action::ActionLink;
use super::editor::TitleEditor;
use super::ids::ItemId;

/// Indentation depth of an activity, always within `0..=16`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct IndentLevel(u8);

impl IndentLevel {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(16);
    /// Depths above this are rendered with the huge-indent marker.
    pub const HUGE_THRESHOLD: u8 = 15;

    /// Create a level, or `None` if `value` is out of range.
    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX.0).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// One level deeper, or `None` at the maximum.
    pub fn increased(self) -> Option<Self> {
        Self::new(self.0.checked_add(1)?)
    }

    /// One level shallower, or `None` at the minimum.
    pub fn decreased(self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }

    pub fn is_huge(self) -> bool {
        self.0 > Self::HUGE_THRESHOLD
    }
}

impl TryFrom<u8> for IndentLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("indent {value} exceeds {}", Self::MAX.0))
    }
}

impl From<IndentLevel> for u8 {
    fn from(level: IndentLevel) -> Self {
        level.0
    }
}

/// Group mode of an activity. Cycles none → separate → visible → none.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GroupMode {
    #[default]
    None,
    Separate,
    Visible,
}

impl GroupMode {
    /// Wire value (0, 1 or 2).
    pub fn value(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Separate => 1,
            Self::Visible => 2,
        }
    }

    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Separate),
            2 => Some(Self::Visible),
            _ => None,
        }
    }

    /// The following mode in the cycle.
    pub fn next(self) -> Self {
        match self {
            Self::None => Self::Separate,
            Self::Separate => Self::Visible,
            Self::Visible => Self::None,
        }
    }

    /// String key naming this mode; also the raw action id of its link.
    pub fn string_key(self) -> &'static str {
        match self {
            Self::None => "groupsnone",
            Self::Separate => "groupsseparate",
            Self::Visible => "groupsvisible",
        }
    }

    /// The mode whose string key is `key`.
    pub fn from_string_key(key: &str) -> Option<Self> {
        [Self::None, Self::Separate, Self::Visible]
            .into_iter()
            .find(|mode| mode.string_key() == key)
    }

    /// Icon key for this mode.
    pub fn icon_key(self) -> &'static str {
        match self {
            Self::None => "i/groupn",
            Self::Separate => "i/groups",
            Self::Visible => "i/groupv",
        }
    }
}

impl TryFrom<u8> for GroupMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value).ok_or_else(|| format!("unknown group mode {value}"))
    }
}

impl From<GroupMode> for u8 {
    fn from(mode: GroupMode) -> Self {
        mode.value()
    }
}

/// Effective visibility of an activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
    /// Governed by an access rule rather than the editor's toggle.
    ConditionallyHidden,
}

/// One activity or resource as displayed in the course list.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityView {
    pub id: ItemId,
    /// Module type, e.g. `forum` or `label`.
    pub module_type: String,
    /// Display title. Labels have none.
    pub name: Option<String>,
    pub indent: IndentLevel,
    pub huge_indent: bool,
    pub dimmed: bool,
    pub conditionally_hidden: bool,
    pub description_dimmed: bool,
    /// Hidden state of the availability-info block, if the item has one.
    pub availability_info_hidden: Option<bool>,
    /// Set while the inline title editor replaces the title.
    pub editing_title: bool,
    /// Number of busy spinners currently shown on this item.
    #[serde(skip)]
    pub spinners: u32,
    pub links: Vec<ActionLink>,
    #[serde(skip)]
    pub title_editor: Option<Arc<TitleEditor>>,
}

impl ActivityView {
    pub fn new(id: impl Into<ItemId>, module_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            module_type: module_type.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_indent(mut self, indent: IndentLevel) -> Self {
        self.indent = indent;
        self.huge_indent = indent.is_huge();
        self
    }

    pub fn with_link(mut self, link: ActionLink) -> Self {
        self.links.push(link);
        self
    }

    pub fn link(&self, action: &str) -> Option<&ActionLink> {
        self.links.iter().find(|link| link.action == action)
    }

    pub fn link_mut(&mut self, action: &str) -> Option<&mut ActionLink> {
        self.links.iter_mut().find(|link| link.action == action)
    }

    /// The hide/show link, whichever action it currently offers.
    pub fn visibility_link_mut(&mut self) -> Option<&mut ActionLink> {
        self.links
            .iter_mut()
            .find(|link| link.action == "hide" || link.action == "show")
    }

    pub fn visibility(&self) -> Visibility {
        if self.conditionally_hidden {
            Visibility::ConditionallyHidden
        } else if self.dimmed {
            Visibility::Hidden
        } else {
            Visibility::Visible
        }
    }

    /// Style class used when the item is dimmed.
    pub fn dim_style(&self) -> &'static str {
        if self.name.is_some() { "dimmed" } else { "dimmed_text" }
    }

    pub fn is_busy(&self) -> bool {
        self.spinners > 0
    }
}
