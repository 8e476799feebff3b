//! Action identifiers and the links that carry them.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::activity::GroupMode;

/// An action the toolbox knows how to handle.
///
/// Links carry a raw action id (`"moveleft"`, `"groupsseparate"`, ...). Several
/// raw ids can map to the same action; the three group-mode ids all collapse
/// to [`Action::SetGroupMode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Start an inline rename.
    EditTitle,
    /// Move the item one indent level to the left.
    IndentDecrease,
    /// Move the item one indent level to the right.
    IndentIncrease,
    /// Delete the item after confirmation.
    Delete,
    /// Duplicate the item.
    Duplicate,
    /// Hide a visible item.
    Hide,
    /// Show a hidden item.
    Show,
    /// Advance the item's group mode.
    SetGroupMode,
    /// Mark (or unmark) a section as the current one.
    HighlightSection,
    /// Toggle a whole section's visibility.
    ToggleSectionVisibility,
}

impl Action {
    /// Resolve a raw action id. Unknown ids yield `None`.
    pub fn from_id(id: &str) -> Option<Self> {
        Some(match id {
            "edittitle" => Self::EditTitle,
            "moveleft" => Self::IndentDecrease,
            "moveright" => Self::IndentIncrease,
            "delete" => Self::Delete,
            "duplicate" => Self::Duplicate,
            "hide" => Self::Hide,
            "show" => Self::Show,
            "groupsnone" | "groupsseparate" | "groupsvisible" => Self::SetGroupMode,
            "highlight" => Self::HighlightSection,
            "showhide" => Self::ToggleSectionVisibility,
            _ => return None,
        })
    }

    /// Every action, in routing-table order.
    pub const ALL: [Action; 10] = [
        Self::EditTitle,
        Self::IndentDecrease,
        Self::IndentIncrease,
        Self::Delete,
        Self::Duplicate,
        Self::Hide,
        Self::Show,
        Self::SetGroupMode,
        Self::HighlightSection,
        Self::ToggleSectionVisibility,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EditTitle => "edit-title",
            Self::IndentDecrease => "indent-decrease",
            Self::IndentIncrease => "indent-increase",
            Self::Delete => "delete",
            Self::Duplicate => "duplicate",
            Self::Hide => "hide",
            Self::Show => "show",
            Self::SetGroupMode => "set-group-mode",
            Self::HighlightSection => "highlight-section",
            Self::ToggleSectionVisibility => "toggle-section-visibility",
        };
        f.write_str(name)
    }
}

/// Hide or show, for items and sections alike.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityAction {
    Hide,
    Show,
}

impl VisibilityAction {
    /// The raw action id.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hide => "hide",
            Self::Show => "show",
        }
    }

    /// The action offered once this one has been applied.
    pub fn opposite(self) -> Self {
        match self {
            Self::Hide => Self::Show,
            Self::Show => Self::Hide,
        }
    }

    /// Value of the server's `visible` field after applying this action.
    pub fn visible_value(self) -> u8 {
        match self {
            Self::Hide => 0,
            Self::Show => 1,
        }
    }
}

/// An icon shown inside a link.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon {
    /// Resolved image URL.
    pub src: String,
    /// Alternative text.
    pub alt: String,
}

/// An interactive affordance attached to an item or section.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionLink {
    /// Raw action id. Unique among the links of one owner.
    pub action: String,
    /// Tooltip text.
    pub title: String,
    pub icon: Icon,
    /// Visible text next to the icon, if the layout renders one.
    pub label: Option<String>,
    pub hidden: bool,
    /// Whether keyboard focus currently rests on this link.
    pub focused: bool,
    /// Group mode to request on the next click (group-mode links only).
    pub next_group_mode: Option<GroupMode>,
    /// Section to return to after a duplicate (`sr` request parameter).
    pub return_section: Option<String>,
}

impl ActionLink {
    /// A link with the given raw action id and nothing else set.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }

    /// Set the tooltip and icon alt text together.
    pub fn set_caption(&mut self, text: &str) {
        self.title = text.to_string();
        self.icon.alt = text.to_string();
    }
}
