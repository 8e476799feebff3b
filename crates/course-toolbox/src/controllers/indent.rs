//! Indentation.

use std::sync::Arc;

use super::ControllerContext;
use crate::dispatch::{ActionHandler, ActionInvocation};
use crate::model::{Action, ActivityView, IndentLevel, ItemId, ItemRef};
use crate::targets;
use crate::transport::{BusyIndicator, MutationRequest, MutationTask, RequestOptions};

/// Which way to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndentDirection {
    Decrease,
    Increase,
}

impl IndentDirection {
    /// Raw action id of the link that moves this way.
    pub fn action_id(self) -> &'static str {
        match self {
            Self::Decrease => "moveleft",
            Self::Increase => "moveright",
        }
    }
}

/// Moves activities left and right within `0..=16`.
///
/// The decrease link is hidden at depth 0 and the increase link at depth 16;
/// each comes back as soon as the item leaves that bound.
#[derive(Debug)]
pub struct IndentController {
    ctx: Arc<ControllerContext>,
}

impl IndentController {
    pub fn new(ctx: Arc<ControllerContext>) -> Self {
        Self { ctx }
    }

    pub fn apply(&self, item: &ItemId, direction: IndentDirection) -> Option<MutationTask> {
        let new_indent = self.ctx.document.update(|doc| {
            let activity = doc.activity_mut(item)?;
            let old = activity.indent;
            let new = match direction {
                IndentDirection::Decrease => old.decreased(),
                IndentDirection::Increase => old.increased(),
            }?;

            activity.indent = new;
            activity.huge_indent = new.is_huge();

            let set_hidden = |action: &str, hidden: bool, activity: &mut ActivityView| {
                if let Some(link) = activity.link_mut(action) {
                    link.hidden = hidden;
                }
            };
            let left = IndentDirection::Decrease.action_id();
            let right = IndentDirection::Increase.action_id();
            if new == IndentLevel::MIN {
                set_hidden(left, true, activity);
            } else if old == IndentLevel::MIN {
                set_hidden(left, false, activity);
            }
            if new == IndentLevel::MAX {
                set_hidden(right, true, activity);
            } else if old == IndentLevel::MAX {
                set_hidden(right, false, activity);
            }
            Some(new)
        });

        let Some(new_indent) = new_indent else {
            tracing::trace!(target: targets::CONTROLLER, %item, ?direction, "indent out of range, skipping");
            return None;
        };

        let request = MutationRequest::resource()
            .field("indent")
            .value(new_indent.get())
            .id(item);
        let spinner = BusyIndicator::spinner(self.ctx.document.clone(), item.clone());
        Some(
            self.ctx
                .transport
                .send(request, Some(spinner), None, RequestOptions::default()),
        )
    }
}

impl ActionHandler for IndentController {
    fn handle(&self, invocation: &ActionInvocation) -> Option<MutationTask> {
        let ItemRef::Activity(item) = &invocation.item else {
            return None;
        };
        let direction = match invocation.action {
            Action::IndentDecrease => IndentDirection::Decrease,
            Action::IndentIncrease => IndentDirection::Increase,
            _ => return None,
        };
        self.apply(item, direction)
    }
}
