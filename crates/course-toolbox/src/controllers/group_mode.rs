//! Group mode cycling.

use std::sync::Arc;

use super::ControllerContext;
use crate::collaborators::StringArgs;
use crate::dispatch::{ActionHandler, ActionInvocation};
use crate::model::{GroupMode, ItemId, ItemRef};
use crate::targets;
use crate::transport::{BusyIndicator, MutationRequest, MutationTask, RequestOptions};

/// Cycles an activity's group mode none → separate → visible → none.
///
/// The link stores the mode a click requests, or failing that its raw id names
/// the current mode and the request is the one after it. The requested mode is
/// what gets sent; the link then advances to offer the one after it.
#[derive(Debug)]
pub struct GroupModeController {
    ctx: Arc<ControllerContext>,
}

impl GroupModeController {
    pub fn new(ctx: Arc<ControllerContext>) -> Self {
        Self { ctx }
    }

    /// Apply the mode requested by the item's link with raw id `action_id`.
    pub fn apply(&self, item: &ItemId, action_id: &str) -> Option<MutationTask> {
        let requested = self.ctx.document.read(|doc| {
            let link = doc.activity(item)?.link(action_id)?;
            // The raw id names the current mode when the link carries no request.
            link.next_group_mode
                .or_else(|| GroupMode::from_string_key(action_id).map(GroupMode::next))
        });
        let Some(mode) = requested else {
            tracing::trace!(target: targets::CONTROLLER, %item, action_id, "no group mode link, skipping");
            return None;
        };

        let services = &self.ctx.services;
        let mode_name = services.string(mode.string_key(), "moodle");
        let title = services.strings.get_string(
            "clicktochangeinbrackets",
            "moodle",
            &StringArgs::text(mode_name),
        );
        let icon = services.icons.image_url(mode.icon_key(), "moodle");

        self.ctx.document.update(|doc| {
            if let Some(link) = doc.activity_mut(item).and_then(|a| a.link_mut(action_id)) {
                link.action = mode.string_key().to_string();
                link.set_caption(&title);
                link.icon.src = icon;
                link.next_group_mode = Some(mode.next());
            }
        });

        let request = MutationRequest::resource()
            .field("groupmode")
            .value(mode.value())
            .id(item);
        let spinner = BusyIndicator::spinner(self.ctx.document.clone(), item.clone());
        Some(
            self.ctx
                .transport
                .send(request, Some(spinner), None, RequestOptions::default()),
        )
    }
}

impl ActionHandler for GroupModeController {
    fn handle(&self, invocation: &ActionInvocation) -> Option<MutationTask> {
        match &invocation.item {
            ItemRef::Activity(item) => self.apply(item, &invocation.action_id),
            ItemRef::Section(_) => None,
        }
    }
}
