//! Deleting activities.

use std::sync::Arc;

use super::ControllerContext;
use crate::collaborators::StringArgs;
use crate::dispatch::{ActionHandler, ActionInvocation};
use crate::model::{ItemId, ItemRef};
use crate::targets;
use crate::transport::{MutationRequest, MutationTask, RequestOptions};

/// Deletes activities after confirmation.
///
/// The view is removed before the request goes out and is not restored if the
/// server later refuses.
#[derive(Debug)]
pub struct DeleteController {
    ctx: Arc<ControllerContext>,
}

impl DeleteController {
    pub fn new(ctx: Arc<ControllerContext>) -> Self {
        Self { ctx }
    }

    pub fn apply(&self, item: &ItemId) -> Option<MutationTask> {
        let (module_type, name) = self
            .ctx
            .document
            .read(|doc| doc.activity(item).map(|a| (a.module_type.clone(), a.name.clone())))?;

        let services = &self.ctx.services;
        let type_name = services.string("pluginname", &module_type);
        let message = match name {
            Some(name) => services.strings.get_string(
                "deletechecktypename",
                "moodle",
                &StringArgs::fields([("type", type_name), ("name", name)]),
            ),
            None => services.strings.get_string(
                "deletechecktype",
                "moodle",
                &StringArgs::fields([("type", type_name)]),
            ),
        };
        if !services.confirm.confirm(&message) {
            tracing::trace!(target: targets::CONTROLLER, %item, "delete not confirmed");
            return None;
        }

        self.ctx.document.update(|doc| doc.remove_activity(item));
        tracing::debug!(target: targets::CONTROLLER, %item, "activity removed");

        let request = MutationRequest::resource().delete().id(item);
        let task = self
            .ctx
            .transport
            .send(request, None, None, RequestOptions::default());
        services.action_menu.hide_menu();
        Some(task)
    }
}

impl ActionHandler for DeleteController {
    fn handle(&self, invocation: &ActionInvocation) -> Option<MutationTask> {
        match &invocation.item {
            ItemRef::Activity(item) => self.apply(item),
            ItemRef::Section(_) => None,
        }
    }
}
