//! Duplicating activities.

use std::sync::Arc;

use course_toolbox_core::Signal;
use serde_json::json;

use super::ControllerContext;
use crate::dispatch::{ActionHandler, ActionInvocation};
use crate::model::{ItemId, ItemRef};
use crate::targets;
use crate::transport::{
    BusyIndicator, MutationRequest, MutationResponse, MutationTask, RequestOptions, SuccessCallback,
};

const DUPLICATE_LINK: &str = "duplicate";

/// Duplicates activities.
///
/// The copy does not exist until the server renders it, so the busy overlay
/// covers the source's section rather than an item.
#[derive(Debug)]
pub struct DuplicateController {
    ctx: Arc<ControllerContext>,
    item_inserted: Arc<Signal<ItemId>>,
}

impl DuplicateController {
    pub fn new(ctx: Arc<ControllerContext>) -> Self {
        Self {
            ctx,
            item_inserted: Arc::new(Signal::new()),
        }
    }

    /// Emitted with the new item's id once its view is in the document.
    pub fn item_inserted(&self) -> &Arc<Signal<ItemId>> {
        &self.item_inserted
    }

    pub fn apply(&self, item: &ItemId) -> Option<MutationTask> {
        let (section, return_section) = self.ctx.document.read(|doc| {
            let section = doc.section_of(item)?.id.clone();
            let sr = doc
                .activity(item)?
                .link(DUPLICATE_LINK)
                .and_then(|link| link.return_section.clone());
            Some((section, sr))
        })?;

        let mut request = MutationRequest::resource().field("duplicate").id(item);
        if let Some(sr) = return_section {
            request = request.param("sr", sr);
        }

        let ctx = self.ctx.clone();
        let inserted = self.item_inserted.clone();
        let source = item.clone();
        let on_success: SuccessCallback = Box::new(move |response: &MutationResponse| {
            let Some(content) = response.fullcontent.as_deref() else {
                tracing::warn!(target: targets::CONTROLLER, item = %source, "duplicate reply has no content");
                return;
            };
            let Some(view) = ctx.services.layout.parse_activity(content) else {
                return;
            };
            let new_id = view.id.clone();
            if let Err(e) = ctx.document.update(|doc| doc.insert_activity_after(&source, view)) {
                tracing::warn!(target: targets::CONTROLLER, error = %e, "duplicate source vanished");
                return;
            }

            ctx.services
                .modules
                .invoke_function("setup_for_resource", &json!({ "id": new_id.as_str() }));
            ctx.services.action_menu.item_added(&new_id);
            inserted.emit(new_id);
        });

        let overlay = BusyIndicator::overlay(self.ctx.document.clone(), section);
        Some(self.ctx.transport.send(
            request,
            Some(overlay),
            Some(on_success),
            RequestOptions::default(),
        ))
    }
}

impl ActionHandler for DuplicateController {
    fn handle(&self, invocation: &ActionInvocation) -> Option<MutationTask> {
        match &invocation.item {
            ItemRef::Activity(item) => self.apply(item),
            ItemRef::Section(_) => None,
        }
    }
}
