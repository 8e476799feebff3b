//! The "current section" marker.

use std::sync::Arc;

use super::ControllerContext;
use crate::dispatch::{ActionHandler, ActionInvocation};
use crate::model::{ItemRef, SectionId};
use crate::targets;
use crate::transport::{BusyIndicator, MutationRequest, MutationTask, RequestOptions};

const HIGHLIGHT_LINK: &str = "highlight";

/// Marks at most one section as current.
///
/// Highlighting the current section clears the marker everywhere.
#[derive(Debug)]
pub struct HighlightController {
    ctx: Arc<ControllerContext>,
}

impl HighlightController {
    pub fn new(ctx: Arc<ControllerContext>) -> Self {
        Self { ctx }
    }

    pub fn apply(&self, section: &SectionId) -> Option<MutationTask> {
        let services = &self.ctx.services;
        let unmarked = services.string("markthistopic", "moodle");
        let unmarked_icon = services.icons.image_url("i/marker", "moodle");
        let marked = services.string("markedthistopic", "moodle");
        let marked_icon = services.icons.image_url("i/marked", "moodle");

        let value = self.ctx.document.update(|doc| {
            let was_current = doc.section(section)?.current;

            for other in doc.sections_mut().iter_mut().filter(|s| s.current) {
                other.current = false;
                if let Some(link) = other.link_mut(HIGHLIGHT_LINK) {
                    link.set_caption(&unmarked);
                    link.icon.src = unmarked_icon.clone();
                }
            }

            if was_current {
                return Some("0".to_string());
            }
            let target = doc.section_mut(section)?;
            target.current = true;
            if let Some(link) = target.link_mut(HIGHLIGHT_LINK) {
                link.set_caption(&marked);
                link.icon.src = marked_icon;
            }
            Some(section.to_string())
        });

        let Some(value) = value else {
            tracing::trace!(target: targets::CONTROLLER, %section, "unknown section, skipping highlight");
            return None;
        };

        let request = MutationRequest::course()
            .field("marker")
            .value(value);
        let overlay = BusyIndicator::overlay(self.ctx.document.clone(), section.clone());
        Some(
            self.ctx
                .transport
                .send(request, Some(overlay), None, RequestOptions::default()),
        )
    }
}

impl ActionHandler for HighlightController {
    fn handle(&self, invocation: &ActionInvocation) -> Option<MutationTask> {
        match &invocation.item {
            ItemRef::Section(section) => self.apply(section),
            ItemRef::Activity(_) => None,
        }
    }
}
