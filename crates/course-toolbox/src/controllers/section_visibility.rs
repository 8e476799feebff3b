//! Whole-section visibility.

use std::sync::Arc;

use super::ControllerContext;
use super::visibility::{DimAffordance, dim_activity};
use crate::dispatch::{ActionHandler, ActionInvocation};
use crate::model::{ItemRef, SectionId, VisibilityAction};
use crate::targets;
use crate::transport::{
    BusyIndicator, MutationRequest, MutationResponse, MutationTask, RequestOptions, SuccessCallback,
};

const SHOWHIDE_LINK: &str = "showhide";

/// Hides and shows sections.
///
/// The server replies with the activities whose own state flips along with
/// the section; exactly those get the activity-level UI change.
#[derive(Debug)]
pub struct SectionVisibilityController {
    ctx: Arc<ControllerContext>,
}

impl SectionVisibilityController {
    pub fn new(ctx: Arc<ControllerContext>) -> Self {
        Self { ctx }
    }

    pub fn apply(&self, section: &SectionId) -> Option<MutationTask> {
        let Some(hidden) = self.ctx.document.read(|doc| doc.section(section).map(|s| s.hidden))
        else {
            tracing::trace!(target: targets::CONTROLLER, %section, "unknown section, skipping");
            return None;
        };
        let action = if hidden {
            VisibilityAction::Show
        } else {
            VisibilityAction::Hide
        };
        let next = action.opposite();

        let services = &self.ctx.services;
        let caption = services.string(
            &format!("{}fromothers", next.as_str()),
            &format!("format_{}", self.ctx.config.format),
        );
        let icon = services
            .icons
            .image_url(&format!("i/{}", next.as_str()), "moodle");

        self.ctx.document.update(|doc| {
            if let Some(view) = doc.section_mut(section) {
                view.hidden = !hidden;
                if let Some(link) = view.link_mut(SHOWHIDE_LINK) {
                    link.set_caption(&caption);
                    link.icon.src = icon;
                }
            }
        });

        let document = self.ctx.document.clone();
        let affordance = DimAffordance::after(action, services);
        let target = section.clone();
        let on_success: SuccessCallback = Box::new(move |response: &MutationResponse| {
            document.update(|doc| {
                let Some(view) = doc.section_mut(&target) else {
                    return;
                };
                for activity in view
                    .activities
                    .iter_mut()
                    .filter(|a| response.toggles(&a.id))
                {
                    dim_activity(activity, &affordance);
                }
            });
        });

        let request = MutationRequest::section()
            .field("visible")
            .value(action.visible_value())
            .id(section);
        let overlay = BusyIndicator::overlay(self.ctx.document.clone(), section.clone());
        Some(self.ctx.transport.send(
            request,
            Some(overlay),
            Some(on_success),
            RequestOptions::default(),
        ))
    }
}

impl ActionHandler for SectionVisibilityController {
    fn handle(&self, invocation: &ActionInvocation) -> Option<MutationTask> {
        match &invocation.item {
            ItemRef::Section(section) => self.apply(section),
            ItemRef::Activity(_) => None,
        }
    }
}
