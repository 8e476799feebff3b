//! Activity visibility.

use std::sync::{Arc, Weak};

use serde_json::Value;

use super::ControllerContext;
use crate::collaborators::{CourseModule, Services};
use crate::dispatch::{ActionHandler, ActionInvocation};
use crate::error::ModelError;
use crate::model::{Action, ActivityView, ItemId, ItemRef, VisibilityAction};
use crate::targets;
use crate::transport::{BusyIndicator, MutationRequest, MutationTask, RequestOptions};

/// Strings for the affordance offered after a visibility change.
pub(crate) struct DimAffordance {
    next: VisibilityAction,
    caption: String,
    icon: String,
}

impl DimAffordance {
    pub(crate) fn after(action: VisibilityAction, services: &Services) -> Self {
        let next = action.opposite();
        Self {
            next,
            caption: services.string(next.as_str(), "moodle"),
            icon: services
                .icons
                .image_url(&format!("t/{}", next.as_str()), "moodle"),
        }
    }
}

/// Apply the UI side of a hide or show to one activity.
///
/// Conditionally hidden items keep their dim styling; the rule decides that.
pub(crate) fn dim_activity(activity: &mut ActivityView, affordance: &DimAffordance) {
    if let Some(link) = activity.visibility_link_mut() {
        link.action = affordance.next.as_str().to_string();
        link.set_caption(&affordance.caption);
        link.icon.src = affordance.icon.clone();
        if link.label.is_some() {
            link.label = Some(affordance.caption.clone());
        }
    }

    if !activity.conditionally_hidden {
        activity.dimmed = !activity.dimmed;
        activity.description_dimmed = !activity.description_dimmed;
    }

    if let Some(hidden) = activity.availability_info_hidden.as_mut() {
        *hidden = !*hidden;
    }
}

/// Hides and shows activities.
#[derive(Debug)]
pub struct VisibilityController {
    ctx: Arc<ControllerContext>,
}

impl VisibilityController {
    pub fn new(ctx: Arc<ControllerContext>) -> Self {
        Self { ctx }
    }

    /// Hide or show an activity.
    ///
    /// Refused while the activity's section is hidden.
    pub fn apply(&self, item: &ItemId, action: VisibilityAction) -> Option<MutationTask> {
        let affordance = DimAffordance::after(action, &self.ctx.services);
        let applied = self.ctx.document.update(|doc| {
            if doc.section_of(item)?.hidden {
                return None;
            }
            dim_activity(doc.activity_mut(item)?, &affordance);
            Some(())
        });
        if applied.is_none() {
            tracing::trace!(target: targets::CONTROLLER, %item, "visibility change refused");
            return None;
        }

        let request = MutationRequest::resource()
            .field("visible")
            .value(action.visible_value())
            .id(item);
        let spinner = BusyIndicator::spinner(self.ctx.document.clone(), item.clone());
        Some(
            self.ctx
                .transport
                .send(request, Some(spinner), None, RequestOptions::default()),
        )
    }

    /// Bring an activity's UI to `visible` without contacting the server.
    ///
    /// Returns whether anything changed.
    pub fn set_visibility_ui(&self, item: &ItemId, visible: bool) -> Result<bool, ModelError> {
        let currently_visible = self
            .ctx
            .document
            .read(|doc| doc.activity(item).map(|a| a.link(VisibilityAction::Show.as_str()).is_none()))
            .ok_or_else(|| ModelError::UnknownItem(item.clone()))?;
        if currently_visible == visible {
            return Ok(false);
        }

        let action = if currently_visible {
            VisibilityAction::Hide
        } else {
            VisibilityAction::Show
        };
        let affordance = DimAffordance::after(action, &self.ctx.services);
        self.ctx.document.update(|doc| {
            doc.activity_mut(item)
                .map(|activity| dim_activity(activity, &affordance))
                .ok_or_else(|| ModelError::UnknownItem(item.clone()))
        })?;
        Ok(true)
    }
}

impl ActionHandler for VisibilityController {
    fn handle(&self, invocation: &ActionInvocation) -> Option<MutationTask> {
        let ItemRef::Activity(item) = &invocation.item else {
            return None;
        };
        match invocation.action {
            Action::Hide => self.apply(item, VisibilityAction::Hide),
            Action::Show => self.apply(item, VisibilityAction::Show),
            _ => None,
        }
    }
}

/// Exposes [`VisibilityController::set_visibility_ui`] to sibling page modules.
///
/// Registered as `course-resource-toolbox`; answers
/// `set_visibility_resource_ui` with arguments `{"id": .., "visible": bool}`.
/// Holds the controller weakly, so a registered module never keeps a dropped
/// toolbox alive.
pub struct VisibilityModule {
    controller: Weak<VisibilityController>,
}

impl VisibilityModule {
    pub const NAME: &'static str = "course-resource-toolbox";
    pub const SET_VISIBILITY_UI: &'static str = "set_visibility_resource_ui";

    pub fn new(controller: &Arc<VisibilityController>) -> Self {
        Self {
            controller: Arc::downgrade(controller),
        }
    }
}

impl CourseModule for VisibilityModule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn invoke_function(&self, function: &str, args: &Value) -> bool {
        if function != Self::SET_VISIBILITY_UI {
            return false;
        }
        let Some(item) = args.get("id").and_then(ItemId::from_json) else {
            tracing::warn!(target: targets::CONTROLLER, "set_visibility_resource_ui called without an id");
            return false;
        };
        let Some(controller) = self.controller.upgrade() else {
            return false;
        };
        let visible = args.get("visible").and_then(Value::as_bool).unwrap_or(true);
        match controller.set_visibility_ui(&item, visible) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(target: targets::CONTROLLER, error = %e, "set_visibility_resource_ui failed");
                false
            }
        }
    }
}
