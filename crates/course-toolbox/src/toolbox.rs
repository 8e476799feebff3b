//! The page-level composition root.

use std::sync::Arc;

use course_toolbox_core::Signal;

use crate::collaborators::Services;
use crate::config::ToolboxConfig;
use crate::controllers::{
    ControllerContext, DeleteController, DuplicateController, GroupModeController,
    HighlightController, IndentController, RenameController, SectionVisibilityController,
    VisibilityController, VisibilityModule,
};
use crate::dispatch::{ActionDispatcher, ClickEvent, DispatchResult};
use crate::error::ConfigError;
use crate::model::{Action, DocumentHandle, ItemId};
use crate::targets;
use crate::transport::{HttpEndpoint, MutationEndpoint, Transport};

/// Everything the course editing page needs, wired together.
///
/// # Example
///
/// ```no_run
/// use course_toolbox::prelude::*;
/// # fn services() -> Services { unimplemented!() }
///
/// # fn main() -> Result<(), ConfigError> {
/// let config = ToolboxConfig::builder("https://school.example", 42, "sesskey").build()?;
/// let document = DocumentHandle::new(CourseDocument::new());
/// let toolbox = CourseToolbox::connect(config, document, services())?;
///
/// let mut click = ClickEvent::on_activity_link(12, "moveright");
/// toolbox.handle_click(&mut click);
/// # Ok(())
/// # }
/// ```
pub struct CourseToolbox {
    ctx: Arc<ControllerContext>,
    dispatcher: ActionDispatcher,
    indent: Arc<IndentController>,
    visibility: Arc<VisibilityController>,
    group_mode: Arc<GroupModeController>,
    highlight: Arc<HighlightController>,
    section_visibility: Arc<SectionVisibilityController>,
    rename: Arc<RenameController>,
    delete: Arc<DeleteController>,
    duplicate: Arc<DuplicateController>,
}

impl CourseToolbox {
    /// Build a toolbox that posts to the configured HTTP endpoint.
    pub fn connect(
        config: ToolboxConfig,
        document: DocumentHandle,
        services: Services,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let endpoint = HttpEndpoint::from_config(&config)?;
        Self::new(config, document, Arc::new(endpoint), services)
    }

    /// Build a toolbox around any endpoint.
    pub fn new(
        config: ToolboxConfig,
        document: DocumentHandle,
        endpoint: Arc<dyn MutationEndpoint>,
        services: Services,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let transport = Transport::new(
            endpoint,
            config.session(),
            services.failures.clone(),
            config.busy_hide_delay(),
        );
        let ctx = ControllerContext::new(document, transport, services, Arc::new(config));

        let indent = Arc::new(IndentController::new(ctx.clone()));
        let visibility = Arc::new(VisibilityController::new(ctx.clone()));
        let group_mode = Arc::new(GroupModeController::new(ctx.clone()));
        let highlight = Arc::new(HighlightController::new(ctx.clone()));
        let section_visibility = Arc::new(SectionVisibilityController::new(ctx.clone()));
        let rename = Arc::new(RenameController::new(ctx.clone()));
        let delete = Arc::new(DeleteController::new(ctx.clone()));
        let duplicate = Arc::new(DuplicateController::new(ctx.clone()));

        let dispatcher = ActionDispatcher::builder()
            .route(Action::EditTitle, rename.clone())
            .route_all(&[Action::IndentDecrease, Action::IndentIncrease], indent.clone())
            .route(Action::Delete, delete.clone())
            .route(Action::Duplicate, duplicate.clone())
            .route_all(&[Action::Hide, Action::Show], visibility.clone())
            .route(Action::SetGroupMode, group_mode.clone())
            .route(Action::HighlightSection, highlight.clone())
            .route(Action::ToggleSectionVisibility, section_visibility.clone())
            .build();

        ctx.services
            .modules
            .register_module(Arc::new(VisibilityModule::new(&visibility)));
        tracing::info!(target: targets::TOOLBOX, course = ctx.config.course_id, "course toolbox ready");

        Ok(Self {
            ctx,
            dispatcher,
            indent,
            visibility,
            group_mode,
            highlight,
            section_visibility,
            rename,
            delete,
            duplicate,
        })
    }

    /// Route one click from the page.
    pub fn handle_click(&self, event: &mut ClickEvent) -> DispatchResult {
        self.dispatcher.dispatch(event)
    }

    /// UI-only visibility change for an activity, as sibling modules request it.
    pub fn set_visibility_ui(&self, item: &ItemId, visible: bool) -> bool {
        self.visibility.set_visibility_ui(item, visible).unwrap_or(false)
    }

    /// Emitted with the id of each activity added by a duplicate.
    pub fn item_inserted(&self) -> &Arc<Signal<ItemId>> {
        self.duplicate.item_inserted()
    }

    pub fn document(&self) -> &DocumentHandle {
        &self.ctx.document
    }

    pub fn config(&self) -> &ToolboxConfig {
        &self.ctx.config
    }

    pub fn transport(&self) -> &Transport {
        &self.ctx.transport
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    pub fn indent(&self) -> &IndentController {
        &self.indent
    }

    pub fn visibility(&self) -> &VisibilityController {
        &self.visibility
    }

    pub fn group_mode(&self) -> &GroupModeController {
        &self.group_mode
    }

    pub fn highlight(&self) -> &HighlightController {
        &self.highlight
    }

    pub fn section_visibility(&self) -> &SectionVisibilityController {
        &self.section_visibility
    }

    pub fn rename(&self) -> &RenameController {
        &self.rename
    }

    pub fn delete(&self) -> &DeleteController {
        &self.delete
    }

    pub fn duplicate(&self) -> &DuplicateController {
        &self.duplicate
    }
}

impl std::fmt::Debug for CourseToolbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CourseToolbox")
            .field("course_id", &self.ctx.config.course_id)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}
