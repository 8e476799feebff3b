//! Controllers: one per piece of editable state.
//!
//! Every controller follows the same shape. `apply` validates the requested
//! change, mutates the document optimistically, then hands a
//! [`MutationRequest`](crate::transport::MutationRequest) to the shared
//! [`Transport`]. It returns the in-flight [`MutationTask`](crate::transport::MutationTask),
//! or `None` when the change was refused and nothing was sent.

mod delete;
mod duplicate;
mod group_mode;
mod highlight;
mod indent;
mod rename;
mod section_visibility;
mod visibility;

pub use delete::DeleteController;
pub use duplicate::DuplicateController;
pub use group_mode::GroupModeController;
pub use highlight::HighlightController;
pub use indent::{IndentController, IndentDirection};
pub use rename::RenameController;
pub use section_visibility::SectionVisibilityController;
pub use visibility::{VisibilityController, VisibilityModule};

use std::sync::Arc;

use crate::collaborators::Services;
use crate::config::ToolboxConfig;
use crate::model::DocumentHandle;
use crate::transport::Transport;

/// Everything a controller works with.
#[derive(Clone)]
pub struct ControllerContext {
    pub document: DocumentHandle,
    pub transport: Transport,
    pub services: Services,
    pub config: Arc<ToolboxConfig>,
}

impl ControllerContext {
    pub fn new(
        document: DocumentHandle,
        transport: Transport,
        services: Services,
        config: Arc<ToolboxConfig>,
    ) -> Arc<Self> {
        Arc::new(Self {
            document,
            transport,
            services,
            config,
        })
    }
}

impl std::fmt::Debug for ControllerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerContext")
            .field("document", &self.document)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}
