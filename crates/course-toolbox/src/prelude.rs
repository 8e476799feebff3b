//! Prelude module for Course Toolbox.
//!
//! Re-exports the types most pages need:
//!
//! ```
//! use course_toolbox::prelude::*;
//! ```

// ============================================================================
// Composition root and configuration
// ============================================================================

pub use crate::config::ToolboxConfig;
pub use crate::error::{ConfigError, ModelError, MutationFailure};
pub use crate::toolbox::CourseToolbox;

// ============================================================================
// Document model
// ============================================================================

pub use crate::model::{
    Action, ActionLink, ActivityView, CourseDocument, DocumentHandle, EditorKey, GroupMode,
    IndentLevel, ItemId, ItemRef, SectionId, SectionView, TitleEditor, VisibilityAction,
};

// ============================================================================
// Events and mutations
// ============================================================================

pub use crate::dispatch::{ClickEvent, DispatchResult, EventNode};
pub use crate::transport::{
    MutationOutcome, MutationRequest, MutationResponse, MutationTask, RequestOptions,
};
pub use course_toolbox_core::Signal;

// ============================================================================
// Collaborators
// ============================================================================

pub use crate::collaborators::{
    ActionMenu, ConfirmPrompt, CourseModule, FailureReporter, IconResolver, ItemLayout,
    JsonItemLayout, ModuleDirectory, ModuleRegistry, Services, StringArgs, StringLookup,
};
