//! Course Toolbox - optimistic, incremental course editing.
//!
//! The engine behind a course editing page: clicks on item actions (indent,
//! hide/show, group mode, highlight, rename, duplicate, delete) are routed to
//! controllers that update an in-memory [`CourseDocument`](model::CourseDocument)
//! immediately and then send one mutation to the server.
//!
//! The page itself (rendering, strings, icons, prompts) is supplied by the host
//! through the traits in [`collaborators`].
//!
//! # Example
//!
//! ```
//! use course_toolbox::prelude::*;
//! use course_toolbox::testing::{ScriptedEndpoint, TestServices};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let document = DocumentHandle::new(
//!     CourseDocument::new().with_section(
//!         SectionView::new(1).with_activity(
//!             ActivityView::new(12, "forum")
//!                 .with_name("News")
//!                 .with_link(ActionLink::new("moveright")),
//!         ),
//!     ),
//! );
//! let config = ToolboxConfig::builder("https://school.example", 42, "sesskey").build()?;
//! let endpoint = ScriptedEndpoint::new();
//! let toolbox = CourseToolbox::new(config, document, endpoint.clone(), TestServices::new().services())?;
//!
//! let mut click = ClickEvent::on_activity_link(12, "moveright");
//! let task = toolbox.handle_click(&mut click).into_task().expect("indent request");
//! assert!(task.await.is_success());
//! assert_eq!(endpoint.last_request().unwrap().get("value"), Some("1"));
//! # Ok(())
//! # }
//! ```

pub mod collaborators;
pub mod config;
pub mod controllers;
pub mod dispatch;
mod error;
pub mod model;
pub mod prelude;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
mod toolbox;
pub mod transport;

pub use config::{ToolboxConfig, ToolboxConfigBuilder};
pub use error::{ConfigError, ModelError, MutationFailure};
pub use toolbox::CourseToolbox;

/// Tracing targets used by this crate.
pub mod targets {
    /// Click routing.
    pub const DISPATCH: &str = "course_toolbox::dispatch";
    /// Mutation delivery.
    pub const TRANSPORT: &str = "course_toolbox::transport";
    /// Bounded and cyclic controllers.
    pub const CONTROLLER: &str = "course_toolbox::controller";
    /// Inline rename.
    pub const RENAME: &str = "course_toolbox::rename";
    /// Start-up and wiring.
    pub const TOOLBOX: &str = "course_toolbox::toolbox";
}
