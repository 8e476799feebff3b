//! Form-posting HTTP layer for the course toolbox.
//!
//! Every mutation the editing engine sends is one URL-encoded form POSTed to
//! the course REST endpoint. [`FormClient`] holds the connection pool, the
//! session cookie store and the headers every request carries:
//!
//! ```no_run
//! # async fn run() -> course_toolbox_net::Result<()> {
//! use std::time::Duration;
//! use course_toolbox_net::FormClient;
//!
//! let client = FormClient::builder()
//!     .timeout(Duration::from_secs(30))
//!     .default_header("X-Requested-With", "XMLHttpRequest")?
//!     .build()?;
//!
//! let body = client
//!     .post("https://lms.example.com/course/rest.php")
//!     .form(vec![("class".into(), "resource".into()), ("field".into(), "indent".into())])
//!     .send()
//!     .await?;
//! # let _ = body;
//! # Ok(())
//! # }
//! ```
//!
//! A reply with an error status still hands its body back inside
//! [`NetworkError::HttpStatus`], so callers can look for an application error
//! in it.

mod client;
mod error;
mod post;

pub use client::{FormClient, FormClientBuilder, FormClientConfig};
pub use error::{NetworkError, Result};
pub use post::FormPost;

/// Tracing targets used by this crate.
pub mod targets {
    /// Outgoing form posts.
    pub const HTTP: &str = "course_toolbox_net::http";
}
