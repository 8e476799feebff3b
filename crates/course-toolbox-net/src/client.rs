//! The shared form client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::redirect::Policy;

use crate::error::{NetworkError, Result};
use crate::post::FormPost;

/// Settings applied to every post made through a [`FormClient`].
#[derive(Clone, Debug)]
pub struct FormClientConfig {
    /// Whole-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub connect_timeout: Duration,
    /// Redirects followed before giving up.
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for FormClientConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Duration::from_secs(10),
            max_redirects: 10,
            user_agent: format!("CourseToolbox/{} (Rust)", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Builder for a [`FormClient`].
#[derive(Debug, Default)]
pub struct FormClientBuilder {
    config: FormClientConfig,
    default_headers: http::HeaderMap,
}

impl FormClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the whole-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Add a header sent with every post.
    pub fn default_header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<http::HeaderValue>,
    ) -> Result<Self> {
        let name = name
            .try_into()
            .map_err(|_| NetworkError::InvalidHeader("invalid header name".to_string()))?;
        let value = value
            .try_into()
            .map_err(|_| NetworkError::InvalidHeader("invalid header value".to_string()))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Build the client.
    ///
    /// Cookies are always kept: the endpoint authenticates the session by its
    /// cookie as well as the form's session key.
    pub fn build(self) -> Result<FormClient> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(self.config.connect_timeout)
            .redirect(Policy::limited(self.config.max_redirects))
            .cookie_store(true)
            .user_agent(self.config.user_agent.as_str())
            .default_headers(self.default_headers);
        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(FormClient {
            inner: Arc::new(FormClientInner {
                client: builder.build()?,
                config: self.config,
            }),
        })
    }
}

struct FormClientInner {
    client: reqwest::Client,
    config: FormClientConfig,
}

/// Posts URL-encoded forms.
///
/// Cheap to clone. Clones share the connection pool and cookie store.
#[derive(Clone)]
pub struct FormClient {
    inner: Arc<FormClientInner>,
}

impl FormClient {
    pub fn builder() -> FormClientBuilder {
        FormClientBuilder::new()
    }

    pub fn config(&self) -> &FormClientConfig {
        &self.inner.config
    }

    /// Start a post to `url`.
    pub fn post(&self, url: impl Into<String>) -> FormPost {
        FormPost::new(self.clone(), url.into())
    }

    pub(crate) fn reqwest_client(&self) -> &reqwest::Client {
        &self.inner.client
    }
}

impl std::fmt::Debug for FormClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormClient")
            .field("config", &self.inner.config)
            .finish()
    }
}
