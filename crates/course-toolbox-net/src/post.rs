//! One form post.

use std::time::Duration;

use crate::client::FormClient;
use crate::error::{NetworkError, Result};
use crate::targets;

/// A form post being assembled. Nothing is sent until [`send`](Self::send).
pub struct FormPost {
    client: FormClient,
    url: String,
    headers: http::HeaderMap,
    fields: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl FormPost {
    pub(crate) fn new(client: FormClient, url: String) -> Self {
        Self {
            client,
            url,
            headers: http::HeaderMap::new(),
            fields: Vec::new(),
            timeout: None,
        }
    }

    /// Add a header for this post only.
    ///
    /// Invalid names or values are skipped with a warning.
    pub fn header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<http::HeaderValue>,
    ) -> Self {
        match (name.try_into(), value.try_into()) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => tracing::warn!(target: targets::HTTP, "skipping invalid request header"),
        }
        self
    }

    /// Set the form fields, in submission order.
    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.fields = fields;
        self
    }

    /// Override the client's timeout for this post, if `timeout` is given.
    pub fn timeout_opt(mut self, timeout: Option<Duration>) -> Self {
        if timeout.is_some() {
            self.timeout = timeout;
        }
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send the form and return the reply body.
    ///
    /// A non-2xx status yields [`NetworkError::HttpStatus`] carrying the body,
    /// if there was one.
    #[tracing::instrument(skip_all, target = "course_toolbox_net::http", level = "debug", fields(url = %self.url))]
    pub async fn send(self) -> Result<String> {
        let url = url::Url::parse(&self.url)?;
        let mut request = self
            .client
            .reqwest_client()
            .post(url)
            .headers(self.headers)
            .form(&self.fields);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(target: targets::HTTP, status = status.as_u16(), "reply received");

        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(NetworkError::HttpStatus {
                status: status.as_u16(),
                message: Some(body).filter(|b| !b.is_empty()),
            })
        }
    }
}

impl std::fmt::Debug for FormPost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormPost")
            .field("url", &self.url)
            .field("fields", &self.fields.len())
            .finish()
    }
}
