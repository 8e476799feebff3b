//! Where mutations are delivered.

use course_toolbox_net::{FormClient, NetworkError};
use futures_util::future::BoxFuture;

use super::mutation::RequestOptions;
use crate::config::ToolboxConfig;
use crate::error::ConfigError;

/// Delivers one URL-encoded form and yields the raw response body.
///
/// Implementations must not retry: each call is one delivery attempt. An
/// error status is returned as [`NetworkError::HttpStatus`] with the reply
/// body attached, so the transport can still find an `error` field in it.
pub trait MutationEndpoint: Send + Sync {
    fn post_form(
        &self,
        form: Vec<(String, String)>,
        options: RequestOptions,
    ) -> BoxFuture<'static, Result<String, NetworkError>>;
}

/// Posts mutations to the course REST endpoint over HTTP.
#[derive(Clone, Debug)]
pub struct HttpEndpoint {
    client: FormClient,
    url: String,
}

impl HttpEndpoint {
    pub fn new(client: FormClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Build a client and endpoint from a page configuration.
    pub fn from_config(config: &ToolboxConfig) -> Result<Self, ConfigError> {
        let mut builder = FormClient::builder()
            .default_header("X-Requested-With", "XMLHttpRequest")?;
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self::new(builder.build()?, config.endpoint_url()?))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl MutationEndpoint for HttpEndpoint {
    fn post_form(
        &self,
        form: Vec<(String, String)>,
        options: RequestOptions,
    ) -> BoxFuture<'static, Result<String, NetworkError>> {
        let mut request = self
            .client
            .post(&self.url)
            .form(form)
            .timeout_opt(options.timeout);
        for (name, value) in options.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        Box::pin(request.send())
    }
}
