//! HTTP processing backend (multipart upload)

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use super::traits::ImageProcessor;
use crate::config::ProcessingConfig;
use crate::error::{Error, ProcessError, Result};
use crate::types::{ProcessedImage, SourceFile};

/// Multipart form field carrying the image
pub const FILE_FIELD: &str = "file";

/// Sends each file to the processing endpoint as `multipart/form-data`
///
/// A 2xx response body is the processed image. Any other status is a
/// rejection whose textual body, if not blank, becomes the item's error
/// message.
#[derive(Clone, Debug)]
pub struct HttpProcessor {
    client: reqwest::Client,
    endpoint: url::Url,
}

impl HttpProcessor {
    /// Build a processor for the configured endpoint
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the endpoint is not an http(s) URL, or
    /// [`Error::Network`] if the HTTP client cannot be built.
    pub fn new(config: &ProcessingConfig) -> Result<Self> {
        let endpoint = config.endpoint()?;

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(Error::Network)?;

        Ok(Self { client, endpoint })
    }

    /// Endpoint this processor posts to
    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }

    fn file_part(file: &SourceFile) -> Part {
        let part = || Part::stream(file.bytes.clone()).file_name(file.name.clone());
        match file.content_type.as_deref() {
            Some(content_type) => part().mime_str(content_type).unwrap_or_else(|e| {
                tracing::debug!(
                    content_type,
                    error = %e,
                    "unparseable content type, sending part without one"
                );
                part()
            }),
            None => part(),
        }
    }
}

#[async_trait]
impl ImageProcessor for HttpProcessor {
    async fn process(&self, file: &SourceFile) -> std::result::Result<ProcessedImage, ProcessError> {
        let form = Form::new().part(FILE_FIELD, Self::file_part(file));

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProcessError::Transport(format!("request to {} timed out", self.endpoint))
                } else {
                    ProcessError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            // Unreadable or non-text bodies count as "no message"
            let message = match response.bytes().await {
                Ok(body) => String::from_utf8(body.to_vec())
                    .ok()
                    .filter(|text| !text.trim().is_empty()),
                Err(_) => None,
            };
            return Err(ProcessError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProcessError::PayloadRead(e.to_string()))?;

        Ok(ProcessedImage {
            bytes,
            content_type,
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
