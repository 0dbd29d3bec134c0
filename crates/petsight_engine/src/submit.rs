use std::time::Duration;

use futures_util::StreamExt;
use pipeline_logging::{pipeline_debug, pipeline_info};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use url::Url;

use crate::{EngineEvent, FailureKind, Stage, SubmitError, UploadId, UploadProgress};

pub const UPLOAD_PATH: &str = "/api/upload";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct SubmitSettings {
    pub endpoint: Url,
    pub field_name: String,
    pub file_name: String,
    pub mime_type: String,
    /// `None` leaves the transport default in place.
    pub connect_timeout: Option<Duration>,
    /// `None` leaves the transport default in place.
    pub request_timeout: Option<Duration>,
    pub max_response_bytes: u64,
}

impl SubmitSettings {
    /// Settings posting to [`UPLOAD_PATH`] on `base_url`.
    pub fn for_base_url(base_url: &str) -> Result<Self, SubmitError> {
        let base = Url::parse(base_url)
            .map_err(|err| SubmitError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let endpoint = base
            .join(UPLOAD_PATH)
            .map_err(|err| SubmitError::new(FailureKind::InvalidUrl, err.to_string()))?;
        Ok(Self {
            endpoint,
            field_name: "image".to_string(),
            file_name: "compressedImage.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            connect_timeout: None,
            request_timeout: None,
            max_response_bytes: 1024 * 1024,
        })
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Sends one image to the analysis service and returns its verdict.
#[async_trait::async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(
        &self,
        upload_id: UploadId,
        payload: Vec<u8>,
        sink: &dyn ProgressSink,
    ) -> Result<String, SubmitError>;
}

#[derive(Deserialize)]
struct AnalysisBody {
    result: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct ReqwestSubmitter {
    settings: SubmitSettings,
    client: reqwest::Client,
}

impl ReqwestSubmitter {
    pub fn new(settings: SubmitSettings) -> Result<Self, SubmitError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| SubmitError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn build_form(&self, payload: Vec<u8>) -> Result<Form, SubmitError> {
        let part = Part::bytes(payload)
            .file_name(self.settings.file_name.clone())
            .mime_str(&self.settings.mime_type)
            .map_err(|err| SubmitError::new(FailureKind::InvalidPayload, err.to_string()))?;
        Ok(Form::new().part(self.settings.field_name.clone(), part))
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, SubmitError> {
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(SubmitError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(SubmitError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl Submitter for ReqwestSubmitter {
    async fn submit(
        &self,
        upload_id: UploadId,
        payload: Vec<u8>,
        sink: &dyn ProgressSink,
    ) -> Result<String, SubmitError> {
        let payload_len = payload.len() as u64;
        let form = self.build_form(payload)?;

        sink.emit(EngineEvent::Progress(UploadProgress {
            upload_id,
            stage: Stage::Uploading,
            bytes: Some(payload_len),
        }));
        pipeline_info!(
            "POST {} upload_id={} bytes={}",
            self.settings.endpoint,
            upload_id,
            payload_len
        );

        let response = self
            .client
            .post(self.settings.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        sink.emit(EngineEvent::Progress(UploadProgress {
            upload_id,
            stage: Stage::AwaitingResponse,
            bytes: None,
        }));

        let status = response.status();
        let body = self.read_body(response).await?;
        pipeline_debug!(
            "upload_id={} status={} body_len={}",
            upload_id,
            status,
            body.len()
        );

        if !status.is_success() {
            let message = match serde_json::from_slice::<ErrorBody>(&body) {
                Ok(parsed) => parsed.error,
                Err(_) => status.to_string(),
            };
            return Err(SubmitError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        let parsed: AnalysisBody = serde_json::from_slice(&body).map_err(|err| {
            SubmitError::new(
                FailureKind::InvalidResponse,
                format!("invalid response body: {err}"),
            )
        })?;

        sink.emit(EngineEvent::Progress(UploadProgress {
            upload_id,
            stage: Stage::Done,
            bytes: Some(body.len() as u64),
        }));
        Ok(parsed.result)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> SubmitError {
    if err.is_timeout() {
        return SubmitError::new(FailureKind::Timeout, err.to_string());
    }
    SubmitError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::SubmitSettings;
    use crate::FailureKind;

    #[test]
    fn endpoint_is_joined_onto_base_url() {
        let settings = SubmitSettings::for_base_url("https://cats.example.com/some/page").unwrap();
        assert_eq!(
            settings.endpoint.as_str(),
            "https://cats.example.com/api/upload"
        );
        assert_eq!(settings.field_name, "image");
        assert_eq!(settings.request_timeout, None);
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let err = SubmitSettings::for_base_url("not a url").unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }
}
