use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use pipeline_logging::{pipeline_error, pipeline_info, set_current_upload};

use crate::compress::{CompressSettings, Compressor, JpegCompressor};
use crate::preview::{decode_data_uri, encode_data_uri};
use crate::submit::{ChannelProgressSink, ProgressSink, ReqwestSubmitter, SubmitSettings, Submitter};
use crate::{
    CompressError, CompressedImage, EngineEvent, FailureKind, Stage, SubmitError, UploadId,
    UploadProgress,
};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("cannot start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("cannot set up submitter: {0}")]
    Submitter(#[from] SubmitError),
}

enum EngineCommand {
    Compress {
        upload_id: UploadId,
        bytes: Vec<u8>,
        settings: CompressSettings,
    },
    Submit {
        upload_id: UploadId,
        data_uri: String,
    },
}

/// Runs compression and submission on a background tokio runtime.
///
/// Results come back as [`EngineEvent`]s, in completion order.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Mutex<mpsc::Receiver<EngineEvent>>,
}

impl EngineHandle {
    pub fn new(settings: SubmitSettings) -> Result<Self, EngineError> {
        let submitter = ReqwestSubmitter::new(settings)?;
        Self::with_parts(Arc::new(JpegCompressor), Arc::new(submitter))
    }

    pub fn with_parts(
        compressor: Arc<dyn Compressor>,
        submitter: Arc<dyn Submitter>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("petsight-engine")
            .build()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let compressor = compressor.clone();
                let submitter = submitter.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(compressor, submitter.as_ref(), command, event_tx).await;
                });
            }
            pipeline_info!("engine command channel closed");
        });

        Ok(Self {
            cmd_tx,
            event_rx: Mutex::new(event_rx),
        })
    }

    pub fn compress(&self, upload_id: UploadId, bytes: Vec<u8>, settings: CompressSettings) {
        let _ = self.cmd_tx.send(EngineCommand::Compress {
            upload_id,
            bytes,
            settings,
        });
    }

    pub fn submit(&self, upload_id: UploadId, data_uri: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Submit {
            upload_id,
            data_uri: data_uri.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        let rx = self.event_rx.lock().unwrap_or_else(PoisonError::into_inner);
        rx.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        let rx = self.event_rx.lock().unwrap_or_else(PoisonError::into_inner);
        rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    compressor: Arc<dyn Compressor>,
    submitter: &dyn Submitter,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let sink = ChannelProgressSink::new(event_tx.clone());
    match command {
        EngineCommand::Compress {
            upload_id,
            bytes,
            settings,
        } => {
            let result = compress_with_preview(compressor, upload_id, bytes, settings, &sink).await;
            let _ = event_tx.send(EngineEvent::CompressionCompleted { upload_id, result });
        }
        EngineCommand::Submit {
            upload_id,
            data_uri,
        } => {
            // The payload is rebuilt from the preview so the server sees exactly what was shown.
            let result = match decode_data_uri(&data_uri) {
                Ok(decoded) => submitter.submit(upload_id, decoded.bytes, &sink).await,
                Err(err) => Err(SubmitError::new(FailureKind::InvalidPayload, err.to_string())),
            };
            if let Err(err) = &result {
                pipeline_error!("upload_id={} submission failed: {}", upload_id, err);
            }
            let _ = event_tx.send(EngineEvent::SubmissionCompleted { upload_id, result });
        }
    }
}

async fn compress_with_preview(
    compressor: Arc<dyn Compressor>,
    upload_id: UploadId,
    bytes: Vec<u8>,
    settings: CompressSettings,
    sink: &dyn ProgressSink,
) -> Result<CompressedImage, CompressError> {
    sink.emit(EngineEvent::Progress(UploadProgress {
        upload_id,
        stage: Stage::Compressing,
        bytes: Some(bytes.len() as u64),
    }));

    let original_len = bytes.len();
    let encoded = if settings.use_background_thread {
        tokio::task::spawn_blocking(move || {
            set_current_upload(upload_id);
            let result = compressor.compress(&bytes, &settings);
            set_current_upload(0);
            result
        })
        .await
        .map_err(|err| CompressError::Worker(err.to_string()))??
    } else {
        compressor.compress(&bytes, &settings)?
    };
    pipeline_info!(
        "upload_id={} compressed {} -> {} bytes ({}x{})",
        upload_id,
        original_len,
        encoded.bytes.len(),
        encoded.width,
        encoded.height
    );

    sink.emit(EngineEvent::Progress(UploadProgress {
        upload_id,
        stage: Stage::EncodingPreview,
        bytes: Some(encoded.bytes.len() as u64),
    }));
    let data_uri = encode_data_uri(encoded.mime_type, &encoded.bytes);

    Ok(CompressedImage {
        bytes: encoded.bytes,
        mime_type: encoded.mime_type.to_string(),
        width: encoded.width,
        height: encoded.height,
        data_uri,
    })
}
