use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use petsight_core::{CompressionConfig, Effect, Msg, SubmissionResult};
use petsight_engine::{CompressSettings, EngineEvent, EngineHandle, UploadProgress};
use pipeline_logging::{pipeline_debug, pipeline_info, pipeline_warn};

use super::app::AppEvent;

/// Hands engine-bound effects to the engine and feeds its events back as messages.
pub(crate) struct EffectRunner {
    engine: Arc<EngineHandle>,
}

impl EffectRunner {
    pub(crate) fn new(engine: EngineHandle, event_tx: mpsc::Sender<AppEvent>) -> Self {
        let runner = Self {
            engine: Arc::new(engine),
        };
        runner.spawn_event_loop(event_tx);
        runner
    }

    pub(crate) fn run(&self, effect: Effect) {
        match effect {
            Effect::CompressImage {
                upload_id,
                input,
                config,
            } => {
                pipeline_info!(
                    "CompressImage upload_id={} file={} bytes={} max_mb={} max_edge={}",
                    upload_id,
                    input.file_name,
                    input.bytes.len(),
                    config.max_size_mb(),
                    config.max_width_or_height
                );
                self.engine
                    .compress(upload_id, input.bytes, compress_settings(config));
            }
            Effect::SubmitImage {
                upload_id,
                data_uri,
            } => {
                pipeline_info!(
                    "SubmitImage upload_id={} data_uri_len={}",
                    upload_id,
                    data_uri.len()
                );
                self.engine.submit(upload_id, data_uri);
            }
            Effect::Alert(notice) => {
                pipeline_debug!("alert {:?} is handled by the console", notice);
            }
        }
    }

    fn spawn_event_loop(&self, event_tx: mpsc::Sender<AppEvent>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            let Some(event) = engine.recv_timeout(Duration::from_millis(100)) else {
                continue;
            };
            let Some(msg) = map_event(event) else {
                continue;
            };
            if event_tx.send(AppEvent::Msg(msg)).is_err() {
                break;
            }
        });
    }
}

fn compress_settings(config: CompressionConfig) -> CompressSettings {
    CompressSettings {
        max_size_bytes: config.max_size_bytes,
        max_width_or_height: config.max_width_or_height,
        use_background_thread: config.use_background_thread,
        ..CompressSettings::default()
    }
}

fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::Progress(UploadProgress {
            upload_id,
            stage,
            bytes,
        }) => {
            pipeline_debug!("upload_id={} stage={:?} bytes={:?}", upload_id, stage, bytes);
            None
        }
        EngineEvent::CompressionCompleted { upload_id, result } => {
            let result = match result {
                Ok(image) => Ok(petsight_core::CompressedImage {
                    mime_type: image.mime_type,
                    width: image.width,
                    height: image.height,
                    byte_len: image.bytes.len() as u64,
                    data_uri: image.data_uri,
                }),
                Err(err) => {
                    pipeline_warn!("Compression {} failed: {}", upload_id, err);
                    Err(err.to_string())
                }
            };
            Some(Msg::CompressionFinished { upload_id, result })
        }
        EngineEvent::SubmissionCompleted { upload_id, result } => {
            let result = match result {
                Ok(result) => SubmissionResult::Success { result },
                Err(err) => SubmissionResult::Failure { error: err.message },
            };
            Some(Msg::SubmissionFinished { upload_id, result })
        }
    }
}
