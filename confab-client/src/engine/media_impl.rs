use async_trait::async_trait;
use confab_core::{ConnectionId, IceServerConfig};
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{DomException, MediaStream, MediaStreamConstraints, MediaStreamTrack};

use crate::engine::create_pc_impl::WebTransport;
use crate::engine::{EventHandler, InputQueue};
use crate::error::ClientError;
use crate::logger::Logger;
use crate::media::MediaKind;
use crate::platform::MediaPlatform;

/// `getUserMedia` for capture, page callbacks for rendering.
pub struct WebPlatform {
    queue: InputQueue,
    handler: EventHandler,
}

impl WebPlatform {
    pub(crate) fn new(queue: InputQueue, handler: EventHandler) -> Self {
        Self { queue, handler }
    }
}

fn media_error(kind: MediaKind, e: JsValue) -> ClientError {
    match e.dyn_ref::<DomException>().map(|d| d.name()) {
        Some(name) if name == "NotAllowedError" || name == "SecurityError" => {
            ClientError::MediaPermissionDenied(kind)
        }
        Some(name) => ClientError::MediaUnavailable(kind, name),
        None => ClientError::MediaUnavailable(kind, format!("{:?}", e)),
    }
}

#[async_trait(?Send)]
impl MediaPlatform for WebPlatform {
    type Track = MediaStreamTrack;
    type Transport = WebTransport;

    fn open_transport(
        &self,
        remote: ConnectionId,
        ice_servers: &[IceServerConfig],
    ) -> Result<WebTransport, ClientError> {
        WebTransport::create_pc(remote, ice_servers, self.queue.clone(), self.handler.clone())
            .map_err(|e| ClientError::Transport(format!("{:?}", e)))
    }

    async fn acquire(&self, kind: MediaKind) -> Result<MediaStreamTrack, ClientError> {
        let devices = web_sys::window()
            .ok_or_else(|| ClientError::MediaUnavailable(kind, "no window".to_owned()))?
            .navigator()
            .media_devices()
            .map_err(|e| media_error(kind, e))?;

        let constraints = MediaStreamConstraints::new();
        match kind {
            MediaKind::Audio => constraints.set_audio(&JsValue::TRUE),
            MediaKind::Video => constraints.set_video(&JsValue::TRUE),
        }

        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(|e| media_error(kind, e))?;
        let stream: MediaStream = JsFuture::from(promise)
            .await
            .map_err(|e| media_error(kind, e))?
            .dyn_into()
            .map_err(|e| media_error(kind, e))?;

        let tracks = match kind {
            MediaKind::Audio => stream.get_audio_tracks(),
            MediaKind::Video => stream.get_video_tracks(),
        };
        let track: MediaStreamTrack = tracks
            .get(0)
            .dyn_into()
            .map_err(|_| ClientError::MediaUnavailable(kind, "no track returned".to_owned()))?;

        Logger::info(&format!("Acquired {} track {}", kind, track.id()));
        Ok(track)
    }

    fn stop_track(&self, track: &MediaStreamTrack) {
        Logger::info(&format!("Stopping track {}", track.id()));
        track.stop();
    }

    fn render_local(&self, tracks: &[MediaStreamTrack]) {
        let stream = match MediaStream::new() {
            Ok(stream) => stream,
            Err(e) => {
                Logger::error(&format!("Failed to build local preview: {:?}", e));
                return;
            }
        };
        for track in tracks {
            stream.add_track(track);
        }
        self.handler.emit_stream("local-stream", None, &stream);
    }

    fn remove_remote(&self, remote: ConnectionId) {
        self.handler.remote_removed(remote.to_string());
    }
}
