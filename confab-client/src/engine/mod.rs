//! Browser binding: `web-sys` implementations of the platform seams and the
//! `ConfabClient` handle exported to JavaScript.

use crate::orchestrator::{OrchestratorInput, PeerOrchestrator, run_orchestrator};
use crate::logger::Logger;
use confab_core::RoomId;
use futures::channel::mpsc;
use serde::Serialize;
use wasm_bindgen::prelude::*;

mod create_pc_impl;
mod media_impl;
mod ws_setup_impl;

pub use create_pc_impl::WebTransport;
pub use media_impl::WebPlatform;
pub use ws_setup_impl::WsSink;

pub(crate) type InputQueue = mpsc::UnboundedSender<OrchestratorInput>;

/// Notifications handed to the page's event handler.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum Notice<'a> {
    Error { message: &'a str, fatal: bool },
    RemoteRemoved { connection_id: String },
    Closed,
}

/// Thin wrapper over the page's callback.
#[derive(Clone)]
pub(crate) struct EventHandler(js_sys::Function);

impl EventHandler {
    pub(crate) fn emit_value(&self, value: &JsValue) {
        if let Err(e) = self.0.call1(&JsValue::NULL, value) {
            Logger::error(&format!("Event handler threw: {:?}", e));
        }
    }

    fn emit<T: Serialize>(&self, payload: &T) {
        match serde_wasm_bindgen::to_value(payload) {
            Ok(value) => self.emit_value(&value),
            Err(e) => Logger::error(&format!("Failed to convert event for JS: {}", e)),
        }
    }

    /// `{type, ...fields}` plus a media stream the page should attach.
    pub(crate) fn emit_stream(&self, kind: &str, connection_id: Option<String>, stream: &JsValue) {
        let obj = js_sys::Object::new();
        let _ = js_sys::Reflect::set(&obj, &"type".into(), &kind.into());
        if let Some(id) = connection_id {
            let _ = js_sys::Reflect::set(&obj, &"connection_id".into(), &id.into());
        }
        let _ = js_sys::Reflect::set(&obj, &"stream".into(), stream);
        self.emit_value(&obj);
    }

    pub(crate) fn remote_removed(&self, connection_id: String) {
        self.emit(&Notice::RemoteRemoved { connection_id });
    }
}

/// Confab client room handle.
#[wasm_bindgen]
pub struct ConfabClient {
    queue: InputQueue,
}

#[wasm_bindgen]
impl ConfabClient {
    /// Open the signaling socket at `url` and start the orchestrator.
    ///
    /// `on_event` receives every server event as a plain object plus
    /// `local-stream`, `remote-stream`, `remote-removed` and `error` notices.
    #[wasm_bindgen(constructor)]
    pub fn new(url: &str, on_event: js_sys::Function) -> Result<ConfabClient, JsValue> {
        let handler = EventHandler(on_event);
        let (queue, inputs) = mpsc::unbounded();

        let sink = Self::ws_setup(url, queue.clone(), handler.clone())?;
        let platform = WebPlatform::new(queue.clone(), handler.clone());
        let orchestrator = PeerOrchestrator::new(platform, sink.clone());

        let error_handler = handler.clone();
        let socket = sink.clone();
        wasm_bindgen_futures::spawn_local(async move {
            run_orchestrator(orchestrator, inputs, |e| {
                error_handler.emit(&Notice::Error {
                    message: &e.to_string(),
                    fatal: false,
                });
            })
            .await;
            socket.close();
            error_handler.emit(&Notice::Closed);
        });

        Ok(ConfabClient { queue })
    }

    pub fn join(&self, room_id: &str, display_name: &str) {
        self.push(OrchestratorInput::Join {
            room_id: RoomId::from(room_id),
            display_name: display_name.to_owned(),
        });
    }

    pub fn leave(&self) {
        self.push(OrchestratorInput::Leave);
    }

    #[wasm_bindgen(js_name = toggleMicrophone)]
    pub fn toggle_microphone(&self) {
        self.push(OrchestratorInput::ToggleMicrophone);
    }

    #[wasm_bindgen(js_name = toggleCamera)]
    pub fn toggle_camera(&self) {
        self.push(OrchestratorInput::ToggleCamera);
    }

    #[wasm_bindgen(js_name = sendChat)]
    pub fn send_chat(&self, text: &str, time: &str) {
        self.push(OrchestratorInput::Chat {
            text: text.to_owned(),
            time: time.to_owned(),
        });
    }

    #[wasm_bindgen(js_name = setTyping)]
    pub fn set_typing(&self, is_typing: bool) {
        self.push(OrchestratorInput::Typing(is_typing));
    }

    /// Leave the room, stop the orchestrator and close the socket.
    pub fn close(&self) {
        self.queue.close_channel();
    }

    fn push(&self, input: OrchestratorInput) {
        if self.queue.unbounded_send(input).is_err() {
            Logger::warn("Client already closed");
        }
    }
}
