use confab_core::{ClientEvent, ServerEvent};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::{JsValue, prelude::Closure};
use web_sys::WebSocket;

use crate::engine::{ConfabClient, EventHandler, InputQueue};
use crate::error::ClientError;
use crate::logger::Logger;
use crate::orchestrator::OrchestratorInput;
use crate::platform::SignalSink;

/// Outbound side of the signaling socket. Frames sent while the socket is
/// still connecting are held back and flushed on open.
#[derive(Clone)]
pub struct WsSink {
    ws: WebSocket,
    message_queue: Rc<RefCell<Vec<String>>>,
}

impl WsSink {
    pub fn close(&self) {
        if let Err(e) = self.ws.close() {
            Logger::warn(&format!("Closing socket failed: {:?}", e));
        }
    }
}

impl SignalSink for WsSink {
    fn send(&self, event: ClientEvent) -> Result<(), ClientError> {
        let json = serde_json::to_string(&event)?;
        match self.ws.ready_state() {
            WebSocket::CONNECTING => {
                self.message_queue.borrow_mut().push(json);
                Ok(())
            }
            WebSocket::OPEN => self
                .ws
                .send_with_str(&json)
                .map_err(|e| ClientError::Transport(format!("{:?}", e))),
            _ => Err(ClientError::Transport(format!(
                "socket closed, '{}' not sent",
                event.name()
            ))),
        }
    }
}

impl ConfabClient {
    pub(crate) fn ws_setup(
        url: &str,
        queue: InputQueue,
        handler: EventHandler,
    ) -> Result<WsSink, JsValue> {
        let ws: WebSocket = WebSocket::new(url)?;
        let sink = WsSink {
            ws: ws.clone(),
            message_queue: Rc::new(RefCell::new(Vec::new())),
        };

        let onopen_callback = {
            let sink = sink.clone();
            Closure::<dyn FnMut(JsValue)>::wrap(Box::new(move |_| {
                Logger::info("WS Open");
                for json in sink.message_queue.borrow_mut().drain(..) {
                    if let Err(e) = sink.ws.send_with_str(&json) {
                        Logger::warn(&format!("Queued frame not sent: {:?}", e));
                    }
                }
            }))
        };
        ws.set_onopen(Some(onopen_callback.as_ref().unchecked_ref()));
        onopen_callback.forget();

        let onmessage_callback = {
            let queue = queue.clone();
            Closure::<dyn FnMut(web_sys::MessageEvent)>::wrap(Box::new(
                move |e: web_sys::MessageEvent| {
                    let Ok(text) = e.data().dyn_into::<js_sys::JsString>() else {
                        Logger::debug("Ignoring non-text frame");
                        return;
                    };
                    let text: String = text.into();

                    let event: ServerEvent = match serde_json::from_str(&text) {
                        Ok(event) => event,
                        Err(e) => {
                            Logger::warn(&format!("JSON Error: {}. Text: {}", e, text));
                            return;
                        }
                    };

                    if let Ok(value) = serde_wasm_bindgen::to_value(&event) {
                        handler.emit_value(&value);
                    }
                    let _ = queue.unbounded_send(OrchestratorInput::Server(event));
                },
            ))
        };
        ws.set_onmessage(Some(onmessage_callback.as_ref().unchecked_ref()));
        onmessage_callback.forget();

        let onclose_callback = Closure::<dyn FnMut(JsValue)>::wrap(Box::new(move |_| {
            Logger::warn("WS Closed");
            queue.close_channel();
        }));
        ws.set_onclose(Some(onclose_callback.as_ref().unchecked_ref()));
        onclose_callback.forget();

        Ok(sink)
    }
}
