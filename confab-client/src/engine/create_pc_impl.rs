use std::cell::RefCell;

use async_trait::async_trait;
use confab_core::{ConnectionId, IceCandidate, IceServerConfig, SdpKind, SessionDescription};
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    MediaStream, MediaStreamTrack, RtcPeerConnection, RtcPeerConnectionState, RtcRtpSender,
    RtcSdpType, RtcSessionDescriptionInit,
};

use crate::engine::{EventHandler, InputQueue};
use crate::error::ClientError;
use crate::logger::Logger;
use crate::media::plan_senders;
use crate::orchestrator::OrchestratorInput;
use crate::platform::{MediaTransport, TransportEvent};

fn js_err(e: JsValue) -> ClientError {
    ClientError::Transport(format!("{:?}", e))
}

/// `RTCPeerConnection` to one remote participant.
pub struct WebTransport {
    pc: RtcPeerConnection,
    stream: MediaStream,
    /// One sender per track kind, reused across toggles.
    senders: RefCell<Vec<(String, RtcRtpSender)>>,
}

impl WebTransport {
    pub(crate) fn create_pc(
        remote: ConnectionId,
        ice_servers: &[IceServerConfig],
        queue: InputQueue,
        handler: EventHandler,
    ) -> Result<WebTransport, JsValue> {
        let rtc_config = web_sys::RtcConfiguration::new();
        let ice_servers_arr = js_sys::Array::new();

        for server_config in ice_servers {
            let rtc_ice_server = web_sys::RtcIceServer::new();

            let urls = js_sys::Array::new();
            for url in &server_config.urls {
                urls.push(&JsValue::from_str(url));
            }
            rtc_ice_server.set_urls(&urls);

            if let Some(username) = &server_config.username {
                rtc_ice_server.set_username(username);
            }

            if let Some(credential) = &server_config.credential {
                rtc_ice_server.set_credential(credential);
            }

            ice_servers_arr.push(&rtc_ice_server);
        }

        rtc_config.set_ice_servers(&ice_servers_arr);

        let pc = RtcPeerConnection::new_with_configuration(&rtc_config)?;

        let ice_queue = queue.clone();
        let onice = Closure::wrap(Box::new(move |ev: web_sys::RtcPeerConnectionIceEvent| {
            let Some(candidate) = ev.candidate() else {
                return;
            };

            let gathered = serde_wasm_bindgen::from_value::<IceCandidate>(candidate.to_json().into())
                .unwrap_or_else(|_| {
                    let mut fallback = IceCandidate::new(candidate.candidate());
                    fallback.sdp_mid = candidate.sdp_mid();
                    fallback.sdp_m_line_index = candidate.sdp_m_line_index();
                    fallback
                });

            let _ = ice_queue.unbounded_send(OrchestratorInput::Transport {
                remote,
                event: TransportEvent::LocalCandidate(gathered),
            });
        })
            as Box<dyn FnMut(web_sys::RtcPeerConnectionIceEvent)>);
        pc.set_onicecandidate(Some(onice.as_ref().unchecked_ref()));
        onice.forget();

        let state_pc = pc.clone();
        let onstate = Closure::wrap(Box::new(move |_: JsValue| {
            let event = match state_pc.connection_state() {
                RtcPeerConnectionState::Connected => TransportEvent::Connected,
                RtcPeerConnectionState::Failed => TransportEvent::Failed,
                _ => return,
            };
            let _ = queue.unbounded_send(OrchestratorInput::Transport { remote, event });
        }) as Box<dyn FnMut(JsValue)>);
        pc.set_onconnectionstatechange(Some(onstate.as_ref().unchecked_ref()));
        onstate.forget();

        let ontrack = Closure::wrap(Box::new(move |ev: web_sys::RtcTrackEvent| {
            let stream = ev.streams().get(0);
            if stream.is_undefined() {
                return;
            }
            Logger::info(&format!("Remote track from {}", remote));
            handler.emit_stream("remote-stream", Some(remote.to_string()), &stream);
        }) as Box<dyn FnMut(web_sys::RtcTrackEvent)>);
        pc.set_ontrack(Some(ontrack.as_ref().unchecked_ref()));
        ontrack.forget();

        Ok(WebTransport {
            pc,
            stream: MediaStream::new()?,
            senders: RefCell::new(Vec::new()),
        })
    }

    async fn local_description(
        &self,
        promise: js_sys::Promise,
        kind: SdpKind,
    ) -> Result<SessionDescription, ClientError> {
        let created = JsFuture::from(promise).await.map_err(js_err)?;
        let sdp = js_sys::Reflect::get(&created, &"sdp".into())
            .map_err(js_err)?
            .as_string()
            .ok_or_else(|| ClientError::Transport("description without sdp".to_owned()))?;

        let desc = RtcSessionDescriptionInit::new(sdp_type(kind));
        desc.set_sdp(&sdp);
        JsFuture::from(self.pc.set_local_description(&desc))
            .await
            .map_err(js_err)?;

        Ok(SessionDescription { kind, sdp })
    }
}

/// Swap the sender's track in place. `None` leaves the transceiver silent.
fn replace_track(sender: &RtcRtpSender, track: Option<&MediaStreamTrack>) {
    let promise = sender.replace_track(track);
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = JsFuture::from(promise).await {
            Logger::warn(&format!("Track replacement failed: {:?}", e));
        }
    });
}

fn sdp_type(kind: SdpKind) -> RtcSdpType {
    match kind {
        SdpKind::Offer => RtcSdpType::Offer,
        SdpKind::Answer => RtcSdpType::Answer,
    }
}

#[async_trait(?Send)]
impl MediaTransport for WebTransport {
    type Track = MediaStreamTrack;

    fn set_local_tracks(&self, tracks: &[MediaStreamTrack]) {
        for track in self.stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                self.stream.remove_track(&track);
            }
        }
        for track in tracks {
            self.stream.add_track(track);
        }

        let mut senders = self.senders.borrow_mut();
        let kinds: Vec<String> = senders.iter().map(|(kind, _)| kind.clone()).collect();
        let plan = plan_senders(&kinds, tracks, MediaStreamTrack::kind);

        for ((_, sender), track) in senders.iter().zip(plan.replace) {
            replace_track(sender, track);
        }
        for track in plan.add {
            let sender = self.pc.add_track_0(track, &self.stream);
            senders.push((track.kind(), sender));
        }
    }

    async fn create_offer(&self) -> Result<SessionDescription, ClientError> {
        self.local_description(self.pc.create_offer(), SdpKind::Offer)
            .await
    }

    async fn create_answer(&self) -> Result<SessionDescription, ClientError> {
        self.local_description(self.pc.create_answer(), SdpKind::Answer)
            .await
    }

    async fn apply_remote_description(
        &self,
        description: &SessionDescription,
    ) -> Result<(), ClientError> {
        let desc = RtcSessionDescriptionInit::new(sdp_type(description.kind));
        desc.set_sdp(&description.sdp);
        JsFuture::from(self.pc.set_remote_description(&desc))
            .await
            .map_err(js_err)?;
        Ok(())
    }

    async fn add_candidate(&self, candidate: &IceCandidate) -> Result<(), ClientError> {
        let init = web_sys::RtcIceCandidateInit::new(&candidate.candidate);
        if let Some(mid) = &candidate.sdp_mid {
            init.set_sdp_mid(Some(mid));
        }
        if let Some(idx) = candidate.sdp_m_line_index {
            init.set_sdp_m_line_index(Some(idx));
        }
        if let Some(ufrag) = &candidate.username_fragment {
            init.set_username_fragment(Some(ufrag));
        }

        let promise = self
            .pc
            .add_ice_candidate_with_opt_rtc_ice_candidate_init(Some(&init));
        JsFuture::from(promise).await.map_err(js_err)?;
        Ok(())
    }

    fn close(&self) {
        self.pc.set_onicecandidate(None);
        self.pc.set_onconnectionstatechange(None);
        self.pc.set_ontrack(None);
        self.pc.close();
    }
}
