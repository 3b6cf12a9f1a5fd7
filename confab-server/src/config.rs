use crate::error::HubError;
use axum::http::{HeaderValue, Method};
use clap::Parser;
use confab_core::IceServerConfig;
use confab_core::utils::DEFAULT_STUN_ADDR;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};

#[derive(Debug, Clone, Parser)]
#[command(name = "confab-server", about = "Room presence and WebRTC signaling relay")]
pub struct ServerConfig {
    /// Address the HTTP/WebSocket listener binds to.
    #[arg(long, env = "CONFAB_BIND", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,

    /// STUN urls announced to clients, comma separated.
    #[arg(
        long = "stun",
        env = "CONFAB_STUN_URLS",
        value_delimiter = ',',
        default_value = DEFAULT_STUN_ADDR
    )]
    pub stun_urls: Vec<String>,

    #[arg(long, env = "TURN_URL")]
    pub turn_url: Option<String>,

    #[arg(long, env = "TURN_USERNAME")]
    pub turn_username: Option<String>,

    #[arg(long, env = "TURN_CREDENTIAL")]
    pub turn_credential: Option<String>,

    /// Only origin allowed by CORS. Any origin when unset.
    #[arg(long, env = "CORS_ORIGIN")]
    pub cors_origin: Option<String>,

    /// Capacity of the socket-to-hub command queue.
    #[arg(long, env = "CONFAB_COMMAND_BUFFER", default_value_t = 1024)]
    pub command_buffer: usize,
}

impl ServerConfig {
    pub fn ice_servers(&self) -> Vec<IceServerConfig> {
        let mut servers = Vec::new();

        let stun: Vec<String> = self
            .stun_urls
            .iter()
            .map(|url| url.trim())
            .filter(|url| !url.is_empty())
            .map(str::to_owned)
            .collect();
        if !stun.is_empty() {
            servers.push(IceServerConfig::stun(stun));
        }

        if let Some(turn_url) = &self.turn_url {
            servers.push(IceServerConfig {
                urls: vec![turn_url.clone()],
                username: self.turn_username.clone(),
                credential: self.turn_credential.clone(),
            });
        }

        servers
    }

    pub fn cors_layer(&self) -> Result<CorsLayer, HubError> {
        let layer = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any);

        match &self.cors_origin {
            Some(origin) => {
                let origin = HeaderValue::from_str(origin)
                    .map_err(|e| HubError::Config(format!("invalid CORS_ORIGIN {:?}: {}", origin, e)))?;
                Ok(layer.allow_origin(origin))
            }
            None => Ok(layer.allow_origin(Any)),
        }
    }
}
