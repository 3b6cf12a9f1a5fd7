pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_2: &str = "stun:stun1.l.google.com:19302";

/// Fallback ICE configuration when the server did not announce one.
pub fn default_ice_servers() -> Vec<crate::IceServerConfig> {
    vec![crate::IceServerConfig::stun([
        DEFAULT_STUN_ADDR,
        DEFAULT_STUN_ADDR_2,
    ])]
}
