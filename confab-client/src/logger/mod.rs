#[cfg(target_arch = "wasm32")]
use web_sys::console;

/// Console in the browser, `tracing` everywhere else.
pub struct Logger;

#[cfg(target_arch = "wasm32")]
impl Logger {
    pub fn info(msg: &str) {
        console::log_1(&format!("[INFO] {}", msg).into());
    }

    pub fn warn(msg: &str) {
        console::warn_1(&format!("[WARN] {}", msg).into());
    }

    pub fn error(msg: &str) {
        console::error_1(&format!("[ERROR] {}", msg).into());
    }

    pub fn debug(msg: &str) {
        console::debug_1(&format!("[DEBUG] {}", msg).into());
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Logger {
    pub fn info(msg: &str) {
        tracing::info!("{}", msg);
    }

    pub fn warn(msg: &str) {
        tracing::warn!("{}", msg);
    }

    pub fn error(msg: &str) {
        tracing::error!("{}", msg);
    }

    pub fn debug(msg: &str) {
        tracing::debug!("{}", msg);
    }
}
