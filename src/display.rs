//! Device-class heuristics: mobile detection and the pixel-density
//! multiplier derived from it.

/// Mobile markers looked for in the user-agent string.
const MOBILE_MARKERS: [&str; 3] = ["mobi", "android", "iphone"];

/// True when the client identifies as a mobile browser.
/// Native builds have no user agent and are never considered mobile.
pub fn is_mobile_device() -> bool {
    user_agent_is_mobile(&user_agent())
}

/// 2x rendering on mobile screens, 1x everywhere else.
pub fn pixel_ratio() -> f32 {
    if is_mobile_device() { 2.0 } else { 1.0 }
}

fn user_agent_is_mobile(ua: &str) -> bool {
    let ua = ua.to_ascii_lowercase();
    MOBILE_MARKERS.iter().any(|m| ua.contains(m))
}

#[cfg(target_arch = "wasm32")]
fn user_agent() -> String {
    web_sys::window()
        .and_then(|w| w.navigator().user_agent().ok())
        .unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
fn user_agent() -> String {
    String::new()
}
