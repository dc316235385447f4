// Pure pointer/DOM arithmetic, kept free of web-sys so the host tests can
// include it directly.

use glam::Vec2;
use grass_core::constants::MAX_PIXEL_RATIO;

/// Hint shown under the canvas, chosen by input modality.
#[inline]
pub fn instructions_text(touch: bool) -> &'static str {
    if touch {
        "Tap and drag to touch the grass \u{1f33f}"
    } else {
        "Move cursor to rustle \u{2022} Click and drag to touch grass"
    }
}

#[inline]
pub fn capped_pixel_ratio(dpr: f64) -> f64 {
    if dpr.is_finite() && dpr > 0.0 {
        dpr.min(MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}

/// Backing-store size for a CSS box at the given device pixel ratio.
#[inline]
pub fn backing_size(css_width: f64, css_height: f64, dpr: f64) -> (u32, u32) {
    let ratio = capped_pixel_ratio(dpr);
    let w = (css_width.max(0.0) * ratio) as u32;
    let h = (css_height.max(0.0) * ratio) as u32;
    (w.max(1), h.max(1))
}

/// Client coordinates relative to the element's top-left corner, in CSS px.
#[inline]
pub fn client_to_local(client_x: f64, client_y: f64, left: f64, top: f64) -> Vec2 {
    Vec2::new((client_x - left) as f32, (client_y - top) as f32)
}

/// `data-seed` attribute value, decimal or `0x` hex.
pub fn parse_seed(attr: Option<&str>) -> Option<u64> {
    let raw = attr?.trim();
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        raw.parse().ok()
    }
}

/// Substring test used for mobile user-agent detection.
pub fn is_mobile_user_agent(ua: &str) -> bool {
    const MARKERS: [&str; 8] = [
        "Android",
        "webOS",
        "iPhone",
        "iPad",
        "iPod",
        "BlackBerry",
        "IEMobile",
        "Opera Mini",
    ];
    let lower = ua.to_ascii_lowercase();
    MARKERS
        .iter()
        .any(|m| lower.contains(&m.to_ascii_lowercase()))
}
