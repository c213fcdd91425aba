/// Constants that depend on the *frame-buffer*, not on the map.
#[derive(Clone, Copy, Debug)]
pub struct Screen {
    pub w: usize,
    pub h: usize,
    pub half_h: f64, // pre-derived for speed
}

impl Screen {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            half_h: h as f64 * 0.5,
        }
    }
}

/// Screen-space vertical extent of a projected slice.
///
/// `top` may be negative or below the screen; the surface clips.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedSpan {
    pub top: f64,
    pub height: f64,
}
