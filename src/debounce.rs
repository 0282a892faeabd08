/// Holds back a value until no new request has arrived for `window_ms`.
///
/// Time is supplied by the caller (event and frame timestamps share the
/// page's monotonic clock), so nothing here schedules timers.
#[derive(Clone, Debug)]
pub struct Debounced<T> {
    window_ms: f64,
    pending: Option<(T, f64)>,
}

impl<T: Copy> Debounced<T> {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms: window_ms.max(0.0),
            pending: None,
        }
    }

    /// Supersede whatever is pending and restart the quiet period.
    pub fn request(&mut self, value: T, now_ms: f64) {
        self.pending = Some((value, now_ms));
    }

    pub fn pending(&self) -> Option<T> {
        self.pending.map(|(value, _)| value)
    }

    /// Take the pending value once the quiet period has elapsed.
    pub fn poll(&mut self, now_ms: f64) -> Option<T> {
        match self.pending {
            Some((value, requested_at)) if now_ms - requested_at >= self.window_ms => {
                self.pending = None;
                Some(value)
            }
            _ => None,
        }
    }
}
