//! Camera session lifecycle.
//!
//! The scene must be fully usable with or without a camera. `Session` tracks
//! whether a stream is being acquired, running, or unavailable (fallback), and
//! tells the host when a stream has to be released. Gesture, placement, and
//! projection logic never consult it.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

/// Why the camera stream could not be acquired.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaError {
    #[error("camera permission denied")]
    PermissionDenied,
    #[error("no camera device available")]
    NoDevice,
    #[error("camera access is not supported here")]
    Unsupported,
    #[error("camera error: {0}")]
    Other(String),
}

impl MediaError {
    /// Classify a browser `DOMException` by its `name`.
    #[must_use]
    pub fn from_dom_name(name: &str, message: &str) -> Self {
        match name {
            "NotAllowedError" | "SecurityError" | "PermissionDeniedError" => Self::PermissionDenied,
            "NotFoundError" | "DevicesNotFoundError" | "OverconstrainedError" => Self::NoDevice,
            "NotSupportedError" => Self::Unsupported,
            _ => Self::Other(format!("{name}: {message}")),
        }
    }
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Not started, or stopped.
    #[default]
    Idle,
    /// Waiting on the camera permission prompt / device.
    Starting,
    /// Running. `camera` is false when acquisition was bypassed.
    Active { camera: bool },
    /// Running without a camera after acquisition failed.
    Fallback { notice: String },
}

/// What the host should do after [`Session::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartDecision {
    /// Request the camera stream and report back.
    RequestCamera,
    /// Camera skipped; the session is already active.
    Bypassed,
    /// Already starting or running; nothing to do.
    AlreadyRunning,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SessionState,
    holds_stream: bool,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Begin (or retry, from fallback) the session.
    pub fn start(&mut self, bypass_camera: bool) -> StartDecision {
        match self.state {
            SessionState::Starting | SessionState::Active { .. } => StartDecision::AlreadyRunning,
            SessionState::Idle | SessionState::Fallback { .. } if bypass_camera => {
                log::info!("camera bypassed; session active");
                self.state = SessionState::Active { camera: false };
                StartDecision::Bypassed
            }
            SessionState::Idle | SessionState::Fallback { .. } => {
                self.state = SessionState::Starting;
                StartDecision::RequestCamera
            }
        }
    }

    /// The stream arrived. Returns false when the session is no longer
    /// starting (stopped meanwhile); the host must then release the stream.
    pub fn on_media_ready(&mut self) -> bool {
        if self.state != SessionState::Starting {
            log::warn!("camera stream arrived after the session stopped");
            return false;
        }
        self.state = SessionState::Active { camera: true };
        self.holds_stream = true;
        true
    }

    /// Acquisition failed: keep running without a camera and return the user notice.
    pub fn on_media_failed(&mut self, err: &MediaError) -> Option<String> {
        if self.state != SessionState::Starting {
            return None;
        }
        log::warn!("camera unavailable: {err}");
        let notice = format!("Camera unavailable ({err}). Running without camera.");
        self.state = SessionState::Fallback { notice: notice.clone() };
        Some(notice)
    }

    /// Stop the session. Returns true if a stream is held and must be released.
    pub fn stop(&mut self) -> bool {
        self.state = SessionState::Idle;
        std::mem::take(&mut self.holds_stream)
    }

    /// Whether the scene is usable (running with or without camera).
    #[must_use]
    pub fn is_operational(&self) -> bool {
        matches!(self.state, SessionState::Active { .. } | SessionState::Fallback { .. })
    }

    #[must_use]
    pub fn has_camera(&self) -> bool {
        self.state == SessionState::Active { camera: true }
    }

    /// The fallback notice, if any.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        match &self.state {
            SessionState::Fallback { notice } => Some(notice),
            _ => None,
        }
    }

    /// Short state name for the host UI.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self.state {
            SessionState::Idle => "idle",
            SessionState::Starting => "starting",
            SessionState::Active { .. } => "active",
            SessionState::Fallback { .. } => "fallback",
        }
    }
}
