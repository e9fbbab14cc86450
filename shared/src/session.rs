use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use derive_more::From;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::{Display, EnumString};

/// Which acquisition path is active.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
pub enum InputMode {
    #[default]
    #[strum(to_string = "Upload Image")]
    UploadImage,
    #[strum(to_string = "Use Camera")]
    UseCamera,
}

impl InputMode {
    /// Radio options, in display order.
    pub const ALL: [InputMode; 2] = [InputMode::UploadImage, InputMode::UseCamera];
}

/// Encoded bytes of a camera still waiting to be shown and classified.
///
/// Travels as base64 inside the JSON session state.
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub struct PendingCapture(Vec<u8>);

impl PendingCapture {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for PendingCapture {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for PendingCapture {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map(PendingCapture)
            .map_err(serde::de::Error::custom)
    }
}

/// UI state carried from one cycle to the next.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub input_mode: InputMode,
    #[serde(default)]
    pub pending_capture: Option<PendingCapture>,
    /// True while the camera widget should be offered.
    #[serde(default)]
    pub camera_active: bool,
}

/// User interactions that change session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum SessionEvent {
    SelectMode(InputMode),
    CaptureTaken(PendingCapture),
    ClearCapture,
}

/// The acquisition widget the UI shows for a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputWidget {
    FileUploader,
    CameraCapture,
    CapturedPreview,
}

/// Shown instead of a prediction when no candidate image exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prompt {
    UploadImage,
    TakePicture,
}

impl Prompt {
    pub fn message(self) -> &'static str {
        match self {
            Prompt::UploadImage => "Upload an image to get a prediction.",
            Prompt::TakePicture => "Take a picture to get a prediction.",
        }
    }
}

/// The single image eligible for classification this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource<'a> {
    Upload(&'a [u8]),
    Capture(&'a [u8]),
}

impl<'a> CandidateSource<'a> {
    pub fn bytes(self) -> &'a [u8] {
        match self {
            CandidateSource::Upload(bytes) | CandidateSource::Capture(bytes) => bytes,
        }
    }
}

impl SessionState {
    pub fn apply(self, event: SessionEvent) -> SessionState {
        match event {
            SessionEvent::SelectMode(mode) if mode != self.input_mode => SessionState {
                input_mode: mode,
                pending_capture: None,
                camera_active: mode == InputMode::UseCamera,
            },
            SessionEvent::SelectMode(_) => self,
            SessionEvent::CaptureTaken(capture) => {
                if self.input_mode != InputMode::UseCamera
                    || self.pending_capture.is_some()
                    || capture.is_empty()
                {
                    return self;
                }
                SessionState {
                    pending_capture: Some(capture),
                    camera_active: false,
                    ..self
                }
            }
            SessionEvent::ClearCapture => match self.input_mode {
                InputMode::UseCamera => SessionState {
                    pending_capture: None,
                    camera_active: true,
                    ..self
                },
                InputMode::UploadImage => self,
            },
        }
    }

    pub fn widget(&self) -> InputWidget {
        match (self.input_mode, &self.pending_capture) {
            (InputMode::UploadImage, _) => InputWidget::FileUploader,
            (InputMode::UseCamera, None) => InputWidget::CameraCapture,
            (InputMode::UseCamera, Some(_)) => InputWidget::CapturedPreview,
        }
    }

    /// What to ask the user for while no candidate image exists.
    pub fn idle_prompt(&self) -> Prompt {
        match self.input_mode {
            InputMode::UploadImage => Prompt::UploadImage,
            InputMode::UseCamera => Prompt::TakePicture,
        }
    }

    /// Picks the candidate image for this cycle, or the prompt to show
    /// when there is none. Only the source matching the mode is consulted.
    pub fn resolve_candidate<'a>(
        &'a self,
        upload: Option<&'a [u8]>,
    ) -> Result<CandidateSource<'a>, Prompt> {
        match self.input_mode {
            InputMode::UploadImage => upload
                .filter(|bytes| !bytes.is_empty())
                .map(CandidateSource::Upload)
                .ok_or_else(|| self.idle_prompt()),
            InputMode::UseCamera => self
                .pending_capture
                .as_ref()
                .map(|capture| CandidateSource::Capture(capture.as_bytes()))
                .ok_or_else(|| self.idle_prompt()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn capture(bytes: &[u8]) -> PendingCapture {
        PendingCapture::from(bytes.to_vec())
    }

    fn camera_with_capture() -> SessionState {
        SessionState::default()
            .apply(SessionEvent::SelectMode(InputMode::UseCamera))
            .apply(SessionEvent::CaptureTaken(capture(b"jpeg")))
    }

    #[test]
    fn initial_state_is_upload_without_capture() {
        let state = SessionState::default();
        assert_eq!(state.input_mode, InputMode::UploadImage);
        assert!(state.pending_capture.is_none());
        assert_eq!(state.widget(), InputWidget::FileUploader);
    }

    #[test]
    fn mode_labels_match_radio_options() {
        assert_eq!(InputMode::UploadImage.to_string(), "Upload Image");
        assert_eq!(InputMode::from_str("Use Camera").unwrap(), InputMode::UseCamera);
    }

    #[test]
    fn switching_mode_clears_capture() {
        let state = camera_with_capture().apply(SessionEvent::SelectMode(InputMode::UploadImage));
        assert_eq!(state.input_mode, InputMode::UploadImage);
        assert!(state.pending_capture.is_none());
        assert!(!state.camera_active);
    }

    #[test]
    fn repeating_a_switch_is_idempotent() {
        let once = camera_with_capture().apply(SessionEvent::SelectMode(InputMode::UploadImage));
        let twice = once.clone().apply(SessionEvent::SelectMode(InputMode::UploadImage));
        assert_eq!(once, twice);
        assert!(twice.pending_capture.is_none());
    }

    #[test]
    fn capture_is_stored_in_camera_mode() {
        let state = camera_with_capture();
        assert_eq!(state.pending_capture, Some(capture(b"jpeg")));
        assert!(!state.camera_active);
        assert_eq!(state.widget(), InputWidget::CapturedPreview);
    }

    #[test]
    fn capture_is_ignored_outside_camera_mode() {
        let state = SessionState::default().apply(SessionEvent::CaptureTaken(capture(b"jpeg")));
        assert_eq!(state, SessionState::default());
    }

    #[test]
    fn empty_capture_is_ignored() {
        let camera = SessionState::default().apply(SessionEvent::SelectMode(InputMode::UseCamera));
        let state = camera.clone().apply(SessionEvent::CaptureTaken(capture(b"")));
        assert_eq!(state, camera);
    }

    #[test]
    fn second_capture_does_not_replace_pending_one() {
        let state = camera_with_capture().apply(SessionEvent::CaptureTaken(capture(b"other")));
        assert_eq!(state.pending_capture, Some(capture(b"jpeg")));
    }

    #[test]
    fn clearing_returns_to_camera_not_upload() {
        let state = camera_with_capture().apply(SessionEvent::ClearCapture);
        assert_eq!(state.input_mode, InputMode::UseCamera);
        assert!(state.pending_capture.is_none());
        assert!(state.camera_active);
        assert_eq!(state.widget(), InputWidget::CameraCapture);
    }

    #[test]
    fn clearing_in_upload_mode_is_a_no_op() {
        let state = SessionState::default().apply(SessionEvent::ClearCapture);
        assert_eq!(state, SessionState::default());
    }

    #[test]
    fn upload_mode_without_file_prompts() {
        let state = SessionState::default();
        assert_eq!(state.resolve_candidate(None), Err(Prompt::UploadImage));
        assert_eq!(state.resolve_candidate(Some(&b""[..])), Err(Prompt::UploadImage));
    }

    #[test]
    fn upload_mode_uses_uploaded_file() {
        let state = SessionState::default();
        assert_eq!(
            state.resolve_candidate(Some(&b"png"[..])),
            Ok(CandidateSource::Upload(b"png"))
        );
    }

    #[test]
    fn camera_mode_ignores_upload() {
        let state = SessionState::default().apply(SessionEvent::SelectMode(InputMode::UseCamera));
        assert_eq!(state.resolve_candidate(Some(&b"png"[..])), Err(Prompt::TakePicture));

        let state = camera_with_capture();
        assert_eq!(
            state.resolve_candidate(Some(&b"png"[..])),
            Ok(CandidateSource::Capture(b"jpeg"))
        );
    }

    #[test]
    fn idle_prompt_follows_mode() {
        assert_eq!(SessionState::default().idle_prompt(), Prompt::UploadImage);
        assert_eq!(camera_with_capture().idle_prompt(), Prompt::TakePicture);
    }

    #[test]
    fn state_serializes_capture_as_base64() {
        let state = camera_with_capture();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["input_mode"], "UseCamera");
        assert_eq!(json["pending_capture"], "anBlZw==");

        let back: SessionState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn events_use_tagged_json() {
        let event: SessionEvent =
            serde_json::from_str(r#"{"type":"SelectMode","value":"UseCamera"}"#).unwrap();
        assert_eq!(event, SessionEvent::SelectMode(InputMode::UseCamera));

        let event: SessionEvent = serde_json::from_str(r#"{"type":"ClearCapture"}"#).unwrap();
        assert_eq!(event, SessionEvent::ClearCapture);
    }

    #[test]
    fn malformed_capture_is_rejected() {
        let result: Result<PendingCapture, _> = serde_json::from_str(r#""not base64!""#);
        assert!(result.is_err());
    }
}
