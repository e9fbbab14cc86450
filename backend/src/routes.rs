use crate::config::AppConfig;
use crate::controller::SessionController;
use crate::error::ApiError;
use actix_files::Files;
use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures::TryStreamExt;
use log::{debug, info};
use serde::de::DeserializeOwned;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use waste_shared::{CycleResponse, HealthResponse, PendingCapture, SessionEvent, SessionState};

/// File types the uploader accepts.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

// Room for the JSON around a base64 capture in the state and event parts.
const JSON_ENVELOPE_BYTES: usize = 4096;

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: PathBuf) {
    configure_api(cfg);
    cfg.service(Files::new("/", frontend_dir).index_file("index.html"));
}

pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/cycle").route(web::post().to(handle_cycle)))
        .service(web::resource("/api/health").route(web::get().to(health)));
}

/// Parts of a `/api/cycle` form, all optional.
#[derive(Default)]
struct CycleForm {
    state: Option<SessionState>,
    event: Option<SessionEvent>,
    image: Option<Vec<u8>>,
}

async fn handle_cycle(
    controller: web::Data<SessionController>,
    config: web::Data<AppConfig>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let form = read_cycle_form(payload, config.max_upload_bytes).await?;
    let cycle_id = Uuid::new_v4();
    let state = form.state.unwrap_or_default();

    info!(
        "Cycle {}: mode={}, event={}, upload={}",
        cycle_id,
        state.input_mode,
        form.event.as_ref().map_or("none", describe_event),
        form.image.as_ref().map_or(0, Vec::len)
    );

    let event = form.event;
    let image = form.image;
    let cycle =
        web::block(move || controller.run_cycle(state, event, image.as_deref())).await?;

    Ok(HttpResponse::Ok().json(CycleResponse {
        cycle_id,
        state: cycle.state,
        plan: cycle.plan,
    }))
}

async fn health(controller: web::Data<SessionController>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        model: controller.model_name().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn read_cycle_form(mut payload: Multipart, limit: usize) -> Result<CycleForm, ApiError> {
    let mut form = CycleForm::default();

    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let part_limit = match name.as_str() {
            "state" | "event" => encoded_part_limit(limit),
            _ => limit,
        };

        let mut data = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            if data.len() + chunk.len() > part_limit {
                return Err(ApiError::PayloadTooLarge { part: name, limit });
            }
            data.extend_from_slice(&chunk);
        }

        match name.as_str() {
            "state" => {
                let state: SessionState = parse_json_part("state", &data)?;
                check_capture_size("state", state.pending_capture.as_ref(), limit)?;
                form.state = Some(state);
            }
            "event" => {
                let event: SessionEvent = parse_json_part("event", &data)?;
                if let SessionEvent::CaptureTaken(capture) = &event {
                    check_capture_size("event", Some(capture), limit)?;
                }
                form.event = Some(event);
            }
            // An untouched file input still posts an empty part.
            "image" if data.is_empty() => debug!("Ignoring empty image part"),
            "image" => {
                check_extension(filename.as_deref())?;
                form.image = Some(data);
            }
            other => debug!("Ignoring unknown form part '{}'", other),
        }
    }

    Ok(form)
}

/// Raw size allowed for a JSON part whose capture decodes to at most `limit` bytes.
fn encoded_part_limit(limit: usize) -> usize {
    limit
        .div_ceil(3)
        .saturating_mul(4)
        .saturating_add(JSON_ENVELOPE_BYTES)
}

fn check_capture_size(
    part: &str,
    capture: Option<&PendingCapture>,
    limit: usize,
) -> Result<(), ApiError> {
    match capture {
        Some(capture) if capture.as_bytes().len() > limit => Err(ApiError::PayloadTooLarge {
            part: part.to_string(),
            limit,
        }),
        _ => Ok(()),
    }
}

fn parse_json_part<T: DeserializeOwned>(part: &str, data: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(data).map_err(|e| ApiError::InvalidJson {
        part: part.to_string(),
        reason: e.to_string(),
    })
}

fn check_extension(filename: Option<&str>) -> Result<(), ApiError> {
    let name = filename.unwrap_or_default();
    let extension = Path::new(name)
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);

    match extension {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ if name.is_empty() => Err(ApiError::UnsupportedFileType("(unnamed file)".to_string())),
        _ => Err(ApiError::UnsupportedFileType(name.to_string())),
    }
}

// Captures are large; log the event kind only.
fn describe_event(event: &SessionEvent) -> &'static str {
    match event {
        SessionEvent::SelectMode(_) => "select-mode",
        SessionEvent::CaptureTaken(_) => "capture-taken",
        SessionEvent::ClearCapture => "clear-capture",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::tests::{StubClassifier, prediction};
    use crate::preprocess::tests::solid_png;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use std::sync::Arc;
    use waste_shared::{Block, ErrorResponse, InputMode, InputWidget};

    const BOUNDARY: &str = "----waste-test-boundary";

    struct Part<'a> {
        name: &'a str,
        filename: Option<&'a str>,
        data: Vec<u8>,
    }

    fn json_part<'a, T: serde::Serialize>(name: &'a str, value: &T) -> Part<'a> {
        Part {
            name,
            filename: None,
            data: serde_json::to_vec(value).unwrap(),
        }
    }

    fn file_part<'a>(filename: &'a str, data: Vec<u8>) -> Part<'a> {
        Part {
            name: "image",
            filename: Some(filename),
            data,
        }
    }

    fn cycle_request(parts: &[Part<'_>]) -> test::TestRequest {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            let disposition = match part.filename {
                Some(filename) => format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                    part.name, filename
                ),
                None => format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    part.name
                ),
            };
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(&part.data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        test::TestRequest::post()
            .uri("/api/cycle")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(body)
    }

    fn app_config(max_upload_bytes: usize) -> AppConfig {
        AppConfig {
            max_upload_bytes,
            ..AppConfig::default()
        }
    }

    macro_rules! test_app {
        ($probability:expr, $config:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(SessionController::new(Arc::new(
                        StubClassifier::new($probability),
                    ))))
                    .app_data(web::Data::new($config))
                    .configure(configure_api),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn empty_cycle_returns_upload_prompt() {
        let app = test_app!(0.9, AppConfig::default());
        let req = cycle_request(&[json_part("state", &SessionState::default())]).to_request();
        let resp: CycleResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.state, SessionState::default());
        assert_eq!(resp.plan.widget, InputWidget::FileUploader);
        assert_eq!(prediction(&resp.plan), None);
    }

    #[actix_web::test]
    async fn uploaded_image_is_classified() {
        let app = test_app!(0.9, AppConfig::default());
        let req = cycle_request(&[
            json_part("state", &SessionState::default()),
            file_part("bottle.PNG", solid_png(40, 30, [200, 200, 200])),
        ])
        .to_request();
        let resp: CycleResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(prediction(&resp.plan), Some(("Recyclable", "90.00%")));
    }

    #[actix_web::test]
    async fn mode_switch_and_capture_round_trip_through_state() {
        let app = test_app!(0.2, AppConfig::default());

        let req = cycle_request(&[
            json_part("state", &SessionState::default()),
            json_part("event", &SessionEvent::SelectMode(InputMode::UseCamera)),
        ])
        .to_request();
        let switched: CycleResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(switched.plan.widget, InputWidget::CameraCapture);

        let capture = PendingCapture::from(solid_png(20, 20, [120, 80, 40]));
        let req = cycle_request(&[
            json_part("state", &switched.state),
            json_part("event", &SessionEvent::CaptureTaken(capture.clone())),
        ])
        .to_request();
        let captured: CycleResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(captured.state.pending_capture, Some(capture));
        assert_eq!(captured.plan.widget, InputWidget::CapturedPreview);
        assert_eq!(prediction(&captured.plan), Some(("Organic", "80.00%")));
        assert_ne!(captured.cycle_id, switched.cycle_id);
    }

    #[actix_web::test]
    async fn unsupported_extension_is_rejected() {
        let app = test_app!(0.9, AppConfig::default());
        let req = cycle_request(&[file_part("scan.gif", solid_png(4, 4, [0, 0, 0]))]).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(body.error.contains("scan.gif"));
    }

    #[actix_web::test]
    async fn malformed_state_is_rejected() {
        let app = test_app!(0.9, AppConfig::default());
        let req = cycle_request(&[Part {
            name: "state",
            filename: None,
            data: b"{not json".to_vec(),
        }])
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn oversized_upload_is_rejected() {
        let app = test_app!(0.9, app_config(16));
        let req = cycle_request(&[file_part("big.png", vec![0u8; 64])]).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[actix_web::test]
    async fn corrupt_upload_is_a_rendered_error_not_a_failure() {
        let app = test_app!(0.9, AppConfig::default());
        let req = cycle_request(&[file_part("photo.jpg", b"not really a jpeg".to_vec())]).to_request();
        let resp: CycleResponse = test::call_and_read_body_json(&app, req).await;

        assert!(resp
            .plan
            .blocks
            .iter()
            .any(|block| matches!(block, Block::Error { .. })));
    }

    #[actix_web::test]
    async fn health_reports_model() {
        let app = test_app!(0.9, AppConfig::default());
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp: HealthResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.status, "ok");
        assert_eq!(resp.model, "stub");
    }

    #[actix_web::test]
    async fn empty_file_part_is_treated_as_no_upload() {
        let app = test_app!(0.9, AppConfig::default());
        let req = cycle_request(&[
            json_part("state", &SessionState::default()),
            file_part("", Vec::new()),
        ])
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: CycleResponse = test::read_body_json(resp).await;
        assert_eq!(body.plan.widget, InputWidget::FileUploader);
        assert_eq!(
            body.plan.blocks,
            vec![Block::Info {
                text: "Upload an image to get a prediction.".into()
            }]
        );
    }

    #[actix_web::test]
    async fn capture_limit_applies_to_decoded_bytes() {
        let camera = SessionState::default().apply(SessionEvent::SelectMode(InputMode::UseCamera));

        // 12 bytes encode to 16 base64 chars plus JSON, still under the cap.
        let app = test_app!(0.9, app_config(12));
        let req = cycle_request(&[
            json_part("state", &camera),
            json_part("event", &SessionEvent::CaptureTaken(PendingCapture::from(vec![7u8; 12]))),
        ])
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = cycle_request(&[
            json_part("state", &camera),
            json_part("event", &SessionEvent::CaptureTaken(PendingCapture::from(vec![7u8; 13]))),
        ])
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[actix_web::test]
    async fn oversized_capture_in_state_is_rejected() {
        let app = test_app!(0.9, app_config(8));
        let state = SessionState::default()
            .apply(SessionEvent::SelectMode(InputMode::UseCamera))
            .apply(SessionEvent::CaptureTaken(PendingCapture::from(vec![1u8; 9])));
        let req = cycle_request(&[json_part("state", &state)]).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(body.error.contains("'state'"));
    }

    #[actix_web::test]
    async fn extension_check_is_case_insensitive() {
        assert!(check_extension(Some("a.JPEG")).is_ok());
        assert!(check_extension(Some("a.webp")).is_ok());
        assert!(check_extension(Some("a.bmp")).is_err());
        assert!(check_extension(Some("noext")).is_err());
        assert!(check_extension(None).is_err());
    }
}
