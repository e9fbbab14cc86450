use gloo_console::error;
use gloo_net::http::Request;
use wasm_bindgen::JsValue;
use waste_shared::{CycleResponse, ErrorResponse, SessionEvent, SessionState};
use web_sys::FormData;

fn js_error(err: JsValue) -> String {
    format!("{:?}", err)
}

/// Posts one evaluation cycle and returns the next state and render plan.
pub async fn post_cycle(
    state: &SessionState,
    event: Option<&SessionEvent>,
    upload: Option<&web_sys::File>,
) -> Result<CycleResponse, String> {
    let form_data = FormData::new().map_err(js_error)?;

    let state_json = serde_json::to_string(state).map_err(|e| e.to_string())?;
    form_data.append_with_str("state", &state_json).map_err(js_error)?;

    if let Some(event) = event {
        let event_json = serde_json::to_string(event).map_err(|e| e.to_string())?;
        form_data.append_with_str("event", &event_json).map_err(js_error)?;
    }

    if let Some(file) = upload {
        form_data
            .append_with_blob_and_filename("image", file, &file.name())
            .map_err(js_error)?;
    }

    let request = Request::post("/api/cycle")
        .body(form_data)
        .map_err(|e| format!("Failed to build request: {}", e))?;

    let response = request.send().await.map_err(|e| {
        error!(format!("Fetch error: {:?}", e));
        format!("Network error: {}", e)
    })?;

    if response.ok() {
        response
            .json::<CycleResponse>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    } else {
        let status = response.status();
        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => String::new(),
        };
        Err(format!("Server error: {} - {}", status, message))
    }
}
