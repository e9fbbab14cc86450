use super::super::{Model, Msg};
use super::utils::{debounce, first_accepted_file};
use wasm_bindgen::JsCast;
use waste_shared::InputWidget;
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Extensions offered by the file picker; the backend enforces the same list.
const ACCEPTED_TYPES: &str = ".jpg,.jpeg,.png,.webp";

pub fn render_input_section(model: &Model, ctx: &Context<Model>) -> Html {
    let content = match model.state.widget() {
        InputWidget::FileUploader => render_file_uploader(model, ctx),
        InputWidget::CameraCapture => render_camera_capture(model, ctx),
        // The captured still is drawn with the results, next to its clear button.
        InputWidget::CapturedPreview => html! {},
    };

    html! {
        <div class="upload-section">
            { content }
        </div>
    }
}

fn render_file_uploader(model: &Model, ctx: &Context<Model>) -> Html {
    let handle_change = ctx.link().callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let file = input.files().as_ref().and_then(first_accepted_file);

        input.set_value("");

        match file {
            Some(file) => Msg::FileChosen(file),
            None => Msg::SetError(Some(
                "Please choose a JPG, JPEG, PNG or WEBP image.".into(),
            )),
        }
    });

    let selected = model
        .upload
        .as_ref()
        .map(|upload| upload.file.name())
        .unwrap_or_else(|| "No file chosen".to_string());

    html! {
        <>
            <input
                type="file"
                id="file-input"
                accept={ACCEPTED_TYPES}
                style="display: none;"
                onchange={handle_change}
            />
            <button
                id="upload-button"
                class="analyze-btn"
                disabled={model.loading}
                onclick={debounce(300, || click_element("file-input"))}
            >
                <i class="fa-solid fa-upload"></i> {" Choose an image..."}
            </button>
            <p class="file-types">{ format!("{} | Supported formats: JPG, JPEG, PNG, WEBP", selected) }</p>
        </>
    }
}

fn render_camera_capture(model: &Model, ctx: &Context<Model>) -> Html {
    let handle_change = ctx.link().callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let file = input
            .files()
            .and_then(|files| files.item(0));

        input.set_value("");

        match file {
            Some(file) => Msg::CaptureChosen(file),
            None => Msg::SetError(Some("No picture was taken.".into())),
        }
    });

    html! {
        <>
            <input
                type="file"
                id="camera-input"
                accept="image/*"
                capture="environment"
                style="display: none;"
                onchange={handle_change}
            />
            <button
                id="camera-button"
                class="analyze-btn"
                disabled={model.loading}
                onclick={debounce(300, || click_element("camera-input"))}
            >
                <i class="fa-solid fa-camera"></i> {" Take a picture"}
            </button>
        </>
    }
}

fn click_element(id: &str) {
    if let Some(element) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(id))
    {
        if let Ok(html_element) = element.dyn_into::<web_sys::HtmlElement>() {
            html_element.click();
        }
    }
}
