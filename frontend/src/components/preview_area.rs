use super::super::{Model, Msg};
use super::utils::debounce;
use waste_shared::ImageSource;
use yew::prelude::*;

/// The candidate image with its caption. Captured stills get a clear button.
pub fn render_candidate_preview(
    model: &Model,
    ctx: &Context<Model>,
    source: ImageSource,
    caption: &str,
) -> Html {
    let url = match source {
        ImageSource::Upload => model.upload.as_ref().map(|upload| upload.preview_url.to_string()),
        ImageSource::Capture => model.capture_url.as_ref().map(|url| url.to_string()),
    };

    let image = match url {
        Some(url) => html! {
            <figure id="preview-container">
                <img id="actual-image-preview" src={url} alt={caption.to_string()} />
                <figcaption>{ caption }</figcaption>
            </figure>
        },
        None => html! {
            <div class="unavailable-preview">
                <p>{"Preview unavailable"}</p>
            </div>
        },
    };

    let clear_button = if source == ImageSource::Capture {
        let link = ctx.link().clone();
        html! {
            <div class="button-container">
                <button
                    id="clear-image-btn"
                    class="analyze-btn"
                    style="background-color: var(--clear-color);"
                    disabled={model.loading}
                    onclick={debounce(300, move || link.send_message(Msg::ClearCapture))}
                >
                    <i class="fa-solid fa-trash"></i>{" Clear image"}
                </button>
            </div>
        }
    } else {
        html! {}
    };

    html! {
        <>
            { image }
            { clear_button }
        </>
    }
}
