use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-recycle"></i> {" Waste Classification App"}</h1>
            <p class="subtitle">
                {"Upload an image of waste or use your camera to classify it as Organic or Recyclable."}
            </p>
        </header>
    }
}
