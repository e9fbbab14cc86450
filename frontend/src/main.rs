mod api;
mod components;

use components::handlers;
use components::header::render_header;
use components::mode_selector::render_mode_selector;
use components::results::render_plan;
use components::upload_section::render_input_section;
use components::utils::render_error_message;
use gloo_file::ObjectUrl;
use waste_shared::{CycleResponse, InputMode, RenderPlan, SessionState};
use yew::prelude::*;

// Models
pub struct UploadedFile {
    file: web_sys::File,
    preview_url: ObjectUrl,
}

// Yew msg components
pub enum Msg {
    // Input widgets
    SelectMode(InputMode),
    FileChosen(web_sys::File),
    CaptureChosen(web_sys::File),
    CaptureRead(Vec<u8>),
    ClearCapture,

    // Backend round trip
    CycleDone(CycleResponse),
    SetError(Option<String>),
}

// Main component
pub struct Model {
    state: SessionState,
    upload: Option<UploadedFile>,
    capture_url: Option<ObjectUrl>,
    plan: Option<RenderPlan>,
    loading: bool,
    error: Option<String>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let model = Self {
            state: SessionState::default(),
            upload: None,
            capture_url: None,
            plan: None,
            loading: true,
            error: None,
        };

        // First render comes from the backend like every other cycle.
        handlers::send_cycle(&model, ctx, None);
        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SelectMode(mode) => handlers::handle_select_mode(self, ctx, mode),
            Msg::FileChosen(file) => handlers::handle_file_chosen(self, ctx, file),
            Msg::CaptureChosen(file) => handlers::handle_capture_chosen(self, ctx, file),
            Msg::CaptureRead(bytes) => handlers::handle_capture_read(self, ctx, bytes),
            Msg::ClearCapture => handlers::handle_clear_capture(self, ctx),

            Msg::CycleDone(response) => handlers::handle_cycle_done(self, response),
            Msg::SetError(error) => {
                self.error = error;
                self.loading = false;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { render_header() }

                <main class="main-content">
                    { render_mode_selector(self, ctx) }
                    { render_input_section(self, ctx) }
                    { render_error_message(self) }
                    { render_plan(self, ctx) }
                </main>

                <footer class="app-footer">
                    <p>{"Made with ❤️"}</p>
                </footer>
            </div>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
