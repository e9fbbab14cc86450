use super::super::Msg;
use super::super::{Model, UploadedFile};
use crate::api::post_cycle;
use gloo_file::{Blob, File as GlooFile, ObjectUrl};
use wasm_bindgen_futures::spawn_local;
use waste_shared::{CycleResponse, InputMode, PendingCapture, SessionEvent};
use yew::prelude::*;

pub fn handle_select_mode(model: &mut Model, ctx: &Context<Model>, mode: InputMode) -> bool {
    if mode == model.state.input_mode {
        return false;
    }

    // The uploader is gone once the mode changes, and its file with it.
    model.upload = None;
    start_cycle(model, ctx, Some(SessionEvent::SelectMode(mode)))
}

pub fn handle_file_chosen(model: &mut Model, ctx: &Context<Model>, file: web_sys::File) -> bool {
    let preview_url = ObjectUrl::from(GlooFile::from(file.clone()));
    model.upload = Some(UploadedFile { file, preview_url });
    start_cycle(model, ctx, None)
}

pub fn handle_capture_chosen(model: &mut Model, ctx: &Context<Model>, file: web_sys::File) -> bool {
    model.loading = true;
    model.error = None;

    let file = GlooFile::from(file);
    let link = ctx.link().clone();
    spawn_local(async move {
        match gloo_file::futures::read_as_bytes(&file).await {
            Ok(bytes) => link.send_message(Msg::CaptureRead(bytes)),
            Err(e) => link.send_message(Msg::SetError(Some(format!(
                "Failed to read captured image: {}",
                e
            )))),
        }
    });

    true
}

pub fn handle_capture_read(model: &mut Model, ctx: &Context<Model>, bytes: Vec<u8>) -> bool {
    let capture = PendingCapture::from(bytes);
    start_cycle(model, ctx, Some(SessionEvent::CaptureTaken(capture)))
}

pub fn handle_clear_capture(model: &mut Model, ctx: &Context<Model>) -> bool {
    start_cycle(model, ctx, Some(SessionEvent::ClearCapture))
}

pub fn handle_cycle_done(model: &mut Model, response: CycleResponse) -> bool {
    log::info!("Cycle {} rendered", response.cycle_id);

    if response.state.pending_capture != model.state.pending_capture {
        model.capture_url = response
            .state
            .pending_capture
            .as_ref()
            .map(|capture| ObjectUrl::from(Blob::new(capture.as_bytes())));
    }

    model.state = response.state;
    model.plan = Some(response.plan);
    model.loading = false;
    model.error = None;
    true
}

fn start_cycle(model: &mut Model, ctx: &Context<Model>, event: Option<SessionEvent>) -> bool {
    model.loading = true;
    model.error = None;
    send_cycle(model, ctx, event);
    true
}

/// Sends the current state, the event and the current upload to the backend.
pub fn send_cycle(model: &Model, ctx: &Context<Model>, event: Option<SessionEvent>) {
    let state = model.state.clone();
    let upload = model.upload.as_ref().map(|upload| upload.file.clone());
    let link = ctx.link().clone();

    spawn_local(async move {
        match post_cycle(&state, event.as_ref(), upload.as_ref()).await {
            Ok(response) => link.send_message(Msg::CycleDone(response)),
            Err(e) => link.send_message(Msg::SetError(Some(e))),
        }
    });
}
