use super::super::Model;
use super::preview_area::render_candidate_preview;
use std::borrow::Cow;
use waste_shared::{Block, RenderPlan, SessionState};
use yew::prelude::*;

/// The backend's plan, or the mode prompt if the first cycle failed.
fn plan_to_show<'a>(
    state: &SessionState,
    plan: Option<&'a RenderPlan>,
    error: Option<&str>,
) -> Option<Cow<'a, RenderPlan>> {
    match (plan, error) {
        (Some(plan), _) => Some(Cow::Borrowed(plan)),
        (None, Some(_)) => Some(Cow::Owned(RenderPlan::prompt(state, state.idle_prompt()))),
        (None, None) => None,
    }
}

pub fn render_plan(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(plan) = plan_to_show(&model.state, model.plan.as_ref(), model.error.as_deref()) else {
        return html! {
            <div class="loading-preview">
                <i class="fa-solid fa-spinner fa-spin fa-2x"></i>
            </div>
        };
    };

    html! {
        <div class="results-container">
            { for plan.blocks.iter().map(|block| render_block(model, ctx, block)) }
            {
                if model.loading {
                    html! { <p class="loading"><i class="fa-solid fa-spinner fa-spin"></i>{" Classifying..."}</p> }
                } else {
                    html! {}
                }
            }
        </div>
    }
}

fn render_block(model: &Model, ctx: &Context<Model>, block: &Block) -> Html {
    match block {
        Block::Image { source, caption } => render_candidate_preview(model, ctx, *source, caption),
        Block::Metric { label, value } => html! {
            <div class="metric">
                <div class="metric-label">{ label }</div>
                <div class="metric-value">{ value }</div>
            </div>
        },
        Block::Info { text } => html! {
            <div class="info-message">
                <i class="fa-solid fa-circle-info"></i>
                <p>{ text }</p>
            </div>
        },
        Block::Error { text } => html! {
            <div class="error-message">
                <i class="fa-solid fa-circle-exclamation"></i>
                <p>{ text }</p>
            </div>
        },
        Block::Divider => html! { <hr /> },
    }
}
