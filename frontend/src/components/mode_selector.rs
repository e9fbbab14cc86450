use super::super::{Model, Msg};
use waste_shared::InputMode;
use yew::prelude::*;

pub fn render_mode_selector(model: &Model, ctx: &Context<Model>) -> Html {
    html! {
        <div class="input-mode-selector">
            <span class="selector-label">{"Choose input method:"}</span>
            { for InputMode::ALL.iter().map(|&mode| html! {
                <label>
                    <input type="radio" name="input_mode"
                        value={mode.to_string()}
                        checked={model.state.input_mode == mode}
                        disabled={model.loading}
                        onchange={ctx.link().callback(move |_| Msg::SelectMode(mode))} />
                    <span class="radio-label-text">{ mode.to_string() }</span>
                </label>
            })}
        </div>
    }
}
