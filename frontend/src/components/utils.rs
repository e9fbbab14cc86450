use super::super::Model;
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::FileList;
use yew::prelude::*;

const ACCEPTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

// Debounce function to limit button events
pub fn debounce<F>(duration: i32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));
    let timeout_clone = Rc::clone(&timeout);

    Callback::from(move |_| {
        let mut timeout_ref = timeout_clone.borrow_mut();

        if let Some(old_timeout) = timeout_ref.take() {
            old_timeout.cancel();
        }

        let inner_callback = callback.clone();
        let new_timeout = Timeout::new(duration as u32, move || {
            inner_callback();
        });

        *timeout_ref = Some(new_timeout);
    })
}

pub fn has_accepted_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| ACCEPTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// First file of the selection with an accepted extension.
pub fn first_accepted_file(file_list: &FileList) -> Option<web_sys::File> {
    (0..file_list.length())
        .filter_map(|i| file_list.item(i))
        .find(|file| has_accepted_extension(&file.name()))
}

pub fn render_error_message(model: &Model) -> Html {
    if let Some(error_msg) = &model.error {
        html! {
            <div class="error-message">
                <i class="fa-solid fa-circle-exclamation"></i>
                <p>{ error_msg }</p>
            </div>
        }
    } else {
        html! {}
    }
}

#[cfg(test)]
mod tests {
    use super::has_accepted_extension;

    #[test]
    fn accepts_listed_extensions_in_any_case() {
        assert!(has_accepted_extension("banana.JPG"));
        assert!(has_accepted_extension("bottle.webp"));
        assert!(has_accepted_extension("a.b.png"));
        assert!(!has_accepted_extension("scan.gif"));
        assert!(!has_accepted_extension("jpg"));
    }
}
