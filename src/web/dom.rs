//! DOM collaborators: score text, leaderboard list, name prompt overlay

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, KeyboardEvent, MouseEvent};

use crate::consts::MAX_NAME_LEN;
use crate::game_loop::{LeaderboardDisplay, NameChoice, NamePrompt, ScoreDisplay};
use crate::highscores::ScoreEntry;
use crate::platform::OneShot;

const SCORE_LABEL: &str = "Score";
const LEADERBOARD_TITLE: &str = "Leaderboard";
const NO_SCORES: &str = "No scores yet";
const GAME_OVER_TITLE: &str = "Game over!";
const NAME_PLACEHOLDER: &str = "Your name";
const SAVE_LABEL: &str = "Save";

/// Writes `Score: N` into an element
pub struct DomScoreDisplay {
    document: Document,
    element_id: &'static str,
}

impl DomScoreDisplay {
    pub fn new(document: Document, element_id: &'static str) -> Self {
        Self {
            document,
            element_id,
        }
    }
}

impl ScoreDisplay for DomScoreDisplay {
    fn show_score(&mut self, score: u32) {
        if let Some(el) = self.document.get_element_by_id(self.element_id) {
            el.set_text_content(Some(&format!("{}: {}", SCORE_LABEL, score)));
        }
    }
}

/// Renders the leaderboard as an ordered list
pub struct DomLeaderboard {
    document: Document,
    element_id: &'static str,
}

impl DomLeaderboard {
    pub fn new(document: Document, element_id: &'static str) -> Self {
        Self {
            document,
            element_id,
        }
    }

    fn render(&self, container: &Element, entries: &[ScoreEntry]) -> Result<(), JsValue> {
        container.set_inner_html("");

        let title = self.document.create_element("h3")?;
        title.set_text_content(Some(LEADERBOARD_TITLE));
        container.append_child(&title)?;

        if entries.is_empty() {
            let empty = self.document.create_element("p")?;
            empty.set_text_content(Some(NO_SCORES));
            container.append_child(&empty)?;
            return Ok(());
        }

        let list = self.document.create_element("ol")?;
        for entry in entries {
            // Names are player input: text nodes only
            let item = self.document.create_element("li")?;
            item.append_child(&self.document.create_text_node(&format!("{}: ", entry.name)))?;
            let score = self.document.create_element("strong")?;
            score.set_text_content(Some(&entry.score.to_string()));
            item.append_child(&score)?;
            list.append_child(&item)?;
        }
        container.append_child(&list)?;
        Ok(())
    }
}

impl LeaderboardDisplay for DomLeaderboard {
    fn show_leaderboard(&self, entries: &[ScoreEntry]) {
        let Some(container) = self.document.get_element_by_id(self.element_id) else {
            return;
        };
        if let Err(e) = self.render(&container, entries) {
            log::warn!("Could not render leaderboard: {:?}", e);
        }
    }
}

/// Modal overlay asking for a name. The close button skips saving.
pub struct DomNamePrompt {
    document: Document,
}

impl DomNamePrompt {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn build_overlay(&self, score: u32) -> Result<(HtmlElement, HtmlInputElement, Element, Element), JsValue> {
        let overlay: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        overlay.set_class_name("name-prompt-overlay");
        let style = overlay.style();
        style.set_property("position", "fixed")?;
        style.set_property("inset", "0")?;
        style.set_property("background", "rgba(0,0,0,0.7)")?;
        style.set_property("display", "flex")?;
        style.set_property("align-items", "center")?;
        style.set_property("justify-content", "center")?;
        style.set_property("z-index", "10000")?;

        let dialog = self.document.create_element("div")?;
        dialog.set_class_name("name-prompt");

        let skip = self.document.create_element("button")?;
        skip.set_class_name("name-prompt-skip");
        skip.set_text_content(Some("✕"));
        dialog.append_child(&skip)?;

        let title = self.document.create_element("h3")?;
        title.set_text_content(Some(GAME_OVER_TITLE));
        dialog.append_child(&title)?;

        let text = self.document.create_element("p")?;
        text.set_text_content(Some(&format!("{}: {}", SCORE_LABEL, score)));
        dialog.append_child(&text)?;

        let input: HtmlInputElement = self.document.create_element("input")?.dyn_into()?;
        input.set_type("text");
        input.set_placeholder(NAME_PLACEHOLDER);
        input.set_max_length(MAX_NAME_LEN as i32);
        dialog.append_child(&input)?;

        let submit = self.document.create_element("button")?;
        submit.set_class_name("name-prompt-save");
        submit.set_text_content(Some(SAVE_LABEL));
        dialog.append_child(&submit)?;

        overlay.append_child(&dialog)?;
        Ok((overlay, input, submit, skip))
    }

    async fn ask(&self, score: u32) -> Result<Option<String>, JsValue> {
        let body = self
            .document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;
        let (overlay, input, submit, skip) = self.build_overlay(score)?;

        let resolver: OneShot<js_sys::Function> = OneShot::empty();
        let promise = js_sys::Promise::new(&mut |resolve, _reject| resolver.fill(resolve));
        let finish = move |value: JsValue| {
            if let Some(resolve) = resolver.take() {
                let _ = resolve.call1(&JsValue::NULL, &value);
            }
        };

        let on_save = {
            let finish = finish.clone();
            let input = input.clone();
            Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                finish(JsValue::from_str(&input.value()));
            })
        };
        let on_enter = {
            let finish = finish.clone();
            let input = input.clone();
            Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() == "Enter" {
                    finish(JsValue::from_str(&input.value()));
                }
            })
        };
        let on_skip = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            finish(JsValue::NULL);
        });

        submit.add_event_listener_with_callback("click", on_save.as_ref().unchecked_ref())?;
        input.add_event_listener_with_callback("keypress", on_enter.as_ref().unchecked_ref())?;
        skip.add_event_listener_with_callback("click", on_skip.as_ref().unchecked_ref())?;

        body.append_child(&overlay)?;
        let _ = input.focus();
        let answer = JsFuture::from(promise).await;

        // The prompt is done: detach, then let the closures drop here
        let _ = submit.remove_event_listener_with_callback("click", on_save.as_ref().unchecked_ref());
        let _ = input.remove_event_listener_with_callback("keypress", on_enter.as_ref().unchecked_ref());
        let _ = skip.remove_event_listener_with_callback("click", on_skip.as_ref().unchecked_ref());
        overlay.remove();

        Ok(answer?.as_string())
    }
}

impl NamePrompt for DomNamePrompt {
    async fn ask_name(&self, score: u32) -> NameChoice {
        match self.ask(score).await {
            Ok(answer) => NameChoice::from_input(answer.as_deref()),
            Err(e) => {
                log::error!("Name prompt failed, saving as guest: {:?}", e);
                NameChoice::Guest
            }
        }
    }
}
