//! DOM overlay: live score, results panel, start prompt and difficulty picker
//!
//! Elements are looked up once by id; any that are missing from the page
//! are skipped silently so the game still runs on a bare canvas.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::sim::Difficulty;

const DIMMED: &str = "0.2";
const SELECTED: &str = "1";

pub struct Hud {
    score: Option<HtmlElement>,
    results: Option<HtmlElement>,
    final_score: Option<HtmlElement>,
    play: Option<HtmlElement>,
    difficulty: Option<HtmlElement>,
    buttons: Vec<(Difficulty, HtmlElement)>,
}

fn element(document: &Document, id: &str) -> Option<HtmlElement> {
    let el = document.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok();
    if el.is_none() {
        log::debug!("HUD element #{} not found", id);
    }
    el
}

fn set_display(el: &Option<HtmlElement>, value: &str) {
    if let Some(el) = el {
        let _ = el.style().set_property("display", value);
    }
}

impl Hud {
    pub fn new(document: &Document) -> Self {
        let buttons = Difficulty::ALL
            .iter()
            .filter_map(|&d| element(document, d.as_str()).map(|el| (d, el)))
            .collect();

        Self {
            score: element(document, "score"),
            results: element(document, "results"),
            final_score: element(document, "finalScore"),
            play: element(document, "play"),
            difficulty: element(document, "difficulty"),
            buttons,
        }
    }

    /// Difficulty buttons, for wiring click listeners
    pub fn difficulty_buttons(&self) -> &[(Difficulty, HtmlElement)] {
        &self.buttons
    }

    pub fn set_score(&self, score: u32) {
        if let Some(el) = &self.score {
            el.set_inner_text(&score.to_string());
        }
    }

    pub fn show_results(&self, final_score: u32) {
        if let Some(el) = &self.final_score {
            el.set_inner_text(&final_score.to_string());
        }
        set_display(&self.results, "flex");
    }

    pub fn hide_results(&self) {
        set_display(&self.results, "none");
    }

    /// Start prompt and difficulty picker are shown and hidden together
    pub fn show_menu(&self, visible: bool) {
        let display = if visible { "flex" } else { "none" };
        set_display(&self.play, display);
        set_display(&self.difficulty, display);
    }

    pub fn highlight_difficulty(&self, selected: Difficulty) {
        for (d, el) in &self.buttons {
            let opacity = if *d == selected { SELECTED } else { DIMMED };
            let _ = el.style().set_property("opacity", opacity);
        }
    }
}
