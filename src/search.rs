//! Search overlay controller: a two-state machine (closed/open) over a
//! navigation region, plus a live case-insensitive filter of content rows
//! against the query input.
//!
//! The machine itself is a pure function from (phase, input) to (phase,
//! effects); applying the effects to the page is a separate step, so the
//! transition table can be tested without a document.

use unicode_normalization::UnicodeNormalization;

use crate::dom::NodeId;
use crate::page::{EventState, Handler, Page};
use crate::Result;

/// Marker class carried by the navigation region while the overlay is open.
pub(crate) const OPEN_MARKER: &str = "has-search-open";
const PRESSED_ATTR: &str = "aria-pressed";
// Content wrapper offsets compensating for the expanded overlay height.
const OPEN_CONTENT_OFFSET: &str = "118px";
const CLOSED_CONTENT_OFFSET: &str = "48px";

/// Selector contract binding the controller to the host markup.
///
/// The defaults match the full page variant; [`SearchOverlayConfig::minimal`]
/// drops the submit guard, the reset control, and the content-wrapper offset
/// for pages that do not carry them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOverlayConfig {
    /// Navigation region owning the overlay.
    pub navigation: String,
    /// Trigger buttons toggling the overlay; may match several elements.
    pub trigger: String,
    /// The query input.
    pub input: String,
    /// Backdrop element; clicking it closes the overlay.
    pub backdrop: String,
    /// Filterable content rows.
    pub row: String,
    /// Search form, guarded against default submission.
    pub form: Option<String>,
    /// Reset control restoring every row to visible.
    pub reset: Option<String>,
    /// Content wrapper whose top margin tracks the overlay state.
    pub content: Option<String>,
}

impl Default for SearchOverlayConfig {
    fn default() -> Self {
        Self {
            navigation: ".p-navigation".into(),
            trigger: ".js-search-button".into(),
            input: ".p-search-box__input".into(),
            backdrop: ".p-navigation__search-overlay".into(),
            row: ".drink".into(),
            form: Some(".p-search-box".into()),
            reset: Some(".p-search-box__reset".into()),
            content: Some(".grid.p-strip".into()),
        }
    }
}

impl SearchOverlayConfig {
    pub fn minimal() -> Self {
        Self {
            form: None,
            reset: None,
            content: None,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPhase {
    Closed,
    Open,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum OverlayInput {
    TriggerClick,
    Key { key: String, query: String },
    BackdropClick,
    ResetClick,
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum OverlayEffect {
    /// Remove the open marker, clear `aria-pressed` from every trigger,
    /// restore the content offset. Safe to apply in any state.
    CloseChrome,
    /// Mark the region open, press every trigger, focus the query input,
    /// shift the content offset.
    OpenChrome,
    FilterRows(String),
    ClearFilter,
    BlurActive,
}

/// The transition table. Opening always closes first so inconsistent markup
/// is normalized before the open chrome is applied.
pub(crate) fn step(phase: OverlayPhase, input: &OverlayInput) -> (OverlayPhase, Vec<OverlayEffect>) {
    match input {
        OverlayInput::TriggerClick => match phase {
            OverlayPhase::Open => (OverlayPhase::Closed, vec![OverlayEffect::CloseChrome]),
            OverlayPhase::Closed => (
                OverlayPhase::Open,
                vec![OverlayEffect::CloseChrome, OverlayEffect::OpenChrome],
            ),
        },
        OverlayInput::Key { key, query } => {
            if key == "Escape" {
                (OverlayPhase::Closed, vec![OverlayEffect::CloseChrome])
            } else {
                (phase, vec![OverlayEffect::FilterRows(query.clone())])
            }
        }
        OverlayInput::BackdropClick => (OverlayPhase::Closed, vec![OverlayEffect::CloseChrome]),
        OverlayInput::ResetClick => (phase, vec![OverlayEffect::ClearFilter]),
        OverlayInput::Submit => (phase, vec![OverlayEffect::BlurActive]),
    }
}

/// Case folding for the row filter: NFC first so composed and decomposed
/// spellings of the same text compare equal.
pub(crate) fn normalize_for_search(text: &str) -> String {
    text.nfc().collect::<String>().to_lowercase()
}

#[derive(Debug)]
pub(crate) struct SearchOverlay {
    pub(crate) config: SearchOverlayConfig,
    pub(crate) region: NodeId,
    pub(crate) input: NodeId,
    pub(crate) content: Option<NodeId>,
    pub(crate) phase: OverlayPhase,
}

impl Page {
    /// Binds a search overlay controller to the current document.
    ///
    /// Required elements (navigation region, query input, backdrop, and any
    /// optional selector the config names) are resolved eagerly; a missing
    /// one fails installation with [`crate::Error::MissingElement`] instead
    /// of faulting later inside an event handler.
    pub fn install_search_overlay(&mut self, config: SearchOverlayConfig) -> Result<()> {
        const COMPONENT: &str = "search overlay";
        let idx = self.search.len();

        let region = self.require_element(COMPONENT, &config.navigation)?;
        let input = self.require_element(COMPONENT, &config.input)?;
        let backdrop = self.require_element(COMPONENT, &config.backdrop)?;
        let form = match &config.form {
            Some(selector) => Some(self.require_element(COMPONENT, selector)?),
            None => None,
        };
        let reset = match &config.reset {
            Some(selector) => Some(self.require_element(COMPONENT, selector)?),
            None => None,
        };
        let content = match &config.content {
            Some(selector) => Some(self.require_element(COMPONENT, selector)?),
            None => None,
        };

        for trigger in self.dom.query_selector_all(&config.trigger)? {
            self.listeners
                .add(trigger, "click", Handler::SearchTrigger(idx));
        }
        self.listeners.add(input, "keyup", Handler::SearchKeyup(idx));
        if let Some(reset) = reset {
            self.listeners.add(reset, "click", Handler::SearchReset(idx));
        }
        if let Some(form) = form {
            self.listeners.add(form, "submit", Handler::SearchSubmit(idx));
        }
        self.listeners
            .add(backdrop, "click", Handler::SearchBackdrop(idx));

        self.search.push(SearchOverlay {
            config,
            region,
            input,
            content,
            phase: OverlayPhase::Closed,
        });
        Ok(())
    }

    pub fn overlay_phase(&self, index: usize) -> Option<OverlayPhase> {
        self.search.get(index).map(|overlay| overlay.phase)
    }

    pub(crate) fn on_search_trigger(&mut self, idx: usize, event: &mut EventState) -> Result<()> {
        event.default_prevented = true;
        let navigation = self.search[idx].config.navigation.clone();
        // Clicks that somehow arrive from outside any navigation region are
        // markup mistakes, not runtime conditions to recover from.
        let Some(region) = self.dom.closest(event.target, &navigation)? else {
            return Ok(());
        };
        self.run_overlay(idx, OverlayInput::TriggerClick, Some(region))
    }

    pub(crate) fn on_search_keyup(&mut self, idx: usize, event: &mut EventState) -> Result<()> {
        let key = event.key.clone().unwrap_or_default();
        let query = self.dom.value(self.search[idx].input).unwrap_or_default();
        self.run_overlay(idx, OverlayInput::Key { key, query }, None)
    }

    pub(crate) fn on_search_reset(&mut self, idx: usize, _event: &mut EventState) -> Result<()> {
        self.run_overlay(idx, OverlayInput::ResetClick, None)
    }

    pub(crate) fn on_search_submit(&mut self, idx: usize, event: &mut EventState) -> Result<()> {
        event.default_prevented = true;
        self.run_overlay(idx, OverlayInput::Submit, None)
    }

    pub(crate) fn on_search_backdrop(&mut self, idx: usize, _event: &mut EventState) -> Result<()> {
        self.run_overlay(idx, OverlayInput::BackdropClick, None)
    }

    fn run_overlay(
        &mut self,
        idx: usize,
        input: OverlayInput,
        open_region: Option<NodeId>,
    ) -> Result<()> {
        let phase = self.search[idx].phase;
        let (next, effects) = step(phase, &input);
        if self.is_tracing() && next != phase {
            self.trace_line(format!("[overlay] {phase:?} -> {next:?}"));
        }
        self.search[idx].phase = next;
        for effect in effects {
            self.apply_overlay_effect(idx, &effect, open_region)?;
        }
        Ok(())
    }

    fn apply_overlay_effect(
        &mut self,
        idx: usize,
        effect: &OverlayEffect,
        open_region: Option<NodeId>,
    ) -> Result<()> {
        match effect {
            OverlayEffect::CloseChrome => self.close_chrome(idx),
            OverlayEffect::OpenChrome => {
                let region = open_region.unwrap_or(self.search[idx].region);
                self.open_chrome(idx, region)
            }
            OverlayEffect::FilterRows(query) => self.filter_rows(idx, query),
            OverlayEffect::ClearFilter => self.clear_filter(idx),
            OverlayEffect::BlurActive => {
                self.blur_active();
                Ok(())
            }
        }
    }

    fn close_chrome(&mut self, idx: usize) -> Result<()> {
        let overlay = &self.search[idx];
        let region = overlay.region;
        let content = overlay.content;
        let trigger_selector = overlay.config.trigger.clone();

        self.dom.class_remove(region, OPEN_MARKER);
        for trigger in self.dom.query_selector_all(&trigger_selector)? {
            self.dom.remove_attr(trigger, PRESSED_ATTR);
        }
        if let Some(content) = content {
            self.dom
                .set_style_value(content, "margin-top", CLOSED_CONTENT_OFFSET);
        }
        Ok(())
    }

    fn open_chrome(&mut self, idx: usize, region: NodeId) -> Result<()> {
        let overlay = &self.search[idx];
        let input = overlay.input;
        let content = overlay.content;
        let trigger_selector = overlay.config.trigger.clone();

        self.dom.class_add(region, OPEN_MARKER);
        self.focus_node(input);
        for trigger in self.dom.query_selector_all(&trigger_selector)? {
            self.dom.set_attr(trigger, PRESSED_ATTR, "true");
        }
        if let Some(content) = content {
            self.dom
                .set_style_value(content, "margin-top", OPEN_CONTENT_OFFSET);
        }
        Ok(())
    }

    /// Recomputes every row's visibility from scratch against the query.
    fn filter_rows(&mut self, idx: usize, query: &str) -> Result<()> {
        let row_selector = self.search[idx].config.row.clone();
        let needle = normalize_for_search(query);
        for row in self.dom.query_selector_all(&row_selector)? {
            let haystack = normalize_for_search(&self.dom.text_content(row));
            let display = if haystack.contains(&needle) { "" } else { "none" };
            self.dom.set_style_value(row, "display", display);
        }
        Ok(())
    }

    fn clear_filter(&mut self, idx: usize) -> Result<()> {
        let row_selector = self.search[idx].config.row.clone();
        for row in self.dom.query_selector_all(&row_selector)? {
            self.dom.set_style_value(row, "display", "");
        }
        Ok(())
    }
}
