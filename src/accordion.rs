//! Accordion panels driven by delegated clicks. One listener per container;
//! the toggled button is resolved at dispatch time so icons or text nested
//! inside the button still toggle the right panel.
//!
//! State lives entirely in the markup: the panel's `aria-hidden` attribute
//! is the source of truth, read with inverted sense (`"true"` means the
//! panel is treated as open and the toggle collapses it). Toggling writes
//! the negated pair, `aria-hidden` on the panel and `aria-expanded` on the
//! button, so the two attributes always disagree afterwards.

use crate::page::{EventState, Handler, Page};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccordionConfig {
    /// Containers receiving the delegated click listener.
    pub container: String,
}

impl Default for AccordionConfig {
    fn default() -> Self {
        Self {
            container: ".drink-expand-button".into(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct Accordion {
    pub(crate) config: AccordionConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PanelFlip {
    pub(crate) hidden: bool,
    pub(crate) expanded: bool,
}

/// Computes the next attribute pair from the panel's current `aria-hidden`.
/// Any value other than `"true"`, including an absent attribute, counts as
/// closed.
pub(crate) fn flip_panel(hidden_attr: Option<&str>) -> PanelFlip {
    let was_open = hidden_attr == Some("true");
    PanelFlip {
        hidden: !was_open,
        expanded: was_open,
    }
}

impl Page {
    /// Binds a delegated toggle listener to every container the config
    /// matches. Zero containers is not an error; pages without accordions
    /// simply get no listeners.
    pub fn install_accordions(&mut self, config: AccordionConfig) -> Result<()> {
        let idx = self.accordions.len();
        for container in self.dom.query_selector_all(&config.container)? {
            self.listeners
                .add(container, "click", Handler::AccordionToggle(idx));
        }
        self.accordions.push(Accordion { config });
        Ok(())
    }

    /// Clicks on non-button content, buttons without `aria-controls`, and
    /// `aria-controls` values naming no element are markup mistakes and
    /// toggle nothing.
    pub(crate) fn on_accordion_click(&mut self, idx: usize, event: &mut EventState) -> Result<()> {
        let Some(button) = self.dom.closest(event.target, "button")? else {
            return Ok(());
        };
        let Some(panel_id) = self.dom.attr(button, "aria-controls") else {
            return Ok(());
        };
        let Some(panel) = self.dom.by_id(&panel_id) else {
            return Ok(());
        };

        let flip = flip_panel(self.dom.attr(panel, "aria-hidden").as_deref());
        self.dom
            .set_attr(panel, "aria-hidden", if flip.hidden { "true" } else { "false" });
        self.dom.set_attr(
            button,
            "aria-expanded",
            if flip.expanded { "true" } else { "false" },
        );

        if self.is_tracing() {
            let container = self.accordions[idx].config.container.clone();
            let label = self.node_label(button);
            self.trace_line(format!(
                "[accordion] {container} toggle button={label} panel=#{panel_id} hidden={}",
                flip.hidden
            ));
        }
        Ok(())
    }
}
