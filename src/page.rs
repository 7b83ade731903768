//! The page harness: owns the DOM, the listener table, focus, and the
//! installed controllers, and drives synthetic user events through them.
//!
//! Dispatch is synchronous and single-threaded: an event runs its target's
//! listeners, then bubbles through each ancestor, exactly once, to
//! completion. Container-level delegation (one listener on a stable
//! ancestor, concrete target resolved at dispatch time) falls out of the
//! bubble phase.

use std::collections::HashMap;

use crate::accordion::Accordion;
use crate::dom::{Dom, NodeId};
use crate::html::parse_html;
use crate::search::SearchOverlay;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Handler {
    SearchTrigger(usize),
    SearchKeyup(usize),
    SearchReset(usize),
    SearchSubmit(usize),
    SearchBackdrop(usize),
    AccordionToggle(usize),
}

#[derive(Debug, Default)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, HashMap<String, Vec<Handler>>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, node_id: NodeId, event: &str, handler: Handler) {
        self.map
            .entry(node_id)
            .or_default()
            .entry(event.to_string())
            .or_default()
            .push(handler);
    }

    fn get(&self, node_id: NodeId, event: &str) -> Vec<Handler> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EventState {
    pub(crate) event_type: String,
    pub(crate) target: NodeId,
    pub(crate) key: Option<String>,
    pub(crate) default_prevented: bool,
}

impl EventState {
    fn new(event_type: &str, target: NodeId, key: Option<&str>) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            key: key.map(str::to_string),
            default_prevented: false,
        }
    }
}

#[derive(Debug)]
pub struct Page {
    pub(crate) dom: Dom,
    pub(crate) listeners: ListenerStore,
    pub(crate) active_element: Option<NodeId>,
    pub(crate) search: Vec<SearchOverlay>,
    pub(crate) accordions: Vec<Accordion>,
    trace: bool,
    trace_to_stderr: bool,
    trace_logs: Vec<String>,
    trace_log_limit: usize,
}

impl Page {
    pub fn from_html(html: &str) -> Result<Self> {
        let dom = parse_html(html)?;
        Ok(Self {
            dom,
            listeners: ListenerStore::default(),
            active_element: None,
            search: Vec::new(),
            accordions: Vec::new(),
            trace: false,
            trace_to_stderr: true,
            trace_logs: Vec::new(),
            trace_log_limit: 10_000,
        })
    }

    /// Dispatches a `click` on the selected element. When no listener
    /// prevents the default and the element is a submit control inside a
    /// form, the form receives a `submit` event.
    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let outcome = self.dispatch_event(target, "click", None)?;
        if outcome.default_prevented {
            return Ok(());
        }

        if self.is_submit_control(target) {
            if let Some(form) = self.dom.find_ancestor_by_tag(target, "form") {
                self.dispatch_event(form, "submit", None)?;
            }
        }
        Ok(())
    }

    /// Dispatches a `keyup` with the given key, leaving the control value
    /// untouched.
    pub fn press_key(&mut self, selector: &str, key: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(target, "keyup", Some(key))?;
        Ok(())
    }

    /// Replaces the control value and dispatches a single `keyup`. The row
    /// filter recomputes visibility from scratch per event, so one event for
    /// the whole string is equivalent to one per keystroke.
    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let tag = self
            .dom
            .tag_name(target)
            .ok_or_else(|| Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: "non-element".into(),
            })?
            .to_ascii_lowercase();
        if tag != "input" && tag != "textarea" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: tag,
            });
        }

        self.dom.set_value(target, text);
        let last_key: String = text.chars().next_back().map(String::from).unwrap_or_default();
        self.dispatch_event(target, "keyup", Some(&last_key))?;
        Ok(())
    }

    /// Dispatches `submit` on the selected form, or on the form owning the
    /// selected element. No-ops when no owning form exists.
    pub fn submit(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let form = if self
            .dom
            .tag_name(target)
            .map(|t| t.eq_ignore_ascii_case("form"))
            .unwrap_or(false)
        {
            Some(target)
        } else {
            self.dom.find_ancestor_by_tag(target, "form")
        };

        if let Some(form_id) = form {
            self.dispatch_event(form_id, "submit", None)?;
        }
        Ok(())
    }

    pub fn text(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.text_content(target))
    }

    pub fn value(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.value(target).ok_or_else(|| Error::TypeMismatch {
            selector: selector.to_string(),
            expected: "form control".into(),
            actual: "non-element".into(),
        })
    }

    pub fn attr(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let target = self.select_one(selector)?;
        Ok(self.dom.attr(target, name))
    }

    pub fn has_class(&self, selector: &str, class_name: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.dom.class_contains(target, class_name))
    }

    pub fn is_visible(&self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.dom.is_visible(target))
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        let _ = self.select_one(selector)?;
        Ok(())
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target);
        if actual != expected {
            return Err(self.assertion_failed(selector, expected, &actual, target));
        }
        Ok(())
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let actual = self.value(selector)?;
        if actual != expected {
            let target = self.select_one(selector)?;
            return Err(self.assertion_failed(selector, expected, &actual, target));
        }
        Ok(())
    }

    /// Asserts an attribute's value; `None` asserts absence.
    pub fn assert_attr(&self, selector: &str, name: &str, expected: Option<&str>) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.attr(target, name);
        if actual.as_deref() != expected {
            return Err(self.assertion_failed(
                selector,
                &format!("{name}={expected:?}"),
                &format!("{name}={actual:?}"),
                target,
            ));
        }
        Ok(())
    }

    pub fn assert_has_class(&self, selector: &str, class_name: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if !self.dom.class_contains(target, class_name) {
            return Err(self.assertion_failed(
                selector,
                &format!("class {class_name} present"),
                "absent",
                target,
            ));
        }
        Ok(())
    }

    pub fn assert_lacks_class(&self, selector: &str, class_name: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.class_contains(target, class_name) {
            return Err(self.assertion_failed(
                selector,
                &format!("class {class_name} absent"),
                "present",
                target,
            ));
        }
        Ok(())
    }

    pub fn assert_visible(&self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if !self.dom.is_visible(target) {
            return Err(self.assertion_failed(selector, "visible", "display: none", target));
        }
        Ok(())
    }

    pub fn assert_hidden(&self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.is_visible(target) {
            return Err(self.assertion_failed(selector, "display: none", "visible", target));
        }
        Ok(())
    }

    pub fn assert_focused(&self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.active_element != Some(target) {
            let actual = self
                .active_element
                .map(|node| self.node_label(node))
                .unwrap_or_else(|| "nothing focused".to_string());
            return Err(self.assertion_failed(selector, "focused", &actual, target));
        }
        Ok(())
    }

    pub fn assert_nothing_focused(&self) -> Result<()> {
        if let Some(node) = self.active_element {
            return Err(Error::AssertionFailed {
                selector: String::new(),
                expected: "nothing focused".into(),
                actual: self.node_label(node),
                dom_snippet: self.node_snippet(node),
            });
        }
        Ok(())
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.dump_node(target))
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.trace_to_stderr = enabled;
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.trace_logs)
    }

    pub(crate) fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    pub(crate) fn require_element(&self, component: &str, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::MissingElement {
                component: component.to_string(),
                selector: selector.to_string(),
            })
    }

    pub(crate) fn dispatch_event(
        &mut self,
        target: NodeId,
        event_type: &str,
        key: Option<&str>,
    ) -> Result<EventState> {
        let mut event = EventState::new(event_type, target, key);
        if self.trace {
            let label = self.node_label(target);
            self.trace_line(format!("[event] {event_type} target={label}"));
        }

        let mut path = Vec::new();
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.dom.parent(node);
        }

        // Target phase, then bubble through ancestors.
        for node in path {
            for handler in self.listeners.get(node, event_type) {
                self.run_handler(handler, &mut event)?;
            }
        }

        if self.trace {
            let label = self.node_label(target);
            self.trace_line(format!(
                "[event] done {} target={label} default_prevented={}",
                event.event_type, event.default_prevented
            ));
        }
        Ok(event)
    }

    fn run_handler(&mut self, handler: Handler, event: &mut EventState) -> Result<()> {
        match handler {
            Handler::SearchTrigger(idx) => self.on_search_trigger(idx, event),
            Handler::SearchKeyup(idx) => self.on_search_keyup(idx, event),
            Handler::SearchReset(idx) => self.on_search_reset(idx, event),
            Handler::SearchSubmit(idx) => self.on_search_submit(idx, event),
            Handler::SearchBackdrop(idx) => self.on_search_backdrop(idx, event),
            Handler::AccordionToggle(idx) => self.on_accordion_click(idx, event),
        }
    }

    fn is_submit_control(&self, target: NodeId) -> bool {
        let Some(tag) = self.dom.tag_name(target) else {
            return false;
        };
        let tag = tag.to_ascii_lowercase();
        let kind = self
            .dom
            .attr(target, "type")
            .map(|value| value.to_ascii_lowercase());
        match tag.as_str() {
            "button" => matches!(kind.as_deref(), None | Some("submit")),
            "input" => matches!(kind.as_deref(), Some("submit") | Some("image")),
            _ => false,
        }
    }

    pub(crate) fn focus_node(&mut self, node: NodeId) {
        self.active_element = Some(node);
    }

    pub(crate) fn blur_active(&mut self) {
        self.active_element = None;
    }

    pub(crate) fn node_label(&self, node: NodeId) -> String {
        if let Some(id) = self.dom.attr(node, "id") {
            if !id.is_empty() {
                return format!("#{id}");
            }
        }
        self.dom
            .tag_name(node)
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| format!("node-{}", node.0))
    }

    fn node_snippet(&self, node: NodeId) -> String {
        truncate_chars(&self.dom.dump_node(node), 200)
    }

    fn assertion_failed(
        &self,
        selector: &str,
        expected: &str,
        actual: &str,
        target: NodeId,
    ) -> Error {
        Error::AssertionFailed {
            selector: selector.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            dom_snippet: self.node_snippet(target),
        }
    }

    pub(crate) fn trace_line(&mut self, line: String) {
        if self.trace {
            if self.trace_to_stderr {
                eprintln!("{line}");
            }
            if self.trace_logs.len() >= self.trace_log_limit {
                self.trace_logs.remove(0);
            }
            self.trace_logs.push(line);
        }
    }

    pub(crate) fn is_tracing(&self) -> bool {
        self.trace
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    let mut it = value.chars();
    let mut out = String::new();
    for _ in 0..max_chars {
        let Some(ch) = it.next() else {
            return out;
        };
        out.push(ch);
    }
    if it.next().is_some() {
        out.push_str("...");
    }
    out
}
