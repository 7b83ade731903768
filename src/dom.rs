//! Arena DOM: nodes are stored in a flat `Vec` and addressed by `NodeId`.
//! State lives directly on elements as attributes, classes, and inline style
//! declarations; there is no retained-layout or rendering concept beyond the
//! inline `display` declaration that the row filter toggles.

use std::collections::{HashMap, HashSet};

use crate::selector::{
    SelectorAttrCondition, SelectorCombinator, SelectorPart, SelectorStep, parse_selector_groups,
};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
    pub(crate) value: String,
}

#[derive(Debug, Clone)]
pub(crate) struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    pub(crate) id_index: HashMap<String, NodeId>,
}

impl Dom {
    pub(crate) fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            id_index: HashMap::new(),
        }
    }

    fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: String,
        attrs: HashMap<String, String>,
    ) -> NodeId {
        let value = attrs.get("value").cloned().unwrap_or_default();
        let element = Element {
            tag_name,
            attrs,
            value,
        };
        let id = self.create_node(Some(parent), NodeType::Element(element));
        if let Some(id_attr) = self
            .element(id)
            .and_then(|element| element.attrs.get("id").cloned())
        {
            if !id_attr.is_empty() {
                self.id_index.entry(id_attr).or_insert(id);
            }
        }
        id
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: String) -> NodeId {
        self.create_node(Some(parent), NodeType::Text(text))
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.nodes[node_id.0].node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[node_id.0].node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub(crate) fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes[node_id.0].parent
    }

    pub(crate) fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    pub(crate) fn find_ancestor_by_tag(&self, node_id: NodeId, tag: &str) -> Option<NodeId> {
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            if self
                .tag_name(current)
                .map(|name| name.eq_ignore_ascii_case(tag))
                .unwrap_or(false)
            {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    pub(crate) fn text_content(&self, node_id: NodeId) -> String {
        match &self.nodes[node_id.0].node_type {
            NodeType::Document | NodeType::Element(_) => {
                let mut out = String::new();
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.text_content(*child));
                }
                out
            }
            NodeType::Text(text) => text.clone(),
        }
    }

    pub(crate) fn value(&self, node_id: NodeId) -> Option<String> {
        self.element(node_id).map(|e| e.value.clone())
    }

    pub(crate) fn set_value(&mut self, node_id: NodeId, value: &str) {
        if let Some(element) = self.element_mut(node_id) {
            element.value = value.to_string();
        }
    }

    // Textarea controls seed their value from their text body rather than a
    // value attribute; run once after parsing.
    pub(crate) fn initialize_form_control_values(&mut self) {
        let nodes: Vec<NodeId> = (0..self.nodes.len()).map(NodeId).collect();
        for node in nodes {
            if self
                .tag_name(node)
                .map(|tag| tag.eq_ignore_ascii_case("textarea"))
                .unwrap_or(false)
            {
                let text = self.text_content(node);
                if let Some(element) = self.element_mut(node) {
                    element.value = text;
                }
            }
        }
    }

    pub(crate) fn attr(&self, node_id: NodeId, name: &str) -> Option<String> {
        self.element(node_id)
            .and_then(|e| e.attrs.get(&name.to_ascii_lowercase()).cloned())
    }

    pub(crate) fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        if let Some(element) = self.element_mut(node_id) {
            element.attrs.insert(name, value.to_string());
        }
    }

    pub(crate) fn remove_attr(&mut self, node_id: NodeId, name: &str) {
        let name = name.to_ascii_lowercase();
        if let Some(element) = self.element_mut(node_id) {
            element.attrs.remove(&name);
        }
    }

    pub(crate) fn class_contains(&self, node_id: NodeId, class_name: &str) -> bool {
        self.element(node_id)
            .map(|element| has_class(element, class_name))
            .unwrap_or(false)
    }

    pub(crate) fn class_add(&mut self, node_id: NodeId, class_name: &str) {
        let Some(element) = self.element_mut(node_id) else {
            return;
        };
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        if !classes.iter().any(|name| name == class_name) {
            classes.push(class_name.to_string());
        }
        set_class_attr(element, &classes);
    }

    pub(crate) fn class_remove(&mut self, node_id: NodeId, class_name: &str) {
        let Some(element) = self.element_mut(node_id) else {
            return;
        };
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        classes.retain(|name| name != class_name);
        set_class_attr(element, &classes);
    }

    pub(crate) fn style_value(&self, node_id: NodeId, property: &str) -> Option<String> {
        let style_attr = self.attr(node_id, "style")?;
        parse_style_declarations(&style_attr)
            .into_iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value)
    }

    /// Sets an inline style declaration. An empty value removes the
    /// declaration, matching assignment of `""` to a CSSOM property.
    pub(crate) fn set_style_value(&mut self, node_id: NodeId, property: &str, value: &str) {
        let mut decls = self
            .attr(node_id, "style")
            .map(|style_attr| parse_style_declarations(&style_attr))
            .unwrap_or_default();

        let property = property.to_ascii_lowercase();
        if value.is_empty() {
            decls.retain(|(name, _)| name != &property);
        } else if let Some(pos) = decls.iter().position(|(name, _)| name == &property) {
            decls[pos].1 = value.to_string();
        } else {
            decls.push((property, value.to_string()));
        }

        if decls.is_empty() {
            self.remove_attr(node_id, "style");
        } else {
            self.set_attr(node_id, "style", &serialize_style_declarations(&decls));
        }
    }

    /// An element counts as visible unless its inline `display` is `none`.
    pub(crate) fn is_visible(&self, node_id: NodeId) -> bool {
        self.style_value(node_id, "display")
            .map(|display| display != "none")
            .unwrap_or(true)
    }

    pub(crate) fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        let all = self.query_selector_all(selector)?;
        Ok(all.into_iter().next())
    }

    pub(crate) fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;

        if groups.len() == 1 && groups[0].len() == 1 {
            if let Some(id) = groups[0][0].step.id_only() {
                return Ok(self.by_id(id).into_iter().collect());
            }
        }

        let mut ids = Vec::new();
        self.collect_elements_dfs(self.root, &mut ids);

        let mut seen = HashSet::new();
        let mut matched = Vec::new();
        for candidate in ids {
            if groups
                .iter()
                .any(|steps| self.matches_selector_chain(candidate, steps))
                && seen.insert(candidate)
            {
                matched.push(candidate);
            }
        }
        Ok(matched)
    }

    pub(crate) fn closest(&self, node_id: NodeId, selector: &str) -> Result<Option<NodeId>> {
        if self.element(node_id).is_none() {
            return Ok(None);
        }

        let groups = parse_selector_groups(selector)?;
        let mut cursor = Some(node_id);
        while let Some(current) = cursor {
            if groups
                .iter()
                .any(|steps| self.matches_selector_chain(current, steps))
            {
                return Ok(Some(current));
            }
            cursor = self.parent(current);
        }
        Ok(None)
    }

    fn collect_elements_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        if matches!(self.nodes[node_id.0].node_type, NodeType::Element(_)) {
            out.push(node_id);
        }
        for child in &self.nodes[node_id.0].children {
            self.collect_elements_dfs(*child, out);
        }
    }

    fn matches_selector_chain(&self, node_id: NodeId, steps: &[SelectorPart]) -> bool {
        if steps.is_empty() {
            return false;
        }
        if !self.matches_step(node_id, &steps[steps.len() - 1].step) {
            return false;
        }

        let mut current = node_id;
        for idx in (1..steps.len()).rev() {
            let prev_step = &steps[idx - 1].step;
            let combinator = steps[idx]
                .combinator
                .unwrap_or(SelectorCombinator::Descendant);

            let matched = match combinator {
                SelectorCombinator::Child => {
                    let Some(parent) = self.parent(current) else {
                        return false;
                    };
                    if self.matches_step(parent, prev_step) {
                        Some(parent)
                    } else {
                        None
                    }
                }
                SelectorCombinator::Descendant => {
                    let mut cursor = self.parent(current);
                    let mut found = None;
                    while let Some(parent) = cursor {
                        if self.matches_step(parent, prev_step) {
                            found = Some(parent);
                            break;
                        }
                        cursor = self.parent(parent);
                    }
                    found
                }
            };

            let Some(matched) = matched else {
                return false;
            };
            current = matched;
        }

        true
    }

    fn matches_step(&self, node_id: NodeId, step: &SelectorStep) -> bool {
        let Some(element) = self.element(node_id) else {
            return false;
        };

        if let Some(tag) = &step.tag {
            if !element.tag_name.eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        if let Some(id) = &step.id {
            if element.attrs.get("id") != Some(id) {
                return false;
            }
        }

        if step
            .classes
            .iter()
            .any(|class_name| !has_class(element, class_name))
        {
            return false;
        }

        for cond in &step.attrs {
            let matched = match cond {
                SelectorAttrCondition::Exists { key } => element.attrs.contains_key(key),
                SelectorAttrCondition::Eq { key, value } => element.attrs.get(key) == Some(value),
            };
            if !matched {
                return false;
            }
        }

        true
    }

    pub(crate) fn dump_node(&self, node_id: NodeId) -> String {
        match &self.nodes[node_id.0].node_type {
            NodeType::Document => {
                let mut out = String::new();
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.dump_node(*child));
                }
                out
            }
            NodeType::Text(text) => text.clone(),
            NodeType::Element(element) => {
                let mut out = String::new();
                out.push('<');
                out.push_str(&element.tag_name);
                // Attributes in name order so snippets are stable.
                let mut attrs: Vec<_> = element.attrs.iter().collect();
                attrs.sort_by(|a, b| a.0.cmp(b.0));
                for (k, v) in attrs {
                    out.push(' ');
                    out.push_str(k);
                    out.push_str("=\"");
                    out.push_str(v);
                    out.push('"');
                }
                out.push('>');
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.dump_node(*child));
                }
                out.push_str("</");
                out.push_str(&element.tag_name);
                out.push('>');
                out
            }
        }
    }
}

pub(crate) fn has_class(element: &Element, class_name: &str) -> bool {
    element
        .attrs
        .get("class")
        .map(|classes| classes.split_whitespace().any(|c| c == class_name))
        .unwrap_or(false)
}

fn class_tokens(class_attr: Option<&str>) -> Vec<String> {
    class_attr
        .map(|value| {
            value
                .split_whitespace()
                .filter(|token| !token.is_empty())
                .map(ToOwned::to_owned)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default()
}

fn set_class_attr(element: &mut Element, classes: &[String]) {
    if classes.is_empty() {
        element.attrs.remove("class");
    } else {
        element.attrs.insert("class".to_string(), classes.join(" "));
    }
}

fn parse_style_declarations(style_attr: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for decl in style_attr.split(';') {
        let Some((name, value)) = decl.split_once(':') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim().to_string();
        if name.is_empty() || value.is_empty() {
            continue;
        }
        if let Some(pos) = out.iter().position(|(existing, _)| existing == &name) {
            out[pos] = (name, value);
        } else {
            out.push((name, value));
        }
    }
    out
}

fn serialize_style_declarations(decls: &[(String, String)]) -> String {
    let mut out = String::new();
    for (idx, (name, value)) in decls.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        out.push_str(name);
        out.push_str(": ");
        out.push_str(value);
        out.push(';');
    }
    out
}
