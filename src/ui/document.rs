/// Dashboard view model.
///
/// [`Document`] stands in for the browser DOM: element contents keyed by id,
/// input values keyed by id, a list of `.page` panels with their visibility,
/// and the document title. The web shell mirrors it verbatim; nothing else
/// reads or writes the page.
use std::collections::BTreeMap;

use serde::Serialize;

/// Pages of the dashboard, each a panel tagged `.page`.
pub const PAGES: [&str; 3] = ["home-view", "aravis-view", "fp-view"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Panel {
    pub class: String,
    pub visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    title: String,
    elements: BTreeMap<String, String>,
    values: BTreeMap<String, String>,
    panels: Vec<Panel>,
}

impl Document {
    /// Empty document with the standard dashboard pages, all hidden.
    pub fn dashboard(title: &str) -> Self {
        let mut doc = Self {
            title: title.to_string(),
            ..Self::default()
        };
        for page in PAGES {
            doc.add_page(page);
        }
        doc
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    // -- Elements --

    /// Replace the inner markup of element `id`.
    pub fn set_html(&mut self, id: &str, html: impl Into<String>) {
        self.elements.insert(id.to_string(), html.into());
    }

    pub fn html(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(String::as_str)
    }

    /// Set element `id` to the empty string.
    pub fn clear(&mut self, id: &str) {
        self.set_html(id, "");
    }

    // -- Inputs --

    /// Set the value of input/select `id`.
    pub fn set_value(&mut self, id: &str, value: impl Into<String>) {
        self.values.insert(id.to_string(), value.into());
    }

    pub fn value(&self, id: &str) -> Option<&str> {
        self.values.get(id).map(String::as_str)
    }

    // -- Panels --

    /// Register a `.page` panel (hidden). Duplicate classes are ignored.
    pub fn add_page(&mut self, class: &str) {
        if !self.panels.iter().any(|p| p.class == class) {
            self.panels.push(Panel {
                class: class.to_string(),
                visible: false,
            });
        }
    }

    /// Hide every page, then show the one with `class`. Returns whether any
    /// panel matched.
    pub fn show_only(&mut self, class: &str) -> bool {
        let mut matched = false;
        for panel in &mut self.panels {
            panel.visible = panel.class == class;
            matched |= panel.visible;
        }
        matched
    }

    pub fn is_visible(&self, class: &str) -> bool {
        self.panels.iter().any(|p| p.class == class && p.visible)
    }

    pub fn visible_pages(&self) -> Vec<&str> {
        self.panels
            .iter()
            .filter(|p| p.visible)
            .map(|p| p.class.as_str())
            .collect()
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }
}
