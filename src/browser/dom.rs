//! DOM output region and the language toggle control.

use crate::error::{FingerprintError, Result};
use crate::locale::Locale;
use crate::presenter::{RenderTarget, RenderedField};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

fn document() -> Result<Document> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| FingerprintError::Unsupported("no document".into()))
}

fn dom_err(context: &str) -> impl Fn(wasm_bindgen::JsValue) -> FingerprintError + '_ {
    move |e| FingerprintError::Dom(format!("{}: {:?}", context, e))
}

/// The container whose children are replaced on every run.
pub struct DomOutput {
    element_id: String,
}

impl DomOutput {
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
        }
    }

    fn container(&self, document: &Document) -> Result<Element> {
        document
            .get_element_by_id(&self.element_id)
            .ok_or_else(|| FingerprintError::Dom(format!("#{} not found", self.element_id)))
    }

    /// `<div class="data-item">glyph <span>label: value</span></div>`
    ///
    /// Values come from remote services, so they are set as text, never
    /// parsed as markup.
    fn row(document: &Document, row: &RenderedField) -> Result<Element> {
        let item = document.create_element("div").map_err(dom_err("create div"))?;
        item.set_class_name("data-item");
        item.set_text_content(Some(&format!("{} ", row.glyph)));

        let span = document.create_element("span").map_err(dom_err("create span"))?;
        span.set_text_content(Some(&format!("{}: {}", row.label, row.value)));
        item.append_child(&span).map_err(dom_err("append span"))?;
        Ok(item)
    }
}

impl RenderTarget for DomOutput {
    fn replace(&self, rows: &[RenderedField]) -> Result<()> {
        let document = document()?;
        let container = self.container(&document)?;
        container.set_inner_html("");
        for row in rows {
            container
                .append_child(&Self::row(&document, row)?.into())
                .map_err(dom_err("append row"))?;
        }
        Ok(())
    }
}

/// Applies a locale to the static page text and the toggle button.
pub struct LocaleToggle {
    button_id: String,
}

impl LocaleToggle {
    pub const DEFAULT_BUTTON_ID: &'static str = "lang-toggle";

    pub fn new(button_id: impl Into<String>) -> Self {
        Self {
            button_id: button_id.into(),
        }
    }

    pub fn button(&self) -> Result<Element> {
        document()?
            .get_element_by_id(&self.button_id)
            .ok_or_else(|| FingerprintError::Dom(format!("#{} not found", self.button_id)))
    }

    /// Update the toggle's icon/text and every `[data-en][data-ru]` element.
    pub fn apply(&self, locale: Locale) -> Result<()> {
        let document = document()?;

        if let Ok(button) = self.button() {
            if let Ok(Some(icon)) = button.query_selector(".lang-icon") {
                icon.set_text_content(Some(locale.icon()));
            }
            if let Ok(Some(text)) = button.query_selector(".lang-text") {
                text.set_text_content(Some(locale.display_name()));
            }
        }

        let attr = format!("data-{}", locale.tag());
        let nodes = document
            .query_selector_all("[data-en][data-ru]")
            .map_err(dom_err("query localized nodes"))?;
        for i in 0..nodes.length() {
            let Some(element) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            if let Some(text) = element.get_attribute(&attr) {
                element.set_text_content(Some(&text));
            }
        }
        Ok(())
    }
}
