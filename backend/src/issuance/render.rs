//! Document rendering for issued collectibles
//!
//! The engine only hands a `Selection` to a `Renderer` and stores whatever
//! string comes back. `SvgRenderer` produces the default document: an SVG
//! card embedded in a JSON metadata document, packed into a data URI.

use crate::issuance::{IssuanceError, Selection};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::json;

/// Turns a selection into an opaque, self-contained document
pub trait Renderer {
    fn render(&self, selection: &Selection) -> Result<String, IssuanceError>;
}

/// SVG card + JSON metadata, as a `data:application/json;base64,` URI
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    /// Collection name used in the document title
    pub collection: String,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            collection: "Entropy Draw".to_string(),
        }
    }
}

impl SvgRenderer {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
        }
    }

    /// The SVG card on its own
    pub fn svg(&self, selection: &Selection) -> String {
        let mut lines = String::new();
        let rows = selection.first.iter().zip(selection.second.iter());
        for (row, (element, creature)) in rows.enumerate() {
            let y = 110 + row * 60;
            lines.push_str(&format!(
                r#"<text x="175" y="{y}" class="kw">{} {}</text>"#,
                escape_xml(element),
                escape_xml(creature)
            ));
        }

        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 350 350">"#,
                r#"<style>.kw{{font:bold 22px serif;fill:#f5f0e1;text-anchor:middle}}"#,
                r#".id{{font:14px monospace;fill:#c9b37e;text-anchor:middle}}</style>"#,
                r##"<rect width="100%" height="100%" fill="#1d2433"/>"##,
                r#"<text x="175" y="50" class="id">#{id}</text>"#,
                "{lines}",
                r#"<text x="175" y="320" class="id">{timestamp}</text>"#,
                "</svg>"
            ),
            id = selection.id,
            lines = lines,
            timestamp = selection.timestamp,
        )
    }
}

impl Renderer for SvgRenderer {
    fn render(&self, selection: &Selection) -> Result<String, IssuanceError> {
        let image = format!(
            "data:image/svg+xml;base64,{}",
            STANDARD.encode(self.svg(selection))
        );

        let mut attributes = Vec::new();
        for keyword in &selection.first {
            attributes.push(json!({ "trait_type": "Element", "value": keyword }));
        }
        for keyword in &selection.second {
            attributes.push(json!({ "trait_type": "Creature", "value": keyword }));
        }

        let metadata = json!({
            "name": format!("{} #{}", self.collection, selection.id),
            "description": format!(
                "Drawn from block {} with salt {}",
                selection.height, selection.salt
            ),
            "image": image,
            "timestamp": selection.timestamp,
            "attributes": attributes,
        });

        let document =
            serde_json::to_string(&metadata).map_err(|e| IssuanceError::Render(e.to_string()))?;
        Ok(format!(
            "data:application/json;base64,{}",
            STANDARD.encode(document)
        ))
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
