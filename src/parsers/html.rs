use crate::parsers::text;
use scraper::{ElementRef, Html, Node};

/// Elements whose text never counts as article content
pub const EXCLUDED_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "template", "head", "nav", "header", "footer", "aside", "menu",
];

/// Elements that start a new run of text; inline elements join their neighbours
pub const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "br", "hr", "li", "ul", "ol", "dl", "dt", "dd", "h1", "h2", "h3", "h4", "h5", "h6",
    "table", "tr", "td", "th", "section", "article", "main", "blockquote", "pre", "figure",
    "figcaption", "body",
];

/// Converts raw page markup into readable plain text.
///
/// Non-content elements (scripts, styles, navigation, headers, footers,
/// sidebars, menus) are skipped. Text nodes are joined as written, so inline
/// markup like links and bold text does not split words; block elements are
/// separated by a space. All whitespace is then collapsed. Empty or malformed markup degrades to whatever
/// text the parser recovers, possibly an empty string; this never fails.
pub fn extract_text(html: &str) -> String {
    if text::is_blank(html) {
        return String::new();
    }

    let doc = Html::parse_document(html);
    let mut raw = String::with_capacity(html.len() / 4);
    collect_text(doc.root_element(), &mut raw);

    text::normalize_whitespace(&raw)
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(t) => out.push_str(t),
            Node::Element(el) if EXCLUDED_ELEMENTS.contains(&el.name()) => {}
            Node::Element(el) => {
                let block = BLOCK_ELEMENTS.contains(&el.name());
                if block {
                    out.push(' ');
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
                if block {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}
