use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::Html;

/// Tags whose text content never renders on the page.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript"];

/// Reduces an HTML document to its visible text: one line per text fragment,
/// every line trimmed, blank lines dropped. Running the output through again
/// returns it unchanged.
pub fn normalize_html(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut fragments: Vec<String> = Vec::new();
    for child in document.root_element().children() {
        visit_node(child, &mut fragments);
    }
    collapse_lines(&fragments.join("\n"))
}

fn visit_node(node: NodeRef<'_, Node>, fragments: &mut Vec<String>) {
    match node.value() {
        Node::Text(text) => fragments.push(text.to_string()),
        Node::Element(element) => {
            if HIDDEN_TAGS.contains(&element.name()) {
                return;
            }
            for child in node.children() {
                visit_node(child, fragments);
            }
        }
        _ => {}
    }
}

fn collapse_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
