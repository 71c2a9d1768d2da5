//! Tree lookups used to infer context for a calendar row.

use scraper::ElementRef;

/// Anything with a parent pointer.
pub trait Hierarchical: Sized {
    fn parent_node(&self) -> Option<Self>;
}

impl<'a> Hierarchical for ElementRef<'a> {
    fn parent_node(&self) -> Option<Self> {
        self.parent().and_then(ElementRef::wrap)
    }
}

/// Climb from `node` toward the root (excluding `node` itself) and return the
/// first label that `label_of` produces.
pub fn nearest_labeled_ancestor<N, R, F>(node: &N, mut label_of: F) -> Option<R>
where
    N: Hierarchical,
    F: FnMut(&N) -> Option<R>,
{
    let mut current = node.parent_node();
    while let Some(ancestor) = current {
        if let Some(label) = label_of(&ancestor) {
            return Some(label);
        }
        current = ancestor.parent_node();
    }
    None
}

/// Nearest element before `el` in document order whose tag is one of `tags`.
pub fn preceding_element<'a>(el: ElementRef<'a>, tags: &[&str]) -> Option<ElementRef<'a>> {
    let is_target = |e: &ElementRef<'_>| tags.contains(&e.value().name());
    let mut current = el;
    loop {
        for sibling in current.prev_siblings().filter_map(ElementRef::wrap) {
            // last match inside the sibling's subtree is the closest one
            if let Some(found) = sibling
                .descendants()
                .filter_map(ElementRef::wrap)
                .filter(|e| is_target(e))
                .last()
            {
                return Some(found);
            }
        }
        let parent = current.parent_node()?;
        if is_target(&parent) {
            return Some(parent);
        }
        current = parent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    struct Node<'a> {
        label: Option<&'a str>,
        parent: Option<&'a Node<'a>>,
    }

    impl<'a> Hierarchical for &'a Node<'a> {
        fn parent_node(&self) -> Option<Self> {
            self.parent
        }
    }

    #[test]
    fn ancestor_walk_skips_self_and_stops_at_first_label() {
        let root = Node { label: Some("root"), parent: None };
        let mid = Node { label: Some("mid"), parent: Some(&root) };
        let bare = Node { label: None, parent: Some(&mid) };
        let leaf = Node { label: Some("leaf"), parent: Some(&bare) };

        let found = nearest_labeled_ancestor(&&leaf, |n| n.label);
        assert_eq!(found, Some("mid"));
        assert_eq!(nearest_labeled_ancestor(&&root, |n| n.label), None);
    }

    #[test]
    fn ancestor_walk_over_html() {
        let html = Html::parse_document(
            r#"<div id="year-2021"><section><table><tr id="r"><td>x</td></tr></table></section></div>"#,
        );
        let row = html.select(&Selector::parse("tr").unwrap()).next().unwrap();
        let id = nearest_labeled_ancestor(&row, |e| e.value().id().map(str::to_string));
        assert_eq!(id.as_deref(), Some("year-2021"));
    }

    #[test]
    fn preceding_heading_in_document_order() {
        let html = Html::parse_document(
            r#"<h2>Outer</h2>
            <div><h3>First</h3><p>text</p><div><h4>Nested</h4></div></div>
            <table><tr><td>x</td></tr></table>
            <h2>After</h2>"#,
        );
        let row = html.select(&Selector::parse("tr").unwrap()).next().unwrap();
        let h = preceding_element(row, &["h2", "h3", "h4", "h5"]).unwrap();
        assert_eq!(h.text().collect::<String>(), "Nested");
    }

    #[test]
    fn no_preceding_heading() {
        let html = Html::parse_document("<table><tr><td>x</td></tr></table><h2>Later</h2>");
        let row = html.select(&Selector::parse("tr").unwrap()).next().unwrap();
        assert!(preceding_element(row, &["h2"]).is_none());
    }
}
