use scraper::{ElementRef, Selector};
use std::sync::LazyLock;
use url::Url;

static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DocumentLinks {
    pub statement: Option<String>,
    pub projection: Option<String>,
}

/// Classify every anchor in `cell` by its visible text. Later matches win.
pub fn extract(cell: ElementRef<'_>, base: &Url) -> DocumentLinks {
    let mut links = DocumentLinks::default();

    for anchor in cell.select(&ANCHOR_SEL) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if href.is_empty() {
            continue;
        }
        let Some(url) = resolve(base, href) else {
            continue;
        };
        let text: String = anchor.text().map(str::trim).collect::<String>().to_lowercase();

        if text.contains("statement") {
            links.statement = Some(url.clone());
        }
        if text.contains("projection") {
            links.projection = Some(url);
        }
    }

    links
}

fn resolve(base: &Url, href: &str) -> Option<String> {
    base.join(href.trim()).ok().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn base() -> Url {
        Url::parse("https://www.federalreserve.gov/monetarypolicy/fomccalendars.htm").unwrap()
    }

    fn links_in(fragment: &str) -> DocumentLinks {
        let html = Html::parse_document(&format!("<table><tr><td>{}</td></tr></table>", fragment));
        let td = html.select(&Selector::parse("td").unwrap()).next().unwrap();
        extract(td, &base())
    }

    #[test]
    fn statement_and_projection() {
        let l = links_in(
            r#"<a href="/newsevents/pressreleases/monetary20240131a.htm">Statement</a>
               <a href="/monetarypolicy/files/fomcprojtabl20240131.pdf">Press Conference Projection Materials</a>"#,
        );
        assert_eq!(
            l.statement.as_deref(),
            Some("https://www.federalreserve.gov/newsevents/pressreleases/monetary20240131a.htm")
        );
        assert_eq!(
            l.projection.as_deref(),
            Some("https://www.federalreserve.gov/monetarypolicy/files/fomcprojtabl20240131.pdf")
        );
    }

    #[test]
    fn unrelated_links_and_missing_href_ignored() {
        let l = links_in(r#"<a href="minutes.htm">Minutes</a><a>Statement</a>"#);
        assert_eq!(l, DocumentLinks::default());
    }

    #[test]
    fn last_match_wins_and_one_link_can_fill_both() {
        let l = links_in(
            r#"<a href="a.pdf">Statement</a>
               <a href="b.pdf">STATEMENT on Projections</a>"#,
        );
        let b = "https://www.federalreserve.gov/monetarypolicy/b.pdf";
        assert_eq!(l.statement.as_deref(), Some(b));
        assert_eq!(l.projection.as_deref(), Some(b));
    }

    #[test]
    fn absolute_links_kept() {
        let l = links_in(r#"<a href="https://example.org/s.pdf">PDF statement</a>"#);
        assert_eq!(l.statement.as_deref(), Some("https://example.org/s.pdf"));
    }
}
