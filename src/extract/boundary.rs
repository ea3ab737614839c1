use scraper::ElementRef;

/// Tag names accepted as a card container.
const BLOCK_TAGS: [&str; 3] = ["article", "div", "li"];

/// Recovers a card's container element from an anchor inside it
///
/// Walks up the ancestor chain at most `max_hops` levels, stopping at the
/// first element whose tag is block-like (`article`, `div`, `li`). The
/// element itself counts, so a selector that already matched the wrapper
/// div is returned unchanged. The hop bound keeps a malformed-markup walk
/// cheap; if nothing block-like is found within the bound, the last
/// element visited is accepted as the nearest reasonable boundary.
pub fn recover_boundary<'a>(element: ElementRef<'a>, max_hops: usize) -> ElementRef<'a> {
    let mut current = element;
    for _ in 0..max_hops {
        if BLOCK_TAGS.contains(&current.value().name()) {
            break;
        }
        match current.parent().and_then(ElementRef::wrap) {
            Some(parent) => current = parent,
            None => break,
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(document: &'a Html, selector: &str) -> ElementRef<'a> {
        let selector = Selector::parse(selector).unwrap();
        document.select(&selector).next().unwrap()
    }

    #[test]
    fn test_anchor_climbs_to_wrapping_div() {
        let document = Html::parse_fragment(
            r#"<div class="card"><span><a href="/x">Listing</a></span></div>"#,
        );
        let anchor = first(&document, "a");
        let boundary = recover_boundary(anchor, 4);
        assert_eq!(boundary.value().name(), "div");
        assert_eq!(boundary.value().attr("class"), Some("card"));
    }

    #[test]
    fn test_div_is_its_own_boundary() {
        let document = Html::parse_fragment(r#"<div class="card"><a href="/x">L</a></div>"#);
        let div = first(&document, "div.card");
        let boundary = recover_boundary(div, 4);
        assert_eq!(boundary.value().attr("class"), Some("card"));
    }

    #[test]
    fn test_stops_at_nearest_block_ancestor() {
        let document = Html::parse_fragment(
            r#"<article><li><span><a href="/x">L</a></span></li></article>"#,
        );
        let anchor = first(&document, "a");
        let boundary = recover_boundary(anchor, 4);
        assert_eq!(boundary.value().name(), "li");
    }

    #[test]
    fn test_hop_bound_limits_the_walk() {
        // Four levels of inline wrappers between the anchor and the div:
        // the walk gives up before reaching it.
        let document = Html::parse_fragment(
            r#"<div><b><i><u><s><a href="/x">L</a></s></u></i></b></div>"#,
        );
        let anchor = first(&document, "a");
        let boundary = recover_boundary(anchor, 4);
        assert_eq!(boundary.value().name(), "b");

        let boundary = recover_boundary(anchor, 6);
        assert_eq!(boundary.value().name(), "div");
    }
}
