//! Location arithmetic for `gu`, `gU`, `gf`, `[[`, `]]`, `p` and `P`

use crate::error::{EngineError, EngineResult};
use host_api::{LinkInfo, RelativeDirection};
use url::Url;

const PREVIOUS_TEXTS: &[&str] = &["previous", "prev", "<", "‹", "«"];
const NEXT_TEXTS: &[&str] = &["next", ">", "›", "»"];

fn is_internal(url: &Url) -> bool {
    matches!(url.scheme(), "about" | "moz-extension")
}

/// `C:` style first path segment of a `file:` URL
fn is_drive(segment: &str) -> bool {
    let mut chars = segment.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(letter), Some(':'), None) if letter.is_ascii_alphabetic()
    )
}

/// One directory up from `current`
///
/// `None` at the root and for internal pages. `file:` locations never go
/// above their drive.
pub fn parent_directory(current: &str) -> Option<String> {
    let mut url = Url::parse(current).ok()?;
    if is_internal(&url) || url.cannot_be_a_base() {
        return None;
    }

    let mut segments: Vec<String> = url
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if segments.is_empty() {
        return None;
    }
    if url.scheme() == "file" && segments.len() == 1 && is_drive(&segments[0]) {
        return None;
    }

    segments.pop();
    let path = if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    };
    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);
    Some(url.to_string())
}

/// The root of the site `current` belongs to
///
/// For `file:` locations this is the first directory (the drive on Windows
/// style paths); `None` when already there.
pub fn site_root(current: &str) -> Option<String> {
    let mut url = Url::parse(current).ok()?;
    if is_internal(&url) || url.cannot_be_a_base() {
        return None;
    }

    if url.scheme() == "file" {
        let path = url.path().to_string();
        let first = path
            .trim_start_matches('/')
            .split('/')
            .next()
            .filter(|s| !s.is_empty())?;
        let root = format!("/{}/", first);
        if root == path {
            return None;
        }
        url.set_path(&root);
    } else {
        url.set_path("/");
    }
    url.set_query(None);
    url.set_fragment(None);
    Some(url.to_string())
}

/// `view-source:` location for `current`
pub fn view_source_url(current: &str) -> EngineResult<String> {
    let url = Url::parse(current).map_err(|e| EngineError::InvalidUrl(format!("{}: {}", current, e)))?;
    if is_internal(&url) || url.scheme() == "file" {
        return Err(EngineError::Refused(format!("{}: locations", url.scheme())));
    }
    Ok(format!("view-source:{}", current))
}

/// Target of the document's previous/next page link
///
/// A `rel` attribute wins; otherwise the first anchor whose text or label
/// reads like "next"/"previous", tried in table order.
pub fn rel_link(links: &[LinkInfo], direction: RelativeDirection) -> Option<String> {
    let (rel, texts) = match direction {
        RelativeDirection::Previous => ("prev", PREVIOUS_TEXTS),
        RelativeDirection::Next => ("next", NEXT_TEXTS),
    };

    let by_rel = links.iter().find(|link| {
        (link.tag == "link" || link.tag == "a")
            && link.href.is_some()
            && link
                .rel
                .as_deref()
                .is_some_and(|r| r.eq_ignore_ascii_case(rel))
    });
    if let Some(link) = by_rel {
        return link.href.clone();
    }

    let anchors: Vec<&LinkInfo> = links
        .iter()
        .filter(|link| link.tag == "a" && link.href.is_some())
        .collect();
    texts.iter().find_map(|text| {
        anchors
            .iter()
            .find(|link| {
                link.text.trim().to_lowercase() == *text
                    || link
                        .aria_label
                        .as_deref()
                        .is_some_and(|label| label.to_lowercase().contains(text))
            })
            .and_then(|link| link.href.clone())
    })
}

/// Clipboard text usable as a location
pub fn clipboard_url(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Url::parse(trimmed).ok().map(|_| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_directory() {
        assert_eq!(
            parent_directory("https://a.test/docs/guide/intro?x=1#top").as_deref(),
            Some("https://a.test/docs/guide/")
        );
        assert_eq!(
            parent_directory("https://a.test/docs/").as_deref(),
            Some("https://a.test/")
        );
        assert_eq!(parent_directory("https://a.test/"), None);
        assert_eq!(parent_directory("about:blank"), None);
    }

    #[test]
    fn test_parent_directory_file() {
        assert_eq!(
            parent_directory("file:///C:/work/notes/").as_deref(),
            Some("file:///C:/work/")
        );
        assert_eq!(
            parent_directory("file:///home/me").as_deref(),
            Some("file:///home/")
        );
        assert_eq!(parent_directory("file:///C:/"), None);
    }

    #[test]
    fn test_site_root() {
        assert_eq!(
            site_root("https://a.test/docs/guide?x=1#y").as_deref(),
            Some("https://a.test/")
        );
        assert_eq!(
            site_root("file:///C:/work/notes/a.txt").as_deref(),
            Some("file:///C:/")
        );
        assert_eq!(site_root("file:///C:/"), None);
        assert_eq!(site_root("about:config"), None);
    }

    #[test]
    fn test_view_source() {
        assert_eq!(
            view_source_url("https://a.test/x").unwrap(),
            "view-source:https://a.test/x"
        );
        assert!(matches!(
            view_source_url("about:blank"),
            Err(EngineError::Refused(_))
        ));
        assert!(matches!(
            view_source_url("file:///tmp/x"),
            Err(EngineError::Refused(_))
        ));
        assert!(matches!(view_source_url("not a url"), Err(EngineError::InvalidUrl(_))));
    }

    #[test]
    fn test_rel_link_prefers_rel_attribute() {
        let links = vec![
            LinkInfo::anchor("https://a.test/2", "next"),
            LinkInfo {
                tag: "link".into(),
                rel: Some("Next".into()),
                href: Some("https://a.test/page2".into()),
                text: String::new(),
                aria_label: None,
            },
        ];
        assert_eq!(
            rel_link(&links, RelativeDirection::Next).as_deref(),
            Some("https://a.test/page2")
        );
    }

    #[test]
    fn test_rel_link_text_fallback() {
        let links = vec![
            LinkInfo::anchor("https://a.test/older", " « "),
            LinkInfo::anchor("https://a.test/p", "Prev"),
            LinkInfo::anchor("https://a.test/n", "x").with_aria_label("Go to next page"),
        ];
        assert_eq!(
            rel_link(&links, RelativeDirection::Previous).as_deref(),
            Some("https://a.test/p")
        );
        assert_eq!(
            rel_link(&links, RelativeDirection::Next).as_deref(),
            Some("https://a.test/n")
        );
        assert_eq!(rel_link(&[], RelativeDirection::Next), None);
    }

    #[test]
    fn test_clipboard_url() {
        assert_eq!(
            clipboard_url(" https://a.test/ \n").as_deref(),
            Some("https://a.test/")
        );
        assert_eq!(clipboard_url("just words"), None);
        assert_eq!(clipboard_url(""), None);
    }
}
