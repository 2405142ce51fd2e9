//! Binding between a vehicle page's markup and the client.
//!
//! The page carries its interactive state in data attributes:
//!
//! - `data-favorite-toggle` / `data-garage-toggle` mark the membership buttons
//! - `data-vehicle-id` identifies the vehicle (positive integer)
//! - `data-in-favorite` / `data-in-garage` hold the initial membership (`"true"`)
//! - a hidden input carries the anti-forgery token
//!
//! Only the first element of each role is bound. A button without a usable
//! vehicle id is inert and produces no binding. Comments and the bodies of
//! `<script>` and `<style>` elements are not markup and are skipped.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

use crate::toggle::ToggleKind;

/// A membership button found in the markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlBinding {
    pub kind: ToggleKind,
    pub vehicle_id: u64,
    pub initial: bool,
}

/// Everything the client reads from a vehicle page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMarkup {
    pub title: Option<String>,
    pub csrf_token: Option<String>,
    pub favorite: Option<ControlBinding>,
    pub garage: Option<ControlBinding>,
}

impl PageMarkup {
    pub fn parse(html: &str, csrf_field: &str) -> Self {
        let html = strip_inert(html);
        let tags: Vec<Tag> = tags(&html).collect();

        let csrf_token = tags
            .iter()
            .find(|t| t.name == "input" && t.attr("name") == Some(csrf_field))
            .and_then(|t| t.attr("value"))
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let title = title_pattern()
            .captures(&html)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|t| !t.is_empty());

        Self {
            title,
            csrf_token,
            favorite: bind(&tags, ToggleKind::Favorite),
            garage: bind(&tags, ToggleKind::Garage),
        }
    }

    pub fn bindings(&self) -> impl Iterator<Item = &ControlBinding> {
        self.favorite.iter().chain(self.garage.iter())
    }
}

fn bind(tags: &[Tag], kind: ToggleKind) -> Option<ControlBinding> {
    let tag = tags.iter().find(|t| t.has(kind.marker_attr()))?;

    let vehicle_id = tag
        .attr("data-vehicle-id")
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .filter(|id| *id > 0);
    let Some(vehicle_id) = vehicle_id else {
        tracing::debug!("{} control has no vehicle id, leaving it inert", kind.name());
        return None;
    };

    Some(ControlBinding {
        kind,
        vehicle_id,
        initial: tag.attr(kind.state_attr()) == Some("true"),
    })
}

#[derive(Debug)]
struct Tag {
    name: String,
    attrs: Vec<(String, String)>,
}

impl Tag {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn has(&self, name: &str) -> bool {
        self.attrs.iter().any(|(n, _)| n == name)
    }
}

fn inert_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?is)<!--.*?-->|<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
            .unwrap_or_else(|e| panic!("Invalid inert pattern: {}", e))
    })
}

/// Start tags with their attribute span. Quoted values may contain `>`.
fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r#"<([A-Za-z][A-Za-z0-9-]*)((?:\s+[^\s"'<>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'<>`]+))?)*)\s*/?>"#,
        )
        .unwrap_or_else(|e| panic!("Invalid tag pattern: {}", e))
    })
}

fn attr_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
            .unwrap_or_else(|e| panic!("Invalid attribute pattern: {}", e))
    })
}

fn title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?is)<title[^>]*>(.*?)</title>")
            .unwrap_or_else(|e| panic!("Invalid title pattern: {}", e))
    })
}

/// Drop comments, scripts and styles so their contents are never bound
fn strip_inert(html: &str) -> Cow<'_, str> {
    inert_pattern().replace_all(html, "")
}

fn tags(html: &str) -> impl Iterator<Item = Tag> + '_ {
    tag_pattern().captures_iter(html).map(|caps| {
        let name = caps
            .get(1)
            .map(|m| m.as_str().to_ascii_lowercase())
            .unwrap_or_default();
        let attrs = caps
            .get(2)
            .map(|m| {
                attr_pattern()
                    .captures_iter(m.as_str())
                    .filter_map(|a| {
                        let attr_name = a.get(1)?.as_str().to_ascii_lowercase();
                        let value = a
                            .get(2)
                            .or_else(|| a.get(3))
                            .or_else(|| a.get(4))
                            .map(|v| v.as_str().to_string())
                            .unwrap_or_default();
                        Some((attr_name, value))
                    })
                    .collect()
            })
            .unwrap_or_default();
        Tag { name, attrs }
    })
}
