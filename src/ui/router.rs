/// Fragment routing.
///
/// The first path segment of the URL fragment names the page to show:
/// `#aravis-view`, `#/aravis-view` and `#aravis-view/anything` all select the
/// panel with class `aravis-view`. No fragment selects the home page.
use super::document::Document;

/// Page shown when the fragment names none.
pub const HOME_PAGE: &str = "home-view";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    segment: Option<String>,
}

impl Route {
    /// Parse a fragment such as `#foo/bar` (the leading `#` is optional).
    pub fn parse(fragment: &str) -> Self {
        let path = fragment.trim().trim_start_matches('#').trim_start_matches('/');
        let segment = path
            .split('/')
            .next()
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Self { segment }
    }

    /// Segment named by the fragment, if any.
    pub fn segment(&self) -> Option<&str> {
        self.segment.as_deref()
    }

    /// Panel class to show.
    pub fn page(&self) -> &str {
        self.segment().unwrap_or(HOME_PAGE)
    }

    /// Document title: `"{base} ({segment})"`, or just `base` on the bare route.
    pub fn title(&self, base: &str) -> String {
        match self.segment() {
            Some(segment) => format!("{base} ({segment})"),
            None => base.to_string(),
        }
    }
}

/// Result of applying a route to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteOutcome {
    pub page: String,
    /// Whether a panel with that class exists.
    pub matched: bool,
    /// The home page was entered; callers refresh its one-shot fields.
    pub entered_home: bool,
}

/// Show the route's page, hide all others, and retitle the document.
pub fn apply(route: &Route, doc: &mut Document, base_title: &str) -> RouteOutcome {
    let page = route.page().to_string();
    doc.set_title(route.title(base_title));
    let matched = doc.show_only(&page);
    RouteOutcome {
        entered_home: page == HOME_PAGE,
        matched,
        page,
    }
}
