//! Dashboard navigation surface.
//!
//! The sidebar links to more routes than have pages. Routes without a page
//! are listed as such rather than given placeholder content.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Route {
    pub path: &'static str,
    pub title: &'static str,
    pub has_page: bool,
}

const fn page(path: &'static str, title: &'static str) -> Route {
    Route {
        path,
        title,
        has_page: true,
    }
}

const fn link_only(path: &'static str, title: &'static str) -> Route {
    Route {
        path,
        title,
        has_page: false,
    }
}

/// Every dashboard route in sidebar order.
pub const DASHBOARD_ROUTES: &[Route] = &[
    page("/dashboard", "Executive"),
    page("/dashboard/marketing", "Marketing"),
    page("/dashboard/product", "Product"),
    page("/dashboard/branch", "Branch"),
    page("/dashboard/hr", "HR"),
    page("/dashboard/member-assessment", "Member Assessment"),
    page("/dashboard/user-management", "User Management"),
    link_only("/dashboard/analytics", "Analytics"),
    link_only("/dashboard/impact-analysis", "Impact Analysis"),
    link_only("/dashboard/strategic-planning", "Strategic Planning"),
    link_only("/dashboard/implementation-tracking", "Implementation Tracking"),
    link_only("/dashboard/custom-reporting", "Custom Reporting"),
];

/// Look up a route by path. A trailing slash is ignored.
pub fn find(path: &str) -> Option<&'static Route> {
    let path = match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path,
    };
    DASHBOARD_ROUTES.iter().find(|route| route.path == path)
}

/// Sidebar links with no page behind them.
pub fn missing_pages() -> impl Iterator<Item = &'static Route> {
    DASHBOARD_ROUTES.iter().filter(|route| !route.has_page)
}
