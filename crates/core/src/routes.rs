//! Application pages and the route guard.
//!
//! [`guard`] is a pure function of the requested path and the current
//! [`AuthState`]: it decides whether to render the requested page, show a
//! loading placeholder while the session is being restored, or redirect.

use crate::roles::Viewer;
use crate::session::AuthState;

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// Every page the client can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Login,
    Register,
    ForgotPassword,
    AdminLogin,
    AdminDashboard,
    Dashboard,
    Profile,
    TrainerDashboard,
    SelectTrainer,
}

/// Who may see a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

impl Page {
    pub const ALL: [Page; 9] = [
        Page::Login,
        Page::Register,
        Page::ForgotPassword,
        Page::AdminLogin,
        Page::AdminDashboard,
        Page::Dashboard,
        Page::Profile,
        Page::TrainerDashboard,
        Page::SelectTrainer,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::ForgotPassword => "/forgot-password",
            Self::AdminLogin => "/admin/login",
            Self::AdminDashboard => "/admin/dashboard",
            Self::Dashboard => "/dashboard",
            Self::Profile => "/profile",
            Self::TrainerDashboard => "/trainer-dashboard",
            Self::SelectTrainer => "/select-trainer",
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Self::Login | Self::Register | Self::ForgotPassword | Self::AdminLogin => {
                Access::Public
            }
            Self::AdminDashboard => Access::Admin,
            Self::Dashboard | Self::Profile | Self::TrainerDashboard | Self::SelectTrainer => {
                Access::Authenticated
            }
        }
    }
}

/// What a requested path resolves to before any access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget {
    Page(Page),
    /// `/` and every unmatched path: send the viewer to their landing page.
    RoleRedirect,
}

/// Match a path against the routing table.
///
/// Query strings and fragments are ignored, as is a single trailing slash.
pub fn resolve(path: &str) -> RouteTarget {
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let path = match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => path,
    };

    Page::ALL
        .into_iter()
        .find(|page| page.path() == path)
        .map(RouteTarget::Page)
        .unwrap_or(RouteTarget::RoleRedirect)
}

/// The page a viewer lands on when no specific page was requested.
pub fn landing_page(viewer: Viewer) -> Page {
    match viewer {
        Viewer::Anonymous => Page::Login,
        Viewer::Admin => Page::AdminDashboard,
        Viewer::User | Viewer::Trainer => Page::Dashboard,
    }
}

// ---------------------------------------------------------------------------
// Guard
// ---------------------------------------------------------------------------

/// Outcome of evaluating the guard for one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// The session is still being restored; render a placeholder.
    Loading,
    Render(Page),
    Redirect(Page),
}

/// Decide what to show for `path` given the current auth state.
pub fn guard(path: &str, state: &AuthState) -> RouteDecision {
    if state.loading {
        return RouteDecision::Loading;
    }

    let viewer = state.viewer();
    match resolve(path) {
        RouteTarget::RoleRedirect => RouteDecision::Redirect(landing_page(viewer)),
        RouteTarget::Page(page) => match (page.access(), viewer) {
            (Access::Public, _) => RouteDecision::Render(page),
            (Access::Authenticated, Viewer::Anonymous) => RouteDecision::Redirect(Page::Login),
            (Access::Authenticated, _) => RouteDecision::Render(page),
            (Access::Admin, Viewer::Anonymous) => RouteDecision::Redirect(Page::AdminLogin),
            (Access::Admin, Viewer::Admin) => RouteDecision::Render(page),
            // Non-admins are downgraded to the regular dashboard, not denied.
            (Access::Admin, Viewer::User | Viewer::Trainer) => {
                RouteDecision::Redirect(Page::Dashboard)
            }
        },
    }
}
