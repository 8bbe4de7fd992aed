//! Terminal UI
//!
//! One screen per storefront/console page; `App` owns all state and
//! dispatches drawing and key handling to the active screen's module.

pub mod admin;
pub mod app;
pub mod inventory;
pub mod login;
pub mod sales;
pub mod store;
pub mod users;
pub mod widgets;

pub use app::App;

/// The screens of the application and their navigation slugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Public storefront (catalog + cart).
    Store,
    Login,
    /// Admin console menu.
    Admin,
    Inventory,
    Users,
    Sales,
}

impl Screen {
    pub fn slug(self) -> &'static str {
        match self {
            Self::Store => "index",
            Self::Login => "login",
            Self::Admin => "administracion",
            Self::Inventory => "inventario",
            Self::Users => "usuarios",
            Self::Sales => "ventas",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "index" | "home" => Some(Self::Store),
            "login" => Some(Self::Login),
            "administracion" => Some(Self::Admin),
            "inventario" => Some(Self::Inventory),
            "usuarios" => Some(Self::Users),
            "ventas" => Some(Self::Sales),
            _ => None,
        }
    }

    /// Screens reachable only with a live session.
    pub fn requires_auth(self) -> bool {
        matches!(self, Self::Admin | Self::Inventory | Self::Users | Self::Sales)
    }
}
