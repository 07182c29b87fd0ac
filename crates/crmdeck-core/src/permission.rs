#![forbid(unsafe_code)]

//! Capability flags and injected permission checks.
//!
//! Drag affordances are gated on a capability that the host evaluates per
//! session. Engines never read ambient global state; they receive something
//! implementing [`PermissionCheck`] and ask it when an interaction begins.
//!
//! Closures work directly:
//!
//! ```
//! use crmdeck_core::permission::{Capabilities, PermissionCheck};
//!
//! let allow_all = |_: Capabilities| true;
//! assert!(allow_all.permits(Capabilities::REORDER));
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Role name that grants every arrangement capability.
pub const ADMIN_ROLE: &str = "admin";

bitflags! {
    /// Arrangement capabilities held by a session.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Capabilities: u8 {
        /// View arranged content.
        const VIEW = 0b0000_0001;
        /// Start drag-reorders on lists and widget grids.
        const REORDER = 0b0000_0010;
        /// Add, move, resize, and delete template components.
        const EDIT_TEMPLATE = 0b0000_0100;
    }
}

impl Capabilities {
    /// Everything an administrator may do.
    pub const ADMIN: Self = Self::VIEW.union(Self::REORDER).union(Self::EDIT_TEMPLATE);
}

/// Decides whether an action requiring `required` may proceed.
pub trait PermissionCheck {
    fn permits(&self, required: Capabilities) -> bool;
}

impl<F> PermissionCheck for F
where
    F: Fn(Capabilities) -> bool,
{
    fn permits(&self, required: Capabilities) -> bool {
        self(required)
    }
}

impl PermissionCheck for Capabilities {
    fn permits(&self, required: Capabilities) -> bool {
        self.contains(required)
    }
}

/// Authenticated session state relevant to arrangement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    pub user: String,
    pub roles: Vec<String>,
    capabilities: Capabilities,
}

impl Session {
    /// Build a session, deriving capabilities from role names.
    ///
    /// `admin` grants [`Capabilities::ADMIN`]; any authenticated user may view.
    #[must_use]
    pub fn new(user: impl Into<String>, roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let roles: Vec<String> = roles.into_iter().map(Into::into).collect();
        let capabilities = capabilities_for_roles(&roles);
        Self {
            user: user.into(),
            roles,
            capabilities,
        }
    }

    /// A session with no identity and no capabilities.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|role| role == ADMIN_ROLE)
    }
}

impl PermissionCheck for Session {
    fn permits(&self, required: Capabilities) -> bool {
        self.capabilities.contains(required)
    }
}

fn capabilities_for_roles(roles: &[String]) -> Capabilities {
    let mut caps = Capabilities::VIEW;
    if roles.iter().any(|role| role == ADMIN_ROLE) {
        caps |= Capabilities::ADMIN;
    }
    caps
}
