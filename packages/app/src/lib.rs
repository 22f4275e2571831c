//! # App crate: session-gated screens without the screens
//!
//! The behaviour every tab of the client shares, independent of any UI toolkit:
//! wait for a session, fetch, expose loading and error state, and apply
//! confirmed mutations back to local state.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | [`Settings`] from defaults, `garrison.toml` and `GARRISON_*` env |
//! | [`context`] | [`AppContext`]: one client and one session store, shared by everything below |
//! | [`loader`] | Generic [`ResourceLoader`] state machine |
//! | [`resources`] | Missions, appointments, notifications, department |
//! | [`actions`] | Login, logout, profile, password, notification read/delete |
//! | [`shell`] | [`NavigationShell`]: login screen vs. tab set |
//! | [`validation`] | Local input checks |
//! | [`error`] | [`AppError`] and its user-visible text |
//!
//! A front end builds one [`AppContext`], asks it for a shell and a loader per
//! tab, and renders [`loader::Snapshot`]s as they change.

pub mod actions;
pub mod config;
pub mod context;
pub mod error;
pub mod loader;
pub mod resources;
pub mod shell;
pub mod validation;

pub use actions::Actions;
pub use config::Settings;
pub use context::AppContext;
pub use error::AppError;
pub use loader::{LoadState, Resource, ResourceLoader, Snapshot};
pub use resources::{
    Appointments, AppointmentsLoader, DepartmentLoader, DepartmentRoster, Missions,
    MissionsLoader, Notifications, NotificationsLoader,
};
pub use shell::{NavigationShell, Screen};
