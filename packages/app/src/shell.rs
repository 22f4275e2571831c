//! Navigation shell: which screens are reachable for the current session.

use store::{KeyValueStore, SessionStore};
use tokio::sync::watch;

use crate::error::AppError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Screen {
    Login,
    Missions,
    Appointments,
    Notifications,
    Department,
    Profile,
}

impl Screen {
    /// Tab set shown once signed in, in display order.
    pub const TABS: [Screen; 5] = [
        Screen::Missions,
        Screen::Appointments,
        Screen::Notifications,
        Screen::Department,
        Screen::Profile,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Screen::Login => "Login",
            Screen::Missions => "Missions",
            Screen::Appointments => "Appointments",
            Screen::Notifications => "Notifications",
            Screen::Department => "Department",
            Screen::Profile => "Profile",
        }
    }
}

/// Tracks the session token and keeps the current screen inside the reachable set.
///
/// Login and logout never talk to the shell directly. They write the session
/// store, and [`sync`](NavigationShell::sync) or [`changed`](NavigationShell::changed)
/// pick the transition up from its watch.
pub struct NavigationShell {
    rx: watch::Receiver<Option<String>>,
    authenticated: bool,
    current: Screen,
}

impl NavigationShell {
    /// Decide the first screen from what the store holds at startup.
    pub async fn start<S: KeyValueStore>(session: &SessionStore<S>) -> Self {
        let mut rx = session.subscribe();
        rx.borrow_and_update();
        let authenticated = session.get().await.is_authenticated();
        Self {
            rx,
            authenticated,
            current: Self::landing(authenticated),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Screens reachable right now.
    pub fn tabs(&self) -> &'static [Screen] {
        if self.authenticated {
            &Screen::TABS
        } else {
            &[Screen::Login]
        }
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    /// Switch to `screen` if the current session allows it.
    pub fn navigate(&mut self, screen: Screen) -> Result<Screen, AppError> {
        self.sync();
        if !self.tabs().contains(&screen) {
            return Err(AppError::AuthorizationMissing);
        }
        self.current = screen;
        Ok(screen)
    }

    /// Apply any session change published since the last look. Returns `true`
    /// if the shell switched between the login screen and the tab set.
    pub fn sync(&mut self) -> bool {
        let authenticated = self.rx.borrow_and_update().is_some();
        self.transition(authenticated)
    }

    /// Wait for the next session change and apply it. Returns `false` once the
    /// session store is gone.
    pub async fn changed(&mut self) -> bool {
        if self.rx.changed().await.is_err() {
            return false;
        }
        self.sync();
        true
    }

    fn transition(&mut self, authenticated: bool) -> bool {
        if authenticated == self.authenticated {
            return false;
        }
        self.authenticated = authenticated;
        self.current = Self::landing(authenticated);
        tracing::debug!(screen = self.current.title(), "session changed");
        true
    }

    fn landing(authenticated: bool) -> Screen {
        if authenticated {
            Screen::Missions
        } else {
            Screen::Login
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::{FileStore, MemoryStore, UserInfo};

    #[tokio::test]
    async fn test_starts_on_login_without_session() {
        let session = SessionStore::open(MemoryStore::new()).await;
        let mut shell = NavigationShell::start(&session).await;

        assert!(!shell.is_authenticated());
        assert_eq!(shell.current(), Screen::Login);
        assert_eq!(shell.tabs(), &[Screen::Login]);
        assert_eq!(
            shell.navigate(Screen::Missions),
            Err(AppError::AuthorizationMissing)
        );
        assert_eq!(shell.current(), Screen::Login);
    }

    #[tokio::test]
    async fn test_restored_session_opens_tabs() {
        let dir = tempfile::tempdir().unwrap();
        {
            let session = SessionStore::open(FileStore::new(dir.path().to_path_buf())).await;
            session.set("abc123", &UserInfo::default()).await.unwrap();
        }

        let session = SessionStore::open(FileStore::new(dir.path().to_path_buf())).await;
        let mut shell = NavigationShell::start(&session).await;
        assert_eq!(shell.current(), Screen::Missions);
        assert_eq!(shell.tabs().len(), 5);
        assert_eq!(shell.navigate(Screen::Profile), Ok(Screen::Profile));
        assert!(shell.navigate(Screen::Login).is_err());
    }

    #[tokio::test]
    async fn test_sync_follows_login_and_logout() {
        let session = SessionStore::open(MemoryStore::new()).await;
        let mut shell = NavigationShell::start(&session).await;
        assert!(!shell.sync());

        session.set("abc123", &UserInfo::default()).await.unwrap();
        assert!(shell.sync());
        assert_eq!(shell.current(), Screen::Missions);
        shell.navigate(Screen::Notifications).unwrap();

        // A second login keeps the user where they are.
        session.set("def456", &UserInfo::default()).await.unwrap();
        assert!(!shell.sync());
        assert_eq!(shell.current(), Screen::Notifications);

        session.clear().await.unwrap();
        assert!(shell.sync());
        assert_eq!(shell.current(), Screen::Login);
    }

    #[tokio::test]
    async fn test_changed_wakes_on_logout() {
        let session = SessionStore::open(MemoryStore::new()).await;
        session.set("abc123", &UserInfo::default()).await.unwrap();
        let mut shell = NavigationShell::start(&session).await;

        let (woke, cleared) = tokio::join!(shell.changed(), session.clear());
        assert!(woke);
        cleared.unwrap();
        assert!(!shell.is_authenticated());
        assert_eq!(shell.current(), Screen::Login);
    }
}
