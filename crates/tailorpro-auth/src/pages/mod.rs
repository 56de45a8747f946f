//! Form state for the login and signup pages.
//!
//! A page owns the channel selector, the field values, and a loading flag
//! that is raised for the duration of a submit. Submitting takes `&mut self`
//! and refuses to start while the flag is raised or the page is not ready,
//! so a page never runs two flows at once.

mod login;
mod signup;

pub use login::LoginPage;
pub use signup::SignupPage;

use tailorpro_core::RouteTarget;
use tokio::sync::watch;

/// Lifecycle of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePhase {
    /// Session check still running; the form is not shown.
    CheckingSession,
    /// Form accepts input.
    Ready,
    /// The user was sent to an application area.
    Redirected(RouteTarget),
}

/// Raises the loading flag until dropped.
struct LoadingGuard<'a> {
    flag: &'a watch::Sender<bool>,
}

impl<'a> LoadingGuard<'a> {
    fn raise(flag: &'a watch::Sender<bool>) -> Self {
        flag.send_replace(true);
        Self { flag }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.flag.send_replace(false);
    }
}
