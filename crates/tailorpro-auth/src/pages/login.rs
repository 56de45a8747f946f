//! Login page.

use std::sync::Arc;

use secrecy::SecretString;
use tailorpro_core::{Channel, Credentials, RouteTarget};
use tokio::sync::watch;

use super::{LoadingGuard, PagePhase};
use crate::error::FlowError;
use crate::flows::{AuthFlows, BootstrapOutcome};

/// Login form with a four-way channel selector.
pub struct LoginPage {
    flows: Arc<AuthFlows>,
    channel: Channel,
    email: String,
    password: SecretString,
    phase: PagePhase,
    loading: watch::Sender<bool>,
}

impl LoginPage {
    /// Create a page that still has to check for an existing session.
    #[must_use]
    pub fn new(flows: Arc<AuthFlows>) -> Self {
        let (loading, _) = watch::channel(false);
        Self {
            flows,
            channel: Channel::default(),
            email: String::new(),
            password: SecretString::new(String::new().into_boxed_str()),
            phase: PagePhase::CheckingSession,
            loading,
        }
    }

    /// Run the session check. Must complete before the form is interactive.
    ///
    /// Calling it again after the check has finished returns the cached
    /// phase without contacting the provider.
    pub async fn open(&mut self) -> BootstrapOutcome {
        match self.phase {
            PagePhase::Redirected(target) => return BootstrapOutcome::Redirected(target),
            PagePhase::Ready => return BootstrapOutcome::Unauthenticated,
            PagePhase::CheckingSession => {}
        }

        let outcome = self.flows.bootstrap().await;
        self.phase = match outcome {
            BootstrapOutcome::Redirected(target) => PagePhase::Redirected(target),
            BootstrapOutcome::Unauthenticated | BootstrapOutcome::NoRecognizedRole => {
                PagePhase::Ready
            }
        };
        outcome
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> PagePhase {
        self.phase
    }

    /// Selected channel.
    #[must_use]
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// Switch tabs. Ignored while a submit is in flight.
    pub fn select_channel(&mut self, channel: Channel) {
        if !self.is_loading() {
            self.channel = channel;
        }
    }

    /// Set the email field.
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    /// Set the password field.
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = SecretString::new(password.into().into_boxed_str());
    }

    /// Whether a submit is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Watch the loading flag, e.g. to disable the submit control.
    #[must_use]
    pub fn loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Whether the form currently accepts a submit.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.phase == PagePhase::Ready && !self.is_loading()
    }

    /// Submit the form through the selected channel.
    ///
    /// Failures are reported through the notifier and returned.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::NotInteractive` without contacting any
    /// collaborator if the page is not ready, otherwise the sign-in error.
    pub async fn submit(&mut self) -> Result<RouteTarget, FlowError> {
        if !self.is_interactive() {
            return Err(FlowError::NotInteractive);
        }

        let credentials = Credentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        };
        let channel = self.channel;

        let result = {
            let _loading = LoadingGuard::raise(&self.loading);
            self.flows.sign_in(&credentials, channel).await
        };

        match result {
            Ok(target) => {
                self.phase = PagePhase::Redirected(target);
                Ok(target)
            }
            Err(e) => {
                self.flows.report_failure(&e);
                Err(e)
            }
        }
    }
}
