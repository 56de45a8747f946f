//! Signup page.

use std::sync::Arc;

use secrecy::SecretString;
use tailorpro_core::{RegistrationProfile, SignUpChannel};
use tokio::sync::watch;

use super::{LoadingGuard, PagePhase};
use crate::error::FlowError;
use crate::flows::{AuthFlows, SignUpOutcome};

/// Registration form with a customer/staff selector.
pub struct SignupPage {
    flows: Arc<AuthFlows>,
    channel: SignUpChannel,
    email: String,
    password: SecretString,
    full_name: String,
    phone: String,
    phase: PagePhase,
    loading: watch::Sender<bool>,
}

impl SignupPage {
    /// Create an empty registration form.
    #[must_use]
    pub fn new(flows: Arc<AuthFlows>) -> Self {
        let (loading, _) = watch::channel(false);
        Self {
            flows,
            channel: SignUpChannel::default(),
            email: String::new(),
            password: SecretString::new(String::new().into_boxed_str()),
            full_name: String::new(),
            phone: String::new(),
            phase: PagePhase::Ready,
            loading,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> PagePhase {
        self.phase
    }

    /// Selected channel.
    #[must_use]
    pub const fn channel(&self) -> SignUpChannel {
        self.channel
    }

    /// Switch tabs. Ignored while a submit is in flight.
    pub fn select_channel(&mut self, channel: SignUpChannel) {
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

    /// Set the full name field.
    pub fn set_full_name(&mut self, full_name: impl Into<String>) {
        self.full_name = full_name.into();
    }

    /// Set the phone field. Empty means none.
    pub fn set_phone(&mut self, phone: impl Into<String>) {
        self.phone = phone.into();
    }

    /// Whether a submit is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Watch the loading flag.
    #[must_use]
    pub fn loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Whether the form currently accepts a submit.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.phase == PagePhase::Ready && !self.is_loading()
    }

    /// Submit the registration.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::NotInteractive` if the page is not ready,
    /// otherwise the sign-up error (also reported through the notifier).
    pub async fn submit(&mut self) -> Result<SignUpOutcome, FlowError> {
        if !self.is_interactive() {
            return Err(FlowError::NotInteractive);
        }

        let phone = self.phone.trim();
        let profile = RegistrationProfile {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            full_name: self.full_name.trim().to_string(),
            phone: (!phone.is_empty()).then(|| phone.to_string()),
        };
        let channel = self.channel;

        let result = {
            let _loading = LoadingGuard::raise(&self.loading);
            self.flows.sign_up(&profile, channel).await
        };

        match result {
            Ok(outcome) => {
                self.phase = PagePhase::Redirected(outcome.target);
                Ok(outcome)
            }
            Err(e) => {
                self.flows.report_failure(&e);
                Err(e)
            }
        }
    }
}
