//! Channel-gated sign-in.

use tailorpro_core::{Channel, Credentials, GateDecision, RouteTarget, gate, validate_credentials};

use super::AuthFlows;
use crate::error::FlowError;
use crate::traits::NavigateOptions;

impl AuthFlows {
    /// Sign in through a channel.
    ///
    /// On success the user is navigated to the area of their role with a
    /// new history entry. A role that does not match the channel signs the
    /// fresh session out again before the error is returned, so a rejected
    /// attempt never leaves a session behind.
    ///
    /// # Errors
    ///
    /// - `FlowError::Validation` if the credentials are malformed (no provider call)
    /// - `FlowError::Auth` if the provider rejects them (no role lookup)
    /// - `FlowError::ChannelMismatch` if the gate rejects the recorded role
    pub async fn sign_in(
        &self,
        credentials: &Credentials,
        channel: Channel,
    ) -> Result<RouteTarget, FlowError> {
        validate_credentials(credentials)?;

        tracing::debug!(channel = %channel, "Signing in");
        let user_id = self.provider.sign_in(credentials).await?;

        let role = match self.directory.get_role(&user_id).await {
            Ok(record) => Some(record.role),
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Role lookup failed");
                None
            }
        };

        match gate(channel, role) {
            GateDecision::Accept(target) => {
                tracing::info!(user_id = %user_id, channel = %channel, target = %target, "Sign-in accepted");
                self.navigator.go_to(target, NavigateOptions::PUSH);
                Ok(target)
            }
            GateDecision::Reject => {
                tracing::warn!(
                    user_id = %user_id,
                    channel = %channel,
                    role = ?role,
                    "Channel does not match recorded role"
                );
                self.discard_session().await;
                Err(FlowError::ChannelMismatch { required: channel })
            }
        }
    }
}
