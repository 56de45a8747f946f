//! Channel/role gate.
//!
//! The one place where the selected login channel is checked against the
//! recorded role. Administrator and staff share a destination but are
//! gated independently; there is no bypass.

use crate::types::{Channel, Role, RouteTarget};

/// Outcome of a gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Role matches the channel; send the user here.
    Accept(RouteTarget),
    /// Role is absent or belongs to another channel.
    Reject,
}

impl GateDecision {
    /// Whether the gate let the user through.
    #[must_use]
    pub const fn is_accept(self) -> bool {
        matches!(self, Self::Accept(_))
    }
}

/// Check a selected channel against the recorded role.
///
/// An absent role never matches.
#[must_use]
pub fn gate(channel: Channel, role: Option<Role>) -> GateDecision {
    match role {
        Some(role) if role == channel.required_role() => GateDecision::Accept(role.route_target()),
        _ => GateDecision::Reject,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn role_for(channel: Channel) -> Role {
        match channel {
            Channel::Administrator => Role::Administrator,
            Channel::Staff => Role::Staff,
            Channel::Customer => Role::Customer,
            Channel::Deliverer => Role::Deliverer,
        }
    }

    #[test]
    fn test_exhaustive_truth_table() {
        for channel in Channel::ALL {
            for role in Role::ALL {
                let decision = gate(channel, Some(role));
                if role == role_for(channel) {
                    assert_eq!(decision, GateDecision::Accept(role.route_target()));
                } else {
                    assert_eq!(decision, GateDecision::Reject, "{channel} / {role}");
                }
            }
        }
    }

    #[test]
    fn test_admin_and_staff_share_console_but_not_access() {
        assert_eq!(
            gate(Channel::Administrator, Some(Role::Administrator)),
            GateDecision::Accept(RouteTarget::AdminConsole)
        );
        assert_eq!(
            gate(Channel::Staff, Some(Role::Staff)),
            GateDecision::Accept(RouteTarget::AdminConsole)
        );
        assert_eq!(gate(Channel::Administrator, Some(Role::Staff)), GateDecision::Reject);
        assert_eq!(gate(Channel::Staff, Some(Role::Administrator)), GateDecision::Reject);
    }

    #[test]
    fn test_own_consoles() {
        assert_eq!(
            gate(Channel::Customer, Some(Role::Customer)),
            GateDecision::Accept(RouteTarget::CustomerPortal)
        );
        assert_eq!(
            gate(Channel::Deliverer, Some(Role::Deliverer)),
            GateDecision::Accept(RouteTarget::DeliveryConsole)
        );
    }

    #[test]
    fn test_absent_role_always_rejects() {
        for channel in Channel::ALL {
            assert!(!gate(channel, None).is_accept());
        }
    }
}
