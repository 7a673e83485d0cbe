use alloy_primitives::TxHash;
use client::TxConfirmation;
use std::fmt;

/// Where a session is in the connect → approve → bridge flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowState {
    /// Allowance does not cover the amount (or has not been read yet)
    #[default]
    Idle,
    /// Approval transaction submitted, waiting for confirmation
    AwaitingApproval,
    /// Allowance covers the amount; the bridge step is next
    Approved,
    /// Bridge deposit submitted, waiting for confirmation
    Bridging,
    /// Bridge deposit confirmed. Terminal.
    Complete { tx_hash: TxHash },
}

impl FlowState {
    /// A step is in flight.
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::AwaitingApproval | Self::Bridging)
    }

    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::AwaitingApproval => write!(f, "awaiting-approval"),
            Self::Approved => write!(f, "approved"),
            Self::Bridging => write!(f, "bridging"),
            Self::Complete { .. } => write!(f, "complete"),
        }
    }
}

/// Outcome of one successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The approval was confirmed
    Approved(TxConfirmation),
    /// The bridge deposit was confirmed
    Bridged(TxConfirmation),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(FlowState::Idle.to_string(), "idle");
        assert_eq!(FlowState::AwaitingApproval.to_string(), "awaiting-approval");
        assert_eq!(FlowState::Approved.to_string(), "approved");
        assert_eq!(FlowState::Bridging.to_string(), "bridging");
        assert_eq!(
            FlowState::Complete {
                tx_hash: TxHash::ZERO
            }
            .to_string(),
            "complete"
        );
    }

    #[test]
    fn test_busy_states() {
        assert!(FlowState::AwaitingApproval.is_busy());
        assert!(FlowState::Bridging.is_busy());
        assert!(!FlowState::Idle.is_busy());
        assert!(!FlowState::Approved.is_busy());
        assert!(!FlowState::default().is_complete());
    }
}
