use std::fmt;

use serde::{Deserialize, Serialize};

/// Workflow state of an application, tracked separately from its eligibility verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    UnderReview,
    Forwarded,
    Shortlisted,
    Rejected,
    Selected,
    OfferAccepted,
    OfferDeclined,
}

/// Admin, company, and student actions that move an application through its workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusAction {
    Review,
    Forward,
    Shortlist,
    Reject,
    Select,
    AcceptOffer,
    DeclineOffer,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("cannot {action} an application that is {from}")]
    NotPermitted {
        from: ApplicationStatus,
        action: StatusAction,
    },
    #[error("offer acceptance must go through the placement policy check")]
    RequiresPolicyCheck,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Forwarded => "forwarded",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Selected => "selected",
            ApplicationStatus::OfferAccepted => "offer_accepted",
            ApplicationStatus::OfferDeclined => "offer_declined",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Rejected
                | ApplicationStatus::OfferAccepted
                | ApplicationStatus::OfferDeclined
        )
    }

    /// Next state for `action`, or an error when the workflow does not allow it from here.
    pub fn apply(self, action: StatusAction) -> Result<Self, TransitionError> {
        use ApplicationStatus::*;

        let next = match (self, action) {
            (Pending, StatusAction::Review) => UnderReview,
            (Pending | UnderReview, StatusAction::Forward) => Forwarded,
            (Forwarded, StatusAction::Shortlist) => Shortlisted,
            (Shortlisted, StatusAction::Select) => Selected,
            (Selected, StatusAction::AcceptOffer) => OfferAccepted,
            (Selected, StatusAction::DeclineOffer) => OfferDeclined,
            (from, StatusAction::Reject) if !from.is_terminal() => Rejected,
            (from, action) => return Err(TransitionError::NotPermitted { from, action }),
        };

        Ok(next)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl StatusAction {
    pub const fn label(self) -> &'static str {
        match self {
            StatusAction::Review => "review",
            StatusAction::Forward => "forward",
            StatusAction::Shortlist => "shortlist",
            StatusAction::Reject => "reject",
            StatusAction::Select => "select",
            StatusAction::AcceptOffer => "accept the offer of",
            StatusAction::DeclineOffer => "decline the offer of",
        }
    }
}

impl fmt::Display for StatusAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
