//! Moderation state machine.
//!
//! Moderation status gates public visibility and is tracked separately
//! from commercial availability. Every transition yields both the new
//! moderation record and the availability it implies, so callers apply
//! the pair in one write and never leave a contradictory combination.
//!
//! The machine records who acted but has no notion of roles; role checks
//! happen in the service layer before a transition is requested.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gemhub_core::error::AppError;
use gemhub_core::result::AppResult;
use gemhub_core::types::UserId;

use super::commerce::AvailabilityStatus;

catalog_enum! {
    /// Approval lifecycle of a product.
    ModerationStatus("moderation status") {
        /// Awaiting review.
        Pending => "pending",
        /// Visible to buyers once available.
        Approved => "approved",
        /// Refused, with a reason.
        Rejected => "rejected",
        /// Sent back to the operator by a manual override.
        NeedsRevision => "needs-revision",
    }
}

impl ModerationStatus {
    /// Availability statuses that may accompany this moderation status.
    pub fn allowed_availability(&self) -> &'static [AvailabilityStatus] {
        use AvailabilityStatus::*;
        match self {
            Self::Pending => &[Pending],
            Self::Approved => &[Available, Reserved, Sold, OnHold, Archived],
            Self::Rejected => &[Archived],
            Self::NeedsRevision => &[Pending, OnHold],
        }
    }

    /// Check whether the pair is a consistent combination.
    pub fn permits(&self, availability: AvailabilityStatus) -> bool {
        self.allowed_availability().contains(&availability)
    }
}

/// Moderation sub-document of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Moderation {
    /// Current status.
    pub status: ModerationStatus,
    /// Who last approved or rejected the product.
    #[serde(default)]
    pub approved_by: Option<UserId>,
    /// When that decision was made.
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
    /// Reason given for the last rejection.
    #[serde(default)]
    pub rejection_reason: Option<String>,
    /// Reviewer notes, not shown to buyers.
    #[serde(default)]
    pub internal_notes: Option<String>,
}

impl Default for Moderation {
    fn default() -> Self {
        Self::pending()
    }
}

/// A requested moderation transition.
#[derive(Debug, Clone, PartialEq)]
pub enum ModerationAction {
    /// Approve for sale.
    Approve {
        /// The approving caller.
        approver: UserId,
    },
    /// Reject with a mandatory reason.
    Reject {
        /// The rejecting caller.
        approver: UserId,
        /// Why the product was rejected.
        reason: String,
    },
    /// Manual override sending the product back for rework.
    RequestRevision {
        /// The reviewing caller.
        reviewer: UserId,
        /// Optional note for the operator.
        note: Option<String>,
    },
    /// Re-enter review after an edit by a non-top-role operator.
    Resubmit,
}

/// The result of a transition: the new record and the availability it
/// implies.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Moderation record after the transition.
    pub moderation: Moderation,
    /// Availability to store alongside it.
    pub availability: AvailabilityStatus,
}

impl Moderation {
    /// A fresh, unreviewed record.
    pub fn pending() -> Self {
        Self {
            status: ModerationStatus::Pending,
            approved_by: None,
            approved_at: None,
            rejection_reason: None,
            internal_notes: None,
        }
    }

    /// A record approved at creation time.
    pub fn approved(approver: UserId, at: DateTime<Utc>) -> Self {
        Self {
            status: ModerationStatus::Approved,
            approved_by: Some(approver),
            approved_at: Some(at),
            ..Self::pending()
        }
    }

    /// Compute the transition for `action` without mutating `self`.
    ///
    /// Invalid input (empty rejection reason) is a validation error and
    /// repeating the current decision is a conflict; neither changes
    /// anything.
    pub fn transition(&self, action: &ModerationAction, at: DateTime<Utc>) -> AppResult<Transition> {
        match action {
            ModerationAction::Approve { approver } => {
                if self.status == ModerationStatus::Approved {
                    return Err(AppError::conflict("Product is already approved"));
                }
                Ok(Transition {
                    moderation: Self {
                        status: ModerationStatus::Approved,
                        approved_by: Some(*approver),
                        approved_at: Some(at),
                        rejection_reason: None,
                        internal_notes: self.internal_notes.clone(),
                    },
                    availability: AvailabilityStatus::Available,
                })
            }
            ModerationAction::Reject { approver, reason } => {
                let reason = reason.trim();
                if reason.is_empty() {
                    return Err(AppError::validation("Rejection reason is required"));
                }
                if self.status == ModerationStatus::Rejected {
                    return Err(AppError::conflict("Product is already rejected"));
                }
                Ok(Transition {
                    moderation: Self {
                        status: ModerationStatus::Rejected,
                        approved_by: Some(*approver),
                        approved_at: Some(at),
                        rejection_reason: Some(reason.to_string()),
                        internal_notes: self.internal_notes.clone(),
                    },
                    availability: AvailabilityStatus::Archived,
                })
            }
            ModerationAction::RequestRevision { reviewer, note } => {
                if self.status == ModerationStatus::NeedsRevision {
                    return Err(AppError::conflict("Product already needs revision"));
                }
                Ok(Transition {
                    moderation: Self {
                        status: ModerationStatus::NeedsRevision,
                        approved_by: Some(*reviewer),
                        approved_at: Some(at),
                        rejection_reason: self.rejection_reason.clone(),
                        internal_notes: note.clone().or_else(|| self.internal_notes.clone()),
                    },
                    availability: AvailabilityStatus::Pending,
                })
            }
            ModerationAction::Resubmit => Ok(Transition {
                moderation: Self {
                    status: ModerationStatus::Pending,
                    approved_by: None,
                    approved_at: None,
                    rejection_reason: self.rejection_reason.clone(),
                    internal_notes: self.internal_notes.clone(),
                },
                availability: AvailabilityStatus::Pending,
            }),
        }
    }
}
