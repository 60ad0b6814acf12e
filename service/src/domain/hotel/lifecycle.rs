//! Moderation lifecycle of a [`Hotel`] listing.
//!
//! ```text
//!             Submit              Approve             Offline
//!   Draft ───────────► Pending ───────────► Approved ─────────► Offline
//!                       ▲   │                   ▲                  │
//!                Submit │   │ Reject            └──────────────────┘
//!                       │   ▼                          Online
//!                     Rejected
//! ```
//!
//! [`Transition::Submit`] is performed by the owning merchant, all the other
//! [`Transition`]s by any admin. No role may bypass the state table.

use common::define_kind;
use derive_more::{AsRef, Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use strum::EnumDiscriminants;

use crate::domain::user::{self, Role};

use super::Hotel;

define_kind! {
    #[doc = "Moderation status of a [`Hotel`]."]
    enum Status {
        #[doc = "Being prepared by its merchant, not reviewed yet."]
        Draft = 1,

        #[doc = "Submitted and awaiting a review."]
        Pending = 2,

        #[doc = "Approved and publicly listed."]
        Approved = 3,

        #[doc = "Rejected by a review, may be resubmitted."]
        Rejected = 4,

        #[doc = "Withdrawn from the public listing by an admin."]
        Offline = 5,
    }
}

impl Status {
    /// Indicates whether a [`Hotel`] in this [`Status`] is visible to the
    /// public.
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Approved)
    }

    /// Returns the [`Status`] the provided [`TransitionKind`] leads to from
    /// this one, if the [`TransitionKind`] is allowed here.
    #[must_use]
    pub const fn next(self, transition: TransitionKind) -> Option<Self> {
        use Status as S;
        use TransitionKind as T;

        match (self, transition) {
            (S::Draft | S::Rejected, T::Submit) => Some(S::Pending),
            (S::Pending, T::Approve) => Some(S::Approved),
            (S::Pending, T::Reject) => Some(S::Rejected),
            (S::Approved, T::TakeOffline) => Some(S::Offline),
            (S::Offline, T::BringOnline) => Some(S::Approved),
            (
                S::Draft | S::Approved | S::Rejected | S::Offline,
                T::Approve | T::Reject,
            )
            | (S::Pending | S::Approved | S::Offline, T::Submit)
            | (
                S::Draft | S::Pending | S::Rejected | S::Offline,
                T::TakeOffline,
            )
            | (
                S::Draft | S::Pending | S::Approved | S::Rejected,
                T::BringOnline,
            ) => None,
        }
    }
}

/// Requested change of a [`Hotel`] [`Status`].
#[derive(Clone, Debug, EnumDiscriminants, Eq, PartialEq)]
#[strum_discriminants(
    name(TransitionKind),
    derive(strum::Display, Hash),
    strum(serialize_all = "SCREAMING_SNAKE_CASE")
)]
pub enum Transition {
    /// Submits a [`Status::Draft`] or [`Status::Rejected`] [`Hotel`] for a
    /// review.
    Submit,

    /// Approves a [`Status::Pending`] [`Hotel`].
    Approve,

    /// Rejects a [`Status::Pending`] [`Hotel`] for the [`RejectReason`].
    Reject(RejectReason),

    /// Takes an [`Status::Approved`] [`Hotel`] offline.
    TakeOffline,

    /// Brings an [`Status::Offline`] [`Hotel`] back online.
    BringOnline,
}

impl Transition {
    /// Returns the [`TransitionKind`] of this [`Transition`].
    #[must_use]
    pub fn kind(&self) -> TransitionKind {
        self.into()
    }
}

impl TransitionKind {
    /// All the [`TransitionKind`]s.
    pub const ALL: [Self; 5] = [
        Self::Submit,
        Self::Approve,
        Self::Reject,
        Self::TakeOffline,
        Self::BringOnline,
    ];

    /// Returns the [`Role`] allowed to perform this [`TransitionKind`].
    #[must_use]
    pub const fn actor(self) -> Role {
        match self {
            Self::Submit => Role::Merchant,
            Self::Approve
            | Self::Reject
            | Self::TakeOffline
            | Self::BringOnline => Role::Admin,
        }
    }
}

/// Reason of a [`Hotel`] rejection.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct RejectReason(String);

impl RejectReason {
    /// Reason used when an admin rejects a [`Hotel`] without giving one
    /// ("did not pass the review").
    pub const DEFAULT: &'static str = "未通过审核";

    /// Maximum length in characters.
    pub const MAX_LEN: usize = 1024;

    /// Creates a new [`RejectReason`] if the given `reason` is non-empty
    /// after trimming and not too long.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Option<Self> {
        let reason = reason.into();
        let reason = reason.trim();
        (!reason.is_empty() && reason.chars().count() <= Self::MAX_LEN)
            .then(|| Self(reason.to_owned()))
    }

    /// Creates a new [`RejectReason`] out of the given `reason`, falling back
    /// to the [`RejectReason::DEFAULT`] one if it's missing or blank.
    ///
    /// Returns [`None`] only if the `reason` is too long.
    #[must_use]
    pub fn or_default(reason: Option<impl Into<String>>) -> Option<Self> {
        let reason = reason.map(Into::into).unwrap_or_default();
        if reason.trim().is_empty() {
            Some(Self::default())
        } else {
            Self::new(reason)
        }
    }
}

impl Default for RejectReason {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl Hotel {
    /// Applies the provided [`Transition`] on behalf of the provided
    /// [`user::Initiator`].
    ///
    /// Checks, in order, that the [`user::Initiator`] has the [`Role`] the
    /// [`Transition`] requires, that a merchant submits its own [`Hotel`],
    /// and that the current [`Status`] allows the [`Transition`]. Nothing is
    /// changed on failure.
    ///
    /// On success sets the new [`Status`], records or clears the
    /// [`RejectReason`] and refreshes [`Hotel::updated_at`].
    ///
    /// # Errors
    ///
    /// - [`TransitionError::Forbidden`] if the [`user::Initiator`] is not
    ///   allowed to perform the [`Transition`] upon this [`Hotel`];
    /// - [`TransitionError::InvalidState`] if the [`Transition`] is not
    ///   allowed from the current [`Status`].
    pub fn transit(
        &mut self,
        transition: Transition,
        initiator: &user::Initiator,
    ) -> Result<(), TransitionError> {
        let kind = transition.kind();

        if initiator.role != kind.actor() {
            return Err(TransitionError::Forbidden(kind));
        }
        if kind == TransitionKind::Submit && !self.is_owned_by(initiator) {
            return Err(TransitionError::Forbidden(kind));
        }
        let status = self.status.next(kind).ok_or(
            TransitionError::InvalidState {
                status: self.status,
                transition: kind,
            },
        )?;

        self.reject_reason = match transition {
            Transition::Reject(reason) => Some(reason),
            Transition::Submit
            | Transition::Approve
            | Transition::TakeOffline
            | Transition::BringOnline => None,
        };
        self.status = status;
        self.touch();

        Ok(())
    }
}

/// Error of applying a [`Transition`] to a [`Hotel`].
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
pub enum TransitionError {
    /// Initiator is not allowed to perform the [`Transition`].
    #[display("not allowed to `{_0}` this `Hotel`")]
    Forbidden(#[error(not(source))] TransitionKind),

    /// [`Transition`] is not allowed from the current [`Status`].
    #[display("cannot `{transition}` a `{status}` `Hotel`")]
    InvalidState {
        /// Current [`Status`] of the [`Hotel`].
        status: Status,

        /// Attempted [`TransitionKind`].
        transition: TransitionKind,
    },
}
