//! # Workflows
//!
//! Concrete pipelines built from validated request input, and the mapping of
//! their results to caller-facing outcomes.

pub mod invite_request;
pub mod membership;
pub mod org_invite;

pub use invite_request::request_invitation;
pub use membership::{membership_pipeline, MembershipInput, MembershipOutcome, MembershipServices};
pub use org_invite::{org_invite_pipeline, OrgInviteInput, OrgInviteOutcome};
