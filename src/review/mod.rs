//! Collaborative block-by-block review of imported documents.
//!
//! A session wraps one import's block skeleton; owners and reviewers
//! approve, reject, or edit blocks, and finalize materializes the accepted
//! blocks into an immutable [`Document`](crate::model::Document).

mod activity;
mod engine;
mod session;

pub use activity::{ActivityAction, ActivityEntry, ActivityLog};
pub use engine::{
    BlockChange, BulkAction, CreateSession, Decision, ReviewEngine, SessionView,
};
pub use session::{
    BlockReview, Collaborator, Comment, ReviewSession, ReviewState, Role, SessionStatus,
};
