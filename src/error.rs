//! Error types for the docreview library.

use thiserror::Error;

/// Result type alias for docreview operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during conversion and review.
///
/// Visibility failures (`NotFound`) and authorization failures on a visible
/// resource (`PermissionDenied`) are deliberately separate variants: callers
/// must be able to report "no such session" to non-collaborators without
/// leaking that the session exists, while still telling a viewer that a write
/// was refused.
#[derive(Error, Debug)]
pub enum Error {
    /// The session does not exist, or the actor is not a collaborator on it.
    #[error("session not found")]
    NotFound,

    /// The actor can see the session but lacks the role for this operation.
    #[error("permission denied: {0} requires role {1}")]
    PermissionDenied(&'static str, &'static str),

    /// The session is not in a state that allows this transition.
    #[error("invalid session state: {0}")]
    InvalidState(String),

    /// Finalize was called without `force` while blocks are still pending.
    #[error("{0} block(s) still pending review")]
    PendingBlocks(usize),

    /// The owner collaborator row can never be removed.
    #[error("the session owner cannot be removed")]
    OwnerRemoval,

    /// A block id was not found within a visible session.
    #[error("block not found: {0}")]
    BlockNotFound(String),

    /// A comment id was not found within a visible session.
    #[error("comment not found: {0}")]
    CommentNotFound(String),

    /// A collaborator was not found within a visible session.
    #[error("collaborator not found: {0}")]
    CollaboratorNotFound(String),

    /// Duplicate block id supplied at session creation.
    #[error("duplicate block id: {0}")]
    DuplicateBlockId(String),

    /// A selection-scoped bulk action was issued without a block id list.
    #[error("bulk action {0} requires an explicit block id list")]
    MissingSelection(&'static str),

    /// Error serializing output.
    #[error("serialization error: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotFound;
        assert_eq!(err.to_string(), "session not found");

        let err = Error::PendingBlocks(3);
        assert_eq!(err.to_string(), "3 block(s) still pending review");

        let err = Error::PermissionDenied("finalize", "owner or reviewer");
        assert_eq!(
            err.to_string(),
            "permission denied: finalize requires role owner or reviewer"
        );
    }

    #[test]
    fn test_not_found_and_permission_are_distinct() {
        // The two authorization outcomes must stay distinguishable.
        let invisible = Error::NotFound;
        let readonly = Error::PermissionDenied("update block", "owner or reviewer");
        assert!(!matches!(readonly, Error::NotFound));
        assert!(matches!(invisible, Error::NotFound));
    }
}
