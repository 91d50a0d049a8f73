//! Review session aggregate types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::BlockType;

/// Lifecycle status of a review session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Open for review
    InProgress,
    /// Finalized into a permanent document; read-only history
    Imported,
    /// Soft-cancelled; rows retained for audit
    Cancelled,
}

/// The root aggregate wrapping one import's block-by-block review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSession {
    /// Session id
    pub id: String,

    /// Originating import job id, if the caller tracked one
    pub job_id: Option<String>,

    /// The creating user; always the single owner collaborator
    pub owner: String,

    /// Working document title
    pub title: String,

    /// Current status
    pub status: SessionStatus,

    /// The permanent document id, set by finalize
    pub document_id: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,

    /// Optional expiry, enforced by an external reaper
    pub expires_at: Option<DateTime<Utc>>,
}

/// Per-block review state.
///
/// The edited content lives inside the `Edited` variant, so "current content
/// present but status is pending" is unrepresentable by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReviewState {
    /// Not yet reviewed
    Pending,
    /// Accepted as converted
    Approved {
        /// Reviewing user
        reviewer: String,
        /// Decision timestamp
        at: DateTime<Utc>,
    },
    /// Excluded from the final document
    Rejected {
        /// Reviewing user
        reviewer: String,
        /// Decision timestamp
        at: DateTime<Utc>,
    },
    /// Accepted with replacement content
    Edited {
        /// Reviewing user
        reviewer: String,
        /// Decision timestamp
        at: DateTime<Utc>,
        /// Replacement content
        content: String,
        /// Replacement block type
        block_type: BlockType,
    },
}

impl ReviewState {
    /// Whether this block still awaits a decision.
    pub fn is_pending(&self) -> bool {
        matches!(self, ReviewState::Pending)
    }

    /// Whether the block will be excluded from the final document.
    pub fn is_rejected(&self) -> bool {
        matches!(self, ReviewState::Rejected { .. })
    }

    /// Short label for logs and activity payloads.
    pub fn label(&self) -> &'static str {
        match self {
            ReviewState::Pending => "pending",
            ReviewState::Approved { .. } => "approved",
            ReviewState::Rejected { .. } => "rejected",
            ReviewState::Edited { .. } => "edited",
        }
    }
}

/// One block under review. Created with the session, never added, removed,
/// or reordered afterwards; editing is in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockReview {
    /// Stable block id, independent of array position
    pub block_id: String,

    /// Zero-based position in the session's block list
    pub index: usize,

    /// Review state
    pub state: ReviewState,

    /// Immutable content snapshot from conversion
    pub original_content: String,

    /// Immutable type snapshot from conversion
    pub original_type: BlockType,

    /// Optional annotator confidence score
    pub confidence: Option<f32>,

    /// Conversion warnings attached to the block
    pub warnings: Vec<String>,

    /// Sort order carried into the final document
    pub sort_order: u32,

    /// Nesting depth carried into the final document
    pub depth: u8,
}

impl BlockReview {
    /// The content finalize would import for this block.
    pub fn effective_content(&self) -> &str {
        match &self.state {
            ReviewState::Edited { content, .. } => content,
            _ => &self.original_content,
        }
    }

    /// The block type finalize would import for this block.
    pub fn effective_type(&self) -> &BlockType {
        match &self.state {
            ReviewState::Edited { block_type, .. } => block_type,
            _ => &self.original_type,
        }
    }
}

/// Collaborator role within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The session creator; exactly one per session, cannot be removed
    Owner,
    /// May review and finalize
    Reviewer,
    /// Read access and comments only
    Viewer,
}

impl Role {
    /// Whether this role may mutate block content and finalize.
    pub fn can_review(self) -> bool {
        matches!(self, Role::Owner | Role::Reviewer)
    }
}

/// One collaborator row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collaborator {
    /// User identity
    pub user_id: String,

    /// Role in this session
    pub role: Role,

    /// Who invited this collaborator
    pub invited_by: String,

    /// Invitation timestamp
    pub invited_at: DateTime<Utc>,

    /// Last time this user touched the session
    pub last_active_at: DateTime<Utc>,
}

/// A comment anchored to a block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Comment id
    pub id: String,

    /// The block the comment is anchored to
    pub block_id: String,

    /// Comment author
    pub author: String,

    /// Comment text
    pub content: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Resolution marker: resolver identity and timestamp
    pub resolved: Option<(String, DateTime<Utc>)>,
}

impl Comment {
    /// Whether the comment has been resolved.
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edited_state_carries_content() {
        let block = BlockReview {
            block_id: "blk-0001".to_string(),
            index: 0,
            state: ReviewState::Edited {
                reviewer: "alice".to_string(),
                at: Utc::now(),
                content: "fixed".to_string(),
                block_type: BlockType::Paragraph,
            },
            original_content: "orig".to_string(),
            original_type: BlockType::Paragraph,
            confidence: None,
            warnings: vec![],
            sort_order: 0,
            depth: 0,
        };
        assert_eq!(block.effective_content(), "fixed");
        assert!(!block.state.is_pending());
    }

    #[test]
    fn test_pending_uses_original() {
        let block = BlockReview {
            block_id: "blk-0001".to_string(),
            index: 0,
            state: ReviewState::Pending,
            original_content: "orig".to_string(),
            original_type: BlockType::Heading { level: 1 },
            confidence: None,
            warnings: vec![],
            sort_order: 0,
            depth: 0,
        };
        assert_eq!(block.effective_content(), "orig");
        assert_eq!(block.effective_type(), &BlockType::Heading { level: 1 });
    }

    #[test]
    fn test_role_gates() {
        assert!(Role::Owner.can_review());
        assert!(Role::Reviewer.can_review());
        assert!(!Role::Viewer.can_review());
    }

    #[test]
    fn test_state_serde_tag() {
        let state = ReviewState::Approved {
            reviewer: "alice".to_string(),
            at: Utc::now(),
        };
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"status\":\"approved\""));
    }
}
