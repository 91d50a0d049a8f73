//! Append-only activity log.
//!
//! Every session mutation appends exactly one entry; the log is the
//! canonical audit trail and is never edited or truncated independently of
//! session deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The action recorded by one activity entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActivityAction {
    /// Session created with its block set
    SessionCreated {
        /// Number of blocks under review
        block_count: usize,
    },
    /// A block was approved
    BlockApproved,
    /// A block was rejected
    BlockRejected,
    /// A block was edited with replacement content
    BlockEdited,
    /// A block was reset to pending
    BlockReset,
    /// A bulk action ran
    BulkAction {
        /// Action name
        name: String,
        /// Rows actually mutated
        affected: usize,
    },
    /// A comment was added
    CommentAdded,
    /// A comment was resolved or unresolved
    CommentResolved {
        /// New resolution state
        resolved: bool,
    },
    /// A comment was deleted
    CommentDeleted,
    /// A collaborator was added or had their role changed
    CollaboratorAdded {
        /// Granted role
        role: String,
    },
    /// A collaborator was removed
    CollaboratorRemoved,
    /// The session was finalized into a permanent document
    Finalized {
        /// Blocks imported
        imported: usize,
        /// Blocks skipped (rejected)
        skipped: usize,
    },
    /// The session was soft-cancelled
    Cancelled,
}

/// One audit trail entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Entry id
    pub id: String,

    /// Acting user
    pub actor: String,

    /// What happened
    #[serde(flatten)]
    pub action: ActivityAction,

    /// Affected block id, when the action targets one block
    pub block_id: Option<String>,

    /// When it happened
    pub at: DateTime<Utc>,

    /// Free-form detail payload
    pub detail: Option<String>,
}

/// Append-only container for a session's activity entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityLog {
    entries: Vec<ActivityEntry>,
}

impl ActivityLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry. There is intentionally no way to edit or remove
    /// entries.
    pub fn append(
        &mut self,
        actor: &str,
        action: ActivityAction,
        block_id: Option<String>,
        detail: Option<String>,
    ) -> &ActivityEntry {
        self.entries.push(ActivityEntry {
            id: Uuid::new_v4().to_string(),
            actor: actor.to_string(),
            action,
            block_id,
            at: Utc::now(),
            detail,
        });
        self.entries.last().unwrap()
    }

    /// All entries in append order.
    pub fn entries(&self) -> &[ActivityEntry] {
        &self.entries
    }

    /// Entries at or after `since`, in append order.
    pub fn since(&self, since: DateTime<Utc>) -> Vec<ActivityEntry> {
        self.entries
            .iter()
            .filter(|e| e.at >= since)
            .cloned()
            .collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_order_and_unique_ids() {
        let mut log = ActivityLog::new();
        log.append("alice", ActivityAction::BlockApproved, Some("b1".into()), None);
        log.append("bob", ActivityAction::BlockRejected, Some("b2".into()), None);

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].actor, "alice");
        assert_ne!(log.entries()[0].id, log.entries()[1].id);
    }

    #[test]
    fn test_since_filter() {
        let mut log = ActivityLog::new();
        log.append("alice", ActivityAction::BlockApproved, None, None);
        let cutoff = log.entries()[0].at;
        // Entries at the cutoff instant are included.
        assert_eq!(log.since(cutoff).len(), 1);
        assert!(log
            .since(cutoff + chrono::Duration::seconds(1))
            .is_empty());
    }

    #[test]
    fn test_action_serde_tag() {
        let mut log = ActivityLog::new();
        log.append(
            "alice",
            ActivityAction::BulkAction {
                name: "approve_all".to_string(),
                affected: 3,
            },
            None,
            None,
        );
        let json = serde_json::to_string(log.entries()).unwrap();
        assert!(json.contains("\"action\":\"bulk_action\""));
        assert!(json.contains("\"name\":\"approve_all\""));
        assert!(json.contains("\"affected\":3"));
    }

    #[test]
    fn test_bulk_action_roundtrip() {
        let action = ActivityAction::BulkAction {
            name: "reject_selected".to_string(),
            affected: 2,
        };
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(
            json,
            r#"{"action":"bulk_action","name":"reject_selected","affected":2}"#
        );
        let back: ActivityAction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, action);
    }
}
