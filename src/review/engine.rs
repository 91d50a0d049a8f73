//! The review session engine.
//!
//! Owns every session's lifecycle: block review records, collaborators,
//! comments, the activity log, and the finalize transaction. Sessions live
//! in a map under a `RwLock`; each session's state sits behind its own
//! `Mutex`, so a block transition and its activity append always commit
//! together, concurrent mutations against one session serialize (last writer
//! wins in lock-acquisition order), and finalize holds the session lock
//! exclusively for its whole read-check-mutate step.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::element::SourceMetadata;
use crate::error::{Error, Result};
use crate::model::{BlockDraft, BlockType, DocBlock, Document, ImportStats};

use super::activity::{ActivityAction, ActivityEntry, ActivityLog};
use super::session::{
    BlockReview, Collaborator, Comment, ReviewSession, ReviewState, Role, SessionStatus,
};

/// A bulk review action over a target set of blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    /// Approve every block not already approved (edited blocks keep their
    /// content and are left untouched)
    ApproveAll,
    /// Reject every block not already rejected
    RejectAll,
    /// Reset every non-pending block to pending
    ResetAll,
    /// Approve the blocks in the explicit id list
    ApproveSelected,
    /// Reject the blocks in the explicit id list
    RejectSelected,
}

impl BulkAction {
    /// Wire/log name of the action.
    pub fn name(self) -> &'static str {
        match self {
            BulkAction::ApproveAll => "approve_all",
            BulkAction::RejectAll => "reject_all",
            BulkAction::ResetAll => "reset_all",
            BulkAction::ApproveSelected => "approve_selected",
            BulkAction::RejectSelected => "reject_selected",
        }
    }

    fn requires_selection(self) -> bool {
        matches!(self, BulkAction::ApproveSelected | BulkAction::RejectSelected)
    }
}

/// A requested change to one block review.
#[derive(Debug, Clone, Default)]
pub struct BlockChange {
    /// Bare status decision
    pub decision: Option<Decision>,
    /// Replacement content and type; presence implies the `edited` status
    pub content: Option<(String, BlockType)>,
}

/// A bare approve/reject decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Accept the block as converted
    Approve,
    /// Exclude the block from the final document
    Reject,
}

impl BlockChange {
    /// A bare approval.
    pub fn approve() -> Self {
        Self {
            decision: Some(Decision::Approve),
            content: None,
        }
    }

    /// A bare rejection.
    pub fn reject() -> Self {
        Self {
            decision: Some(Decision::Reject),
            content: None,
        }
    }

    /// An edit with replacement content and type.
    pub fn edit(content: impl Into<String>, block_type: BlockType) -> Self {
        Self {
            decision: None,
            content: Some((content.into(), block_type)),
        }
    }
}

/// Request to create a review session.
#[derive(Debug, Clone)]
pub struct CreateSession {
    /// Working document title
    pub title: String,
    /// Originating import job id
    pub job_id: Option<String>,
    /// The converted block skeleton; block ids are caller-chosen and stable
    pub blocks: Vec<BlockDraft>,
    /// Source provenance carried into the final document
    pub metadata: SourceMetadata,
    /// Optional expiry, enforced by an external reaper
    pub expires_at: Option<DateTime<Utc>>,
}

impl CreateSession {
    /// Create a request with defaults for the optional fields.
    pub fn new(title: impl Into<String>, blocks: Vec<BlockDraft>) -> Self {
        Self {
            title: title.into(),
            job_id: None,
            blocks,
            metadata: SourceMetadata::default(),
            expires_at: None,
        }
    }

    /// Set the originating job id.
    pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = Some(job_id.into());
        self
    }

    /// Set source provenance metadata.
    pub fn with_metadata(mut self, metadata: SourceMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Set an expiry timestamp.
    pub fn with_expiry(mut self, at: DateTime<Utc>) -> Self {
        self.expires_at = Some(at);
        self
    }
}

/// A caller-facing snapshot of one session.
#[derive(Debug, Clone)]
pub struct SessionView {
    /// The session row
    pub session: ReviewSession,
    /// All block reviews, in order
    pub blocks: Vec<BlockReview>,
    /// All collaborators
    pub collaborators: Vec<Collaborator>,
    /// All comments
    pub comments: Vec<Comment>,
    /// The calling user's resolved role
    pub my_role: Role,
}

struct SessionState {
    session: ReviewSession,
    metadata: SourceMetadata,
    blocks: Vec<BlockReview>,
    collaborators: Vec<Collaborator>,
    comments: Vec<Comment>,
    activity: ActivityLog,
}

impl SessionState {
    fn role_of(&self, user: &str) -> Option<Role> {
        self.collaborators
            .iter()
            .find(|c| c.user_id == user)
            .map(|c| c.role)
    }

    fn touch(&mut self, user: &str) {
        let now = Utc::now();
        self.session.updated_at = now;
        if let Some(c) = self.collaborators.iter_mut().find(|c| c.user_id == user) {
            c.last_active_at = now;
        }
    }

    fn block_mut(&mut self, block_id: &str) -> Result<&mut BlockReview> {
        self.blocks
            .iter_mut()
            .find(|b| b.block_id == block_id)
            .ok_or_else(|| Error::BlockNotFound(block_id.to_string()))
    }

    fn require_in_progress(&self) -> Result<()> {
        match self.session.status {
            SessionStatus::InProgress => Ok(()),
            SessionStatus::Imported => Err(Error::InvalidState(
                "session is already imported".to_string(),
            )),
            SessionStatus::Cancelled => {
                Err(Error::InvalidState("session is cancelled".to_string()))
            }
        }
    }
}

/// The stateful workflow manager for review sessions.
#[derive(Default)]
pub struct ReviewEngine {
    sessions: RwLock<HashMap<String, Arc<Mutex<SessionState>>>>,
}

impl ReviewEngine {
    /// Create an engine with no sessions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with its full block-review set, atomically.
    ///
    /// The creator becomes the single owner collaborator and every block
    /// starts `pending`.
    pub fn create_session(&self, actor: &str, request: CreateSession) -> Result<SessionView> {
        let mut seen = HashSet::new();
        for block in &request.blocks {
            if !seen.insert(block.id.as_str()) {
                return Err(Error::DuplicateBlockId(block.id.clone()));
            }
        }

        let now = Utc::now();
        let session_id = Uuid::new_v4().to_string();
        let blocks: Vec<BlockReview> = request
            .blocks
            .into_iter()
            .enumerate()
            .map(|(index, draft)| BlockReview {
                block_id: draft.id,
                index,
                state: ReviewState::Pending,
                original_content: draft.content,
                original_type: draft.block_type,
                confidence: draft.confidence,
                warnings: draft.warnings,
                sort_order: draft.sort_order,
                depth: draft.depth,
            })
            .collect();

        let mut state = SessionState {
            session: ReviewSession {
                id: session_id.clone(),
                job_id: request.job_id,
                owner: actor.to_string(),
                title: request.title,
                status: SessionStatus::InProgress,
                document_id: None,
                created_at: now,
                updated_at: now,
                expires_at: request.expires_at,
            },
            metadata: request.metadata,
            blocks,
            collaborators: vec![Collaborator {
                user_id: actor.to_string(),
                role: Role::Owner,
                invited_by: actor.to_string(),
                invited_at: now,
                last_active_at: now,
            }],
            comments: Vec::new(),
            activity: ActivityLog::new(),
        };
        state.activity.append(
            actor,
            ActivityAction::SessionCreated {
                block_count: state.blocks.len(),
            },
            None,
            None,
        );
        log::info!(
            "session {} created by {} with {} blocks",
            session_id,
            actor,
            state.blocks.len()
        );

        let view = view_of(&state, Role::Owner);
        self.write_sessions()
            .insert(session_id, Arc::new(Mutex::new(state)));
        Ok(view)
    }

    /// Get a session snapshot. Non-collaborators get `NotFound`, identical
    /// to a nonexistent id.
    pub fn get_session(&self, actor: &str, session_id: &str) -> Result<SessionView> {
        let entry = self.entry(session_id)?;
        let state = lock(&entry);
        let role = state.role_of(actor).ok_or(Error::NotFound)?;
        Ok(view_of(&state, role))
    }

    /// Update one block: a bare decision or an edit with replacement
    /// content. Content presence implies the `edited` status.
    pub fn update_block(
        &self,
        actor: &str,
        session_id: &str,
        block_id: &str,
        change: BlockChange,
    ) -> Result<BlockReview> {
        self.with_writer(actor, session_id, "update block", |state| {
            state.require_in_progress()?;
            let now = Utc::now();

            if let Some((content, block_type)) = change.content {
                let block = state.block_mut(block_id)?;
                block.state = ReviewState::Edited {
                    reviewer: actor.to_string(),
                    at: now,
                    content,
                    block_type,
                };
                let row = block.clone();
                state.activity.append(
                    actor,
                    ActivityAction::BlockEdited,
                    Some(block_id.to_string()),
                    Some(format!("type={}", row.effective_type().label())),
                );
                state.touch(actor);
                return Ok(row);
            }

            let decision = change
                .decision
                .ok_or_else(|| Error::InvalidState("no change requested".to_string()))?;
            let block = state.block_mut(block_id)?;
            let changed = apply_decision(block, actor, decision, now);
            let row = block.clone();
            if changed {
                let action = match decision {
                    Decision::Approve => ActivityAction::BlockApproved,
                    Decision::Reject => ActivityAction::BlockRejected,
                };
                state
                    .activity
                    .append(actor, action, Some(block_id.to_string()), None);
                state.touch(actor);
            }
            Ok(row)
        })
    }

    /// Reset one block to `pending`, clearing reviewer and edit fields.
    /// Resetting an already-pending block is a no-op.
    pub fn reset_block(
        &self,
        actor: &str,
        session_id: &str,
        block_id: &str,
    ) -> Result<BlockReview> {
        self.with_writer(actor, session_id, "reset block", |state| {
            state.require_in_progress()?;
            let block = state.block_mut(block_id)?;
            let changed = !block.state.is_pending();
            block.state = ReviewState::Pending;
            let row = block.clone();
            if changed {
                state.activity.append(
                    actor,
                    ActivityAction::BlockReset,
                    Some(block_id.to_string()),
                    None,
                );
                state.touch(actor);
            }
            Ok(row)
        })
    }

    /// Run a bulk action and return the number of rows actually mutated.
    ///
    /// Re-applying a bulk action to already-settled rows is idempotent: the
    /// second call returns 0, not an error. An unknown id in an explicit
    /// list fails the whole call with no changes.
    pub fn bulk(
        &self,
        actor: &str,
        session_id: &str,
        action: BulkAction,
        block_ids: Option<&[String]>,
    ) -> Result<usize> {
        self.with_writer(actor, session_id, "bulk action", |state| {
            state.require_in_progress()?;

            let targets: Vec<String> = match (action.requires_selection(), block_ids) {
                (true, None) => return Err(Error::MissingSelection(action.name())),
                (_, Some(ids)) => {
                    for id in ids {
                        if !state.blocks.iter().any(|b| &b.block_id == id) {
                            return Err(Error::BlockNotFound(id.clone()));
                        }
                    }
                    ids.to_vec()
                }
                (false, None) => state.blocks.iter().map(|b| b.block_id.clone()).collect(),
            };

            let now = Utc::now();
            let mut affected = 0;
            for id in &targets {
                let block = state.block_mut(id)?;
                let (changed, entry_action) = match action {
                    BulkAction::ApproveAll | BulkAction::ApproveSelected => (
                        apply_decision(block, actor, Decision::Approve, now),
                        ActivityAction::BlockApproved,
                    ),
                    BulkAction::RejectAll | BulkAction::RejectSelected => (
                        apply_decision(block, actor, Decision::Reject, now),
                        ActivityAction::BlockRejected,
                    ),
                    BulkAction::ResetAll => {
                        let changed = !block.state.is_pending();
                        block.state = ReviewState::Pending;
                        (changed, ActivityAction::BlockReset)
                    }
                };
                if changed {
                    affected += 1;
                    state
                        .activity
                        .append(actor, entry_action, Some(id.clone()), None);
                }
            }

            state.activity.append(
                actor,
                ActivityAction::BulkAction {
                    name: action.name().to_string(),
                    affected,
                },
                None,
                None,
            );
            if affected > 0 {
                state.touch(actor);
            }
            log::debug!(
                "bulk {} on session {}: {} row(s) mutated",
                action.name(),
                session_id,
                affected
            );
            Ok(affected)
        })
    }

    /// Finalize the session into a permanent document.
    ///
    /// Atomic: the session lock is held across the status read and the
    /// mutation, so a racing block edit either lands before the finalize or
    /// fails against an imported session. Rejected blocks are skipped;
    /// edited blocks import their replacement content; with `force`,
    /// pending blocks import as approved-as-is.
    pub fn finalize(
        &self,
        actor: &str,
        session_id: &str,
        title_override: Option<String>,
        force: bool,
    ) -> Result<(Document, ImportStats)> {
        self.with_writer(actor, session_id, "finalize", |state| {
            state.require_in_progress()?;

            let pending = state.blocks.iter().filter(|b| b.state.is_pending()).count();
            if pending > 0 && !force {
                return Err(Error::PendingBlocks(pending));
            }

            let blocks: Vec<DocBlock> = state
                .blocks
                .iter()
                .filter(|b| !b.state.is_rejected())
                .map(|b| DocBlock {
                    block_type: b.effective_type().clone(),
                    content: b.effective_content().to_string(),
                    sort_order: b.sort_order,
                    depth: b.depth,
                })
                .collect();
            let stats = ImportStats {
                imported: blocks.len(),
                skipped: state.blocks.len() - blocks.len(),
            };

            let document = Document {
                id: Uuid::new_v4().to_string(),
                title: title_override.unwrap_or_else(|| state.session.title.clone()),
                metadata: state.metadata.clone(),
                blocks,
                created_at: Utc::now(),
            };

            state.session.status = SessionStatus::Imported;
            state.session.document_id = Some(document.id.clone());
            state.activity.append(
                actor,
                ActivityAction::Finalized {
                    imported: stats.imported,
                    skipped: stats.skipped,
                },
                None,
                Some(format!("document {}", document.id)),
            );
            state.touch(actor);
            log::info!(
                "session {} finalized by {} into document {} ({} imported, {} skipped)",
                session_id,
                actor,
                document.id,
                stats.imported,
                stats.skipped
            );
            Ok((document, stats))
        })
    }

    /// Cancel a session. Soft cancellation flips the status and keeps every
    /// row for audit; permanent cancellation deletes the session and all
    /// dependent rows. Permanently cancelling a nonexistent session is
    /// `NotFound`, never a silent success.
    pub fn cancel(&self, actor: &str, session_id: &str, permanent: bool) -> Result<()> {
        if permanent {
            // Check visibility and role before touching the map.
            {
                let entry = self.entry(session_id)?;
                let state = lock(&entry);
                let role = state.role_of(actor).ok_or(Error::NotFound)?;
                if role != Role::Owner {
                    return Err(Error::PermissionDenied("cancel session", "owner"));
                }
            }
            self.write_sessions().remove(session_id).ok_or(Error::NotFound)?;
            log::info!("session {} permanently deleted by {}", session_id, actor);
            return Ok(());
        }

        let entry = self.entry(session_id)?;
        let mut state = lock(&entry);
        let role = state.role_of(actor).ok_or(Error::NotFound)?;
        if role != Role::Owner {
            return Err(Error::PermissionDenied("cancel session", "owner"));
        }
        state.require_in_progress()?;
        state.session.status = SessionStatus::Cancelled;
        state
            .activity
            .append(actor, ActivityAction::Cancelled, None, None);
        state.touch(actor);
        Ok(())
    }

    /// Add a collaborator, or update an existing collaborator's role. The
    /// owner's role can never be changed and a second owner cannot be added.
    pub fn add_collaborator(
        &self,
        actor: &str,
        session_id: &str,
        user_id: &str,
        role: Role,
    ) -> Result<Collaborator> {
        let entry = self.entry(session_id)?;
        let mut state = lock(&entry);
        let actor_role = state.role_of(actor).ok_or(Error::NotFound)?;
        if actor_role != Role::Owner {
            return Err(Error::PermissionDenied("manage collaborators", "owner"));
        }
        state.require_in_progress()?;
        if role == Role::Owner {
            return Err(Error::InvalidState(
                "a session has exactly one owner".to_string(),
            ));
        }

        let now = Utc::now();
        let row = if let Some(existing) = state
            .collaborators
            .iter_mut()
            .find(|c| c.user_id == user_id)
        {
            if existing.role == Role::Owner {
                return Err(Error::InvalidState(
                    "the owner's role cannot be changed".to_string(),
                ));
            }
            existing.role = role;
            existing.clone()
        } else {
            let row = Collaborator {
                user_id: user_id.to_string(),
                role,
                invited_by: actor.to_string(),
                invited_at: now,
                last_active_at: now,
            };
            state.collaborators.push(row.clone());
            row
        };

        state.activity.append(
            actor,
            ActivityAction::CollaboratorAdded {
                role: format!("{role:?}").to_lowercase(),
            },
            None,
            Some(user_id.to_string()),
        );
        state.touch(actor);
        Ok(row)
    }

    /// Remove a collaborator. The owner row is always rejected.
    pub fn remove_collaborator(
        &self,
        actor: &str,
        session_id: &str,
        user_id: &str,
    ) -> Result<()> {
        let entry = self.entry(session_id)?;
        let mut state = lock(&entry);
        let actor_role = state.role_of(actor).ok_or(Error::NotFound)?;
        if actor_role != Role::Owner {
            return Err(Error::PermissionDenied("manage collaborators", "owner"));
        }
        let target = state
            .collaborators
            .iter()
            .position(|c| c.user_id == user_id)
            .ok_or_else(|| Error::CollaboratorNotFound(user_id.to_string()))?;
        if state.collaborators[target].role == Role::Owner {
            return Err(Error::OwnerRemoval);
        }
        state.collaborators.remove(target);
        state.activity.append(
            actor,
            ActivityAction::CollaboratorRemoved,
            None,
            Some(user_id.to_string()),
        );
        state.touch(actor);
        Ok(())
    }

    /// Add a comment anchored to a block. Any collaborator may comment,
    /// including viewers.
    pub fn add_comment(
        &self,
        actor: &str,
        session_id: &str,
        block_id: &str,
        content: impl Into<String>,
    ) -> Result<Comment> {
        let entry = self.entry(session_id)?;
        let mut state = lock(&entry);
        state.role_of(actor).ok_or(Error::NotFound)?;
        state.require_in_progress()?;
        if !state.blocks.iter().any(|b| b.block_id == block_id) {
            return Err(Error::BlockNotFound(block_id.to_string()));
        }

        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            block_id: block_id.to_string(),
            author: actor.to_string(),
            content: content.into(),
            created_at: Utc::now(),
            resolved: None,
        };
        state.comments.push(comment.clone());
        state.activity.append(
            actor,
            ActivityAction::CommentAdded,
            Some(block_id.to_string()),
            None,
        );
        state.touch(actor);
        Ok(comment)
    }

    /// Set a comment's resolution flag, recording resolver and timestamp.
    pub fn resolve_comment(
        &self,
        actor: &str,
        session_id: &str,
        comment_id: &str,
        resolved: bool,
    ) -> Result<Comment> {
        let entry = self.entry(session_id)?;
        let mut state = lock(&entry);
        state.role_of(actor).ok_or(Error::NotFound)?;
        state.require_in_progress()?;

        let comment = state
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| Error::CommentNotFound(comment_id.to_string()))?;
        comment.resolved = resolved.then(|| (actor.to_string(), Utc::now()));
        let row = comment.clone();
        let block_id = row.block_id.clone();
        state.activity.append(
            actor,
            ActivityAction::CommentResolved { resolved },
            Some(block_id),
            None,
        );
        state.touch(actor);
        Ok(row)
    }

    /// Delete a comment. Only the author or the owner may delete.
    pub fn delete_comment(&self, actor: &str, session_id: &str, comment_id: &str) -> Result<()> {
        let entry = self.entry(session_id)?;
        let mut state = lock(&entry);
        let role = state.role_of(actor).ok_or(Error::NotFound)?;
        state.require_in_progress()?;

        let position = state
            .comments
            .iter()
            .position(|c| c.id == comment_id)
            .ok_or_else(|| Error::CommentNotFound(comment_id.to_string()))?;
        if state.comments[position].author != actor && role != Role::Owner {
            return Err(Error::PermissionDenied("delete comment", "author or owner"));
        }
        let removed = state.comments.remove(position);
        state.activity.append(
            actor,
            ActivityAction::CommentDeleted,
            Some(removed.block_id),
            None,
        );
        state.touch(actor);
        Ok(())
    }

    /// List activity entries, optionally starting at a timestamp.
    pub fn activity(
        &self,
        actor: &str,
        session_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<ActivityEntry>> {
        let entry = self.entry(session_id)?;
        let state = lock(&entry);
        state.role_of(actor).ok_or(Error::NotFound)?;
        Ok(match since {
            Some(since) => state.activity.since(since),
            None => state.activity.entries().to_vec(),
        })
    }

    fn entry(&self, session_id: &str) -> Result<Arc<Mutex<SessionState>>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session_id)
            .cloned()
            .ok_or(Error::NotFound)
    }

    fn write_sessions(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Arc<Mutex<SessionState>>>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a content mutation under the session lock, after the visibility
    /// and write-role checks.
    fn with_writer<T>(
        &self,
        actor: &str,
        session_id: &str,
        operation: &'static str,
        f: impl FnOnce(&mut SessionState) -> Result<T>,
    ) -> Result<T> {
        let entry = self.entry(session_id)?;
        let mut state = lock(&entry);
        let role = state.role_of(actor).ok_or(Error::NotFound)?;
        if !role.can_review() {
            return Err(Error::PermissionDenied(operation, "owner or reviewer"));
        }
        f(&mut state)
    }
}

fn lock(entry: &Arc<Mutex<SessionState>>) -> MutexGuard<'_, SessionState> {
    entry.lock().unwrap_or_else(PoisonError::into_inner)
}

fn view_of(state: &SessionState, my_role: Role) -> SessionView {
    SessionView {
        session: state.session.clone(),
        blocks: state.blocks.clone(),
        collaborators: state.collaborators.clone(),
        comments: state.comments.clone(),
        my_role,
    }
}

/// Apply a bare decision to one block. Returns whether the row changed.
///
/// A bare status change never alters content: approving an `edited` block
/// leaves it edited (already a terminal, accepted state). Rejecting
/// supersedes any prior state, including an edit.
fn apply_decision(
    block: &mut BlockReview,
    actor: &str,
    decision: Decision,
    now: DateTime<Utc>,
) -> bool {
    match decision {
        Decision::Approve => match block.state {
            ReviewState::Pending | ReviewState::Rejected { .. } => {
                block.state = ReviewState::Approved {
                    reviewer: actor.to_string(),
                    at: now,
                };
                true
            }
            ReviewState::Approved { .. } | ReviewState::Edited { .. } => false,
        },
        Decision::Reject => match block.state {
            ReviewState::Rejected { .. } => false,
            _ => {
                block.state = ReviewState::Rejected {
                    reviewer: actor.to_string(),
                    at: now,
                };
                true
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockDraft;

    fn drafts(n: usize) -> Vec<BlockDraft> {
        (0..n)
            .map(|i| {
                BlockDraft::new(
                    format!("blk-{:04}", i + 1),
                    BlockType::Paragraph,
                    format!("content {i}"),
                    i as u32,
                )
            })
            .collect()
    }

    fn engine_with_session(n: usize) -> (ReviewEngine, String) {
        let engine = ReviewEngine::new();
        let view = engine
            .create_session("alice", CreateSession::new("Doc", drafts(n)))
            .unwrap();
        (engine, view.session.id)
    }

    #[test]
    fn test_create_session_all_pending() {
        let (engine, id) = engine_with_session(3);
        let view = engine.get_session("alice", &id).unwrap();
        assert_eq!(view.blocks.len(), 3);
        assert!(view.blocks.iter().all(|b| b.state.is_pending()));
        assert_eq!(view.my_role, Role::Owner);
        assert_eq!(view.session.status, SessionStatus::InProgress);
        // Session creation is the first audit entry.
        let log = engine.activity("alice", &id, None).unwrap();
        assert!(matches!(
            log[0].action,
            ActivityAction::SessionCreated { block_count: 3 }
        ));
    }

    #[test]
    fn test_duplicate_block_id_rejected() {
        let engine = ReviewEngine::new();
        let mut blocks = drafts(2);
        blocks[1].id = blocks[0].id.clone();
        let err = engine
            .create_session("alice", CreateSession::new("Doc", blocks))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateBlockId(_)));
    }

    #[test]
    fn test_non_collaborator_sees_not_found() {
        let (engine, id) = engine_with_session(1);
        assert!(matches!(
            engine.get_session("mallory", &id),
            Err(Error::NotFound)
        ));
        // Identical to a nonexistent id.
        assert!(matches!(
            engine.get_session("alice", "no-such-session"),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn test_viewer_writes_are_permission_denied() {
        let (engine, id) = engine_with_session(2);
        engine
            .add_collaborator("alice", &id, "victor", Role::Viewer)
            .unwrap();
        let err = engine
            .update_block("victor", &id, "blk-0001", BlockChange::approve())
            .unwrap_err();
        assert!(matches!(err, Error::PermissionDenied(_, _)));
        // Viewers may still comment.
        assert!(engine.add_comment("victor", &id, "blk-0001", "nit").is_ok());
    }

    #[test]
    fn test_edit_implies_edited_state() {
        let (engine, id) = engine_with_session(1);
        let row = engine
            .update_block(
                "alice",
                &id,
                "blk-0001",
                BlockChange::edit("better", BlockType::Paragraph),
            )
            .unwrap();
        assert!(matches!(row.state, ReviewState::Edited { .. }));
        assert_eq!(row.effective_content(), "better");
        assert_eq!(row.original_content, "content 0");
    }

    #[test]
    fn test_approve_on_edited_preserves_content() {
        let (engine, id) = engine_with_session(1);
        engine
            .update_block(
                "alice",
                &id,
                "blk-0001",
                BlockChange::edit("better", BlockType::Paragraph),
            )
            .unwrap();
        let row = engine
            .update_block("alice", &id, "blk-0001", BlockChange::approve())
            .unwrap();
        assert!(matches!(row.state, ReviewState::Edited { .. }));
        assert_eq!(row.effective_content(), "better");
    }

    #[test]
    fn test_reset_clears_reviewer_fields() {
        let (engine, id) = engine_with_session(1);
        engine
            .update_block("alice", &id, "blk-0001", BlockChange::approve())
            .unwrap();
        let row = engine.reset_block("alice", &id, "blk-0001").unwrap();
        assert_eq!(row.state, ReviewState::Pending);
        // Resetting again is a no-op, with no extra activity entry.
        let before = engine.activity("alice", &id, None).unwrap().len();
        engine.reset_block("alice", &id, "blk-0001").unwrap();
        let after = engine.activity("alice", &id, None).unwrap().len();
        assert_eq!(before, after);
    }

    #[test]
    fn test_bulk_approve_idempotent() {
        let (engine, id) = engine_with_session(4);
        let first = engine
            .bulk("alice", &id, BulkAction::ApproveAll, None)
            .unwrap();
        assert_eq!(first, 4);
        let second = engine
            .bulk("alice", &id, BulkAction::ApproveAll, None)
            .unwrap();
        assert_eq!(second, 0);
    }

    #[test]
    fn test_bulk_selected_requires_ids() {
        let (engine, id) = engine_with_session(2);
        let err = engine
            .bulk("alice", &id, BulkAction::ApproveSelected, None)
            .unwrap_err();
        assert!(matches!(err, Error::MissingSelection(_)));
    }

    #[test]
    fn test_bulk_unknown_id_makes_no_changes() {
        let (engine, id) = engine_with_session(2);
        let ids = vec!["blk-0001".to_string(), "blk-9999".to_string()];
        let err = engine
            .bulk("alice", &id, BulkAction::ApproveSelected, Some(&ids))
            .unwrap_err();
        assert!(matches!(err, Error::BlockNotFound(_)));
        let view = engine.get_session("alice", &id).unwrap();
        assert!(view.blocks.iter().all(|b| b.state.is_pending()));
    }

    #[test]
    fn test_finalize_requires_in_progress() {
        let (engine, id) = engine_with_session(1);
        engine.bulk("alice", &id, BulkAction::ApproveAll, None).unwrap();
        engine.finalize("alice", &id, None, false).unwrap();
        // Re-finalizing an imported session is a state violation, not
        // not-found.
        let err = engine.finalize("alice", &id, None, false).unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[test]
    fn test_finalize_pending_without_force_has_no_effects() {
        let (engine, id) = engine_with_session(2);
        let err = engine.finalize("alice", &id, None, false).unwrap_err();
        assert!(matches!(err, Error::PendingBlocks(2)));
        let view = engine.get_session("alice", &id).unwrap();
        assert_eq!(view.session.status, SessionStatus::InProgress);
        assert!(view.session.document_id.is_none());
    }

    #[test]
    fn test_owner_cannot_be_removed() {
        let (engine, id) = engine_with_session(1);
        let err = engine.remove_collaborator("alice", &id, "alice").unwrap_err();
        assert!(matches!(err, Error::OwnerRemoval));
    }

    #[test]
    fn test_double_permanent_cancel_is_not_found() {
        let (engine, id) = engine_with_session(1);
        engine.cancel("alice", &id, true).unwrap();
        let err = engine.cancel("alice", &id, true).unwrap_err();
        assert!(matches!(err, Error::NotFound));
    }

    #[test]
    fn test_soft_cancel_keeps_rows() {
        let (engine, id) = engine_with_session(2);
        engine.cancel("alice", &id, false).unwrap();
        let view = engine.get_session("alice", &id).unwrap();
        assert_eq!(view.session.status, SessionStatus::Cancelled);
        assert_eq!(view.blocks.len(), 2);
        // Content mutation on a cancelled session is rejected.
        let err = engine
            .update_block("alice", &id, "blk-0001", BlockChange::approve())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[test]
    fn test_comment_lifecycle() {
        let (engine, id) = engine_with_session(1);
        engine
            .add_collaborator("alice", &id, "bob", Role::Reviewer)
            .unwrap();
        let comment = engine.add_comment("bob", &id, "blk-0001", "typo").unwrap();
        assert!(!comment.is_resolved());

        let resolved = engine
            .resolve_comment("alice", &id, &comment.id, true)
            .unwrap();
        assert!(resolved.is_resolved());
        assert_eq!(resolved.resolved.as_ref().unwrap().0, "alice");

        // A reviewer cannot delete someone else's comment.
        engine
            .add_collaborator("alice", &id, "carol", Role::Reviewer)
            .unwrap();
        let err = engine.delete_comment("carol", &id, &comment.id).unwrap_err();
        assert!(matches!(err, Error::PermissionDenied(_, _)));
        // The author can.
        engine.delete_comment("bob", &id, &comment.id).unwrap();
        let err = engine
            .resolve_comment("alice", &id, &comment.id, false)
            .unwrap_err();
        assert!(matches!(err, Error::CommentNotFound(_)));
    }

    #[test]
    fn test_second_owner_cannot_be_added() {
        let (engine, id) = engine_with_session(1);
        let err = engine
            .add_collaborator("alice", &id, "bob", Role::Owner)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[test]
    fn test_transition_always_logged_with_row_update() {
        let (engine, id) = engine_with_session(1);
        engine
            .update_block("alice", &id, "blk-0001", BlockChange::approve())
            .unwrap();
        let log = engine.activity("alice", &id, None).unwrap();
        let approvals = log
            .iter()
            .filter(|e| e.action == ActivityAction::BlockApproved)
            .count();
        assert_eq!(approvals, 1);
        assert_eq!(log.last().unwrap().block_id.as_deref(), Some("blk-0001"));
    }
}
