//! # Score Aggregator
//!
//! Pure read-side computation over the vote ledger and comment store.
//! Nothing here persists anything: every read recomputes, which bounds
//! staleness to zero at the cost of O(votes) per entity per request. If
//! load ever demands it, this is the seam to swap in a materialized
//! counter without touching call sites.

use std::sync::Arc;

use uuid::Uuid;

use domains::{CommentRepo, EntityRef, Result, Vote, VoteRepo};

/// Net score over ledger rows: Σ(+1) − Σ(−1).
pub fn net_score(votes: &[Vote]) -> i64 {
    votes.iter().map(|v| v.value as i64).sum()
}

#[derive(Clone)]
pub struct ScoreAggregator {
    votes: Arc<dyn VoteRepo>,
    comments: Arc<dyn CommentRepo>,
}

impl ScoreAggregator {
    pub fn new(votes: Arc<dyn VoteRepo>, comments: Arc<dyn CommentRepo>) -> Self {
        Self { votes, comments }
    }

    pub async fn score(&self, entity: EntityRef) -> Result<i64> {
        Ok(net_score(&self.votes.list_for_entity(entity).await?))
    }

    /// The caller's own vote on the entity, fetched as a single row rather
    /// than scanned out of the full ledger.
    pub async fn caller_vote(&self, caller: Option<Uuid>, entity: EntityRef) -> Result<Option<i32>> {
        match caller {
            None => Ok(None),
            Some(voter_id) => Ok(self
                .votes
                .find(voter_id, entity)
                .await?
                .map(|vote| vote.value)),
        }
    }

    /// Comments on the post at any depth.
    pub async fn comment_count(&self, post_id: Uuid) -> Result<i64> {
        self.comments.count_for_post(post_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn vote(value: i32) -> Vote {
        Vote {
            voter_id: Uuid::now_v7(),
            entity: EntityRef::post(Uuid::now_v7()),
            value,
        }
    }

    #[test]
    fn net_score_is_upvotes_minus_downvotes() {
        assert_eq!(net_score(&[]), 0);
        assert_eq!(net_score(&[vote(1), vote(1), vote(-1)]), 1);
        assert_eq!(net_score(&[vote(-1), vote(-1)]), -2);
    }
}
