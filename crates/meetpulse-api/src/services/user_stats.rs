//! User statistics with optional caching.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use meetpulse_core::{compute_user_stats, Feedback, Meeting, Repositories, Result, UserStats};

use super::stats_cache::StatsCache;

/// Computes `meetingsHosted` / `avgRating` for an identity, serving repeat
/// reads from the cache until a write that affects the identity lands.
#[derive(Clone)]
pub struct StatsService {
    repos: Repositories,
    cache: StatsCache,
}

impl StatsService {
    pub fn new(repos: Repositories, cache: StatsCache) -> Self {
        Self { repos, cache }
    }

    /// Service that always recomputes.
    pub fn uncached(repos: Repositories) -> Self {
        Self::new(repos, StatsCache::disabled())
    }

    pub fn cache(&self) -> &StatsCache {
        &self.cache
    }

    /// Stats for `identity`. Store errors propagate; nothing is cached then.
    pub async fn user_stats(&self, identity: &str) -> Result<UserStats> {
        if let Some(stats) = self.cache.get(identity).await {
            debug!(
                subsystem = "api",
                component = "stats_service",
                identity = %identity,
                cache_hit = true,
                "Serving cached stats"
            );
            return Ok(stats);
        }

        let generation = self.cache.generation().await;
        let stats = compute_user_stats(
            self.repos.meetings.as_ref(),
            self.repos.feedback.as_ref(),
            identity,
        )
        .await?;
        self.cache.put(identity, stats, generation).await;

        Ok(stats)
    }

    /// A meeting was stored: its host's stats changed.
    pub async fn meeting_created(&self, meeting: &Meeting) {
        self.cache.invalidate(&meeting.created_by).await;
    }

    /// A feedback record was stored: every host with a meeting whose
    /// candidate id equals its `meetingId` has new stats. If the hosts cannot
    /// be looked up the whole cache is dropped.
    pub async fn feedback_created(&self, feedback: &Feedback) {
        if !self.cache.is_enabled() {
            return;
        }
        match self
            .repos
            .meetings
            .list_by_candidate_id(&feedback.meeting_id)
            .await
        {
            Ok(meetings) => {
                let hosts: BTreeSet<&str> =
                    meetings.iter().map(|m| m.created_by.as_str()).collect();
                if hosts.is_empty() {
                    debug!(
                        subsystem = "api",
                        component = "stats_service",
                        meeting_id = %feedback.meeting_id,
                        "Feedback references an unknown meeting"
                    );
                }
                for host in hosts {
                    self.cache.invalidate(host).await;
                }
            }
            Err(e) => {
                warn!(
                    subsystem = "api",
                    component = "stats_service",
                    meeting_id = %feedback.meeting_id,
                    error = %e,
                    "Host lookup failed, clearing stats cache"
                );
                self.cache.clear().await;
            }
        }
    }
}
