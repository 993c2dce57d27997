//! Decision Sync
//!
//! Remote-first access to a freelancer's decisions with the durable cache
//! as fallback, plus the `sent → read` transition applied on both sides.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::clock::Clock;

use crate::application::config::EngagementConfig;
use crate::application::fallback::{DataSource, DualSource, ReplicaSource, Resolved};
use crate::application::session_manager::SessionGate;
use crate::domain::entity::decision::{Decision, DecisionStats};
use crate::domain::repository::{DecisionCache, RemoteDecisionService};
use crate::domain::value_object::FreelancerId;
use crate::error::EngagementResult;

/// What `mark_as_read` managed to do
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkReadOutcome {
    /// Remote service acknowledged the transition
    pub remote_applied: bool,
    /// Cached copy moved from `sent` to `read`
    pub cache_updated: bool,
}

/// Decisions of the freelancer behind the active session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedDecisions {
    pub freelancer_id: FreelancerId,
    pub resolved: Resolved<Vec<Decision>>,
}

/// Aggregate counters over any decision list
pub fn compute_stats(decisions: &[Decision]) -> DecisionStats {
    DecisionStats::from_decisions(decisions)
}

/// Decision sync service
pub struct DecisionSync<R, C, G>
where
    R: RemoteDecisionService,
    C: DecisionCache,
    G: SessionGate,
{
    remote: Arc<R>,
    cache: Arc<C>,
    sessions: Arc<G>,
    clock: Arc<dyn Clock>,
    resolver: DualSource,
}

impl<R, C, G> DecisionSync<R, C, G>
where
    R: RemoteDecisionService + Send + Sync,
    C: DecisionCache + Send + Sync,
    G: SessionGate + Send + Sync,
{
    pub fn new(
        remote: Arc<R>,
        cache: Arc<C>,
        sessions: Arc<G>,
        clock: Arc<dyn Clock>,
        config: &EngagementConfig,
    ) -> Self {
        Self {
            remote,
            cache,
            sessions,
            clock,
            resolver: DualSource::new(config.empty_remote_policy),
        }
    }

    /// Best available decision list; never fails
    pub async fn fetch_decisions(&self, freelancer_id: &FreelancerId) -> Vec<Decision> {
        self.fetch_decisions_with_source(freelancer_id).await.value
    }

    /// Like [`fetch_decisions`](Self::fetch_decisions), reporting where the list came from
    pub async fn fetch_decisions_with_source(
        &self,
        freelancer_id: &FreelancerId,
    ) -> Resolved<Vec<Decision>> {
        let replica = DecisionReplica {
            freelancer_id,
            remote: self.remote.as_ref(),
            cache: self.cache.as_ref(),
        };
        let resolved = self.resolver.resolve(&replica).await;

        tracing::debug!(
            freelancer_id = %freelancer_id,
            count = resolved.value.len(),
            source = ?resolved.source,
            "Decisions resolved"
        );
        resolved
    }

    /// Fetch for whoever holds the active session
    ///
    /// `None` when nobody is signed in.
    pub async fn fetch_for_active_session(&self) -> Option<ScopedDecisions> {
        let Some(freelancer_id) = self.sessions.active_freelancer().await else {
            tracing::debug!("No active session, skipping decision fetch");
            return None;
        };
        let resolved = self.fetch_decisions_with_source(&freelancer_id).await;
        Some(ScopedDecisions {
            freelancer_id,
            resolved,
        })
    }

    /// Move one decision to `read`, remotely and in the cache
    ///
    /// The cache is updated whatever the remote outcome. An already-read
    /// decision keeps its original `read_at`.
    pub async fn mark_as_read(
        &self,
        decision_id: &str,
        freelancer_id: &FreelancerId,
    ) -> MarkReadOutcome {
        let remote_applied = self.push_read(decision_id, freelancer_id).await;

        let cache_updated = match self.mark_cached(freelancer_id, |d| d.id == decision_id).await {
            Ok(changed) => changed > 0,
            Err(e) => {
                e.log("mark_as_read");
                false
            }
        };

        tracing::info!(
            freelancer_id = %freelancer_id,
            decision_id,
            remote_applied,
            cache_updated,
            "Decision marked as read"
        );
        MarkReadOutcome {
            remote_applied,
            cache_updated,
        }
    }

    /// Mark every cached `sent` decision as read; returns how many moved
    pub async fn mark_all_as_read(&self, freelancer_id: &FreelancerId) -> usize {
        let unread: Vec<String> = match self.cache.load(freelancer_id).await {
            Ok(cached) => cached
                .unwrap_or_default()
                .into_iter()
                .filter(Decision::is_unread)
                .map(|d| d.id)
                .collect(),
            Err(e) => {
                e.log("mark_all_as_read");
                return 0;
            }
        };

        for decision_id in &unread {
            self.push_read(decision_id, freelancer_id).await;
        }

        match self
            .mark_cached(freelancer_id, |d| unread.contains(&d.id))
            .await
        {
            Ok(changed) => changed,
            Err(e) => {
                e.log("mark_all_as_read");
                0
            }
        }
    }

    /// Unread decisions in the best available list
    pub async fn unread_count(&self, freelancer_id: &FreelancerId) -> usize {
        compute_stats(&self.fetch_decisions(freelancer_id).await).unread
    }

    pub fn compute_stats(&self, decisions: &[Decision]) -> DecisionStats {
        compute_stats(decisions)
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    async fn push_read(&self, decision_id: &str, freelancer_id: &FreelancerId) -> bool {
        match self.remote.mark_read(decision_id, freelancer_id).await {
            Ok(()) => true,
            Err(e) => {
                e.log("mark_as_read");
                false
            }
        }
    }

    /// Apply `sent → read` to matching cached decisions, storing only on change
    ///
    /// With no cached list for the freelancer there is nothing to update; the
    /// next successful fetch writes the remote state instead.
    async fn mark_cached<F>(&self, freelancer_id: &FreelancerId, matches: F) -> EngagementResult<usize>
    where
        F: Fn(&Decision) -> bool,
    {
        let Some(mut decisions) = self.cache.load(freelancer_id).await? else {
            tracing::debug!(freelancer_id = %freelancer_id, "No cached decisions to mark as read");
            return Ok(0);
        };

        let now = self.clock.now();
        let mut changed = 0;
        for decision in decisions.iter_mut() {
            if matches(decision) && decision.mark_read(now) {
                changed += 1;
            }
        }

        if changed > 0 {
            self.cache.store(freelancer_id, &decisions).await?;
        }
        Ok(changed)
    }
}

/// One freelancer's decisions as a remote/replica pair
struct DecisionReplica<'a, R, C> {
    freelancer_id: &'a FreelancerId,
    remote: &'a R,
    cache: &'a C,
}

impl<R, C> DecisionReplica<'_, R, C>
where
    R: RemoteDecisionService + Sync,
    C: DecisionCache + Sync,
{
    /// Carry reads recorded only in the cache into a fresh remote list
    ///
    /// A cached `read` never reverts to `sent`. Each carried id is pushed to
    /// the remote again, since its earlier `mark_read` never landed.
    async fn keep_local_reads(&self, remote: &mut [Decision]) {
        let cached = match self.cache.load(self.freelancer_id).await {
            Ok(Some(cached)) => cached,
            Ok(None) => return,
            Err(e) => {
                e.log("read reconciliation");
                return;
            }
        };
        let local_reads: HashMap<&str, &Decision> = cached
            .iter()
            .filter(|d| !d.is_unread())
            .map(|d| (d.id.as_str(), d))
            .collect();

        for decision in remote.iter_mut() {
            let Some(local) = local_reads.get(decision.id.as_str()) else {
                continue;
            };
            if !decision.keep_local_read(local) {
                continue;
            }
            let retried = match self.remote.mark_read(&decision.id, self.freelancer_id).await {
                Ok(()) => true,
                Err(e) => {
                    e.log("mark_as_read retry");
                    false
                }
            };
            tracing::debug!(
                freelancer_id = %self.freelancer_id,
                decision_id = %decision.id,
                retried,
                "Kept locally recorded read"
            );
        }
    }
}

impl<R, C> ReplicaSource<Vec<Decision>> for DecisionReplica<'_, R, C>
where
    R: RemoteDecisionService + Sync,
    C: DecisionCache + Sync,
{
    fn subject(&self) -> &str {
        self.freelancer_id.as_str()
    }

    async fn fetch_remote(&self) -> EngagementResult<Vec<Decision>> {
        let mut decisions = self.remote.list_decisions(self.freelancer_id).await?;
        self.keep_local_reads(&mut decisions).await;
        Ok(decisions)
    }

    async fn read_replica(&self) -> EngagementResult<Option<Vec<Decision>>> {
        self.cache.load(self.freelancer_id).await
    }

    async fn write_replica(&self, value: &Vec<Decision>) -> EngagementResult<()> {
        self.cache.store(self.freelancer_id, value).await
    }
}

impl ScopedDecisions {
    pub fn source(&self) -> DataSource {
        self.resolved.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::decision::{DecisionStatus, Verdict};
    use crate::infra::memory::MemoryStore;
    use crate::testing::{FixedGate, ScriptedRemote, decision, fid, t0};
    use platform::clock::ManualClock;

    type TestSync = DecisionSync<ScriptedRemote, MemoryStore, FixedGate>;

    fn sync(remote: &Arc<ScriptedRemote>, cache: &Arc<MemoryStore>) -> TestSync {
        DecisionSync::new(
            remote.clone(),
            cache.clone(),
            Arc::new(FixedGate::signed_in("FREEL123")),
            Arc::new(ManualClock::new(t0())),
            &EngagementConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_remote_success_refreshes_cache() {
        let remote = Arc::new(ScriptedRemote::up(vec![decision(
            "D1",
            Verdict::Approved,
            DecisionStatus::Sent,
        )]));
        let cache = Arc::new(MemoryStore::new());
        let sync = sync(&remote, &cache);

        let resolved = sync.fetch_decisions_with_source(&fid("FREEL123")).await;
        assert_eq!(resolved.source, DataSource::Remote);
        assert_eq!(resolved.value.len(), 1);

        let cached = cache.load(&fid("FREEL123")).await.unwrap().unwrap();
        assert_eq!(cached, resolved.value);
    }

    #[tokio::test]
    async fn test_remote_failure_returns_last_snapshot() {
        let snapshot = vec![
            decision("D1", Verdict::Approved, DecisionStatus::Read),
            decision("D2", Verdict::Rejected, DecisionStatus::Sent),
        ];
        let remote = Arc::new(ScriptedRemote::down());
        let cache = Arc::new(MemoryStore::new());
        cache.store(&fid("FREEL123"), &snapshot).await.unwrap();

        let sync = sync(&remote, &cache);
        assert_eq!(sync.fetch_decisions(&fid("FREEL123")).await, snapshot);
        assert!(sync.fetch_decisions(&fid("FREEL456")).await.is_empty());
    }

    #[tokio::test]
    async fn test_mark_as_read_with_remote_down_updates_cache() {
        let remote = Arc::new(ScriptedRemote::down());
        let cache = Arc::new(MemoryStore::new());
        cache
            .store(
                &fid("FREEL123"),
                &[decision("D1", Verdict::Approved, DecisionStatus::Sent)],
            )
            .await
            .unwrap();

        let sync = sync(&remote, &cache);
        let outcome = sync.mark_as_read("D1", &fid("FREEL123")).await;
        assert_eq!(
            outcome,
            MarkReadOutcome {
                remote_applied: false,
                cache_updated: true
            }
        );

        let cached = cache.load(&fid("FREEL123")).await.unwrap().unwrap();
        assert_eq!(cached[0].status, DecisionStatus::Read);
        assert_eq!(cached[0].read_at, Some(t0()));
    }

    #[tokio::test]
    async fn test_mark_as_read_is_terminal() {
        let remote = Arc::new(ScriptedRemote::up(vec![]));
        let cache = Arc::new(MemoryStore::new());
        let mut already = decision("D1", Verdict::Approved, DecisionStatus::Sent);
        let first_read = t0() - chrono::Duration::days(1);
        already.mark_read(first_read);
        cache.store(&fid("FREEL123"), &[already]).await.unwrap();

        let sync = sync(&remote, &cache);
        let outcome = sync.mark_as_read("D1", &fid("FREEL123")).await;
        assert!(outcome.remote_applied);
        assert!(!outcome.cache_updated);

        let cached = cache.load(&fid("FREEL123")).await.unwrap().unwrap();
        assert_eq!(cached[0].read_at, Some(first_read));
        assert_eq!(remote.marked(), vec!["D1".to_string()]);
    }

    #[tokio::test]
    async fn test_mark_as_read_without_cached_list() {
        let remote = Arc::new(ScriptedRemote::up(vec![]));
        let cache = Arc::new(MemoryStore::new());

        let outcome = sync(&remote, &cache).mark_as_read("D1", &fid("FREEL123")).await;
        assert!(outcome.remote_applied);
        assert!(!outcome.cache_updated);
        assert!(cache.load(&fid("FREEL123")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mark_all_and_unread_count() {
        let remote = Arc::new(ScriptedRemote::down());
        let cache = Arc::new(MemoryStore::new());
        cache
            .store(
                &fid("FREEL123"),
                &[
                    decision("D1", Verdict::Approved, DecisionStatus::Sent),
                    decision("D2", Verdict::Rejected, DecisionStatus::Read),
                    decision("D3", Verdict::Rejected, DecisionStatus::Sent),
                ],
            )
            .await
            .unwrap();

        let sync = sync(&remote, &cache);
        assert_eq!(sync.unread_count(&fid("FREEL123")).await, 2);
        assert_eq!(sync.mark_all_as_read(&fid("FREEL123")).await, 2);
        assert_eq!(sync.unread_count(&fid("FREEL123")).await, 0);
        assert_eq!(sync.mark_all_as_read(&fid("FREEL123")).await, 0);
    }

    #[tokio::test]
    async fn test_fetch_for_active_session() {
        let remote = Arc::new(ScriptedRemote::up(vec![decision(
            "D9",
            Verdict::Approved,
            DecisionStatus::Sent,
        )]));
        let cache = Arc::new(MemoryStore::new());

        let scoped = sync(&remote, &cache).fetch_for_active_session().await.unwrap();
        assert_eq!(scoped.freelancer_id.as_str(), "FREEL123");
        assert_eq!(scoped.source(), DataSource::Remote);

        let anonymous: TestSync = DecisionSync::new(
            remote.clone(),
            cache.clone(),
            Arc::new(FixedGate::signed_out()),
            Arc::new(ManualClock::new(t0())),
            &EngagementConfig::default(),
        );
        assert!(anonymous.fetch_for_active_session().await.is_none());
    }

    #[test]
    fn test_compute_stats() {
        let stats = compute_stats(&[
            decision("D1", Verdict::Approved, DecisionStatus::Sent),
            decision("D2", Verdict::Rejected, DecisionStatus::Read),
            decision("D3", Verdict::Approved, DecisionStatus::Read),
        ]);
        assert_eq!(
            stats,
            DecisionStats {
                total: 3,
                approved: 2,
                rejected: 1,
                unread: 1,
                read: 2
            }
        );
    }
}
