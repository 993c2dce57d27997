//! Dual-source resolution (remote first, local replica as fallback)
//!
//! [`DualSource::resolve`] is the single primitive behind every
//! "remote-then-cache" read. It never fails: remote errors fall back to
//! the replica, replica errors fall back to an empty value, and every
//! failure is logged on the way.
//!
//! | remote result | policy         | returned            | replica written |
//! |---------------|----------------|---------------------|-----------------|
//! | non-empty     | any            | remote              | yes             |
//! | empty         | `Authoritative`| remote (empty)      | yes             |
//! | empty         | `PreferCache`  | replica if non-empty, else remote | only when the replica is empty/absent |
//! | error         | any            | replica, else empty | no              |

use serde::Serialize;

use crate::error::EngagementResult;

/// How to read a successful remote call that returned nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyRemotePolicy {
    /// Treat an empty remote result as possibly stale and serve the replica
    #[default]
    PreferCache,
    /// Trust the remote: empty means empty
    Authoritative,
}

impl std::str::FromStr for EmptyRemotePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prefer-cache" | "prefer_cache" | "cache" => Ok(Self::PreferCache),
            "authoritative" | "remote" => Ok(Self::Authoritative),
            other => Err(format!("unknown empty-remote policy '{other}'")),
        }
    }
}

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Remote,
    Cache,
    /// Neither source had anything
    #[default]
    Empty,
}

/// Value plus provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: DataSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: DataSource) -> Self {
        Self { value, source }
    }

    /// Served from the replica (or nothing) instead of the remote
    pub fn is_degraded(&self) -> bool {
        self.source != DataSource::Remote
    }
}

/// Values that can be "vacant" (an empty list, an empty map...)
pub trait Replica {
    fn is_vacant(&self) -> bool;
}

impl<T> Replica for Vec<T> {
    fn is_vacant(&self) -> bool {
        self.is_empty()
    }
}

/// One remote source paired with its local replica
#[trait_variant::make(ReplicaSource: Send)]
pub trait LocalReplicaSource<T> {
    /// Short label for logs, e.g. the freelancer id
    fn subject(&self) -> &str;

    async fn fetch_remote(&self) -> EngagementResult<T>;

    async fn read_replica(&self) -> EngagementResult<Option<T>>;

    async fn write_replica(&self, value: &T) -> EngagementResult<()>;
}

/// Remote-then-replica resolver
#[derive(Debug, Clone, Copy, Default)]
pub struct DualSource {
    policy: EmptyRemotePolicy,
}

impl DualSource {
    pub fn new(policy: EmptyRemotePolicy) -> Self {
        Self { policy }
    }

    /// Resolve a value from `source`; never fails
    pub async fn resolve<T, S>(&self, source: &S) -> Resolved<T>
    where
        T: Replica + Default + Send + Sync,
        S: ReplicaSource<T> + Sync,
    {
        let remote = match source.fetch_remote().await {
            Ok(remote) => remote,
            Err(err) => {
                err.log("remote fetch");
                return match self.read_replica(source).await {
                    Some(cached) => {
                        tracing::info!(subject = source.subject(), "Serving cached replica after remote failure");
                        Resolved::new(cached, DataSource::Cache)
                    }
                    None => Resolved::new(T::default(), DataSource::Empty),
                };
            }
        };

        if !remote.is_vacant() || self.policy == EmptyRemotePolicy::Authoritative {
            self.write_replica(source, &remote).await;
            return Resolved::new(remote, DataSource::Remote);
        }

        match self.read_replica(source).await {
            Some(cached) if !cached.is_vacant() => {
                tracing::info!(
                    subject = source.subject(),
                    "Remote returned nothing, preferring non-empty cached replica"
                );
                Resolved::new(cached, DataSource::Cache)
            }
            _ => {
                self.write_replica(source, &remote).await;
                Resolved::new(remote, DataSource::Remote)
            }
        }
    }

    async fn read_replica<T, S>(&self, source: &S) -> Option<T>
    where
        T: Send + Sync,
        S: ReplicaSource<T> + Sync,
    {
        match source.read_replica().await {
            Ok(cached) => cached,
            Err(err) => {
                err.log("replica read");
                None
            }
        }
    }

    async fn write_replica<T, S>(&self, source: &S, value: &T)
    where
        T: Send + Sync,
        S: ReplicaSource<T> + Sync,
    {
        if let Err(err) = source.write_replica(value).await {
            err.log("replica write");
        }
    }
}
