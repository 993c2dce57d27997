//! Engagement Worker Entry Point
//!
//! Signs a freelancer in, optionally reports their score, then keeps their
//! decision feed fresh until interrupted.
//! Uses `anyhow` for startup errors; the engagement core itself never fails.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use engagement::domain::entity::ActivitySet;
use engagement::{
    DecisionPoller, DecisionSync, EmptyRemotePolicy, EngagementConfig, HttpEngagementClient,
    IdentityStore, SessionManager, SqliteStore, compute_score_for,
};
use platform::clock::{Clock, SystemClock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Cached decision lists untouched for this long are dropped at startup
const CACHE_RETENTION_DAYS: i64 = 30;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "worker=info,engagement=info,platform=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(load_config()?);
    let freelancer_id = env::var("FREELANCER_ID").context("FREELANCER_ID must be set")?;
    let email = env::var("FREELANCER_EMAIL").ok();

    // Local durable cache
    let store = Arc::new(SqliteStore::connect(&config.cache_database_url).await?);
    store.migrate().await?;
    tracing::info!(url = %config.cache_database_url, "Cache database ready");

    // Errors here should not prevent startup
    let cutoff = chrono::Utc::now() - chrono::Duration::days(CACHE_RETENTION_DAYS);
    if let Err(e) = store.prune_cache(cutoff).await {
        tracing::warn!(error = %e, "Decision cache pruning failed, continuing anyway");
    }

    let client = Arc::new(HttpEngagementClient::new(&config)?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let identities =
        Arc::new(IdentityStore::with_default_roster().with_extra(&config.extra_identifiers));

    let sessions = Arc::new(SessionManager::new(
        identities,
        store.clone(),
        client.clone(),
        clock.clone(),
        config.clone(),
    ));

    // Sign in
    if !sessions.authenticate(&freelancer_id, email.as_deref()).await {
        bail!("freelancer '{freelancer_id}' could not be authenticated");
    }
    // local-only validation does not open a session by itself
    if !sessions.is_authenticated().await && sessions.create_session(&freelancer_id).await.is_none()
    {
        bail!("could not open a session for '{freelancer_id}'");
    }
    if let Some(remaining) = sessions.remaining().await {
        tracing::info!(
            freelancer_id = %freelancer_id,
            remaining_minutes = remaining.num_minutes(),
            "Signed in"
        );
    }

    // Optional score report
    if let Ok(path) = env::var("ACTIVITY_FILE") {
        report_score(&path).await?;
    }

    // Decision polling
    let sync = Arc::new(DecisionSync::new(
        client,
        store,
        sessions.clone(),
        clock,
        &config,
    ));
    let mut poller = DecisionPoller::spawn(sync, config.poll_interval);
    let mut feed = poller.subscribe();

    tracing::info!(
        period_secs = config.poll_interval.as_secs(),
        "Polling decisions, press Ctrl+C to stop"
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = feed.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = feed.borrow_and_update().clone();
                tracing::info!(
                    tick = snapshot.tick,
                    source = ?snapshot.source,
                    total = snapshot.stats.total,
                    unread = snapshot.stats.unread,
                    "Decision feed refreshed"
                );
            }
        }
    }

    poller.stop().await?;
    Ok(())
}

/// Engagement configuration from the environment
fn load_config() -> anyhow::Result<EngagementConfig> {
    let mut config = if cfg!(debug_assertions) {
        EngagementConfig::development()
    } else {
        EngagementConfig::default()
    };

    if let Ok(url) = env::var("ENGAGEMENT_API_URL") {
        config.remote_base_url = url;
    }
    if let Ok(url) = env::var("ENGAGEMENT_DATABASE_URL") {
        config.cache_database_url = url;
    }
    if let Some(period) = env_secs("ENGAGEMENT_POLL_SECS")? {
        config.poll_interval = period;
    }
    if let Some(timeout) = env_secs("ENGAGEMENT_TIMEOUT_SECS")? {
        config.request_timeout = timeout;
    }
    if let Ok(policy) = env::var("ENGAGEMENT_EMPTY_REMOTE") {
        config.empty_remote_policy = policy
            .parse::<EmptyRemotePolicy>()
            .map_err(anyhow::Error::msg)?;
    }
    if let Ok(ids) = env::var("ENGAGEMENT_EXTRA_IDS") {
        config.extra_identifiers = ids
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
    }

    Ok(config)
}

fn env_secs(name: &str) -> anyhow::Result<Option<Duration>> {
    match env::var(name) {
        Ok(raw) => {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{name} must be a whole number of seconds"))?;
            if secs == 0 {
                bail!("{name} must be greater than zero");
            }
            Ok(Some(Duration::from_secs(secs)))
        }
        Err(_) => Ok(None),
    }
}

/// Score the activity stored in a JSON file and log it
async fn report_score(path: &str) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read activity file {path}"))?;
    let activity: ActivitySet =
        serde_json::from_str(&raw).with_context(|| format!("invalid activity file {path}"))?;

    let score = compute_score_for(&activity);
    let rating = score.rating();
    tracing::info!(
        total = score.total_score,
        max = score.max_possible_score,
        percentage = score.score_percentage,
        rating = rating.label(),
        "{}",
        rating.description()
    );
    Ok(())
}
