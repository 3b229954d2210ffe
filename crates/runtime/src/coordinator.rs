//! The quest submission transaction.
//!
//! The coordinator is the only writer of team state. Every submission is the
//! same sequence: fresh snapshot from the store, pure advancement, persist,
//! and only then commit to the caller's session and notify telemetry. The
//! session is never mutated before persistence is confirmed, so a failed
//! save needs no undo; the absence of mutation is the rollback.
//!
//! Concurrent submissions for different teams are safe by construction
//! (disjoint rows). Concurrent submissions for the same team race at the
//! remote store and resolve as last-write-wins; that is an accepted
//! limitation of the flat store, not a guarantee.

use quest_core::{QuestIndex, TeamRecord, advance};
use tracing::{error, info};

use crate::auth::{self, AuthError};
use crate::clock;
use crate::config::RuntimeConfig;
use crate::error::SubmitError;
use crate::repository::TeamRepository;
use crate::session::SessionState;
use crate::store::SheetStore;
use crate::telemetry::{
    ConfiguredSink, DatadogSink, MetricSink, NullSink, TelemetryError, TelemetrySidecar,
};

/// Outcome of a committed quest submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuestCommit {
    /// The quest that was completed.
    pub quest: QuestIndex,
    /// The team's stage after the commit.
    pub stage: u8,
    /// The team's XP total after the commit.
    pub xp: u32,
    /// XP granted by this quest.
    pub xp_awarded: u32,
}

/// Orchestrates authentication and quest submissions over one store.
pub struct QuestCoordinator<S, M> {
    repository: TeamRepository<S>,
    telemetry: TelemetrySidecar<M>,
}

impl<S: SheetStore> QuestCoordinator<S, ConfiguredSink> {
    /// Wire a coordinator over `store` from configuration: the retry policy
    /// is applied to every store call and a Datadog key selects the metric
    /// sink.
    pub fn from_config(store: S, config: &RuntimeConfig) -> Result<Self, TelemetryError> {
        let repository = TeamRepository::with_retry_policy(store, config.retry);
        let sink = match &config.datadog_api_key {
            Some(key) => ConfiguredSink::Datadog(DatadogSink::with_api_url(
                config.datadog_api_url.clone(),
                key.clone(),
            )?),
            None => ConfiguredSink::Disabled(NullSink),
        };
        Ok(Self::new(repository, TelemetrySidecar::new(sink)))
    }
}

impl<S: SheetStore, M: MetricSink> QuestCoordinator<S, M> {
    /// Wire a coordinator from its collaborators.
    pub fn new(repository: TeamRepository<S>, telemetry: TelemetrySidecar<M>) -> Self {
        Self {
            repository,
            telemetry,
        }
    }

    /// Log a team in, creating it on first sight.
    ///
    /// An unseen team name provisions a fresh stage-0 record keyed to the
    /// given PIN. An existing team must present a PIN matching its stored
    /// hash; a mismatch yields `Ok(None)`, never an error, so callers cannot
    /// distinguish "wrong PIN" from probing an existing name.
    pub async fn authenticate(
        &self,
        team_name: &str,
        pin: &str,
    ) -> Result<Option<SessionState>, AuthError> {
        match self.repository.find(team_name).await? {
            Some(record) => {
                if auth::verify_pin(pin, &record.pin_hash) {
                    info!("team '{}' authenticated at stage {}", team_name, record.stage);
                    Ok(Some(SessionState::new(record)))
                } else {
                    info!("rejected credentials for team '{}'", team_name);
                    Ok(None)
                }
            }
            None => {
                let pin_hash = auth::hash_pin(pin)?;
                let record = TeamRecord::new(team_name, pin_hash, clock::utc_timestamp());
                self.repository.create(&record).await?;
                info!("created team '{}' at stage 0", team_name);
                Ok(Some(SessionState::new(record)))
            }
        }
    }

    /// Submit `artifact` for `quest` on behalf of the session's team.
    ///
    /// Snapshot → compute → persist → commit. The session is replaced by the
    /// advanced record only after the store confirms the write; on any
    /// failure it is left exactly as it was. Telemetry fires after the
    /// commit and its result is discarded.
    pub async fn submit_quest(
        &self,
        session: &mut SessionState,
        quest: QuestIndex,
        artifact: &str,
    ) -> Result<QuestCommit, SubmitError> {
        let team_name = session.team_name().to_string();

        let original = self.repository.find(&team_name).await?.ok_or_else(|| {
            error!("authenticated team '{}' has no row in the store", team_name);
            SubmitError::TeamMissing {
                team_name: team_name.clone(),
            }
        })?;

        let mut proposed = advance(&original, quest, artifact)?;
        proposed.last_updated_at = clock::utc_timestamp();

        self.repository.save(&proposed).await?;

        let commit = QuestCommit {
            quest,
            stage: proposed.stage,
            xp: proposed.xp,
            xp_awarded: quest.spec().xp_reward,
        };
        info!(
            "team '{}' completed quest {} (+{} XP, stage {})",
            team_name,
            quest.number(),
            commit.xp_awarded,
            commit.stage
        );

        session.replace(proposed);
        self.telemetry.notify(&team_name, quest).await;

        Ok(commit)
    }
}
