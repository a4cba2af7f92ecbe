use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::api::models::{Gift, GiftPatch, PostKind, PostStatus};
use crate::api::Backend;
use crate::error::BotResult;
use crate::services::dispatcher::PublicationDispatcher;
use crate::utils::logging::{log_sweep_error, log_sweep_event};

/// Counters for one sweep, mostly for logs and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    /// Campaigns the backend reported as due
    pub due: usize,
    /// Campaigns published by this sweep
    pub published: usize,
    /// Not actually due, or claimed by another sweep
    pub skipped: usize,
    /// Campaigns whose handling failed; the sweep moved on
    pub failed: usize,
}

/// A post side is due when it still awaits publication and its time has come.
pub fn is_due(status: Option<PostStatus>, at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    status.unwrap_or(PostStatus::Awaiting) == PostStatus::Awaiting && at.is_some_and(|at| at <= now)
}

/// Finds due campaigns, claims them and hands them to the dispatcher.
pub struct PublicationScheduler {
    backend: Arc<dyn Backend>,
    dispatcher: Arc<PublicationDispatcher>,
}

impl PublicationScheduler {
    pub fn new(backend: Arc<dyn Backend>, dispatcher: Arc<PublicationDispatcher>) -> Self {
        Self { backend, dispatcher }
    }

    pub async fn run_start_sweep(&self, now: DateTime<Utc>) -> SweepSummary {
        let due = match self.backend.due_for_start().await {
            Ok(gifts) => gifts,
            Err(e) => {
                log_sweep_error("start", "-", &e.to_string());
                return SweepSummary::default();
            }
        };

        let mut summary = SweepSummary { due: due.len(), ..SweepSummary::default() };
        for gift in &due {
            if !is_due(gift.start_post_status, gift.start_post_date, now) {
                summary.skipped += 1;
                continue;
            }
            match self.publish_start(gift).await {
                Ok(true) => summary.published += 1,
                Ok(false) => summary.skipped += 1,
                Err(e) => {
                    summary.failed += 1;
                    log_sweep_error("start", &gift.id, &e.to_string());
                }
            }
        }

        if summary.due > 0 {
            log_sweep_event("start", "finished", Some(&format!("{summary:?}")));
        }
        summary
    }

    pub async fn run_end_sweep(&self, now: DateTime<Utc>) -> SweepSummary {
        let due = match self.backend.due_for_end().await {
            Ok(gifts) => gifts,
            Err(e) => {
                log_sweep_error("end", "-", &e.to_string());
                return SweepSummary::default();
            }
        };

        let mut summary = SweepSummary { due: due.len(), ..SweepSummary::default() };
        for gift in &due {
            if !gift.has_end_post() || !is_due(gift.end_post_status, gift.end_post_date, now) {
                summary.skipped += 1;
                continue;
            }
            match self.publish_end(gift).await {
                Ok(true) => summary.published += 1,
                Ok(false) => summary.skipped += 1,
                Err(e) => {
                    summary.failed += 1;
                    log_sweep_error("end", &gift.id, &e.to_string());
                }
            }
        }

        if summary.due > 0 {
            log_sweep_event("end", "finished", Some(&format!("{summary:?}")));
        }
        summary
    }

    async fn publish_start(&self, gift: &Gift) -> BotResult<bool> {
        if !self.backend.claim_post(&gift.id, PostKind::Start).await? {
            log_sweep_event("start", "already claimed", Some(&gift.id));
            return Ok(false);
        }

        let report = self.dispatcher.publish(gift, PostKind::Start).await;
        if !report.is_complete() {
            log_sweep_error(
                "start",
                &gift.id,
                &format!("{} of {} channel(s) failed: {:?}", report.failed.len(), gift.channels.len(), report.failed),
            );
        }

        let patch = GiftPatch::start_published(report.first_message_id(), report.message_map());
        self.backend.update_gift(&gift.id, &patch).await?;
        log_sweep_event("start", "published", Some(&gift.id));
        Ok(true)
    }

    async fn publish_end(&self, gift: &Gift) -> BotResult<bool> {
        if !self.backend.claim_post(&gift.id, PostKind::End).await? {
            log_sweep_event("end", "already claimed", Some(&gift.id));
            return Ok(false);
        }

        let report = self.dispatcher.publish(gift, PostKind::End).await;
        if !report.is_complete() {
            log_sweep_error(
                "end",
                &gift.id,
                &format!("{} of {} channel(s) failed: {:?}", report.failed.len(), gift.channels.len(), report.failed),
            );
        }

        self.backend.update_gift(&gift.id, &GiftPatch::end_published()).await?;
        log_sweep_event("end", "published", Some(&gift.id));
        Ok(true)
    }
}

/// Cron wrapper running both sweeps on their own jobs.
pub struct SchedulerService {
    publication: Arc<PublicationScheduler>,
    scheduler: JobScheduler,
}

impl SchedulerService {
    pub async fn new(publication: Arc<PublicationScheduler>) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            publication,
            scheduler,
        })
    }

    pub async fn start(&mut self, schedule: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let publication = self.publication.clone();
        let start_job = Job::new_async(schedule, move |_uuid, _l| {
            let publication = publication.clone();
            Box::pin(async move {
                publication.run_start_sweep(Utc::now()).await;
            })
        })?;

        let publication = self.publication.clone();
        let end_job = Job::new_async(schedule, move |_uuid, _l| {
            let publication = publication.clone();
            Box::pin(async move {
                publication.run_end_sweep(Utc::now()).await;
            })
        })?;

        self.scheduler.add(start_job).await?;
        self.scheduler.add(end_job).await?;
        self.scheduler.start().await?;

        tracing::info!("Publication scheduler started with schedule '{}'", schedule);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.scheduler.shutdown().await?;
        Ok(())
    }
}
