use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, Utc};
use serde_json::json;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::{
    entities::{drip_events::DripEventEntity, leads::LeadEntity},
    repositories::{
        buyers::BuyerRepository, drip_queue::DripQueueRepository,
        lead_deliveries::LeadDeliveryRepository, leads::LeadRepository,
        notification::NotificationGateway,
    },
    services::scoring,
    value_objects::{
        enums::{drip_templates::DripTemplate, lead_statuses::LeadStatus},
        ids::gen_id,
        leads::LeadSubmission,
        routing::RoutingContext,
        scoring::ScoreInput,
    },
};
use crate::application::usecases::lead_delivery::LeadDeliveryUseCase;
use crate::infrastructure::analytics::AnalyticsTracker;

const BANNED_KEYWORDS: [&str; 5] = ["viagra", "loan", "crypto investment", "escort", "porn"];
const MAX_MESSAGE_URLS: usize = 3;
const MIN_MESSAGE_LEN: usize = 10;
const MAX_MESSAGE_LEN: usize = 6000;
const DUPLICATE_WINDOW_DAYS: i64 = 14;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Consent required to share project details with a contractor.")]
    ConsentRequired,
    #[error("Rejected as spam: {0}")]
    Spam(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntakeError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            IntakeError::MissingField(_)
            | IntakeError::ConsentRequired
            | IntakeError::Spam(_) => StatusCode::BAD_REQUEST,
            IntakeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type IntakeResult<T> = std::result::Result<T, IntakeError>;

#[derive(Debug, Clone)]
pub enum IntakeOutcome {
    Accepted(LeadEntity),
    /// Honeypot submissions are discarded but reported as success upstream.
    Discarded,
}

pub struct LeadIntakeUseCase<L, Q, B, D, N>
where
    L: LeadRepository + Send + Sync + 'static,
    Q: DripQueueRepository + Send + Sync + 'static,
    B: BuyerRepository + Send + Sync + 'static,
    D: LeadDeliveryRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    lead_repository: Arc<L>,
    drip_repository: Arc<Q>,
    delivery_usecase: Arc<LeadDeliveryUseCase<B, D, N>>,
    analytics: Arc<AnalyticsTracker>,
}

impl<L, Q, B, D, N> LeadIntakeUseCase<L, Q, B, D, N>
where
    L: LeadRepository + Send + Sync + 'static,
    Q: DripQueueRepository + Send + Sync + 'static,
    B: BuyerRepository + Send + Sync + 'static,
    D: LeadDeliveryRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    pub fn new(
        lead_repository: Arc<L>,
        drip_repository: Arc<Q>,
        delivery_usecase: Arc<LeadDeliveryUseCase<B, D, N>>,
        analytics: Arc<AnalyticsTracker>,
    ) -> Self {
        Self {
            lead_repository,
            drip_repository,
            delivery_usecase,
            analytics,
        }
    }

    /// Synchronous intake: validate, score, persist, schedule drips. Routing
    /// and billing run in a detached task; their failures never reach the
    /// submitter.
    pub async fn submit(&self, submission: LeadSubmission) -> IntakeResult<IntakeOutcome> {
        if submission
            .website
            .as_deref()
            .is_some_and(|value| !value.is_empty())
        {
            info!("intake: honeypot field filled, discarding submission");
            self.analytics.track("lead.bot_caught", None).await;
            return Ok(IntakeOutcome::Discarded);
        }

        if let Err(err) = validate_required(&submission) {
            if let IntakeError::MissingField(field) = &err {
                self.analytics
                    .track("lead.validation_error", Some(json!({"missing": field})))
                    .await;
            }
            return Err(err);
        }

        if !submission.consent_share {
            warn!("intake: submission without share consent rejected");
            return Err(IntakeError::ConsentRequired);
        }

        if let Some(reason) = spam_reason(&submission.message) {
            warn!(reason, "intake: submission rejected as spam");
            self.analytics
                .track("lead.spam_rejected", Some(json!({"reason": reason})))
                .await;
            return Err(IntakeError::Spam(reason));
        }

        let score = scoring::score_lead(&ScoreInput {
            urgency: submission.urgency,
            budget_band: submission.budget_band,
            photos: submission.photos,
            addons_count: submission.addons.len() as u32,
        });

        let duplicate_recent = match self.detect_duplicate(&submission).await {
            Ok(flag) => flag,
            Err(err) => {
                error!(error = ?err, "intake: duplicate detection failed");
                false
            }
        };
        if duplicate_recent {
            self.analytics
                .track(
                    "lead.duplicate_detected",
                    Some(json!({"phone": submission.phone, "email": submission.email})),
                )
                .await;
        }

        let lead = LeadEntity {
            id: gen_id("lead"),
            created_at: Utc::now(),
            name: submission.name,
            email: submission.email,
            phone: submission.phone,
            service: submission.service,
            message: submission.message,
            urgency: submission.urgency,
            budget_band: submission.budget_band,
            addons: submission.addons,
            utm: submission.utm,
            photos: submission.photos,
            consent_share: submission.consent_share,
            duplicate_recent,
            raw_score: score.raw,
            normalized_score: score.normalized,
            status: LeadStatus::New,
        };

        self.lead_repository
            .append(lead.clone())
            .await
            .map_err(IntakeError::Internal)?;
        info!(
            lead_id = %lead.id,
            score = lead.normalized_score,
            duplicate_recent,
            "intake: lead persisted"
        );

        self.schedule_drips(&lead).await;
        self.spawn_delivery(lead.clone());

        self.analytics
            .track(
                "lead.submitted",
                Some(json!({
                    "leadId": lead.id,
                    "service": lead.service,
                    "score": lead.normalized_score,
                    "urgency": lead.urgency.map(|u| u.as_str()),
                    "budgetBand": lead.budget_band.map(|b| b.as_str()),
                    "addonsCount": lead.addons.len(),
                    "hasPhotos": lead.photos > 0,
                    "duplicateRecent": lead.duplicate_recent,
                })),
            )
            .await;

        Ok(IntakeOutcome::Accepted(lead))
    }

    async fn detect_duplicate(&self, submission: &LeadSubmission) -> Result<bool> {
        let cutoff = Utc::now() - Duration::days(DUPLICATE_WINDOW_DAYS);
        let recent = self
            .lead_repository
            .list(Default::default())
            .await?
            .into_iter()
            .filter(|lead| lead.created_at >= cutoff)
            .filter(|lead| {
                lead.phone == submission.phone
                    || lead.email.eq_ignore_ascii_case(&submission.email)
            })
            .count();
        Ok(recent > 0)
    }

    async fn schedule_drips(&self, lead: &LeadEntity) {
        let now = Utc::now();
        let followups = [
            (DripTemplate::Follow24h, now + Duration::hours(24)),
            (DripTemplate::Follow72h, now + Duration::hours(72)),
        ];
        for (template, run_at) in followups {
            let event = DripEventEntity {
                id: gen_id("drip"),
                lead_id: lead.id.clone(),
                run_at,
                template,
                sent: None,
            };
            if let Err(err) = self.drip_repository.enqueue(event).await {
                error!(
                    lead_id = %lead.id,
                    template = template.as_str(),
                    error = ?err,
                    "intake: failed to enqueue drip follow-up"
                );
            }
        }
    }

    fn spawn_delivery(&self, lead: LeadEntity) {
        let delivery_usecase = Arc::clone(&self.delivery_usecase);
        tokio::spawn(async move {
            delivery_usecase
                .deliver(&lead, &RoutingContext::default())
                .await;
        });
    }
}

fn validate_required(submission: &LeadSubmission) -> IntakeResult<()> {
    let fields = [
        ("name", &submission.name),
        ("email", &submission.email),
        ("phone", &submission.phone),
        ("service", &submission.service),
        ("message", &submission.message),
    ];
    for (field, value) in fields {
        if value.trim().is_empty() {
            return Err(IntakeError::MissingField(field));
        }
    }
    Ok(())
}

fn spam_reason(message: &str) -> Option<&'static str> {
    let lower = message.to_lowercase();
    if BANNED_KEYWORDS.iter().any(|keyword| lower.contains(keyword)) {
        return Some("contains prohibited terms");
    }
    if lower.matches("http://").count() + lower.matches("https://").count() > MAX_MESSAGE_URLS {
        return Some("too many urls");
    }
    if message.len() < MIN_MESSAGE_LEN {
        return Some("message too short");
    }
    if message.len() > MAX_MESSAGE_LEN {
        return Some("message too long");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{
        drip_queue::DripQueueRepository, leads::LeadRepository, ledger::SnapshotLog,
        notification::MockNotificationGateway,
    };
    use crate::domain::value_objects::enums::{
        budget_bands::BudgetBand, urgency_tiers::UrgencyTier,
    };
    use crate::infrastructure::ledger::{
        memory::MemorySnapshotLog,
        repositories::{
            buyers::LedgerBuyerRepository, drip_queue::LedgerDripQueueRepository,
            lead_deliveries::LedgerLeadDeliveryRepository, leads::LedgerLeadRepository,
        },
    };

    type TestUseCase = LeadIntakeUseCase<
        LedgerLeadRepository,
        LedgerDripQueueRepository,
        LedgerBuyerRepository,
        LedgerLeadDeliveryRepository,
        MockNotificationGateway,
    >;

    fn usecase() -> (
        TestUseCase,
        Arc<LedgerLeadRepository>,
        Arc<LedgerDripQueueRepository>,
        Arc<AnalyticsTracker>,
    ) {
        let store: Arc<dyn SnapshotLog> = Arc::new(MemorySnapshotLog::new());
        let lead_repo = Arc::new(LedgerLeadRepository::new(Arc::clone(&store)));
        let drip_repo = Arc::new(LedgerDripQueueRepository::new(Arc::clone(&store)));
        let analytics = Arc::new(AnalyticsTracker::new(100));

        // No buyers exist in these tests, so the detached delivery task ends
        // at "no eligible buyer" and the gateway stays untouched.
        let delivery = Arc::new(LeadDeliveryUseCase::new(
            Arc::new(LedgerBuyerRepository::new(Arc::clone(&store))),
            Arc::new(LedgerLeadDeliveryRepository::new(Arc::clone(&store))),
            Arc::new(MockNotificationGateway::new()),
            Arc::clone(&analytics),
        ));

        (
            LeadIntakeUseCase::new(
                Arc::clone(&lead_repo),
                Arc::clone(&drip_repo),
                delivery,
                Arc::clone(&analytics),
            ),
            lead_repo,
            drip_repo,
            analytics,
        )
    }

    fn submission() -> LeadSubmission {
        LeadSubmission {
            name: "Dana".to_string(),
            email: "Dana@Example.com".to_string(),
            phone: "780-555-0100".to_string(),
            service: "Interior Painting".to_string(),
            message: "Two bedrooms and a hallway, looking for a quote".to_string(),
            urgency: Some(UrgencyTier::Asap),
            budget_band: Some(BudgetBand::TenKPlus),
            addons: vec!["ceilings".to_string()],
            utm: None,
            photos: 2,
            consent_share: true,
            website: None,
        }
    }

    #[tokio::test]
    async fn accepted_lead_is_scored_persisted_and_dripped() {
        let (usecase, lead_repo, drip_repo, _) = usecase();

        let outcome = usecase.submit(submission()).await.unwrap();
        let IntakeOutcome::Accepted(lead) = outcome else {
            panic!("expected acceptance");
        };
        assert_eq!(lead.raw_score, 101);
        assert_eq!(lead.normalized_score, 81);
        assert_eq!(lead.status, LeadStatus::New);
        assert!(!lead.duplicate_recent);

        let stored = lead_repo.find_by_id(&lead.id).await.unwrap().unwrap();
        assert_eq!(stored, lead);

        let due = drip_repo
            .list_pending(Utc::now() + Duration::hours(100))
            .await
            .unwrap();
        assert_eq!(due.len(), 2);
        assert!(drip_repo.list_pending(Utc::now()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_fields_are_rejected_before_persistence() {
        let (usecase, lead_repo, _, _) = usecase();
        let result = usecase
            .submit(LeadSubmission {
                phone: String::new(),
                ..submission()
            })
            .await;

        assert!(matches!(result, Err(IntakeError::MissingField("phone"))));
        assert!(
            lead_repo
                .list(Default::default())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn consent_is_mandatory() {
        let (usecase, _, _, _) = usecase();
        let result = usecase
            .submit(LeadSubmission {
                consent_share: false,
                ..submission()
            })
            .await;
        assert!(matches!(result, Err(IntakeError::ConsentRequired)));
    }

    #[tokio::test]
    async fn spammy_messages_are_rejected() {
        let (usecase, _, _, _) = usecase();
        let result = usecase
            .submit(LeadSubmission {
                message: "best crypto investment returns guaranteed".to_string(),
                ..submission()
            })
            .await;
        assert!(matches!(result, Err(IntakeError::Spam(_))));

        let result = usecase
            .submit(LeadSubmission {
                message: "short".to_string(),
                ..submission()
            })
            .await;
        assert!(matches!(
            result,
            Err(IntakeError::Spam("message too short"))
        ));
    }

    #[tokio::test]
    async fn honeypot_submissions_are_discarded_silently() {
        let (usecase, lead_repo, drip_repo, analytics) = usecase();
        let outcome = usecase
            .submit(LeadSubmission {
                website: Some("https://spam.example.com".to_string()),
                ..submission()
            })
            .await
            .unwrap();

        assert!(matches!(outcome, IntakeOutcome::Discarded));
        assert!(
            lead_repo
                .list(Default::default())
                .await
                .unwrap()
                .is_empty()
        );
        assert!(
            drip_repo
                .list_pending(Utc::now() + Duration::hours(100))
                .await
                .unwrap()
                .is_empty()
        );
        let events = analytics.list_recent(10).await;
        assert_eq!(events[0].event_type, "lead.bot_caught");
    }

    #[tokio::test]
    async fn repeat_contact_within_the_window_is_flagged_duplicate() {
        let (usecase, _, _, _) = usecase();

        let first = usecase.submit(submission()).await.unwrap();
        let IntakeOutcome::Accepted(first) = first else {
            panic!("expected acceptance");
        };
        assert!(!first.duplicate_recent);

        // Same phone, different email casing.
        let second = usecase
            .submit(LeadSubmission {
                email: "DANA@example.COM".to_string(),
                ..submission()
            })
            .await
            .unwrap();
        let IntakeOutcome::Accepted(second) = second else {
            panic!("expected acceptance");
        };
        assert!(second.duplicate_recent);
    }
}
