//! DefaultConsentService: the consent lifecycle over a single ConsentStore.

use crate::clock::{Clock, SystemClock};
use crate::validator::validate;
use consent_types::*;
use std::sync::Arc;
use uuid::Uuid;

/// ConsentService that validates requests, assigns ids and the initial status, and
/// persists records in `store`.
pub struct DefaultConsentService<S> {
    pub store: S,
    clock: Arc<dyn Clock>,
}

impl<S> DefaultConsentService<S>
where
    S: ConsentStore + Send + Sync,
{
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    fn new_consent_id() -> String {
        format!("{}{}", CONSENT_ID_PREFIX, Uuid::new_v4())
    }
}

#[async_trait::async_trait]
impl<S> ConsentService for DefaultConsentService<S>
where
    S: ConsentStore + Send + Sync,
{
    async fn create_consent(
        &self,
        req: Option<&ConsentCreateRequest>,
    ) -> Result<ConsentResponse, ConsentServiceError> {
        let now = self.clock.now();
        let valid = validate(req, now)?;

        let record = ConsentRecord {
            id: Self::new_consent_id(),
            status: ConsentStatus::AwaitingAuthorisation,
            creation_time: now,
            status_update_time: now,
            expiration_time: valid.expiration,
            permissions: valid.permissions.to_vec(),
            raw_request: valid.request.snapshot()?,
        };
        // Id collisions overwrite; a v4 uuid makes them practically impossible.
        self.store.save(&record).await?;
        tracing::info!(
            consent_id = %record.id,
            permissions = record.permissions.len(),
            "consent created"
        );

        Ok(ConsentResponse::from(&record))
    }

    async fn get_consent_by_id(&self, id: &str) -> Result<ConsentResponse, ConsentServiceError> {
        tracing::debug!(consent_id = %id, "consent lookup");
        self.store
            .get(id)
            .await?
            .map(|record| ConsentResponse::from(&record))
            .ok_or_else(|| ConsentServiceError::NotFound(id.to_string()))
    }

    async fn delete_consent_by_id(&self, id: &str) -> Result<(), ConsentServiceError> {
        if !self.store.exists_by_id(id).await? {
            return Err(ConsentServiceError::NotFound(id.to_string()));
        }
        // A concurrent delete may win between the check and here.
        if !self.store.delete_by_id(id).await? {
            return Err(ConsentServiceError::NotFound(id.to_string()));
        }
        tracing::info!(consent_id = %id, "consent deleted");
        Ok(())
    }
}
