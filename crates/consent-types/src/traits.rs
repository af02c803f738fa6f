//! Traits for the consent service and its storage backend.

use crate::{ConsentCreateRequest, ConsentRecord, ConsentResponse};
use async_trait::async_trait;

/// Keyed persistence for consent records.
#[async_trait]
pub trait ConsentStore: Send + Sync {
    /// Get one record by id.
    async fn get(&self, id: &str) -> Result<Option<ConsentRecord>, StoreError>;

    /// Insert or replace by `record.id`.
    async fn save(&self, record: &ConsentRecord) -> Result<(), StoreError>;

    async fn exists_by_id(&self, id: &str) -> Result<bool, StoreError>;

    /// Hard delete. Returns whether a record was removed.
    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError>;
}

/// Consent operations exposed to the HTTP boundary.
#[async_trait]
pub trait ConsentService: Send + Sync {
    /// Validate, assign id and initial status, persist, and return the created consent.
    /// `None` stands for a request without a body.
    async fn create_consent(
        &self,
        req: Option<&ConsentCreateRequest>,
    ) -> Result<ConsentResponse, ConsentServiceError>;

    async fn get_consent_by_id(&self, id: &str) -> Result<ConsentResponse, ConsentServiceError>;

    async fn delete_consent_by_id(&self, id: &str) -> Result<(), ConsentServiceError>;
}

/// Business-rule violations in a create request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("The request body and data field cannot be null.")]
    MissingBody,
    #[error("ExpirationDateTime is a mandatory field and must be provided.")]
    MissingExpiration,
    #[error("ExpirationDateTime must be in the future.")]
    ExpirationInPast,
    #[error("At least one permission must be provided.")]
    NoPermissions,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("consent store error: {0}")]
    Other(String),
    /// A stored row could not be decoded back into a record.
    #[error("corrupt consent record: {0}")]
    Corrupt(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConsentServiceError {
    #[error("{0}")]
    InvalidRequest(#[from] ValidationError),
    #[error("Consent not found with ID: {0}")]
    NotFound(String),
    #[error("store: {0}")]
    Store(#[from] StoreError),
    #[error("failed to snapshot request: {0}")]
    Snapshot(#[from] serde_json::Error),
}
