//! Persisted consent record and its closed vocabularies (status, permission).

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix of every server-generated consent id.
pub const CONSENT_ID_PREFIX: &str = "ACC-";

/// Lifecycle state of a consent. Only `AwaitingAuthorisation` is written by this service;
/// the rest are set by the external authorisation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConsentStatus {
    #[default]
    AwaitingAuthorisation,
    Authorised,
    Rejected,
    Revoked,
}

impl ConsentStatus {
    pub const ALL: [ConsentStatus; 4] = [
        ConsentStatus::AwaitingAuthorisation,
        ConsentStatus::Authorised,
        ConsentStatus::Rejected,
        ConsentStatus::Revoked,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConsentStatus::AwaitingAuthorisation => "AwaitingAuthorisation",
            ConsentStatus::Authorised => "Authorised",
            ConsentStatus::Rejected => "Rejected",
            ConsentStatus::Revoked => "Revoked",
        }
    }
}

impl fmt::Display for ConsentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsentStatus {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownToken {
                kind: "status",
                value: s.to_string(),
            })
    }
}

/// Account access permission (Open Banking permission codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    ReadAccountsBasic,
    ReadAccountsDetail,
    ReadBalances,
    ReadBeneficiariesBasic,
    ReadBeneficiariesDetail,
    ReadDirectDebits,
    ReadOffers,
    #[serde(rename = "ReadPAN")]
    ReadPan,
    ReadParty,
    #[serde(rename = "ReadPartyPSU")]
    ReadPartyPsu,
    ReadProducts,
    ReadScheduledPaymentsBasic,
    ReadScheduledPaymentsDetail,
    ReadStandingOrdersBasic,
    ReadStandingOrdersDetail,
    ReadStatementsBasic,
    ReadStatementsDetail,
    ReadTransactionsBasic,
    ReadTransactionsCredits,
    ReadTransactionsDebits,
    ReadTransactionsDetail,
}

impl Permission {
    pub const ALL: [Permission; 21] = [
        Permission::ReadAccountsBasic,
        Permission::ReadAccountsDetail,
        Permission::ReadBalances,
        Permission::ReadBeneficiariesBasic,
        Permission::ReadBeneficiariesDetail,
        Permission::ReadDirectDebits,
        Permission::ReadOffers,
        Permission::ReadPan,
        Permission::ReadParty,
        Permission::ReadPartyPsu,
        Permission::ReadProducts,
        Permission::ReadScheduledPaymentsBasic,
        Permission::ReadScheduledPaymentsDetail,
        Permission::ReadStandingOrdersBasic,
        Permission::ReadStandingOrdersDetail,
        Permission::ReadStatementsBasic,
        Permission::ReadStatementsDetail,
        Permission::ReadTransactionsBasic,
        Permission::ReadTransactionsCredits,
        Permission::ReadTransactionsDebits,
        Permission::ReadTransactionsDetail,
    ];

    /// Wire token, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::ReadAccountsBasic => "ReadAccountsBasic",
            Permission::ReadAccountsDetail => "ReadAccountsDetail",
            Permission::ReadBalances => "ReadBalances",
            Permission::ReadBeneficiariesBasic => "ReadBeneficiariesBasic",
            Permission::ReadBeneficiariesDetail => "ReadBeneficiariesDetail",
            Permission::ReadDirectDebits => "ReadDirectDebits",
            Permission::ReadOffers => "ReadOffers",
            Permission::ReadPan => "ReadPAN",
            Permission::ReadParty => "ReadParty",
            Permission::ReadPartyPsu => "ReadPartyPSU",
            Permission::ReadProducts => "ReadProducts",
            Permission::ReadScheduledPaymentsBasic => "ReadScheduledPaymentsBasic",
            Permission::ReadScheduledPaymentsDetail => "ReadScheduledPaymentsDetail",
            Permission::ReadStandingOrdersBasic => "ReadStandingOrdersBasic",
            Permission::ReadStandingOrdersDetail => "ReadStandingOrdersDetail",
            Permission::ReadStatementsBasic => "ReadStatementsBasic",
            Permission::ReadStatementsDetail => "ReadStatementsDetail",
            Permission::ReadTransactionsBasic => "ReadTransactionsBasic",
            Permission::ReadTransactionsCredits => "ReadTransactionsCredits",
            Permission::ReadTransactionsDebits => "ReadTransactionsDebits",
            Permission::ReadTransactionsDetail => "ReadTransactionsDetail",
        }
    }

    /// Joins permissions into the delimited text form used by text-column stores.
    pub fn join(permissions: &[Permission]) -> String {
        permissions
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Inverse of [`Permission::join`]. Order is preserved; an empty string yields no permissions.
    pub fn split(joined: &str) -> Result<Vec<Permission>, UnknownToken> {
        if joined.is_empty() {
            return Ok(Vec::new());
        }
        joined.split(',').map(str::parse::<Permission>).collect()
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownToken {
                kind: "permission",
                value: s.to_string(),
            })
    }
}

/// A stored token that is not part of its vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} token: {value:?}")]
pub struct UnknownToken {
    pub kind: &'static str,
    pub value: String,
}

/// Persisted consent. Never serialized to clients; see [`crate::ConsentResponseData`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConsentRecord {
    pub id: String,
    pub status: ConsentStatus,
    pub creation_time: DateTime<FixedOffset>,
    pub status_update_time: DateTime<FixedOffset>,
    pub expiration_time: DateTime<FixedOffset>,
    /// Request order, duplicates kept.
    pub permissions: Vec<Permission>,
    /// Verbatim JSON of the creation request, kept for audit.
    pub raw_request: String,
}

impl ConsentRecord {
    /// Changes status and stamps `status_update_time`. The two always move together.
    pub fn set_status(&mut self, status: ConsentStatus, at: DateTime<FixedOffset>) {
        self.status = status;
        self.status_update_time = at;
    }
}
