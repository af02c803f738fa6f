//! Create-request validation.

use chrono::{DateTime, FixedOffset};
use consent_types::{ConsentCreateRequest, Permission, ValidationError};

/// A create request that passed [`validate`], with its mandatory fields unwrapped.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedRequest<'a> {
    pub request: &'a ConsentCreateRequest,
    pub expiration: DateTime<FixedOffset>,
    pub permissions: &'a [Permission],
}

/// Checks a create request against the business rules at instant `now`.
///
/// Checks run in a fixed order and the first violation wins: body, expiration presence,
/// expiration strictly after `now`, non-empty permissions.
pub fn validate(
    req: Option<&ConsentCreateRequest>,
    now: DateTime<FixedOffset>,
) -> Result<ValidatedRequest<'_>, ValidationError> {
    let request = req.ok_or(ValidationError::MissingBody)?;
    let data = request.data.as_ref().ok_or(ValidationError::MissingBody)?;

    let expiration = data
        .expiration_date_time
        .ok_or(ValidationError::MissingExpiration)?;
    if expiration <= now {
        return Err(ValidationError::ExpirationInPast);
    }

    let permissions = match data.permissions.as_deref() {
        Some(p) if !p.is_empty() => p,
        _ => return Err(ValidationError::NoPermissions),
    };

    Ok(ValidatedRequest {
        request,
        expiration,
        permissions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use consent_types::ConsentCreateData;

    fn ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn request(expiration: DateTime<FixedOffset>, permissions: Vec<Permission>) -> ConsentCreateRequest {
        ConsentCreateRequest {
            data: Some(ConsentCreateData {
                expiration_date_time: Some(expiration),
                permissions: Some(permissions),
            }),
            ..Default::default()
        }
    }

    fn now() -> DateTime<FixedOffset> {
        ts("2024-01-01T00:00:00Z")
    }

    #[test]
    fn accepts_future_expiration_with_permissions() {
        let req = request(
            ts("2030-01-01T00:00:00Z"),
            vec![Permission::ReadAccountsBasic],
        );
        let ok = validate(Some(&req), now()).unwrap();
        assert_eq!(ok.expiration, ts("2030-01-01T00:00:00Z"));
        assert_eq!(ok.permissions, &[Permission::ReadAccountsBasic]);
    }

    #[test]
    fn missing_request_or_data_is_missing_body() {
        assert_eq!(
            validate(None, now()).unwrap_err(),
            ValidationError::MissingBody
        );
        let req = ConsentCreateRequest::default();
        assert_eq!(
            validate(Some(&req), now()).unwrap_err(),
            ValidationError::MissingBody
        );
    }

    #[test]
    fn missing_expiration() {
        let req = ConsentCreateRequest {
            data: Some(ConsentCreateData {
                expiration_date_time: None,
                permissions: Some(vec![Permission::ReadBalances]),
            }),
            ..Default::default()
        };
        assert_eq!(
            validate(Some(&req), now()).unwrap_err(),
            ValidationError::MissingExpiration
        );
    }

    #[test]
    fn expiration_in_past_or_equal_to_now() {
        let past = request(
            ts("2023-12-31T23:59:59Z"),
            vec![Permission::ReadBalances],
        );
        assert_eq!(
            validate(Some(&past), now()).unwrap_err(),
            ValidationError::ExpirationInPast
        );

        // Same instant expressed in another offset.
        let equal = request(
            ts("2024-01-01T02:00:00+02:00"),
            vec![Permission::ReadBalances],
        );
        assert_eq!(
            validate(Some(&equal), now()).unwrap_err(),
            ValidationError::ExpirationInPast
        );
    }

    #[test]
    fn empty_or_absent_permissions() {
        let empty = request(ts("2030-01-01T00:00:00Z"), vec![]);
        assert_eq!(
            validate(Some(&empty), now()).unwrap_err(),
            ValidationError::NoPermissions
        );

        let absent = ConsentCreateRequest {
            data: Some(ConsentCreateData {
                expiration_date_time: Some(ts("2030-01-01T00:00:00Z")),
                permissions: None,
            }),
            ..Default::default()
        };
        assert_eq!(
            validate(Some(&absent), now()).unwrap_err(),
            ValidationError::NoPermissions
        );
    }

    #[test]
    fn expiration_checked_before_permissions() {
        let req = ConsentCreateRequest {
            data: Some(ConsentCreateData {
                expiration_date_time: None,
                permissions: None,
            }),
            ..Default::default()
        };
        assert_eq!(
            validate(Some(&req), now()).unwrap_err(),
            ValidationError::MissingExpiration
        );
    }
}
