use crate::api::SlackApiError;
use crate::models::LastLogin;
use chrono::{ NaiveDateTime, TimeZone, Utc };
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("access log has no `logins` array")]
    MissingLogins,
    #[error("login record at index {index} has no `user_id`")]
    MissingUserId { index: usize },
    #[error("malformed login record at index {index}: {source}")]
    MalformedRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("login timestamp {0} is out of range")]
    TimestampOutOfRange(i64),
}

/// Last login of `user_id` in an access-log body, as a naive UTC datetime.
///
/// The first matching record wins; later duplicates are not compared.
/// Other users' records only need a `user_id`. Malformed logs are reported
/// and treated as a miss.
pub fn find_last_login(user_id: &str, access_log: &Value) -> Option<NaiveDateTime> {
    match scan_access_log(user_id, access_log) {
        Ok(last_login) => last_login,
        Err(error) => {
            tracing::error!(%error, user_id, "failed to read access log");
            None
        }
    }
}

pub fn scan_access_log(
    user_id: &str,
    access_log: &Value,
) -> Result<Option<NaiveDateTime>, LookupError> {
    let logins = access_log
        .get("logins")
        .and_then(Value::as_array)
        .ok_or(LookupError::MissingLogins)?;

    for (index, entry) in logins.iter().enumerate() {
        let record_user = entry.get("user_id").ok_or(LookupError::MissingUserId { index })?;
        if record_user.as_str() != Some(user_id) {
            continue;
        }
        let date_last = i64::deserialize(entry.get("date_last").unwrap_or(&Value::Null))
            .map_err(|source| LookupError::MalformedRecord { index, source })?;
        let last_seen = Utc
            .timestamp_opt(date_last, 0)
            .single()
            .ok_or(LookupError::TimestampOutOfRange(date_last))?;
        return Ok(Some(last_seen.naive_utc()));
    }
    Ok(None)
}

/// Folds the fetch outcome and the scan into one answer for the handler.
pub fn resolve_last_login(user_id: &str, fetched: Result<Value, SlackApiError>) -> LastLogin {
    match fetched {
        Ok(access_log) => match find_last_login(user_id, &access_log) {
            Some(last_seen) => LastLogin::Found(last_seen),
            None => LastLogin::NotFound,
        },
        Err(error) => {
            tracing::error!(%error, "failed to fetch access logs");
            LastLogin::UpstreamFailure(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn at(ts: i64) -> NaiveDateTime {
        Utc.timestamp_opt(ts, 0).single().expect("valid timestamp").naive_utc()
    }

    #[test]
    fn empty_log_is_a_miss() {
        assert_eq!(find_last_login("U1", &json!({ "logins": [] })), None);
    }

    #[test]
    fn unknown_user_is_a_miss() {
        let log = json!({ "logins": [{ "user_id": "U1", "date_last": 1000 }] });
        assert_eq!(find_last_login("U2", &log), None);
    }

    #[test]
    fn first_matching_record_wins_over_later_newer_one() {
        let log = json!({
            "logins": [
                { "user_id": "U0", "date_last": 5 },
                { "user_id": "U1", "date_last": 1000 },
                { "user_id": "U1", "date_last": 9999 },
            ]
        });
        assert_eq!(find_last_login("U1", &log), Some(at(1000)));
    }

    #[test]
    fn timestamp_is_read_as_naive_utc() {
        let log = json!({ "logins": [{ "user_id": "U1", "date_last": 1_700_000_000 }] });
        let expected = NaiveDate::from_ymd_opt(2023, 11, 14)
            .and_then(|d| d.and_hms_opt(22, 13, 20))
            .expect("valid date");
        assert_eq!(find_last_login("U1", &log), Some(expected));
    }

    #[test]
    fn missing_logins_key_is_a_miss_not_a_panic() {
        assert_eq!(find_last_login("U1", &json!({ "ok": true })), None);
        assert!(matches!(
            scan_access_log("U1", &json!({ "ok": true })),
            Err(LookupError::MissingLogins)
        ));
        assert_eq!(find_last_login("U1", &json!({ "logins": "nope" })), None);
        assert_eq!(find_last_login("U1", &Value::Null), None);
    }

    #[test]
    fn partial_record_of_other_user_does_not_hide_match() {
        let log = json!({
            "logins": [
                { "user_id": "U0" },
                { "user_id": "U1", "date_last": 1000 },
            ]
        });
        assert_eq!(find_last_login("U1", &log), Some(at(1000)));
    }

    #[test]
    fn non_string_user_id_never_matches() {
        let log = json!({
            "logins": [
                { "user_id": 42, "date_last": 5 },
                { "user_id": null, "date_last": 6 },
                { "user_id": "U1", "date_last": 1000 },
            ]
        });
        assert_eq!(find_last_login("U1", &log), Some(at(1000)));
        assert_eq!(find_last_login("42", &log), None);
    }

    #[test]
    fn record_without_user_id_before_match_is_a_miss() {
        let log = json!({
            "logins": [
                { "date_last": 5 },
                { "user_id": "U1", "date_last": 1000 },
            ]
        });
        assert_eq!(find_last_login("U1", &log), None);
        assert!(matches!(
            scan_access_log("U1", &log),
            Err(LookupError::MissingUserId { index: 0 })
        ));
    }

    #[test]
    fn matching_record_with_bad_timestamp_is_a_miss() {
        let log = json!({
            "logins": [
                { "user_id": "U1", "date_last": "yesterday" },
                { "user_id": "U1", "date_last": 1000 },
            ]
        });
        assert_eq!(find_last_login("U1", &log), None);
        assert!(matches!(
            scan_access_log("U1", &log),
            Err(LookupError::MalformedRecord { index: 0, .. })
        ));
    }

    #[test]
    fn malformed_record_after_match_is_never_read() {
        let log = json!({
            "logins": [
                { "user_id": "U1", "date_last": 1000 },
                { "date_last": "garbage" },
            ]
        });
        assert_eq!(find_last_login("U1", &log), Some(at(1000)));
    }

    #[test]
    fn out_of_range_timestamp_is_reported() {
        let log = json!({ "logins": [{ "user_id": "U1", "date_last": i64::MAX }] });
        assert!(matches!(
            scan_access_log("U1", &log),
            Err(LookupError::TimestampOutOfRange(i64::MAX))
        ));
        assert_eq!(find_last_login("U1", &log), None);
    }

    #[test]
    fn resolve_keeps_upstream_failure_apart_from_not_found() {
        let fetched = Err(SlackApiError::Api("invalid_auth".to_string()));
        assert_eq!(
            resolve_last_login("U1", fetched),
            LastLogin::UpstreamFailure("slack api error: invalid_auth".to_string())
        );

        let fetched = Ok(json!({ "ok": true, "logins": [] }));
        assert_eq!(resolve_last_login("U1", fetched), LastLogin::NotFound);

        let fetched = Ok(json!({ "logins": [{ "user_id": "U1", "date_last": 1000 }] }));
        assert_eq!(resolve_last_login("U1", fetched), LastLogin::Found(at(1000)));
    }
}
