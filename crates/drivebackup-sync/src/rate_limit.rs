//! Rate-limit classification
//!
//! Drive signals quota pressure with HTTP 403 and one of two reasons in
//! `error.errors[0].reason`. Only those two are transient; any other
//! failure, including a body that cannot be decoded, is treated as fatal.

use drivebackup_core::ports::RemoteError;

/// Status code Drive uses for rate limiting
const RATE_LIMIT_STATUS: u16 = 403;

/// Reasons that mark a 403 as a rate limit
pub const RATE_LIMIT_REASONS: [&str; 2] = ["rateLimitExceeded", "userRateLimitExceeded"];

/// Human-readable messages Drive pairs with those reasons
const RATE_LIMIT_MESSAGES: [&str; 2] = ["Rate Limit Exceeded", "User Rate Limit Exceeded"];

fn is_rate_limit_reason(reason: &str) -> bool {
    RATE_LIMIT_REASONS.contains(&reason)
}

/// Extracts `error.errors[0].reason` from a raw error body
pub fn reason_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("errors")?
        .get(0)?
        .get("reason")?
        .as_str()
        .map(str::to_string)
}

/// Returns true if `err` is a transient rate-limit rejection
///
/// The reason is taken, in order, from the decoded `reason` field, the
/// error message, or the raw body.
pub fn is_rate_limited(err: &RemoteError) -> bool {
    let RemoteError::Api {
        code,
        message,
        reason,
        body,
    } = err
    else {
        return false;
    };

    if *code != RATE_LIMIT_STATUS {
        return false;
    }

    if let Some(reason) = reason {
        return is_rate_limit_reason(reason);
    }

    if is_rate_limit_reason(message) || RATE_LIMIT_MESSAGES.contains(&message.as_str()) {
        return true;
    }

    body.as_deref()
        .and_then(reason_from_body)
        .is_some_and(|r| is_rate_limit_reason(&r))
}
