//! OTP verification: attempt limiting, value comparison, expiry.

use anyhow::Result;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::storage::{UserRecord, UserStore};

/// Failed comparisons are capped at this many per challenge.
pub(crate) const MAX_OTP_ATTEMPTS: i32 = 3;

/// Decision produced by [`verify_otp`].
///
/// `TooManyAttempts` and `Expired` tell the caller to restart the challenge
/// from credential entry; the other failures are reported generically so a
/// caller cannot distinguish an unknown user from a wrong code.
#[derive(Debug)]
pub(crate) enum VerifyOutcome {
    Accepted(UserRecord),
    InvalidUser,
    TooManyAttempts,
    InvalidOtp,
    Expired,
}

/// Check a submitted OTP against the stored challenge.
///
/// Ordering is load-bearing:
/// - the attempt cap is checked before the value comparison and never
///   mutates state once reached;
/// - a mismatch counts one attempt even when the challenge has already
///   expired, so probing an expired challenge still burns attempts;
/// - expiry is only reported for an otherwise correct code, without
///   resetting the counter.
pub(crate) async fn verify_otp(
    users: &dyn UserStore,
    user_id: Uuid,
    submitted_otp: &str,
    now: DateTime<Utc>,
) -> Result<VerifyOutcome> {
    let Some(user) = users.find_user(user_id).await? else {
        return Ok(VerifyOutcome::InvalidUser);
    };

    if user.otp_attempts >= MAX_OTP_ATTEMPTS {
        return Ok(VerifyOutcome::TooManyAttempts);
    }

    // A user without a pending challenge compares as a mismatch.
    if user.otp.as_deref() != Some(submitted_otp) {
        users.increment_otp_attempts(user_id).await?;
        return Ok(VerifyOutcome::InvalidOtp);
    }

    // A missing deadline counts as already expired.
    let expired = user.otp_expires_at.map_or(true, |deadline| deadline < now);
    if expired {
        return Ok(VerifyOutcome::Expired);
    }

    Ok(VerifyOutcome::Accepted(user))
}
