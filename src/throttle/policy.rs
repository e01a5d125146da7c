//! Escalating delay policy.
//!
//! Two failure counters feed the policy. The per-origin counter covers
//! credential stuffing (many accounts, one origin) and doubles the delay on
//! every tenth attempt; the per-origin-per-account counter covers brute
//! force (one account, one origin) and doubles on every single attempt.
//! The resulting delay is the larger of the two contributions.

/// Smallest delay in seconds, also the TTL of the claim placed on every
/// verification attempt.
pub const MIN_DELAY: u64 = 1;

/// Largest delay in seconds. Reaching it is treated as a sustained-attack
/// signal.
pub const MAX_DELAY: u64 = 3600;

/// TTL of the failure counters in seconds. A counter resets to absent if no
/// new failure arrives within this window.
pub const ATTEMPT_WINDOW: u64 = 7200;

/// Compute the block delay in seconds from the two failure counters.
///
/// Total over all of `i64` (non-positive counts contribute nothing),
/// deterministic, and always within `[MIN_DELAY, MAX_DELAY]`.
pub fn delay(origin_count: i64, origin_account_count: i64) -> u64 {
    let origin = if origin_count <= 0 {
        0
    } else if origin_count < 100 {
        // Every 10 attempts form one doubling step: 1..=10 -> 1s,
        // 11..=20 -> 2s, 21..=30 -> 4s, ...
        1u64 << ((origin_count as u64 + 9) / 10 - 1)
    } else {
        MAX_DELAY
    };

    let account = if origin_account_count <= 0 {
        0
    } else if origin_account_count < 10 {
        // Each attempt doubles: 1 -> 1s, 2 -> 2s, 3 -> 4s, ...
        1u64 << (origin_account_count as u64 - 1)
    } else {
        MAX_DELAY
    };

    origin.max(account).max(MIN_DELAY)
}
