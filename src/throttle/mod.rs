//! Throttle policy and decision engine.

mod engine;
mod keys;
mod policy;

pub use engine::ThrottleEngine;
pub use keys::{block_key, origin_account_key, origin_key};
pub use policy::{delay, ATTEMPT_WINDOW, MAX_DELAY, MIN_DELAY};
