//! Store key naming.
//!
//! The naming convention is stable for interop and debuggability: operators
//! can inspect or clear individual keys in a shared store by hand.

use uuid::Uuid;

/// Key of the per-origin failure counter: failed attempts from this origin
/// regardless of target account.
pub fn origin_key(prefix: &str, origin: &str) -> String {
    format!("{prefix}:fail:ip:{origin}")
}

/// Key of the per-origin-per-account failure counter: failed attempts from
/// this origin against this specific account.
pub fn origin_account_key(prefix: &str, origin: &str, account_id: Uuid) -> String {
    format!("{prefix}:fail:ip:{origin}:user:{account_id}")
}

/// Key of the block record: while present, no verification attempt may
/// proceed for this origin.
pub fn block_key(prefix: &str, origin: &str) -> String {
    format!("{prefix}:block:ip:{origin}")
}
