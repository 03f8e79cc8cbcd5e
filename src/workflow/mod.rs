pub mod lookup_ctx;
pub mod lookup_flow;

pub use lookup_ctx::LookupCtx;
pub use lookup_flow::{classify, give_up, AttemptOutcome, RetryReason};
