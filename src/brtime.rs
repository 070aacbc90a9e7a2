//! Wall-clock helpers pinned to the Brazilian UTC-3 offset.
//!
//! Every timestamp this service generates goes through here, so stored
//! measurements stay comparable no matter which device (or which device
//! clock configuration) sent them.

use chrono::{DateTime, FixedOffset, Utc};

const BR_OFFSET_SECS: i32 = 3 * 3600;

/// The fixed UTC-3 offset used for all service-generated stamps.
pub fn br_offset() -> FixedOffset {
    FixedOffset::west_opt(BR_OFFSET_SECS).expect("static offset is in range")
}

/// Current wall-clock time at UTC-3.
pub fn now_br() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&br_offset())
}

/// Re-express a timestamp at UTC-3 without changing the instant.
pub fn to_br(ts: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    ts.with_timezone(&br_offset())
}
