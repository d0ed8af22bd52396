//! Lateness policy: grace window, duration formatting and penalty tiers.
//!
//! A staff member gets 15 minutes out before a return counts as late. The
//! overage past that window decides the sanction tier; fines are persisted
//! as text to match the stored schema.

use chrono::{DateTime, Utc};

/// Allowance before a return is considered late, in seconds.
pub const GRACE_SECONDS: i64 = 15 * 60;

/// Overage up to this bound (past the grace window) stays in the light tier.
const LIGHT_TIER_SECONDS: i64 = 3 * 60;

const LIGHT_SANCTION: &str = "Kutip sampah";
const HEAVY_SANCTION: &str = "Kutip sampah / Bersihkan PC / Bersihkan meja";
const HEAVY_FINE: &str = "300";

/// Outcome of evaluating a depart/return pair against the lateness policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Penalty {
    /// Formatted overage past the grace window, not total time away.
    pub duration: String,
    pub sanction: String,
    pub fine: String,
}

/// Formats elapsed seconds as `"<h> Jam <m> Menit <s> Detik"`, skipping
/// zero-valued units. A zero or negative input formats as `"0 Detik"`.
pub fn format_duration(total_seconds: i64) -> String {
    let total_seconds = total_seconds.max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{hours} Jam"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes} Menit"));
    }
    if seconds > 0 {
        parts.push(format!("{seconds} Detik"));
    }

    if parts.is_empty() {
        "0 Detik".to_string()
    } else {
        parts.join(" ")
    }
}

/// Computes the penalty for a completed leave.
///
/// Both instants are UTC; the caller is responsible for normalizing naive
/// wall times beforehand. The returned duration covers only the overage
/// past the grace window.
pub fn evaluate(depart_at: DateTime<Utc>, return_at: DateTime<Utc>) -> Penalty {
    let elapsed = (return_at - depart_at).num_seconds();
    let overtime = (elapsed - GRACE_SECONDS).max(0);

    let (sanction, fine) = if overtime == 0 {
        (String::new(), "0".to_string())
    } else if overtime <= LIGHT_TIER_SECONDS {
        (LIGHT_SANCTION.to_string(), "0".to_string())
    } else {
        (HEAVY_SANCTION.to_string(), HEAVY_FINE.to_string())
    };

    Penalty {
        duration: format_duration(overtime),
        sanction,
        fine,
    }
}
