//! Pure health aggregation over one status snapshot.
//!
//! No I/O and no timers: everything here is a deterministic function of
//! the member statuses it is given.

use crate::types::MemberStatus;

/// Derived health roll-up for one snapshot. Computed fresh per poll,
/// never stored.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HealthSummary {
    /// Number of members reporting the healthy sentinel.
    pub healthy_count: usize,
    /// Total number of members in the snapshot.
    pub total: usize,
    /// Name of the elected leader, if any member reports PRIMARY.
    pub primary: Option<String>,
}

impl HealthSummary {
    /// One-line summary in the shape the status page shows it.
    #[must_use]
    pub fn headline(&self) -> String {
        let primary = self.primary.as_deref().unwrap_or("none");
        format!(
            "{}/{} nodes healthy, primary: {}",
            self.healthy_count, self.total, primary
        )
    }
}

/// Roll up per-member statuses into a [`HealthSummary`].
///
/// The primary is the first member in input order whose state is PRIMARY.
/// A snapshot that transiently shows two primaries mid-election therefore
/// resolves deterministically instead of failing.
#[must_use]
pub fn summarize(members: &[MemberStatus]) -> HealthSummary {
    let healthy_count = members.iter().filter(|m| m.is_healthy()).count();
    let primary = members
        .iter()
        .find(|m| m.state.is_primary())
        .map(|m| m.name.clone());

    HealthSummary {
        healthy_count,
        total: members.len(),
        primary,
    }
}

/// Format a member uptime for display.
///
/// Zero or missing uptime reads "unavailable"; larger values truncate at
/// each unit boundary (no rounding).
#[must_use]
pub fn format_uptime(seconds: Option<u64>) -> String {
    let Some(seconds) = seconds.filter(|s| *s > 0) else {
        return "unavailable".to_string();
    };

    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes} minutes")
    } else {
        format!("{seconds} seconds")
    }
}

/// Format a member's ping for display.
///
/// Ping is only meaningful for healthy members; unhealthy or unreported
/// pings read "N/A".
#[must_use]
pub fn format_ping(member: &MemberStatus) -> String {
    match member.ping_ms {
        Some(ms) if member.is_healthy() => format!("{ms} ms"),
        _ => "N/A".to_string(),
    }
}
