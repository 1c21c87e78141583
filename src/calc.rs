use serde::Serialize;

/// Half-up 2-decimal rounding used for the single-student view:
/// `floor(100x + 0.5) / 100`
pub fn round_off_2_decimals(x: f64) -> f64 {
    ((100.0 * x) + 0.5).floor() / 100.0
}

/// Share of present days as a percentage, unrounded. Zero recorded days
/// means 0, not a division error.
pub fn percent_present(present: i64, total: i64) -> f64 {
    if total > 0 {
        (present as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// Per-student attendance counts. `total_days` is always
/// `present_count + absent_count`; there is no third status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceBreakdown {
    pub present_count: i64,
    pub absent_count: i64,
    pub total_days: i64,
    pub percentage: f64,
}

pub fn breakdown(present: i64, absent: i64) -> AttendanceBreakdown {
    let total = present + absent;
    AttendanceBreakdown {
        present_count: present,
        absent_count: absent,
        total_days: total,
        percentage: round_off_2_decimals(percent_present(present, total)),
    }
}
