use crate::domain::model::{AttendanceDay, LeavePeriod, PerformanceResult};

pub const ATTENDANCE_WEIGHT: f64 = 0.5;
pub const PUNCTUALITY_WEIGHT: f64 = 0.3;
pub const LEAVE_WEIGHT: f64 = 0.2;

/// Computes the composite performance score for one scoring period.
///
/// Ratios are returned as computed, so they can exceed 1 on inconsistent input;
/// only the composite score is clamped to `[0, 1]`. A period without working
/// days yields [`PerformanceResult::NOT_EVALUABLE`].
pub fn calculate_performance_score(
    attendance: &[AttendanceDay],
    leaves: &[LeavePeriod],
    working_days: i64,
) -> PerformanceResult {
    if working_days <= 0 {
        return PerformanceResult::NOT_EVALUABLE;
    }

    let present_days = attendance.iter().filter(|day| day.is_present).count();
    let on_time_days = attendance.iter().filter(|day| day.is_on_time).count();
    let total_check_in_days = attendance.len().max(1);
    let total_leave_days: f64 = leaves.iter().map(|leave| leave.duration.unwrap_or(0.0)).sum();

    let working_days = working_days as f64;
    let attendance_ratio = present_days as f64 / working_days;
    let punctuality_ratio = on_time_days as f64 / total_check_in_days as f64;
    let leave_ratio = total_leave_days / working_days;

    let raw_score = ATTENDANCE_WEIGHT * attendance_ratio
        + PUNCTUALITY_WEIGHT * punctuality_ratio
        + LEAVE_WEIGHT * (1.0 - leave_ratio);

    tracing::trace!(
        attendance_ratio,
        punctuality_ratio,
        leave_ratio,
        raw_score,
        "performance ratios"
    );

    PerformanceResult {
        score: raw_score.clamp(0.0, 1.0),
        attendance_ratio,
        punctuality_ratio,
        leave_ratio,
    }
}
