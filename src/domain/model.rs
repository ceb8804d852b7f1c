use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Inclusive, normalized bounds of one allow-listed office network segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IpRange {
    pub min_int: u32,
    pub max_int: u32,
}

/// One check-in attempt plus a snapshot of the tenant's trust state.
#[derive(Debug, Clone, Default)]
pub struct AttendanceValidationInput {
    pub ip: String,
    pub device_id: String,
    pub approved_device_ids: HashSet<String>,
    pub unverified_device_ids: HashSet<String>,
    pub whitelisted_ip_ranges: Vec<IpRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    InOffice,
    Remote,
    /// Reserved for records created outside the automatic check-in path.
    ManualAdjustment,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::InOffice => "IN_OFFICE",
            AttendanceStatus::Remote => "REMOTE",
            AttendanceStatus::ManualAdjustment => "MANUAL_ADJUSTMENT",
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceValidationResult {
    pub status: AttendanceStatus,
    pub suspicious: bool,
    pub should_add_to_unverified: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub sma: f64,
    pub predicted: f64,
    pub trend_increasing: bool,
}

impl ForecastResult {
    /// Returned when fewer than three monthly counts are available.
    pub const INSUFFICIENT: ForecastResult = ForecastResult {
        sma: 0.0,
        predicted: 0.0,
        trend_increasing: false,
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceDay {
    pub date_key: String,
    pub is_present: bool,
    pub is_on_time: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LeavePeriod {
    /// Days consumed within the scoring period; `None` counts as zero.
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceResult {
    pub score: f64,
    pub attendance_ratio: f64,
    pub punctuality_ratio: f64,
    pub leave_ratio: f64,
}

impl PerformanceResult {
    pub const NOT_EVALUABLE: PerformanceResult = PerformanceResult {
        score: 0.0,
        attendance_ratio: 0.0,
        punctuality_ratio: 0.0,
        leave_ratio: 0.0,
    };

    /// The scorer returns the all-zero result for a window with no working days,
    /// so a zero score is only meaningful when this holds.
    pub fn is_evaluable(working_days: i64) -> bool {
        working_days > 0
    }
}

// --- Batch records (CSV rows in, report rows out) ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInRecord {
    pub employee_id: String,
    pub date: NaiveDate,
    pub ip: String,
    pub device_id: String,
    pub on_time: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRecord {
    pub employee_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct EvaluationBatch {
    pub checkins: Vec<CheckInRecord>,
    pub leaves: Vec<LeaveRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInVerdict {
    pub employee_id: String,
    pub date: NaiveDate,
    pub ip: String,
    pub device_id: String,
    pub status: AttendanceStatus,
    pub suspicious: bool,
    pub nominated_unverified: bool,
    pub needs_review: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeePerformance {
    pub employee_id: String,
    pub working_days: i64,
    pub present_days: usize,
    pub leave_days: f64,
    pub score: f64,
    pub attendance_ratio: f64,
    pub punctuality_ratio: f64,
    pub leave_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub working_days: i64,
    pub checkins_evaluated: usize,
    pub in_office: usize,
    pub remote: usize,
    pub manual_review: usize,
    pub newly_unverified_devices: Vec<String>,
    pub monthly_leave_counts: Vec<u32>,
    pub leave_forecast: ForecastResult,
}

#[derive(Debug, Clone)]
pub struct EvaluationReport {
    pub verdicts: Vec<CheckInVerdict>,
    pub performance: Vec<EmployeePerformance>,
    pub summary: ReportSummary,
}
