pub mod calendar;
pub mod engine;
pub mod forecast;
pub mod ip;
pub mod pipeline;
pub mod scoring;
pub mod verifier;

pub use crate::domain::model::{
    AttendanceDay, AttendanceStatus, AttendanceValidationInput, AttendanceValidationResult,
    CheckInRecord, CheckInVerdict, EmployeePerformance, EvaluationBatch, EvaluationReport,
    ForecastResult, IpRange, LeavePeriod, LeaveRecord, PerformanceResult, ReportSummary,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
