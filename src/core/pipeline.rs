use crate::core::calendar::{month_start, overlap_working_days, trailing_month_starts, working_days_between};
use crate::core::forecast::{predict_next_month_leaves, FORECAST_WINDOW};
use crate::core::scoring::calculate_performance_score;
use crate::core::verifier::validate_attendance;
use crate::core::{
    AttendanceDay, AttendanceStatus, AttendanceValidationInput, CheckInRecord, CheckInVerdict,
    ConfigProvider, EmployeePerformance, EvaluationBatch, EvaluationReport, LeavePeriod,
    LeaveRecord, Pipeline, ReportSummary, Storage,
};
use crate::utils::error::{EvalError, Result};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

pub const VERDICTS_FILE: &str = "checkin_verdicts.csv";
pub const PERFORMANCE_FILE: &str = "performance.csv";
pub const REPORT_FILE: &str = "report.json";
pub const SUMMARY_FILE: &str = "summary.json";

/// Reads check-ins and leaves from CSV, evaluates them, and writes the report files.
pub struct CsvPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> CsvPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    async fn read_csv<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let data = self.storage.read_file(path).await?;
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data.as_slice());

        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        tracing::debug!("Read {} rows from {}", rows.len(), path);
        Ok(rows)
    }

    fn output_file(&self, name: &str) -> String {
        format!("{}/{}", self.config.output_path(), name)
    }

    fn wants(&self, format: &str) -> bool {
        self.config.output_formats().iter().any(|f| f == format)
    }
}

fn to_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.into_inner().map_err(|e| EvalError::ProcessingError {
        message: format!("Failed to flush CSV output: {}", e),
    })
}

/// Verifies every check-in in file order against the configured trust snapshot.
///
/// Nominated devices are added to the working registry so a device is only
/// nominated once per batch. A check-in without a device id is still judged,
/// but there is nothing to register for it.
fn verify_checkins<C: ConfigProvider>(
    config: &C,
    checkins: &[CheckInRecord],
) -> Result<(Vec<CheckInVerdict>, Vec<String>)> {
    let mut input = AttendanceValidationInput {
        approved_device_ids: config.approved_devices().iter().cloned().collect(),
        unverified_device_ids: config.unverified_devices().iter().cloned().collect(),
        whitelisted_ip_ranges: config.whitelisted_ranges()?,
        ..Default::default()
    };

    let mut verdicts = Vec::with_capacity(checkins.len());
    let mut newly_unverified = Vec::new();

    for checkin in checkins {
        input.ip.clone_from(&checkin.ip);
        input.device_id.clone_from(&checkin.device_id);

        let verdict = match validate_attendance(&input) {
            Ok(result) => {
                let nominated = result.should_add_to_unverified && !checkin.device_id.is_empty();
                if nominated {
                    input.unverified_device_ids.insert(checkin.device_id.clone());
                    newly_unverified.push(checkin.device_id.clone());
                }
                CheckInVerdict {
                    employee_id: checkin.employee_id.clone(),
                    date: checkin.date,
                    ip: checkin.ip.clone(),
                    device_id: checkin.device_id.clone(),
                    status: result.status,
                    suspicious: result.suspicious,
                    nominated_unverified: nominated,
                    needs_review: false,
                }
            }
            Err(e @ EvalError::MalformedAddress { .. }) => {
                tracing::warn!(
                    "Check-in by {} on {} sent to manual review: {}",
                    checkin.employee_id,
                    checkin.date,
                    e
                );
                CheckInVerdict {
                    employee_id: checkin.employee_id.clone(),
                    date: checkin.date,
                    ip: checkin.ip.clone(),
                    device_id: checkin.device_id.clone(),
                    status: AttendanceStatus::ManualAdjustment,
                    suspicious: true,
                    nominated_unverified: false,
                    needs_review: true,
                }
            }
            Err(e) => return Err(e),
        };
        verdicts.push(verdict);
    }

    Ok((verdicts, newly_unverified))
}

fn attendance_days(checkins: &[&CheckInRecord]) -> Vec<AttendanceDay> {
    let mut by_date: BTreeMap<NaiveDate, bool> = BTreeMap::new();
    for checkin in checkins {
        let on_time = by_date.entry(checkin.date).or_insert(false);
        *on_time |= checkin.on_time;
    }

    by_date
        .into_iter()
        .map(|(date, is_on_time)| AttendanceDay {
            date_key: date.to_string(),
            is_present: true,
            is_on_time,
        })
        .collect()
}

fn leave_periods(
    leaves: &[&LeaveRecord],
    period: (NaiveDate, NaiveDate),
    holidays: &[NaiveDate],
) -> Vec<LeavePeriod> {
    leaves
        .iter()
        .map(|leave| LeavePeriod {
            duration: Some(leave.duration.unwrap_or_else(|| {
                overlap_working_days(leave.start_date, leave.end_date, period.0, period.1, holidays)
            })),
        })
        .collect()
}

/// Leave records started in each of the months ending with the period end month.
fn monthly_leave_counts(leaves: &[LeaveRecord], period_end: NaiveDate) -> Vec<u32> {
    trailing_month_starts(period_end, FORECAST_WINDOW as u32)
        .into_iter()
        .map(|month| {
            leaves
                .iter()
                .filter(|leave| month_start(leave.start_date) == month)
                .count() as u32
        })
        .collect()
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CsvPipeline<S, C> {
    async fn extract(&self) -> Result<EvaluationBatch> {
        let checkins: Vec<CheckInRecord> = self.read_csv(self.config.checkins_path()).await?;

        if let Some(row) = checkins.iter().position(|c| c.employee_id.is_empty()) {
            return Err(EvalError::ValidationError {
                message: format!("Check-in row {} has no employee_id", row + 1),
            });
        }

        let leaves: Vec<LeaveRecord> = if self.config.leaves_path().is_empty() {
            tracing::debug!("No leave file configured");
            Vec::new()
        } else {
            self.read_csv(self.config.leaves_path()).await?
        };

        if let Some(leave) = leaves.iter().find(|l| l.end_date < l.start_date) {
            return Err(EvalError::ValidationError {
                message: format!(
                    "Leave for {} ends ({}) before it starts ({})",
                    leave.employee_id, leave.end_date, leave.start_date
                ),
            });
        }

        Ok(EvaluationBatch { checkins, leaves })
    }

    async fn transform(&self, batch: EvaluationBatch) -> Result<EvaluationReport> {
        let (period_start, period_end) = self.config.period();
        let holidays = self.config.holidays();
        let working_days = working_days_between(period_start, period_end, holidays);

        let in_period = |date: NaiveDate| date >= period_start && date <= period_end;

        let (checkins, skipped): (Vec<CheckInRecord>, Vec<CheckInRecord>) =
            batch.checkins.into_iter().partition(|c| in_period(c.date));
        if !skipped.is_empty() {
            tracing::info!(
                "Skipped {} check-ins dated outside {} .. {}",
                skipped.len(),
                period_start,
                period_end
            );
        }

        let (verdicts, newly_unverified_devices) = verify_checkins(&self.config, &checkins)?;

        let mut checkins_by_employee: BTreeMap<&str, Vec<&CheckInRecord>> = BTreeMap::new();
        for checkin in &checkins {
            checkins_by_employee
                .entry(checkin.employee_id.as_str())
                .or_default()
                .push(checkin);
        }

        let mut leaves_by_employee: BTreeMap<&str, Vec<&LeaveRecord>> = BTreeMap::new();
        for leave in batch
            .leaves
            .iter()
            .filter(|l| l.start_date <= period_end && l.end_date >= period_start)
        {
            leaves_by_employee
                .entry(leave.employee_id.as_str())
                .or_default()
                .push(leave);
        }

        let employees: BTreeSet<&str> = checkins_by_employee
            .keys()
            .chain(leaves_by_employee.keys())
            .copied()
            .collect();

        let performance = employees
            .into_iter()
            .map(|employee_id| {
                let days = attendance_days(
                    checkins_by_employee.get(employee_id).map(Vec::as_slice).unwrap_or(&[]),
                );
                let leaves = leave_periods(
                    leaves_by_employee.get(employee_id).map(Vec::as_slice).unwrap_or(&[]),
                    (period_start, period_end),
                    holidays,
                );
                let result = calculate_performance_score(&days, &leaves, working_days);

                EmployeePerformance {
                    employee_id: employee_id.to_string(),
                    working_days,
                    present_days: days.iter().filter(|d| d.is_present).count(),
                    leave_days: leaves.iter().filter_map(|l| l.duration).sum(),
                    score: result.score,
                    attendance_ratio: result.attendance_ratio,
                    punctuality_ratio: result.punctuality_ratio,
                    leave_ratio: result.leave_ratio,
                }
            })
            .collect();

        let monthly_leave_counts = monthly_leave_counts(&batch.leaves, period_end);
        let leave_forecast = predict_next_month_leaves(&monthly_leave_counts);

        let count_status = |status: AttendanceStatus| verdicts.iter().filter(|v| v.status == status).count();
        let summary = ReportSummary {
            period_start,
            period_end,
            working_days,
            checkins_evaluated: verdicts.len(),
            in_office: count_status(AttendanceStatus::InOffice),
            remote: count_status(AttendanceStatus::Remote),
            manual_review: count_status(AttendanceStatus::ManualAdjustment),
            newly_unverified_devices,
            monthly_leave_counts,
            leave_forecast,
        };

        Ok(EvaluationReport {
            verdicts,
            performance,
            summary,
        })
    }

    async fn load(&self, report: EvaluationReport) -> Result<String> {
        if self.wants("csv") {
            self.storage
                .write_file(&self.output_file(VERDICTS_FILE), &to_csv(&report.verdicts)?)
                .await?;
            self.storage
                .write_file(&self.output_file(PERFORMANCE_FILE), &to_csv(&report.performance)?)
                .await?;
        }

        if self.wants("json") {
            let full = serde_json::json!({
                "summary": &report.summary,
                "performance": &report.performance,
                "verdicts": &report.verdicts,
            });
            self.storage
                .write_file(&self.output_file(REPORT_FILE), &serde_json::to_vec_pretty(&full)?)
                .await?;
        }

        // summary 永遠輸出
        self.storage
            .write_file(
                &self.output_file(SUMMARY_FILE),
                &serde_json::to_vec_pretty(&report.summary)?,
            )
            .await?;

        Ok(self.config.output_path().to_string())
    }
}
