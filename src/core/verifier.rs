use crate::core::ip::ip_to_int;
use crate::domain::model::{AttendanceStatus, AttendanceValidationInput, AttendanceValidationResult};
use crate::utils::error::Result;

/// Classifies one check-in against the tenant's network whitelist and device lists.
///
/// A check-in counts as in office only from an approved device on a whitelisted
/// network. Any unapproved device is suspicious wherever it connects from, and is
/// nominated for the unverified registry unless it is already listed there.
///
/// The only error is a malformed `ip`, which callers should send to manual review.
pub fn validate_attendance(input: &AttendanceValidationInput) -> Result<AttendanceValidationResult> {
    let ip = ip_to_int(&input.ip)?;

    let in_office_range = input
        .whitelisted_ip_ranges
        .iter()
        .any(|range| range.contains(ip));
    let is_approved = input.approved_device_ids.contains(&input.device_id);
    let is_already_unverified = input.unverified_device_ids.contains(&input.device_id);

    let status = if in_office_range && is_approved {
        AttendanceStatus::InOffice
    } else {
        AttendanceStatus::Remote
    };
    let suspicious = !is_approved;

    let result = AttendanceValidationResult {
        status,
        suspicious,
        should_add_to_unverified: suspicious && !is_already_unverified,
    };

    tracing::debug!(
        ip = %input.ip,
        device_id = %input.device_id,
        in_office_range,
        is_approved,
        status = %result.status,
        "check-in evaluated"
    );

    Ok(result)
}
