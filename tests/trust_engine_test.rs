use std::collections::{HashMap, HashSet};
use workforce_eval::core::{
    AttendanceDay, AttendanceStatus, AttendanceValidationInput, ForecastResult, IpRange,
    LeavePeriod, PerformanceResult,
};
use workforce_eval::{
    calculate_performance_score, ip_to_int, predict_next_month_leaves, resolve_client_ip,
    validate_attendance, EvalError,
};

fn office_input(ip: &str, device: &str) -> AttendanceValidationInput {
    AttendanceValidationInput {
        ip: ip.to_string(),
        device_id: device.to_string(),
        approved_device_ids: HashSet::from(["desk-01".to_string(), "desk-02".to_string()]),
        unverified_device_ids: HashSet::from(["flagged-77".to_string()]),
        whitelisted_ip_ranges: vec![
            IpRange::parse("10.20.0.0/16").unwrap(),
            IpRange::parse("192.168.5.10-192.168.5.20").unwrap(),
        ],
    }
}

#[test]
fn test_ip_round_trip_over_octet_samples() {
    for a in [0u32, 1, 127, 192, 255] {
        for d in [0u32, 9, 128, 255] {
            let ip = format!("{}.168.{}.{}", a, 255 - d, d);
            let expected = (a << 24) | (168 << 16) | ((255 - d) << 8) | d;
            assert_eq!(ip_to_int(&ip).unwrap(), expected, "{}", ip);
        }
    }
    assert_eq!(ip_to_int("192.168.1.1").unwrap(), 3_232_235_777);
}

#[test]
fn test_range_boundaries_through_verifier() {
    let check = |ip: &str| validate_attendance(&office_input(ip, "desk-01")).unwrap().status;

    assert_eq!(check("192.168.5.10"), AttendanceStatus::InOffice);
    assert_eq!(check("192.168.5.15"), AttendanceStatus::InOffice);
    assert_eq!(check("192.168.5.20"), AttendanceStatus::InOffice);
    assert_eq!(check("192.168.5.9"), AttendanceStatus::Remote);
    assert_eq!(check("192.168.5.21"), AttendanceStatus::Remote);
    assert_eq!(check("10.20.255.255"), AttendanceStatus::InOffice);
    assert_eq!(check("10.21.0.0"), AttendanceStatus::Remote);
}

#[test]
fn test_verifier_is_deterministic() {
    let input = office_input("10.20.3.4", "unknown-device");
    let first = validate_attendance(&input).unwrap();
    for _ in 0..10 {
        assert_eq!(validate_attendance(&input).unwrap(), first);
    }
    assert_eq!(first.status, AttendanceStatus::Remote);
    assert!(first.suspicious);
    assert!(first.should_add_to_unverified);
}

#[test]
fn test_verifier_never_emits_manual_adjustment() {
    for ip in ["10.20.1.1", "8.8.8.8", "0.0.0.0", "255.255.255.255"] {
        for device in ["desk-01", "flagged-77", "", "other"] {
            let result = validate_attendance(&office_input(ip, device)).unwrap();
            assert_ne!(result.status, AttendanceStatus::ManualAdjustment);
        }
    }
}

#[test]
fn test_forwarded_ipv6_client_is_never_in_office() {
    let headers = HashMap::from([("X-Forwarded-For".to_string(), "fe80::1, 10.20.0.1".to_string())]);
    let ip = resolve_client_ip(&headers);
    assert_eq!(ip, "0.0.0.0");

    let result = validate_attendance(&office_input(&ip, "desk-02")).unwrap();
    assert_eq!(result.status, AttendanceStatus::Remote);
    assert!(!result.suspicious);
}

#[test]
fn test_malformed_address_is_surfaced() {
    for ip in ["10.20.1", "10.20.1.x", "10.20.1.300", "localhost"] {
        let err = validate_attendance(&office_input(ip, "desk-01")).unwrap_err();
        assert!(matches!(err, EvalError::MalformedAddress { .. }), "{}", ip);
    }
}

#[test]
fn test_forecast_examples() {
    assert_eq!(predict_next_month_leaves(&[]), ForecastResult::INSUFFICIENT);
    assert_eq!(predict_next_month_leaves(&[5, 6]), ForecastResult::INSUFFICIENT);

    let up = predict_next_month_leaves(&[2, 4, 6]);
    assert!((up.sma - 4.0).abs() < 1e-9);
    assert!((up.predicted - 4.4).abs() < 1e-9);
    assert!(up.trend_increasing);

    let down = predict_next_month_leaves(&[6, 4, 2]);
    assert!((down.predicted - 4.0).abs() < 1e-9);
    assert!(!down.trend_increasing);
}

#[test]
fn test_performance_worked_example() {
    let attendance: Vec<AttendanceDay> = (1..=18)
        .map(|day| AttendanceDay {
            date_key: format!("2024-04-{:02}", day),
            is_present: true,
            is_on_time: day <= 16,
        })
        .collect();
    let leaves = [LeavePeriod { duration: Some(1.0) }, LeavePeriod { duration: Some(1.0) }];

    let result = calculate_performance_score(&attendance, &leaves, 20);
    assert!((result.attendance_ratio - 0.9).abs() < 1e-9);
    assert!((result.punctuality_ratio - 0.888_888_888).abs() < 1e-6);
    assert!((result.leave_ratio - 0.1).abs() < 1e-9);
    assert!((result.score - 0.8967).abs() < 1e-4);
}

#[test]
fn test_performance_bounds() {
    let overfull: Vec<AttendanceDay> = (0..6)
        .map(|i| AttendanceDay {
            date_key: i.to_string(),
            is_present: true,
            is_on_time: true,
        })
        .collect();
    let clamped = calculate_performance_score(&overfull, &[], 5);
    assert!(clamped.attendance_ratio > 1.0);
    assert!((0.0..=1.0).contains(&clamped.score));

    assert_eq!(
        calculate_performance_score(&overfull, &[LeavePeriod { duration: Some(3.0) }], 0),
        PerformanceResult::NOT_EVALUABLE
    );
}
