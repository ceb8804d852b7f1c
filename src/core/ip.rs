use crate::domain::model::IpRange;
use crate::utils::error::{EvalError, Result};
use std::collections::HashMap;

pub const LOOPBACK_V4: &str = "127.0.0.1";
pub const LOOPBACK_V6: &str = "::1";
pub const UNSPECIFIED_V4: &str = "0.0.0.0";

const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
const REAL_IP_HEADER: &str = "x-real-ip";

fn malformed(ip: &str, reason: impl Into<String>) -> EvalError {
    EvalError::MalformedAddress {
        ip: ip.to_string(),
        reason: reason.into(),
    }
}

/// Converts a dotted-quad IPv4 string into its big-endian `u32` value.
///
/// Each of the four octets must be plain decimal digits no larger than 255.
pub fn ip_to_int(ip: &str) -> Result<u32> {
    let octets: Vec<&str> = ip.split('.').collect();
    if octets.len() != 4 {
        return Err(malformed(ip, format!("expected 4 octets, found {}", octets.len())));
    }

    octets.iter().try_fold(0u32, |acc, octet| -> Result<u32> {
        if octet.is_empty() || !octet.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed(ip, format!("octet '{}' is not a decimal number", octet)));
        }
        let value: u8 = octet
            .parse()
            .map_err(|_| malformed(ip, format!("octet '{}' is out of range 0-255", octet)))?;
        Ok((acc << 8) | u32::from(value))
    })
}

pub fn int_to_ip(value: u32) -> String {
    let [a, b, c, d] = value.to_be_bytes();
    format!("{}.{}.{}.{}", a, b, c, d)
}

/// Picks the client address from request headers.
///
/// The first entry of `X-Forwarded-For` wins, then `X-Real-IP`, then loopback.
/// Header names match case-insensitively; an exact lowercase key is preferred,
/// otherwise the lowest key in byte order among the case variants is used.
pub fn resolve_client_ip(headers: &HashMap<String, String>) -> String {
    let header = |name: &str| {
        headers.get(name).map(String::as_str).or_else(|| {
            headers
                .iter()
                .filter(|(key, _)| key.eq_ignore_ascii_case(name))
                .min_by(|(a, _), (b, _)| a.cmp(b))
                .map(|(_, value)| value.as_str())
        })
    };

    let forwarded = header(FORWARDED_FOR_HEADER)
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let direct = header(REAL_IP_HEADER)
        .map(str::trim)
        .filter(|value| !value.is_empty());

    normalize_client_ip(forwarded.or(direct).unwrap_or(LOOPBACK_V4))
}

/// Maps IPv6 loopback to IPv4 loopback and any other IPv6 address to `0.0.0.0`,
/// so it can never fall inside an IPv4 whitelist. IPv4 input passes through.
pub fn normalize_client_ip(ip: &str) -> String {
    let ip = ip.trim();
    if ip == LOOPBACK_V6 {
        LOOPBACK_V4.to_string()
    } else if ip.contains(':') {
        tracing::debug!("IPv6 client address {} mapped to {}", ip, UNSPECIFIED_V4);
        UNSPECIFIED_V4.to_string()
    } else {
        ip.to_string()
    }
}

impl IpRange {
    /// Builds a range, rejecting inverted bounds.
    pub fn new(min_int: u32, max_int: u32) -> Result<Self> {
        if min_int > max_int {
            return Err(EvalError::InvalidIpRange {
                min: int_to_ip(min_int),
                max: int_to_ip(max_int),
            });
        }
        Ok(Self { min_int, max_int })
    }

    pub fn from_bounds(start: &str, end: &str) -> Result<Self> {
        Self::new(ip_to_int(start.trim())?, ip_to_int(end.trim())?)
    }

    pub fn from_cidr(cidr: &str) -> Result<Self> {
        let (base, prefix) = cidr
            .split_once('/')
            .ok_or_else(|| malformed(cidr, "CIDR block needs a '/prefix' suffix"))?;

        let prefix: u32 = prefix
            .trim()
            .parse()
            .ok()
            .filter(|p| *p <= 32)
            .ok_or_else(|| malformed(cidr, "prefix length must be between 0 and 32"))?;

        let mask = if prefix == 0 { 0 } else { u32::MAX << (32 - prefix) };
        let network = ip_to_int(base.trim())? & mask;

        Ok(Self {
            min_int: network,
            max_int: network | !mask,
        })
    }

    /// Accepts `a.b.c.d-e.f.g.h`, `a.b.c.d/n`, or a single address.
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        if spec.contains('/') {
            Self::from_cidr(spec)
        } else if let Some((start, end)) = spec.split_once('-') {
            Self::from_bounds(start, end)
        } else {
            let single = ip_to_int(spec)?;
            Ok(Self {
                min_int: single,
                max_int: single,
            })
        }
    }

    pub fn contains(&self, ip: u32) -> bool {
        self.min_int <= ip && ip <= self.max_int
    }

    pub fn is_well_formed(&self) -> bool {
        self.min_int <= self.max_int
    }
}

impl std::fmt::Display for IpRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", int_to_ip(self.min_int), int_to_ip(self.max_int))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_ip_to_int_known_values() {
        assert_eq!(ip_to_int("192.168.1.1").unwrap(), 3_232_235_777);
        assert_eq!(ip_to_int("0.0.0.0").unwrap(), 0);
        assert_eq!(ip_to_int("255.255.255.255").unwrap(), u32::MAX);
        assert_eq!(ip_to_int("10.0.0.1").unwrap(), 167_772_161);
    }

    #[test]
    fn test_ip_to_int_matches_shifted_octets() {
        for (a, b, c, d) in [(1u32, 2u32, 3u32, 4u32), (200, 0, 255, 17), (128, 128, 128, 128)] {
            let ip = format!("{}.{}.{}.{}", a, b, c, d);
            assert_eq!(ip_to_int(&ip).unwrap(), (a << 24) | (b << 16) | (c << 8) | d);
        }
    }

    #[test]
    fn test_ip_to_int_rejects_malformed() {
        for bad in ["", "1.2.3", "1.2.3.4.5", "a.b.c.d", "1..2.3", "256.1.1.1", "1.2.3.-4", " 1.2.3.4"] {
            assert!(
                matches!(ip_to_int(bad), Err(EvalError::MalformedAddress { .. })),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_int_to_ip() {
        assert_eq!(int_to_ip(3_232_235_777), "192.168.1.1");
        assert_eq!(int_to_ip(0), "0.0.0.0");
    }

    #[test]
    fn test_resolve_prefers_first_forwarded_entry() {
        let h = headers(&[
            ("X-Forwarded-For", " 203.0.113.7 , 10.0.0.1"),
            ("x-real-ip", "10.0.0.2"),
        ]);
        assert_eq!(resolve_client_ip(&h), "203.0.113.7");
    }

    #[test]
    fn test_resolve_falls_back_to_real_ip_then_loopback() {
        assert_eq!(resolve_client_ip(&headers(&[("X-Real-IP", "10.0.0.2")])), "10.0.0.2");
        assert_eq!(resolve_client_ip(&headers(&[("x-forwarded-for", "")])), LOOPBACK_V4);
        assert_eq!(resolve_client_ip(&HashMap::new()), LOOPBACK_V4);
    }

    #[test]
    fn test_resolve_maps_ipv6() {
        assert_eq!(resolve_client_ip(&headers(&[("x-forwarded-for", "::1")])), LOOPBACK_V4);
        assert_eq!(
            resolve_client_ip(&headers(&[("x-forwarded-for", "2001:db8::1")])),
            UNSPECIFIED_V4
        );
        assert_eq!(
            resolve_client_ip(&headers(&[("x-real-ip", "::ffff:192.168.1.1")])),
            UNSPECIFIED_V4
        );
    }

    #[test]
    fn test_resolve_case_variant_headers_is_stable() {
        for _ in 0..100 {
            let h = headers(&[
                ("X-Forwarded-For", "10.0.0.1"),
                ("x-forwarded-for", "10.0.0.2"),
            ]);
            assert_eq!(resolve_client_ip(&h), "10.0.0.2");
        }

        for _ in 0..100 {
            let h = headers(&[
                ("X-Forwarded-For", "10.0.0.1"),
                ("X-FORWARDED-FOR", "10.0.0.3"),
            ]);
            assert_eq!(resolve_client_ip(&h), "10.0.0.3");
        }
    }

    #[test]
    fn test_normalize_client_ip() {
        assert_eq!(normalize_client_ip("::1"), LOOPBACK_V4);
        assert_eq!(normalize_client_ip("2001:db8::7"), UNSPECIFIED_V4);
        assert_eq!(normalize_client_ip(" 192.168.1.4 "), "192.168.1.4");
        assert_eq!(normalize_client_ip("not-an-ip"), "not-an-ip");
    }

    #[test]
    fn test_range_membership_is_inclusive() {
        let range = IpRange::from_bounds("192.168.1.10", "192.168.1.20").unwrap();
        let min = range.min_int;
        let max = range.max_int;
        assert!(range.contains(min));
        assert!(range.contains(max));
        assert!((min..=max).all(|ip| range.contains(ip)));
        assert!(!range.contains(min - 1));
        assert!(!range.contains(max + 1));
    }

    #[test]
    fn test_range_new_rejects_inverted_bounds() {
        assert!(matches!(IpRange::new(10, 5), Err(EvalError::InvalidIpRange { .. })));
        let inverted = IpRange { min_int: 10, max_int: 5 };
        assert!(!inverted.is_well_formed());
        assert!(!(0..=20).any(|ip| inverted.contains(ip)));
    }

    #[test]
    fn test_range_from_cidr() {
        let range = IpRange::from_cidr("10.1.2.77/24").unwrap();
        assert_eq!(range.to_string(), "10.1.2.0-10.1.2.255");

        let all = IpRange::from_cidr("0.0.0.0/0").unwrap();
        assert_eq!((all.min_int, all.max_int), (0, u32::MAX));

        let host = IpRange::from_cidr("10.0.0.1/32").unwrap();
        assert_eq!(host.min_int, host.max_int);

        assert!(IpRange::from_cidr("10.0.0.0/33").is_err());
        assert!(IpRange::from_cidr("10.0.0.0/x").is_err());
    }

    #[test]
    fn test_range_parse_forms() {
        assert_eq!(
            IpRange::parse("10.0.0.1 - 10.0.0.9").unwrap().to_string(),
            "10.0.0.1-10.0.0.9"
        );
        assert_eq!(IpRange::parse("172.16.0.0/12").unwrap().to_string(), "172.16.0.0-172.31.255.255");
        assert_eq!(IpRange::parse("8.8.8.8").unwrap().to_string(), "8.8.8.8-8.8.8.8");
        assert!(IpRange::parse("10.0.0.9-10.0.0.1").is_err());
        assert!(IpRange::parse("office").is_err());
    }
}
