//! Recurrence rule value type and storage codec
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.2.0
//!
//! ## Changelog
//! - 1.1.0: Promoted the ad hoc `kind:param` strings to a single codec with a typed decode error
//! - 1.0.0: Initial extraction from the reminder creation handler

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How often a reminder fires, with one bounded parameter per kind.
///
/// Parameters are clamped into their valid range at construction. User input
/// never fails to produce a rule: an unknown kind resolves to `Monthly` and
/// out-of-range parameters saturate at the nearest boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recurrence {
    /// Fire on a given day of every month (1-31, clamped to month length
    /// when the occurrence is computed).
    Monthly {
        /// Day of month, 1-31.
        day: u32,
    },
    /// Fire in a given week of every quarter (1-4).
    Quarterly {
        /// Week of quarter, 1-4.
        week: u32,
    },
    /// Fire in a given month of every year (1-12).
    Annually {
        /// Month of year, 1-12.
        month: u32,
    },
    /// Reserved non-recurring form. Never produced from user input; exists so
    /// an externally written `"once"` row round-trips through the codec.
    Once,
}

/// Failure to decode a stored recurrence string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The string has no `kind:param` separator.
    #[error("recurrence string {0:?} has no kind:param separator")]
    MissingSeparator(String),
    /// The kind before the separator is not one of the known kinds.
    #[error("unknown recurrence kind {0:?}")]
    UnknownKind(String),
    /// The parameter after the separator is not an integer.
    #[error("recurrence parameter {0:?} is not an integer")]
    BadParameter(String),
}

impl Recurrence {
    /// Monthly rule; `day` saturates into 1-31.
    pub fn monthly(day: i64) -> Self {
        Recurrence::Monthly {
            day: day.clamp(1, 31) as u32,
        }
    }

    /// Quarterly rule; `week` saturates into 1-4.
    pub fn quarterly(week: i64) -> Self {
        Recurrence::Quarterly {
            week: week.clamp(1, 4) as u32,
        }
    }

    /// Annual rule; `month` saturates into 1-12.
    pub fn annually(month: i64) -> Self {
        Recurrence::Annually {
            month: month.clamp(1, 12) as u32,
        }
    }

    /// Build a rule from raw creation-request input.
    ///
    /// Only the parameter matching the kind is consulted; a missing parameter
    /// defaults to 1. An unknown or empty kind resolves to `Monthly` rather
    /// than failing, so a creation request can never be rejected for its
    /// recurrence choice.
    pub fn parse(kind: &str, day: Option<i64>, week: Option<i64>, month: Option<i64>) -> Self {
        match kind.trim().to_lowercase().as_str() {
            "quarterly" => Self::quarterly(week.unwrap_or(1)),
            "annually" => Self::annually(month.unwrap_or(1)),
            // "monthly" and anything unrecognized
            _ => Self::monthly(day.unwrap_or(1)),
        }
    }

    /// Compact storage form: `monthly:15`, `quarterly:2`, `annually:6`, `once`.
    pub fn encode(&self) -> String {
        match self {
            Recurrence::Monthly { day } => format!("monthly:{day}"),
            Recurrence::Quarterly { week } => format!("quarterly:{week}"),
            Recurrence::Annually { month } => format!("annually:{month}"),
            Recurrence::Once => "once".to_string(),
        }
    }

    /// Exact inverse of [`encode`](Self::encode).
    ///
    /// Decoded parameters are clamped the same way construction clamps, so a
    /// hand-edited row with an out-of-range parameter still loads.
    pub fn decode(encoded: &str) -> Result<Self, DecodeError> {
        let encoded = encoded.trim();
        if encoded == "once" {
            return Ok(Recurrence::Once);
        }

        let (kind, param) = encoded
            .split_once(':')
            .ok_or_else(|| DecodeError::MissingSeparator(encoded.to_string()))?;
        let value: i64 = param
            .trim()
            .parse()
            .map_err(|_| DecodeError::BadParameter(param.to_string()))?;

        match kind {
            "monthly" => Ok(Self::monthly(value)),
            "quarterly" => Ok(Self::quarterly(value)),
            "annually" => Ok(Self::annually(value)),
            other => Err(DecodeError::UnknownKind(other.to_string())),
        }
    }
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recurrence::Monthly { day } => write!(f, "monthly on day {day}"),
            Recurrence::Quarterly { week } => write!(f, "quarterly in week {week}"),
            Recurrence::Annually { month } => write!(f, "annually in month {month}"),
            Recurrence::Once => write!(f, "once"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_clamps_high() {
        assert_eq!(Recurrence::monthly(45), Recurrence::monthly(31));
        assert_eq!(Recurrence::monthly(45), Recurrence::Monthly { day: 31 });
    }

    #[test]
    fn test_monthly_clamps_low() {
        assert_eq!(Recurrence::monthly(0), Recurrence::Monthly { day: 1 });
        assert_eq!(Recurrence::monthly(-5), Recurrence::Monthly { day: 1 });
    }

    #[test]
    fn test_quarterly_clamps() {
        assert_eq!(Recurrence::quarterly(9), Recurrence::quarterly(4));
        assert_eq!(Recurrence::quarterly(0), Recurrence::Quarterly { week: 1 });
    }

    #[test]
    fn test_annually_clamps() {
        assert_eq!(Recurrence::annually(13), Recurrence::annually(12));
        assert_eq!(Recurrence::annually(-1), Recurrence::Annually { month: 1 });
    }

    #[test]
    fn test_parse_known_kinds() {
        assert_eq!(
            Recurrence::parse("monthly", Some(15), None, None),
            Recurrence::Monthly { day: 15 }
        );
        assert_eq!(
            Recurrence::parse("quarterly", None, Some(2), None),
            Recurrence::Quarterly { week: 2 }
        );
        assert_eq!(
            Recurrence::parse("annually", None, None, Some(6)),
            Recurrence::Annually { month: 6 }
        );
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            Recurrence::parse("Quarterly", None, Some(3), None),
            Recurrence::Quarterly { week: 3 }
        );
    }

    #[test]
    fn test_parse_unknown_kind_defaults_to_monthly() {
        assert_eq!(
            Recurrence::parse("weekly", None, None, None),
            Recurrence::Monthly { day: 1 }
        );
        assert_eq!(
            Recurrence::parse("", None, None, None),
            Recurrence::Monthly { day: 1 }
        );
    }

    #[test]
    fn test_parse_missing_parameter_defaults_to_one() {
        assert_eq!(
            Recurrence::parse("monthly", None, None, None),
            Recurrence::Monthly { day: 1 }
        );
        assert_eq!(
            Recurrence::parse("annually", None, None, None),
            Recurrence::Annually { month: 1 }
        );
    }

    #[test]
    fn test_parse_clamps_parameters() {
        assert_eq!(
            Recurrence::parse("monthly", Some(99), None, None),
            Recurrence::Monthly { day: 31 }
        );
        assert_eq!(
            Recurrence::parse("quarterly", None, Some(9), None),
            Recurrence::Quarterly { week: 4 }
        );
    }

    #[test]
    fn test_encode_forms() {
        assert_eq!(Recurrence::monthly(15).encode(), "monthly:15");
        assert_eq!(Recurrence::quarterly(2).encode(), "quarterly:2");
        assert_eq!(Recurrence::annually(6).encode(), "annually:6");
        assert_eq!(Recurrence::Once.encode(), "once");
    }

    #[test]
    fn test_decode_round_trips_every_constructible_rule() {
        let mut rules = vec![Recurrence::Once];
        for day in 1..=31 {
            rules.push(Recurrence::monthly(day));
        }
        for week in 1..=4 {
            rules.push(Recurrence::quarterly(week));
        }
        for month in 1..=12 {
            rules.push(Recurrence::annually(month));
        }

        for rule in rules {
            assert_eq!(Recurrence::decode(&rule.encode()), Ok(rule));
        }
    }

    #[test]
    fn test_decode_clamps_out_of_range_parameter() {
        assert_eq!(
            Recurrence::decode("monthly:45"),
            Ok(Recurrence::Monthly { day: 31 })
        );
    }

    #[test]
    fn test_decode_missing_separator() {
        assert!(matches!(
            Recurrence::decode("monthly"),
            Err(DecodeError::MissingSeparator(_))
        ));
    }

    #[test]
    fn test_decode_unknown_kind() {
        assert!(matches!(
            Recurrence::decode("weekly:3"),
            Err(DecodeError::UnknownKind(_))
        ));
    }

    #[test]
    fn test_decode_bad_parameter() {
        assert!(matches!(
            Recurrence::decode("monthly:banana"),
            Err(DecodeError::BadParameter(_))
        ));
        assert!(matches!(
            Recurrence::decode("monthly:"),
            Err(DecodeError::BadParameter(_))
        ));
    }

    #[test]
    fn test_serde_round_trip() {
        let rule = Recurrence::quarterly(2);
        let json = serde_json::to_string(&rule).unwrap();
        let restored: Recurrence = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, rule);
    }

    #[test]
    fn test_display() {
        assert_eq!(Recurrence::monthly(15).to_string(), "monthly on day 15");
        assert_eq!(Recurrence::Once.to_string(), "once");
    }
}
