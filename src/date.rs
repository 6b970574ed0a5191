use chrono::NaiveDate;

use crate::error::AnalyzeError;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Check that `date` has the `DD/Mon/YYYY` shape used in access log
/// timestamps and names a real calendar day.
pub fn validate_target_date(date: &str) -> Result<NaiveDate, AnalyzeError> {
    let invalid = || AnalyzeError::InvalidTargetDateFormat(date.to_string());

    let mut parts = date.split('/');
    let (Some(day), Some(month), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let all_digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(day, 2) || !all_digits(year, 4) || !MONTHS.contains(&month) {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(date, "%d/%b/%Y").map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_log_style_dates() {
        let date = validate_target_date("28/Feb/2019").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2019, 2, 28).unwrap());
        assert!(validate_target_date("29/Feb/2020").is_ok());
        assert!(validate_target_date("01/Dec/1999").is_ok());
    }

    #[test]
    fn rejects_other_shapes() {
        for date in [
            "",
            "2019-02-28",
            "1/Feb/2019",
            "28/feb/2019",
            "28/FEB/2019",
            "28/February/2019",
            "28/Feb/19",
            "28/Feb/2019/",
            "28/Feb/2019:10:00:00",
        ] {
            assert!(
                matches!(
                    validate_target_date(date),
                    Err(AnalyzeError::InvalidTargetDateFormat(ref d)) if d == date
                ),
                "{date:?}"
            );
        }
    }

    #[test]
    fn rejects_impossible_days() {
        assert!(validate_target_date("30/Feb/2019").is_err());
        assert!(validate_target_date("29/Feb/2019").is_err());
        assert!(validate_target_date("32/Jan/2019").is_err());
    }
}
