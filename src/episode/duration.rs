use super::QueryError;

/// Parse an `itunes:duration` style string into seconds.
///
/// Accepts `H:MM:SS` and `M:SS`.  Every field must be an unsigned integer
/// (surrounding whitespace is tolerated); any other shape, including a bare
/// seconds count, is [`QueryError::InvalidFormat`].
pub fn parse_duration(duration: &str) -> Result<u64, QueryError> {
    let fields = duration
        .split(':')
        .map(|field| field.trim().parse::<u64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| QueryError::InvalidFormat(duration.to_string()))?;

    if !(2..=3).contains(&fields.len()) {
        return Err(QueryError::InvalidFormat(duration.to_string()));
    }

    // Base-60 positional sum: [h, m, s] -> s + m*60 + h*3600, [m, s] -> s + m*60.
    fields
        .iter()
        .try_fold(0u64, |acc, &field| acc.checked_mul(60)?.checked_add(field))
        .ok_or_else(|| QueryError::InvalidFormat(duration.to_string()))
}

/// Render seconds as zero-padded `HH:MM:SS`.  Hours are not capped at 99.
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = total_seconds % 3600 / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hours_minutes_seconds() {
        assert_eq!(parse_duration("1:02:03"), Ok(3723));
        assert_eq!(parse_duration("0:00:00"), Ok(0));
    }

    #[test]
    fn parses_minutes_seconds() {
        assert_eq!(parse_duration("2:03"), Ok(123));
        // Minutes are not limited to 59 in the two-field form.
        assert_eq!(parse_duration("75:00"), Ok(4500));
    }

    #[test]
    fn tolerates_whitespace_around_fields() {
        assert_eq!(parse_duration(" 1:00:00 "), Ok(3600));
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert_eq!(
            parse_duration("1:2:3:4"),
            Err(QueryError::InvalidFormat("1:2:3:4".into()))
        );
        assert!(parse_duration("3600").is_err(), "bare seconds are not accepted");
    }

    #[test]
    fn rejects_non_numeric_fields() {
        assert!(parse_duration("1:ab:03").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("-1:00").is_err());
    }

    #[test]
    fn formats_zero_padded() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(3723), "01:02:03");
        assert_eq!(format_hms(100 * 3600 + 59), "100:00:59");
    }
}
