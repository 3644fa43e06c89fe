use crate::error::{Error, Result};

pub const MIN_NAME_LEN: usize = 1;
pub const MAX_NAME_LEN: usize = 16;
pub const MIN_USAGE_LEN: usize = 5;
pub const MAX_USAGE_LEN: usize = 252;

fn validate_length(value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(Error::InvalidLength {
            value: value.to_string(),
            min,
            max,
        });
    }
    Ok(())
}

/// Form and label names: 1-16 ASCII letters.
pub fn validate_name(name: &str) -> Result<()> {
    validate_length(name, MIN_NAME_LEN, MAX_NAME_LEN)?;
    if !name.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::InvalidCharset(name.to_string()));
    }
    Ok(())
}

pub fn validate_usage(usage: &str) -> Result<()> {
    validate_length(usage, MIN_USAGE_LEN, MAX_USAGE_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_accepts_letters() {
        assert!(validate_name("a").is_ok());
        assert!(validate_name("abc").is_ok());
        assert!(validate_name("MixedCase").is_ok());
        assert!(validate_name(&"a".repeat(16)).is_ok());
    }

    #[test]
    fn test_validate_name_length() {
        assert!(matches!(
            validate_name(""),
            Err(Error::InvalidLength { min: 1, max: 16, .. })
        ));
        assert!(matches!(
            validate_name(&"a".repeat(17)),
            Err(Error::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_validate_name_charset() {
        assert!(matches!(validate_name("a1"), Err(Error::InvalidCharset(_))));
        assert!(matches!(validate_name("a12b"), Err(Error::InvalidCharset(_))));
        assert!(matches!(validate_name("z z"), Err(Error::InvalidCharset(_))));
        assert!(matches!(validate_name("née"), Err(Error::InvalidCharset(_))));
    }

    #[test]
    fn test_validate_name_length_checked_before_charset() {
        assert!(matches!(
            validate_name("1234567890abcdefg"),
            Err(Error::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_validate_usage_bounds() {
        assert!(validate_usage("abcd").is_err());
        assert!(validate_usage("abcde").is_ok());
        assert!(validate_usage(&"x".repeat(252)).is_ok());
        assert!(matches!(
            validate_usage(&"x".repeat(253)),
            Err(Error::InvalidLength { min: 5, max: 252, .. })
        ));
    }

    #[test]
    fn test_validate_usage_counts_characters() {
        assert!(validate_usage("ééééé").is_ok());
        assert!(validate_usage("éééé").is_err());
    }
}
