//! User input normalization applied before calling `analyze`

use super::error::ApiError;

/// Turn user input into a fully qualified address.
///
/// Whitespace is trimmed; an empty result is rejected locally. Input without
/// a leading `http://` or `https://` gets `https://` prepended. Applying this
/// twice gives the same result as applying it once.
///
/// # Errors
/// Returns [`ApiError::EmptyInput`] when nothing is left after trimming.
pub fn normalize_url(input: &str) -> Result<String, ApiError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ApiError::EmptyInput);
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("https://{trimmed}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_https() {
        assert_eq!(normalize_url("example.com").unwrap(), "https://example.com");
    }

    #[test]
    fn existing_scheme_is_kept() {
        assert_eq!(
            normalize_url("http://example.com").unwrap(),
            "http://example.com"
        );
        assert_eq!(
            normalize_url("https://example.com/a").unwrap(),
            "https://example.com/a"
        );
    }

    #[test]
    fn whitespace_is_trimmed_first() {
        assert_eq!(
            normalize_url("  example.com/path \n").unwrap(),
            "https://example.com/path"
        );
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(normalize_url(""), Err(ApiError::EmptyInput));
        assert_eq!(normalize_url(" \t "), Err(ApiError::EmptyInput));
    }

    #[test]
    fn normalization_is_idempotent() {
        for input in [
            "example.com",
            " http://example.com ",
            "https://a.b/c?d=e",
            "ftp://files.example",
            "HTTP://upper.example",
        ] {
            let once = normalize_url(input).unwrap();
            let twice = normalize_url(&once).unwrap();
            assert_eq!(once, twice, "input {input:?}");
        }
    }

    #[test]
    fn scheme_match_is_case_sensitive() {
        assert_eq!(
            normalize_url("HTTP://upper.example").unwrap(),
            "https://HTTP://upper.example"
        );
    }
}
