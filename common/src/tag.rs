//! Language tag normalisation helpers.

/// Trim whitespace and discard empty tag candidates.
#[must_use]
pub fn normalise_tag(input: Option<&str>) -> Option<&str> {
    input
        .map(str::trim)
        .and_then(|value| if value.is_empty() { None } else { Some(value) })
}

/// Convert a POSIX locale name such as `de_DE.UTF-8@euro` into `de-DE`.
///
/// The codeset and modifier are dropped and underscores become hyphens. The
/// portable `C` and `POSIX` locales carry no language and yield `None`, as do
/// blank values.
///
/// ```
/// use locale_matrix_common::posix_to_language_tag;
///
/// assert_eq!(posix_to_language_tag("de_DE.UTF-8").as_deref(), Some("de-DE"));
/// assert_eq!(posix_to_language_tag("C.UTF-8"), None);
/// ```
#[must_use]
pub fn posix_to_language_tag(raw: &str) -> Option<String> {
    let trimmed = normalise_tag(Some(raw))?;
    let name = trimmed
        .split(['.', '@'])
        .next()
        .and_then(|head| normalise_tag(Some(head)))?;

    if name.eq_ignore_ascii_case("c") || name.eq_ignore_ascii_case("posix") {
        return None;
    }

    Some(name.replace('_', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("  "), None)]
    #[case(Some("de-DE"), Some("de-DE"))]
    #[case(Some(" de-DE "), Some("de-DE"))]
    fn normalises_candidates(#[case] input: Option<&str>, #[case] expected: Option<&str>) {
        assert_eq!(normalise_tag(input), expected);
    }

    #[rstest]
    #[case("de_DE.UTF-8", Some("de-DE"))]
    #[case("fr_FR@euro", Some("fr-FR"))]
    #[case("ja_JP.eucJP@mod", Some("ja-JP"))]
    #[case("en-GB", Some("en-GB"))]
    #[case("C", None)]
    #[case("C.UTF-8", None)]
    #[case("POSIX", None)]
    #[case(".UTF-8", None)]
    #[case("  ", None)]
    fn converts_posix_names(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(posix_to_language_tag(raw).as_deref(), expected);
    }
}
