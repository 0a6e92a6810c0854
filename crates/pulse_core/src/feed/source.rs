//! Source host extraction for feed icon lookup.

use once_cell::sync::Lazy;
use regex::Regex;

static SOURCE_HOST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:https?://)?(?:[^@/?#\s]*@)?((?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z]{2,})(?::\d+)?(?:[/?#]\S*)?$",
    )
    .expect("valid source host regex")
});

/// Extracts the lowercase host of an http(s) URL or bare host string.
///
/// Returns `None` for outlet names such as `The Diplomat`, blank input, or
/// hosts without a dot.
pub fn source_host(source: &str) -> Option<String> {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return None;
    }
    SOURCE_HOST_RE
        .captures(trimmed)
        .and_then(|captures| captures.get(1))
        .map(|host| host.as_str().to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::source_host;

    #[test]
    fn extracts_host_from_urls() {
        assert_eq!(
            source_host("https://www.wired.com/story/office-windows-10"),
            Some("www.wired.com".to_string())
        );
        assert_eq!(
            source_host("http://News.Sky.com:8080/path?q=1"),
            Some("news.sky.com".to_string())
        );
    }

    #[test]
    fn accepts_bare_hosts() {
        assert_eq!(
            source_host("www.e-ir.info"),
            Some("www.e-ir.info".to_string())
        );
        assert_eq!(source_host("time.com"), Some("time.com".to_string()));
    }

    #[test]
    fn rejects_outlet_names_and_blank_input() {
        assert_eq!(source_host("The Diplomat"), None);
        assert_eq!(source_host("   "), None);
        assert_eq!(source_host("localhost"), None);
        assert_eq!(source_host("ftp://files.example.com"), None);
    }
}
