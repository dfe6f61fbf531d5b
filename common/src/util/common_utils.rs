use uuid::Uuid;

pub fn build_id() -> String {
    Uuid::new_v4().to_string()
}

/// Keeps a client-supplied file name usable inside an object key.
/// Path separators and anything outside `[A-Za-z0-9._-]` become `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() { "file".to_string() } else { trimmed.to_string() }
}

/// Empty or whitespace-only form values are treated as absent.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_flattened() {
        assert_eq!(sanitize_file_name("cv final.pdf"), "cv_final.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\docs\\سيرة.pdf"), "____.pdf");
        assert_eq!(sanitize_file_name(".."), "file");
    }

    #[test]
    fn blank_values_become_none() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some(" Cairo ".to_string())), Some("Cairo".to_string()));
        assert_eq!(non_empty(None), None);
    }
}
