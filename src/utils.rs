/// Strip one pair of surrounding double quotes and un-escape `\"`.
///
/// No other escape sequence is processed; strings shorter than two
/// characters are returned as they are.
pub fn unquote(s: &str) -> String {
    if s.len() < 2 {
        return s.to_string();
    }

    let inner = s
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(s);

    inner.replace("\\\"", "\"")
}

/// `value` unless it's empty
pub fn value_or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote() {
        assert_eq!(unquote(r#""test""#), "test");
        assert_eq!(unquote(r#""""#), "");
        assert_eq!(unquote(r#"""#), "\"");
        assert_eq!(unquote("plain"), "plain");
        assert_eq!(unquote(r#""open"#), "\"open");
        assert_eq!(unquote(r#""a \"b\" c""#), r#"a "b" c"#);
        assert_eq!(unquote(r#"un\"quoted"#), r#"un"quoted"#);
        // only \" is an escape here
        assert_eq!(unquote(r#""back\\slash""#), r#"back\\slash"#);
    }

    #[test]
    fn test_value_or_default() {
        assert_eq!(value_or_default("", "GET"), "GET");
        assert_eq!(value_or_default("POST", "GET"), "POST");
    }
}
