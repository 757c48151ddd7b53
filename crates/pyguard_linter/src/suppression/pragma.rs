//! Pragma comment parsing (C10), grounded on
//! `original_source/ignores.py`'s `_IGNORE_PATTERN`/`_IGNORE_FILE_PATTERN`.

use lazy_regex::regex;

/// `# pyguard: ignore[CODE1,CODE2] because: reason text`, with the
/// bracketed code list and the reason both optional.
fn ignore_pattern() -> &'static lazy_regex::Regex {
    regex!(r"#\s*pyguard:\s*ignore(?:\[([^\]]*)\])?\s*(?:because:\s*(.*))?\s*$")
}

/// `# pyguard: ignore-file[CODE1,CODE2] because: reason text`
fn ignore_file_pattern() -> &'static lazy_regex::Regex {
    regex!(r"#\s*pyguard:\s*ignore-file(?:\[([^\]]*)\])?\s*(?:because:\s*(.*))?\s*$")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreDirective {
    pub line: u32,
    /// Empty means "every code".
    pub codes: Vec<String>,
    pub reason: Option<String>,
    pub is_file_level: bool,
    /// `true` if non-comment code precedes the pragma on its own line.
    pub is_inline: bool,
}

/// Scans every source line unconditionally -- there's no requirement that
/// an `ignore-file` directive appear at the top of the file, matching
/// `parse_ignore_directives`'s actual behaviour.
pub fn parse_ignore_directives(source: &str) -> Vec<IgnoreDirective> {
    let mut directives = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        let line_no = (idx + 1) as u32;
        if let Some(caps) = ignore_file_pattern().captures(line) {
            directives.push(IgnoreDirective {
                line: line_no,
                codes: parse_codes(caps.get(1).map(|m| m.as_str())),
                reason: parse_reason(caps.get(2).map(|m| m.as_str())),
                is_file_level: true,
                is_inline: false,
            });
            continue;
        }
        if let Some(caps) = ignore_pattern().captures(line) {
            let comment_start = line.find('#').unwrap_or(0);
            let is_inline = !line[..comment_start].trim().is_empty();
            directives.push(IgnoreDirective {
                line: line_no,
                codes: parse_codes(caps.get(1).map(|m| m.as_str())),
                reason: parse_reason(caps.get(2).map(|m| m.as_str())),
                is_file_level: false,
                is_inline,
            });
        }
    }
    directives
}

fn parse_codes(raw: Option<&str>) -> Vec<String> {
    match raw {
        None => Vec::new(),
        Some(s) if s.trim().is_empty() => Vec::new(),
        Some(s) => s
            .split(',')
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect(),
    }
}

fn parse_reason(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_inline_with_codes_and_reason() {
        let source = "x: int = f()  # pyguard: ignore[TYP001] because: generated code\n";
        let directives = parse_ignore_directives(source);
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].codes, vec!["TYP001"]);
        assert_eq!(directives[0].reason.as_deref(), Some("generated code"));
        assert!(directives[0].is_inline);
        assert!(!directives[0].is_file_level);
    }

    #[test]
    fn parses_block_pragma_without_codes() {
        let source = "# pyguard: ignore because: legacy module\ndef f():\n    pass\n";
        let directives = parse_ignore_directives(source);
        assert_eq!(directives.len(), 1);
        assert!(directives[0].codes.is_empty());
        assert!(!directives[0].is_inline);
    }

    #[test]
    fn parses_ignore_file_anywhere_in_file() {
        let source = "x = 1\n# pyguard: ignore-file[TYP001] because: legacy\ny = 2\n";
        let directives = parse_ignore_directives(source);
        assert_eq!(directives.len(), 1);
        assert!(directives[0].is_file_level);
        assert_eq!(directives[0].line, 2);
    }
}
