//! Origin map (C8): parses GCC-style `#line` directives out of a
//! preprocessed `.i` file and builds a forward map from `.i` line number to
//! `(original_path, original_line)`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches both `# N "path" [flags]` and `#line N "path"`.
static LINE_DIRECTIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^#(?:\s*line)?\s+(\d+)\s+"((?:[^"\\]|\\.)*)"(?:\s+([\d\s]*))?$"#)
        .expect("valid line-directive regex")
});

/// Pseudo-paths GCC emits for synthetic source, never real origins.
const SYNTHETIC_PATH_PATTERNS: &[&str] = &["<built-in>", "<command-line>"];

fn unescape_path(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn is_excluded(path: &str, flags: &[u32], excluded_prefixes: &[String]) -> bool {
    if flags.contains(&3) {
        return true;
    }
    if SYNTHETIC_PATH_PATTERNS.iter().any(|p| path == *p) {
        return true;
    }
    if path.starts_with('<') && path.ends_with('>') {
        return true;
    }
    excluded_prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
}

/// Per-TU forward map: `.i` line index (0-based) -> original `(path, line)`
/// or `None` for directive lines, synthetic source, or excluded origins.
#[derive(Debug, Clone)]
pub struct OriginMap {
    pub tu_path: String,
    pub forward: Vec<Option<(String, u32)>>,
    /// Whether at least one `#line` directive was seen in this TU.
    pub origin_available: bool,
    pub n_total_lines: usize,
    pub excluded_prefixes: Vec<String>,
}

impl OriginMap {
    pub fn query_forward(&self, i_line: usize) -> Option<&(String, u32)> {
        self.forward.get(i_line).and_then(|slot| slot.as_ref())
    }
}

/// Builds the forward origin map for one `.i` file's content.
pub fn build_origin_map(tu_path: &str, source: &str, excluded_prefixes: &[String]) -> OriginMap {
    let lines: Vec<&str> = source.lines().collect();
    let mut forward = vec![None; lines.len()];

    let mut current_path: Option<String> = None;
    let mut current_line: Option<u32> = None;
    let mut current_excluded = false;
    let mut origin_available = false;

    for (i, line) in lines.iter().enumerate() {
        if let Some(caps) = LINE_DIRECTIVE_RE.captures(line) {
            let line_num: u32 = caps[1].parse().unwrap_or(1);
            let path = unescape_path(&caps[2]);
            let flags: Vec<u32> = caps
                .get(3)
                .map(|m| m.as_str())
                .unwrap_or("")
                .split_whitespace()
                .filter_map(|tok| tok.parse().ok())
                .collect();

            current_excluded = is_excluded(&path, &flags, excluded_prefixes);
            current_path = Some(path);
            current_line = Some(line_num);
            origin_available = true;
            forward[i] = None;
            continue;
        }

        if let (Some(path), Some(line_num)) = (&current_path, current_line) {
            forward[i] = if current_excluded {
                None
            } else {
                Some((path.clone(), line_num))
            };
            current_line = Some(line_num + 1);
        } else {
            forward[i] = None;
        }
    }

    OriginMap {
        tu_path: tu_path.to_string(),
        n_total_lines: forward.len(),
        forward,
        origin_available,
        excluded_prefixes: excluded_prefixes.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_lines_increment_origin_line() {
        let src = "# 1 \"main.c\"\nint a;\nint b;\n";
        let map = build_origin_map("t.i", src, &[]);
        assert_eq!(map.query_forward(0), None);
        assert_eq!(map.query_forward(1), Some(&("main.c".to_string(), 1)));
        assert_eq!(map.query_forward(2), Some(&("main.c".to_string(), 2)));
    }

    #[test]
    fn system_header_flag_excludes_lines() {
        let src = "# 1 \"/usr/include/stdio.h\" 1 3\nextern int printf(const char *, ...);\n# 2 \"main.c\" 2\nint main(){return 0;}\n";
        let map = build_origin_map("t.i", src, &[]);
        assert_eq!(map.query_forward(1), None);
        assert_eq!(map.query_forward(3), Some(&("main.c".to_string(), 2)));
    }

    #[test]
    fn synthetic_paths_are_excluded() {
        let src = "# 1 \"<built-in>\"\nint x;\n";
        let map = build_origin_map("t.i", src, &[]);
        assert_eq!(map.query_forward(1), None);
    }

    #[test]
    fn excluded_prefix_is_applied() {
        let src = "# 1 \"/usr/lib/gcc/foo.h\"\nint x;\n";
        let map = build_origin_map("t.i", src, &["/usr/lib/gcc".to_string()]);
        assert_eq!(map.query_forward(1), None);
    }

    #[test]
    fn lines_without_a_preceding_directive_map_to_none() {
        let src = "int x;\n";
        let map = build_origin_map("t.i", src, &[]);
        assert_eq!(map.query_forward(0), None);
    }

    #[test]
    fn escaped_quotes_in_path_are_unescaped() {
        let src = "# 1 \"a\\\"b.c\"\nint x;\n";
        let map = build_origin_map("t.i", src, &[]);
        assert_eq!(map.query_forward(1), Some(&("a\"b.c".to_string(), 1)));
    }
}
