pub const MAX_SLUG_LEN: usize = 50;

/// Characters Windows refuses in file names.
const FILESYSTEM_RESERVED: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// ASCII punctuation that needs escaping in URLs or shells.
const URL_RESERVED: &[char] = &[
    '!', '#', '$', '%', '&', '\'', '(', ')', '+', ',', ';', '=', '@', '[', ']', '^', '`', '{',
    '}', '~',
];

/// Turn an issue summary into a file-name-safe slug.
///
/// Case and non-Latin scripts are kept as-is. The result is at most
/// [`MAX_SLUG_LEN`] characters and never empty.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_whitespace = false;
    for c in title.trim().chars() {
        if is_separator(c) {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if FILESYSTEM_RESERVED.contains(&c) || URL_RESERVED.contains(&c) || is_control(c) {
            continue;
        }
        slug.push(c);
    }

    let slug = collapse_hyphens(&slug);
    let slug = truncate_at_hyphen(slug.trim_matches('-'), MAX_SLUG_LEN);

    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

/// Unicode whitespace plus the ASCII file/group/record/unit separators.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '\u{1c}'..='\u{1f}')
}

fn is_control(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{1f}' | '\u{7f}')
}

fn collapse_hyphens(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }
    out
}

/// Cut to `max` characters, preferring the last hyphen inside the cut.
fn truncate_at_hyphen(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max).collect();
    match truncated.rfind('-') {
        Some(idx) if idx > 0 => truncated[..idx].to_string(),
        _ => truncated,
    }
}
