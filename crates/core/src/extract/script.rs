//! GNU linker script detection and member extraction.
//!
//! Toolchains sometimes install a text script where a shared object is
//! expected (glibc's `libc.so` is a `GROUP(...)` over the real libraries).
//! We recognize such scripts and return the member paths they name so the
//! group can be extracted as one unit.

/// Parse `bytes` as a linker script if it looks like one.
///
/// Returns the member paths named by `GROUP(...)` and `INPUT(...)`
/// directives, or `None` when the content is not a recognizable script.
/// `AS_NEEDED(...)` members are dropped: they only join the link when
/// already required, so they are not ordering inputs.
pub(crate) fn parse_link_script(bytes: &[u8]) -> Option<Vec<String>> {
    let text = std::str::from_utf8(bytes).ok()?;

    let stripped = strip_comments(text);
    let stripped = strip_as_needed(&stripped);

    let mut members = Vec::new();
    for directive in ["GROUP", "INPUT"] {
        let mut rest = stripped.as_str();
        while let Some(found) = rest.find(directive) {
            let after = &rest[found + directive.len()..];
            if let Some(args) = directive_args(after) {
                members.extend(
                    args.split(|c: char| c.is_whitespace() || c == ',')
                        .filter(|s| !s.is_empty())
                        .map(str::to_string),
                );
            }
            rest = after;
        }
    }

    if members.is_empty() {
        None
    } else {
        Some(members)
    }
}

/// Take the parenthesized argument list directly following a directive
/// name, tolerating whitespace before `(`.
fn directive_args(after: &str) -> Option<&str> {
    let trimmed = after.trim_start();
    let body = trimmed.strip_prefix('(')?;
    let close = body.find(')')?;
    Some(&body[..close])
}

fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find("/*") {
        out.push_str(&rest[..open]);
        match rest[open + 2..].find("*/") {
            Some(close) => rest = &rest[open + 2 + close + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

fn strip_as_needed(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(found) = rest.find("AS_NEEDED") {
        out.push_str(&rest[..found]);
        let after = &rest[found + "AS_NEEDED".len()..];
        let trimmed = after.trim_start();
        match trimmed.strip_prefix('(').and_then(|body| body.find(')').map(|c| &body[c + 1..])) {
            Some(remaining) => rest = remaining,
            None => {
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
