use std::borrow::Cow;

use chrono::{DateTime, Utc};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal columns.
///
/// Unicode-aware: CJK and emoji count 2 columns, combining marks 0.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Ellipsis used for truncation.
const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Truncate a string to fit within a maximum display width, appending
/// "..." when anything was cut.
///
/// Single-pass and allocation-free when the string already fits; widths of
/// 3 columns or less get as many characters as fit with no ellipsis.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let budget = max_width.saturating_sub(ELLIPSIS_WIDTH);
    let mut width = 0;
    let mut out = String::new();
    for ch in s.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + ch_width > budget {
            break;
        }
        width += ch_width;
        out.push(ch);
    }
    if max_width > ELLIPSIS_WIDTH {
        out.push_str(ELLIPSIS);
    }
    Cow::Owned(out)
}

/// Extract the host from a story URL, with the `www.` prefix dropped.
///
/// Unparseable URLs yield `"--"`, matching what the listing shows for a
/// malformed submission link.
pub fn extract_domain(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => host.strip_prefix("www.").unwrap_or(host).to_string(),
            None => {
                tracing::warn!(url = %url, "URL has no host, cannot extract domain");
                "--".to_string()
            }
        },
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "could not extract domain");
            "--".to_string()
        }
    }
}

/// Format a unix timestamp as relative time: "now", "5m", "3h", "2d",
/// then "Jan 02" for anything older than a week.
pub fn relative_time(timestamp: Option<i64>) -> String {
    let Some(ts) = timestamp else {
        return String::new();
    };

    let now = Utc::now().timestamp();
    let diff = now - ts;

    // Future dates (clock skew, malformed items)
    if diff < 0 {
        return "now".to_string();
    }
    if diff < 3600 {
        return format!("{}m", diff / 60);
    }
    if diff < 86400 {
        return format!("{}h", diff / 3600);
    }
    if diff < 604800 {
        return format!("{}d", diff / 86400);
    }

    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%b %d").to_string())
        .unwrap_or_default()
}

/// Flatten an HN HTML fragment into plain text paragraphs.
///
/// HN bodies are lightweight HTML: `<p>` between paragraphs (with the
/// opening paragraph's tag omitted), `<br>` line breaks, inline `<a>`,
/// `<i>`, `<pre><code>` and a handful of character entities. The terminal
/// wants plain text, so tags collapse to their layout effect and entities
/// decode; everything else is stripped. Full sanitization is out of scope —
/// nothing here is ever interpreted again.
pub fn html_to_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut chars = html.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        match ch {
            '<' => {
                // Consume up to '>' and map the tag to its layout effect.
                let mut tag = String::new();
                for (_, t) in chars.by_ref() {
                    if t == '>' {
                        break;
                    }
                    tag.push(t);
                }
                let name = tag
                    .trim_start_matches('/')
                    .split([' ', '/'])
                    .next()
                    .unwrap_or("")
                    .to_ascii_lowercase();
                match name.as_str() {
                    "p" if !tag.starts_with('/') => out.push_str("\n\n"),
                    "br" => out.push('\n'),
                    _ => {}
                }
            }
            '&' => {
                let rest = &html[start..];
                match decode_entity(rest) {
                    Some((decoded, consumed)) => {
                        out.push_str(&decoded);
                        // The '&' is already consumed; skip the remainder.
                        for _ in 0..consumed - 1 {
                            chars.next();
                        }
                    }
                    None => out.push('&'),
                }
            }
            // Control characters from the wire never reach the terminal.
            c if c.is_control() && c != '\n' => {}
            c => out.push(c),
        }
    }

    collapse_blank_runs(out.trim())
}

/// Decode one leading character entity, returning the replacement text and
/// how many input chars it spans. Unknown entities are left intact.
fn decode_entity(s: &str) -> Option<(String, usize)> {
    let end = s.char_indices().take(12).find(|(_, c)| *c == ';')?.0;
    let body = &s[1..end];
    let span = end + 1;

    let decoded = match body {
        "amp" => "&".to_string(),
        "lt" => "<".to_string(),
        "gt" => ">".to_string(),
        "quot" => "\"".to_string(),
        "apos" => "'".to_string(),
        "nbsp" => " ".to_string(),
        _ => {
            let code = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok()?
            } else {
                return None;
            };
            char::from_u32(code)?.to_string()
        }
    };
    Some((decoded, span))
}

/// Collapse runs of 3+ newlines down to one blank line.
fn collapse_blank_runs(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut newlines = 0;
    for ch in s.chars() {
        if ch == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push('\n');
            }
        } else {
            newlines = 0;
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn width_counts_cjk_double() {
        assert_eq!(display_width("Hello"), 5);
        assert_eq!(display_width("你好"), 4);
    }

    #[test]
    fn truncate_leaves_fitting_strings_borrowed() {
        let result = truncate_to_width("Short", 10);
        assert_eq!(result, "Short");
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate_to_width("A longer headline", 10), "A longe...");
    }

    #[test]
    fn truncate_never_splits_wide_chars() {
        // Budget of 4 columns after the ellipsis; the third CJK char
        // (2 cols) must not be half-included.
        assert_eq!(truncate_to_width("你好世界啊", 7), "你好...");
    }

    #[test]
    fn domain_strips_www() {
        assert_eq!(extract_domain("https://www.example.com/a/b"), "example.com");
        assert_eq!(extract_domain("http://blog.example.org"), "blog.example.org");
    }

    #[test]
    fn bad_urls_yield_placeholder() {
        assert_eq!(extract_domain("not a url"), "--");
        assert_eq!(extract_domain("mailto:x@example.com"), "--");
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc::now().timestamp();
        assert_eq!(relative_time(None), "");
        assert_eq!(relative_time(Some(now + 100)), "now");
        assert_eq!(relative_time(Some(now - 120)), "2m");
        assert_eq!(relative_time(Some(now - 7200)), "2h");
        assert_eq!(relative_time(Some(now - 3 * 86400)), "3d");
    }

    #[test]
    fn html_paragraphs_become_blank_lines() {
        // HN omits the opening <p>; paragraphs are separated, not wrapped.
        let html = "first paragraph<p>second paragraph";
        assert_eq!(html_to_text(html), "first paragraph\n\nsecond paragraph");
    }

    #[test]
    fn html_entities_decode() {
        assert_eq!(html_to_text("a &gt; b &amp;&amp; c &lt; d"), "a > b && c < d");
        assert_eq!(html_to_text("it&#x27;s &#39;fine&#39;"), "it's 'fine'");
        assert_eq!(html_to_text("A&nbsp;B"), "A B");
    }

    #[test]
    fn html_tags_are_stripped() {
        assert_eq!(
            html_to_text(r#"see <a href="https://example.com">the docs</a> <i>now</i>"#),
            "see the docs now"
        );
    }

    #[test]
    fn html_br_breaks_lines() {
        assert_eq!(html_to_text("line one<br>line two"), "line one\nline two");
    }

    #[test]
    fn unknown_entities_pass_through() {
        assert_eq!(html_to_text("AT&T"), "AT&T");
        assert_eq!(html_to_text("&bogus; stays"), "&bogus; stays");
    }

    #[test]
    fn blank_runs_collapse() {
        assert_eq!(html_to_text("a<p><p><p>b"), "a\n\nb");
    }
}
