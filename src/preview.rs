//! Terminal rendering of annotated plans.
//!
//! Turns the HTML-ish annotations back into something readable in a
//! terminal: sprint spans lose their markup and gain a role color, the
//! banner becomes a bold headline, and quoted active-day lines get a
//! gutter bar. Lines that look malformed pass through untouched.

use crate::augment::{SprintRole, BANNER_CLOSE, BANNER_OPEN};
use crate::color::codes::*;

const SPAN_OPEN: &str = "<span class=\"";
const SPAN_CLOSE: &str = "</span>";

/// Render annotated markdown for the terminal. With `color` off the
/// markup is still stripped, leaving plain text.
pub fn render(augmented: &str, color: bool) -> String {
    let lines: Vec<String> = augmented
        .split('\n')
        .map(|line| render_line(line, color))
        .collect();
    lines.join("\n")
}

fn render_line(line: &str, color: bool) -> String {
    if let Some(title) = banner_text(line) {
        return if color {
            format!("{}{}{}{}", BOLD, BRIGHT_YELLOW, title, RESET)
        } else {
            title.to_string()
        };
    }
    let (quoted, rest) = strip_quote_prefix(line);
    let body = style_spans(rest, color);
    if quoted {
        if color {
            format!("{}{}▌{} {}", BOLD, BRIGHT_YELLOW, RESET, body)
        } else {
            format!("▌ {}", body)
        }
    } else {
        body
    }
}

fn banner_text(line: &str) -> Option<&str> {
    line.strip_prefix(BANNER_OPEN)?.strip_suffix(BANNER_CLOSE)
}

/// Quote levels collapse to a single gutter bar.
fn strip_quote_prefix(line: &str) -> (bool, &str) {
    let stripped = line.trim_start_matches('>');
    (stripped.len() != line.len(), stripped)
}

fn style_spans(line: &str, color: bool) -> String {
    let mut out = String::new();
    let mut rest = line;
    loop {
        let Some(open_at) = rest.find(SPAN_OPEN) else { break };
        let after_open = &rest[open_at + SPAN_OPEN.len()..];
        let Some(quote_at) = after_open.find('"') else { break };
        let class = &after_open[..quote_at];
        let Some(after_attr) = after_open[quote_at..].strip_prefix("\">") else {
            break;
        };
        let Some(close_at) = after_attr.find(SPAN_CLOSE) else { break };
        let inner = after_attr[..close_at].replace("&nbsp;", " ");

        out.push_str(&rest[..open_at]);
        out.push_str(&styled(&inner, SprintRole::from_class(class), color));
        rest = &after_attr[close_at + SPAN_CLOSE.len()..];
    }
    out.push_str(rest);
    out
}

fn styled(text: &str, role: Option<SprintRole>, color: bool) -> String {
    if !color {
        return text.to_string();
    }
    match role {
        Some(SprintRole::Previous) => format!("{}{}{}", DIM, text, RESET),
        Some(SprintRole::Current) => format!("{}{}{}{}", BOLD, YELLOW, text, RESET),
        Some(SprintRole::Next) => format!("{}{}{}", CYAN, text, RESET),
        None => text.to_string(),
    }
}
