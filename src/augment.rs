//! Markdown annotation pass.
//!
//! Rewrites a sprint plan line by line: sprint phrases become numbered
//! `<span>` references, the active day's section is block-quoted, and a
//! banner naming the current sprint is prepended. Lines that trigger
//! nothing pass through untouched, so the output stays ordinary
//! markdown.

use chrono::NaiveDate;

use crate::schedule::SprintSchedule;

/// Which sprint a phrase refers to, relative to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SprintRole {
    Previous,
    Current,
    Next,
}

impl SprintRole {
    /// Class attribute carried by spans of this role.
    pub fn class(self) -> &'static str {
        match self {
            SprintRole::Previous => "previous-sprint",
            SprintRole::Current => "current-sprint",
            SprintRole::Next => "next-sprint",
        }
    }

    /// Inverse of [`class`](Self::class), for consumers of annotated
    /// output.
    pub fn from_class(class: &str) -> Option<SprintRole> {
        match class {
            "previous-sprint" => Some(SprintRole::Previous),
            "current-sprint" => Some(SprintRole::Current),
            "next-sprint" => Some(SprintRole::Next),
            _ => None,
        }
    }
}

/// Trigger phrases in substitution order. Matching is case-sensitive
/// and each phrase fires at most once per line, on its first
/// occurrence.
const PHRASES: &[(&str, SprintRole)] = &[
    ("previous sprint", SprintRole::Previous),
    ("current sprint", SprintRole::Current),
    ("this sprint", SprintRole::Current),
    ("next sprint", SprintRole::Next),
    ("following sprint", SprintRole::Next),
];

pub(crate) const BANNER_OPEN: &str = r#"<div><big><strong><span class="current-sprint">"#;
pub(crate) const BANNER_CLOSE: &str = r#"</span></strong></big></div>"#;

/// Annotate `md` for the given schedule as of `today`.
pub fn augment(md: &str, schedule: &SprintSchedule, today: NaiveDate) -> String {
    augment_with(
        md,
        schedule.active_day_number(today),
        schedule.current_sprint_number(today),
    )
}

/// Annotate `md` from already-derived sprint values.
///
/// Either value may be absent: phrase substitution and the banner need
/// the sprint number, day highlighting needs the day number, and each
/// switches off independently when its input is missing.
pub fn augment_with(md: &str, active_day: Option<u32>, current_sprint: Option<i64>) -> String {
    let mut out = Vec::new();
    let mut in_active_day = false;
    for raw in md.split('\n') {
        let normalized = normalize_line(raw);
        let mut line = match current_sprint {
            Some(sprint) => substitute_sprint_phrases(raw, sprint),
            None => raw.to_string(),
        };
        if is_day_marker(&normalized) {
            in_active_day = active_day.map_or(false, |day| is_active_day_marker(&normalized, day));
        }
        if in_active_day {
            line.insert(0, '>');
        }
        out.push(line);
    }
    let body = out.join("\n");
    match current_sprint {
        Some(sprint) if sprint >= 0 => format!("{}\n{}", banner(sprint), body),
        _ => body,
    }
}

fn banner(current_sprint: i64) -> String {
    format!("{}Current Sprint {}{}", BANNER_OPEN, current_sprint, BANNER_CLOSE)
}

fn substitute_sprint_phrases(raw: &str, current_sprint: i64) -> String {
    let mut line = raw.to_string();
    for &(phrase, role) in PHRASES {
        if let Some(at) = line.find(phrase) {
            let span = sprint_span(phrase, role, current_sprint);
            line.replace_range(at..at + phrase.len(), &span);
        }
    }
    line
}

/// Render one phrase as a numbered span.
///
/// The phrase's interior spaces become `&nbsp;` so annotated output
/// never re-triggers a phrase match on a later pass. The sprint before
/// sprint 0 does not exist and renders as N/A.
fn sprint_span(phrase: &str, role: SprintRole, current_sprint: i64) -> String {
    let text = phrase.replace(' ', "&nbsp;");
    let number = match role {
        SprintRole::Previous if current_sprint <= 0 => {
            return format!(r#"<span class="{}">{} (_N/A_)</span>"#, role.class(), text);
        }
        SprintRole::Previous => current_sprint - 1,
        SprintRole::Current => current_sprint,
        SprintRole::Next => current_sprint + 1,
    };
    format!(r#"<span class="{}">{} `[{}]`</span>"#, role.class(), text, number)
}

/// Lowercased copy of `line` with every character other than ASCII
/// alphanumerics, `_`, and `:` removed. Day markers survive any
/// surrounding markdown decoration this way.
pub(crate) fn normalize_line(line: &str) -> String {
    line.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == ':')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// A day marker opens with `day` followed by at least one digit, as in
/// `**Day 4:**`. Prose starting with words like "daylight" does not
/// count.
pub(crate) fn is_day_marker(normalized: &str) -> bool {
    normalized
        .strip_prefix("day")
        .map_or(false, |rest| rest.starts_with(|c: char| c.is_ascii_digit()))
}

/// The active marker spells the active day exactly, colon included:
/// day 3 matches `day3:` but not `day30:`.
pub(crate) fn is_active_day_marker(normalized: &str, active_day: u32) -> bool {
    normalized.starts_with(&format!("day{}:", active_day))
}
