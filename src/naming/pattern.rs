//! Compact name lists: `chk021-23, 25, tb001`.
//!
//! Entries are comma separated. `prefix` + `start-stop` expands to a
//! numeric range padded to the width of `start`. A bare number reuses the
//! prefix and width of the previous entry. Anything else is kept literally.

use super::tokenizer::{lex_pattern, PatternToken};

/// Most names a single range entry expands to.
pub const MAX_RANGE_LEN: usize = 10_000;

/// Expand a comma-separated name pattern into individual names.
pub fn unpack_names(pattern: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut last: Option<(String, usize)> = None;

    for entry in pattern.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let tokens = lex_pattern(entry);
        let shape: Vec<Option<PatternToken>> = tokens.iter().map(|(t, _)| *t).collect();
        let text = |i: usize| tokens[i].1;

        use PatternToken::*;
        match shape.as_slice() {
            [Some(Alpha), Some(Digits)] => {
                names.push(entry.replace(char::is_whitespace, ""));
                last = Some((text(0).to_owned(), text(1).len()));
            }
            [Some(Alpha), Some(Digits), Some(Dash), Some(Digits)] => {
                let prefix = text(0).to_owned();
                let width = text(1).len();
                expand_range(&mut names, &prefix, width, text(1), text(3));
                last = Some((prefix, width));
            }
            [Some(Digits)] => match &last {
                Some((prefix, width)) => {
                    if let Ok(n) = text(0).parse::<u64>() {
                        names.push(format!("{prefix}{n:0width$}", width = *width));
                    }
                }
                None => names.push(text(0).to_owned()),
            },
            [Some(Digits), Some(Dash), Some(Digits)] => match last.clone() {
                Some((prefix, width)) => {
                    expand_range(&mut names, &prefix, width, text(0), text(2));
                }
                None => names.push(entry.to_owned()),
            },
            _ => names.push(entry.to_owned()),
        }
    }
    names
}

fn expand_range(names: &mut Vec<String>, prefix: &str, width: usize, start: &str, stop: &str) {
    let (Ok(start), Ok(stop)) = (start.parse::<u64>(), stop.parse::<u64>()) else {
        return;
    };
    if stop.saturating_sub(start) >= MAX_RANGE_LEN as u64 {
        log::warn!("name range {prefix}{start}-{stop} truncated to {MAX_RANGE_LEN} names");
    }
    for n in (start..=stop).take(MAX_RANGE_LEN) {
        names.push(format!("{prefix}{n:0width$}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn range_bare_number_and_literal() {
        assert_eq!(
            unpack_names("chk021-23, 25, tb001"),
            vec!["chk021", "chk022", "chk023", "chk025", "tb001"]
        );
    }

    #[test]
    fn width_follows_start() {
        assert_eq!(unpack_names("b8-10"), vec!["b8", "b9", "b10"]);
    }

    #[test]
    fn bare_range_reuses_prefix() {
        assert_eq!(
            unpack_names("s000, 2-3"),
            vec!["s000", "s002", "s003"]
        );
    }

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(unpack_names("save_btn, label"), vec!["save_btn", "label"]);
    }

    #[test]
    fn empty_entries_are_skipped() {
        assert_eq!(unpack_names(" , a1,,"), vec!["a1"]);
    }

    #[test]
    fn huge_range_is_capped() {
        let (names, logs) = crate::testing::capture_logs(|| unpack_names("x0-99999999999"));
        assert_eq!(names.len(), MAX_RANGE_LEN);
        assert_eq!(names.last().map(String::as_str), Some("x9999"));
        assert!(logs.contains_warning("truncated"));
    }

    #[test]
    fn reversed_range_is_empty() {
        assert!(unpack_names("x5-2").is_empty());
    }
}
