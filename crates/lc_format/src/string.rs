//! Quote selection for string literals.

use std::borrow::Cow;

/// Re-delimit a string literal so it needs the fewest escapes.
///
/// The cost of a quote character is how many times it occurs in the
/// string's value: each occurrence must be escaped if that character is the
/// delimiter. The cheaper quote wins; a tie goes to single quotes unless
/// neither quote occurs, in which case the literal keeps its delimiter.
/// Long-bracket literals (`[[...]]`, `[==[...]==]`) are returned as-is.
pub fn normalize_quotes(literal: &str) -> Cow<'_, str> {
    let Some(current) = literal.chars().next().filter(|c| matches!(c, '\'' | '"')) else {
        return Cow::Borrowed(literal);
    };
    let body = &literal[1..literal.len() - 1];

    let counts = QuoteCounts::of(body);
    let single = counts.escaped_single + counts.literal_single;
    let double = counts.escaped_double + counts.literal_double;
    let target = match single.cmp(&double) {
        std::cmp::Ordering::Less => '\'',
        std::cmp::Ordering::Greater => '"',
        std::cmp::Ordering::Equal if single == 0 => current,
        std::cmp::Ordering::Equal => '\'',
    };

    let rendered = render(body, target);
    if target == current && rendered == body {
        return Cow::Borrowed(literal);
    }
    Cow::Owned(format!("{target}{rendered}{target}"))
}

#[derive(Debug, Default, PartialEq, Eq)]
struct QuoteCounts {
    escaped_single: usize,
    escaped_double: usize,
    literal_single: usize,
    literal_double: usize,
}

impl QuoteCounts {
    fn of(body: &str) -> Self {
        let mut counts = QuoteCounts::default();
        let mut chars = body.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some('\'') => counts.escaped_single += 1,
                    Some('"') => counts.escaped_double += 1,
                    _ => {}
                },
                '\'' => counts.literal_single += 1,
                '"' => counts.literal_double += 1,
                _ => {}
            }
        }
        counts
    }
}

/// Body text for a literal delimited by `quote`: quotes equal to the
/// delimiter are escaped, the other quote is left bare, every other escape
/// sequence is copied untouched.
fn render(body: &str, quote: char) -> String {
    let mut out = String::with_capacity(body.len() + 2);
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(q @ ('\'' | '"')) => {
                    if q == quote {
                        out.push('\\');
                    }
                    out.push(q);
                }
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            '\'' | '"' if c == quote => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_delimiter_when_no_quotes_inside() {
        assert_eq!(normalize_quotes(r#""hello""#), r#""hello""#);
        assert_eq!(normalize_quotes("'hello'"), "'hello'");
    }

    #[test]
    fn escaped_apostrophe_switches_to_double_quotes() {
        assert_eq!(normalize_quotes(r"'don\'t'"), r#""don't""#);
    }

    #[test]
    fn escaped_double_quotes_switch_to_single() {
        assert_eq!(normalize_quotes(r#""say \"hi\"""#), r#"'say "hi"'"#);
    }

    #[test]
    fn fewest_escapes_win() {
        // One apostrophe against two double quotes: single quotes stay.
        assert_eq!(normalize_quotes(r#"'don\'t say "hi"'"#), r#"'don\'t say "hi"'"#);
        // Written with double quotes, the same value moves to single quotes.
        assert_eq!(normalize_quotes(r#""don't say \"hi\"""#), r#"'don\'t say "hi"'"#);
        // Two apostrophes against one double quote: double quotes win.
        assert_eq!(normalize_quotes(r#"'it\'s Bob\'s "x'"#), r#""it's Bob's \"x""#);
    }

    #[test]
    fn ties_prefer_single_quotes() {
        assert_eq!(normalize_quotes(r#""a'b\"c""#), r#"'a\'b"c'"#);
        assert_eq!(normalize_quotes(r#"'a\'b"c'"#), r#"'a\'b"c'"#);
    }

    #[test]
    fn unneeded_escapes_are_dropped() {
        assert_eq!(normalize_quotes(r#""it\'s""#), r#""it's""#);
    }

    #[test]
    fn other_escapes_are_untouched() {
        assert_eq!(normalize_quotes(r"'a\\'"), r"'a\\'");
        assert_eq!(normalize_quotes(r"'\\\'x'"), r#""\\'x""#);
        assert_eq!(normalize_quotes(r"'tab\tnl\n\65\z'"), r"'tab\tnl\n\65\z'");
    }

    #[test]
    fn long_brackets_pass_through() {
        assert_eq!(normalize_quotes("[==[it's \"raw\"]==]"), "[==[it's \"raw\"]==]");
    }

    #[test]
    fn normalization_is_idempotent() {
        for literal in [r#"'don\'t say "hi"'"#, r#""a'b\"c""#, r"'x\'y\'z'", r#""q""#] {
            let once = normalize_quotes(literal).into_owned();
            assert_eq!(normalize_quotes(&once), once);
        }
    }
}
