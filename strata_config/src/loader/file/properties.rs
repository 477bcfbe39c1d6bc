//! `.properties` syntax.
//!
//! Lines are `key = value`, `key: value` or `key value`. `#` and `!` start
//! comment lines, a trailing odd run of backslashes continues the line, and
//! `\t \n \r \f \\ \uXXXX` are unescaped in keys and values. Any other
//! escaped character stands for itself, so `a\=b` is the key `a=b`.

use std::iter::Peekable;
use std::str::Chars;

use super::{RawEntry, SourceError};

pub(super) fn parse(text: &str) -> Result<Vec<RawEntry>, SourceError> {
    logical_lines(text)
        .into_iter()
        .map(|(line, content)| parse_line(&content, line))
        .collect()
}

fn continues(line: &str) -> bool {
    let backslashes = line.chars().rev().take_while(|c| *c == '\\').count();
    !backslashes.is_multiple_of(2)
}

/// Joins continued lines, dropping blanks and comments. Each logical line is
/// paired with the number of its first physical line.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (index, physical) in text.lines().enumerate() {
        let content = physical.trim_start();
        let (start, mut joined) = match pending.take() {
            Some(open) => open,
            None if content.is_empty() || content.starts_with(['#', '!']) => continue,
            None => (index + 1, String::new()),
        };
        if continues(content) {
            joined.push_str(content.strip_suffix('\\').unwrap_or(content));
            pending = Some((start, joined));
        } else {
            joined.push_str(content);
            lines.push((start, joined));
        }
    }
    if let Some(open) = pending {
        lines.push(open);
    }
    lines
}

fn syntax(line: usize, message: impl Into<String>) -> SourceError {
    SourceError::Syntax {
        line,
        message: message.into(),
    }
}

fn unescape(chars: &mut Peekable<Chars<'_>>, line: usize) -> Result<Option<char>, SourceError> {
    let escaped = match chars.next() {
        None => return Ok(None),
        Some('t') => '\t',
        Some('n') => '\n',
        Some('r') => '\r',
        Some('f') => '\u{c}',
        Some('u') => {
            let digits: String = chars.by_ref().take(4).collect();
            u32::from_str_radix(&digits, 16)
                .ok()
                .filter(|_| digits.len() == 4)
                .and_then(char::from_u32)
                .ok_or_else(|| syntax(line, format!("invalid unicode escape `\\u{digits}`")))?
        }
        Some(other) => other,
    };
    Ok(Some(escaped))
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
}

fn parse_line(content: &str, line: usize) -> Result<RawEntry, SourceError> {
    let mut chars = content.chars().peekable();
    let mut key = String::new();
    let mut separated = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => key.extend(unescape(&mut chars, line)?),
            '=' | ':' => {
                separated = true;
                break;
            }
            _ if c.is_whitespace() => {
                skip_whitespace(&mut chars);
                separated = chars.next_if(|next| matches!(*next, '=' | ':')).is_some();
                break;
            }
            _ => key.push(c),
        }
    }
    if key.is_empty() {
        return Err(syntax(line, "entry has no key"));
    }

    skip_whitespace(&mut chars);
    let mut value = String::new();
    while let Some(c) = chars.next() {
        if c == '\\' {
            value.extend(unescape(&mut chars, line)?);
        } else {
            value.push(c);
        }
    }

    if separated || !value.is_empty() {
        Ok(RawEntry::with_value(key, value))
    } else {
        Ok(RawEntry::present(key))
    }
}
