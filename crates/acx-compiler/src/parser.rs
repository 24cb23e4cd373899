//! Pattern list parsing.
//!
//! One pattern per line. Surrounding whitespace is trimmed; blank lines and
//! lines starting with `!` are skipped. A trailing `$id=<n>` overrides the
//! implicit identifier. Bytes that cannot be written literally use escapes:
//! `\\ \$ \! \n \r \t \0 \s` (space) and `\xHH`.

use acx_core::PatternId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternEntry {
    pub id: PatternId,
    pub bytes: Vec<u8>,
    pub list_id: u16,
    /// 1-based source line
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: invalid escape sequence '\\{escape}'")]
    InvalidEscape { line: usize, escape: char },
    #[error("line {line}: truncated escape sequence")]
    TruncatedEscape { line: usize },
    #[error("line {line}: invalid hex escape '{digits}'")]
    InvalidHex { line: usize, digits: String },
    #[error("line {line}: unknown option '{option}'")]
    UnknownOption { line: usize, option: String },
    #[error("line {line}: invalid pattern id '{value}'")]
    InvalidId { line: usize, value: String },
}

/// Parse a pattern list. Patterns without `$id=` are numbered from
/// `first_id` in order of appearance.
pub fn parse_pattern_list(text: &str, first_id: u32) -> Result<Vec<PatternEntry>, ParseError> {
    let mut entries = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || is_comment_line(line) {
            continue;
        }

        let (pattern_part, options_text) = split_pattern_options(line);

        let implicit = u32::try_from(entries.len())
            .ok()
            .and_then(|ordinal| first_id.checked_add(ordinal))
            .ok_or_else(|| ParseError::InvalidId {
                line: line_no,
                value: format!("{first_id}+{}", entries.len()),
            })?;
        let id = match options_text {
            Some(options_text) => parse_options(options_text, line_no)?.unwrap_or(implicit),
            None => implicit,
        };

        entries.push(PatternEntry {
            id: PatternId::new(id),
            bytes: unescape(pattern_part.trim_end(), line_no)?,
            list_id: 0,
            line: line_no,
        });
    }

    log::debug!("parsed {} patterns", entries.len());
    Ok(entries)
}

fn is_comment_line(line: &str) -> bool {
    line.starts_with('!')
}

/// Split at the last unescaped `$`.
fn split_pattern_options(line: &str) -> (&str, Option<&str>) {
    let bytes = line.as_bytes();
    let mut split = None;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'$' => {
                split = Some(i);
                i += 1;
            }
            _ => i += 1,
        }
    }

    match split {
        Some(pos) => (&line[..pos], Some(&line[pos + 1..])),
        None => (line, None),
    }
}

fn parse_options(text: &str, line: usize) -> Result<Option<u32>, ParseError> {
    let mut id = None;
    for option in text.split(',') {
        let option = option.trim();
        if option.is_empty() {
            continue;
        }
        match option.split_once('=') {
            Some(("id", value)) => {
                let value = value.trim();
                let parsed = value.parse::<u32>().map_err(|_| ParseError::InvalidId {
                    line,
                    value: value.to_string(),
                })?;
                id = Some(parsed);
            }
            _ => {
                return Err(ParseError::UnknownOption {
                    line,
                    option: option.to_string(),
                })
            }
        }
    }
    Ok(id)
}

fn unescape(text: &str, line: usize) -> Result<Vec<u8>, ParseError> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b != b'\\' {
            out.push(b);
            i += 1;
            continue;
        }

        let escape = *bytes.get(i + 1).ok_or(ParseError::TruncatedEscape { line })?;
        i += 2;
        let decoded = match escape {
            b'\\' | b'$' | b'!' => escape,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'0' => 0,
            b's' => b' ',
            b'x' => {
                let digits = bytes.get(i..i + 2).ok_or(ParseError::TruncatedEscape { line })?;
                i += 2;
                let digits = std::str::from_utf8(digits).unwrap_or("");
                u8::from_str_radix(digits, 16).map_err(|_| ParseError::InvalidHex {
                    line,
                    digits: digits.to_string(),
                })?
            }
            other => {
                let escape = text[i - 1..].chars().next().unwrap_or(other as char);
                return Err(ParseError::InvalidEscape { line, escape });
            }
        };
        out.push(decoded);
    }

    Ok(out)
}
