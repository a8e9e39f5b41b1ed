//! Regex-based tokeniser for MIPS assembly source.
//!
//! Each source line is stripped of comments, trimmed, and then consumed by a
//! longest-prefix matcher: the patterns below are tried in order and the first
//! one that matches at the cursor wins. Anything no pattern can consume is a
//! syntax error.

use crate::errors::AsmError;
use regex::Regex;
use std::sync::LazyLock;

/// A unit of MIPS assembly source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// A directive such as `.text` (lowercased, leading dot stripped)
    Special(String),
    /// A label definition (`name:`, source casing preserved)
    Label(String),
    /// A string literal, already unescaped
    Str(String),
    /// A register operand (lowercased, `$` stripped; bare `zero` is accepted)
    RegOpr(String),
    /// A compound base+offset operand such as `16($sp)`
    ComOpr { offset: i32, reg: String },
    /// An integer literal; the raw text is kept for deferred parsing
    Integer(String),
    /// A bare identifier: an instruction mnemonic or a symbol reference
    Word(String),
}

/// One non-empty source line and its tokens.
#[derive(Debug)]
pub struct SourceLine {
    pub number: usize,
    pub tokens: Vec<Token>,
}

/// Compiled token patterns, tried strictly in declaration order.
struct Patterns {
    /// `.directive`
    special: Regex,
    /// `name:`
    label: Regex,
    /// `"..."` with escapes
    string: Regex,
    /// Commas and whitespace, consumed silently
    skip: Regex,
    /// `$t0`, `$8`, bare `zero`
    register: Regex,
    /// `offset($reg)`, offset optional and decimal
    com_opr: Regex,
    /// Hex, signed decimal, or character literal
    integer: Regex,
    /// Any other identifier
    word: Regex,
}

static PATTERNS: LazyLock<Patterns> = LazyLock::new(|| Patterns {
    special: Regex::new(r"^\.[A-Za-z_]\w*").unwrap(),
    label: Regex::new(r"^[A-Za-z_]\w*:").unwrap(),
    string: Regex::new(r#"^"((?:[^"\\]|\\.)*)""#).unwrap(),
    skip: Regex::new(r"^[,\s]+").unwrap(),
    register: Regex::new(r"^(\$\w+|(?i:zero)\b)").unwrap(),
    com_opr: Regex::new(r"^(-?\d*)\((\$\w+|(?i:zero))\)").unwrap(),
    integer: Regex::new(r"^(0[xX][0-9A-Fa-f]+|-?\d+|'(?:[^'\\]|\\.)*')").unwrap(),
    word: Regex::new(r"^[A-Za-z_]\w*").unwrap(),
});

/// Tokenise a whole source file. Comments run from `#` to end of line; blank
/// lines produce nothing.
pub fn tokenize(source: &str) -> Result<Vec<SourceLine>, AsmError> {
    let mut lines = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let number = index + 1;
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        lines.push(SourceLine {
            number,
            tokens: tokenize_line(line, number)?,
        });
    }

    Ok(lines)
}

fn tokenize_line(line: &str, number: usize) -> Result<Vec<Token>, AsmError> {
    let mut tokens = Vec::new();
    let mut rest = line;

    while !rest.is_empty() {
        if let Some(found) = PATTERNS.skip.find(rest) {
            rest = &rest[found.end()..];
            continue;
        }

        let (token, consumed) = match_token(rest, number)?;
        tokens.push(token);
        rest = &rest[consumed..];
    }

    Ok(tokens)
}

/// Try each pattern in order against the head of `rest`; the first match wins.
fn match_token(rest: &str, line: usize) -> Result<(Token, usize), AsmError> {
    if let Some(found) = PATTERNS.special.find(rest) {
        let name = found.as_str()[1..].to_lowercase();
        return Ok((Token::Special(name), found.end()));
    }

    if let Some(found) = PATTERNS.label.find(rest) {
        let name = found.as_str().trim_end_matches(':').to_string();
        return Ok((Token::Label(name), found.end()));
    }

    if let Some(captures) = PATTERNS.string.captures(rest) {
        let contents = captures.get(1).unwrap();
        let unescaped = unescape(contents.as_str()).ok_or_else(|| AsmError::BadLiteral {
            line,
            text: captures.get(0).unwrap().as_str().to_string(),
        })?;
        return Ok((Token::Str(unescaped), captures.get(0).unwrap().end()));
    }

    if let Some(found) = PATTERNS.register.find(rest) {
        let name = found.as_str().trim_start_matches('$').to_lowercase();
        return Ok((Token::RegOpr(name), found.end()));
    }

    if let Some(captures) = PATTERNS.com_opr.captures(rest) {
        let offset_text = captures.get(1).unwrap().as_str();
        let offset = if offset_text.is_empty() {
            0
        } else {
            offset_text.parse().map_err(|_| AsmError::BadLiteral {
                line,
                text: offset_text.to_string(),
            })?
        };
        let reg = captures
            .get(2)
            .unwrap()
            .as_str()
            .trim_start_matches('$')
            .to_lowercase();
        return Ok((
            Token::ComOpr { offset, reg },
            captures.get(0).unwrap().end(),
        ));
    }

    if let Some(found) = PATTERNS.integer.find(rest) {
        return Ok((Token::Integer(found.as_str().to_string()), found.end()));
    }

    if let Some(found) = PATTERNS.word.find(rest) {
        return Ok((Token::Word(found.as_str().to_string()), found.end()));
    }

    Err(AsmError::Syntax {
        line,
        text: rest.to_string(),
    })
}

/// Parse the raw text of an [`Token::Integer`]: `0x` hex, signed decimal, or
/// a character literal with the usual escapes.
pub fn parse_integer(raw: &str, line: usize) -> Result<i64, AsmError> {
    let bad_literal = || AsmError::BadLiteral {
        line,
        text: raw.to_string(),
    };

    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        return u32::from_str_radix(hex, 16)
            .map(i64::from)
            .map_err(|_| bad_literal());
    }

    if let Some(inner) = raw.strip_prefix('\'') {
        let inner = inner.strip_suffix('\'').ok_or_else(bad_literal)?;
        let unescaped = unescape(inner).ok_or_else(bad_literal)?;
        let mut chars = unescaped.chars();

        return match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c as i64),
            _ => Err(bad_literal()),
        };
    }

    raw.parse().map_err(|_| bad_literal())
}

/// Replace escape sequences with the characters they denote. `None` marks an
/// unknown escape or a trailing backslash.
fn unescape(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        out.push(match chars.next()? {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            '0' => '\0',
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            _ => return None,
        });
    }

    Some(out)
}
