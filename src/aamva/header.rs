use std::fmt;

use serde::{Deserialize, Serialize};

/// Size of the raw payload prefix searched when no header line is found.
const HEADER_FALLBACK_CHARS: usize = 64;

/// Subfile type announced in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    /// Driver license (`DL`).
    #[serde(rename = "DL")]
    DriverLicense,

    /// Identification card (`ID`).
    #[serde(rename = "ID")]
    IdentificationCard,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DriverLicense => "DL",
            Self::IdentificationCard => "ID",
        }
    }

    fn from_pair(a: char, b: char) -> Option<Self> {
        match (a, b) {
            ('D', 'L') => Some(Self::DriverLicense),
            ('I', 'D') => Some(Self::IdentificationCard),
            _ => None,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Best-effort header metadata.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Header {
    pub recognized: bool,
    pub version: Option<String>,
    pub issuer_id: Option<String>,
    pub file_type: Option<FileType>,
}

impl Header {
    pub fn detect(lines: &[&str], payload: &str) -> Self {
        let window = header_window(lines, payload);
        let window_chars: Vec<char> = window.chars().collect();

        let issuer_id = find_issuer_id(&window_chars, false).or_else(|| {
            let payload_chars: Vec<char> = payload.chars().collect();
            find_issuer_id(&payload_chars, true)
        });

        let recognized =
            contains_ignore_case(window, "AAMVA") || contains_ignore_case(window, "ANSI");

        Self {
            recognized,
            version: find_version(window).or_else(|| find_version(payload)),
            issuer_id,
            file_type: find_file_type(&window_chars),
        }
    }
}

/// Splits a payload into trimmed, non-empty lines.
///
/// `\r\n` and lone `\r` both count as line breaks.
pub(crate) fn split_lines(payload: &str) -> Vec<&str> {
    payload
        .split(|c: char| c == '\r' || c == '\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

fn header_window<'a>(lines: &[&'a str], payload: &'a str) -> &'a str {
    lines
        .iter()
        .copied()
        .find(|l| is_header_line(l))
        .unwrap_or_else(|| match payload.char_indices().nth(HEADER_FALLBACK_CHARS) {
            Some((i, _)) => &payload[..i],
            None => payload,
        })
}

fn is_header_line(line: &str) -> bool {
    line.starts_with('@')
        || contains_ignore_case(line, "ANSI ")
        || contains_ignore_case(line, "AAMVA")
}

/// `needle` must be uppercase.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_ascii_uppercase().contains(needle)
}

/// Two digits following the first `AAMVA` or `ANSI` token that has any.
///
/// Only non-digits may sit between the token and the digits.
fn find_version(text: &str) -> Option<String> {
    let bytes = text.as_bytes();

    for start in 0..bytes.len() {
        let rest = &bytes[start..];
        let token_len = if rest.starts_with(b"AAMVA") {
            5
        } else if rest.starts_with(b"ANSI") {
            4
        } else {
            continue;
        };

        let mut i = start + token_len;
        while i < bytes.len() && !bytes[i].is_ascii_digit() {
            i += 1
        }

        // `bytes[i]` is a digit whenever `i + 1` is in bounds.
        if i + 1 < bytes.len() && bytes[i + 1].is_ascii_digit() {
            return Some(text[i..i + 2].to_owned());
        }
    }

    None
}

/// Leftmost 4 to 6 digit run followed by optional whitespace and `DL`/`ID`
/// in any case. Longer runs are preferred at a given position.
///
/// With `at_word_start`, the run must begin the text or follow whitespace.
fn find_issuer_id(chars: &[char], at_word_start: bool) -> Option<String> {
    for start in 0..chars.len() {
        if at_word_start && start > 0 && !chars[start - 1].is_whitespace() {
            continue;
        }

        let run = chars[start..]
            .iter()
            .take(6)
            .take_while(|c| c.is_ascii_digit())
            .count();

        for len in (4..=run).rev() {
            if followed_by_file_type(chars, start + len) {
                return Some(chars[start..start + len].iter().collect());
            }
        }
    }

    None
}

fn followed_by_file_type(chars: &[char], mut i: usize) -> bool {
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1
    }

    i + 1 < chars.len()
        && FileType::from_pair(chars[i].to_ascii_uppercase(), chars[i + 1].to_ascii_uppercase())
            .is_some()
}

/// Leftmost `DL` or `ID` standing as a word on its own.
fn find_file_type(chars: &[char]) -> Option<FileType> {
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';

    for start in 0..chars.len().saturating_sub(1) {
        let Some(file_type) = FileType::from_pair(chars[start], chars[start + 1]) else {
            continue;
        };

        let before = start == 0 || !is_word(chars[start - 1]);
        let after = start + 2 == chars.len() || !is_word(chars[start + 2]);
        if before && after {
            return Some(file_type);
        }
    }

    None
}
