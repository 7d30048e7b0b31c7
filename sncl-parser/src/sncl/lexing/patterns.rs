//! Literal value patterns
//!
//!     The regular expression fragments for every literal value kind the language
//!     accepts. They are tried in declaration order and the first alternative that
//!     matches wins, so the more specific number forms must come before the plain
//!     number:
//!
//!         hex color        #RGB or #RRGGBB
//!         string           "anything but a quote"
//!         percentage       10%, 12.5%
//!         number with unit 10s, 1.5px
//!         number           10, 0.5

use once_cell::sync::Lazy;
use regex::Regex;

pub const HEX_PATTERN: &str = r"#(?:[0-9a-fA-F]{6}|[0-9a-fA-F]{3})";
pub const STRING_PATTERN: &str = r#""[^"]*""#;
pub const PERCENTAGE_PATTERN: &str = r"[0-9]+(?:\.[0-9]+)?%";
pub const NUMBER_WITH_UNIT_PATTERN: &str = r"[0-9]+(?:\.[0-9]+)?[a-zA-Z]+";
pub const NUMBER_PATTERN: &str = r"[0-9]+(?:\.[0-9]+)?";

/// The kinds of literal values, in match priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Hex,
    String,
    Percentage,
    NumberWithUnit,
    Number,
}

impl ValueKind {
    pub const ALL: [ValueKind; 5] = [
        ValueKind::Hex,
        ValueKind::String,
        ValueKind::Percentage,
        ValueKind::NumberWithUnit,
        ValueKind::Number,
    ];

    pub fn pattern(self) -> &'static str {
        match self {
            ValueKind::Hex => HEX_PATTERN,
            ValueKind::String => STRING_PATTERN,
            ValueKind::Percentage => PERCENTAGE_PATTERN,
            ValueKind::NumberWithUnit => NUMBER_WITH_UNIT_PATTERN,
            ValueKind::Number => NUMBER_PATTERN,
        }
    }

    /// Classify a complete literal. Returns `None` if `text` is not exactly one value.
    pub fn classify(text: &str) -> Option<ValueKind> {
        EXACT
            .iter()
            .find(|(_, regex)| regex.is_match(text))
            .map(|(kind, _)| *kind)
    }
}

static EXACT: Lazy<Vec<(ValueKind, Regex)>> = Lazy::new(|| {
    ValueKind::ALL
        .iter()
        .map(|kind| {
            let regex = Regex::new(&format!("^(?:{})$", kind.pattern()))
                .expect("literal patterns are valid regular expressions");
            (*kind, regex)
        })
        .collect()
});

/// All value patterns joined as ordered alternatives, anchored at the start.
static PREFIX: Lazy<Regex> = Lazy::new(|| {
    let alternatives: Vec<&str> = ValueKind::ALL.iter().map(|kind| kind.pattern()).collect();
    Regex::new(&format!("^(?:{})", alternatives.join("|")))
        .expect("literal patterns are valid regular expressions")
});

/// Length in bytes of the literal value starting at the beginning of `input`, if any.
pub fn match_value(input: &str) -> Option<usize> {
    PREFIX.find(input).map(|m| m.end())
}

/// True for a double-quoted string literal.
pub fn is_string_literal(text: &str) -> bool {
    ValueKind::classify(text) == Some(ValueKind::String)
}

/// Strips one level of surrounding quotes, if present.
pub fn remove_quotes(text: &str) -> String {
    let quoted = text.len() >= 2
        && ((text.starts_with('"') && text.ends_with('"'))
            || (text.starts_with('\'') && text.ends_with('\'')));
    if quoted {
        text[1..text.len() - 1].to_string()
    } else {
        text.to_string()
    }
}
