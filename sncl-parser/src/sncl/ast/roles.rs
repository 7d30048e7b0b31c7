//! Link roles
//!
//! The fixed vocabulary of condition and action roles a link can bind. The lexer
//! recognises them as keywords and the connector synthesis groups binds by them.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConditionRole {
    OnBegin,
    OnEnd,
    OnSelection,
}

impl ConditionRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ConditionRole::OnBegin => "onBegin",
            ConditionRole::OnEnd => "onEnd",
            ConditionRole::OnSelection => "onSelection",
        }
    }
}

impl fmt::Display for ConditionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionRole {
    Start,
    Stop,
    Set,
}

impl ActionRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionRole::Start => "start",
            ActionRole::Stop => "stop",
            ActionRole::Set => "set",
        }
    }
}

impl fmt::Display for ActionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remote-control keys an `onSelection` condition may name as its interface.
const CONTROL_BUTTONS: [&str; 27] = [
    "*",
    "#",
    "MENU",
    "INFO",
    "GUIDE",
    "CURSOR_DOWN",
    "CURSOR_LEFT",
    "CURSOR_RIGHT",
    "CURSOR_UP",
    "CHANNEL_DOWN",
    "CHANNEL_UP",
    "VOLUME_DOWN",
    "VOLUME_UP",
    "ENTER",
    "RED",
    "GREEN",
    "YELLOW",
    "BLUE",
    "BLACK",
    "EXIT",
    "POWER",
    "REWIND",
    "STOP",
    "EJECT",
    "PLAY",
    "RECORD",
    "PAUSE",
];

/// True for a named key, a single digit or a single uppercase letter.
pub fn is_control_button(label: &str) -> bool {
    if CONTROL_BUTTONS.contains(&label) {
        return true;
    }
    let mut chars = label.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.is_ascii_digit() || c.is_ascii_uppercase(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_buttons() {
        assert!(is_control_button("RED"));
        assert!(is_control_button("CURSOR_UP"));
        assert!(is_control_button("7"));
        assert!(is_control_button("Q"));
        assert!(!is_control_button("q"));
        assert!(!is_control_button("12"));
        assert!(!is_control_button("segment1"));
        assert!(!is_control_button(""));
    }

    #[test]
    fn role_names_match_source_keywords() {
        assert_eq!(ConditionRole::OnSelection.to_string(), "onSelection");
        assert_eq!(ActionRole::Set.to_string(), "set");
    }
}
