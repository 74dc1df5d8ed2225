/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Key release delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Logical key value, e.g. `"T"` when shift is held.
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self { key: key.into(), modifiers }
    }
}

/// Key combination that toggles the overlay.
///
/// Only the modifiers that are set take part in the comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub key: String,
    pub shift: Option<bool>,
    pub ctrl: Option<bool>,
    pub alt: Option<bool>,
    pub meta: Option<bool>,
}

impl KeyCombo {
    pub fn matches(&self, event: &KeyEvent) -> bool {
        fn check(expected: Option<bool>, actual: bool) -> bool {
            expected.is_none_or(|e| e == actual)
        }

        event.key == self.key
            && check(self.shift, event.modifiers.shift)
            && check(self.ctrl, event.modifiers.ctrl)
            && check(self.alt, event.modifiers.alt)
            && check(self.meta, event.modifiers.meta)
    }
}

impl Default for KeyCombo {
    /// Shift+T.
    fn default() -> Self {
        Self {
            key: "T".to_string(),
            shift: Some(true),
            ctrl: None,
            alt: None,
            meta: None,
        }
    }
}
