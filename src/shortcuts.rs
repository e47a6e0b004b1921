//! Keyboard shortcuts for the new-tab page.

/// What a shortcut asks the page to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    AddFavorite,
    AddWidget,
    OpenSettings,
    CycleTheme,
    CloseDialogs,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub action: ShortcutAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, action: ShortcutAction, description: &'static str) -> Self {
        Self {
            key,
            action,
            description,
        }
    }

    /// All shortcuts, in the order the settings panel lists them.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("F", ShortcutAction::AddFavorite, "Add favorite"),
            Shortcut::new("W", ShortcutAction::AddWidget, "Add widget"),
            Shortcut::new("S", ShortcutAction::OpenSettings, "Open settings"),
            Shortcut::new("T", ShortcutAction::CycleTheme, "Cycle theme"),
            Shortcut::new("Escape", ShortcutAction::CloseDialogs, "Close dialogs"),
        ]
    }

    /// Map a `KeyboardEvent.key` to an action.
    ///
    /// `target_tag` is the tag name of the focused element; letter shortcuts
    /// are ignored while typing in an input or textarea. Escape always works.
    pub fn from_key(key: &str, target_tag: &str) -> Option<ShortcutAction> {
        if key == "Escape" {
            return Some(ShortcutAction::CloseDialogs);
        }
        if is_text_entry(target_tag) {
            return None;
        }

        Self::all()
            .into_iter()
            .find(|s| s.key.len() == 1 && s.key.eq_ignore_ascii_case(key))
            .map(|s| s.action)
    }
}

fn is_text_entry(tag: &str) -> bool {
    tag.eq_ignore_ascii_case("input") || tag.eq_ignore_ascii_case("textarea")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_map_case_insensitively() {
        assert_eq!(Shortcut::from_key("f", "BODY"), Some(ShortcutAction::AddFavorite));
        assert_eq!(Shortcut::from_key("W", "BODY"), Some(ShortcutAction::AddWidget));
        assert_eq!(Shortcut::from_key("s", "DIV"), Some(ShortcutAction::OpenSettings));
        assert_eq!(Shortcut::from_key("T", "BUTTON"), Some(ShortcutAction::CycleTheme));
        assert_eq!(Shortcut::from_key("x", "BODY"), None);
        assert_eq!(Shortcut::from_key("Enter", "BODY"), None);
    }

    #[test]
    fn test_ignored_while_typing() {
        assert_eq!(Shortcut::from_key("f", "INPUT"), None);
        assert_eq!(Shortcut::from_key("t", "textarea"), None);
        assert_eq!(Shortcut::from_key("Escape", "INPUT"), Some(ShortcutAction::CloseDialogs));
    }

    #[test]
    fn test_all_keys_unique() {
        let all = Shortcut::all();
        let mut keys: Vec<&str> = all.iter().map(|s| s.key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), all.len());
    }
}
