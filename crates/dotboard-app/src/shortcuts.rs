//! Keyboard shortcut registry and documentation.

use dotboard_core::ToolKind;

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, ctrl: bool, description: &'static str) -> Self {
        Self {
            key,
            ctrl,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Wheel").
    pub fn format(&self) -> String {
        if self.ctrl {
            format!("Ctrl+{}", self.key)
        } else {
            self.key.to_string()
        }
    }
}

/// Action bound to an app-level shortcut key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    SetTool(ToolKind),
    ToggleGrid,
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new(ToolKind::Pan.shortcut(), false, "Pan tool"),
            Shortcut::new(ToolKind::Text.shortcut(), false, "Text tool"),
            Shortcut::new("G", false, "Toggle grid"),
            Shortcut::new("Delete", false, "Delete selected text"),
            Shortcut::new("Backspace", false, "Delete selected text"),
            Shortcut::new("Escape", false, "Cancel text entry / clear selection"),
            Shortcut::new("+ / =", false, "Zoom in"),
            Shortcut::new("-", false, "Zoom out"),
            Shortcut::new("Wheel", false, "Zoom at pointer"),
        ]
    }

    /// App-level action for a character key, if any.
    ///
    /// Shortcuts never fire with Ctrl held, so they do not shadow system
    /// bindings.
    pub fn action_for(key: &str, ctrl: bool) -> Option<ShortcutAction> {
        if ctrl {
            return None;
        }
        match key.to_ascii_uppercase().as_str() {
            "G" => Some(ShortcutAction::ToggleGrid),
            other => ToolKind::all()
                .iter()
                .find(|tool| tool.shortcut() == other)
                .map(|tool| ShortcutAction::SetTool(*tool)),
        }
    }

    /// Log all shortcuts.
    pub fn log_all() {
        for shortcut in Self::all() {
            log::info!("  {:12} {}", shortcut.format(), shortcut.description);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_shortcuts() {
        assert_eq!(
            ShortcutRegistry::action_for("h", false),
            Some(ShortcutAction::SetTool(ToolKind::Pan))
        );
        assert_eq!(
            ShortcutRegistry::action_for("T", false),
            Some(ShortcutAction::SetTool(ToolKind::Text))
        );
        assert_eq!(
            ShortcutRegistry::action_for("g", false),
            Some(ShortcutAction::ToggleGrid)
        );
    }

    #[test]
    fn test_ctrl_disables_shortcuts() {
        assert_eq!(ShortcutRegistry::action_for("t", true), None);
        assert_eq!(ShortcutRegistry::action_for("x", false), None);
    }

    #[test]
    fn test_format() {
        assert_eq!(Shortcut::new("Wheel", true, "").format(), "Ctrl+Wheel");
        assert_eq!(Shortcut::new("G", false, "").format(), "G");
    }
}
