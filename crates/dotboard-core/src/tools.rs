//! Tool selection.

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToolKind {
    /// Drag empty canvas to pan.
    #[default]
    Pan,
    /// Click empty canvas to place text.
    Text,
}

impl ToolKind {
    /// Get display name for UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            ToolKind::Pan => "Pan",
            ToolKind::Text => "Text",
        }
    }

    /// Single-key shortcut.
    pub fn shortcut(&self) -> &'static str {
        match self {
            ToolKind::Pan => "H",
            ToolKind::Text => "T",
        }
    }

    pub fn all() -> &'static [ToolKind] {
        &[ToolKind::Pan, ToolKind::Text]
    }
}
