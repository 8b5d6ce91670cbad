//! Shortcut computation for the repair manager

use crate::tui::components::footer::Shortcut;
use crate::tui::components::{
    ShortcutsBuilder, confirm_dialog_shortcuts, edit_shortcuts, search_shortcuts,
};

use super::model::{Focus, RepairMode, RepairState};

/// Compute keyboard shortcuts based on modal/focus/mode priority
pub fn compute_repair_shortcuts(state: &RepairState) -> Vec<Shortcut> {
    if state.confirm_delete.is_some() {
        return confirm_dialog_shortcuts();
    }

    if state.focus == Focus::Search {
        return search_shortcuts();
    }

    match state.mode() {
        RepairMode::Editing => {
            let mut shortcuts = edit_shortcuts();
            if state.can_delete() {
                shortcuts.push(Shortcut::new("d", "Delete"));
            }
            shortcuts
        }
        RepairMode::Viewing => ShortcutsBuilder::new()
            .with_search()
            .add("e", "Edit")
            .add_if(state.can_delete(), "d", "Delete")
            .add_if(state.catalogs.is_none(), "r", "Reload Catalogs")
            .add_if(state.toast.is_some(), "x", "Dismiss")
            .add("q", "Quit")
            .build(),
        RepairMode::Idle => ShortcutsBuilder::new()
            .with_search()
            .add_if(state.catalogs.is_none(), "r", "Reload Catalogs")
            .add_if(state.toast.is_some(), "x", "Dismiss")
            .add("q", "Quit")
            .build(),
    }
}
