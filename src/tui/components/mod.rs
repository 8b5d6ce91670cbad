//! Shared TUI components

pub mod footer;
pub mod header;
pub mod modal_container;
pub mod modal_overlay;
pub mod select;
pub mod shortcuts;
pub mod toast;

pub use footer::{
    Footer, FooterProps, Shortcut, confirm_dialog_shortcuts, edit_shortcuts, search_shortcuts,
};
pub use header::{Header, HeaderProps};
pub use modal_container::{ModalBorderColor, ModalContainer, ModalContainerProps};
pub use modal_overlay::{ModalOverlay, ModalOverlayProps};
pub use select::{Select, SelectProps};
pub use shortcuts::ShortcutsBuilder;
pub use toast::{Toast, ToastLevel, render_toast};
