//! Delete confirmation dialog

use iocraft::prelude::*;

use crate::tui::components::{ModalBorderColor, ModalContainer, ModalOverlay};
use crate::tui::theme::theme;

/// Props for the ConfirmDialog component
#[derive(Default, Props)]
pub struct ConfirmDialogProps {
    /// The question to ask
    pub message: String,
}

#[component]
pub fn ConfirmDialog(props: &ConfirmDialogProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();

    element! {
        ModalOverlay(show_backdrop: true) {
            ModalContainer(
                width: 54u32,
                border_color: Some(ModalBorderColor::Warning),
                title: Some("Eliminar".to_string()),
                footer_text: Some("[y] sí / [n] no / [Esc] cancelar".to_string()),
            ) {
                Text(content: props.message.clone(), color: theme.text, wrap: TextWrap::Wrap)
            }
        }
    }
}
