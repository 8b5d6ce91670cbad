//! Modal container component
//!
//! A bordered box with an optional title row and an optional footer hint.

use iocraft::prelude::*;

use crate::tui::theme::theme;

/// Border colors for modals
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub enum ModalBorderColor {
    #[default]
    Focused,
    Warning,
    Error,
}

impl ModalBorderColor {
    pub fn to_color(self) -> Color {
        let theme = theme();
        match self {
            Self::Focused => theme.border_focused,
            Self::Warning => theme.warning,
            Self::Error => theme.error,
        }
    }
}

/// Props for the ModalContainer component
#[derive(Default, Props)]
pub struct ModalContainerProps<'a> {
    /// Width in columns (default: 60)
    pub width: Option<u32>,
    pub border_color: Option<ModalBorderColor>,
    pub title: Option<String>,
    pub footer_text: Option<String>,
    pub children: Vec<AnyElement<'a>>,
}

#[component]
pub fn ModalContainer<'a>(props: &mut ModalContainerProps<'a>) -> impl Into<AnyElement<'a>> {
    let theme = theme();
    let border_color = props.border_color.unwrap_or_default().to_color();
    let title = props.title.clone();
    let footer = props.footer_text.clone();

    element! {
        View(
            width: props.width.unwrap_or(60),
            border_style: BorderStyle::Double,
            border_color: border_color,
            padding_left: 1,
            padding_right: 1,
            flex_direction: FlexDirection::Column,
        ) {
            #(title.map(|title| element! {
                View(
                    width: 100pct,
                    border_edges: Edges::Bottom,
                    border_style: BorderStyle::Single,
                    border_color: theme.border,
                ) {
                    Text(content: title, color: border_color, weight: Weight::Bold)
                }
            }))

            View(width: 100pct, flex_direction: FlexDirection::Column, padding_top: 1, padding_bottom: 1) {
                #(std::mem::take(&mut props.children))
            }

            #(footer.map(|footer| element! {
                View(
                    width: 100pct,
                    border_edges: Edges::Top,
                    border_style: BorderStyle::Single,
                    border_color: theme.border,
                ) {
                    Text(content: footer, color: theme.text_dimmed)
                }
            }))
        }
    }
}
