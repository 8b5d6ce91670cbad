//! Compact inline field row
//!
//! Renders an assignment field as `Label: value`. While the form is editable
//! the value is wrapped in arrows (`Label: ◀ value ▶`) to show it can be
//! cycled with left/right.

use iocraft::prelude::*;

use crate::tui::theme::theme;

/// Props for the Select component
#[derive(Default, Props)]
pub struct SelectProps {
    pub label: String,
    pub value: String,
    /// Whether the value is set (unset values are dimmed)
    pub is_set: bool,
    /// Whether the field has focus
    pub has_focus: bool,
    /// Whether the value can currently be changed
    pub is_editable: bool,
}

#[component]
pub fn Select(props: &SelectProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();

    let label_color = if props.has_focus {
        theme.field_focused
    } else {
        theme.label
    };
    let value_color = if props.is_set {
        theme.value
    } else {
        theme.value_unset
    };
    let arrow_color = if props.has_focus {
        theme.field_focused
    } else {
        theme.text_dimmed
    };
    let arrows = props.is_editable;

    element! {
        View(flex_direction: FlexDirection::Row, gap: 1) {
            Text(
                content: format!("{:<13}", format!("{}:", props.label)),
                color: label_color,
                weight: if props.has_focus { Weight::Bold } else { Weight::Normal },
            )
            #(arrows.then(|| element! { Text(content: "◀", color: arrow_color) }))
            Text(content: props.value.clone(), color: value_color)
            #(arrows.then(|| element! { Text(content: "▶", color: arrow_color) }))
        }
    }
}
