//! App header bar component
//!
//! Shows the application title on the left and a short status on the right.

use iocraft::prelude::*;

use crate::tui::theme::theme;

/// Props for the Header component
#[derive(Default, Props)]
pub struct HeaderProps {
    /// Title (defaults to "Baches")
    pub title: Option<String>,
    /// Subtitle appended after the title
    pub subtitle: Option<String>,
    /// Right-aligned status text (e.g. an in-flight request)
    pub status: Option<String>,
}

#[component]
pub fn Header(props: &HeaderProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();

    let title = props.title.clone().unwrap_or_else(|| "Baches".to_string());
    let left_text = match &props.subtitle {
        Some(sub) => format!("{title} - {sub}"),
        None => title,
    };
    let status = props.status.clone();

    element! {
        View(
            width: 100pct,
            height: 1,
            flex_direction: FlexDirection::Row,
            flex_shrink: 0.0,
            justify_content: JustifyContent::SpaceBetween,
            padding_left: 1,
            padding_right: 1,
            background_color: theme.highlight,
        ) {
            Text(content: left_text, color: theme.text, weight: Weight::Bold)
            #(status.map(|status| element! {
                Text(content: status, color: theme.text)
            }))
        }
    }
}
