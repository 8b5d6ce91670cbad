//! Repair manager screen
//!
//! Renders `RepairViewModel` and feeds key presses through `key_to_action`
//! and the reducer. Effects returned by the reducer run in an async handler;
//! each completion goes back through the reducer and may chain a follow-up
//! effect (the refresh after a save).

#![allow(clippy::clone_on_copy)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use iocraft::prelude::*;

use crate::config::DEFAULT_NOTIFICATION_MS;
use crate::remote::RepairService;
use crate::tui::components::{Footer, Header, Select, render_toast};
use crate::tui::theme::theme;
use crate::types::ReportId;

use super::confirm_modal::ConfirmDialog;
use super::model::{
    ActionButton, AssignmentViewModel, RepairAction, RepairEffect, RepairState, ReportViewModel,
    SearchViewModel, compute_repair_view_model, key_to_action, reduce_repair_state,
};
use super::session::run_effect;

const EXPIRY_TICK: Duration = Duration::from_millis(250);

/// Props for the RepairManager component
#[derive(Default, Props)]
pub struct RepairManagerProps {
    /// Backend access; without it the screen renders but never loads anything
    pub service: Option<Arc<dyn RepairService>>,
    /// Report to search for on startup
    pub initial_id: Option<ReportId>,
    /// How long notifications stay visible
    pub notification_lifetime: Option<Duration>,
    /// Shown next to the title (backend origin)
    pub subtitle: Option<String>,
}

#[component]
pub fn RepairManager(props: &RepairManagerProps, mut hooks: Hooks) -> impl Into<AnyElement<'static>> {
    let (width, height) = hooks.use_terminal_size();
    let mut system = hooks.use_context_mut::<SystemContext>();
    let theme = theme();

    let lifetime = props
        .notification_lifetime
        .unwrap_or(Duration::from_millis(DEFAULT_NOTIFICATION_MS));
    let mut state: State<RepairState> =
        hooks.use_state(move || RepairState::default().with_notification_lifetime(lifetime));

    // Runs an effect, reduces its completion, and keeps going while the
    // reducer asks for follow-up work
    let effect_handler: Handler<RepairEffect> = hooks.use_async_handler({
        let service = props.service.clone();
        let state_setter = state.clone();

        move |effect: RepairEffect| {
            let service = service.clone();
            let mut state_setter = state_setter.clone();

            async move {
                let Some(service) = service else {
                    tracing::warn!(?effect, "no repair service configured; dropping effect");
                    return;
                };
                let mut next = Some(effect);
                while let Some(effect) = next.take() {
                    let completion = run_effect(service.as_ref(), effect).await;
                    let current = state_setter.read().clone();
                    let (updated, follow_up) = reduce_repair_state(current, completion);
                    state_setter.set(updated);
                    next = follow_up;
                }
            }
        }
    });

    // Initial catalog load and optional startup search
    let mut started = hooks.use_state(|| false);
    if !started.get() {
        started.set(true);
        let mut startup = vec![RepairAction::LoadCatalogs];
        if let Some(id) = props.initial_id {
            startup.push(RepairAction::UpdateSearchInput(id.to_string()));
            startup.push(RepairAction::Search);
        }
        for action in startup {
            let current = state.read().clone();
            let (updated, effect) = reduce_repair_state(current, action);
            state.set(updated);
            if let Some(effect) = effect {
                effect_handler.clone()(effect);
            }
        }
    }

    // Auto-dismiss notifications
    hooks.use_future({
        let mut state = state.clone();
        async move {
            loop {
                tokio::time::sleep(EXPIRY_TICK).await;
                let now = Instant::now();
                let expired = state
                    .read()
                    .toast
                    .as_ref()
                    .is_some_and(|t| t.is_expired(now, lifetime));
                if expired {
                    let current = state.read().clone();
                    let (updated, _) =
                        reduce_repair_state(current, RepairAction::ExpireNotification(now));
                    state.set(updated);
                }
            }
        }
    });

    hooks.use_terminal_events({
        let effect_handler = effect_handler.clone();
        move |event| match event {
            TerminalEvent::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) if kind != KeyEventKind::Release => {
                let current = state.read().clone();
                if let Some(action) = key_to_action(code, modifiers, &current) {
                    let (updated, effect) = reduce_repair_state(current, action);
                    state.set(updated);
                    if let Some(effect) = effect {
                        effect_handler.clone()(effect);
                    }
                }
            }
            _ => {}
        }
    });

    if state.read().should_exit {
        system.exit();
    }

    let vm = compute_repair_view_model(&state.read());

    let body = match (&vm.report, &vm.assignment) {
        (Some(report), Some(assignment)) => element! {
            View(flex_grow: 1.0, width: 100pct, flex_direction: FlexDirection::Row) {
                #(render_report(report))
                #(render_assignment(assignment, &vm.actions))
            }
        }
        .into_any(),
        _ => render_empty(vm.search.is_searching),
    };

    element! {
        View(
            width,
            height,
            flex_direction: FlexDirection::Column,
        ) {
            Header(
                title: Some("Baches".to_string()),
                subtitle: props.subtitle.clone().or(Some("Gestión de reparaciones".to_string())),
                status: vm.status.clone(),
            )

            #(render_search(&vm.search))

            #(vm.banner.clone().map(|banner| element! {
                View(
                    width: 100pct,
                    flex_shrink: 0.0,
                    padding_left: 1,
                    border_style: BorderStyle::Round,
                    border_color: theme.warning,
                ) {
                    Text(content: banner, color: theme.warning, weight: Weight::Bold)
                }
            }))

            #(Some(body))

            #(render_toast(&vm.toast))

            Footer(shortcuts: vm.shortcuts.clone())

            #(vm.confirm_prompt.clone().map(|message| element! {
                ConfirmDialog(message)
            }))
        }
    }
}

fn render_search(search: &SearchViewModel) -> AnyElement<'static> {
    let theme = theme();
    let cursor = if search.is_focused { "_" } else { "" };
    let button_color = if search.can_search {
        theme.highlight
    } else {
        theme.button_disabled
    };

    element! {
        View(
            width: 100pct,
            flex_shrink: 0.0,
            flex_direction: FlexDirection::Row,
            gap: 1,
            padding_left: 1,
            border_style: BorderStyle::Round,
            border_color: theme.panel_border(search.is_focused),
        ) {
            Text(content: "Reporte #:", color: theme.label)
            Text(content: format!("{}{}", search.input, cursor), color: theme.id_color, weight: Weight::Bold)
            View(flex_grow: 1.0)
            Text(content: "[Enter] Buscar", color: button_color)
        }
    }
    .into_any()
}

fn info_row(label: &str, value: String) -> AnyElement<'static> {
    let theme = theme();
    element! {
        View(flex_direction: FlexDirection::Row, gap: 1) {
            Text(content: format!("{:<15}", format!("{label}:")), color: theme.label)
            Text(content: value, color: theme.value)
        }
    }
    .into_any()
}

fn render_report(report: &ReportViewModel) -> AnyElement<'static> {
    let theme = theme();
    element! {
        View(
            width: 50pct,
            flex_direction: FlexDirection::Column,
            padding_left: 1,
            padding_right: 1,
            border_style: BorderStyle::Round,
            border_color: theme.border,
        ) {
            Text(content: format!("Reporte #{}", report.pothole_id), color: theme.id_color, weight: Weight::Bold)
            View(height: 1)
            #(info_row("Ciudadano", report.citizen_name.clone()))
            #(info_row("Fecha reporte", report.date_reported.clone()))
            #(info_row("Ubicación", report.location.clone()))
        }
    }
    .into_any()
}

fn render_assignment(assignment: &AssignmentViewModel, actions: &[ActionButton]) -> AnyElement<'static> {
    let theme = theme();
    let title = match assignment.repair_id {
        Some(id) => format!("Reparación #{id}"),
        None => "Reparación (sin asignar)".to_string(),
    };
    let editable = assignment.is_editable;

    element! {
        View(
            width: 50pct,
            flex_direction: FlexDirection::Column,
            padding_left: 1,
            padding_right: 1,
            border_style: BorderStyle::Round,
            border_color: theme.panel_border(editable),
        ) {
            Text(content: title, color: theme.id_color, weight: Weight::Bold)
            View(height: 1)
            #(assignment.fields.iter().map(|field| element! {
                Select(
                    label: field.label.to_string(),
                    value: field.value.clone(),
                    is_set: field.is_set,
                    has_focus: field.is_focused,
                    is_editable: editable,
                )
            }))
            View(height: 1)
            View(flex_direction: FlexDirection::Row, gap: 2) {
                #(actions.iter().map(|button| element! {
                    Text(
                        content: format!("[{}] {}", button.key, button.label),
                        color: if button.enabled { theme.highlight } else { theme.button_disabled },
                        weight: if button.enabled { Weight::Bold } else { Weight::Normal },
                    )
                }))
            }
        }
    }
    .into_any()
}

fn render_empty(searching: bool) -> AnyElement<'static> {
    let theme = theme();
    let message = if searching {
        "Buscando reporte..."
    } else {
        "Ingresa el número de reporte y presiona Enter."
    };
    element! {
        View(
            flex_grow: 1.0,
            width: 100pct,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
        ) {
            Text(content: message, color: theme.text_dimmed)
        }
    }
    .into_any()
}
