//! Event-to-message formatting.

use serde_json::Value;

use crate::log::LogSink;
use crate::model::{Field, HostEvent};

/// Default handler: records each line [`format_event`] produces.
pub fn record_event(event: &HostEvent, sink: &dyn LogSink) {
    for message in format_event(event) {
        sink.record(message);
    }
}

/// Log lines for one event. Always one line, except inbound messages that
/// embed a `logData` text, which add it as a second line.
pub fn format_event(event: &HostEvent) -> Vec<String> {
    let name = event.name();
    let line = match event {
        HostEvent::RuntimeConnect { .. }
        | HostEvent::RuntimeConnectExternal { .. }
        | HostEvent::RuntimeStartup
        | HostEvent::RuntimeSuspend
        | HostEvent::RuntimeSuspendCanceled => name.to_string(),
        HostEvent::RuntimeInstalled(details) => format!("{} - {}", name, text(&details.reason)),
        HostEvent::RuntimeMessage { message, .. }
        | HostEvent::RuntimeMessageExternal { message, .. } => {
            let mut lines = vec![format!("{} - {}", name, text(message))];
            if let Some(embedded) = embedded_text(message) {
                lines.push(embedded);
            }
            return lines;
        }
        HostEvent::RuntimeUpdateAvailable(details) => {
            format!("{} - {}", name, text(&details.version))
        }
        HostEvent::TabsActivated(info) => format!(
            "{} - window: {} - tab: {}",
            name,
            text(&info.window_id),
            text(&info.tab_id)
        ),
        HostEvent::TabsAttached { tab_id, attach_info } => format!(
            "{} - tabId: {} ({}, {})",
            name,
            text(tab_id),
            text(&attach_info.new_window_id),
            text(&attach_info.new_position)
        ),
        HostEvent::TabsCreated { tab } => format!("{} - tabId: {}", name, text(&tab.id)),
        HostEvent::TabsDetached { tab_id, detach_info } => format!(
            "{} - tabId: {} ({}, {})",
            name,
            text(tab_id),
            text(&detach_info.old_window_id),
            text(&detach_info.old_position)
        ),
        HostEvent::TabsHighlighted(info) => format!(
            "{} - windowId: {} - tabs: {}",
            name,
            text(&info.window_id),
            json(&info.tab_ids)
        ),
        HostEvent::TabsMoved { tab_id, move_info } => format!(
            "{} - tabId: {} ({} -> {})",
            name,
            text(tab_id),
            text(&move_info.from_index),
            text(&move_info.to_index)
        ),
        HostEvent::TabsRemoved { tab_id, remove_info } => format!(
            "{} - tabId: {} - windowId: {}",
            name,
            text(tab_id),
            text(&remove_info.window_id)
        ),
        HostEvent::TabsReplaced {
            added_tab_id,
            removed_tab_id,
        } => format!("{} - {} -> {}", name, text(removed_tab_id), text(added_tab_id)),
        HostEvent::TabsUpdated {
            tab_id,
            change_info,
            ..
        } => format!("{} - tabId: {} - {}", name, text(tab_id), json(change_info)),
        HostEvent::TabsZoomChange { zoom_change_info } => {
            format!("{} - {}", name, json(zoom_change_info))
        }
    };
    vec![line]
}

const UNDEFINED: &str = "undefined";

/// Interpolated value: strings verbatim, everything else as JSON.
fn text(field: &Field) -> String {
    match field {
        None => UNDEFINED.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Serialized value; only an absent field has no JSON form.
fn json(field: &Field) -> String {
    match field {
        None => UNDEFINED.to_string(),
        Some(value) => value.to_string(),
    }
}

fn embedded_text(message: &Field) -> Option<String> {
    let data = message.as_ref()?.get("logData")?;
    truthy(data).then(|| text(&Some(data.clone())))
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
