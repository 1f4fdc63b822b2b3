//! Host event payloads.
//!
//! Payload fields are kept as the JSON the host sent. Nothing is validated:
//! a wrongly typed value is carried through to the log line as is, a
//! missing one renders as `undefined`.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{HostLogError, Result};

/// One payload value: `None` when the host left it out, `Some(Value::Null)`
/// when it sent an explicit `null`.
pub type Field = Option<Value>;

/// Deserializes any JSON value, `null` included, as present.
fn present<'de, D>(deserializer: D) -> std::result::Result<Field, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Nested info objects; anything other than an object reads as empty.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_object() {
        Ok(serde_json::from_value(value).unwrap_or_default())
    } else {
        Ok(T::default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledDetails {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub id: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub previous_version: Field,
    /// `install`, `update`, `chrome_update` or `shared_module_update`.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub reason: Field,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateDetails {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub version: Field,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveInfo {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub tab_id: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub window_id: Field,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachInfo {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub new_position: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub new_window_id: Field,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetachInfo {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub old_position: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub old_window_id: Field,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightInfo {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub tab_ids: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub window_id: Field,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveInfo {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub from_index: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub to_index: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub window_id: Field,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveInfo {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub is_window_closing: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub window_id: Field,
}

/// The subset of a tab the handlers read; everything else is kept opaque.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub id: Field,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// A notification delivered by the host, tagged with its event name.
///
/// Wire form: `{"event": "tabs.onMoved", "payload": {...}}`. The payload
/// is always an object holding the listener's arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum HostEvent {
    #[serde(rename = "runtime.onConnect")]
    RuntimeConnect {
        #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
        port: Field,
    },
    #[serde(rename = "runtime.onConnectExternal")]
    RuntimeConnectExternal {
        #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
        port: Field,
    },
    #[serde(rename = "runtime.onInstalled")]
    RuntimeInstalled(InstalledDetails),
    #[serde(rename = "runtime.onMessage")]
    RuntimeMessage {
        #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
        message: Field,
        #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
        sender: Field,
    },
    #[serde(rename = "runtime.onMessageExternal")]
    RuntimeMessageExternal {
        #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
        message: Field,
        #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
        sender: Field,
    },
    #[serde(rename = "runtime.onStartup")]
    RuntimeStartup,
    #[serde(rename = "runtime.onSuspend")]
    RuntimeSuspend,
    #[serde(rename = "runtime.onSuspendCanceled")]
    RuntimeSuspendCanceled,
    #[serde(rename = "runtime.onUpdateAvailable")]
    RuntimeUpdateAvailable(UpdateDetails),
    #[serde(rename = "tabs.onActivated")]
    TabsActivated(ActiveInfo),
    #[serde(rename = "tabs.onAttached", rename_all = "camelCase")]
    TabsAttached {
        #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
        tab_id: Field,
        #[serde(default, deserialize_with = "lenient")]
        attach_info: AttachInfo,
    },
    #[serde(rename = "tabs.onCreated")]
    TabsCreated {
        #[serde(default, deserialize_with = "lenient")]
        tab: Tab,
    },
    #[serde(rename = "tabs.onDetached", rename_all = "camelCase")]
    TabsDetached {
        #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
        tab_id: Field,
        #[serde(default, deserialize_with = "lenient")]
        detach_info: DetachInfo,
    },
    #[serde(rename = "tabs.onHighlighted")]
    TabsHighlighted(HighlightInfo),
    #[serde(rename = "tabs.onMoved", rename_all = "camelCase")]
    TabsMoved {
        #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
        tab_id: Field,
        #[serde(default, deserialize_with = "lenient")]
        move_info: MoveInfo,
    },
    #[serde(rename = "tabs.onRemoved", rename_all = "camelCase")]
    TabsRemoved {
        #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
        tab_id: Field,
        #[serde(default, deserialize_with = "lenient")]
        remove_info: RemoveInfo,
    },
    #[serde(rename = "tabs.onReplaced", rename_all = "camelCase")]
    TabsReplaced {
        #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
        added_tab_id: Field,
        #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
        removed_tab_id: Field,
    },
    #[serde(rename = "tabs.onUpdated", rename_all = "camelCase")]
    TabsUpdated {
        #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
        tab_id: Field,
        #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
        change_info: Field,
        #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
        tab: Field,
    },
    #[serde(rename = "tabs.onZoomChange", rename_all = "camelCase")]
    TabsZoomChange {
        #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
        zoom_change_info: Field,
    },
}

impl HostEvent {
    /// Every event name the host can deliver.
    pub const NAMES: [&'static str; 19] = [
        "runtime.onConnect",
        "runtime.onConnectExternal",
        "runtime.onInstalled",
        "runtime.onMessage",
        "runtime.onMessageExternal",
        "runtime.onStartup",
        "runtime.onSuspend",
        "runtime.onSuspendCanceled",
        "runtime.onUpdateAvailable",
        "tabs.onActivated",
        "tabs.onAttached",
        "tabs.onCreated",
        "tabs.onDetached",
        "tabs.onHighlighted",
        "tabs.onMoved",
        "tabs.onRemoved",
        "tabs.onReplaced",
        "tabs.onUpdated",
        "tabs.onZoomChange",
    ];

    /// Events that carry no payload; anything sent with them is ignored.
    const PAYLOADLESS: [&'static str; 3] = [
        "runtime.onStartup",
        "runtime.onSuspend",
        "runtime.onSuspendCanceled",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HostEvent::RuntimeConnect { .. } => "runtime.onConnect",
            HostEvent::RuntimeConnectExternal { .. } => "runtime.onConnectExternal",
            HostEvent::RuntimeInstalled(_) => "runtime.onInstalled",
            HostEvent::RuntimeMessage { .. } => "runtime.onMessage",
            HostEvent::RuntimeMessageExternal { .. } => "runtime.onMessageExternal",
            HostEvent::RuntimeStartup => "runtime.onStartup",
            HostEvent::RuntimeSuspend => "runtime.onSuspend",
            HostEvent::RuntimeSuspendCanceled => "runtime.onSuspendCanceled",
            HostEvent::RuntimeUpdateAvailable(_) => "runtime.onUpdateAvailable",
            HostEvent::TabsActivated(_) => "tabs.onActivated",
            HostEvent::TabsAttached { .. } => "tabs.onAttached",
            HostEvent::TabsCreated { .. } => "tabs.onCreated",
            HostEvent::TabsDetached { .. } => "tabs.onDetached",
            HostEvent::TabsHighlighted(_) => "tabs.onHighlighted",
            HostEvent::TabsMoved { .. } => "tabs.onMoved",
            HostEvent::TabsRemoved { .. } => "tabs.onRemoved",
            HostEvent::TabsReplaced { .. } => "tabs.onReplaced",
            HostEvent::TabsUpdated { .. } => "tabs.onUpdated",
            HostEvent::TabsZoomChange { .. } => "tabs.onZoomChange",
        }
    }

    pub fn is_known(name: &str) -> bool {
        Self::NAMES.contains(&name)
    }

    /// Builds an event from a name and its bare payload, as delivered by
    /// transports that carry the name out of band (NATS subject, URL path).
    ///
    /// Only an unknown name is an error. A payload that is not an object
    /// leaves every argument undefined.
    pub fn from_parts(name: &str, payload: Value) -> Result<Self> {
        if !Self::is_known(name) {
            return Err(HostLogError::UnknownEvent(name.to_string()));
        }
        let envelope = if Self::PAYLOADLESS.contains(&name) {
            json!({ "event": name })
        } else if payload.is_object() {
            json!({ "event": name, "payload": payload })
        } else {
            json!({ "event": name, "payload": {} })
        };
        Ok(serde_json::from_value(envelope)?)
    }
}
