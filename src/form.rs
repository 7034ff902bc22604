//! The declarative settings form for the plugin.
//!
//! The host renders the settings page from this schema. It is a static list
//! of field descriptors plus the default values, exposed as plain data.

use crate::config::PluginConfig;
use crate::types::NotificationType;

/// How a field is rendered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Switch,
    Text,
    MultiSelect,
}

/// One option of a multi-select field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub title: &'static str,
    pub value: &'static str,
}

/// One field of the settings form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// Configuration key the field binds to.
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub hint: &'static str,
    pub required: bool,
    /// Options for `MultiSelect` fields, empty otherwise.
    pub options: Vec<SelectOption>,
}

/// The settings form schema, one entry per configuration key.
pub fn schema() -> Vec<FormField> {
    let msg_type_options = NotificationType::ALL
        .iter()
        .map(|msg_type| SelectOption {
            title: msg_type.label(),
            value: msg_type.name(),
        })
        .collect();

    vec![
        FormField {
            key: "enabled",
            label: "Enable plugin",
            kind: FieldKind::Switch,
            hint: "Forward notice messages while enabled",
            required: false,
            options: Vec::new(),
        },
        FormField {
            key: "onlyonce",
            label: "Send a test now",
            kind: FieldKind::Switch,
            hint: "One-shot, switches itself back off after running",
            required: false,
            options: Vec::new(),
        },
        FormField {
            key: "uuid",
            label: "WxPusher user UUID",
            kind: FieldKind::Text,
            hint: "Required; the recipient's WxPusher UUID",
            required: true,
            options: Vec::new(),
        },
        FormField {
            key: "apptoken",
            label: "WxPusher AppToken",
            kind: FieldKind::Text,
            hint: "Required; the WxPusher application token",
            required: true,
            options: Vec::new(),
        },
        FormField {
            key: "msgtypes",
            label: "Message types",
            kind: FieldKind::MultiSelect,
            hint: "Only the selected types are forwarded; empty forwards all",
            required: false,
            options: msg_type_options,
        },
    ]
}

/// The default values backing the form.
pub fn defaults() -> PluginConfig {
    PluginConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_covers_every_config_key() {
        let keys: Vec<_> = schema().iter().map(|f| f.key).collect();
        assert_eq!(
            keys,
            vec!["enabled", "onlyonce", "uuid", "apptoken", "msgtypes"]
        );
    }

    #[test]
    fn msgtypes_field_lists_every_notification_type() {
        let schema = schema();
        let msgtypes = schema.iter().find(|f| f.key == "msgtypes").unwrap();
        assert_eq!(msgtypes.kind, FieldKind::MultiSelect);
        assert_eq!(msgtypes.options.len(), NotificationType::ALL.len());
        assert!(msgtypes.options.iter().any(|o| o.value == "Manual"));
    }

    #[test]
    fn defaults_start_disabled_with_empty_credentials() {
        let defaults = defaults();
        assert!(!defaults.enabled);
        assert!(!defaults.onlyonce);
        assert!(defaults.uuid.is_empty());
        assert!(defaults.apptoken.is_empty());
        assert!(defaults.msgtypes.is_empty());
    }
}
