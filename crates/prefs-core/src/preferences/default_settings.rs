//! Rendered default settings documents.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde_json::{Map, Value};
use tokio::sync::watch;

use crate::defaults::{ConfigurationDefaults, SettingDescriptor};
use crate::types::ConfigurationTarget;

/// Settings shown first in every default settings document.
pub const MOST_COMMONLY_USED_SETTINGS: [&str; 12] = [
    "files.autoSave",
    "editor.fontSize",
    "editor.fontFamily",
    "editor.tabSize",
    "editor.renderWhitespace",
    "editor.cursorStyle",
    "editor.multiCursorModifier",
    "editor.insertSpaces",
    "editor.wordWrap",
    "files.exclude",
    "files.associations",
    "workbench.editor.enablePreview",
];

const MOST_COMMONLY_USED_TITLE: &str = "Most Commonly Used";
const INDENT: &str = "    ";

#[derive(Debug, Default)]
struct Rendered {
    settings: Vec<SettingDescriptor>,
    content: String,
    content_without_most_commonly_used: String,
    raw_content: String,
}

/// Default settings applicable to one configuration target.
///
/// The resolver keeps one instance per target and re-renders it in place when
/// registered defaults change, so holders of the `Arc` always see current content.
pub struct DefaultSettings {
    target: ConfigurationTarget,
    most_commonly_used: Vec<String>,
    defaults: Arc<dyn ConfigurationDefaults>,
    rendered: RwLock<Rendered>,
    changes: watch::Sender<u64>,
}

impl DefaultSettings {
    pub fn new(
        most_commonly_used: Vec<String>,
        target: ConfigurationTarget,
        defaults: Arc<dyn ConfigurationDefaults>,
    ) -> Self {
        let rendered = render(target, &most_commonly_used, defaults.settings());
        let (changes, _) = watch::channel(0);
        Self {
            target,
            most_commonly_used,
            defaults,
            rendered: RwLock::new(rendered),
            changes,
        }
    }

    pub fn target(&self) -> ConfigurationTarget {
        self.target
    }

    pub fn most_commonly_used(&self) -> &[String] {
        &self.most_commonly_used
    }

    /// Settings applicable to the target, sorted by key.
    pub fn settings(&self) -> Vec<SettingDescriptor> {
        self.read(|r| r.settings.clone())
    }

    /// Full document, most commonly used section first.
    pub fn content(&self) -> String {
        self.read(|r| r.content.clone())
    }

    pub fn content_without_most_commonly_used(&self) -> String {
        self.read(|r| r.content_without_most_commonly_used.clone())
    }

    /// Plain JSON object of every applicable key and its default value.
    pub fn raw_content(&self) -> String {
        self.read(|r| r.raw_content.clone())
    }

    /// Number of change notifications raised so far.
    pub fn revision(&self) -> u64 {
        *self.changes.borrow()
    }

    /// Receiver that observes every change notification.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    /// Re-render from the current defaults; returns whether the content changed.
    pub(crate) fn refresh(&self) -> bool {
        let rendered = render(self.target, &self.most_commonly_used, self.defaults.settings());
        let mut current = match self.rendered.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let changed = current.content != rendered.content;
        *current = rendered;
        changed
    }

    pub(crate) fn notify_changed(&self) {
        self.changes.send_modify(|revision| *revision += 1);
    }

    fn read<T>(&self, f: impl FnOnce(&Rendered) -> T) -> T {
        match self.rendered.read() {
            Ok(guard) => f(&guard),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }
}

impl std::fmt::Debug for DefaultSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultSettings")
            .field("target", &self.target)
            .field("revision", &self.revision())
            .finish_non_exhaustive()
    }
}

enum Item<'a> {
    Section(String),
    Setting(&'a SettingDescriptor),
}

fn render(
    target: ConfigurationTarget,
    most_commonly_used: &[String],
    all: Vec<SettingDescriptor>,
) -> Rendered {
    let mut settings: Vec<SettingDescriptor> = all
        .into_iter()
        .filter(|setting| setting.scope.applies_to(target))
        .collect();
    settings.sort_by(|a, b| a.key.cmp(&b.key));

    let mut common = Vec::new();
    let common_settings: Vec<&SettingDescriptor> = most_commonly_used
        .iter()
        .filter_map(|key| settings.iter().find(|setting| &setting.key == key))
        .collect();
    if !common_settings.is_empty() {
        common.push(Item::Section(MOST_COMMONLY_USED_TITLE.to_string()));
        common.extend(common_settings.into_iter().map(Item::Setting));
    }

    let mut sections: BTreeMap<&str, Vec<&SettingDescriptor>> = BTreeMap::new();
    for setting in &settings {
        sections.entry(setting.section()).or_default().push(setting);
    }
    let mut grouped = Vec::new();
    for (section, members) in sections {
        grouped.push(Item::Section(section_title(section)));
        grouped.extend(members.into_iter().map(Item::Setting));
    }

    let content_without_most_commonly_used = render_document(&grouped);
    common.extend(grouped);
    let content = render_document(&common);

    let raw: Map<String, Value> = settings
        .iter()
        .map(|setting| (setting.key.clone(), setting.default.clone()))
        .collect();
    let raw_content = format!("{:#}\n", Value::Object(raw));

    Rendered {
        settings,
        content,
        content_without_most_commonly_used,
        raw_content,
    }
}

fn render_document(items: &[Item<'_>]) -> String {
    let last_setting = items
        .iter()
        .rposition(|item| matches!(item, Item::Setting(_)));

    let mut out = String::from("{\n");
    for (index, item) in items.iter().enumerate() {
        match item {
            Item::Section(title) => {
                if index > 0 {
                    out.push('\n');
                }
                out.push_str(&format!("{INDENT}// {title}\n"));
            }
            Item::Setting(setting) => {
                out.push('\n');
                if let Some(description) = &setting.description {
                    for line in description.lines() {
                        out.push_str(&format!("{INDENT}// {line}\n"));
                    }
                }
                let comma = if Some(index) == last_setting { "" } else { "," };
                out.push_str(&format!(
                    "{INDENT}{}: {}{comma}\n",
                    Value::from(setting.key.as_str()),
                    indent_value(&setting.default)
                ));
            }
        }
    }
    out.push_str("}\n");
    out
}

fn indent_value(value: &Value) -> String {
    format!("{value:#}").replace('\n', &format!("\n{INDENT}"))
}

fn section_title(section: &str) -> String {
    let mut chars = section.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
