//! Capabilities the engine borrows from the page.
//!
//! String lookup, icon resolution, confirmation prompts, the module directory,
//! item layout, the action menu and failure notification all live outside the
//! engine. Each is a trait so a host (or a test) can supply its own.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::MutationFailure;
use crate::model::{ActivityView, ItemId};
use crate::targets;

/// Substitution arguments for a localized string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StringArgs {
    #[default]
    None,
    /// A single `{$a}` value.
    Text(String),
    /// Named `{$a->name}` values.
    Fields(Vec<(String, String)>),
}

impl StringArgs {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn fields<K: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Self::Fields(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Localized string lookup.
pub trait StringLookup: Send + Sync {
    fn get_string(&self, key: &str, component: &str, args: &StringArgs) -> String;
}

/// Resolves an icon key such as `t/hide` to an image URL.
pub trait IconResolver: Send + Sync {
    fn image_url(&self, key: &str, component: &str) -> String;
}

/// Asks the user a yes/no question.
pub trait ConfirmPrompt: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

/// The user-facing error surface.
pub trait FailureReporter: Send + Sync {
    fn report(&self, failure: &MutationFailure);
}

/// The per-item action menu.
pub trait ActionMenu: Send + Sync {
    /// Close any open menu.
    fn hide_menu(&self);
    /// A new item view exists and needs its menu wired up.
    fn item_added(&self, item: &ItemId);
}

/// Turns server-rendered item content into a view.
pub trait ItemLayout: Send + Sync {
    fn parse_activity(&self, fullcontent: &str) -> Option<ActivityView>;
}

/// Layout whose rendered content is a JSON-encoded [`ActivityView`].
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonItemLayout;

impl ItemLayout for JsonItemLayout {
    fn parse_activity(&self, fullcontent: &str) -> Option<ActivityView> {
        match serde_json::from_str(fullcontent) {
            Ok(view) => Some(view),
            Err(e) => {
                tracing::warn!(target: targets::CONTROLLER, error = %e, "unreadable item content");
                None
            }
        }
    }
}

/// A page module that exposes named functions to its siblings.
pub trait CourseModule: Send + Sync {
    fn name(&self) -> &str;

    /// Run `function` if this module provides it. Returns whether it did.
    fn invoke_function(&self, function: &str, args: &Value) -> bool;
}

/// Where page modules register so siblings can call shared behavior.
pub trait ModuleDirectory: Send + Sync {
    fn register_module(&self, module: Arc<dyn CourseModule>);

    /// Call `function` on every module that provides it. Returns how many did.
    fn invoke_function(&self, function: &str, args: &Value) -> usize;
}

/// In-process [`ModuleDirectory`].
#[derive(Default)]
pub struct ModuleRegistry {
    modules: Mutex<Vec<Arc<dyn CourseModule>>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn module_names(&self) -> Vec<String> {
        self.modules.lock().iter().map(|m| m.name().to_string()).collect()
    }
}

impl ModuleDirectory for ModuleRegistry {
    fn register_module(&self, module: Arc<dyn CourseModule>) {
        tracing::debug!(target: targets::CONTROLLER, module = module.name(), "module registered");
        self.modules.lock().push(module);
    }

    fn invoke_function(&self, function: &str, args: &Value) -> usize {
        // Modules may call back into the registry.
        let modules: Vec<_> = self.modules.lock().clone();
        modules
            .iter()
            .filter(|module| module.invoke_function(function, args))
            .count()
    }
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("modules", &self.module_names())
            .finish()
    }
}

/// Every collaborator the controllers need.
#[derive(Clone)]
pub struct Services {
    pub strings: Arc<dyn StringLookup>,
    pub icons: Arc<dyn IconResolver>,
    pub confirm: Arc<dyn ConfirmPrompt>,
    pub failures: Arc<dyn FailureReporter>,
    pub action_menu: Arc<dyn ActionMenu>,
    pub layout: Arc<dyn ItemLayout>,
    pub modules: Arc<dyn ModuleDirectory>,
}

impl Services {
    /// Shorthand for a string with no arguments.
    pub(crate) fn string(&self, key: &str, component: &str) -> String {
        self.strings.get_string(key, component, &StringArgs::None)
    }
}
