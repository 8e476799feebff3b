//! In-memory collaborators for tests and headless demos.
//!
//! [`ScriptedEndpoint`] records every form it is given and answers from a
//! queue of canned replies. The remaining types are deterministic stand-ins
//! for the page's string, icon, prompt, menu and error-surface services.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use course_toolbox_net::NetworkError;
use futures_util::future::BoxFuture;
use parking_lot::Mutex;

use crate::collaborators::{
    ActionMenu, ConfirmPrompt, FailureReporter, IconResolver, JsonItemLayout, ModuleRegistry,
    Services, StringArgs, StringLookup,
};
use crate::error::MutationFailure;
use crate::model::ItemId;
use crate::transport::{MutationEndpoint, RequestOptions};

/// A canned endpoint reply.
#[derive(Clone, Debug)]
pub enum ScriptedReply {
    Body(String),
    Failure(NetworkError),
}

/// One form received by a [`ScriptedEndpoint`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedForm {
    pub fields: Vec<(String, String)>,
    pub options: RequestOptions,
}

impl RecordedForm {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> Vec<&str> {
        self.fields.iter().map(|(k, _)| k.as_str()).collect()
    }
}

/// Endpoint that answers from a script. Unscripted requests get `{}`.
#[derive(Default)]
pub struct ScriptedEndpoint {
    received: Mutex<Vec<RecordedForm>>,
    replies: Mutex<VecDeque<ScriptedReply>>,
    latency: Mutex<Duration>,
}

impl ScriptedEndpoint {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a JSON reply.
    pub fn reply_json(&self, value: serde_json::Value) {
        self.reply_body(value.to_string());
    }

    /// Queue a raw body.
    pub fn reply_body(&self, body: impl Into<String>) {
        self.replies.lock().push_back(ScriptedReply::Body(body.into()));
    }

    /// Queue a network failure.
    pub fn fail(&self, error: NetworkError) {
        self.replies.lock().push_back(ScriptedReply::Failure(error));
    }

    /// Delay every reply by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = latency;
    }

    pub fn requests(&self) -> Vec<RecordedForm> {
        self.received.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.received.lock().len()
    }

    pub fn last_request(&self) -> Option<RecordedForm> {
        self.received.lock().last().cloned()
    }
}

impl MutationEndpoint for ScriptedEndpoint {
    fn post_form(
        &self,
        form: Vec<(String, String)>,
        options: RequestOptions,
    ) -> BoxFuture<'static, Result<String, NetworkError>> {
        self.received.lock().push(RecordedForm {
            fields: form,
            options,
        });
        let reply = self
            .replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| ScriptedReply::Body("{}".to_string()));
        let latency = *self.latency.lock();

        Box::pin(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            match reply {
                ScriptedReply::Body(body) => Ok(body),
                ScriptedReply::Failure(error) => Err(error),
            }
        })
    }
}

/// Renders strings as `[key,component]`, with arguments after a colon.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyedStrings;

impl StringLookup for KeyedStrings {
    fn get_string(&self, key: &str, component: &str, args: &StringArgs) -> String {
        match args {
            StringArgs::None => format!("[{key},{component}]"),
            StringArgs::Text(a) => format!("[{key},{component}: {a}]"),
            StringArgs::Fields(fields) => {
                let rendered: Vec<String> = fields.iter().map(|(k, v)| format!("{k}={v}")).collect();
                format!("[{key},{component}: {}]", rendered.join(", "))
            }
        }
    }
}

/// Resolves icons to `/theme/image/<component>/<key>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathIcons;

impl IconResolver for PathIcons {
    fn image_url(&self, key: &str, component: &str) -> String {
        format!("/theme/image/{component}/{key}")
    }
}

/// Answers every prompt the same way and remembers the questions.
#[derive(Debug)]
pub struct ScriptedConfirm {
    answer: AtomicBool,
    asked: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn new(answer: bool) -> Self {
        Self {
            answer: AtomicBool::new(answer),
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn set_answer(&self, answer: bool) {
        self.answer.store(answer, Ordering::SeqCst);
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().clone()
    }
}

impl ConfirmPrompt for ScriptedConfirm {
    fn confirm(&self, message: &str) -> bool {
        self.asked.lock().push(message.to_string());
        self.answer.load(Ordering::SeqCst)
    }
}

/// Collects reported failures.
#[derive(Debug, Default)]
pub struct RecordingFailures {
    reported: Mutex<Vec<MutationFailure>>,
}

impl RecordingFailures {
    pub fn reported(&self) -> Vec<MutationFailure> {
        self.reported.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.reported.lock().len()
    }
}

impl FailureReporter for RecordingFailures {
    fn report(&self, failure: &MutationFailure) {
        self.reported.lock().push(failure.clone());
    }
}

/// Counts menu dismissals and remembers added items.
#[derive(Debug, Default)]
pub struct RecordingMenu {
    hidden: AtomicUsize,
    added: Mutex<Vec<ItemId>>,
}

impl RecordingMenu {
    pub fn hide_count(&self) -> usize {
        self.hidden.load(Ordering::SeqCst)
    }

    pub fn added(&self) -> Vec<ItemId> {
        self.added.lock().clone()
    }
}

impl ActionMenu for RecordingMenu {
    fn hide_menu(&self) {
        self.hidden.fetch_add(1, Ordering::SeqCst);
    }

    fn item_added(&self, item: &ItemId) {
        self.added.lock().push(item.clone());
    }
}

/// A full set of in-memory services, with typed handles kept for inspection.
#[derive(Clone)]
pub struct TestServices {
    pub confirm: Arc<ScriptedConfirm>,
    pub failures: Arc<RecordingFailures>,
    pub menu: Arc<RecordingMenu>,
    pub registry: Arc<ModuleRegistry>,
}

impl TestServices {
    /// Services whose confirmation prompt always answers yes.
    pub fn new() -> Self {
        Self {
            confirm: Arc::new(ScriptedConfirm::new(true)),
            failures: Arc::new(RecordingFailures::default()),
            menu: Arc::new(RecordingMenu::default()),
            registry: Arc::new(ModuleRegistry::new()),
        }
    }

    pub fn services(&self) -> Services {
        Services {
            strings: Arc::new(KeyedStrings),
            icons: Arc::new(PathIcons),
            confirm: self.confirm.clone(),
            failures: self.failures.clone(),
            action_menu: self.menu.clone(),
            layout: Arc::new(JsonItemLayout),
            modules: self.registry.clone(),
        }
    }
}

impl Default for TestServices {
    fn default() -> Self {
        Self::new()
    }
}
