//! Outbound mutation descriptors.

use std::fmt;
use std::time::Duration;

/// Kind of object a mutation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetClass {
    Resource,
    Section,
    Course,
}

impl TargetClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Resource => "resource",
            Self::Section => "section",
            Self::Course => "course",
        }
    }
}

impl fmt::Display for TargetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One state change to send to the server.
///
/// Callers describe only the change itself. The session token, course id and
/// page parameters are added by the transport.
///
/// ```
/// use course_toolbox::transport::{MutationRequest, TargetClass};
///
/// let request = MutationRequest::resource()
///     .field("indent")
///     .value(3)
///     .id("12");
/// assert_eq!(request.class(), TargetClass::Resource);
/// assert_eq!(request.value_str(), Some("3"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutationRequest {
    class: TargetClass,
    field: Option<String>,
    value: Option<String>,
    id: Option<String>,
    action: Option<String>,
    params: Vec<(String, String)>,
}

impl MutationRequest {
    pub fn new(class: TargetClass) -> Self {
        Self {
            class,
            field: None,
            value: None,
            id: None,
            action: None,
            params: Vec::new(),
        }
    }

    pub fn resource() -> Self {
        Self::new(TargetClass::Resource)
    }

    pub fn section() -> Self {
        Self::new(TargetClass::Section)
    }

    pub fn course() -> Self {
        Self::new(TargetClass::Course)
    }

    /// Name of the attribute being changed.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn value(mut self, value: impl fmt::Display) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn id(mut self, id: impl fmt::Display) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Mark this as a delete request.
    pub fn delete(mut self) -> Self {
        self.action = Some("DELETE".to_string());
        self
    }

    /// Add a caller-specific parameter such as `title` or `sr`.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn class(&self) -> TargetClass {
        self.class
    }

    pub fn field_name(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn value_str(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn target_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Flatten into form fields.
    ///
    /// Caller keys come first, page parameters are merged over them, and the
    /// session token and course id are merged last.
    pub fn into_form(self, session: &SessionContext) -> Vec<(String, String)> {
        let mut form = FormFields::default();
        form.set("class", self.class.as_str());
        let standard = [
            ("field", self.field),
            ("value", self.value),
            ("id", self.id),
            ("action", self.action),
        ];
        for (key, value) in standard {
            if let Some(value) = value {
                form.set(key, value);
            }
        }
        for (key, value) in self.params {
            form.set(key, value);
        }
        for (key, value) in &session.page_params {
            form.set(key.as_str(), value.as_str());
        }
        form.set("sesskey", session.session_key.as_str());
        form.set("courseId", session.course_id.as_str());
        form.0
    }
}

/// Ordered form fields where a later `set` replaces the value in place.
#[derive(Default)]
struct FormFields(Vec<(String, String)>);

impl FormFields {
    fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }
}

/// Values the transport injects into every request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub session_key: String,
    pub course_id: String,
    pub page_params: Vec<(String, String)>,
}

/// Per-request overrides of the endpoint's defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub timeout: Option<Duration>,
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}
