//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use course_toolbox::prelude::*;
use course_toolbox::testing::{ScriptedEndpoint, TestServices};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn config() -> ToolboxConfig {
    ToolboxConfig::builder("https://school.example", 42, "sesskey-123")
        .build()
        .expect("valid config")
}

fn link(action: &str) -> ActionLink {
    ActionLink::new(action)
}

/// Three sections:
///
/// - 1: News (forum, indent 0), an unnamed label, Quiz (indent 16)
/// - 2: Page, Reading, Extra
/// - 3 (hidden): Secret (hidden)
pub fn course() -> CourseDocument {
    let mut group_link = link("groupsnone");
    group_link.next_group_mode = Some(GroupMode::Separate);
    let mut duplicate_link = link("duplicate");
    duplicate_link.return_section = Some("1".to_string());
    let mut moveleft = link("moveleft");
    moveleft.hidden = true;
    let mut quiz_moveright = link("moveright");
    quiz_moveright.hidden = true;
    let mut labelled_hide = link("hide");
    labelled_hide.label = Some("Hide".to_string());

    let news = ActivityView::new(10, "forum")
        .with_name("News")
        .with_link(link("edittitle"))
        .with_link(moveleft)
        .with_link(link("moveright"))
        .with_link(link("hide"))
        .with_link(group_link)
        .with_link(duplicate_link)
        .with_link(link("delete"));
    let label = ActivityView::new(11, "label")
        .with_link(labelled_hide)
        .with_link(link("delete"));
    let quiz = ActivityView::new(12, "quiz")
        .with_name("Quiz")
        .with_indent(IndentLevel::MAX)
        .with_link(link("edittitle"))
        .with_link(link("moveleft"))
        .with_link(quiz_moveright)
        .with_link(link("hide"));

    let mut secret = ActivityView::new(30, "page")
        .with_name("Secret")
        .with_link(link("show"));
    secret.dimmed = true;
    secret.description_dimmed = true;

    let mut hidden_section = SectionView::new(3)
        .with_link(link("highlight"))
        .with_link(link("showhide"))
        .with_activity(secret);
    hidden_section.hidden = true;

    CourseDocument::new()
        .with_section(
            SectionView::new(1)
                .with_link(link("highlight"))
                .with_link(link("showhide"))
                .with_activity(news)
                .with_activity(label)
                .with_activity(quiz),
        )
        .with_section(
            SectionView::new(2)
                .with_link(link("highlight"))
                .with_link(link("showhide"))
                .with_activity(ActivityView::new(20, "page").with_name("Page").with_link(link("hide")))
                .with_activity(ActivityView::new(47, "url").with_name("Reading").with_link(link("hide")))
                .with_activity(ActivityView::new(48, "url").with_name("Extra").with_link(link("hide"))),
        )
        .with_section(hidden_section)
}

pub struct Harness {
    pub toolbox: CourseToolbox,
    pub endpoint: Arc<ScriptedEndpoint>,
    pub services: TestServices,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(course(), config())
    }

    pub fn with(document: CourseDocument, config: ToolboxConfig) -> Self {
        init_tracing();
        let endpoint = ScriptedEndpoint::new();
        let services = TestServices::new();
        let toolbox = CourseToolbox::new(
            config,
            DocumentHandle::new(document),
            endpoint.clone(),
            services.services(),
        )
        .expect("toolbox");
        Self {
            toolbox,
            endpoint,
            services,
        }
    }

    pub fn activity(&self, id: i32) -> ActivityView {
        self.toolbox
            .document()
            .read(|doc| doc.activity(&ItemId::from(id)).cloned())
            .expect("activity exists")
    }

    pub fn has_activity(&self, id: i32) -> bool {
        self.toolbox
            .document()
            .read(|doc| doc.activity(&ItemId::from(id)).is_some())
    }

    pub fn section(&self, id: i32) -> SectionView {
        self.toolbox
            .document()
            .read(|doc| doc.section(&SectionId::from(id)).cloned())
            .expect("section exists")
    }

    pub fn click_activity(&self, id: i32, action: &str) -> DispatchResult {
        self.toolbox
            .handle_click(&mut ClickEvent::on_activity_link(id, action))
    }

    pub fn click_section(&self, id: i32, action: &str) -> DispatchResult {
        self.toolbox
            .handle_click(&mut ClickEvent::on_section_link(id, action))
    }

    /// Sent value of the last request.
    pub fn last_value(&self) -> Option<String> {
        self.endpoint
            .last_request()
            .and_then(|form| form.get("value").map(str::to_string))
    }
}

/// Let every spawned task and timer run (time is paused in these tests).
pub async fn settle() {
    tokio::time::sleep(Duration::from_secs(5)).await;
}
