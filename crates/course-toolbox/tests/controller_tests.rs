//! Bounded and cyclic controllers, delete and duplicate.

mod common;

use common::{Harness, settle};
use course_toolbox::controllers::IndentDirection;
use course_toolbox::model::Visibility;
use course_toolbox::prelude::*;

fn with_indent(value: u8) -> CourseDocument {
    let level = IndentLevel::new(value).unwrap();
    let mut moveleft = ActionLink::new("moveleft");
    moveleft.hidden = level == IndentLevel::MIN;
    let mut moveright = ActionLink::new("moveright");
    moveright.hidden = level == IndentLevel::MAX;
    CourseDocument::new().with_section(
        SectionView::new(1).with_activity(
            ActivityView::new(5, "page")
                .with_name("Page")
                .with_indent(level)
                .with_link(moveleft)
                .with_link(moveright),
        ),
    )
}

// ============================================================================
// Indent
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_indent_increase_for_every_level_below_max() {
    for v in 0..16u8 {
        let h = Harness::with(with_indent(v), common::config());
        let task = h.toolbox.indent().apply(&ItemId::from(5), IndentDirection::Increase);
        assert!(task.unwrap().await.is_success());

        let activity = h.activity(5);
        assert_eq!(activity.indent.get(), v + 1);
        assert_eq!(activity.huge_indent, v + 1 > 15);
        let form = h.endpoint.last_request().unwrap();
        assert_eq!(form.get("field"), Some("indent"));
        assert_eq!(form.get("value"), Some((v + 1).to_string().as_str()));
        assert_eq!(form.get("id"), Some("5"));
    }
}

#[tokio::test(start_paused = true)]
async fn test_indent_decrease_for_every_level_above_min() {
    for v in 1..=16u8 {
        let h = Harness::with(with_indent(v), common::config());
        h.toolbox
            .indent()
            .apply(&ItemId::from(5), IndentDirection::Decrease)
            .unwrap()
            .await;
        assert_eq!(h.activity(5).indent.get(), v - 1);
        assert_eq!(h.last_value().as_deref(), Some((v - 1).to_string().as_str()));
    }
}

#[tokio::test(start_paused = true)]
async fn test_indent_bounds_are_noops() {
    let h = Harness::with(with_indent(16), common::config());
    assert!(h.toolbox.indent().apply(&ItemId::from(5), IndentDirection::Increase).is_none());
    assert_eq!(h.activity(5).indent.get(), 16);

    let h2 = Harness::with(with_indent(0), common::config());
    assert!(h2.toolbox.indent().apply(&ItemId::from(5), IndentDirection::Decrease).is_none());
    assert_eq!(h2.activity(5).indent.get(), 0);

    assert_eq!(h.endpoint.request_count() + h2.endpoint.request_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_indent_affordances_follow_bounds() {
    let h = Harness::with(with_indent(0), common::config());
    let item = ItemId::from(5);

    h.toolbox.indent().apply(&item, IndentDirection::Increase);
    assert!(!h.activity(5).link("moveleft").unwrap().hidden, "decrease offered once above 0");

    h.toolbox.indent().apply(&item, IndentDirection::Decrease);
    assert!(h.activity(5).link("moveleft").unwrap().hidden, "decrease hidden again at 0");

    let h = Harness::with(with_indent(15), common::config());
    h.toolbox.indent().apply(&item, IndentDirection::Increase);
    assert!(h.activity(5).link("moveright").unwrap().hidden);
    h.toolbox.indent().apply(&item, IndentDirection::Decrease);
    assert!(!h.activity(5).link("moveright").unwrap().hidden);
    settle().await;
}

// ============================================================================
// Visibility
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_hide_dims_and_swaps_affordance() {
    let h = Harness::new();
    let task = h.click_activity(10, "hide").into_task().unwrap();

    let news = h.activity(10);
    assert!(news.dimmed);
    assert!(news.description_dimmed);
    assert_eq!(news.visibility(), Visibility::Hidden);
    let link = news.link("show").expect("link now offers show");
    assert_eq!(link.title, "[show,moodle]");
    assert_eq!(link.icon.alt, "[show,moodle]");
    assert_eq!(link.icon.src, "/theme/image/moodle/t/show");

    task.await;
    let form = h.endpoint.last_request().unwrap();
    assert_eq!(form.get("class"), Some("resource"));
    assert_eq!(form.get("field"), Some("visible"));
    assert_eq!(form.get("value"), Some("0"));

    let task = h.click_activity(10, "show").into_task().unwrap();
    task.await;
    assert!(!h.activity(10).dimmed);
    assert!(h.activity(10).link("hide").is_some());
    assert_eq!(h.last_value().as_deref(), Some("1"));
}

#[tokio::test(start_paused = true)]
async fn test_label_text_updates_with_affordance() {
    let h = Harness::new();
    h.click_activity(11, "hide");
    let label = h.activity(11);
    assert_eq!(label.dim_style(), "dimmed_text");
    assert_eq!(label.link("show").unwrap().label.as_deref(), Some("[show,moodle]"));
    settle().await;
}

#[tokio::test(start_paused = true)]
async fn test_conditionally_hidden_keeps_dim_but_swaps_affordance() {
    let mut doc = common::course();
    let news = doc.sections_mut()[0].activities.first_mut().unwrap();
    news.conditionally_hidden = true;
    news.availability_info_hidden = Some(true);
    let h = Harness::with(doc, common::config());

    h.click_activity(10, "hide").into_task().unwrap().await;

    let news = h.activity(10);
    assert!(!news.dimmed);
    assert_eq!(news.visibility(), Visibility::ConditionallyHidden);
    assert!(news.link("show").is_some());
    assert_eq!(news.availability_info_hidden, Some(false));
    assert_eq!(h.endpoint.request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_visibility_refused_in_hidden_section() {
    let h = Harness::new();
    let result = h.click_activity(30, "show");
    assert!(result.was_handled());
    assert!(result.into_task().is_none());
    assert!(h.activity(30).dimmed);
    assert_eq!(h.endpoint.request_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_set_visibility_ui_through_module_registry() {
    let h = Harness::new();
    assert_eq!(h.services.registry.module_names(), ["course-resource-toolbox"]);

    let handled = h.services.registry.invoke_function(
        "set_visibility_resource_ui",
        &serde_json::json!({"id": 20, "visible": false}),
    );
    assert_eq!(handled, 1);
    assert!(h.activity(20).dimmed);

    // Already hidden: nothing changes.
    assert!(!h.toolbox.set_visibility_ui(&ItemId::from(20), false));
    assert!(h.toolbox.set_visibility_ui(&ItemId::from(20), true));
    assert!(!h.activity(20).dimmed);
    assert!(!h.toolbox.set_visibility_ui(&ItemId::from(999), true));
    assert_eq!(h.endpoint.request_count(), 0);
}

// ============================================================================
// Group mode
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_group_mode_sends_current_and_advances() {
    let h = Harness::new();

    h.click_activity(10, "groupsnone").into_task().unwrap().await;
    assert_eq!(h.last_value().as_deref(), Some("1"));
    let link = h.activity(10).link("groupsseparate").cloned().unwrap();
    assert_eq!(link.next_group_mode, Some(GroupMode::Visible));
    assert_eq!(link.title, "[clicktochangeinbrackets,moodle: [groupsseparate,moodle]]");
    assert_eq!(link.icon.src, "/theme/image/moodle/i/groups");

    h.click_activity(10, "groupsseparate").into_task().unwrap().await;
    assert_eq!(h.last_value().as_deref(), Some("2"));
    h.click_activity(10, "groupsvisible").into_task().unwrap().await;
    assert_eq!(h.last_value().as_deref(), Some("0"));

    // Three applications bring the link back to where it started.
    let link = h.activity(10).link("groupsnone").cloned().unwrap();
    assert_eq!(link.next_group_mode, Some(GroupMode::Separate));
    assert_eq!(h.endpoint.requests()[0].get("field"), Some("groupmode"));
}

#[tokio::test(start_paused = true)]
async fn test_group_mode_falls_back_to_raw_id() {
    let document = CourseDocument::new().with_section(
        SectionView::new(1).with_activity(
            ActivityView::new(5, "forum")
                .with_name("Forum")
                .with_link(ActionLink::new("groupsvisible")),
        ),
    );
    let h = Harness::with(document, common::config());

    h.click_activity(5, "groupsvisible").into_task().unwrap().await;

    assert_eq!(h.last_value().as_deref(), Some("0"));
    let link = h.activity(5).link("groupsnone").cloned().unwrap();
    assert_eq!(link.next_group_mode, Some(GroupMode::Separate));
    assert_eq!(link.icon.src, "/theme/image/moodle/i/groupn");
}

#[tokio::test(start_paused = true)]
async fn test_group_mode_without_link_is_noop() {
    let h = Harness::new();
    assert!(h.toolbox.group_mode().apply(&ItemId::from(12), "groupsnone").is_none());
    assert_eq!(h.endpoint.request_count(), 0);
}

// ============================================================================
// Highlight
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_highlight_moves_marker() {
    let h = Harness::new();

    h.click_section(1, "highlight").into_task().unwrap().await;
    h.click_section(2, "highlight").into_task().unwrap().await;

    let current: Vec<_> = h
        .toolbox
        .document()
        .read(|doc| doc.sections().iter().filter(|s| s.current).map(|s| s.id.to_string()).collect());
    assert_eq!(current, ["2"]);
    assert_eq!(h.section(2).link("highlight").unwrap().title, "[markedthistopic,moodle]");
    assert_eq!(h.section(1).link("highlight").unwrap().title, "[markthistopic,moodle]");
    assert_eq!(h.section(1).link("highlight").unwrap().icon.src, "/theme/image/moodle/i/marker");

    let form = h.endpoint.last_request().unwrap();
    assert_eq!(form.get("class"), Some("course"));
    assert_eq!(form.get("field"), Some("marker"));
    assert_eq!(form.get("value"), Some("2"));
    assert_eq!(form.get("id"), None);
    assert_eq!(form.get("courseId"), Some("42"));
}

#[tokio::test(start_paused = true)]
async fn test_highlight_current_section_clears_all() {
    let h = Harness::new();
    h.click_section(2, "highlight").into_task().unwrap().await;
    h.click_section(2, "highlight").into_task().unwrap().await;

    assert!(h.toolbox.document().read(|doc| doc.sections().iter().all(|s| !s.current)));
    assert_eq!(h.last_value().as_deref(), Some("0"));
}

#[tokio::test(start_paused = true)]
async fn test_highlight_overlay_is_section_scoped() {
    let h = Harness::new();
    let task = h.click_section(1, "highlight").into_task().unwrap();
    assert!(h.section(1).is_busy());
    assert!(!h.section(2).is_busy());
    task.await;
    settle().await;
    assert!(!h.section(1).is_busy());
}

// ============================================================================
// Section visibility
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_section_hide_toggles_listed_items_only() {
    let h = Harness::new();
    h.endpoint
        .reply_json(serde_json::json!({"resourcestotoggle": ["20", 47]}));

    let task = h.click_section(2, "showhide").into_task().unwrap();
    let section = h.section(2);
    assert!(section.hidden);
    let link = section.link("showhide").unwrap();
    assert_eq!(link.title, "[showfromothers,format_topics]");
    assert_eq!(link.icon.src, "/theme/image/moodle/i/show");

    task.await;
    assert!(h.activity(20).dimmed);
    assert!(h.activity(47).dimmed);
    assert!(!h.activity(48).dimmed);
    assert!(h.activity(47).link("show").is_some());
    assert!(!h.activity(10).dimmed);

    let form = h.endpoint.last_request().unwrap();
    assert_eq!(form.get("class"), Some("section"));
    assert_eq!(form.get("value"), Some("0"));
    assert_eq!(form.get("id"), Some("2"));
}

#[tokio::test(start_paused = true)]
async fn test_section_show_uses_format_strings() {
    let config = ToolboxConfig::builder("https://school.example", 42, "tok")
        .format("weeks")
        .build()
        .unwrap();
    let h = Harness::with(common::course(), config);
    h.endpoint.reply_json(serde_json::json!({"resourcestotoggle": [30]}));

    h.click_section(3, "showhide").into_task().unwrap().await;

    assert!(!h.section(3).hidden);
    assert_eq!(h.section(3).link("showhide").unwrap().title, "[hidefromothers,format_weeks]");
    assert!(!h.activity(30).dimmed);
    assert_eq!(h.last_value().as_deref(), Some("1"));
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_delete_confirmed_removes_then_sends() {
    let h = Harness::new();
    h.endpoint.reply_json(serde_json::json!({"error": "boom"}));

    let task = h.click_activity(10, "delete").into_task().unwrap();
    assert!(!h.has_activity(10), "removed before the reply");
    assert_eq!(
        h.services.confirm.asked(),
        ["[deletechecktypename,moodle: type=[pluginname,forum], name=News]"]
    );

    assert!(!task.await.is_success());
    assert!(!h.has_activity(10), "no rollback on failure");
    assert_eq!(h.services.failures.count(), 1);
    assert_eq!(h.services.menu.hide_count(), 1);

    let form = h.endpoint.last_request().unwrap();
    assert_eq!(form.get("action"), Some("DELETE"));
    assert_eq!(form.get("id"), Some("10"));
}

#[tokio::test(start_paused = true)]
async fn test_delete_declined_does_nothing() {
    let h = Harness::new();
    h.services.confirm.set_answer(false);

    assert!(h.click_activity(11, "delete").into_task().is_none());
    assert!(h.has_activity(11));
    assert_eq!(h.services.confirm.asked(), ["[deletechecktype,moodle: type=[pluginname,label]]"]);
    assert_eq!(h.endpoint.request_count(), 0);
}

// ============================================================================
// Duplicate
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_duplicate_inserts_after_source() {
    let h = Harness::new();
    let copy = serde_json::json!({"id": 13, "module_type": "forum", "name": "News (copy)"});
    h.endpoint
        .reply_json(serde_json::json!({"cmid": 13, "fullcontent": copy.to_string()}));
    let inserted = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = inserted.clone();
    h.toolbox.item_inserted().connect(move |id: &ItemId| sink.lock().push(id.clone()));

    let task = h.click_activity(10, "duplicate").into_task().unwrap();
    assert!(h.section(1).is_busy());
    assert!(!h.activity(10).is_busy());
    task.await;

    let order: Vec<_> = h.section(1).activities.iter().map(|a| a.id.to_string()).collect();
    assert_eq!(order, ["10", "13", "11", "12"]);
    assert_eq!(h.activity(13).name.as_deref(), Some("News (copy)"));
    assert_eq!(*inserted.lock(), [ItemId::from(13)]);
    assert_eq!(h.services.menu.added(), [ItemId::from(13)]);

    let form = h.endpoint.last_request().unwrap();
    assert_eq!(form.get("field"), Some("duplicate"));
    assert_eq!(form.get("sr"), Some("1"));

    settle().await;
    assert!(!h.section(1).is_busy());
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_without_content_changes_nothing() {
    let h = Harness::new();
    h.click_activity(10, "duplicate").into_task().unwrap().await;
    assert_eq!(h.section(1).activities.len(), 3);
    assert!(h.services.menu.added().is_empty());
}
