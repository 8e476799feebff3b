//! Action dispatch.
//!
//! One [`ActionDispatcher`] serves a whole page. For each click it resolves
//! three things:
//!
//! 1. the interactive link that was clicked (the target itself or its
//!    nearest link ancestor),
//! 2. the link's raw action id,
//! 3. the item the link belongs to (the nearest activity or section beyond
//!    the link).
//!
//! If any of them is missing the event is ignored. Otherwise the action id is
//! looked up in an immutable routing table built once with
//! [`DispatcherBuilder`]. Ids with no route are a silent no-op, so the page can
//! render actions the engine does not handle yet.

mod event;

pub use event::{ClickEvent, EventNode};

use std::collections::HashMap;
use std::sync::Arc;

use course_toolbox_core::PerfSpan;
use course_toolbox_core::logging::span_names;

use crate::model::{Action, ItemRef};
use crate::targets;
use crate::transport::MutationTask;

/// A resolved request to perform an action on an item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionInvocation {
    pub action: Action,
    /// The link's raw action id (e.g. `groupsseparate`).
    pub action_id: String,
    pub item: ItemRef,
}

/// Something that performs actions.
pub trait ActionHandler: Send + Sync {
    /// Perform the action. Returns the mutation it sent, if any.
    fn handle(&self, invocation: &ActionInvocation) -> Option<MutationTask>;
}

/// Result of dispatching a click.
#[derive(Debug)]
pub enum DispatchResult {
    /// A handler ran. Carries the mutation it sent, if any.
    Handled(Option<MutationTask>),
    /// Link, action id or owning item could not be resolved.
    Ignored,
    /// The action id has no route.
    Unrouted(String),
}

impl DispatchResult {
    pub fn was_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }

    /// The mutation sent by the handler, if any.
    pub fn into_task(self) -> Option<MutationTask> {
        match self {
            Self::Handled(task) => task,
            _ => None,
        }
    }
}

/// Builds the routing table of an [`ActionDispatcher`].
#[derive(Default)]
pub struct DispatcherBuilder {
    routes: HashMap<Action, Arc<dyn ActionHandler>>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `action` to `handler`, replacing any earlier route.
    pub fn route(mut self, action: Action, handler: Arc<dyn ActionHandler>) -> Self {
        self.routes.insert(action, handler);
        self
    }

    /// Route several actions to the same handler.
    pub fn route_all(mut self, actions: &[Action], handler: Arc<dyn ActionHandler>) -> Self {
        for action in actions {
            self.routes.insert(*action, handler.clone());
        }
        self
    }

    pub fn build(self) -> ActionDispatcher {
        ActionDispatcher {
            routes: self.routes,
        }
    }
}

/// Routes clicks to action handlers.
pub struct ActionDispatcher {
    routes: HashMap<Action, Arc<dyn ActionHandler>>,
}

impl ActionDispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    pub fn has_route(&self, action: Action) -> bool {
        self.routes.contains_key(&action)
    }

    /// Resolve a click without running anything.
    ///
    /// Returns the raw action id and owning item, or `None` if either (or the
    /// link itself) is missing.
    pub fn resolve(event: &ClickEvent) -> Option<(String, ItemRef)> {
        let link_pos = event
            .path
            .iter()
            .position(|node| matches!(node, EventNode::Link { .. }))?;
        let action = match &event.path[link_pos] {
            EventNode::Link { action: Some(id) } if !id.is_empty() => id.clone(),
            _ => return None,
        };
        let item = event.path[link_pos + 1..].iter().find_map(|node| match node {
            EventNode::Activity(id) => Some(ItemRef::Activity(id.clone())),
            EventNode::Section(id) => Some(ItemRef::Section(id.clone())),
            _ => None,
        })?;
        Some((action, item))
    }

    /// Dispatch one click.
    #[tracing::instrument(skip_all, target = "course_toolbox::dispatch", level = "trace")]
    pub fn dispatch(&self, event: &mut ClickEvent) -> DispatchResult {
        let _perf = PerfSpan::new(span_names::DISPATCH);

        let Some((action_id, item)) = Self::resolve(event) else {
            tracing::trace!(target: targets::DISPATCH, "click not on an item action, ignoring");
            return DispatchResult::Ignored;
        };

        let Some((action, handler)) = Action::from_id(&action_id)
            .and_then(|action| Some((action, self.routes.get(&action)?)))
        else {
            tracing::trace!(target: targets::DISPATCH, action = %action_id, "no route for action");
            return DispatchResult::Unrouted(action_id);
        };

        event.prevent_default();
        tracing::debug!(target: targets::DISPATCH, %action, ?item, "dispatching action");
        let invocation = ActionInvocation {
            action,
            action_id,
            item,
        };
        DispatchResult::Handled(handler.handle(&invocation))
    }
}

impl std::fmt::Debug for ActionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut routes: Vec<String> = self.routes.keys().map(ToString::to_string).collect();
        routes.sort();
        f.debug_struct("ActionDispatcher").field("routes", &routes).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemId, SectionId};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<ActionInvocation>>,
    }

    impl ActionHandler for Recorder {
        fn handle(&self, invocation: &ActionInvocation) -> Option<MutationTask> {
            self.seen.lock().push(invocation.clone());
            None
        }
    }

    fn dispatcher(recorder: &Arc<Recorder>) -> ActionDispatcher {
        ActionDispatcher::builder()
            .route_all(&Action::ALL, recorder.clone())
            .build()
    }

    #[test]
    fn test_icon_click_resolves_to_link() {
        let recorder = Arc::new(Recorder::default());
        let mut event = ClickEvent::on_activity_icon(7, "moveright");

        let result = dispatcher(&recorder).dispatch(&mut event);

        assert!(result.was_handled());
        assert!(event.is_default_prevented());
        let seen = recorder.seen.lock();
        assert_eq!(seen[0].action, Action::IndentIncrease);
        assert_eq!(seen[0].item, ItemRef::Activity(ItemId::from(7)));
    }

    #[test]
    fn test_group_variants_keep_raw_id() {
        let recorder = Arc::new(Recorder::default());
        let dispatcher = dispatcher(&recorder);
        for id in ["groupsnone", "groupsseparate", "groupsvisible"] {
            dispatcher.dispatch(&mut ClickEvent::on_activity_link(1, id));
        }
        let seen = recorder.seen.lock();
        assert!(seen.iter().all(|i| i.action == Action::SetGroupMode));
        assert_eq!(seen[2].action_id, "groupsvisible");
    }

    #[test]
    fn test_unresolvable_events_are_ignored() {
        let recorder = Arc::new(Recorder::default());
        let dispatcher = dispatcher(&recorder);

        // No link on the path.
        let mut event = ClickEvent::new(vec![EventNode::Element, EventNode::Activity(ItemId::from(1))]);
        assert!(matches!(dispatcher.dispatch(&mut event), DispatchResult::Ignored));

        // Link without an action id.
        let mut event = ClickEvent::new(vec![
            EventNode::Link { action: None },
            EventNode::Activity(ItemId::from(1)),
        ]);
        assert!(matches!(dispatcher.dispatch(&mut event), DispatchResult::Ignored));

        // Link outside any item.
        let mut event = ClickEvent::new(vec![EventNode::Link {
            action: Some("delete".to_string()),
        }]);
        assert!(matches!(dispatcher.dispatch(&mut event), DispatchResult::Ignored));

        // Item found only below the link does not count.
        let mut event = ClickEvent::new(vec![
            EventNode::Activity(ItemId::from(1)),
            EventNode::Link { action: Some("delete".to_string()) },
        ]);
        assert!(matches!(dispatcher.dispatch(&mut event), DispatchResult::Ignored));

        assert!(recorder.seen.lock().is_empty());
        assert!(!event.is_default_prevented());
    }

    #[test]
    fn test_unknown_action_is_noop() {
        let recorder = Arc::new(Recorder::default());
        let mut event = ClickEvent::on_section_link(2, "move");

        let result = dispatcher(&recorder).dispatch(&mut event);

        assert!(matches!(result, DispatchResult::Unrouted(ref id) if id == "move"));
        assert!(!event.is_default_prevented());
        assert!(recorder.seen.lock().is_empty());
    }

    #[test]
    fn test_section_link_resolves_section() {
        let (action, item) = ActionDispatcher::resolve(&ClickEvent::on_section_link(4, "highlight")).unwrap();
        assert_eq!(action, "highlight");
        assert_eq!(item, ItemRef::Section(SectionId::from(4)));
    }

    #[test]
    fn test_missing_route_is_unrouted() {
        let dispatcher = ActionDispatcher::builder().build();
        assert!(!dispatcher.has_route(Action::Delete));
        let result = dispatcher.dispatch(&mut ClickEvent::on_activity_link(1, "delete"));
        assert!(matches!(result, DispatchResult::Unrouted(_)));
    }
}
