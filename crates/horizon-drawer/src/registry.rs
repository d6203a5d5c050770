//! The drawer registry and state machine driver.
//!
//! [`Drawers`] owns every drawer bound to a host document. It keeps at most
//! one drawer per node, tracks the single active (open) drawer, and drives
//! every lifecycle transition.
//!
//! # Driving the Registry
//!
//! The registry never blocks and never spawns anything. The host owns the
//! event loop and feeds two things in:
//!
//! - input, through [`Drawers::dispatch_input`]
//! - time, through [`Drawers::advance`] (or [`Drawers::run_pending`] for
//!   zero-delay work)
//!
//! Transition completions are deferred tasks. Between a `show()` and its
//! completion the drawer keeps receiving input, but any further `show()`,
//! `hide()` or `toggle()` is ignored until the transition finishes.
//!
//! # Ordering
//!
//! Every state change is fully applied before a notification is dispatched.
//! When a drawer opens while another is active, the other drawer's `hide`
//! notification goes out and its state moves to `Hiding` (clearing the
//! active slot) before the new drawer's `show` notification. Listeners
//! therefore never observe two active drawers.
//!
//! # Example
//!
//! ```
//! use horizon_drawer::{Drawers, DrawerOptions, DrawerState};
//! use horizon_drawer_core::{Document, Element, ElementKind};
//! use std::time::Duration;
//!
//! let mut doc = Document::new();
//! let node = doc.append(doc.root(), Element::default().with_id("cart"));
//! doc.append(node, Element::new(ElementKind::Button));
//!
//! let mut drawers = Drawers::new(doc);
//! let cart = drawers.get_or_create(node, DrawerOptions::new()).unwrap();
//!
//! assert!(drawers.show(cart));
//! assert_eq!(drawers.state(cart), Some(DrawerState::Showing));
//!
//! drawers.advance(Duration::from_millis(300));
//! assert_eq!(drawers.state(cart), Some(DrawerState::Shown));
//! assert_eq!(drawers.active(), Some(cart));
//! ```

use std::collections::HashMap;
use std::time::Duration;

use horizon_drawer_core::logging::{DocumentTreeDebug, targets};
use horizon_drawer_core::{
    Dispatch, DrawerRole, ElementKind, Error, HostDocument, ListenerId, NodeId, Notifier, Result,
    Scheduler, Verdict, VisualState,
};
use slotmap::SlotMap;

use crate::config::{DrawerConfig, DrawerOptions};
use crate::drawer::{DrawerId, DrawerInstance, DrawerState};
use crate::event::{
    ChangeReason, DrawerEvent, DrawerEventKind, InputEvent, InputOutcome, Key, SubmitEvent,
};
use crate::focus::TabDirection;
use crate::gesture::{self, Release};
use crate::router::{InputChannel, InputRouter, SubscriptionId};

/// Work deferred to a later point on the registry's clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    CompleteShow(DrawerId),
    CompleteHide(DrawerId),
    Autofocus(DrawerId),
    ShowOnLoad(DrawerId),
}

/// Registry of drawers bound to a host document.
#[derive(Debug)]
pub struct Drawers<D: HostDocument> {
    document: D,
    instances: SlotMap<DrawerId, DrawerInstance>,
    by_node: HashMap<NodeId, DrawerId>,
    active: Option<DrawerId>,
    scheduler: Scheduler<Deferred>,
    router: InputRouter,
    listeners: Notifier<DrawerEvent>,
    generated: u64,
}

impl<D: HostDocument> Drawers<D> {
    /// Create an empty registry over `document`.
    pub fn new(document: D) -> Self {
        Self {
            document,
            instances: SlotMap::with_key(),
            by_node: HashMap::new(),
            active: None,
            scheduler: Scheduler::new(),
            router: InputRouter::new(),
            listeners: Notifier::new(),
            generated: 0,
        }
    }

    /// The host document.
    #[inline]
    pub fn document(&self) -> &D {
        &self.document
    }

    /// Mutable access to the host document.
    ///
    /// Structural edits are not tracked: a drawer's focusable set is only
    /// recomputed when it opens.
    #[inline]
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    /// Tear the registry down and hand the document back.
    pub fn into_document(self) -> D {
        self.document
    }

    // =========================================================================
    // Registry
    // =========================================================================

    /// Return the drawer bound to `node`, creating it if needed.
    ///
    /// If `node` already has a drawer, that drawer is returned unchanged and
    /// `options` is ignored. Otherwise the configuration is resolved as
    /// defaults ← the node's `data-*` attributes ← `options`.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if `node` does not resolve in the document, and
    /// [`Error::InvalidOption`] if one of its `data-*` attributes is
    /// malformed. Nothing is registered on error.
    pub fn get_or_create(&mut self, node: NodeId, options: DrawerOptions) -> Result<DrawerId> {
        if let Some(&id) = self.by_node.get(&node) {
            tracing::trace!(target: targets::REGISTRY, ?node, "drawer already bound, reusing");
            return Ok(id);
        }

        let Some(element) = self.document.element(node) else {
            return Err(Error::not_found(format!("{node:?}")));
        };
        let config = options.or(DrawerOptions::from_attributes(element)?).resolve();
        let element_id = element.id.clone();
        let identifier = match element_id {
            Some(id) => id,
            None => self.generate_identifier(),
        };

        let mut instance = DrawerInstance::new(node, identifier, config);
        instance.focus.refresh(&self.document, node);
        instance.form = find_form(&self.document, node);
        let id = self.instances.insert(instance);
        self.by_node.insert(node, id);

        let mut channels = vec![
            InputChannel::Pointer,
            InputChannel::Touch,
            InputChannel::Viewport,
        ];
        if config.keyboard {
            channels.push(InputChannel::Keyboard);
        }
        if config.show_on_load && !self.document.is_ready() {
            channels.push(InputChannel::Load);
        }
        let subscriptions: Vec<SubscriptionId> = channels
            .into_iter()
            .map(|channel| self.router.subscribe(id, channel))
            .collect();
        if let Some(instance) = self.instances.get_mut(id) {
            instance.subscriptions = subscriptions;
        }

        if config.show_on_load && self.document.is_ready() {
            self.schedule_show_on_load(id);
        }

        tracing::debug!(
            target: targets::REGISTRY,
            ?id,
            identifier = self.identifier(id).unwrap_or_default(),
            ?config,
            "drawer created"
        );
        tracing::trace!(
            target: targets::REGISTRY,
            "drawer subtree:\n{}",
            DocumentTreeDebug::new().format_subtree(&self.document, node)
        );
        Ok(id)
    }

    /// Like [`get_or_create`](Self::get_or_create), resolving the node by its `id` attribute.
    pub fn get_or_create_by_id(&mut self, id: &str, options: DrawerOptions) -> Result<DrawerId> {
        let node = self
            .document
            .find_by_id(id)
            .ok_or_else(|| Error::not_found(id))?;
        self.get_or_create(node, options)
    }

    /// The drawer bound to `node`, if any. Never creates one.
    pub fn get(&self, node: NodeId) -> Option<DrawerId> {
        self.by_node.get(&node).copied()
    }

    /// Find a drawer by its identifier.
    pub fn find_by_id(&self, identifier: &str) -> Option<DrawerId> {
        self.instances
            .iter()
            .find(|(_, inst)| inst.identifier == identifier)
            .map(|(id, _)| id)
    }

    /// Whether `id` still refers to a live drawer.
    pub fn contains(&self, id: DrawerId) -> bool {
        self.instances.contains_key(id)
    }

    /// The drawer instance for `id`.
    pub fn instance(&self, id: DrawerId) -> Option<&DrawerInstance> {
        self.instances.get(id)
    }

    /// Lifecycle state of a drawer.
    pub fn state(&self, id: DrawerId) -> Option<DrawerState> {
        self.instances.get(id).map(|inst| inst.state)
    }

    /// Configuration snapshot of a drawer.
    pub fn config(&self, id: DrawerId) -> Option<DrawerConfig> {
        self.instances.get(id).map(|inst| inst.config)
    }

    /// Identifier of a drawer.
    pub fn identifier(&self, id: DrawerId) -> Option<&str> {
        self.instances.get(id).map(|inst| inst.identifier.as_str())
    }

    /// Styling most recently applied to a drawer's node.
    pub fn visual(&self, id: DrawerId) -> Option<VisualState> {
        self.instances.get(id).map(|inst| inst.visual)
    }

    /// The active (open or opening) drawer.
    #[inline]
    pub fn active(&self) -> Option<DrawerId> {
        self.active
    }

    /// All live drawers.
    pub fn ids(&self) -> impl Iterator<Item = DrawerId> + '_ {
        self.instances.keys()
    }

    /// Number of live drawers.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether the registry holds no drawers.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Listen to lifecycle notifications from every drawer.
    ///
    /// Registry-wide listeners run after the drawer's own listeners.
    pub fn on<F, V>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&DrawerEvent) -> V + Send + Sync + 'static,
        V: Into<Verdict>,
    {
        self.listeners.connect(listener)
    }

    /// Remove a registry-wide listener.
    pub fn off(&mut self, listener: ListenerId) -> bool {
        self.listeners.disconnect(listener)
    }

    /// Listen to lifecycle notifications from one drawer.
    ///
    /// Returns `None` if the drawer does not exist.
    pub fn on_drawer<F, V>(&mut self, id: DrawerId, listener: F) -> Option<ListenerId>
    where
        F: Fn(&DrawerEvent) -> V + Send + Sync + 'static,
        V: Into<Verdict>,
    {
        self.instances
            .get_mut(id)
            .map(|inst| inst.connect(listener))
    }

    /// Remove a drawer's listener.
    pub fn off_drawer(&mut self, id: DrawerId, listener: ListenerId) -> bool {
        self.instances
            .get_mut(id)
            .is_some_and(|inst| inst.listeners.disconnect(listener))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Open a drawer.
    ///
    /// Returns `true` if the opening transition started. Returns `false`
    /// when the drawer is not hidden (already open, or mid-transition), when
    /// a listener cancelled the `show` notification, or when the currently
    /// active drawer could not be closed.
    pub fn show(&mut self, id: DrawerId) -> bool {
        self.show_with(id, ChangeReason::Api)
    }

    /// Close a drawer.
    ///
    /// Returns `true` if the closing transition started. Only a shown drawer
    /// can be closed; a listener may cancel the `hide` notification.
    pub fn hide(&mut self, id: DrawerId) -> bool {
        self.hide_with(id, ChangeReason::Api)
    }

    /// Close a shown drawer, or open it otherwise.
    pub fn toggle(&mut self, id: DrawerId) -> bool {
        if self.state(id) == Some(DrawerState::Shown) {
            self.hide(id)
        } else {
            self.show(id)
        }
    }

    /// Close every shown drawer through the normal cancelable protocol.
    ///
    /// Returns how many drawers started closing.
    pub fn close_all(&mut self) -> usize {
        let shown: Vec<DrawerId> = self
            .instances
            .iter()
            .filter(|(_, inst)| inst.state == DrawerState::Shown)
            .map(|(id, _)| id)
            .collect();

        shown
            .into_iter()
            .filter(|&id| self.hide_with(id, ChangeReason::CloseAll))
            .count()
    }

    /// Remove a drawer from the registry.
    ///
    /// Drops its input subscriptions and listeners, cancels any pending
    /// completion, and releases the active slot if held. No hide transition
    /// runs and the node's styling is left as is. Returns `false` if the
    /// drawer was already disposed.
    pub fn dispose(&mut self, id: DrawerId) -> bool {
        let Some(mut instance) = self.instances.remove(id) else {
            tracing::trace!(target: targets::REGISTRY, ?id, "dispose of unknown drawer ignored");
            return false;
        };

        for subscription in instance.subscriptions.drain(..) {
            self.router.unsubscribe(subscription);
        }
        for token in instance.pending.drain() {
            self.scheduler.cancel(token);
        }
        self.by_node.remove(&instance.node);
        if self.active == Some(id) {
            self.active = None;
        }

        tracing::debug!(
            target: targets::REGISTRY,
            ?id,
            identifier = instance.identifier,
            state = ?instance.state,
            "drawer disposed"
        );
        true
    }

    /// Dispose every drawer.
    pub fn clear(&mut self) {
        let ids: Vec<DrawerId> = self.instances.keys().collect();
        for id in ids {
            self.dispose(id);
        }
    }

    /// Call `callback` whenever the drawer's embedded form is submitted.
    ///
    /// The form is the first form element inside the drawer. Returns `false`
    /// (and attaches nothing) if the drawer has no form. A second call
    /// replaces the previous callback.
    pub fn handle_form_submit<F>(&mut self, id: DrawerId, callback: F) -> bool
    where
        F: FnMut(&SubmitEvent) + Send + 'static,
    {
        let Some(instance) = self.instances.get_mut(id) else {
            return false;
        };
        let Some(form) = instance
            .form
            .or_else(|| find_form(&self.document, instance.node))
        else {
            tracing::trace!(target: targets::REGISTRY, ?id, "no form to attach submit handler to");
            return false;
        };

        instance.form = Some(form);
        if instance.on_submit.is_none() {
            let subscription = self.router.subscribe(id, InputChannel::Form);
            instance.subscriptions.push(subscription);
        }
        instance.on_submit = Some(Box::new(callback));
        true
    }

    // =========================================================================
    // Time
    // =========================================================================

    /// Current time on the registry's clock.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Number of deferred tasks waiting to run.
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending_count()
    }

    /// Time until the next deferred task is due.
    pub fn time_until_next(&mut self) -> Option<Duration> {
        self.scheduler.time_until_next()
    }

    /// Advance the clock by `by`, running every deferred task that falls due.
    ///
    /// Returns the number of tasks run.
    pub fn advance(&mut self, by: Duration) -> usize {
        let deadline = self.scheduler.now() + by;
        let mut ran = 0;
        while let Some(task) = self.scheduler.pop_due(deadline) {
            self.run_deferred(task);
            ran += 1;
        }
        self.scheduler.advance_to(deadline);
        ran
    }

    /// Run deferred tasks that are already due, without moving the clock.
    pub fn run_pending(&mut self) -> usize {
        self.advance(Duration::ZERO)
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Feed an input event to every drawer subscribed to its channel.
    #[tracing::instrument(skip(self), target = "horizon_drawer::input", level = "trace")]
    pub fn dispatch_input(&mut self, event: InputEvent) -> InputOutcome {
        let channel = InputChannel::of(&event);
        let mut outcome = InputOutcome::IGNORED;
        for (subscription, id) in self.router.subscribers(channel) {
            outcome = outcome.merge(self.route(subscription, id, &event));
        }
        outcome
    }

    fn route(&mut self, subscription: SubscriptionId, id: DrawerId, event: &InputEvent) -> InputOutcome {
        match *event {
            InputEvent::Click { target } => self.on_click(id, target),
            InputEvent::KeyDown { key, shift, .. } => self.on_key(id, key, shift),
            InputEvent::TouchStart { target, y } => self.on_touch_start(id, target, y),
            InputEvent::TouchMove { y } => self.on_touch_move(id, y),
            InputEvent::TouchEnd => self.on_touch_end(id),
            InputEvent::TouchCancel => self.on_touch_cancel(id),
            InputEvent::Resize { width } => self.on_resize(id, width),
            InputEvent::Submit { form } => self.on_submit(id, form),
            InputEvent::DocumentReady => self.on_document_ready(subscription, id),
        }
    }

    fn on_click(&mut self, id: DrawerId, target: NodeId) -> InputOutcome {
        let Some(instance) = self.instances.get(id) else {
            return InputOutcome::IGNORED;
        };
        if instance.state != DrawerState::Shown {
            return InputOutcome::IGNORED;
        }

        let reason = if is_dismiss_control(&self.document, instance.node, target) {
            ChangeReason::Dismiss
        } else if instance.config.backdrop && target == instance.node {
            ChangeReason::Backdrop
        } else {
            return InputOutcome::IGNORED;
        };

        if self.hide_with(id, reason) {
            InputOutcome::HANDLED
        } else {
            InputOutcome::IGNORED
        }
    }

    fn on_key(&mut self, id: DrawerId, key: Key, shift: bool) -> InputOutcome {
        let Some(instance) = self.instances.get(id) else {
            return InputOutcome::IGNORED;
        };
        if instance.state != DrawerState::Shown || self.active != Some(id) {
            return InputOutcome::IGNORED;
        }

        match key {
            Key::Escape => {
                if self.hide_with(id, ChangeReason::Keyboard) {
                    InputOutcome::HANDLED
                } else {
                    InputOutcome::IGNORED
                }
            }
            Key::Tab => {
                let direction = TabDirection::from_shift(shift);
                if instance.focus.trap_tab(&mut self.document, direction) {
                    InputOutcome::CONSUMED
                } else {
                    InputOutcome::IGNORED
                }
            }
            Key::Enter | Key::Other => InputOutcome::IGNORED,
        }
    }

    fn on_touch_start(&mut self, id: DrawerId, target: NodeId, y: f32) -> InputOutcome {
        let width = self.document.viewport_width();
        let Some(instance) = self.instances.get_mut(id) else {
            return InputOutcome::IGNORED;
        };
        if instance.state != DrawerState::Shown
            || !gesture::is_mobile(width)
            || !gesture::hits_handle(&self.document, instance.node, target, y)
        {
            return InputOutcome::IGNORED;
        }

        instance.gesture.begin(y, width);
        instance.visual.transition_enabled = false;
        self.document.apply_visual(instance.node, instance.visual);
        InputOutcome::HANDLED
    }

    fn on_touch_move(&mut self, id: DrawerId, y: f32) -> InputOutcome {
        let Some(instance) = self.instances.get_mut(id) else {
            return InputOutcome::IGNORED;
        };
        if self.active != Some(id) {
            return InputOutcome::IGNORED;
        }
        let Some(offset) = instance.gesture.update(y) else {
            return InputOutcome::IGNORED;
        };

        instance.visual.offset_y = offset;
        self.document.apply_visual(instance.node, instance.visual);
        InputOutcome::CONSUMED
    }

    fn on_touch_end(&mut self, id: DrawerId) -> InputOutcome {
        let Some(instance) = self.instances.get_mut(id) else {
            return InputOutcome::IGNORED;
        };
        let Some(release) = instance.gesture.release() else {
            return InputOutcome::IGNORED;
        };

        instance.visual.transition_enabled = true;
        self.document.apply_visual(instance.node, instance.visual);

        match release {
            Release::Commit if self.hide_with(id, ChangeReason::Swipe) => {}
            Release::Commit | Release::SnapBack => self.snap_back(id),
        }
        InputOutcome::HANDLED
    }

    fn on_touch_cancel(&mut self, id: DrawerId) -> InputOutcome {
        let cancelled = self
            .instances
            .get_mut(id)
            .is_some_and(|inst| inst.gesture.cancel());
        if cancelled {
            self.snap_back(id);
            InputOutcome::HANDLED
        } else {
            InputOutcome::IGNORED
        }
    }

    fn on_resize(&mut self, id: DrawerId, width: f32) -> InputOutcome {
        let cancelled = self
            .instances
            .get_mut(id)
            .is_some_and(|inst| inst.gesture.viewport_changed(width));
        if cancelled {
            self.snap_back(id);
            InputOutcome::HANDLED
        } else {
            InputOutcome::IGNORED
        }
    }

    fn on_submit(&mut self, id: DrawerId, form: NodeId) -> InputOutcome {
        let Some(instance) = self.instances.get_mut(id) else {
            return InputOutcome::IGNORED;
        };
        if instance.form != Some(form) {
            return InputOutcome::IGNORED;
        }
        let Some(callback) = instance.on_submit.as_mut() else {
            return InputOutcome::IGNORED;
        };

        callback(&SubmitEvent { drawer: id, form });
        InputOutcome::CONSUMED
    }

    fn on_document_ready(&mut self, subscription: SubscriptionId, id: DrawerId) -> InputOutcome {
        self.router.unsubscribe(subscription);
        let Some(instance) = self.instances.get_mut(id) else {
            return InputOutcome::IGNORED;
        };
        instance.subscriptions.retain(|&s| s != subscription);
        self.schedule_show_on_load(id);
        InputOutcome::HANDLED
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    fn show_with(&mut self, id: DrawerId, reason: ChangeReason) -> bool {
        let Some(instance) = self.instances.get(id) else {
            return false;
        };
        if instance.state != DrawerState::Hidden {
            tracing::trace!(target: targets::STATE, ?id, state = ?instance.state, "show ignored");
            return false;
        }

        if let Some(other) = self.active.filter(|&active| active != id) {
            self.hide_with(other, ChangeReason::Replaced);
            if self.active == Some(other) {
                tracing::debug!(
                    target: targets::STATE,
                    ?id,
                    ?other,
                    "active drawer did not close, show abandoned"
                );
                return false;
            }
        }

        if self.notify(id, DrawerEventKind::Show, reason).cancelled {
            tracing::debug!(target: targets::STATE, ?id, "show cancelled by listener");
            return false;
        }

        let Some(instance) = self.instances.get_mut(id) else {
            return false;
        };
        instance.state = DrawerState::Showing;
        instance.reason = reason;
        instance.visual = VisualState::SHOWN;
        let node = instance.node;
        let config = instance.config;
        instance.focus.refresh(&self.document, node);
        if config.auto_focus {
            instance.focus.capture(&self.document, node);
        }
        self.active = Some(id);
        self.document.apply_visual(node, VisualState::SHOWN);
        tracing::debug!(target: targets::STATE, ?id, ?reason, "drawer showing");

        let duration = config.animation_duration();
        if duration.is_zero() {
            self.complete_show(id);
            if config.auto_focus {
                self.apply_autofocus(id);
            }
        } else {
            let transition = self.scheduler.schedule(duration, Deferred::CompleteShow(id));
            let autofocus = config
                .auto_focus
                .then(|| self.scheduler.schedule(duration, Deferred::Autofocus(id)));
            if let Some(instance) = self.instances.get_mut(id) {
                instance.pending.transition = Some(transition);
                instance.pending.autofocus = autofocus;
            }
        }
        true
    }

    fn hide_with(&mut self, id: DrawerId, reason: ChangeReason) -> bool {
        let Some(instance) = self.instances.get(id) else {
            return false;
        };
        if instance.state != DrawerState::Shown {
            tracing::trace!(target: targets::STATE, ?id, state = ?instance.state, "hide ignored");
            return false;
        }

        if self.notify(id, DrawerEventKind::Hide, reason).cancelled {
            tracing::debug!(target: targets::STATE, ?id, "hide cancelled by listener");
            return false;
        }

        let Some(instance) = self.instances.get_mut(id) else {
            return false;
        };
        instance.state = DrawerState::Hiding;
        instance.reason = reason;
        instance.gesture.cancel();
        instance.visual = VisualState::HIDDEN;
        if let Some(token) = instance.pending.autofocus.take() {
            self.scheduler.cancel(token);
        }
        if self.active == Some(id) {
            self.active = None;
        }
        let node = instance.node;
        self.document.apply_visual(node, VisualState::HIDDEN);
        instance.focus.restore(&mut self.document);
        tracing::debug!(target: targets::STATE, ?id, ?reason, "drawer hiding");

        let duration = instance.config.animation_duration();
        if duration.is_zero() {
            self.complete_hide(id);
        } else {
            let token = self.scheduler.schedule(duration, Deferred::CompleteHide(id));
            instance.pending.transition = Some(token);
        }
        true
    }

    fn complete_show(&mut self, id: DrawerId) {
        let Some(instance) = self.instances.get_mut(id) else {
            return;
        };
        if instance.state != DrawerState::Showing {
            return;
        }
        instance.state = DrawerState::Shown;
        instance.pending.transition = None;
        let reason = instance.reason;
        tracing::debug!(target: targets::STATE, ?id, "drawer shown");
        self.notify(id, DrawerEventKind::Shown, reason);
    }

    fn complete_hide(&mut self, id: DrawerId) {
        let Some(instance) = self.instances.get_mut(id) else {
            return;
        };
        if instance.state != DrawerState::Hiding {
            return;
        }
        instance.state = DrawerState::Hidden;
        instance.pending.transition = None;
        let reason = instance.reason;
        tracing::debug!(target: targets::STATE, ?id, "drawer hidden");
        self.notify(id, DrawerEventKind::Hidden, reason);
    }

    fn apply_autofocus(&mut self, id: DrawerId) {
        let Some(instance) = self.instances.get_mut(id) else {
            return;
        };
        instance.pending.autofocus = None;
        if instance.state.is_visible() {
            instance.focus.autofocus(&mut self.document);
        }
    }

    fn snap_back(&mut self, id: DrawerId) {
        let Some(instance) = self.instances.get_mut(id) else {
            return;
        };
        instance.visual.offset_y = 0.0;
        instance.visual.transition_enabled = true;
        self.document.apply_visual(instance.node, instance.visual);
        tracing::trace!(target: targets::GESTURE, ?id, "snapped back");
    }

    /// Next `drawer-N` identifier not already taken by a document id or a drawer.
    fn generate_identifier(&mut self) -> String {
        loop {
            self.generated += 1;
            let candidate = format!("drawer-{}", self.generated);
            if self.document.find_by_id(&candidate).is_none() && self.find_by_id(&candidate).is_none() {
                return candidate;
            }
        }
    }

    fn schedule_show_on_load(&mut self, id: DrawerId) {
        let token = self
            .scheduler
            .schedule(Duration::ZERO, Deferred::ShowOnLoad(id));
        match self.instances.get_mut(id) {
            Some(instance) => instance.pending.load = Some(token),
            None => {
                self.scheduler.cancel(token);
            }
        }
    }

    fn run_deferred(&mut self, task: Deferred) {
        match task {
            Deferred::CompleteShow(id) => self.complete_show(id),
            Deferred::CompleteHide(id) => self.complete_hide(id),
            Deferred::Autofocus(id) => self.apply_autofocus(id),
            Deferred::ShowOnLoad(id) => {
                if let Some(instance) = self.instances.get_mut(id) {
                    instance.pending.load = None;
                }
                self.show_with(id, ChangeReason::Load);
            }
        }
    }

    fn notify(&self, id: DrawerId, kind: DrawerEventKind, reason: ChangeReason) -> Dispatch {
        let Some(instance) = self.instances.get(id) else {
            return Dispatch::default();
        };
        let event = DrawerEvent {
            kind,
            drawer: id,
            identifier: instance.identifier.clone(),
            active: self.active,
            reason,
        };

        if kind.is_cancelable() {
            instance
                .listeners
                .dispatch_cancelable(&event)
                .merge(self.listeners.dispatch_cancelable(&event))
        } else {
            instance
                .listeners
                .dispatch(&event)
                .merge(self.listeners.dispatch(&event))
        }
    }
}

/// The first form inside `root`.
fn find_form<D: HostDocument + ?Sized>(doc: &D, root: NodeId) -> Option<NodeId> {
    doc.descendants(root)
        .into_iter()
        .find(|&node| doc.element(node).is_some_and(|e| e.kind == ElementKind::Form))
}

/// Whether `target` is, or sits inside, a dismiss control of the drawer at `root`.
fn is_dismiss_control<D: HostDocument + ?Sized>(doc: &D, root: NodeId, target: NodeId) -> bool {
    if !doc.is_within(target, root) {
        return false;
    }
    let mut current = Some(target);
    while let Some(node) = current {
        if node == root {
            return false;
        }
        if doc
            .element(node)
            .is_some_and(|e| e.role == Some(DrawerRole::Dismiss))
        {
            return true;
        }
        current = doc.parent(node);
    }
    false
}

static_assertions::assert_impl_all!(Drawers<horizon_drawer_core::Document>: Send);

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_drawer_core::{Document, Element};

    #[test]
    fn test_find_form_picks_first_in_document_order() {
        let mut doc = Document::new();
        let drawer = doc.append(doc.root(), Element::default());
        let wrapper = doc.append(drawer, Element::default());
        let first = doc.append(wrapper, Element::new(ElementKind::Form));
        doc.append(drawer, Element::new(ElementKind::Form));

        assert_eq!(find_form(&doc, drawer), Some(first));
        assert_eq!(find_form(&doc, doc.root()), Some(first));
        assert_eq!(find_form(&doc, wrapper), Some(first));
    }

    #[test]
    fn test_dismiss_control_lookup() {
        let mut doc = Document::new();
        let drawer = doc.append(doc.root(), Element::default());
        let close = doc.append(
            drawer,
            Element::new(ElementKind::Button).with_role(DrawerRole::Dismiss),
        );
        let icon = doc.append(close, Element::default());
        let body = doc.append(drawer, Element::default());
        let foreign = doc.append(
            doc.root(),
            Element::new(ElementKind::Button).with_role(DrawerRole::Dismiss),
        );

        assert!(is_dismiss_control(&doc, drawer, close));
        assert!(is_dismiss_control(&doc, drawer, icon));
        assert!(!is_dismiss_control(&doc, drawer, body));
        assert!(!is_dismiss_control(&doc, drawer, drawer));
        assert!(!is_dismiss_control(&doc, drawer, foreign));
    }
}
