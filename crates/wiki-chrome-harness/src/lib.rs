//! In-memory page
//!
//! A scripted stand-in for the browser: elements, session storage, the
//! editor, the confirmation dialog, navigation and a manual clock, all in
//! one object. Used by the tests and by native previews of the controller.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use wiki_chrome_core::{
    ChromeError, ChromeResult, ChromeServices, ConfirmDialog, EditorCapability, EditorHandle,
    EditorSettings, EditorSetup, GuardId, LeaveGuard, Navigator, PageElement, PageEnvironment,
    SessionStore, TimerId,
};

/// Side effects the page observed, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    SessionSet { key: String, value: String },
    SessionRemoved { key: String },
    EditorStarted { id: String },
    EditorRemoved,
    Confirmed { message: String, answer: bool },
    FormSubmitted,
    Reloaded,
    WentBack,
}

// =============================================================================
// ELEMENTS
// =============================================================================

#[derive(Default)]
struct ElementData {
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    inner_html: String,
    value: String,
    detached: bool,
    on_transition_end: Vec<Box<dyn FnOnce()>>,
}

#[derive(Clone, Default)]
pub struct MemoryElement(Rc<RefCell<ElementData>>);

impl MemoryElement {
    pub fn value(&self) -> String {
        self.0.borrow().value.clone()
    }

    pub fn is_attached(&self) -> bool {
        !self.0.borrow().detached
    }

    fn has_id(&self, id: &str) -> bool {
        self.0.borrow().id.as_deref() == Some(id)
    }
}

impl PageElement for MemoryElement {
    fn style(&self, property: &str) -> String {
        self.0
            .borrow()
            .styles
            .get(property)
            .cloned()
            .unwrap_or_default()
    }

    fn set_style(&self, property: &str, value: &str) {
        let mut data = self.0.borrow_mut();
        if value.is_empty() {
            data.styles.remove(property);
        } else {
            data.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.0.borrow().attributes.contains_key(name)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&self, name: &str) {
        self.0.borrow_mut().attributes.remove(name);
    }

    fn inner_html(&self) -> String {
        self.0.borrow().inner_html.clone()
    }

    fn set_inner_html(&self, html: &str) {
        self.0.borrow_mut().inner_html = html.to_string();
    }

    fn add_class(&self, class: &str) {
        let mut data = self.0.borrow_mut();
        if !data.classes.iter().any(|c| c == class) {
            data.classes.push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.0.borrow_mut().classes.retain(|c| c != class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    fn set_value(&self, value: &str) {
        self.0.borrow_mut().value = value.to_string();
    }

    fn remove(&self) {
        self.0.borrow_mut().detached = true;
    }

    fn on_transition_end(&self, callback: Box<dyn FnOnce()>) {
        self.0.borrow_mut().on_transition_end.push(callback);
    }
}

// =============================================================================
// EDITOR
// =============================================================================

pub struct MemoryEditor {
    id: String,
    content: RefCell<String>,
    dirty: Cell<bool>,
}

impl MemoryEditor {
    /// Simulate the user editing the document
    pub fn type_content(&self, html: &str) {
        *self.content.borrow_mut() = html.to_string();
        self.dirty.set(true);
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl EditorHandle for MemoryEditor {
    fn content(&self) -> String {
        self.content.borrow().clone()
    }

    fn set_content(&self, html: &str) {
        *self.content.borrow_mut() = html.to_string();
    }

    fn is_dirty(&self) -> bool {
        self.dirty.get()
    }
}

// =============================================================================
// PAGE
// =============================================================================

struct PendingTimer {
    id: TimerId,
    due_ms: u64,
    task: Box<dyn FnOnce()>,
}

pub struct MemoryPage {
    elements: RefCell<Vec<MemoryElement>>,
    forms: Cell<usize>,
    fail_form_submission: Cell<bool>,
    storage: RefCell<BTreeMap<String, String>>,
    fail_session_writes: Cell<bool>,
    viewport_width: Cell<u32>,
    guards: RefCell<Vec<(GuardId, LeaveGuard)>>,
    next_guard: Cell<u32>,
    leave_confirmed: Cell<bool>,
    clock_ms: Cell<u64>,
    timers: RefCell<Vec<PendingTimer>>,
    next_timer: Cell<i32>,
    editor: RefCell<Option<Rc<MemoryEditor>>>,
    confirm_answer: Cell<bool>,
    journal: RefCell<Vec<PageEvent>>,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPage {
    pub fn new() -> Self {
        Self {
            elements: RefCell::new(Vec::new()),
            forms: Cell::new(0),
            fail_form_submission: Cell::new(false),
            storage: RefCell::new(BTreeMap::new()),
            fail_session_writes: Cell::new(false),
            viewport_width: Cell::new(1280),
            guards: RefCell::new(Vec::new()),
            next_guard: Cell::new(1),
            leave_confirmed: Cell::new(false),
            clock_ms: Cell::new(0),
            timers: RefCell::new(Vec::new()),
            next_timer: Cell::new(1),
            editor: RefCell::new(None),
            confirm_answer: Cell::new(true),
            journal: RefCell::new(Vec::new()),
        }
    }

    /// Every capability backed by this page
    pub fn services(self: &Rc<Self>) -> ChromeServices {
        ChromeServices {
            session: self.clone(),
            editor: self.clone(),
            dialog: self.clone(),
            navigator: self.clone(),
        }
    }

    // ---- document ----------------------------------------------------------

    pub fn add_element(&self, id: &str) -> MemoryElement {
        let element = MemoryElement::default();
        element.0.borrow_mut().id = Some(id.to_string());
        self.elements.borrow_mut().push(element.clone());
        element
    }

    pub fn add_element_with_class(&self, class: &str) -> MemoryElement {
        let element = MemoryElement::default();
        element.add_class(class);
        self.elements.borrow_mut().push(element.clone());
        element
    }

    pub fn add_form(&self) {
        self.forms.set(self.forms.get() + 1);
    }

    /// Make every following form submission throw
    pub fn fail_form_submission(&self, fail: bool) {
        self.fail_form_submission.set(fail);
    }

    pub fn set_viewport_width(&self, width_px: u32) {
        self.viewport_width.set(width_px);
    }

    /// Fire `transitionend` on every element waiting for it
    pub fn finish_transitions(&self) {
        let elements = self.elements.borrow().clone();
        for element in elements {
            let callbacks = std::mem::take(&mut element.0.borrow_mut().on_transition_end);
            for callback in callbacks {
                callback();
            }
        }
    }

    // ---- session -----------------------------------------------------------

    pub fn session_value(&self, key: &str) -> Option<String> {
        self.storage.borrow().get(key).cloned()
    }

    /// Seed a session value, as a previous page in the session would have
    pub fn set_session_value(&self, key: &str, value: &str) {
        self.storage
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    pub fn fail_session_writes(&self, fail: bool) {
        self.fail_session_writes.set(fail);
    }

    // ---- editor / dialog ---------------------------------------------------

    pub fn editor(&self) -> Option<Rc<MemoryEditor>> {
        self.editor.borrow().clone()
    }

    /// Answer every following confirmation with `answer`
    pub fn answer_confirm(&self, answer: bool) {
        self.confirm_answer.set(answer);
    }

    // ---- leaving -----------------------------------------------------------

    /// What the browser would show on unload; `None` lets the page go
    ///
    /// A leave the user already confirmed goes through once without asking.
    pub fn attempt_leave(&self) -> Option<String> {
        if self.leave_confirmed.replace(false) {
            return None;
        }
        let guards: Vec<LeaveGuard> = self
            .guards
            .borrow()
            .iter()
            .map(|(_, guard)| guard.clone())
            .collect();
        guards.iter().find_map(|guard| guard())
    }

    pub fn leave_guard_count(&self) -> usize {
        self.guards.borrow().len()
    }

    // ---- clock -------------------------------------------------------------

    /// Move the clock forward, running every timer that falls due
    pub fn advance_clock(&self, ms: u64) {
        let target = self.clock_ms.get() + ms;
        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                let due = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.due_ms <= target)
                    .min_by_key(|(_, timer)| timer.due_ms)
                    .map(|(index, _)| index);
                due.map(|index| timers.remove(index))
            };
            let Some(timer) = next else {
                break;
            };
            self.clock_ms.set(timer.due_ms);
            (timer.task)();
        }
        self.clock_ms.set(target);
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    // ---- observation -------------------------------------------------------

    pub fn journal(&self) -> Vec<PageEvent> {
        self.journal.borrow().clone()
    }

    pub fn submitted_forms(&self) -> usize {
        self.journal
            .borrow()
            .iter()
            .filter(|event| **event == PageEvent::FormSubmitted)
            .count()
    }

    fn record(&self, event: PageEvent) {
        self.journal.borrow_mut().push(event);
    }
}

impl PageEnvironment for MemoryPage {
    type Element = MemoryElement;

    fn element_by_id(&self, id: &str) -> Option<MemoryElement> {
        self.elements
            .borrow()
            .iter()
            .find(|element| element.is_attached() && element.has_id(id))
            .cloned()
    }

    /// Supports the `#id` and `.class` selectors the controller uses
    fn query_selector(&self, selector: &str) -> Option<MemoryElement> {
        if let Some(id) = selector.strip_prefix('#') {
            return self.element_by_id(id);
        }
        let class = selector.strip_prefix('.')?;
        self.elements
            .borrow()
            .iter()
            .find(|element| element.is_attached() && element.has_class(class))
            .cloned()
    }

    fn submit_first_form(&self) -> ChromeResult<bool> {
        if self.forms.get() == 0 {
            return Ok(false);
        }
        if self.fail_form_submission.get() {
            return Err(ChromeError::Form("submit blocked".to_string()));
        }
        self.record(PageEvent::FormSubmitted);
        Ok(true)
    }

    fn matches_min_width(&self, width_px: u32) -> bool {
        self.viewport_width.get() >= width_px
    }

    fn add_leave_guard(&self, guard: LeaveGuard) -> GuardId {
        let id = GuardId(self.next_guard.get());
        self.next_guard.set(id.0 + 1);
        self.guards.borrow_mut().push((id, guard));
        id
    }

    fn remove_leave_guard(&self, id: GuardId) {
        self.guards.borrow_mut().retain(|(guard_id, _)| *guard_id != id);
    }

    fn mark_leave_confirmed(&self) {
        self.leave_confirmed.set(true);
    }

    fn set_timeout(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> ChromeResult<TimerId> {
        let id = TimerId(self.next_timer.get());
        self.next_timer.set(id.0 + 1);
        self.timers.borrow_mut().push(PendingTimer {
            id,
            due_ms: self.clock_ms.get() + u64::from(delay_ms),
            task,
        });
        Ok(id)
    }

    fn clear_timeout(&self, id: TimerId) {
        self.timers.borrow_mut().retain(|timer| timer.id != id);
    }
}

impl SessionStore for MemoryPage {
    fn get(&self, key: &str) -> ChromeResult<Option<String>> {
        Ok(self.session_value(key))
    }

    fn set(&self, key: &str, value: &str) -> ChromeResult<()> {
        if self.fail_session_writes.get() {
            return Err(ChromeError::Storage("quota exceeded".to_string()));
        }
        self.set_session_value(key, value);
        self.record(PageEvent::SessionSet {
            key: key.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn remove(&self, key: &str) -> ChromeResult<()> {
        if self.fail_session_writes.get() {
            return Err(ChromeError::Storage("quota exceeded".to_string()));
        }
        if self.storage.borrow_mut().remove(key).is_some() {
            self.record(PageEvent::SessionRemoved {
                key: key.to_string(),
            });
        }
        Ok(())
    }
}

impl EditorCapability for MemoryPage {
    /// Starts an editor holding the target textarea's markup and runs
    /// `setup` straight away
    fn init(&self, settings: &EditorSettings, setup: EditorSetup) -> ChromeResult<()> {
        let id = settings.editor_id().to_string();
        let initial = self
            .element_by_id(&id)
            .map(|textarea| textarea.inner_html())
            .unwrap_or_default();
        let editor = Rc::new(MemoryEditor {
            id: id.clone(),
            content: RefCell::new(initial),
            dirty: Cell::new(false),
        });

        *self.editor.borrow_mut() = Some(editor.clone());
        self.record(PageEvent::EditorStarted { id });
        setup(editor as Rc<dyn EditorHandle>);
        Ok(())
    }

    fn remove(&self) -> ChromeResult<()> {
        if self.editor.borrow_mut().take().is_some() {
            self.record(PageEvent::EditorRemoved);
        }
        Ok(())
    }

    fn get(&self, id: &str) -> Option<Rc<dyn EditorHandle>> {
        self.editor
            .borrow()
            .as_ref()
            .filter(|editor| editor.id == id)
            .map(|editor| editor.clone() as Rc<dyn EditorHandle>)
    }
}

impl ConfirmDialog for MemoryPage {
    fn confirm(&self, message: &str) -> ChromeResult<bool> {
        let answer = self.confirm_answer.get();
        self.record(PageEvent::Confirmed {
            message: message.to_string(),
            answer,
        });
        Ok(answer)
    }
}

impl Navigator for MemoryPage {
    fn reload(&self) -> ChromeResult<()> {
        self.record(PageEvent::Reloaded);
        Ok(())
    }

    fn back(&self) -> ChromeResult<()> {
        self.record(PageEvent::WentBack);
        Ok(())
    }
}
