//! Page-Chrome Controller
//!
//! Turns discrete UI events into visibility and attribute mutations, and
//! keeps the session flags (drawer open, save in progress) consistent with
//! what is rendered.
//!
//! ```text
//! click / load / resize ──► PageChromeController ──► PageEnvironment (elements, timers)
//!                                   │
//!                                   ├──► PageSession ──► SessionStore
//!                                   └──► EditorCapability / ConfirmDialog / Navigator
//! ```
//!
//! Every handler takes `&self`; the controller is shared behind an `Rc` by
//! the event listeners that drive it.

use crate::capability::{
    ChromeServices, ConfirmDialog, EditorCapability, EditorHandle, EditorSetup, Navigator,
};
use crate::config::{ChromeConfig, LeaveAction};
use crate::dom::*;
use crate::drawer::{self, MarginChange};
use crate::error::ChromeResult;
use crate::session::PageSession;
use std::cell::Cell;
use std::rc::Rc;

const NO_MARGIN: &str = "0px";

pub struct PageChromeController<E: PageEnvironment> {
    pub(crate) env: Rc<E>,
    pub(crate) session: PageSession,
    editor: Rc<dyn EditorCapability>,
    dialog: Rc<dyn ConfirmDialog>,
    navigator: Rc<dyn Navigator>,
    pub(crate) config: ChromeConfig,
    /// Leave guard installed by the current editor instance
    editor_guard: Rc<Cell<Option<GuardId>>>,
    /// Pending tree-map reveal
    pub(crate) tree_map_timer: Rc<Cell<Option<TimerId>>>,
}

impl<E: PageEnvironment> PageChromeController<E> {
    pub fn new(env: Rc<E>, services: ChromeServices, config: ChromeConfig) -> Self {
        Self {
            env,
            session: PageSession::new(services.session),
            editor: services.editor,
            dialog: services.dialog,
            navigator: services.navigator,
            config,
            editor_guard: Rc::new(Cell::new(None)),
            tree_map_timer: Rc::new(Cell::new(None)),
        }
    }

    pub fn config(&self) -> &ChromeConfig {
        &self.config
    }

    pub fn session(&self) -> &PageSession {
        &self.session
    }

    pub(crate) fn by_id(&self, id: &str) -> Option<E::Element> {
        let element = self.env.element_by_id(id);
        if element.is_none() {
            tracing::debug!(id, "element not rendered, skipping");
        }
        element
    }

    pub(crate) fn by_selector(&self, selector: &str) -> Option<E::Element> {
        let element = self.env.query_selector(selector);
        if element.is_none() {
            tracing::debug!(selector, "no element matches, skipping");
        }
        element
    }

    /// Flip a panel and return whether it is now visible
    fn flip(&self, element: &E::Element, unset: UnsetMeans) -> bool {
        let visible = !unset.is_visible(element.display());
        element.set_display(Display::from_visible(visible));
        visible
    }

    // =========================================================================
    // EDITOR
    // =========================================================================

    /// Show the editor panel and start the editor, or hide it and tear down
    pub fn toggle_editor(&self) -> ChromeResult<()> {
        let Some(container) = self.by_id(EDITOR_CONTAINER_ID) else {
            return Ok(());
        };

        if container.display() == Display::None {
            container.set_display(Display::Block);
            tracing::debug!(selector = %self.config.editor.selector, "starting editor");
            self.editor.init(&self.config.editor, self.editor_setup())
        } else {
            container.set_display(Display::None);
            let removed = self.editor.remove();
            if let Some(guard) = self.editor_guard.take() {
                self.env.remove_leave_guard(guard);
            }
            removed
        }
    }

    /// Setup hook run by the editor: remember the content it started with and
    /// warn on leaving once that content changes
    fn editor_setup(&self) -> EditorSetup {
        let env = self.env.clone();
        let session = self.session.clone();
        let slot = self.editor_guard.clone();
        let message = self.config.navigation.unsaved_changes_message.clone();

        Box::new(move |editor: Rc<dyn EditorHandle>| {
            let initial = editor.content();
            let guard: LeaveGuard = Rc::new(move || {
                if editor.content() == initial {
                    return None;
                }
                match session.save_in_progress() {
                    Ok(true) => None,
                    Ok(false) => Some(message.clone()),
                    Err(e) => {
                        tracing::warn!(error = %e, "could not read save marker, prompting");
                        Some(message.clone())
                    }
                }
            });

            if let Some(previous) = slot.replace(Some(env.add_leave_guard(guard))) {
                env.remove_leave_guard(previous);
            }
        })
    }

    /// Ask before discarding edits, then leave the editing view
    ///
    /// Returns `false` when the user chose to stay; nothing is navigated in
    /// that case.
    pub fn verify_leave(&self) -> ChromeResult<bool> {
        let dirty = self
            .editor
            .get(self.config.editor.editor_id())
            .map(|editor| editor.is_dirty())
            .unwrap_or(false);

        if dirty && !self.session.save_in_progress()? {
            let message = &self.config.navigation.leave_confirmation_message;
            if !self.dialog.confirm(message)? {
                tracing::info!("leave cancelled by user");
                return Ok(false);
            }
            self.env.mark_leave_confirmed();
        }

        match self.config.navigation.leave_action {
            LeaveAction::Reload => self.navigator.reload()?,
            LeaveAction::Back => self.navigator.back()?,
        }
        tracing::info!(action = ?self.config.navigation.leave_action, "leaving editor");
        Ok(true)
    }

    /// Copy the editor content into the hidden field and submit the form
    pub fn upload_from_editor(&self) -> ChromeResult<()> {
        let Some(editor) = self.editor.get(self.config.editor.editor_id()) else {
            tracing::warn!("save requested without an active editor");
            return Ok(());
        };
        let Some(field) = self.by_id(CONTENT_INPUT_ID) else {
            return Ok(());
        };

        self.session.mark_save_in_progress()?;
        field.set_value(&editor.content());

        match self.env.submit_first_form() {
            Ok(true) => {
                tracing::info!("page content submitted");
                Ok(())
            }
            Ok(false) => {
                tracing::warn!("no form in document, content not submitted");
                self.session.clear_save_in_progress()
            }
            Err(e) => {
                // Nothing is on its way, so the edits stay guarded
                if let Err(clear) = self.session.clear_save_in_progress() {
                    tracing::warn!(error = %clear, "could not clear save marker");
                }
                Err(e)
            }
        }
    }

    // =========================================================================
    // PANELS
    // =========================================================================

    /// Show or hide the create-page form and restyle the toggle button
    pub fn toggle_form(&self) {
        let Some(form) = self.by_id(FORM_CONTAINER_ID) else {
            return;
        };
        let upload_box = self.by_id(UPLOAD_BOX_ID);
        let button = self.by_id(TOGGLE_BUTTON_ID);
        let layout = &self.config.layout;
        let labels = &self.config.labels;

        if self.flip(&form, UnsetMeans::Hidden) {
            if let Some(upload_box) = upload_box {
                upload_box.set_style(MARGIN_TOP, &layout.form_margin_expanded());
            }
            if let Some(button) = button {
                button.set_inner_html(&labels.create_page);
                button.remove_class(BACK_BUTTON_CLASS);
            }
        } else {
            if let Some(upload_box) = upload_box {
                upload_box.set_style(MARGIN_TOP, &layout.form_margin_collapsed());
            }
            if let Some(button) = button {
                button.set_inner_html(&labels.back_html());
                button.add_class(BACK_BUTTON_CLASS);
            }
        }
    }

    pub fn toggle_save(&self) {
        if let Some(container) = self.by_id(SAVE_CONTAINER_ID) {
            self.flip(&container, UnsetMeans::Shown);
        }
    }

    /// Show or hide the page data; while hidden, the toggle button leads back
    /// through verify-leave
    pub fn toggle_page(&self) {
        let Some(container) = self.by_id(PAGE_DATA_CONTAINER_ID) else {
            return;
        };
        let visible = self.flip(&container, UnsetMeans::Hidden);

        let Some(button) = self.by_id(TOGGLE_BUTTON_ID) else {
            return;
        };
        if visible {
            button.set_inner_html(&self.config.labels.edit_html());
            button.remove_attribute("onclick");
        } else {
            button.set_inner_html(&self.config.labels.back_html());
            button.set_attribute("onclick", VERIFY_LEAVE_HANDLER);
        }
    }

    // =========================================================================
    // DRAWER
    // =========================================================================

    /// Flip the drawer and record the new state in the session
    pub fn toggle_drawer(&self) -> ChromeResult<()> {
        let Some(drawer) = self.by_id(DRAWER_ID) else {
            return Ok(());
        };
        let before = drawer.display();
        let open = self.flip(&drawer, UnsetMeans::Hidden);

        if let Err(e) = self.session.set_drawer_open(open) {
            drawer.set_display(before);
            return Err(e);
        }
        tracing::debug!(open, "drawer toggled");
        Ok(())
    }

    /// Indent `.wiki-page` for the drawer, or pull it back to the edge
    pub fn toggle_wiki_margin(&self) {
        let Some(page) = self.by_selector(WIKI_PAGE_SELECTOR) else {
            return;
        };
        if page.style(MARGIN_LEFT) == NO_MARGIN {
            page.set_style(MARGIN_LEFT, &self.config.layout.drawer_indent());
        } else {
            page.set_style(MARGIN_LEFT, NO_MARGIN);
        }
    }

    /// Whether the template marks this page as drawer-open by default
    pub fn has_default_drawer_marker(&self) -> bool {
        self.env
            .query_selector(LAYOUT_ROOT_SELECTOR)
            .map(|root| root.has_attribute(DEFAULT_DRAWER_OPEN_ATTR))
            .unwrap_or(false)
    }

    /// Initial render: restore the drawer from the session and consume the
    /// save marker left by the previous page
    pub fn reconcile_on_load(&self) -> ChromeResult<()> {
        if let Err(e) = self.session.clear_save_in_progress() {
            tracing::warn!(error = %e, "could not clear save marker");
        }

        let Some(drawer) = self.by_id(DRAWER_ID) else {
            return Ok(());
        };
        let marker = self.has_default_drawer_marker();
        let stored = self.session.drawer_open()?;
        let layout = drawer::initial_layout(marker, stored);

        drawer.set_display(Display::from_visible(layout.visible));

        let margin = match layout.margin {
            MarginChange::Indent => Some(self.config.layout.drawer_indent()),
            MarginChange::Reset => Some(NO_MARGIN.to_string()),
            MarginChange::Keep => None,
        };
        if let (Some(margin), Some(page)) = (margin, self.by_selector(WIKI_PAGE_SELECTOR)) {
            page.set_style(MARGIN_LEFT, &margin);
        }

        tracing::debug!(marker, ?stored, visible = layout.visible, "drawer restored");
        Ok(())
    }

    /// Viewport resize: snap the drawer to the default for the new width when
    /// the stored state contradicts it
    pub fn reconcile_on_resize(&self) -> ChromeResult<()> {
        if !self.has_default_drawer_marker() || self.by_id(DRAWER_ID).is_none() {
            return Ok(());
        }
        let wide = self
            .env
            .matches_min_width(self.config.layout.drawer_breakpoint_px);
        let stored = self.session.drawer_open()?;

        if drawer::resize_needs_toggle(true, wide, stored) {
            tracing::debug!(wide, "drawer crossed breakpoint");
            self.toggle_drawer()?;
            self.toggle_wiki_margin();
        }
        Ok(())
    }
}
