//! Loading screens: the page-wide overlay removed once everything has
//! loaded, and the tree-map placeholder swapped for the map after a delay.

use crate::controller::PageChromeController;
use crate::dom::*;
use crate::error::ChromeResult;

impl<E: PageEnvironment> PageChromeController<E> {
    /// Fade out the page loader; it leaves the document when the fade ends
    pub fn dismiss_page_loader(&self) {
        let Some(loader) = self.by_selector(PAGE_LOADER_SELECTOR) else {
            return;
        };
        loader.add_class(LOADER_HIDDEN_CLASS);

        let target = loader.clone();
        loader.on_transition_end(Box::new(move || {
            target.remove();
            tracing::debug!("page loader removed");
        }));
    }

    /// Reveal the tree map once the configured delay has passed
    ///
    /// Scheduling again replaces a reveal that has not fired yet.
    pub fn schedule_tree_map_reveal(&self) -> ChromeResult<()> {
        if let Some(pending) = self.tree_map_timer.take() {
            self.env.clear_timeout(pending);
        }

        let env = self.env.clone();
        let slot = self.tree_map_timer.clone();
        let timer = self.env.set_timeout(
            self.config.tree_map.reveal_delay_ms,
            Box::new(move || {
                slot.set(None);
                reveal_tree_map(&*env);
            }),
        )?;
        self.tree_map_timer.set(Some(timer));
        Ok(())
    }

    pub fn has_pending_tree_map_reveal(&self) -> bool {
        self.tree_map_timer.get().is_some()
    }

    /// Swap the tree-map placeholder for the map right away
    pub fn reveal_tree_map(&self) {
        reveal_tree_map(&*self.env);
    }
}

fn reveal_tree_map<E: PageEnvironment>(env: &E) {
    let Some(loader) = env.element_by_id(TREE_MAP_LOADER_ID) else {
        return;
    };
    loader.set_display(Display::None);
    if let Some(map) = env.element_by_id(TREE_MAP_CONTAINER_ID) {
        map.set_display(Display::Block);
    }
}
