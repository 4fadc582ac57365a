//! Page loader dismissal and the delayed tree-map reveal.

use pretty_assertions::assert_eq;
use std::rc::Rc;
use wiki_chrome_core::dom::*;
use wiki_chrome_core::{ChromeConfig, PageChromeController};
use wiki_chrome_harness::MemoryPage;

fn tree_map_page() -> (Rc<MemoryPage>, PageChromeController<MemoryPage>) {
    let page = Rc::new(MemoryPage::new());
    let controller =
        PageChromeController::new(page.clone(), page.services(), ChromeConfig::default());
    (page, controller)
}

#[test]
fn test_reveal_waits_for_delay() {
    let (page, chrome) = tree_map_page();
    let loader = page.add_element(TREE_MAP_LOADER_ID);
    let map = page.add_element(TREE_MAP_CONTAINER_ID);
    loader.set_display(Display::Block);
    map.set_display(Display::None);

    chrome.schedule_tree_map_reveal().unwrap();
    assert!(chrome.has_pending_tree_map_reveal());

    page.advance_clock(2999);
    assert_eq!(loader.display(), Display::Block);
    assert_eq!(map.display(), Display::None);

    page.advance_clock(1);
    assert_eq!(loader.display(), Display::None);
    assert_eq!(map.display(), Display::Block);
    assert!(!chrome.has_pending_tree_map_reveal());
}

#[test]
fn test_rescheduling_restarts_delay() {
    let (page, chrome) = tree_map_page();
    let loader = page.add_element(TREE_MAP_LOADER_ID);
    page.add_element(TREE_MAP_CONTAINER_ID);

    chrome.schedule_tree_map_reveal().unwrap();
    page.advance_clock(2000);
    chrome.schedule_tree_map_reveal().unwrap();
    page.advance_clock(2000);
    assert_eq!(loader.display(), Display::Unset);

    page.advance_clock(1000);
    assert_eq!(loader.display(), Display::None);
    assert_eq!(page.pending_timers(), 0);
}

#[test]
fn test_reveal_without_loader_leaves_map_alone() {
    let (page, chrome) = tree_map_page();
    let map = page.add_element(TREE_MAP_CONTAINER_ID);
    map.set_display(Display::None);

    chrome.reveal_tree_map();
    assert_eq!(map.display(), Display::None);
}

#[test]
fn test_page_loader_removed_after_transition() {
    let (page, chrome) = tree_map_page();
    let loader = page.add_element_with_class("loader");

    chrome.dismiss_page_loader();
    assert!(loader.has_class(LOADER_HIDDEN_CLASS));
    assert!(page.query_selector(PAGE_LOADER_SELECTOR).is_some());

    page.finish_transitions();
    assert!(page.query_selector(PAGE_LOADER_SELECTOR).is_none());
}

#[test]
fn test_missing_page_loader_is_noop() {
    let (page, chrome) = tree_map_page();
    chrome.dismiss_page_loader();
    page.finish_transitions();
}
