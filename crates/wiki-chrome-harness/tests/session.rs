//! Session flags over the in-memory store.

use pretty_assertions::assert_eq;
use std::rc::Rc;
use wiki_chrome_core::session::{DRAWER_OPEN_KEY, LEGACY_SAVE_PAGE_KEY, SAVE_PAGE_KEY};
use wiki_chrome_core::PageSession;
use wiki_chrome_harness::MemoryPage;

fn session() -> (Rc<MemoryPage>, PageSession) {
    let page = Rc::new(MemoryPage::new());
    let session = PageSession::new(page.clone());
    (page, session)
}

#[test]
fn test_drawer_flag_round_trip() {
    let (page, session) = session();
    assert_eq!(session.drawer_open().unwrap(), None);

    session.set_drawer_open(false).unwrap();
    assert_eq!(page.session_value(DRAWER_OPEN_KEY).as_deref(), Some("false"));
    assert_eq!(session.drawer_open().unwrap(), Some(false));

    session.set_drawer_open(true).unwrap();
    assert_eq!(session.drawer_open().unwrap(), Some(true));
}

#[test]
fn test_garbage_drawer_flag_reads_as_absent() {
    let (page, session) = session();
    page.set_session_value(DRAWER_OPEN_KEY, "yes");
    assert_eq!(session.drawer_open().unwrap(), None);
}

#[test]
fn test_legacy_save_key_is_honoured() {
    let (page, session) = session();
    assert!(!session.save_in_progress().unwrap());

    page.set_session_value(LEGACY_SAVE_PAGE_KEY, "true");
    assert!(session.save_in_progress().unwrap());

    session.clear_save_in_progress().unwrap();
    assert!(!session.save_in_progress().unwrap());
}

#[test]
fn test_mark_save_writes_save_page_key() {
    let (page, session) = session();
    session.mark_save_in_progress().unwrap();
    assert_eq!(page.session_value(SAVE_PAGE_KEY).as_deref(), Some("true"));
}
