//! The browser-side session: kept in session storage so a reload does not
//! sign the user out, but closing the tab does.

use gloo_storage::{SessionStorage, Storage};
use medikeep_model::Session;

const KEY_SESSION: &str = "medikeep.session";

pub fn load() -> Option<Session> {
    SessionStorage::get(KEY_SESSION).ok()
}

pub fn store(session: &Session) {
    let _ = SessionStorage::set(KEY_SESSION, session);
}

pub fn clear() {
    SessionStorage::delete(KEY_SESSION);
}
