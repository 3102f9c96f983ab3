//! Session storage adapters implementing the
//! [`SessionStore`](shortlist_application::SessionStore) port.

mod file_lock;
mod json_file_store;
mod memory_store;

pub use json_file_store::JsonFileSessionStore;
pub use memory_store::InMemorySessionStore;
