//! Persistence bridge between a review session and a key/value store.
mod persist;
mod store;

pub use persist::{
    clear,
    keys,
    load_session,
    load_target_language,
    save_session,
    save_target_language,
};
pub use store::{
    FileStore,
    MemoryStore,
    SessionStore,
    StorageError,
};
