pub mod error;
pub mod models;
pub mod session;

mod file_store;
mod kv;
mod memory;

pub use error::StoreError;
pub use file_store::FileStore;
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
pub use models::{Id, UserInfo};
pub use session::{Session, SessionStore, TOKEN_KEY, USER_KEY};
