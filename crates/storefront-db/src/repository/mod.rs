//! # Repository Module
//!
//! Repositories over the local key/value store.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SessionRepository        HistoryRepository                            │
//! │  ├── guest session id     ├── recently viewed (record, list, clear)    │
//! │  └── language             └── comparison (add, remove, clear, events)  │
//! │            │                        │                                   │
//! │            └──────────┬─────────────┘                                   │
//! │                       ▼                                                 │
//! │                 KvRepository  (get/set raw and JSON, remove, keys)      │
//! │                       │                                                 │
//! │                       ▼                                                 │
//! │                 local_storage table                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod history;
pub mod kv;
pub mod session;
