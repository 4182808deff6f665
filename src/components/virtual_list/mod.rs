//! VirtualList Component
//!
//! Chunked, viewport-driven lazy loading for large remote collections.

pub mod config;
pub mod data_source;
pub mod lifecycle;
pub mod list_state;
pub mod mutation;
pub mod scheduler;
pub mod store;
pub mod viewport;
pub mod virtual_list;

pub use config::{ListConfig, ListSettings};
pub use data_source::{Keyed, ListSource, Page, VecSource};
pub use list_state::{ListState, ListStats, ListUpdate};
pub use mutation::RemovalEffect;
pub use store::{Slot, TotalCount};
pub use viewport::{IndexRange, visible_range};
pub use virtual_list::VirtualList;
