//! Service Layer
//!
//! Remote capabilities the console's lists consume, plus the runtime they
//! run on.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │  MemberDirectory (ListSource)                 │
//! │    fetch_page / delete_item on tokio runtime  │
//! └───────────────────────────────────────────────┘
//!                      │
//!                      ▼ Completion (crossbeam channel)
//! ┌───────────────────────────────────────────────┐
//! │  VirtualList (owning view thread)             │
//! └───────────────────────────────────────────────┘
//! ```

mod member_directory;
mod runtime;

pub use member_directory::*;
pub use runtime::*;
