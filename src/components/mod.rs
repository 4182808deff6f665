//! UI Components
//!
//! View-independent building blocks shared by the console pages.

pub mod virtual_list;

pub use virtual_list::VirtualList;
