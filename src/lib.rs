//! Libris application library.
//!
//! Books and members, the controllers that enforce the lending rules, the
//! document repositories behind them and the views they report to.

pub mod app;
pub mod modules;
pub mod view;

pub use app::Library;
pub use modules::books::{Book, BookController};
pub use modules::members::{Member, MemberController};
pub use view::LibraryView;
