//! Business logic services.

#![allow(missing_docs)]

pub mod member;
pub mod post;
pub mod setup;

pub use member::{MemberService, normalize_member_name};
pub use post::{CalendarView, CreatePostInput, PostService};
pub use setup::{SetupService, parse_member_names};
