//! Repositories wrapping entity queries.

mod family_member;
mod post;
mod settings;

pub use family_member::FamilyMemberRepository;
pub use post::PostRepository;
pub use settings::SettingsRepository;
