//! Database entities.

pub mod family_member;
pub mod post;
pub mod settings;

pub use family_member::Entity as FamilyMember;
pub use post::Entity as Post;
pub use settings::Entity as Settings;
