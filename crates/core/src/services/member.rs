//! Member roster management.

use famfeed_common::{AppError, AppResult};
use famfeed_db::{entities::family_member, repositories::FamilyMemberRepository};
use tracing::info;
use validator::Validate;

/// Longest accepted member name.
pub const MAX_NAME_LENGTH: usize = 50;
const MAX_NAME_LENGTH_U64: u64 = MAX_NAME_LENGTH as u64;

#[derive(Debug, Validate)]
struct MemberName {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH_U64))]
    name: String,
}

/// Trim and validate a member name.
pub fn normalize_member_name(raw: &str) -> AppResult<String> {
    let input = MemberName {
        name: raw.trim().to_string(),
    };
    input.validate().map_err(|_| {
        if input.name.is_empty() {
            AppError::Validation("Please enter a name.".to_string())
        } else {
            AppError::Validation(format!(
                "Names can be at most {MAX_NAME_LENGTH} characters long."
            ))
        }
    })?;
    Ok(input.name)
}

fn duplicate_name(name: &str) -> AppError {
    AppError::Conflict(format!("\"{name}\" is already a family member."))
}

/// Service for listing and administering family members.
#[derive(Clone)]
pub struct MemberService {
    member_repo: FamilyMemberRepository,
}

impl MemberService {
    /// Create a new member service.
    #[must_use]
    pub const fn new(member_repo: FamilyMemberRepository) -> Self {
        Self { member_repo }
    }

    /// All members ordered by name.
    pub async fn list(&self) -> AppResult<Vec<family_member::Model>> {
        self.member_repo.find_all().await
    }

    /// Get a member by ID.
    pub async fn get(&self, id: i32) -> AppResult<family_member::Model> {
        self.member_repo.get_by_id(id).await
    }

    /// Look a member up by login name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<family_member::Model>> {
        self.member_repo.find_by_name(name).await
    }

    /// Add a member to the roster.
    pub async fn add(&self, raw_name: &str) -> AppResult<family_member::Model> {
        let name = normalize_member_name(raw_name)?;

        if self.member_repo.find_by_name(&name).await?.is_some() {
            return Err(duplicate_name(&name));
        }

        // The unique index still catches a concurrent insert of the same name.
        let member = self.member_repo.create(&name).await.map_err(|e| match e {
            AppError::Conflict(_) => duplicate_name(&name),
            other => other,
        })?;

        info!(member_id = member.id, name = %member.name, "Member added");
        Ok(member)
    }

    /// Rename a member, rewriting the author of their existing posts.
    pub async fn rename(&self, id: i32, raw_name: &str) -> AppResult<family_member::Model> {
        let new_name = normalize_member_name(raw_name)?;
        let member = self.member_repo.get_by_id(id).await?;

        if member.name == new_name {
            return Ok(member);
        }

        if let Some(other) = self.member_repo.find_by_name(&new_name).await?
            && other.id != id
        {
            return Err(duplicate_name(&new_name));
        }

        let (renamed, rewritten) =
            self.member_repo
                .rename(id, &new_name)
                .await
                .map_err(|e| match e {
                    AppError::Conflict(_) => duplicate_name(&new_name),
                    other => other,
                })?;

        info!(
            member_id = id,
            old_name = %member.name,
            new_name = %renamed.name,
            posts_rewritten = rewritten,
            "Member renamed"
        );
        Ok(renamed)
    }

    /// Remove a member. Their posts stay, still carrying the old name.
    pub async fn delete(&self, id: i32) -> AppResult<family_member::Model> {
        let member = self.member_repo.get_by_id(id).await?;

        if !self.member_repo.delete(id).await? {
            return Err(AppError::NotFound(format!("Member {id} not found")));
        }

        info!(member_id = id, name = %member.name, "Member deleted");
        Ok(member)
    }
}
