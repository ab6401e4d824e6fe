use serde::Serialize;

use crate::domain::access::{ADMIN_ONLY, authorize};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::tag::Tag;
use crate::forms::tags::AddTagForm;
use crate::repository::{TagReader, TagWriter};
use crate::services::{ServiceError, ServiceResult};

/// Data required to render the tags index template.
#[derive(Debug, Serialize)]
pub struct TagsPageData {
    pub tags: Vec<Tag>,
}

/// Fetches every tag, ordered by name.
pub fn load_tags<R>(repo: &R, user: Option<&AuthenticatedUser>) -> ServiceResult<TagsPageData>
where
    R: TagReader + ?Sized,
{
    authorize(user, ADMIN_ONLY).into_result()?;

    let tags = repo.list_tags()?;

    Ok(TagsPageData { tags })
}

/// Creates a new tag.
pub fn create_tag<R>(
    repo: &R,
    user: Option<&AuthenticatedUser>,
    form: AddTagForm,
) -> ServiceResult<Tag>
where
    R: TagWriter + ?Sized,
{
    authorize(user, ADMIN_ONLY).into_result()?;

    let new_tag = form
        .into_new_tag()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_tag(&new_tag).map_err(|err| match ServiceError::from(err) {
        ServiceError::Conflict => {
            ServiceError::Form(format!("A tag named \"{}\" already exists.", new_tag.name))
        }
        other => other,
    })
}

/// Deletes a tag and detaches it from every product.
pub fn remove_tag<R>(repo: &R, user: Option<&AuthenticatedUser>, tag_id: i32) -> ServiceResult<()>
where
    R: TagWriter + ?Sized,
{
    authorize(user, ADMIN_ONLY).into_result()?;

    repo.delete_tag(tag_id).map_err(ServiceError::from)
}
