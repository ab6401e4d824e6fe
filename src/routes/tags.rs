use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::tags::AddTagForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, deny, redirect, render_template};
use crate::services::ServiceError;
use crate::services::tags::{create_tag, load_tags, remove_tag};

#[get("/tags/")]
pub async fn show_tags(
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_tags(repo.get_ref(), user.as_ref()) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "tags");
            context.insert("tags", &data.tags);
            render_template(&tera, "tags/index.html", &context)
        }
        Err(ServiceError::AccessDenied(reason)) => deny(reason),
        Err(err) => {
            log::error!("Failed to list tags: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/tags/add")]
pub async fn add_tag(
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    form: web::Form<AddTagForm>,
) -> impl Responder {
    match create_tag(repo.get_ref(), user.as_ref(), form.into_inner()) {
        Ok(tag) => {
            FlashMessage::success(format!("Tag \"{}\" added.", tag.name)).send();
            redirect("/tags/")
        }
        Err(ServiceError::AccessDenied(reason)) => deny(reason),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/tags/")
        }
        Err(err) => {
            log::error!("Failed to add a tag: {err}");
            FlashMessage::error("Failed to add the tag.").send();
            redirect("/tags/")
        }
    }
}

#[post("/tags/{tag_id}/delete")]
pub async fn delete_tag(
    tag_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let tag_id = tag_id.into_inner();

    match remove_tag(repo.get_ref(), user.as_ref(), tag_id) {
        Ok(()) => {
            FlashMessage::success("Tag deleted.").send();
            redirect("/tags/")
        }
        Err(ServiceError::AccessDenied(reason)) => deny(reason),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Tag not found.").send();
            redirect("/tags/")
        }
        Err(err) => {
            log::error!("Failed to delete tag {tag_id}: {err}");
            FlashMessage::error("Failed to delete the tag.").send();
            redirect("/tags/")
        }
    }
}
