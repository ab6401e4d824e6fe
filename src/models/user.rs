use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::user::{NewUser as DomainNewUser, User as DomainUser};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(
    table_name = crate::schema::user_roles,
    belongs_to(User, foreign_key = user_id)
)]
pub struct UserRole {
    pub id: i32,
    pub user_id: i32,
    pub role: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::user_roles)]
pub struct NewUserRole<'a> {
    pub user_id: i32,
    pub role: &'a str,
}

impl User {
    /// Drop the password hash and attach role names.
    pub fn into_domain(self, roles: Vec<UserRole>) -> DomainUser {
        DomainUser {
            id: self.id,
            username: self.username,
            email: self.email,
            roles: roles.into_iter().map(|role| role.role).collect(),
            created_at: self.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(value: &'a DomainNewUser) -> Self {
        Self {
            username: value.username.as_str(),
            email: value.email.as_str(),
            password_hash: value.password_hash.as_str(),
        }
    }
}
