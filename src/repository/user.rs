use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::{
    domain::customer::{Customer as DomainCustomer, NewCustomer as DomainNewCustomer},
    domain::user::{NewUser as DomainNewUser, User as DomainUser},
    models::customer::{Customer as DbCustomer, NewCustomer as DbNewCustomer},
    models::user::{NewUser as DbNewUser, NewUserRole as DbNewUserRole, User as DbUser, UserRole},
    repository::errors::{RepositoryError, RepositoryResult},
    repository::{DieselRepository, UserReader, UserWriter},
};

fn load_roles(conn: &mut SqliteConnection, user: &DbUser) -> RepositoryResult<Vec<UserRole>> {
    use crate::schema::user_roles;

    let roles = UserRole::belonging_to(user)
        .order(user_roles::role.asc())
        .load::<UserRole>(conn)?;

    Ok(roles)
}

fn find_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> RepositoryResult<Option<DbUser>> {
    use crate::schema::users;

    let user = users::table
        .filter(users::username.eq(username))
        .first::<DbUser>(conn)
        .optional()?;

    Ok(user)
}

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<DomainUser>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .filter(users::id.eq(id))
            .first::<DbUser>(&mut conn)
            .optional()?;

        let Some(user) = user else {
            return Ok(None);
        };

        let roles = load_roles(&mut conn, &user)?;
        Ok(Some(user.into_domain(roles)))
    }

    fn get_user_by_username(&self, username: &str) -> RepositoryResult<Option<DomainUser>> {
        Ok(self
            .get_user_credentials(username)?
            .map(|(user, _password_hash)| user))
    }

    fn get_user_credentials(
        &self,
        username: &str,
    ) -> RepositoryResult<Option<(DomainUser, String)>> {
        let mut conn = self.conn()?;

        let Some(user) = find_by_username(&mut conn, username)? else {
            return Ok(None);
        };

        let roles = load_roles(&mut conn, &user)?;
        let password_hash = user.password_hash.clone();

        Ok(Some((user.into_domain(roles), password_hash)))
    }
}

fn insert_user(
    conn: &mut SqliteConnection,
    new_user: &DomainNewUser,
) -> RepositoryResult<DomainUser> {
    use crate::schema::{user_roles, users};

    let db_new = DbNewUser::from(new_user);

    let created = diesel::insert_into(users::table)
        .values(&db_new)
        .get_result::<DbUser>(conn)?;

    if !new_user.roles.is_empty() {
        let payload: Vec<DbNewUserRole> = new_user
            .roles
            .iter()
            .map(|role| DbNewUserRole {
                user_id: created.id,
                role: role.as_str(),
            })
            .collect();

        diesel::insert_into(user_roles::table)
            .values(&payload)
            .execute(conn)?;
    }

    let roles = load_roles(conn, &created)?;
    Ok(created.into_domain(roles))
}

impl UserWriter for DieselRepository {
    fn create_user(&self, new_user: &DomainNewUser) -> RepositoryResult<DomainUser> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainUser, RepositoryError, _>(|conn| insert_user(conn, new_user))
    }

    fn create_user_with_customer(
        &self,
        new_user: &DomainNewUser,
        new_customer: &DomainNewCustomer,
    ) -> RepositoryResult<(DomainUser, DomainCustomer)> {
        use crate::schema::customers;

        let mut conn = self.conn()?;

        conn.transaction::<(DomainUser, DomainCustomer), RepositoryError, _>(|conn| {
            let user = insert_user(conn, new_user)?;

            let mut db_customer = DbNewCustomer::from(new_customer);
            db_customer.user_id = Some(user.id);

            let customer = diesel::insert_into(customers::table)
                .values(&db_customer)
                .get_result::<DbCustomer>(conn)?;

            Ok((user, customer.into()))
        })
    }

    fn delete_user(&self, user_id: i32) -> RepositoryResult<()> {
        use crate::schema::{customers, user_roles, users};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            diesel::update(customers::table.filter(customers::user_id.eq(Some(user_id))))
                .set(customers::user_id.eq(None::<i32>))
                .execute(conn)?;

            diesel::delete(user_roles::table.filter(user_roles::user_id.eq(user_id)))
                .execute(conn)?;

            let deleted = diesel::delete(users::table.filter(users::id.eq(user_id))).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }
}
