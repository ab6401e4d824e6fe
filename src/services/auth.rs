//! Registration, login, the start-up admin account and the "my orders" page.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::Serialize;

use crate::config::AdminBootstrap;
use crate::domain::access::{AccessPolicy, authorize};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::customer::{Customer, NewCustomer};
use crate::domain::order::{Order, OrderListQuery, OrderStatus};
use crate::domain::user::{NewUser, User};
use crate::forms::auth::{LoginForm, RegisterForm, RegisterFormEcho};
use crate::repository::{CustomerReader, OrderReader, UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult};
use crate::{ADMIN_ROLE, CUSTOMER_ROLE};

const DUPLICATE_USERNAME: &str = "A user with that username already exists.";

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ServiceError::Internal(format!("failed to hash password: {err}")))
}

/// Check `password` against a stored PHC hash string.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Data required to re-render the registration template.
#[derive(Debug, Default, Serialize)]
pub struct RegisterPageData {
    pub form: RegisterFormEcho,
    pub error: Option<String>,
}

/// Result of submitting the registration form.
#[derive(Debug)]
pub enum RegisterOutcome {
    Registered(User),
    Rejected(RegisterPageData),
}

/// Rejects visitors that are already logged in; used by the login and registration pages.
pub fn ensure_anonymous(user: Option<&AuthenticatedUser>) -> ServiceResult<()> {
    authorize(user, AccessPolicy::AnonymousOnly).into_result()?;
    Ok(())
}

/// Creates a login with the `customer` role and the customer record linked to it.
pub fn register_user<R>(
    repo: &R,
    user: Option<&AuthenticatedUser>,
    form: RegisterForm,
) -> ServiceResult<RegisterOutcome>
where
    R: UserReader + UserWriter + ?Sized,
{
    ensure_anonymous(user)?;

    let echo = form.echo();
    let rejected = |error: String| {
        Ok(RegisterOutcome::Rejected(RegisterPageData {
            form: echo.clone(),
            error: Some(error),
        }))
    };

    let registration = match form.into_registration() {
        Ok(registration) => registration,
        Err(err) => return rejected(err.user_message()),
    };

    if repo.get_user_by_username(&registration.username)?.is_some() {
        return rejected(DUPLICATE_USERNAME.to_string());
    }

    let password_hash = hash_password(&registration.password)?;
    let new_user = NewUser::new(&registration.username, &registration.email, password_hash)
        .with_role(CUSTOMER_ROLE);

    let new_customer = NewCustomer::new(&new_user.username, "", &new_user.email);

    let (created, _customer) = match repo.create_user_with_customer(&new_user, &new_customer) {
        Ok(created) => created,
        Err(err) => match ServiceError::from(err) {
            ServiceError::Conflict => return rejected(DUPLICATE_USERNAME.to_string()),
            other => return Err(other),
        },
    };

    log::info!("Registered user {}", created.username);
    Ok(RegisterOutcome::Registered(created))
}

/// Verifies the credentials and returns the identity to store in the session.
pub fn login<R>(
    repo: &R,
    user: Option<&AuthenticatedUser>,
    form: LoginForm,
) -> ServiceResult<AuthenticatedUser>
where
    R: UserReader + ?Sized,
{
    ensure_anonymous(user)?;

    let username = form.username.trim();
    let Some((user, password_hash)) = repo.get_user_credentials(username)? else {
        return Err(ServiceError::InvalidCredentials);
    };

    if !verify_password(&form.password, &password_hash) {
        return Err(ServiceError::InvalidCredentials);
    }

    Ok(AuthenticatedUser::from(&user))
}

/// Creates the configured admin account unless a user with that name already exists.
///
/// Returns `true` when an account was created.
pub fn ensure_admin<R>(repo: &R, admin: &AdminBootstrap) -> ServiceResult<bool>
where
    R: UserReader + UserWriter + ?Sized,
{
    let username = admin.username.trim();
    if repo.get_user_by_username(username)?.is_some() {
        return Ok(false);
    }

    let password_hash = hash_password(&admin.password)?;
    let new_user = NewUser::new(username, &admin.email, password_hash).with_role(ADMIN_ROLE);
    repo.create_user(&new_user)?;

    Ok(true)
}

/// Order counters shown on the user page.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct UserOrderStats {
    pub total_orders: usize,
    pub orders_delivered: usize,
    pub orders_pending: usize,
}

/// Data required to render the user page.
#[derive(Debug, Serialize)]
pub struct UserPageData {
    pub customer: Option<Customer>,
    pub orders: Vec<Order>,
    pub stats: UserOrderStats,
}

/// Loads the orders of the customer linked to the logged-in user.
pub fn load_user_page<R>(repo: &R, user: Option<&AuthenticatedUser>) -> ServiceResult<UserPageData>
where
    R: CustomerReader + OrderReader + ?Sized,
{
    authorize(user, AccessPolicy::Authenticated).into_result()?;
    let Some(user) = user else {
        return Err(ServiceError::Internal("authorized without a user".to_string()));
    };

    let Some(customer) = repo.get_customer_by_user_id(user.id)? else {
        return Ok(UserPageData {
            customer: None,
            orders: Vec::new(),
            stats: UserOrderStats::default(),
        });
    };

    let orders = repo.list_orders(OrderListQuery::new().customer_id(customer.id))?;
    let count = |status: OrderStatus| orders.iter().filter(|o| o.status == status).count();
    let stats = UserOrderStats {
        total_orders: orders.len(),
        orders_delivered: count(OrderStatus::Delivered),
        orders_pending: count(OrderStatus::Pending),
    };

    Ok(UserPageData {
        customer: Some(customer),
        orders,
        stats,
    })
}
