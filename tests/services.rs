use crm_dashboard::config::AdminBootstrap;
use crm_dashboard::domain::access::DenyReason;
use crm_dashboard::domain::customer::NewCustomer;
use crm_dashboard::domain::order::{OrderListQuery, OrderStatus};
use crm_dashboard::domain::product::{NewProduct, ProductCategory};
use crm_dashboard::forms::auth::{LoginForm, RegisterForm};
use crm_dashboard::forms::orders::OrderBatchForm;
use crm_dashboard::repository::{
    CustomerReader, CustomerWriter, DieselRepository, OrderReader, ProductWriter, UserReader,
};
use crm_dashboard::services::auth::{self, RegisterOutcome};
use crm_dashboard::services::customers::{self, CustomerOrdersQuery};
use crm_dashboard::services::orders::{self, OrderBatchOutcome};
use crm_dashboard::services::{ServiceError, dashboard};
use crm_dashboard::{ADMIN_ROLE, CUSTOMER_ROLE};

mod common;

fn register_form(username: &str, password1: &str, password2: &str) -> RegisterForm {
    RegisterForm {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password1: password1.to_string(),
        password2: password2.to_string(),
    }
}

#[test]
fn register_then_login() {
    let test_db = common::TestDb::new("service_register_then_login.db");
    let repo = DieselRepository::new(test_db.pool());

    let outcome = auth::register_user(&repo, None, register_form("jane", "s3cret-pass", "s3cret-pass"))
        .expect("registration succeeds");
    let RegisterOutcome::Registered(user) = outcome else {
        panic!("expected the account to be created");
    };
    assert_eq!(user.roles, vec![CUSTOMER_ROLE.to_string()]);

    let customer = repo
        .get_customer_by_user_id(user.id)
        .unwrap()
        .expect("linked customer");
    assert_eq!(customer.name, "jane");
    assert_eq!(customer.email, "jane@example.com");

    let identity = auth::login(
        &repo,
        None,
        LoginForm {
            username: "jane".into(),
            password: "s3cret-pass".into(),
        },
    )
    .expect("login succeeds");
    assert_eq!(identity.id, user.id);
    assert!(identity.has_role(CUSTOMER_ROLE));

    let wrong = auth::login(
        &repo,
        None,
        LoginForm {
            username: "jane".into(),
            password: "not-the-password".into(),
        },
    );
    assert!(matches!(wrong, Err(ServiceError::InvalidCredentials)));

    let page = auth::load_user_page(&repo, Some(&identity)).unwrap();
    assert_eq!(page.customer.map(|c| c.id), Some(customer.id));
    assert!(page.orders.is_empty());
}

#[test]
fn register_with_mismatched_passwords_creates_nothing() {
    let test_db = common::TestDb::new("service_register_mismatch.db");
    let repo = DieselRepository::new(test_db.pool());

    let outcome = auth::register_user(&repo, None, register_form("jane", "s3cret-pass", "different"))
        .expect("rejection is not an error");

    let RegisterOutcome::Rejected(page) = outcome else {
        panic!("expected the form to be rejected");
    };
    assert_eq!(page.form.username, "jane");
    assert_eq!(
        page.error.as_deref(),
        Some("The two password fields didn't match.")
    );
    assert!(repo.get_user_by_username("jane").unwrap().is_none());
    assert_eq!(repo.count_customers().unwrap(), 0);
}

#[test]
fn register_rejects_duplicate_username() {
    let test_db = common::TestDb::new("service_register_duplicate.db");
    let repo = DieselRepository::new(test_db.pool());

    auth::register_user(&repo, None, register_form("jane", "s3cret-pass", "s3cret-pass")).unwrap();
    let outcome =
        auth::register_user(&repo, None, register_form("jane", "other-pass", "other-pass")).unwrap();

    assert!(matches!(
        outcome,
        RegisterOutcome::Rejected(ref page)
            if page.error.as_deref() == Some("A user with that username already exists.")
    ));
    assert_eq!(repo.count_customers().unwrap(), 1);
}

#[test]
fn bootstrap_admin_reaches_dashboard() {
    let test_db = common::TestDb::new("service_bootstrap_admin.db");
    let repo = DieselRepository::new(test_db.pool());
    let admin = AdminBootstrap {
        username: "admin".into(),
        email: "admin@example.com".into(),
        password: "admin-pass".into(),
    };

    assert!(auth::ensure_admin(&repo, &admin).unwrap());
    assert!(!auth::ensure_admin(&repo, &admin).unwrap());

    let identity = auth::login(
        &repo,
        None,
        LoginForm {
            username: "admin".into(),
            password: "admin-pass".into(),
        },
    )
    .unwrap();
    assert!(identity.has_role(ADMIN_ROLE));

    let page = dashboard::load_dashboard(&repo, Some(&identity)).unwrap();
    assert_eq!(page.stats.total_customers, 0);

    let customer = common::user_with_roles(&[CUSTOMER_ROLE]);
    let denied = dashboard::load_dashboard(&repo, Some(&customer));
    assert!(matches!(
        denied,
        Err(ServiceError::AccessDenied(DenyReason::MissingRole))
    ));
}

#[test]
fn order_batch_creation() {
    let test_db = common::TestDb::new("service_order_batch_creation.db");
    let repo = DieselRepository::new(test_db.pool());
    let admin = common::user_with_roles(&[ADMIN_ROLE]);

    let customer = repo
        .create_customer(&NewCustomer::new("acme", "555-0100", "acme@example.com"))
        .unwrap();
    let lamp = repo
        .create_product(&NewProduct::new("Lamp", 1250, ProductCategory::Indoor))
        .unwrap();

    let blank = orders::create_orders(&repo, Some(&admin), customer.id, OrderBatchForm::default())
        .unwrap();
    assert!(matches!(blank, OrderBatchOutcome::Created(0)));

    let invalid = orders::create_orders(
        &repo,
        Some(&admin),
        customer.id,
        OrderBatchForm {
            product: vec![lamp.id.to_string(), "9999".into()],
            status: vec!["Pending".into(), "Pending".into()],
        },
    )
    .unwrap();
    let OrderBatchOutcome::Rejected(page) = invalid else {
        panic!("expected the batch to be rejected");
    };
    assert!(page.rows[1].errors.contains(&"Select a valid product.".to_string()));
    assert_eq!(repo.count_orders(OrderListQuery::new()).unwrap(), 0);

    let created = orders::create_orders(
        &repo,
        Some(&admin),
        customer.id,
        OrderBatchForm {
            product: vec![lamp.id.to_string(), String::new(), lamp.id.to_string()],
            status: vec!["Pending".into(), "Pending".into(), "Delivered".into()],
        },
    )
    .unwrap();
    assert!(matches!(created, OrderBatchOutcome::Created(2)));

    let delivered = customers::load_customer_page(
        &repo,
        Some(&admin),
        customer.id,
        &CustomerOrdersQuery {
            status: Some(OrderStatus::Delivered.as_str().to_string()),
        },
    )
    .unwrap();
    assert_eq!(delivered.order_count, 1);
    assert_eq!(delivered.total_orders, 2);
}
