use diesel::RunQueryDsl;

use crm_dashboard::domain::customer::NewCustomer;
use crm_dashboard::domain::order::{NewOrder, OrderListQuery, OrderStatus, UpdateOrder};
use crm_dashboard::domain::product::{NewProduct, ProductCategory, ProductListQuery};
use crm_dashboard::domain::tag::NewTag;
use crm_dashboard::domain::user::NewUser;
use crm_dashboard::repository::errors::RepositoryError;
use crm_dashboard::repository::{
    CustomerReader, CustomerWriter, DieselRepository, OrderReader, OrderWriter, ProductReader,
    ProductWriter, TagReader, TagWriter, UserReader, UserWriter,
};

mod common;

fn seed_customer(repo: &DieselRepository, name: &str) -> i32 {
    repo.create_customer(&NewCustomer::new(name, "555-0100", format!("{name}@example.com")))
        .expect("create customer")
        .id
}

fn seed_product(repo: &DieselRepository, name: &str) -> i32 {
    repo.create_product(&NewProduct::new(name, 1250, ProductCategory::Indoor))
        .expect("create product")
        .id
}

#[test]
fn test_customer_status_filter() {
    let test_db = common::TestDb::new("test_customer_status_filter.db");
    let repo = DieselRepository::new(test_db.pool());

    let acme = seed_customer(&repo, "acme");
    let other = seed_customer(&repo, "other");
    let lamp = seed_product(&repo, "Lamp");

    let created = repo
        .create_orders(&[
            NewOrder::new(acme, lamp, OrderStatus::Pending),
            NewOrder::new(acme, lamp, OrderStatus::Pending),
            NewOrder::new(acme, lamp, OrderStatus::Delivered),
            NewOrder::new(other, lamp, OrderStatus::Pending),
        ])
        .unwrap();
    assert_eq!(created, 4);

    let pending = repo
        .list_orders(
            OrderListQuery::new()
                .customer_id(acme)
                .status(OrderStatus::Pending),
        )
        .unwrap();
    let delivered = repo
        .list_orders(
            OrderListQuery::new()
                .customer_id(acme)
                .status(OrderStatus::Delivered),
        )
        .unwrap();
    let all = repo
        .list_orders(OrderListQuery::new().customer_id(acme))
        .unwrap();

    assert_eq!(pending.len(), 2);
    assert_eq!(delivered.len(), 1);
    assert_eq!(all.len(), 3);
    assert!(
        all.iter()
            .all(|order| order.customer_name.as_deref() == Some("acme"))
    );
    assert_eq!(
        repo.count_orders(OrderListQuery::new().customer_id(acme))
            .unwrap(),
        3
    );
}

#[test]
fn test_dashboard_counts() {
    let test_db = common::TestDb::new("test_dashboard_counts.db");
    let repo = DieselRepository::new(test_db.pool());

    let first = seed_customer(&repo, "first");
    let second = seed_customer(&repo, "second");
    seed_customer(&repo, "third");
    let lamp = seed_product(&repo, "Lamp");

    repo.create_orders(&[
        NewOrder::new(first, lamp, OrderStatus::Delivered),
        NewOrder::new(first, lamp, OrderStatus::Delivered),
        NewOrder::new(first, lamp, OrderStatus::Pending),
        NewOrder::new(second, lamp, OrderStatus::OutForDelivery),
        NewOrder::new(second, lamp, OrderStatus::OutForDelivery),
    ])
    .unwrap();

    assert_eq!(repo.count_customers().unwrap(), 3);
    assert_eq!(repo.count_orders(OrderListQuery::new()).unwrap(), 5);
    assert_eq!(
        repo.count_orders(OrderListQuery::new().status(OrderStatus::Delivered))
            .unwrap(),
        2
    );
    assert_eq!(
        repo.count_orders(OrderListQuery::new().status(OrderStatus::Pending))
            .unwrap(),
        1
    );
    assert_eq!(
        repo.list_orders(OrderListQuery::new().limit(2))
            .unwrap()
            .len(),
        2
    );
}

#[test]
fn test_deleting_customer_keeps_orders() {
    let test_db = common::TestDb::new("test_deleting_customer_keeps_orders.db");
    let repo = DieselRepository::new(test_db.pool());

    let acme = seed_customer(&repo, "acme");
    let lamp = seed_product(&repo, "Lamp");
    repo.create_orders(&[NewOrder::new(acme, lamp, OrderStatus::Pending)])
        .unwrap();

    repo.delete_customer(acme).unwrap();

    let orders = repo.list_orders(OrderListQuery::new()).unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].customer_id, None);
    assert_eq!(orders[0].customer_name, None);
    assert_eq!(orders[0].product_name.as_deref(), Some("Lamp"));

    let err = repo
        .delete_customer(acme)
        .expect_err("expected second delete to fail");
    assert!(matches!(err, RepositoryError::NotFound));
}

#[test]
fn test_deleting_product_keeps_orders() {
    let test_db = common::TestDb::new("test_deleting_product_keeps_orders.db");
    let repo = DieselRepository::new(test_db.pool());

    let acme = seed_customer(&repo, "acme");
    let lamp = seed_product(&repo, "Lamp");
    repo.create_orders(&[NewOrder::new(acme, lamp, OrderStatus::Pending)])
        .unwrap();

    repo.delete_product(lamp).unwrap();

    let orders = repo.list_orders(OrderListQuery::new()).unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].product_id, None);
    assert_eq!(orders[0].customer_id, Some(acme));
}

#[test]
fn test_order_update_and_delete() {
    let test_db = common::TestDb::new("test_order_update_and_delete.db");
    let repo = DieselRepository::new(test_db.pool());

    let acme = seed_customer(&repo, "acme");
    let lamp = seed_product(&repo, "Lamp");
    let hose = seed_product(&repo, "Hose");
    repo.create_orders(&[NewOrder::new(acme, lamp, OrderStatus::Pending)])
        .unwrap();
    let order = repo.list_orders(OrderListQuery::new()).unwrap().remove(0);

    let updated = repo
        .update_order(
            order.id,
            &UpdateOrder {
                product_id: hose,
                status: OrderStatus::OutForDelivery,
            },
        )
        .unwrap();
    assert_eq!(updated.product_name.as_deref(), Some("Hose"));
    assert_eq!(updated.status, OrderStatus::OutForDelivery);

    repo.delete_order(order.id).unwrap();
    assert!(repo.get_order_by_id(order.id).unwrap().is_none());

    let err = repo
        .update_order(
            order.id,
            &UpdateOrder {
                product_id: hose,
                status: OrderStatus::Delivered,
            },
        )
        .expect_err("expected update of deleted order to fail");
    assert!(matches!(err, RepositoryError::NotFound));
}

#[test]
fn test_products_with_tags() {
    let test_db = common::TestDb::new("test_products_with_tags.db");
    let repo = DieselRepository::new(test_db.pool());

    let garden = repo.create_tag(&NewTag::new("Garden")).unwrap();
    let sale = repo.create_tag(&NewTag::new("Sale")).unwrap();

    let duplicate = repo
        .create_tag(&NewTag::new("Garden"))
        .expect_err("expected duplicate tag to fail");
    assert!(matches!(duplicate, RepositoryError::Conflict(_)));

    let hose = repo
        .create_product(
            &NewProduct::new("Hose", 1990, ProductCategory::Outdoor)
                .with_description("Thirty metres")
                .with_tag_ids(vec![sale.id, garden.id]),
        )
        .unwrap();
    assert_eq!(hose.tags.len(), 2);
    assert_eq!(hose.tags[0].name, "Garden");

    let missing_tag = repo
        .create_product(
            &NewProduct::new("Rake", 900, ProductCategory::Outdoor).with_tag_ids(vec![999]),
        )
        .expect_err("expected unknown tag to fail");
    assert!(matches!(missing_tag, RepositoryError::NotFound));

    let outdoor = repo
        .list_products(ProductListQuery::new().category(ProductCategory::Outdoor))
        .unwrap();
    assert_eq!(outdoor.len(), 1);
    assert_eq!(outdoor[0].name, "Hose");

    let search = repo
        .list_products(ProductListQuery::new().search("metres"))
        .unwrap();
    assert_eq!(search.len(), 1);

    repo.delete_tag(sale.id).unwrap();
    let reloaded = repo.get_product_by_id(hose.id).unwrap().unwrap();
    assert_eq!(reloaded.tags.len(), 1);
    assert_eq!(repo.list_tags().unwrap().len(), 1);
}

#[test]
fn test_bulk_product_import_is_atomic() {
    let test_db = common::TestDb::new("test_bulk_product_import_is_atomic.db");
    let repo = DieselRepository::new(test_db.pool());

    let result = repo.create_products(&[
        NewProduct::new("Lamp", 100, ProductCategory::Indoor),
        NewProduct::new("Rake", 200, ProductCategory::Outdoor).with_tag_ids(vec![42]),
    ]);
    assert!(matches!(result, Err(RepositoryError::NotFound)));
    assert!(repo.list_products(ProductListQuery::new()).unwrap().is_empty());

    let created = repo
        .create_products(&[
            NewProduct::new("Lamp", 100, ProductCategory::Indoor),
            NewProduct::new("Rake", 200, ProductCategory::Outdoor),
        ])
        .unwrap();
    assert_eq!(created, 2);
}

#[test]
fn test_user_roles_and_customer_link() {
    let test_db = common::TestDb::new("test_user_roles_and_customer_link.db");
    let repo = DieselRepository::new(test_db.pool());

    let user = repo
        .create_user(
            &NewUser::new("jane", "Jane@Example.com", "hash")
                .with_role("customer")
                .with_role("customer"),
        )
        .unwrap();
    assert_eq!(user.roles, vec!["customer".to_string()]);
    assert_eq!(user.email, "jane@example.com");

    let duplicate = repo
        .create_user(&NewUser::new("jane", "other@example.com", "hash"))
        .expect_err("expected duplicate username to fail");
    assert!(matches!(duplicate, RepositoryError::Conflict(_)));

    let (loaded, password_hash) = repo.get_user_credentials("jane").unwrap().unwrap();
    assert_eq!(loaded.id, user.id);
    assert_eq!(password_hash, "hash");
    assert_eq!(
        repo.get_user_by_id(user.id).unwrap().map(|u| u.username),
        Some("jane".to_string())
    );

    let customer = repo
        .create_customer(&NewCustomer::new("jane", "", "jane@example.com").with_user_id(user.id))
        .unwrap();
    assert_eq!(
        repo.get_customer_by_user_id(user.id).unwrap().map(|c| c.id),
        Some(customer.id)
    );

    repo.delete_user(user.id).unwrap();
    assert!(repo.get_user_by_username("jane").unwrap().is_none());
    let orphan = repo.get_customer_by_id(customer.id).unwrap().unwrap();
    assert_eq!(orphan.user_id, None);
}

#[test]
fn test_create_user_with_customer_links_both() {
    let test_db = common::TestDb::new("test_create_user_with_customer_links_both.db");
    let repo = DieselRepository::new(test_db.pool());

    let (user, customer) = repo
        .create_user_with_customer(
            &NewUser::new("jane", "jane@example.com", "hash").with_role("customer"),
            &NewCustomer::new("jane", "", "jane@example.com"),
        )
        .unwrap();

    assert_eq!(user.roles, vec!["customer".to_string()]);
    assert_eq!(customer.user_id, Some(user.id));
    assert_eq!(
        repo.get_customer_by_user_id(user.id).unwrap().map(|c| c.id),
        Some(customer.id)
    );
}

#[test]
fn test_create_user_with_customer_is_atomic() {
    let test_db = common::TestDb::new("test_create_user_with_customer_is_atomic.db");
    let repo = DieselRepository::new(test_db.pool());

    {
        let mut conn = test_db.pool().get().unwrap();
        diesel::sql_query(
            "CREATE TRIGGER reject_customers BEFORE INSERT ON customers \
             BEGIN SELECT RAISE(ABORT, 'customers are read-only'); END;",
        )
        .execute(&mut *conn)
        .unwrap();
    }

    let result = repo.create_user_with_customer(
        &NewUser::new("jane", "jane@example.com", "hash").with_role("customer"),
        &NewCustomer::new("jane", "", "jane@example.com"),
    );

    assert!(result.is_err());
    assert!(repo.get_user_by_username("jane").unwrap().is_none());
    assert_eq!(repo.count_customers().unwrap(), 0);
}
