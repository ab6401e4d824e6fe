use mockall::mock;

use super::errors::RepositoryResult;
use super::{
    CustomerReader, CustomerWriter, OrderReader, OrderWriter, ProductReader, ProductWriter,
    TagReader, TagWriter, UserReader, UserWriter,
};
use crate::domain::{
    customer::{Customer, NewCustomer},
    order::{NewOrder, Order, OrderListQuery, UpdateOrder},
    product::{NewProduct, Product, ProductListQuery},
    tag::{NewTag, Tag},
    user::{NewUser, User},
};

mock! {
    pub CustomerWriter {}

    impl CustomerWriter for CustomerWriter {
        fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
        fn delete_customer(&self, customer_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn create_products(&self, new_products: &[NewProduct]) -> RepositoryResult<usize>;
        fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub TagReader {}

    impl TagReader for TagReader {
        fn list_tags(&self) -> RepositoryResult<Vec<Tag>>;
    }
}

mock! {
    pub TagWriter {}

    impl TagWriter for TagWriter {
        fn create_tag(&self, new_tag: &NewTag) -> RepositoryResult<Tag>;
        fn delete_tag(&self, tag_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub OrderWriter {}

    impl OrderWriter for OrderWriter {
        fn create_orders(&self, new_orders: &[NewOrder]) -> RepositoryResult<usize>;
        fn update_order(&self, order_id: i32, updates: &UpdateOrder) -> RepositoryResult<Order>;
        fn delete_order(&self, order_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub UserReader {}

    impl UserReader for UserReader {
        fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
        fn get_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;
        fn get_user_credentials(&self, username: &str) -> RepositoryResult<Option<(User, String)>>;
    }
}

// One mock implementing every repository trait, for services that span several.
mock! {
    pub Repository {}

    impl CustomerReader for Repository {
        fn get_customer_by_id(&self, id: i32) -> RepositoryResult<Option<Customer>>;
        fn get_customer_by_user_id(&self, user_id: i32) -> RepositoryResult<Option<Customer>>;
        fn list_customers(&self) -> RepositoryResult<Vec<Customer>>;
        fn count_customers(&self) -> RepositoryResult<usize>;
    }

    impl CustomerWriter for Repository {
        fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
        fn delete_customer(&self, customer_id: i32) -> RepositoryResult<()>;
    }

    impl ProductReader for Repository {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>>;
    }

    impl TagReader for Repository {
        fn list_tags(&self) -> RepositoryResult<Vec<Tag>>;
    }

    impl OrderReader for Repository {
        fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<Order>>;
        fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<Vec<Order>>;
        fn count_orders(&self, query: OrderListQuery) -> RepositoryResult<usize>;
    }

    impl OrderWriter for Repository {
        fn create_orders(&self, new_orders: &[NewOrder]) -> RepositoryResult<usize>;
        fn update_order(&self, order_id: i32, updates: &UpdateOrder) -> RepositoryResult<Order>;
        fn delete_order(&self, order_id: i32) -> RepositoryResult<()>;
    }

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
        fn get_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;
        fn get_user_credentials(&self, username: &str) -> RepositoryResult<Option<(User, String)>>;
    }

    impl UserWriter for Repository {
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
        fn create_user_with_customer(
            &self,
            new_user: &NewUser,
            new_customer: &NewCustomer,
        ) -> RepositoryResult<(User, Customer)>;
        fn delete_user(&self, user_id: i32) -> RepositoryResult<()>;
    }
}
