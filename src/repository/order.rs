use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::order::{
        NewOrder as DomainNewOrder, Order as DomainOrder, OrderListQuery,
        UpdateOrder as DomainUpdateOrder,
    },
    models::order::{
        NewOrder as DbNewOrder, Order as DbOrder, OrderRow, UpdateOrder as DbUpdateOrder,
    },
    repository::errors::{RepositoryError, RepositoryResult},
    repository::{DieselRepository, OrderReader, OrderWriter},
};

fn load_order(conn: &mut SqliteConnection, id: i32) -> RepositoryResult<Option<DomainOrder>> {
    use crate::schema::{customers, orders, products};

    let row = orders::table
        .left_join(customers::table)
        .left_join(products::table)
        .filter(orders::id.eq(id))
        .select((
            DbOrder::as_select(),
            customers::name.nullable(),
            products::name.nullable(),
        ))
        .first::<OrderRow>(conn)
        .optional()?;

    row.map(DomainOrder::try_from).transpose()
}

impl OrderReader for DieselRepository {
    fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<DomainOrder>> {
        let mut conn = self.conn()?;
        load_order(&mut conn, id)
    }

    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<Vec<DomainOrder>> {
        use crate::schema::{customers, orders, products};

        let mut conn = self.conn()?;

        let OrderListQuery {
            status,
            customer_id,
            limit,
        } = query;

        let mut items = orders::table
            .left_join(customers::table)
            .left_join(products::table)
            .select((
                DbOrder::as_select(),
                customers::name.nullable(),
                products::name.nullable(),
            ))
            .into_boxed::<Sqlite>();

        if let Some(status) = status {
            let status_value: &'static str = status.into();
            items = items.filter(orders::status.eq(status_value));
        }

        if let Some(customer) = customer_id {
            items = items.filter(orders::customer_id.eq(Some(customer)));
        }

        items = items.order((orders::created_at.desc(), orders::id.desc()));

        if let Some(limit) = limit {
            items = items.limit(limit);
        }

        let rows = items.load::<OrderRow>(&mut conn)?;

        rows.into_iter().map(DomainOrder::try_from).collect()
    }

    fn count_orders(&self, query: OrderListQuery) -> RepositoryResult<usize> {
        use crate::schema::orders;

        let mut conn = self.conn()?;

        let mut count_query = orders::table.into_boxed::<Sqlite>();

        if let Some(status) = query.status {
            let status_value: &'static str = status.into();
            count_query = count_query.filter(orders::status.eq(status_value));
        }

        if let Some(customer) = query.customer_id {
            count_query = count_query.filter(orders::customer_id.eq(Some(customer)));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)?;

        Ok(total as usize)
    }
}

impl OrderWriter for DieselRepository {
    fn create_orders(&self, new_orders: &[DomainNewOrder]) -> RepositoryResult<usize> {
        use crate::schema::orders;

        if new_orders.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let payload: Vec<DbNewOrder> = new_orders.iter().map(DbNewOrder::from).collect();

            let inserted = diesel::insert_into(orders::table)
                .values(&payload)
                .execute(conn)?;

            Ok(inserted)
        })
    }

    fn update_order(
        &self,
        order_id: i32,
        updates: &DomainUpdateOrder,
    ) -> RepositoryResult<DomainOrder> {
        use crate::schema::orders;

        let mut conn = self.conn()?;

        conn.transaction::<DomainOrder, RepositoryError, _>(|conn| {
            let db_updates = DbUpdateOrder::from(updates);

            let updated = diesel::update(orders::table.filter(orders::id.eq(order_id)))
                .set(&db_updates)
                .execute(conn)?;
            if updated == 0 {
                return Err(RepositoryError::NotFound);
            }

            load_order(conn, order_id)?.ok_or(RepositoryError::NotFound)
        })
    }

    fn delete_order(&self, order_id: i32) -> RepositoryResult<()> {
        use crate::schema::orders;

        let mut conn = self.conn()?;

        let deleted =
            diesel::delete(orders::table.filter(orders::id.eq(order_id))).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
