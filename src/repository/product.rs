use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::{
    domain::product::{NewProduct as DomainNewProduct, Product as DomainProduct, ProductListQuery},
    domain::tag::Tag as DomainTag,
    models::product::{NewProduct as DbNewProduct, Product as DbProduct},
    models::product_tag::NewProductTag as DbNewProductTag,
    models::tag::Tag as DbTag,
    repository::errors::{RepositoryError, RepositoryResult},
    repository::{DieselRepository, ProductReader, ProductWriter},
};

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let product = products::table
            .filter(products::id.eq(id))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        let Some(db_product) = product else {
            return Ok(None);
        };

        let mut tags = load_tags_for_products(&mut conn, &[db_product.id])?;
        let product_tags = tags.remove(&db_product.id).unwrap_or_default();

        db_product.into_domain(product_tags).map(Some)
    }

    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let mut items = products::table.into_boxed::<Sqlite>();

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            items = items.filter(
                products::name
                    .like(pattern.clone())
                    .or(products::description.like(pattern)),
            );
        }

        if let Some(category) = query.category {
            let category_value: &'static str = category.into();
            items = items.filter(products::category.eq(category_value));
        }

        items = items.order((products::name.asc(), products::id.asc()));

        let db_products = items.load::<DbProduct>(&mut conn)?;

        if db_products.is_empty() {
            return Ok(Vec::new());
        }

        let product_ids: Vec<i32> = db_products.iter().map(|product| product.id).collect();
        let mut tag_map = load_tags_for_products(&mut conn, &product_ids)?;

        db_products
            .into_iter()
            .map(|db_product| {
                let tags = tag_map.remove(&db_product.id).unwrap_or_default();
                db_product.into_domain(tags)
            })
            .collect()
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainProduct, RepositoryError, _>(|conn| {
            let created = insert_product(conn, new_product)?;

            let mut tags = load_tags_for_products(conn, &[created.id])?;
            let product_tags = tags.remove(&created.id).unwrap_or_default();

            created.into_domain(product_tags)
        })
    }

    fn create_products(&self, new_products: &[DomainNewProduct]) -> RepositoryResult<usize> {
        if new_products.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            for new_product in new_products {
                insert_product(conn, new_product)?;
            }
            Ok(new_products.len())
        })
    }

    fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
        use crate::schema::{orders, product_tags, products};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            diesel::update(orders::table.filter(orders::product_id.eq(Some(product_id))))
                .set(orders::product_id.eq(None::<i32>))
                .execute(conn)?;

            diesel::delete(product_tags::table.filter(product_tags::product_id.eq(product_id)))
                .execute(conn)?;

            let deleted = diesel::delete(products::table.filter(products::id.eq(product_id)))
                .execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }
}

fn insert_product(
    conn: &mut SqliteConnection,
    new_product: &DomainNewProduct,
) -> RepositoryResult<DbProduct> {
    use crate::schema::{product_tags, products, tags};

    let db_new = DbNewProduct::from(new_product);

    let created = diesel::insert_into(products::table)
        .values(&db_new)
        .get_result::<DbProduct>(conn)?;

    if !new_product.tag_ids.is_empty() {
        let mut tag_ids = new_product.tag_ids.clone();
        tag_ids.sort_unstable();
        tag_ids.dedup();

        let known = tags::table
            .filter(tags::id.eq_any(&tag_ids))
            .count()
            .get_result::<i64>(conn)?;
        if known as usize != tag_ids.len() {
            return Err(RepositoryError::NotFound);
        }

        let payload: Vec<DbNewProductTag> = tag_ids
            .iter()
            .map(|tag_id| DbNewProductTag::new(created.id, *tag_id))
            .collect();

        diesel::insert_into(product_tags::table)
            .values(&payload)
            .execute(conn)?;
    }

    Ok(created)
}

fn load_tags_for_products(
    conn: &mut SqliteConnection,
    product_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<DomainTag>>> {
    use crate::schema::{product_tags, tags};

    if product_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = product_tags::table
        .inner_join(tags::table)
        .filter(product_tags::product_id.eq_any(product_ids))
        .order(tags::name.asc())
        .select((product_tags::product_id, DbTag::as_select()))
        .load::<(i32, DbTag)>(conn)?;

    let mut map: HashMap<i32, Vec<DomainTag>> = HashMap::new();
    for (product_id, tag) in rows {
        map.entry(product_id).or_default().push(tag.into());
    }

    Ok(map)
}
