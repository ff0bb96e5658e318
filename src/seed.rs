//! Seed rows and the transactional upsert that writes them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Connection, PgConnection, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::{Customer, Order, OrderItem, Product},
};

pub(crate) const fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(d) => d,
        None => panic!("invalid seed date"),
    }
}

/// Rows for every table, written in one transaction by [`upsert_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedData {
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
}

impl SeedData {
    /// The demonstration dataset: 2 customers, 3 products, 2 orders, 4 order items.
    pub fn fixture() -> Self {
        Self {
            customers: vec![
                Customer {
                    customer_id: 1,
                    first_name: Some("John".into()),
                    last_name: Some("Doe".into()),
                    email: Some("john.doe@example.com".into()),
                    date_of_birth: Some(date(1985, 1, 15)),
                },
                Customer {
                    customer_id: 2,
                    first_name: Some("Jane".into()),
                    last_name: Some("Smith".into()),
                    email: Some("jane.smith@example.com".into()),
                    date_of_birth: Some(date(1990, 6, 20)),
                },
            ],
            products: vec![
                product(1, "Laptop", 1000),
                product(2, "Smartphone", 600),
                product(3, "Headphones", 100),
            ],
            orders: vec![
                Order {
                    order_id: 1,
                    customer_id: Some(1),
                    order_date: Some(date(2023, 1, 10)),
                },
                Order {
                    order_id: 2,
                    customer_id: Some(2),
                    order_date: Some(date(2023, 1, 12)),
                },
            ],
            order_items: vec![
                item(1, 1, 1, 1),
                item(2, 1, 3, 2),
                item(3, 2, 2, 1),
                item(4, 2, 3, 1),
            ],
        }
    }
}

fn product(product_id: i32, name: &str, price: i64) -> Product {
    Product {
        product_id,
        product_name: Some(name.to_string()),
        price: Some(Decimal::from(price)),
    }
}

fn item(order_item_id: i32, order_id: i32, product_id: i32, quantity: i32) -> OrderItem {
    OrderItem {
        order_item_id,
        order_id: Some(order_id),
        product_id: Some(product_id),
        quantity: Some(quantity),
    }
}

/// Rows affected per table by a committed seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub customers: u64,
    pub products: u64,
    pub orders: u64,
    pub order_items: u64,
}

/// Upsert every batch of `data` inside a single transaction.
///
/// Either all four batches are committed or, on the first driver error, the
/// transaction is rolled back and [`AppError::SeedFailed`] is returned.
pub async fn upsert_all(conn: &mut PgConnection, data: &SeedData) -> AppResult<SeedSummary> {
    let mut tx = conn
        .begin()
        .await
        .map_err(|source| AppError::SeedFailed { source })?;

    match write_batches(&mut tx, data).await {
        Ok(summary) => {
            tx.commit()
                .await
                .map_err(|source| AppError::SeedFailed { source })?;
            tracing::info!(?summary, "seed committed");
            Ok(summary)
        }
        Err(source) => {
            if let Err(err) = tx.rollback().await {
                tracing::warn!(error = %err, "seed rollback failed");
            }
            tracing::warn!(error = %source, "seed rolled back");
            Err(AppError::SeedFailed { source })
        }
    }
}

async fn write_batches(
    conn: &mut PgConnection,
    data: &SeedData,
) -> Result<SeedSummary, sqlx::Error> {
    Ok(SeedSummary {
        customers: upsert_customers(conn, &data.customers).await?,
        products: upsert_products(conn, &data.products).await?,
        orders: upsert_orders(conn, &data.orders).await?,
        order_items: upsert_order_items(conn, &data.order_items).await?,
    })
}

async fn upsert_customers(
    conn: &mut PgConnection,
    rows: &[Customer],
) -> Result<u64, sqlx::Error> {
    if rows.is_empty() {
        return Ok(0);
    }
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
        "INSERT INTO customers (customer_id, first_name, last_name, email, date_of_birth) ",
    );
    qb.push_values(rows, |mut b, c| {
        b.push_bind(c.customer_id)
            .push_bind(c.first_name.as_deref())
            .push_bind(c.last_name.as_deref())
            .push_bind(c.email.as_deref())
            .push_bind(c.date_of_birth);
    });
    qb.push(
        " ON CONFLICT (customer_id) DO UPDATE SET \
         first_name = EXCLUDED.first_name, \
         last_name = EXCLUDED.last_name, \
         email = EXCLUDED.email, \
         date_of_birth = EXCLUDED.date_of_birth",
    );
    let affected = qb.build().execute(&mut *conn).await?.rows_affected();
    tracing::debug!(table = "customers", rows = affected, "batch upserted");
    Ok(affected)
}

async fn upsert_products(conn: &mut PgConnection, rows: &[Product]) -> Result<u64, sqlx::Error> {
    if rows.is_empty() {
        return Ok(0);
    }
    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new("INSERT INTO products (product_id, product_name, price) ");
    qb.push_values(rows, |mut b, p| {
        b.push_bind(p.product_id)
            .push_bind(p.product_name.as_deref())
            .push_bind(p.price);
    });
    qb.push(
        " ON CONFLICT (product_id) DO UPDATE SET \
         product_name = EXCLUDED.product_name, \
         price = EXCLUDED.price",
    );
    let affected = qb.build().execute(&mut *conn).await?.rows_affected();
    tracing::debug!(table = "products", rows = affected, "batch upserted");
    Ok(affected)
}

async fn upsert_orders(conn: &mut PgConnection, rows: &[Order]) -> Result<u64, sqlx::Error> {
    if rows.is_empty() {
        return Ok(0);
    }
    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new("INSERT INTO orders (order_id, customer_id, order_date) ");
    qb.push_values(rows, |mut b, o| {
        b.push_bind(o.order_id)
            .push_bind(o.customer_id)
            .push_bind(o.order_date);
    });
    qb.push(
        " ON CONFLICT (order_id) DO UPDATE SET \
         customer_id = EXCLUDED.customer_id, \
         order_date = EXCLUDED.order_date",
    );
    let affected = qb.build().execute(&mut *conn).await?.rows_affected();
    tracing::debug!(table = "orders", rows = affected, "batch upserted");
    Ok(affected)
}

async fn upsert_order_items(
    conn: &mut PgConnection,
    rows: &[OrderItem],
) -> Result<u64, sqlx::Error> {
    if rows.is_empty() {
        return Ok(0);
    }
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
        "INSERT INTO order_items (order_item_id, order_id, product_id, quantity) ",
    );
    qb.push_values(rows, |mut b, i| {
        b.push_bind(i.order_item_id)
            .push_bind(i.order_id)
            .push_bind(i.product_id)
            .push_bind(i.quantity);
    });
    qb.push(
        " ON CONFLICT (order_item_id) DO UPDATE SET \
         order_id = EXCLUDED.order_id, \
         product_id = EXCLUDED.product_id, \
         quantity = EXCLUDED.quantity",
    );
    let affected = qb.build().execute(&mut *conn).await?.rows_affected();
    tracing::debug!(table = "order_items", rows = affected, "batch upserted");
    Ok(affected)
}
