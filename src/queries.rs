//! The eight read-only report queries.
//!
//! Each query is a named SQL constant plus a function that binds its
//! parameters and decodes the rows into a typed struct from [`crate::models`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgConnection;

use crate::{
    error::AppResult,
    models::{
        Customer, CustomerSpend, MonthlySales, Order, OrderProduct, OrderWithCustomer,
        PopularProduct,
    },
    seed::date,
};

pub const ALL_CUSTOMERS: &str = r#"
SELECT customer_id, first_name, last_name, email, date_of_birth
FROM customers
ORDER BY customer_id
"#;

pub const ORDERS_BETWEEN: &str = r#"
SELECT order_id, customer_id, order_date
FROM orders
WHERE order_date BETWEEN $1 AND $2
ORDER BY order_id
"#;

pub const ORDERS_WITH_CUSTOMERS: &str = r#"
SELECT orders.order_id, customers.first_name, customers.last_name, customers.email, orders.order_date
FROM orders
JOIN customers ON orders.customer_id = customers.customer_id
ORDER BY orders.order_id
"#;

pub const ORDER_PRODUCTS: &str = r#"
SELECT products.product_name, order_items.quantity
FROM order_items
JOIN products ON order_items.product_id = products.product_id
WHERE order_items.order_id = $1
ORDER BY order_items.order_item_id
"#;

pub const CUSTOMER_SPEND: &str = r#"
SELECT customers.first_name, customers.last_name, SUM(products.price * order_items.quantity) AS total_spent
FROM orders
JOIN order_items ON orders.order_id = order_items.order_id
JOIN products ON order_items.product_id = products.product_id
JOIN customers ON orders.customer_id = customers.customer_id
GROUP BY customers.customer_id
ORDER BY customers.customer_id
"#;

pub const MOST_POPULAR_PRODUCT: &str = r#"
SELECT products.product_name, SUM(order_items.quantity) AS total_ordered
FROM order_items
JOIN products ON order_items.product_id = products.product_id
GROUP BY products.product_id
ORDER BY total_ordered DESC NULLS LAST, products.product_id
LIMIT 1
"#;

pub const MONTHLY_SALES: &str = r#"
SELECT to_char(orders.order_date, 'YYYY-MM') AS month,
       COUNT(orders.order_id) AS total_orders,
       SUM(products.price * order_items.quantity) AS total_sales
FROM orders
JOIN order_items ON orders.order_id = order_items.order_id
JOIN products ON order_items.product_id = products.product_id
WHERE EXTRACT(YEAR FROM orders.order_date)::INT = $1
GROUP BY month
ORDER BY month
"#;

pub const CUSTOMERS_SPENDING_OVER: &str = r#"
SELECT customers.first_name, customers.last_name, SUM(products.price * order_items.quantity) AS total_spent
FROM orders
JOIN order_items ON orders.order_id = order_items.order_id
JOIN products ON order_items.product_id = products.product_id
JOIN customers ON orders.customer_id = customers.customer_id
GROUP BY customers.customer_id
HAVING SUM(products.price * order_items.quantity) > $1
ORDER BY customers.customer_id
"#;

/// Literal inputs of the parameterised queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportParams {
    pub orders_from: NaiveDate,
    pub orders_to: NaiveDate,
    pub order_id: i32,
    pub sales_year: i32,
    pub spend_threshold: Decimal,
}

impl Default for ReportParams {
    fn default() -> Self {
        Self {
            orders_from: date(2023, 1, 1),
            orders_to: date(2023, 1, 31),
            order_id: 1,
            sales_year: 2023,
            spend_threshold: Decimal::from(1000),
        }
    }
}

pub async fn all_customers(conn: &mut PgConnection) -> AppResult<Vec<Customer>> {
    let rows = sqlx::query_as::<_, Customer>(ALL_CUSTOMERS)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

/// Orders dated within `from..=to`.
pub async fn orders_between(
    conn: &mut PgConnection,
    from: NaiveDate,
    to: NaiveDate,
) -> AppResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, Order>(ORDERS_BETWEEN)
        .bind(from)
        .bind(to)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

pub async fn orders_with_customers(conn: &mut PgConnection) -> AppResult<Vec<OrderWithCustomer>> {
    let rows = sqlx::query_as::<_, OrderWithCustomer>(ORDERS_WITH_CUSTOMERS)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

pub async fn order_products(
    conn: &mut PgConnection,
    order_id: i32,
) -> AppResult<Vec<OrderProduct>> {
    let rows = sqlx::query_as::<_, OrderProduct>(ORDER_PRODUCTS)
        .bind(order_id)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

/// Sum of price x quantity over every order of each customer.
pub async fn customer_spend(conn: &mut PgConnection) -> AppResult<Vec<CustomerSpend>> {
    let rows = sqlx::query_as::<_, CustomerSpend>(CUSTOMER_SPEND)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

/// The product with the highest ordered quantity; ties go to the lowest product id
/// and products whose quantities are all NULL rank last.
pub async fn most_popular_product(conn: &mut PgConnection) -> AppResult<Option<PopularProduct>> {
    let row = sqlx::query_as::<_, PopularProduct>(MOST_POPULAR_PRODUCT)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

/// Per month of `year`: item rows counted over the order join (an order with
/// two items counts twice) and the summed sales.
pub async fn monthly_sales(conn: &mut PgConnection, year: i32) -> AppResult<Vec<MonthlySales>> {
    let rows = sqlx::query_as::<_, MonthlySales>(MONTHLY_SALES)
        .bind(year)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

/// Customers whose total spend is strictly greater than `threshold`.
pub async fn customers_spending_over(
    conn: &mut PgConnection,
    threshold: Decimal,
) -> AppResult<Vec<CustomerSpend>> {
    let rows = sqlx::query_as::<_, CustomerSpend>(CUSTOMERS_SPENDING_OVER)
        .bind(threshold)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}
