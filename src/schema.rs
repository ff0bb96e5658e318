use sqlx::PgConnection;

use crate::error::AppResult;

pub const CREATE_CUSTOMERS: &str = r#"
CREATE TABLE IF NOT EXISTS customers (
    customer_id INT PRIMARY KEY,
    first_name VARCHAR(255),
    last_name VARCHAR(255),
    email VARCHAR(255),
    date_of_birth DATE
)
"#;

pub const CREATE_PRODUCTS: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    product_id INT PRIMARY KEY,
    product_name VARCHAR(255),
    price DECIMAL(10, 2)
)
"#;

pub const CREATE_ORDERS: &str = r#"
CREATE TABLE IF NOT EXISTS orders (
    order_id INT PRIMARY KEY,
    customer_id INT REFERENCES customers (customer_id),
    order_date DATE
)
"#;

pub const CREATE_ORDER_ITEMS: &str = r#"
CREATE TABLE IF NOT EXISTS order_items (
    order_item_id INT PRIMARY KEY,
    order_id INT REFERENCES orders (order_id),
    product_id INT REFERENCES products (product_id),
    quantity INT
)
"#;

/// Referenced tables come before the tables that point at them.
pub const TABLES: [(&str, &str); 4] = [
    ("customers", CREATE_CUSTOMERS),
    ("products", CREATE_PRODUCTS),
    ("orders", CREATE_ORDERS),
    ("order_items", CREATE_ORDER_ITEMS),
];

/// Create the four tables if they are missing. Existing tables are left untouched.
pub async fn ensure_schema(conn: &mut PgConnection) -> AppResult<()> {
    for (table, ddl) in TABLES {
        sqlx::query(ddl).execute(&mut *conn).await?;
        tracing::debug!(table, "table ensured");
    }
    tracing::info!("schema ready");
    Ok(())
}
