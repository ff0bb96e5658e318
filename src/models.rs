use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

// Every non-key column is nullable in the schema, so it decodes as `Option`.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Customer {
    pub customer_id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Product {
    pub product_id: i32,
    pub product_name: Option<String>,
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Order {
    pub order_id: i32,
    pub customer_id: Option<i32>,
    pub order_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct OrderItem {
    pub order_item_id: i32,
    pub order_id: Option<i32>,
    pub product_id: Option<i32>,
    pub quantity: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct OrderWithCustomer {
    pub order_id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub order_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct OrderProduct {
    pub product_name: Option<String>,
    pub quantity: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CustomerSpend {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub total_spent: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct PopularProduct {
    pub product_name: Option<String>,
    pub total_ordered: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct MonthlySales {
    /// `YYYY-MM`
    pub month: Option<String>,
    pub total_orders: i64,
    pub total_sales: Option<Decimal>,
}

// Rows render as tuples: text quoted, numbers and dates bare, NULL as `None`.

fn text(value: &Option<String>) -> String {
    match value {
        Some(v) => format!("{v:?}"),
        None => "None".to_string(),
    }
}

fn bare<T: fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "None".to_string(),
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {})",
            self.customer_id,
            text(&self.first_name),
            text(&self.last_name),
            text(&self.email),
            bare(&self.date_of_birth)
        )
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.product_id,
            text(&self.product_name),
            bare(&self.price)
        )
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.order_id,
            bare(&self.customer_id),
            bare(&self.order_date)
        )
    }
}

impl fmt::Display for OrderItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.order_item_id,
            bare(&self.order_id),
            bare(&self.product_id),
            bare(&self.quantity)
        )
    }
}

impl fmt::Display for OrderWithCustomer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {})",
            self.order_id,
            text(&self.first_name),
            text(&self.last_name),
            text(&self.email),
            bare(&self.order_date)
        )
    }
}

impl fmt::Display for OrderProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", text(&self.product_name), bare(&self.quantity))
    }
}

impl fmt::Display for CustomerSpend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            text(&self.first_name),
            text(&self.last_name),
            bare(&self.total_spent)
        )
    }
}

impl fmt::Display for PopularProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {})",
            text(&self.product_name),
            bare(&self.total_ordered)
        )
    }
}

impl fmt::Display for MonthlySales {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            text(&self.month),
            self.total_orders,
            bare(&self.total_sales)
        )
    }
}
