use std::fmt::Display;
use std::io::Write;

use chrono::Datelike;
use serde::Serialize;
use sqlx::PgConnection;

use crate::{
    error::{AppError, AppResult},
    queries::{self, ReportParams},
};

/// Destination for report output.
pub trait ReportSink {
    /// Called once when the seed transaction was rolled back.
    fn seed_failed(&mut self, err: &AppError) -> AppResult<()>;

    fn section<R>(&mut self, title: &str, rows: &[R]) -> AppResult<()>
    where
        R: Display + Serialize;
}

/// Header line followed by one tuple per row, sections separated by a blank line.
pub struct TextSink<W: Write> {
    out: W,
    sections: usize,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, sections: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for TextSink<W> {
    fn seed_failed(&mut self, err: &AppError) -> AppResult<()> {
        writeln!(self.out, "Error: {err}")?;
        Ok(())
    }

    fn section<R>(&mut self, title: &str, rows: &[R]) -> AppResult<()>
    where
        R: Display + Serialize,
    {
        if self.sections > 0 {
            writeln!(self.out)?;
        }
        self.sections += 1;
        writeln!(self.out, "{title}")?;
        for row in rows {
            writeln!(self.out, "{row}")?;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonSection<'a, R> {
    section: &'a str,
    rows: &'a [R],
}

#[derive(Serialize)]
struct JsonError {
    error: String,
}

/// One JSON object per line.
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn seed_failed(&mut self, err: &AppError) -> AppResult<()> {
        let line = JsonError {
            error: err.to_string(),
        };
        serde_json::to_writer(&mut self.out, &line)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn section<R>(&mut self, title: &str, rows: &[R]) -> AppResult<()>
    where
        R: Display + Serialize,
    {
        let line = JsonSection {
            section: title,
            rows,
        };
        serde_json::to_writer(&mut self.out, &line)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Run the eight report queries in order, handing each result set to `sink`.
pub async fn run_reports<S: ReportSink>(
    conn: &mut PgConnection,
    params: &ReportParams,
    sink: &mut S,
) -> AppResult<()> {
    let customers = queries::all_customers(conn).await?;
    tracing::debug!(rows = customers.len(), "all customers");
    sink.section("All Customers:", &customers)?;

    let orders = queries::orders_between(conn, params.orders_from, params.orders_to).await?;
    tracing::debug!(rows = orders.len(), "orders in range");
    sink.section(&orders_between_title(params), &orders)?;

    let details = queries::orders_with_customers(conn).await?;
    tracing::debug!(rows = details.len(), "orders with customers");
    sink.section("Order details with customer name and email:", &details)?;

    let products = queries::order_products(conn, params.order_id).await?;
    tracing::debug!(rows = products.len(), order_id = params.order_id, "order products");
    sink.section(&format!("Products in OrderID {}:", params.order_id), &products)?;

    let spend = queries::customer_spend(conn).await?;
    tracing::debug!(rows = spend.len(), "customer spend");
    sink.section("Total amount spent by each customer:", &spend)?;

    let popular: Vec<_> = queries::most_popular_product(conn).await?.into_iter().collect();
    tracing::debug!(rows = popular.len(), "most popular product");
    sink.section("Most popular product:", &popular)?;

    let monthly = queries::monthly_sales(conn, params.sales_year).await?;
    tracing::debug!(rows = monthly.len(), year = params.sales_year, "monthly sales");
    sink.section(
        &format!(
            "Total number of orders and sales amount for each month in {}:",
            params.sales_year
        ),
        &monthly,
    )?;

    let big_spenders = queries::customers_spending_over(conn, params.spend_threshold).await?;
    tracing::debug!(rows = big_spenders.len(), "customers over threshold");
    sink.section(
        &format!(
            "Customers who have spent more than ${}:",
            params.spend_threshold
        ),
        &big_spenders,
    )?;

    tracing::info!("reports complete");
    Ok(())
}

/// `Orders placed in January 2023:` for a whole calendar month, the explicit range otherwise.
pub fn orders_between_title(params: &ReportParams) -> String {
    let from = params.orders_from;
    let to = params.orders_to;
    let whole_month = from.day() == 1
        && from.year() == to.year()
        && from.month() == to.month()
        && to.succ_opt().is_none_or(|next| next.month() != to.month());
    if whole_month {
        format!("Orders placed in {}:", from.format("%B %Y"))
    } else {
        format!("Orders placed between {from} and {to}:")
    }
}
