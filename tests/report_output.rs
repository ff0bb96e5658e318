use chrono::NaiveDate;
use rust_decimal::Decimal;
use storefront_report::{
    error::AppError,
    models::{Customer, CustomerSpend, MonthlySales, OrderProduct},
    queries::ReportParams,
    report::{JsonSink, ReportSink, TextSink, orders_between_title},
};

fn john() -> Customer {
    Customer {
        customer_id: 1,
        first_name: Some("John".into()),
        last_name: Some("Doe".into()),
        email: Some("john.doe@example.com".into()),
        date_of_birth: NaiveDate::from_ymd_opt(1985, 1, 15),
    }
}

#[test]
fn text_sink_prints_header_then_tuples() {
    let mut sink = TextSink::new(Vec::new());
    sink.section("All Customers:", &[john()]).unwrap();
    sink.section(
        "Products in OrderID 1:",
        &[
            OrderProduct {
                product_name: Some("Laptop".into()),
                quantity: Some(1),
            },
            OrderProduct {
                product_name: Some("Headphones".into()),
                quantity: Some(2),
            },
        ],
    )
    .unwrap();

    let out = String::from_utf8(sink.into_inner()).unwrap();
    assert_eq!(
        out,
        "All Customers:\n\
         (1, \"John\", \"Doe\", \"john.doe@example.com\", 1985-01-15)\n\
         \n\
         Products in OrderID 1:\n\
         (\"Laptop\", 1)\n\
         (\"Headphones\", 2)\n"
    );
}

#[test]
fn null_columns_render_as_none() {
    let customer = Customer {
        customer_id: 3,
        first_name: Some("Ada".into()),
        last_name: None,
        email: None,
        date_of_birth: None,
    };
    assert_eq!(customer.to_string(), "(3, \"Ada\", None, None, None)");

    let sales = MonthlySales {
        month: Some("2022-05".into()),
        total_orders: 1,
        total_sales: None,
    };
    assert_eq!(sales.to_string(), "(\"2022-05\", 1, None)");

    let mut sink = JsonSink::new(Vec::new());
    sink.section("All Customers:", &[customer]).unwrap();
    let line: serde_json::Value =
        serde_json::from_slice(&sink.into_inner()).unwrap();
    assert!(line["rows"][0]["last_name"].is_null());
}

#[test]
fn text_sink_prints_empty_sections() {
    let mut sink = TextSink::new(Vec::new());
    sink.section::<CustomerSpend>("Customers who have spent more than $1000:", &[])
        .unwrap();
    let out = String::from_utf8(sink.into_inner()).unwrap();
    assert_eq!(out, "Customers who have spent more than $1000:\n");
}

#[test]
fn text_sink_reports_seed_failure() {
    let mut sink = TextSink::new(Vec::new());
    let err = AppError::SeedFailed {
        source: sqlx::Error::RowNotFound,
    };
    sink.seed_failed(&err).unwrap();
    let out = String::from_utf8(sink.into_inner()).unwrap();
    assert_eq!(out, format!("Error: {}\n", sqlx::Error::RowNotFound));
}

#[test]
fn json_sink_writes_one_object_per_section() {
    let mut sink = JsonSink::new(Vec::new());
    sink.section(
        "Total amount spent by each customer:",
        &[CustomerSpend {
            first_name: Some("Jane".into()),
            last_name: Some("Smith".into()),
            total_spent: Some(Decimal::from(700)),
        }],
    )
    .unwrap();
    sink.seed_failed(&AppError::SeedFailed {
        source: sqlx::Error::RowNotFound,
    })
    .unwrap();

    let out = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<serde_json::Value> = out
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["section"], "Total amount spent by each customer:");
    assert_eq!(lines[0]["rows"][0]["first_name"], "Jane");
    assert_eq!(lines[0]["rows"][0]["total_spent"], "700");
    assert!(lines[1]["error"].is_string());
}

#[test]
fn default_range_title_names_the_month() {
    assert_eq!(
        orders_between_title(&ReportParams::default()),
        "Orders placed in January 2023:"
    );
}

#[test]
fn partial_range_title_lists_bounds() {
    let params = ReportParams {
        orders_to: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
        ..ReportParams::default()
    };
    assert_eq!(
        orders_between_title(&params),
        "Orders placed between 2023-01-01 and 2023-01-15:"
    );
}
