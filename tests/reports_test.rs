mod common;

use assert_matches::assert_matches;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, Set};
use stockroom_api::{
    errors::ServiceError,
    filters::{DateRange, Pagination, Period, SalesFilter},
    services::sales::RecordSale,
};

use common::TestApp;

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

/// Two categories, three products, sales spread over January to March 2024.
async fn fixture(app: &TestApp) -> (i32, i32, i32) {
    let mouse = app
        .product("Wireless Mouse", "Electronics", dec!(29.99), Some(100))
        .await;
    let keyboard = app
        .product("Gaming Keyboard", "Electronics", dec!(89.50), Some(20))
        .await;
    let gatsby = app
        .product("The Great Gatsby", "Books", dec!(12.00), Some(40))
        .await;

    app.sale(mouse.id, 5, at(2024, 1, 15, 10)).await;
    app.sale(keyboard.id, 1, at(2024, 1, 16, 9)).await;
    app.sale(gatsby.id, 4, at(2024, 2, 3, 12)).await;
    app.sale(mouse.id, 3, at(2024, 2, 20, 18)).await;
    app.sale(gatsby.id, 2, at(2024, 3, 1, 8)).await;

    (mouse.id, keyboard.id, gatsby.id)
}

#[tokio::test]
async fn daily_revenue_of_recent_mouse_sales() {
    let app = TestApp::new().await;
    let now = at(2024, 6, 1, 12);
    let mouse = app
        .product("Wireless Mouse", "Electronics", dec!(29.99), None)
        .await;
    app.sale(mouse.id, 5, now - Duration::hours(3)).await;
    app.sale(mouse.id, 3, now - Duration::hours(20)).await;
    // Outside the one-day window
    app.sale(mouse.id, 10, now - Duration::hours(25)).await;

    let report = app
        .state
        .services
        .reports
        .revenue_as_of(Period::Daily, now)
        .await
        .unwrap();
    assert_eq!(report.period, Period::Daily);
    assert_eq!(report.revenue, dec!(239.92));

    let weekly = app
        .state
        .services
        .reports
        .revenue_as_of(Period::Weekly, now)
        .await
        .unwrap();
    assert_eq!(weekly.revenue, dec!(539.82));
}

#[tokio::test]
async fn revenue_without_sales_is_zero() {
    let app = TestApp::new().await;
    app.product("Coffee Maker", "Home", dec!(79), Some(2)).await;

    for period in Period::ALL {
        let report = app.state.services.reports.revenue(period).await.unwrap();
        assert_eq!(report.revenue, Decimal::ZERO);
    }
}

#[tokio::test]
async fn revenue_uses_current_price() {
    let app = TestApp::new().await;
    let now = Utc::now();
    let sneakers = app.product("Sneakers", "Fashion", dec!(50), None).await;
    app.sale(sneakers.id, 2, now - Duration::minutes(5)).await;

    let before = app.state.services.reports.revenue(Period::Daily).await.unwrap();
    assert_eq!(before.revenue, dec!(100));

    let mut active: stockroom_api::entities::product::ActiveModel = sneakers.into();
    active.price = Set(dec!(60));
    active.update(app.state.db.as_ref()).await.unwrap();

    let after = app.state.services.reports.revenue(Period::Daily).await.unwrap();
    assert_eq!(after.revenue, dec!(120));
}

#[tokio::test]
async fn compare_revenue_difference() {
    let app = TestApp::new().await;
    fixture(&app).await;
    let reports = &app.state.services.reports;

    let january = DateRange::new(at(2024, 1, 1, 0), at(2024, 1, 31, 23)).unwrap();
    let february = DateRange::new(at(2024, 2, 1, 0), at(2024, 2, 29, 23)).unwrap();
    let cmp = reports.compare_revenue(january, february).await.unwrap();

    // January: 5 × 29.99 + 1 × 89.50
    assert_eq!(cmp.period_1.revenue, dec!(239.45));
    // February: 4 × 12.00 + 3 × 29.99
    assert_eq!(cmp.period_2.revenue, dec!(137.97));
    assert_eq!(cmp.difference, cmp.period_2.revenue - cmp.period_1.revenue);
    assert_eq!(cmp.period_1.start, january.start);
    assert_eq!(cmp.period_2.end, february.end);

    // Bounds are inclusive
    let exact = DateRange::new(at(2024, 3, 1, 8), at(2024, 3, 1, 8)).unwrap();
    let cmp = reports.compare_revenue(exact, exact).await.unwrap();
    assert_eq!(cmp.period_1.revenue, dec!(24.00));
    assert_eq!(cmp.difference, Decimal::ZERO);
}

#[tokio::test]
async fn category_revenue_adds_up_to_total() {
    let app = TestApp::new().await;
    fixture(&app).await;
    let reports = &app.state.services.reports;

    let rows = reports.revenue_by_category().await.unwrap();
    let categories: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(categories, vec!["Books", "Electronics"]);
    assert_eq!(rows[0].revenue, dec!(72.00));
    assert_eq!(rows[1].revenue, dec!(329.42));

    // Annual window anchored just after the last sale spans all data
    let annual = reports
        .revenue_as_of(Period::Annual, at(2024, 3, 2, 0))
        .await
        .unwrap();
    let sum: Decimal = rows.iter().map(|r| r.revenue).sum();
    assert_eq!(sum, annual.revenue);
}

#[tokio::test]
async fn monthly_summary_partitions_sales() {
    let app = TestApp::new().await;
    fixture(&app).await;
    let reports = &app.state.services.reports;

    let buckets = reports
        .sales_summary(Period::Monthly, SalesFilter::new())
        .await
        .unwrap();
    let keys: Vec<&str> = buckets.iter().map(|b| b.period.as_str()).collect();
    assert_eq!(keys, vec!["2024-01", "2024-02", "2024-03"]);
    assert_eq!(buckets[0].total_quantity, 6);
    assert_eq!(buckets[0].total_revenue, dec!(239.45));
    assert_eq!(buckets[1].total_quantity, 7);
    assert_eq!(buckets[2].total_revenue, dec!(24.00));

    let total_quantity: i64 = buckets.iter().map(|b| b.total_quantity).sum();
    assert_eq!(total_quantity, 15);
}

#[tokio::test]
async fn weekly_summary_with_filters() {
    let app = TestApp::new().await;
    let (mouse, _, _) = fixture(&app).await;
    let reports = &app.state.services.reports;

    let buckets = reports
        .sales_summary(Period::Weekly, SalesFilter::new().category("Electronics"))
        .await
        .unwrap();
    let keys: Vec<&str> = buckets.iter().map(|b| b.period.as_str()).collect();
    // 2024-01-15 and 2024-01-16 share ISO week 3; 2024-02-20 is in week 8
    assert_eq!(keys, vec!["2024-W03", "2024-W08"]);
    assert_eq!(buckets[0].total_quantity, 6);

    let only_mouse = reports
        .sales_summary(
            Period::Annual,
            SalesFilter::new().product(mouse).until(at(2024, 1, 31, 0)),
        )
        .await
        .unwrap();
    assert_eq!(only_mouse.len(), 1);
    assert_eq!(only_mouse[0].period, "2024");
    assert_eq!(only_mouse[0].total_quantity, 5);
    assert_eq!(only_mouse[0].total_revenue, dec!(149.95));
}

#[tokio::test]
async fn best_sellers_ranking() {
    let app = TestApp::new().await;
    let (mouse, keyboard, gatsby) = fixture(&app).await;
    let reports = &app.state.services.reports;

    let top = reports.best_sellers(None, SalesFilter::new()).await.unwrap();
    let ids: Vec<i32> = top.iter().map(|r| r.product_id).collect();
    assert_eq!(ids, vec![mouse, gatsby, keyboard]);
    assert_eq!(top[0].name, "Wireless Mouse");
    assert_eq!(top[0].total_quantity, 8);
    assert_eq!(top[0].total_revenue, dec!(239.92));

    let top_one = reports
        .best_sellers(Some(1), SalesFilter::new().category("Books"))
        .await
        .unwrap();
    assert_eq!(top_one.len(), 1);
    assert_eq!(top_one[0].product_id, gatsby);

    // Product filter is ignored when grouping by product
    let ignored = reports
        .best_sellers(Some(10), SalesFilter::new().product(keyboard))
        .await
        .unwrap();
    assert_eq!(ignored.len(), 3);

    assert_matches!(
        reports.best_sellers(Some(0), SalesFilter::new()).await,
        Err(ServiceError::InvalidArgument(_))
    );
}

#[tokio::test]
async fn best_seller_ties_go_to_lower_product_id() {
    let app = TestApp::new().await;
    let lego = app.product("LEGO Set", "Toys", dec!(99), None).await;
    let puzzle = app.product("Puzzle Box", "Toys", dec!(15), None).await;
    let when = at(2024, 5, 5, 5);
    app.sale(puzzle.id, 4, when).await;
    app.sale(lego.id, 4, when).await;

    let top = app
        .state
        .services
        .reports
        .best_sellers(None, SalesFilter::new())
        .await
        .unwrap();
    assert_eq!(top[0].product_id, lego.id);
    assert_eq!(top[1].product_id, puzzle.id);
}

#[tokio::test]
async fn list_sales_filters_and_paginates() {
    let app = TestApp::new().await;
    let (mouse, _, gatsby) = fixture(&app).await;
    let reports = &app.state.services.reports;

    let all = reports
        .list_sales(SalesFilter::new(), Pagination::new(0, 10).unwrap())
        .await
        .unwrap();
    assert_eq!(all.len(), 5);
    assert!(all.windows(2).all(|w| w[0].sale_date <= w[1].sale_date));

    let books = reports
        .list_sales(
            SalesFilter::new().category("Books"),
            Pagination::new(0, 10).unwrap(),
        )
        .await
        .unwrap();
    assert!(books.iter().all(|s| s.product_id == gatsby));
    assert_eq!(books.len(), 2);

    let window = reports
        .list_sales(
            SalesFilter::new()
                .product(mouse)
                .since(at(2024, 2, 1, 0))
                .until(at(2024, 2, 20, 18)),
            Pagination::new(0, 10).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(window.len(), 1);
    assert_eq!(window[0].quantity, 3);

    let second_page = reports
        .list_sales(SalesFilter::new(), Pagination::new(4, 10).unwrap())
        .await
        .unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].sale_date, at(2024, 3, 1, 8));
}

#[tokio::test]
async fn record_sale_validation() {
    let app = TestApp::new().await;
    let sales = &app.state.services.sales;
    let clock = app.product("Wall Clock", "Home", dec!(22), None).await;

    assert_matches!(
        sales
            .record_sale(RecordSale {
                product_id: clock.id,
                quantity: 0,
                sale_date: None,
            })
            .await,
        Err(ServiceError::InvalidArgument(_))
    );
    assert_matches!(
        sales
            .record_sale(RecordSale {
                product_id: 777,
                quantity: 1,
                sale_date: None,
            })
            .await,
        Err(ServiceError::NotFound(_))
    );

    let before = Utc::now();
    let sale = sales
        .record_sale(RecordSale {
            product_id: clock.id,
            quantity: 2,
            sale_date: None,
        })
        .await
        .unwrap();
    assert!(sale.sale_date >= before);
}
