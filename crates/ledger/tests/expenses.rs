use std::sync::{
    Arc,
    atomic::{AtomicI64, AtomicUsize, Ordering},
};

use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio_util::sync::CancellationToken;

use ledger::{
    Expense, ExpenseInput, ExpenseStore, InMemoryStore, Ledger, LedgerError, ListFilter,
};

fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

/// Ledger with sequential ids (`e1`, `e2`, ...) and a fixed clock.
fn ledger_with_store() -> (Ledger, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let counter = Arc::new(AtomicUsize::new(0));
    let ledger = Ledger::builder()
        .store(store.clone())
        .id_generator(move || format!("e{}", counter.fetch_add(1, Ordering::SeqCst) + 1))
        .clock(|| Utc.with_ymd_and_hms(2026, 1, 20, 10, 0, 0).unwrap())
        .build();
    (ledger, store)
}

/// Ledger whose clock advances one second per reading.
fn ledger_with_ticking_clock() -> Ledger {
    let ticks = Arc::new(AtomicI64::new(0));
    let counter = Arc::new(AtomicUsize::new(0));
    Ledger::builder()
        .id_generator(move || format!("e{:03}", counter.fetch_add(1, Ordering::SeqCst) + 1))
        .clock(move || day(2026, 3, 1) + Duration::seconds(ticks.fetch_add(1, Ordering::SeqCst)))
        .build()
}

fn ids(items: &[Expense]) -> Vec<&str> {
    items.iter().map(|e| e.id.as_str()).collect()
}

#[tokio::test]
async fn create_and_list_with_category_filter() {
    let (ledger, _store) = ledger_with_store();
    let cancel = CancellationToken::new();

    ledger
        .create(
            &cancel,
            "u1",
            ExpenseInput::new(100.0, "Groceries", day(2026, 1, 10)).description("a"),
        )
        .await
        .unwrap();
    ledger
        .create(
            &cancel,
            "u1",
            ExpenseInput::new(50.0, "Transport", day(2026, 1, 5)).description("b"),
        )
        .await
        .unwrap();
    ledger
        .create(
            &cancel,
            "u1",
            ExpenseInput::new(25.0, "Groceries", day(2026, 1, 15)).description("c"),
        )
        .await
        .unwrap();

    let items = ledger
        .list(&cancel, "u1", &ListFilter::default().category("groceries").page(1, 10))
        .await
        .unwrap();

    assert_eq!(ids(&items), vec!["e3", "e1"]);
    assert_eq!(items[0].amount, 25.0);
    assert_eq!(items[1].amount, 100.0);
}

#[tokio::test]
async fn create_trims_and_stamps() {
    let (ledger, store) = ledger_with_store();
    let cancel = CancellationToken::new();
    let date = DateTime::parse_from_rfc3339("2026-01-10T09:30:00+05:30")
        .unwrap()
        .with_timezone(&Utc);

    let created = ledger
        .create(&cancel, "u1", ExpenseInput::new(12.5, "  Food ", date).description(" lunch "))
        .await
        .unwrap();

    assert_eq!(created.id, "e1");
    assert_eq!(created.owner, "u1");
    assert_eq!(created.category, "Food");
    assert_eq!(created.description, "lunch");
    assert_eq!(created.date, Utc.with_ymd_and_hms(2026, 1, 10, 4, 0, 0).unwrap());
    assert_eq!(created.created_at, created.updated_at);
    assert_eq!(store.get_by_id(&cancel, "e1").await.unwrap(), created);
}

#[tokio::test]
async fn create_rejects_invalid_input() {
    let (ledger, store) = ledger_with_store();
    let cancel = CancellationToken::new();

    let cases = [
        ("u1", ExpenseInput::new(0.0, "Food", day(2026, 1, 1))),
        ("u1", ExpenseInput::new(-4.0, "Food", day(2026, 1, 1))),
        ("u1", ExpenseInput::new(4.0, " ", day(2026, 1, 1))),
        ("u1", ExpenseInput::new(4.0, "Food", day(1, 1, 1))),
        (
            "u1",
            ExpenseInput {
                amount: 4.0,
                category: "Food".to_string(),
                ..Default::default()
            },
        ),
        ("  ", ExpenseInput::new(4.0, "Food", day(2026, 1, 1))),
    ];
    for (owner, input) in cases {
        let err = ledger.create(&cancel, owner, input).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput(_)), "got {err:?}");
    }
    assert!(store.list_by_owner(&cancel, "u1").await.unwrap().is_empty());
}

#[tokio::test]
async fn timestamps_are_monotonic_with_monotonic_clock() {
    let ledger = ledger_with_ticking_clock();
    let cancel = CancellationToken::new();

    let mut previous: Option<Expense> = None;
    for _ in 0..5 {
        let created = ledger
            .create(&cancel, "u1", ExpenseInput::new(1.0, "Food", day(2026, 1, 1)))
            .await
            .unwrap();
        assert_eq!(created.created_at, created.updated_at);
        if let Some(prev) = &previous {
            assert!(created.created_at >= prev.created_at);
        }
        previous = Some(created);
    }
}

#[tokio::test]
async fn list_ties_break_on_created_at_then_id() {
    let ledger = ledger_with_ticking_clock();
    let cancel = CancellationToken::new();
    let same_day = day(2026, 1, 10);

    for _ in 0..3 {
        ledger
            .create(&cancel, "u1", ExpenseInput::new(1.0, "Food", same_day))
            .await
            .unwrap();
    }
    ledger
        .create(&cancel, "u1", ExpenseInput::new(1.0, "Food", day(2026, 1, 11)))
        .await
        .unwrap();

    let items = ledger.list(&cancel, "u1", &ListFilter::default()).await.unwrap();
    assert_eq!(ids(&items), vec!["e004", "e003", "e002", "e001"]);

    // Identical dates and creation times fall back to id order.
    let (fixed, _store) = ledger_with_store();
    for _ in 0..3 {
        fixed
            .create(&cancel, "u1", ExpenseInput::new(1.0, "Food", same_day))
            .await
            .unwrap();
    }
    let items = fixed.list(&cancel, "u1", &ListFilter::default()).await.unwrap();
    assert_eq!(ids(&items), vec!["e3", "e2", "e1"]);
}

#[tokio::test]
async fn list_is_sorted_and_pages_partition_the_result() {
    let ledger = ledger_with_ticking_clock();
    let cancel = CancellationToken::new();

    for i in 0..23u32 {
        let category = if i % 3 == 0 { "Food" } else { "Rent" };
        ledger
            .create(
                &cancel,
                "u1",
                ExpenseInput::new(f64::from(i + 1), category, day(2026, 1, 1 + i % 7)),
            )
            .await
            .unwrap();
    }

    let full = ledger
        .list(&cancel, "u1", &ListFilter::default().page(1, 100))
        .await
        .unwrap();
    assert_eq!(full.len(), 23);
    for pair in full.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            a.date > b.date
                || (a.date == b.date && a.created_at > b.created_at)
                || (a.date == b.date && a.created_at == b.created_at && a.id > b.id)
        );
    }

    for limit in [1, 2, 5, 7, 22, 23, 100] {
        let mut collected = Vec::new();
        let mut page = 1;
        loop {
            let chunk = ledger
                .list(&cancel, "u1", &ListFilter::default().page(page, limit))
                .await
                .unwrap();
            if chunk.is_empty() {
                break;
            }
            assert!(chunk.len() <= usize::try_from(limit).unwrap());
            collected.extend(chunk);
            page += 1;
        }
        assert_eq!(collected, full, "limit {limit}");
    }
}

#[tokio::test]
async fn list_normalizes_pagination() {
    let ledger = ledger_with_ticking_clock();
    let cancel = CancellationToken::new();
    for _ in 0..25 {
        ledger
            .create(&cancel, "u1", ExpenseInput::new(1.0, "Food", day(2026, 1, 1)))
            .await
            .unwrap();
    }

    let defaulted = ledger
        .list(&cancel, "u1", &ListFilter::default().page(0, 0))
        .await
        .unwrap();
    assert_eq!(defaulted.len(), 20);

    let capped = ledger
        .list(&cancel, "u1", &ListFilter::default().page(-1, 1000))
        .await
        .unwrap();
    assert_eq!(capped.len(), 25);

    let beyond = ledger
        .list(&cancel, "u1", &ListFilter::default().page(4, 10))
        .await
        .unwrap();
    assert!(beyond.is_empty());
}

#[tokio::test]
async fn list_window_is_inclusive_and_inverted_window_rejected() {
    let (ledger, _store) = ledger_with_store();
    let cancel = CancellationToken::new();
    for d in [1, 5, 10, 15] {
        ledger
            .create(&cancel, "u1", ExpenseInput::new(1.0, "Food", day(2026, 1, d)))
            .await
            .unwrap();
    }

    let items = ledger
        .list(
            &cancel,
            "u1",
            &ListFilter::default().window(Some(day(2026, 1, 5)), Some(day(2026, 1, 10))),
        )
        .await
        .unwrap();
    assert_eq!(ids(&items), vec!["e3", "e2"]);

    let err = ledger
        .list(
            &cancel,
            "u1",
            &ListFilter::default().window(Some(day(2026, 1, 10)), Some(day(2026, 1, 5))),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)));
}

#[tokio::test]
async fn blank_category_filter_matches_everything() {
    let (ledger, _store) = ledger_with_store();
    let cancel = CancellationToken::new();
    ledger
        .create(&cancel, "u1", ExpenseInput::new(1.0, "Food", day(2026, 1, 1)))
        .await
        .unwrap();
    ledger
        .create(&cancel, "u1", ExpenseInput::new(1.0, "Rent", day(2026, 1, 2)))
        .await
        .unwrap();

    let items = ledger
        .list(&cancel, "u1", &ListFilter::default().category("   "))
        .await
        .unwrap();
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn round_trip_through_list_window() {
    let (ledger, _store) = ledger_with_store();
    let cancel = CancellationToken::new();
    let date = Utc.with_ymd_and_hms(2026, 2, 3, 14, 15, 16).unwrap();

    let created = ledger
        .create(&cancel, "u1", ExpenseInput::new(42.75, "Books", date).description("novel"))
        .await
        .unwrap();

    let items = ledger
        .list(&cancel, "u1", &ListFilter::default().window(Some(date), Some(date)))
        .await
        .unwrap();
    assert_eq!(items, vec![created.clone()]);
    assert_eq!(items[0].amount, 42.75);
    assert_eq!(items[0].category, "Books");
    assert_eq!(items[0].description, "novel");
    assert_eq!(items[0].date.timestamp(), date.timestamp());
}

#[tokio::test]
async fn update_overwrites_fields_and_keeps_created_at() {
    let ticks = Arc::new(AtomicI64::new(0));
    let ledger = Ledger::builder()
        .id_generator(|| "e1".to_string())
        .clock(move || day(2026, 1, 1) + Duration::hours(ticks.fetch_add(1, Ordering::SeqCst)))
        .build();
    let cancel = CancellationToken::new();

    let created = ledger
        .create(&cancel, "u1", ExpenseInput::new(10.0, "Food", day(2026, 1, 1)))
        .await
        .unwrap();
    let updated = ledger
        .update(
            &cancel,
            "u1",
            "e1",
            ExpenseInput::new(12.0, " Dining ", day(2026, 1, 2)).description(" dinner "),
        )
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.owner, "u1");
    assert_eq!(updated.amount, 12.0);
    assert_eq!(updated.category, "Dining");
    assert_eq!(updated.description, "dinner");
    assert_eq!(updated.date, day(2026, 1, 2));
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
}

#[tokio::test]
async fn update_forbidden_for_other_user_leaves_record_unchanged() {
    let (ledger, store) = ledger_with_store();
    let cancel = CancellationToken::new();
    let created = ledger
        .create(&cancel, "owner", ExpenseInput::new(100.0, "Food", day(2026, 1, 1)))
        .await
        .unwrap();

    let err = ledger
        .update(&cancel, "intruder", "e1", ExpenseInput::new(120.0, "Food", day(2026, 1, 2)))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Forbidden(_)));
    assert_eq!(store.get_by_id(&cancel, "e1").await.unwrap(), created);
}

#[tokio::test]
async fn update_missing_and_blank_ids() {
    let (ledger, _store) = ledger_with_store();
    let cancel = CancellationToken::new();
    let input = ExpenseInput::new(1.0, "Food", day(2026, 1, 1));

    let err = ledger.update(&cancel, "u1", "missing", input.clone()).await.unwrap_err();
    assert_eq!(err, LedgerError::NotFound("missing".to_string()));

    let err = ledger.update(&cancel, "u1", " ", input).await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)));
}

#[tokio::test]
async fn delete_not_found_is_repeatable() {
    let (ledger, _store) = ledger_with_store();
    let cancel = CancellationToken::new();

    let err = ledger.delete(&cancel, "u1", "missing").await.unwrap_err();
    assert_eq!(err, LedgerError::NotFound("missing".to_string()));

    ledger
        .create(&cancel, "u1", ExpenseInput::new(1.0, "Food", day(2026, 1, 1)))
        .await
        .unwrap();
    ledger.delete(&cancel, "u1", "e1").await.unwrap();
    for _ in 0..2 {
        let err = ledger.delete(&cancel, "u1", "e1").await.unwrap_err();
        assert_eq!(err, LedgerError::NotFound("e1".to_string()));
    }
}

#[tokio::test]
async fn owners_are_isolated() {
    let (ledger, store) = ledger_with_store();
    let cancel = CancellationToken::new();
    ledger
        .create(&cancel, "alice", ExpenseInput::new(30.0, "Food", day(2026, 1, 1)))
        .await
        .unwrap();

    assert!(ledger.list(&cancel, "bob", &ListFilter::default()).await.unwrap().is_empty());
    let analytics = ledger.analytics(&cancel, "bob", None, None).await.unwrap();
    assert_eq!(analytics.total_amount, 0.0);
    assert!(analytics.by_category.is_empty());

    let err = ledger.delete(&cancel, "bob", "e1").await.unwrap_err();
    assert!(matches!(err, LedgerError::Forbidden(_)));
    assert!(store.get_by_id(&cancel, "e1").await.is_ok());
}

#[tokio::test]
async fn analytics_buckets_by_category_and_month() {
    let (ledger, _store) = ledger_with_store();
    let cancel = CancellationToken::new();
    let fixtures = [
        (100.0, "Groceries", day(2026, 1, 10)),
        (50.0, "Transport", day(2026, 1, 5)),
        (25.0, "Groceries", day(2026, 2, 15)),
        (10.0, "Books", day(2025, 12, 31)),
    ];
    for (amount, category, date) in fixtures {
        ledger
            .create(&cancel, "u1", ExpenseInput::new(amount, category, date))
            .await
            .unwrap();
    }

    let all = ledger.analytics(&cancel, "u1", None, None).await.unwrap();
    assert_eq!(all.total_amount, 185.0);
    assert_eq!(all.by_category["Groceries"], 125.0);
    assert_eq!(all.by_category["Transport"], 50.0);
    assert_eq!(all.by_month["2026-01"], 150.0);
    assert_eq!(all.by_month["2026-02"], 25.0);
    assert_eq!(all.by_month["2025-12"], 10.0);

    let windows = [
        (None, None),
        (Some(day(2026, 1, 1)), None),
        (None, Some(day(2026, 1, 10))),
        (Some(day(2026, 1, 5)), Some(day(2026, 1, 10))),
        (Some(day(2027, 1, 1)), None),
    ];
    for (from, to) in windows {
        let analytics = ledger.analytics(&cancel, "u1", from, to).await.unwrap();
        let by_category: f64 = analytics.by_category.values().sum();
        let by_month: f64 = analytics.by_month.values().sum();
        assert_eq!(analytics.total_amount, by_category);
        assert_eq!(analytics.total_amount, by_month);
    }

    let jan = ledger
        .analytics(&cancel, "u1", Some(day(2026, 1, 5)), Some(day(2026, 1, 10)))
        .await
        .unwrap();
    assert_eq!(jan.total_amount, 150.0);

    let empty = ledger
        .analytics(&cancel, "u1", Some(day(2027, 1, 1)), None)
        .await
        .unwrap();
    assert_eq!(empty.total_amount, 0.0);
    assert!(empty.by_category.is_empty());
    assert!(empty.by_month.is_empty());
}

#[tokio::test]
async fn dashboard_snapshot_uses_analytics_and_recent_list() {
    let (ledger, _store) = ledger_with_store();
    let cancel = CancellationToken::new();
    ledger
        .create(
            &cancel,
            "u1",
            ExpenseInput::new(120.0, "Groceries", day(2026, 2, 1)).description("Weekly grocery"),
        )
        .await
        .unwrap();
    ledger
        .create(&cancel, "u1", ExpenseInput::new(30.0, "Transport", day(2026, 2, 2)))
        .await
        .unwrap();

    let snapshot = ledger.dashboard_snapshot(&cancel, "u1").await.unwrap();
    assert_eq!(snapshot.overall_label, "Overall, you are owed");
    assert_eq!(snapshot.overall_amount_text, "INR 150.00");
    assert_eq!(snapshot.group_items.len(), 2);
    assert_eq!(snapshot.group_items[0].title, "Groceries");
    assert_eq!(snapshot.activity_items[0].title, "Expense in Transport");
    assert_eq!(snapshot.activity_items[1].title, "Weekly grocery");
    assert_eq!(snapshot.account_email, "u1@local");
}

#[tokio::test]
async fn cancelled_operations_have_no_effect() {
    let (ledger, store) = ledger_with_store();
    let live = CancellationToken::new();
    ledger
        .create(&live, "u1", ExpenseInput::new(5.0, "Food", day(2026, 1, 1)))
        .await
        .unwrap();

    let cancelled = CancellationToken::new();
    cancelled.cancel();

    let err = ledger
        .create(&cancelled, "u1", ExpenseInput::new(7.0, "Food", day(2026, 1, 2)))
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::Cancelled);

    let err = ledger
        .update(&cancelled, "u1", "e1", ExpenseInput::new(9.0, "Food", day(2026, 1, 3)))
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::Cancelled);

    assert_eq!(ledger.delete(&cancelled, "u1", "e1").await, Err(LedgerError::Cancelled));
    assert_eq!(
        ledger.list(&cancelled, "u1", &ListFilter::default()).await,
        Err(LedgerError::Cancelled)
    );
    assert_eq!(
        ledger.analytics(&cancelled, "u1", None, None).await,
        Err(LedgerError::Cancelled)
    );

    let remaining = store.list_by_owner(&live, "u1").await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].amount, 5.0);
}

#[tokio::test]
async fn concurrent_creates_are_all_stored() {
    let ledger = Arc::new(Ledger::builder().build());
    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..32u32 {
        let ledger = ledger.clone();
        tasks.spawn(async move {
            let cancel = CancellationToken::new();
            ledger
                .create(&cancel, "u1", ExpenseInput::new(f64::from(i + 1), "Food", day(2026, 1, 1)))
                .await
        });
    }
    while let Some(result) = tasks.join_next().await {
        result.unwrap().unwrap();
    }

    let cancel = CancellationToken::new();
    let analytics = ledger.analytics(&cancel, "u1", None, None).await.unwrap();
    assert_eq!(analytics.total_amount, 528.0);
    let items = ledger
        .list(&cancel, "u1", &ListFilter::default().page(1, 100))
        .await
        .unwrap();
    assert_eq!(items.len(), 32);
}
