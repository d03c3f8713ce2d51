//! Persistence integration tests: schedules survive a restart through the
//! config document, with delays re-derived from the stored description.

use covdash::config::ConfigDoc;
use covdash::core::types::Category;
use covdash::scheduler::ScheduleEntry;

use crate::common::TestContext;

fn record(title: &str, content: &str, name: &str, category: Category, repeat: bool) -> ScheduleEntry {
    ScheduleEntry {
        title: title.to_string(),
        content: content.to_string(),
        name: name.to_string(),
        category,
        repeat,
    }
}

#[tokio::test]
async fn test_submitted_schedule_round_trips_through_config() {
    let ctx = TestContext::healthy();
    let (handle, _task) = ctx.start().await;

    handle
        .submit_schedule("10:30", "morning", true, Category::Covid)
        .await
        .unwrap();
    handle.shutdown().await.unwrap();

    let persisted = ctx.config.snapshot();
    assert_eq!(persisted.schedules.len(), 1);
    let stored = &persisted.schedules[0];
    assert_eq!(stored.title, "covid update: morning");
    assert_eq!(stored.content, "at 10:30");
    assert_eq!(stored.name, "morning");
    assert_eq!(stored.category, Category::Covid);
    assert!(stored.repeat);

    // A fresh engine over the same document reinstates the entry verbatim.
    let restarted = TestContext::healthy().with_doc(persisted);
    let (handle, _task) = restarted.start().await;
    let snapshot = handle.snapshot().await.unwrap();

    assert_eq!(snapshot.schedules.len(), 1);
    assert_eq!(snapshot.schedules[0].title, "covid update: morning");
    assert_eq!(snapshot.schedules[0].category, Category::Covid);
    assert!(snapshot.schedules[0].repeat);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_numeric_delay_form_round_trips_exactly() {
    let ctx = TestContext::healthy();
    let (handle, _task) = ctx.start().await;

    handle
        .submit_schedule("90", "soon", false, Category::News)
        .await
        .unwrap();
    handle.shutdown().await.unwrap();

    let persisted = ctx.config.snapshot();
    assert_eq!(persisted.schedules[0].content, "in 90 seconds");

    let restarted = TestContext::healthy().with_doc(persisted);
    let (handle, _task) = restarted.start().await;
    handle.shutdown().await.unwrap();

    assert_eq!(
        restarted.config.snapshot().schedules[0].content,
        "in 90 seconds"
    );
}

#[tokio::test]
async fn test_restored_zero_delay_schedule_fires_on_first_poll() {
    let doc = ConfigDoc {
        schedules: vec![record(
            "covid update: boot",
            "in 0 seconds",
            "boot",
            Category::Covid,
            false,
        )],
        ..Default::default()
    };
    let ctx = TestContext::healthy().with_doc(doc);
    let (handle, _task) = ctx.start().await;
    // Startup refreshes finish before the first command is answered.
    handle.snapshot().await.unwrap();
    let calls_after_startup = ctx.data.call_count();

    let snapshot = handle.poll().await.unwrap();

    assert_eq!(ctx.data.call_count(), calls_after_startup + 2);
    assert!(snapshot.schedules.is_empty(), "fired one-shot must retire");
    assert!(ctx.config.snapshot().schedules.is_empty());

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unreadable_stored_description_is_dropped() {
    let doc = ConfigDoc {
        schedules: vec![
            record(
                "covid update: broken",
                "whenever",
                "broken",
                Category::Covid,
                false,
            ),
            record(
                "news update: fine",
                "at 18:00",
                "fine",
                Category::News,
                true,
            ),
        ],
        ..Default::default()
    };
    let ctx = TestContext::healthy().with_doc(doc);
    let (handle, _task) = ctx.start().await;

    let snapshot = handle.snapshot().await.unwrap();
    let titles: Vec<&str> = snapshot
        .schedules
        .iter()
        .map(|e| e.title.as_str())
        .collect();
    assert_eq!(titles, vec!["news update: fine"]);

    // The cleaned list is written back.
    assert_eq!(ctx.config.snapshot().schedules.len(), 1);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_duplicate_stored_titles_keep_first() {
    let doc = ConfigDoc {
        schedules: vec![
            record(
                "covid update: twice",
                "at 09:00",
                "twice",
                Category::Covid,
                true,
            ),
            record(
                "covid update: twice",
                "at 21:00",
                "twice",
                Category::Covid,
                false,
            ),
        ],
        ..Default::default()
    };
    let ctx = TestContext::healthy().with_doc(doc);
    let (handle, _task) = ctx.start().await;

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.schedules.len(), 1);
    assert_eq!(snapshot.schedules[0].content, "at 09:00");

    handle.shutdown().await.unwrap();
}
