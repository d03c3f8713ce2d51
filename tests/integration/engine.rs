//! Engine integration tests: scheduling, firing, and cache behavior,
//! driven through the handle with mock providers.

use covdash::core::types::Category;
use covdash::providers::FetchError;
use covdash::scheduler::EngineError;
use covdash::testing::article;

use crate::common::TestContext;

#[tokio::test]
async fn test_startup_populates_both_caches() {
    let ctx = TestContext::healthy();
    let (handle, _task) = ctx.start().await;

    let snapshot = handle.snapshot().await.unwrap();

    let local = snapshot.covid.local.report().expect("local data ready");
    assert_eq!(local.area_name, "Exeter");
    assert_eq!(local.weekly_cases, 280);
    assert_eq!(local.daily_rate, 40);

    let national = snapshot.covid.national.report().expect("national data ready");
    assert_eq!(national.hospital_cases, Some(500));
    assert_eq!(national.total_deaths, Some(1000));

    let titles: Vec<&str> = snapshot.news.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "second", "third", "fourth"]);
    assert!(snapshot.news_error.is_none());

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_one_shot_schedule_fires_and_retires() {
    let ctx = TestContext::healthy();
    let (handle, _task) = ctx.start().await;
    // Startup refreshes finish before the first command is answered.
    handle.snapshot().await.unwrap();
    let calls_after_startup = ctx.data.call_count();

    let entry = handle
        .submit_schedule("0", "soon", false, Category::Covid)
        .await
        .unwrap();
    assert_eq!(entry.title, "covid update: soon");
    assert_eq!(entry.content, "in 0 seconds");

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.schedules.len(), 1);

    // The due action fires on the next poll, then the one-shot retires.
    let snapshot = handle.poll().await.unwrap();
    assert!(snapshot.schedules.is_empty());
    assert_eq!(ctx.data.call_count(), calls_after_startup + 2);
    assert!(ctx.config.snapshot().schedules.is_empty());

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_repeating_schedule_survives_fire_and_rearms() {
    let ctx = TestContext::healthy();
    let (handle, _task) = ctx.start().await;
    handle.snapshot().await.unwrap();
    let news_calls_after_startup = ctx.news.call_count();

    handle
        .submit_schedule("", "daily", true, Category::News)
        .await
        .unwrap();

    let snapshot = handle.poll().await.unwrap();
    assert_eq!(ctx.news.call_count(), news_calls_after_startup + 1);
    assert_eq!(snapshot.schedules.len(), 1, "repeating entry stays listed");
    assert_eq!(ctx.config.snapshot().schedules.len(), 1);

    // Re-armed for tomorrow: another poll in the same window runs nothing.
    handle.poll().await.unwrap();
    assert_eq!(ctx.news.call_count(), news_calls_after_startup + 1);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_identical_labels_get_numbered_suffixes() {
    let ctx = TestContext::healthy();
    let (handle, _task) = ctx.start().await;

    let first = handle
        .submit_schedule("3600", "morning", false, Category::Covid)
        .await
        .unwrap();
    let second = handle
        .submit_schedule("3600", "morning", false, Category::Covid)
        .await
        .unwrap();

    assert_eq!(first.name, "morning");
    assert_eq!(second.name, "morning(1)");
    assert_eq!(second.title, "covid update: morning(1)");

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_invalid_time_spec_creates_no_state() {
    let ctx = TestContext::healthy();
    let (handle, _task) = ctx.start().await;

    let result = handle
        .submit_schedule("lunchtime", "bad", false, Category::Covid)
        .await;
    assert!(matches!(result, Err(EngineError::InvalidTimeSpec(_))));

    let snapshot = handle.snapshot().await.unwrap();
    assert!(snapshot.schedules.is_empty());
    assert!(ctx.config.snapshot().schedules.is_empty());

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_cancel_schedule_removes_entry_and_persists() {
    let ctx = TestContext::healthy();
    let (handle, _task) = ctx.start().await;

    let entry = handle
        .submit_schedule("3600", "later", false, Category::News)
        .await
        .unwrap();
    assert_eq!(ctx.config.snapshot().schedules.len(), 1);

    handle.cancel_schedule(entry.title.clone()).await.unwrap();

    let snapshot = handle.snapshot().await.unwrap();
    assert!(snapshot.schedules.is_empty());
    assert!(ctx.config.snapshot().schedules.is_empty());

    // Cancelling again reports the entry as unknown.
    let result = handle.cancel_schedule(entry.title).await;
    assert!(matches!(result, Err(EngineError::ScheduleNotFound(_))));

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_covid_halves_fail_independently() {
    let ctx = TestContext::healthy();
    ctx.data.set_response(
        "Exeter",
        "ltla",
        Err(FetchError::NoConnection("refused".to_string())),
    );
    let (handle, _task) = ctx.start().await;

    let snapshot = handle.snapshot().await.unwrap();
    assert!(!snapshot.covid.local.is_ready());
    assert!(
        snapshot.covid.national.is_ready(),
        "national half must survive a local failure"
    );

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_news_failure_keeps_error_until_a_poll_recovers() {
    let ctx = TestContext::healthy();
    ctx.news
        .set_response(Err(FetchError::NoConnection("down".to_string())));
    let (handle, _task) = ctx.start().await;

    let snapshot = handle.snapshot().await.unwrap();
    assert!(snapshot.news_error.is_some());
    assert!(snapshot.news.is_empty());

    // Provider comes back; the next poll retries and clears the error.
    ctx.news.set_response(Ok(vec![article("recovered")]));
    let snapshot = handle.poll().await.unwrap();
    assert!(snapshot.news_error.is_none());
    assert_eq!(snapshot.news.len(), 1);
    assert_eq!(snapshot.news[0].title, "recovered");

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_close_article_blacklists_and_refills() {
    let ctx = TestContext::healthy();
    let (handle, _task) = ctx.start().await;

    let blacklist = handle.close_article("second").await.unwrap();
    assert_eq!(blacklist, vec!["second".to_string()]);

    let snapshot = handle.snapshot().await.unwrap();
    let titles: Vec<&str> = snapshot.news.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "third", "fourth", "fifth"]);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_closed_article_stays_hidden_across_refreshes() {
    let ctx = TestContext::healthy();
    let (handle, _task) = ctx.start().await;

    handle.close_article("first").await.unwrap();
    handle
        .submit_schedule("0", "again", false, Category::News)
        .await
        .unwrap();
    let snapshot = handle.poll().await.unwrap();

    assert!(
        snapshot.news.iter().all(|a| a.title != "first"),
        "blacklisted title reappeared after a scheduled refresh"
    );

    handle.shutdown().await.unwrap();
}
