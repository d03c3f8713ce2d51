//! Common test utilities shared across integration tests.

use std::sync::Arc;

use covdash::config::{ConfigDoc, InMemoryConfigStore};
use covdash::scheduler::{Dashboard, DashboardHandle};
use covdash::testing::{article, case_series, nation_series, MockDataProvider, MockNewsProvider};
use tokio::task::JoinHandle;

/// The canonical local series: a provisional leading day followed by one
/// full week, giving weekly cases 280 and a daily rate of 40.
pub const WEEK_SERIES: &[Option<i64>] = &[
    None,
    Some(10),
    Some(20),
    Some(30),
    Some(40),
    Some(50),
    Some(60),
    Some(70),
];

/// Collaborators handed to a test dashboard, kept so tests can reconfigure
/// providers and inspect persisted state after startup.
pub struct TestContext {
    pub config: Arc<InMemoryConfigStore>,
    pub data: Arc<MockDataProvider>,
    pub news: Arc<MockNewsProvider>,
}

impl TestContext {
    /// Providers preloaded with healthy default responses for the default
    /// areas and a five-article news feed.
    pub fn healthy() -> Self {
        let data = MockDataProvider::new();
        data.set_response("Exeter", "ltla", Ok(case_series("Exeter", WEEK_SERIES)));
        data.set_response(
            "england",
            "nation",
            Ok(nation_series("england", WEEK_SERIES, 500, 1000)),
        );

        let news = MockNewsProvider::new(vec![
            article("first"),
            article("second"),
            article("third"),
            article("fourth"),
            article("fifth"),
        ]);

        Self {
            config: Arc::new(InMemoryConfigStore::new()),
            data: Arc::new(data),
            news: Arc::new(news),
        }
    }

    /// Replace the seeded config document.
    pub fn with_doc(mut self, doc: ConfigDoc) -> Self {
        self.config = Arc::new(InMemoryConfigStore::with_doc(doc));
        self
    }

    /// Start a dashboard over these collaborators.
    pub async fn start(&self) -> (DashboardHandle, JoinHandle<()>) {
        Dashboard::with_shared(
            Arc::clone(&self.config),
            Arc::clone(&self.data),
            Arc::clone(&self.news),
        )
        .start()
        .await
    }
}
