//! Dashboard engine implementation.
//!
//! The engine is responsible for:
//! - Draining due refresh actions when the page driver polls
//! - Running covid and news refreshes, scheduled or immediate
//! - Re-arming repeating schedules and retiring one-shots
//! - Keeping the schedule registry and persisted config in sync
//! - Retrying failed fetches on each poll
//! - Event emission
//!
//! All mutable state lives in one task; the queue only advances when a
//! driver issues a poll, so the cooperative single-driver model holds even
//! though the surrounding runtime is multi-threaded.

use std::sync::Arc;

use chrono::{Local, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::ConfigStore;
use crate::core::clock::TimeSpec;
use crate::core::naming::allocate_label;
use crate::core::types::{Category, DAY_SECONDS};
use crate::covid::{self, CovidSnapshot, RegionStats};
use crate::events::{Event, EventBus};
use crate::news::{self, NewsWindow};
use crate::providers::{DataProvider, NewsProvider};

use super::handle::{DashboardHandle, COMMAND_CHANNEL_BUFFER};
use super::queue::{DelayQueue, QueuedAction};
use super::registry::{ScheduleEntry, ScheduleRegistry};
use super::types::{DashboardSnapshot, EngineCommand, EngineError};

/// Default news search terms, one request per word.
const DEFAULT_SEARCH_TERMS: &str = "Covid COVID-19 coronavirus";
/// Default country for headline requests.
const DEFAULT_COUNTRY: &str = "gb";
/// Default language for headline requests.
const DEFAULT_LANGUAGE: &str = "en";

/// A re-arm request produced while dispatching a batch of due actions.
/// Applied only after the whole batch has been processed.
struct Rearm {
    kind: Category,
    key: String,
}

/// The dashboard engine: owns the delay queue, the schedule registry, and
/// both display caches.
pub struct Dashboard<C, D, N> {
    config: Arc<C>,
    data: Arc<D>,
    headlines: Arc<N>,
    event_bus: Arc<EventBus>,
    queue: DelayQueue,
    registry: ScheduleRegistry,
    covid: CovidSnapshot,
    window: NewsWindow,
    search_terms: Vec<String>,
    country: String,
    language: String,
}

impl<C, D, N> Dashboard<C, D, N>
where
    C: ConfigStore + 'static,
    D: DataProvider + 'static,
    N: NewsProvider + 'static,
{
    /// Create a new engine over the given config store and providers.
    pub fn new(config: C, data: D, headlines: N) -> Self {
        Self::with_shared(Arc::new(config), Arc::new(data), Arc::new(headlines))
    }

    /// Create a new engine over shared collaborators (for testing).
    pub fn with_shared(config: Arc<C>, data: Arc<D>, headlines: Arc<N>) -> Self {
        Self {
            config,
            data,
            headlines,
            event_bus: Arc::new(EventBus::new()),
            queue: DelayQueue::new(),
            registry: ScheduleRegistry::new(),
            covid: CovidSnapshot::new(),
            window: NewsWindow::new(),
            search_terms: DEFAULT_SEARCH_TERMS
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            country: DEFAULT_COUNTRY.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Set the event bus.
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Arc::new(event_bus);
        self
    }

    /// Set the news search terms.
    pub fn with_search_terms(mut self, terms: impl IntoIterator<Item = String>) -> Self {
        self.search_terms = terms.into_iter().collect();
        self
    }

    /// Set the news country and language.
    pub fn with_news_locale(mut self, country: impl Into<String>, language: impl Into<String>) -> Self {
        self.country = country.into();
        self.language = language.into();
        self
    }

    /// Restore persisted schedules, run the initial refreshes, and start
    /// the engine task. Returns a handle for driving it.
    pub async fn start(mut self) -> (DashboardHandle, JoinHandle<()>) {
        self.restore_schedules().await;

        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_BUFFER);
        let handle = DashboardHandle { command_tx };

        let engine_task = tokio::spawn(async move {
            self.refresh_covid(None).await;
            self.refresh_news(None).await;
            self.run(command_rx).await;
        });

        (handle, engine_task)
    }

    /// Main engine loop: commands in, state changes out.
    async fn run(mut self, mut command_rx: mpsc::Receiver<EngineCommand>) {
        while let Some(command) = command_rx.recv().await {
            match command {
                EngineCommand::Poll { response } => {
                    self.poll().await;
                    let _ = response.send(self.render_snapshot());
                }
                EngineCommand::Snapshot { response } => {
                    let _ = response.send(self.render_snapshot());
                }
                EngineCommand::SubmitSchedule {
                    time,
                    label,
                    repeat,
                    category,
                    response,
                } => {
                    let result = self.submit_schedule(&time, &label, repeat, category).await;
                    let _ = response.send(result);
                }
                EngineCommand::CancelSchedule { title, response } => {
                    let result = self.cancel_schedule(&title).await;
                    let _ = response.send(result);
                }
                EngineCommand::CloseArticle { title, response } => {
                    let _ = response.send(self.window.close_article(&title));
                }
                EngineCommand::Shutdown { response } => {
                    let _ = response.send(());
                    break;
                }
            }
        }
    }

    /// Rebuild the queue and registry from the persisted schedule records,
    /// re-deriving each delay from the record's content string. Records
    /// that fail to parse are logged and dropped.
    async fn restore_schedules(&mut self) {
        let doc = self.config.load_or_reset().await;
        let now = Utc::now();
        let local_now = Local::now().time();

        for record in doc.schedules {
            if self.registry.contains(&record.title) {
                tracing::warn!(title = %record.title, "duplicate persisted schedule skipped");
                continue;
            }
            match TimeSpec::from_content(&record.content) {
                Ok(spec) => {
                    let delay = spec.delay_seconds(local_now);
                    tracing::info!(
                        title = %record.title,
                        delay_seconds = delay,
                        "restored persisted schedule"
                    );
                    self.queue.enter(now, delay, record.category, &record.title);
                    self.registry.add(record);
                }
                Err(e) => {
                    tracing::warn!(
                        title = %record.title,
                        error = %e,
                        "dropping persisted schedule with unreadable time description"
                    );
                }
            }
        }

        self.persist_schedules().await;
    }

    /// Drain and dispatch every currently-due action, then retry any cache
    /// that is unpopulated or in an error state (the page-loop recovery
    /// behavior).
    async fn poll(&mut self) {
        let due = self.queue.run_due(Utc::now());
        let mut rearms = Vec::new();

        for action in due {
            tracing::info!(title = %action.key, category = %action.kind, "running scheduled update");
            if let Some(rearm) = self.dispatch(action).await {
                rearms.push(rearm);
            }
        }

        // Re-arms are applied after the whole batch so they become eligible
        // only on a later poll.
        let now = Utc::now();
        for rearm in rearms {
            self.queue.enter(now, DAY_SECONDS, rearm.kind, &rearm.key);
            self.event_bus.emit(Event::schedule_rearmed(&rearm.key)).await;
        }

        self.retry_failed().await;
    }

    /// Run the refresh a due action names. Returns a re-arm request when
    /// the owning entry repeats daily.
    async fn dispatch(&mut self, action: QueuedAction) -> Option<Rearm> {
        match action.kind {
            Category::Covid => self.refresh_covid(Some(action.key)).await,
            Category::News => self.refresh_news(Some(action.key)).await,
        }
    }

    /// Fetch covid statistics for the configured local and national areas
    /// and replace the snapshot wholesale. The two fetches fail
    /// independently; a failed half carries an error marker while the other
    /// may still be fresh. When scheduler-invoked (`fired` set), the owning
    /// entry is re-armed or retired afterwards.
    async fn refresh_covid(&mut self, fired: Option<String>) -> Option<Rearm> {
        self.event_bus.emit(Event::refresh_started(Category::Covid)).await;

        let location = self.location().await;
        let (local_name, local_type) = location.local;
        let local = self.fetch_region(&local_name, &local_type).await;
        let national = self
            .fetch_region(&location.nation.0, &location.nation.1)
            .await;

        let success = local.is_ready() && national.is_ready();
        self.covid.update(local, national);

        self.event_bus
            .emit(Event::refresh_completed(Category::Covid, success))
            .await;

        match fired {
            Some(key) => self.on_fire(&key).await,
            None => None,
        }
    }

    /// Fetch one region's series and reduce it to display statistics.
    async fn fetch_region(&self, area_name: &str, area_type: &str) -> RegionStats {
        match self.data.fetch_series(area_name, area_type).await {
            Ok(series) => match covid::region_report(&series) {
                Ok(report) => RegionStats::Ready(report),
                Err(e) => {
                    tracing::warn!(area = %area_name, error = %e, "covid series unusable");
                    RegionStats::Failed {
                        error: e.to_string(),
                    }
                }
            },
            Err(e) => {
                tracing::warn!(area = %area_name, error = %e, "covid data fetch failed");
                RegionStats::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Fetch fresh headlines and rebuild the news window. On failure the
    /// window keeps its previous articles and records the error. When
    /// scheduler-invoked, the owning entry is re-armed or retired.
    async fn refresh_news(&mut self, fired: Option<String>) -> Option<Rearm> {
        self.event_bus.emit(Event::refresh_started(Category::News)).await;

        let success = match self
            .headlines
            .fetch_headlines(&self.search_terms, &self.country, &self.language)
            .await
        {
            Ok(articles) => {
                let articles = news::dedup_articles(articles);
                tracing::debug!(count = articles.len(), "news refresh fetched articles");
                self.window.replace(articles);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "news fetch failed");
                self.window.mark_error(e.to_string());
                false
            }
        };

        self.event_bus
            .emit(Event::refresh_completed(Category::News, success))
            .await;

        match fired {
            Some(key) => self.on_fire(&key).await,
            None => None,
        }
    }

    /// Decide a fired entry's fate: repeating entries stay in the registry
    /// and are re-armed for the next day by the caller; one-shots retire.
    /// The schedule list is persisted either way.
    async fn on_fire(&mut self, key: &str) -> Option<Rearm> {
        let entry = self.registry.get(key).map(|e| (e.repeat, e.category));
        let rearm = match entry {
            Some((true, kind)) => Some(Rearm {
                kind,
                key: key.to_string(),
            }),
            Some((false, _)) => {
                self.registry.remove(key);
                tracing::info!(title = %key, "one-shot schedule retired");
                self.event_bus.emit(Event::schedule_removed(key)).await;
                None
            }
            None => {
                tracing::warn!(title = %key, "fired schedule missing from registry");
                None
            }
        };

        self.persist_schedules().await;
        rearm
    }

    /// Retry any refresh whose cache is unpopulated or errored. Runs on
    /// every poll, so transient provider failures heal as long as the page
    /// keeps being loaded.
    async fn retry_failed(&mut self) {
        if self.covid.needs_refresh() {
            tracing::warn!("covid snapshot incomplete, retrying fetch");
            self.refresh_covid(None).await;
        }
        if self.window.last_error().is_some() {
            tracing::warn!("news cache in error state, retrying fetch");
            self.refresh_news(None).await;
        }
    }

    /// Create a schedule entry: parse the time, allocate a unique label,
    /// queue the action, register the entry, and persist. A rejected time
    /// or exhausted label leaves no partial state behind.
    async fn submit_schedule(
        &mut self,
        time: &str,
        label: &str,
        repeat: bool,
        category: Category,
    ) -> Result<ScheduleEntry, EngineError> {
        let spec = TimeSpec::parse(time)?;
        let delay = spec.delay_seconds(Local::now().time());

        let titles = self.registry.titles();
        let Some(allocated) = allocate_label(label, category, &titles) else {
            return Err(EngineError::LabelExhausted(label.to_string()));
        };

        self.queue
            .enter(Utc::now(), delay, category, &allocated.title);

        let entry = ScheduleEntry {
            title: allocated.title,
            content: spec.content(),
            name: allocated.name,
            category,
            repeat,
        };
        tracing::info!(
            title = %entry.title,
            content = %entry.content,
            repeat,
            delay_seconds = delay,
            "schedule added"
        );
        self.registry.add(entry.clone());
        self.persist_schedules().await;
        self.event_bus.emit(Event::schedule_added(&entry.title)).await;

        Ok(entry)
    }

    /// Remove a schedule entry and cancel its queued action. Both removals
    /// happen before this returns; the queue-side cancel may be a no-op if
    /// the action already fired.
    async fn cancel_schedule(&mut self, title: &str) -> Result<(), EngineError> {
        if self.registry.remove(title).is_none() {
            return Err(EngineError::ScheduleNotFound(title.to_string()));
        }
        if !self.queue.cancel(title) {
            tracing::debug!(title, "no pending action to cancel, likely already fired");
        }
        self.persist_schedules().await;
        self.event_bus.emit(Event::schedule_removed(title)).await;
        Ok(())
    }

    /// Write the current schedule list back to the config document.
    async fn persist_schedules(&self) {
        if let Err(e) = self.config.update_schedules(self.registry.entries()).await {
            tracing::warn!(error = %e, "failed to persist schedules");
        }
    }

    /// Resolve the fetch locations from config, falling back to defaults
    /// when the document is unreadable.
    async fn location(&self) -> crate::config::ResolvedLocation {
        match self.config.load().await {
            Ok(doc) => doc.location.resolve(),
            Err(e) => {
                tracing::warn!(error = %e, "config unreadable, using default locations");
                crate::config::LocationConfig::default().resolve()
            }
        }
    }

    fn render_snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            covid: self.covid.clone(),
            news: self.window.visible().to_vec(),
            news_error: self.window.last_error().map(str::to_string),
            schedules: self.registry.entries().to_vec(),
        }
    }
}
