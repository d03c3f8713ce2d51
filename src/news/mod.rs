//! News display cache: a four-article window, a backlog, and a blacklist.
//!
//! Invariant: no article whose title is blacklisted is ever visible, and
//! the window is refilled from the backlog up to four articles whenever it
//! has room.

use std::collections::{HashSet, VecDeque};

use crate::providers::Article;

/// Maximum number of articles shown at once.
pub const WINDOW_SIZE: usize = 4;

/// Rotating window of news articles with a user-maintained blacklist.
#[derive(Debug, Default)]
pub struct NewsWindow {
    visible: Vec<Article>,
    backlog: VecDeque<Article>,
    blacklist: HashSet<String>,
    last_error: Option<String>,
}

impl NewsWindow {
    /// Create an empty window.
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently visible articles, at most [`WINDOW_SIZE`].
    pub fn visible(&self) -> &[Article] {
        &self.visible
    }

    /// Error from the last failed refresh, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The blacklisted titles, sorted for stable output.
    pub fn blacklist(&self) -> Vec<String> {
        let mut titles: Vec<String> = self.blacklist.iter().cloned().collect();
        titles.sort();
        titles
    }

    /// Number of articles held in reserve.
    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    /// Replace the cache contents from a fresh fetch. The first four
    /// articles become visible, the rest are backlog, and the blacklist is
    /// applied immediately.
    pub fn replace(&mut self, articles: Vec<Article>) {
        let mut incoming: VecDeque<Article> = articles.into();
        self.visible.clear();
        while self.visible.len() < WINDOW_SIZE {
            match incoming.pop_front() {
                Some(article) => self.visible.push(article),
                None => break,
            }
        }
        self.backlog = incoming;
        self.last_error = None;
        self.refill_and_filter();
    }

    /// Record a failed refresh. The window keeps its previous contents so
    /// the page still shows the last-known-good articles.
    pub fn mark_error(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
    }

    /// Remove an article by title, blacklist the title, and refill the
    /// window. Returns the updated blacklist; the caller decides whether
    /// and when to persist it.
    pub fn close_article(&mut self, title: &str) -> Vec<String> {
        tracing::info!(title, "closing news article");
        self.visible.retain(|a| a.title != title);
        self.blacklist.insert(title.to_string());
        self.refill_and_filter();
        self.blacklist()
    }

    /// Drop blacklisted titles from the window and refill it from the
    /// backlog, repeating until the window is full or the backlog is
    /// exhausted. Refilled articles may themselves be blacklisted, hence
    /// the loop.
    pub fn refill_and_filter(&mut self) {
        loop {
            self.visible.retain(|a| !self.blacklist.contains(&a.title));
            if self.visible.len() >= WINDOW_SIZE || self.backlog.is_empty() {
                break;
            }
            while self.visible.len() < WINDOW_SIZE {
                match self.backlog.pop_front() {
                    Some(article) => self.visible.push(article),
                    None => break,
                }
            }
        }
    }
}

/// Drop exact duplicate articles, keeping the first occurrence.
pub fn dedup_articles(articles: Vec<Article>) -> Vec<Article> {
    let mut unique: Vec<Article> = Vec::with_capacity(articles.len());
    for article in articles {
        if !unique.contains(&article) {
            unique.push(article);
        }
    }
    unique
}
