//! services/dashboard/src/adapters/headless.rs
//!
//! Adapters for running the pages without a browser: dialogs that answer
//! from configuration and log through `tracing`, a navigator that records
//! where it was sent, and a page view that keeps every bound element in
//! memory so it can be printed or inspected.

use async_trait::async_trait;
use smartdoc_core::domain::Route;
use smartdoc_core::ports::{ConfirmPrompt, DialogService, Navigator, Notice, NoticeKind, PageView};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::sync::{Mutex, MutexGuard};
use tracing::{error, info};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

//=========================================================================================
// Dialogs
//=========================================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DialogEvent {
    Confirm { prompt: ConfirmPrompt, answer: bool },
    Notice(Notice),
    Progress { title: String, message: String },
}

/// Answers every confirmation with the same configured value.
#[derive(Debug, Default)]
pub struct HeadlessDialogs {
    assume_yes: bool,
    /// Set to wait out auto-closing notices like a browser would.
    honour_delays: bool,
    events: Mutex<Vec<DialogEvent>>,
}

impl HeadlessDialogs {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            ..Self::default()
        }
    }

    pub fn with_delays(mut self) -> Self {
        self.honour_delays = true;
        self
    }

    pub fn events(&self) -> Vec<DialogEvent> {
        lock(&self.events).clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        lock(&self.events)
            .iter()
            .filter_map(|event| match event {
                DialogEvent::Notice(notice) => Some(notice.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn confirmations(&self) -> usize {
        lock(&self.events)
            .iter()
            .filter(|event| matches!(event, DialogEvent::Confirm { .. }))
            .count()
    }
}

#[async_trait]
impl DialogService for HeadlessDialogs {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        info!("{} {} -> {}", prompt.title, prompt.text, self.assume_yes);
        lock(&self.events).push(DialogEvent::Confirm {
            prompt: prompt.clone(),
            answer: self.assume_yes,
        });
        self.assume_yes
    }

    async fn notify(&self, notice: &Notice) {
        match notice.kind {
            NoticeKind::Success => info!("{}: {}", notice.title, notice.text),
            NoticeKind::Error => error!("{}: {}", notice.title, notice.text),
        }
        lock(&self.events).push(DialogEvent::Notice(notice.clone()));
        if let (true, Some(delay)) = (self.honour_delays, notice.auto_close) {
            tokio::time::sleep(delay).await;
        }
    }

    fn show_progress(&self, title: &str, message: &str) {
        info!("{} {}", title, message);
        lock(&self.events).push(DialogEvent::Progress {
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}

//=========================================================================================
// Navigator
//=========================================================================================

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        lock(&self.routes).clone()
    }

    pub fn last(&self) -> Option<Route> {
        lock(&self.routes).last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        info!("Navigating to {}", route.path());
        lock(&self.routes).push(route);
    }
}

//=========================================================================================
// Page View
//=========================================================================================

#[derive(Debug, Default, Clone)]
struct Element {
    text: Option<String>,
    html: Option<String>,
    visible: Option<bool>,
    classes: BTreeSet<String>,
    styles: BTreeMap<String, String>,
    resets: usize,
}

/// Keeps the latest state of every element the page logic touched.
#[derive(Debug, Default)]
pub struct SnapshotView {
    elements: Mutex<BTreeMap<String, Element>>,
}

impl SnapshotView {
    fn with<R>(&self, id: &str, f: impl FnOnce(&mut Element) -> R) -> R {
        let mut elements = lock(&self.elements);
        f(elements.entry(id.to_string()).or_default())
    }

    fn read<R>(&self, id: &str, f: impl FnOnce(&Element) -> R) -> Option<R> {
        lock(&self.elements).get(id).map(f)
    }

    pub fn text(&self, id: &str) -> Option<String> {
        self.read(id, |e| e.text.clone()).flatten()
    }

    pub fn html(&self, id: &str) -> Option<String> {
        self.read(id, |e| e.html.clone()).flatten()
    }

    pub fn is_visible(&self, id: &str) -> Option<bool> {
        self.read(id, |e| e.visible).flatten()
    }

    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.read(id, |e| e.classes.contains(class)).unwrap_or(false)
    }

    pub fn style(&self, id: &str, property: &str) -> Option<String> {
        self.read(id, |e| e.styles.get(property).cloned()).flatten()
    }

    pub fn resets(&self, id: &str) -> usize {
        self.read(id, |e| e.resets).unwrap_or(0)
    }

    /// A plain-text dump of every bound element, in id order.
    pub fn render(&self) -> String {
        let elements = lock(&self.elements);
        let mut out = String::new();
        for (id, element) in elements.iter() {
            if let Some(text) = &element.text {
                let _ = writeln!(out, "#{} = {}", id, text);
            }
            if let Some(html) = &element.html {
                let _ = writeln!(out, "#{} html:\n{}", id, html.trim());
            }
            for (property, value) in &element.styles {
                let _ = writeln!(out, "#{} {}: {}", id, property, value);
            }
        }
        out
    }
}

impl PageView for SnapshotView {
    fn set_text(&self, element_id: &str, text: &str) {
        self.with(element_id, |e| e.text = Some(text.to_string()));
    }

    fn set_html(&self, element_id: &str, html: &str) {
        self.with(element_id, |e| e.html = Some(html.to_string()));
    }

    fn set_visible(&self, element_id: &str, visible: bool) {
        self.with(element_id, |e| e.visible = Some(visible));
    }

    fn set_class(&self, element_id: &str, class: &str, enabled: bool) {
        self.with(element_id, |e| {
            if enabled {
                e.classes.insert(class.to_string());
            } else {
                e.classes.remove(class);
            }
        });
    }

    fn set_style(&self, element_id: &str, property: &str, value: &str) {
        self.with(element_id, |e| {
            e.styles.insert(property.to_string(), value.to_string());
        });
    }

    fn reset_input(&self, element_id: &str) {
        self.with(element_id, |e| e.resets += 1);
    }
}
