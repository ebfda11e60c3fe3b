//! services/dashboard/src/web/nav.rs
//!
//! Section switching and the collapsible sidebar. Pure view state, no data.

use smartdoc_core::ports::PageView;
use std::sync::{Arc, Mutex};
use tracing::warn;

pub const ADMIN_SECTIONS: &[&str] = &["dashboard", "users", "documents", "analytics"];
pub const MEMBER_SECTIONS: &[&str] = &["dashboard", "documents"];

const SIDEBAR_ID: &str = "sidebar";

#[derive(Debug)]
struct NavState {
    active: &'static str,
    sidebar_collapsed: bool,
}

pub struct ViewController {
    view: Arc<dyn PageView>,
    sections: &'static [&'static str],
    state: Mutex<NavState>,
}

impl ViewController {
    /// The first section starts out active.
    pub fn new(view: Arc<dyn PageView>, sections: &'static [&'static str]) -> Self {
        Self {
            view,
            sections,
            state: Mutex::new(NavState {
                active: sections.first().copied().unwrap_or_default(),
                sidebar_collapsed: false,
            }),
        }
    }

    pub fn active_section(&self) -> &'static str {
        self.lock().active
    }

    /// Shows `name`, hides every other section and moves the active marker
    /// in the sidebar. Unknown names change nothing.
    pub fn show_section(&self, name: &str) -> bool {
        let Some(&target) = self.sections.iter().find(|s| **s == name) else {
            warn!("Ignoring request for unknown section '{}'", name);
            return false;
        };

        for section in self.sections {
            let selected = *section == target;
            self.view.set_visible(&format!("{}Section", section), selected);
            self.view.set_class(&format!("{}Link", section), "active", selected);
        }
        self.lock().active = target;
        true
    }

    /// Returns whether the sidebar is collapsed afterwards.
    pub fn toggle_sidebar(&self) -> bool {
        let collapsed = {
            let mut state = self.lock();
            state.sidebar_collapsed = !state.sidebar_collapsed;
            state.sidebar_collapsed
        };
        self.view.set_class(SIDEBAR_ID, "collapsed", collapsed);
        collapsed
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NavState> {
        // Each field is valid on its own, so a poisoned lock is still usable.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
