// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard view-models.
//!
//! Every renderer is a function from typed data to a serializable UI tree;
//! the client draws whatever it receives.

pub mod admin;
pub mod intern;
pub mod mentor;
pub mod modal;
pub mod router;

pub use modal::Modal;
pub use router::{dispatch, mount, Dashboard};

use crate::models::{Session, UserProfile};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One entry of a tab bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Tab {
    pub id: String,
    pub label: String,
    pub active: bool,
}

/// Mutually exclusive tabs; exactly one is active.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TabBar {
    pub tabs: Vec<Tab>,
}

impl TabBar {
    /// Build from `(id, label)` pairs with `active` selected.
    pub fn new(defs: &[(&str, &str)], active: &str) -> Self {
        let mut bar = Self {
            tabs: defs
                .iter()
                .map(|(id, label)| Tab {
                    id: id.to_string(),
                    label: label.to_string(),
                    active: false,
                })
                .collect(),
        };
        if !bar.activate(active) {
            if let Some(first) = bar.tabs.first_mut() {
                first.active = true;
            }
        }
        bar
    }

    /// Clear every tab, then mark `id` active. Returns false for an unknown id
    /// and leaves the bar untouched.
    pub fn activate(&mut self, id: &str) -> bool {
        if !self.tabs.iter().any(|tab| tab.id == id) {
            return false;
        }
        for tab in &mut self.tabs {
            tab.active = tab.id == id;
        }
        true
    }

    pub fn active(&self) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.active)
    }
}

/// Header shown above every dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HeaderView {
    pub user_label: String,
}

/// Summary card on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StatCard {
    pub id: String,
    pub label: String,
    pub value: String,
}

/// A mounted dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardView {
    pub role: String,
    pub title: String,
    pub header: HeaderView,
    pub stats: Vec<StatCard>,
    /// `None` when nothing interactive is mounted (unknown role).
    pub tabs: Option<TabBar>,
    pub panel: Panel,
}

impl DashboardView {
    pub fn active_tab(&self) -> Option<&str> {
        self.tabs
            .as_ref()
            .and_then(|bar| bar.active())
            .map(|tab| tab.id.as_str())
    }
}

// ─── Panels ──────────────────────────────────────────────────

/// Body of the active tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Panel {
    Users(UsersTable),
    Courses(CourseGrid),
    Analytics(AnalyticsPanel),
    Settings(SettingsPanel),
    Students(StudentRoster),
    Tasks(TaskQueue),
    Achievements(AchievementGrid),
    History(HistoryTimeline),
    Notice(Notice),
}

/// Static message with no interaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Notice {
    pub title: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum RowActionKind {
    Edit,
    ToggleBlock,
    Delete,
}

/// Button on a users-table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RowAction {
    pub kind: RowActionKind,
    pub label: String,
    pub danger: bool,
    /// Prompt the client must confirm before sending the action.
    pub confirm: Option<String>,
    /// Value to write for `toggle_block`.
    pub target_blocked: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StatusBadge {
    pub blocked: bool,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role_label: String,
    pub status: StatusBadge,
    pub actions: Vec<RowAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UsersTable {
    pub add_user_label: String,
    pub search_placeholder: String,
    pub columns: Vec<String>,
    pub rows: Vec<UserRow>,
    /// Shown instead of rows when there are none.
    pub empty_message: Option<String>,
    /// Shown instead of rows when the load failed.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CourseCard {
    pub icon: String,
    pub title: String,
    pub description: String,
    pub badge: Option<String>,
    pub facts: Vec<String>,
    /// Completion percentage, for course cards that track progress.
    pub progress: Option<u8>,
    pub action_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CourseGrid {
    pub title: Option<String>,
    pub create_label: Option<String>,
    pub cards: Vec<CourseCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AnalyticsPanel {
    pub title: String,
    pub summary: Vec<StatCard>,
    pub facts: Vec<StatCard>,
    pub top_courses: Vec<String>,
    pub export_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SettingField {
    pub label: String,
    pub value: Option<String>,
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SettingsSection {
    pub title: String,
    pub fields: Vec<SettingField>,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SettingsPanel {
    pub title: String,
    pub sections: Vec<SettingsSection>,
    pub save_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StudentRow {
    pub student: String,
    pub course: String,
    pub progress: u8,
    pub action_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StudentRoster {
    pub title: String,
    pub rows: Vec<StudentRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TaskCard {
    pub title: String,
    pub student: String,
    pub course: String,
    pub submitted: String,
    pub action_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TaskQueue {
    pub title: String,
    pub tasks: Vec<TaskCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Achievement {
    pub icon: String,
    pub title: String,
    pub description: String,
    pub earned: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AchievementGrid {
    pub title: String,
    pub items: Vec<Achievement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HistoryItem {
    pub date: String,
    pub title: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HistoryTimeline {
    pub title: String,
    pub items: Vec<HistoryItem>,
}

// ─── Session ─────────────────────────────────────────────────

/// Session as exposed to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionView {
    pub uid: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub blocked: bool,
    pub label: String,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            uid: session.uid.clone(),
            email: session.email.clone(),
            name: session.name.clone(),
            role: session.role.as_str().to_string(),
            blocked: session.blocked,
            label: session.display_label(),
        }
    }
}

fn header(session: &Session) -> HeaderView {
    HeaderView {
        user_label: session.display_label(),
    }
}

fn status_badge(user: &UserProfile) -> StatusBadge {
    StatusBadge {
        blocked: user.blocked,
        label: user.status_label().to_string(),
    }
}
