// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Intern dashboard. Static content only.

use super::{
    header, Achievement, AchievementGrid, CourseCard, CourseGrid, DashboardView, HistoryItem,
    HistoryTimeline, Panel, TabBar,
};
use crate::error::{AppError, Result};
use crate::models::Session;

pub const TABS: &[(&str, &str)] = &[
    ("courses", "📚 Мои курсы"),
    ("achievements", "🏆 Достижения"),
    ("history", "📜 История"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InternTab {
    #[default]
    Courses,
    Achievements,
    History,
}

impl InternTab {
    pub fn parse(tab: Option<&str>) -> Result<Self> {
        match tab {
            None => Ok(Self::default()),
            Some("courses") => Ok(Self::Courses),
            Some("achievements") => Ok(Self::Achievements),
            Some("history") => Ok(Self::History),
            Some(other) => Err(AppError::BadRequest(format!("Unknown intern tab: {}", other))),
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::Courses => "courses",
            Self::Achievements => "achievements",
            Self::History => "history",
        }
    }
}

fn courses_panel() -> Panel {
    let card = |icon: &str, title: &str, lessons: &str, progress: u8| CourseCard {
        icon: icon.to_string(),
        title: title.to_string(),
        description: format!("Пройдено {}%", progress),
        badge: None,
        facts: vec![format!("📚 {}", lessons)],
        progress: Some(progress),
        action_label: "Продолжить".to_string(),
    };

    Panel::Courses(CourseGrid {
        title: Some("📚 Мои курсы".to_string()),
        create_label: None,
        cards: vec![
            card("💻", "JavaScript Basics", "12 уроков", 65),
            card("🌿", "Git & GitHub", "6 уроков", 30),
        ],
    })
}

fn achievements_panel() -> Panel {
    let item = |icon: &str, title: &str, description: &str, earned: bool| Achievement {
        icon: icon.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        earned,
    };

    Panel::Achievements(AchievementGrid {
        title: "🏆 Мои достижения".to_string(),
        items: vec![
            item("🎯", "Первый курс", "Завершите первый курс", true),
            item("⭐", "Отличник", "Получите 90+ баллов", true),
            item("🔒", "Марафонец", "Завершите 5 курсов", false),
        ],
    })
}

fn history_panel() -> Panel {
    let item = |date: &str, title: &str, detail: &str| HistoryItem {
        date: date.to_string(),
        title: title.to_string(),
        detail: detail.to_string(),
    };

    Panel::History(HistoryTimeline {
        title: "📜 История обучения".to_string(),
        items: vec![
            item(
                "Сегодня",
                "Урок завершён: \"Переменные в JS\"",
                "JavaScript Basics",
            ),
            item("Вчера", "Тест пройден: \"HTML Основы\"", "Результат: 95/100 ⭐"),
        ],
    })
}

pub fn render(session: &Session, tab: InternTab) -> DashboardView {
    let panel = match tab {
        InternTab::Courses => courses_panel(),
        InternTab::Achievements => achievements_panel(),
        InternTab::History => history_panel(),
    };

    DashboardView {
        role: session.role.as_str().to_string(),
        title: "🧑‍💻 Панель стажёра".to_string(),
        header: header(session),
        stats: Vec::new(),
        tabs: Some(TabBar::new(TABS, tab.id())),
        panel,
    }
}
