// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mentor dashboard. Static content only.

use super::{
    header, CourseCard, CourseGrid, DashboardView, Panel, StudentRoster, StudentRow, TabBar,
    TaskCard, TaskQueue,
};
use crate::error::{AppError, Result};
use crate::models::Session;

pub const TABS: &[(&str, &str)] = &[
    ("my-courses", "📚 Мои курсы"),
    ("students", "👥 Студенты"),
    ("check-tasks", "📝 Проверка заданий"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MentorTab {
    #[default]
    MyCourses,
    Students,
    CheckTasks,
}

impl MentorTab {
    pub fn parse(tab: Option<&str>) -> Result<Self> {
        match tab {
            None => Ok(Self::default()),
            Some("my-courses") => Ok(Self::MyCourses),
            Some("students") => Ok(Self::Students),
            Some("check-tasks") => Ok(Self::CheckTasks),
            Some(other) => Err(AppError::BadRequest(format!("Unknown mentor tab: {}", other))),
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::MyCourses => "my-courses",
            Self::Students => "students",
            Self::CheckTasks => "check-tasks",
        }
    }
}

fn my_courses_panel() -> Panel {
    let card = |icon: &str, title: &str, students: &str, pending: &str| CourseCard {
        icon: icon.to_string(),
        title: title.to_string(),
        description: "Курс под вашим руководством".to_string(),
        badge: Some("Активен".to_string()),
        facts: vec![format!("👥 {}", students), format!("📝 {}", pending)],
        progress: None,
        action_label: "Открыть курс".to_string(),
    };

    Panel::Courses(CourseGrid {
        title: Some("📚 Мои курсы".to_string()),
        create_label: None,
        cards: vec![
            card("💻", "JavaScript Basics", "8 студентов", "1 задание на проверке"),
            card("🎨", "UI/UX Design", "4 студента", "нет заданий на проверке"),
        ],
    })
}

fn students_panel() -> Panel {
    let row = |student: &str, course: &str, progress: u8| StudentRow {
        student: student.to_string(),
        course: course.to_string(),
        progress,
        action_label: "Просмотр".to_string(),
    };

    Panel::Students(StudentRoster {
        title: "👥 Мои студенты".to_string(),
        rows: vec![
            row("Алексей Петров", "JavaScript Basics", 65),
            row("Мария Сидорова", "UI/UX Design", 90),
        ],
    })
}

fn check_tasks_panel() -> Panel {
    Panel::Tasks(TaskQueue {
        title: "📝 Задания на проверке".to_string(),
        tasks: vec![TaskCard {
            title: "Задание: Создать калькулятор".to_string(),
            student: "Алексей Петров".to_string(),
            course: "JavaScript Basics".to_string(),
            submitted: "2 часа назад".to_string(),
            action_label: "Проверить".to_string(),
        }],
    })
}

pub fn render(session: &Session, tab: MentorTab) -> DashboardView {
    let panel = match tab {
        MentorTab::MyCourses => my_courses_panel(),
        MentorTab::Students => students_panel(),
        MentorTab::CheckTasks => check_tasks_panel(),
    };

    DashboardView {
        role: session.role.as_str().to_string(),
        title: "🧑‍🏫 Панель наставника".to_string(),
        header: header(session),
        stats: Vec::new(),
        tabs: Some(TabBar::new(TABS, tab.id())),
        panel,
    }
}
