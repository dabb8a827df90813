// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Administrator dashboard.

use super::{
    header, status_badge, AnalyticsPanel, CourseCard, CourseGrid, DashboardView, Panel,
    RowAction, RowActionKind, SettingField, SettingsPanel, SettingsSection, StatCard, TabBar,
    UserRow, UsersTable,
};
use crate::error::{AppError, Result};
use crate::models::{Session, UserProfile};
use crate::services::users::{AdminCounts, UsersService, PLACEHOLDER_AVERAGE_PROGRESS};

pub const TABS: &[(&str, &str)] = &[
    ("users", "👥 Пользователи"),
    ("courses", "📚 Курсы"),
    ("analytics", "📊 Аналитика"),
    ("settings", "⚙️ Настройки"),
];

pub const DELETE_PROMPT: &str =
    "⚠️ Вы уверены, что хотите удалить этого пользователя? Это действие необратимо!";
pub const DELETED_MESSAGE: &str = "✅ Пользователь удален";
pub const PLACEHOLDER_SAVED_MESSAGE: &str = "✅ Данные пользователя сохранены в базе данных";

const USER_COLUMNS: [&str; 5] = ["Имя", "Email", "Роль", "Статус", "Действия"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminTab {
    #[default]
    Users,
    Courses,
    Analytics,
    Settings,
}

impl AdminTab {
    pub fn parse(tab: Option<&str>) -> Result<Self> {
        match tab {
            None => Ok(Self::default()),
            Some("users") => Ok(Self::Users),
            Some("courses") => Ok(Self::Courses),
            Some("analytics") => Ok(Self::Analytics),
            Some("settings") => Ok(Self::Settings),
            Some(other) => Err(AppError::BadRequest(format!("Unknown admin tab: {}", other))),
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Courses => "courses",
            Self::Analytics => "analytics",
            Self::Settings => "settings",
        }
    }
}

pub fn block_prompt(target_blocked: bool) -> String {
    let verb = if target_blocked {
        "заблокировать"
    } else {
        "разблокировать"
    };
    format!("Вы уверены, что хотите {} этого пользователя?", verb)
}

pub fn block_result_message(blocked: bool) -> String {
    let result = if blocked {
        "заблокирован"
    } else {
        "разблокирован"
    };
    format!("✅ Пользователь {}", result)
}

pub fn edit_acknowledgement(id: &str) -> String {
    format!("Редактирование пользователя: {}", id)
}

fn row_actions(user: &UserProfile) -> Vec<RowAction> {
    let target_blocked = !user.blocked;
    vec![
        RowAction {
            kind: RowActionKind::Edit,
            label: "✏️ Редактировать".to_string(),
            danger: false,
            confirm: None,
            target_blocked: None,
        },
        RowAction {
            kind: RowActionKind::ToggleBlock,
            label: if user.blocked {
                "🔓 Разблокировать".to_string()
            } else {
                "🔒 Блокировать".to_string()
            },
            danger: !user.blocked,
            confirm: Some(block_prompt(target_blocked)),
            target_blocked: Some(target_blocked),
        },
        RowAction {
            kind: RowActionKind::Delete,
            label: "🗑️ Удалить".to_string(),
            danger: true,
            confirm: Some(DELETE_PROMPT.to_string()),
            target_blocked: None,
        },
    ]
}

fn users_table(rows: Vec<UserRow>, error: Option<String>) -> UsersTable {
    let empty_message = (rows.is_empty() && error.is_none())
        .then(|| "Пользователи не найдены".to_string());
    UsersTable {
        add_user_label: "➕ Добавить пользователя".to_string(),
        search_placeholder: "🔍 Поиск...".to_string(),
        columns: USER_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows,
        empty_message,
        error,
    }
}

/// Users table over a snapshot (full or filtered).
pub fn users_panel(users: &[UserProfile]) -> Panel {
    let rows = users
        .iter()
        .map(|user| UserRow {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role_label: user.role.label(),
            status: status_badge(user),
            actions: row_actions(user),
        })
        .collect();
    Panel::Users(users_table(rows, None))
}

pub fn users_load_error_panel() -> Panel {
    Panel::Users(users_table(
        Vec::new(),
        Some("Ошибка загрузки данных".to_string()),
    ))
}

pub fn courses_panel() -> Panel {
    let card = |icon: &str, title: &str, description: &str, students: &str, lessons: &str| {
        CourseCard {
            icon: icon.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            badge: Some("Активен".to_string()),
            facts: vec![format!("👥 {}", students), format!("📚 {}", lessons)],
            progress: None,
            action_label: "Управлять курсом".to_string(),
        }
    };

    Panel::Courses(CourseGrid {
        title: None,
        create_label: Some("➕ Создать курс".to_string()),
        cards: vec![
            card(
                "💻",
                "JavaScript Basics",
                "Основы программирования на JavaScript",
                "8 студентов",
                "12 уроков",
            ),
            card(
                "🎨",
                "UI/UX Design",
                "Основы дизайна интерфейсов",
                "4 студента",
                "8 уроков",
            ),
        ],
    })
}

fn stat(id: &str, label: &str, value: String) -> StatCard {
    StatCard {
        id: id.to_string(),
        label: label.to_string(),
        value,
    }
}

fn count_or_dash(counts: Option<AdminCounts>, pick: fn(AdminCounts) -> usize) -> String {
    counts
        .map(|c| pick(c).to_string())
        .unwrap_or_else(|| "—".to_string())
}

/// Analytics tab; only the two counts come from the store.
pub fn analytics_panel(counts: Option<AdminCounts>) -> Panel {
    Panel::Analytics(AnalyticsPanel {
        title: "📊 Аналитика платформы".to_string(),
        summary: vec![
            stat("users", "Пользователей", count_or_dash(counts, |c| c.users)),
            stat("courses", "Курсов", count_or_dash(counts, |c| c.courses)),
        ],
        facts: vec![
            stat(
                "average-progress",
                "Средний прогресс обучения",
                PLACEHOLDER_AVERAGE_PROGRESS.to_string(),
            ),
            stat("courses-completed", "Курсы завершены", "45/60".to_string()),
            stat("active-interns", "Активных стажёров", "12".to_string()),
        ],
        top_courses: vec![
            "JavaScript Basics (8 студентов)".to_string(),
            "UI/UX Design (4 студента)".to_string(),
            "Git & GitHub (6 студентов)".to_string(),
        ],
        export_label: "📥 Экспортировать отчет (PDF)".to_string(),
    })
}

pub fn settings_panel() -> Panel {
    Panel::Settings(SettingsPanel {
        title: "⚙️ Настройки системы".to_string(),
        sections: vec![
            SettingsSection {
                title: "🎨 Внешний вид".to_string(),
                fields: vec![
                    SettingField {
                        label: "Логотип платформы".to_string(),
                        value: None,
                        placeholder: Some("🎓".to_string()),
                    },
                    SettingField {
                        label: "Название платформы".to_string(),
                        value: Some("Платформа Обучения".to_string()),
                        placeholder: None,
                    },
                ],
                actions: Vec::new(),
            },
            SettingsSection {
                title: "📢 Уведомления".to_string(),
                fields: Vec::new(),
                actions: vec!["Отправить уведомление всем пользователям".to_string()],
            },
        ],
        save_label: "💾 Сохранить настройки".to_string(),
    })
}

/// Header cards: users, courses, average progress.
pub fn header_stats(counts: Option<AdminCounts>) -> Vec<StatCard> {
    vec![
        stat("stat-users", "Пользователи", count_or_dash(counts, |c| c.users)),
        stat("stat-courses", "Курсы", count_or_dash(counts, |c| c.courses)),
        stat(
            "stat-progress",
            "Средний прогресс",
            PLACEHOLDER_AVERAGE_PROGRESS.to_string(),
        ),
    ]
}

pub fn render(
    session: &Session,
    tab: AdminTab,
    counts: Option<AdminCounts>,
    panel: Panel,
) -> DashboardView {
    DashboardView {
        role: session.role.as_str().to_string(),
        title: "👑 Панель администратора".to_string(),
        header: header(session),
        stats: header_stats(counts),
        tabs: Some(TabBar::new(TABS, tab.id())),
        panel,
    }
}

/// Users tab body: fresh list read, snapshot rebuilt for `owner`.
pub async fn load_users_panel(users_service: &UsersService, owner: &str) -> Panel {
    match users_service.load_users_tab(owner).await {
        Ok(users) => users_panel(&users),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load users");
            users_load_error_panel()
        }
    }
}

/// Mount the admin dashboard on `tab`, reading the store where needed.
pub async fn mount(users_service: &UsersService, session: &Session, tab: AdminTab) -> DashboardView {
    let counts = match users_service.counts().await {
        Ok(counts) => Some(counts),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load admin stats");
            None
        }
    };

    let panel = match tab {
        AdminTab::Users => load_users_panel(users_service, &session.uid).await,
        AdminTab::Courses => courses_panel(),
        AdminTab::Analytics => analytics_panel(counts),
        AdminTab::Settings => settings_panel(),
    };

    render(session, tab, counts, panel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn user(id: &str, blocked: bool) -> UserProfile {
        UserProfile {
            id: id.to_string(),
            name: "Мария".to_string(),
            email: "maria@company.com".to_string(),
            role: Role::Intern,
            blocked,
            created_at: None,
        }
    }

    #[test]
    fn test_users_panel_rows_reflect_block_state() {
        let Panel::Users(table) = users_panel(&[user("a", false), user("b", true)]) else {
            panic!("expected users panel");
        };

        assert_eq!(table.rows.len(), 2);
        assert!(table.empty_message.is_none());

        let active = &table.rows[0];
        assert_eq!(active.role_label, "🧑‍💻 Стажёр");
        assert_eq!(active.status.label, "Активен");
        let toggle = &active.actions[1];
        assert_eq!(toggle.kind, RowActionKind::ToggleBlock);
        assert_eq!(toggle.target_blocked, Some(true));
        assert_eq!(
            toggle.confirm.as_deref(),
            Some("Вы уверены, что хотите заблокировать этого пользователя?")
        );

        let blocked = &table.rows[1];
        assert_eq!(blocked.status.label, "Заблокирован");
        assert_eq!(blocked.actions[1].label, "🔓 Разблокировать");
        assert_eq!(blocked.actions[1].target_blocked, Some(false));
        assert_eq!(blocked.actions[2].confirm.as_deref(), Some(DELETE_PROMPT));
    }

    #[test]
    fn test_empty_and_error_tables() {
        let Panel::Users(empty) = users_panel(&[]) else {
            panic!("expected users panel");
        };
        assert_eq!(empty.empty_message.as_deref(), Some("Пользователи не найдены"));

        let Panel::Users(failed) = users_load_error_panel() else {
            panic!("expected users panel");
        };
        assert!(failed.empty_message.is_none());
        assert_eq!(failed.error.as_deref(), Some("Ошибка загрузки данных"));
    }

    #[test]
    fn test_analytics_uses_counts() {
        let Panel::Analytics(panel) = analytics_panel(Some(AdminCounts {
            users: 5,
            courses: 2,
        })) else {
            panic!("expected analytics panel");
        };
        assert_eq!(panel.summary[0].value, "5");
        assert_eq!(panel.summary[1].value, "2");

        let Panel::Analytics(panel) = analytics_panel(None) else {
            panic!("expected analytics panel");
        };
        assert_eq!(panel.summary[0].value, "—");
    }

    #[test]
    fn test_tab_parsing() {
        assert_eq!(AdminTab::parse(None).unwrap(), AdminTab::Users);
        assert_eq!(AdminTab::parse(Some("settings")).unwrap(), AdminTab::Settings);
        assert!(AdminTab::parse(Some("students")).is_err());
    }

    #[test]
    fn test_messages() {
        assert_eq!(block_result_message(true), "✅ Пользователь заблокирован");
        assert_eq!(block_result_message(false), "✅ Пользователь разблокирован");
        assert_eq!(edit_acknowledgement("u1"), "Редактирование пользователя: u1");
    }
}
