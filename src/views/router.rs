// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Role router: picks the dashboard for a session's role.

use super::admin::{self, AdminTab};
use super::intern::{self, InternTab};
use super::mentor::{self, MentorTab};
use super::{header, DashboardView, Notice, Panel};
use crate::error::Result;
use crate::models::{Role, Session};
use crate::services::UsersService;

/// Dashboard selected for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dashboard {
    Admin,
    Mentor,
    Intern,
    UnknownRole,
}

/// Pure dispatch on role.
pub fn dispatch(role: &Role) -> Dashboard {
    match role {
        Role::Admin => Dashboard::Admin,
        Role::Mentor => Dashboard::Mentor,
        Role::Intern => Dashboard::Intern,
        Role::Unrecognized(_) => Dashboard::UnknownRole,
    }
}

/// Fallback for roles without a dashboard; nothing interactive.
pub fn unknown_role(session: &Session) -> DashboardView {
    DashboardView {
        role: session.role.as_str().to_string(),
        title: "⚠️ Неизвестная роль".to_string(),
        header: header(session),
        stats: Vec::new(),
        tabs: None,
        panel: Panel::Notice(Notice {
            title: "⚠️ Неизвестная роль".to_string(),
            message: None,
        }),
    }
}

/// Build the dashboard for `session` from scratch on `tab` (role default when
/// `None`). An unknown tab id for the role is a bad request.
pub async fn mount(
    users_service: &UsersService,
    session: &Session,
    tab: Option<&str>,
) -> Result<DashboardView> {
    let view = match dispatch(&session.role) {
        Dashboard::Admin => admin::mount(users_service, session, AdminTab::parse(tab)?).await,
        Dashboard::Mentor => mentor::render(session, MentorTab::parse(tab)?),
        Dashboard::Intern => intern::render(session, InternTab::parse(tab)?),
        Dashboard::UnknownRole => {
            tracing::warn!(uid = %session.uid, role = session.role.as_str(), "Unknown role");
            unknown_role(session)
        }
    };
    Ok(view)
}
