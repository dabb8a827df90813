// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Generic modal dialog and the add-user form.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Overlay with a title and a caller-supplied body.
///
/// Only the explicit close control dismisses it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Modal {
    pub id: String,
    pub title: String,
    pub close_label: String,
    pub dismiss_on_backdrop: bool,
    pub dismiss_on_escape: bool,
    pub body: ModalBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModalBody {
    Empty,
    Form(Form),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Form {
    pub id: String,
    pub fields: Vec<FormField>,
    pub submit_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputKind {
    Text,
    Email,
    Password { min_length: u32 },
    Select { options: Vec<SelectOption> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FormField {
    /// Key of the value in the submitted JSON body.
    pub name: String,
    pub label: String,
    pub input: InputKind,
    pub required: bool,
    pub placeholder: Option<String>,
}

/// An empty modal.
pub fn modal(id: &str, title: &str) -> Modal {
    Modal {
        id: id.to_string(),
        title: title.to_string(),
        close_label: "×".to_string(),
        dismiss_on_backdrop: false,
        dismiss_on_escape: false,
        body: ModalBody::Empty,
    }
}

fn field(name: &str, label: &str, input: InputKind, placeholder: Option<&str>) -> FormField {
    FormField {
        name: name.to_string(),
        label: label.to_string(),
        input,
        required: true,
        placeholder: placeholder.map(str::to_string),
    }
}

/// The "new user" modal with its form filled in.
pub fn add_user_modal() -> Modal {
    let roles = [
        ("intern", "🧑‍💻 Стажёр"),
        ("mentor", "🧑‍🏫 Наставник"),
        ("admin", "👑 Администратор"),
    ];

    let mut dialog = modal("user-modal", "Новый пользователь");
    dialog.body = ModalBody::Form(Form {
        id: "add-user-form".to_string(),
        fields: vec![
            field("name", "Имя *", InputKind::Text, Some("Иван Иванов")),
            field("email", "Email *", InputKind::Email, Some("ivan@company.com")),
            field(
                "password",
                "Пароль *",
                InputKind::Password { min_length: 6 },
                Some("Минимум 6 символов"),
            ),
            field(
                "role",
                "Роль *",
                InputKind::Select {
                    options: roles
                        .iter()
                        .map(|(value, label)| SelectOption {
                            value: value.to_string(),
                            label: label.to_string(),
                        })
                        .collect(),
                },
                None,
            ),
        ],
        submit_label: "Создать пользователя".to_string(),
    });
    dialog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_starts_empty_and_closes_only_explicitly() {
        let dialog = modal("m", "Title");
        assert_eq!(dialog.body, ModalBody::Empty);
        assert!(!dialog.dismiss_on_backdrop);
        assert!(!dialog.dismiss_on_escape);
    }

    #[test]
    fn test_add_user_form_fields() {
        let dialog = add_user_modal();
        let ModalBody::Form(form) = &dialog.body else {
            panic!("add-user modal must carry a form");
        };

        let names: Vec<&str> = form.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["name", "email", "password", "role"]);
        assert!(form.fields.iter().all(|f| f.required));

        let json = serde_json::to_value(&dialog).unwrap();
        assert_eq!(json["body"]["kind"], "form");
        assert_eq!(json["body"]["fields"][2]["input"]["type"], "password");
        assert_eq!(json["body"]["fields"][2]["input"]["min_length"], 6);
        assert_eq!(json["body"]["fields"][3]["input"]["options"][0]["value"], "intern");
    }
}
