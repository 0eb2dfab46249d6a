//! HTML form definitions and validation.
//!
//! A [`Form`] is the renderable description of a form: its fields with their
//! kind, widget, submitted value and errors. The typed forms below build a
//! `Form`, validate a submitted payload against it and, when valid, produce
//! cleaned data through a [`BoundForm`].

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use yatube_shared::dto::{
    LoginFormData, PasswordChangeFormData, PasswordResetFormData, PostFormData,
    SetPasswordFormData, SignupFormData,
};

use crate::domain::{Group, Post, USERNAME_MAX_LENGTH, User};
use crate::validators::is_valid_email;

pub const PASSWORD_MIN_LENGTH: usize = 8;
const EMAIL_MAX_LENGTH: usize = 254;

/// Key used in [`FormErrors`] for errors not tied to one field.
pub const NON_FIELD_ERRORS: &str = "__all__";

const REQUIRED: &str = "This field is required.";

/// Field name to error messages.
pub type FormErrors = BTreeMap<String, Vec<String>>;

/// What kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text.
    Char,
    /// One of a fixed set of choices.
    Choice,
}

/// How a field is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    TextInput,
    Textarea,
    EmailInput,
    PasswordInput,
    Select,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Field {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub widget: Widget,
    pub required: bool,
    pub help_text: &'static str,
    pub max_length: Option<usize>,
    pub choices: Vec<Choice>,
    pub value: String,
    pub errors: Vec<String>,
}

impl Field {
    fn char(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Char,
            widget: Widget::TextInput,
            required: true,
            help_text: "",
            max_length: None,
            choices: Vec::new(),
            value: String::new(),
            errors: Vec::new(),
        }
    }

    fn choice(name: &'static str, label: &'static str, choices: Vec<Choice>) -> Self {
        Self {
            kind: FieldKind::Choice,
            widget: Widget::Select,
            choices,
            ..Self::char(name, label)
        }
    }

    fn password(name: &'static str, label: &'static str) -> Self {
        Self::char(name, label).widget(Widget::PasswordInput)
    }

    fn widget(mut self, widget: Widget) -> Self {
        self.widget = widget;
        self
    }

    fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    fn help(mut self, help_text: &'static str) -> Self {
        self.help_text = help_text;
        self
    }

    fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    fn initial(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    fn validate(&mut self) {
        // Passwords are taken as typed, whitespace included.
        let value = if self.widget == Widget::PasswordInput {
            self.value.as_str()
        } else {
            self.value.trim()
        };

        if value.is_empty() {
            if self.required {
                self.errors.push(REQUIRED.to_string());
            }
            return;
        }

        if let Some(max) = self.max_length {
            let len = value.chars().count();
            if len > max {
                self.errors.push(format!(
                    "Ensure this value has at most {max} characters (it has {len})."
                ));
            }
        }

        if self.kind == FieldKind::Choice && !self.choices.iter().any(|c| c.value == value) {
            self.errors.push(format!(
                "Select a valid choice. {value} is not one of the available choices."
            ));
        }
    }
}

/// A renderable form: fields, their values and validation errors.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Form {
    pub fields: Vec<Field>,
    pub non_field_errors: Vec<String>,
    pub is_bound: bool,
}

impl Form {
    fn new(fields: Vec<Field>) -> Self {
        Self {
            fields,
            non_field_errors: Vec::new(),
            is_bound: false,
        }
    }

    /// Fill in submitted values and run per-field validation.
    fn bind(mut self, values: &[(&str, &str)]) -> Self {
        self.is_bound = true;
        for field in &mut self.fields {
            field.value = values
                .iter()
                .find(|(name, _)| *name == field.name)
                .map(|(_, value)| value.to_string())
                .unwrap_or_default();
            field.validate();
        }
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Submitted value of a field, trimmed.
    pub fn value(&self, name: &str) -> &str {
        self.raw_value(name).trim()
    }

    /// Submitted value as typed. Passwords are never stripped.
    pub fn raw_value(&self, name: &str) -> &str {
        self.field(name).map(|f| f.value.as_str()).unwrap_or("")
    }

    fn has_field_errors(&self, name: &str) -> bool {
        self.field(name).is_some_and(|f| !f.errors.is_empty())
    }

    /// Attach an error to a field, or to the form when `field` is `None`.
    pub fn add_error(&mut self, field: Option<&str>, message: impl Into<String>) {
        let message = message.into();
        match field.and_then(|name| self.fields.iter_mut().find(|f| f.name == name)) {
            Some(field) => field.errors.push(message),
            None => self.non_field_errors.push(message),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.non_field_errors.is_empty() || self.fields.iter().any(|f| !f.errors.is_empty())
    }

    pub fn is_valid(&self) -> bool {
        self.is_bound && !self.has_errors()
    }

    pub fn errors(&self) -> FormErrors {
        let mut errors: FormErrors = self
            .fields
            .iter()
            .filter(|f| !f.errors.is_empty())
            .map(|f| (f.name.to_string(), f.errors.clone()))
            .collect();
        if !self.non_field_errors.is_empty() {
            errors.insert(NON_FIELD_ERRORS.to_string(), self.non_field_errors.clone());
        }
        errors
    }

    // Passwords are never echoed back into a re-rendered form.
    fn clear_passwords(mut self) -> Self {
        for field in &mut self.fields {
            if field.widget == Widget::PasswordInput {
                field.value.clear();
            }
        }
        self
    }
}

/// A submitted form together with its cleaned data when valid.
#[derive(Debug, Clone)]
pub struct BoundForm<T> {
    form: Form,
    cleaned: Option<T>,
}

impl<T> BoundForm<T> {
    fn finish(form: Form, clean: impl FnOnce(&Form) -> T) -> Self {
        let cleaned = form.is_valid().then(|| clean(&form));
        Self {
            form: form.clear_passwords(),
            cleaned,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.cleaned.is_some()
    }

    pub fn cleaned_data(&self) -> Option<&T> {
        self.cleaned.as_ref()
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn into_form(self) -> Form {
        self.form
    }

    /// Reject a form after a check that needs the database or a password hash.
    pub fn reject(&mut self, field: Option<&str>, message: impl Into<String>) {
        self.form.add_error(field, message);
        self.cleaned = None;
    }

    pub fn errors(&self) -> FormErrors {
        self.form.errors()
    }
}

fn validate_new_password(form: &mut Form, first: &str, second: &str) {
    let password = form.raw_value(first).to_string();
    if form.has_field_errors(first) {
        return;
    }
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        form.add_error(
            Some(second),
            format!(
                "This password is too short. It must contain at least {PASSWORD_MIN_LENGTH} characters."
            ),
        );
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        form.add_error(Some(second), "This password is entirely numeric.");
    }
    if !form.has_field_errors(second) && password != form.raw_value(second) {
        form.add_error(Some(second), "The two password fields didn't match.");
    }
}

/// Cleaned data of a post submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostInput {
    pub text: String,
    pub group_id: Option<Uuid>,
}

/// Create and edit form for posts: `text` and an optional `group`.
pub struct PostForm;

impl PostForm {
    pub fn fields(groups: &[Group]) -> Vec<Field> {
        let choices = groups
            .iter()
            .map(|g| Choice {
                value: g.id.to_string(),
                label: g.title.clone(),
            })
            .collect();

        vec![
            Field::char("text", "Text")
                .widget(Widget::Textarea)
                .help("Text of the new post"),
            Field::choice("group", "Group", choices)
                .optional()
                .help("Group the post belongs to"),
        ]
    }

    /// Empty form for `/create/`.
    pub fn unbound(groups: &[Group]) -> Form {
        Form::new(Self::fields(groups))
    }

    /// Form pre-filled with an existing post, for `/posts/<id>/edit/`.
    pub fn for_instance(post: &Post, groups: &[Group]) -> Form {
        let group = post.group_id.map(|id| id.to_string()).unwrap_or_default();
        let fields = Self::fields(groups)
            .into_iter()
            .map(|field| match field.name {
                "text" => field.initial(post.text.clone()),
                "group" => field.initial(group.clone()),
                _ => field,
            })
            .collect();
        Form::new(fields)
    }

    pub fn bind(data: &PostFormData, groups: &[Group]) -> BoundForm<PostInput> {
        let form = Self::unbound(groups).bind(&[
            ("text", data.text.as_str()),
            ("group", data.group.as_deref().unwrap_or("")),
        ]);

        BoundForm::finish(form, |form| PostInput {
            text: form.value("text").to_string(),
            group_id: Uuid::parse_str(form.value("group")).ok(),
        })
    }
}

/// Cleaned data of a signup submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

pub struct SignupForm;

impl SignupForm {
    pub fn fields() -> Vec<Field> {
        vec![
            Field::char("first_name", "First name").optional().max_length(150),
            Field::char("last_name", "Last name").optional().max_length(150),
            Field::char("username", "Username")
                .max_length(USERNAME_MAX_LENGTH)
                .help("Required. 150 characters or fewer. Letters, digits and @/./+/-/_ only."),
            Field::char("email", "Email address")
                .widget(Widget::EmailInput)
                .optional()
                .max_length(EMAIL_MAX_LENGTH),
            Field::password("password1", "Password").help(
                "Your password must contain at least 8 characters and can't be entirely numeric.",
            ),
            Field::password("password2", "Password confirmation")
                .help("Enter the same password as before, for verification."),
        ]
    }

    pub fn unbound() -> Form {
        Form::new(Self::fields())
    }

    /// Validate a signup. Username availability is checked by the caller.
    pub fn bind(data: &SignupFormData) -> BoundForm<NewAccount> {
        let mut form = Self::unbound().bind(&[
            ("first_name", data.first_name.as_str()),
            ("last_name", data.last_name.as_str()),
            ("username", data.username.as_str()),
            ("email", data.email.as_str()),
            ("password1", data.password1.as_str()),
            ("password2", data.password2.as_str()),
        ]);

        let username = form.value("username").to_string();
        if !form.has_field_errors("username") && !User::is_valid_username(&username) {
            form.add_error(
                Some("username"),
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        }
        let email = form.value("email").to_string();
        if !email.is_empty() && !is_valid_email(&email) {
            form.add_error(Some("email"), "Enter a valid email address.");
        }
        validate_new_password(&mut form, "password1", "password2");

        BoundForm::finish(form, |form| NewAccount {
            username: form.value("username").to_string(),
            email: form.value("email").to_string(),
            first_name: form.value("first_name").to_string(),
            last_name: form.value("last_name").to_string(),
            password: form.raw_value("password1").to_string(),
        })
    }
}

/// Cleaned login credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub struct LoginForm;

impl LoginForm {
    pub const INVALID_LOGIN: &'static str = "Please enter a correct username and password. Note that both fields may be case-sensitive.";

    pub fn unbound() -> Form {
        Form::new(vec![
            Field::char("username", "Username").max_length(USERNAME_MAX_LENGTH),
            Field::password("password", "Password"),
        ])
    }

    pub fn bind(data: &LoginFormData) -> BoundForm<Credentials> {
        let form = Self::unbound().bind(&[
            ("username", data.username.as_str()),
            ("password", data.password.as_str()),
        ]);

        BoundForm::finish(form, |form| Credentials {
            username: form.value("username").to_string(),
            password: form.raw_value("password").to_string(),
        })
    }
}

/// Cleaned password change request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
}

pub struct PasswordChangeForm;

impl PasswordChangeForm {
    pub const INCORRECT_OLD_PASSWORD: &'static str =
        "Your old password was entered incorrectly. Please enter it again.";

    pub fn unbound() -> Form {
        Form::new(vec![
            Field::password("old_password", "Old password"),
            Field::password("new_password1", "New password"),
            Field::password("new_password2", "New password confirmation"),
        ])
    }

    pub fn bind(data: &PasswordChangeFormData) -> BoundForm<PasswordChange> {
        let mut form = Self::unbound().bind(&[
            ("old_password", data.old_password.as_str()),
            ("new_password1", data.new_password1.as_str()),
            ("new_password2", data.new_password2.as_str()),
        ]);
        validate_new_password(&mut form, "new_password1", "new_password2");

        BoundForm::finish(form, |form| PasswordChange {
            old_password: data.old_password.clone(),
            new_password: form.raw_value("new_password1").to_string(),
        })
    }
}

pub struct PasswordResetForm;

impl PasswordResetForm {
    pub fn unbound() -> Form {
        Form::new(vec![
            Field::char("email", "Email")
                .widget(Widget::EmailInput)
                .max_length(EMAIL_MAX_LENGTH),
        ])
    }

    /// Cleaned data is the email address.
    pub fn bind(data: &PasswordResetFormData) -> BoundForm<String> {
        let mut form = Self::unbound().bind(&[("email", data.email.as_str())]);
        let email = form.value("email").to_string();
        if !form.has_field_errors("email") && !is_valid_email(&email) {
            form.add_error(Some("email"), "Enter a valid email address.");
        }

        BoundForm::finish(form, |form| form.value("email").to_string())
    }
}

pub struct SetPasswordForm;

impl SetPasswordForm {
    pub fn unbound() -> Form {
        Form::new(vec![
            Field::password("new_password1", "New password"),
            Field::password("new_password2", "New password confirmation"),
        ])
    }

    /// Cleaned data is the new password.
    pub fn bind(data: &SetPasswordFormData) -> BoundForm<String> {
        let mut form = Self::unbound().bind(&[
            ("new_password1", data.new_password1.as_str()),
            ("new_password2", data.new_password2.as_str()),
        ]);
        validate_new_password(&mut form, "new_password1", "new_password2");

        BoundForm::finish(form, |form| form.raw_value("new_password1").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups() -> Vec<Group> {
        vec![
            Group::new("Test group".into(), "test-slug".into(), "About".into()).unwrap(),
            Group::new("Other".into(), "other".into(), String::new()).unwrap(),
        ]
    }

    fn post_data(text: &str, group: Option<&str>) -> PostFormData {
        PostFormData {
            text: text.to_string(),
            group: group.map(String::from),
        }
    }

    #[test]
    fn test_post_form_field_kinds() {
        let form = PostForm::unbound(&groups());

        let text = form.field("text").unwrap();
        assert_eq!(text.kind, FieldKind::Char);
        assert_eq!(text.widget, Widget::Textarea);
        assert!(text.required);

        let group = form.field("group").unwrap();
        assert_eq!(group.kind, FieldKind::Choice);
        assert!(!group.required);
        assert_eq!(group.choices.len(), 2);
        assert!(!form.is_bound);
    }

    #[test]
    fn test_post_form_valid_with_group() {
        let groups = groups();
        let id = groups[0].id.to_string();
        let bound = PostForm::bind(&post_data("  Hello  ", Some(&id)), &groups);

        assert!(bound.is_valid());
        let input = bound.cleaned_data().unwrap();
        assert_eq!(input.text, "Hello");
        assert_eq!(input.group_id, Some(groups[0].id));
    }

    #[test]
    fn test_post_form_group_is_optional() {
        let groups = groups();
        for group in [None, Some("")] {
            let bound = PostForm::bind(&post_data("Hello", group), &groups);
            assert_eq!(bound.cleaned_data().unwrap().group_id, None);
        }
    }

    #[test]
    fn test_post_form_rejects_blank_text() {
        let bound = PostForm::bind(&post_data("   ", None), &groups());
        assert!(!bound.is_valid());
        assert_eq!(bound.errors()["text"], vec![REQUIRED.to_string()]);
    }

    #[test]
    fn test_post_form_rejects_unknown_group() {
        let bound = PostForm::bind(&post_data("Hi", Some(&Uuid::new_v4().to_string())), &groups());
        assert!(!bound.is_valid());
        assert!(bound.errors()["group"][0].starts_with("Select a valid choice"));
    }

    #[test]
    fn test_post_form_for_instance_prefills() {
        let groups = groups();
        let post = Post::new(Uuid::new_v4(), "Existing".into(), Some(groups[1].id));
        let form = PostForm::for_instance(&post, &groups);

        assert_eq!(form.value("text"), "Existing");
        assert_eq!(form.value("group"), groups[1].id.to_string());
        assert!(!form.is_bound);
    }

    fn signup(username: &str, password1: &str, password2: &str) -> SignupFormData {
        SignupFormData {
            username: username.to_string(),
            email: "leo@example.com".to_string(),
            password1: password1.to_string(),
            password2: password2.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_signup_valid() {
        let bound = SignupForm::bind(&signup("leo", "war-and-peace", "war-and-peace"));
        let account = bound.cleaned_data().unwrap();
        assert_eq!(account.username, "leo");
        assert_eq!(account.password, "war-and-peace");
        // Not echoed back.
        assert!(bound.form().field("password1").unwrap().value.is_empty());
    }

    #[test]
    fn test_signup_password_rules() {
        let errors = SignupForm::bind(&signup("leo", "short", "short")).errors();
        assert!(errors["password2"][0].contains("too short"));

        let errors = SignupForm::bind(&signup("leo", "1234567890", "1234567890")).errors();
        assert!(errors["password2"].iter().any(|e| e.contains("entirely numeric")));

        let errors = SignupForm::bind(&signup("leo", "war-and-peace", "anna-karenina")).errors();
        assert_eq!(errors["password2"], vec!["The two password fields didn't match.".to_string()]);
    }

    #[test]
    fn test_signup_rejects_bad_username_and_email() {
        let mut data = signup("has space", "war-and-peace", "war-and-peace");
        data.email = "not-an-email".into();
        let errors = SignupForm::bind(&data).errors();
        assert!(errors.contains_key("username"));
        assert!(errors.contains_key("email"));
    }

    #[test]
    fn test_malformed_email_domains_rejected() {
        for email in ["a@.", "a@b..c", "leo@example"] {
            let mut data = signup("leo", "war-and-peace", "war-and-peace");
            data.email = email.into();
            assert!(SignupForm::bind(&data).errors().contains_key("email"), "{email}");

            let bound = PasswordResetForm::bind(&PasswordResetFormData {
                email: email.into(),
            });
            assert!(!bound.is_valid(), "{email}");
        }
    }

    #[test]
    fn test_whitespace_password_is_not_blank() {
        let bound = LoginForm::bind(&LoginFormData {
            username: "leo".into(),
            password: "   ".into(),
            next: None,
        });
        assert!(!bound.errors().contains_key("password"));
        assert_eq!(bound.cleaned_data().unwrap().password, "   ");
    }

    #[test]
    fn test_reject_drops_cleaned_data() {
        let mut bound = SignupForm::bind(&signup("leo", "war-and-peace", "war-and-peace"));
        bound.reject(Some("username"), "A user with that username already exists.");
        assert!(!bound.is_valid());
        assert!(bound.cleaned_data().is_none());

        let mut login = LoginForm::bind(&LoginFormData {
            username: "leo".into(),
            password: "pw".into(),
            next: None,
        });
        login.reject(None, LoginForm::INVALID_LOGIN);
        assert_eq!(login.errors()[NON_FIELD_ERRORS].len(), 1);
    }

    #[test]
    fn test_login_requires_both_fields() {
        let bound = LoginForm::bind(&LoginFormData::default());
        let errors = bound.errors();
        assert!(errors.contains_key("username"));
        assert!(errors.contains_key("password"));
    }

    #[test]
    fn test_password_change_and_reset_forms() {
        let bound = PasswordChangeForm::bind(&PasswordChangeFormData {
            old_password: "old-password".into(),
            new_password1: "new-password".into(),
            new_password2: "new-password".into(),
        });
        let change = bound.cleaned_data().unwrap();
        assert_eq!(change.old_password, "old-password");
        assert_eq!(change.new_password, "new-password");

        let bound = PasswordResetForm::bind(&PasswordResetFormData {
            email: "leo@example.com".into(),
        });
        assert_eq!(bound.cleaned_data().map(String::as_str), Some("leo@example.com"));

        let bound = SetPasswordForm::bind(&SetPasswordFormData {
            new_password1: "abc".into(),
            new_password2: "abc".into(),
        });
        assert!(!bound.is_valid());
    }

    #[test]
    fn test_form_serializes_for_templates() {
        let json = serde_json::to_value(PostForm::unbound(&groups())).unwrap();
        assert_eq!(json["fields"][0]["name"], "text");
        assert_eq!(json["fields"][0]["kind"], "char");
        assert_eq!(json["fields"][1]["kind"], "choice");
        assert_eq!(json["fields"][1]["widget"], "select");
    }
}
