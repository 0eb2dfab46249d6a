//! # Yatube Shared
//!
//! Request payloads shared between the HTTP layer and the form validators.

pub mod dto;

pub use dto::{
    LoginFormData, NextQuery, PageQuery, PasswordChangeFormData, PasswordResetFormData,
    PostFormData, SetPasswordFormData, SignupFormData,
};
