use axum::Json;
use axum_extra::extract::WithRejection;

use crate::error::AuthServiceError;

pub mod admin;
pub mod auth;
pub mod health;
pub mod password;
pub mod user;
pub mod verification;

/// JSON body whose rejection is rendered in the service error envelope.
pub type JsonBody<T> = WithRejection<Json<T>, AuthServiceError>;
