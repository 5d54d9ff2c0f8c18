//! Register, login and logout views

use axum::{
    extract::{rejection::FormRejection, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use minijinja::context;

use crate::auth::models::{is_unique_violation, Credentials, User};
use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::error::Result;
use crate::web::{Ctx, SharedState};

/// Routes mounted under `/auth`
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/register", get(register_form).post(register))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
}

async fn register_form(State(state): State<SharedState>, Ctx(ctx): Ctx) -> Result<Response> {
    Ok(state
        .templates
        .render("auth/register.html", &ctx, context! {})?
        .into_response())
}

async fn register(
    State(state): State<SharedState>,
    Ctx(ctx): Ctx,
    form: std::result::Result<Form<Credentials>, FormRejection>,
) -> Result<Response> {
    let form = form.map(|Form(f)| f).unwrap_or_default();

    let error = match form.registration_error() {
        Some(error) => error.to_string(),
        None => {
            let hash =
                hash_password_blocking(form.password.clone(), state.config.password.bcrypt_cost)
                    .await?;

            match ctx.db().with(|conn| User::create(conn, &form.username, &hash)) {
                Ok(user_id) => {
                    tracing::info!("Registered user {} ({})", form.username, user_id);
                    return Ok(Redirect::to("/auth/login").into_response());
                }
                Err(e) if is_unique_violation(&e) => {
                    format!("User {} is already registered.", form.username)
                }
                Err(e) => return Err(e),
            }
        }
    };

    ctx.flash(error);
    register_form(State(state), Ctx(ctx)).await
}

async fn login_form(State(state): State<SharedState>, Ctx(ctx): Ctx) -> Result<Response> {
    Ok(state
        .templates
        .render("auth/login.html", &ctx, context! {})?
        .into_response())
}

async fn login(
    State(state): State<SharedState>,
    Ctx(ctx): Ctx,
    form: std::result::Result<Form<Credentials>, FormRejection>,
) -> Result<Response> {
    let form = form.map(|Form(f)| f).unwrap_or_default();
    let user = ctx
        .db()
        .with(|conn| User::find_by_username(conn, &form.username))?;

    let error = match user {
        None => "Incorrect username.",
        Some(user) => {
            let matches =
                verify_password_blocking(form.password.clone(), user.password_hash.clone()).await?;
            if matches {
                ctx.login(user.id);
                tracing::info!("User {} logged in", user.username);
                return Ok(Redirect::to("/").into_response());
            }
            "Incorrect password."
        }
    };

    tracing::warn!("Failed login for {:?}: {}", form.username, error);
    ctx.flash(error);
    login_form(State(state), Ctx(ctx)).await
}

async fn logout(Ctx(ctx): Ctx) -> Redirect {
    if let Some(user) = ctx.user() {
        tracing::info!("User {} logged out", user.username);
    }
    ctx.logout();
    Redirect::to("/")
}
