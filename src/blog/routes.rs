//! Post listing and editing views

use axum::{
    extract::{rejection::FormRejection, FromRequestParts, Path, State},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use minijinja::context;

use crate::auth::LoginRequired;
use crate::blog::models::{get_post, Post, PostForm};
use crate::error::{Error, Result};
use crate::web::{Ctx, SharedState};

type FormResult = std::result::Result<Form<PostForm>, FormRejection>;

/// Blog routes, mounted at the root
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(index))
        .route("/create", get(create_form).post(create))
        .route("/{id}/update", get(update_form).post(update))
        .route("/{id}/delete", post(delete))
}

/// Numeric post id from the path; anything else is a 404
pub struct PostId(pub i64);

impl<S> FromRequestParts<S> for PostId
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| Error::NotFound("The requested URL was not found on the server.".into()))?;

        raw.parse()
            .map(PostId)
            .map_err(|_| Error::NotFound(format!("Post id {} doesn't exist.", raw)))
    }
}

async fn index(State(state): State<SharedState>, Ctx(ctx): Ctx) -> Result<Response> {
    let posts = ctx.db().with(Post::all)?;

    Ok(state
        .templates
        .render("blog/index.html", &ctx, context! { posts => posts })?
        .into_response())
}

async fn create_form(
    LoginRequired(_user): LoginRequired,
    State(state): State<SharedState>,
    Ctx(ctx): Ctx,
) -> Result<Response> {
    render_create(&state, &ctx, PostForm::default())
}

fn render_create(
    state: &SharedState,
    ctx: &crate::web::RequestContext,
    form: PostForm,
) -> Result<Response> {
    Ok(state
        .templates
        .render("blog/create.html", ctx, context! { form => form })?
        .into_response())
}

async fn create(
    LoginRequired(user): LoginRequired,
    State(state): State<SharedState>,
    Ctx(ctx): Ctx,
    form: FormResult,
) -> Result<Response> {
    let form = form.map(|Form(f)| f).unwrap_or_default();

    if let Some(error) = form.validation_error() {
        ctx.flash(error);
        return render_create(&state, &ctx, form);
    }

    let post_id = ctx
        .db()
        .with(|conn| Post::create(conn, &form.title, &form.body, user.id))?;
    tracing::info!("User {} created post {}", user.username, post_id);

    Ok(Redirect::to("/").into_response())
}

async fn update_form(
    LoginRequired(user): LoginRequired,
    PostId(id): PostId,
    State(state): State<SharedState>,
    Ctx(ctx): Ctx,
) -> Result<Response> {
    let post = ctx.db().with(|conn| get_post(conn, id, &user, true))?;

    Ok(state
        .templates
        .render(
            "blog/update.html",
            &ctx,
            context! { post => post, form => PostForm::default() },
        )?
        .into_response())
}

async fn update(
    LoginRequired(user): LoginRequired,
    PostId(id): PostId,
    State(state): State<SharedState>,
    Ctx(ctx): Ctx,
    form: FormResult,
) -> Result<Response> {
    // Ownership is checked before the form is looked at
    let post = ctx.db().with(|conn| get_post(conn, id, &user, true))?;
    let form = form.map(|Form(f)| f).unwrap_or_default();

    if let Some(error) = form.validation_error() {
        ctx.flash(error);
        return Ok(state
            .templates
            .render("blog/update.html", &ctx, context! { post => post, form => form })?
            .into_response());
    }

    ctx.db()
        .with(|conn| Post::update(conn, id, &form.title, &form.body))?;
    tracing::info!("User {} updated post {}", user.username, id);

    Ok(Redirect::to("/").into_response())
}

async fn delete(
    LoginRequired(user): LoginRequired,
    PostId(id): PostId,
    Ctx(ctx): Ctx,
) -> Result<Redirect> {
    ctx.db().with(|conn| {
        get_post(conn, id, &user, true)?;
        Post::delete(conn, id)
    })?;
    tracing::info!("User {} deleted post {}", user.username, id);

    Ok(Redirect::to("/"))
}
