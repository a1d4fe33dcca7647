use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::picker_dto::{PickerEvent, PickerUpdate, SessionKey, SessionStarted, SharedSessions};
use crate::error::AppError;
use crate::picker::{
    Candidate, Coordinate, DrawOutcome, DrawTicket, GameAnnotation, GameKind, Geocoder, PickerSession, geo,
};
use crate::services::auth_user::AuthUser;
use crate::services::roster;
use crate::services::websocket::publish;

const NO_SESSION: &str = "No game session";

/**
 * POST to start (or restart) a game. The active roster is read once here and
 * stays frozen for the whole session.
 */
pub async fn start_session(
    Extension(pool): Extension<SqlitePool>,
    Extension(sessions): Extension<SharedSessions>,
    AuthUser(claims): AuthUser,
    Path(game): Path<GameKind>,
) -> Result<impl IntoResponse, AppError> {
    let members = roster::list_active_members(&pool, &claims.sub).await?;
    let candidates: Vec<Candidate> = members.into_iter().map(Candidate::from).collect();
    info!("Starting {:?} game for {} with {} members", game, claims.sub, candidates.len());

    let session = PickerSession::new(game, candidates);
    let started = SessionStarted {
        session: session.view(),
        directives: session.start_directives(),
    };

    sessions.write().await.insert(SessionKey::new(claims.sub, game), session);

    Ok((StatusCode::CREATED, Json(started)))
}

pub async fn get_session(
    Extension(sessions): Extension<SharedSessions>,
    AuthUser(claims): AuthUser,
    Path(game): Path<GameKind>,
) -> Result<impl IntoResponse, AppError> {
    let guard = sessions.read().await;
    let session = guard
        .get(&SessionKey::new(claims.sub, game))
        .ok_or(AppError::NotFound(NO_SESSION))?;

    Ok(Json(session.view()))
}

/**
 * DELETE tears the game down. Labels still being resolved for it are dropped.
 */
pub async fn end_session(
    Extension(sessions): Extension<SharedSessions>,
    AuthUser(claims): AuthUser,
    Path(game): Path<GameKind>,
) -> impl IntoResponse {
    if sessions.write().await.remove(&SessionKey::new(&claims.sub, game)).is_some() {
        info!("Ended {:?} game for {}", game, claims.sub);
    }
    StatusCode::NO_CONTENT
}

pub async fn draw(
    Extension(sessions): Extension<SharedSessions>,
    Extension(tx): Extension<broadcast::Sender<PickerEvent>>,
    Extension(geocoder): Extension<Arc<dyn Geocoder>>,
    AuthUser(claims): AuthUser,
    Path(game): Path<GameKind>,
) -> Result<impl IntoResponse, AppError> {
    let key = SessionKey::new(&claims.sub, game);

    let (session_id, outcome) = {
        let mut guard = sessions.write().await;
        let session = guard.get_mut(&key).ok_or(AppError::NotFound(NO_SESSION))?;
        let mut rng = rand::rng();
        (session.id(), session.draw(&mut rng)?)
    };

    match &outcome {
        DrawOutcome::Picked { pick, .. } => {
            info!("Picked {} in {:?} game for {}", pick.member.name, game, claims.sub);
            publish(&tx, &claims.sub, PickerUpdate::Picked { game, pick: pick.clone() });

            if let GameAnnotation::Geo(annotation) = &pick.annotation {
                let target = LabelTarget {
                    key,
                    session_id,
                    ticket: pick.ticket,
                };
                spawn_label_resolution(sessions, tx, geocoder, target, annotation.coordinate);
            }
        }
        DrawOutcome::Exhausted { message, .. } => {
            info!("{:?} game for {} is exhausted", game, claims.sub);
            publish(&tx, &claims.sub, PickerUpdate::Exhausted { game, message: *message });
        }
    }

    Ok(Json(outcome))
}

pub async fn reset(
    Extension(sessions): Extension<SharedSessions>,
    Extension(tx): Extension<broadcast::Sender<PickerEvent>>,
    AuthUser(claims): AuthUser,
    Path(game): Path<GameKind>,
) -> Result<impl IntoResponse, AppError> {
    let view = {
        let mut guard = sessions.write().await;
        let session = guard
            .get_mut(&SessionKey::new(&claims.sub, game))
            .ok_or(AppError::NotFound(NO_SESSION))?;
        session.reset();
        session.view()
    };

    publish(&tx, &claims.sub, PickerUpdate::Reset { game });
    Ok(Json(view))
}

/// The pick a pending label belongs to. The session id tells a restarted
/// game apart from the one the draw was made in.
struct LabelTarget {
    key: SessionKey,
    session_id: Uuid,
    ticket: DrawTicket,
}

/// Looks the place up off the request path and writes it back into the
/// session. The session lock is not held while the geocoder runs.
fn spawn_label_resolution(
    sessions: SharedSessions,
    tx: broadcast::Sender<PickerEvent>,
    geocoder: Arc<dyn Geocoder>,
    target: LabelTarget,
    at: Coordinate,
) {
    tokio::spawn(async move {
        let LabelTarget { key, session_id, ticket } = target;
        let label = geo::resolve_label(geocoder.as_ref(), at).await;

        let applied = match sessions.write().await.get_mut(&key) {
            Some(session) if session.id() == session_id => session.apply_label(ticket, label.clone()),
            _ => false,
        };

        if applied {
            publish(
                &tx,
                &key.owner_id,
                PickerUpdate::LabelResolved {
                    game: key.game,
                    ticket,
                    label,
                },
            );
        } else {
            warn!("Dropping place label for draw {:?}, its session moved on", ticket);
        }
    });
}
