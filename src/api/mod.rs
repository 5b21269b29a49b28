// HTTP API routes. Read-only: every endpoint is a lookup, no handler
// mutates state. Each request borrows a pooled connection for the duration
// of its queries and releases it on every exit path.

pub mod views;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::db::enums::{ItemCategory, ItemSellLocation, SkillCategory, SkillFamily};
use crate::db::{Database, Monster, MonsterFamily, Skill};
use views::{
    BreedingView, FamilyView, MonsterView, MonsterWithSkillsView, SkillCombineView, SkillView,
};

// ── Query parameters ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct MonsterListParams {
    pub family: Option<i64>,
}

#[derive(Deserialize)]
pub struct SkillListParams {
    pub category: Option<String>,
    pub skill_family: Option<String>,
}

#[derive(Deserialize)]
pub struct ItemListParams {
    pub category: Option<String>,
    pub sell_location: Option<String>,
}

// ── Shared application state ─────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

// ── Error helpers ─────────────────────────────────────────────────────

fn json_error(status: StatusCode, msg: &str) -> impl IntoResponse {
    (status, Json(json!({ "error": msg })))
}

fn internal_error(e: sqlx::Error) -> impl IntoResponse {
    tracing::error!("Database error: {e}");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

/// A stored foreign key failed to resolve. Foreign keys are enforced at
/// insert time, so this only fires if the store is corrupt.
fn integrity_error(what: &str) -> axum::response::Response {
    tracing::error!("Referential integrity hole: {what}");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}

// ── Router ────────────────────────────────────────────────────────────

pub fn router(db: Arc<Database>) -> Router {
    let state = AppState { db };

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api/monsters", get(list_monsters))
        .route("/api/monsters/{id}", get(get_monster))
        .route("/api/monsters/{id}/skills", get(get_monster_skills))
        .route("/api/families/{id}", get(get_family))
        .route("/api/skills", get(list_skills))
        .route("/api/skills/{id}", get(get_skill))
        .route("/api/skills/{id}/combine", get(get_skill_combine))
        .route("/api/items", get(list_items))
        .route("/api/items/{id}", get(get_item))
        .route("/api/breeding/{monster_id}", get(get_breeding))
        .with_state(state)
}

async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Welcome to the DQMonsters API" }))
}

async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok", "service": "dqm-api" }))
}

// ── Monster handlers ──────────────────────────────────────────────────

async fn list_monsters(
    State(state): State<AppState>,
    Query(params): Query<MonsterListParams>,
) -> impl IntoResponse {
    let monsters = match state.db.list_monsters(params.family).await {
        Ok(monsters) => monsters,
        Err(e) => return internal_error(e).into_response(),
    };
    let families = match family_index(&state.db).await {
        Ok(families) => families,
        Err(e) => return internal_error(e).into_response(),
    };

    let mut views = Vec::with_capacity(monsters.len());
    for monster in monsters {
        let Some(family) = families.get(&monster.family_id).cloned() else {
            return integrity_error("monster with unknown family_id");
        };
        views.push(MonsterView { monster, family });
    }
    (StatusCode::OK, Json(json!(views))).into_response()
}

async fn get_monster(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    let monster = match state.db.get_monster(id).await {
        Ok(Some(monster)) => monster,
        Ok(None) => return json_error(StatusCode::NOT_FOUND, "Monster not found").into_response(),
        Err(e) => return internal_error(e).into_response(),
    };
    match resolve_family(&state.db, &monster).await {
        Ok(family) => (StatusCode::OK, Json(json!(MonsterView { monster, family }))).into_response(),
        Err(response) => response,
    }
}

async fn get_monster_skills(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let monster = match state.db.get_monster(id).await {
        Ok(Some(monster)) => monster,
        Ok(None) => return json_error(StatusCode::NOT_FOUND, "Monster not found").into_response(),
        Err(e) => return internal_error(e).into_response(),
    };
    let family = match resolve_family(&state.db, &monster).await {
        Ok(family) => family,
        Err(response) => return response,
    };
    match state.db.skills_for_monster(id).await {
        Ok(skills) => (
            StatusCode::OK,
            Json(json!(MonsterWithSkillsView {
                monster,
                family,
                skills,
            })),
        )
            .into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

// ── Family handlers ───────────────────────────────────────────────────

async fn get_family(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    let family = match state.db.get_family(id).await {
        Ok(Some(family)) => family,
        Ok(None) => return json_error(StatusCode::NOT_FOUND, "Family not found").into_response(),
        Err(e) => return internal_error(e).into_response(),
    };
    match state.db.list_monsters(Some(id)).await {
        Ok(monsters) => (
            StatusCode::OK,
            Json(json!(FamilyView { family, monsters })),
        )
            .into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

// ── Skill handlers ────────────────────────────────────────────────────

async fn list_skills(
    State(state): State<AppState>,
    Query(params): Query<SkillListParams>,
) -> impl IntoResponse {
    // Filters are validated against their closed sets before any query runs.
    let category = match params.category.as_deref().map(str::parse::<SkillCategory>) {
        Some(Ok(category)) => Some(category),
        Some(Err(e)) => return json_error(StatusCode::BAD_REQUEST, &e.to_string()).into_response(),
        None => None,
    };
    let family = match params
        .skill_family
        .as_deref()
        .map(str::parse::<SkillFamily>)
    {
        Some(Ok(family)) => Some(family),
        Some(Err(e)) => return json_error(StatusCode::BAD_REQUEST, &e.to_string()).into_response(),
        None => None,
    };

    match state
        .db
        .list_skills(
            category.map(SkillCategory::as_str),
            family.map(SkillFamily::as_str),
        )
        .await
    {
        Ok(skills) => (StatusCode::OK, Json(json!(skills))).into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

async fn get_skill(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    let skill = match state.db.get_skill(id).await {
        Ok(Some(skill)) => skill,
        Ok(None) => return json_error(StatusCode::NOT_FOUND, "Skill not found").into_response(),
        Err(e) => return internal_error(e).into_response(),
    };
    let upgrade_to = match resolve_skill(&state.db, skill.upgrade_to_id).await {
        Ok(skill) => skill,
        Err(e) => return internal_error(e).into_response(),
    };
    let upgrade_from = match resolve_skill(&state.db, skill.upgrade_from_id).await {
        Ok(skill) => skill,
        Err(e) => return internal_error(e).into_response(),
    };
    (
        StatusCode::OK,
        Json(json!(SkillView {
            skill,
            upgrade_to,
            upgrade_from,
        })),
    )
        .into_response()
}

async fn get_skill_combine(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    // An empty prerequisite set means the skill is learned normally; that
    // is a success, not a NotFound.
    let combines = match state.db.combines_for_skill(id).await {
        Ok(combines) => combines,
        Err(e) => return internal_error(e).into_response(),
    };
    let mut views = Vec::with_capacity(combines.len());
    for combine in combines {
        let needed_skill = match state.db.get_skill(combine.needed_skill_id).await {
            Ok(Some(skill)) => skill,
            Ok(None) => return integrity_error("combine row with unknown needed_skill_id"),
            Err(e) => return internal_error(e).into_response(),
        };
        views.push(SkillCombineView {
            combine,
            needed_skill,
        });
    }
    (StatusCode::OK, Json(json!(views))).into_response()
}

// ── Item handlers ─────────────────────────────────────────────────────

async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<ItemListParams>,
) -> impl IntoResponse {
    let category = match params.category.as_deref().map(str::parse::<ItemCategory>) {
        Some(Ok(category)) => Some(category),
        Some(Err(e)) => return json_error(StatusCode::BAD_REQUEST, &e.to_string()).into_response(),
        None => None,
    };
    let sell_location = match params
        .sell_location
        .as_deref()
        .map(str::parse::<ItemSellLocation>)
    {
        Some(Ok(location)) => Some(location),
        Some(Err(e)) => return json_error(StatusCode::BAD_REQUEST, &e.to_string()).into_response(),
        None => None,
    };

    match state
        .db
        .list_items(
            category.map(ItemCategory::as_str),
            sell_location.map(ItemSellLocation::as_str),
        )
        .await
    {
        Ok(items) => (StatusCode::OK, Json(json!(items))).into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

async fn get_item(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    match state.db.get_item(id).await {
        Ok(Some(item)) => (StatusCode::OK, Json(json!(item))).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "Item not found").into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

// ── Breeding handler ──────────────────────────────────────────────────

async fn get_breeding(
    State(state): State<AppState>,
    Path(monster_id): Path<i64>,
) -> impl IntoResponse {
    let links = match state.db.breeding_involving(monster_id).await {
        Ok(links) => links,
        Err(e) => return internal_error(e).into_response(),
    };

    let mut views = Vec::with_capacity(links.len());
    for link in links {
        let child = match state.db.get_monster(link.child_id).await {
            Ok(Some(monster)) => monster,
            Ok(None) => return integrity_error("breeding row with unknown child_id"),
            Err(e) => return internal_error(e).into_response(),
        };
        let pedigree = match resolve_monster(&state.db, link.pedigree_id).await {
            Ok(monster) => monster,
            Err(e) => return internal_error(e).into_response(),
        };
        let parent2 = match resolve_monster(&state.db, link.parent2_id).await {
            Ok(monster) => monster,
            Err(e) => return internal_error(e).into_response(),
        };
        let pedigree_family = match resolve_family_id(&state.db, link.pedigree_family_id).await {
            Ok(family) => family,
            Err(e) => return internal_error(e).into_response(),
        };
        let family2 = match resolve_family_id(&state.db, link.family2_id).await {
            Ok(family) => family,
            Err(e) => return internal_error(e).into_response(),
        };
        views.push(BreedingView {
            link,
            child,
            pedigree,
            parent2,
            pedigree_family,
            family2,
        });
    }
    (StatusCode::OK, Json(json!(views))).into_response()
}

// ── Resolution helpers ────────────────────────────────────────────────

async fn family_index(db: &Database) -> Result<HashMap<i64, MonsterFamily>, sqlx::Error> {
    Ok(db
        .list_families()
        .await?
        .into_iter()
        .map(|f| (f.id, f))
        .collect())
}

async fn resolve_family(
    db: &Database,
    monster: &Monster,
) -> Result<MonsterFamily, axum::response::Response> {
    match db.get_family(monster.family_id).await {
        Ok(Some(family)) => Ok(family),
        Ok(None) => Err(integrity_error("monster with unknown family_id")),
        Err(e) => Err(internal_error(e).into_response()),
    }
}

async fn resolve_monster(
    db: &Database,
    id: Option<i64>,
) -> Result<Option<Monster>, sqlx::Error> {
    match id {
        Some(id) => db.get_monster(id).await,
        None => Ok(None),
    }
}

async fn resolve_family_id(
    db: &Database,
    id: Option<i64>,
) -> Result<Option<MonsterFamily>, sqlx::Error> {
    match id {
        Some(id) => db.get_family(id).await,
        None => Ok(None),
    }
}

async fn resolve_skill(db: &Database, id: Option<i64>) -> Result<Option<Skill>, sqlx::Error> {
    match id {
        Some(id) => db.get_skill(id).await,
        None => Ok(None),
    }
}
