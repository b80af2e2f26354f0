//! Per-athlete recruiting records. Every read and write is scoped to the
//! authenticated user, and records that point at a school must point at one
//! of the user's own.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::{
    consts::table_const::{COACH_TABLE, SCHOOL_TABLE, TASK_TABLE},
    errors::{Error, Result},
    middleware::auth::CurrentUser,
    models::{
        coach::{Coach, NewCoach},
        interaction::{Interaction, InteractionDirection, InteractionKind, NewInteraction},
        offer::{NewOffer, Offer, OfferStatus},
        school::{NewSchool, School, SchoolFit, SchoolStatus},
        task::{NewTask, Task, TaskCategory},
    },
    state::AppState,
    utils::{
        get_record_id::get_record_id_in_table,
        time::time_now,
        validated_form::ValidatedJson,
        validator::{validate_not_blank, validate_record_id},
    },
};

async fn owned_school(state: &AppState, user_id: &str, school_id: &str) -> Result<School> {
    get_record_id_in_table(school_id, SCHOOL_TABLE)?;
    state
        .store
        .get_school(user_id, school_id)
        .await?
        .ok_or(Error::NotFound)
}

// ! schools

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSchoolRequest {
    #[validate(
        length(min = 1, max = 255),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[validate(length(max = 50))]
    pub division: Option<String>,
    pub fit: SchoolFit,
    #[serde(default)]
    pub status: SchoolStatus,
}

pub async fn create_school(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(input): ValidatedJson<CreateSchoolRequest>,
) -> Result<(StatusCode, Json<School>)> {
    let school = state
        .store
        .create_school(NewSchool {
            user_id: user.id,
            name: input.name.trim().to_string(),
            division: input.division,
            fit: input.fit,
            status: input.status,
            created_at: time_now(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(school)))
}

pub async fn list_schools(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<School>>> {
    Ok(Json(state.store.list_schools(&user.id).await?))
}

// ! coaches

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCoachRequest {
    #[validate(custom(function = "validate_record_id"))]
    pub school_id: String,
    #[validate(
        length(min = 1, max = 200),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 100))]
    pub position: Option<String>,
}

pub async fn create_coach(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(input): ValidatedJson<CreateCoachRequest>,
) -> Result<(StatusCode, Json<Coach>)> {
    let school = owned_school(&state, &user.id, &input.school_id).await?;
    let coach = state
        .store
        .create_coach(NewCoach {
            user_id: user.id,
            school_id: school.id,
            name: input.name.trim().to_string(),
            email: input.email,
            position: input.position,
            created_at: time_now(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(coach)))
}

pub async fn list_coaches(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Coach>>> {
    Ok(Json(state.store.list_coaches(&user.id).await?))
}

// ! interactions

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInteractionRequest {
    #[validate(custom(function = "validate_record_id"))]
    pub school_id: String,
    #[validate(custom(function = "validate_record_id"))]
    pub coach_id: Option<String>,
    pub kind: InteractionKind,
    pub direction: InteractionDirection,
    /// Defaults to now.
    pub occurred_at: Option<DateTime<Utc>>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

pub async fn create_interaction(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(input): ValidatedJson<CreateInteractionRequest>,
) -> Result<(StatusCode, Json<Interaction>)> {
    let school = owned_school(&state, &user.id, &input.school_id).await?;

    if let Some(coach_id) = &input.coach_id {
        get_record_id_in_table(coach_id, COACH_TABLE)?;
        let coaches = state.store.list_coaches(&user.id).await?;
        if !coaches.iter().any(|c| &c.id == coach_id) {
            return Err(Error::NotFound);
        }
    }

    let now = time_now();
    let interaction = state
        .store
        .create_interaction(NewInteraction {
            user_id: user.id,
            school_id: school.id,
            coach_id: input.coach_id,
            kind: input.kind,
            direction: input.direction,
            occurred_at: input.occurred_at.unwrap_or(now),
            notes: input.notes,
            created_at: now,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(interaction)))
}

pub async fn list_interactions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Interaction>>> {
    Ok(Json(state.store.list_interactions(&user.id).await?))
}

// ! offers

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOfferRequest {
    #[validate(custom(function = "validate_record_id"))]
    pub school_id: String,
    #[serde(default)]
    pub status: OfferStatus,
    #[validate(range(max = 100))]
    pub scholarship_percent: Option<u8>,
}

pub async fn create_offer(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(input): ValidatedJson<CreateOfferRequest>,
) -> Result<(StatusCode, Json<Offer>)> {
    let school = owned_school(&state, &user.id, &input.school_id).await?;
    let offer = state
        .store
        .create_offer(NewOffer {
            user_id: user.id,
            school_id: school.id,
            status: input.status,
            scholarship_percent: input.scholarship_percent,
            created_at: time_now(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(offer)))
}

pub async fn list_offers(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Offer>>> {
    Ok(Json(state.store.list_offers(&user.id).await?))
}

// ! tasks

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(
        length(min = 1, max = 255),
        custom(function = "validate_not_blank")
    )]
    pub title: String,
    #[serde(default)]
    pub category: TaskCategory,
    #[serde(default)]
    pub critical: bool,
    pub due_at: Option<DateTime<Utc>>,
}

pub async fn create_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(input): ValidatedJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>)> {
    let task = state
        .store
        .create_task(NewTask {
            user_id: user.id,
            title: input.title.trim().to_string(),
            category: input.category,
            critical: input.critical,
            due_at: input.due_at,
            created_at: time_now(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Task>>> {
    Ok(Json(state.store.list_tasks(&user.id).await?))
}

pub async fn complete_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(task_id): Path<String>,
) -> Result<Json<Task>> {
    get_record_id_in_table(&task_id, TASK_TABLE)?;
    let task = state
        .store
        .complete_task(&user.id, &task_id, time_now())
        .await?
        .ok_or(Error::NotFound)?;
    Ok(Json(task))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn school_request_defaults_status_and_rejects_blank_names() {
        let input: CreateSchoolRequest =
            serde_json::from_value(json!({ "name": "Rice", "fit": "target" })).unwrap();
        assert_eq!(input.status, SchoolStatus::Researching);
        assert!(input.validate().is_ok());

        let blank: CreateSchoolRequest =
            serde_json::from_value(json!({ "name": "   ", "fit": "reach" })).unwrap();
        assert!(blank.validate().is_err());
    }

    #[test]
    fn offer_percent_is_capped() {
        let input: CreateOfferRequest = serde_json::from_value(
            json!({ "schoolId": "schools:rice", "scholarshipPercent": 120 }),
        )
        .unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn coach_email_is_checked_when_present() {
        let input: CreateCoachRequest = serde_json::from_value(
            json!({ "schoolId": "schools:rice", "name": "Coach K", "email": "not-an-email" }),
        )
        .unwrap();
        assert!(input.validate().is_err());
    }
}
