use crate::{
    data::{NewStudent, Student, StudentPatch},
    error::RollbookResult,
    routes::{decode_body, parse_id},
    state::RollbookState,
};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;

#[derive(Serialize)]
#[cfg_attr(test, derive(serde::Deserialize, Debug))]
pub struct CreatedStudent {
    pub id: i64,
}

#[derive(Serialize)]
#[cfg_attr(test, derive(serde::Deserialize, Debug))]
pub struct StudentList {
    pub students: Vec<Student>,
    pub total: usize,
}

#[axum::debug_handler]
pub async fn post_student(
    State(state): State<RollbookState>,
    body: Bytes,
) -> RollbookResult<impl IntoResponse> {
    info!("creating student");

    let draft = decode_body::<NewStudent>(&body)?.validate()?;
    let id = state
        .store()
        .create(&draft.name, &draft.email, draft.age)
        .await?;

    info!(id, "student created");
    Ok((StatusCode::CREATED, Json(CreatedStudent { id })))
}

#[axum::debug_handler]
pub async fn get_students(State(state): State<RollbookState>) -> RollbookResult<Json<StudentList>> {
    let students = state.store().all().await?;
    info!(total = students.len(), "students fetched");

    Ok(Json(StudentList {
        total: students.len(),
        students,
    }))
}

#[axum::debug_handler]
pub async fn get_student(
    State(state): State<RollbookState>,
    Path(id): Path<String>,
) -> RollbookResult<Json<Student>> {
    let id = parse_id(&id)?;
    info!(id, "getting student");

    Ok(Json(state.store().by_id(id).await?))
}

/// Applies a partial update, then re-fetches and returns the post-mutation
/// record.
#[axum::debug_handler]
pub async fn update_student(
    State(state): State<RollbookState>,
    Path(id): Path<String>,
    body: Bytes,
) -> RollbookResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    info!(id, "updating student");

    let patch: StudentPatch = decode_body(&body)?;
    patch.validate()?;

    let id = state.store().update(id, &patch).await?;
    let student = state.store().by_id(id).await?;

    Ok((StatusCode::ACCEPTED, Json(student)))
}

/// Deletes a student, answering with the snapshot taken just before removal
/// so the caller gets the deleted content back.
#[axum::debug_handler]
pub async fn delete_student(
    State(state): State<RollbookState>,
    Path(id): Path<String>,
) -> RollbookResult<Json<Student>> {
    let id = parse_id(&id)?;
    info!(id, "deleting student");

    let snapshot = state.store().by_id(id).await?;
    state.store().delete(id).await?;

    Ok(Json(snapshot))
}
