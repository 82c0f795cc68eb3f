use crate::{
    error::{EmptyBodySnafu, MalformedBodySnafu, ParseIdSnafu, RollbookResult},
    state::RollbookState,
};
use axum::{Router, body::Bytes, routing::get};
use serde::de::DeserializeOwned;
use snafu::ResultExt;

pub mod students;

/// Binds the student routes to their handlers.
pub fn router(state: RollbookState) -> Router {
    Router::new()
        .route(
            "/api/students",
            get(students::get_students).post(students::post_student),
        )
        .route(
            "/api/students/{id}",
            get(students::get_student)
                .put(students::update_student)
                .patch(students::update_student)
                .delete(students::delete_student),
        )
        .with_state(state)
}

/// Decodes a JSON request body, keeping "no body at all" distinct from
/// "body that does not parse".
pub(crate) fn decode_body<T: DeserializeOwned>(bytes: &Bytes) -> RollbookResult<T> {
    snafu::ensure!(!bytes.is_empty(), EmptyBodySnafu);
    serde_json::from_slice(bytes).context(MalformedBodySnafu)
}

pub(crate) fn parse_id(raw: &str) -> RollbookResult<i64> {
    raw.parse().context(ParseIdSnafu { original: raw })
}
