use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use snafu::Snafu;
use std::num::ParseIntError;

pub type RollbookResult<T> = Result<T, RollbookError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RollbookError {
    #[snafu(display("Error opening database"))]
    OpenDatabase { source: sqlx::Error },
    #[snafu(display("Error creating database schema"))]
    CreateSchema { source: sqlx::Error },
    #[snafu(display("Error making SQL query"))]
    MakeQuery { source: sqlx::Error },
    #[snafu(display("No student found with id {}", id))]
    MissingStudent { id: i64 },
    #[snafu(display("A student with email {:?} already exists", email))]
    DuplicateEmail { email: String },
    #[snafu(display("{}", problems.join(", ")))]
    InvalidStudent { problems: Vec<String> },
    #[snafu(display("empty body"))]
    EmptyBody,
    #[snafu(display("Unable to decode request body"))]
    MalformedBody { source: serde_json::Error },
    #[snafu(display("Unable to parse id {:?}", original))]
    ParseId {
        source: ParseIntError,
        original: String,
    },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
}

/// Wire shape of every failed response.
#[derive(Serialize)]
struct ErrorBody {
    status: &'static str,
    error: String,
}

impl IntoResponse for RollbookError {
    fn into_response(self) -> Response {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR;
        const NF: StatusCode = StatusCode::NOT_FOUND;
        const BI: StatusCode = StatusCode::BAD_REQUEST;

        let status_code = match &self {
            Self::OpenDatabase { .. } | Self::CreateSchema { .. } => ISE,
            Self::MakeQuery { source } => match source {
                sqlx::Error::RowNotFound => NF,
                _ => ISE,
            },
            Self::MissingStudent { .. } => NF,
            Self::DuplicateEmail { .. } => BI,
            Self::InvalidStudent { .. } => BI,
            Self::EmptyBody => BI,
            Self::MalformedBody { .. } => BI,
            Self::ParseId { .. } => BI,
            Self::BadEnvVar { .. } => ISE,
        };

        error!(?self, "Error!");
        let body = ErrorBody {
            status: "Error",
            error: self.to_string(),
        };
        (status_code, Json(body)).into_response()
    }
}
