use axum::{http::StatusCode, response::IntoResponse};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    ValidationError(#[from] garde::Report),
    #[error("トランザクションを実行できませんでした。")]
    TransactionError(#[source] sqlx::Error),
    #[error("データベース処理実行中にエラーが発生しました。")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("データベースへの問い合わせに失敗しました。")]
    DbQueryError(#[source] sqlx::Error),
    #[error("No rows affected: {0}")]
    NoRowsAffectedError(String),
    #[error("{0}")]
    ConversionEntityError(String),
    #[error("メッセージの解釈に失敗しました。")]
    DeserializationError(#[from] serde_json::Error),
    #[error("{0}")]
    ExternalServiceError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match self {
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) | AppError::ConversionEntityError(_) => {
                StatusCode::BAD_REQUEST
            }
            ref e @ (AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::DbQueryError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::DeserializationError(_)
            | AppError::ExternalServiceError(_)) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Unexpected error happened"
                );
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status_code, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_expected_status_codes() {
        let cases: Vec<(AppError, StatusCode)> = vec![
            (
                AppError::UnprocessableEntity("既存の予約と重複しています。".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::EntityNotFound("予約が見つかりませんでした。".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::ConversionEntityError("不正な予約ステータスです".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::NoRowsAffectedError("No reservation record has been created".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::ExternalServiceError("AMQP ブローカーでエラーが発生しました".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
