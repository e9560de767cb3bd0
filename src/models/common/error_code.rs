use crate::errors::EvalHubError;

/// 业务错误码，写入 ApiResponse.code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    ValidationFailed = 1001,
    NotFound = 1004,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 作业
    AssignmentNotFound = 2001,
    AssignmentCreationFailed = 2002,

    // 提交
    SubmissionNotFound = 3001,
    SubmissionCreationFailed = 3002,
    SubmissionFileMissing = 3003,
    EvaluationInProgress = 3004,
    InvalidStatusTransition = 3005,

    // 评测
    EvaluationNotFound = 4001,
    ScoreOutOfRange = 4002,

    // 文件
    FileNotFound = 6001,
    FileUploadFailed = 6002,
    FileSizeExceeded = 6003,
    FileTypeNotAllowed = 6004,
    MultifileUploadNotAllowed = 6005,

    // AI 服务
    UnsupportedFormat = 7001,
    ExtractionFailed = 7002,
    UpstreamServiceError = 7003,
    AssessmentGenerationFailed = 7004,
}

impl From<&EvalHubError> for ErrorCode {
    fn from(err: &EvalHubError) -> Self {
        match err {
            EvalHubError::Validation(_) => ErrorCode::ValidationFailed,
            EvalHubError::NotFound(_) => ErrorCode::NotFound,
            EvalHubError::ScoreOutOfRange(_) => ErrorCode::ScoreOutOfRange,
            EvalHubError::EvaluationInProgress(_) => ErrorCode::EvaluationInProgress,
            EvalHubError::InvalidStatusTransition(_) => ErrorCode::InvalidStatusTransition,
            EvalHubError::UnsupportedFormat(_) => ErrorCode::UnsupportedFormat,
            EvalHubError::Fetch(_) => ErrorCode::ExtractionFailed,
            EvalHubError::Upstream(_) => ErrorCode::UpstreamServiceError,
            EvalHubError::BlobStorage(_) => ErrorCode::FileUploadFailed,
            _ => ErrorCode::InternalServerError,
        }
    }
}
