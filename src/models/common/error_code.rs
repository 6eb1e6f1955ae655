use serde::{Deserialize, Serialize};
use ts_rs::TS;

// API 业务错误码
// code 为 0 表示成功，HTTP 语义错误沿用 4xx/5xx，业务细分错误使用 1xxx
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 400,
    Unauthorized = 401,
    Forbidden = 403,
    NotFound = 404,
    RateLimitExceeded = 429,
    InternalServerError = 500,

    // 认证
    AuthFailed = 1001,

    // 用户
    UserNotFound = 1101,
    UserAlreadyExists = 1102,
    UserNameInvalid = 1103,
    UserEmailInvalid = 1104,
    UserPasswordInvalid = 1105,
    UserCreationFailed = 1106,
    UserUpdateFailed = 1107,
    UserDeleteFailed = 1108,
    CanNotDeleteCurrentUser = 1109,

    // 学生
    StudentNotFound = 1201,
    StudentCreationFailed = 1202,
    StudentUpdateFailed = 1203,
    StudentDeleteFailed = 1204,

    // 表单
    FormNotFound = 1301,
    FormValidationFailed = 1302,
    FormLocked = 1303,
    FormDeleteFailed = 1304,

    // 表单回复
    NotInRoster = 1401,
    NotStudentGuardian = 1402,
    DuplicateSubmission = 1403,
    AnswerValidationFailed = 1404,
    ResponseNotFound = 1405,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::NotFound as i32, 404);
        assert_eq!(ErrorCode::FormValidationFailed as i32, 1302);
        assert_eq!(ErrorCode::DuplicateSubmission as i32, 1403);
    }
}
