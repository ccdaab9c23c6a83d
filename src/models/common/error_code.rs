/// API 业务错误码
///
/// 0 表示成功；1xxx 通用错误；2xxx 选课申请；3xxx 分班；4xxx 付款。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 选课申请
    EnrollmentNotFound = 2000,
    EnrollmentInvalidState = 2001,
    EnrollmentDuplicateRequest = 2002,

    // 分班
    ClassNotFound = 3000,
    ClassCapacityExceeded = 3001,
    ClassAssignmentNotFound = 3002,

    // 付款
    InstallmentNotFound = 4000,
    InstallmentAlreadySatisfied = 4001,
}
