use std::sync::Arc;

use crate::models::{
    catalog::{
        entities::{Class, Course},
        requests::{CreateClassRequest, CreateCourseRequest},
    },
    class_assignments::{entities::ClassAssignment, responses::AssignedClass},
    enrollments::{
        entities::EnrollmentRequest,
        requests::EnrollmentListQuery,
        responses::{EnrollmentDeletionReceipt, EnrollmentListResponse, EnrollmentRequestDetail},
    },
    payments::entities::PaymentInstallment,
    users::{entities::User, requests::CreateUserRequest},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户方法（身份数据镜像）
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;

    /// 课程目录方法
    // 创建课程
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course>;
    // 通过ID获取课程
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    // 创建班级
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class>;
    // 通过ID获取班级
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;

    /// 选课申请方法
    // 提交申请
    async fn create_enrollment_request(
        &self,
        student_id: i64,
        course_id: i64,
        preferred_level: Option<String>,
    ) -> Result<EnrollmentRequest>;
    // 通过ID获取申请
    async fn get_enrollment_request_by_id(&self, id: i64) -> Result<Option<EnrollmentRequest>>;
    // 获取申请详情（含学生、课程、班级信息）
    async fn get_enrollment_request_detail(
        &self,
        id: i64,
    ) -> Result<Option<EnrollmentRequestDetail>>;
    // 列出申请
    async fn list_enrollment_requests_with_pagination(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse>;
    // 批准申请并分班
    async fn approve_enrollment_request(
        &self,
        id: i64,
        class_id: i64,
        admin_notes: Option<String>,
    ) -> Result<EnrollmentRequest>;
    // 拒绝申请
    async fn reject_enrollment_request(
        &self,
        id: i64,
        admin_notes: Option<String>,
    ) -> Result<EnrollmentRequest>;
    // 删除申请（级联释放班级名额）
    async fn delete_enrollment_request(
        &self,
        id: i64,
        deleted_by: i64,
    ) -> Result<EnrollmentDeletionReceipt>;
    // 标记注册费已缴
    async fn mark_registration_fee_paid(&self, id: i64) -> Result<EnrollmentRequest>;

    /// 分班方法
    // 获取学生的分班记录
    async fn get_class_assignment(&self, student_id: i64) -> Result<Option<ClassAssignment>>;
    // 学生可选的班级
    async fn get_available_classes(&self, student_id: i64) -> Result<Vec<Class>>;
    // 已分配班级数量
    async fn count_assigned_classes(&self, student_id: i64) -> Result<i64>;
    // 已分配班级列表
    async fn get_student_assigned_classes(&self, student_id: i64) -> Result<Vec<AssignedClass>>;
    // 移除班级，空列表表示全部移除
    async fn remove_classes(&self, student_id: i64, class_ids: Vec<i64>)
    -> Result<ClassAssignment>;

    /// 分期付款方法
    // 列出分期
    async fn list_installments(&self, request_id: i64) -> Result<Vec<PaymentInstallment>>;
    // 记录付款
    async fn record_payment(
        &self,
        request_id: i64,
        installment_no: Option<i32>,
    ) -> Result<PaymentInstallment>;
    // 退款
    async fn refund_installment(
        &self,
        request_id: i64,
        installment_no: i32,
    ) -> Result<PaymentInstallment>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
