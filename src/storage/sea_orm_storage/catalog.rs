//! 课程与班级目录存储操作
//!
//! 目录由外部系统维护，这里只提供初始化数据与只读查询；
//! `current_enrollment` 的变更全部由选课流程完成。

use super::SeaOrmStorage;
use crate::entity::classes::{ActiveModel as ClassActiveModel, Entity as Classes};
use crate::entity::courses::{ActiveModel as CourseActiveModel, Entity as Courses};
use crate::errors::{EnrollmentError, Result};
use crate::models::catalog::{
    entities::{Class, Course},
    requests::{CreateClassRequest, CreateCourseRequest},
};
use crate::models::payments::schedule::{MAX_INSTALLMENTS, PaymentPlan};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        if req.price < 0 {
            return Err(EnrollmentError::validation("Course price must not be negative"));
        }
        if req.installment_count < 1 || req.installment_count as usize > MAX_INSTALLMENTS {
            return Err(EnrollmentError::validation(format!(
                "Installment count must be between 1 and {MAX_INSTALLMENTS}"
            )));
        }

        // 自定义方案必须与价格和分期数一致
        let payment_plan = match req.payment_plan {
            Some(plan) => {
                plan.validate(req.price)?;
                if plan.installment_count() != req.installment_count as usize {
                    return Err(EnrollmentError::validation(
                        "Payment plan length must match installment count",
                    ));
                }
                Some(serde_json::to_string(&plan)?)
            }
            None => {
                PaymentPlan::equal_split(req.installment_count).validate(req.price)?;
                None
            }
        };

        let currency = req
            .currency
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| self.default_currency.clone());
        let now = chrono::Utc::now().timestamp();

        let model = CourseActiveModel {
            title: Set(req.title),
            description: Set(req.description),
            price: Set(req.price),
            currency: Set(currency),
            installment_count: Set(req.installment_count),
            payment_plan: Set(payment_plan),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("创建课程失败: {e}")))?;

        result.into_course()
    }

    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("查询课程失败: {e}")))?;

        result.map(|m| m.into_course()).transpose()
    }

    /// 创建班级
    pub async fn create_class_impl(&self, req: CreateClassRequest) -> Result<Class> {
        if req.capacity < 0 || req.current_enrollment < 0 {
            return Err(EnrollmentError::validation(
                "Class capacity and enrollment must not be negative",
            ));
        }
        if req.current_enrollment > req.capacity {
            return Err(EnrollmentError::validation(
                "Class enrollment must not exceed capacity",
            ));
        }
        if self.get_course_by_id_impl(req.course_id).await?.is_none() {
            return Err(EnrollmentError::validation(format!(
                "Course {} does not exist",
                req.course_id
            )));
        }

        let now = chrono::Utc::now().timestamp();

        let model = ClassActiveModel {
            course_id: Set(req.course_id),
            class_name: Set(req.class_name),
            teacher_name: Set(req.teacher_name),
            schedule: Set(req.schedule),
            capacity: Set(req.capacity),
            current_enrollment: Set(req.current_enrollment),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("创建班级失败: {e}")))?;

        Ok(result.into_class())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }
}
