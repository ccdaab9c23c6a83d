use serde::Serialize;
use ts_rs::TS;

use crate::models::catalog::entities::Class;

// 已分配班级（含展示信息）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class_assignment.ts")]
pub struct AssignedClass {
    pub class: Class,
    pub course_title: Option<String>,
    pub assigned_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class_assignment.ts")]
pub struct AssignedClassListResponse {
    pub student_id: i64,
    pub items: Vec<AssignedClass>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class_assignment.ts")]
pub struct AssignedClassCountResponse {
    pub student_id: i64,
    pub count: i64,
}

// 可选班级列表
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class_assignment.ts")]
pub struct AvailableClassesResponse {
    pub student_id: i64,
    pub items: Vec<Class>,
}
