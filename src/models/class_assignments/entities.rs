use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学生的班级分配记录
//
// class_ids 不含重复项，按分配时间排序
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class_assignment.ts")]
pub struct ClassAssignment {
    pub student_id: i64,
    pub class_ids: Vec<i64>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl ClassAssignment {
    /// 学生尚无分配记录时返回的空文档
    pub fn empty(student_id: i64) -> Self {
        Self {
            student_id,
            class_ids: Vec::new(),
            updated_at: None,
        }
    }

    pub fn contains(&self, class_id: i64) -> bool {
        self.class_ids.contains(&class_id)
    }
}
