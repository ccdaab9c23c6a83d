use serde::Deserialize;
use ts_rs::TS;

// 移除班级请求，class_ids 为空表示移除全部
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class_assignment.ts")]
pub struct RemoveClassesRequest {
    #[serde(default)]
    pub class_ids: Vec<i64>,
}
