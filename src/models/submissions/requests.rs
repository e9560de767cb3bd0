use serde::Deserialize;
use ts_rs::TS;

/// 提交列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct SubmissionListQuery {
    pub assignment_id: Option<String>,
}

/// 存储层创建提交的参数（文件已上传完成）
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub assignment_id: String,
    pub student_id: String,
    pub student_name: String,
    pub file_path: String,
    pub file_name: String,
    pub file_type: String,
}

/// 待上传的提交文件
#[derive(Debug, Clone)]
pub struct SubmissionUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
