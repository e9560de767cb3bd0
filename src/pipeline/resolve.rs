//! 当前评测的判定

use crate::models::evaluations::{entities::Evaluation, requests::EvaluationView};

/// 从最新在前的评测列表中选出提交的当前评测
///
/// 教师视角取第一条匹配的记录，学生视角只看已发布的记录。
pub fn resolve_current<'a>(
    evaluations: &'a [Evaluation],
    submission_id: &str,
    view: EvaluationView,
) -> Option<&'a Evaluation> {
    evaluations.iter().find(|e| {
        e.submission_id == submission_id
            && match view {
                EvaluationView::Faculty => true,
                EvaluationView::Student => e.is_published,
            }
    })
}
