use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程总评成绩
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct Grade {
    pub id: i64,
    pub course_id: i64,
    pub user_id: i64,
    pub score: f64,
    pub letter_grade: String,
    pub remarks: Option<String>,
    /// 是否为手动覆盖的成绩
    pub is_override: bool,
    pub updated_by: Option<i64>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 百分制分数对应的等级
pub fn letter_grade(score: f64) -> &'static str {
    const SCALE: [(f64, &str); 8] = [
        (85.0, "A"),
        (80.0, "A-"),
        (75.0, "B+"),
        (70.0, "B"),
        (65.0, "B-"),
        (60.0, "C+"),
        (55.0, "C"),
        (40.0, "D"),
    ];
    SCALE
        .iter()
        .find(|(min, _)| score >= *min)
        .map(|(_, letter)| *letter)
        .unwrap_or("E")
}

/// 已评分的提交，计算总评时使用
#[derive(Debug, Clone, PartialEq)]
pub struct GradedScore {
    pub user_id: i64,
    pub assessment_id: i64,
    pub weight: f64,
    pub score: f64,
}

/// 按学生计算加权平均分
///
/// 每个考核项取最高分；权重只在该学生已有成绩的考核项之间归一化。
/// 所有权重为 0 时退化为简单平均。
pub fn weighted_scores(scores: &[GradedScore]) -> HashMap<i64, f64> {
    let mut best: HashMap<(i64, i64), (f64, f64)> = HashMap::new();
    for s in scores {
        best.entry((s.user_id, s.assessment_id))
            .and_modify(|(_, score)| {
                if s.score > *score {
                    *score = s.score;
                }
            })
            .or_insert((s.weight, s.score));
    }

    let mut per_user: HashMap<i64, Vec<(f64, f64)>> = HashMap::new();
    for ((user_id, _), pair) in best {
        per_user.entry(user_id).or_default().push(pair);
    }

    per_user
        .into_iter()
        .map(|(user_id, pairs)| {
            let total_weight: f64 = pairs.iter().map(|(w, _)| w).sum();
            let value = if total_weight > 0.0 {
                pairs.iter().map(|(w, s)| w * s).sum::<f64>() / total_weight
            } else {
                pairs.iter().map(|(_, s)| s).sum::<f64>() / pairs.len() as f64
            };
            (user_id, (value * 100.0).round() / 100.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graded(user_id: i64, assessment_id: i64, weight: f64, score: f64) -> GradedScore {
        GradedScore {
            user_id,
            assessment_id,
            weight,
            score,
        }
    }

    #[test]
    fn test_letter_scale_boundaries() {
        assert_eq!(letter_grade(100.0), "A");
        assert_eq!(letter_grade(85.0), "A");
        assert_eq!(letter_grade(84.99), "A-");
        assert_eq!(letter_grade(75.0), "B+");
        assert_eq!(letter_grade(70.0), "B");
        assert_eq!(letter_grade(65.0), "B-");
        assert_eq!(letter_grade(60.0), "C+");
        assert_eq!(letter_grade(55.0), "C");
        assert_eq!(letter_grade(40.0), "D");
        assert_eq!(letter_grade(39.9), "E");
    }

    #[test]
    fn test_weighted_uses_best_attempt() {
        let scores = vec![
            graded(1, 10, 40.0, 50.0),
            graded(1, 10, 40.0, 80.0),
            graded(1, 11, 60.0, 90.0),
        ];
        let result = weighted_scores(&scores);
        // (40*80 + 60*90) / 100
        assert_eq!(result[&1], 86.0);
    }

    #[test]
    fn test_weights_normalised_over_graded_only() {
        let scores = vec![graded(2, 10, 20.0, 70.0)];
        assert_eq!(weighted_scores(&scores)[&2], 70.0);
    }

    #[test]
    fn test_zero_weights_fall_back_to_mean() {
        let scores = vec![graded(3, 10, 0.0, 60.0), graded(3, 11, 0.0, 80.0)];
        assert_eq!(weighted_scores(&scores)[&3], 70.0);
    }
}
