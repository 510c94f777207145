//! 判定の集計（表示専用。CSV には書き出さない）

use serde::Serialize;

use crate::dataset::Variant;
use crate::session::{DecisionRecord, Description};
use crate::worklist::{ComparisonKind, Completion};

/// 1 行分の集計
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub label: String,
    pub count: usize,
    /// 同じグループ内での割合（0.0〜1.0）
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub rows: Vec<SummaryRow>,
    /// absolute のみ: 平均評価
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_grade: Option<f64>,
}

fn share(count: usize, of: usize) -> f64 {
    if of == 0 {
        0.0
    } else {
        count as f64 / of as f64
    }
}

fn row(label: impl Into<String>, count: usize, of: usize) -> SummaryRow {
    SummaryRow {
        label: label.into(),
        count,
        share: share(count, of),
    }
}

impl Summary {
    pub fn from_decisions(variant: Variant, decisions: &[DecisionRecord]) -> Self {
        let total = decisions.len();
        match variant {
            Variant::Absolute => {
                let grades: Vec<i8> = decisions
                    .iter()
                    .filter_map(|d| match d {
                        DecisionRecord::Graded(r) => Some(r.grade),
                        _ => None,
                    })
                    .collect();
                let count = |g: i8| grades.iter().filter(|&&x| x == g).count();
                let mean_grade = (!grades.is_empty()).then(|| {
                    grades.iter().map(|&g| f64::from(g)).sum::<f64>() / grades.len() as f64
                });
                Self {
                    total,
                    rows: vec![
                        row("worse", count(-1), grades.len()),
                        row("same", count(0), grades.len()),
                        row("better", count(1), grades.len()),
                    ],
                    mean_grade,
                }
            }
            Variant::Blind => {
                let selected: Vec<Description> = decisions
                    .iter()
                    .filter_map(|d| match d {
                        DecisionRecord::Blind(r) => Some(r.selected_desc),
                        _ => None,
                    })
                    .collect();
                let count = |d: Description| selected.iter().filter(|&&x| x == d).count();
                Self {
                    total,
                    rows: vec![
                        row("gen", count(Description::Generated), selected.len()),
                        row("true", count(Description::True), selected.len()),
                    ],
                    mean_grade: None,
                }
            }
            Variant::ThreeWay => {
                let mut rows = Vec::with_capacity(4);
                for kind in ComparisonKind::ALL {
                    let winners: Vec<Completion> = decisions
                        .iter()
                        .filter_map(|d| match d {
                            DecisionRecord::ThreeWay(r) if r.comparison == kind => {
                                Some(r.selected_source)
                            }
                            _ => None,
                        })
                        .collect();
                    // finetuned とその対戦相手の勝数
                    let (first, second) = kind.sources();
                    for source in [first, second] {
                        let wins = winners.iter().filter(|&&w| w == source).count();
                        rows.push(row(
                            format!("{}: {}", kind.as_str(), source.as_str()),
                            wins,
                            winners.len(),
                        ));
                    }
                }
                Self {
                    total,
                    rows,
                    mean_grade: None,
                }
            }
        }
    }
}
