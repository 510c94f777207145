//! ワークリスト生成
//!
//! ランダム化（左右の入れ替え・全体シャッフル）は生成時に一度だけ引き、
//! `ComparisonItem` に保持する。描画時に再抽選してはならない。

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::dataset::Dataset;

/// three-way で比較される生成元
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    GeneratedBaseline,
    GeneratedFinetuned,
    Continuation,
}

impl Completion {
    pub fn as_str(self) -> &'static str {
        match self {
            Completion::GeneratedBaseline => "generated_baseline",
            Completion::GeneratedFinetuned => "generated_finetuned",
            Completion::Continuation => "continuation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonKind {
    FinetunedVsBaseline,
    FinetunedVsContinuation,
}

impl ComparisonKind {
    pub const ALL: [ComparisonKind; 2] = [
        ComparisonKind::FinetunedVsBaseline,
        ComparisonKind::FinetunedVsContinuation,
    ];

    /// 比較する 2 つの生成元（ランダム化前の論理順）
    pub fn sources(self) -> (Completion, Completion) {
        match self {
            ComparisonKind::FinetunedVsBaseline => {
                (Completion::GeneratedFinetuned, Completion::GeneratedBaseline)
            }
            ComparisonKind::FinetunedVsContinuation => {
                (Completion::GeneratedFinetuned, Completion::Continuation)
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonKind::FinetunedVsBaseline => "finetuned_vs_baseline",
            ComparisonKind::FinetunedVsContinuation => "finetuned_vs_continuation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreeWayItem {
    pub publication_index: usize,
    pub kind: ComparisonKind,
    /// "Вариант 1" として表示される生成元
    pub option_a: Completion,
    pub option_b: Completion,
}

/// 評価者に提示する 1 単位の作業
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonItem {
    /// 3 段階評価（尺度は固定）
    Graded { row: usize },
    /// `swap == true` なら真の説明を先に表示する
    Blind { row: usize, swap: bool },
    ThreeWay(ThreeWayItem),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Worklist {
    items: Vec<ComparisonItem>,
}

impl Worklist {
    pub fn items(&self) -> &[ComparisonItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&ComparisonItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Build the worklist for a dataset, drawing all randomization from `rng`.
pub fn generate<R: Rng + ?Sized>(dataset: &Dataset, rng: &mut R) -> Worklist {
    let items = match dataset {
        Dataset::Absolute(rows) => (0..rows.len())
            .map(|row| ComparisonItem::Graded { row })
            .collect(),
        Dataset::Blind(rows) => (0..rows.len())
            .map(|row| ComparisonItem::Blind {
                row,
                swap: rng.random_bool(0.5),
            })
            .collect(),
        Dataset::ThreeWay(rows) => {
            let mut items = Vec::with_capacity(rows.len() * ComparisonKind::ALL.len());
            for publication_index in 0..rows.len() {
                for kind in ComparisonKind::ALL {
                    let (first, second) = kind.sources();
                    let (option_a, option_b) = if rng.random_bool(0.5) {
                        (second, first)
                    } else {
                        (first, second)
                    };
                    items.push(ComparisonItem::ThreeWay(ThreeWayItem {
                        publication_index,
                        kind,
                        option_a,
                        option_b,
                    }));
                }
            }
            // 行と比較種別をまたいだ全体シャッフル
            items.shuffle(rng);
            items
        }
    };
    Worklist { items }
}
