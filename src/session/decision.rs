use serde::Serialize;

use crate::config::KeybindingsConfig;
use crate::dataset::{Dataset, Variant};
use crate::worklist::{ComparisonItem, ComparisonKind, Completion};

/// 3 段階評価（固定尺度）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Worse,
    Same,
    Better,
}

impl Grade {
    pub const ALL: [Grade; 3] = [Grade::Worse, Grade::Same, Grade::Better];

    pub fn value(self) -> i8 {
        match self {
            Grade::Worse => -1,
            Grade::Same => 0,
            Grade::Better => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Grade::Worse => "Хуже",
            Grade::Same => "Одинаково",
            Grade::Better => "Лучше",
        }
    }
}

/// 表示上の位置（1 = 左, 2 = 右）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    First,
    Second,
}

impl Position {
    pub const ALL: [Position; 2] = [Position::First, Position::Second];

    pub fn number(self) -> u8 {
        match self {
            Position::First => 1,
            Position::Second => 2,
        }
    }
}

/// 評価者の入力
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Grade(Grade),
    Position(Position),
}

impl Choice {
    /// The discrete actions offered for a variant, in button order.
    pub fn actions(variant: Variant) -> Vec<Choice> {
        match variant {
            Variant::Absolute => Grade::ALL.into_iter().map(Choice::Grade).collect(),
            Variant::Blind | Variant::ThreeWay => {
                Position::ALL.into_iter().map(Choice::Position).collect()
            }
        }
    }

    /// Interpret a single typed character. Anything outside the variant's
    /// choice set yields `None`.
    pub fn from_symbol(variant: Variant, symbol: char, keys: &KeybindingsConfig) -> Option<Self> {
        match variant {
            Variant::Absolute => {
                if symbol == keys.worse {
                    Some(Choice::Grade(Grade::Worse))
                } else if symbol == keys.same {
                    Some(Choice::Grade(Grade::Same))
                } else if symbol == keys.better {
                    Some(Choice::Grade(Grade::Better))
                } else {
                    None
                }
            }
            Variant::Blind | Variant::ThreeWay => {
                if symbol == keys.option_1 {
                    Some(Choice::Position(Position::First))
                } else if symbol == keys.option_2 {
                    Some(Choice::Position(Position::Second))
                } else {
                    None
                }
            }
        }
    }

    /// Key shown on the button for this choice.
    pub fn symbol(self, keys: &KeybindingsConfig) -> char {
        match self {
            Choice::Grade(Grade::Worse) => keys.worse,
            Choice::Grade(Grade::Same) => keys.same,
            Choice::Grade(Grade::Better) => keys.better,
            Choice::Position(Position::First) => keys.option_1,
            Choice::Position(Position::Second) => keys.option_2,
        }
    }

    pub fn label(self, variant: Variant) -> String {
        match (self, variant) {
            (Choice::Grade(grade), _) => grade.label().to_string(),
            (Choice::Position(pos), Variant::ThreeWay) => format!("Вариант {}", pos.number()),
            (Choice::Position(pos), _) => format!("Описание {}", pos.number()),
        }
    }
}

/// blind で比較される説明
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Description {
    #[serde(rename = "gen")]
    Generated,
    #[serde(rename = "true")]
    True,
}

impl Description {
    /// `swap` を考慮して表示順に並べる
    pub fn display_order(swap: bool) -> [Description; 2] {
        if swap {
            [Description::True, Description::Generated]
        } else {
            [Description::Generated, Description::True]
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradedRecord {
    pub title: String,
    pub true_desc: String,
    pub gen_desc: String,
    pub grade: i8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlindRecord {
    pub title: String,
    pub gen_desc: String,
    pub true_desc: String,
    pub swap: u8,
    pub selected_position: u8,
    pub selected_desc: Description,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreeWayRecord {
    pub publication_index: usize,
    pub title: String,
    pub comparison: ComparisonKind,
    pub option_1: Completion,
    pub option_2: Completion,
    pub selected_position: u8,
    pub selected_source: Completion,
    pub desc: String,
    pub beginning: String,
    pub continuation: String,
    pub generated_baseline: String,
    pub generated_finetuned: String,
}

/// 1 件の判定結果（出力 CSV の 1 行）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionRecord {
    Graded(GradedRecord),
    Blind(BlindRecord),
    ThreeWay(ThreeWayRecord),
}

/// Turn a choice made on the displayed arrangement into a record holding the
/// logical (de-randomized) selection. Returns `None` if the choice does not
/// fit the item.
pub fn resolve(item: &ComparisonItem, dataset: &Dataset, choice: Choice) -> Option<DecisionRecord> {
    match (item, choice) {
        (ComparisonItem::Graded { row }, Choice::Grade(grade)) => {
            let source = dataset.description_row(*row)?;
            Some(DecisionRecord::Graded(GradedRecord {
                title: source.title.clone(),
                true_desc: source.true_desc.clone(),
                gen_desc: source.gen_desc.clone(),
                grade: grade.value(),
            }))
        }
        (ComparisonItem::Blind { row, swap }, Choice::Position(position)) => {
            let source = dataset.description_row(*row)?;
            let [first, second] = Description::display_order(*swap);
            let selected_desc = match position {
                Position::First => first,
                Position::Second => second,
            };
            Some(DecisionRecord::Blind(BlindRecord {
                title: source.title.clone(),
                gen_desc: source.gen_desc.clone(),
                true_desc: source.true_desc.clone(),
                swap: u8::from(*swap),
                selected_position: position.number(),
                selected_desc,
            }))
        }
        (ComparisonItem::ThreeWay(t), Choice::Position(position)) => {
            let source = dataset.publication_row(t.publication_index)?;
            let selected_source = match position {
                Position::First => t.option_a,
                Position::Second => t.option_b,
            };
            Some(DecisionRecord::ThreeWay(ThreeWayRecord {
                publication_index: t.publication_index,
                title: source.title.clone(),
                comparison: t.kind,
                option_1: t.option_a,
                option_2: t.option_b,
                selected_position: position.number(),
                selected_source,
                desc: source.desc.clone(),
                beginning: source.beginning.clone(),
                continuation: source.continuation.clone(),
                generated_baseline: source.generated_baseline.clone(),
                generated_finetuned: source.generated_finetuned.clone(),
            }))
        }
        _ => None,
    }
}
