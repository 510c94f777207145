//! 評価者に見せる内容の組み立て
//!
//! 表示順は `ComparisonItem` に保存済みのランダム化だけから決まる。
//! 同じ項目を何度描画しても左右は入れ替わらない。

use crate::dataset::{Dataset, DescriptionRow, PublicationRow};
use crate::session::Description;
use crate::worklist::{ComparisonItem, Completion};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel<'a> {
    pub heading: String,
    pub text: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView<'a> {
    /// 比較対象ではない文脈（タイトルなど）
    pub context: Vec<Panel<'a>>,
    /// 表示順に並んだ 2 つの比較対象
    pub panels: [Panel<'a>; 2],
}

fn panel(heading: impl Into<String>, text: &str) -> Panel<'_> {
    Panel {
        heading: heading.into(),
        text,
    }
}

pub fn description_text(row: &DescriptionRow, description: Description) -> &str {
    match description {
        Description::Generated => &row.gen_desc,
        Description::True => &row.true_desc,
    }
}

pub fn completion_text(row: &PublicationRow, completion: Completion) -> &str {
    match completion {
        Completion::GeneratedBaseline => &row.generated_baseline,
        Completion::GeneratedFinetuned => &row.generated_finetuned,
        Completion::Continuation => &row.continuation,
    }
}

/// Build the view of `item`. `None` if the item does not belong to `dataset`.
pub fn item_view<'a>(item: &ComparisonItem, dataset: &'a Dataset) -> Option<ItemView<'a>> {
    match *item {
        ComparisonItem::Graded { row } => {
            let source = dataset.description_row(row)?;
            Some(ItemView {
                context: vec![panel("Название", &source.title)],
                panels: [
                    panel("Сгенерированное описание", &source.gen_desc),
                    panel("Реальное описание", &source.true_desc),
                ],
            })
        }
        ComparisonItem::Blind { row, swap } => {
            let source = dataset.description_row(row)?;
            let [first, second] = Description::display_order(swap);
            Some(ItemView {
                context: vec![panel("Название", &source.title)],
                panels: [
                    panel("Описание 1", description_text(source, first)),
                    panel("Описание 2", description_text(source, second)),
                ],
            })
        }
        ComparisonItem::ThreeWay(t) => {
            let source = dataset.publication_row(t.publication_index)?;
            Some(ItemView {
                context: vec![
                    panel("Название", &source.title),
                    panel("Описание", &source.desc),
                    panel("Начало", &source.beginning),
                ],
                panels: [
                    panel("Вариант 1", completion_text(source, t.option_a)),
                    panel("Вариант 2", completion_text(source, t.option_b)),
                ],
            })
        }
    }
}
