//! アップロードされた CSV の読み込みと検証
//!
//! カラム名は完全一致（大文字小文字を区別）。必須カラム以外は無視する。

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;
use tracing::{debug, info};

use crate::error::LoadError;

/// 比較プロトコル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Variant {
    /// Grade the generated description against the true one
    Absolute,
    /// Blind preference between the generated and the true description
    Blind,
    /// Pairwise preference over three completion sources
    #[value(name = "three-way")]
    ThreeWay,
}

impl Variant {
    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            Variant::Absolute | Variant::Blind => &["title", "gen_desc", "true_desc"],
            Variant::ThreeWay => &[
                "title",
                "desc",
                "beginning",
                "continuation",
                "generated_baseline",
                "generated_finetuned",
            ],
        }
    }

    /// 結果 CSV のカラム（レコード構造体のフィールド順と一致させること）
    pub fn output_columns(self) -> &'static [&'static str] {
        match self {
            Variant::Absolute => &["title", "true_desc", "gen_desc", "grade"],
            Variant::Blind => &[
                "title",
                "gen_desc",
                "true_desc",
                "swap",
                "selected_position",
                "selected_desc",
            ],
            Variant::ThreeWay => &[
                "publication_index",
                "title",
                "comparison",
                "option_1",
                "option_2",
                "selected_position",
                "selected_source",
                "desc",
                "beginning",
                "continuation",
                "generated_baseline",
                "generated_finetuned",
            ],
        }
    }

    /// Number of exclusive choice actions offered per item.
    pub fn choice_count(self) -> usize {
        match self {
            Variant::Absolute => 3,
            Variant::Blind | Variant::ThreeWay => 2,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Variant::Absolute => "Absolute grading",
            Variant::Blind => "Blind pairwise",
            Variant::ThreeWay => "Three-way pairwise",
        }
    }

    pub fn cli_name(self) -> &'static str {
        match self {
            Variant::Absolute => "absolute",
            Variant::Blind => "blind",
            Variant::ThreeWay => "three-way",
        }
    }
}

/// absolute / blind 用の入力行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionRow {
    pub title: String,
    pub gen_desc: String,
    pub true_desc: String,
}

/// three-way 用の入力行（1 出版物）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationRow {
    pub title: String,
    pub desc: String,
    pub beginning: String,
    pub continuation: String,
    pub generated_baseline: String,
    pub generated_finetuned: String,
}

/// 読み込み済みデータセット。読み込み後は不変。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dataset {
    Absolute(Vec<DescriptionRow>),
    Blind(Vec<DescriptionRow>),
    ThreeWay(Vec<PublicationRow>),
}

/// A parsed dataset plus the fingerprint of the bytes it came from.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub fingerprint: u64,
}

impl Dataset {
    pub fn variant(&self) -> Variant {
        match self {
            Dataset::Absolute(_) => Variant::Absolute,
            Dataset::Blind(_) => Variant::Blind,
            Dataset::ThreeWay(_) => Variant::ThreeWay,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Dataset::Absolute(rows) | Dataset::Blind(rows) => rows.len(),
            Dataset::ThreeWay(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn description_row(&self, index: usize) -> Option<&DescriptionRow> {
        match self {
            Dataset::Absolute(rows) | Dataset::Blind(rows) => rows.get(index),
            Dataset::ThreeWay(_) => None,
        }
    }

    pub fn publication_row(&self, index: usize) -> Option<&PublicationRow> {
        match self {
            Dataset::ThreeWay(rows) => rows.get(index),
            _ => None,
        }
    }

    /// CSV バイト列をパースする
    pub fn from_csv(variant: Variant, bytes: &[u8]) -> Result<Self, LoadError> {
        let mut reader = csv::ReaderBuilder::new().from_reader(bytes);

        let headers = reader.headers()?.clone();
        let missing: Vec<String> = variant
            .required_columns()
            .iter()
            .filter(|col| !headers.iter().any(|h| h == **col))
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            debug!(?missing, "dataset rejected: missing columns");
            return Err(LoadError::Validation { missing });
        }

        let dataset = match variant {
            Variant::Absolute => Dataset::Absolute(read_rows(&mut reader)?),
            Variant::Blind => Dataset::Blind(read_rows(&mut reader)?),
            Variant::ThreeWay => Dataset::ThreeWay(read_rows(&mut reader)?),
        };
        Ok(dataset)
    }

    /// ファイルから読み込み、指紋（生バイトのハッシュ）も返す
    pub fn load(variant: Variant, path: &Path) -> Result<LoadedDataset, LoadError> {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_csv(variant, &bytes)?;
        info!(
            path = %path.display(),
            rows = dataset.len(),
            variant = variant.cli_name(),
            "dataset loaded"
        );
        Ok(LoadedDataset {
            dataset,
            fingerprint: fingerprint(&bytes),
        })
    }
}

fn read_rows<T, R>(reader: &mut csv::Reader<R>) -> Result<Vec<T>, LoadError>
where
    T: for<'de> Deserialize<'de>,
    R: std::io::Read,
{
    reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(LoadError::from)
}

/// 生バイトのハッシュ（同一ファイルの再アップロード判定用）
pub fn fingerprint(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}
