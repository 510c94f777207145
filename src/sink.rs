use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::dataset::Variant;
use crate::error::SinkWriteError;
use crate::session::DecisionRecord;

/// 完了したセッションの判定を受け取り永続化する
pub trait ResultSink {
    /// Write the full decision list, replacing any previous output.
    fn persist(
        &mut self,
        variant: Variant,
        decisions: &[DecisionRecord],
    ) -> Result<PathBuf, SinkWriteError>;
}

/// CSV ファイルへの書き込み
///
/// 同じディレクトリの一時ファイルに書いてから置き換えるため、
/// 再実行しても追記されず上書きになる。
#[derive(Debug, Clone)]
pub struct CsvFileSink {
    path: PathBuf,
}

impl CsvFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomic(&self, variant: Variant, decisions: &[DecisionRecord]) -> io::Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;

        let mut tmp = NamedTempFile::new_in(&parent)?;
        write_csv(tmp.as_file_mut(), variant, decisions)?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&self.path)?;
        Ok(())
    }
}

impl ResultSink for CsvFileSink {
    fn persist(
        &mut self,
        variant: Variant,
        decisions: &[DecisionRecord],
    ) -> Result<PathBuf, SinkWriteError> {
        self.write_atomic(variant, decisions)
            .map_err(|source| SinkWriteError {
                path: self.path.clone(),
                source,
            })?;
        Ok(self.path.clone())
    }
}

/// ヘッダ行 + 1 判定 1 行。判定が 0 件でもヘッダは書く。
pub fn write_csv<W: Write>(
    writer: W,
    variant: Variant,
    decisions: &[DecisionRecord],
) -> io::Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(variant.output_columns())?;
    for decision in decisions {
        match decision {
            DecisionRecord::Graded(r) => csv.serialize(r)?,
            DecisionRecord::Blind(r) => csv.serialize(r)?,
            DecisionRecord::ThreeWay(r) => csv.serialize(r)?,
        }
    }
    csv.flush()?;
    Ok(())
}
