//! 評価セッションの状態機械
//!
//! `AwaitingUpload → InProgress → Complete`。遷移は純粋関数 [`apply`] で表し、
//! 結果シンクへの書き込みは Complete への遷移時に [`Session`] が一度だけ行う。

use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::dataset::{Dataset, LoadedDataset, Variant};
use crate::error::{SessionError, SinkWriteError};
use crate::sink::ResultSink;
use crate::worklist::{self, ComparisonItem, Worklist};

mod decision;
pub use decision::*;

/// アップロード済みデータセットに対する進捗
#[derive(Debug, Clone)]
pub struct Progress {
    pub dataset: Dataset,
    pub fingerprint: u64,
    pub worklist: Worklist,
    /// 解決済みの判定（`len() == cursor`）
    pub decisions: Vec<DecisionRecord>,
}

impl Progress {
    fn fresh<R: Rng + ?Sized>(dataset: Dataset, fingerprint: u64, rng: &mut R) -> Self {
        let worklist = worklist::generate(&dataset, rng);
        Self {
            dataset,
            fingerprint,
            worklist,
            decisions: Vec::new(),
        }
    }

    pub fn cursor(&self) -> usize {
        self.decisions.len()
    }

    pub fn current_item(&self) -> Option<&ComparisonItem> {
        self.worklist.get(self.cursor())
    }

    fn is_finished(&self) -> bool {
        self.cursor() >= self.worklist.len()
    }
}

#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    AwaitingUpload,
    InProgress(Progress),
    Complete(Progress),
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        match self {
            SessionState::AwaitingUpload => Phase::AwaitingUpload,
            SessionState::InProgress(_) => Phase::InProgress,
            SessionState::Complete(_) => Phase::Complete,
        }
    }

    pub fn progress(&self) -> Option<&Progress> {
        match self {
            SessionState::AwaitingUpload => None,
            SessionState::InProgress(p) | SessionState::Complete(p) => Some(p),
        }
    }

    /// Start a session on `progress`, going straight to `Complete` when
    /// there is nothing to rate.
    fn start(progress: Progress) -> Step {
        if progress.worklist.is_empty() {
            Step {
                state: SessionState::Complete(progress),
                outcome: Outcome::Completed,
            }
        } else {
            Step {
                state: SessionState::InProgress(progress),
                outcome: Outcome::Started,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingUpload,
    InProgress,
    Complete,
}

#[derive(Debug, Clone)]
pub enum Event {
    Upload { dataset: Dataset, fingerprint: u64 },
    Decide(Choice),
    Reset,
}

/// 遷移の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 新しいワークリストで開始した
    Started,
    /// 同一データセットの再アップロード（ランダム化は維持）
    Unchanged,
    /// 判定を 1 件記録した
    Recorded,
    /// 最後の判定で Complete に遷移した（永続化が必要）
    Completed,
    /// 受理されなかった入力（状態は不変）
    Ignored,
}

#[derive(Debug, Clone)]
pub struct Step {
    pub state: SessionState,
    pub outcome: Outcome,
}

impl Step {
    fn unchanged(state: SessionState, outcome: Outcome) -> Self {
        Self { state, outcome }
    }
}

/// `(SessionState, Event) -> Step`
///
/// 乱数はワークリストを（再）生成するときにのみ引く。
pub fn apply<R: Rng + ?Sized>(state: SessionState, event: Event, rng: &mut R) -> Step {
    match (state, event) {
        (SessionState::InProgress(progress), Event::Upload { fingerprint, .. })
            if progress.fingerprint == fingerprint =>
        {
            Step::unchanged(SessionState::InProgress(progress), Outcome::Unchanged)
        }
        (_, Event::Upload {
            dataset,
            fingerprint,
        }) => SessionState::start(Progress::fresh(dataset, fingerprint, rng)),

        (SessionState::InProgress(mut progress), Event::Decide(choice)) => {
            let record = progress
                .current_item()
                .and_then(|item| resolve(item, &progress.dataset, choice));
            let Some(record) = record else {
                return Step::unchanged(SessionState::InProgress(progress), Outcome::Ignored);
            };
            progress.decisions.push(record);
            if progress.is_finished() {
                Step {
                    state: SessionState::Complete(progress),
                    outcome: Outcome::Completed,
                }
            } else {
                Step {
                    state: SessionState::InProgress(progress),
                    outcome: Outcome::Recorded,
                }
            }
        }
        (state, Event::Decide(_)) => Step::unchanged(state, Outcome::Ignored),

        (SessionState::InProgress(progress) | SessionState::Complete(progress), Event::Reset) => {
            SessionState::start(Progress::fresh(
                progress.dataset,
                progress.fingerprint,
                rng,
            ))
        }
        (SessionState::AwaitingUpload, Event::Reset) => {
            Step::unchanged(SessionState::AwaitingUpload, Outcome::Ignored)
        }
    }
}

/// 状態・乱数・結果シンクを束ねたドライバ
///
/// Complete への遷移でのみシンクを呼び出す。状態の読み取りで再書き込みはしない。
pub struct Session<R, S> {
    variant: Variant,
    state: SessionState,
    rng: R,
    sink: S,
    /// 直近の永続化先（未保存なら None）
    saved_path: Option<PathBuf>,
}

impl<R: Rng, S: ResultSink> Session<R, S> {
    pub fn new(variant: Variant, rng: R, sink: S) -> Self {
        Self {
            variant,
            state: SessionState::AwaitingUpload,
            rng,
            sink,
            saved_path: None,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn cursor(&self) -> usize {
        self.state.progress().map(Progress::cursor).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.state
            .progress()
            .map(|p| p.worklist.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn current_item(&self) -> Option<&ComparisonItem> {
        match &self.state {
            SessionState::InProgress(p) => p.current_item(),
            _ => None,
        }
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.state.progress().map(|p| &p.dataset)
    }

    pub fn decisions(&self) -> &[DecisionRecord] {
        self.state
            .progress()
            .map(|p| p.decisions.as_slice())
            .unwrap_or(&[])
    }

    pub fn saved_path(&self) -> Option<&Path> {
        self.saved_path.as_deref()
    }

    /// Complete かつ永続化済み
    pub fn is_saved(&self) -> bool {
        self.phase() == Phase::Complete && self.saved_path.is_some()
    }

    /// Complete だが永続化に失敗している
    pub fn needs_persist(&self) -> bool {
        self.phase() == Phase::Complete && self.saved_path.is_none()
    }

    /// ファイルを読み込んでアップロードする。読み込み失敗時は状態を変更しない。
    pub fn upload_file(&mut self, path: &Path) -> Result<Outcome, SessionError> {
        let LoadedDataset {
            dataset,
            fingerprint,
        } = Dataset::load(self.variant, path)?;
        Ok(self.upload(dataset, fingerprint)?)
    }

    pub fn upload(&mut self, dataset: Dataset, fingerprint: u64) -> Result<Outcome, SinkWriteError> {
        if dataset.variant() != self.variant {
            warn!(
                expected = self.variant.cli_name(),
                got = dataset.variant().cli_name(),
                "upload ignored: variant mismatch"
            );
            return Ok(Outcome::Ignored);
        }
        self.handle(Event::Upload {
            dataset,
            fingerprint,
        })
    }

    pub fn decide(&mut self, choice: Choice) -> Result<Outcome, SinkWriteError> {
        self.handle(Event::Decide(choice))
    }

    /// 同じデータセットでランダム化を引き直してやり直す
    pub fn reset(&mut self) -> Result<Outcome, SinkWriteError> {
        self.handle(Event::Reset)
    }

    /// 永続化に失敗した Complete セッションを再度書き込む
    pub fn retry_persist(&mut self) -> Result<Option<PathBuf>, SinkWriteError> {
        if !self.needs_persist() {
            return Ok(None);
        }
        self.persist().map(Some)
    }

    fn handle(&mut self, event: Event) -> Result<Outcome, SinkWriteError> {
        let state = std::mem::take(&mut self.state);
        let Step { state, outcome } = apply(state, event, &mut self.rng);
        self.state = state;

        debug!(
            ?outcome,
            phase = ?self.phase(),
            cursor = self.cursor(),
            len = self.len(),
            "session transition"
        );

        match outcome {
            Outcome::Started => self.saved_path = None,
            Outcome::Completed => {
                self.saved_path = None;
                self.persist()?;
            }
            Outcome::Unchanged | Outcome::Recorded | Outcome::Ignored => {}
        }
        Ok(outcome)
    }

    fn persist(&mut self) -> Result<PathBuf, SinkWriteError> {
        let decisions = self
            .state
            .progress()
            .map(|p| p.decisions.as_slice())
            .unwrap_or(&[]);
        let path = self.sink.persist(self.variant, decisions)?;
        info!(
            path = %path.display(),
            decisions = decisions.len(),
            "results saved"
        );
        self.saved_path = Some(path.clone());
        Ok(path)
    }
}
