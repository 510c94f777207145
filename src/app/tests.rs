use super::*;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use rand_chacha::rand_core::SeedableRng;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::dataset::Variant;
use crate::session::{DecisionRecord, Description};
use crate::worklist::ComparisonItem;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn char_key(c: char) -> KeyEvent {
    key(KeyCode::Char(c))
}

struct Fixture {
    dir: TempDir,
    app: App,
}

impl Fixture {
    fn new(variant: Variant) -> Self {
        let dir = TempDir::new().unwrap();
        let sink = CsvFileSink::new(dir.path().join("output").join("results.csv"));
        let session = Session::new(variant, ChaCha8Rng::seed_from_u64(42), sink);
        let app = App::new(session, Config::default());
        Self { dir, app }
    }

    fn write_csv(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn output_path(&self) -> PathBuf {
        self.dir.path().join("output").join("results.csv")
    }

    fn type_path(&mut self, path: &std::path::Path) {
        for c in path.display().to_string().chars() {
            self.app.handle_key(char_key(c));
        }
        self.app.handle_key(key(KeyCode::Enter));
    }
}

const TWO_ROWS: &str = "title,gen_desc,true_desc\nA,g1,t1\nB,g2,t2\n";

#[test]
fn test_starts_on_upload_screen() {
    let fx = Fixture::new(Variant::Absolute);
    assert_eq!(fx.app.state, AppState::Upload);
    assert_eq!(fx.app.session.phase(), Phase::AwaitingUpload);
}

#[test]
fn test_typed_path_uploads_dataset() {
    let mut fx = Fixture::new(Variant::Absolute);
    let path = fx.write_csv("data.csv", TWO_ROWS);
    fx.type_path(&path);

    assert_eq!(fx.app.state, AppState::Rating);
    assert_eq!(fx.app.session.len(), 2);
    assert!(fx.app.status.as_ref().is_some_and(|s| !s.is_error()));
}

#[test]
fn test_invalid_upload_shows_error_and_keeps_state() {
    let mut fx = Fixture::new(Variant::Absolute);
    let path = fx.write_csv("bad.csv", "title,gen\nA,g\n");
    fx.app.upload_path(&path);

    assert_eq!(fx.app.state, AppState::Upload);
    assert_eq!(fx.app.session.phase(), Phase::AwaitingUpload);
    let status = fx.app.status.as_ref().unwrap();
    assert!(status.is_error());
    assert!(status.text.contains("gen_desc"));
    assert!(status.text.contains("true_desc"));
}

#[test]
fn test_choice_keys_advance_and_complete() {
    let mut fx = Fixture::new(Variant::Absolute);
    let path = fx.write_csv("data.csv", TWO_ROWS);
    fx.app.upload_path(&path);

    fx.app.handle_key(char_key('3'));
    assert_eq!(fx.app.session.cursor(), 1);
    assert_eq!(fx.app.state, AppState::Rating);

    fx.app.handle_key(char_key('1'));
    assert_eq!(fx.app.state, AppState::Results);
    assert!(fx.app.session.is_saved());
    assert!(fx.app.saved_at.is_some());

    let content = std::fs::read_to_string(fx.output_path()).unwrap();
    assert_eq!(
        content,
        "title,true_desc,gen_desc,grade\nA,t1,g1,1\nB,t2,g2,-1\n"
    );
}

#[test]
fn test_out_of_range_keys_are_ignored() {
    let mut fx = Fixture::new(Variant::Blind);
    let path = fx.write_csv("data.csv", TWO_ROWS);
    fx.app.upload_path(&path);

    for c in ['3', '9', 'z', '0'] {
        fx.app.handle_key(char_key(c));
    }
    assert_eq!(fx.app.session.cursor(), 0);
    assert_eq!(fx.app.state, AppState::Rating);
}

#[test]
fn test_buttons_match_typed_choice() {
    let mut fx = Fixture::new(Variant::Absolute);
    let path = fx.write_csv("data.csv", TWO_ROWS);
    fx.app.upload_path(&path);

    // → → Enter = 3 つ目のボタン（Лучше）
    fx.app.handle_key(key(KeyCode::Right));
    fx.app.handle_key(key(KeyCode::Right));
    fx.app.handle_key(key(KeyCode::Right));
    assert_eq!(fx.app.focused_action, 2);
    fx.app.handle_key(key(KeyCode::Enter));

    let DecisionRecord::Graded(record) = &fx.app.session.decisions()[0] else {
        panic!("expected graded record");
    };
    assert_eq!(record.grade, 1);
    assert_eq!(fx.app.focused_action, 0);
}

#[test]
fn test_blind_position_is_derandomized() {
    let mut fx = Fixture::new(Variant::Blind);
    let path = fx.write_csv("data.csv", TWO_ROWS);
    fx.app.upload_path(&path);

    let Some(&ComparisonItem::Blind { swap, .. }) = fx.app.session.current_item() else {
        panic!("expected blind item");
    };
    fx.app.handle_key(char_key('1'));

    let DecisionRecord::Blind(record) = &fx.app.session.decisions()[0] else {
        panic!("expected blind record");
    };
    let expected = if swap {
        Description::True
    } else {
        Description::Generated
    };
    assert_eq!(record.selected_desc, expected);
    assert_eq!(record.selected_position, 1);
}

#[test]
fn test_release_events_are_ignored() {
    let mut fx = Fixture::new(Variant::Absolute);
    let path = fx.write_csv("data.csv", TWO_ROWS);
    fx.app.upload_path(&path);

    let release = KeyEvent {
        code: KeyCode::Char('2'),
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Release,
        state: KeyEventState::NONE,
    };
    fx.app.handle_key(release);
    assert_eq!(fx.app.session.cursor(), 0);
}

#[test]
fn test_help_returns_to_previous_screen() {
    let mut fx = Fixture::new(Variant::Absolute);
    let path = fx.write_csv("data.csv", TWO_ROWS);
    fx.app.upload_path(&path);

    fx.app.handle_key(char_key('?'));
    assert_eq!(fx.app.state, AppState::Help);
    // Help 中の選択キーは判定にならない
    fx.app.handle_key(char_key('2'));
    assert_eq!(fx.app.session.cursor(), 0);

    fx.app.handle_key(key(KeyCode::Esc));
    assert_eq!(fx.app.state, AppState::Rating);
}

#[test]
fn test_reset_discards_decisions() {
    let mut fx = Fixture::new(Variant::ThreeWay);
    let path = fx.write_csv(
        "pubs.csv",
        "title,desc,beginning,continuation,generated_baseline,generated_finetuned\n\
         T1,D1,B1,C1,GB1,GF1\nT2,D2,B2,C2,GB2,GF2\n",
    );
    fx.app.upload_path(&path);
    assert_eq!(fx.app.session.len(), 4);

    fx.app.handle_key(char_key('1'));
    assert_eq!(fx.app.session.cursor(), 1);

    fx.app.handle_key(char_key('R'));
    assert_eq!(fx.app.session.cursor(), 0);
    assert_eq!(fx.app.session.len(), 4);
    assert_eq!(fx.app.state, AppState::Rating);
}

#[test]
fn test_upload_prompt_from_results_and_escape_back() {
    let mut fx = Fixture::new(Variant::Absolute);
    let path = fx.write_csv("data.csv", "title,gen_desc,true_desc\nA,g,t\n");
    fx.app.upload_path(&path);
    fx.app.handle_key(char_key('2'));
    assert_eq!(fx.app.state, AppState::Results);

    fx.app.handle_key(char_key('u'));
    assert_eq!(fx.app.state, AppState::Upload);
    fx.app.handle_key(key(KeyCode::Esc));
    assert_eq!(fx.app.state, AppState::Results);
    assert_eq!(fx.app.session.decisions().len(), 1);
}

#[test]
fn test_fresh_upload_after_complete_discards_prior_decisions() {
    let mut fx = Fixture::new(Variant::Absolute);
    let path = fx.write_csv("data.csv", "title,gen_desc,true_desc\nA,g,t\n");
    fx.app.upload_path(&path);
    fx.app.handle_key(char_key('2'));

    let other = fx.write_csv("other.csv", TWO_ROWS);
    fx.app.handle_key(char_key('u'));
    fx.app.path_input.clear();
    fx.type_path(&other);

    assert_eq!(fx.app.state, AppState::Rating);
    assert!(fx.app.session.decisions().is_empty());
    assert_eq!(fx.app.session.len(), 2);
}

#[test]
fn test_empty_dataset_goes_straight_to_results() {
    let mut fx = Fixture::new(Variant::Blind);
    let path = fx.write_csv("empty.csv", "title,gen_desc,true_desc\n");
    fx.app.upload_path(&path);

    assert_eq!(fx.app.state, AppState::Results);
    assert!(fx.app.session.is_saved());
    let content = std::fs::read_to_string(fx.output_path()).unwrap();
    assert_eq!(
        content,
        "title,gen_desc,true_desc,swap,selected_position,selected_desc\n"
    );
}

#[test]
fn test_sink_failure_then_retry() {
    let mut fx = Fixture::new(Variant::Absolute);
    let path = fx.write_csv("data.csv", "title,gen_desc,true_desc\nA,g,t\n");
    fx.app.upload_path(&path);

    // output ディレクトリの位置にファイルを置いて書き込みを失敗させる
    let output_dir = fx.dir.path().join("output");
    std::fs::write(&output_dir, "blocker").unwrap();

    fx.app.handle_key(char_key('3'));
    assert_eq!(fx.app.state, AppState::Results);
    assert!(fx.app.session.needs_persist());
    assert!(fx.app.status.as_ref().unwrap().is_error());
    assert!(fx.app.saved_at.is_none());

    std::fs::remove_file(&output_dir).unwrap();
    fx.app.handle_key(char_key('s'));
    assert!(fx.app.session.is_saved());
    assert!(fx.app.saved_at.is_some());
    assert!(fx.output_path().exists());
}

#[test]
fn test_quit_keys() {
    let mut fx = Fixture::new(Variant::Absolute);
    fx.app.handle_key(key(KeyCode::Esc));
    assert!(fx.app.should_quit);

    let mut fx = Fixture::new(Variant::Absolute);
    fx.app
        .handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(fx.app.should_quit);
}
