use anyhow::Result;
use rand::Rng;
use serde::Serialize;
use std::io::{BufRead, Write};
use tracing::warn;

use crate::config::KeybindingsConfig;
use crate::session::{Choice, Phase, Session};
use crate::sink::ResultSink;
use crate::summary::Summary;
use crate::view::item_view;

/// Result kind for JSON output (serialized as snake_case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadlessResultKind {
    Complete,
    Incomplete,
}

/// JSON output structure written to stdout when the headless run ends.
#[derive(Debug, Serialize)]
pub struct HeadlessJsonOutput {
    pub result: HeadlessResultKind,
    pub variant: &'static str,
    pub decisions: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub summary: Summary,
}

/// Rate an already-uploaded session from a line-oriented input.
///
/// Each item is printed to `prompts` (stderr in the binary). A line must
/// hold exactly one choice symbol after trimming; anything else (`13`,
/// `2nd`, an unknown key) is ignored and the same item is asked again.
/// Stops at the end of input or when the session completes.
pub fn run_headless<R, S, I, W>(
    session: &mut Session<R, S>,
    input: I,
    prompts: &mut W,
    keys: &KeybindingsConfig,
) -> Result<HeadlessJsonOutput>
where
    R: Rng,
    S: ResultSink,
    I: BufRead,
    W: Write,
{
    let variant = session.variant();
    let mut lines = input.lines();

    while session.phase() == Phase::InProgress {
        write_prompt(session, prompts, keys)?;

        let Some(line) = lines.next() else {
            writeln!(prompts, "[Headless] Input ended before the session was complete")?;
            break;
        };
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        // 1 文字ちょうどの行だけを選択記号として扱う
        let mut chars = input.chars();
        let choice = match (chars.next(), chars.next()) {
            (Some(symbol), None) => Choice::from_symbol(variant, symbol, keys),
            _ => None,
        };
        match choice {
            Some(choice) => {
                session.decide(choice)?;
            }
            None => {
                warn!(%input, "headless: ignored input");
                writeln!(prompts, "  (ignored '{}')", input)?;
            }
        }
    }

    let result = if session.is_saved() {
        writeln!(
            prompts,
            "[Headless] Results saved to {}",
            session
                .saved_path()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        )?;
        HeadlessResultKind::Complete
    } else {
        HeadlessResultKind::Incomplete
    };

    Ok(HeadlessJsonOutput {
        result,
        variant: variant.cli_name(),
        decisions: session.decisions().len(),
        total: session.len(),
        output: session.saved_path().map(|p| p.display().to_string()),
        summary: Summary::from_decisions(variant, session.decisions()),
    })
}

fn write_prompt<R, S, W>(
    session: &Session<R, S>,
    out: &mut W,
    keys: &KeybindingsConfig,
) -> Result<()>
where
    R: Rng,
    S: ResultSink,
    W: Write,
{
    let (Some(item), Some(dataset)) = (session.current_item(), session.dataset()) else {
        return Ok(());
    };
    let Some(view) = item_view(item, dataset) else {
        return Ok(());
    };

    writeln!(out, "\n=== {}/{} ===", session.cursor() + 1, session.len())?;
    for panel in &view.context {
        writeln!(out, "[{}] {}", panel.heading, panel.text)?;
    }
    for panel in &view.panels {
        writeln!(out, "--- {} ---\n{}", panel.heading, panel.text)?;
    }
    let actions: Vec<String> = Choice::actions(session.variant())
        .into_iter()
        .map(|c| format!("{}: {}", c.symbol(keys), c.label(session.variant())))
        .collect();
    writeln!(out, "> {}", actions.join(" | "))?;
    Ok(())
}

/// Write the JSON summary to stdout.
pub fn write_json_stdout(output: &HeadlessJsonOutput) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, output)?;
    writeln!(handle)?;
    handle.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, DescriptionRow, Variant};
    use crate::session::DecisionRecord;
    use crate::sink::CsvFileSink;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rows(n: usize) -> Vec<DescriptionRow> {
        (0..n)
            .map(|i| DescriptionRow {
                title: format!("title {i}"),
                gen_desc: format!("g{i}"),
                true_desc: format!("t{i}"),
            })
            .collect()
    }

    #[test]
    fn test_full_run_saves_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut session = Session::new(
            Variant::Absolute,
            ChaCha8Rng::seed_from_u64(1),
            CsvFileSink::new(&path),
        );
        session.upload(Dataset::Absolute(rows(2)), 1).unwrap();

        let mut prompts = Vec::new();
        let output = run_headless(
            &mut session,
            "3\n1\n".as_bytes(),
            &mut prompts,
            &KeybindingsConfig::default(),
        )
        .unwrap();

        assert_eq!(output.result, HeadlessResultKind::Complete);
        assert_eq!(output.decisions, 2);
        assert_eq!(output.output, Some(path.display().to_string()));
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "title,true_desc,gen_desc,grade\ntitle 0,t0,g0,1\ntitle 1,t1,g1,-1\n"
        );

        let prompts = String::from_utf8(prompts).unwrap();
        assert!(prompts.contains("=== 1/2 ==="));
        assert!(prompts.contains("1: Хуже | 2: Одинаково | 3: Лучше"));
    }

    #[test]
    fn test_invalid_and_blank_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(
            Variant::Blind,
            ChaCha8Rng::seed_from_u64(2),
            CsvFileSink::new(dir.path().join("out.csv")),
        );
        session.upload(Dataset::Blind(rows(1)), 1).unwrap();

        let mut prompts = Vec::new();
        let output = run_headless(
            &mut session,
            "\n9\nx\n  2\n".as_bytes(),
            &mut prompts,
            &KeybindingsConfig::default(),
        )
        .unwrap();

        assert_eq!(output.result, HeadlessResultKind::Complete);
        let DecisionRecord::Blind(record) = &session.decisions()[0] else {
            panic!("expected blind record");
        };
        assert_eq!(record.selected_position, 2);
        assert!(String::from_utf8(prompts).unwrap().contains("(ignored '9')"));
    }

    #[test]
    fn test_early_eof_is_incomplete_and_unsaved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut session = Session::new(
            Variant::Absolute,
            ChaCha8Rng::seed_from_u64(3),
            CsvFileSink::new(&path),
        );
        session.upload(Dataset::Absolute(rows(3)), 1).unwrap();

        let mut prompts = Vec::new();
        let output = run_headless(
            &mut session,
            "2\n".as_bytes(),
            &mut prompts,
            &KeybindingsConfig::default(),
        )
        .unwrap();

        assert_eq!(output.result, HeadlessResultKind::Incomplete);
        assert_eq!(output.decisions, 1);
        assert_eq!(output.total, 3);
        assert!(output.output.is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_multi_char_line_is_not_a_choice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut session = Session::new(
            Variant::Absolute,
            ChaCha8Rng::seed_from_u64(4),
            CsvFileSink::new(&path),
        );
        session.upload(Dataset::Absolute(rows(1)), 1).unwrap();

        let mut prompts = Vec::new();
        let output = run_headless(
            &mut session,
            "13\n2nd\n1\n".as_bytes(),
            &mut prompts,
            &KeybindingsConfig::default(),
        )
        .unwrap();

        assert_eq!(output.result, HeadlessResultKind::Complete);
        assert_eq!(output.decisions, 1);
        let DecisionRecord::Graded(record) = &session.decisions()[0] else {
            panic!("expected graded record");
        };
        assert_eq!(record.grade, -1);

        let prompts = String::from_utf8(prompts).unwrap();
        assert!(prompts.contains("(ignored '13')"));
        assert!(prompts.contains("(ignored '2nd')"));
        // 無効な入力ごとに同じ項目を再表示する
        assert_eq!(prompts.matches("=== 1/1 ===").count(), 3);
    }
}
