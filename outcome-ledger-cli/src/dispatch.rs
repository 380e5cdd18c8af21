// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    display,
    errors::{ExpectedError, Result},
    exit_codes::LedgerExitCode,
    output::{OutputContext, OutputOpts, OutputWriter, help_styles},
};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Subcommand, ValueEnum};
use outcome_ledger::{
    config::{ConfigLocation, LedgerConfig},
    events::RunEvent,
    manager::ResultManager,
    record::NodeKind,
    report::{parse_document, serialize_records},
    summary::ResultCounts,
    tree::{TestLookup, TestTree},
};
use std::io::Write;
use tracing::{debug, info};

/// Replay test result documents and print the merged results.
///
/// Results from successive runs are merged the way an interactive runner
/// merges reruns: a stale result is only replaced by a more significant one.
#[derive(Debug, clap::Parser)]
#[command(
    version,
    bin_name = "outcome-ledger",
    styles = help_styles(),
    max_term_width = 100,
)]
pub struct OutcomeLedgerApp {
    #[command(flatten)]
    output: OutputOpts,

    #[command(subcommand)]
    command: Command,
}

impl OutcomeLedgerApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app.
    ///
    /// Returns the exit code.
    pub fn exec(self, output: OutputContext, output_writer: &mut OutputWriter) -> Result<i32> {
        match self.command {
            Command::Replay(opts) => opts.exec(output, output_writer),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply result documents as successive runs and print the merged results.
    ///
    /// Each RUN document is replayed as one run: a run-starting event, one
    /// finished event per result element (children before their suite), and a
    /// run-finished event.
    Replay(ReplayOpts),
}

#[derive(Debug, Args)]
struct ReplayOpts {
    /// Test tree (explore document) to load before the first run
    #[arg(long, value_name = "PATH")]
    tree: Option<Utf8PathBuf>,

    /// Test tree to reload after the last run, remapping results by full name
    #[arg(long, value_name = "PATH")]
    reload_tree: Option<Utf8PathBuf>,

    /// Config file [default: .config/outcome-ledger.toml if present, `none` to
    /// skip]
    #[arg(long, value_name = "PATH", env = "OUTCOME_LEDGER_CONFIG")]
    config: Option<String>,

    /// Output format for the merged results
    #[arg(long, value_enum, default_value_t, value_name = "FORMAT")]
    message_format: MessageFormat,

    /// Result documents, applied in order
    #[arg(required = true, value_name = "RUN")]
    runs: Vec<Utf8PathBuf>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
enum MessageFormat {
    /// One line per result
    #[default]
    Human,

    /// A JSON array of results
    Json,

    /// A result document that can be replayed again
    Xml,
}

impl ReplayOpts {
    fn exec(self, output: OutputContext, output_writer: &mut OutputWriter) -> Result<i32> {
        let cwd = current_dir()?;
        let config = LedgerConfig::load(
            ConfigLocation::from_cli_or_env(self.config.as_deref()),
            &cwd,
        )
        .map_err(|err| ExpectedError::ConfigError { err })?;
        debug!("using config: {config:?}");

        let tree = self.tree.as_deref().map(load_tree).transpose()?;
        let mut manager = ResultManager::with_config(&config.results);
        if let Some(tree) = &tree {
            info!("loaded test tree with {} nodes", tree.len());
            manager.handle_event(RunEvent::TreeLoaded);
        }

        for run in &self.runs {
            let input = read_input(run)?;
            let fragments = parse_document(&input).map_err(|err| ExpectedError::ReportParseError {
                path: run.clone(),
                err,
            })?;
            debug!("replaying {} results from {run}", fragments.len());

            manager.handle_event(RunEvent::RunStarting);
            for fragment in fragments {
                let kind = fragment.kind();
                if !fragment.has_id() {
                    debug!(
                        "{} reported without an id, stored under its full name",
                        fragment.name().unwrap_or(fragment.identity().as_str()),
                    );
                }
                let record = fragment.into_record(
                    tree.as_ref().map(|tree| tree as &dyn TestLookup),
                    config.results.full_name_fallback,
                );
                let event = match kind {
                    NodeKind::Case => RunEvent::TestFinished { record },
                    NodeKind::Suite => RunEvent::SuiteFinished { record },
                };
                manager.handle_event(event);
            }
            manager.handle_event(RunEvent::RunFinished);
        }

        if let Some(path) = &self.reload_tree {
            let reloaded = load_tree(path)?;
            info!("reloaded test tree with {} nodes", reloaded.len());
            manager.handle_event(RunEvent::TreeReloaded { tree: &reloaded });
        }

        let mut stdout = output_writer.stdout_writer();
        match self.message_format {
            MessageFormat::Human => {
                let mut out = String::new();
                display::write_records(manager.iter(), &output.record_styles(), &mut out);
                stdout
                    .write_all(out.as_bytes())
                    .map_err(|err| ExpectedError::WriteError { err })?;
            }
            MessageFormat::Json => {
                let records: Vec<_> = manager.iter().collect();
                serde_json::to_writer_pretty(&mut stdout, &records)
                    .map_err(|err| ExpectedError::JsonWriteError { err })?;
                writeln!(stdout).map_err(|err| ExpectedError::WriteError { err })?;
            }
            MessageFormat::Xml => {
                serialize_records(manager.iter(), &mut stdout)
                    .map_err(|err| ExpectedError::ReportWriteError { err })?;
            }
        }
        stdout
            .flush()
            .map_err(|err| ExpectedError::WriteError { err })?;
        drop(stdout);

        let counts = ResultCounts::from_manager(&manager);
        let mut summary = String::new();
        display::write_summary(&counts, &output.stderr_styles(), &mut summary);
        let mut stderr = output_writer.stderr_writer();
        stderr
            .write_all(summary.as_bytes())
            .and_then(|()| stderr.flush())
            .map_err(|err| ExpectedError::WriteError { err })?;

        if counts.any_failed() {
            Ok(LedgerExitCode::TEST_RUN_FAILED)
        } else {
            Ok(LedgerExitCode::OK)
        }
    }
}

fn current_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir().map_err(|err| ExpectedError::CurrentDirFailed { err })?;
    Utf8PathBuf::try_from(cwd).map_err(|err| ExpectedError::CurrentDirInvalidUtf8 { err })
}

fn read_input(path: &Utf8Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|err| ExpectedError::InputReadError {
        path: path.to_owned(),
        err,
    })
}

fn load_tree(path: &Utf8Path) -> Result<TestTree> {
    let input = read_input(path)?;
    TestTree::parse_explore(&input).map_err(|err| ExpectedError::TreeLoadError {
        path: path.to_owned(),
        err,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Color;
    use camino_tempfile::{Utf8TempDir, tempdir};
    use clap::{CommandFactory, Parser};
    use indoc::indoc;

    #[test]
    fn verify_app() {
        OutcomeLedgerApp::command().debug_assert();
    }

    #[test]
    fn test_argument_parsing() {
        use clap::error::ErrorKind::{self, *};

        let valid: &[&'static str] = &[
            "outcome-ledger replay run.xml",
            "outcome-ledger replay run1.xml run2.xml",
            "outcome-ledger replay --tree explore.xml run.xml",
            "outcome-ledger replay --tree explore.xml --reload-tree explore2.xml run.xml",
            "outcome-ledger replay --config none run.xml",
            "outcome-ledger replay --message-format json run.xml",
            "outcome-ledger replay --message-format xml run.xml",
            "outcome-ledger -v replay run.xml",
            "outcome-ledger replay --color never run.xml",
        ];

        let invalid: &[(&'static str, ErrorKind)] = &[
            ("outcome-ledger replay", MissingRequiredArgument),
            ("outcome-ledger replay --message-format yaml run.xml", InvalidValue),
            ("outcome-ledger replay --color sometimes run.xml", InvalidValue),
            ("outcome-ledger list", InvalidSubcommand),
        ];

        // Unset all OUTCOME_LEDGER_ env vars because they can conflict with
        // the try_parse_from below.
        for (k, _) in std::env::vars() {
            if k.starts_with("OUTCOME_LEDGER_") {
                // SAFETY: tests in this module don't read these variables
                // concurrently.
                unsafe { std::env::remove_var(k) };
            }
        }

        for valid_args in valid {
            if let Err(error) = OutcomeLedgerApp::try_parse_from(valid_args.split_whitespace()) {
                panic!("{valid_args} should have successfully parsed, but didn't: {error}");
            }
        }

        for &(invalid_args, kind) in invalid {
            match OutcomeLedgerApp::try_parse_from(invalid_args.split_whitespace()) {
                Ok(_) => {
                    panic!("{invalid_args} should have errored out but successfully parsed");
                }
                Err(error) => {
                    let actual_kind = error.kind();
                    if kind != actual_kind {
                        panic!(
                            "{invalid_args} should error with kind {kind:?}, but actual kind was {actual_kind:?}",
                        );
                    }
                }
            }
        }
    }

    static EXPLORE: &str = indoc! {r#"
        <test-run id="0">
          <test-suite type="Assembly" id="1" name="Assembly.dll" fullname="Assembly">
            <test-case id="2" name="TestA" fullname="Assembly.TestA" />
            <test-case id="3" name="TestB" fullname="Assembly.TestB" />
          </test-suite>
        </test-run>
    "#};

    static RELOADED: &str = indoc! {r#"
        <test-suite type="Assembly" id="10" name="Assembly.dll" fullname="Assembly">
          <test-case id="12" name="TestB" fullname="Assembly.TestB" />
          <test-case id="11" name="TestA" fullname="Assembly.TestA" />
        </test-suite>
    "#};

    static FULL_RUN: &str = indoc! {r#"
        <test-run id="0">
          <test-suite id="1" result="Failed">
            <test-case id="2" result="Failed" label="Error" duration="0.5" />
            <test-case id="3" result="Passed" duration="0.25" />
          </test-suite>
        </test-run>
    "#};

    static RERUN: &str = indoc! {r#"
        <test-case id="2" result="Passed" duration="0.125" />
    "#};

    fn write_inputs() -> Utf8TempDir {
        let dir = tempdir().expect("created temp dir");
        for (name, contents) in [
            ("explore.xml", EXPLORE),
            ("reloaded.xml", RELOADED),
            ("full.xml", FULL_RUN),
            ("rerun.xml", RERUN),
        ] {
            std::fs::write(dir.path().join(name), contents).expect("wrote input");
        }
        dir
    }

    fn replay(dir: &Utf8Path, format: MessageFormat, reload: bool) -> (Result<i32>, String, String) {
        let opts = ReplayOpts {
            tree: Some(dir.join("explore.xml")),
            reload_tree: reload.then(|| dir.join("reloaded.xml")),
            config: Some("none".to_owned()),
            message_format: format,
            runs: vec![dir.join("full.xml"), dir.join("rerun.xml")],
        };
        let output = OutputContext { color: Color::Never };
        let mut writer = OutputWriter::Test {
            stdout: Vec::new(),
            stderr: Vec::new(),
        };
        let result = opts.exec(output, &mut writer);
        let OutputWriter::Test { stdout, stderr } = writer else {
            unreachable!("writer is always Test")
        };
        (
            result,
            String::from_utf8(stdout).unwrap(),
            String::from_utf8(stderr).unwrap(),
        )
    }

    #[test]
    fn replay_merges_runs() {
        let dir = write_inputs();
        let (result, stdout, stderr) = replay(dir.path(), MessageFormat::Human, false);

        assert_eq!(result.unwrap(), LedgerExitCode::TEST_RUN_FAILED);
        assert_eq!(
            stdout,
            concat!(
                "     FAIL [         ] Assembly [id 1] (stale)\n",
                "     FAIL [   0.125s] Assembly.TestA (Error) [id 2]\n",
                "     PASS [   0.250s] Assembly.TestB [id 3] (stale)\n",
            )
        );
        assert_eq!(
            stderr,
            "  Summary 3 results: 1 passed, 2 failed; 2 stale\n"
        );
    }

    #[test]
    fn replay_with_reload_remaps() {
        let dir = write_inputs();
        let (result, stdout, _) = replay(dir.path(), MessageFormat::Json, true);
        assert_eq!(result.unwrap(), LedgerExitCode::TEST_RUN_FAILED);

        let records: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
        let ids: Vec<_> = records
            .as_array()
            .expect("array of records")
            .iter()
            .map(|record| {
                (
                    record["id"].as_str().unwrap().to_owned(),
                    record["full-name"].as_str().unwrap().to_owned(),
                    record["is-latest-run"].as_bool().unwrap(),
                )
            })
            .collect();
        assert_eq!(
            ids,
            vec![
                ("10".to_owned(), "Assembly".to_owned(), false),
                ("11".to_owned(), "Assembly.TestA".to_owned(), false),
                ("12".to_owned(), "Assembly.TestB".to_owned(), false),
            ]
        );
    }

    #[test]
    fn replay_keeps_results_without_ids() {
        let dir = write_inputs();
        std::fs::write(
            dir.path().join("rerun.xml"),
            r#"<test-case name="TestC" fullname="Assembly.TestC" result="Passed" />"#,
        )
        .unwrap();
        let (result, stdout, _) = replay(dir.path(), MessageFormat::Json, false);
        assert_eq!(result.unwrap(), LedgerExitCode::TEST_RUN_FAILED);

        let records: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
        let records = records.as_array().expect("array of records");
        assert_eq!(records.len(), 4);
        let unidentified = records
            .iter()
            .find(|record| record["id"] == "Assembly.TestC")
            .expect("result stored under its full name");
        assert_eq!(unidentified["full-name"], "Assembly.TestC");
        assert_eq!(unidentified["is-latest-run"], true);
    }

    #[test]
    fn replay_xml_output_reads_back() {
        let dir = write_inputs();
        let (_, stdout, _) = replay(dir.path(), MessageFormat::Xml, false);
        let fragments = parse_document(&stdout).expect("output parses");
        assert_eq!(fragments.len(), 3);
        assert_eq!(fragments[1].full_name(), Some("Assembly.TestA"));
        assert_eq!(
            fragments[1].outcome().status(),
            outcome_ledger::outcome::Status::Failed
        );
    }

    #[test]
    fn replay_reports_parse_errors() {
        let dir = write_inputs();
        std::fs::write(
            dir.path().join("rerun.xml"),
            r#"<test-case id="2" result="Passed" duration="0,125" />"#,
        )
        .unwrap();
        let (result, _, _) = replay(dir.path(), MessageFormat::Human, false);
        let error = result.expect_err("bad duration fails");
        assert_eq!(error.process_exit_code(), LedgerExitCode::INPUT_PARSE_FAILED);

        std::fs::remove_file(dir.path().join("full.xml")).unwrap();
        let (result, _, _) = replay(dir.path(), MessageFormat::Human, false);
        let error = result.expect_err("missing run fails");
        assert_eq!(error.process_exit_code(), LedgerExitCode::SETUP_ERROR);
    }
}
