//! Tests for command dispatch against the fixture hierarchy files.

use std::fs;

use clap::Parser;
use rstest::rstest;
use tempfile::TempDir;

use skelmerge::cli::{execute_command, Cli, CliError};
use skelmerge::exitcode;
use skelmerge::util::testing;

fn run(args: &[&str]) -> Result<(), CliError> {
    testing::init_test_setup();
    let cli = Cli::parse_from(std::iter::once("skelmerge").chain(args.iter().copied()));
    execute_command(&cli)
}

#[rstest]
#[case::tree(&["tree", "tests/resources/skeletons/knight.toml"])]
#[case::describe(&["describe", "tests/resources/skeletons/knight.toml"])]
#[case::check(&["check", "tests/resources/skeletons/knight.toml"])]
#[case::path(&["path", "tests/resources/skeletons/knight.toml", "blade", "thigh_r"])]
#[case::draw(&["draw", "--hardpoints", "tests/resources/skeletons/knight.toml"])]
#[case::config_show(&["config", "show"])]
fn given_valid_input_when_running_command_then_succeeds(#[case] args: &[&str]) {
    let result = run(args);

    assert!(result.is_ok(), "{args:?}: {:?}", result.err());
}

#[rstest]
#[case::incompatible(&["check", "tests/resources/skeletons/incompatible.toml"], exitcode::DATAERR)]
#[case::missing_file(&["tree", "tests/resources/skeletons/absent.toml"], exitcode::IOERR)]
#[case::unknown_bone(&["path", "tests/resources/skeletons/knight.toml", "blade", "tail"], exitcode::USAGE)]
#[case::missing_config(&["-c", "tests/resources/absent.toml", "config", "show"], exitcode::CONFIG)]
fn given_bad_input_when_running_command_then_fails_with_exit_code(
    #[case] args: &[&str],
    #[case] expected: i32,
) {
    let err = run(args).unwrap_err();

    assert_eq!(err.exit_code(), expected, "{err}");
}

#[test]
fn given_no_command_when_running_then_usage_error() {
    let err = run(&[]).unwrap_err();

    assert!(matches!(err, CliError::Usage(_)));
}

#[test]
fn given_bones_in_separate_hierarchies_when_finding_path_then_data_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("apart.toml");
    fs::write(
        &path,
        r#"
[[constituents]]
name = "body"
[constituents.root]
name = "pelvis"

[[constituents]]
name = "prop"
[constituents.root]
name = "lantern"
"#,
    )
    .unwrap();
    let file = path.to_str().unwrap();

    let err = run(&["path", file, "pelvis", "lantern"]).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::DATAERR, "{err}");
}

