use std::fs;
use std::path::Path;

use sprig::cli::run_from;

fn read_log_lines(folder: &Path) -> Vec<String> {
    let entries: Vec<_> = fs::read_dir(folder)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 1, "expected exactly one log file");

    fs::read_to_string(&entries[0])
        .unwrap()
        .lines()
        .map(|line| line.to_string())
        .collect()
}

// strips the 19 character timestamp and the following space
fn tail(line: &str) -> &str {
    &line[20..]
}

#[test]
fn executes_a_script_and_logs_every_channel() {
    let workdir = tempfile::tempdir().unwrap();
    let script_path = workdir.path().join("script.sprig");
    fs::write(
        &script_path,
        concat!(
            "logger.trace(\"Trace\")\n",
            "logger.debug(\"Debug\")\n",
            "logger.information(\"Information\")\n",
            "logger.warning(\"Warning\")\n",
            "logger.error(\"Error\")\n",
            "logger.critical(\"Critical\")\n",
        ),
    )
    .unwrap();

    let log_folder = workdir.path().join("logs");

    let code = run_from([
        "sprig",
        "exec",
        "--script",
        script_path.to_str().unwrap(),
        "--id",
        "MyId",
        "--log-folder",
        log_folder.to_str().unwrap(),
        "--log-level",
        "trace",
    ]);

    assert_eq!(code, 0);

    let lines = read_log_lines(&log_folder);
    let tails: Vec<_> = lines.iter().skip(1).take(6).map(|line| tail(line)).collect();
    assert_eq!(
        tails,
        vec![
            "[VRB] (MyId) Trace",
            "[DBG] (MyId) Debug",
            "[INF] (MyId) Information",
            "[WRN] (MyId) Warning",
            "[ERR] (MyId) Error",
            "[FTL] (MyId) Critical",
        ]
    );

    // the run reports its own lifecycle through the same logger
    assert!(tail(&lines[0]).starts_with("[INF] (MyId) Executing script"));
    assert!(lines.last().unwrap().contains("finished successfully"));
}

#[test]
fn injects_parameters_into_the_script() {
    let workdir = tempfile::tempdir().unwrap();
    let script_path = workdir.path().join("script.sprig");
    fs::write(
        &script_path,
        concat!(
            "param param1, param2, param3, param4\n",
            "logger.information(param1)\n",
            "logger.information(param2)\n",
            "logger.information(param3)\n",
            "logger.information(param4)\n",
        ),
    )
    .unwrap();

    let log_folder = workdir.path().join("logs");

    let code = run_from([
        "sprig",
        "exec",
        "--script",
        script_path.to_str().unwrap(),
        "--id",
        "MyId",
        "--log-folder",
        log_folder.to_str().unwrap(),
        "--arg",
        "param1=value1",
        "param2=value2",
        "--arg",
        "param3=with = sign.",
        "--arg",
        "param4=Greetings",
    ]);

    assert_eq!(code, 0);

    let lines = read_log_lines(&log_folder);
    let tails: Vec<_> = lines.iter().skip(1).take(4).map(|line| tail(line)).collect();
    assert_eq!(
        tails,
        vec![
            "[INF] (MyId) value1",
            "[INF] (MyId) value2",
            "[INF] (MyId) with = sign.",
            "[INF] (MyId) Greetings",
        ]
    );
}

#[test]
fn filters_records_below_the_minimum_level() {
    let workdir = tempfile::tempdir().unwrap();
    let script_path = workdir.path().join("script.sprig");
    fs::write(
        &script_path,
        concat!(
            "logger.trace(\"Trace\")\n",
            "logger.debug(\"Debug\")\n",
            "logger.information(\"Information\")\n",
            "logger.warning(\"Warning\")\n",
            "logger.error(\"Error\")\n",
            "logger.critical(\"Critical\")\n",
        ),
    )
    .unwrap();

    let log_folder = workdir.path().join("logs");

    let code = run_from([
        "sprig",
        "exec",
        "--script",
        script_path.to_str().unwrap(),
        "--id",
        "MyId",
        "--log-folder",
        log_folder.to_str().unwrap(),
        "--log-level",
        "warning",
    ]);

    assert_eq!(code, 0);

    let lines = read_log_lines(&log_folder);
    let tails: Vec<_> = lines.iter().map(|line| tail(line)).collect();
    assert_eq!(
        tails,
        vec![
            "[WRN] (MyId) Warning",
            "[ERR] (MyId) Error",
            "[FTL] (MyId) Critical",
        ]
    );
}

#[test]
fn a_failing_script_yields_exit_code_one() {
    let workdir = tempfile::tempdir().unwrap();
    let script_path = workdir.path().join("script.sprig");
    fs::write(
        &script_path,
        "logger.information(\"before\")\nfail(\"boom\")\n",
    )
    .unwrap();

    let log_folder = workdir.path().join("logs");

    let code = run_from([
        "sprig",
        "exec",
        "--script",
        script_path.to_str().unwrap(),
        "--id",
        "MyId",
        "--log-folder",
        log_folder.to_str().unwrap(),
    ]);

    assert_eq!(code, 1);

    let lines = read_log_lines(&log_folder);
    let last = lines.last().unwrap();
    assert!(last.contains("[ERR]"));
    assert!(last.contains("failed"));
    assert!(last.contains("boom"));
}

#[test]
fn missing_required_flags_fail_before_any_setup() {
    let workdir = tempfile::tempdir().unwrap();
    let log_folder = workdir.path().join("logs");

    let code = run_from([
        "sprig",
        "exec",
        "--id",
        "MyId",
        "--log-folder",
        log_folder.to_str().unwrap(),
    ]);

    assert_ne!(code, 0);
    assert_ne!(code, 1);
    assert!(
        !log_folder.exists(),
        "a usage error must not create the log folder"
    );
}

#[test]
fn a_missing_script_file_is_a_caught_failure() {
    let workdir = tempfile::tempdir().unwrap();
    let log_folder = workdir.path().join("logs");

    let code = run_from([
        "sprig",
        "exec",
        "--script",
        workdir.path().join("nosuch.sprig").to_str().unwrap(),
        "--id",
        "MyId",
        "--log-folder",
        log_folder.to_str().unwrap(),
    ]);

    assert_eq!(code, 1);

    let lines = read_log_lines(&log_folder);
    assert!(lines.last().unwrap().contains("[ERR]"));
}
