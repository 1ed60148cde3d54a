//! The config file phase: path resolution, tolerance knobs, and the
//! dual-lookup ambiguity policy.

use strata::{MemFlags, MockEnv, Options, PlainReader, ResolveError, resolve};

use crate::common::{config_file, path_of, server_flags};

#[test]
fn path_comes_from_the_designated_flag() {
    let file = config_file("log-level = trace\n");

    let mut flags = server_flags();
    let options = Options::builder()
        .config_file_flag("config")
        .config_reader(PlainReader)
        .build();

    resolve(&mut flags, &["--config", path_of(&file)], &options).unwrap();
    assert_eq!(flags.value("log-level"), Some("trace".to_string()));
}

#[test]
fn explicit_path_overrides_the_flag() {
    let explicit = config_file("log-level = from-explicit\n");
    let via_flag = config_file("log-level = from-flag\n");

    let mut flags = server_flags();
    let options = Options::builder()
        .config_file(path_of(&explicit))
        .config_file_flag("config")
        .config_reader(PlainReader)
        .build();

    resolve(&mut flags, &["--config", path_of(&via_flag)], &options).unwrap();
    assert_eq!(flags.value("log-level"), Some("from-explicit".to_string()));
}

#[test]
fn phase_skipped_without_a_reader() {
    let file = config_file("log-level = trace\n");

    let mut flags = server_flags();
    let options = Options::builder().config_file(path_of(&file)).build();

    resolve(&mut flags, &[], &options).unwrap();
    assert_eq!(flags.value("log-level"), Some("info".to_string()));
}

#[test]
fn phase_skipped_when_no_path_resolves() {
    // The config flag keeps its empty default, so no path resolves.
    let mut flags = server_flags();
    let options = Options::builder()
        .config_file_flag("config")
        .config_reader(PlainReader)
        .build();

    resolve(&mut flags, &[], &options).unwrap();
}

#[test]
fn empty_explicit_path_means_no_config_file() {
    let mut flags = server_flags();
    let options = Options::builder()
        .config_file("")
        .config_reader(PlainReader)
        .build();

    // No open attempt, so no ConfigFileOpen error.
    resolve(&mut flags, &[], &options).unwrap();
    assert_eq!(flags.value("log-level"), Some("info".to_string()));
}

#[test]
fn empty_explicit_path_falls_back_to_the_flag() {
    let file = config_file("log-level = trace\n");

    let mut flags = server_flags();
    let options = Options::builder()
        .config_file("")
        .config_file_flag("config")
        .config_reader(PlainReader)
        .build();

    resolve(&mut flags, &["--config", path_of(&file)], &options).unwrap();
    assert_eq!(flags.value("log-level"), Some("trace".to_string()));
}

#[test]
fn missing_file_tolerated_when_allowed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.conf");

    let mut flags = server_flags();
    let options = Options::builder()
        .config_file(path.to_str().unwrap())
        .config_reader(PlainReader)
        .allow_missing_config_file()
        .build();

    resolve(&mut flags, &[], &options).unwrap();
    assert_eq!(flags.value("log-level"), Some("info".to_string()));
}

#[test]
fn missing_file_fails_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.conf");

    let mut flags = server_flags();
    let options = Options::builder()
        .config_file(path.to_str().unwrap())
        .config_reader(PlainReader)
        .build();

    let err = resolve(&mut flags, &[], &options).unwrap_err();
    assert!(matches!(err, ResolveError::ConfigFileOpen { .. }));
}

#[test]
fn undefined_key_fails_by_default() {
    let file = config_file("foo = 1\n");

    let mut flags = server_flags();
    let options = Options::builder()
        .config_file(path_of(&file))
        .config_reader(PlainReader)
        .build();

    let err = resolve(&mut flags, &[], &options).unwrap_err();
    match &err {
        ResolveError::ConfigFlagUndefined { key } => assert_eq!(key, "foo"),
        other => panic!("expected ConfigFlagUndefined, got {other:?}"),
    }
    insta::assert_snapshot!(err, @r#"config file flag "foo" not defined in flag set"#);
}

#[test]
fn undefined_key_skipped_when_ignored() {
    let file = config_file("foo = 1\nlog-level = trace\n");

    let mut flags = server_flags();
    let options = Options::builder()
        .config_file(path_of(&file))
        .config_reader(PlainReader)
        .ignore_undefined_config_flags()
        .build();

    resolve(&mut flags, &[], &options).unwrap();
    assert_eq!(flags.value("log-level"), Some("trace".to_string()));
}

#[test]
fn env_style_key_resolves_to_its_flag() {
    let file = config_file("APP_LOG_LEVEL = debug\n");

    let mut flags = server_flags();
    let options = Options::builder()
        .env_prefix("APP")
        .env_source(MockEnv::new())
        .config_file(path_of(&file))
        .config_reader(PlainReader)
        .build();

    resolve(&mut flags, &[], &options).unwrap();
    assert_eq!(flags.value("log-level"), Some("debug".to_string()));
}

#[test]
fn dual_match_on_the_same_flag_is_not_ambiguous() {
    // "log_level" matches "log-level" only through its derived env key;
    // the direct strategy misses, so the match is unique.
    let file = config_file("log_level = debug\n");

    let mut flags = server_flags();
    let options = Options::builder()
        .config_file(path_of(&file))
        .config_reader(PlainReader)
        .build();

    resolve(&mut flags, &[], &options).unwrap();
    assert_eq!(flags.value("log-level"), Some("debug".to_string()));
}

#[test]
fn key_matching_two_distinct_flags_is_ambiguous() {
    let file = config_file("a_b = x\n");

    let mut flags = MemFlags::new().text("a-b", "").text("a_b", "");
    let options = Options::builder()
        .config_file(path_of(&file))
        .config_reader(PlainReader)
        .build();

    let err = resolve(&mut flags, &[], &options).unwrap_err();
    match &err {
        ResolveError::ConfigFlagAmbiguous { key, first, second } => {
            assert_eq!(key, "a_b");
            assert_eq!(first, "a_b");
            assert_eq!(second, "a-b");
        }
        other => panic!("expected ConfigFlagAmbiguous, got {other:?}"),
    }
    insta::assert_snapshot!(
        err,
        @r#"config file flag "a_b" is ambiguous: matches "a_b" and "a-b""#
    );
}

#[test]
fn rejected_value_reports_flag_and_key() {
    let file = config_file("port = abc\n");

    let mut flags = server_flags();
    let options = Options::builder()
        .config_file(path_of(&file))
        .config_reader(PlainReader)
        .build();

    let err = resolve(&mut flags, &[], &options).unwrap_err();
    match &err {
        ResolveError::ConfigSet { flag, key, .. } => {
            assert_eq!(flag, "port");
            assert_eq!(key, "port");
        }
        other => panic!("expected ConfigSet, got {other:?}"),
    }
}

#[test]
fn parse_error_preserves_earlier_entries() {
    let file = config_file("port = 1234\nbroken line\nhost = h\n");

    let mut flags = server_flags();
    let options = Options::builder()
        .config_file(path_of(&file))
        .config_reader(PlainReader)
        .build();

    let err = resolve(&mut flags, &[], &options).unwrap_err();
    assert!(matches!(err, ResolveError::ConfigFileParse { line: 2, .. }));
    // Not transactional: the entry before the malformed line stays applied.
    assert_eq!(flags.value("port"), Some("1234".to_string()));
    assert_eq!(flags.value("host"), Some("localhost".to_string()));
}

#[test]
fn quoted_values_round_trip() {
    let file = config_file("host = \"a b\" # comment\n");

    let mut flags = server_flags();
    let options = Options::builder()
        .config_file(path_of(&file))
        .config_reader(PlainReader)
        .build();

    resolve(&mut flags, &[], &options).unwrap();
    assert_eq!(flags.value("host"), Some("a b".to_string()));
}
