mod utils;

use std::fs;

use utils::{checksum, fixture, run, tmp_path};

#[test]
fn short_help() {
    let output = run(&["-h"]);
    dbg!(&output);

    assert_eq!(output.exit_code, 0);
    assert!(output.stdout.contains(env!("CARGO_PKG_DESCRIPTION")));
    assert!(output.stdout.contains("<output_path>"));
    assert!(output.stdout.contains("<input_path>"));
    assert!(output.stdout.contains("-h, --help"));
    assert!(output.stdout.contains("-V, --version"));
    assert!(output.stdout.contains("`brainelf --help`"));
}

#[test]
fn long_help() {
    let output = run(&["--help"]);
    dbg!(&output);

    assert_eq!(output.exit_code, 0);
    assert!(output.stdout.contains(env!("CARGO_PKG_DESCRIPTION")));
    assert!(output.stdout.contains("Exit codes:"));
}

#[test]
fn version() {
    let output = run(&["--version"]);
    dbg!(&output);

    assert_eq!(output.exit_code, 0);
    assert!(output.stdout.contains(env!("CARGO_PKG_NAME")));
    assert!(output.stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_arguments_is_bad_usage() {
    let output = run(&[]);
    dbg!(&output);

    assert_eq!(output.exit_code, 1);
}

#[test]
fn one_positional_is_bad_usage() {
    let output = run(&["a.out"]);
    dbg!(&output);

    assert_eq!(output.exit_code, 1);
}

#[test]
fn unknown_option_is_bad_usage() {
    let output = run(&["--bogus", "a.out", "prog.bf"]);
    dbg!(&output);

    assert_eq!(output.exit_code, 1);
}

#[test]
fn nonexistent_input_is_exit_code_two() {
    let out_path = tmp_path("missing_input_out");
    let output = run(&[
        out_path.to_str().unwrap(),
        "/nonexistent/does/not/exist.bf",
    ]);
    dbg!(&output);

    assert_eq!(output.exit_code, 2);
    assert!(!out_path.exists());
}

#[test]
fn unbalanced_close_is_exit_code_three() {
    let out_path = tmp_path("unbalanced_close_out");
    let input = fixture("unbalanced_close.bf");
    let output = run(&[out_path.to_str().unwrap(), input.to_str().unwrap()]);
    dbg!(&output);

    assert_eq!(output.exit_code, 3);
    assert!(output.stderr.contains("unmatched ']'"));
}

#[test]
fn unbalanced_open_is_exit_code_three() {
    let out_path = tmp_path("unbalanced_open_out");
    let input = fixture("unbalanced_open.bf");
    let output = run(&[out_path.to_str().unwrap(), input.to_str().unwrap()]);
    dbg!(&output);

    assert_eq!(output.exit_code, 3);
    assert!(output.stderr.contains("unmatched '['"));
}

#[test]
fn successful_compile_produces_an_executable_elf_file() {
    let out_path = tmp_path("hello_out");
    let input = fixture("hello.bf");
    let output = run(&[out_path.to_str().unwrap(), input.to_str().unwrap()]);
    dbg!(&output);

    assert_eq!(output.exit_code, 0);

    let bytes = fs::read(&out_path).unwrap();
    assert_eq!(&bytes[0..4], [0x7f, b'E', b'L', b'F']);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&out_path).unwrap().permissions().mode();
        assert_ne!(mode & 0o111, 0, "output file should be executable");
    }
}

#[test]
fn compiling_the_same_source_twice_is_deterministic() {
    let input = fixture("hello.bf");
    let first_path = tmp_path("hello_determinism_a");
    let second_path = tmp_path("hello_determinism_b");

    let first = run(&[first_path.to_str().unwrap(), input.to_str().unwrap()]);
    let second = run(&[second_path.to_str().unwrap(), input.to_str().unwrap()]);

    assert_eq!(first.exit_code, 0);
    assert_eq!(second.exit_code, 0);
    assert_eq!(checksum(&first_path), checksum(&second_path));
}
