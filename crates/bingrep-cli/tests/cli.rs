use std::path::Path;
use std::process::{Command, Output};

fn binary_grep(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_binary-grep"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn missing_positionals_print_usage_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    for args in [&[][..], &["1122"][..]] {
        let o = binary_grep(dir.path(), args);
        assert_eq!(o.status.code(), Some(1), "args {:?}", args);
        let stdout = String::from_utf8_lossy(&o.stdout);
        assert!(stdout.contains("Usage: binary-grep [OPTIONS] <HEX_PATTERN> <FILE_GLOB>"), "stdout: {}", stdout);
        assert!(stdout.contains("--carve-len"));
    }
}

#[test]
fn reports_and_carves_into_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.bin"), [0x00, 0x11, 0x22, 0x33, 0x11, 0x22, 0x44]).unwrap();

    let o = binary_grep(dir.path(), &["--carve-len", "2", "1122", "*.bin"]);
    assert!(o.status.success());
    assert_eq!(String::from_utf8_lossy(&o.stdout), "a.bin:1\na.bin:4\n");
    assert!(String::from_utf8_lossy(&o.stderr).contains("searching a.bin..."));
    assert_eq!(std::fs::read(dir.path().join("a.bin-1.dat")).unwrap(), vec![0x11, 0x22]);
    assert_eq!(std::fs::read(dir.path().join("a.bin-4.dat")).unwrap(), vec![0x11, 0x22]);
}

#[test]
fn bad_hex_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let o = binary_grep(dir.path(), &["12z", "*.bin"]);
    assert!(!o.status.success());
    assert!(o.stdout.is_empty());
}

#[test]
fn empty_glob_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.bin"), [0x11, 0x22]).unwrap();
    let o = binary_grep(dir.path(), &["1122", "*.nothing"]);
    assert!(o.status.success());
    assert!(o.stdout.is_empty());
}
