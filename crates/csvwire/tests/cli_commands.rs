#![cfg(all(unix, feature = "cli"))]

use std::path::PathBuf;
use std::process::Command;

use csvwire::MessageLineage;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/csvwire-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn csvwire() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_csvwire"));
    command.arg("--log-level").arg("error");
    command
}

#[test]
fn fields_prints_header_and_rows_as_json() {
    let dir = unique_temp_dir("fields");
    let input = dir.join("people.csv");
    std::fs::write(&input, "name, city\nalice, \"Paris, FR\"\nbob, 'O''Hare'\n")
        .expect("input should be writable");

    let output = csvwire()
        .arg("--format")
        .arg("json")
        .arg("fields")
        .arg(&input)
        .output()
        .expect("fields should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"header\":[\"name\",\"city\"]"));
    assert!(stdout.contains("\"row_count\":2"));
    assert!(stdout.contains("[\"alice\",\"Paris, FR\"]"));
    assert!(stdout.contains("[\"bob\",\"O'Hare\"]"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn fields_missing_file_fails() {
    let output = csvwire()
        .arg("fields")
        .arg("/tmp/csvwire-cli-definitely-missing.csv")
        .output()
        .expect("fields should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"));
}

#[test]
fn lineage_encode_then_decode() {
    let dir = unique_temp_dir("lineage");
    let record = dir.join("lineage.bin");

    let encode = csvwire()
        .arg("--format")
        .arg("json")
        .args(["lineage", "encode", "--hop", "1:100", "--hop", "2:0xc8"])
        .args(["--timing", "10", "--timing", "20", "--output"])
        .arg(&record)
        .output()
        .expect("encode should run");
    assert!(encode.status.success());
    assert!(String::from_utf8_lossy(&encode.stdout).contains("\"sources\":2"));

    let bytes = std::fs::read(&record).expect("record should exist");
    let lineage =
        MessageLineage::from_bytes(&mut csvwire::ByteCursor::new(bytes)).expect("record decodes");
    assert_eq!(lineage.hops().collect::<Vec<_>>(), [(1, 100), (2, 200)]);
    assert_eq!(lineage.timing_values(), [10, 20]);

    let decode = csvwire()
        .arg("--format")
        .arg("json")
        .args(["lineage", "decode"])
        .arg(&record)
        .output()
        .expect("decode should run");
    assert!(decode.status.success());
    let stdout = String::from_utf8_lossy(&decode.stdout);
    assert!(stdout.contains("{\"source_id\":2,\"source_index\":200}"));
    assert!(stdout.contains("\"timings\":[10,20]"));

    let text = csvwire()
        .args(["lineage", "decode", "--text"])
        .arg(&record)
        .output()
        .expect("decode --text should run");
    assert!(text.status.success());
    let stdout = String::from_utf8_lossy(&text.stdout);
    assert!(stdout.starts_with("sources, timings\n[1, 0x64, 2, 0xc8], [10, 20, "));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn lineage_over_capacity_is_invalid_data() {
    let dir = unique_temp_dir("capacity");
    let mut command = csvwire();
    command.args(["lineage", "encode", "--output"]).arg(dir.join("full.bin"));
    for stamp in 0..41 {
        command.arg("--timing").arg(stamp.to_string());
    }

    let output = command.output().expect("encode should run");
    assert_eq!(output.status.code(), Some(60));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn truncated_record_is_invalid_data() {
    let dir = unique_temp_dir("truncated");
    let record = dir.join("short.bin");
    std::fs::write(&record, [1u8, 0, 0]).expect("record should be writable");

    let output = csvwire()
        .args(["lineage", "decode"])
        .arg(&record)
        .output()
        .expect("decode should run");
    assert_eq!(output.status.code(), Some(60));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn version_reports_package_version() {
    let output = csvwire().arg("version").output().expect("version should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), format!("csvwire {}", env!("CARGO_PKG_VERSION")));
}
