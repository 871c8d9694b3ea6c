#![cfg(all(unix, feature = "cli"))]

use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::thread;

use mcsprims_frame::{FrameReader, FrameWriter};
use mcsprims_proto::{AppData, DataMessageStanza, LoginResponse, McsMessage};

fn unique_temp_file(tag: &str, contents: &[u8]) -> PathBuf {
    let path = PathBuf::from(format!(
        "/tmp/mcscli-{tag}-{}-{}.bin",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::write(&path, contents).expect("capture file should be writable");
    path
}

fn mcsprims(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mcsprims"))
        .args(["--log-level", "off"])
        .args(args)
        .output()
        .expect("mcsprims should run")
}

fn frame_bytes(message: &McsMessage) -> Vec<u8> {
    let mut writer = FrameWriter::new(Vec::new());
    writer
        .send(message.tag().as_u8(), &message.encode_to_vec())
        .expect("frame should encode");
    writer.into_inner()[1..].to_vec()
}

fn sample_data_message() -> McsMessage {
    DataMessageStanza {
        id: Some("m1".to_string()),
        from: "a".to_string(),
        category: "c".to_string(),
        app_data: vec![AppData::new("k", "v")],
        ..DataMessageStanza::default()
    }
    .into()
}

#[test]
fn version_prints_package_version() {
    let out = mcsprims(&["version"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.trim(), format!("mcsprims {}", env!("CARGO_PKG_VERSION")));
}

#[test]
fn decode_prints_records_as_json() {
    let mut capture = vec![41];
    capture.extend(frame_bytes(&McsMessage::from(LoginResponse::default())));
    capture.extend([0, 0]);
    capture.extend(frame_bytes(&sample_data_message()));
    let path = unique_temp_file("decode", &capture);

    let out = mcsprims(&["decode", path.to_str().unwrap(), "--format", "json"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let lines: Vec<serde_json::Value> = String::from_utf8_lossy(&out.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line should be JSON"))
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["name"], "login-response");
    assert_eq!(lines[1]["tag"], 0);
    assert_eq!(lines[2]["name"], "data-message-stanza");
    assert!(lines[2]["detail"]
        .as_str()
        .unwrap()
        .contains(r#""app_data":[{"key":"k","value":"v"}]"#));

    let _ = std::fs::remove_file(path);
}

#[test]
fn decode_rejects_unsupported_version() {
    let path = unique_temp_file("badversion", &[40, 0, 0]);

    let out = mcsprims(&["decode", path.to_str().unwrap(), "--format", "json"]);
    assert_eq!(out.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&out.stderr).contains("unsupported MCS version 40"));

    let _ = std::fs::remove_file(path);
}

#[test]
fn decode_reports_unknown_tag_after_good_records() {
    let mut capture = vec![41, 0, 0];
    capture.extend([99, 0]);
    let path = unique_temp_file("unknowntag", &capture);

    let out = mcsprims(&["decode", path.to_str().unwrap(), "--format", "json"]);
    assert_eq!(out.status.code(), Some(60));
    assert_eq!(String::from_utf8_lossy(&out.stdout).lines().count(), 1);
    assert!(String::from_utf8_lossy(&out.stderr).contains("unknown message tag 99"));

    let _ = std::fs::remove_file(path);
}

#[test]
fn listen_logs_in_and_prints_data_message() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
    let port = listener.local_addr().unwrap().port().to_string();

    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("client should connect");
        let mut reader = FrameReader::new(stream.try_clone().unwrap());
        let login = reader.read_frame().expect("login request should arrive");
        assert_eq!(login.tag, 2);
        assert_eq!(reader.peer_version(), Some(41));

        let mut writer = FrameWriter::new(stream);
        let response = McsMessage::from(LoginResponse::default());
        writer
            .send(response.tag().as_u8(), &response.encode_to_vec())
            .unwrap();
        let data = sample_data_message();
        writer
            .send(data.tag().as_u8(), &data.encode_to_vec())
            .unwrap();

        // Drain until the client hangs up.
        while reader.read_frame().is_ok() {}
    });

    let out = mcsprims(&[
        "listen",
        "--host",
        "127.0.0.1",
        "--port",
        port.as_str(),
        "--android-id",
        "1234567890123",
        "--security-token",
        "42",
        "--count",
        "1",
        "--format",
        "json",
        "--plaintext",
    ]);
    server.join().expect("server thread should finish");

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let line = String::from_utf8_lossy(&out.stdout);
    let value: serde_json::Value =
        serde_json::from_str(line.trim()).expect("output should be JSON");
    assert_eq!(value["from"], "a");
    assert_eq!(value["category"], "c");
    assert_eq!(value["app_data"][0]["key"], "k");
    assert_eq!(value["app_data"][0]["value"], "v");
}

#[test]
fn listen_refused_connection_is_transport_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port().to_string()
    };

    let out = mcsprims(&[
        "listen",
        "--host",
        "127.0.0.1",
        "--port",
        port.as_str(),
        "--android-id",
        "1",
        "--security-token",
        "2",
        "--plaintext",
    ]);
    assert_eq!(out.status.code(), Some(3));
}

#[test]
fn listen_without_plaintext_opt_in_never_connects() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port().to_string();

    let out = mcsprims(&[
        "listen",
        "--host",
        "127.0.0.1",
        "--port",
        port.as_str(),
        "--android-id",
        "1",
        "--security-token",
        "2",
    ]);
    assert_eq!(out.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&out.stderr).contains("--plaintext"));

    listener.set_nonblocking(true).unwrap();
    let accepted = listener.accept();
    assert!(
        matches!(&accepted, Err(err) if err.kind() == std::io::ErrorKind::WouldBlock),
        "client should not have connected"
    );
}

#[test]
fn decode_header_only_capture_prints_nothing() {
    let path = unique_temp_file("headeronly", &[41]);

    let out = mcsprims(&["decode", path.to_str().unwrap(), "--format", "json"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(out.stdout.is_empty());

    let _ = std::fs::remove_file(path);
}

#[test]
fn decode_reports_capture_ending_mid_frame() {
    // A ping, then a data message header promising 5 bytes with only 1 present.
    let path = unique_temp_file("midframe", &[41, 0, 0, 8, 5, 1]);

    let out = mcsprims(&["decode", path.to_str().unwrap(), "--format", "json"]);
    assert_eq!(out.status.code(), Some(60));
    assert_eq!(String::from_utf8_lossy(&out.stdout).lines().count(), 1);
    assert!(String::from_utf8_lossy(&out.stderr).contains("capture ends mid-frame (3 bytes left)"));

    let _ = std::fs::remove_file(path);
}
