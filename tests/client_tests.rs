//! Client Integration Tests
//!
//! Exercises the full client against an in-process fake daemon speaking
//! the line protocol over a Unix socket in a temporary directory.

use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tempfile::TempDir;

use avast_client::{AvastError, Client, ClientConfig, Flag, PackOption, ScanStatus, SensiOption};

// =============================================================================
// Fake Daemon
// =============================================================================

/// How the fake daemon behaves
#[derive(Debug, Clone, Copy)]
enum DaemonMode {
    /// Answer every command correctly
    Normal,

    /// Delay the VPS response past any reasonable command deadline
    SlowVps,

    /// Answer VPS with a non-numeric version payload
    BadVps,
}

/// An in-process daemon listening on a Unix socket in a temp directory
struct FakeDaemon {
    socket_path: PathBuf,
    _dir: TempDir,
}

impl FakeDaemon {
    fn spawn(mode: DaemonMode) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let socket_path = dir.path().join("scan.sock");
        let listener = UnixListener::bind(&socket_path).expect("bind unix socket");

        thread::spawn(move || {
            for stream in listener.incoming() {
                match stream {
                    Ok(stream) => {
                        thread::spawn(move || serve(stream, mode));
                    }
                    Err(_) => return,
                }
            }
        });

        Self {
            socket_path,
            _dir: dir,
        }
    }

    fn connect(&self) -> Client {
        Client::connect(&self.socket_path).expect("connect to fake daemon")
    }
}

/// Handle one daemon session
fn serve(stream: UnixStream, mode: DaemonMode) {
    let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
    let mut writer = stream;
    let mut exclude: Option<String> = None;

    if writer.write_all(b"220 DAEMON\n").is_err() {
        return;
    }

    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        let request = line.trim_end();
        let (verb, arg) = match request.split_once(' ') {
            Some((verb, arg)) => (verb, Some(arg)),
            None => (request, None),
        };

        let ok = match verb {
            "VPS" => match mode {
                DaemonMode::Normal => {
                    respond(&mut writer, "210 VPS DATA\nVPS 190918-0\n200 VPS OK\n")
                }
                DaemonMode::SlowVps => {
                    thread::sleep(Duration::from_secs(3));
                    respond(&mut writer, "210 VPS DATA\nVPS 190918-0\n200 VPS OK\n")
                }
                DaemonMode::BadVps => {
                    respond(&mut writer, "210 VPS DATA\nVPS current\n200 VPS OK\n")
                }
            },
            "PACK" => respond(
                &mut writer,
                "210 PACK DATA\nPACK -mime+zip+rar\n200 PACK OK\n",
            ),
            "FLAGS" => respond(
                &mut writer,
                "210 FLAGS DATA\nFLAGS -fullfiles-allfiles-scandevices\n200 FLAGS OK\n",
            ),
            "SENSITIVITY" => respond(
                &mut writer,
                "210 SENSITIVITY DATA\nSENSITIVITY +worm+trojan+adware\n200 SENSITIVITY OK\n",
            ),
            "EXCLUDE" => match arg {
                Some(path) => {
                    exclude = Some(path.to_string());
                    respond(
                        &mut writer,
                        &format!("210 EXCLUDE DATA\nEXCLUDE {}\n200 EXCLUDE OK\n", path),
                    )
                }
                None => match &exclude {
                    Some(path) => respond(
                        &mut writer,
                        &format!("210 EXCLUDE DATA\nEXCLUDE {}\n200 EXCLUDE OK\n", path),
                    ),
                    // Nothing excluded: the closing line doubles as the payload
                    None => respond(&mut writer, "210 EXCLUDE DATA\n200 EXCLUDE OK\n"),
                },
            },
            "SCAN" => respond(&mut writer, &scan_response(arg.unwrap_or(""))),
            "CHECKURL" => {
                if arg.is_some_and(|url| url.contains("malware")) {
                    respond(&mut writer, "520 URL blocked\n")
                } else {
                    respond(&mut writer, "200 CHECKURL OK\n")
                }
            }
            "QUIT" => return,
            _ => respond(&mut writer, "554 Unknown command\n"),
        };

        if !ok {
            return;
        }
    }
}

fn respond(writer: &mut UnixStream, response: &str) -> bool {
    writer.write_all(response.as_bytes()).is_ok()
}

/// Scripted SCAN responses keyed on the requested path
fn scan_response(path: &str) -> String {
    let mut response = String::from("210 SCAN DATA\n");
    match path {
        "/tmp/empty" => {}
        "/tmp/eicar.tar.bz2" => {
            response.push_str("SCAN /tmp/eicar.tar.bz2\t[+]0.0\n");
            response.push_str(
                "SCAN /tmp/eicar.tar.bz2|eicar.com\t[L]1.0\t0 EICAR Test-NOT virus!!!\n",
            );
            response.push_str("SCAN /tmp/eicar.tar.bz2|readme.txt\t[+]1.0\n");
        }
        "/tmp/garbled" => {
            response.push_str("SCAN /tmp/garbled/ok.txt\t[+]0.0\n");
            response.push_str("mangled line with no structure\n");
            response.push_str("SCAN /tmp/garbled/also-ok.txt\t[+]0.0\n");
        }
        _ => {
            response.push_str(&format!("SCAN {}\t[+]0.0\n", path));
        }
    }
    response.push_str("200 SCAN OK\n");
    response
}

// =============================================================================
// Construction Tests
// =============================================================================

#[test]
fn test_socket_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such.sock");

    let err = Client::connect(&path).unwrap_err();
    match err {
        AvastError::SocketMissing(missing) => assert_eq!(missing, path),
        other => panic!("Expected SocketMissing, got {:?}", other),
    }
}

#[test]
fn test_connect_and_greeting() {
    let daemon = FakeDaemon::spawn(DaemonMode::Normal);
    let client = daemon.connect();

    assert_eq!(client.socket_path(), daemon.socket_path);
    client.close().unwrap();
}

#[test]
fn test_connect_with_config() {
    let daemon = FakeDaemon::spawn(DaemonMode::Normal);
    let config = ClientConfig::builder()
        .socket_path(&daemon.socket_path)
        .connect_timeout(Duration::from_secs(5))
        .command_timeout(Duration::from_secs(10))
        .connect_retries(2)
        .retry_sleep(Duration::from_millis(100))
        .build();

    let client = Client::with_config(config).unwrap();
    assert_eq!(client.conn_timeout(), Duration::from_secs(5));
    assert_eq!(client.cmd_timeout(), Duration::from_secs(10));
    assert_eq!(client.conn_retries(), 2);
    assert_eq!(client.conn_sleep(), Duration::from_millis(100));
    client.close().unwrap();
}

// =============================================================================
// Policy Knob Tests
// =============================================================================

#[test]
fn test_policy_defaults_and_setters() {
    let daemon = FakeDaemon::spawn(DaemonMode::Normal);
    let client = daemon.connect();

    assert_eq!(client.conn_timeout(), Duration::from_secs(15));
    assert_eq!(client.cmd_timeout(), Duration::from_secs(60));
    assert_eq!(client.conn_retries(), 0);
    assert_eq!(client.conn_sleep(), Duration::from_secs(1));

    client.set_conn_timeout(Duration::from_secs(2));
    client.set_cmd_timeout(Duration::from_secs(3));
    client.set_conn_retries(4);
    client.set_conn_sleep(Duration::from_millis(500));

    assert_eq!(client.conn_timeout(), Duration::from_secs(2));
    assert_eq!(client.cmd_timeout(), Duration::from_secs(3));
    assert_eq!(client.conn_retries(), 4);
    assert_eq!(client.conn_sleep(), Duration::from_millis(500));

    // Zero durations are ignored, never applied
    client.set_conn_timeout(Duration::ZERO);
    client.set_cmd_timeout(Duration::ZERO);
    client.set_conn_sleep(Duration::ZERO);

    assert_eq!(client.conn_timeout(), Duration::from_secs(2));
    assert_eq!(client.cmd_timeout(), Duration::from_secs(3));
    assert_eq!(client.conn_sleep(), Duration::from_millis(500));

    client.close().unwrap();
}

// =============================================================================
// Command Tests
// =============================================================================

#[test]
fn test_vps() {
    let daemon = FakeDaemon::spawn(DaemonMode::Normal);
    let client = daemon.connect();

    assert_eq!(client.vps().unwrap(), 190918);
    client.close().unwrap();
}

#[test]
fn test_vps_invalid_payload() {
    let daemon = FakeDaemon::spawn(DaemonMode::BadVps);
    let client = daemon.connect();

    assert!(matches!(
        client.vps(),
        Err(AvastError::InvalidResponse(_))
    ));
    client.close().unwrap();
}

#[test]
fn test_get_set_pack() {
    let daemon = FakeDaemon::spawn(DaemonMode::Normal);
    let client = daemon.connect();

    assert_eq!(client.get_pack().unwrap(), "-mime+zip+rar");
    client.set_pack(PackOption::Mime, true).unwrap();
    client.set_pack(PackOption::Rar, false).unwrap();
    client.close().unwrap();
}

#[test]
fn test_get_set_flags() {
    let daemon = FakeDaemon::spawn(DaemonMode::Normal);
    let client = daemon.connect();

    assert_eq!(client.get_flags().unwrap(), "-fullfiles-allfiles-scandevices");
    client.set_flags(Flag::FullFiles, true).unwrap();
    client.set_flags(Flag::ScanDevices, false).unwrap();
    client.close().unwrap();
}

#[test]
fn test_get_set_sensitivity() {
    let daemon = FakeDaemon::spawn(DaemonMode::Normal);
    let client = daemon.connect();

    assert_eq!(client.get_sensitivity().unwrap(), "+worm+trojan+adware");
    client.set_sensitivity(SensiOption::Worm, false).unwrap();
    client.set_sensitivity(SensiOption::Pup, true).unwrap();
    client.close().unwrap();
}

#[test]
fn test_exclude_roundtrip() {
    let daemon = FakeDaemon::spawn(DaemonMode::Normal);
    let client = daemon.connect();

    // Nothing excluded yet: the daemon folds the closing line into the
    // payload and the client reads it as "no exclusion"
    assert_eq!(client.get_exclude().unwrap(), "");

    client.set_exclude("/root").unwrap();
    assert_eq!(client.get_exclude().unwrap(), "/root");

    client.close().unwrap();
}

#[test]
fn test_check_url() {
    let daemon = FakeDaemon::spawn(DaemonMode::Normal);
    let client = daemon.connect();

    assert!(!client.check_url("http://www.example.com").unwrap());
    assert!(client.check_url("http://malware.example.com").unwrap());

    client.close().unwrap();
}

// =============================================================================
// SCAN Tests
// =============================================================================

#[test]
fn test_scan_empty_stream() {
    let daemon = FakeDaemon::spawn(DaemonMode::Normal);
    let client = daemon.connect();

    let results = client.scan("/tmp/empty").unwrap();
    assert!(results.is_empty());

    client.close().unwrap();
}

#[test]
fn test_scan_results() {
    let daemon = FakeDaemon::spawn(DaemonMode::Normal);
    let client = daemon.connect();

    let results = client.scan("/tmp/eicar.tar.bz2").unwrap();
    assert_eq!(results.len(), 3);

    assert_eq!(results[0].filename, "/tmp/eicar.tar.bz2");
    assert_eq!(results[0].archive_item, None);
    assert_eq!(results[0].status, ScanStatus::Clean);
    assert!(!results[0].infected);

    assert_eq!(results[1].filename, "/tmp/eicar.tar.bz2");
    assert_eq!(results[1].archive_item, Some("eicar.com".to_string()));
    assert!(results[1].infected);
    assert_eq!(
        results[1].signature,
        Some("EICAR Test-NOT virus!!!".to_string())
    );

    assert_eq!(results[2].archive_item, Some("readme.txt".to_string()));
    assert!(!results[2].infected);

    client.close().unwrap();
}

#[test]
fn test_scan_malformed_line_is_soft_error() {
    let daemon = FakeDaemon::spawn(DaemonMode::Normal);
    let client = daemon.connect();

    // The garbled line surfaces as an error, but only after the stream
    // has been drained to its terminator
    match client.scan("/tmp/garbled") {
        Err(AvastError::InvalidResponse(line)) => {
            assert_eq!(line, "mangled line with no structure");
        }
        other => panic!("Expected InvalidResponse, got {:?}", other),
    }

    // The connection is still in sync for further commands
    assert_eq!(client.vps().unwrap(), 190918);

    client.close().unwrap();
}

// =============================================================================
// Deadline & Concurrency Tests
// =============================================================================

#[test]
fn test_command_deadline_surfaces_timeout() {
    let daemon = FakeDaemon::spawn(DaemonMode::SlowVps);
    let client = daemon.connect();
    client.set_cmd_timeout(Duration::from_millis(200));

    let err = client.vps().unwrap_err();
    assert!(err.is_timeout(), "expected timeout error, got {:?}", err);
}

#[test]
fn test_concurrent_commands_are_serialized() {
    let daemon = FakeDaemon::spawn(DaemonMode::Normal);
    let client = Arc::new(daemon.connect());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let client = Arc::clone(&client);
        handles.push(thread::spawn(move || {
            for _ in 0..5 {
                assert_eq!(client.vps().unwrap(), 190918);
            }
        }));
    }

    for handle in handles {
        handle.join().expect("worker thread panicked");
    }
}
