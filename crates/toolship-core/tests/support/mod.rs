#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

use toolship_core::ExitCode;
use toolship_core::remote::{CommandOutput, RemoteCommand, RemoteSession};

/// A remote host that interprets the handful of commands a deploy sends and
/// records every script it sees.
#[derive(Debug, Default)]
pub struct FakeHost {
    pub commands: Vec<RemoteCommand>,
    pub files: BTreeSet<String>,
    pub contents: BTreeMap<String, String>,
    pub symlinks: BTreeMap<String, String>,
    fail_on: Option<String>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str) -> Self {
        self.files.insert(path.to_string());
        self
    }

    pub fn with_content(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string());
        self.contents.insert(path.to_string(), content.to_string());
        self
    }

    /// Make every script containing `needle` exit 1.
    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on = Some(needle.to_string());
        self
    }

    /// Stop failing scripts set up with `failing_on`.
    pub fn recover(&mut self) {
        self.fail_on = None;
    }

    pub fn scripts(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.script.as_str()).collect()
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.scripts().iter().filter(|s| s.contains(needle)).count()
    }

    pub fn position_of(&self, needle: &str) -> Option<usize> {
        self.scripts().iter().position(|s| s.contains(needle))
    }

    pub fn clear_log(&mut self) {
        self.commands.clear();
    }
}

impl RemoteSession for FakeHost {
    fn exec(&mut self, command: &RemoteCommand) -> toolship_core::Result<CommandOutput> {
        self.commands.push(command.clone());
        let script = command.script.as_str();

        if let Some(needle) = &self.fail_on
            && script.contains(needle.as_str())
        {
            return Ok(CommandOutput {
                status: ExitCode(Some(1)),
                stdout: String::new(),
                stderr: format!("simulated failure: {}", script),
            });
        }

        if let Some(path) = script.strip_prefix("test -f ") {
            let status = if self.files.contains(path) { 0 } else { 1 };
            return Ok(CommandOutput::with_status(ExitCode(Some(status))));
        }

        let words: Vec<&str> = script.split_whitespace().collect();
        if script.starts_with("wget ") {
            if let Some(target) = words.last() {
                self.files.insert(target.to_string());
            }
        } else if let Some(path) = script.strip_prefix("cat > ") {
            self.files.insert(path.to_string());
            self.contents
                .insert(path.to_string(), command.stdin.clone().unwrap_or_default());
        } else if script.starts_with("ln -sfn ")
            && let (Some(target), Some(link)) = (words.get(2), words.last())
        {
            self.symlinks.insert(link.to_string(), target.to_string());
        }

        Ok(CommandOutput::success())
    }

    fn host(&self) -> &str {
        "fake.example.org"
    }
}

/// Serve one canned HTTP response on localhost.
///
/// Returns the base URL and a receiver yielding the raw request.
pub fn serve_once(status: &str, body: &str) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        let _ = tx.send(String::from_utf8_lossy(&request).into_owned());
    });

    (format!("http://{}", addr), rx)
}
