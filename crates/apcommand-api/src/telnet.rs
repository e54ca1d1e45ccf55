// Telnet shell client
//
// Logs in on first use and keeps the shell open between commands. Every
// option the server offers is refused (WONT/DONT), which leaves a plain
// line-mode shell. A command's output is whatever the shell prints before
// its next prompt, minus the echoed command line. A failed exchange drops
// the session; the next command logs in again.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::error::Error;
use crate::line::{LineOutput, LineTransport};

pub const DEFAULT_PORT: u16 = 23;

/// Shell prompt of the Atheros reference firmware (`~ # `).
pub const DEFAULT_PROMPT: &str = "# ";

const LOGIN: &str = "login:";
const PASSWORD: &str = "Password:";

const IAC: u8 = 255;
const DONT: u8 = 254;
const DO: u8 = 253;
const WONT: u8 = 252;
const WILL: u8 = 251;
const SB: u8 = 250;
const SE: u8 = 240;

/// Telnet client for an AP's root shell.
pub struct TelnetClient {
    host: String,
    port: u16,
    username: String,
    password: SecretString,
    prompt: String,
    timeout: Duration,
    session: Mutex<Option<Connection>>,
}

impl TelnetClient {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: SecretString,
        timeout: Duration,
    ) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            username: username.into(),
            password,
            prompt: DEFAULT_PROMPT.into(),
            timeout,
            session: Mutex::new(None),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Text the shell prints when it is ready for the next command.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    async fn login(&self) -> Result<Connection, Error> {
        debug!(host = %self.host, port = self.port, "opening telnet session");
        let stream = tokio::time::timeout(
            self.timeout,
            TcpStream::connect((self.host.as_str(), self.port)),
        )
        .await
        .map_err(|_| self.timed_out())??;

        let mut conn = Connection::new(stream);
        let deadline = Instant::now() + self.timeout;
        conn.read_until(&[LOGIN], deadline, self.timeout).await?;
        conn.send(&self.username).await?;
        conn.read_until(&[PASSWORD], deadline, self.timeout).await?;
        conn.send(self.password.expose_secret()).await?;

        // A rejected login comes back to the login prompt.
        let (_, matched) = conn
            .read_until(&[self.prompt.as_str(), LOGIN], deadline, self.timeout)
            .await?;
        if matched != 0 {
            return Err(Error::Authentication {
                message: "AP rejected the telnet login".into(),
            });
        }
        debug!(host = %self.host, "telnet login complete");
        Ok(conn)
    }

    async fn run(&self, conn: &mut Connection, line: &str) -> Result<LineOutput, Error> {
        conn.send(line).await?;
        let deadline = Instant::now() + self.timeout;
        let (text, _) = conn
            .read_until(&[self.prompt.as_str()], deadline, self.timeout)
            .await?;
        Ok(LineOutput {
            output: output_lines(&text, line),
            error: Vec::new(),
        })
    }

    fn timed_out(&self) -> Error {
        Error::Timeout {
            timeout_secs: self.timeout.as_secs(),
        }
    }
}

#[async_trait]
impl LineTransport for TelnetClient {
    async fn exec(&self, line: &str) -> Result<LineOutput, Error> {
        let mut session = self.session.lock().await;
        let mut conn = match session.take() {
            Some(conn) => conn,
            None => self.login().await?,
        };

        debug!(line, "exec");
        let result = self.run(&mut conn, line).await;
        if let Ok(ref out) = result {
            trace!(lines = out.output.len(), "command output received");
            *session = Some(conn);
        }
        result
    }
}

/// Lines of `text` between the echoed command and the prompt line.
fn output_lines(text: &str, line: &str) -> Vec<String> {
    // Whatever follows the last newline is the start of the prompt line.
    let body = text.rsplit_once('\n').map_or("", |(body, _)| body);
    let mut lines = body.lines().map(|l| l.trim_end_matches('\r'));
    let first = lines.next();
    first
        .filter(|first| first.trim() != line.trim())
        .into_iter()
        .chain(lines)
        .map(str::to_owned)
        .collect()
}

// ── Connection ───────────────────────────────────────────────────────

struct Connection {
    stream: TcpStream,
    decoder: Decoder,
    text: String,
}

impl Connection {
    fn new(stream: TcpStream) -> Self {
        Self {
            stream,
            decoder: Decoder::default(),
            text: String::new(),
        }
    }

    async fn send(&mut self, line: &str) -> Result<(), Error> {
        self.stream.write_all(format!("{line}\n").as_bytes()).await?;
        Ok(())
    }

    /// Read until the received text ends with one of `markers`. Returns the
    /// text before the marker and the marker's index.
    async fn read_until(
        &mut self,
        markers: &[&str],
        deadline: Instant,
        timeout: Duration,
    ) -> Result<(String, usize), Error> {
        let mut buf = [0u8; 1024];
        loop {
            if let Some(found) = self.take_through(markers) {
                return Ok(found);
            }
            let n = tokio::time::timeout_at(deadline, self.stream.read(&mut buf))
                .await
                .map_err(|_| Error::Timeout {
                    timeout_secs: timeout.as_secs(),
                })??;
            if n == 0 {
                return Err(Error::Shell {
                    message: "connection closed by AP".into(),
                });
            }
            let (data, replies) = self.decoder.feed(&buf[..n]);
            if !replies.is_empty() {
                self.stream.write_all(&replies).await?;
            }
            self.text.push_str(&String::from_utf8_lossy(&data));
        }
    }

    fn take_through(&mut self, markers: &[&str]) -> Option<(String, usize)> {
        let tail = self.text.trim_end_matches(' ');
        let (index, marker) = markers
            .iter()
            .map(|m| m.trim_end())
            .enumerate()
            .find(|(_, m)| tail.ends_with(m))?;
        let cut = tail.len() - marker.len();
        let mut before = std::mem::take(&mut self.text);
        before.truncate(cut);
        Some((before, index))
    }
}

// ── Option negotiation ───────────────────────────────────────────────

/// Strips telnet commands from the byte stream, holding back a sequence
/// split across reads until it is complete.
#[derive(Debug, Default)]
struct Decoder {
    pending: Vec<u8>,
}

impl Decoder {
    /// Split `input` into shell text and the replies owed to the server.
    fn feed(&mut self, input: &[u8]) -> (Vec<u8>, Vec<u8>) {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(input);

        let mut data = Vec::with_capacity(bytes.len());
        let mut replies = Vec::new();
        let mut i = 0;
        while let Some(&byte) = bytes.get(i) {
            if byte != IAC {
                data.push(byte);
                i += 1;
                continue;
            }
            let Some(&command) = bytes.get(i + 1) else {
                break;
            };
            match command {
                IAC => {
                    data.push(IAC);
                    i += 2;
                }
                DO | DONT | WILL | WONT => {
                    let Some(&option) = bytes.get(i + 2) else {
                        break;
                    };
                    if command == DO {
                        replies.extend_from_slice(&[IAC, WONT, option]);
                    } else if command == WILL {
                        replies.extend_from_slice(&[IAC, DONT, option]);
                    }
                    i += 3;
                }
                SB => match bytes[i + 2..].windows(2).position(|w| w == [IAC, SE]) {
                    Some(end) => i += end + 4,
                    None => break,
                },
                _ => i += 2,
            }
        }
        self.pending = bytes.split_off(i.min(bytes.len()));
        (data, replies)
    }
}
