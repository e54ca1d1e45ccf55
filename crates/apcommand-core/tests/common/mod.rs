// Fakes shared by the core integration tests: a BCM94718NR web server and
// (at the bottom) an Atheros root shell.
//
// Keeps per-unit radio state, applies committing submissions (those with
// `action=Apply`), renders `radio.asp`/`ssid.asp` for the selected unit
// and records every submission in order. Requests can be given a
// latency, and overlapping requests are counted so tests can assert the
// session lock kept them apart.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use apcommand_api::{Error, FieldPayload, FormTransport, LineOutput, LineTransport};
use async_trait::async_trait;

use apcommand_core::ApSession;

pub const SETTLE: Duration = Duration::from_millis(100);

/// One submission as the AP saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub path: String,
    pub data: Option<FieldPayload>,
}

impl Call {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.get(name))
    }

    pub fn is_commit(&self) -> bool {
        self.field("action") == Some("Apply")
    }
}

#[derive(Debug, Clone)]
pub struct Radio {
    pub enabled: bool,
    pub channel: String,
    pub sideband: String,
    pub ssid: String,
    mac: &'static str,
    channels: &'static [u16],
}

struct State {
    path: String,
    unit: usize,
    radios: [Radio; 2],
    calls: Vec<Call>,
    pinned: HashMap<usize, String>,
    fail_status: Option<u16>,
    blank: bool,
    latency: Option<Duration>,
}

pub struct FakeAp {
    state: Mutex<State>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeAp {
    /// 2.4GHz up on channel 6, 5GHz down on channel 36.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State {
                path: String::new(),
                unit: 0,
                radios: [
                    Radio {
                        enabled: true,
                        channel: "6".into(),
                        sideband: "lower".into(),
                        ssid: "bcm-24".into(),
                        mac: "(00:90:4C:09:11:03)",
                        channels: &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
                    },
                    Radio {
                        enabled: false,
                        channel: "36".into(),
                        sideband: "upper".into(),
                        ssid: "bcm-5".into(),
                        mac: "(00:90:4C:13:11:03)",
                        channels: &[36, 44, 149, 157],
                    },
                ],
                calls: Vec::new(),
                pinned: HashMap::new(),
                fail_status: None,
                blank: false,
                latency: None,
            }),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    pub fn session(self: &Arc<Self>, settle: Duration) -> ApSession {
        ApSession::new(self.clone(), settle)
    }

    /// Ignore channel writes for `unit`, always reporting `channel`.
    pub fn pin_channel(&self, unit: usize, channel: &str) {
        let mut state = self.state.lock().unwrap();
        state.radios[unit].channel = channel.to_owned();
        state.pinned.insert(unit, channel.to_owned());
    }

    /// Answer every submission with this HTTP status.
    pub fn fail_with(&self, status: u16) {
        self.state.lock().unwrap().fail_status = Some(status);
    }

    /// Serve pages without any form fields.
    pub fn serve_blank_pages(&self) {
        self.state.lock().unwrap().blank = true;
    }

    /// Hold every request open for `latency` before answering.
    pub fn set_latency(&self, latency: Duration) {
        self.state.lock().unwrap().latency = Some(latency);
    }

    /// Most requests that were ever being served at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn radio(&self, unit: usize) -> Radio {
        self.state.lock().unwrap().radios[unit].clone()
    }
}

#[async_trait]
impl FormTransport for FakeAp {
    fn set_path(&self, path: &str) {
        self.state.lock().unwrap().path = path.to_owned();
    }

    fn path(&self) -> String {
        self.state.lock().unwrap().path.clone()
    }

    async fn submit(&self, data: Option<&FieldPayload>) -> Result<String, Error> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let latency = self.state.lock().unwrap().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        let result = self.serve(data);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

impl FakeAp {
    fn serve(&self, data: Option<&FieldPayload>) -> Result<String, Error> {
        let mut state = self.state.lock().unwrap();
        let path = state.path.clone();
        state.calls.push(Call {
            path: path.clone(),
            data: data.cloned(),
        });

        if let Some(status) = state.fail_status {
            return Err(Error::HttpStatus {
                status,
                message: "fake AP failure".into(),
            });
        }

        if let Some(data) = data {
            if let Some(unit) = data.get("wl_unit") {
                state.unit = usize::from(unit == "1");
            }
            if data.get("action") == Some("Apply") {
                apply(&mut state, data);
            }
        }

        if state.blank {
            return Ok("<html><body></body></html>".into());
        }
        Ok(match path.as_str() {
            "radio.asp" => render_radio(&state),
            "ssid.asp" => render_ssid(&state),
            _ => "<html><body></body></html>".into(),
        })
    }
}

fn apply(state: &mut State, data: &FieldPayload) {
    let unit = state.unit;
    let pinned = state.pinned.get(&unit).cloned();
    let radio = &mut state.radios[unit];
    if let Some(value) = data.get("wl_radio") {
        radio.enabled = value == "1";
    }
    if let Some(value) = data.get("wl_channel") {
        radio.channel = pinned.unwrap_or_else(|| value.to_owned());
    }
    if let Some(value) = data.get("wl_nctrlsb") {
        radio.sideband = value.to_owned();
    }
    if let Some(value) = data.get("wl_ssid") {
        radio.ssid = value.to_owned();
    }
}

fn selected(on: bool) -> &'static str {
    if on { " selected" } else { "" }
}

fn render_radio(state: &State) -> String {
    let radio = &state.radios[state.unit];
    let mut html = String::from("<html><body><form method=\"post\" action=\"radio.asp\">\n");

    html.push_str("<select name=\"wl_unit\">\n");
    for (unit, r) in state.radios.iter().enumerate() {
        let _ = writeln!(
            html,
            "<option value=\"{unit}\"{}>{}</option>",
            selected(unit == state.unit),
            r.mac
        );
    }
    html.push_str("</select>\n");

    let _ = writeln!(
        html,
        "<select name=\"wl_radio\"><option value=\"0\"{}>Disabled</option><option value=\"1\"{}>Enabled</option></select>",
        selected(!radio.enabled),
        selected(radio.enabled)
    );

    html.push_str("<select name=\"wl_channel\">\n");
    for channel in radio.channels {
        let value = channel.to_string();
        let _ = writeln!(
            html,
            "<option value=\"{value}\"{}>{value}</option>",
            selected(value == radio.channel)
        );
    }
    html.push_str("</select>\n");

    html.push_str(
        "<select name=\"wl_nbw_cap\"><option value=\"1\" selected>20MHz in 2.4G Band and 40MHz in 5G Band</option></select>\n",
    );

    if state.unit == 1 {
        let _ = writeln!(
            html,
            "<select name=\"wl_nctrlsb\"><option value=\"lower\"{}>Lower</option><option value=\"upper\"{}>Upper</option></select>",
            selected(radio.sideband == "lower"),
            selected(radio.sideband == "upper")
        );
    }

    html.push_str("</form></body></html>");
    html
}

fn render_ssid(state: &State) -> String {
    let radio = &state.radios[state.unit];
    format!(
        "<html><body><form method=\"post\" action=\"ssid.asp\"><input name=\"wl_ssid\" value=\"{}\" maxlength=\"32\"></form></body></html>",
        radio.ssid
    )
}

pub fn payload(fields: &[(&str, &str)]) -> FieldPayload {
    fields.iter().copied().collect()
}

// ── Atheros shell ───────────────────────────────────────────────────

/// Records every command line and answers from canned output.
#[derive(Default)]
pub struct FakeShell {
    lines: Mutex<Vec<String>>,
    replies: Mutex<HashMap<String, Vec<String>>>,
    broken: Mutex<Option<String>>,
}

impl FakeShell {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Print `output` whenever `line` runs.
    pub fn reply(&self, line: &str, output: &[&str]) {
        self.replies.lock().unwrap().insert(
            line.to_owned(),
            output.iter().map(|l| (*l).to_owned()).collect(),
        );
    }

    /// Fail the transport when `line` runs.
    pub fn break_on(&self, line: &str) {
        *self.broken.lock().unwrap() = Some(line.to_owned());
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

#[async_trait]
impl LineTransport for FakeShell {
    async fn exec(&self, line: &str) -> Result<LineOutput, Error> {
        self.lines.lock().unwrap().push(line.to_owned());
        if self.broken.lock().unwrap().as_deref() == Some(line) {
            return Err(Error::Shell {
                message: "connection closed by AP".into(),
            });
        }
        Ok(LineOutput {
            output: self
                .replies
                .lock()
                .unwrap()
                .get(line)
                .cloned()
                .unwrap_or_default(),
            error: Vec::new(),
        })
    }
}
