//! In-process stand-in for the window manager's IPC socket.
#![allow(dead_code)]

use std::{
    env, fs,
    path::{Path, PathBuf},
    process,
    sync::OnceLock,
    time::Duration,
};

use focus_tracker::{FocusTracker, WindowId};
use parking_lot::{Mutex, MutexGuard};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{UnixListener, UnixStream},
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
    time::{sleep, timeout},
};

/// How long tests wait for anything to happen.
pub const WAIT: Duration = Duration::from_secs(5);

/// Frame magic.
const MAGIC: &[u8; 6] = b"i3-ipc";
/// Request codes.
const RUN_COMMAND: u32 = 0;
const SUBSCRIBE: u32 = 2;
const GET_TREE: u32 = 4;
const GET_VERSION: u32 = 7;
/// Event codes.
const WINDOW_EVENT: u32 = 0x8000_0003;
const SHUTDOWN_EVENT: u32 = 0x8000_0006;

/// Serializes tests that point `SWAYSOCK` somewhere.
pub fn env_lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(())).lock()
}

/// Make the next connection go to `socket`. Callers hold [`env_lock`].
pub fn use_socket(socket: &Path) {
    // SAFETY: every test touching these variables holds the env lock.
    unsafe {
        env::remove_var("I3SOCK");
        env::set_var("SWAYSOCK", socket);
    }
}

/// Socket and PID file paths for a test named `name`.
pub fn scratch_paths(name: &str) -> (PathBuf, PathBuf) {
    let base = format!("alttab-{name}-{}", process::id());
    let socket = env::temp_dir().join(format!("{base}.sock"));
    let pidfile = env::temp_dir().join(format!("{base}.pid"));
    let _ = fs::remove_file(&socket);
    let _ = fs::remove_file(&pidfile);
    (socket, pidfile)
}

/// Fake window manager serving one command connection and one event
/// connection, in the order the session opens them.
pub struct FakeWm {
    /// Socket the session connects to.
    pub socket: PathBuf,
    /// Scratch PID file path for the session under test.
    pub pidfile: PathBuf,
    /// Every `RUN_COMMAND` payload received.
    commands: UnboundedReceiver<String>,
    /// Raw event frames to push to the subscriber.
    events: Option<UnboundedSender<(u32, String)>>,
    /// Server task.
    task: JoinHandle<()>,
    /// Held until [`FakeWm::finish`].
    _env: MutexGuard<'static, ()>,
}

impl FakeWm {
    /// Start a server whose tree reports `focused` as the focused window.
    /// Commands containing `fail_on` are rejected.
    pub async fn start(name: &str, focused: i64, fail_on: Option<&'static str>) -> Self {
        let env = env_lock();
        let (socket, pidfile) = scratch_paths(name);
        let listener = UnixListener::bind(&socket).expect("bind fake wm");
        use_socket(&socket);

        let (cmd_tx, commands) = mpsc::unbounded_channel();
        let (events, event_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move {
            let (cmd_stream, _) = listener.accept().await.expect("accept commands");
            let served = tokio::spawn(serve_commands(cmd_stream, focused, fail_on, cmd_tx));
            let (event_stream, _) = listener.accept().await.expect("accept events");
            serve_events(event_stream, event_rx).await;
            let _ = served.await;
        });

        Self {
            socket,
            pidfile,
            commands,
            events: Some(events),
            task,
            _env: env,
        }
    }

    /// Push a window focus event for `id`.
    pub fn focus(&self, id: i64) {
        self.window_event("focus", id);
    }

    /// Push a window event with an arbitrary change kind.
    pub fn window_event(&self, change: &str, id: i64) {
        let container = node(id, "con", "none", true, "");
        let payload = format!(r#"{{"change":"{change}","container":{container}}}"#);
        self.push(WINDOW_EVENT, payload);
    }

    /// Announce that the window manager is exiting.
    pub fn shutdown(&self) {
        self.push(SHUTDOWN_EVENT, r#"{"change":"exit"}"#.to_string());
    }

    /// Queue one event frame.
    fn push(&self, kind: u32, payload: String) {
        if let Some(tx) = &self.events {
            tx.send((kind, payload)).expect("event channel open");
        }
    }

    /// Close the event connection, as the window manager does on exit.
    pub fn close_events(&mut self) {
        self.events = None;
    }

    /// Next command the session ran.
    pub async fn next_command(&mut self) -> String {
        timeout(WAIT, self.commands.recv())
            .await
            .expect("timed out waiting for command")
            .expect("command channel open")
    }

    /// Tear down and remove scratch files.
    pub async fn finish(self) {
        self.task.abort();
        let _ = self.task.await;
        let _ = fs::remove_file(&self.socket);
        let _ = fs::remove_file(&self.pidfile);
    }
}

/// A container as sway serializes it.
fn node(id: i64, kind: &str, layout: &str, focused: bool, children: &str) -> String {
    let rect = r#"{"x":0,"y":0,"width":1920,"height":1080}"#;
    format!(
        r#"{{"id":{id},"name":"n{id}","type":"{kind}","border":"none",
        "current_border_width":0,"layout":"{layout}","orientation":"none","percent":null,
        "rect":{rect},"window_rect":{rect},"deco_rect":{rect},"geometry":{rect},
        "urgent":false,"sticky":false,"marks":[],"focused":{focused},"focus":[],
        "fullscreen_mode":0,"nodes":[{children}],"floating_nodes":[]}}"#
    )
}

/// Root, one workspace, one focused window.
fn tree(focused: i64) -> String {
    let window = node(focused, "con", "none", true, "");
    let workspace = node(2, "workspace", "splith", false, &window);
    node(1, "root", "splith", false, &workspace)
}

/// Frame `payload` with a raw type code.
fn frame(kind: u32, payload: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(14 + payload.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&(payload.len() as u32).to_ne_bytes());
    buf.extend_from_slice(&kind.to_ne_bytes());
    buf.extend_from_slice(payload.as_bytes());
    buf
}

/// Read one request frame, or `None` once the client hangs up.
async fn read_request(stream: &mut UnixStream) -> Option<(u32, String)> {
    let mut header = [0u8; 14];
    stream.read_exact(&mut header).await.ok()?;
    assert_eq!(&header[..6], MAGIC);
    let len = u32::from_ne_bytes(header[6..10].try_into().expect("len bytes"));
    let kind = u32::from_ne_bytes(header[10..14].try_into().expect("type bytes"));
    let mut body = vec![0u8; len as usize];
    stream.read_exact(&mut body).await.ok()?;
    Some((kind, String::from_utf8(body).expect("utf8 request")))
}

async fn serve_commands(
    mut stream: UnixStream,
    focused: i64,
    fail_on: Option<&'static str>,
    tx: UnboundedSender<String>,
) {
    while let Some((kind, body)) = read_request(&mut stream).await {
        let reply = match kind {
            RUN_COMMAND => {
                let failed = fail_on.is_some_and(|pat| body.contains(pat));
                let _ = tx.send(body);
                if failed {
                    r#"[{"success":false,"parse_error":false,"error":"No matching node"}]"#
                        .to_string()
                } else {
                    r#"[{"success":true}]"#.to_string()
                }
            }
            GET_TREE => tree(focused),
            GET_VERSION => r#"{"major":1,"minor":9,"patch":0,"human_readable":"1.9",
                "loaded_config_file_name":"/etc/sway/config"}"#
                .to_string(),
            other => panic!("unexpected request type {other}"),
        };
        if stream.write_all(&frame(kind, &reply)).await.is_err() {
            break;
        }
    }
}

async fn serve_events(mut stream: UnixStream, mut rx: UnboundedReceiver<(u32, String)>) {
    let (kind, body) = read_request(&mut stream).await.expect("subscribe frame");
    assert_eq!(kind, SUBSCRIBE);
    assert_eq!(body, r#"["window","shutdown"]"#);
    stream
        .write_all(&frame(SUBSCRIBE, r#"{"success":true}"#))
        .await
        .expect("write subscribe reply");
    while let Some((kind, payload)) = rx.recv().await {
        if stream.write_all(&frame(kind, &payload)).await.is_err() {
            break;
        }
    }
}

/// Wait until the tracker's current window is `id`.
pub async fn wait_for_current(tracker: &FocusTracker, id: i64) {
    let want = WindowId::new(id);
    timeout(WAIT, async {
        while tracker.snapshot().current != want {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("timed out waiting for focus update");
}
