//! Playwright driver subprocess management

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, Command as TokioCommand};
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::error::{BrowserError, BrowserResult};
use crate::protocol::{DriverCommand, DriverReply};

/// The driver script run by node. Reads one JSON request per stdin line,
/// writes one JSON reply per stdout line, in order.
const DRIVER_JS: &str = r#"
const readline = require('readline');
const playwright = require('playwright');

const browserName = process.env.SHOPTEST_BROWSER || 'chromium';
const headless = process.env.SHOPTEST_HEADLESS !== '0';

let browser = null;
const contexts = new Map();
const pages = new Map();
let nextId = 1;

function reply(obj) {
  process.stdout.write(JSON.stringify(obj) + '\n');
}

function getPage(req) {
  const page = pages.get(req.page_id);
  if (!page) throw new Error('unknown page: ' + req.page_id);
  return page;
}

async function handle(req) {
  switch (req.cmd) {
    case 'new_context': {
      if (!browser) {
        browser = await playwright[browserName].launch({ headless });
      }
      const context = await browser.newContext({
        viewport: { width: req.width, height: req.height }
      });
      const id = 'ctx-' + nextId++;
      contexts.set(id, context);
      return id;
    }
    case 'close_context': {
      const context = contexts.get(req.context_id);
      if (context) {
        for (const [pageId, page] of pages) {
          if (page.context() === context) pages.delete(pageId);
        }
        await context.close();
        contexts.delete(req.context_id);
      }
      return null;
    }
    case 'new_page': {
      const context = contexts.get(req.context_id);
      if (!context) throw new Error('unknown context: ' + req.context_id);
      const page = await context.newPage();
      const id = 'page-' + nextId++;
      pages.set(id, page);
      return id;
    }
    case 'goto': {
      await getPage(req).goto(req.url);
      return null;
    }
    case 'click': {
      await getPage(req).click(req.selector, { timeout: req.timeout_ms });
      return null;
    }
    case 'fill': {
      await getPage(req).fill(req.selector, req.value, { timeout: req.timeout_ms });
      return null;
    }
    case 'press': {
      await getPage(req).press(req.selector, req.key);
      return null;
    }
    case 'inner_text': {
      return await getPage(req).innerText(req.selector, { timeout: req.timeout_ms });
    }
    case 'title': {
      return await getPage(req).title();
    }
    case 'is_visible': {
      return await getPage(req).isVisible(req.selector);
    }
    case 'wait_for_selector': {
      await getPage(req).waitForSelector(req.selector, {
        state: req.state,
        timeout: req.timeout_ms
      });
      return null;
    }
    case 'set_checked': {
      await getPage(req).setChecked(req.selector, req.checked);
      return null;
    }
    case 'shutdown': {
      if (browser) await browser.close();
      return null;
    }
    default:
      throw new Error('unknown command: ' + req.cmd);
  }
}

const rl = readline.createInterface({ input: process.stdin });

reply({ ok: true, value: 'ready' });

(async () => {
  for await (const line of rl) {
    let req;
    try {
      req = JSON.parse(line);
    } catch (e) {
      reply({ ok: false, error: 'bad request: ' + e.message });
      continue;
    }
    try {
      const value = await handle(req);
      reply({ ok: true, value: value });
      if (req.cmd === 'shutdown') process.exit(0);
    } catch (e) {
      reply({ ok: false, error: e.message });
    }
  }
  if (browser) await browser.close();
})();
"#;

#[derive(Debug, Clone, Copy, Default)]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        }
    }
}

/// Configuration for the browser driver
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub browser: BrowserKind,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,

    /// Bound on each raw page action (click, fill, selector wait)
    pub action_timeout: Duration,

    /// Bound on driver startup (node + browser launch)
    pub startup_timeout: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            browser: BrowserKind::Chromium,
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            action_timeout: Duration::from_secs(5),
            startup_timeout: Duration::from_secs(30),
        }
    }
}

struct DriverRequest {
    cmd: DriverCommand,
    reply: oneshot::Sender<BrowserResult<serde_json::Value>>,
}

struct DriverInner {
    tx: mpsc::Sender<DriverRequest>,
    child: std::sync::Mutex<Option<Child>>,
    config: BrowserConfig,
    // Holds the staged driver script for the lifetime of the process
    _workdir: tempfile::TempDir,
}

/// Handle to the driver subprocess, cheap to clone.
///
/// Requests are strictly sequential: one in flight at a time, matching the
/// single-threaded step flow of a scenario. A dedicated task owns the
/// stdin/stdout exchange, so a caller that goes away mid-call (a timed-out
/// step) never leaves a request half-completed on the wire.
#[derive(Clone)]
pub struct BrowserDriver {
    inner: Arc<DriverInner>,
}

/// Owns the driver's pipes. Each queued request is written and its reply
/// line consumed before the next request starts; requests whose caller has
/// been cancelled are still driven to completion, so a reply can never pair
/// up with the wrong command.
async fn io_loop<W, R>(
    mut stdin: W,
    mut lines: Lines<BufReader<R>>,
    mut rx: mpsc::Receiver<DriverRequest>,
) where
    W: AsyncWrite + Unpin,
    R: AsyncRead + Unpin,
{
    while let Some(req) = rx.recv().await {
        let result = exchange(&mut stdin, &mut lines, &req.cmd).await;
        // The caller may be gone; the exchange has still run to completion.
        let _ = req.reply.send(result);
    }
}

async fn exchange<W, R>(
    stdin: &mut W,
    lines: &mut Lines<BufReader<R>>,
    cmd: &DriverCommand,
) -> BrowserResult<serde_json::Value>
where
    W: AsyncWrite + Unpin,
    R: AsyncRead + Unpin,
{
    let line = serde_json::to_string(cmd)?;
    debug!(cmd = cmd.tag(), "driver request");
    stdin.write_all(line.as_bytes()).await?;
    stdin.write_all(b"\n").await?;
    stdin.flush().await?;

    let reply = lines.next_line().await?.ok_or(BrowserError::DriverGone)?;
    let reply: DriverReply = serde_json::from_str(&reply)?;

    if reply.ok {
        Ok(reply.value.unwrap_or(serde_json::Value::Null))
    } else {
        Err(BrowserError::Protocol(
            reply.error.unwrap_or_else(|| "unknown driver error".to_string()),
        ))
    }
}

impl BrowserDriver {
    /// Spawn the driver and wait for its ready handshake
    pub async fn launch(config: BrowserConfig) -> BrowserResult<Self> {
        Self::check_playwright_installed()?;

        let workdir = tempfile::tempdir()?;
        let script_path = workdir.path().join("driver.js");
        std::fs::write(&script_path, DRIVER_JS)?;

        info!(browser = config.browser.as_str(), "Spawning Playwright driver");

        let mut child = TokioCommand::new("node")
            .arg(&script_path)
            .env("SHOPTEST_BROWSER", config.browser.as_str())
            .env("SHOPTEST_HEADLESS", if config.headless { "1" } else { "0" })
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| BrowserError::DriverStartup(format!("failed to spawn node: {}", e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| BrowserError::DriverStartup("driver stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BrowserError::DriverStartup("driver stdout unavailable".to_string()))?;

        let mut lines = BufReader::new(stdout).lines();

        // Ready handshake: the script emits one reply line before reading
        // any request.
        let ready = timeout(config.startup_timeout, lines.next_line())
            .await
            .map_err(|_| BrowserError::DriverStartup("driver startup timed out".to_string()))?
            .map_err(BrowserError::Io)?
            .ok_or(BrowserError::DriverGone)?;

        let reply: DriverReply = serde_json::from_str(&ready)?;
        if !reply.ok {
            return Err(BrowserError::DriverStartup(
                reply.error.unwrap_or_else(|| "driver refused to start".to_string()),
            ));
        }

        debug!("Driver ready");

        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(io_loop(stdin, lines, rx));

        Ok(Self {
            inner: Arc::new(DriverInner {
                tx,
                child: std::sync::Mutex::new(Some(child)),
                config,
                _workdir: workdir,
            }),
        })
    }

    /// Check if Playwright is installed
    fn check_playwright_installed() -> BrowserResult<()> {
        let status = std::process::Command::new("npx")
            .args(["playwright", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => Ok(()),
            _ => Err(BrowserError::PlaywrightNotFound),
        }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.inner.config
    }

    pub(crate) fn action_timeout_ms(&self) -> u64 {
        self.inner.config.action_timeout.as_millis() as u64
    }

    /// Queue one request and await its reply
    pub(crate) async fn call(&self, cmd: DriverCommand) -> BrowserResult<serde_json::Value> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.inner
            .tx
            .send(DriverRequest {
                cmd,
                reply: reply_tx,
            })
            .await
            .map_err(|_| BrowserError::DriverGone)?;
        reply_rx.await.map_err(|_| BrowserError::DriverGone)?
    }

    /// Shut the driver down: polite shutdown request, then SIGTERM, then
    /// kill. Leaking the process would leak the browser with it.
    pub async fn shutdown(&self) -> BrowserResult<()> {
        let _ = self.call(DriverCommand::Shutdown).await;

        let child = self
            .inner
            .child
            .lock()
            .ok()
            .and_then(|mut guard| guard.take());

        if let Some(mut child) = child {
            #[cfg(unix)]
            {
                use nix::sys::signal::{kill, Signal};
                use nix::unistd::Pid;

                if let Some(pid) = child.id() {
                    if kill(Pid::from_raw(pid as i32), Signal::SIGTERM).is_ok() {
                        tokio::time::sleep(Duration::from_millis(200)).await;
                    }
                }
            }

            let _ = child.start_kill();
            let _ = child.wait().await;
            info!("Driver stopped");
        }

        Ok(())
    }
}

impl Drop for DriverInner {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.child.lock() {
            if let Some(mut child) = guard.take() {
                warn!("Driver still running at drop, killing");
                let _ = child.start_kill();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_script_handles_every_command() {
        let commands = [
            DriverCommand::NewContext { width: 1280, height: 720 },
            DriverCommand::CloseContext { context_id: String::new() },
            DriverCommand::NewPage { context_id: String::new() },
            DriverCommand::Goto { page_id: String::new(), url: String::new() },
            DriverCommand::Click { page_id: String::new(), selector: String::new(), timeout_ms: 0 },
            DriverCommand::Fill {
                page_id: String::new(),
                selector: String::new(),
                value: String::new(),
                timeout_ms: 0,
            },
            DriverCommand::Press { page_id: String::new(), selector: String::new(), key: String::new() },
            DriverCommand::InnerText { page_id: String::new(), selector: String::new(), timeout_ms: 0 },
            DriverCommand::Title { page_id: String::new() },
            DriverCommand::IsVisible { page_id: String::new(), selector: String::new() },
            DriverCommand::WaitForSelector {
                page_id: String::new(),
                selector: String::new(),
                state: String::new(),
                timeout_ms: 0,
            },
            DriverCommand::SetChecked { page_id: String::new(), selector: String::new(), checked: false },
            DriverCommand::Shutdown,
        ];

        for cmd in &commands {
            let case = format!("case '{}'", cmd.tag());
            assert!(DRIVER_JS.contains(&case), "driver script misses {}", cmd.tag());
        }
    }

    #[test]
    fn test_browser_kind_names() {
        assert_eq!(BrowserKind::Chromium.as_str(), "chromium");
        assert_eq!(BrowserKind::Firefox.as_str(), "firefox");
        assert_eq!(BrowserKind::Webkit.as_str(), "webkit");
    }

    async fn queue_request(
        tx: &mpsc::Sender<DriverRequest>,
        cmd: DriverCommand,
    ) -> BrowserResult<serde_json::Value> {
        let (reply_tx, reply_rx) = oneshot::channel();
        tx.send(DriverRequest {
            cmd,
            reply: reply_tx,
        })
        .await
        .map_err(|_| BrowserError::DriverGone)?;
        reply_rx.await.map_err(|_| BrowserError::DriverGone)?
    }

    #[tokio::test]
    async fn test_cancelled_call_does_not_desync_replies() {
        let (runner_side, driver_side) = tokio::io::duplex(4096);
        let (read, write) = tokio::io::split(runner_side);
        let (tx, rx) = mpsc::channel(8);
        tokio::spawn(io_loop(write, BufReader::new(read).lines(), rx));

        // Fake driver: answers each request after a delay, naming the
        // command it replies to.
        let (drv_read, mut drv_write) = tokio::io::split(driver_side);
        tokio::spawn(async move {
            let mut lines = BufReader::new(drv_read).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let req: serde_json::Value = serde_json::from_str(&line).unwrap();
                tokio::time::sleep(Duration::from_millis(100)).await;
                let reply = format!(
                    "{{\"ok\": true, \"value\": \"reply-for-{}\"}}\n",
                    req["cmd"].as_str().unwrap()
                );
                drv_write.write_all(reply.as_bytes()).await.unwrap();
            }
        });

        // A step timeout cancels the caller while its exchange is in flight.
        let cancelled = timeout(
            Duration::from_millis(10),
            queue_request(
                &tx,
                DriverCommand::Title {
                    page_id: "page-1".to_string(),
                },
            ),
        )
        .await;
        assert!(cancelled.is_err());

        // The next request (a teardown's close_context) must still get its
        // own reply, not the stale one of the cancelled call.
        let value = queue_request(
            &tx,
            DriverCommand::CloseContext {
                context_id: "ctx-1".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(value, "reply-for-close_context");
    }
}
