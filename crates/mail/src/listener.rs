//! Polling listener feeding captured messages into an awaitable channel

use std::collections::HashSet;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::error::{MailError, MailResult};
use crate::message::MailMessage;

/// Configuration for the mail listener
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Base URL of the MailDev web API
    pub base_url: String,

    /// How often to poll the inbox
    pub poll_interval: Duration,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:1080".to_string(),
            poll_interval: Duration::from_millis(250),
        }
    }
}

/// Listener for newly captured mail.
///
/// `start` takes a baseline of the inbox and from then on forwards each
/// newly observed message exactly once into an internal channel; a step
/// reads it with [`MailListener::wait_for_message`]. Messages present
/// before `start` are never delivered.
pub struct MailListener {
    rx: mpsc::Receiver<MailMessage>,
    task: Option<JoinHandle<()>>,
}

impl MailListener {
    /// Start polling the capture service
    pub fn start(config: MailConfig) -> MailResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()?;
        let (tx, rx) = mpsc::channel(64);

        info!("Starting mail listener against {}", config.base_url);
        let task = tokio::spawn(poll_loop(client, config, tx));

        Ok(Self {
            rx,
            task: Some(task),
        })
    }

    /// Wait up to `wait` for the next captured message.
    ///
    /// Each message is read at most once. Delivery order is arrival order;
    /// there is no correlation to the action that produced the message.
    pub async fn wait_for_message(&mut self, wait: Duration) -> MailResult<MailMessage> {
        match timeout(wait, self.rx.recv()).await {
            Ok(Some(msg)) => {
                debug!(subject = %msg.subject, "captured mail message");
                Ok(msg)
            }
            Ok(None) => Err(MailError::ListenerStopped),
            Err(_) => Err(MailError::Timeout {
                ms: wait.as_millis() as u64,
            }),
        }
    }

    /// Stop polling. Idempotent; also runs on drop.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    #[cfg(test)]
    fn with_receiver(rx: mpsc::Receiver<MailMessage>) -> Self {
        Self { rx, task: None }
    }
}

impl Drop for MailListener {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_loop(client: reqwest::Client, config: MailConfig, tx: mpsc::Sender<MailMessage>) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut baseline = true;

    loop {
        match fetch_inbox(&client, &config.base_url).await {
            Ok(inbox) => {
                for msg in select_new(inbox, &mut seen, baseline) {
                    if tx.send(msg).await.is_err() {
                        // Receiver dropped: the scenario is done with us.
                        return;
                    }
                }
                baseline = false;
            }
            Err(e) => {
                warn!("Mail inbox poll failed: {}", e);
            }
        }

        sleep(config.poll_interval).await;
    }
}

async fn fetch_inbox(client: &reqwest::Client, base_url: &str) -> MailResult<Vec<MailMessage>> {
    let url = format!("{}/email", base_url);
    let inbox = client.get(&url).send().await?.json().await?;
    Ok(inbox)
}

/// Pick the not-yet-seen messages out of an inbox snapshot.
///
/// During the baseline pass everything is marked seen without being
/// delivered, so pre-existing mail never reaches the scenario.
fn select_new(
    inbox: Vec<MailMessage>,
    seen: &mut HashSet<String>,
    baseline: bool,
) -> Vec<MailMessage> {
    inbox
        .into_iter()
        .filter(|msg| seen.insert(msg.id.clone()) && !baseline)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(id: &str, subject: &str) -> MailMessage {
        MailMessage {
            id: id.to_string(),
            subject: subject.to_string(),
            text: String::new(),
            to: vec![],
            time: None,
        }
    }

    #[test]
    fn test_baseline_pass_swallows_existing_mail() {
        let mut seen = HashSet::new();

        let fresh = select_new(vec![msg("a", "old 1"), msg("b", "old 2")], &mut seen, true);
        assert!(fresh.is_empty());

        // Next poll: one repeat, one genuinely new.
        let fresh = select_new(vec![msg("b", "old 2"), msg("c", "new")], &mut seen, false);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].subject, "new");
    }

    #[test]
    fn test_message_delivered_exactly_once() {
        let mut seen = HashSet::new();
        select_new(vec![], &mut seen, true);

        let first = select_new(vec![msg("a", "reset")], &mut seen, false);
        let second = select_new(vec![msg("a", "reset")], &mut seen, false);
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn test_wait_for_message_receives_queued_mail() {
        let (tx, rx) = mpsc::channel(4);
        let mut listener = MailListener::with_receiver(rx);

        tx.send(msg("a", "Password query confirmation")).await.unwrap();

        let received = listener
            .wait_for_message(Duration::from_millis(100))
            .await
            .unwrap();
        assert_eq!(received.subject, "Password query confirmation");
    }

    #[tokio::test]
    async fn test_wait_for_message_times_out() {
        let (_tx, rx) = mpsc::channel::<MailMessage>(4);
        let mut listener = MailListener::with_receiver(rx);

        let err = listener
            .wait_for_message(Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(matches!(err, MailError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_wait_after_sender_dropped_reports_stopped() {
        let (tx, rx) = mpsc::channel::<MailMessage>(4);
        let mut listener = MailListener::with_receiver(rx);
        drop(tx);

        let err = listener
            .wait_for_message(Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(matches!(err, MailError::ListenerStopped));
    }
}
