//! Terminal rendering of the dispatcher's observable state.

use std::io::{self, Write};

use futures::{stream, StreamExt};
use panel_core::{LogBuffer, StatusDisplay};
use shared::domain::{ControlState, StatusSeverity};
use tokio::{sync::watch, task::JoinHandle};
use tokio_stream::wrappers::WatchStream;

enum RenderEvent {
    Status(StatusDisplay),
    Logs(LogBuffer),
    Control(String, ControlState),
}

fn severity_label(severity: StatusSeverity) -> &'static str {
    match severity {
        StatusSeverity::Info => "INFO",
        StatusSeverity::Success => "SUCCESS",
        StatusSeverity::Error => "ERROR",
    }
}

pub fn format_status(status: &StatusDisplay) -> String {
    format!(
        "[{}] {:<7} {}",
        chrono::Local::now().format("%H:%M:%S"),
        severity_label(status.severity),
        status.message
    )
}

/// Prints every status and log change until all publishers are dropped.
pub fn spawn(
    status: watch::Receiver<StatusDisplay>,
    logs: watch::Receiver<LogBuffer>,
    control: Option<(String, watch::Receiver<ControlState>)>,
) -> JoinHandle<()> {
    let status = WatchStream::from_changes(status).map(RenderEvent::Status);
    let logs = WatchStream::from_changes(logs).map(RenderEvent::Logs);
    let control = match control {
        Some((name, rx)) => WatchStream::from_changes(rx)
            .map(move |state| RenderEvent::Control(name.clone(), state))
            .boxed(),
        None => stream::empty().boxed(),
    };
    let mut events = stream::select(stream::select(status, logs), control).boxed();

    tokio::spawn(async move {
        let mut out = io::stdout();
        while let Some(event) = events.next().await {
            let written = match event {
                RenderEvent::Status(status) if status.message.is_empty() => Ok(()),
                RenderEvent::Status(status) => writeln!(out, "{}", format_status(&status)),
                RenderEvent::Logs(LogBuffer::Blank) => Ok(()),
                RenderEvent::Logs(LogBuffer::Entries(text)) => {
                    writeln!(out, "---- recent logs ----\n{}", text.trim_end())
                }
                RenderEvent::Logs(placeholder) => writeln!(out, "logs: {placeholder}"),
                RenderEvent::Control(name, state) => {
                    tracing::debug!(control = %name, ?state, "control state changed");
                    Ok(())
                }
            };
            if let Err(err) = written.and_then(|()| out.flush()) {
                tracing::warn!(error = %err, "failed to write to stdout");
                break;
            }
        }
    })
}
