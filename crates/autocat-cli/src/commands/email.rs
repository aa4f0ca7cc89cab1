//! Email delivery command
//!
//! Mail delivery is an external collaborator: the report is rendered here
//! and piped as a MIME message into a sendmail-compatible command
//! (`AUTOCAT_SENDMAIL`, default `sendmail`). SMTP credentials, relaying and
//! the rest of mail transport stay outside this program.

use std::io::Write as _;
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};
use chrono::Local;

use autocat_core::{render, BudgetClient, Period, RenderFormat};

use super::report::build_report;

const DEFAULT_SENDMAIL: &str = "sendmail";

pub async fn cmd_email(
    client: &impl BudgetClient,
    to: Option<&str>,
    period: &str,
    days_back: i64,
) -> Result<()> {
    let recipient = match to {
        Some(addr) => addr.to_string(),
        None => std::env::var("AUTOCAT_MAIL_TO")
            .context("No recipient: pass --to or set AUTOCAT_MAIL_TO")?,
    };

    let period: Period = period.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let (buckets, summary) = build_report(client, period, days_back).await?;
    let html = render(
        &buckets,
        &summary,
        None,
        Local::now().naive_local(),
        RenderFormat::Html,
    );

    let subject = format!("Reporte financiero {} - {}", summary.since, summary.until);
    let message = build_message(&recipient, &subject, &html);
    send_message(&recipient, &message)?;

    println!("✅ Reporte enviado a {}", recipient);
    Ok(())
}

/// Compose a minimal single-part MIME message with an HTML body
pub fn build_message(to: &str, subject: &str, html_body: &str) -> String {
    format!(
        "To: {to}\r\nSubject: {subject}\r\nMIME-Version: 1.0\r\nContent-Type: text/html; charset=UTF-8\r\n\r\n{html_body}",
    )
}

/// Pipe the message into the configured sendmail-compatible command
fn send_message(recipient: &str, message: &str) -> Result<()> {
    let sendmail =
        std::env::var("AUTOCAT_SENDMAIL").unwrap_or_else(|_| DEFAULT_SENDMAIL.to_string());

    let mut child = Command::new(&sendmail)
        .arg(recipient)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to start mail command \"{}\"", sendmail))?;

    child
        .stdin
        .take()
        .context("Mail command has no stdin")?
        .write_all(message.as_bytes())
        .context("Failed to write message to the mail command")?;

    let status = child.wait().context("Mail command did not finish")?;
    if !status.success() {
        bail!("Mail command \"{}\" exited with {}", sendmail, status);
    }
    Ok(())
}
