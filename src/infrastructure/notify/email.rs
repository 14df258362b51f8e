//! SMTP notifier: one HTML email per failed transaction

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::domain::exchange::FailureNotifier;
use crate::domain::transaction::Transaction;
use crate::shared::config::Config;
use crate::shared::errors::NotifyError;
use crate::shared::utils::escape_html;

const SENDER_NAME: &str = "Kraken DCA Bot";
const SUBJECT: &str = "Kraken DCA Bot - Transaction failure";

pub struct EmailNotifier {
    from: Mailbox,
    to: Mailbox,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address.parse().map_err(|e: lettre::address::AddressError| NotifyError::InvalidAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

impl EmailNotifier {
    pub fn new(config: &Config) -> Result<Self, NotifyError> {
        let smtp = &config.smtp;
        let from = parse_mailbox(&format!("{} <{}>", SENDER_NAME, smtp.from))?;
        let to = parse_mailbox(&config.notify)?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
            .map_err(|e| NotifyError::Connect(e.to_string()))?
            .port(smtp.port)
            .credentials(Credentials::new(smtp.user.clone(), smtp.password.clone()))
            .build();

        Ok(Self { from, to, mailer })
    }

    pub fn build_message(&self, transaction: &Transaction) -> Result<Message, NotifyError> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(SUBJECT)
            .header(ContentType::TEXT_HTML)
            .body(render_failure(transaction))
            .map_err(|e| NotifyError::Build(e.to_string()))
    }
}

/// HTML body of the failure email
pub fn render_failure(transaction: &Transaction) -> String {
    let failure = transaction
        .failure()
        .map(|e| e.to_string())
        .unwrap_or_else(|| "unknown error".to_string());

    format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: sans-serif;">
  <h2>Transaction failure</h2>
  <p>The DCA order on <strong>{pair}</strong> could not be completed.</p>
  <table>
    <tr><td>Pair</td><td>{pair}</td></tr>
    <tr><td>Date</td><td>{date}</td></tr>
    <tr><td>Error</td><td>{failure}</td></tr>
  </table>
</body>
</html>
"#,
        pair = escape_html(transaction.pair()),
        date = transaction.timestamp().format("%Y-%m-%d %H:%M:%S UTC"),
        failure = escape_html(&failure),
    )
}

#[async_trait]
impl FailureNotifier for EmailNotifier {
    async fn notify_failure(&self, transaction: &Transaction) -> Result<(), NotifyError> {
        let email = self.build_message(transaction)?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| NotifyError::Send(e.to_string()))?;

        info!("[{}] Failure email sent to {}", transaction.pair(), self.to);
        Ok(())
    }
}
