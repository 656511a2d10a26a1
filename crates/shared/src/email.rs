//! Email delivery of purchase and sale receipts.
//!
//! Uses `lettre` for SMTP transport.

use std::fmt::Write as _;

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType, transport::smtp::authentication::Credentials,
};
use thiserror::Error;
use tracing::debug;

use crate::config::EmailConfig;
use crate::notify::{Notifier, NotifyError, PurchaseReceipt, ReceiptLine, SaleReceipt};

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

impl From<EmailError> for NotifyError {
    fn from(err: EmailError) -> Self {
        match err {
            EmailError::SendError(msg) => Self::Delivery(msg),
            other => Self::Build(other.to_string()),
        }
    }
}

/// Email service for sending receipts.
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Creates an SMTP transport.
    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
            .map_err(|e| EmailError::SendError(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build();

        Ok(transport)
    }

    /// Sends a plain-text email.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be built or sent.
    pub async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        let email = self.build_message(to_email, subject, body)?;

        let transport = self.create_transport()?;
        transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        Ok(())
    }

    fn build_message(&self, to_email: &str, subject: &str, body: &str) -> Result<Message, EmailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        Message::builder()
            .from(
                from.parse()
                    .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| EmailError::BuildError(e.to_string()))
    }
}

fn render_lines(body: &mut String, lines: &[ReceiptLine]) {
    for line in lines {
        let _ = writeln!(
            body,
            "  {} x{} (x{} und) @ {} = {}",
            line.producto, line.cantidad, line.factor_conversion, line.precio, line.subtotal
        );
    }
}

/// Renders the subject and body of a purchase receipt.
#[must_use]
pub fn render_purchase_receipt(receipt: &PurchaseReceipt) -> (String, String) {
    let subject = format!("Compra #{} registrada", receipt.nrodecompra);
    let mut body = format!(
        "Compra #{} del {}\nProveedor: {} ({})\n\n",
        receipt.nrodecompra, receipt.fechadecompra, receipt.proveedor, receipt.nitproveedor
    );
    render_lines(&mut body, &receipt.lines);
    let _ = write!(body, "\nTotal: {}\n", receipt.total);
    (subject, body)
}

/// Renders the subject and body of a sale receipt.
#[must_use]
pub fn render_sale_receipt(receipt: &SaleReceipt) -> (String, String) {
    let subject = format!("Su compra en Tendero ({})", receipt.estado);
    let mut body = format!(
        "Hola {},\n\nDetalle de su {} {}:\n\n",
        receipt.cliente,
        receipt.tipo.to_lowercase().replace('_', " "),
        receipt.id
    );
    render_lines(&mut body, &receipt.lines);
    let _ = write!(body, "\nTotal: {}\n\nGracias por su compra.\n", receipt.total);
    (subject, body)
}

#[async_trait]
impl Notifier for EmailService {
    async fn purchase_registered(&self, receipt: &PurchaseReceipt) -> Result<(), NotifyError> {
        let Some(recipient) = self.config.store_recipient.as_deref() else {
            debug!(purchase_id = %receipt.id, "No store recipient configured, skipping receipt");
            return Ok(());
        };
        if !self.config.enabled {
            return Ok(());
        }

        let (subject, body) = render_purchase_receipt(receipt);
        self.send_email(recipient, &subject, &body).await?;
        Ok(())
    }

    async fn sale_registered(&self, receipt: &SaleReceipt) -> Result<(), NotifyError> {
        let Some(recipient) = receipt.email_cliente.as_deref() else {
            debug!(sale_id = %receipt.id, "Client has no email, skipping receipt");
            return Ok(());
        };
        if !self.config.enabled {
            return Ok(());
        }

        let (subject, body) = render_sale_receipt(receipt);
        self.send_email(recipient, &subject, &body).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "email_tests.rs"]
mod tests;
