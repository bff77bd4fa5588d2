//! Email service for transactional mail.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates. Every send
//! is best-effort from the caller's point of view: a failed welcome or
//! confirmation email never fails the request that triggered it.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

/// One purchased line in the order confirmation email.
pub struct OrderEmailLine {
    pub name: String,
    pub quantity: i32,
    /// Pre-formatted naira amount.
    pub price: String,
}

/// HTML template for the password reset email.
#[derive(Template)]
#[template(path = "email/password_reset.html")]
struct PasswordResetEmailHtml<'a> {
    name: &'a str,
    reset_url: &'a str,
}

/// Plain text template for the password reset email.
#[derive(Template)]
#[template(path = "email/password_reset.txt")]
struct PasswordResetEmailText<'a> {
    name: &'a str,
    reset_url: &'a str,
}

/// HTML template for the welcome email.
#[derive(Template)]
#[template(path = "email/welcome.html")]
struct WelcomeEmailHtml<'a> {
    name: &'a str,
    shop_url: &'a str,
}

/// Plain text template for the welcome email.
#[derive(Template)]
#[template(path = "email/welcome.txt")]
struct WelcomeEmailText<'a> {
    name: &'a str,
    shop_url: &'a str,
}

/// HTML template for the order confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.html")]
struct OrderConfirmationEmailHtml<'a> {
    name: &'a str,
    order_number: &'a str,
    total: &'a str,
    items: &'a [OrderEmailLine],
    orders_url: &'a str,
}

/// Plain text template for the order confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.txt")]
struct OrderConfirmationEmailText<'a> {
    name: &'a str,
    order_number: &'a str,
    total: &'a str,
    items: &'a [OrderEmailLine],
    orders_url: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send a password reset link.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to send or a template fails to render.
    pub async fn send_password_reset(
        &self,
        to: &str,
        name: &str,
        reset_url: &str,
    ) -> Result<(), EmailError> {
        let html = PasswordResetEmailHtml { name, reset_url }.render()?;
        let text = PasswordResetEmailText { name, reset_url }.render()?;

        self.send_multipart_email(to, "Reset Your Password - Suya House Spices", &text, &html)
            .await
    }

    /// Send a welcome email after signup.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to send or a template fails to render.
    pub async fn send_welcome(
        &self,
        to: &str,
        name: &str,
        shop_url: &str,
    ) -> Result<(), EmailError> {
        let html = WelcomeEmailHtml { name, shop_url }.render()?;
        let text = WelcomeEmailText { name, shop_url }.render()?;

        self.send_multipart_email(to, "Welcome to Suya House Spices!", &text, &html)
            .await
    }

    /// Send an order confirmation.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to send or a template fails to render.
    pub async fn send_order_confirmation(
        &self,
        to: &str,
        name: &str,
        order_number: &str,
        total: &str,
        items: &[OrderEmailLine],
        orders_url: &str,
    ) -> Result<(), EmailError> {
        let html = OrderConfirmationEmailHtml {
            name,
            order_number,
            total,
            items,
            orders_url,
        }
        .render()?;
        let text = OrderConfirmationEmailText {
            name,
            order_number,
            total,
            items,
            orders_url,
        }
        .render()?;

        self.send_multipart_email(
            to,
            &format!("Order Confirmation #{order_number} - Suya House Spices"),
            &text,
            &html,
        )
        .await
    }

    /// Send a multipart (text + HTML) email.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text: &str,
        html: &str,
    ) -> Result<(), EmailError> {
        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html.to_string()),
                    ),
            )?;

        self.mailer.send(message).await?;
        tracing::info!(to, subject, "email sent");

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_password_reset_templates_render() {
        let html = PasswordResetEmailHtml {
            name: "Adaeze",
            reset_url: "https://suyahouse.shop/auth/reset-password?token=abc",
        }
        .render()
        .unwrap();
        assert!(html.contains("Adaeze"));
        assert!(html.contains("reset-password?token=abc"));

        let text = PasswordResetEmailText {
            name: "Adaeze",
            reset_url: "https://suyahouse.shop/auth/reset-password?token=abc",
        }
        .render()
        .unwrap();
        assert!(text.contains("https://suyahouse.shop/auth/reset-password?token=abc"));
    }

    #[test]
    fn test_order_confirmation_lists_items() {
        let items = vec![
            OrderEmailLine {
                name: "Multi-Purpose Spice Mix".to_string(),
                quantity: 2,
                price: "₦15,000".to_string(),
            },
            OrderEmailLine {
                name: "Men's Power Mix".to_string(),
                quantity: 1,
                price: "₦15,000".to_string(),
            },
        ];

        let html = OrderConfirmationEmailHtml {
            name: "Adaeze",
            order_number: "SHS-ABCDE23456",
            total: "₦45,000",
            items: &items,
            orders_url: "https://suyahouse.shop/orders",
        }
        .render()
        .unwrap();

        assert!(html.contains("SHS-ABCDE23456"));
        assert!(html.contains("Multi-Purpose Spice Mix"));
        assert!(html.contains("₦45,000"));
    }
}
