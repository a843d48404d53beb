//! Outbound SMTP mail: account activation, password reset and team-member
//! invite messages, each carrying a one-time token as a UI deep link.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::auth::Role;
use crate::config;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
    ui_base_url: String,
}

static INSTANCE: OnceCell<Mailer> = OnceCell::new();

impl Mailer {
    pub fn instance() -> Result<&'static Mailer, MailerError> {
        INSTANCE.get_or_try_init(Mailer::from_config)
    }

    fn from_config() -> Result<Self, MailerError> {
        let mailer_config = &config::config().mailer;

        let credentials = Credentials::new(
            mailer_config.address.clone(),
            mailer_config.password.clone(),
        );
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(
            &mailer_config.smtp_host,
        )?
        .port(mailer_config.smtp_port)
        .credentials(credentials)
        .build();

        Ok(Self {
            transport,
            from: mailer_config.address.clone(),
            ui_base_url: mailer_config.ui_base_url.clone(),
        })
    }

    pub async fn send_activation_mail(&self, to: &str, token: &str) -> Result<(), MailerError> {
        let link = format!(
            "{}/admin/activate?activationToken={}",
            self.ui_base_url, token
        );
        self.send(
            to,
            "Projectify App | Activate Your Account",
            format!(r#"<a href="{}">Verify your email</a>"#, link),
        )
        .await
    }

    pub async fn send_password_reset_token(
        &self,
        to: &str,
        token: &str,
        role: Role,
    ) -> Result<(), MailerError> {
        let segment = match role {
            Role::Admin => "admin",
            Role::TeamMember => "team-member",
        };
        let link = format!(
            "{}/{}/reset-password?passwordResetToken={}",
            self.ui_base_url, segment, token
        );
        self.send(
            to,
            "Projectify App | Reset Password",
            format!(r#"<a href="{}">Reset Your Password</a>"#, link),
        )
        .await
    }

    pub async fn send_create_password_invite(
        &self,
        to: &str,
        token: &str,
    ) -> Result<(), MailerError> {
        let link = format!(
            "{}/team-member/create-password?inviteToken={}",
            self.ui_base_url, token
        );
        self.send(
            to,
            "Projectify App | Welcome to the team",
            format!(r#"<a href="{}">Click to create a password</a>"#, link),
        )
        .await
    }

    async fn send(&self, to: &str, subject: &str, html: String) -> Result<(), MailerError> {
        let message = Message::builder()
            .from(self.from.parse()?)
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)?;

        self.transport.send(message).await?;
        Ok(())
    }
}
