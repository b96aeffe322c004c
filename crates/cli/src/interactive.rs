//! Terminal drivers for the registration and password-reset flows.
//!
//! Both wait on two things at once: the next line typed by the user and the
//! next second of resend cooldown. Ctrl-C cancels the controller's token,
//! which abandons any request in flight.

use std::io::Write;
use std::sync::Arc;

use anyhow::{bail, Context as _};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio_util::sync::CancellationToken;
use wellnest_client::flows::{FlowError, PasswordResetController, RegistrationController};
use wellnest_core::models::auth::RegistrationRole;
use wellnest_core::password_reset::ResetStep;

use crate::cli::RegisterArgs;
use crate::commands::Context;

const OTP_HELP: &str =
    "Enter the 6-digit code, or type `resend` for a new one once the timer runs out.";

/// Line-oriented reader, over standard input unless built from another
/// reader.
pub struct Prompt<R = BufReader<Stdin>> {
    lines: Lines<R>,
}

impl Prompt {
    pub fn new() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> Prompt<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Print `label` and wait for one line.
    pub async fn ask(&mut self, label: &str) -> anyhow::Result<String> {
        print!("{label}");
        std::io::stdout().flush()?;
        self.next_line().await
    }

    /// Like [`ask`](Self::ask), but gives up when `cancel` fires.
    pub async fn ask_or_cancel(
        &mut self,
        label: &str,
        cancel: &CancellationToken,
    ) -> anyhow::Result<String> {
        tokio::select! {
            _ = cancel.cancelled() => bail!("Cancelled"),
            line = self.ask(label) => line,
        }
    }

    async fn next_line(&mut self) -> anyhow::Result<String> {
        match self.lines.next_line().await? {
            Some(line) => Ok(line.trim().to_string()),
            None => bail!("Input closed"),
        }
    }
}

fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });
}

pub async fn register(ctx: &Context, args: RegisterArgs, prompt: &mut Prompt) -> anyhow::Result<()> {
    let mut controller =
        RegistrationController::new(Arc::clone(&ctx.store), ctx.config.resend_cooldown_secs);
    let cancel = controller.cancellation_token();
    cancel_on_ctrl_c(cancel.clone());

    let password = prompt.ask_or_cancel("Password: ", &cancel).await?;
    let confirm = prompt.ask_or_cancel("Confirm password: ", &cancel).await?;
    {
        let details = controller.flow_mut().details_mut();
        details.full_name = args.full_name;
        details.username = args.username;
        details.email = args.email;
        details.password = password;
        details.confirm_password = confirm;
        details.role = if args.trainer {
            RegistrationRole::Trainer
        } else {
            RegistrationRole::User
        };
    }

    let sent = controller.submit_details().await?;
    println!("{}", sent.message);
    println!("{OTP_HELP}");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => bail!("Cancelled"),
            remaining = controller.next_tick() => {
                if remaining == 0 {
                    println!("You can request a new code now (type `resend`).");
                }
            }
            line = prompt.next_line() => {
                let line = line?;
                if line.eq_ignore_ascii_case("resend") {
                    match controller.resend().await {
                        Ok(message) => println!("{message}"),
                        Err(e) => eprintln!("{e}"),
                    }
                    continue;
                }

                controller.flow_mut().otp_mut().clear();
                controller.flow_mut().otp_mut().paste(&line);
                match controller.verify().await {
                    Ok(session) => {
                        println!(
                            "Welcome, {}! Signed in as {} ({}).",
                            session.full_name, session.username, session.role
                        );
                        return Ok(());
                    }
                    Err(FlowError::Cancelled) => bail!("Cancelled"),
                    Err(e) => eprintln!("{e}"),
                }
            }
        }
    }
}

pub async fn forgot_password(ctx: &Context, email: String, prompt: &mut Prompt) -> anyhow::Result<()> {
    let mut controller = PasswordResetController::new(ctx.store.api(), ctx.config.resend_cooldown_secs);
    let cancel = controller.cancellation_token();
    cancel_on_ctrl_c(cancel.clone());

    controller.flow_mut().set_email(email);
    let message = controller.send_code().await?;
    println!("{message}");
    println!("{OTP_HELP}");

    while controller.flow().step() == ResetStep::OtpEntry {
        tokio::select! {
            _ = cancel.cancelled() => bail!("Cancelled"),
            remaining = controller.next_tick() => {
                if remaining == 0 {
                    println!("You can request a new code now (type `resend`).");
                }
            }
            line = prompt.next_line() => {
                let line = line?;
                if line.eq_ignore_ascii_case("resend") {
                    match controller.resend().await {
                        Ok(message) => println!("{message}"),
                        Err(e) => eprintln!("{e}"),
                    }
                    continue;
                }
                controller.flow_mut().otp_mut().clear();
                controller.flow_mut().otp_mut().paste(&line);
                if let Err(e) = controller.confirm_otp() {
                    eprintln!("{e}");
                }
            }
        }
    }

    loop {
        let password = prompt.ask_or_cancel("New password: ", &cancel).await?;
        let confirm = prompt
            .ask_or_cancel("Confirm new password: ", &cancel)
            .await?;
        controller.flow_mut().set_passwords(password, confirm);
        match controller.reset_password().await {
            Ok(message) => {
                println!("{message}");
                println!("You can now log in with your new password.");
                return Ok(());
            }
            Err(FlowError::Invalid(e)) => eprintln!("{}", e.message()),
            Err(e) => return Err(e).context("Password reset failed"),
        }
    }
}
