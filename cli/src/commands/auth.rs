//! Login, registration and account commands

use anyhow::{Context as _, Result};
use helpdesk_domain::labels::{self, greeting, role_label};
use helpdesk_domain::{Failure, Registration};
use helpdesk_sdk::ResetPassword;
use serde::Serialize;
use std::io::{BufRead, IsTerminal};
use tabled::Tabled;

use super::Context;
use crate::output;

#[derive(Serialize, Tabled)]
struct WhoamiRow {
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Roles")]
    roles: String,
}

/// Prompt text for the stdin password read. Input is echoed, so a terminal
/// user is pointed at `HELPDESK_PASSWORD` instead.
fn password_prompt(interactive: bool) -> &'static str {
    if interactive {
        "Password (typing is visible; set HELPDESK_PASSWORD to avoid): "
    } else {
        "Password: "
    }
}

fn read_password() -> Result<String> {
    eprint!("{}", password_prompt(std::io::stdin().is_terminal()));
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("reading password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn login(ctx: &Context, email: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };
    let user = ctx
        .call(Failure::Login, ctx.session.login(email, &password))
        .await?;

    output::success(&format!("Logged in as {}", user.email));
    if let Some(line) = greeting(&user.primary_role(), ctx.locale) {
        println!("{}", line);
    }
    Ok(())
}

/// Sign up, then log straight in.
pub async fn register(
    ctx: &Context,
    name: &str,
    email: &str,
    phone: &str,
    password: &str,
    confirm: &str,
) -> Result<()> {
    let registration = Registration::new(name, email, phone, password, confirm)
        .map_err(|e| ctx.fail(e.into(), Failure::Register))?;
    ctx.call(Failure::Register, ctx.session.client().identity().register(&registration))
        .await?;
    output::success(&format!("Registered {}", registration.email()));
    login(ctx, registration.email(), Some(password.to_string())).await
}

pub async fn logout(ctx: &Context) -> Result<()> {
    if ctx.viewer().await.is_err() {
        output::warn("No active session");
        return Ok(());
    }
    ctx.call(Failure::Logout, ctx.session.logout()).await?;
    output::success("Logged out");
    Ok(())
}

pub async fn whoami(ctx: &Context) -> Result<()> {
    let user = ctx.viewer().await?;
    let row = WhoamiRow {
        email: user.email.clone(),
        name: output::or_dash(Some(user.name.as_str())),
        roles: user
            .roles
            .iter()
            .map(|r| role_label(r, ctx.locale).to_string())
            .collect::<Vec<_>>()
            .join(", "),
    };
    ctx.format.print(&user, || vec![row])?;
    if ctx.format.is_table() {
        if let Some(line) = greeting(&user.primary_role(), ctx.locale) {
            println!("{}", line);
        }
        if user.is_blocked() {
            output::warn(&format!("Locked out until {}", output::timestamp(user.lockout_end)));
        }
    }
    Ok(())
}

pub async fn forgot_password(ctx: &Context, email: &str) -> Result<()> {
    ctx.call(
        Failure::ForgotPassword,
        ctx.session.client().identity().forgot_password(email),
    )
    .await?;
    output::success(labels::reset_link_sent(ctx.locale));
    Ok(())
}

pub async fn reset_password(ctx: &Context, user_id: String, token: String, new_password: String) -> Result<()> {
    let request = ResetPassword {
        user_id,
        token,
        new_password,
    };
    ctx.call(
        Failure::ResetPassword,
        ctx.session.client().identity().reset_password(&request),
    )
    .await?;
    output::success(labels::password_reset_done(ctx.locale));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_prompt_warns_about_echo() {
        assert!(password_prompt(true).contains("HELPDESK_PASSWORD"));
        assert_eq!(password_prompt(false), "Password: ");
    }
}
