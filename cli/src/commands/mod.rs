//! CLI Commands

pub mod auth;
pub mod categories;
pub mod config;
pub mod dashboard;
pub mod tickets;
pub mod users;

use std::future::Future;

use anyhow::{anyhow, Result};
use helpdesk_domain::permissions::{self, Screen};
use helpdesk_domain::{Failure, Locale, User};
use helpdesk_sdk::{Client, ClientConfig, Session, SessionStore, ViewScope};

use crate::config::{session_path, Config, Settings};
use crate::output::OutputFormat;
use crate::{Cli, Commands};

/// Everything a command needs: the session, the active view scope and the
/// resolved settings.
pub struct Context {
    pub session: Session,
    pub scope: ViewScope,
    pub format: OutputFormat,
    pub locale: Locale,
    pub page_size: u32,
}

impl Context {
    fn new(settings: &Settings, profile: Option<&str>) -> Result<Self> {
        let client = Client::with_config(ClientConfig {
            base_url: settings.api_url.clone(),
            ..Default::default()
        })?;
        let store = SessionStore::new(session_path(profile)?);
        let scope = ViewScope::new();

        let canceller = scope.canceller();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("interrupt received");
                canceller.cancel();
            }
        });

        Ok(Self {
            session: Session::with_store(client, store),
            scope,
            format: settings.format,
            locale: settings.locale,
            page_size: settings.page_size,
        })
    }

    /// Run a request in the active scope and turn failures into the banner
    /// text for `failure`.
    pub async fn call<T, F>(&self, failure: Failure, request: F) -> Result<T>
    where
        F: Future<Output = helpdesk_sdk::Result<T>>,
    {
        self.scope.run(request).await.map_err(|e| self.fail(e, failure))
    }

    pub fn fail(&self, err: helpdesk_sdk::Error, failure: Failure) -> anyhow::Error {
        let message = err.user_message(failure, self.locale);
        anyhow::Error::new(err).context(message)
    }

    /// Resume the stored session; commands below this point need a user.
    pub async fn viewer(&self) -> Result<User> {
        if let Some(user) = self.session.current_user() {
            return Ok(user);
        }
        let resumed = self
            .scope
            .run(self.session.resume())
            .await
            .map_err(|e| self.fail(e, Failure::Login))?;
        resumed.ok_or_else(|| anyhow!("Not logged in. Run `helpdesk login --email <EMAIL>` first."))
    }

    pub async fn require_screen(&self, screen: Screen) -> Result<User> {
        let viewer = self.viewer().await?;
        if !permissions::can_open(&viewer, screen) {
            return Err(anyhow::Error::new(helpdesk_sdk::Error::NotPermitted(helpdesk_domain::Action::View))
                .context(match self.locale {
                    Locale::PtBr => "Acesso restrito a administradores.",
                    Locale::En => "Administrators only.",
                }));
        }
        Ok(viewer)
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let Cli {
        api_url,
        format,
        profile,
        locale,
        command,
        ..
    } = cli;
    let profile = profile.as_deref();
    let command = match command {
        Commands::Config { action } => return config::handle(action, profile),
        other => other,
    };

    let file = Config::load(profile)?;
    let settings = Settings::resolve(&file, api_url, format, locale.as_deref())?;
    tracing::debug!(api_url = %settings.api_url, ?profile, "resolved settings");
    let ctx = Context::new(&settings, profile)?;

    match command {
        Commands::Login { email, password } => auth::login(&ctx, &email, password).await,
        Commands::Register {
            name,
            email,
            phone,
            password,
            confirm,
        } => auth::register(&ctx, &name, &email, &phone, &password, &confirm).await,
        Commands::Logout => auth::logout(&ctx).await,
        Commands::Whoami => auth::whoami(&ctx).await,
        Commands::ForgotPassword { email } => auth::forgot_password(&ctx, &email).await,
        Commands::ResetPassword {
            user_id,
            token,
            password,
        } => auth::reset_password(&ctx, user_id, token, password).await,
        Commands::Dashboard => dashboard::show(&ctx).await,
        Commands::Tickets { action } => tickets::handle(action, &ctx).await,
        Commands::Categories { action } => categories::handle_categories(action, &ctx).await,
        Commands::Subcategories { action } => categories::handle_subcategories(action, &ctx).await,
        Commands::Users { action } => users::handle(action, &ctx).await,
        Commands::Config { .. } => Ok(()),
    }
}

pub fn is_cancelled(err: &anyhow::Error) -> bool {
    err.downcast_ref::<helpdesk_sdk::Error>()
        .is_some_and(helpdesk_sdk::Error::is_cancelled)
}
