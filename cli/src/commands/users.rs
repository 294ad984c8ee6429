//! Users commands

use anyhow::Result;
use chrono::{DateTime, Utc};
use helpdesk_domain::labels::role_label;
use helpdesk_domain::permissions::Screen;
use helpdesk_domain::users::{filter_by_role, paginate, DEFAULT_LOCKOUT_MINUTES};
use helpdesk_domain::{BlockRequest, Failure, Locale, RoleAction, RoleBoard, User};
use tabled::Tabled;

use super::{dashboard, Context};
use crate::{output, UserCommands};

#[derive(Tabled)]
pub struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Roles")]
    roles: String,
    #[tabled(rename = "Blocked until")]
    blocked: String,
}

impl UserRow {
    fn new(user: &User, locale: Locale, now: DateTime<Utc>) -> Self {
        Self {
            id: user.id.as_ref().map_or_else(|| "-".to_string(), |id| id.to_string()),
            email: user.email.clone(),
            name: output::or_dash(Some(user.name.as_str())),
            roles: user
                .roles
                .iter()
                .map(|r| role_label(r, locale))
                .collect::<Vec<_>>()
                .join(", "),
            blocked: if user.is_blocked_at(now) {
                output::timestamp(user.lockout_end)
            } else {
                String::new()
            },
        }
    }
}

pub fn rows<'a>(users: impl IntoIterator<Item = &'a User>, locale: Locale) -> Vec<UserRow> {
    let now = Utc::now();
    users.into_iter().map(|u| UserRow::new(u, locale, now)).collect()
}

pub async fn handle(action: UserCommands, ctx: &Context) -> Result<()> {
    ctx.require_screen(Screen::Users).await?;
    let service = ctx.session.client().users();

    match action {
        UserCommands::List { role, page, per_page } => {
            let users = ctx.call(Failure::LoadUsers, service.list(role.as_ref())).await?;
            let filtered = filter_by_role(&users, role.as_ref());
            let per_page = per_page.unwrap_or(ctx.page_size as usize);
            let shown = paginate(&filtered, page.saturating_sub(1), per_page);
            ctx.format.print(shown, || rows(shown.iter().copied(), ctx.locale))?;
            if ctx.format.is_table() && per_page > 0 {
                let pages = filtered.len().div_ceil(per_page).max(1);
                println!("page {} of {} ({} users)", page.max(1), pages, filtered.len());
            }
        }
        UserCommands::ToggleRole { email, role } => {
            let users = ctx.call(Failure::LoadUsers, service.list(None)).await?;
            let mut board = RoleBoard::from_users(&users);
            let label = role_label(&role, ctx.locale).to_string();
            match ctx.scope.run(service.toggle_role(&mut board, &email, role)).await {
                Ok(change) => match change.action {
                    RoleAction::Add => output::success(&format!("{} is now {}", email, label)),
                    RoleAction::Remove => output::success(&format!("{} is no longer {}", email, label)),
                },
                Err(err) if err.is_role_removal_forbidden() => {
                    // The dashboard is reloaded in place of the users screen.
                    output::error(&err.user_message(Failure::ChangeRole, ctx.locale));
                    return dashboard::show(ctx).await;
                }
                Err(err) => return Err(ctx.fail(err, Failure::ChangeRole)),
            }
        }
        UserCommands::Block { id, minutes, permanent } => {
            let request = if permanent {
                BlockRequest::permanent(id)
            } else {
                BlockRequest::for_minutes(id, minutes.unwrap_or(DEFAULT_LOCKOUT_MINUTES))
            };
            ctx.call(Failure::BlockUser, service.block(&request)).await?;
            if request.is_permanent {
                output::success(&format!("Blocked {} permanently", request.user_id));
            } else {
                output::success(&format!(
                    "Blocked {} for {} minute(s)",
                    request.user_id, request.lockout_duration_minutes
                ));
            }
        }
        UserCommands::Unblock { id } => {
            ctx.call(Failure::UnblockUser, service.unblock(&id)).await?;
            output::success(&format!("Unblocked {}", id));
        }
    }
    Ok(())
}
