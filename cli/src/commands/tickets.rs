//! Ticket commands

use anyhow::Result;
use chrono::{DateTime, Utc};
use helpdesk_domain::labels::{priority_label, status_label, uncategorized};
use helpdesk_domain::permissions::{self, Action};
use helpdesk_domain::sla::{self, Deadlines};
use helpdesk_domain::visibility::{self, TicketView};
use helpdesk_domain::{
    Failure, HistoryQuery, Locale, NewComment, StatusUpdate, Ticket, TicketDraft, TicketForm, Transfer, User,
};
use helpdesk_sdk::ListParams;
use serde::Serialize;
use tabled::Tabled;

use super::Context;
use crate::{output, TicketCommands};

#[derive(Tabled)]
pub struct TicketRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Priority")]
    pub priority: String,
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Assignee")]
    pub assignee: String,
    #[tabled(rename = "Created")]
    pub created: String,
    #[tabled(rename = "Resolve by")]
    pub resolve_by: String,
}

impl TicketRow {
    pub fn new(ticket: &Ticket, locale: Locale, now: DateTime<Utc>) -> Self {
        let due = sla::deadlines(ticket);
        Self {
            id: ticket.id.to_string(),
            title: ticket.title.clone(),
            status: output::status(ticket.status, locale),
            priority: output::priority(ticket.priority, locale),
            category: category_path(ticket, locale),
            assignee: output::or_dash(ticket.assigned_to.as_deref()),
            created: output::timestamp(ticket.created_at),
            resolve_by: output::deadline(due.resolution, sla::is_overdue(ticket, due.resolution, now)),
        }
    }
}

pub fn rows(tickets: &[&Ticket], locale: Locale) -> Vec<TicketRow> {
    let now = Utc::now();
    tickets.iter().map(|t| TicketRow::new(t, locale, now)).collect()
}

fn category_path(ticket: &Ticket, locale: Locale) -> String {
    match (ticket.category_name.as_deref(), ticket.subcategory_name.as_deref()) {
        (Some(cat), Some(sub)) => format!("{} / {}", cat, sub),
        (Some(cat), None) => cat.to_string(),
        _ => uncategorized(locale).to_string(),
    }
}

/// Ticket plus what the viewer may do with it, for JSON/YAML output.
#[derive(Serialize)]
struct TicketDetail<'a> {
    #[serde(flatten)]
    ticket: &'a Ticket,
    deadlines: Deadlines,
    permitted_actions: Vec<Action>,
}

pub async fn handle(action: TicketCommands, ctx: &Context) -> Result<()> {
    let viewer = ctx.viewer().await?;
    match action {
        TicketCommands::List => {
            let tickets = active_tickets(ctx, &viewer).await?;
            let visible = visibility::visible_tickets(&viewer, TicketView::Active, &tickets);
            ctx.format.print(&visible, || rows(&visible, ctx.locale))?;
        }
        TicketCommands::History {
            search,
            status,
            priority,
        } => {
            let tickets = ctx
                .call(
                    Failure::LoadHistory,
                    ctx.session.client().tickets().list_all(&viewer, ctx.page_size),
                )
                .await?;
            let query = HistoryQuery {
                search,
                status,
                priority,
            };
            let hits = query.apply(&tickets);
            ctx.format.print(&hits, || rows(&hits, ctx.locale))?;
        }
        TicketCommands::Show { id } => {
            let ticket = load(ctx, &viewer, &id).await?;
            show(ctx, &viewer, &ticket)?;
        }
        TicketCommands::Create {
            title,
            description,
            category,
            subcategory,
            priority,
        } => {
            let draft = TicketDraft {
                title: Some(title),
                description: Some(description),
                category_id: Some(category),
                subcategory_id: Some(subcategory),
                priority: Some(priority),
            };
            let catalog = ctx
                .call(
                    Failure::LoadCategories,
                    ctx.session.client().categories().list_all(ctx.page_size),
                )
                .await?;
            let form = TicketForm::validate(&draft, &catalog).map_err(|e| ctx.fail(e.into(), Failure::CreateTicket))?;
            let created = ctx
                .call(Failure::CreateTicket, ctx.session.client().tickets().create(&form))
                .await?;
            match created {
                Some(ticket) => output::success(&format!("Created ticket {}", ticket.id)),
                None => output::success(&format!("Created ticket \"{}\"", form.title())),
            }
        }
        TicketCommands::Edit {
            id,
            title,
            description,
            category,
            subcategory,
            priority,
        } => {
            let ticket = load(ctx, &viewer, &id).await?;
            if !permissions::can_edit(&viewer, &ticket) {
                return Err(ctx.fail(helpdesk_sdk::Error::NotPermitted(Action::Edit), Failure::EditTicket));
            }
            let catalog = ctx
                .call(
                    Failure::LoadCategories,
                    ctx.session.client().categories().list_all(ctx.page_size),
                )
                .await?;
            let draft = TicketDraft::from_ticket(&ticket).apply(TicketDraft {
                title,
                description,
                category_id: category,
                subcategory_id: subcategory,
                priority,
            });
            let form = TicketForm::validate(&draft, &catalog).map_err(|e| ctx.fail(e.into(), Failure::EditTicket))?;
            ctx.call(
                Failure::EditTicket,
                ctx.session.client().tickets().edit(&viewer, &ticket, &form),
            )
            .await?;
            output::success(&format!("Updated ticket {}", ticket.id));
        }
        TicketCommands::Comment { id, content } => {
            let comment = NewComment::new(&content).map_err(|e| ctx.fail(e.into(), Failure::AddComment))?;
            let ticket = load(ctx, &viewer, &id).await?;
            ctx.call(
                Failure::AddComment,
                ctx.session.client().tickets().comment(&viewer, &ticket, &comment),
            )
            .await?;
            output::success(&format!("Comment added to ticket {}", ticket.id));
        }
        TicketCommands::Status {
            id,
            to,
            solution,
            reason,
        } => {
            let update = StatusUpdate::new(to, solution.as_deref(), reason.as_deref())
                .map_err(|e| ctx.fail(e.into(), Failure::UpdateTicket))?;
            let ticket = load(ctx, &viewer, &id).await?;
            ctx.call(
                Failure::UpdateTicket,
                ctx.session.client().tickets().update_status(&viewer, &ticket, &update),
            )
            .await?;
            output::success(&format!(
                "Ticket {} is now {}",
                ticket.id,
                status_label(update.status(), ctx.locale)
            ));
        }
        TicketCommands::Transfer { id, to } => {
            let transfer = Transfer::new(to.as_deref()).map_err(|e| ctx.fail(e.into(), Failure::Transfer))?;
            let ticket = load(ctx, &viewer, &id).await?;
            ctx.call(
                Failure::Transfer,
                ctx.session.client().tickets().transfer(&viewer, &ticket, &transfer),
            )
            .await?;
            output::success(&format!("Ticket {} transferred to {}", ticket.id, transfer.target()));
        }
        TicketCommands::Attendants => {
            let attendants = ctx
                .call(Failure::LoadAttendants, ctx.session.client().users().attendants())
                .await?;
            ctx.format.print(&attendants, || super::users::rows(attendants.iter(), ctx.locale))?;
        }
    }
    Ok(())
}

/// First page of the viewer's listing, as the dashboard shows it.
pub async fn active_tickets(ctx: &Context, viewer: &User) -> Result<Vec<Ticket>> {
    let page = ctx
        .call(
            Failure::LoadTickets,
            ctx.session
                .client()
                .tickets()
                .list(viewer, ListParams::page(1, ctx.page_size)),
        )
        .await?;
    if page.total_pages > 1 {
        tracing::info!(total_pages = page.total_pages, "showing the first page only");
    }
    Ok(page.data)
}

async fn load(ctx: &Context, viewer: &User, id: &helpdesk_domain::Id) -> Result<Ticket> {
    ctx.call(Failure::LoadTicket, ctx.session.client().tickets().get(viewer, id))
        .await
}

fn show(ctx: &Context, viewer: &User, ticket: &Ticket) -> Result<()> {
    let mut allowed: Vec<Action> = permissions::permitted_actions(viewer, ticket).into_iter().collect();
    allowed.sort_by_key(|a| Action::ALL.iter().position(|x| x == a));
    let deadlines = sla::deadlines(ticket);

    if !ctx.format.is_table() {
        let detail = TicketDetail {
            ticket,
            deadlines,
            permitted_actions: allowed,
        };
        return ctx.format.print(&detail, Vec::<TicketRow>::new);
    }

    let now = Utc::now();
    let locale = ctx.locale;
    output::heading(&format!("#{} {}", ticket.id, ticket.title));
    output::field("Status", &output::status(ticket.status, locale));
    output::field("Priority", priority_label(ticket.priority, locale));
    output::field("Category", &category_path(ticket, locale));
    output::field("Assignee", &output::or_dash(ticket.assigned_to.as_deref()));
    output::field("Created", &output::timestamp(ticket.created_at));
    output::field(
        "Respond by",
        &output::deadline(deadlines.response, sla::is_overdue(ticket, deadlines.response, now)),
    );
    output::field(
        "Resolve by",
        &output::deadline(deadlines.resolution, sla::is_overdue(ticket, deadlines.resolution, now)),
    );
    if ticket.closed_at.is_some() {
        output::field("Closed", &output::timestamp(ticket.closed_at));
    }
    if let Some(solution) = ticket.solution_resolved.as_deref() {
        output::field("Solution", solution);
    }
    if let Some(reason) = ticket.reason_canceled.as_deref() {
        output::field("Cancel reason", reason);
    }
    println!();
    println!("{}", ticket.description);

    if !ticket.comments.is_empty() {
        println!();
        output::heading("Comments");
        for comment in &ticket.comments {
            println!(
                "  [{}] {}: {}",
                output::timestamp(comment.created_at),
                comment.user_id.as_ref().map_or_else(|| "-".to_string(), |id| id.to_string()),
                comment.content
            );
        }
    }

    println!();
    let names: Vec<String> = allowed.iter().map(|a| format!("{:?}", a)).collect();
    output::field("Actions", &names.join(", "));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_domain::TicketStatus;

    fn ticket() -> Ticket {
        serde_json::from_value(serde_json::json!({
            "id": 5,
            "title": "Sem rede",
            "status": 2,
            "priority": 3,
            "categoryName": "Rede",
            "createdAt": "2024-10-01T08:00:00Z",
            "slaResolutionTime": "04:00:00"
        }))
        .unwrap()
    }

    #[test]
    fn test_row_flags_overdue_resolution() {
        colored::control::set_override(false);
        let t = ticket();
        let now = "2024-10-01T13:00:00Z".parse().unwrap();
        let row = TicketRow::new(&t, Locale::PtBr, now);
        assert_eq!(row.id, "5");
        assert_eq!(row.category, "Rede");
        assert_eq!(row.status, "Em andamento");
        assert!(row.resolve_by.ends_with("(late)"));
        assert_eq!(row.assignee, "-");
    }

    #[test]
    fn test_category_fallback() {
        let mut t = ticket();
        t.category_name = None;
        assert_eq!(category_path(&t, Locale::PtBr), "Sem categoria");
        t.status = TicketStatus::Resolved;
        let now = "2024-10-02T00:00:00Z".parse().unwrap();
        assert!(!TicketRow::new(&t, Locale::En, now).resolve_by.contains("late"));
    }
}
