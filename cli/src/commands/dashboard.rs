//! Dashboard command

use anyhow::Result;
use chrono::Utc;
use helpdesk_domain::labels::{greeting, priority_label, status_label};
use helpdesk_domain::visibility::{self, TicketView};
use helpdesk_domain::{Priority, Summary, Ticket, TicketStatus};
use serde::Serialize;
use tabled::Tabled;

use super::tickets::{self, TicketRow};
use super::Context;
use crate::output;

#[derive(Serialize)]
struct DashboardView<'a> {
    summary: &'a Summary,
    tickets: &'a [&'a Ticket],
}

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "")]
    label: String,
    #[tabled(rename = "Tickets")]
    count: usize,
}

fn summary_rows(summary: &Summary, ctx: &Context) -> Vec<CountRow> {
    let mut rows: Vec<CountRow> = TicketStatus::ALL
        .iter()
        .map(|&status| CountRow {
            label: status_label(status, ctx.locale).to_string(),
            count: summary.count(status),
        })
        .filter(|row| row.count > 0)
        .collect();
    for priority in [Priority::High, Priority::Medium, Priority::Low] {
        if let Some(&count) = summary.by_priority.get(&priority) {
            rows.push(CountRow {
                label: priority_label(priority, ctx.locale).to_string(),
                count,
            });
        }
    }
    rows.push(CountRow {
        label: "Response overdue".into(),
        count: summary.response_overdue,
    });
    rows.push(CountRow {
        label: "Resolution overdue".into(),
        count: summary.resolution_overdue,
    });
    rows
}

/// Active tickets for the logged-in viewer, with counts and SLA flags.
pub async fn show(ctx: &Context) -> Result<()> {
    let viewer = ctx.viewer().await?;
    let tickets = tickets::active_tickets(ctx, &viewer).await?;
    let visible = visibility::visible_tickets(&viewer, TicketView::Active, &tickets);
    let summary = Summary::compute(&visible, Utc::now());

    if !ctx.format.is_table() {
        let view = DashboardView {
            summary: &summary,
            tickets: &visible,
        };
        return ctx.format.print(&view, Vec::<TicketRow>::new);
    }

    if let Some(line) = greeting(&viewer.primary_role(), ctx.locale) {
        output::heading(line);
    }
    println!("{} ticket(s)", summary.total);
    if summary.total > 0 {
        ctx.format.print(&summary, || summary_rows(&summary, ctx))?;
    }
    ctx.format.print(&visible, || tickets::rows(&visible, ctx.locale))
}
