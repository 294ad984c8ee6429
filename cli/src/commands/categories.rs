//! Category and subcategory management (admin only)

use anyhow::Result;
use helpdesk_domain::domain::aggregates::category::parent_name;
use helpdesk_domain::permissions::Screen;
use helpdesk_domain::{Category, CategoryForm, Failure, Locale, Subcategory, SubcategoryForm};
use tabled::Tabled;

use super::Context;
use crate::{output, CategoryCommands, SubcategoryCommands};

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Subcategories")]
    subcategories: usize,
}

#[derive(Tabled)]
struct SubcategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Response SLA")]
    response: String,
    #[tabled(rename = "Resolution SLA")]
    resolution: String,
}

fn subcategory_rows(subs: &[Subcategory], categories: &[Category], locale: Locale) -> Vec<SubcategoryRow> {
    let sla = |value: Option<helpdesk_domain::SlaDuration>| value.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
    subs.iter()
        .map(|sub| SubcategoryRow {
            id: sub.id.to_string(),
            name: sub.name.clone(),
            category: parent_name(categories, sub)
                .unwrap_or(helpdesk_domain::labels::uncategorized(locale))
                .to_string(),
            response: sla(sub.sla_response_time),
            resolution: sla(sub.sla_resolution_time),
        })
        .collect()
}

pub async fn handle_categories(action: CategoryCommands, ctx: &Context) -> Result<()> {
    ctx.require_screen(Screen::Categories).await?;
    let service = ctx.session.client().categories();

    match action {
        CategoryCommands::List => {
            let categories = ctx
                .call(Failure::LoadCategories, service.list_all(ctx.page_size))
                .await?;
            ctx.format.print(&categories, || {
                categories
                    .iter()
                    .map(|cat| CategoryRow {
                        id: cat.id.to_string(),
                        name: cat.name.clone(),
                        subcategories: cat.subcategories.len(),
                    })
                    .collect()
            })?;
        }
        CategoryCommands::Create { name } => {
            let form = CategoryForm::new(&name).map_err(|e| ctx.fail(e.into(), Failure::SaveCategory))?;
            let created = ctx.call(Failure::SaveCategory, service.create(&form)).await?;
            match created {
                Some(cat) => output::success(&format!("Created category {} ({})", cat.name, cat.id)),
                None => output::success(&format!("Created category {}", name.trim())),
            }
        }
        CategoryCommands::Rename { id, name } => {
            let form = CategoryForm::new(&name).map_err(|e| ctx.fail(e.into(), Failure::SaveCategory))?;
            ctx.call(Failure::SaveCategory, service.rename(&id, &form)).await?;
            output::success(&format!("Renamed category {}", id));
        }
        CategoryCommands::Delete { id } => {
            ctx.call(Failure::DeleteCategory, service.delete(&id)).await?;
            output::success(&format!("Deleted category {}", id));
        }
    }
    Ok(())
}

pub async fn handle_subcategories(action: SubcategoryCommands, ctx: &Context) -> Result<()> {
    ctx.require_screen(Screen::Categories).await?;
    let client = ctx.session.client();
    let service = client.subcategories();

    match action {
        SubcategoryCommands::List => {
            let subs = ctx
                .call(Failure::LoadCategories, service.list_all(ctx.page_size))
                .await?;
            // Parent names come from the category listing.
            let categories = ctx
                .call(Failure::LoadCategories, client.categories().list_all(ctx.page_size))
                .await?;
            ctx.format
                .print(&subs, || subcategory_rows(&subs, &categories, ctx.locale))?;
        }
        SubcategoryCommands::Create {
            name,
            category,
            response,
            resolution,
        } => {
            let form = SubcategoryForm::new(&name, Some(category), response.as_deref(), resolution.as_deref())
                .map_err(|e| ctx.fail(e.into(), Failure::SaveSubcategory))?;
            let created = ctx.call(Failure::SaveSubcategory, service.create(&form)).await?;
            match created {
                Some(sub) => output::success(&format!("Created subcategory {} ({})", sub.name, sub.id)),
                None => output::success(&format!("Created subcategory {}", name.trim())),
            }
        }
        SubcategoryCommands::Rename { id, name } => {
            let form = CategoryForm::new(&name).map_err(|e| ctx.fail(e.into(), Failure::SaveSubcategory))?;
            ctx.call(Failure::SaveSubcategory, service.rename(&id, &form)).await?;
            output::success(&format!("Renamed subcategory {}", id));
        }
        SubcategoryCommands::Delete { id } => {
            ctx.call(Failure::DeleteSubcategory, service.delete(&id)).await?;
            output::success(&format!("Deleted subcategory {}", id));
        }
    }
    Ok(())
}
