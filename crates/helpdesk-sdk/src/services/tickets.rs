use helpdesk_domain::permissions;
use helpdesk_domain::{
    Action, Endpoint, Id, NewComment, StatusUpdate, Ticket, TicketForm, TicketStatus, Transfer, User,
};

use super::collect_pages;
use crate::{Client, Error, ListParams, Page, Result};

/// Ticket endpoints. The endpoint family follows the viewer's role; mutations
/// are checked against the viewer's permissions before anything is sent.
pub struct TicketsService {
    client: Client,
}

fn ensure(viewer: &User, ticket: &Ticket, action: Action) -> Result<()> {
    if permissions::can(viewer, ticket, action) {
        Ok(())
    } else {
        tracing::debug!(viewer = %viewer.email, ticket = %ticket.id, ?action, "action not permitted");
        Err(Error::NotPermitted(action))
    }
}

impl TicketsService {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// One page of the viewer's listing, unfiltered.
    pub async fn list(&self, viewer: &User, params: ListParams) -> Result<Page<Ticket>> {
        let endpoint = Endpoint::listing(viewer);
        let value = self.client.get_raw(endpoint.base(), &params.query()).await?;
        Page::from_value(value)
    }

    /// The viewer's whole listing.
    pub async fn list_all(&self, viewer: &User, page_size: u32) -> Result<Vec<Ticket>> {
        collect_pages(&self.client, Endpoint::listing(viewer).base(), page_size).await
    }

    pub async fn get(&self, viewer: &User, id: &Id) -> Result<Ticket> {
        self.client.get(&Endpoint::listing(viewer).item(id), &[]).await
    }

    pub async fn create(&self, form: &TicketForm) -> Result<Option<Ticket>> {
        tracing::info!(title = form.title(), "creating ticket");
        self.client.post_optional("/tickets", form).await
    }

    pub async fn edit(&self, viewer: &User, ticket: &Ticket, form: &TicketForm) -> Result<()> {
        ensure(viewer, ticket, Action::Edit)?;
        self.client
            .put(&Endpoint::edit(viewer).item(&ticket.id), form)
            .await
    }

    pub async fn comment(&self, viewer: &User, ticket: &Ticket, comment: &NewComment) -> Result<()> {
        ensure(viewer, ticket, Action::Comment)?;
        self.client
            .execute(
                reqwest::Method::POST,
                &format!("/tickets/{}/comments", ticket.id),
                Some(comment),
                &[],
            )
            .await
    }

    pub async fn update_status(&self, viewer: &User, ticket: &Ticket, update: &StatusUpdate) -> Result<()> {
        let action = match update.status() {
            TicketStatus::Resolved => Action::Resolve,
            TicketStatus::Canceled => Action::Cancel,
            _ => Action::ChangeStatus,
        };
        ensure(viewer, ticket, action)?;
        tracing::info!(ticket = %ticket.id, status = update.status().code(), "updating ticket status");
        self.client
            .put(&Endpoint::workflow(viewer).item(&ticket.id), update)
            .await
    }

    pub async fn transfer(&self, viewer: &User, ticket: &Ticket, transfer: &Transfer) -> Result<()> {
        ensure(viewer, ticket, Action::Transfer)?;
        let path = Endpoint::workflow(viewer)
            .transfer(&ticket.id)
            .ok_or(Error::NotPermitted(Action::Transfer))?;
        tracing::info!(ticket = %ticket.id, to = transfer.target(), "transferring ticket");
        self.client.put(&path, transfer).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_domain::Role;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn service(server: &MockServer) -> TicketsService {
        Client::new(format!("{}/v1", server.uri())).unwrap().tickets()
    }

    fn ticket(status: TicketStatus, assignee: &str) -> Ticket {
        serde_json::from_value(json!({
            "id": 7,
            "title": "VPN caiu",
            "status": status.code(),
            "priority": 2,
            "userId": "u-1",
            "assignedTo": assignee,
        }))
        .unwrap()
    }

    fn agent() -> User {
        User::new("agent@x.io", vec![Role::Atendente])
    }

    #[tokio::test]
    async fn test_listing_endpoint_follows_role() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/assignment"))
            .and(query_param("pageSize", "25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": 1, "title": "a", "status": 1, "priority": 1}],
                "totalPages": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = service(&server).await.list(&agent(), ListParams::default()).await.unwrap();
        assert_eq!(page.data.len(), 1);
    }

    #[tokio::test]
    async fn test_detail_accepts_raw_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/tickets/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 7, "title": "VPN caiu", "status": 2, "priority": 3
            })))
            .mount(&server)
            .await;

        let viewer = User::new("ana@x.io", vec![Role::Usuario]);
        let t = service(&server).await.get(&viewer, &Id::Number(7)).await.unwrap();
        assert_eq!(t.status, TicketStatus::InProgress);
    }

    #[tokio::test]
    async fn test_resolve_goes_to_assignment_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/assignment/7"))
            .and(body_json(json!({"status": 3, "solutionResolved": "Reiniciado o roteador"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let update = StatusUpdate::new(TicketStatus::Resolved, Some("Reiniciado o roteador"), None).unwrap();
        service(&server)
            .await
            .update_status(&agent(), &ticket(TicketStatus::InProgress, "agent@x.io"), &update)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_denied_transition_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let update = StatusUpdate::new(TicketStatus::Canceled, None, Some("duplicado")).unwrap();
        let tickets = service(&server).await;
        let err = tickets
            .update_status(&agent(), &ticket(TicketStatus::Open, "agent@x.io"), &update)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotPermitted(Action::Cancel)));

        let transfer = Transfer::new(Some("bia@x.io")).unwrap();
        let err = tickets
            .transfer(&agent(), &ticket(TicketStatus::InProgress, "other@x.io"), &transfer)
            .await
            .unwrap_err();
        assert!(err.is_authorization_error());
    }

    #[tokio::test]
    async fn test_admin_transfer_and_edit() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/admin/transfer/7"))
            .and(body_json(json!({"assignmentEmail": "bia@x.io"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/v1/admin/7"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let admin = User::new("root@x.io", vec![Role::Admin]);
        let t = ticket(TicketStatus::Open, "agent@x.io");
        let tickets = service(&server).await;
        tickets
            .transfer(&admin, &t, &Transfer::new(Some("bia@x.io")).unwrap())
            .await
            .unwrap();

        let catalog: Vec<helpdesk_domain::Category> = serde_json::from_value(json!([
            {"id": 1, "name": "Rede", "subcategories": [{"id": 10, "name": "VPN", "categoryId": 1}]}
        ]))
        .unwrap();
        let draft = helpdesk_domain::TicketDraft {
            title: Some("VPN instável".into()),
            description: Some("Cai a cada 10 minutos".into()),
            category_id: Some(Id::Number(1)),
            subcategory_id: Some(Id::Number(10)),
            priority: Some(helpdesk_domain::Priority::High),
        };
        let form = TicketForm::validate(&draft, &catalog).unwrap();
        tickets.edit(&admin, &t, &form).await.unwrap();
    }

    #[tokio::test]
    async fn test_comment_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/tickets/7/comments"))
            .and(body_json(json!({"content": "Verificando"})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let viewer = User::new("ana@x.io", vec![Role::Usuario]);
        service(&server)
            .await
            .comment(&viewer, &ticket(TicketStatus::Open, "agent@x.io"), &NewComment::new("Verificando").unwrap())
            .await
            .unwrap();
    }
}
