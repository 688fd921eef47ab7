//! Generic CRUD commands over every record type.
//!
//! Each command builds a [`CollectionController`] for the chosen resource and drives it once,
//! so the CLI gets the same preconditions, notifications and reload behavior as the front ends.

use crate::console::Prompt;
use crate::fields::{self, Assignment};
use anyhow::bail;
use clap::ValueEnum;
use deskhub_client::HttpClient;
use deskhub_core::{
    ClientConfig, CollectionController, DeleteOutcome, ListQuery, Notifier, OperationOutcome,
    RecordId, Resource,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    Patients,
    Dentists,
    Appointments,
    Treatments,
    Properties,
    Tenants,
    Contracts,
    Products,
    Suppliers,
    PurchaseOrders,
    Folders,
}

/// Run `$body` with `$r` bound to the [`Resource`] type behind `$kind`.
macro_rules! with_resource {
    ($kind:expr, $r:ident => $body:expr) => {{
        use deskhub_records::{cloud, dental, property, supply};
        use $crate::resources::ResourceKind;
        match $kind {
            ResourceKind::Patients => {
                type $r = dental::Patients;
                $body
            }
            ResourceKind::Dentists => {
                type $r = dental::Dentists;
                $body
            }
            ResourceKind::Appointments => {
                type $r = dental::Appointments;
                $body
            }
            ResourceKind::Treatments => {
                type $r = dental::Treatments;
                $body
            }
            ResourceKind::Properties => {
                type $r = property::Properties;
                $body
            }
            ResourceKind::Tenants => {
                type $r = property::Tenants;
                $body
            }
            ResourceKind::Contracts => {
                type $r = property::Contracts;
                $body
            }
            ResourceKind::Products => {
                type $r = supply::Products;
                $body
            }
            ResourceKind::Suppliers => {
                type $r = supply::Suppliers;
                $body
            }
            ResourceKind::PurchaseOrders => {
                type $r = supply::PurchaseOrders;
                $body
            }
            ResourceKind::Folders => {
                type $r = cloud::Folders;
                $body
            }
        }
    }};
}

pub(crate) use with_resource;

pub struct Context {
    pub config: ClientConfig,
    pub client: Arc<HttpClient>,
    pub notifier: Arc<dyn Notifier>,
}

impl Context {
    fn controller<R: Resource>(&self, query: ListQuery) -> CollectionController<R, HttpClient> {
        CollectionController::new(self.client.clone(), self.notifier.clone())
            .with_sync_mode(self.config.sync_mode())
            .with_query(query)
    }
}

pub fn list_query(filters: &[Assignment]) -> ListQuery {
    filters
        .iter()
        .fold(ListQuery::new(), |query, f| query.with(&f.key, &f.value))
}

pub async fn list<R>(ctx: &Context, query: ListQuery) -> anyhow::Result<()>
where
    R: Resource,
    R::Record: Serialize,
{
    let mut controller = ctx.controller::<R>(query);
    controller.load().await?;

    if controller.collection().is_empty() {
        println!("No {} found.", R::PATH.plural());
    }
    for record in controller.collection().iter() {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(())
}

pub async fn create<R>(ctx: &Context, assignments: &[Assignment]) -> anyhow::Result<()>
where
    R: Resource,
    R::Record: Serialize,
    R::Draft: DeserializeOwned,
{
    let mut controller = ctx.controller::<R>(ListQuery::new());
    let draft = controller.open_create();
    let filled = fields::apply(&*draft, assignments)?;
    *draft = filled;
    submit(&mut controller).await
}

/// The record must be in the listing selected by `query` to be edited.
pub async fn update<R>(
    ctx: &Context,
    id: &RecordId,
    query: ListQuery,
    assignments: &[Assignment],
) -> anyhow::Result<()>
where
    R: Resource,
    R::Record: Serialize,
    R::Draft: DeserializeOwned,
{
    let mut controller = ctx.controller::<R>(query);
    controller.load().await?;

    let Some(draft) = controller.open_edit(id) else {
        bail!("No {} with id {id}", R::LABEL.to_lowercase());
    };
    let filled = fields::apply(&*draft, assignments)?;
    *draft = filled;
    submit(&mut controller).await
}

pub async fn delete<R: Resource>(
    ctx: &Context,
    id: &RecordId,
    query: ListQuery,
    assume_yes: bool,
) -> anyhow::Result<()> {
    let mut controller = ctx.controller::<R>(query);
    match controller.delete(id, &Prompt { assume_yes }).await {
        DeleteOutcome::Deleted => Ok(()),
        DeleteOutcome::Cancelled => {
            println!("Cancelled.");
            Ok(())
        }
        DeleteOutcome::Failed(e) => Err(e.into()),
    }
}

async fn submit<R>(controller: &mut CollectionController<R, HttpClient>) -> anyhow::Result<()>
where
    R: Resource,
    R::Record: Serialize,
{
    match controller.submit().await? {
        OperationOutcome::Success(record) => {
            if let Some(record) = record {
                println!("{}", serde_json::to_string(&record)?);
            }
            Ok(())
        }
        OperationOutcome::ValidationFailed(_) | OperationOutcome::TransportFailed(_) => {
            bail!("{} was not saved", R::LABEL)
        }
    }
}
