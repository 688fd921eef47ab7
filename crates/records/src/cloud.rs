//! Cloud storage folders.
//!
//! Folders are listed per user and per parent (`parent_id` is blank at the root). Single
//! folders are addressed under the singular `/cloud/folder/{id}` segment.

use crate::require;
use deskhub_core::folders::Breadcrumbs;
use deskhub_core::{Identified, ListQuery, PreconditionError, Resource, ResourcePath};
use deskhub_types::RecordId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<RecordId>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Identified for Folder {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderDraft {
    pub name: String,
    pub parent_id: Option<RecordId>,
    pub user_id: Option<RecordId>,
}

impl FolderDraft {
    /// A new folder inside whatever folder the breadcrumbs point at.
    pub fn in_current(crumbs: &Breadcrumbs, user_id: Option<RecordId>) -> Self {
        Self {
            name: String::new(),
            parent_id: crumbs.current().cloned(),
            user_id,
        }
    }
}

pub struct Folders;

impl Folders {
    pub fn list_query(user_id: &RecordId, crumbs: &Breadcrumbs) -> ListQuery {
        ListQuery::new()
            .with("user_id", user_id.as_str())
            .with("parent_id", crumbs.current().map(RecordId::as_str).unwrap_or(""))
    }
}

impl Resource for Folders {
    type Record = Folder;
    type Draft = FolderDraft;
    const PATH: ResourcePath = ResourcePath::new("cloud", "folders").with_item_segment("folder");
    const LABEL: &'static str = "Folder";

    fn seed_draft(f: &Folder) -> FolderDraft {
        FolderDraft {
            name: f.name.clone(),
            parent_id: f.parent_id.clone(),
            user_id: None,
        }
    }

    fn check_draft(d: &FolderDraft) -> Result<(), PreconditionError> {
        require(&[(&d.name, "Please enter folder name")])
    }

    fn delete_prompt() -> String {
        "Are you sure? This will delete the folder and all its contents.".to_owned()
    }
}
