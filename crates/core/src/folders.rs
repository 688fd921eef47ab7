//! Breadcrumb navigation for the cloud file browser.

use deskhub_types::RecordId;

const ROOT_NAME: &str = "Home";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Crumb {
    /// `None` for the root.
    pub id: Option<RecordId>,
    pub name: String,
}

/// The trail from the root to the folder being viewed. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Breadcrumbs {
    trail: Vec<Crumb>,
}

impl Default for Breadcrumbs {
    fn default() -> Self {
        Self {
            trail: vec![Crumb {
                id: None,
                name: ROOT_NAME.to_owned(),
            }],
        }
    }
}

impl Breadcrumbs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descend into a child folder of the current one.
    pub fn enter(&mut self, id: RecordId, name: impl Into<String>) {
        self.trail.push(Crumb {
            id: Some(id),
            name: name.into(),
        });
    }

    /// Jump back to the crumb at `index`, dropping everything after it.
    ///
    /// Out-of-range indices leave the trail unchanged.
    pub fn jump_to(&mut self, index: usize) {
        if index < self.trail.len() {
            self.trail.truncate(index + 1);
        }
    }

    /// Go to the parent folder. Returns `false` at the root.
    pub fn up(&mut self) -> bool {
        if self.trail.len() > 1 {
            self.trail.pop();
            true
        } else {
            false
        }
    }

    /// The folder being viewed; `None` at the root.
    pub fn current(&self) -> Option<&RecordId> {
        self.trail.last().and_then(|crumb| crumb.id.as_ref())
    }

    pub fn crumbs(&self) -> &[Crumb] {
        &self.trail
    }

    pub fn path(&self) -> String {
        self.trail
            .iter()
            .map(|crumb| crumb.name.as_str())
            .collect::<Vec<_>>()
            .join(" / ")
    }
}
