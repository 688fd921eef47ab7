//! Property management records.
//!
//! Properties carry coordinates filled in by the geocoding controller. Tenants are edited as
//! name parts but older rows only hold `full_name`, so the draft splits it on open and sends
//! both shapes back.

use crate::require;
use deskhub_core::compose::{split_name, NameParts};
use deskhub_core::debounce::{AddressQuery, Coordinates};
use deskhub_core::{Identified, ListQuery, PreconditionError, Resource, ResourcePath};
use deskhub_types::RecordId;
use serde::{Deserialize, Serialize, Serializer};

const DEFAULT_COUNTRY: &str = "USA";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub units_total: Option<u32>,
    #[serde(default)]
    pub manager_name: Option<String>,
    #[serde(default)]
    pub manager_phone: Option<String>,
    #[serde(default)]
    pub manager_email: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Property {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

impl Identified for Property {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyDraft {
    pub name: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
    pub units_total: u32,
    pub manager_name: String,
    pub manager_phone: String,
    pub manager_email: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for PropertyDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            address: String::new(),
            city: String::new(),
            province: String::new(),
            postal_code: String::new(),
            country: DEFAULT_COUNTRY.to_owned(),
            units_total: 0,
            manager_name: String::new(),
            manager_phone: String::new(),
            manager_email: String::new(),
            latitude: None,
            longitude: None,
        }
    }
}

impl PropertyDraft {
    /// The query the geocoding controller is fed on every address edit.
    pub fn address_query(&self) -> AddressQuery {
        AddressQuery::new(&self.address, &self.city, &self.province)
    }

    pub fn set_coordinates(&mut self, coordinates: Option<Coordinates>) {
        self.latitude = coordinates.map(|c| c.latitude);
        self.longitude = coordinates.map(|c| c.longitude);
    }
}

pub struct Properties;

impl Resource for Properties {
    type Record = Property;
    type Draft = PropertyDraft;
    const PATH: ResourcePath = ResourcePath::new("property", "properties");
    const LABEL: &'static str = "Property";

    fn seed_draft(p: &Property) -> PropertyDraft {
        PropertyDraft {
            name: p.name.clone(),
            address: p.address.clone(),
            city: p.city.clone(),
            province: p.province.clone().unwrap_or_default(),
            postal_code: p.postal_code.clone().unwrap_or_default(),
            country: p
                .country
                .clone()
                .unwrap_or_else(|| DEFAULT_COUNTRY.to_owned()),
            units_total: p.units_total.unwrap_or(0),
            manager_name: p.manager_name.clone().unwrap_or_default(),
            manager_phone: p.manager_phone.clone().unwrap_or_default(),
            manager_email: p.manager_email.clone().unwrap_or_default(),
            latitude: p.latitude,
            longitude: p.longitude,
        }
    }

    fn check_draft(d: &PropertyDraft) -> Result<(), PreconditionError> {
        const MESSAGE: &str = "Name, address, and city are required.";
        require(&[(&d.name, MESSAGE), (&d.address, MESSAGE), (&d.city, MESSAGE)])
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: RecordId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Tenant {
    /// Name parts, falling back to splitting `full_name` for rows that predate the split columns.
    pub fn name_parts(&self) -> NameParts {
        match self.first_name.as_deref().filter(|f| !f.trim().is_empty()) {
            Some(first) => NameParts {
                first: first.to_owned(),
                middle: self.middle_name.clone().filter(|m| !m.trim().is_empty()),
                last: self.last_name.clone().filter(|l| !l.trim().is_empty()),
            },
            None => split_name(self.full_name.as_deref().unwrap_or_default()),
        }
    }

    pub fn display_name(&self) -> String {
        self.name_parts().compose()
    }
}

impl Identified for Tenant {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "TenantFields")]
pub struct TenantDraft {
    pub name: NameParts,
    pub email: String,
    pub phone: String,
    pub notes: String,
}

#[derive(Serialize)]
struct TenantBody<'a> {
    first_name: &'a str,
    middle_name: &'a str,
    last_name: &'a str,
    full_name: String,
    email: &'a str,
    phone: &'a str,
    notes: &'a str,
}

impl Serialize for TenantDraft {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TenantBody {
            first_name: &self.name.first,
            middle_name: self.name.middle.as_deref().unwrap_or_default(),
            last_name: self.name.last.as_deref().unwrap_or_default(),
            full_name: self.name.compose(),
            email: &self.email,
            phone: &self.phone,
            notes: &self.notes,
        }
        .serialize(serializer)
    }
}

/// Input shape of a tenant form. Split name columns win over `full_name`, as for records.
#[derive(Default, Deserialize)]
#[serde(default)]
struct TenantFields {
    first_name: String,
    middle_name: String,
    last_name: String,
    full_name: String,
    email: String,
    phone: String,
    notes: String,
}

impl From<TenantFields> for TenantDraft {
    fn from(fields: TenantFields) -> Self {
        let name = if fields.first_name.trim().is_empty() {
            split_name(&fields.full_name)
        } else {
            NameParts {
                first: fields.first_name,
                middle: Some(fields.middle_name).filter(|m| !m.trim().is_empty()),
                last: Some(fields.last_name).filter(|l| !l.trim().is_empty()),
            }
        };
        Self {
            name,
            email: fields.email,
            phone: fields.phone,
            notes: fields.notes,
        }
    }
}

pub struct Tenants;

impl Resource for Tenants {
    type Record = Tenant;
    type Draft = TenantDraft;
    const PATH: ResourcePath = ResourcePath::new("property", "tenants");
    const LABEL: &'static str = "Tenant";

    fn seed_draft(t: &Tenant) -> TenantDraft {
        TenantDraft {
            name: t.name_parts(),
            email: t.email.clone().unwrap_or_default(),
            phone: t.phone.clone().unwrap_or_default(),
            notes: t.notes.clone().unwrap_or_default(),
        }
    }

    fn check_draft(d: &TenantDraft) -> Result<(), PreconditionError> {
        require(&[(&d.name.first, "Please enter the tenant's name")])
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: RecordId,
    #[serde(default)]
    pub contract_number: Option<String>,
    #[serde(default)]
    pub contract_type: Option<String>,
    #[serde(default)]
    pub party_name: String,
    #[serde(default)]
    pub property_id: Option<RecordId>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Contract {
    /// Contracts without a status are pending.
    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("pending")
    }
}

impl Identified for Contract {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractDraft {
    pub contract_number: String,
    pub contract_type: String,
    pub party_name: String,
    pub property_id: Option<RecordId>,
    pub start_date: String,
    pub end_date: String,
    pub amount: Option<f64>,
    pub status: String,
}

impl Default for ContractDraft {
    fn default() -> Self {
        Self {
            contract_number: String::new(),
            contract_type: "lease".to_owned(),
            party_name: String::new(),
            property_id: None,
            start_date: String::new(),
            end_date: String::new(),
            amount: None,
            status: "pending".to_owned(),
        }
    }
}

pub struct Contracts;

impl Contracts {
    /// List filter for the status selector. A blank status lists every contract.
    pub fn status_filter(status: &str) -> ListQuery {
        match status.trim() {
            "" => ListQuery::new(),
            status => ListQuery::new().with("status", status),
        }
    }
}

impl Resource for Contracts {
    type Record = Contract;
    type Draft = ContractDraft;
    const PATH: ResourcePath = ResourcePath::new("property", "contracts");
    const LABEL: &'static str = "Contract";

    fn seed_draft(c: &Contract) -> ContractDraft {
        ContractDraft {
            contract_number: c.contract_number.clone().unwrap_or_default(),
            contract_type: c
                .contract_type
                .clone()
                .unwrap_or_else(|| "lease".to_owned()),
            party_name: c.party_name.clone(),
            property_id: c.property_id.clone(),
            start_date: c.start_date.clone().unwrap_or_default(),
            end_date: c.end_date.clone().unwrap_or_default(),
            amount: c.amount,
            status: c.status().to_owned(),
        }
    }

    fn check_draft(d: &ContractDraft) -> Result<(), PreconditionError> {
        require(&[(&d.party_name, "Please enter the party name")])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn property_requires_name_address_and_city() {
        let mut draft = PropertyDraft {
            name: "Sunset Villas".into(),
            address: "12 Rizal Ave".into(),
            ..Default::default()
        };
        assert_eq!(
            Properties::check_draft(&draft).unwrap_err().0,
            "Name, address, and city are required."
        );
        draft.city = "Makati".into();
        assert!(Properties::check_draft(&draft).is_ok());
    }

    #[test]
    fn property_draft_feeds_geocoder_and_takes_coordinates() {
        let mut draft = PropertyDraft {
            address: "12 Rizal Ave".into(),
            city: "Makati".into(),
            province: "Metro Manila".into(),
            ..Default::default()
        };
        let query = draft.address_query();
        assert_eq!(query.city, "Makati");
        assert_eq!(query.country, "USA");

        draft.set_coordinates(Some(Coordinates {
            latitude: 14.55,
            longitude: 121.02,
        }));
        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(body["latitude"], json!(14.55));
        assert_eq!(body["units_total"], json!(0));
    }

    #[test]
    fn existing_property_exposes_known_coordinates() {
        let p: Property = serde_json::from_value(json!({
            "id": 1, "name": "A", "address": "B", "city": "C", "latitude": 1.5, "longitude": 2.5
        }))
        .unwrap();
        assert_eq!(
            p.coordinates(),
            Some(Coordinates {
                latitude: 1.5,
                longitude: 2.5
            })
        );
        let draft = Properties::seed_draft(&p);
        assert_eq!(draft.country, "USA");
    }

    #[test]
    fn legacy_tenant_full_name_is_split_for_editing() {
        let t: Tenant = serde_json::from_value(json!({
            "id": 5, "full_name": "Maria Clara Santos", "email": "m@example.com"
        }))
        .unwrap();
        let draft = Tenants::seed_draft(&t);
        assert_eq!(draft.name.first, "Maria");
        assert_eq!(draft.name.middle.as_deref(), Some("Clara"));
        assert_eq!(draft.name.last.as_deref(), Some("Santos"));
    }

    #[test]
    fn tenant_draft_sends_parts_and_composed_name() {
        let draft = TenantDraft {
            name: NameParts {
                first: "Jane".into(),
                middle: None,
                last: Some("Doe".into()),
            },
            ..Default::default()
        };
        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(body["full_name"], json!("Jane Doe"));
        assert_eq!(body["middle_name"], json!(""));
        assert_eq!(body["last_name"], json!("Doe"));
    }

    #[test]
    fn split_columns_win_over_full_name() {
        let t: Tenant = serde_json::from_value(json!({
            "id": 5, "first_name": "Ana", "last_name": "Reyes", "full_name": "stale value"
        }))
        .unwrap();
        assert_eq!(t.display_name(), "Ana Reyes");
    }

    #[test]
    fn contract_status_filter_skips_blank() {
        assert!(Contracts::status_filter(" ").is_empty());
        assert_eq!(
            Contracts::status_filter("active").pairs(),
            &[("status".to_string(), "active".to_string())]
        );
    }

    #[test]
    fn contract_requires_party_name() {
        let draft = ContractDraft::default();
        assert_eq!(
            Contracts::check_draft(&draft).unwrap_err().0,
            "Please enter the party name"
        );
    }

    #[test]
    fn tenant_form_input_splits_full_name_when_parts_are_missing() {
        let draft: TenantDraft =
            serde_json::from_value(json!({ "full_name": "Ana Marie Cruz", "phone": "0917" }))
                .unwrap();
        assert_eq!(draft.name.first, "Ana");
        assert_eq!(draft.name.middle.as_deref(), Some("Marie"));
        assert_eq!(draft.name.last.as_deref(), Some("Cruz"));
        assert_eq!(draft.phone, "0917");

        let draft: TenantDraft = serde_json::from_value(json!({
            "first_name": "Ana",
            "last_name": "Reyes",
            "full_name": "Someone Else"
        }))
        .unwrap();
        assert_eq!(draft.name.compose(), "Ana Reyes");
    }
}
