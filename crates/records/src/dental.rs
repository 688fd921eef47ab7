//! Dental clinic records.
//!
//! All four collections live under `/dental` and wrap their list responses in an object keyed
//! by the collection name.

use crate::{require, selected};
use deskhub_core::compose::compose_name;
use deskhub_core::{Identified, PreconditionError, Resource, ResourcePath};
use deskhub_types::RecordId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: RecordId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub street_address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub insurance_provider: Option<String>,
    #[serde(default)]
    pub allergies: Option<String>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        compose_name(&self.first_name, self.middle_name.as_deref(), Some(&self.last_name))
    }
}

impl Identified for Patient {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientDraft {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub insurance_provider: String,
    pub allergies: String,
}

pub struct Patients;

impl Resource for Patients {
    type Record = Patient;
    type Draft = PatientDraft;
    const PATH: ResourcePath = ResourcePath::new("dental", "patients");
    const LABEL: &'static str = "Patient";

    fn seed_draft(p: &Patient) -> PatientDraft {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        PatientDraft {
            first_name: p.first_name.clone(),
            middle_name: text(&p.middle_name),
            last_name: p.last_name.clone(),
            email: text(&p.email),
            phone: text(&p.phone),
            date_of_birth: text(&p.date_of_birth),
            street_address: text(&p.street_address),
            city: text(&p.city),
            state: text(&p.state),
            zip_code: text(&p.zip_code),
            country: text(&p.country),
            insurance_provider: text(&p.insurance_provider),
            allergies: text(&p.allergies),
        }
    }

    fn check_draft(d: &PatientDraft) -> Result<(), PreconditionError> {
        require(&[
            (&d.first_name, "Please enter the patient's first name"),
            (&d.last_name, "Please enter the patient's last name"),
        ])
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dentist {
    pub id: RecordId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
}

impl Identified for Dentist {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DentistDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub specialization: String,
    pub license_number: String,
}

pub struct Dentists;

impl Resource for Dentists {
    type Record = Dentist;
    type Draft = DentistDraft;
    const PATH: ResourcePath = ResourcePath::new("dental", "dentists");
    const LABEL: &'static str = "Dentist";

    fn seed_draft(d: &Dentist) -> DentistDraft {
        DentistDraft {
            first_name: d.first_name.clone(),
            last_name: d.last_name.clone(),
            email: d.email.clone().unwrap_or_default(),
            phone: d.phone.clone().unwrap_or_default(),
            specialization: d.specialization.clone().unwrap_or_default(),
            license_number: d.license_number.clone().unwrap_or_default(),
        }
    }

    fn check_draft(d: &DentistDraft) -> Result<(), PreconditionError> {
        require(&[
            (&d.first_name, "Please enter the dentist's first name"),
            (&d.last_name, "Please enter the dentist's last name"),
        ])
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: RecordId,
    #[serde(default)]
    pub patient_id: Option<RecordId>,
    #[serde(default)]
    pub dentist_id: Option<RecordId>,
    #[serde(default)]
    pub appointment_date: String,
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default)]
    pub appointment_type: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

fn default_duration() -> u32 {
    30
}

impl Identified for Appointment {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppointmentDraft {
    pub patient_id: Option<RecordId>,
    pub dentist_id: Option<RecordId>,
    pub appointment_date: String,
    /// Minutes.
    pub duration: u32,
    pub appointment_type: String,
    pub reason: String,
}

impl Default for AppointmentDraft {
    fn default() -> Self {
        Self {
            patient_id: None,
            dentist_id: None,
            appointment_date: String::new(),
            duration: default_duration(),
            appointment_type: "checkup".to_owned(),
            reason: String::new(),
        }
    }
}

pub struct Appointments;

impl Resource for Appointments {
    type Record = Appointment;
    type Draft = AppointmentDraft;
    const PATH: ResourcePath = ResourcePath::new("dental", "appointments");
    const LABEL: &'static str = "Appointment";

    fn seed_draft(a: &Appointment) -> AppointmentDraft {
        AppointmentDraft {
            patient_id: a.patient_id.clone(),
            dentist_id: a.dentist_id.clone(),
            appointment_date: a.appointment_date.clone(),
            duration: a.duration,
            appointment_type: a
                .appointment_type
                .clone()
                .unwrap_or_else(|| "checkup".to_owned()),
            reason: a.reason.clone().unwrap_or_default(),
        }
    }

    fn check_draft(d: &AppointmentDraft) -> Result<(), PreconditionError> {
        require(&[
            (selected(&d.patient_id), "Please select a patient"),
            (selected(&d.dentist_id), "Please select a dentist"),
            (&d.appointment_date, "Please select appointment date and time"),
        ])
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Treatment {
    pub id: RecordId,
    #[serde(default)]
    pub patient_id: Option<RecordId>,
    #[serde(default)]
    pub treatment_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tooth_number: Option<String>,
    #[serde(default)]
    pub treatment_date: Option<String>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Identified for Treatment {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreatmentDraft {
    pub patient_id: Option<RecordId>,
    pub treatment_name: String,
    pub description: String,
    pub tooth_number: String,
    pub treatment_date: String,
    pub cost: Option<f64>,
    pub payment_status: String,
    pub notes: String,
}

impl Default for TreatmentDraft {
    fn default() -> Self {
        Self {
            patient_id: None,
            treatment_name: String::new(),
            description: String::new(),
            tooth_number: String::new(),
            treatment_date: String::new(),
            cost: None,
            payment_status: "pending".to_owned(),
            notes: String::new(),
        }
    }
}

pub struct Treatments;

impl Resource for Treatments {
    type Record = Treatment;
    type Draft = TreatmentDraft;
    const PATH: ResourcePath = ResourcePath::new("dental", "treatments");
    const LABEL: &'static str = "Treatment plan";

    fn seed_draft(t: &Treatment) -> TreatmentDraft {
        TreatmentDraft {
            patient_id: t.patient_id.clone(),
            treatment_name: t.treatment_name.clone(),
            description: t.description.clone().unwrap_or_default(),
            tooth_number: t.tooth_number.clone().unwrap_or_default(),
            treatment_date: t.treatment_date.clone().unwrap_or_default(),
            cost: t.cost,
            payment_status: t
                .payment_status
                .clone()
                .unwrap_or_else(|| "pending".to_owned()),
            notes: t.notes.clone().unwrap_or_default(),
        }
    }

    fn check_draft(d: &TreatmentDraft) -> Result<(), PreconditionError> {
        require(&[
            (selected(&d.patient_id), "Please select a patient"),
            (&d.treatment_name, "Please enter a treatment name"),
        ])
    }
}
