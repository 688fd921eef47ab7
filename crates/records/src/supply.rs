//! Supply-chain inventory records.
//!
//! The supply backend answers list requests with bare arrays; the client accepts either shape,
//! so these paths only name the collection.

use crate::{require, selected};
use deskhub_core::{Identified, PreconditionError, Resource, ResourcePath};
use deskhub_types::RecordId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub unit_of_measure: Option<String>,
    #[serde(default)]
    pub quantity_in_stock: Option<i64>,
    #[serde(default)]
    pub reorder_level: Option<i64>,
    #[serde(default)]
    pub supplier_id: Option<RecordId>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Product {
    /// At or below the reorder level. Products without a level never need reordering.
    pub fn needs_reorder(&self) -> bool {
        match (self.quantity_in_stock, self.reorder_level) {
            (Some(stock), Some(level)) => stock <= level,
            _ => false,
        }
    }
}

impl Identified for Product {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductDraft {
    pub name: String,
    pub sku: String,
    pub category: String,
    pub unit_price: Option<f64>,
    pub unit_of_measure: String,
    pub quantity_in_stock: Option<i64>,
    pub reorder_level: Option<i64>,
    pub supplier_id: Option<RecordId>,
    pub status: String,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            sku: String::new(),
            category: String::new(),
            unit_price: None,
            unit_of_measure: String::new(),
            quantity_in_stock: None,
            reorder_level: None,
            supplier_id: None,
            status: "available".to_owned(),
        }
    }
}

pub struct Products;

impl Resource for Products {
    type Record = Product;
    type Draft = ProductDraft;
    const PATH: ResourcePath = ResourcePath::new("supply", "products");
    const LABEL: &'static str = "Product";

    fn seed_draft(p: &Product) -> ProductDraft {
        ProductDraft {
            name: p.name.clone(),
            sku: p.sku.clone(),
            category: p.category.clone().unwrap_or_default(),
            unit_price: p.unit_price,
            unit_of_measure: p.unit_of_measure.clone().unwrap_or_default(),
            quantity_in_stock: p.quantity_in_stock,
            reorder_level: p.reorder_level,
            supplier_id: p.supplier_id.clone(),
            status: p
                .status
                .clone()
                .unwrap_or_else(|| "available".to_owned()),
        }
    }

    fn check_draft(d: &ProductDraft) -> Result<(), PreconditionError> {
        const MESSAGE: &str = "Product name and SKU are required";
        require(&[(&d.name, MESSAGE), (&d.sku, MESSAGE)])
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
}

impl Identified for Supplier {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplierDraft {
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub status: String,
    pub rating: f32,
}

impl Default for SupplierDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            contact_person: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            status: "active".to_owned(),
            rating: 0.0,
        }
    }
}

pub struct Suppliers;

impl Resource for Suppliers {
    type Record = Supplier;
    type Draft = SupplierDraft;
    const PATH: ResourcePath = ResourcePath::new("supply", "suppliers");
    const LABEL: &'static str = "Supplier";

    fn seed_draft(s: &Supplier) -> SupplierDraft {
        SupplierDraft {
            name: s.name.clone(),
            contact_person: s.contact_person.clone().unwrap_or_default(),
            email: s.email.clone().unwrap_or_default(),
            phone: s.phone.clone().unwrap_or_default(),
            address: s.address.clone().unwrap_or_default(),
            status: s.status.clone().unwrap_or_else(|| "active".to_owned()),
            rating: s.rating.unwrap_or(0.0),
        }
    }

    fn check_draft(d: &SupplierDraft) -> Result<(), PreconditionError> {
        require(&[(&d.name, "Supplier name is required")])
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: RecordId,
    #[serde(default)]
    pub order_number: String,
    #[serde(default)]
    pub supplier_id: Option<RecordId>,
    #[serde(default)]
    pub product_id: Option<RecordId>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub order_date: Option<String>,
    #[serde(default)]
    pub expected_delivery: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl PurchaseOrder {
    pub fn total(&self) -> Option<f64> {
        Some(f64::from(self.quantity?) * self.unit_price?)
    }
}

impl Identified for PurchaseOrder {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PurchaseOrderDraft {
    pub order_number: String,
    pub supplier_id: Option<RecordId>,
    pub product_id: Option<RecordId>,
    pub quantity: Option<u32>,
    pub unit_price: Option<f64>,
    pub order_date: String,
    pub expected_delivery: String,
    pub status: String,
    pub notes: String,
}

impl Default for PurchaseOrderDraft {
    fn default() -> Self {
        Self {
            order_number: String::new(),
            supplier_id: None,
            product_id: None,
            quantity: None,
            unit_price: None,
            order_date: String::new(),
            expected_delivery: String::new(),
            status: "pending".to_owned(),
            notes: String::new(),
        }
    }
}

pub struct PurchaseOrders;

impl Resource for PurchaseOrders {
    type Record = PurchaseOrder;
    type Draft = PurchaseOrderDraft;
    const PATH: ResourcePath = ResourcePath::new("supply", "purchase-orders");
    const LABEL: &'static str = "Purchase order";

    fn seed_draft(o: &PurchaseOrder) -> PurchaseOrderDraft {
        PurchaseOrderDraft {
            order_number: o.order_number.clone(),
            supplier_id: o.supplier_id.clone(),
            product_id: o.product_id.clone(),
            quantity: o.quantity,
            unit_price: o.unit_price,
            order_date: o.order_date.clone().unwrap_or_default(),
            expected_delivery: o.expected_delivery.clone().unwrap_or_default(),
            status: o.status.clone().unwrap_or_else(|| "pending".to_owned()),
            notes: o.notes.clone().unwrap_or_default(),
        }
    }

    fn check_draft(d: &PurchaseOrderDraft) -> Result<(), PreconditionError> {
        const MESSAGE: &str = "Order number, supplier, and quantity are required";
        let quantity = match d.quantity {
            Some(q) if q > 0 => "set",
            _ => "",
        };
        require(&[
            (&d.order_number, MESSAGE),
            (selected(&d.supplier_id), MESSAGE),
            (quantity, MESSAGE),
        ])
    }
}
