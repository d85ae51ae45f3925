//! The persisted application store and the sibling records it carries.
//!
//! Only `orders` is owned by this crate's pipeline. Users, settings and the
//! staff rosters are kept verbatim so that a load/save cycle never loses them.

use super::Order;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Customer,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettings {
    pub cafe_name: String,
    /// First message shown in a new chat. Display only.
    pub welcome_message: String,
    pub operating_hours: String,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            cafe_name: "Stanley's Cafe".to_string(),
            welcome_message: "Welcome to Stanley's Cafe! I can help you with our menu and take your order. What would you like today?".to_string(),
            operating_hours: "9 AM - 8 PM Daily".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryAgentStatus {
    Available,
    OnDelivery,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryAgent {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub status: DeliveryAgentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub hourly_rate: Decimal,
    pub current_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRecord {
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    pub hours: f64,
    #[serde(with = "rust_decimal::serde::float")]
    pub hourly_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_pay: Decimal,
    pub paid_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub contact_person: String,
    pub phone: String,
    pub email: String,
    pub products: Vec<String>,
}

/// The whole application state, persisted as a single snapshot.
///
/// `Default` is the seed used for a first start and for back-filling fields
/// missing from an older snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStore {
    pub users: Vec<User>,
    pub orders: Vec<Order>,
    pub system_settings: SystemSettings,
    pub delivery_agents: Vec<DeliveryAgent>,
    pub employees: Vec<Employee>,
    pub payroll_history: Vec<PayrollRecord>,
    pub vendors: Vec<Vendor>,
}

impl Default for AppStore {
    fn default() -> Self {
        Self {
            users: vec![
                user("user-1", "Alice Admin", UserRole::Admin),
                user("user-2", "Bob Customer", UserRole::Customer),
            ],
            orders: Vec::new(),
            system_settings: SystemSettings::default(),
            delivery_agents: vec![
                agent("agent-1", "John Fleet", "555-1234", DeliveryAgentStatus::Available),
                agent("agent-2", "Maria Go", "555-5678", DeliveryAgentStatus::OnDelivery),
            ],
            employees: vec![
                employee("emp-1", "Charlie Barista", dec!(18.50)),
                employee("emp-2", "Dana Chef", dec!(22.00)),
            ],
            payroll_history: Vec::new(),
            vendors: vec![
                vendor(
                    "vendor-1",
                    "Artisan Coffee Roasters",
                    "Dave Roast",
                    "555-2633",
                    "dave@artisan.com",
                    &["Coffee Beans", "Espresso Machines"],
                ),
                vendor(
                    "vendor-2",
                    "Farm Fresh Dairy",
                    "Molly Milk",
                    "555-6455",
                    "molly@farmfresh.com",
                    &["Milk", "Cream", "Butter"],
                ),
                vendor(
                    "vendor-3",
                    "Bakery Delights",
                    "Peter Pastry",
                    "555-2253",
                    "peter@bakerydelights.com",
                    &["Croissants", "Muffins", "Bread"],
                ),
            ],
        }
    }
}

fn user(id: &str, name: &str, role: UserRole) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        role,
    }
}

fn agent(id: &str, name: &str, phone: &str, status: DeliveryAgentStatus) -> DeliveryAgent {
    DeliveryAgent {
        id: id.to_string(),
        name: name.to_string(),
        phone: phone.to_string(),
        status,
    }
}

fn employee(id: &str, name: &str, hourly_rate: Decimal) -> Employee {
    Employee {
        id: id.to_string(),
        name: name.to_string(),
        hourly_rate,
        current_hours: 0.0,
    }
}

fn vendor(
    id: &str,
    name: &str,
    contact_person: &str,
    phone: &str,
    email: &str,
    products: &[&str],
) -> Vendor {
    Vendor {
        id: id.to_string(),
        name: name.to_string(),
        contact_person: contact_person.to_string(),
        phone: phone.to_string(),
        email: email.to_string(),
        products: products.iter().map(|p| p.to_string()).collect(),
    }
}
