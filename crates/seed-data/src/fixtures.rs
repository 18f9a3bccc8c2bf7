//! Placeholder dataset for the dashboard.
//!
//! Every row carries a pinned key so a second run lands on the
//! `ON CONFLICT DO NOTHING` path instead of duplicating rows.

use time::macros::date;
use uuid::{Uuid, uuid};

use dashboard::models::{Customer, Invoice, InvoiceStatus, Revenue};

/// A user as supplied to the seeder. The password is plaintext and is hashed
/// before it reaches the database.
#[derive(Debug, Clone)]
pub struct SeedUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Fixture rows for all four tables.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub users: Vec<SeedUser>,
    pub customers: Vec<Customer>,
    pub invoices: Vec<Invoice>,
    pub revenue: Vec<Revenue>,
}

impl Dataset {
    /// The placeholder data the dashboard ships with.
    pub fn placeholder() -> Self {
        let users = vec![SeedUser {
            id: uuid!("410544b2-4001-4271-9855-fec4b6a6442a"),
            name: "User".to_string(),
            email: "user@nextmail.com".to_string(),
            password: "123456".to_string(),
        }];

        let customers = vec![
            customer(
                uuid!("d6e15727-9fe1-4961-8c5b-ea44a9bd81aa"),
                "Evil Rabbit",
                "evil@rabbit.com",
                "/customers/evil-rabbit.png",
            ),
            customer(
                uuid!("3958dc9e-712f-4377-85e9-fec4b6a6442a"),
                "Delba de Oliveira",
                "delba@oliveira.com",
                "/customers/delba-de-oliveira.png",
            ),
            customer(
                uuid!("3958dc9e-742f-4377-85e9-fec4b6a6442a"),
                "Lee Robinson",
                "lee@robinson.com",
                "/customers/lee-robinson.png",
            ),
            customer(
                uuid!("76d65c26-f784-44a2-ac19-586678f7c2f2"),
                "Michael Novotny",
                "michael@novotny.com",
                "/customers/michael-novotny.png",
            ),
            customer(
                uuid!("cc27c14a-0acf-4f4a-a6c9-d45682c144b9"),
                "Amy Burns",
                "amy@burns.com",
                "/customers/amy-burns.png",
            ),
            customer(
                uuid!("13d07535-c59e-4157-a011-f8d2ef4e0cbb"),
                "Balazs Orban",
                "balazs@orban.com",
                "/customers/balazs-orban.png",
            ),
        ];

        use InvoiceStatus::{Paid, Pending};
        let c = |i: usize| customers[i].id;
        let invoices = vec![
            invoice(uuid!("b1a6a3c2-51d0-4f6e-9c1e-000000000001"), c(0), 15795, Pending, date!(2022 - 12 - 06)),
            invoice(uuid!("b1a6a3c2-51d0-4f6e-9c1e-000000000002"), c(1), 20348, Pending, date!(2022 - 11 - 14)),
            invoice(uuid!("b1a6a3c2-51d0-4f6e-9c1e-000000000003"), c(4), 3040, Paid, date!(2022 - 10 - 29)),
            invoice(uuid!("b1a6a3c2-51d0-4f6e-9c1e-000000000004"), c(3), 44800, Paid, date!(2023 - 09 - 10)),
            invoice(uuid!("b1a6a3c2-51d0-4f6e-9c1e-000000000005"), c(5), 34577, Pending, date!(2023 - 08 - 05)),
            invoice(uuid!("b1a6a3c2-51d0-4f6e-9c1e-000000000006"), c(2), 54246, Pending, date!(2023 - 07 - 16)),
            invoice(uuid!("b1a6a3c2-51d0-4f6e-9c1e-000000000007"), c(0), 666, Pending, date!(2023 - 06 - 27)),
            invoice(uuid!("b1a6a3c2-51d0-4f6e-9c1e-000000000008"), c(3), 32545, Paid, date!(2023 - 06 - 09)),
            invoice(uuid!("b1a6a3c2-51d0-4f6e-9c1e-000000000009"), c(4), 1250, Paid, date!(2023 - 06 - 17)),
            invoice(uuid!("b1a6a3c2-51d0-4f6e-9c1e-00000000000a"), c(5), 8546, Paid, date!(2023 - 06 - 07)),
            invoice(uuid!("b1a6a3c2-51d0-4f6e-9c1e-00000000000b"), c(1), 500, Paid, date!(2023 - 08 - 19)),
            invoice(uuid!("b1a6a3c2-51d0-4f6e-9c1e-00000000000c"), c(5), 8945, Paid, date!(2023 - 06 - 03)),
            invoice(uuid!("b1a6a3c2-51d0-4f6e-9c1e-00000000000d"), c(2), 1000, Paid, date!(2022 - 06 - 05)),
        ];

        let revenue = [
            ("Jan", 2000),
            ("Feb", 1800),
            ("Mar", 2200),
            ("Apr", 2500),
            ("May", 2300),
            ("Jun", 3200),
            ("Jul", 3500),
            ("Aug", 3700),
            ("Sep", 2500),
            ("Oct", 2800),
            ("Nov", 3000),
            ("Dec", 4800),
        ]
        .into_iter()
        .map(|(month, revenue)| Revenue {
            month: month.to_string(),
            revenue,
        })
        .collect();

        Self {
            users,
            customers,
            invoices,
            revenue,
        }
    }

    /// Total number of fixture rows across all tables.
    pub fn len(&self) -> usize {
        self.users.len() + self.customers.len() + self.invoices.len() + self.revenue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn customer(id: Uuid, name: &str, email: &str, image_url: &str) -> Customer {
    Customer {
        id,
        name: name.to_string(),
        email: email.to_string(),
        image_url: image_url.to_string(),
    }
}

fn invoice(
    id: Uuid,
    customer_id: Uuid,
    amount: i32,
    status: InvoiceStatus,
    date: time::Date,
) -> Invoice {
    Invoice {
        id,
        customer_id,
        amount,
        status,
        date,
    }
}
