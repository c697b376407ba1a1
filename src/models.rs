use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A friend record as stored by the backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Friend {
    /// Server-assigned identifier. The backend names it `_id`; plain `id`
    /// is accepted as well.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    /// Avatar URI
    pub image: String,
    /// Positive: the friend owes the user. Negative: the user owes the friend.
    #[serde(default)]
    pub balance: f64,
}

impl Friend {
    pub fn standing(&self) -> Standing {
        if self.balance < 0.0 {
            Standing::UserOwes(self.balance.abs())
        } else if self.balance > 0.0 {
            Standing::FriendOwes(self.balance)
        } else {
            Standing::Even
        }
    }
}

/// Who owes whom, derived from a friend's balance
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Standing {
    UserOwes(f64),
    FriendOwes(f64),
    Even,
}

/// Body of a create request. The id is provisional; the backend may replace it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewFriend {
    pub id: String,
    pub name: String,
    pub image: String,
    pub balance: f64,
}

impl NewFriend {
    /// Build a candidate from form input. Returns `None` when the name or
    /// image is blank.
    pub fn from_form(name: &str, image: &str) -> Option<NewFriend> {
        let name = name.trim();
        let image = image.trim();
        if name.is_empty() || image.is_empty() {
            return None;
        }

        let id = provisional_id();
        Some(NewFriend {
            // Suffix keeps identical avatar URLs from sharing a cached image
            image: format!("{}?={}", image, id),
            id,
            name: name.to_string(),
            balance: 0.0,
        })
    }
}

/// Body of a balance update
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BalanceUpdate {
    pub balance: f64,
}

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Locally generated identifier, unique within the process
pub fn provisional_id() -> String {
    let now = chrono::Utc::now();
    let nanos = now.timestamp_nanos_opt().unwrap_or_else(|| now.timestamp_micros() * 1000);
    let seq = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{:x}-{:04x}", nanos, seq)
}

/// Who paid the bill
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Payer {
    #[default]
    User,
    Friend,
}

impl Payer {
    pub fn toggle(&self) -> Payer {
        match self {
            Payer::User => Payer::Friend,
            Payer::Friend => Payer::User,
        }
    }
}

/// Split-bill form values
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BillSplit {
    pub bill: Option<f64>,
    pub paid_by_user: Option<f64>,
    pub payer: Payer,
}

impl BillSplit {
    /// The friend's share of the bill, `None` while no bill is entered
    pub fn friend_expense(&self) -> Option<f64> {
        self.bill.map(|bill| bill - self.paid_by_user.unwrap_or(0.0))
    }

    /// Signed adjustment to the friend's balance.
    ///
    /// `None` when the bill or the user's expense is missing or zero.
    pub fn delta(&self) -> Option<f64> {
        let bill = self.bill.filter(|b| *b != 0.0)?;
        let paid = self.paid_by_user.filter(|p| *p != 0.0)?;
        match self.payer {
            Payer::User => Some(bill - paid),
            Payer::Friend => Some(-paid),
        }
    }

    /// Whether `paid` is acceptable as the user's expense. A missing bill
    /// counts as zero.
    pub fn accepts_paid(&self, paid: Option<f64>) -> bool {
        paid.unwrap_or(0.0) <= self.bill.unwrap_or(0.0)
    }

    /// Set the bill, pulling the user's expense down if it now exceeds it
    pub fn set_bill(&mut self, bill: Option<f64>) {
        self.bill = bill;
        if let Some(paid) = self.paid_by_user {
            let cap = bill.unwrap_or(0.0);
            if paid > cap {
                self.paid_by_user = Some(cap);
            }
        }
    }
}

/// Parse a numeric form field. Empty input is `None`.
pub fn parse_amount(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format an amount without a trailing `.0` for whole values
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value)
    } else {
        format!("{:.2}", value)
    }
}
