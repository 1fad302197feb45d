//! Expense model
//!
//! An expense record went through two schema generations: the original
//! single-budget tracker stored `description`, while the shared two-person
//! tracker stores `note`, `person` and a payment mode. Every field apart from
//! the amount and category is therefore optional, and keys this version does
//! not know about are carried along untouched in `extra`.
//!
//! Decoding never fails on a field's value. A field that cannot be read
//! falls back to its default (`Other`, zero, no date), and the value exactly
//! as it was read is kept so the record is written back unchanged until that
//! field is edited.

use chrono::{DateTime, NaiveDate};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::ids::ExpenseId;
use super::money::Money;

/// Category used when none is given
pub const DEFAULT_CATEGORY: &str = "Other";

/// Payment mode used when none is given
pub const DEFAULT_PAYMENT_MODE: &str = "Cash";

/// Categories offered by default
pub const DEFAULT_CATEGORIES: [&str; 7] = [
    "Food",
    "Transport",
    "Entertainment",
    "Utilities",
    "Healthcare",
    "Shopping",
    "Other",
];

// Wire keys of the known fields; the first key is the one written for new
// values, later ones are older spellings.
const ID_KEYS: &[&str] = &["id"];
const DESCRIPTION_KEYS: &[&str] = &["description"];
const NOTE_KEYS: &[&str] = &["note"];
const AMOUNT_KEYS: &[&str] = &["amount"];
const CATEGORY_KEYS: &[&str] = &["category"];
const DATE_KEYS: &[&str] = &["date"];
const PERSON_KEYS: &[&str] = &["person"];
const PAYMENT_MODE_KEYS: &[&str] = &["paymentMode", "mode"];
const KIND_KEYS: &[&str] = &["type"];

/// Who paid for an expense in a shared tracker
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Person {
    #[default]
    Person1,
    Person2,
    /// Shared between both people
    Both,
    /// Any other payer name found in imported data
    Other(String),
}

impl Person {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Person1 => "Person1",
            Self::Person2 => "Person2",
            Self::Both => "Both",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for Person {
    fn from(raw: String) -> Self {
        let normalized: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "person1" => Self::Person1,
            "person2" => Self::Person2,
            "both" => Self::Both,
            _ => Self::Other(raw.trim().to_string()),
        }
    }
}

impl From<Person> for String {
    fn from(person: Person) -> Self {
        person.as_str().to_string()
    }
}

impl FromStr for Person {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which schema generation a record looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseSchema {
    /// Single-budget record: description, amount, category, date
    SingleBudget,
    /// Shared record with a payer and payment mode
    Shared,
}

/// Known fields exactly as they were read
///
/// Not part of a record's equality: two records are equal when their typed
/// fields are.
#[derive(Debug, Clone, Default)]
struct OriginalFields {
    values: Map<String, Value>,
    /// Set for records built from a JSON object, where an absent key stays
    /// absent when written back
    decoded: bool,
}

impl OriginalFields {
    fn entry<'a, 'k>(&'a self, keys: &[&'k str]) -> Option<(&'k str, &'a Value)> {
        keys.iter()
            .find_map(|key| self.values.get(*key).map(|value| (*key, value)))
    }

    fn is_absent(&self, keys: &[&str]) -> bool {
        self.decoded && self.entry(keys).is_none()
    }
}

impl PartialEq for OriginalFields {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

/// An expense record
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// Primary key, assigned by the store when absent
    pub id: Option<ExpenseId>,

    /// Description (single-budget records)
    pub description: Option<String>,

    /// Note (shared records)
    pub note: Option<String>,

    /// Amount spent
    pub amount: Money,

    /// Category name
    pub category: String,

    /// Date of the expense; `None` when absent or unreadable
    pub date: Option<NaiveDate>,

    /// Who paid
    pub person: Option<Person>,

    /// Payment mode (cash, card, UPI, ...)
    pub payment_mode: Option<String>,

    /// Free-form record type
    pub kind: Option<String>,

    /// Fields written by other versions of the tracker
    pub extra: Map<String, Value>,

    original: OriginalFields,
}

impl Expense {
    /// Create a new expense without an id
    pub fn new(amount: Money, category: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: None,
            description: None,
            note: None,
            amount,
            category: category.into(),
            date: Some(date),
            person: None,
            payment_mode: None,
            kind: None,
            extra: Map::new(),
            original: OriginalFields::default(),
        }
    }

    /// Create a shared-tracker expense with all common fields
    pub fn shared(
        amount: Money,
        category: impl Into<String>,
        date: NaiveDate,
        person: Person,
        payment_mode: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        let mut expense = Self::new(amount, category, date);
        expense.person = Some(person);
        expense.payment_mode = Some(payment_mode.into());
        expense.note = Some(note.into());
        expense
    }

    /// Build a record from a JSON object
    ///
    /// Field values that cannot be read fall back to defaults; the object's
    /// own values are kept and written back by `Serialize`.
    pub fn from_object(mut object: Map<String, Value>) -> Self {
        let mut original = OriginalFields {
            values: Map::new(),
            decoded: true,
        };
        let mut take = |keys: &[&str]| take_field(&mut object, &mut original.values, keys);

        let id = take(ID_KEYS).and_then(|v| read_id(&v));
        let description = take(DESCRIPTION_KEYS).and_then(|v| read_text(&v));
        let note = take(NOTE_KEYS).and_then(|v| read_text(&v));
        let amount = take(AMOUNT_KEYS).map_or_else(Money::zero, |v| read_amount(&v));
        let category = take(CATEGORY_KEYS).map_or_else(default_category, |v| read_category(&v));
        let date = take(DATE_KEYS).and_then(|v| read_date(&v));
        let person = take(PERSON_KEYS).and_then(|v| read_person(&v));
        let payment_mode = take(PAYMENT_MODE_KEYS).and_then(|v| read_text(&v));
        let kind = take(KIND_KEYS).and_then(|v| read_text(&v));

        Self {
            id,
            description,
            note,
            amount,
            category,
            date,
            person,
            payment_mode,
            kind,
            extra: object,
            original,
        }
    }

    /// Set the id (builder style)
    pub fn with_id(mut self, id: impl Into<ExpenseId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the description (builder style)
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the date from text (builder style)
    ///
    /// Text that is not a recognised date leaves the record undated but is
    /// kept, and shows up in [`Expense::date_text`] and in JSON output.
    pub fn with_date_text(mut self, raw: &str) -> Self {
        self.date = parse_date(raw);
        if self.date.is_none() && !raw.trim().is_empty() {
            self.original
                .values
                .insert(DATE_KEYS[0].to_string(), Value::String(raw.to_string()));
        }
        self
    }

    /// The date for display: `YYYY-MM-DD`, or the unreadable text it was
    /// given as
    pub fn date_text(&self) -> Option<String> {
        if let Some(date) = self.date {
            return Some(date.format("%Y-%m-%d").to_string());
        }
        match self.original.entry(DATE_KEYS) {
            Some((_, Value::String(raw))) if !raw.trim().is_empty() => Some(raw.clone()),
            _ => None,
        }
    }

    /// The human-readable text of the record: note, else description
    pub fn memo(&self) -> &str {
        self.note
            .as_deref()
            .or(self.description.as_deref())
            .unwrap_or("")
    }

    /// Detect which schema generation this record belongs to
    pub fn schema(&self) -> ExpenseSchema {
        if self.person.is_some() || self.payment_mode.is_some() || self.note.is_some() {
            ExpenseSchema::Shared
        } else {
            ExpenseSchema::SingleBudget
        }
    }

    /// Check whether the record falls inside an inclusive date window
    pub fn is_within(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
        if start.is_none() && end.is_none() {
            return true;
        }
        match self.date {
            Some(date) => start.map_or(true, |s| date >= s) && end.map_or(true, |e| date <= e),
            None => false,
        }
    }

    /// Compare ignoring ids
    pub fn same_content(&self, other: &Expense) -> bool {
        Expense {
            id: None,
            ..self.clone()
        } == Expense {
            id: None,
            ..other.clone()
        }
    }
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Move the first present key out of `object`, remembering it in `original`
fn take_field(
    object: &mut Map<String, Value>,
    original: &mut Map<String, Value>,
    keys: &[&str],
) -> Option<Value> {
    let (key, value) = keys
        .iter()
        .find_map(|key| object.remove(*key).map(|value| (*key, value)))?;
    original.insert(key.to_string(), value.clone());
    Some(value)
}

fn read_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn read_id(value: &Value) -> Option<ExpenseId> {
    read_text(value)
        .filter(|id| !id.is_empty())
        .map(ExpenseId::new)
}

fn read_amount(value: &Value) -> Money {
    let parsed = match value {
        Value::Number(n) => n.as_f64().and_then(|v| Money::from_f64(v).ok()),
        Value::String(s) => Money::parse(s).ok(),
        _ => None,
    };
    parsed.unwrap_or_default()
}

fn read_category(value: &Value) -> String {
    read_text(value).unwrap_or_else(default_category)
}

fn read_date(value: &Value) -> Option<NaiveDate> {
    value.as_str().and_then(parse_date)
}

fn read_person(value: &Value) -> Option<Person> {
    read_text(value).map(Person::from)
}

/// Write a field: the value as read when it still says the same thing,
/// else `current`
fn write_field<M, T>(
    map: &mut M,
    original: &OriginalFields,
    keys: &[&str],
    unchanged: impl Fn(&Value) -> bool,
    current: Option<&T>,
) -> Result<(), M::Error>
where
    M: SerializeMap,
    T: Serialize + ?Sized,
{
    if let Some((key, raw)) = original.entry(keys) {
        if unchanged(raw) {
            return map.serialize_entry(key, raw);
        }
    }
    match current {
        Some(value) => map.serialize_entry(keys[0], value),
        None => Ok(()),
    }
}

impl Serialize for Expense {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let original = &self.original;
        let mut map = serializer.serialize_map(None)?;

        write_field(
            &mut map,
            original,
            ID_KEYS,
            |raw| read_id(raw) == self.id,
            self.id.as_ref(),
        )?;
        write_field(
            &mut map,
            original,
            DESCRIPTION_KEYS,
            |raw| read_text(raw) == self.description,
            self.description.as_ref(),
        )?;
        write_field(
            &mut map,
            original,
            NOTE_KEYS,
            |raw| read_text(raw) == self.note,
            self.note.as_ref(),
        )?;

        let amount = !(original.is_absent(AMOUNT_KEYS) && self.amount.is_zero());
        write_field(
            &mut map,
            original,
            AMOUNT_KEYS,
            |raw| read_amount(raw) == self.amount,
            amount.then_some(&self.amount),
        )?;

        let category =
            !(original.is_absent(CATEGORY_KEYS) && self.category == DEFAULT_CATEGORY);
        write_field(
            &mut map,
            original,
            CATEGORY_KEYS,
            |raw| read_category(raw) == self.category,
            category.then_some(&self.category),
        )?;

        let date = self.date.map(|d| d.format("%Y-%m-%d").to_string());
        write_field(
            &mut map,
            original,
            DATE_KEYS,
            |raw| read_date(raw) == self.date,
            date.as_ref(),
        )?;
        write_field(
            &mut map,
            original,
            PERSON_KEYS,
            |raw| read_person(raw) == self.person,
            self.person.as_ref(),
        )?;
        write_field(
            &mut map,
            original,
            PAYMENT_MODE_KEYS,
            |raw| read_text(raw) == self.payment_mode,
            self.payment_mode.as_ref(),
        )?;
        write_field(
            &mut map,
            original,
            KIND_KEYS,
            |raw| read_text(raw) == self.kind,
            self.kind.as_ref(),
        )?;

        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Expense {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::<String, Value>::deserialize(deserializer).map(Self::from_object)
    }
}

/// Parse a date in any of the formats older exports used
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `MM/DD/YYYY` and RFC 3339 timestamps.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for format in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.date_naive())
}
