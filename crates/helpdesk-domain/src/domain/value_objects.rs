//! Helpdesk value objects
//!
//! Status and priority travel as integers, roles as names and SLA durations as
//! `HH:MM:SS` strings. Codes the client does not know are kept rather than
//! rejected so a single odd ticket never breaks a whole listing.

use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Resource identifier. The API is not consistent about numeric and string
/// ids, so the id is echoed back in the form it arrived.
///
/// Equality, hashing and ordering go by the id's text: `Number(1)` and
/// `Text("1")` name the same resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(i64),
    Text(String),
}

impl Id {
    /// Parse user input, preferring the numeric form.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        raw.parse::<i64>()
            .map(Id::Number)
            .unwrap_or_else(|_| Id::Text(raw.to_string()))
    }

    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Id::Number(n) => Cow::Owned(n.to_string()),
            Id::Text(s) => Cow::Borrowed(s),
        }
    }

    fn as_number(&self) -> Option<i64> {
        match self {
            Id::Number(n) => Some(*n),
            Id::Text(s) => s.parse().ok(),
        }
    }
}

impl PartialEq for Id {
    fn eq(&self, other: &Self) -> bool {
        self.as_text() == other.as_text()
    }
}

impl Eq for Id {}

impl Hash for Id {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_text().hash(state);
    }
}

impl Ord for Id {
    /// Numeric ids in numeric order; ties broken by text.
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_number()
            .cmp(&other.as_number())
            .then_with(|| self.as_text().cmp(&other.as_text()))
    }
}

impl PartialOrd for Id {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Id {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<i64> for Id {
    fn from(id: i64) -> Self {
        Id::Number(id)
    }
}

impl From<&str> for Id {
    fn from(id: &str) -> Self {
        Id::parse(id)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{}", n),
            Id::Text(s) => write!(f, "{}", s),
        }
    }
}

// =============================================================================
// Ticket status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Canceled,
    Unknown(i32),
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Canceled,
    ];

    pub fn code(self) -> i32 {
        match self {
            TicketStatus::Open => 1,
            TicketStatus::InProgress => 2,
            TicketStatus::Resolved => 3,
            TicketStatus::Canceled => 4,
            TicketStatus::Unknown(code) => code,
        }
    }

    /// Open or in progress.
    pub fn is_active(self) -> bool {
        matches!(self, TicketStatus::Open | TicketStatus::InProgress)
    }

    /// Resolved or canceled.
    pub fn is_closed(self) -> bool {
        matches!(self, TicketStatus::Resolved | TicketStatus::Canceled)
    }
}

impl From<i32> for TicketStatus {
    fn from(code: i32) -> Self {
        match code {
            1 => TicketStatus::Open,
            2 => TicketStatus::InProgress,
            3 => TicketStatus::Resolved,
            4 => TicketStatus::Canceled,
            other => TicketStatus::Unknown(other),
        }
    }
}

impl From<TicketStatus> for i32 {
    fn from(status: TicketStatus) -> Self {
        status.code()
    }
}

impl FromStr for TicketStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "open" | "aberto" => Ok(TicketStatus::Open),
            "2" | "in-progress" | "in_progress" | "inprogress" | "em-andamento" => {
                Ok(TicketStatus::InProgress)
            }
            "3" | "resolved" | "resolvido" => Ok(TicketStatus::Resolved),
            "4" | "canceled" | "cancelled" | "cancelado" => Ok(TicketStatus::Canceled),
            _ => Err(DomainError::UnknownStatus(s.to_string())),
        }
    }
}

// =============================================================================
// Priority
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum Priority {
    Low,
    Medium,
    High,
    Unknown(i32),
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn code(self) -> i32 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
            Priority::Unknown(code) => code,
        }
    }
}

impl From<i32> for Priority {
    fn from(code: i32) -> Self {
        match code {
            1 => Priority::Low,
            2 => Priority::Medium,
            3 => Priority::High,
            other => Priority::Unknown(other),
        }
    }
}

impl From<Priority> for i32 {
    fn from(priority: Priority) -> Self {
        priority.code()
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "low" | "baixa" => Ok(Priority::Low),
            "2" | "medium" | "media" | "média" => Ok(Priority::Medium),
            "3" | "high" | "alta" => Ok(Priority::High),
            _ => Err(DomainError::UnknownPriority(s.to_string())),
        }
    }
}

// =============================================================================
// Role
// =============================================================================

/// Role names as stored by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    /// Support agent
    Atendente,
    Usuario,
    Other(String),
}

impl Role {
    pub const KNOWN: [Role; 3] = [Role::Admin, Role::Atendente, Role::Usuario];

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "Admin",
            Role::Atendente => "Atendente",
            Role::Usuario => "Usuario",
            Role::Other(name) => name,
        }
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "admin" => Role::Admin,
            "atendente" | "attendant" | "agent" => Role::Atendente,
            "usuario" | "usuário" | "user" => Role::Usuario,
            _ => Role::Other(name.trim().to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        Role::from(name.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// SLA duration
// =============================================================================

/// SLA duration in `HH:MM:SS` form, with an optional leading day part
/// (`D.HH:MM:SS`) and optional fractional seconds.
///
/// # Invariants
/// - minutes and seconds are below 60
/// - hours are below 24 when a day part is present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlaDuration {
    days: u32,
    hours: u32,
    minutes: u32,
    seconds: u32,
    nanos: u32,
}

impl SlaDuration {
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Result<Self, DomainError> {
        if minutes > 59 || seconds > 59 {
            return Err(DomainError::InvalidSla(format!(
                "{:02}:{:02}:{:02}",
                hours, minutes, seconds
            )));
        }
        Ok(Self {
            days: 0,
            hours,
            minutes,
            seconds,
            nanos: 0,
        })
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// Hours including the day part.
    pub fn total_hours(&self) -> i64 {
        i64::from(self.days) * 24 + i64::from(self.hours)
    }

    pub fn minutes(&self) -> i64 {
        i64::from(self.minutes)
    }

    pub fn seconds(&self) -> i64 {
        i64::from(self.seconds)
    }

    pub fn subsec_nanos(&self) -> i64 {
        i64::from(self.nanos)
    }
}

fn digits(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn fraction_nanos(part: &str) -> Option<u32> {
    if part.is_empty() || part.len() > 9 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    format!("{:0<9}", part).parse().ok()
}

impl FromStr for SlaDuration {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidSla(s.to_string());

        let mut parts = s.trim().split(':');
        let (head, minutes, seconds) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(h), Some(m), Some(sec), None) => (h, m, sec),
            _ => return Err(invalid()),
        };

        let (days, hours) = match head.split_once('.') {
            Some((d, h)) => (digits(d).ok_or_else(invalid)?, digits(h).ok_or_else(invalid)?),
            None => (0, digits(head).ok_or_else(invalid)?),
        };
        let minutes = digits(minutes).ok_or_else(invalid)?;
        let (seconds, nanos) = match seconds.split_once('.') {
            Some((sec, frac)) => (
                digits(sec).ok_or_else(invalid)?,
                fraction_nanos(frac).ok_or_else(invalid)?,
            ),
            None => (digits(seconds).ok_or_else(invalid)?, 0),
        };

        if minutes > 59 || seconds > 59 || (days > 0 && hours > 23) {
            return Err(invalid());
        }

        Ok(Self {
            days,
            hours,
            minutes,
            seconds,
            nanos,
        })
    }
}

impl TryFrom<String> for SlaDuration {
    type Error = DomainError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SlaDuration> for String {
    fn from(sla: SlaDuration) -> Self {
        sla.to_string()
    }
}

impl fmt::Display for SlaDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.days > 0 {
            write!(f, "{}.", self.days)?;
        }
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)?;
        if self.nanos > 0 {
            let frac = format!("{:09}", self.nanos);
            write!(f, ".{}", frac.trim_end_matches('0'))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(TicketStatus::from(3), TicketStatus::Resolved);
        assert_eq!(TicketStatus::from(9), TicketStatus::Unknown(9));
        assert!(TicketStatus::InProgress.is_active());
        assert!(TicketStatus::Canceled.is_closed());
        assert!(!TicketStatus::Unknown(9).is_active());
        assert_eq!("em-andamento".parse::<TicketStatus>().unwrap(), TicketStatus::InProgress);
        assert!("reopened".parse::<TicketStatus>().is_err());
    }

    #[test]
    fn test_status_wire_form() {
        let status: TicketStatus = serde_json::from_str("2").unwrap();
        assert_eq!(status, TicketStatus::InProgress);
        assert_eq!(serde_json::to_string(&TicketStatus::Canceled).unwrap(), "4");
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!("Alta".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("2".parse::<Priority>().unwrap(), Priority::Medium);
        assert_eq!(Priority::from(7).code(), 7);
    }

    #[test]
    fn test_role_names() {
        let roles: Vec<Role> = serde_json::from_str(r#"["Admin","atendente","Auditor"]"#).unwrap();
        assert_eq!(roles, vec![Role::Admin, Role::Atendente, Role::Other("Auditor".into())]);
        assert_eq!(serde_json::to_string(&Role::Usuario).unwrap(), r#""Usuario""#);
    }

    #[test]
    fn test_id_keeps_wire_form() {
        let ids: Vec<Id> = serde_json::from_str(r#"[42, "a1b2"]"#).unwrap();
        assert_eq!(ids, vec![Id::Number(42), Id::Text("a1b2".into())]);
        assert_eq!(serde_json::to_string(&Id::parse("42")).unwrap(), "42");
        assert_eq!(Id::parse("a1b2").to_string(), "a1b2");
    }

    #[test]
    fn test_id_matches_across_wire_forms() {
        use std::collections::HashSet;

        let typed: Id = "1".parse().unwrap();
        let served: Id = serde_json::from_str(r#""1""#).unwrap();
        assert!(matches!(served, Id::Text(_)));
        assert_eq!(typed, served);
        assert_eq!(serde_json::to_string(&served).unwrap(), r#""1""#);

        let set: HashSet<Id> = [served].into_iter().collect();
        assert!(set.contains(&Id::Number(1)));
        assert_ne!(Id::Number(1), Id::Text("01".into()));

        let mut ids = vec![Id::Number(10), Id::Text("9".into()), Id::Number(2)];
        ids.sort();
        assert_eq!(ids, vec![Id::Number(2), Id::Number(9), Id::Number(10)]);
    }

    #[test]
    fn test_sla_parse_plain() {
        let sla: SlaDuration = "04:30:15".parse().unwrap();
        assert_eq!(sla.total_hours(), 4);
        assert_eq!(sla.minutes(), 30);
        assert_eq!(sla.seconds(), 15);
        assert_eq!(sla.to_string(), "04:30:15");
    }

    #[test]
    fn test_sla_parse_day_part_and_fraction() {
        let sla: SlaDuration = "1.02:00:00".parse().unwrap();
        assert_eq!(sla.total_hours(), 26);
        assert_eq!(sla.to_string(), "1.02:00:00");

        let sla: SlaDuration = "00:00:01.5".parse().unwrap();
        assert_eq!(sla.subsec_nanos(), 500_000_000);
        assert_eq!(sla.to_string(), "00:00:01.5");
    }

    #[test]
    fn test_sla_long_hours_without_day_part() {
        let sla: SlaDuration = "72:00:00".parse().unwrap();
        assert_eq!(sla.total_hours(), 72);
    }

    #[test]
    fn test_sla_rejects_malformed() {
        for bad in ["", "12:00", "aa:00:00", "00:60:00", "00:00:75", "1.25:00:00", "-1:00:00", "1:2:3:4"] {
            assert!(bad.parse::<SlaDuration>().is_err(), "accepted {bad:?}");
        }
    }
}
