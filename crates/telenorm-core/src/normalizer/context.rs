//! Per-record intermediate context.
//!
//! Rules write into an [`IntermediateContext`]; once every rule has run it is
//! assembled into the fixed [`CanonicalEvent`] shape and discarded.

use super::enums::CanonicalEnum;
use super::fields::{Block, CanonicalField, FieldKind};
use super::ioc::Indicator;
use crate::types::{
    AuthenticationStatus, CanonicalEvent, EventType, Interval, Metadata, Principal, SecurityResult, Severity,
    ThreatDetail, User,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Text(String),
    List(Vec<String>),
    Instant(DateTime<Utc>),
}

/// Field-path to value accumulator for one record.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IntermediateContext {
    values: BTreeMap<CanonicalField, Slot>,
    indicator: Option<Indicator>,
}

impl IntermediateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins. On a list field the list is replaced.
    pub fn replace(&mut self, field: CanonicalField, values: Vec<String>) {
        let slot = match field.kind() {
            FieldKind::List => Slot::List(values),
            _ => match values.into_iter().next() {
                Some(first) => Slot::Text(first),
                None => return,
            },
        };
        self.values.insert(field, slot);
    }

    /// Extend the ordered sequence at `field`. Duplicates are kept.
    pub fn append(&mut self, field: CanonicalField, values: Vec<String>) {
        if values.is_empty() {
            return;
        }
        match self.values.entry(field).or_insert_with(|| Slot::List(Vec::new())) {
            Slot::List(list) => list.extend(values),
            other => *other = Slot::List(values),
        }
    }

    pub fn set_instant(&mut self, field: CanonicalField, instant: DateTime<Utc>) {
        self.values.insert(field, Slot::Instant(instant));
    }

    /// Replace the indicator; the last classified indicator wins.
    pub fn set_indicator(&mut self, indicator: Indicator) {
        self.indicator = Some(indicator);
    }

    pub fn text(&self, field: CanonicalField) -> Option<&str> {
        match self.values.get(&field) {
            Some(Slot::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn list(&self, field: CanonicalField) -> &[String] {
        match self.values.get(&field) {
            Some(Slot::List(l)) => l,
            _ => &[],
        }
    }

    pub fn instant(&self, field: CanonicalField) -> Option<DateTime<Utc>> {
        match self.values.get(&field) {
            Some(Slot::Instant(t)) => Some(*t),
            _ => None,
        }
    }

    pub fn indicator(&self) -> Option<&Indicator> {
        self.indicator.as_ref()
    }

    fn touched(&self, block: Block) -> bool {
        self.values.keys().any(|f| f.block() == block)
    }

    fn owned_text(&self, field: CanonicalField) -> String {
        self.text(field).unwrap_or_default().to_string()
    }

    fn enum_value<E: CanonicalEnum>(&self, field: CanonicalField) -> E {
        self.text(field).map(E::from_code).unwrap_or(E::UNKNOWN)
    }

    /// Build the canonical event. `vendor_name`/`product_name` fill in when
    /// the context holds no non-empty value for them.
    pub fn assemble(self, vendor_name: &str, product_name: &str) -> CanonicalEvent {
        use CanonicalField as F;

        let non_empty_or = |field: F, fallback: &str| match self.text(field) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => fallback.to_string(),
        };

        let start_time = self.instant(F::IntervalStart);
        let end_time = self.instant(F::IntervalEnd);
        let interval = (start_time.is_some() || end_time.is_some()).then_some(Interval { start_time, end_time });

        let metadata = Metadata {
            vendor_name: non_empty_or(F::VendorName, vendor_name),
            product_name: non_empty_or(F::ProductName, product_name),
            event_type: self.enum_value::<EventType>(F::EventType),
            product_event_type: self.owned_text(F::ProductEventType),
            product_entity_id: self.owned_text(F::ProductEntityId),
            description: self.owned_text(F::Description),
            event_timestamp: self.instant(F::EventTimestamp),
            collected_timestamp: self.instant(F::CollectedTimestamp),
            interval,
            entity_type: self.indicator.as_ref().map(|i| i.kind),
        };

        let principal = Principal {
            email: self.owned_text(F::PrincipalEmail),
            hostname: self.owned_text(F::PrincipalHostname),
            user: User {
                userid: self.owned_text(F::UserId),
                user_authentication_status: self.enum_value::<AuthenticationStatus>(F::UserAuthenticationStatus),
            },
        };

        let security_result = self.touched(Block::SecurityResult).then(|| SecurityResult {
            severity: self.enum_value::<Severity>(F::SecuritySeverity),
            summary: self.owned_text(F::SecuritySummary),
            description: self.owned_text(F::SecurityDescription),
            category_details: self.list(F::SecurityCategoryDetails).to_vec(),
        });

        let threat = self.touched(Block::Threat).then(|| ThreatDetail {
            threat_id: self.owned_text(F::ThreatId),
            threat_feed_name: self.owned_text(F::ThreatFeedName),
            url_back_to_product: self.owned_text(F::ThreatUrl),
            category_details: self.list(F::ThreatCategoryDetails).to_vec(),
            severity: self.enum_value::<Severity>(F::ThreatSeverity),
            severity_details: self.owned_text(F::ThreatSeverityDetails),
        });

        CanonicalEvent {
            metadata,
            principal,
            security_result,
            entity: self.indicator.map(Indicator::into_entity),
            threat,
        }
    }
}
