//! IOC classifier: maps a vendor indicator type to a canonical entity.

use crate::types::{Entity, EntityKind, FileHashes};

/// Where an indicator value lands inside the entity block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntitySlot {
    Ip,
    Hostname,
    Sha256,
    Sha1,
    Md5,
}

static IOC_TYPES: phf::Map<&'static str, (EntityKind, EntitySlot)> = phf::phf_map! {
    "ip-dst" => (EntityKind::IpAddress, EntitySlot::Ip),
    "ip-src" => (EntityKind::IpAddress, EntitySlot::Ip),
    "domain" => (EntityKind::DomainName, EntitySlot::Hostname),
    "sha256" => (EntityKind::File, EntitySlot::Sha256),
    "sha1" => (EntityKind::File, EntitySlot::Sha1),
    "md5" => (EntityKind::File, EntitySlot::Md5),
};

/// A classified indicator, ready to be placed in the canonical event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    pub kind: EntityKind,
    pub slot: EntitySlot,
    pub value: String,
}

impl Indicator {
    pub fn into_entity(self) -> Entity {
        match self.slot {
            EntitySlot::Ip => Entity::Ip { ip: vec![self.value] },
            EntitySlot::Hostname => Entity::Hostname { hostname: self.value },
            EntitySlot::Sha256 => Entity::File {
                file: FileHashes { sha256: Some(self.value), ..Default::default() },
            },
            EntitySlot::Sha1 => Entity::File {
                file: FileHashes { sha1: Some(self.value), ..Default::default() },
            },
            EntitySlot::Md5 => Entity::File {
                file: FileHashes { md5: Some(self.value), ..Default::default() },
            },
        }
    }
}

/// Kind and slot for a vendor type string, if it is one we recognize.
pub fn lookup_type(ioc_type: &str) -> Option<(EntityKind, EntitySlot)> {
    IOC_TYPES.get(ioc_type).copied()
}

/// Classify an indicator. Unrecognized types and empty values yield `None`;
/// an event without an indicator is normal, not an error.
pub fn classify(ioc_type: &str, ioc_value: &str) -> Option<Indicator> {
    if ioc_value.is_empty() {
        return None;
    }
    let (kind, slot) = lookup_type(ioc_type)?;
    Some(Indicator { kind, slot, value: ioc_value.to_string() })
}
