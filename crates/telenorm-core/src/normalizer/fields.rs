//! Canonical field paths addressable by rules.

/// What a canonical field holds, which decides the actions allowed on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    List,
    Timestamp,
    Severity,
    AuthStatus,
    EventType,
}

impl FieldKind {
    pub fn is_enum(self) -> bool {
        matches!(self, FieldKind::Severity | FieldKind::AuthStatus | FieldKind::EventType)
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::List => "list",
            FieldKind::Timestamp => "timestamp",
            FieldKind::Severity => "severity",
            FieldKind::AuthStatus => "authentication status",
            FieldKind::EventType => "event type",
        }
    }
}

/// Canonical block a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    Metadata,
    Principal,
    SecurityResult,
    Threat,
}

macro_rules! canonical_fields {
    ($($variant:ident => $path:literal, $kind:ident, $block:ident;)+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum CanonicalField {
            $($variant,)+
        }

        impl CanonicalField {
            pub const ALL: &'static [CanonicalField] = &[$(CanonicalField::$variant,)+];

            pub fn path(self) -> &'static str {
                match self {
                    $(CanonicalField::$variant => $path,)+
                }
            }

            pub fn kind(self) -> FieldKind {
                match self {
                    $(CanonicalField::$variant => FieldKind::$kind,)+
                }
            }

            pub fn block(self) -> Block {
                match self {
                    $(CanonicalField::$variant => Block::$block,)+
                }
            }
        }
    };
}

canonical_fields! {
    VendorName => "metadata.vendor_name", Text, Metadata;
    ProductName => "metadata.product_name", Text, Metadata;
    EventType => "metadata.event_type", EventType, Metadata;
    ProductEventType => "metadata.product_event_type", Text, Metadata;
    ProductEntityId => "metadata.product_entity_id", Text, Metadata;
    Description => "metadata.description", Text, Metadata;
    EventTimestamp => "metadata.event_timestamp", Timestamp, Metadata;
    CollectedTimestamp => "metadata.collected_timestamp", Timestamp, Metadata;
    IntervalStart => "metadata.interval.start_time", Timestamp, Metadata;
    IntervalEnd => "metadata.interval.end_time", Timestamp, Metadata;
    PrincipalEmail => "principal.email", Text, Principal;
    PrincipalHostname => "principal.hostname", Text, Principal;
    UserId => "principal.user.userid", Text, Principal;
    UserAuthenticationStatus => "principal.user.user_authentication_status", AuthStatus, Principal;
    SecuritySeverity => "security_result.severity", Severity, SecurityResult;
    SecuritySummary => "security_result.summary", Text, SecurityResult;
    SecurityDescription => "security_result.description", Text, SecurityResult;
    SecurityCategoryDetails => "security_result.category_details", List, SecurityResult;
    ThreatId => "threat.threat_id", Text, Threat;
    ThreatFeedName => "threat.threat_feed_name", Text, Threat;
    ThreatUrl => "threat.url_back_to_product", Text, Threat;
    ThreatCategoryDetails => "threat.category_details", List, Threat;
    ThreatSeverity => "threat.severity", Severity, Threat;
    ThreatSeverityDetails => "threat.severity_details", Text, Threat;
}

impl std::str::FromStr for CanonicalField {
    type Err = ();

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        CanonicalField::ALL.iter().copied().find(|f| f.path() == path).ok_or(())
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}
