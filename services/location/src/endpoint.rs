use crate::constants::{SERVICE_CONSOLIDATED, SERVICE_STANDALONE_MAPS, STANDALONE_VERSION_MARKER};
use geosign_core::SigningRequest;

/// Caller-supplied classification of what a map URL points to.
///
/// Used to decide whether signing is required for the standalone maps API,
/// which only authenticates tile bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Style descriptor document.
    Style,
    /// Sprite sheet JSON.
    SpriteJson,
    /// Glyph set.
    Glyphs,
    /// Map tile bytes.
    Tile,
}

/// The API family a signable URL belongs to, carrying its own service
/// identifier and signing predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceFamily {
    /// Standalone maps API (path starts with the `v2` version marker).
    ///
    /// Only tile requests carry authentication; descriptor, sprite and glyph
    /// metadata is public.
    StandaloneMaps,
    /// Consolidated location API (no version marker). Authenticates uniformly.
    ConsolidatedLocation,
}

impl ServiceFamily {
    /// The service identifier used in the credential scope.
    pub fn service_name(&self) -> &'static str {
        match self {
            ServiceFamily::StandaloneMaps => SERVICE_STANDALONE_MAPS,
            ServiceFamily::ConsolidatedLocation => SERVICE_CONSOLIDATED,
        }
    }

    /// Whether a request for the given resource kind must be signed.
    pub fn requires_signing(&self, kind: Option<ResourceKind>) -> bool {
        match self {
            ServiceFamily::StandaloneMaps => kind == Some(ResourceKind::Tile),
            ServiceFamily::ConsolidatedLocation => true,
        }
    }
}

/// Decide whether a URL belongs to the map service at all, and if so which
/// API family applies.
///
/// Returns `None` for any URL outside the signing hosts; such URLs pass
/// through unsigned.
pub fn resolve(req: &SigningRequest) -> Option<ServiceFamily> {
    if req.scheme.as_str() != "https" {
        return None;
    }
    if !is_signing_host(req.authority.host()) {
        return None;
    }

    let family = match req.path.split('/').find(|s| !s.is_empty()) {
        Some(STANDALONE_VERSION_MARKER) => ServiceFamily::StandaloneMaps,
        _ => ServiceFamily::ConsolidatedLocation,
    };

    Some(family)
}

/// Match `maps.geo.<region>.amazonaws.com`, `maps.geo-fips.<region>.amazonaws.com`,
/// and their dual-stack equivalents ending `.api.aws`.
fn is_signing_host(host: &str) -> bool {
    let Some(rest) = host
        .strip_prefix("maps.geo.")
        .or_else(|| host.strip_prefix("maps.geo-fips."))
    else {
        return false;
    };

    let Some(region) = rest
        .strip_suffix(".amazonaws.com")
        .or_else(|| rest.strip_suffix(".api.aws"))
    else {
        return false;
    };

    !region.is_empty()
        && region
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn parse(url: &str) -> SigningRequest {
        SigningRequest::from_url(url).expect("url must parse")
    }

    #[test_case("https://maps.geo.us-west-2.amazonaws.com/v2/tiles", Some(ServiceFamily::StandaloneMaps); "standalone")]
    #[test_case("https://maps.geo.us-west-2.amazonaws.com/maps/v0/maps/TestMapName", Some(ServiceFamily::ConsolidatedLocation); "consolidated")]
    #[test_case("https://maps.geo-fips.us-gov-west-1.amazonaws.com/", Some(ServiceFamily::ConsolidatedLocation); "govcloud")]
    #[test_case("https://maps.geo.us-west-2.api.aws/maps/v0/maps/TestMapName", Some(ServiceFamily::ConsolidatedLocation); "dual stack")]
    #[test_case("https://maps.geo.us-west-2.api.aws/v2/styles", Some(ServiceFamily::StandaloneMaps); "dual stack standalone")]
    #[test_case("https://example.com/", None; "unrelated host")]
    #[test_case("https://my.cool.service.us-west-2.amazonaws.com/", None; "other aws host")]
    #[test_case("http://maps.geo.us-west-2.amazonaws.com/v2/tiles", None; "plain http")]
    #[test_case("https://maps.geo..amazonaws.com/", None; "empty region")]
    #[test_case("https://maps.geo.us-west-2.amazonaws.com.evil.example/", None; "suffixed host")]
    fn test_resolve(url: &str, expected: Option<ServiceFamily>) {
        assert_eq!(resolve(&parse(url)), expected);
    }

    #[test]
    fn test_standalone_signs_tiles_only() {
        let family = ServiceFamily::StandaloneMaps;
        assert!(family.requires_signing(Some(ResourceKind::Tile)));
        assert!(!family.requires_signing(Some(ResourceKind::Style)));
        assert!(!family.requires_signing(Some(ResourceKind::SpriteJson)));
        assert!(!family.requires_signing(Some(ResourceKind::Glyphs)));
        assert!(!family.requires_signing(None));
    }

    #[test]
    fn test_consolidated_signs_everything() {
        let family = ServiceFamily::ConsolidatedLocation;
        for kind in [
            None,
            Some(ResourceKind::Style),
            Some(ResourceKind::SpriteJson),
            Some(ResourceKind::Glyphs),
            Some(ResourceKind::Tile),
        ] {
            assert!(family.requires_signing(kind));
        }
    }

    #[test]
    fn test_service_names() {
        assert_eq!(ServiceFamily::StandaloneMaps.service_name(), "geo-maps");
        assert_eq!(ServiceFamily::ConsolidatedLocation.service_name(), "geo");
    }
}
