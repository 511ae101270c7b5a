use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::temporal::CreatedAt;

/// Application identifier, domain 1–9.
///
/// The lower bound is load-bearing: the application digit leads the decimal
/// concatenation inside a token, so a non-zero value guarantees the encoded
/// integer never loses its leading digit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AppId(u8);

impl AppId {
    /// Validate and wrap an application id.
    pub fn new(value: u8) -> Result<Self, TypeError> {
        if !(1..=9).contains(&value) {
            return Err(TypeError::InvalidAppId { value });
        }
        Ok(Self(value))
    }

    /// The raw digit.
    pub fn get(&self) -> u8 {
        self.0
    }
}

/// Resource variant identifier, domain 0–9 (e.g. master vs thumbnail).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariantId(u8);

impl VariantId {
    /// Validate and wrap a variant id.
    pub fn new(value: u8) -> Result<Self, TypeError> {
        if value > 9 {
            return Err(TypeError::InvalidVariantId { value });
        }
        Ok(Self(value))
    }

    /// The raw digit.
    pub fn get(&self) -> u8 {
        self.0
    }
}

/// Owner identifier, strictly positive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerId(u64);

impl OwnerId {
    /// Validate and wrap an owner id.
    pub fn new(value: u64) -> Result<Self, TypeError> {
        if value == 0 {
            return Err(TypeError::InvalidOwnerId { value });
        }
        Ok(Self(value))
    }

    /// The raw id.
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// The four-field identity of a stored asset.
///
/// An `AssetId` is created once when a new object is stored and never
/// mutated; a changed object gets a fresh identity and the old token is
/// retired. Encoding to and from the token form lives in `ark-codec`; this
/// type only guarantees that every field is inside its legal domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId {
    /// Owning application.
    pub app: AppId,
    /// Resource variant within the application.
    pub variant: VariantId,
    /// Creation instant, seconds since the Unix epoch.
    pub created_at: CreatedAt,
    /// Owning record.
    pub owner: OwnerId,
}

impl AssetId {
    /// Build an identity from already-validated fields.
    pub fn new(app: AppId, variant: VariantId, created_at: CreatedAt, owner: OwnerId) -> Self {
        Self {
            app,
            variant,
            created_at,
            owner,
        }
    }

    /// Build an identity from raw field values, validating each domain.
    pub fn from_parts(
        app: u8,
        variant: u8,
        created_at: u64,
        owner: u64,
    ) -> Result<Self, TypeError> {
        Ok(Self {
            app: AppId::new(app)?,
            variant: VariantId::new(variant)?,
            created_at: CreatedAt::new(created_at)?,
            owner: OwnerId::new(owner)?,
        })
    }

    /// Build an identity stamped with the current wall-clock time.
    pub fn new_now(app: AppId, variant: VariantId, owner: OwnerId) -> Self {
        Self::new(app, variant, CreatedAt::now(), owner)
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AppId({})", self.0)
    }
}

impl fmt::Debug for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VariantId({})", self.0)
    }
}

impl fmt::Debug for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnerId({})", self.0)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "app={} variant={} owner={} created={}",
            self.app, self.variant, self.owner, self.created_at
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_id_accepts_full_domain() {
        for value in 1..=9 {
            assert_eq!(AppId::new(value).unwrap().get(), value);
        }
    }

    #[test]
    fn app_id_rejects_zero_and_ten() {
        assert_eq!(
            AppId::new(0).unwrap_err(),
            TypeError::InvalidAppId { value: 0 }
        );
        assert_eq!(
            AppId::new(10).unwrap_err(),
            TypeError::InvalidAppId { value: 10 }
        );
    }

    #[test]
    fn variant_id_accepts_full_domain() {
        for value in 0..=9 {
            assert_eq!(VariantId::new(value).unwrap().get(), value);
        }
    }

    #[test]
    fn variant_id_rejects_ten() {
        assert_eq!(
            VariantId::new(10).unwrap_err(),
            TypeError::InvalidVariantId { value: 10 }
        );
    }

    #[test]
    fn owner_id_rejects_zero() {
        assert_eq!(
            OwnerId::new(0).unwrap_err(),
            TypeError::InvalidOwnerId { value: 0 }
        );
        assert!(OwnerId::new(1).is_ok());
        assert!(OwnerId::new(u64::MAX).is_ok());
    }

    #[test]
    fn from_parts_validates_every_field() {
        assert!(AssetId::from_parts(5, 3, 1_726_664_971, 1234).is_ok());
        assert!(matches!(
            AssetId::from_parts(0, 3, 1_726_664_971, 1234),
            Err(TypeError::InvalidAppId { value: 0 })
        ));
        assert!(matches!(
            AssetId::from_parts(5, 10, 1_726_664_971, 1234),
            Err(TypeError::InvalidVariantId { value: 10 })
        ));
        assert!(matches!(
            AssetId::from_parts(5, 3, 10_000_000_000, 1234),
            Err(TypeError::InvalidTimestamp { .. })
        ));
        assert!(matches!(
            AssetId::from_parts(5, 3, 1_726_664_971, 0),
            Err(TypeError::InvalidOwnerId { value: 0 })
        ));
    }

    #[test]
    fn new_now_stamps_current_time() {
        let id = AssetId::new_now(
            AppId::new(1).unwrap(),
            VariantId::new(0).unwrap(),
            OwnerId::new(7).unwrap(),
        );
        assert!(id.created_at.as_secs() > 1_577_836_800);
    }

    #[test]
    fn display_is_operator_readable() {
        let id = AssetId::from_parts(1, 0, 1_726_664_971, 42).unwrap();
        let text = format!("{id}");
        assert!(text.contains("app=1"));
        assert!(text.contains("variant=0"));
        assert!(text.contains("owner=42"));
        assert!(text.contains("2024-09-18"));
    }

    #[test]
    fn serde_roundtrip() {
        let id = AssetId::from_parts(9, 9, 1_000_000_000, 4_294_967_295).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: AssetId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }
}
