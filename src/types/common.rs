//! Common enums and data types for S3.

use std::fmt;

/// S3 storage class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum StorageClass {
    /// Standard storage for frequently accessed data.
    #[default]
    Standard,
    /// Reduced redundancy storage (not recommended).
    ReducedRedundancy,
    /// Standard-IA for infrequently accessed data.
    StandardIa,
    /// One Zone-IA for infrequently accessed, non-critical data.
    OnezoneIa,
    /// Intelligent-Tiering for unknown or changing access patterns.
    IntelligentTiering,
    /// Glacier Instant Retrieval for archive data.
    GlacierInstantRetrieval,
    /// Glacier Flexible Retrieval (formerly Glacier).
    Glacier,
    /// Glacier Deep Archive for long-term archive.
    DeepArchive,
    /// S3 Outposts storage class.
    Outposts,
    /// Express One Zone for single-digit millisecond access.
    ExpressOnezone,
    /// A class this client does not know about, kept verbatim.
    Other(String),
}

impl StorageClass {
    /// Returns the S3 API string representation.
    pub fn as_str(&self) -> &str {
        match self {
            StorageClass::Standard => "STANDARD",
            StorageClass::ReducedRedundancy => "REDUCED_REDUNDANCY",
            StorageClass::StandardIa => "STANDARD_IA",
            StorageClass::OnezoneIa => "ONEZONE_IA",
            StorageClass::IntelligentTiering => "INTELLIGENT_TIERING",
            StorageClass::GlacierInstantRetrieval => "GLACIER_IR",
            StorageClass::Glacier => "GLACIER",
            StorageClass::DeepArchive => "DEEP_ARCHIVE",
            StorageClass::Outposts => "OUTPOSTS",
            StorageClass::ExpressOnezone => "EXPRESS_ONEZONE",
            StorageClass::Other(name) => name,
        }
    }
}

impl From<&str> for StorageClass {
    fn from(s: &str) -> Self {
        match s {
            "STANDARD" => StorageClass::Standard,
            "REDUCED_REDUNDANCY" => StorageClass::ReducedRedundancy,
            "STANDARD_IA" => StorageClass::StandardIa,
            "ONEZONE_IA" => StorageClass::OnezoneIa,
            "INTELLIGENT_TIERING" => StorageClass::IntelligentTiering,
            "GLACIER_IR" => StorageClass::GlacierInstantRetrieval,
            "GLACIER" => StorageClass::Glacier,
            "DEEP_ARCHIVE" => StorageClass::DeepArchive,
            "OUTPOSTS" => StorageClass::Outposts,
            "EXPRESS_ONEZONE" => StorageClass::ExpressOnezone,
            other => StorageClass::Other(other.to_string()),
        }
    }
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket or object owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Owner {
    /// Canonical user ID.
    pub id: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_class_round_trip_known() {
        for name in ["STANDARD", "STANDARD_IA", "GLACIER_IR", "DEEP_ARCHIVE"] {
            assert_eq!(StorageClass::from(name).as_str(), name);
        }
        assert_eq!(StorageClass::from("GLACIER_IR"), StorageClass::GlacierInstantRetrieval);
    }

    #[test]
    fn test_storage_class_every_variant_round_trips() {
        let classes = [
            StorageClass::Standard,
            StorageClass::ReducedRedundancy,
            StorageClass::StandardIa,
            StorageClass::OnezoneIa,
            StorageClass::IntelligentTiering,
            StorageClass::GlacierInstantRetrieval,
            StorageClass::Glacier,
            StorageClass::DeepArchive,
            StorageClass::Outposts,
            StorageClass::ExpressOnezone,
            StorageClass::Other("SNOW".to_string()),
        ];
        for class in classes {
            assert_eq!(StorageClass::from(class.as_str()), class);
        }
    }

    #[test]
    fn test_storage_class_unknown_is_preserved() {
        let class = StorageClass::from("SNOW");
        assert_eq!(class, StorageClass::Other("SNOW".to_string()));
        assert_eq!(class.to_string(), "SNOW");
    }
}
