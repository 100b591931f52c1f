//! # Barcode Token Deriver
//!
//! Everything needed to turn a row's free-text thickness, material and
//! dimensions into a short scanner-safe code.
//!
//! ## Pipeline
//! ```text
//! ┌───────────┐   ┌───────────┐   ┌────────────┐
//! │ thickness │   │ material  │   │ dimensions │
//! └─────┬─────┘   └─────┬─────┘   └─────┬──────┘
//!       ▼               ▼               ▼
//!  thickness.rs     material.rs    dimensions.rs
//!       └───────────────┼───────────────┘
//!                       ▼
//!                   token.rs ──── None ───► fallback.rs (hash)
//!                       │                        │
//!                       ▼                        ▼
//!                   unique.rs ◄──────────────────┘
//!                       │            classify.rs decides which
//!                       ▼            stored codes get replaced
//!                   "12GB510"
//! ```
//!
//! All functions here are pure. The only state they see is the existence
//! predicate handed to [`ensure_unique`].

pub mod classify;
pub mod dimensions;
pub mod fallback;
pub mod material;
pub mod thickness;
pub mod token;
pub mod unique;

pub use classify::{is_legacy, looks_compact, needs_rebuild};
pub use dimensions::{format_feet_inches, parse_dimensions, Dimensions};
pub use fallback::{ensure_compact_if_needed, generate_compact_code};
pub use material::material_code;
pub use thickness::{format_thickness_token, MaterialFamily};
pub use token::{derive_compact_barcode_value, derive_for_record};
pub use unique::{alpha_suffix, ensure_unique, ensure_unique_with_limit};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::MaterialRecord;
use crate::{
    FALLBACK_CODE_LENGTH, FRACTION_TOLERANCE, LEGACY_BARCODE_PREFIX, MAX_LEGACY_BARCODE_LEN,
    MAX_UNIQUE_ATTEMPTS, MIN_FALLBACK_CODE_LENGTH,
};

/// Derives the compact token, or a hash fallback when the record can't be
/// derived.
///
/// The fallback source is `"{shelf}|{thickness}|{material}|{dimensions}|{ordinal}"`,
/// so two underivable rows on the same shelf still differ by ordinal.
pub fn derive_or_fallback(record: &MaterialRecord, shelf: Option<&str>, ordinal: &str) -> String {
    BarcodeRules::default().derive(record, shelf, ordinal)
}

// =============================================================================
// Barcode Rules
// =============================================================================

/// Tunables for derivation and classification.
///
/// `Default` matches the crate constants. Embedding applications load
/// overrides from their own config and call [`BarcodeRules::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarcodeRules {
    /// Prefix that marks a pre-compact code.
    pub legacy_prefix: String,
    /// Codes longer than this are always rebuilt.
    pub max_legacy_len: usize,
    /// Length of hash fallback codes.
    pub fallback_length: usize,
    /// Suffix attempts before the resolver gives up.
    pub max_unique_attempts: usize,
    /// Decimal-to-fraction match tolerance for plate.
    pub fraction_tolerance: f64,
}

impl Default for BarcodeRules {
    fn default() -> Self {
        BarcodeRules {
            legacy_prefix: LEGACY_BARCODE_PREFIX.to_string(),
            max_legacy_len: MAX_LEGACY_BARCODE_LEN,
            fallback_length: FALLBACK_CODE_LENGTH,
            max_unique_attempts: MAX_UNIQUE_ATTEMPTS,
            fraction_tolerance: FRACTION_TOLERANCE,
        }
    }
}

impl BarcodeRules {
    /// Rejects values that would make derivation misbehave.
    pub fn validate(&self) -> CoreResult<()> {
        if self.legacy_prefix.is_empty() {
            return Err(CoreError::ConfigurationError(
                "legacy_prefix must not be empty".to_string(),
            ));
        }
        if self.max_legacy_len == 0 {
            return Err(CoreError::ConfigurationError(
                "max_legacy_len must be greater than 0".to_string(),
            ));
        }
        if self.fallback_length < MIN_FALLBACK_CODE_LENGTH {
            return Err(CoreError::ConfigurationError(format!(
                "fallback_length must be at least {}",
                MIN_FALLBACK_CODE_LENGTH
            )));
        }
        if self.max_unique_attempts == 0 {
            return Err(CoreError::ConfigurationError(
                "max_unique_attempts must be greater than 0".to_string(),
            ));
        }
        if !(self.fraction_tolerance > 0.0 && self.fraction_tolerance < 0.1) {
            return Err(CoreError::ConfigurationError(format!(
                "fraction_tolerance must be in (0, 0.1), got {}",
                self.fraction_tolerance
            )));
        }
        Ok(())
    }

    /// Compact token for `record` under these rules.
    pub fn compact(&self, record: &MaterialRecord) -> Option<String> {
        token::compose(
            record.thickness.as_deref(),
            record.material.as_deref(),
            record.dimensions.as_deref(),
            self.fraction_tolerance,
        )
    }

    /// Compact token, or the hash fallback of the row's composite key.
    pub fn derive(&self, record: &MaterialRecord, shelf: Option<&str>, ordinal: &str) -> String {
        self.compact(record)
            .unwrap_or_else(|| self.fallback_code(record, shelf, ordinal))
    }

    /// Hash fallback for a row that can't be derived.
    pub fn fallback_code(&self, record: &MaterialRecord, shelf: Option<&str>, ordinal: &str) -> String {
        let source = format!(
            "{}|{}|{}|{}|{}",
            shelf.unwrap_or(""),
            record.thickness.as_deref().unwrap_or(""),
            record.material.as_deref().unwrap_or(""),
            record.dimensions.as_deref().unwrap_or(""),
            ordinal
        );
        generate_compact_code(&source, self.fallback_length)
    }

    /// [`needs_rebuild`] with this rule set's prefix and length cap.
    pub fn needs_rebuild(&self, existing: Option<&str>, migrate_legacy: bool, force: bool) -> bool {
        classify::needs_rebuild_with(
            existing,
            migrate_legacy,
            force,
            &self.legacy_prefix,
            self.max_legacy_len,
        )
    }

    /// [`ensure_unique`] with this rule set's attempt cap.
    pub fn ensure_unique<F>(&self, candidate: &str, code_exists: F) -> CoreResult<String>
    where
        F: FnMut(&str) -> bool,
    {
        ensure_unique_with_limit(candidate, code_exists, self.max_unique_attempts)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
