// modweaver-rs: Minecraft Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pure version resolution.
//!
//! ```text
//! resolve_latest_compatible(env, versions)
//!   filter: build in game_versions AND loader in loaders
//!   select: max by (released, version id)
//! ```
//!
//! The version-id tie-break makes resolution a total order, so repeated
//! `upgrade` runs against the same catalog state pick the same version no
//! matter how the provider ordered its list.

use crate::manifest::Environment;
use crate::provider::CatalogVersion;


/// Select the best version compatible with `environment`.
///
/// Returns `None` when no candidate matches; the caller maps that onto
/// [`crate::error::ProviderError::NoCompatibleVersion`].
#[must_use]
pub fn resolve_latest_compatible<'a>(
    environment: &Environment,
    versions: &'a [CatalogVersion],
) -> Option<&'a CatalogVersion> {
    versions
        .iter()
        .filter(|v| v.matches(environment))
        .max_by(|a, b| {
            a.released
                .cmp(&b.released)
                .then_with(|| a.id.cmp(&b.id))
        })
}
