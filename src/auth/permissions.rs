// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Permission strings and the permission check.
//!
//! Each protected route names the permission it needs through a marker type,
//! so the requirement is visible in the handler signature:
//!
//! ```rust,ignore
//! async fn create_drink(auth: Authorized<PostDrinks>, ...) { ... }
//! ```

use super::{AuthError, Claims};

/// A permission string a route requires.
pub trait Permission: Send + Sync + 'static {
    /// The exact string expected in the `permissions` claim.
    const NAME: &'static str;
}

macro_rules! permissions {
    ($($(#[$meta:meta])* $marker:ident => $name:literal,)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
            pub struct $marker;

            impl Permission for $marker {
                const NAME: &'static str = $name;
            }
        )*
    };
}

permissions! {
    /// List drinks (short form)
    GetDrinks => "get:drinks",
    /// List drinks with full recipes
    GetDrinksDetail => "get:drinks-detail",
    /// Create a drink
    PostDrinks => "post:drinks",
    /// Update a drink
    PatchDrinks => "patch:drinks",
    /// Delete a drink
    DeleteDrinks => "delete:drinks",
}

/// Assert that `claims` grant `required`.
pub fn check_permissions(required: &str, claims: &Claims) -> Result<(), AuthError> {
    let granted = claims
        .permissions()
        .ok_or(AuthError::PermissionsClaimMissing)?;

    if granted.contains(&required) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}
