// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the drinks API. All types derive
//! `ToSchema` for the OpenAPI document.
//!
//! A drink is rendered in two forms:
//!
//! - **short**: recipe entries carry only `color` and `parts` (public menu)
//! - **long**: the full drink including ingredient names (baristas)

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Drinks
// =============================================================================

/// One ingredient of a drink recipe.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Ingredient {
    /// Ingredient name, e.g. `"milk"`.
    pub name: String,
    /// Display color of this layer, e.g. `"grey"`.
    pub color: String,
    /// Relative amount.
    pub parts: u32,
}

/// A drink with its full recipe (long form).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Drink {
    pub id: u64,
    /// Unique title.
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Recipe entry without the ingredient name.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct IngredientSummary {
    pub color: String,
    pub parts: u32,
}

/// A drink in short form.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DrinkSummary {
    pub id: u64,
    pub title: String,
    pub recipe: Vec<IngredientSummary>,
}

impl Drink {
    /// Short form.
    pub fn short(&self) -> DrinkSummary {
        DrinkSummary {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|ingredient| IngredientSummary {
                    color: ingredient.color.clone(),
                    parts: ingredient.parts,
                })
                .collect(),
        }
    }
}

/// Request to create a drink.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateDrinkRequest {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Request to update a drink. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateDrinkRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<Vec<Ingredient>>,
}

// =============================================================================
// Response envelopes
// =============================================================================

/// `GET /drinks` response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DrinkSummaryList {
    pub success: bool,
    pub drinks: Vec<DrinkSummary>,
}

/// Response carrying drinks in long form.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DrinkDetailList {
    pub success: bool,
    pub drinks: Vec<Drink>,
}

/// `DELETE /drinks/{id}` response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedDrink {
    pub success: bool,
    /// Id of the deleted drink.
    pub delete: u64,
}
