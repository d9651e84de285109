// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory drinks store.
//!
//! Drinks live for the lifetime of the process. Ids are assigned from 1 and
//! never reused; listings are ordered by id. Titles are unique.

use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::models::{CreateDrinkRequest, Drink, Ingredient, UpdateDrinkRequest};

#[derive(Debug)]
pub struct DrinkStore {
    drinks: BTreeMap<u64, Drink>,
    next_id: u64,
}

impl Default for DrinkStore {
    fn default() -> Self {
        Self {
            drinks: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl DrinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the sample `water` drink.
    pub fn seed_sample(&mut self) -> Result<Drink, ApiError> {
        self.create(CreateDrinkRequest {
            title: "water".into(),
            recipe: vec![Ingredient {
                name: "water".into(),
                color: "blue".into(),
                parts: 1,
            }],
        })
    }

    pub fn list(&self) -> Vec<Drink> {
        self.drinks.values().cloned().collect()
    }

    pub fn get(&self, id: u64) -> Result<Drink, ApiError> {
        self.drinks
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("resource not found"))
    }

    pub fn create(&mut self, request: CreateDrinkRequest) -> Result<Drink, ApiError> {
        validate_title(&request.title)?;
        validate_recipe(&request.recipe)?;
        self.ensure_title_free(&request.title, None)?;

        let id = self.next_id;
        self.next_id += 1;

        let drink = Drink {
            id,
            title: request.title.trim().to_string(),
            recipe: request.recipe,
        };
        self.drinks.insert(id, drink.clone());
        Ok(drink)
    }

    pub fn update(&mut self, id: u64, request: UpdateDrinkRequest) -> Result<Drink, ApiError> {
        if request.title.is_none() && request.recipe.is_none() {
            return Err(ApiError::bad_request("nothing to update"));
        }
        let mut drink = self
            .drinks
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("resource not found"))?;

        if let Some(title) = request.title {
            validate_title(&title)?;
            self.ensure_title_free(&title, Some(id))?;
            drink.title = title.trim().to_string();
        }
        if let Some(recipe) = request.recipe {
            validate_recipe(&recipe)?;
            drink.recipe = recipe;
        }

        self.drinks.insert(id, drink.clone());
        Ok(drink)
    }

    pub fn delete(&mut self, id: u64) -> Result<(), ApiError> {
        if self.drinks.remove(&id).is_some() {
            Ok(())
        } else {
            Err(ApiError::not_found("resource not found"))
        }
    }

    fn ensure_title_free(&self, title: &str, except: Option<u64>) -> Result<(), ApiError> {
        let title = title.trim();
        let taken = self
            .drinks
            .values()
            .any(|drink| drink.title == title && Some(drink.id) != except);
        if taken {
            Err(ApiError::unprocessable(format!(
                "a drink titled '{title}' already exists"
            )))
        } else {
            Ok(())
        }
    }
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::bad_request("title must not be empty"));
    }
    Ok(())
}

fn validate_recipe(recipe: &[Ingredient]) -> Result<(), ApiError> {
    if recipe.is_empty() {
        return Err(ApiError::bad_request("recipe must contain at least one ingredient"));
    }
    Ok(())
}
