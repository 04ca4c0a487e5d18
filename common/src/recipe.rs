use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::product::{ProductId, ProductSnapshot};

/// Unique recipe identifier, assigned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecipeId(pub i64);

/// An ingredient line as the server stores it.
///
/// Only ever constructed from server responses; the client never invents a
/// real `id` for one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedIngredient {
    pub id: i64,
    #[serde(rename = "dateCreate")]
    pub date_create: DateTime<Utc>,
    #[serde(rename = "recycleBin")]
    pub recycle_bin: bool,
    #[serde(rename = "iduser")]
    pub user_id: i64,
    pub quantity: f64,
    #[serde(rename = "idproduct")]
    pub product_id: ProductId,
    #[serde(rename = "idrecipe")]
    pub recipe_id: RecipeId,
    pub product: ProductSnapshot,
}

/// A client-only ingredient line awaiting its first save.
///
/// `id` is a synthetic negative value assigned by the composer; the server
/// replaces it on save. The optional hints let the UI render the line before
/// the full product graph is available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftIngredient {
    pub id: i64,
    #[serde(rename = "idproduct")]
    pub product_id: ProductId,
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(
        rename = "productName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub product_name: Option<String>,
    #[serde(rename = "unitName", default, skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,
}

/// One product-quantity association within a recipe.
///
/// While a recipe is being edited its collection mixes both cases: lines
/// loaded from the server stay `Persisted` until resubmission, newly picked
/// products enter as `Draft`. Code that cares about the shape must branch
/// explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngredientLine {
    Persisted(PersistedIngredient),
    Draft(DraftIngredient),
}

impl IngredientLine {
    /// Line identity: server id for persisted lines, synthetic negative id
    /// for drafts.
    pub fn line_id(&self) -> i64 {
        match self {
            IngredientLine::Persisted(line) => line.id,
            IngredientLine::Draft(line) => line.id,
        }
    }

    /// The referenced product. Unique within one recipe's collection.
    pub fn product_id(&self) -> ProductId {
        match self {
            IngredientLine::Persisted(line) => line.product_id,
            IngredientLine::Draft(line) => line.product_id,
        }
    }

    pub fn quantity(&self) -> f64 {
        match self {
            IngredientLine::Persisted(line) => line.quantity,
            IngredientLine::Draft(line) => line.quantity,
        }
    }

    /// Overwrite the quantity, keeping whichever concrete shape is present.
    pub fn set_quantity(&mut self, quantity: f64) {
        match self {
            IngredientLine::Persisted(line) => line.quantity = quantity,
            IngredientLine::Draft(line) => line.quantity = quantity,
        }
    }

    /// Product name for display, when known.
    pub fn display_name(&self) -> Option<&str> {
        match self {
            IngredientLine::Persisted(line) => Some(line.product.name.as_str()),
            IngredientLine::Draft(line) => line.product_name.as_deref(),
        }
    }

    /// Flatten to the minimal triple the submission payload carries.
    pub fn request_line(&self) -> RequestLine {
        RequestLine {
            id: self.line_id(),
            product_id: self.product_id(),
            quantity: self.quantity(),
        }
    }
}

/// The one recipe-in-progress: either brand new (`id == None`) or a saved
/// recipe opened for editing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub id: Option<RecipeId>,
    #[serde(rename = "productName")]
    pub product_name: String,
    #[serde(rename = "unitName")]
    pub unit_name: String,
    #[serde(rename = "dateCreate")]
    pub date_create: Option<DateTime<Utc>>,
    #[serde(rename = "recycleBin")]
    pub recycle_bin: bool,
    #[serde(rename = "iduser")]
    pub user_id: i64,
    #[serde(rename = "idstatus")]
    pub status_id: Option<i64>,
    #[serde(rename = "idstore")]
    pub store_id: i64,
    pub comment: String,
    #[serde(rename = "idproduct")]
    pub product_id: Option<ProductId>,
    #[serde(rename = "recipeProduct")]
    pub ingredients: Vec<IngredientLine>,
    pub product: Option<ProductSnapshot>,
}

impl RecipeDraft {
    /// Build the submission payload: every line flattened to its
    /// `(id, idproduct, quantity)` triple, draft or persisted alike.
    ///
    /// Returns `None` until a product has been chosen for the recipe; the
    /// validation collaborator reports that case through the error map.
    pub fn to_request(&self) -> Option<RecipeRequest> {
        let product_id = self.product_id?;
        Some(RecipeRequest {
            store_id: self.store_id,
            product_id,
            comment: self.comment.clone(),
            products: self
                .ingredients
                .iter()
                .map(IngredientLine::request_line)
                .collect(),
        })
    }
}

/// A recipe confirmed to exist server-side. The catalog holds only this
/// shape, and its ingredient list carries no drafts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedRecipe {
    pub id: RecipeId,
    #[serde(rename = "dateCreate")]
    pub date_create: DateTime<Utc>,
    #[serde(rename = "recycleBin")]
    pub recycle_bin: bool,
    #[serde(rename = "iduser")]
    pub user_id: i64,
    #[serde(rename = "idstatus")]
    pub status_id: i64,
    #[serde(rename = "idstore")]
    pub store_id: i64,
    pub comment: String,
    #[serde(rename = "idproduct")]
    pub product_id: ProductId,
    #[serde(rename = "recipeProduct")]
    pub ingredients: Vec<PersistedIngredient>,
    pub product: ProductSnapshot,
}

/// Opening a saved recipe for editing: every persisted line is kept in its
/// persisted shape until resubmission.
impl From<PersistedRecipe> for RecipeDraft {
    fn from(recipe: PersistedRecipe) -> Self {
        RecipeDraft {
            id: Some(recipe.id),
            product_name: recipe.product.name.clone(),
            unit_name: recipe.product.unit_name.clone(),
            date_create: Some(recipe.date_create),
            recycle_bin: recipe.recycle_bin,
            user_id: recipe.user_id,
            status_id: Some(recipe.status_id),
            store_id: recipe.store_id,
            comment: recipe.comment,
            product_id: Some(recipe.product_id),
            ingredients: recipe
                .ingredients
                .into_iter()
                .map(IngredientLine::Persisted)
                .collect(),
            product: Some(recipe.product),
        }
    }
}

/// Outbound create/update payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRequest {
    #[serde(rename = "idstore")]
    pub store_id: i64,
    #[serde(rename = "idproduct")]
    pub product_id: ProductId,
    pub comment: String,
    pub products: Vec<RequestLine>,
}

/// One ingredient line of the submission payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestLine {
    pub id: i64,
    #[serde(rename = "idproduct")]
    pub product_id: ProductId,
    pub quantity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_snapshot(id: i64, name: &str) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId(id),
            code: format!("P-{id}"),
            name: name.into(),
            unit_name: "kg".into(),
            recycle_bin: false,
        }
    }

    fn dummy_persisted_line(id: i64, product: i64, quantity: f64) -> PersistedIngredient {
        PersistedIngredient {
            id,
            date_create: Utc::now(),
            recycle_bin: false,
            user_id: 1,
            quantity,
            product_id: ProductId(product),
            recipe_id: RecipeId(5),
            product: dummy_snapshot(product, "Flour"),
        }
    }

    fn dummy_draft_line(id: i64, product: i64, quantity: f64) -> DraftIngredient {
        DraftIngredient {
            id,
            product_id: ProductId(product),
            quantity,
            code: None,
            product_name: Some("Sugar".into()),
            unit_name: Some("g".into()),
        }
    }

    fn dummy_recipe(id: i64) -> PersistedRecipe {
        PersistedRecipe {
            id: RecipeId(id),
            date_create: Utc::now(),
            recycle_bin: false,
            user_id: 1,
            status_id: 2,
            store_id: 14,
            comment: "house blend".into(),
            product_id: ProductId(100),
            ingredients: vec![dummy_persisted_line(41, 10, 2.0)],
            product: dummy_snapshot(100, "Bread"),
        }
    }

    #[test]
    fn default_draft_is_the_empty_shape() {
        let draft = RecipeDraft::default();
        assert_eq!(draft.id, None);
        assert_eq!(draft.product_name, "");
        assert_eq!(draft.status_id, None);
        assert_eq!(draft.product_id, None);
        assert!(draft.ingredients.is_empty());
        assert!(draft.product.is_none());
    }

    #[test]
    fn line_accessors_branch_on_shape() {
        let mut persisted = IngredientLine::Persisted(dummy_persisted_line(41, 10, 2.0));
        let draft = IngredientLine::Draft(dummy_draft_line(-1, 20, 1.5));

        assert_eq!(persisted.product_id(), ProductId(10));
        assert_eq!(draft.product_id(), ProductId(20));
        assert_eq!(persisted.line_id(), 41);
        assert_eq!(draft.line_id(), -1);
        assert_eq!(persisted.display_name(), Some("Flour"));
        assert_eq!(draft.display_name(), Some("Sugar"));

        persisted.set_quantity(9.0);
        assert_eq!(persisted.quantity(), 9.0);
        assert!(matches!(persisted, IngredientLine::Persisted(_)));
    }

    #[test]
    fn opening_a_saved_recipe_keeps_lines_persisted() {
        let draft = RecipeDraft::from(dummy_recipe(5));
        assert_eq!(draft.id, Some(RecipeId(5)));
        assert_eq!(draft.product_name, "Bread");
        assert_eq!(draft.unit_name, "kg");
        assert_eq!(draft.status_id, Some(2));
        assert_eq!(draft.ingredients.len(), 1);
        assert!(matches!(draft.ingredients[0], IngredientLine::Persisted(_)));
    }

    #[test]
    fn request_flattens_mixed_shapes_to_triples() {
        let mut draft = RecipeDraft::from(dummy_recipe(5));
        draft
            .ingredients
            .push(IngredientLine::Draft(dummy_draft_line(-1, 20, 1.5)));

        let request = draft.to_request().unwrap();
        assert_eq!(request.store_id, 14);
        assert_eq!(request.product_id, ProductId(100));
        assert_eq!(request.comment, "house blend");
        assert_eq!(
            request.products,
            vec![
                RequestLine {
                    id: 41,
                    product_id: ProductId(10),
                    quantity: 2.0
                },
                RequestLine {
                    id: -1,
                    product_id: ProductId(20),
                    quantity: 1.5
                },
            ]
        );
    }

    #[test]
    fn request_needs_a_chosen_product() {
        assert!(RecipeDraft::default().to_request().is_none());
    }

    #[test]
    fn request_uses_server_field_names() {
        let request = RecipeRequest {
            store_id: 14,
            product_id: ProductId(100),
            comment: "".into(),
            products: vec![RequestLine {
                id: -1,
                product_id: ProductId(20),
                quantity: 1.5,
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["idstore"], 14);
        assert_eq!(value["idproduct"], 100);
        assert_eq!(value["products"][0]["idproduct"], 20);
        assert_eq!(value["products"][0]["quantity"], 1.5);
    }

    #[test]
    fn persisted_recipe_wire_roundtrip() {
        let recipe = dummy_recipe(5);
        let value = serde_json::to_value(&recipe).unwrap();
        assert_eq!(value["id"], 5);
        assert_eq!(value["idstatus"], 2);
        assert!(value.get("dateCreate").is_some());
        assert_eq!(value["recipeProduct"][0]["idrecipe"], 5);

        let back: PersistedRecipe = serde_json::from_value(value).unwrap();
        assert_eq!(back, recipe);
    }

    #[test]
    fn untagged_line_deserializes_by_shape() {
        let persisted_json = serde_json::to_string(&dummy_persisted_line(41, 10, 2.0)).unwrap();
        let line: IngredientLine = serde_json::from_str(&persisted_json).unwrap();
        assert!(matches!(line, IngredientLine::Persisted(_)));

        let draft_json = r#"{"id":-2,"idproduct":20,"quantity":1.5,"productName":"Sugar"}"#;
        let line: IngredientLine = serde_json::from_str(draft_json).unwrap();
        assert!(matches!(line, IngredientLine::Draft(_)));
    }
}
