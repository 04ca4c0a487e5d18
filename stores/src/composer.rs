use larder_common::product::ProductId;
use larder_common::recipe::{DraftIngredient, IngredientLine, RecipeDraft, RecipeRequest};

use crate::observable::{Observable, Subscription};

/// Validation error display state, one message per validated field.
///
/// Empty string means "no error for this field". Messages are written by the
/// external validation collaborator; the composer only stores and clears
/// them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    pub product_name: String,
    pub recipe_product: String,
    pub status: String,
}

impl FieldErrors {
    pub fn clear(&mut self) {
        *self = FieldErrors::default();
    }

    pub fn is_empty(&self) -> bool {
        self.product_name.is_empty() && self.recipe_product.is_empty() && self.status.is_empty()
    }
}

/// Fields the validation collaborator can address individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorField {
    ProductName,
    RecipeProduct,
    Status,
}

/// One row of the product picker, before it becomes an ingredient line.
///
/// Transient and UI-scoped; never part of the persisted recipe shape.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedProduct {
    pub product_id: ProductId,
    pub code: String,
    pub name: String,
    pub unit_name: String,
    pub quantity: f64,
}

impl SelectedProduct {
    /// Convert the picker row into a draft line carrying display hints.
    fn into_line(self, line_id: i64) -> DraftIngredient {
        DraftIngredient {
            id: line_id,
            product_id: self.product_id,
            quantity: self.quantity,
            code: Some(self.code),
            product_name: Some(self.name),
            unit_name: Some(self.unit_name),
        }
    }
}

/// Everything one composition session holds: the draft, its error display
/// state, and the transient picker selection.
#[derive(Debug, Clone)]
pub struct ComposerState {
    pub draft: RecipeDraft,
    pub errors: FieldErrors,
    pub selection: Vec<SelectedProduct>,
    next_line_id: i64,
}

impl Default for ComposerState {
    fn default() -> Self {
        ComposerState {
            draft: RecipeDraft::default(),
            errors: FieldErrors::default(),
            selection: Vec::new(),
            next_line_id: -1,
        }
    }
}

/// Manages the one recipe-in-progress: field-level and ingredient-level
/// edits plus validation error display state.
///
/// Mutators never fail; invalid input is the validation collaborator's
/// concern and lands in the error map, not in a rejected call.
pub struct RecipeComposer {
    state: Observable<ComposerState>,
}

impl RecipeComposer {
    pub fn new() -> Self {
        RecipeComposer {
            state: Observable::default(),
        }
    }

    /// Observe every completed state transition.
    pub fn subscribe(&self, f: impl Fn(&ComposerState) + 'static) -> Subscription<ComposerState> {
        self.state.subscribe(f)
    }

    /// Read access to the current state.
    pub fn with<R>(&self, f: impl FnOnce(&ComposerState) -> R) -> R {
        self.state.with(f)
    }

    pub fn snapshot(&self) -> ComposerState {
        self.state.get()
    }

    /// Replace the whole draft, e.g. when opening a saved recipe for editing.
    pub fn set_draft(&self, draft: RecipeDraft) {
        self.state.update(|s| s.draft = draft);
    }

    pub fn set_product_id(&self, id: ProductId) {
        self.state.update(|s| s.draft.product_id = Some(id));
    }

    pub fn set_product_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.state.update(|s| s.draft.product_name = name);
    }

    pub fn set_unit_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.state.update(|s| s.draft.unit_name = name);
    }

    pub fn set_store_id(&self, id: i64) {
        self.state.update(|s| s.draft.store_id = id);
    }

    pub fn set_status_id(&self, id: i64) {
        self.state.update(|s| s.draft.status_id = Some(id));
    }

    pub fn set_comment(&self, comment: impl Into<String>) {
        let comment = comment.into();
        self.state.update(|s| s.draft.comment = comment);
    }

    /// Replace the transient picker selection.
    pub fn set_selected_items(&self, items: Vec<SelectedProduct>) {
        self.state.update(|s| s.selection = items);
    }

    /// Restore the empty draft, clear all errors and the picker selection.
    ///
    /// Required after a successful submission or an explicit cancel, so no
    /// state leaks into the next composition session. The synthetic line id
    /// counter is deliberately not rewound (ids stay unique for the
    /// composer's lifetime).
    pub fn reset(&self) {
        tracing::debug!("composer: reset draft");
        self.state.update(|s| {
            s.draft = RecipeDraft::default();
            s.errors.clear();
            s.selection.clear();
        });
    }

    /// Add a line, or overwrite the quantity of the existing line for the
    /// same product.
    ///
    /// A match preserves whichever concrete shape was already present and
    /// its position; only the quantity changes. Idempotent under repeated
    /// application with the same input, which keeps `idproduct` unique
    /// within the draft's collection.
    pub fn add_or_update_ingredient(&self, line: IngredientLine) {
        self.state.update(|s| {
            let existing = s
                .draft
                .ingredients
                .iter_mut()
                .find(|l| l.product_id() == line.product_id());
            match existing {
                Some(slot) => slot.set_quantity(line.quantity()),
                None => s.draft.ingredients.push(line),
            }
        });
    }

    /// Add a picker row as a new draft line, assigning the next synthetic id.
    ///
    /// Synthetic ids are negative and strictly decreasing, so they cannot
    /// collide with server-assigned (positive) ids. When the product is
    /// already on the draft only its quantity is overwritten and no id is
    /// consumed.
    pub fn add_draft_ingredient(&self, selection: SelectedProduct) {
        self.state.update(|s| {
            let existing = s
                .draft
                .ingredients
                .iter_mut()
                .find(|l| l.product_id() == selection.product_id);
            if let Some(slot) = existing {
                slot.set_quantity(selection.quantity);
                return;
            }
            let id = s.next_line_id;
            s.next_line_id -= 1;
            s.draft
                .ingredients
                .push(IngredientLine::Draft(selection.into_line(id)));
        });
    }

    /// Drop any line referencing the product; no-op if absent.
    pub fn remove_ingredient(&self, product_id: ProductId) {
        self.state
            .update(|s| s.draft.ingredients.retain(|l| l.product_id() != product_id));
    }

    /// Reset every field of the error map without touching the draft.
    pub fn clear_errors(&self) {
        self.state.update(|s| s.errors.clear());
    }

    /// Apply a validation verdict wholesale.
    pub fn set_errors(&self, errors: FieldErrors) {
        self.state.update(|s| s.errors = errors);
    }

    /// Write one field's message; the empty string clears it.
    pub fn set_error(&self, field: ErrorField, message: impl Into<String>) {
        let message = message.into();
        self.state.update(|s| match field {
            ErrorField::ProductName => s.errors.product_name = message,
            ErrorField::RecipeProduct => s.errors.recipe_product = message,
            ErrorField::Status => s.errors.status = message,
        });
    }

    /// The outbound payload for the current draft; `None` until a product
    /// has been chosen.
    pub fn to_request(&self) -> Option<RecipeRequest> {
        self.state.with(|s| s.draft.to_request())
    }
}

impl Default for RecipeComposer {
    fn default() -> Self {
        RecipeComposer::new()
    }
}
