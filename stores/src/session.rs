use larder_common::pagination::Page;
use larder_common::recipe::{PersistedRecipe, RecipeId};

use crate::catalog::RecipeCatalog;
use crate::composer::{FieldErrors, RecipeComposer};

/// One application session's state containers.
///
/// Constructed once at session start and passed by reference to whatever
/// needs them; there is no global registry. The `apply_*` methods are the
/// only bridge between external collaborator results (fetches, round trips,
/// validation verdicts) and the containers.
pub struct Session {
    pub catalog: RecipeCatalog,
    pub composer: RecipeComposer,
}

impl Session {
    pub fn new() -> Self {
        Session {
            catalog: RecipeCatalog::new(),
            composer: RecipeComposer::new(),
        }
    }

    /// Result of an unpaginated listing fetch.
    pub fn apply_listing(&self, recipes: Vec<PersistedRecipe>) {
        self.catalog.replace_all(recipes);
    }

    /// Result of a paginated listing fetch.
    pub fn apply_page(&self, page: Page<PersistedRecipe>) {
        self.catalog.replace_page(page);
    }

    /// Successful create-or-update round trip: fold the server-confirmed
    /// recipe back into the catalog, then clear the composer for the next
    /// composition session.
    pub fn apply_saved(&self, recipe: PersistedRecipe) {
        tracing::debug!("session: reconcile saved recipe {}", recipe.id.0);
        self.catalog.upsert(recipe);
        self.composer.reset();
    }

    /// Successful delete round trip.
    pub fn apply_deleted(&self, id: RecipeId) {
        self.catalog.remove_by_id(id);
    }

    /// Verdict from the validation collaborator, applied wholesale.
    pub fn apply_validation(&self, errors: FieldErrors) {
        self.composer.set_errors(errors);
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}
