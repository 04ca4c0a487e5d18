use larder_common::pagination::{Page, DEFAULT_PAGE_SIZE};
use larder_common::recipe::{PersistedRecipe, RecipeId};

use crate::observable::{Observable, Subscription};

/// The catalog's visible window: one server page plus its cursor metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogState {
    pub current_page: u32,
    pub total_count: u64,
    pub page_count: u32,
    pub page_size: u32,
    pub recipes: Vec<PersistedRecipe>,
}

impl Default for CatalogState {
    fn default() -> Self {
        CatalogState {
            current_page: 1,
            total_count: 0,
            page_count: 0,
            page_size: DEFAULT_PAGE_SIZE,
            recipes: Vec::new(),
        }
    }
}

/// Single source of truth for which recipes, and which page, are visible.
///
/// A best-effort cache of server state: every operation is total, and a
/// missing id is a silent no-op. Count metadata is server-authoritative and
/// only ever replaced wholesale by [`RecipeCatalog::replace_page`].
pub struct RecipeCatalog {
    state: Observable<CatalogState>,
}

impl RecipeCatalog {
    pub fn new() -> Self {
        RecipeCatalog {
            state: Observable::default(),
        }
    }

    /// Observe every completed state transition.
    pub fn subscribe(&self, f: impl Fn(&CatalogState) + 'static) -> Subscription<CatalogState> {
        self.state.subscribe(f)
    }

    /// Read access to the current state.
    pub fn with<R>(&self, f: impl FnOnce(&CatalogState) -> R) -> R {
        self.state.with(f)
    }

    pub fn snapshot(&self) -> CatalogState {
        self.state.get()
    }

    /// Replace the visible list without touching pagination metadata. Used
    /// when pagination is not in effect (unfiltered full-list fetch).
    pub fn replace_all(&self, recipes: Vec<PersistedRecipe>) {
        tracing::debug!("catalog: replace all ({} recipes)", recipes.len());
        self.state.update(|s| s.recipes = recipes);
    }

    /// Apply one pagination envelope as a single state transition; observers
    /// never see a mix of old and new envelope fields.
    pub fn replace_page(&self, page: Page<PersistedRecipe>) {
        tracing::debug!(
            "catalog: replace page {}/{} ({} recipes)",
            page.current_page,
            page.page_count,
            page.data.len()
        );
        self.state.update(|s| {
            s.current_page = page.current_page;
            s.total_count = page.total_count;
            s.page_count = page.page_count;
            s.page_size = page.page_size;
            s.recipes = page.data;
        });
    }

    /// Move the page cursor only; fetching the matching envelope is the
    /// collaborator's job.
    pub fn set_current_page(&self, page: u32) {
        self.state.update(|s| s.current_page = page);
    }

    /// Drop the entry with the matching id, if present.
    pub fn remove_by_id(&self, id: RecipeId) {
        tracing::debug!("catalog: remove recipe {}", id.0);
        self.state.update(|s| s.recipes.retain(|r| r.id != id));
    }

    /// Append a recipe. Count metadata is left for the next envelope fetch.
    pub fn insert(&self, recipe: PersistedRecipe) {
        self.state.update(|s| s.recipes.push(recipe));
    }

    /// Replace the entry with the matching id in place; no-op if absent.
    pub fn update(&self, id: RecipeId, recipe: PersistedRecipe) {
        self.state.update(|s| {
            if let Some(slot) = s.recipes.iter_mut().find(|r| r.id == id) {
                *slot = recipe;
            }
        });
    }

    /// Reconciliation entry point after any create-or-update round trip:
    /// replace in place when the id is already visible, append otherwise.
    pub fn upsert(&self, recipe: PersistedRecipe) {
        tracing::debug!("catalog: upsert recipe {}", recipe.id.0);
        self.state.update(|s| {
            match s.recipes.iter_mut().find(|r| r.id == recipe.id) {
                Some(slot) => *slot = recipe,
                None => s.recipes.push(recipe),
            }
        });
    }
}

impl Default for RecipeCatalog {
    fn default() -> Self {
        RecipeCatalog::new()
    }
}
