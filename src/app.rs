use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::{LookupError, StoreError};
use crate::forms::{EditForm, LibraryForm, ReviewForm};
use crate::modal::ModalHost;
use crate::models::{today_label, Bucket, ItemId, Section};
use crate::notifications::{Notification, Notifier};
use crate::render;
use crate::state::AppState;
use crate::store::RemoteStore;

/// What a remote call did to the optimistic local change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Remote copy matches the local change
    Synced,
    /// Local change kept, remote copy is stale
    Diverged(String),
    /// Remote call failed and nothing was applied locally
    Failed(String),
    /// No remote call was made
    Skipped,
}

/// Result of a user mutation: whether local state changed, and how the sync went
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub applied: bool,
    pub sync: SyncOutcome,
}

impl Transition {
    fn rejected() -> Self {
        Self {
            applied: false,
            sync: SyncOutcome::Skipped,
        }
    }

    fn applied(sync: SyncOutcome) -> Self {
        Self { applied: true, sync }
    }

    fn failed(err: &StoreError) -> Self {
        Self {
            applied: false,
            sync: SyncOutcome::Failed(err.to_string()),
        }
    }

    pub fn is_diverged(&self) -> bool {
        matches!(self.sync, SyncOutcome::Diverged(_))
    }
}

/// The client: local state, its backend, and the chrome it drives
pub struct App<S: RemoteStore, N: Notifier> {
    store: S,
    notifier: N,
    config: Config,
    state: AppState,
    modal: ModalHost,
    community: Vec<(Section, String)>,
    stats: [(Bucket, usize); 4],
}

impl<S: RemoteStore, N: Notifier> App<S, N> {
    pub fn new(store: S, notifier: N, config: Config) -> Self {
        let state = AppState::new();
        let stats = state.library().counts();
        Self {
            store,
            notifier,
            config,
            state,
            modal: ModalHost::new(),
            community: Vec::new(),
            stats,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn modal(&self) -> &ModalHost {
        &self.modal
    }

    pub fn modal_mut(&mut self) -> &mut ModalHost {
        &mut self.modal
    }

    /// Last rendered community blocks, one per section that has reviews
    pub fn community_view(&self) -> &[(Section, String)] {
        &self.community
    }

    /// Bucket counts as last displayed
    pub fn stats(&self) -> [(Bucket, usize); 4] {
        self.stats
    }

    fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    fn user_id(&self) -> &str {
        &self.config.api.user_id
    }

    /// Load both collections, then render
    #[instrument(skip(self))]
    pub async fn bootstrap(&mut self) {
        info!("Loading data from backend");

        let reviews_ok = self.load_reviews().await;
        let library_ok = self.load_library().await;

        self.render_community();

        if reviews_ok && library_ok {
            self.notify(Notification::success("Conectado a la base de datos"));
        } else {
            self.notify(Notification::warning(
                "Sin conexión con la base de datos, mostrando datos locales",
            ));
        }

        info!(
            reviews = self.state.reviews().len(),
            items = self.state.library().total(),
            "Client ready"
        );
    }

    /// Replace the review cache with the server copy. On failure the cache keeps its old value.
    pub async fn load_reviews(&mut self) -> bool {
        match self.store.fetch_reviews().await {
            Ok(reviews) => {
                debug!(count = reviews.len(), "Review cache replaced");
                self.state.replace_reviews(reviews);
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to load reviews");
                false
            }
        }
    }

    /// Replace the library cache with the server copy. On failure the cache keeps its old value.
    pub async fn load_library(&mut self) -> bool {
        match self.store.fetch_library(&self.config.api.user_id).await {
            Ok(library) => {
                debug!(items = library.total(), "Library cache replaced");
                self.state.replace_library(library);
                // Ids generated while decoding must reach the backend before anyone uses them
                if self.state.library().has_unstored_ids() {
                    info!("Writing back generated library item ids");
                    self.persist_library().await;
                }
                self.refresh_stats();
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to load library");
                false
            }
        }
    }

    pub fn render_community(&mut self) {
        let preview_chars = self.config.ui.preview_chars;
        self.community = Section::ALL
            .into_iter()
            .filter_map(|section| {
                let reviews = self.state.reviews_in_section(section);
                render::community_section(section, &reviews, preview_chars)
                    .map(|html| (section, html))
            })
            .collect();
    }

    pub fn refresh_stats(&mut self) {
        self.stats = self.state.library().counts();
    }

    /// Validate, append locally, then submit. The form is cleared afterwards
    /// unless validation failed.
    #[instrument(skip(self, form))]
    pub async fn submit_review(&mut self, form: &mut ReviewForm, section: Section) -> Transition {
        let review = match form.clone().into_review(section, self.state.author_name(), today_label()) {
            Ok(review) => review,
            Err(e) => {
                debug!(field = e.field(), "Review form incomplete");
                self.notify(Notification::warning(e.to_string()));
                return Transition::rejected();
            }
        };

        self.state.push_review(review.clone());

        let transition = match self.store.create_review(&review).await {
            Ok(()) => {
                self.notify(Notification::success("¡Reseña publicada en la base de datos!"));
                // Server copy carries the assigned id; it replaces the local one
                let refreshed = self.load_reviews().await;
                self.render_community();
                if refreshed {
                    Transition::applied(SyncOutcome::Synced)
                } else {
                    Transition::applied(SyncOutcome::Diverged(
                        "review saved but the refreshed list could not be loaded".to_string(),
                    ))
                }
            }
            Err(e) => {
                warn!(error = %e, name = %review.name, "Review kept locally only");
                self.notify(Notification::warning(
                    "Reseña publicada localmente, error al sincronizar",
                ));
                Transition::applied(SyncOutcome::Diverged(e.to_string()))
            }
        };

        form.reset();
        info!(name = %review.name, section = %section, "Review submitted");
        transition
    }

    /// Delete a review after confirmation. The cache changes only once the
    /// backend accepts the deletion.
    #[instrument(skip(self, confirm))]
    pub async fn delete_review<C>(&mut self, id: &str, confirm: C) -> Transition
    where
        C: FnOnce(&str) -> bool,
    {
        let name = match self.state.find_review(id) {
            Ok(review) => review.name.clone(),
            Err(_) => {
                self.notify(Notification::warning("Reseña no encontrada"));
                return Transition::rejected();
            }
        };

        if !confirm(&format!("¿Estás seguro de eliminar la reseña de \"{}\"?", name)) {
            debug!("Deletion cancelled");
            return Transition::rejected();
        }

        match self.store.delete_review(id).await {
            Ok(()) => {
                self.state.remove_review(id);
                self.notify(Notification::success("Reseña eliminada correctamente"));
                self.render_community();
                Transition::applied(SyncOutcome::Synced)
            }
            Err(e @ StoreError::Rejected { .. }) => {
                warn!(error = %e, "Backend refused deletion");
                self.notify(Notification::error("Error al eliminar la reseña"));
                Transition::failed(&e)
            }
            Err(e) => {
                warn!(error = %e, "Failed to delete review");
                self.notify(Notification::error("Error de conexión al eliminar"));
                Transition::failed(&e)
            }
        }
    }

    /// Open one review in the modal
    pub fn show_review(&mut self, id: &str) -> Result<(), LookupError> {
        let (title, body) = render::review_detail(self.state.find_review(id)?);
        self.modal.open(title, body);
        Ok(())
    }

    /// Open every review whose title matches, ignoring case
    pub fn show_title_reviews(&mut self, title: &str) {
        let reviews = self.state.reviews_for_title(title);
        let (heading, body) = render::title_reviews(title, &reviews);
        self.modal.open(heading, body);
    }

    pub fn show_library(&mut self) {
        let body = render::library_view(self.state.library());
        self.modal.open("📚 Mi Biblioteca Completa", body);
    }

    pub fn show_add_form(&mut self, bucket: Bucket) {
        self.modal
            .open("📚 Agregar a Mi Biblioteca", render::library_add_form(bucket));
    }

    pub fn show_edit_form(&mut self, bucket: Bucket, id: ItemId) -> Result<(), LookupError> {
        let item = self
            .state
            .library()
            .find(bucket, id)
            .ok_or(LookupError::ItemNotFound { bucket, id })?;
        let body = render::library_edit_form(bucket, item);
        self.modal.open("✏️ Editar Item", body);
        Ok(())
    }

    async fn persist_library(&mut self) -> SyncOutcome {
        let result = self
            .store
            .replace_library(self.user_id(), self.state.library())
            .await;
        match result {
            Ok(()) => {
                self.state.mark_library_stored();
                SyncOutcome::Synced
            }
            Err(e) => {
                warn!(error = %e, "Library kept locally only");
                SyncOutcome::Diverged(e.to_string())
            }
        }
    }

    /// Close the modal, wait for its exit transition, then show the listing again
    async fn reopen_library(&mut self) {
        self.modal.close();
        let delay = self.config.ui.rerender_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.show_library();
    }

    #[instrument(skip(self, form), fields(bucket = %form.bucket))]
    pub async fn add_library_item(&mut self, form: LibraryForm) -> Transition {
        let bucket = form.bucket;
        let item = match form.into_item(today_label()) {
            Ok(item) => item,
            Err(e) => {
                self.notify(Notification::warning(e.to_string()));
                return Transition::rejected();
            }
        };
        let name = item.name.clone();

        self.state.add_item(bucket, item);

        let sync = self.persist_library().await;
        match sync {
            SyncOutcome::Synced => self.notify(Notification::success(format!("{} guardado!", name))),
            _ => self.notify(Notification::warning(format!(
                "{} agregado localmente, error al sincronizar",
                name
            ))),
        }

        self.modal.close();
        self.refresh_stats();
        info!(name = %name, "Library item added");
        Transition::applied(sync)
    }

    #[instrument(skip(self, form))]
    pub async fn edit_library_item(&mut self, bucket: Bucket, id: ItemId, form: EditForm) -> Transition {
        if let Err(e) = form.validate() {
            self.notify(Notification::warning(e.to_string()));
            return Transition::rejected();
        }

        match self.state.item_mut(bucket, id) {
            Ok(item) => form.apply_to(bucket, item),
            Err(e) => {
                debug!(error = %e, "Edit target missing");
                self.notify(Notification::warning("Item no encontrado"));
                return Transition::rejected();
            }
        }

        let sync = self.persist_library().await;
        match sync {
            SyncOutcome::Synced => self.notify(Notification::success("Cambios guardados en la base de datos!")),
            _ => self.notify(Notification::warning("Error al guardar en la base de datos")),
        }

        self.refresh_stats();
        self.reopen_library().await;
        Transition::applied(sync)
    }

    #[instrument(skip(self, confirm))]
    pub async fn delete_library_item<C>(&mut self, bucket: Bucket, id: ItemId, confirm: C) -> Transition
    where
        C: FnOnce(&str) -> bool,
    {
        let name = match self.state.library().find(bucket, id) {
            Some(item) => item.name.clone(),
            None => {
                self.notify(Notification::warning("Item no encontrado"));
                return Transition::rejected();
            }
        };

        if !confirm(&format!("¿Estás seguro de eliminar \"{}\"?", name)) {
            debug!("Deletion cancelled");
            return Transition::rejected();
        }

        if let Err(e) = self.state.remove_item(bucket, id) {
            self.notify(Notification::warning("Item no encontrado"));
            debug!(error = %e, "Item vanished before removal");
            return Transition::rejected();
        }

        let sync = self.persist_library().await;
        match sync {
            SyncOutcome::Synced => self.notify(Notification::success("Item eliminado correctamente")),
            _ => self.notify(Notification::warning("Error al eliminar de la base de datos")),
        }

        self.refresh_stats();
        self.reopen_library().await;
        info!(name = %name, "Library item deleted");
        Transition::applied(sync)
    }
}
