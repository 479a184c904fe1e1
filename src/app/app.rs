//! Main application controller
//!
//! Owns the terminal, the navigation state and the mounted screen. Every
//! navigation mounts a fresh screen from the catalog.

use crate::{
    app::{
        screens::ScreenView,
        state::{InputAction, StateManager},
        tui::Tui,
    },
    config::{AppConfig, ScreenCatalog},
    flow::{AnimationSettings, NavigationHost, ScreenRegistry},
    models::{NavigationRequest, ScreenId},
    LinguaError, Result,
};
use serde_json::Map;
use std::time::Instant;
use tracing::{debug, error, info};

/// Screen lifecycle without the terminal
///
/// Kept apart from [`App`] so navigation can be driven headless.
#[derive(Debug)]
pub struct Session {
    catalog: ScreenCatalog,
    animations: AnimationSettings,
    state_manager: StateManager,
    view: ScreenView,
}

impl Session {
    /// Validate `catalog` and mount its initial screen
    pub fn new(catalog: ScreenCatalog, animations: AnimationSettings) -> Result<Self> {
        let registry = catalog.registry();
        catalog.validate(&registry)?;

        let state_manager = StateManager::new(catalog.initial, registry);
        let view = Self::mount_view(&catalog, catalog.initial, Map::new(), &animations)?;
        Ok(Self {
            catalog,
            animations,
            state_manager,
            view,
        })
    }

    pub fn current_screen(&self) -> ScreenId {
        self.state_manager.current_screen()
    }

    pub fn view(&self) -> &ScreenView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ScreenView {
        &mut self.view
    }

    pub fn state(&self) -> &StateManager {
        &self.state_manager
    }

    pub fn should_quit(&self) -> bool {
        self.state_manager.should_quit()
    }

    /// Apply one input action, remounting if it caused a navigation
    pub fn handle(&mut self, action: InputAction) -> Result<()> {
        match action {
            InputAction::Quit => {
                self.state_manager.quit();
                return Ok(());
            }
            InputAction::Char('q') | InputAction::Char('Q') if !self.view.accepts_text() => {
                self.state_manager.quit();
                return Ok(());
            }
            InputAction::None => return Ok(()),
            _ => {}
        }

        if let Some(outcome) = self.view.handle(&action, &mut self.state_manager) {
            debug!(screen = %self.view.controller().id(), ?outcome, "continue");
        }
        if let Some(request) = self.state_manager.take_pending() {
            self.remount(request)?;
        }
        Ok(())
    }

    /// Advance time-based effects
    pub fn tick(&mut self, now: Instant) {
        self.view.tick(now);
    }

    fn remount(&mut self, request: NavigationRequest) -> Result<()> {
        let destination = request.destination();
        self.view = Self::mount_view(
            &self.catalog,
            destination,
            request.into_params(),
            &self.animations,
        )?;
        Ok(())
    }

    fn mount_view(
        catalog: &ScreenCatalog,
        id: ScreenId,
        params: Map<String, serde_json::Value>,
        animations: &AnimationSettings,
    ) -> Result<ScreenView> {
        let spec = catalog
            .get(id)
            .ok_or_else(|| LinguaError::CatalogError(format!("screen '{}' is not in the catalog", id)))?;
        Ok(ScreenView::mount(spec, params, animations))
    }
}

impl NavigationHost for Session {
    fn navigate(&mut self, request: NavigationRequest) {
        self.state_manager.navigate(request);
        if let Some(request) = self.state_manager.take_pending() {
            if let Err(e) = self.remount(request) {
                error!(error = %e, "failed to mount screen");
            }
        }
    }

    fn go_back(&mut self) {
        self.state_manager.go_back();
        if let Some(request) = self.state_manager.take_pending() {
            if let Err(e) = self.remount(request) {
                error!(error = %e, "failed to mount screen");
            }
        }
    }

    fn registry(&self) -> ScreenRegistry {
        self.state_manager.registry()
    }
}

/// TUI application controller
pub struct App {
    tui: Tui,
    session: Session,
}

impl App {
    /// Create the application from loaded preferences
    pub fn new(config: &AppConfig) -> Result<Self> {
        let catalog = config.load_catalog()?;
        Self::with_catalog(config, catalog)
    }

    pub fn with_catalog(config: &AppConfig, catalog: ScreenCatalog) -> Result<Self> {
        let animations = AnimationSettings {
            play_intro: config.play_intro,
            intro_duration: config.intro_duration,
        };
        Ok(Self {
            tui: Tui::new(config.tick_rate)?,
            session: Session::new(catalog, animations)?,
        })
    }

    /// Initialize the terminal
    pub fn init(&mut self) -> Result<()> {
        self.tui
            .init()
            .map_err(|e| LinguaError::TuiError(format!("Failed to initialize terminal: {}", e)))
    }

    /// Run the main application loop until the user quits
    pub fn run(&mut self) -> Result<()> {
        info!(
            screen = %self.session.current_screen(),
            tick_rate = ?self.tui.tick_rate(),
            "starting"
        );
        while !self.session.should_quit() {
            let now = Instant::now();
            self.session.tick(now);
            let view = self.session.view_mut();
            self.tui.draw(|f| view.render(f, now))?;

            if let Some(key) = self.tui.next_key()? {
                self.session.handle(StateManager::key_to_action(key))?;
            }
        }
        info!("quit");
        Ok(())
    }

    /// Restore the terminal
    pub fn restore(&mut self) -> Result<()> {
        self.tui.restore()?;
        Ok(())
    }
}
