//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: conversation state machine
//! - [`Bridge`]: channel bridge
//! - [`Driver`]: platform-specific I/O

use crate::{App, AppAction, AppEvent, Bridge, ChatConfig, Driver, Polled};

/// Generic runtime that orchestrates App, Bridge, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
pub struct Runtime<D>
where
    D: Driver,
{
    driver: D,
    app: App<D::Instant>,
    bridge: Bridge,
}

impl<D> Runtime<D>
where
    D: Driver,
{
    /// Create a new runtime with the given driver and configuration.
    pub fn new(driver: D, config: ChatConfig) -> Self {
        Self { driver, app: App::new(config), bridge: Bridge::new() }
    }

    /// Run the main event loop until the App asks to quit.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        self.driver.render(&self.app)?;

        let actions = self.app.load_rooms();
        if !self.process_actions(actions)? {
            while !self.process_cycle().await? {}
        }

        self.driver.stop();
        Ok(())
    }

    /// Process one polled input.
    ///
    /// Returns `true` if the application should quit.
    async fn process_cycle(&mut self) -> Result<bool, D::Error> {
        match self.driver.poll_event(&mut self.app).await? {
            Polled::Actions(actions) => self.process_actions(actions),
            Polled::Channel { session, event } => {
                let now = self.driver.now();
                let events = self.bridge.handle_channel_event(session, event, now);
                self.execute_outgoing()?;
                self.process_bridge_events(events)
            },
        }
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.driver.render(&self.app)?,
                    AppAction::Quit => return Ok(true),
                    AppAction::FetchRooms => self.driver.fetch_rooms()?,
                    AppAction::FetchHistory { session, room_id, page, page_size } => {
                        self.driver.fetch_history(session, room_id, page, page_size)?;
                    },

                    // Channel operations go through the bridge
                    AppAction::OpenChannel { .. }
                    | AppAction::SendFrame { .. }
                    | AppAction::CloseChannel { .. } => {
                        let now = self.driver.now();
                        let events = self.bridge.process_app_action(action, now);
                        self.execute_outgoing()?;
                        for event in events {
                            pending_actions.extend(self.app.handle(event));
                        }
                    },
                }
            }
        }
        Ok(false)
    }

    /// Process events from Bridge back to App.
    fn process_bridge_events(&mut self, events: Vec<AppEvent<D::Instant>>) -> Result<bool, D::Error> {
        for event in events {
            let actions = self.app.handle(event);
            if self.process_actions(actions)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Hand pending transport commands to the driver.
    fn execute_outgoing(&mut self) -> Result<(), D::Error> {
        for command in self.bridge.take_outgoing() {
            self.driver.execute(command)?;
        }
        Ok(())
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App<D::Instant> {
        &self.app
    }

    /// Get a mutable reference to the App
    pub fn app_mut(&mut self) -> &mut App<D::Instant> {
        &mut self.app
    }

    /// Get a reference to the Bridge
    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }
}
