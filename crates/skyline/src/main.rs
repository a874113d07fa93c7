use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Style, Stylize},
    text::Line,
};
use skyline_config::{Config, ConfigError};
use skyline_core::{Clock, SystemClock, ThemeSelector, ThemeWatch};
use skyline_scene::{CellMetrics, Scene, SceneSettings};
use tracing::{info, warn};

mod logging;

/// Upper bound on how long the loop waits for input before ticking.
const MAX_POLL: Duration = Duration::from_millis(50);

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let config = load_config()?;
    logging::init(&config)?;

    let terminal = ratatui::init();
    let result = App::new(config).run(terminal);
    ratatui::restore();
    result
}

/// Load the config, writing a default file on first run.
fn load_config() -> color_eyre::Result<Config> {
    let path = match Config::path() {
        Ok(path) => path,
        Err(ConfigError::NoConfigDir) => return Ok(Config::default()),
        Err(e) => return Err(e.into()),
    };
    let config = Config::load_from(&path)?;
    if !path.exists() {
        // Not fatal: the sky works fine without a file on disk
        if let Err(e) = config.save_to(&path) {
            eprintln!("skyline: could not write default config: {e}");
        }
    }
    Ok(config)
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Whether the sky layer is mounted.
    sky_mounted: bool,
    /// Whether the key help line is shown.
    show_help: bool,
    /// Source of the theme; the scene only ever sees it through `theme_watch`.
    theme_selector: ThemeSelector,
    theme_watch: ThemeWatch,
    scene: Scene,
    clock: SystemClock,
    metrics: CellMetrics,
    poll_timeout: Duration,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config) -> Self {
        let settings = SceneSettings {
            star_count: config.star_count,
            bird_count: config.bird_count,
            twinkle_interval_ms: config.twinkle_interval_ms,
            flight_interval_ms: config.flight_interval_ms,
        };
        let scene = match config.seed {
            Some(seed) => Scene::with_seed(settings, seed),
            None => Scene::new(settings),
        };
        let theme_selector = ThemeSelector::new(config.theme.resolve());
        let theme_watch = theme_selector.watch();
        let shortest = config.twinkle_interval_ms.min(config.flight_interval_ms);

        Self {
            running: false,
            sky_mounted: false,
            show_help: true,
            theme_selector,
            theme_watch,
            scene,
            clock: SystemClock,
            metrics: CellMetrics::new(config.cell_width_px, config.cell_height_px),
            poll_timeout: Duration::from_millis(shortest).min(MAX_POLL),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        let size = terminal.size()?;
        self.mount_sky(size.width, size.height);

        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
            self.sync_theme();
            self.scene.on_tick(self.clock.now_ms());
        }
        Ok(())
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let now_ms = self.clock.now_ms();
        let theme = self.theme_watch.get();

        // Sky first so everything else draws over it
        if self.sky_mounted {
            self.scene.render(frame, area, self.metrics, now_ms);
        } else {
            frame.render_widget(
                ratatui::widgets::Block::new().style(Style::new().bg(theme.sky_color())),
                area,
            );
        }

        if !self.show_help {
            return;
        }

        let chunks = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).split(area);
        let color = theme.text_color();
        let help = Line::from(vec![
            "q".bold().fg(color),
            " quit  ".fg(color),
            "t".bold().fg(color),
            format!(" {} sky  ", theme.toggle()).fg(color),
            "m".bold().fg(color),
            if self.sky_mounted {
                " hide sky  ".fg(color)
            } else {
                " show sky  ".fg(color)
            },
            "h".bold().fg(color),
            " hide help".fg(color),
        ])
        .centered();
        frame.render_widget(help, chunks[1]);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Polls with a timeout no longer than the shortest tick interval.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if event::poll(self.poll_timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Resize(columns, rows) => self.on_resize(columns, rows),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('t')) => self.toggle_theme(),
            (_, KeyCode::Char('m')) => self.toggle_sky(),
            (_, KeyCode::Char('h')) => self.show_help = !self.show_help,
            _ => {}
        }
    }

    fn on_resize(&mut self, columns: u16, rows: u16) {
        let viewport = self.metrics.viewport(columns, rows);
        self.scene.on_resize(viewport, self.clock.now_ms());
    }

    /// Forward theme changes published since the last poll to the scene.
    fn sync_theme(&mut self) {
        if let Some(theme) = self.theme_watch.changed() {
            self.scene.on_theme_change(theme, self.clock.now_ms());
        }
    }

    fn toggle_theme(&mut self) {
        let theme = self.theme_selector.toggle();
        info!(%theme, "theme toggled");
    }

    fn mount_sky(&mut self, columns: u16, rows: u16) {
        let viewport = self.metrics.viewport(columns, rows);
        if !viewport.is_valid() {
            warn!(columns, rows, "terminal has no area yet");
        }
        self.scene
            .mount(viewport, self.theme_watch.get(), self.clock.now_ms());
        self.sky_mounted = true;
    }

    /// Unmount or remount the sky layer.
    fn toggle_sky(&mut self) {
        if self.sky_mounted {
            self.scene.unmount();
            self.sky_mounted = false;
        } else {
            let (columns, rows) = crossterm::terminal::size().unwrap_or((0, 0));
            self.mount_sky(columns, rows);
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use skyline_core::Theme;
    use skyline_scene::TaskKind;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        let config = Config {
            seed: Some(1),
            ..Config::default()
        };
        let mut app = App::new(config);
        app.theme_selector.set(Theme::Dark);
        app.theme_watch.changed();
        app.mount_sky(128, 48);
        app
    }

    #[test]
    fn test_theme_toggle_reaches_scene_on_sync() {
        let mut app = app();
        assert_eq!(app.scene.theme(), Theme::Dark);

        app.on_key_event(key(KeyCode::Char('t')));
        // Not applied until the loop polls the watch
        assert_eq!(app.scene.theme(), Theme::Dark);

        app.sync_theme();
        assert_eq!(app.scene.theme(), Theme::Light);
        assert!(app.scene.is_running(TaskKind::Flight));
    }

    #[test]
    fn test_resize_reseeds_scene_viewport() {
        let mut app = app();
        app.on_resize(80, 24);
        let viewport = app.scene.viewport().unwrap();
        assert_eq!((viewport.width, viewport.height), (640.0, 384.0));
        assert_eq!(app.scene.stars().len(), 100);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        app.running = true;
        app.on_key_event(key(KeyCode::Char('q')));
        assert!(!app.running);

        app.running = true;
        app.on_key_event(KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..key(KeyCode::Char('c'))
        });
        assert!(!app.running);
    }

    #[test]
    fn test_poll_timeout_follows_shortest_interval() {
        let app = App::new(Config {
            twinkle_interval_ms: 20,
            ..Config::default()
        });
        assert_eq!(app.poll_timeout, Duration::from_millis(20));
    }
}
