//! Application core: event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use netmap_core::{
    Command, CommandResult, Confirmation, Controller, PromotionOutcome, PromotionRequest,
};

use crate::action::{Action, ConfirmAction, DeviceLoad, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

/// File name the `x` key writes into the export directory.
pub const EXPORT_FILE: &str = "network_data.json";

const TOAST_TTL: Duration = Duration::from_secs(3);

/// Connection status as seen by the TUI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Disconnected(String),
}

/// Top-level application state and event loop.
pub struct App {
    active_screen: ScreenId,
    previous_screen: Option<ScreenId>,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    connection_status: ConnectionStatus,
    help_visible: bool,
    /// Path being typed into the import popup, when open.
    import_input: Option<String>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    controller: Controller,
    export_dir: PathBuf,
    data_cancel: CancellationToken,
    /// Pending confirmation dialog (blocks other input while active).
    pending_confirm: Option<ConfirmAction>,
    notification: Option<(Notification, Instant)>,
    /// Label of the backend call in flight.
    busy: Option<String>,
    throbber_state: ThrobberState,
}

impl App {
    pub fn new(controller: Controller, export_dir: PathBuf) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens(&controller).into_iter().collect();

        Self {
            active_screen: ScreenId::default(),
            previous_screen: None,
            screens,
            running: true,
            connection_status: ConnectionStatus::default(),
            help_visible: false,
            import_input: None,
            action_tx,
            action_rx,
            controller,
            export_dir,
            data_cancel: CancellationToken::new(),
            pending_confirm: None,
            notification: None,
            busy: None,
            throbber_state: ThrobberState::default(),
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop until quit.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;

        let bridge = {
            let controller = self.controller.clone();
            let cancel = self.data_cancel.clone();
            let tx = self.action_tx.clone();
            tokio::spawn(async move {
                crate::data_bridge::spawn_data_bridge(controller, tx, cancel).await;
            })
        };

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        // Stop sampling before the controller goes away.
        for screen in self.screens.values_mut() {
            screen.set_focused(false);
        }
        self.data_cancel.cancel();
        events.stop();
        let _ = bridge.await;
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Global keys are handled here; everything else goes to the active
    /// screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        if let Some(input) = self.import_input.as_mut() {
            return Ok(match key.code {
                KeyCode::Esc => Some(Action::CloseImport),
                KeyCode::Enter => Some(Action::RequestImport(input.trim().to_owned())),
                KeyCode::Backspace => {
                    input.pop();
                    Some(Action::ImportInput(input.clone()))
                }
                KeyCode::Char(c) => {
                    input.push(c);
                    Some(Action::ImportInput(input.clone()))
                }
                _ => None,
            });
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            if screen.captures_input() {
                return screen.handle_key_event(key);
            }
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),

            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                let n = c.to_digit(10).and_then(|d| u8::try_from(d).ok());
                if let Some(screen) = n.and_then(ScreenId::from_number) {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (KeyModifiers::NONE, KeyCode::Esc) => return Ok(Some(Action::GoBack)),

            (KeyModifiers::NONE, KeyCode::Char('r')) => return Ok(Some(Action::RequestRefresh)),
            (KeyModifiers::NONE, KeyCode::Char('s')) => return Ok(Some(Action::RequestScan)),
            (KeyModifiers::NONE, KeyCode::Char('x')) => return Ok(Some(Action::RequestExport)),
            (KeyModifiers::NONE, KeyCode::Char('i')) => return Ok(Some(Action::OpenImport)),

            _ => {}
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    /// Update app state, then propagate to components.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Resize(..) | Action::Render => {}

            Action::SwitchScreen(target) => self.switch_screen(*target),

            Action::GoBack => {
                if let Some(prev) = self.previous_screen.take() {
                    self.switch_screen(prev);
                }
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, created)| created.elapsed() > TOAST_TTL)
                {
                    self.notification = None;
                }
                if self.busy.is_some() {
                    self.throbber_state.calc_next();
                }
            }

            Action::Connected => self.connection_status = ConnectionStatus::Connected,
            Action::Disconnected(reason) => {
                if self.connection_status == ConnectionStatus::Connecting {
                    self.action_tx.send(Action::Notify(Notification::error(format!(
                        "Backend unreachable: {reason}"
                    ))))?;
                }
                self.connection_status = ConnectionStatus::Disconnected(reason.clone());
            }

            // Data updates go to ALL screens so they stay in sync
            Action::DevicesUpdated(_) | Action::CidrLoaded(_) | Action::DeviceLoaded(_) => {
                if let Action::DeviceLoaded(DeviceLoad::Failed { message, .. }) = action {
                    self.action_tx
                        .send(Action::Notify(Notification::error(message.clone())))?;
                }
                for screen in self.screens.values_mut() {
                    if let Some(follow_up) = screen.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            Action::OpenDevice(_) => {
                if let Some(screen) = self.screens.get_mut(&ScreenId::Device) {
                    if let Some(follow_up) = screen.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
                self.switch_screen(ScreenId::Device);
            }

            // ── Directory actions ─────────────────────────────────
            Action::RequestRefresh => {
                self.execute_command(Command::Refresh, |result| match result {
                    CommandResult::Refreshed { count } => {
                        vec![Action::Notify(Notification::info(format!(
                            "Loaded {count} devices"
                        )))]
                    }
                    _ => Vec::new(),
                });
            }
            Action::RequestScan => {
                self.execute_command(Command::Scan, |result| match result {
                    CommandResult::Scanned { count } => {
                        vec![Action::Notify(Notification::success(format!(
                            "Scan complete: {count} devices"
                        )))]
                    }
                    _ => Vec::new(),
                });
            }
            Action::RequestExport => self.export(),

            Action::OpenImport => self.import_input = Some(String::new()),
            Action::CloseImport => self.import_input = None,
            Action::ImportInput(text) => self.import_input = Some(text.clone()),
            Action::RequestImport(path) => {
                self.import_input = None;
                self.import(PathBuf::from(path));
            }

            Action::RequestEnrich { ip, kind } => {
                let ip = *ip;
                self.execute_command(Command::Enrich { kind: *kind, ip }, move |result| {
                    match result {
                        CommandResult::Enriched(device) => vec![
                            Action::DeviceLoaded(DeviceLoad::Loaded(Arc::new(*device))),
                            Action::Notify(Notification::success(format!("Enriched {ip}"))),
                        ],
                        _ => Vec::new(),
                    }
                });
            }

            Action::Busy(label) => {
                self.busy.clone_from(label);
            }

            // ── Confirm dialog ────────────────────────────────────
            Action::ShowConfirm(confirm) => self.pending_confirm = Some(confirm.clone()),
            Action::ConfirmYes => {
                if let Some(ConfirmAction::Promote(request)) = self.pending_confirm.take() {
                    self.promote(request, Confirmation::Affirmed);
                }
            }
            Action::ConfirmNo => {
                if let Some(ConfirmAction::Promote(request)) = self.pending_confirm.take() {
                    self.promote(request, Confirmation::Declined);
                }
            }

            Action::Notify(n) => self.notification = Some((n.clone(), Instant::now())),
        }
        Ok(())
    }

    fn switch_screen(&mut self, target: ScreenId) {
        if target == self.active_screen {
            return;
        }
        debug!("switching screen: {} → {}", self.active_screen, target);
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(false);
        }
        self.previous_screen = Some(self.active_screen);
        self.active_screen = target;
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
    }

    // ── Command execution ─────────────────────────────────────────

    /// Spawn a command; `on_ok` maps its result to follow-up actions.
    /// Failures become an error toast.
    fn execute_command<F>(&self, cmd: Command, on_ok: F)
    where
        F: FnOnce(CommandResult) -> Vec<Action> + Send + 'static,
    {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        let label = cmd.label();
        let _ = tx.send(Action::Busy(Some(format!("{label}…"))));

        tokio::spawn(async move {
            match controller.execute(cmd).await {
                Ok(result) => {
                    for action in on_ok(result) {
                        let _ = tx.send(action);
                    }
                }
                Err(e) => {
                    warn!(command = label, error = %e, "command failed");
                    let _ = tx.send(Action::Notify(Notification::error(e.to_string())));
                }
            }
            let _ = tx.send(Action::Busy(None));
        });
    }

    fn export(&self) {
        let path = self.export_dir.join(EXPORT_FILE);
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        let _ = tx.send(Action::Busy(Some("export…".into())));

        tokio::spawn(async move {
            let outcome = match controller.execute(Command::Export).await {
                Ok(CommandResult::Exported(bytes)) => tokio::fs::write(&path, &bytes)
                    .await
                    .map(|()| bytes.len())
                    .map_err(|e| format!("Cannot write {}: {e}", path.display())),
                Ok(_) => Err("unexpected export result".to_owned()),
                Err(e) => Err(e.to_string()),
            };
            let toast = match outcome {
                Ok(size) => {
                    info!(path = %path.display(), size, "snapshot exported");
                    Notification::success(format!("Exported to {}", path.display()))
                }
                Err(message) => {
                    warn!(error = %message, "export failed");
                    Notification::error(message)
                }
            };
            let _ = tx.send(Action::Notify(toast));
            let _ = tx.send(Action::Busy(None));
        });
    }

    fn import(&self, path: PathBuf) {
        if path.as_os_str().is_empty() {
            let _ = self
                .action_tx
                .send(Action::Notify(Notification::error("No file given")));
            return;
        }
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let content = match tokio::fs::read(&path).await {
                Ok(content) => content,
                Err(e) => {
                    let _ = tx.send(Action::Notify(Notification::error(format!(
                        "Cannot read {}: {e}",
                        path.display()
                    ))));
                    return;
                }
            };
            let cmd = Command::Import {
                file_name: import_file_name(&path),
                content,
            };
            let _ = tx.send(Action::Busy(Some("import…".into())));
            match controller.execute(cmd).await {
                Ok(CommandResult::Imported { count }) => {
                    let _ = tx.send(Action::Notify(Notification::success(format!(
                        "Imported {count} devices"
                    ))));
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "import failed");
                    let _ = tx.send(Action::Notify(Notification::error(e.to_string())));
                }
            }
            let _ = tx.send(Action::Busy(None));
        });
    }

    fn promote(&self, request: PromotionRequest, confirmation: Confirmation) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        if confirmation == Confirmation::Affirmed {
            let _ = tx.send(Action::Busy(Some("promote…".into())));
        }

        tokio::spawn(async move {
            match controller.promote(&request, confirmation).await {
                Ok(PromotionOutcome::Promoted { device }) => {
                    let class = request.class();
                    let _ = tx.send(Action::DeviceLoaded(DeviceLoad::Loaded(Arc::new(device))));
                    let _ = tx.send(Action::Notify(Notification::success(format!(
                        "{} is now a {class}",
                        request.ip()
                    ))));
                }
                Ok(PromotionOutcome::Declined) => {
                    let _ = tx.send(Action::Notify(Notification::info("Promotion cancelled")));
                }
                Err(e) => {
                    let _ = tx.send(Action::Notify(Notification::error(e.to_string())));
                }
            }
            if confirmation == Confirmation::Affirmed {
                let _ = tx.send(Action::Busy(None));
            }
        });
    }

    // ── Rendering ─────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let [content_area, tab_area, status_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, content_area);
        }
        self.render_tab_bar(frame, tab_area);
        self.render_status_bar(frame, status_area);

        // Overlays, last is topmost
        if let Some((ref notif, _)) = self.notification {
            render_notification(frame, area, notif);
        }
        if let Some(ref input) = self.import_input {
            render_import_popup(frame, area, input);
        }
        if let Some(ref confirm) = self.pending_confirm {
            render_confirm_dialog(frame, area, confirm);
        }
        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(format!(" {} {} ", id.number(), id.label()), style))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );
        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let indicator = match &self.connection_status {
            ConnectionStatus::Connected => {
                Span::styled("● connected", Style::default().fg(theme::ONLINE_GREEN))
            }
            ConnectionStatus::Connecting => {
                Span::styled("◐ connecting", Style::default().fg(theme::AMBER))
            }
            ConnectionStatus::Disconnected(_) => {
                Span::styled("○ disconnected", Style::default().fg(theme::OFFLINE_RED))
            }
        };

        let hints = Span::styled(
            " │ ? help  r refresh  s scan  x export  i import  q quit",
            theme::key_hint(),
        );

        match &self.busy {
            Some(label) => {
                let [left, right] =
                    Layout::horizontal([Constraint::Min(1), Constraint::Length(20)]).areas(area);
                frame.render_widget(
                    Paragraph::new(Line::from(vec![Span::raw(" "), indicator, hints])),
                    left,
                );
                let throbber = Throbber::default()
                    .label(label.as_str())
                    .style(theme::muted())
                    .throbber_style(Style::default().fg(theme::ACCENT));
                frame.render_stateful_widget(throbber, right, &mut self.throbber_state.clone());
            }
            None => {
                frame.render_widget(
                    Paragraph::new(Line::from(vec![Span::raw(" "), indicator, hints])),
                    area,
                );
            }
        }
    }
}

/// File name sent with an import upload.
fn import_file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| EXPORT_FILE.to_owned(), |n| n.to_string_lossy().into_owned())
}

/// Centered rect of at most `width` x `height`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    Rect::new(area.x + x, area.y + y, width, height)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_area = centered(area, 60, 22);
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_PANEL));
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let row = |key: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
            Span::styled(what, theme::key_hint()),
        ])
    };
    let heading = |text: &'static str| Line::from(Span::styled(text, theme::title()));

    let help_text = vec![
        heading("  Navigation"),
        row("1-2 Tab", "Switch screen"),
        row("j/k ↑/↓", "Move selection"),
        row("g/G", "First / last device"),
        row("Enter", "Open device / promote tag"),
        row("Esc", "Back / close"),
        Line::from(""),
        heading("  Topology"),
        row("c", "Connect selected (press twice)"),
        row("u", "Remove last connection"),
        Line::from(""),
        heading("  Device"),
        row("h/l", "Choose promotable tag"),
        row("e", "Enrich (nmap / SNMP)"),
        Line::from(""),
        heading("  Global"),
        row("r", "Refresh directory"),
        row("s", "Run discovery scan"),
        row("x / i", "Export / import snapshot"),
        row("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled("  Esc or ? to close", theme::key_hint())),
    ];
    frame.render_widget(Paragraph::new(help_text), inner);
}

fn render_confirm_dialog(frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
    let dialog_area = centered(area, 50, 5);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" Confirm ")
        .title_style(theme::title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::AMBER))
        .style(Style::default().bg(theme::BG_PANEL));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let text = vec![
        Line::from(Span::styled(format!("  {confirm}"), theme::text())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y ", theme::key_hint_key()),
            Span::styled("confirm    ", theme::key_hint()),
            Span::styled("n ", theme::key_hint_key()),
            Span::styled("cancel", theme::key_hint()),
        ]),
    ];
    frame.render_widget(Paragraph::new(text), inner);
}

fn render_import_popup(frame: &mut Frame, area: Rect, input: &str) {
    let popup = centered(area, 60, 5);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Import snapshot ")
        .title_style(theme::title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_PANEL));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let text = vec![
        Line::from(vec![
            Span::styled("  File: ", theme::muted()),
            Span::styled(input.to_owned(), theme::text()),
            Span::styled("█", Style::default().fg(theme::CYAN)),
        ]),
        Line::from(""),
        Line::from(Span::styled("  Enter upload  Esc cancel", theme::key_hint())),
    ];
    frame.render_widget(Paragraph::new(text), inner);
}

/// Toast in the bottom-right corner, above the status bar.
fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
    let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
    let width = msg_len.saturating_add(6).clamp(20, 60).min(area.width);
    let height = 3u16;

    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 2);
    let toast_area = Rect::new(area.x + x, area.y + y, width, height);

    let (border_color, icon) = match notif.level {
        NotificationLevel::Success => (theme::ONLINE_GREEN, "✓"),
        NotificationLevel::Error => (theme::OFFLINE_RED, "✗"),
        NotificationLevel::Info => (theme::CYAN, "·"),
    };

    frame.render_widget(Clear, toast_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(theme::BG_PANEL));
    let inner = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
        Span::styled(notif.message.clone(), theme::text()),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn import_uploads_under_the_files_own_name() {
        assert_eq!(import_file_name(Path::new("/tmp/lab/net.json")), "net.json");
        assert_eq!(import_file_name(Path::new("/")), EXPORT_FILE);
    }

    #[test]
    fn centered_popups_fit_small_terminals() {
        let area = Rect::new(0, 0, 30, 6);
        let popup = centered(area, 60, 22);
        assert!(popup.width <= area.width && popup.height <= area.height);
        assert_eq!(centered(Rect::new(0, 0, 100, 40), 50, 5), Rect::new(25, 17, 50, 5));
    }
}
