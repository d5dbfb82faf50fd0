//! Device detail screen: record, tags, ports, and the live bandwidth chart.
//!
//! The screen owns one [`BandwidthSampler`]. Opening another device
//! retargets it (the previous loop is cancelled first); leaving the screen
//! stops it.

use std::net::IpAddr;
use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, BorderType, Borders, Chart, Clear, Dataset, GraphType, Paragraph, Row, Table,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use netmap_core::{
    BandwidthSampler, Controller, CoreError, Device, DirectoryClient, EnrichKind, PromotionRequest,
    SampleKey, SampleWindow, SamplerState, Snapshot,
};

use crate::action::{Action, ConfirmAction, DeviceLoad, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::rate_fmt::{axis_ceiling, fmt_kbps, fmt_sample};

const ENRICH_CHOICES: [EnrichKind; 3] = [EnrichKind::Nmap, EnrichKind::Snmp, EnrichKind::Both];

/// What the screen is showing.
#[derive(Debug, Clone)]
enum Record {
    Empty,
    Loading(IpAddr),
    Loaded(Arc<Device>),
    NotFound(IpAddr),
    Failed { ip: IpAddr, message: String },
}

pub struct DeviceScreen {
    controller: Controller,
    action_tx: Option<UnboundedSender<Action>>,
    focused: bool,
    target: Option<IpAddr>,
    record: Record,
    sampler: BandwidthSampler<DirectoryClient>,
    /// Index into the device's promotable tags.
    tag_cursor: usize,
    /// Open enrich menu and its highlighted row.
    enrich_menu: Option<usize>,
}

impl DeviceScreen {
    pub fn new(controller: Controller) -> Self {
        let sampler = controller.bandwidth_sampler();
        Self {
            controller,
            action_tx: None,
            focused: false,
            target: None,
            record: Record::Empty,
            sampler,
            tag_cursor: 0,
            enrich_menu: None,
        }
    }

    fn device(&self) -> Option<&Arc<Device>> {
        match &self.record {
            Record::Loaded(device) => Some(device),
            _ => None,
        }
    }

    /// Switch the view to `ip`: show the cached record right away, then
    /// fetch a fresh one.
    fn open(&mut self, ip: IpAddr) {
        if self.target != Some(ip) {
            self.tag_cursor = 0;
            self.enrich_menu = None;
        }
        self.target = Some(ip);

        let cached = self.controller.directory().device_by_ip(ip);
        self.record = match cached {
            Some(cached) => {
                self.start_sampling(&cached);
                Record::Loaded(cached)
            }
            None => {
                self.sampler.stop();
                Record::Loading(ip)
            }
        };

        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        let controller = self.controller.clone();
        tokio::spawn(async move {
            let load = match controller.device(ip).await {
                Ok(device) => DeviceLoad::Loaded(Arc::new(device)),
                Err(CoreError::DeviceNotFound { ip }) => DeviceLoad::NotFound(ip),
                Err(e) => DeviceLoad::Failed {
                    ip,
                    message: e.to_string(),
                },
            };
            let _ = tx.send(Action::DeviceLoaded(load));
        });
    }

    fn apply_load(&mut self, load: &DeviceLoad) {
        let ip = match load {
            DeviceLoad::Loaded(device) => device.ip,
            DeviceLoad::NotFound(ip) | DeviceLoad::Failed { ip, .. } => *ip,
        };
        if self.target != Some(ip) {
            debug!(%ip, "dropping stale device load");
            return;
        }

        match load {
            DeviceLoad::Loaded(device) => {
                self.start_sampling(device);
                self.record = Record::Loaded(Arc::clone(device));
                self.clamp_tag_cursor();
            }
            DeviceLoad::NotFound(ip) => {
                self.sampler.stop();
                self.record = Record::NotFound(*ip);
            }
            // Keep showing what we had; the error goes to a toast.
            DeviceLoad::Failed { ip, message } => {
                if !matches!(self.record, Record::Loaded(_)) {
                    self.record = Record::Failed {
                        ip: *ip,
                        message: message.clone(),
                    };
                }
            }
        }
    }

    fn apply_snapshot(&mut self, devices: &Snapshot<Device>) {
        let Some(ip) = self.target else { return };
        if let Some(device) = devices.iter().find(|d| d.ip == ip) {
            if self.focused {
                self.start_sampling(device);
            }
            self.record = Record::Loaded(Arc::clone(device));
            self.clamp_tag_cursor();
        }
    }

    /// Retarget the sampler when the identity changed, or resume it.
    fn start_sampling(&mut self, device: &Device) {
        if !self.focused {
            return;
        }
        let key = SampleKey::new(device.ip, device.mac.clone());
        let polling_same = self.sampler.state() == SamplerState::Polling
            && self.sampler.key() == Some(&key);
        if !polling_same {
            self.sampler.start(key);
        }
    }

    fn promotable_tags(&self) -> Vec<String> {
        self.device()
            .map(|d| promotable_tags(d).into_iter().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    fn clamp_tag_cursor(&mut self) {
        let count = self.promotable_tags().len();
        self.tag_cursor = self.tag_cursor.min(count.saturating_sub(1));
    }

    fn request_promotion(&self) -> Option<Action> {
        let device = self.device()?;
        let tags = self.promotable_tags();
        let tag = tags.get(self.tag_cursor)?;
        Some(match PromotionRequest::select(device, tag) {
            Ok(request) => Action::ShowConfirm(ConfirmAction::Promote(request)),
            Err(e) => Action::Notify(Notification::error(e.to_string())),
        })
    }

    fn handle_menu_key(&mut self, selected: usize, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => self.enrich_menu = None,
            KeyCode::Char('j') | KeyCode::Down => {
                self.enrich_menu = Some((selected + 1) % ENRICH_CHOICES.len());
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.enrich_menu = Some((selected + ENRICH_CHOICES.len() - 1) % ENRICH_CHOICES.len());
            }
            KeyCode::Enter => {
                self.enrich_menu = None;
                let ip = self.device()?.ip;
                let kind = ENRICH_CHOICES.get(selected).copied()?;
                return Some(Action::RequestEnrich { ip, kind });
            }
            _ => {}
        }
        None
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_placeholder(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
        let block = Block::default()
            .title(" Device ")
            .title_style(theme::title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border());
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_info(&self, frame: &mut Frame, area: Rect, device: &Device) {
        let block = Block::default()
            .title(format!(" {} ", device.display_hostname()))
            .title_style(theme::title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border()
            });

        let field = |name: &'static str, value: String| {
            Line::from(vec![
                Span::styled(format!("  {name:<10}"), theme::muted()),
                Span::styled(value, theme::text()),
            ])
        };
        let status = if device.online { "online" } else { "offline" };

        let mut lines = vec![
            field("IP", device.ip.to_string()),
            field("MAC", device.mac.to_string()),
            field("Vendor", device.vendor.clone().unwrap_or_else(|| "—".into())),
            field("OS", device.os.clone().unwrap_or_else(|| "—".into())),
            field(
                "Type",
                format!("{} {}", device.device_type.icon().glyph(), device.device_type),
            ),
            Line::from(vec![
                Span::styled("  Status    ", theme::muted()),
                Span::styled(status, theme::status(device.online)),
            ]),
            field("Uptime", device.uptime_label()),
            field("SNMP", device.snmp_label().to_owned()),
        ];
        if let Some(model) = &device.model {
            lines.push(field("Model", model.clone()));
        }
        lines.push(Line::from(""));
        lines.push(tag_line(device, self.tag_cursor));

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_ports(frame: &mut Frame, area: Rect, device: &Device) {
        let block = Block::default()
            .title(format!(" Ports ({}) ", device.ports.len()))
            .title_style(theme::title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border());

        if device.ports.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  No open ports discovered. Press e to run nmap.", theme::muted()))
                    .block(block),
                area,
            );
            return;
        }

        let header = Row::new(["Port", "Proto", "State", "Service", "Product", "Version"])
            .style(theme::table_header());
        let rows = device.ports.iter().map(|p| {
            Row::new([
                p.port.to_string(),
                p.protocol.clone(),
                p.status.clone(),
                p.service.clone(),
                p.product.clone(),
                p.version.clone(),
            ])
            .style(theme::text())
        });
        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Length(6),
                Constraint::Length(8),
                Constraint::Length(12),
                Constraint::Min(10),
                Constraint::Length(10),
            ],
        )
        .header(header)
        .block(block);
        frame.render_widget(table, area);
    }

    fn render_bandwidth(&self, frame: &mut Frame, area: Rect) {
        let window = self.sampler.window();
        let (latest_in, latest_out) = window
            .latest()
            .map_or((None, None), |s| (s.in_kbps, s.out_kbps));
        let state = match self.sampler.state() {
            SamplerState::Polling => "live",
            SamplerState::Idle => "idle",
            SamplerState::Stopped => "paused",
        };

        let block = Block::default()
            .title(Line::from(vec![
                Span::styled(" Bandwidth ", theme::title()),
                Span::styled(format!("({state}) "), theme::muted()),
                Span::styled(format!("in {} ", fmt_sample(latest_in)), Style::default().fg(theme::SERIES_IN)),
                Span::styled(format!("out {} ", fmt_sample(latest_out)), Style::default().fg(theme::SERIES_OUT)),
            ]))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border());

        let inbound = window.inbound_points();
        let outbound = window.outbound_points();
        let (x_max, y_max) = chart_bounds(&window);

        let datasets = vec![
            Dataset::default()
                .name("in")
                .marker(Marker::Braille)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(theme::SERIES_IN))
                .data(&inbound),
            Dataset::default()
                .name("out")
                .marker(Marker::Braille)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(theme::SERIES_OUT))
                .data(&outbound),
        ];

        let chart = Chart::new(datasets)
            .block(block)
            .x_axis(Axis::default().bounds([0.0, x_max]).style(theme::muted()))
            .y_axis(
                Axis::default()
                    .bounds([0.0, y_max])
                    .labels([
                        Span::styled("0", theme::muted()),
                        Span::styled(fmt_kbps(y_max / 2.0), theme::muted()),
                        Span::styled(fmt_kbps(y_max), theme::muted()),
                    ])
                    .style(theme::muted()),
            );
        frame.render_widget(chart, area);
    }

    fn render_enrich_menu(frame: &mut Frame, area: Rect, selected: usize) {
        let width = 28u16.min(area.width);
        let height = 7u16.min(area.height);
        let popup = Rect::new(
            area.x + (area.width.saturating_sub(width)) / 2,
            area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        );
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Enrich ")
            .title_style(theme::title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_PANEL));

        let mut lines: Vec<Line> = ENRICH_CHOICES
            .iter()
            .enumerate()
            .map(|(i, kind)| {
                let style = if i == selected {
                    theme::selected()
                } else {
                    theme::text()
                };
                Line::from(Span::styled(format!("  {:<22}", enrich_label(*kind)), style))
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("  Enter run  Esc close", theme::key_hint())));

        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }
}

impl Component for DeviceScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(selected) = self.enrich_menu {
            return Ok(self.handle_menu_key(selected, key));
        }

        let action = match key.code {
            KeyCode::Char('l') | KeyCode::Right => {
                let count = self.promotable_tags().len();
                if count > 0 {
                    self.tag_cursor = (self.tag_cursor + 1) % count;
                }
                None
            }
            KeyCode::Char('h') | KeyCode::Left => {
                let count = self.promotable_tags().len();
                if count > 0 {
                    self.tag_cursor = (self.tag_cursor + count - 1) % count;
                }
                None
            }
            KeyCode::Enter => self.request_promotion(),
            KeyCode::Char('e') if self.device().is_some() => {
                self.enrich_menu = Some(ENRICH_CHOICES.len() - 1);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::OpenDevice(ip) => self.open(*ip),
            Action::DeviceLoaded(load) => self.apply_load(load),
            Action::DevicesUpdated(devices) => self.apply_snapshot(devices),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let device = match &self.record {
            Record::Loaded(device) => Arc::clone(device),
            Record::Empty => {
                return Self::render_placeholder(
                    frame,
                    area,
                    vec![Line::from(Span::styled(
                        "  Select a device on the Topology screen (1) and press Enter.",
                        theme::muted(),
                    ))],
                );
            }
            Record::Loading(ip) => {
                return Self::render_placeholder(
                    frame,
                    area,
                    vec![Line::from(Span::styled(format!("  Loading {ip}…"), theme::muted()))],
                );
            }
            Record::NotFound(ip) => {
                return Self::render_placeholder(
                    frame,
                    area,
                    vec![
                        Line::from(Span::styled(
                            format!("  Device {ip} not found"),
                            Style::default().fg(theme::OFFLINE_RED).add_modifier(Modifier::BOLD),
                        )),
                        Line::from(Span::styled(
                            "  It may have left the network. Press s to rescan.",
                            theme::muted(),
                        )),
                    ],
                );
            }
            Record::Failed { ip, message } => {
                return Self::render_placeholder(
                    frame,
                    area,
                    vec![
                        Line::from(Span::styled(
                            format!("  Could not load {ip}"),
                            Style::default().fg(theme::OFFLINE_RED),
                        )),
                        Line::from(Span::styled(format!("  {message}"), theme::muted())),
                    ],
                );
            }
        };

        let [top, chart] =
            Layout::vertical([Constraint::Length(14), Constraint::Min(8)]).areas(area);
        let [info, ports] =
            Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(top);

        self.render_info(frame, info, &device);
        Self::render_ports(frame, ports, &device);
        self.render_bandwidth(frame, chart);

        if let Some(selected) = self.enrich_menu {
            Self::render_enrich_menu(frame, area, selected);
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if focused {
            if let Some(device) = self.device().cloned() {
                self.start_sampling(&device);
            }
        } else {
            self.enrich_menu = None;
            self.sampler.stop();
        }
    }

    fn captures_input(&self) -> bool {
        self.enrich_menu.is_some()
    }
}

// ── Pure helpers ─────────────────────────────────────────────────────

/// Tags that name a promotable class, in tag order.
fn promotable_tags(device: &Device) -> Vec<&str> {
    device
        .tags_with_promotion()
        .filter_map(|(tag, class)| class.map(|_| tag))
        .collect()
}

/// Tag row: promotable tags highlighted, the cursor one reversed.
fn tag_line(device: &Device, cursor: usize) -> Line<'static> {
    let mut spans = vec![Span::styled("  Tags      ", theme::muted())];
    if device.tags.is_empty() {
        spans.push(Span::styled("none", theme::muted()));
        return Line::from(spans);
    }

    let mut promotable_index = 0;
    for (i, (tag, class)) in device.tags_with_promotion().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let style = if class.is_some() {
            let style = if promotable_index == cursor {
                theme::promotable_tag().add_modifier(Modifier::REVERSED)
            } else {
                theme::promotable_tag()
            };
            promotable_index += 1;
            style
        } else {
            theme::muted()
        };
        spans.push(Span::styled(format!("[{tag}]"), style));
    }
    Line::from(spans)
}

fn enrich_label(kind: EnrichKind) -> &'static str {
    match kind {
        EnrichKind::Nmap => "nmap (ports, OS)",
        EnrichKind::Snmp => "SNMP",
        EnrichKind::Both => "both",
    }
}

/// `(x_max, y_max)` for the chart: the x axis spans the full window so the
/// line fills in from the left.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn chart_bounds(window: &SampleWindow) -> (f64, f64) {
    let x_max = window.capacity().saturating_sub(1).max(1) as f64;
    (x_max, axis_ceiling(window.peak_kbps()))
}
