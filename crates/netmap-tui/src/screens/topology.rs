//! Topology screen: device sidebar, node grid, and operator-drawn edges.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph};

use netmap_core::topology::TopologyNode;
use netmap_core::{Device, Handle, NodeId, Snapshot, TopologyEdge, TopologyGraph, TopologyView};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::node_grid;

const SIDEBAR_WIDTH: u16 = 34;
const MAX_EDGE_ROWS: u16 = 6;

pub struct TopologyScreen {
    focused: bool,
    devices: Snapshot<Device>,
    view: TopologyView,
    selected: usize,
    /// Source picked with `c`, waiting for a target.
    pending_source: Option<NodeId>,
}

impl TopologyScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            devices: Snapshot::default(),
            view: TopologyView::new(),
            selected: 0,
            pending_source: None,
        }
    }

    fn selected_node(&self) -> Option<&TopologyNode> {
        self.view.graph().nodes().get(self.selected)
    }

    fn select_next(&mut self) {
        let len = self.view.graph().nodes().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// First `c` picks the source, second `c` the target.
    fn connect_step(&mut self) -> Option<Action> {
        let target = self.selected_node()?.id.clone();
        let Some(source) = self.pending_source.take() else {
            let label = self.selected_node().map(|n| n.data.label.clone())?;
            self.pending_source = Some(target);
            return Some(Action::Notify(Notification::info(format!(
                "Connecting from {label}: select a target and press c"
            ))));
        };

        let graph = self.view.graph_mut();
        let note = match graph.connect(&source, Handle::Right, &target, Handle::Left) {
            Ok(edge) => Notification::success(format!("Connected {}", edge_label(graph, &edge))),
            Err(e) => Notification::error(e.to_string()),
        };
        Some(Action::Notify(note))
    }

    fn remove_last_edge(&mut self) -> Option<Action> {
        let edge_id = self.view.graph().edges().last()?.id.clone();
        self.view.graph_mut().disconnect(&edge_id);
        Some(Action::Notify(Notification::info("Edge removed")))
    }

    fn apply_snapshot(&mut self, devices: &Snapshot<Device>) {
        self.devices = devices.clone();
        self.view.rebuild(devices);
        self.pending_source = None;
        self.selected = self.selected.min(devices.len().saturating_sub(1));
    }

    fn render_sidebar(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Devices ({}) ", self.devices.len()))
            .title_style(theme::title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border()
            });

        let items: Vec<ListItem> = self.devices.iter().map(|d| sidebar_item(d)).collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(theme::selected());
        let mut state = ListState::default().with_selected(
            (!self.devices.is_empty()).then_some(self.selected),
        );
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_graph(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Topology · {} ", self.view.cidr()))
            .title_style(theme::title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let nodes = self.view.graph().nodes();
        if nodes.is_empty() {
            let hint = Paragraph::new(Line::from(vec![
                Span::styled("  No devices discovered. Press ", theme::muted()),
                Span::styled("s", theme::key_hint_key()),
                Span::styled(" to scan.", theme::muted()),
            ]));
            frame.render_widget(hint, inner);
            return;
        }

        let skip = node_grid::scroll_for(inner, self.selected);
        for (index, node) in nodes.iter().enumerate() {
            let Some(cell) = node_grid::cell(inner, index, skip) else {
                continue;
            };
            let border = if self.pending_source.as_ref() == Some(&node.id) {
                Style::default().fg(theme::AMBER)
            } else if index == self.selected {
                theme::border_focused()
            } else {
                theme::status(node.data.status.is_online())
            };
            let node_block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border);
            let body = node_block.inner(cell);
            frame.render_widget(node_block, cell);
            frame.render_widget(Paragraph::new(node_lines(node)), body);
        }
    }

    fn render_edges(&self, frame: &mut Frame, area: Rect) {
        let graph = self.view.graph();
        let block = Block::default()
            .title(format!(" Edges ({}) ", graph.edges().len()))
            .title_style(theme::title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border());

        let lines: Vec<Line> = if graph.edges().is_empty() {
            vec![Line::from(Span::styled(
                "  c: pick source, then target   u: undo last edge",
                theme::key_hint(),
            ))]
        } else {
            graph
                .edges()
                .iter()
                .rev()
                .map(|e| Line::from(Span::styled(format!("  {}", edge_label(graph, e)), theme::text())))
                .collect()
        };
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

impl Component for TopologyScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Right => {
                self.select_next();
                None
            }
            KeyCode::Char('k') | KeyCode::Up | KeyCode::Left => {
                self.select_prev();
                None
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.selected = 0;
                None
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.selected = self.devices.len().saturating_sub(1);
                None
            }
            KeyCode::Enter => self.selected_node().map(|n| Action::OpenDevice(n.data.ip)),
            KeyCode::Char('c') => self.connect_step(),
            KeyCode::Char('u') => self.remove_last_edge(),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::DevicesUpdated(devices) => self.apply_snapshot(devices),
            Action::CidrLoaded(label) => self.view.apply_cidr(label.clone()),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [sidebar, main] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)]).areas(area);

        let edge_rows = u16::try_from(self.view.graph().edges().len())
            .unwrap_or(MAX_EDGE_ROWS)
            .clamp(1, MAX_EDGE_ROWS);
        let [graph_area, edges_area] =
            Layout::vertical([Constraint::Min(node_grid::CELL_HEIGHT + 2), Constraint::Length(edge_rows + 2)])
                .areas(main);

        self.render_sidebar(frame, sidebar);
        self.render_graph(frame, graph_area);
        self.render_edges(frame, edges_area);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.pending_source = None;
        }
    }
}

// ── Pure helpers ─────────────────────────────────────────────────────

fn sidebar_item(device: &Device) -> ListItem<'static> {
    let marker = if device.online { "●" } else { "○" };
    ListItem::new(Line::from(vec![
        Span::styled(format!(" {marker} "), theme::status(device.online)),
        Span::styled(format!("{:<15}", device.ip), theme::text()),
        Span::styled(format!(" {}", device.display_hostname()), theme::muted()),
    ]))
}

fn node_lines(node: &TopologyNode) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled(format!("{} ", node.data.icon.glyph()), theme::status(node.data.status.is_online())),
            Span::styled(node.data.label.clone(), theme::title()),
        ]),
        Line::from(Span::styled(node.data.ip.to_string(), theme::text())),
        Line::from(Span::styled(node.data.icon.to_string(), theme::muted())),
    ]
}

/// `"Device 1 → Device 3"`, falling back to raw ids for unknown nodes.
fn edge_label(graph: &TopologyGraph, edge: &TopologyEdge) -> String {
    let name = |id: &NodeId| {
        graph
            .node(id)
            .map_or_else(|| id.to_string(), |n| n.data.label.clone())
    };
    format!("{} → {}", name(&edge.source), name(&edge.target))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::IpAddr;
    use std::sync::Arc;

    use crossterm::event::KeyModifiers;
    use netmap_core::CidrLabel;
    use pretty_assertions::assert_eq;

    use super::*;

    fn snapshot(ips: &[&str]) -> Snapshot<Device> {
        Arc::new(
            ips.iter()
                .map(|ip| Arc::new(Device::new(ip.parse::<IpAddr>().unwrap())))
                .collect(),
        )
    }

    fn press(screen: &mut TopologyScreen, code: KeyCode) -> Option<Action> {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    #[test]
    fn snapshot_builds_one_node_per_device() {
        let mut screen = TopologyScreen::new();
        screen
            .update(&Action::DevicesUpdated(snapshot(&["10.0.0.1", "10.0.0.2"])))
            .unwrap();

        let labels: Vec<_> = screen
            .view
            .graph()
            .nodes()
            .iter()
            .map(|n| n.data.label.clone())
            .collect();
        assert_eq!(labels, ["Device 1", "Device 2"]);
    }

    #[test]
    fn selection_is_clamped_when_the_directory_shrinks() {
        let mut screen = TopologyScreen::new();
        screen
            .update(&Action::DevicesUpdated(snapshot(&["10.0.0.1", "10.0.0.2", "10.0.0.3"])))
            .unwrap();
        press(&mut screen, KeyCode::Char('G'));
        assert_eq!(screen.selected, 2);

        screen
            .update(&Action::DevicesUpdated(snapshot(&["10.0.0.1"])))
            .unwrap();
        assert_eq!(screen.selected, 0);
    }

    #[test]
    fn two_presses_of_c_draw_an_edge_until_the_next_refresh() {
        let mut screen = TopologyScreen::new();
        let devices = snapshot(&["10.0.0.1", "10.0.0.2"]);
        screen.update(&Action::DevicesUpdated(devices.clone())).unwrap();

        press(&mut screen, KeyCode::Char('c'));
        press(&mut screen, KeyCode::Char('j'));
        let note = press(&mut screen, KeyCode::Char('c'));
        assert!(matches!(
            note,
            Some(Action::Notify(Notification { ref message, .. })) if message == "Connected Device 1 → Device 2"
        ));
        assert_eq!(screen.view.graph().edges().len(), 1);

        screen.update(&Action::DevicesUpdated(devices)).unwrap();
        assert!(screen.view.graph().edges().is_empty());
    }

    #[test]
    fn connecting_a_node_to_itself_is_reported() {
        let mut screen = TopologyScreen::new();
        screen
            .update(&Action::DevicesUpdated(snapshot(&["10.0.0.1"])))
            .unwrap();

        press(&mut screen, KeyCode::Char('c'));
        let note = press(&mut screen, KeyCode::Char('c'));
        assert!(matches!(
            note,
            Some(Action::Notify(Notification { level: crate::action::NotificationLevel::Error, .. }))
        ));
        assert!(screen.view.graph().edges().is_empty());
    }

    #[test]
    fn enter_opens_the_selected_device() {
        let mut screen = TopologyScreen::new();
        screen
            .update(&Action::DevicesUpdated(snapshot(&["10.0.0.1", "10.0.0.2"])))
            .unwrap();
        press(&mut screen, KeyCode::Down);

        let action = press(&mut screen, KeyCode::Enter);
        assert!(matches!(action, Some(Action::OpenDevice(ip)) if ip.to_string() == "10.0.0.2"));
    }

    #[test]
    fn cidr_label_is_kept_across_refreshes() {
        let mut screen = TopologyScreen::new();
        screen
            .update(&Action::CidrLoaded(CidrLabel::Known("10.0.0.0/24".into())))
            .unwrap();
        screen
            .update(&Action::DevicesUpdated(snapshot(&["10.0.0.1"])))
            .unwrap();
        assert_eq!(screen.view.cidr().to_string(), "10.0.0.0/24");
    }
}
