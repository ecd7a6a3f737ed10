//! Ratatui-based terminal dashboard.
//!
//! The TUI provides an input panel for choosing a crop, area, seed type, and
//! location, then renders the estimated budget figures and cost/income charts.
//! The reference tables and model artifact are loaded once before the
//! terminal is put into raw mode; estimation re-runs only on explicit user
//! action.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, List, ListItem, Paragraph},
    Terminal,
};

use crate::app::pipeline::{self, LoadedContext};
use crate::cli::TuiArgs;
use crate::domain::{
    AREA_MAX_ACRES, AREA_MIN_ACRES, EstimateRequest, EstimationResult, SeedType,
};
use crate::error::AppError;
use crate::io::paths::DataPaths;
use crate::report::fmt_money;

const AREA_STEP: f64 = 0.5;

/// Start the TUI.
pub fn run(args: &TuiArgs) -> Result<(), AppError> {
    let paths = DataPaths::resolve(args.data.data_dir.as_deref());
    // Load before touching the terminal so startup errors print normally.
    let loaded = pipeline::load_context(&paths)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::internal(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(loaded)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::internal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::internal(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Input fields, top to bottom.
const FIELD_CROP: usize = 0;
const FIELD_AREA: usize = 1;
const FIELD_SEED: usize = 2;
const FIELD_LOCATION: usize = 3;
const FIELD_COUNT: usize = 4;

struct App {
    loaded: LoadedContext,
    crops: Vec<String>,
    crop_idx: usize,
    area_acres: f64,
    seed_type: SeedType,
    location_input: String,
    editing_location: bool,
    selected_field: usize,
    result: Option<EstimationResult>,
    status: String,
}

impl App {
    fn new(loaded: LoadedContext) -> Result<Self, AppError> {
        let crops: Vec<String> = loaded
            .ctx
            .reference()
            .crop_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        if crops.is_empty() {
            return Err(AppError::data("Crop table is empty."));
        }

        Ok(Self {
            loaded,
            crops,
            crop_idx: 0,
            area_acres: 1.0,
            seed_type: SeedType::Hybrid,
            location_input: String::new(),
            editing_location: false,
            selected_field: FIELD_CROP,
            result: None,
            status: "Set your inputs, then press Enter to estimate.".to_string(),
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::internal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::internal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::internal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns true when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing_location {
            self.handle_location_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < FIELD_COUNT - 1 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => {
                if self.selected_field == FIELD_LOCATION {
                    self.editing_location = true;
                    self.status =
                        "Editing location. Enter to apply, Esc to cancel.".to_string();
                } else {
                    self.run_estimate();
                }
            }
            KeyCode::Char('e') => self.run_estimate(),
            _ => {}
        }

        false
    }

    fn handle_location_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing_location = false;
                self.status = "Location edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing_location = false;
                self.run_estimate();
            }
            KeyCode::Backspace => {
                self.location_input.pop();
            }
            KeyCode::Char(c) => {
                if !c.is_control() {
                    self.location_input.push(c);
                }
            }
            _ => {}
        }
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.selected_field {
            FIELD_CROP => {
                let n = self.crops.len();
                self.crop_idx = if delta >= 0 {
                    (self.crop_idx + 1) % n
                } else {
                    (self.crop_idx + n - 1) % n
                };
                self.status = format!("crop: {}", self.crops[self.crop_idx]);
            }
            FIELD_AREA => {
                let next = self.area_acres + delta as f64 * AREA_STEP;
                self.area_acres = next.clamp(AREA_MIN_ACRES, AREA_MAX_ACRES);
                self.status = format!("area: {:.1} acres", self.area_acres);
            }
            FIELD_SEED => {
                self.seed_type = if delta >= 0 {
                    self.seed_type.next()
                } else {
                    self.seed_type.prev()
                };
                self.status = format!("seed: {}", self.seed_type);
            }
            _ => {}
        }
    }

    fn run_estimate(&mut self) {
        let request = EstimateRequest {
            crop: self.crops[self.crop_idx].clone(),
            area_acres: self.area_acres,
            seed_type: self.seed_type,
            location: self.location_input.clone(),
        };

        match crate::estimate::estimate(&self.loaded.ctx, &request) {
            Ok(result) => {
                self.status = if result.used_fallback {
                    "Estimate ready (mean price: no quote for this location).".to_string()
                } else {
                    "Estimate ready.".to_string()
                };
                self.result = Some(result);
            }
            Err(err) => {
                self.result = None;
                self.status = err.to_string();
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let artifact = &self.loaded.artifact;
        let lines = vec![
            Line::from(vec![
                Span::styled("agrimate", Style::default().fg(Color::Green)),
                Span::raw(" — crop budget & profit estimator"),
            ]),
            Line::from(Span::styled(
                format!(
                    "crops: {} | price quotes: {} | model trained: {} (n={}, rmse={:.2})",
                    self.loaded.ctx.reference().crop_rows().len(),
                    self.loaded.ctx.reference().price_rows().len(),
                    artifact.trained_on,
                    artifact.n_obs,
                    artifact.quality.rmse,
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(34), Constraint::Min(0)])
            .split(area);

        self.draw_inputs(frame, columns[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(9), Constraint::Min(0)])
            .split(columns[1]);

        self.draw_metrics(frame, right[0]);
        self.draw_charts(frame, right[1]);
    }

    fn draw_inputs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let location_label = if self.location_input.trim().is_empty() {
            "(enter a location)".to_string()
        } else {
            self.location_input.clone()
        };

        let items = vec![
            ListItem::new(format!("Crop     : {}", self.crops[self.crop_idx])),
            ListItem::new(format!("Area     : {:.1} acres", self.area_acres)),
            ListItem::new(format!("Seed     : {}", self.seed_type)),
            ListItem::new(format!("Location : {location_label}")),
        ];

        let list = List::new(items)
            .block(Block::default().title("Inputs").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);

        if self.editing_location {
            let hint = Paragraph::new(format!("Location: {}▏", self.location_input))
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x + 2,
                y: area.y + area.height.saturating_sub(2),
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_metrics(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Estimate").borders(Borders::ALL);

        let Some(result) = &self.result else {
            let msg = Paragraph::new("No estimate yet. Press Enter to run one.")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(msg, area);
            return;
        };

        let price_note = if result.used_fallback {
            " (mean across markets)"
        } else {
            ""
        };
        let profit_style = if result.profit >= 0.0 {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        };

        let lines = vec![
            Line::from(format!("Total Input Cost : Rs. {}", fmt_money(result.input_cost))),
            Line::from(format!("Predicted Yield  : {:.2} quintals", result.predicted_yield)),
            Line::from(format!(
                "Market Price     : Rs. {}/quintal{price_note}",
                fmt_money(result.market_price)
            )),
            Line::from(format!("Estimated Income : Rs. {}", fmt_money(result.estimated_income))),
            Line::from(Span::styled(
                format!("Estimated Profit : Rs. {}", fmt_money(result.profit)),
                profit_style,
            )),
        ];

        frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
    }

    fn draw_charts(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(result) = &self.result else {
            let block = Block::default().title("Charts").borders(Borders::ALL);
            frame.render_widget(block, area);
            return;
        };

        let crop = self.loaded.ctx.reference().crop(&self.crops[self.crop_idx]);
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let cost_income = [
            ("Cost", result.input_cost, Color::Red),
            ("Income", result.estimated_income, Color::Green),
        ];
        self.draw_bar_chart(frame, halves[0], "Cost vs Income (Rs.)", &cost_income);

        if let Some(crop) = crop {
            let breakdown = [
                ("Seed", crop.seed_cost_per_acre * self.area_acres, Color::Blue),
                (
                    "Fertilizer",
                    crop.fertilizer_cost_per_acre * self.area_acres,
                    Color::Magenta,
                ),
            ];
            self.draw_bar_chart(frame, halves[1], "Cost Breakdown (Rs.)", &breakdown);
        }
    }

    fn draw_bar_chart(
        &self,
        frame: &mut ratatui::Frame<'_>,
        area: Rect,
        title: &str,
        rows: &[(&str, f64, Color)],
    ) {
        let bars: Vec<Bar> = rows
            .iter()
            .map(|&(label, value, color)| {
                Bar::default()
                    .value(value.max(0.0).round() as u64)
                    .label(Line::from(label))
                    .text_value(fmt_money(value))
                    .style(Style::default().fg(color))
            })
            .collect();

        let bar_width = ((area.width.saturating_sub(6)) / rows.len().max(1) as u16).clamp(3, 14);
        let chart = BarChart::default()
            .block(Block::default().title(title.to_string()).borders(Borders::ALL))
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width)
            .bar_gap(2);

        frame.render_widget(chart, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter edit/estimate  e estimate  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}
