//! Page layout for the plan report, independent of the output format.
//!
//! Coordinates are millimetres on an A4 portrait page, origin at the top-left
//! corner, `y` growing downwards; text `y` is the baseline.

use super::format::{date_pt, long_date_pt, money_pt, number_pt, truncate};
use crate::action::MarketingAction;
use crate::summary::Summary;
use chrono::NaiveDate;

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 10.0;

/// Room left at the bottom before a new block must start on a fresh page.
const ACTION_BLOCK_RESERVE: f32 = 60.0;
const TASK_RESERVE: f32 = 30.0;
const SUBTASK_RESERVE: f32 = 15.0;

const TABLE_TITLE_MAX: usize = 25;
/// Column offsets from the left margin in the summary table.
const COLUMNS: [(f32, &str); 5] = [
    (2.0, "Título"),
    (50.0, "Período"),
    (90.0, "Responsável"),
    (130.0, "Verba (R$)"),
    (160.0, "Status"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text {
        x: f32,
        y: f32,
        size: f32,
        bold: bool,
        align: Align,
        text: String,
    },
    /// Horizontal line.
    Rule { x1: f32, x2: f32, y: f32, gray: f32 },
    /// Filled rectangle; `y` is its top edge.
    Band {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        gray: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub elements: Vec<Element>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,
    pub generated_on: NaiveDate,
}

/// Approximate Helvetica advance width of `text` in millimetres.
pub fn text_width_mm(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * 0.5 * 25.4 / 72.0
}

/// Greedy word wrap to `max_width_mm`. Words wider than a line are split.
/// Always returns at least one (possibly empty) line.
pub fn wrap_text(text: &str, max_width_mm: f32, size_pt: f32) -> Vec<String> {
    let char_w = text_width_mm("m", size_pt).max(f32::EPSILON);
    let max_chars = ((max_width_mm / char_w).floor() as usize).max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let word: String = word.into_iter().collect();
            let needed = line.chars().count() + usize::from(!line.is_empty()) + word.chars().count();
            if needed > max_chars && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(&word);
        }
        lines.push(line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

struct Layout {
    pages: Vec<Page>,
    y: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            y: MARGIN,
        }
    }

    fn new_page(&mut self, y: f32) {
        self.pages.push(Page::default());
        self.y = y;
    }

    /// Break the page if fewer than `reserve` mm are left above the bottom edge.
    fn reserve(&mut self, reserve: f32) {
        if self.y > PAGE_HEIGHT - reserve {
            self.new_page(MARGIN);
        }
    }

    fn push(&mut self, element: Element) {
        if let Some(page) = self.pages.last_mut() {
            page.elements.push(element);
        }
    }

    /// Place one line of text at the cursor, then advance by `advance`.
    fn text(&mut self, x: f32, size: f32, bold: bool, text: impl Into<String>, advance: f32) {
        self.reserve(MARGIN);
        let y = self.y;
        self.push(Element::Text {
            x,
            y,
            size,
            bold,
            align: Align::Left,
            text: text.into(),
        });
        self.y += advance;
    }

    fn centered(&mut self, size: f32, bold: bool, text: impl Into<String>, advance: f32) {
        let y = self.y;
        self.push(Element::Text {
            x: PAGE_WIDTH / 2.0,
            y,
            size,
            bold,
            align: Align::Center,
            text: text.into(),
        });
        self.y += advance;
    }

    fn rule(&mut self, offset: f32, gray: f32) {
        let y = self.y + offset;
        self.push(Element::Rule {
            x1: MARGIN,
            x2: PAGE_WIDTH - MARGIN,
            y,
            gray,
        });
    }

    /// Bold label followed by wrapped body text.
    fn paragraph(&mut self, label: &str, body: &str) {
        self.text(MARGIN, 9.0, true, label, 5.0);
        for line in wrap_text(body, PAGE_WIDTH - 2.0 * MARGIN, 9.0) {
            self.text(MARGIN, 9.0, false, line, 5.0);
        }
    }

    fn finish(self) -> Document {
        Document { pages: self.pages }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Lay out the full report. `actions` should already be sorted by start date.
pub fn layout(actions: &[&MarketingAction], summary: &Summary, options: &ReportOptions) -> Document {
    let mut l = Layout::new();

    l.centered(18.0, true, options.title.as_str(), 10.0);
    l.centered(
        10.0,
        false,
        format!("Gerado em: {}", long_date_pt(options.generated_on)),
        15.0,
    );

    summary_block(&mut l, summary);
    summary_table(&mut l, actions);

    l.new_page(MARGIN);
    l.centered(14.0, true, "Detalhes das Ações", 15.0);
    for action in actions {
        detail_section(&mut l, action);
    }

    l.finish()
}

fn summary_block(l: &mut Layout, s: &Summary) {
    l.text(MARGIN, 14.0, true, "Resumo do Plano", 8.0);
    l.text(MARGIN, 10.0, false, format!("Total de Ações: {}", s.count), 5.0);
    l.text(MARGIN, 10.0, false, format!("Verba Total: {}", money_pt(s.total_budget)), 5.0);
    l.text(
        MARGIN,
        10.0,
        false,
        format!("Receita Esperada: {}", money_pt(s.total_revenue)),
        5.0,
    );
    l.text(MARGIN, 10.0, false, format!("ROAS Médio: {:.2}", s.average_roas), 15.0);
}

fn summary_table(l: &mut Layout, actions: &[&MarketingAction]) {
    l.text(MARGIN, 14.0, true, "Ações de Marketing", 10.0);

    let header_y = l.y;
    l.push(Element::Band {
        x: MARGIN,
        y: header_y - 5.0,
        width: PAGE_WIDTH - 2.0 * MARGIN,
        height: 7.0,
        gray: 240.0 / 255.0,
    });
    for (offset, label) in COLUMNS {
        l.push(Element::Text {
            x: MARGIN + offset,
            y: header_y,
            size: 9.0,
            bold: true,
            align: Align::Left,
            text: label.to_string(),
        });
    }
    l.y += 7.0;

    for action in actions {
        if l.y > PAGE_HEIGHT - MARGIN {
            l.new_page(MARGIN + 10.0);
        }
        let cells = [
            truncate(&action.title, TABLE_TITLE_MAX),
            format!("{} - {}", date_pt(action.start), date_pt(action.end)),
            action.responsible.clone(),
            number_pt(action.budget),
            action.status.label_pt().to_string(),
        ];
        let y = l.y;
        for ((offset, _), text) in COLUMNS.iter().zip(cells) {
            l.push(Element::Text {
                x: MARGIN + offset,
                y,
                size: 9.0,
                bold: false,
                align: Align::Left,
                text,
            });
        }
        l.y += 7.0;
        l.rule(-3.0, 220.0 / 255.0);
    }
}

fn detail_section(l: &mut Layout, action: &MarketingAction) {
    l.reserve(ACTION_BLOCK_RESERVE);

    l.text(MARGIN, 12.0, true, action.title.as_str(), 7.0);

    let meta = [
        format!(
            "Período: {} - {}",
            date_pt(action.start),
            date_pt(action.end)
        ),
        format!("Frequência: {}", action.frequency.label_pt()),
        format!("Responsável: {}", action.responsible),
        format!("Verba: {}", money_pt(action.budget)),
        format!("Meta de Receita: {}", money_pt(action.revenue_goal)),
        format!("ROAS Esperado: {:.2}", action.roas),
    ];
    for line in meta {
        l.text(MARGIN, 9.0, false, line, 5.0);
    }
    l.text(
        MARGIN,
        9.0,
        false,
        format!("Status: {}", action.status.label_pt()),
        8.0,
    );

    l.paragraph("Objetivo:", &action.objective);
    l.paragraph("Sazonalidade:", &action.seasonality);
    l.paragraph("Cliente Ideal:", &action.target_customer);

    l.text(MARGIN, 9.0, true, "Produtos Ofertados:", 5.0);
    if action.products.is_empty() {
        l.text(MARGIN + 5.0, 9.0, false, "Nenhum produto definido", 5.0);
    } else {
        for product in &action.products {
            l.text(MARGIN + 5.0, 9.0, false, format!("• {product}"), 5.0);
        }
    }
    l.y += 3.0;

    l.text(MARGIN, 9.0, true, "Tarefas:", 5.0);
    if action.tasks.is_empty() {
        l.text(MARGIN + 5.0, 9.0, false, "Nenhuma tarefa definida", 5.0);
    }
    for (i, task) in action.tasks.iter().enumerate() {
        l.reserve(TASK_RESERVE);
        l.text(MARGIN + 5.0, 9.0, true, format!("{}. {}", i + 1, task.title), 5.0);
        l.text(
            MARGIN + 10.0,
            9.0,
            false,
            format!(
                "Responsável: {} | Prazo: {} | Status: {}",
                task.responsible,
                date_pt(task.deadline),
                task.status.label_pt()
            ),
            5.0,
        );
        if !task.subtasks.is_empty() {
            l.text(MARGIN + 10.0, 9.0, false, "Subtarefas:", 5.0);
            for (j, sub) in task.subtasks.iter().enumerate() {
                l.reserve(SUBTASK_RESERVE);
                l.text(
                    MARGIN + 15.0,
                    9.0,
                    false,
                    format!("{}.{}. {}", i + 1, j + 1, sub.title),
                    4.0,
                );
                l.text(
                    MARGIN + 20.0,
                    9.0,
                    false,
                    format!(
                        "Responsável: {} | Prazo: {} | Status: {}",
                        sub.responsible,
                        date_pt(sub.deadline),
                        sub.status.label_pt()
                    ),
                    5.0,
                );
            }
        }
        l.y += 3.0;
    }

    l.y += 5.0;
    l.rule(-2.0, 150.0 / 255.0);
    l.y += 10.0;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
