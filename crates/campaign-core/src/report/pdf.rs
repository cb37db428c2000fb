//! Serialize a laid-out [`Document`] as PDF using the base-14 Helvetica fonts.

use super::layout::{text_width_mm, Align, Document, Element, PAGE_HEIGHT, PAGE_WIDTH};
use crate::error::{CampaignError, Result};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

const REGULAR: Name<'static> = Name(b"F1");
const BOLD: Name<'static> = Name(b"F2");

fn pt(mm: f32) -> f32 {
    mm * 72.0 / 25.4
}

/// Top-down millimetres to bottom-up points.
fn flip(y_mm: f32) -> f32 {
    pt(PAGE_HEIGHT - y_mm)
}

/// Encode text for a WinAnsiEncoding font. Characters outside it become `?`.
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}

pub fn write(doc: &Document) -> Result<Vec<u8>> {
    if doc.pages.is_empty() {
        return Err(CampaignError::Pdf("document has no pages".to_string()));
    }

    let mut next_id = 1;
    let mut alloc = || {
        let id = Ref::new(next_id);
        next_id += 1;
        id
    };

    let catalog_id = alloc();
    let tree_id = alloc();
    let regular_id = alloc();
    let bold_id = alloc();
    let page_ids: Vec<(Ref, Ref)> = doc.pages.iter().map(|_| (alloc(), alloc())).collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.pages(tree_id)
        .kids(page_ids.iter().map(|(page, _)| *page))
        .count(page_ids.len() as i32);

    pdf.type1_font(regular_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(bold_id)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    for (page, (page_id, content_id)) in doc.pages.iter().zip(&page_ids) {
        let mut writer = pdf.page(*page_id);
        writer.media_box(Rect::new(0.0, 0.0, pt(PAGE_WIDTH), pt(PAGE_HEIGHT)));
        writer.parent(tree_id);
        writer.contents(*content_id);
        writer
            .resources()
            .fonts()
            .pair(REGULAR, regular_id)
            .pair(BOLD, bold_id);
        writer.finish();

        let mut content = Content::new();
        for element in &page.elements {
            draw(&mut content, element);
        }
        pdf.stream(*content_id, &content.finish());
    }

    Ok(pdf.finish())
}

fn draw(content: &mut Content, element: &Element) {
    match element {
        Element::Band {
            x,
            y,
            width,
            height,
            gray,
        } => {
            content.set_fill_gray(*gray);
            content.rect(pt(*x), flip(y + height), pt(*width), pt(*height));
            content.fill_nonzero();
            content.set_fill_gray(0.0);
        }
        Element::Rule { x1, x2, y, gray } => {
            content.set_stroke_gray(*gray);
            content.set_line_width(0.5);
            content.move_to(pt(*x1), flip(*y));
            content.line_to(pt(*x2), flip(*y));
            content.stroke();
        }
        Element::Text {
            x,
            y,
            size,
            bold,
            align,
            text,
        } => {
            let left = match align {
                Align::Left => *x,
                Align::Center => x - text_width_mm(text, *size) / 2.0,
            };
            let font = if *bold { BOLD } else { REGULAR };
            content.begin_text();
            content.set_font(font, *size);
            content.next_line(pt(left), flip(*y));
            content.show(Str(&win_ansi(text)));
            content.end_text();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::layout::Page;

    #[test]
    fn win_ansi_maps_latin1_and_bullets() {
        assert_eq!(win_ansi("Ação"), vec![b'A', 0xE7, 0xE3, b'o']);
        assert_eq!(win_ansi("• R$"), vec![0x95, b' ', b'R', b'$']);
        assert_eq!(win_ansi("✓"), vec![b'?']);
    }

    #[test]
    fn writes_one_page_per_layout_page() {
        let text = |s: &str| Element::Text {
            x: 10.0,
            y: 20.0,
            size: 9.0,
            bold: false,
            align: Align::Left,
            text: s.to_string(),
        };
        let doc = Document {
            pages: vec![
                Page {
                    elements: vec![text("um")],
                },
                Page {
                    elements: vec![text("dois")],
                },
            ],
        };
        let bytes = write(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let body = String::from_utf8_lossy(&bytes);
        assert!(body.contains("/Count 2"));
        assert!(body.contains("/Helvetica-Bold"));
    }

    #[test]
    fn empty_document_is_an_error() {
        assert!(matches!(
            write(&Document::default()),
            Err(CampaignError::Pdf(_))
        ));
    }
}
