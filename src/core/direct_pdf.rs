// src/core/direct_pdf.rs
//! Flat resume drawn straight onto a PDF surface, no external tools.

use crate::types::resume::FlatResumeRequest;
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

// A4 in points.
const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN: f32 = 72.0;

const TITLE: &str = "Resume";
const TITLE_SIZE: f32 = 20.0;
const BODY_SIZE: f32 = 14.0;
const LINE_SPACING: f32 = 1.2;

const FONT_NAME: Name<'static> = Name(b"F1");

/// Helvetica advance widths for ASCII 32..=126, in thousandths of an em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];
const DEFAULT_WIDTH: u16 = 556;

/// Draws the title and one labelled line per field onto A4 pages.
pub struct DirectRenderer;

impl DirectRenderer {
    pub fn render(request: &FlatResumeRequest) -> Vec<u8> {
        let fields = [
            ("Name", &request.name),
            ("Email", &request.email),
            ("Phone", &request.phone),
            ("Education", &request.education),
            ("Experience", &request.experience),
            ("Skills", &request.skills),
        ];

        let mut layout = Layout::new();
        layout.centered(TITLE, TITLE_SIZE);
        // Blank line between title and body.
        layout.advance(BODY_SIZE);
        for (label, value) in fields {
            let line = format!("{}: {}", label, value.as_deref().unwrap_or_default());
            layout.wrapped(&line, BODY_SIZE);
        }

        layout.finish()
    }
}

/// Text encoded for the WinAnsi Helvetica font; anything outside Latin-1
/// becomes `?`.
fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
            _ => b'?',
        })
        .collect()
}

fn text_width(bytes: &[u8], size: f32) -> f32 {
    let units: u32 = bytes
        .iter()
        .map(|&b| {
            u32::from(match b {
                0x20..=0x7E => HELVETICA_WIDTHS[(b - 0x20) as usize],
                _ => DEFAULT_WIDTH,
            })
        })
        .sum();
    units as f32 * size / 1000.0
}

/// Splits `bytes` into lines no wider than `max_width`, breaking at spaces
/// and inside words only when a single word does not fit.
fn wrap(bytes: &[u8], size: f32, max_width: f32) -> Vec<Vec<u8>> {
    let mut lines = Vec::new();
    let mut current: Vec<u8> = Vec::new();

    for word in bytes.split(|&b| b == b' ') {
        let candidate_width = if current.is_empty() {
            text_width(word, size)
        } else {
            text_width(&current, size) + text_width(b" ", size) + text_width(word, size)
        };

        if candidate_width <= max_width {
            if !current.is_empty() {
                current.push(b' ');
            }
            current.extend_from_slice(word);
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        for &b in word {
            if !current.is_empty() && text_width(&current, size) + text_width(&[b], size) > max_width {
                lines.push(std::mem::take(&mut current));
            }
            current.push(b);
        }
    }

    lines.push(current);
    lines
}

struct PageContent {
    content_id: Ref,
    page_id: Ref,
    content: Content,
}

/// Top-down text placement with page breaks.
struct Layout {
    pdf: Pdf,
    next_id: i32,
    catalog_id: Ref,
    tree_id: Ref,
    font_id: Ref,
    pages: Vec<PageContent>,
    cursor: f32,
}

impl Layout {
    fn new() -> Self {
        let mut layout = Self {
            pdf: Pdf::new(),
            next_id: 1,
            catalog_id: Ref::new(1),
            tree_id: Ref::new(1),
            font_id: Ref::new(1),
            pages: Vec::new(),
            cursor: 0.0,
        };
        layout.catalog_id = layout.alloc();
        layout.tree_id = layout.alloc();
        layout.font_id = layout.alloc();
        layout.new_page();
        layout
    }

    fn alloc(&mut self) -> Ref {
        let id = Ref::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn new_page(&mut self) {
        let page_id = self.alloc();
        let content_id = self.alloc();
        self.pages.push(PageContent {
            content_id,
            page_id,
            content: Content::new(),
        });
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    fn advance(&mut self, size: f32) {
        self.cursor -= size * LINE_SPACING;
    }

    fn place(&mut self, bytes: &[u8], x: f32, size: f32) {
        if self.cursor - size * LINE_SPACING < MARGIN {
            self.new_page();
        }
        self.advance(size);
        let y = self.cursor;

        if let Some(page) = self.pages.last_mut() {
            page.content.begin_text();
            page.content.set_font(FONT_NAME, size);
            page.content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
            page.content.show(Str(bytes));
            page.content.end_text();
        }
    }

    fn centered(&mut self, text: &str, size: f32) {
        let bytes = encode(text);
        let x = ((PAGE_WIDTH - text_width(&bytes, size)) / 2.0).max(MARGIN);
        self.place(&bytes, x, size);
    }

    fn wrapped(&mut self, text: &str, size: f32) {
        for line in wrap(&encode(text), size, PAGE_WIDTH - 2.0 * MARGIN) {
            self.place(&line, MARGIN, size);
        }
    }

    fn finish(mut self) -> Vec<u8> {
        let info_id = self.alloc();

        self.pdf.catalog(self.catalog_id).pages(self.tree_id);
        self.pdf
            .pages(self.tree_id)
            .kids(self.pages.iter().map(|page| page.page_id))
            .count(self.pages.len() as i32);
        self.pdf
            .type1_font(self.font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        self.pdf
            .document_info(info_id)
            .title(TextStr(TITLE))
            .producer(TextStr(concat!("resumetex ", env!("CARGO_PKG_VERSION"))));

        for page in self.pages {
            let mut pdf_page = self.pdf.page(page.page_id);
            pdf_page
                .media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT))
                .parent(self.tree_id)
                .contents(page.content_id);
            pdf_page.resources().fonts().pair(FONT_NAME, self.font_id);
            pdf_page.finish();

            self.pdf.stream(page.content_id, &page.content.finish());
        }

        self.pdf.finish()
    }
}
