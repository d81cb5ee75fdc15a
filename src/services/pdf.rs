//! Fixed-layout PDF rendering for quotation and invoice documents.
//!
//! Pure drawing: the renderer takes fetched records and returns bytes, with
//! no side effects. Unparsable item data degrades to an empty table; a
//! missing or undecodable logo asset is skipped.

use crate::dto::{parse_line_items, LineItem};
use crate::entities::{invoice, quotation};
use crate::errors::ServiceError;
use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Rect, Rgb,
};
use rust_decimal::Decimal;
use std::io::Cursor;

/// Which document is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Quotation,
    Invoice,
}

impl DocumentKind {
    fn title(&self) -> &'static str {
        match self {
            Self::Quotation => "QUOTATION",
            Self::Invoice => "INVOICE",
        }
    }
}

// A4 geometry, millimetres, measured from the top of the page.
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 18.0;
const HEADER_BAND_HEIGHT: f32 = 42.0;
const FOOTER_BAND_HEIGHT: f32 = 14.0;
const FOOTER_RESERVE: f32 = 30.0;
const ROW_HEIGHT: f32 = 9.0;
const SUB_ROW_HEIGHT: f32 = 5.5;
const LOGO_WIDTH: f32 = 24.0;

// Business identity block
const BUSINESS_NAME: &str = "CIALA RESORT KISUMU";
const BUSINESS_TOWN: &str = "Kisumu";
const BUSINESS_PHONE: &str = "Phone: +254 700 000 000";
const BUSINESS_EMAIL: &str = "Email: info@cialaexample.com";
const LOGO_PATH: &str = "assets/logo.png";

const FOOTER_TEXT: &str =
    "Thank you for choosing Ciala Resort Kisumu. For inquiries, contact info@cialaexample.com";
const TERMS_LINES: [&str; 3] = [
    "Payment is due within 14 days of the document date.",
    "Bank: Kenya Commercial Bank, Kisumu Branch",
    "Account: Ciala Resort Ltd - 1100 223 344 (KES)",
];

/// Surcharge percentages applied to the stored total amount.
const SURCHARGES: [(&str, i64); 3] = [
    ("VAT (16%)", 16),
    ("Service Charge (10%)", 10),
    ("Catering Levy (2%)", 2),
];

// Palette
fn secondary() -> Color {
    rgb(0xa0, 0x7a, 0x3f)
}
fn accent() -> Color {
    rgb(0xf5, 0xe7, 0xd0)
}
fn table_header_bg() -> Color {
    rgb(0xe6, 0xd3, 0xb3)
}
fn row_even() -> Color {
    rgb(0xf8, 0xf6, 0xf2)
}
fn row_odd() -> Color {
    rgb(0xff, 0xff, 0xff)
}
fn black() -> Color {
    rgb(0x00, 0x00, 0x00)
}
fn white() -> Color {
    rgb(0xff, 0xff, 0xff)
}
fn muted() -> Color {
    rgb(0x55, 0x55, 0x55)
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

fn render_err(e: printpdf::Error) -> ServiceError {
    ServiceError::Render(e.to_string())
}

fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// Approximate Helvetica run width in millimetres; enough for the right
/// alignment and centering this fixed layout needs.
fn approx_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.5 * 0.3528
}

/// Tracks the current page layer and a top-down cursor, breaking onto
/// continuation pages when the cursor runs into the footer reserve.
struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    cursor: f32,
}

impl PageWriter<'_> {
    fn text(&self, text: &str, font: &IndirectFontRef, size: f32, x: f32, y_top: f32) {
        self.layer
            .use_text(text, size, Mm(x), Mm(PAGE_HEIGHT - y_top), font);
    }

    fn text_right(&self, text: &str, font: &IndirectFontRef, size: f32, right: f32, y_top: f32) {
        let x = right - approx_text_width(text, size);
        self.text(text, font, size, x, y_top);
    }

    fn text_centered(&self, text: &str, font: &IndirectFontRef, size: f32, y_top: f32) {
        let x = (PAGE_WIDTH - approx_text_width(text, size)) / 2.0;
        self.text(text, font, size, x, y_top);
    }

    fn fill_rect(&self, x: f32, y_top: f32, width: f32, height: f32, color: Color) {
        self.layer.set_fill_color(color);
        let rect = Rect::new(
            Mm(x),
            Mm(PAGE_HEIGHT - y_top - height),
            Mm(x + width),
            Mm(PAGE_HEIGHT - y_top),
        )
        .with_mode(PaintMode::Fill);
        self.layer.add_rect(rect);
    }

    fn hline(&self, x1: f32, x2: f32, y_top: f32, thickness: f32, color: Color) {
        self.layer.set_outline_color(color);
        self.layer.set_outline_thickness(thickness);
        let line = Line {
            points: vec![
                (Point::new(Mm(x1), Mm(PAGE_HEIGHT - y_top)), false),
                (Point::new(Mm(x2), Mm(PAGE_HEIGHT - y_top)), false),
            ],
            is_closed: false,
        };
        self.layer.add_line(line);
    }

    /// Breaks onto a fresh page when `needed` millimetres would collide with
    /// the footer. Returns true when a break happened.
    fn ensure_room(&mut self, needed: f32) -> bool {
        if self.cursor + needed <= PAGE_HEIGHT - FOOTER_RESERVE {
            return false;
        }
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        draw_footer(self);
        self.cursor = MARGIN + 6.0;
        true
    }
}

/// Renders one document as PDF bytes. `invoice` is required for
/// [`DocumentKind::Invoice`] and ignored for quotations.
pub fn render_document(
    kind: DocumentKind,
    quotation: &quotation::Model,
    invoice: Option<&invoice::Model>,
) -> Result<Vec<u8>, ServiceError> {
    let (doc, page, layer) = PdfDocument::new(
        format!("{} - {}", kind.title(), BUSINESS_NAME),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(render_err)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(render_err)?;

    let mut writer = PageWriter {
        layer: doc.get_page(page).get_layer(layer),
        doc: &doc,
        regular,
        bold,
        cursor: 0.0,
    };

    draw_footer(&writer);
    draw_header(&mut writer, kind.title());

    if let Some(invoice) = invoice {
        draw_invoice_details(&mut writer, invoice);
    }
    draw_client_details(&mut writer, quotation);

    let items = parse_line_items(&quotation.items);
    draw_items_table(&mut writer, &items);
    draw_totals(&mut writer, quotation.total_amount);
    draw_terms(&mut writer);

    doc.save_to_bytes().map_err(render_err)
}

fn draw_header(writer: &mut PageWriter<'_>, title: &str) {
    writer.fill_rect(0.0, 0.0, PAGE_WIDTH, HEADER_BAND_HEIGHT, accent());
    draw_logo(&writer.layer);

    // Business identity, right-hand side of the band
    writer.layer.set_fill_color(secondary());
    writer.text_right(BUSINESS_NAME, &writer.bold, 16.0, PAGE_WIDTH - MARGIN, 12.0);
    writer.layer.set_fill_color(black());
    writer.text_right(BUSINESS_TOWN, &writer.regular, 9.5, PAGE_WIDTH - MARGIN, 18.0);
    writer.text_right(BUSINESS_PHONE, &writer.regular, 9.5, PAGE_WIDTH - MARGIN, 23.0);
    writer.text_right(BUSINESS_EMAIL, &writer.regular, 9.5, PAGE_WIDTH - MARGIN, 28.0);

    writer.layer.set_fill_color(secondary());
    writer.text_centered(title, &writer.bold, 20.0, HEADER_BAND_HEIGHT + 10.0);
    writer.hline(
        MARGIN,
        PAGE_WIDTH - MARGIN,
        HEADER_BAND_HEIGHT + 14.0,
        1.2,
        secondary(),
    );

    writer.cursor = HEADER_BAND_HEIGHT + 22.0;
}

/// Best effort: a missing or undecodable logo never fails the document.
fn draw_logo(layer: &PdfLayerReference) {
    let Ok(bytes) = std::fs::read(LOGO_PATH) else {
        return;
    };
    let Ok(decoder) = PngDecoder::new(Cursor::new(bytes)) else {
        return;
    };
    let Ok(image) = Image::try_from(decoder) else {
        return;
    };

    let width_px = image.image.width.0 as f32;
    let height_px = image.image.height.0 as f32;
    if width_px <= 0.0 || height_px <= 0.0 {
        return;
    }
    // Px -> mm at the 300 dpi printpdf assumes, scaled to the slot width.
    let natural_width_mm = width_px * 25.4 / 300.0;
    let scale = LOGO_WIDTH / natural_width_mm;
    let height_mm = height_px * 25.4 / 300.0 * scale;

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(MARGIN)),
            translate_y: Some(Mm(PAGE_HEIGHT - 8.0 - height_mm)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            ..Default::default()
        },
    );
}

fn draw_footer(writer: &PageWriter<'_>) {
    writer.fill_rect(
        0.0,
        PAGE_HEIGHT - FOOTER_BAND_HEIGHT,
        PAGE_WIDTH,
        FOOTER_BAND_HEIGHT,
        secondary(),
    );
    writer.layer.set_fill_color(white());
    writer.text_centered(
        FOOTER_TEXT,
        &writer.regular,
        8.0,
        PAGE_HEIGHT - FOOTER_BAND_HEIGHT + 8.5,
    );
}

fn draw_invoice_details(writer: &mut PageWriter<'_>, invoice: &invoice::Model) {
    writer.layer.set_fill_color(secondary());
    writer.text("Invoice Details", &writer.bold, 11.5, MARGIN, writer.cursor);
    writer.cursor += 6.5;

    writer.layer.set_fill_color(black());
    writer.text("Invoice #:", &writer.regular, 9.5, MARGIN + 4.0, writer.cursor);
    writer.text(
        &invoice.invoice_number,
        &writer.bold,
        9.5,
        MARGIN + 28.0,
        writer.cursor,
    );
    writer.cursor += 5.5;
    writer.text("Invoice Date:", &writer.regular, 9.5, MARGIN + 4.0, writer.cursor);
    writer.text(
        &invoice.invoice_date.format("%d %b %Y").to_string(),
        &writer.bold,
        9.5,
        MARGIN + 28.0,
        writer.cursor,
    );
    writer.cursor += 9.0;
}

fn draw_client_details(writer: &mut PageWriter<'_>, quotation: &quotation::Model) {
    writer.layer.set_fill_color(secondary());
    writer.text("Client Details", &writer.bold, 11.5, MARGIN, writer.cursor);
    writer.cursor += 6.5;

    writer.layer.set_fill_color(black());
    let rows = [
        ("Name:", quotation.client_name.clone()),
        ("Email:", quotation.email.clone()),
        ("Phone:", quotation.phone.clone()),
        (
            "Date:",
            quotation.quotation_date.format("%d %b %Y").to_string(),
        ),
    ];
    for (label, value) in rows {
        writer.text(label, &writer.regular, 9.5, MARGIN + 4.0, writer.cursor);
        writer.text(&value, &writer.bold, 9.5, MARGIN + 28.0, writer.cursor);
        writer.cursor += 5.5;
    }
    writer.cursor += 6.0;
}

const COL_NAME: f32 = MARGIN + 2.0;
const COL_QTY_RIGHT: f32 = 124.0;
const COL_PRICE_RIGHT: f32 = 157.0;
const COL_TOTAL_RIGHT: f32 = PAGE_WIDTH - MARGIN - 2.0;

fn draw_table_header(writer: &mut PageWriter<'_>) {
    let width = PAGE_WIDTH - 2.0 * MARGIN;
    writer.fill_rect(MARGIN, writer.cursor, width, ROW_HEIGHT, table_header_bg());
    writer.layer.set_fill_color(secondary());
    let baseline = writer.cursor + 6.0;
    writer.text("Item", &writer.bold, 10.0, COL_NAME, baseline);
    writer.text_right("Qty", &writer.bold, 10.0, COL_QTY_RIGHT, baseline);
    writer.text_right("Price", &writer.bold, 10.0, COL_PRICE_RIGHT, baseline);
    writer.text_right("Total", &writer.bold, 10.0, COL_TOTAL_RIGHT, baseline);
    writer.cursor += ROW_HEIGHT;
}

fn draw_items_table(writer: &mut PageWriter<'_>, items: &[LineItem]) {
    draw_table_header(writer);

    let width = PAGE_WIDTH - 2.0 * MARGIN;
    for (index, item) in items.iter().enumerate() {
        let row_span = ROW_HEIGHT + SUB_ROW_HEIGHT * item.sub_items.len() as f32;
        if writer.ensure_room(row_span) {
            draw_table_header(writer);
        }

        let bg = if index % 2 == 0 { row_even() } else { row_odd() };
        writer.fill_rect(MARGIN, writer.cursor, width, row_span, bg);

        let baseline = writer.cursor + 6.0;
        writer.layer.set_fill_color(black());
        writer.text(&item.name, &writer.regular, 9.5, COL_NAME, baseline);
        writer.text_right(
            &item.qty.to_string(),
            &writer.regular,
            9.5,
            COL_QTY_RIGHT,
            baseline,
        );
        writer.text_right(
            &format_amount(item.effective_unit_price()),
            &writer.regular,
            9.5,
            COL_PRICE_RIGHT,
            baseline,
        );
        writer.text_right(
            &format_amount(item.extended_amount()),
            &writer.regular,
            9.5,
            COL_TOTAL_RIGHT,
            baseline,
        );
        writer.cursor += ROW_HEIGHT;

        writer.layer.set_fill_color(muted());
        for sub_item in &item.sub_items {
            let sub_baseline = writer.cursor + 3.5;
            writer.text(
                &format!("- {}", sub_item),
                &writer.regular,
                8.0,
                COL_NAME + 5.0,
                sub_baseline,
            );
            writer.cursor += SUB_ROW_HEIGHT;
        }
    }
    writer.cursor += 3.0;
}

fn draw_totals(writer: &mut PageWriter<'_>, total_amount: Decimal) {
    let rows = 2.0 + SURCHARGES.len() as f32;
    if writer.ensure_room(rows * 7.0 + ROW_HEIGHT) {
        writer.cursor += 4.0;
    }

    let label_right = COL_PRICE_RIGHT + 10.0;
    writer.layer.set_fill_color(black());
    writer.text_right("Subtotal", &writer.regular, 9.5, label_right, writer.cursor + 5.0);
    writer.text_right(
        &format_amount(total_amount),
        &writer.regular,
        9.5,
        COL_TOTAL_RIGHT,
        writer.cursor + 5.0,
    );
    writer.cursor += 6.5;

    let hundred = Decimal::new(100, 0);
    let mut grand_total = total_amount;
    for (label, percent) in SURCHARGES {
        let charge = total_amount * Decimal::new(percent, 0) / hundred;
        grand_total += charge;
        writer.text_right(label, &writer.regular, 9.5, label_right, writer.cursor + 5.0);
        writer.text_right(
            &format_amount(charge),
            &writer.regular,
            9.5,
            COL_TOTAL_RIGHT,
            writer.cursor + 5.0,
        );
        writer.cursor += 6.5;
    }

    let width = PAGE_WIDTH - 2.0 * MARGIN;
    writer.fill_rect(MARGIN, writer.cursor, width, ROW_HEIGHT, secondary());
    writer.layer.set_fill_color(white());
    let baseline = writer.cursor + 6.0;
    writer.text_right("Total Due", &writer.bold, 11.0, label_right, baseline);
    writer.text_right(
        &format_amount(grand_total),
        &writer.bold,
        11.0,
        COL_TOTAL_RIGHT,
        baseline,
    );
    writer.cursor += ROW_HEIGHT + 8.0;
}

fn draw_terms(writer: &mut PageWriter<'_>) {
    writer.ensure_room(8.0 + TERMS_LINES.len() as f32 * 5.0);

    writer.layer.set_fill_color(secondary());
    writer.text("Terms & Bank Details", &writer.bold, 10.5, MARGIN, writer.cursor);
    writer.cursor += 6.0;

    writer.layer.set_fill_color(muted());
    for line in TERMS_LINES {
        writer.text(line, &writer.regular, 8.5, MARGIN + 4.0, writer.cursor);
        writer.cursor += 5.0;
    }
}
