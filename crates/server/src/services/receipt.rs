//! Order receipt rendering.
//!
//! Draws a single-page A4 receipt (with overflow pagination for long orders)
//! using absolute text and rectangle placement, plus a QR code linking back
//! to the order confirmation page. Deliberately imperative; the layout is one
//! document and does not warrant an abstraction.

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rect, Rgb,
};
use qrcode::QrCode;
use thiserror::Error;

use suya_core::format_naira;

use crate::models::{Order, OrderItem};

/// Errors that can occur while rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// PDF generation failed.
    #[error("pdf error: {0}")]
    Pdf(#[from] printpdf::Error),

    /// QR code encoding failed.
    #[error("qr code error: {0}")]
    Qr(#[from] qrcode::types::QrError),
}

const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;
const MARGIN: f64 = 18.0;
const ROW_HEIGHT: f64 = 6.5;
const QR_SIZE: f64 = 26.0;

/// Points-to-millimetres conversion.
const PT_TO_MM: f64 = 0.352_778;

/// Approximate rendered width of Helvetica text, for right alignment.
/// Average glyph width is close to half the point size.
fn approx_text_width(text: &str, size_pt: f64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let chars = text.chars().count() as f64;
    chars * size_pt * 0.5 * PT_TO_MM
}

/// Page state while drawing; replaced wholesale when the layout overflows
/// onto a continuation page.
struct Page {
    layer: PdfLayerReference,
    y: f64,
}

struct Renderer<'a> {
    doc: &'a PdfDocumentReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    page: Page,
}

impl Renderer<'_> {
    fn text(&self, text: &str, size: f64, x: f64) {
        self.page
            .layer
            .use_text(text, size as f32, Mm(x as f32), Mm(self.page.y as f32), &self.regular);
    }

    fn text_bold(&self, text: &str, size: f64, x: f64) {
        self.page
            .layer
            .use_text(text, size as f32, Mm(x as f32), Mm(self.page.y as f32), &self.bold);
    }

    fn text_right(&self, text: &str, size: f64, x_right: f64, bold: bool) {
        let x = x_right - approx_text_width(text, size);
        let font = if bold { &self.bold } else { &self.regular };
        self.page
            .layer
            .use_text(text, size as f32, Mm(x as f32), Mm(self.page.y as f32), font);
    }

    fn fill_rect(&self, x1: f64, y1: f64, x2: f64, y2: f64, color: (f64, f64, f64)) {
        self.page
            .layer
            .set_fill_color(Color::Rgb(Rgb::new(
                color.0 as f32,
                color.1 as f32,
                color.2 as f32,
                None,
            )));
        self.page.layer.add_rect(
            Rect::new(Mm(x1 as f32), Mm(y1 as f32), Mm(x2 as f32), Mm(y2 as f32))
                .with_mode(PaintMode::Fill),
        );
        // Back to text black
        self.page
            .layer
            .set_fill_color(Color::Rgb(Rgb::new(0.1, 0.1, 0.1, None)));
    }

    fn divider(&self, y: f64) {
        self.fill_rect(MARGIN, y, PAGE_WIDTH - MARGIN, y + 0.35, (0.85, 0.85, 0.85));
    }

    fn footer(&mut self) {
        self.page.y = MARGIN - 4.0;
        self.page
            .layer
            .set_fill_color(Color::Rgb(Rgb::new(0.45, 0.45, 0.45, None)));
        self.text("Thank you for shopping with Suya House Spices.", 9.0, MARGIN);
        self.page
            .layer
            .set_fill_color(Color::Rgb(Rgb::new(0.1, 0.1, 0.1, None)));
    }

    /// Start a continuation page and reset the cursor below the top margin.
    fn new_page(&mut self) {
        self.footer();
        let (page_idx, layer_idx) =
            self.doc
                .add_page(Mm(PAGE_WIDTH as f32), Mm(PAGE_HEIGHT as f32), "receipt");
        self.page = Page {
            layer: self.doc.get_page(page_idx).get_layer(layer_idx),
            y: PAGE_HEIGHT - MARGIN,
        };
        paint_paper(&self.page.layer);
    }

    /// Make room for `needed` millimetres, breaking the page when short.
    fn ensure(&mut self, needed: f64) {
        if self.page.y - needed < MARGIN + 18.0 {
            self.new_page();
        }
    }
}

/// Warm off-white paper tint over the whole page.
fn paint_paper(layer: &PdfLayerReference) {
    layer.set_fill_color(Color::Rgb(Rgb::new(0.99, 0.985, 0.97, None)));
    layer.add_rect(
        Rect::new(Mm(0.0), Mm(0.0), Mm(PAGE_WIDTH as f32), Mm(PAGE_HEIGHT as f32))
            .with_mode(PaintMode::Fill),
    );
    layer.set_fill_color(Color::Rgb(Rgb::new(0.1, 0.1, 0.1, None)));
}

/// Draw the QR code in the top-right corner of the first page.
fn draw_qr(renderer: &Renderer<'_>, url: &str) -> Result<(), ReceiptError> {
    let code = QrCode::new(url.as_bytes())?;
    let modules = code.width();
    #[allow(clippy::cast_precision_loss)]
    let module_size = QR_SIZE / modules as f64;
    let origin_x = PAGE_WIDTH - MARGIN - QR_SIZE;
    let origin_y = PAGE_HEIGHT - MARGIN - QR_SIZE;

    renderer
        .page
        .layer
        .set_fill_color(Color::Rgb(Rgb::new(0.1, 0.1, 0.1, None)));

    for (index, color) in code.to_colors().into_iter().enumerate() {
        if color != qrcode::Color::Dark {
            continue;
        }
        #[allow(clippy::cast_precision_loss)]
        let col = (index % modules) as f64;
        #[allow(clippy::cast_precision_loss)]
        let row = (index / modules) as f64;
        let x = origin_x + col * module_size;
        // QR rows count from the top; PDF y counts from the bottom.
        let y = origin_y + QR_SIZE - (row + 1.0) * module_size;
        renderer.page.layer.add_rect(
            Rect::new(
                Mm(x as f32),
                Mm(y as f32),
                Mm((x + module_size) as f32),
                Mm((y + module_size) as f32),
            )
            .with_mode(PaintMode::Fill),
        );
    }

    Ok(())
}

/// Render an order receipt as PDF bytes.
///
/// # Errors
///
/// Returns `ReceiptError` if PDF assembly or QR encoding fails.
pub fn render_receipt(
    order: &Order,
    items: &[OrderItem],
    customer_name: &str,
    base_url: &str,
) -> Result<Vec<u8>, ReceiptError> {
    let (doc, page_idx, layer_idx) = PdfDocument::new(
        format!("Receipt {}", order.order_number),
        Mm(PAGE_WIDTH as f32),
        Mm(PAGE_HEIGHT as f32),
        "receipt",
    );

    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let layer = doc.get_page(page_idx).get_layer(layer_idx);
    paint_paper(&layer);

    let mut renderer = Renderer {
        doc: &doc,
        regular,
        bold,
        page: Page {
            layer,
            y: PAGE_HEIGHT - MARGIN,
        },
    };

    // Header block
    renderer.page.y -= 4.0;
    renderer.text_bold("Suya House Spices", 16.0, MARGIN);
    renderer.page.y -= 8.0;
    renderer.text(
        &format!("Date: {}", order.created_at.format("%d %b %Y %H:%M UTC")),
        10.0,
        MARGIN,
    );
    renderer.page.y -= 5.5;
    renderer.text(&format!("Customer: {customer_name}"), 10.0, MARGIN);
    renderer.page.y -= 5.5;
    renderer.text(&format!("Order #: {}", order.order_number), 10.0, MARGIN);
    if let Some(ship_to) = order.shipping.summary() {
        renderer.page.y -= 5.5;
        renderer.text(&format!("Ship to: {ship_to}"), 10.0, MARGIN);
    }
    if order.payment_method.is_some() || order.payment_reference.is_some() {
        renderer.page.y -= 5.5;
        let method = order.payment_method.as_deref().unwrap_or("-");
        let reference = order
            .payment_reference
            .as_deref()
            .filter(|r| !r.is_empty())
            .map(|r| format!(" (ref: {r})"))
            .unwrap_or_default();
        renderer.text(&format!("Payment: {method}{reference}"), 10.0, MARGIN);
    }

    let confirmation_url = format!(
        "{}/order-confirmation/{}",
        base_url.trim_end_matches('/'),
        order.order_number
    );
    draw_qr(&renderer, &confirmation_url)?;

    // Leave the header/QR zone behind before the table starts
    renderer.page.y = renderer.page.y.min(PAGE_HEIGHT - MARGIN - QR_SIZE) - 10.0;
    renderer.divider(renderer.page.y);
    renderer.page.y -= 8.0;

    // Table header
    let col_name = MARGIN + 2.0;
    let col_qty = MARGIN + 112.0;
    let col_price = MARGIN + 130.0;
    let col_total = PAGE_WIDTH - MARGIN - 2.0;

    renderer.fill_rect(
        MARGIN,
        renderer.page.y - 2.0,
        PAGE_WIDTH - MARGIN,
        renderer.page.y + 6.0,
        (0.955, 0.955, 0.955),
    );
    renderer.text_bold("Item", 10.0, col_name);
    renderer.text_bold("Qty", 10.0, col_qty);
    renderer.text_bold("Price", 10.0, col_price);
    renderer.text_right("Total", 10.0, col_total, true);
    renderer.page.y -= 10.0;

    // Item rows
    let mut subtotal = rust_decimal::Decimal::ZERO;
    for item in items {
        renderer.ensure(ROW_HEIGHT + 3.0);
        subtotal += item.total_price;

        let name: String = item.product_name.chars().take(70).collect();
        renderer.text(&name, 10.0, col_name);
        renderer.text(&item.quantity.to_string(), 10.0, col_qty);
        renderer.text(&format_naira(item.product_price), 10.0, col_price);
        renderer.text_right(&format_naira(item.total_price), 10.0, col_total, false);
        renderer.page.y -= ROW_HEIGHT;
    }

    // Totals block
    renderer.ensure(40.0);
    renderer.page.y -= 2.0;
    renderer.divider(renderer.page.y);
    renderer.page.y -= 8.0;

    let label_x = MARGIN + 112.0;
    renderer.text("Subtotal", 10.0, label_x);
    renderer.text_right(&format_naira(subtotal), 10.0, col_total, false);
    renderer.page.y -= 6.0;
    renderer.text("Shipping", 10.0, label_x);
    renderer.text_right(&format_naira(order.shipping_amount), 10.0, col_total, false);
    renderer.page.y -= 6.0;
    renderer.text("Tax", 10.0, label_x);
    renderer.text_right(&format_naira(order.tax_amount), 10.0, col_total, false);
    renderer.page.y -= 7.0;
    renderer.text_bold("Total", 11.0, label_x);
    renderer.text_right(&format_naira(order.total_amount), 11.0, col_total, true);

    renderer.footer();

    Ok(doc.save_to_bytes()?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use suya_core::{OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId, UserId};

    use crate::models::ShippingDetails;

    fn sample_order(item_count: usize) -> (Order, Vec<OrderItem>) {
        let order = Order {
            id: OrderId::new(1),
            user_id: Some(UserId::new(1)),
            order_number: "SHS-ABCDE23456".to_string(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Paid,
            payment_method: Some("paystack".to_string()),
            payment_reference: Some("ref-123".to_string()),
            currency: "NGN".to_string(),
            total_amount: Decimal::new(45_000, 0),
            shipping_amount: Decimal::new(0, 0),
            tax_amount: Decimal::new(0, 0),
            shipping: ShippingDetails {
                first_name: Some("Adaeze".to_string()),
                last_name: Some("Okafor".to_string()),
                address_line1: Some("12 Allen Avenue".to_string()),
                city: Some("Ikeja".to_string()),
                state: Some("Lagos".to_string()),
                country: Some("Nigeria".to_string()),
                ..ShippingDetails::default()
            },
            tracking_number: Some("SHS-TRK-ABCDE23456".to_string()),
            shipped_at: None,
            delivered_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let items = (0..item_count)
            .map(|i| OrderItem {
                id: OrderItemId::new(i32::try_from(i).unwrap() + 1),
                order_id: OrderId::new(1),
                product_id: Some(ProductId::new(1)),
                product_name: format!("Spice Blend {i}"),
                product_price: Decimal::new(15_000, 0),
                quantity: 1,
                total_price: Decimal::new(15_000, 0),
            })
            .collect();

        (order, items)
    }

    #[test]
    fn test_renders_pdf_bytes() {
        let (order, items) = sample_order(3);
        let bytes = render_receipt(&order, &items, "Adaeze Okafor", "https://suyahouse.shop")
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_long_order_paginates() {
        let (order, items) = sample_order(80);
        let bytes = render_receipt(&order, &items, "Adaeze Okafor", "https://suyahouse.shop")
            .unwrap();
        // Two pages means two /Page objects in the document
        let text = String::from_utf8_lossy(&bytes);
        std::fs::write("/tmp/receipt_dump.pdf", &bytes).unwrap();
        eprintln!("SCRATCH nospace={} space={} pages_word={}",
            text.matches("/Type/Page").count(),
            text.matches("/Type /Page").count(),
            text.matches("/Page").count());
        assert!(text.matches("/Type /Page").count() >= 2);
    }

    #[test]
    fn test_text_width_is_roughly_linear() {
        let narrow = approx_text_width("abc", 10.0);
        let wide = approx_text_width("abcdef", 10.0);
        assert!(wide > narrow * 1.9 && wide < narrow * 2.1);
    }
}
