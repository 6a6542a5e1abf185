use crate::config::EngineConfig;
use crate::error::RenderError;
use crate::services::certificates::layout::{
    AccessoryCells, CertificateLayout, InfoCells, InfoLine, PageHeader, PhotoSection, SpecRow,
    CERTIFICATE_TITLE, FOOTER_LINES, NO_PHOTO_PLACEHOLDER, SPEC_HEADINGS,
};
use crate::services::certificates::fonts::load_font;
use crate::services::certificates::markup;
use genpdf::elements::{
    Break, FrameCellDecorator, Image as PdfImage, LinearLayout, PageBreak, Paragraph, TableLayout,
};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::render::Area;
use genpdf::style::{Color, Style, StyledString};
use genpdf::{Alignment, Context, Document, Element, Margins, Mm, PageDecorator, PaperSize, Position};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use log::{debug, warn};
use png::{BitDepth as PngBitDepth, ColorType as PngColorType, Encoder as PngEncoder};
use std::fs::{self, File};
use std::path::Path;
use tempfile::NamedTempFile;

const SIDE_MARGIN_MM: i32 = 12;
const TOP_MARGIN_MM: i32 = 10;
const BOTTOM_MARGIN_MM: i32 = 8;
const FOOTER_HEIGHT_MM: i32 = 12;
const HEADER_GAP_MM: i32 = 6;

/// Logo box, in inches.
const LOGO_BOX: (f64, f64) = (1.5, 0.8);
/// Site photo box, in inches.
const PHOTO_BOX: (f64, f64) = (4.0, 2.5);

const GREEN: Color = Color::Rgb(0, 128, 0);
const ORANGE: Color = Color::Rgb(230, 102, 26);
const GREY: Color = Color::Rgb(128, 128, 128);

/// Produces the document for one certificate plan.
pub trait CertificateRenderer {
    fn render(&self, layout: &CertificateLayout, output: &Path) -> Result<(), RenderError>;
}

/// Renders certificates to A4 PDFs with `genpdf`.
pub struct PdfRenderer {
    font_family: FontFamily<FontData>,
    image_dpi: f64,
}

impl PdfRenderer {
    /// Loads the first font family found in the configured directories.
    pub fn new(config: &EngineConfig) -> Result<Self, RenderError> {
        Ok(Self {
            font_family: load_font(config)?,
            image_dpi: config.image_dpi,
        })
    }

    fn stage_logo(&self, header: &PageHeader) -> Option<StagedImage> {
        let path = header.logo.as_deref()?;
        match prepare_image(path, LOGO_BOX, self.image_dpi) {
            Ok(staged) => Some(staged),
            Err(e) => {
                warn!("Logo {} could not be loaded: {}", path.display(), e);
                None
            }
        }
    }

    /// Pushes the photo section. Unreadable photos are skipped; if none can be
    /// embedded the placeholder is shown instead.
    fn push_photos(
        &self,
        doc: &mut Document,
        photos: &PhotoSection,
        temp_files: &mut Vec<NamedTempFile>,
    ) {
        let blocks = match photos {
            PhotoSection::Omitted => return,
            PhotoSection::Placeholder => {
                doc.push(placeholder());
                return;
            }
            PhotoSection::Photos(blocks) => blocks,
        };

        let mut embedded = 0;
        for block in blocks {
            let image = prepare_image(&block.path, PHOTO_BOX, self.image_dpi)
                .and_then(|staged| Ok((staged.element()?, staged)));
            match image {
                Ok((element, staged)) => {
                    doc.push(Paragraph::new(StyledString::new(
                        block.caption.clone(),
                        Style::new().bold(),
                    )));
                    doc.push(Break::new(0.5));
                    doc.push(element);
                    doc.push(Break::new(1.5));
                    temp_files.push(staged.file);
                    embedded += 1;
                }
                Err(e) => warn!("Photo {} skipped: {}", block.path.display(), e),
            }
        }
        if embedded == 0 {
            doc.push(placeholder());
        }
    }
}

impl CertificateRenderer for PdfRenderer {
    fn render(&self, layout: &CertificateLayout, output: &Path) -> Result<(), RenderError> {
        let mut doc = Document::new(self.font_family.clone());
        doc.set_title(layout.document_title.clone());
        doc.set_paper_size(PaperSize::A4);
        doc.set_font_size(10);
        doc.set_line_spacing(1.2);
        doc.set_page_decorator(CertificatePageDecorator {
            logo: self.stage_logo(&layout.header),
            company_name: layout.header.company_name.clone(),
        });

        // Keep temporary files alive until rendering finishes
        let mut temp_files: Vec<NamedTempFile> = Vec::new();

        doc.push(issued_to(&layout.client_name));
        doc.push(Break::new(1.5));
        doc.push(branch_info(&layout.branch_info)?);
        doc.push(Break::new(1.5));

        doc.push(
            Paragraph::new("Signage Specifications")
                .styled(Style::new().bold().italic().with_font_size(12)),
        );
        doc.push(Break::new(0.5));
        doc.push(spec_table(&layout.spec_rows)?);
        doc.push(Break::new(1.5));

        self.push_photos(&mut doc, &layout.photos, &mut temp_files);

        doc.push(PageBreak::new());
        doc.push(Paragraph::new("Terms & Conditions").styled(Style::new().bold().with_font_size(14)));
        doc.push(Break::new(1));
        for line in &layout.terms {
            doc.push(terms_paragraph(line));
            doc.push(Break::new(0.5));
        }

        write_output(output, |file| doc.render(file))?;
        debug!(
            "Rendered {} with {} embedded photo(s)",
            output.display(),
            temp_files.len()
        );
        Ok(())
    }
}

/// Header and footer drawn on every page.
struct CertificatePageDecorator {
    logo: Option<StagedImage>,
    company_name: String,
}

impl CertificatePageDecorator {
    fn header(&self) -> Result<TableLayout, genpdf::error::Error> {
        let logo: Box<dyn Element> = match &self.logo {
            Some(staged) => Box::new(staged.element()?),
            None => Box::new(Paragraph::new("")),
        };
        let title = Paragraph::new(StyledString::new(
            CERTIFICATE_TITLE,
            Style::new().bold().with_font_size(20),
        ))
        .aligned(Alignment::Center);
        let company = Paragraph::new(StyledString::new(
            self.company_name.clone(),
            Style::new().bold().with_font_size(11),
        ))
        .aligned(Alignment::Right);

        let mut table = TableLayout::new(vec![1, 2, 1]);
        table.push_row(vec![logo, Box::new(title), Box::new(company)])?;
        Ok(table)
    }

    fn footer() -> LinearLayout {
        let mut footer = LinearLayout::vertical();
        for line in FOOTER_LINES {
            footer.push(Paragraph::new(line).aligned(Alignment::Center));
        }
        footer
    }
}

impl PageDecorator for CertificatePageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &Context,
        mut area: Area<'a>,
        style: Style,
    ) -> Result<Area<'a>, genpdf::error::Error> {
        area.add_margins(Margins::trbl(
            TOP_MARGIN_MM,
            SIDE_MARGIN_MM,
            BOTTOM_MARGIN_MM,
            SIDE_MARGIN_MM,
        ));

        let footer_height = Mm::from(FOOTER_HEIGHT_MM);
        let mut footer_area = area.clone();
        footer_area.add_offset(Position::new(0, area.size().height - footer_height));
        let footer_style = style.with_font_size(8).with_color(GREY);
        Self::footer().render(context, footer_area, footer_style)?;
        area.set_height(area.size().height - footer_height);

        let rendered = self.header()?.render(context, area.clone(), style)?;
        area.add_offset(Position::new(0, rendered.size.height + Mm::from(HEADER_GAP_MM)));
        Ok(area)
    }
}

/// A resampled, alpha-free PNG copy of a source image, sized for its box.
struct StagedImage {
    file: NamedTempFile,
    dpi: f64,
}

impl StagedImage {
    fn element(&self) -> Result<PdfImage, genpdf::error::Error> {
        let mut image = PdfImage::from_path(self.file.path())?;
        image.set_dpi(self.dpi);
        Ok(image)
    }
}

/// Scale that fits `width_px` x `height_px` into `box_in` (inches) at `dpi`,
/// preserving the aspect ratio. Values above 1 mean the image is smaller
/// than the box.
pub fn fit_scale(width_px: u32, height_px: u32, box_in: (f64, f64), dpi: f64) -> f64 {
    let (box_w, box_h) = box_in;
    let by_width = box_w * dpi / f64::from(width_px.max(1));
    let by_height = box_h * dpi / f64::from(height_px.max(1));
    by_width.min(by_height)
}

/// Loads an image, fits it into `box_in`, flattens any alpha channel onto
/// white and writes it as an RGB PNG to a temporary file.
///
/// Oversized images are resampled; smaller ones keep their pixels and get a
/// lower embedding resolution instead, so both end up filling the box.
fn prepare_image(path: &Path, box_in: (f64, f64), dpi: f64) -> Result<StagedImage, RenderError> {
    let img = image::open(path)?;
    let (orig_w, orig_h) = img.dimensions();
    let scale = fit_scale(orig_w, orig_h, box_in, dpi);

    let (resized, dpi): (DynamicImage, f64) = if scale < 1.0 {
        let new_w = (f64::from(orig_w) * scale).max(1.0).round() as u32;
        let new_h = (f64::from(orig_h) * scale).max(1.0).round() as u32;
        (img.resize_exact(new_w, new_h, FilterType::Lanczos3), dpi)
    } else {
        (img, dpi / scale)
    };

    // Flatten alpha channel over white background and convert to RGB
    let rgba = resized.to_rgba8();
    let (w, h) = rgba.dimensions();
    let mut background = image::RgbaImage::from_pixel(w, h, image::Rgba([255, 255, 255, 255]));
    image::imageops::overlay(&mut background, &rgba, 0, 0);
    let raw = DynamicImage::ImageRgba8(background).to_rgb8().into_raw();

    let mut tmp = tempfile::Builder::new()
        .prefix("warranty-img-")
        .suffix(".png")
        .tempfile()?;
    {
        let file = tmp.as_file_mut();
        let mut encoder = PngEncoder::new(file, w, h);
        encoder.set_color(PngColorType::Rgb);
        encoder.set_depth(PngBitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&raw)?;
    }
    Ok(StagedImage { file: tmp, dpi })
}

/// Creates `output` and hands it to `write`. Whatever a failed write left
/// behind is removed, so only complete certificates remain on disk.
fn write_output<E>(
    output: &Path,
    write: impl FnOnce(&mut File) -> Result<(), E>,
) -> Result<(), RenderError>
where
    RenderError: From<E>,
{
    let mut file = File::create(output)?;
    let result = write(&mut file);
    drop(file);
    if let Err(e) = result {
        if let Err(rm) = fs::remove_file(output) {
            warn!("Could not remove partial {}: {}", output.display(), rm);
        }
        return Err(e.into());
    }
    Ok(())
}

fn issued_to(client_name: &str) -> impl Element {
    let mut paragraph = Paragraph::new("This warranty is issued to ");
    paragraph.push(StyledString::new(
        client_name.to_string(),
        Style::new().bold().with_color(GREEN),
    ));
    paragraph
        .aligned(Alignment::Center)
        .styled(Style::new().with_font_size(12))
}

fn cell(text: impl Into<String>, style: Style) -> Box<dyn Element> {
    Box::new(Paragraph::new(StyledString::new(text.into(), style)).padded(1))
}

fn framed_table(weights: Vec<usize>) -> TableLayout {
    let mut table = TableLayout::new(weights);
    table.set_cell_decorator(FrameCellDecorator::new(true, true, false));
    table
}

/// One framed table per line, so a spanning line can sit between two-column ones.
fn branch_info(lines: &[InfoLine]) -> Result<LinearLayout, RenderError> {
    let mut block = LinearLayout::vertical();
    for line in lines {
        let style = if line.highlighted {
            Style::new().bold().with_color(ORANGE)
        } else {
            Style::new()
        };
        let table = match &line.cells {
            InfoCells::Pair(left, right) => {
                let mut table = framed_table(vec![1, 1]);
                table.push_row(vec![cell(left.clone(), style), cell(right.clone(), style)])?;
                table
            }
            InfoCells::Span(text) => {
                let mut table = framed_table(vec![1]);
                table.push_row(vec![cell(text.clone(), style)])?;
                table
            }
        };
        block.push(table);
    }
    Ok(block)
}

/// The LED module / power supply columns live in a nested two-column table
/// so that a row can merge them into one cell.
fn accessory_element(
    accessory: &AccessoryCells,
    style: Style,
) -> Result<Box<dyn Element>, RenderError> {
    let (left, right) = match accessory {
        AccessoryCells::Merged(label) => {
            return Ok(Box::new(
                Paragraph::new(StyledString::new(*label, style))
                    .aligned(Alignment::Center)
                    .padded(1),
            ))
        }
        AccessoryCells::Blank => (String::new(), String::new()),
        AccessoryCells::Values {
            led_modules,
            power_supply,
        } => (led_modules.clone(), power_supply.clone()),
    };
    Ok(Box::new(split_cells(&left, &right, style)?))
}

fn split_cells(left: &str, right: &str, style: Style) -> Result<TableLayout, RenderError> {
    let mut table = TableLayout::new(vec![1, 1]);
    table.set_cell_decorator(FrameCellDecorator::new(true, false, false));
    table.push_row(vec![cell(left, style), cell(right, style)])?;
    Ok(table)
}

fn spec_table(rows: &[SpecRow]) -> Result<impl Element, RenderError> {
    let heading = Style::new().bold();
    let mut table = framed_table(vec![18, 10, 10, 30]);
    let [coverage, size, sqft, led, power] = SPEC_HEADINGS;
    table.push_row(vec![
        cell(coverage, heading),
        cell(size, heading),
        cell(sqft, heading),
        Box::new(split_cells(led, power, heading)?),
    ])?;
    for row in rows {
        table.push_row(vec![
            cell(row.title.clone(), Style::new()),
            cell(row.size.clone(), Style::new()),
            cell(row.sqft.clone(), Style::new()),
            accessory_element(&row.accessory, Style::new())?,
        ])?;
    }
    Ok(table.styled(Style::new().with_font_size(9)))
}

fn placeholder() -> Paragraph {
    Paragraph::new(StyledString::new(NO_PHOTO_PLACEHOLDER, Style::new().italic()))
}

/// Converts one terms line into a paragraph, one styled run per segment.
fn terms_paragraph(line: &str) -> Paragraph {
    let mut paragraph = Paragraph::new("");
    for segment in markup::parse_line(line) {
        let mut style = Style::new();
        if segment.bold {
            style.set_bold();
        }
        if segment.italic {
            style.set_italic();
        }
        if let Some((r, g, b)) = segment.color {
            style.set_color(Color::Rgb(r, g, b));
        }
        paragraph.push(StyledString::new(segment.text, style));
    }
    paragraph
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn large_images_shrink_to_the_box() {
        // 4000x2000 px into 4in x 2.5in at 150 dpi: width is the binding side.
        let scale = fit_scale(4000, 2000, PHOTO_BOX, 150.0);
        assert!((scale - 0.15).abs() < 1e-9);
    }

    #[test]
    fn tall_images_are_bound_by_height() {
        let scale = fit_scale(300, 1500, PHOTO_BOX, 150.0);
        assert!((scale - 0.25).abs() < 1e-9);
    }

    #[test]
    fn small_images_report_growth() {
        assert!(fit_scale(60, 32, LOGO_BOX, 150.0) > 1.0);
    }

    #[test]
    fn prepared_images_are_opaque_rgb_within_the_box() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("101_1.png");
        image::RgbaImage::from_pixel(1200, 600, image::Rgba([10, 20, 30, 0]))
            .save(&source)
            .unwrap();

        let staged = prepare_image(&source, PHOTO_BOX, 150.0).unwrap();
        let out = image::open(staged.file.path()).unwrap();
        assert_eq!(out.color(), image::ColorType::Rgb8);
        assert_eq!(out.dimensions(), (600, 300));
        // Fully transparent pixels flatten to white.
        assert_eq!(out.to_rgb8().get_pixel(0, 0).0, [255, 255, 255]);
        assert!((staged.dpi - 150.0).abs() < 1e-9);
    }

    #[test]
    fn small_images_keep_pixels_and_lower_dpi() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("logo.png");
        image::RgbImage::from_pixel(75, 40, image::Rgb([0, 0, 0]))
            .save(&source)
            .unwrap();

        let staged = prepare_image(&source, LOGO_BOX, 150.0).unwrap();
        let out = image::open(staged.file.path()).unwrap();
        assert_eq!(out.dimensions(), (75, 40));
        // 75 px at 50 dpi is exactly the 1.5 in box width.
        assert!((staged.dpi - 50.0).abs() < 1e-9);
    }

    #[test]
    fn unreadable_images_are_errors() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("broken.jpg");
        std::fs::write(&source, b"not an image").unwrap();
        assert!(prepare_image(&source, PHOTO_BOX, 150.0).is_err());
    }

    #[test]
    fn failed_writes_leave_no_partial_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("Certificate_101_Jaipur Main.pdf");
        let result = write_output(&output, |file| {
            file.write_all(b"%PDF-1.7 truncated")?;
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        });
        assert!(matches!(result, Err(RenderError::Io(_))));
        assert!(!output.exists());
    }

    #[test]
    fn successful_writes_are_kept() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("Certificate_102_Udaipur City.pdf");
        write_output(&output, |file| file.write_all(b"%PDF-1.7")).unwrap();
        assert_eq!(std::fs::read(&output).unwrap(), b"%PDF-1.7");
    }

    #[test]
    fn missing_fonts_are_reported() {
        let dir = TempDir::new().unwrap();
        let config = EngineConfig {
            font_dirs: vec![dir.path().to_path_buf()],
            font_families: vec!["NoSuchFont".into()],
            image_dpi: 150.0,
        };
        assert!(matches!(
            PdfRenderer::new(&config),
            Err(RenderError::FontNotFound(tried)) if tried == "NoSuchFont"
        ));
    }
}
