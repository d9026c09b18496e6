//! Report layout options and configuration.

use crate::geometry::Dimensions;
use chrono::{Local, NaiveDate};

/// Options controlling report layout.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Size of every page in the report
    pub page_size: PageSize,

    /// Margin on all four sides, in points
    pub margin: f32,

    /// Body text size
    pub font_size: f32,

    /// Section and attachment heading size
    pub heading_font_size: f32,

    /// Cover page title size
    pub title_font_size: f32,

    /// Line height as a multiple of font size
    pub line_spacing: f32,

    /// Largest share of the page an image may take on either axis
    pub image_max_proportion: f32,

    /// Compress content streams in the output
    pub compress: bool,

    /// Date printed on the cover pages
    pub report_date: NaiveDate,
}

impl ReportOptions {
    /// Create new report options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the page margin.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin.max(0.0);
        self
    }

    /// Set the body font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size.clamp(4.0, 72.0);
        self
    }

    /// Set the heading font size.
    pub fn with_heading_font_size(mut self, size: f32) -> Self {
        self.heading_font_size = size.clamp(4.0, 72.0);
        self
    }

    /// Set the line spacing multiple.
    pub fn with_line_spacing(mut self, spacing: f32) -> Self {
        self.line_spacing = spacing.clamp(1.0, 3.0);
        self
    }

    /// Set the maximum image proportion (0.1-1.0).
    pub fn with_image_max_proportion(mut self, proportion: f32) -> Self {
        self.image_max_proportion = proportion.clamp(0.1, 1.0);
        self
    }

    /// Enable or disable stream compression.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Set the report date.
    pub fn with_report_date(mut self, date: NaiveDate) -> Self {
        self.report_date = date;
        self
    }

    /// Page dimensions in points.
    pub fn page_dimensions(&self) -> Dimensions {
        self.page_size.dimensions()
    }

    /// Width available to text between the margins.
    pub fn text_width(&self) -> f32 {
        self.page_dimensions().width - 2.0 * self.margin
    }

    /// Check that the page still has room for text once margins are taken.
    pub fn validate(&self) -> Result<(), String> {
        let page = self.page_dimensions();
        if !page.is_valid() {
            return Err(format!(
                "page size {}x{} is not positive",
                page.width, page.height
            ));
        }
        if self.text_width() <= self.font_size
            || page.height - 2.0 * self.margin <= self.font_size * self.line_spacing
        {
            return Err(format!("margin {} leaves no room for text", self.margin));
        }
        Ok(())
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margin: 50.0,
            font_size: 10.0,
            heading_font_size: 14.0,
            title_font_size: 20.0,
            line_spacing: 1.4,
            image_max_proportion: 0.75,
            compress: true,
            report_date: Local::now().date_naive(),
        }
    }
}

/// Page size of the report.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PageSize {
    /// ISO A4 portrait
    #[default]
    A4,
    /// US Letter portrait
    Letter,
    /// Any other size, in points
    Custom(Dimensions),
}

impl PageSize {
    pub fn dimensions(&self) -> Dimensions {
        match self {
            PageSize::A4 => Dimensions::a4(),
            PageSize::Letter => Dimensions::letter(),
            PageSize::Custom(d) => *d,
        }
    }

    /// Parse a page size string (e.g., "a4", "letter", "500x700").
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            _ => {
                let (w, h) = s
                    .split_once('x')
                    .ok_or_else(|| format!("Unknown page size: {}", s))?;
                let width: f32 = w.trim().parse().map_err(|_| "Invalid page width")?;
                let height: f32 = h.trim().parse().map_err(|_| "Invalid page height")?;
                let dims = Dimensions::new(width, height);
                if !dims.is_valid() {
                    return Err(format!("Page size must be positive: {}", s));
                }
                Ok(PageSize::Custom(dims))
            }
        }
    }
}
