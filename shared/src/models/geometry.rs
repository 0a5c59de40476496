//! Page geometry model
//!
//! A geometry is the character grid one physical page offers: how many
//! columns fit on a line and how many lines fit on a page. Every printer
//! variant uses the same layout algorithm with a different geometry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, AppResult, ErrorCode};

const MM_TO_PT: f32 = 72.0 / 25.4;

/// Character grid of one page
///
/// Deserialized values go through [`PageGeometry::new`], so stored or
/// configured geometries obey the same minimums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGeometry")]
pub struct PageGeometry {
    width: usize,
    max_lines: usize,
}

/// Unchecked wire form of [`PageGeometry`]
#[derive(Deserialize)]
struct RawGeometry {
    width: usize,
    max_lines: usize,
}

impl TryFrom<RawGeometry> for PageGeometry {
    type Error = AppError;

    fn try_from(raw: RawGeometry) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.max_lines)
    }
}

impl PageGeometry {
    /// Narrowest grid the receipt sections can be laid out on
    pub const MIN_WIDTH: usize = 20;
    /// Shortest page accepted
    pub const MIN_LINES: usize = 10;

    pub fn new(width: usize, max_lines: usize) -> AppResult<Self> {
        if width < Self::MIN_WIDTH {
            return Err(AppError::with_message(
                ErrorCode::GeometryTooSmall,
                format!("page width {width} is below the minimum of {}", Self::MIN_WIDTH),
            )
            .with_detail("width", width as u64));
        }
        if max_lines < Self::MIN_LINES {
            return Err(AppError::with_message(
                ErrorCode::GeometryTooSmall,
                format!(
                    "page height {max_lines} is below the minimum of {}",
                    Self::MIN_LINES
                ),
            )
            .with_detail("max_lines", max_lines as u64));
        }
        Ok(Self { width, max_lines })
    }

    /// Columns per line
    pub fn width(&self) -> usize {
        self.width
    }

    /// Lines per page
    pub fn max_lines(&self) -> usize {
        self.max_lines
    }
}

impl fmt::Display for PageGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.max_lines)
    }
}

/// Supported paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaperSize {
    /// 58mm thermal roll, cut into tickets
    Thermal58,
    /// 80mm thermal roll, cut into tickets
    Thermal80,
    A6,
    A5,
    A4,
}

impl PaperSize {
    /// Character grid for this paper
    ///
    /// Thermal tickets keep the usual ESC/POS font A widths (32/48 columns).
    /// Laser formats assume a monospaced font at roughly 12-13 cpi.
    pub fn geometry(&self) -> PageGeometry {
        let (width, max_lines) = match self {
            PaperSize::Thermal58 => (32, 48),
            PaperSize::Thermal80 => (48, 64),
            PaperSize::A6 => (48, 40),
            PaperSize::A5 => (64, 58),
            PaperSize::A4 => (80, 72),
        };
        PageGeometry { width, max_lines }
    }

    /// Physical size in millimetres (width, height)
    pub fn size_mm(&self) -> (f32, f32) {
        match self {
            PaperSize::Thermal58 => (58.0, 210.0),
            PaperSize::Thermal80 => (80.0, 250.0),
            PaperSize::A6 => (105.0, 148.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::A4 => (210.0, 297.0),
        }
    }

    /// Physical size in PDF points (width, height)
    pub fn size_pt(&self) -> (f32, f32) {
        let (w, h) = self.size_mm();
        (w * MM_TO_PT, h * MM_TO_PT)
    }

    /// Media name understood by the print spooler
    pub fn media_name(&self) -> &'static str {
        match self {
            PaperSize::Thermal58 => "Custom.58x210mm",
            PaperSize::Thermal80 => "Custom.80x250mm",
            PaperSize::A6 => "A6",
            PaperSize::A5 => "A5",
            PaperSize::A4 => "A4",
        }
    }

    /// Character pitch that fits `geometry().width()` columns inside the
    /// page with a 6mm horizontal margin on each side
    pub fn characters_per_inch(&self) -> f32 {
        let (w, _) = self.size_mm();
        self.geometry().width() as f32 / ((w - 12.0) / 25.4)
    }

    /// Line pitch that fits `geometry().max_lines()` lines inside the page
    /// with a 6mm vertical margin on each side
    pub fn lines_per_inch(&self) -> f32 {
        let (_, h) = self.size_mm();
        self.geometry().max_lines() as f32 / ((h - 12.0) / 25.4)
    }

    pub fn is_thermal(&self) -> bool {
        matches!(self, PaperSize::Thermal58 | PaperSize::Thermal80)
    }

    /// Parse the `paper_width` setting (`"58"` or `"80"`)
    pub fn from_thermal_width(value: &str) -> AppResult<Self> {
        match value.trim() {
            "58" => Ok(PaperSize::Thermal58),
            "80" => Ok(PaperSize::Thermal80),
            other => Err(AppError::config(format!(
                "paper_width must be 58 or 80, got {other:?}"
            ))
            .with_detail("key", "paper_width")),
        }
    }
}

impl FromStr for PaperSize {
    type Err = AppError;

    /// Parse a laser paper format (`A6`, `A5`, `A4`) or a thermal width
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A6" => Ok(PaperSize::A6),
            "A5" => Ok(PaperSize::A5),
            "A4" => Ok(PaperSize::A4),
            "58" | "58MM" => Ok(PaperSize::Thermal58),
            "80" | "80MM" => Ok(PaperSize::Thermal80),
            _ => Err(AppError::config(format!("unknown paper format {s:?}"))),
        }
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaperSize::Thermal58 => "58mm",
            PaperSize::Thermal80 => "80mm",
            PaperSize::A6 => "A6",
            PaperSize::A5 => "A5",
            PaperSize::A4 => "A4",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_bounds() {
        assert!(PageGeometry::new(40, 40).is_ok());
        assert_eq!(
            PageGeometry::new(19, 40).unwrap_err().code,
            ErrorCode::GeometryTooSmall
        );
        assert_eq!(
            PageGeometry::new(40, 9).unwrap_err().code,
            ErrorCode::GeometryTooSmall
        );
    }

    #[test]
    fn test_geometry_deserialize_checks_bounds() {
        let g: PageGeometry = serde_json::from_str(r#"{"width":32,"max_lines":48}"#).unwrap();
        assert_eq!(g, PaperSize::Thermal58.geometry());
        assert_eq!(serde_json::to_string(&g).unwrap(), r#"{"width":32,"max_lines":48}"#);

        let err = serde_json::from_str::<PageGeometry>(r#"{"width":10,"max_lines":40}"#)
            .unwrap_err();
        assert!(err.to_string().contains("page width 10"), "{err}");
        assert!(serde_json::from_str::<PageGeometry>(r#"{"width":40,"max_lines":3}"#).is_err());
    }

    #[test]
    fn test_paper_geometries_are_valid() {
        for paper in [
            PaperSize::Thermal58,
            PaperSize::Thermal80,
            PaperSize::A6,
            PaperSize::A5,
            PaperSize::A4,
        ] {
            let g = paper.geometry();
            assert!(PageGeometry::new(g.width(), g.max_lines()).is_ok(), "{paper}");
        }
        assert_eq!(PaperSize::Thermal58.geometry().width(), 32);
        assert_eq!(PaperSize::Thermal80.geometry().width(), 48);
    }

    #[test]
    fn test_parse_paper() {
        assert_eq!("a6".parse::<PaperSize>().unwrap(), PaperSize::A6);
        assert_eq!("80".parse::<PaperSize>().unwrap(), PaperSize::Thermal80);
        assert!("Letter".parse::<PaperSize>().is_err());
        assert_eq!(
            PaperSize::from_thermal_width("58").unwrap(),
            PaperSize::Thermal58
        );
        assert_eq!(
            PaperSize::from_thermal_width("72").unwrap_err().code,
            ErrorCode::ConfigError
        );
    }

    #[test]
    fn test_a6_pitch() {
        let cpi = PaperSize::A6.characters_per_inch();
        assert!(cpi > 12.0 && cpi < 14.0, "cpi = {cpi}");
        let (w, h) = PaperSize::A6.size_pt();
        assert!((w - 297.6).abs() < 0.5);
        assert!((h - 419.5).abs() < 0.5);
    }
}
