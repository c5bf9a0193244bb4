use serde::{Deserialize, Serialize};

use crate::common::metadata::{Color, CornerRadius, ECLevel};
use crate::render::Style;

// Options
//------------------------------------------------------------------------------

/// Every option of a QR request except its payload.
///
/// Field names serialize in camelCase, styles in kebab-case and colors as hex strings, so
/// a request can be stored or exchanged as plain JSON:
///
/// ```json
/// { "width": 300, "margin": 4, "color": "#000000", "backgroundColor": "#FFFFFF",
///   "cornerRadius": "rounded", "errorCorrectionLevel": "M", "style": "dots" }
/// ```
#[derive(Debug, PartialEq, Copy, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QROptions {
    pub width: u32,
    pub margin: u32,
    pub color: Color,
    pub background_color: Color,
    pub corner_radius: CornerRadius,
    #[serde(rename = "errorCorrectionLevel")]
    pub ec_level: ECLevel,
    pub style: Style,
}

impl Default for QROptions {
    fn default() -> Self {
        Self {
            width: 300,
            margin: 4,
            color: Color::BLACK,
            background_color: Color::WHITE,
            corner_radius: CornerRadius::Square,
            ec_level: ECLevel::M,
            style: Style::Standard,
        }
    }
}
