use qrcode::QrCode;

use crate::common::error::{QRError, QRResult};

// Module grid
//------------------------------------------------------------------------------

/// Dark/light flags of an encoded symbol, row major, without quiet zone.
///
/// Styling only ever reads the grid; every renderer derives a fresh artifact from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGrid {
    w: usize,
    dark: Vec<bool>,
    ap: Vec<usize>, // Alignment pattern locations
}

impl ModuleGrid {
    /// Grid of side w from row major dark flags. Fails unless there are exactly w * w flags.
    pub fn new(w: usize, dark: Vec<bool>) -> QRResult<Self> {
        if w == 0 || w.checked_mul(w) != Some(dark.len()) {
            return Err(QRError::InvalidGrid { width: w, len: dark.len() });
        }
        Ok(Self { w, dark, ap: alignment_pattern(w) })
    }

    pub(crate) fn from_code(code: &QrCode) -> QRResult<Self> {
        let dark = code.to_colors().into_iter().map(|c| c == qrcode::Color::Dark).collect();
        Self::new(code.width(), dark)
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn count_dark_modules(&self) -> usize {
        self.dark.iter().filter(|&&d| d).count()
    }

    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "row should be greater than or equal to w");
        debug_assert!(-w <= c && c < w, "column should be greater than or equal to w");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as _
    }

    pub fn get(&self, r: i16, c: i16) -> bool {
        self.dark[self.coord_to_index(r, c)]
    }

    /// Iterates over the coordinates of dark modules, row by row.
    pub fn dark_modules(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let w = self.w;
        self.dark.iter().enumerate().filter(|(_, &d)| d).map(move |(i, _)| (i / w, i % w))
    }

    /// True for modules of finder patterns (separators included), timing patterns and
    /// alignment patterns. Format & version info count as data for styling purposes.
    pub fn is_function(&self, r: usize, c: usize) -> bool {
        let w = self.w;

        // Finders with their separators
        if ((r < 8 || r + 8 >= w) && c < 8) || (r < 8 && c + 8 >= w) {
            return true;
        }

        // Timing patterns
        if r == 6 || c == 6 {
            return true;
        }

        for &ar in &self.ap {
            for &ac in &self.ap {
                if (ar == 6 && (ac == 6 || ac == w - 7)) || (ar == w - 7 && ac == 6) {
                    continue;
                }
                if r.abs_diff(ar) <= 2 && c.abs_diff(ac) <= 2 {
                    return true;
                }
            }
        }
        false
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w;
        let mut res = String::with_capacity(w * (w + 1) + 1);
        res.push('\n');
        for r in 0..w {
            for c in 0..w {
                let ch = match (self.dark[r * w + c], self.is_function(r, c)) {
                    (true, true) => 'f',
                    (false, true) => 'F',
                    (true, false) => 'd',
                    (false, false) => '.',
                };
                res.push(ch);
            }
            res.push('\n');
        }
        res
    }
}

// Alignment pattern centers for a symbol of width w, empty for version 1
fn alignment_pattern(w: usize) -> Vec<usize> {
    if w < 25 || (w - 17) % 4 != 0 {
        return Vec::new();
    }
    let ver = (w - 17) / 4;
    let count = ver / 7 + 2;
    let step = if ver == 32 { 26 } else { (ver * 4 + count * 2 + 1) / (count * 2 - 2) * 2 };

    let mut res = vec![6; count];
    let mut pos = w - 7;
    for p in res.iter_mut().skip(1).rev() {
        *p = pos;
        pos -= step;
    }
    res
}
